use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct PageViewEntity {
    pub date: NaiveDate,
    pub views: i64,
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct SocialClickEntity {
    pub date: NaiveDate,
    pub platform: String,
    pub clicks: i64,
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct ApplicationStat {
    pub date: NaiveDate,
    pub count: i64,
}

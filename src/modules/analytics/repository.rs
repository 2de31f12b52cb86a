use chrono::NaiveDate;

use crate::{
    api::error,
    modules::analytics::schema::{PageViewEntity, SocialClickEntity},
};

/// Daily counters. Increments are atomic upserts and return the new value.
#[async_trait::async_trait]
pub trait AnalyticsRepository {
    async fn increment_page_view(&self, date: NaiveDate) -> Result<i64, error::SystemError>;

    async fn increment_social_click(
        &self,
        date: NaiveDate,
        platform: &str,
    ) -> Result<i64, error::SystemError>;

    /// Newest first.
    async fn page_views(&self, limit: i64) -> Result<Vec<PageViewEntity>, error::SystemError>;

    /// Newest first.
    async fn social_clicks(&self, limit: i64)
        -> Result<Vec<SocialClickEntity>, error::SystemError>;
}

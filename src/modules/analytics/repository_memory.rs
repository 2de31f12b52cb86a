use std::{collections::BTreeMap, sync::Arc};

use chrono::NaiveDate;
use tokio::sync::Mutex;

use crate::{
    api::error,
    modules::analytics::{
        repository::AnalyticsRepository,
        schema::{PageViewEntity, SocialClickEntity},
    },
};

#[derive(Default)]
struct Counters {
    page_views: BTreeMap<NaiveDate, i64>,
    social_clicks: BTreeMap<(NaiveDate, String), i64>,
}

#[derive(Clone, Default)]
pub struct AnalyticsRepositoryMemory {
    counters: Arc<Mutex<Counters>>,
}

impl AnalyticsRepositoryMemory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl AnalyticsRepository for AnalyticsRepositoryMemory {
    async fn increment_page_view(&self, date: NaiveDate) -> Result<i64, error::SystemError> {
        let mut counters = self.counters.lock().await;
        let views = counters.page_views.entry(date).or_default();
        *views += 1;
        Ok(*views)
    }

    async fn increment_social_click(
        &self,
        date: NaiveDate,
        platform: &str,
    ) -> Result<i64, error::SystemError> {
        let mut counters = self.counters.lock().await;
        let clicks = counters.social_clicks.entry((date, platform.to_string())).or_default();
        *clicks += 1;
        Ok(*clicks)
    }

    async fn page_views(&self, limit: i64) -> Result<Vec<PageViewEntity>, error::SystemError> {
        let counters = self.counters.lock().await;
        Ok(counters
            .page_views
            .iter()
            .rev()
            .take(limit.max(0) as usize)
            .map(|(date, views)| PageViewEntity { date: *date, views: *views })
            .collect())
    }

    async fn social_clicks(
        &self,
        limit: i64,
    ) -> Result<Vec<SocialClickEntity>, error::SystemError> {
        let counters = self.counters.lock().await;
        let mut rows: Vec<SocialClickEntity> = counters
            .social_clicks
            .iter()
            .map(|((date, platform), clicks)| SocialClickEntity {
                date: *date,
                platform: platform.clone(),
                clicks: *clicks,
            })
            .collect();
        rows.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.platform.cmp(&b.platform)));
        rows.truncate(limit.max(0) as usize);
        Ok(rows)
    }
}

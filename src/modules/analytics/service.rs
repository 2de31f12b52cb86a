use log::info;
use std::sync::Arc;

use crate::api::error;
use crate::constants::ANALYTICS_HISTORY_DAYS;
use crate::modules::analytics::{
    model::{platform_key, AnalyticsEvent, AnalyticsSummary},
    repository::AnalyticsRepository,
};
use crate::modules::application::repository::ApplicationRepository;
use crate::utils::today;

#[derive(Clone)]
pub struct AnalyticsService {
    repo: Arc<dyn AnalyticsRepository + Send + Sync>,
    application_repo: Arc<dyn ApplicationRepository + Send + Sync>,
}

impl AnalyticsService {
    pub fn with_dependencies(
        repo: Arc<dyn AnalyticsRepository + Send + Sync>,
        application_repo: Arc<dyn ApplicationRepository + Send + Sync>,
    ) -> Self {
        info!("AnalyticsService initialized with dependencies");
        AnalyticsService { repo, application_repo }
    }

    /// Bumps today's counter for the event and returns the new value.
    pub async fn record(&self, event: AnalyticsEvent) -> Result<i64, error::SystemError> {
        let date = today();
        match event {
            AnalyticsEvent::TrackPageView => self.repo.increment_page_view(date).await,
            AnalyticsEvent::TrackSocialClick { platform } => {
                self.repo.increment_social_click(date, platform_key(platform.as_deref())).await
            }
        }
    }

    pub async fn summary(&self) -> Result<AnalyticsSummary, error::SystemError> {
        let (page_views, social_analytics, application_stats) = futures_util::try_join!(
            self.repo.page_views(ANALYTICS_HISTORY_DAYS),
            self.repo.social_clicks(ANALYTICS_HISTORY_DAYS),
            self.application_repo.daily_counts(ANALYTICS_HISTORY_DAYS),
        )?;

        Ok(AnalyticsSummary { page_views, social_analytics, application_stats })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::analytics::repository_memory::AnalyticsRepositoryMemory;
    use crate::modules::application::repository_memory::ApplicationRepositoryMemory;

    fn service() -> AnalyticsService {
        AnalyticsService::with_dependencies(
            Arc::new(AnalyticsRepositoryMemory::new()),
            Arc::new(ApplicationRepositoryMemory::new()),
        )
    }

    #[tokio::test]
    async fn test_concurrent_page_views_are_not_lost() {
        let service = service();
        let (a, b) = tokio::join!(
            service.record(AnalyticsEvent::TrackPageView),
            service.record(AnalyticsEvent::TrackPageView)
        );
        let mut values = [a.unwrap(), b.unwrap()];
        values.sort();
        assert_eq!(values, [1, 2]);

        let summary = service.summary().await.unwrap();
        assert_eq!(summary.page_views.len(), 1);
        assert_eq!(summary.page_views[0].views, 2);
        assert_eq!(summary.page_views[0].date, today());
    }

    #[tokio::test]
    async fn test_social_clicks_are_counted_per_platform() {
        let service = service();
        service.record(AnalyticsEvent::social_click("instagram")).await.unwrap();
        service.record(AnalyticsEvent::social_click("instagram")).await.unwrap();
        service.record(AnalyticsEvent::TrackSocialClick { platform: None }).await.unwrap();

        let summary = service.summary().await.unwrap();
        let clicks: Vec<(&str, i64)> = summary
            .social_analytics
            .iter()
            .map(|row| (row.platform.as_str(), row.clicks))
            .collect();
        assert_eq!(clicks, [("instagram", 2), ("unknown", 1)]);
        assert!(summary.application_stats.is_empty());
    }
}

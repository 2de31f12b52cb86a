use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::client::{
    fallback::{FallbackStore, LocalSnapshot},
    submission::{Delivery, SubmitError},
    transport::{RemoteApi, ANALYTICS},
    ClientConfig,
};
use crate::modules::analytics::{
    model::{platform_key, AnalyticsEvent, AnalyticsSummary},
    schema::{PageViewEntity, SocialClickEntity},
};
use crate::utils;

/// Best-effort usage counters. Recording never blocks the caller and never fails
/// loudly: remote first, local fallback when the backend is unreachable.
#[derive(Clone)]
pub struct AnalyticsRecorder {
    remote: RemoteApi,
    fallback: Arc<dyn FallbackStore>,
}

impl AnalyticsRecorder {
    pub fn new(config: &ClientConfig, fallback: Arc<dyn FallbackStore>) -> Result<Self, SubmitError> {
        Ok(Self { remote: RemoteApi::new(config)?, fallback })
    }

    pub fn record_page_view(&self) -> JoinHandle<()> {
        self.spawn(AnalyticsEvent::TrackPageView)
    }

    pub fn record_social_click(&self, platform: impl Into<String>) -> JoinHandle<()> {
        self.spawn(AnalyticsEvent::social_click(platform))
    }

    fn spawn(&self, event: AnalyticsEvent) -> JoinHandle<()> {
        let recorder = self.clone();
        tokio::spawn(async move {
            match recorder.track(&event).await {
                Ok(delivery) => debug!(?event, ?delivery, "analytics recorded"),
                Err(e) => warn!(?event, error = %e, "failed to record analytics"),
            }
        })
    }

    pub async fn track(&self, event: &AnalyticsEvent) -> Result<Delivery, SubmitError> {
        match self.remote.post::<_, serde_json::Value>(ANALYTICS, &[], event).await {
            Ok(_) => Ok(Delivery::Remote),
            Err(SubmitError::Transport(reason)) => {
                debug!(%reason, "backend unreachable, counting locally");
                let today = utils::today();
                match event {
                    AnalyticsEvent::TrackPageView => {
                        self.fallback.increment_page_view(today).await?;
                    }
                    AnalyticsEvent::TrackSocialClick { platform } => {
                        let platform = platform_key(platform.as_deref());
                        self.fallback.increment_social_click(today, platform).await?;
                    }
                }
                Ok(Delivery::Fallback)
            }
            Err(e) => Err(e),
        }
    }

    /// Remote summary, or one built from the local counters when the backend is down.
    pub async fn summary(&self) -> Result<AnalyticsSummary, SubmitError> {
        match self.remote.get::<AnalyticsSummary>(ANALYTICS).await {
            Ok(envelope) => Ok(envelope.data.unwrap_or_default()),
            Err(SubmitError::Transport(reason)) => {
                warn!(%reason, "backend unreachable, summarizing local analytics");
                Ok(local_summary(self.fallback.snapshot().await?))
            }
            Err(e) => Err(e),
        }
    }
}

fn local_summary(snapshot: LocalSnapshot) -> AnalyticsSummary {
    let page_views = snapshot
        .page_views
        .into_iter()
        .rev()
        .map(|(date, views)| PageViewEntity { date, views: views as i64 })
        .collect();
    let social_analytics = snapshot
        .social_analytics
        .into_iter()
        .rev()
        .flat_map(|(date, platforms)| {
            platforms.into_iter().map(move |(platform, clicks)| SocialClickEntity {
                date,
                platform,
                clicks: clicks as i64,
            })
        })
        .collect();

    AnalyticsSummary { page_views, social_analytics, application_stats: Vec::new() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fallback::MemoryFallbackStore;
    use std::time::Duration;

    fn unreachable() -> (AnalyticsRecorder, Arc<MemoryFallbackStore>) {
        let store = Arc::new(MemoryFallbackStore::new());
        let config = ClientConfig::new("http://127.0.0.1:1/api").with_timeout(Duration::from_secs(2));
        (AnalyticsRecorder::new(&config, store.clone()).unwrap(), store)
    }

    #[tokio::test]
    async fn test_page_views_fall_back_without_losing_updates() {
        let (recorder, store) = unreachable();

        let (a, b) = tokio::join!(recorder.record_page_view(), recorder.record_page_view());
        a.unwrap();
        b.unwrap();

        let snapshot = store.snapshot().await.unwrap();
        assert_eq!(snapshot.page_views.get(&utils::today()), Some(&2));
    }

    #[tokio::test]
    async fn test_social_click_without_platform_counts_as_unknown() {
        let (recorder, store) = unreachable();

        let delivery =
            recorder.track(&AnalyticsEvent::TrackSocialClick { platform: None }).await.unwrap();
        assert_eq!(delivery, Delivery::Fallback);
        recorder.record_social_click("instagram").await.unwrap();

        let summary = recorder.summary().await.unwrap();
        let mut platforms: Vec<(String, i64)> =
            summary.social_analytics.into_iter().map(|s| (s.platform, s.clicks)).collect();
        platforms.sort();
        assert_eq!(platforms, [("instagram".to_string(), 1), ("unknown".to_string(), 1)]);
        assert!(store.snapshot().await.unwrap().page_views.is_empty());
    }

    #[tokio::test]
    async fn test_blank_platform_is_counted_as_unknown_locally() {
        let (recorder, store) = unreachable();

        recorder.record_social_click("   ").await.unwrap();
        recorder.record_social_click(" facebook ").await.unwrap();

        let snapshot = store.snapshot().await.unwrap();
        let clicks = &snapshot.social_analytics[&utils::today()];
        assert_eq!(clicks.get("unknown"), Some(&1));
        assert_eq!(clicks.get("facebook"), Some(&1));
        assert_eq!(clicks.len(), 2);
    }
}

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::constants::DEFAULT_PLATFORM;
use crate::modules::analytics::schema::{ApplicationStat, PageViewEntity, SocialClickEntity};

/// Body of `POST /analytics`: `{"type":"page_view"}` or
/// `{"type":"social_click","platform":"instagram"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnalyticsEvent {
    #[serde(rename = "page_view")]
    TrackPageView,
    #[serde(rename = "social_click")]
    TrackSocialClick {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        platform: Option<String>,
    },
}

impl AnalyticsEvent {
    pub fn social_click(platform: impl Into<String>) -> Self {
        AnalyticsEvent::TrackSocialClick { platform: Some(platform.into()) }
    }
}

/// Counter key for a social click: the trimmed platform name, or `unknown` when blank.
pub fn platform_key(platform: Option<&str>) -> &str {
    platform.map(str::trim).filter(|platform| !platform.is_empty()).unwrap_or(DEFAULT_PLATFORM)
}

impl Validate for AnalyticsEvent {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let AnalyticsEvent::TrackSocialClick { platform: Some(platform) } = self {
            if platform.chars().count() > 64 {
                errors.add(
                    "platform",
                    ValidationError::new("length")
                        .with_message("Platform must be at most 64 characters long".into()),
                );
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// `GET /analytics` payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub page_views: Vec<PageViewEntity>,
    pub social_analytics: Vec<SocialClickEntity>,
    pub application_stats: Vec<ApplicationStat>,
}

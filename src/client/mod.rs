//! Applicant-side pipeline: select and encode documents, assemble the application,
//! deliver it (or park it in the local fallback store), and record usage analytics.

pub mod analytics;
pub mod assembler;
pub mod encoder;
pub mod fallback;
pub mod submission;
mod transport;

use std::time::Duration;

pub use analytics::AnalyticsRecorder;
pub use assembler::{assemble, ApplicationForm, ValidationError, Violation};
pub use encoder::{FileEncoder, FileError, SelectedFile};
pub use fallback::{FallbackError, FallbackStore, JsonFileFallbackStore, LocalSnapshot, MemoryFallbackStore};
pub use submission::{Ack, Delivery, SubmissionClient, SubmitError};

/// Where the backend lives and how long a remote call may take before it counts as a
/// transport failure.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Reads `INTAKE_API_URL` and `INTAKE_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        let base_url = std::env::var("INTAKE_API_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:8080/api".to_string());
        let timeout = std::env::var("INTAKE_TIMEOUT_SECS")
            .ok()
            .and_then(|secs| secs.parse::<u64>().ok())
            .unwrap_or(10);
        Self::new(base_url).with_timeout(Duration::from_secs(timeout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        let config = ClientConfig::new("http://localhost:8080/api/");
        assert_eq!(config.base_url, "http://localhost:8080/api");
        assert_eq!(config.timeout, Duration::from_secs(10));
    }
}

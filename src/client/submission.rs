use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::client::{
    fallback::{FallbackError, FallbackStore},
    transport::{RemoteApi, APPLICATIONS},
    ClientConfig,
};
use crate::modules::application::model::{
    Application, ApplicationAction, ApplicationStatus, ArchiveModel, ArchiveResponse,
    UpdateStatusModel,
};

#[derive(thiserror::Error, Debug)]
pub enum SubmitError {
    /// The backend could not be reached, timed out, or failed without an error body.
    #[error("Backend unreachable: {0}")]
    Transport(String),
    /// The backend answered 2xx but the body could not be read. The request may have
    /// taken effect, so this never triggers the fallback.
    #[error("Unreadable backend response: {0}")]
    InvalidResponse(String),
    #[error("Service unavailable, try again later: {0}")]
    Unavailable(String),
    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Fallback(#[from] FallbackError),
    #[error("Client setup failed: {0}")]
    Setup(String),
}

impl SubmitError {
    fn unavailable(self) -> Self {
        match self {
            SubmitError::Transport(reason) => SubmitError::Unavailable(reason),
            other => other,
        }
    }
}

/// Where an acknowledged write ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Delivery {
    Remote,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ack {
    pub delivery: Delivery,
    pub message: Option<String>,
}

impl Ack {
    fn remote(message: Option<String>) -> Self {
        Ack { delivery: Delivery::Remote, message }
    }
}

/// Talks to the applications endpoint. Only `submit` writes to the fallback store, and
/// only after the remote attempt has failed at the transport level.
#[derive(Clone)]
pub struct SubmissionClient {
    remote: RemoteApi,
    fallback: Arc<dyn FallbackStore>,
}

impl SubmissionClient {
    pub fn new(config: &ClientConfig, fallback: Arc<dyn FallbackStore>) -> Result<Self, SubmitError> {
        Ok(Self { remote: RemoteApi::new(config)?, fallback })
    }

    pub async fn submit(&self, application: &Application) -> Result<Ack, SubmitError> {
        match self.remote.post::<_, serde_json::Value>(APPLICATIONS, &[], application).await {
            Ok(envelope) => {
                info!(id = %application.id, "application delivered");
                Ok(Ack::remote(envelope.message))
            }
            Err(SubmitError::Transport(reason)) => {
                warn!(id = %application.id, %reason, "backend unreachable, storing application locally");
                self.fallback.append_application(application).await?;
                Ok(Ack {
                    delivery: Delivery::Fallback,
                    message: Some("Application saved locally".to_string()),
                })
            }
            Err(e) => Err(e),
        }
    }

    pub async fn update_status(
        &self,
        id: &str,
        status: ApplicationStatus,
    ) -> Result<Ack, SubmitError> {
        let body = UpdateStatusModel { id: id.to_string(), status: status.to_string() };
        let query = [("action", ApplicationAction::UpdateStatus.as_str())];
        let envelope = self
            .remote
            .post::<_, serde_json::Value>(APPLICATIONS, &query, &body)
            .await
            .map_err(SubmitError::unavailable)?;
        Ok(Ack::remote(envelope.message))
    }

    /// Returns the archive and scheduled hard-delete timestamps the backend assigned.
    pub async fn archive(&self, id: &str) -> Result<(Ack, Option<ArchiveResponse>), SubmitError> {
        let body = ArchiveModel { id: id.to_string() };
        let query = [("action", ApplicationAction::Archive.as_str())];
        let envelope = self
            .remote
            .post::<_, ArchiveResponse>(APPLICATIONS, &query, &body)
            .await
            .map_err(SubmitError::unavailable)?;
        Ok((Ack::remote(envelope.message), envelope.data))
    }

    pub async fn delete(&self, id: &str) -> Result<Ack, SubmitError> {
        let envelope = self
            .remote
            .delete::<serde_json::Value>(APPLICATIONS, &[("id", id)])
            .await
            .map_err(SubmitError::unavailable)?;
        Ok(Ack::remote(envelope.message))
    }

    /// Active applications. When the backend is unreachable this is the locally parked
    /// snapshot instead.
    pub async fn list(&self) -> Result<Vec<Application>, SubmitError> {
        match self.remote.get::<Vec<Application>>(APPLICATIONS).await {
            Ok(envelope) => Ok(envelope.data.unwrap_or_default()),
            Err(SubmitError::Transport(reason)) => {
                warn!(%reason, "backend unreachable, listing local applications");
                let local = self.fallback.applications().await?;
                Ok(local.into_iter().filter(|application| !application.archived).collect())
            }
            Err(e) => Err(e),
        }
    }
}

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::client::{submission::SubmitError, ClientConfig};

pub(crate) const APPLICATIONS: &str = "/applications";
pub(crate) const ANALYTICS: &str = "/analytics";

/// `{success, data?, message?, error?}` as returned by every endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub error: Option<String>,
}

/// Thin JSON-over-HTTP wrapper that sorts every failure into "the backend answered"
/// versus "the backend could not be reached".
#[derive(Clone)]
pub(crate) struct RemoteApi {
    client: Client,
    base_url: String,
}

impl RemoteApi {
    pub fn new(config: &ClientConfig) -> Result<Self, SubmitError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SubmitError::Setup(e.to_string()))?;
        Ok(Self { client, base_url: config.base_url.clone() })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<Envelope<T>, SubmitError> {
        self.send(self.client.get(self.url(path))).await
    }

    pub async fn post<B, T>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        body: &B,
    ) -> Result<Envelope<T>, SubmitError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(self.client.post(self.url(path)).query(query).json(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Envelope<T>, SubmitError> {
        self.send(self.client.delete(self.url(path)).query(query)).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<Envelope<T>, SubmitError> {
        let response = request.send().await.map_err(|e| SubmitError::Transport(e.to_string()))?;
        let status = response.status();

        // past this point a 2xx means the backend acted on the request
        if status.is_success() {
            let bytes =
                response.bytes().await.map_err(|e| SubmitError::InvalidResponse(e.to_string()))?;
            let envelope: Envelope<T> = serde_json::from_slice(&bytes).map_err(|e| {
                SubmitError::InvalidResponse(format!("unreadable response body ({status}): {e}"))
            })?;
            if !envelope.success {
                return Err(SubmitError::Rejected {
                    status: status.as_u16(),
                    message: envelope.error.unwrap_or_else(|| "Request failed".to_string()),
                });
            }
            return Ok(envelope);
        }

        let bytes = response.bytes().await.map_err(|e| SubmitError::Transport(e.to_string()))?;
        match serde_json::from_slice::<Envelope<serde_json::Value>>(&bytes) {
            Ok(Envelope { error: Some(message), .. }) if status == StatusCode::NOT_FOUND => {
                Err(SubmitError::NotFound(message))
            }
            Ok(Envelope { error: Some(message), .. }) => {
                Err(SubmitError::Rejected { status: status.as_u16(), message })
            }
            _ => Err(SubmitError::Transport(format!("HTTP {status} without an error body"))),
        }
    }
}

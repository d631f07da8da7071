//! Remote mirror strategy backed by the reflection service.
//!
//! The service owns the actual response synthesis; this adapter owns the
//! wire contract and the fallback behavior. Any transport, HTTP, or decode
//! failure is converted into a fixed gentle reflection so the journaling
//! flow never breaks on a network failure. A single failed attempt falls
//! back immediately; there is no retry policy.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

use crate::domain::archetype::Archetype;
use crate::domain::foundation::SessionId;
use crate::domain::signals::ToneTag;
use crate::ports::{MirrorProvider, MirrorRequest, MirrorResponse};

/// Fixed reflection substituted when the service cannot be reached.
const GENTLE_FALLBACK_TEXT: &str =
    "I'm listening... sometimes the deepest reflections emerge in the quiet spaces \
     between words.";

/// Configuration for the reflection service client.
#[derive(Debug, Clone)]
pub struct ReflectionServiceConfig {
    /// Base URL of the service (no trailing slash).
    pub base_url: String,
    /// Request timeout. A call that exceeds it is treated like any other
    /// transport failure.
    pub timeout: Duration,
    /// Optional API key sent as a bearer token.
    api_key: Option<Secret<String>>,
}

impl ReflectionServiceConfig {
    /// Creates a configuration for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(30),
            api_key: None,
        }
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(Secret::new(api_key.into()));
        self
    }

    fn api_key(&self) -> Option<&str> {
        self.api_key.as_ref().map(|k| k.expose_secret().as_str())
    }
}

/// Errors surfaced by the raw client. The [`RemoteMirror`] strategy
/// swallows these into the fallback reflection; they exist so callers of
/// the client itself can log diagnostics.
#[derive(Debug, Error)]
pub enum ReflectionServiceError {
    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("service returned status {0}")]
    Status(u16),

    #[error("failed to decode response: {0}")]
    Decode(String),
}

#[derive(Debug, Serialize)]
struct ReflectRequestBody {
    session_id: String,
    bloom_id: String,
    journal_text: String,
    user_history: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ReflectResponseBody {
    text: String,
    #[serde(default)]
    tone_tags: Vec<String>,
    #[serde(default)]
    archetype_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct SessionCreateBody {
    total_sessions: u32,
}

/// Session record handed back by the reflection service.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteSession {
    pub id: String,
    pub blooms_unlocked: usize,
    pub total_sessions: u32,
}

/// Raw HTTP client for the reflection service contract.
#[derive(Debug, Clone)]
pub struct ReflectionServiceClient {
    config: ReflectionServiceConfig,
    client: Client,
}

impl ReflectionServiceClient {
    /// Creates a client with the given configuration.
    ///
    /// # Errors
    ///
    /// - `Network` if the underlying HTTP client cannot be constructed
    pub fn new(config: ReflectionServiceConfig) -> Result<Self, ReflectionServiceError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ReflectionServiceError::Network(e.to_string()))?;

        Ok(Self { config, client })
    }

    fn reflect_url(&self) -> String {
        format!("{}/api/mirror/reflect", self.config.base_url)
    }

    fn sessions_url(&self) -> String {
        format!("{}/api/sessions", self.config.base_url)
    }

    fn map_transport_error(&self, e: reqwest::Error) -> ReflectionServiceError {
        if e.is_timeout() {
            ReflectionServiceError::Timeout(self.config.timeout)
        } else {
            ReflectionServiceError::Network(e.to_string())
        }
    }

    async fn post_json<B: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        url: String,
        body: &B,
    ) -> Result<R, ReflectionServiceError> {
        let mut request = self.client.post(url).json(body);
        if let Some(key) = self.config.api_key() {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        if !response.status().is_success() {
            return Err(ReflectionServiceError::Status(response.status().as_u16()));
        }

        response
            .json::<R>()
            .await
            .map_err(|e| ReflectionServiceError::Decode(e.to_string()))
    }

    /// Requests a reflection from the service.
    pub async fn reflect(
        &self,
        request: &MirrorRequest,
    ) -> Result<MirrorResponse, ReflectionServiceError> {
        let body = ReflectRequestBody {
            session_id: request.session_id.to_string(),
            bloom_id: request.bloom_id.as_str().to_string(),
            journal_text: request.journal_text.clone(),
            user_history: request.prior_tags.iter().map(|t| t.to_string()).collect(),
        };

        let response: ReflectResponseBody = self.post_json(self.reflect_url(), &body).await?;

        let archetype = response.archetype_id.as_deref().and_then(|id| {
            id.parse::<Archetype>()
                .map_err(|e| warn!(archetype_id = id, "ignoring unknown archetype: {e}"))
                .ok()
        });

        Ok(MirrorResponse {
            text: response.text,
            tags: response.tone_tags.into_iter().map(ToneTag::new).collect(),
            archetype,
        })
    }

    /// Creates a session on the service with progressive unlocking.
    ///
    /// If the service is unreachable, a locally-derived session is returned
    /// instead: a fresh id with the same step-function unlock thresholds
    /// the service applies to the given session ordinal.
    pub async fn create_session(&self, total_sessions: u32) -> RemoteSession {
        match self
            .post_json::<_, RemoteSession>(
                self.sessions_url(),
                &SessionCreateBody { total_sessions },
            )
            .await
        {
            Ok(session) => session,
            Err(e) => {
                warn!("reflection service session creation failed, using local session: {e}");
                let blooms_unlocked = if total_sessions >= 3 {
                    8
                } else if total_sessions >= 2 {
                    5
                } else {
                    3
                };
                RemoteSession {
                    id: SessionId::new().to_string(),
                    blooms_unlocked,
                    total_sessions,
                }
            }
        }
    }
}

/// Remote-service-backed mirror strategy.
pub struct RemoteMirror {
    client: ReflectionServiceClient,
}

impl RemoteMirror {
    /// Wraps a reflection service client.
    pub fn new(client: ReflectionServiceClient) -> Self {
        Self { client }
    }

    fn fallback() -> MirrorResponse {
        MirrorResponse {
            text: GENTLE_FALLBACK_TEXT.to_string(),
            tags: vec![ToneTag::new("gentle")],
            archetype: None,
        }
    }
}

#[async_trait]
impl MirrorProvider for RemoteMirror {
    async fn generate(&self, request: MirrorRequest) -> MirrorResponse {
        match self.client.reflect(&request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(
                    bloom = %request.bloom_id,
                    "reflection service failed, substituting gentle fallback: {e}"
                );
                Self::fallback()
            }
        }
    }
}

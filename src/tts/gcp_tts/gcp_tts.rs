use crate::errors::{constants, NarratorError, Result};
use crate::tts::{
    gcp_tts::structs::{
        synthesize_request::SynthesizeRequest, synthesize_response::SynthesizeResponse,
    },
    tts::SpeechSynthesizer,
    validator::warn_if_truncated,
    voice::VoiceConfig,
};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use gcp_auth::{AuthenticationManager, Token};
use std::{fmt, path::PathBuf, time::Duration};
use tokio::sync::RwLock;
use tracing::debug;

/// How requests to the Text-to-Speech API are authorised.
#[derive(Clone, Debug, PartialEq)]
pub enum Credentials {
    /// API key sent as the `key` query parameter.
    ApiKey(String),
    /// Service account key file.
    ServiceAccount(PathBuf),
    /// Whatever Google credentials the environment provides.
    Ambient,
}

enum Auth {
    ApiKey(String),
    Bearer {
        manager: AuthenticationManager,
        token: RwLock<Option<Token>>,
    },
}

pub struct GCPTTS {
    client: reqwest::Client,
    endpoint: String,
    voice: VoiceConfig,
    auth: Auth,
}

impl fmt::Debug for GCPTTS {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let auth = match self.auth {
            Auth::ApiKey(_) => "api-key",
            Auth::Bearer { .. } => "bearer",
        };
        f.debug_struct("GCPTTS")
            .field("endpoint", &self.endpoint)
            .field("voice", &self.voice)
            .field("auth", &auth)
            .finish()
    }
}

impl GCPTTS {
    #[tracing::instrument(skip(credentials))]
    pub async fn new(
        voice: VoiceConfig,
        credentials: Credentials,
        endpoint: String,
        timeout: Duration,
    ) -> Result<Self> {
        let auth = match credentials {
            Credentials::ApiKey(key) => Auth::ApiKey(key),
            Credentials::ServiceAccount(path) => Auth::Bearer {
                manager: gcp_auth::from_credentials_file(path).await?,
                token: RwLock::new(None),
            },
            Credentials::Ambient => Auth::Bearer {
                manager: gcp_auth::init().await?,
                token: RwLock::new(None),
            },
        };

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint,
            voice,
            auth,
        })
    }

    pub fn voice(&self) -> &VoiceConfig {
        &self.voice
    }

    /// Return a valid bearer token, fetching a new one when the cached token expired.
    async fn bearer_token(
        manager: &AuthenticationManager,
        token: &RwLock<Option<Token>>,
    ) -> Result<String> {
        {
            let cached = token.read().await;
            if let Some(cached) = cached.as_ref().filter(|t| !t.has_expired()) {
                return Ok(cached.as_str().to_string());
            }
        }

        let mut cached = token.write().await;
        debug!("Fetching GCP access token");
        let new_token = manager.get_token(&[constants::GCP_SCOPE]).await?;
        let token_string = new_token.as_str().to_string();
        *cached = Some(new_token);

        Ok(token_string)
    }

    /// Synthesize a prepared request and return the decoded audio data.
    #[tracing::instrument(skip(self, request))]
    pub async fn synthesize_request(&self, request: &SynthesizeRequest) -> Result<Vec<u8>> {
        let builder = self.client.post(&self.endpoint).json(request);
        let builder = match &self.auth {
            Auth::ApiKey(key) => builder.query(&[("key", key.as_str())]),
            Auth::Bearer { manager, token } => {
                builder.bearer_auth(Self::bearer_token(manager, token).await?)
            }
        };

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(NarratorError::TTSService {
                status: status.as_u16(),
                message: message.trim().to_string(),
            });
        }

        let response: SynthesizeResponse = response.json().await?;
        if response.audioContent.is_empty() {
            return Err(NarratorError::tts_synthesis("Service returned no audio"));
        }

        Ok(STANDARD.decode(response.audioContent)?)
    }
}

#[async_trait]
impl SpeechSynthesizer for GCPTTS {
    #[tracing::instrument(skip(self, text), fields(chars = text.chars().count()))]
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        warn_if_truncated(text);
        let request = SynthesizeRequest::from_text(text, &self.voice);
        self.synthesize_request(&request).await
    }
}

//! Resume Gateway client, the editor's only path to the Resume API.
//!
//! `ResumeGateway` is the seam the session talks to; `HttpResumeGateway`
//! implements it over reqwest against the REST surface.

use std::time::Duration;

use anyhow::{bail, Context};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use resume::auth::Credential;
use resume::{FieldError, ResumeDocument, ResumePatch};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

const DEFAULT_API_URL: &str = "http://localhost:8080";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("credential rejected by the server")]
    Unauthorized,

    #[error("access denied")]
    Forbidden,

    #[error("validation failed on {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    #[error("resume already exists: {0}")]
    Conflict(String),

    #[error("resume not found")]
    NotFound,

    #[error("server error (status {status}): {message}")]
    Server { status: u16, message: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("invalid API URL: {0}")]
    InvalidUrl(String),
}

/// Persistence contract as seen from the editor.
#[async_trait]
pub trait ResumeGateway: Send + Sync {
    /// The caller's stored document, or `None` for a first-time user.
    async fn fetch(&self, credential: &Credential) -> Result<Option<ResumeDocument>, GatewayError>;

    async fn create(
        &self,
        credential: &Credential,
        patch: &ResumePatch,
    ) -> Result<ResumeDocument, GatewayError>;

    async fn update(
        &self,
        credential: &Credential,
        patch: &ResumePatch,
    ) -> Result<ResumeDocument, GatewayError>;

    async fn delete(&self, credential: &Credential) -> Result<(), GatewayError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Configuration
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub base_url: Url,
    pub timeout: Duration,
}

impl GatewayConfig {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let base_url =
            Url::parse(base_url).with_context(|| format!("'{base_url}' is not a valid URL"))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            bail!("API URL must use http or https, got '{}'", base_url.scheme());
        }
        Ok(Self {
            base_url,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Reads `RESUME_API_URL` and `RESUME_API_TIMEOUT_SECS`, after loading `.env`.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let url = std::env::var("RESUME_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let mut config = Self::new(&url)?;
        if let Ok(secs) = std::env::var("RESUME_API_TIMEOUT_SECS") {
            let secs = secs
                .parse::<u64>()
                .context("RESUME_API_TIMEOUT_SECS must be a whole number of seconds")?;
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// HTTP implementation
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct DataResponse<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct ValidationBody {
    errors: Vec<FieldError>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

#[derive(Clone)]
pub struct HttpResumeGateway {
    client: Client,
    base_url: Url,
}

impl HttpResumeGateway {
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        Ok(Self {
            client: Client::builder().timeout(config.timeout).build()?,
            base_url: config.base_url,
        })
    }

    /// `{base}/api/resumes` or `{base}/api/resumes/{user_id}`.
    fn resumes_url(&self, user_id: Option<&str>) -> Result<Url, GatewayError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| GatewayError::InvalidUrl(self.base_url.to_string()))?;
            segments.pop_if_empty().extend(["api", "resumes"]);
            if let Some(user_id) = user_id {
                segments.push(user_id);
            }
        }
        Ok(url)
    }

    fn body(credential: &Credential, patch: &ResumePatch) -> serde_json::Value {
        let mut body = serde_json::to_value(patch).unwrap_or_else(|_| serde_json::json!({}));
        if let Some(map) = body.as_object_mut() {
            map.insert(
                "userId".to_string(),
                serde_json::Value::String(credential.user_id().to_string()),
            );
        }
        body
    }
}

#[async_trait]
impl ResumeGateway for HttpResumeGateway {
    async fn fetch(&self, credential: &Credential) -> Result<Option<ResumeDocument>, GatewayError> {
        let url = self.resumes_url(Some(credential.user_id()))?;
        let response = self
            .client
            .get(url)
            .bearer_auth(&credential.token)
            .send()
            .await?;
        let documents: DataResponse<Vec<ResumeDocument>> = read_json(response).await?;
        debug!("Fetched {} resume document(s)", documents.data.len());
        Ok(documents.data.into_iter().next())
    }

    async fn create(
        &self,
        credential: &Credential,
        patch: &ResumePatch,
    ) -> Result<ResumeDocument, GatewayError> {
        let url = self.resumes_url(None)?;
        let response = self
            .client
            .post(url)
            .bearer_auth(&credential.token)
            .json(&Self::body(credential, patch))
            .send()
            .await?;
        let created: DataResponse<ResumeDocument> = read_json(response).await?;
        Ok(created.data)
    }

    async fn update(
        &self,
        credential: &Credential,
        patch: &ResumePatch,
    ) -> Result<ResumeDocument, GatewayError> {
        let url = self.resumes_url(Some(credential.user_id()))?;
        let response = self
            .client
            .put(url)
            .bearer_auth(&credential.token)
            .json(&Self::body(credential, patch))
            .send()
            .await?;
        let updated: DataResponse<ResumeDocument> = read_json(response).await?;
        Ok(updated.data)
    }

    async fn delete(&self, credential: &Credential) -> Result<(), GatewayError> {
        let url = self.resumes_url(Some(credential.user_id()))?;
        let response = self
            .client
            .delete(url)
            .bearer_auth(&credential.token)
            .send()
            .await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(error_from_status(status, &body))
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }
    let body = response.text().await.unwrap_or_default();
    Err(error_from_status(status, &body))
}

/// Maps a non-success response onto the error taxonomy.
fn error_from_status(status: StatusCode, body: &str) -> GatewayError {
    let message = || {
        serde_json::from_str::<ErrorBody>(body)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| body.to_string())
    };
    match status {
        StatusCode::BAD_REQUEST => match serde_json::from_str::<ValidationBody>(body) {
            Ok(v) => GatewayError::Validation(v.errors),
            Err(_) => GatewayError::Server {
                status: status.as_u16(),
                message: message(),
            },
        },
        StatusCode::UNAUTHORIZED => GatewayError::Unauthorized,
        StatusCode::FORBIDDEN => GatewayError::Forbidden,
        StatusCode::NOT_FOUND => GatewayError::NotFound,
        StatusCode::CONFLICT => GatewayError::Conflict(message()),
        _ => GatewayError::Server {
            status: status.as_u16(),
            message: message(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resume::auth::encode_unsigned;
    use resume::{ResumeDraft, Section};
    use serde_json::json;

    fn gateway(base: &str) -> HttpResumeGateway {
        HttpResumeGateway::new(GatewayConfig::new(base).unwrap()).unwrap()
    }

    #[test]
    fn test_resumes_url() {
        let gw = gateway("http://localhost:8080");
        assert_eq!(
            gw.resumes_url(None).unwrap().as_str(),
            "http://localhost:8080/api/resumes"
        );
        assert_eq!(
            gw.resumes_url(Some("64f0c2")).unwrap().as_str(),
            "http://localhost:8080/api/resumes/64f0c2"
        );
    }

    #[test]
    fn test_resumes_url_keeps_base_path_and_escapes_id() {
        let gw = gateway("https://example.com/backend/");
        assert_eq!(
            gw.resumes_url(Some("a/b")).unwrap().as_str(),
            "https://example.com/backend/api/resumes/a%2Fb"
        );
    }

    #[test]
    fn test_config_rejects_non_http() {
        assert!(GatewayConfig::new("ftp://example.com").is_err());
        assert!(GatewayConfig::new("not a url").is_err());
    }

    #[test]
    fn test_body_carries_user_id_and_section() {
        let credential = Credential::parse(&encode_unsigned(&json!({ "userId": "u1" }))).unwrap();
        let mut draft = ResumeDraft::default();
        draft.projects = vec!["Compiler".to_string()];
        let patch = ResumePatch::for_section(&draft, Section::Projects);

        assert_eq!(
            HttpResumeGateway::body(&credential, &patch),
            json!({ "userId": "u1", "projects": ["Compiler"] })
        );
    }

    #[test]
    fn test_validation_errors_mapped() {
        let body = r#"{"errors":[{"field":"basicInfo.contact","message":"Contact must be exactly 10 digits"}]}"#;
        match error_from_status(StatusCode::BAD_REQUEST, body) {
            GatewayError::Validation(errors) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "basicInfo.contact");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_error_envelope_message_extracted() {
        let body = r#"{"error":{"code":"CONFLICT","message":"A resume already exists for user u1"}}"#;
        match error_from_status(StatusCode::CONFLICT, body) {
            GatewayError::Conflict(message) => {
                assert_eq!(message, "A resume already exists for user u1")
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(
            error_from_status(StatusCode::BAD_GATEWAY, "upstream down"),
            GatewayError::Server { status: 502, ref message } if message == "upstream down"
        ));
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            error_from_status(StatusCode::UNAUTHORIZED, ""),
            GatewayError::Unauthorized
        ));
        assert!(matches!(
            error_from_status(StatusCode::FORBIDDEN, ""),
            GatewayError::Forbidden
        ));
        assert!(matches!(
            error_from_status(StatusCode::NOT_FOUND, ""),
            GatewayError::NotFound
        ));
    }
}

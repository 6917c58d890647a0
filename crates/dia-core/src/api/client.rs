use std::path::Path;

use anyhow::{Context, Result};
use reqwest::header;
use reqwest::multipart;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::error::{ApiError, ApiErrorKind, ApiResult};
use super::types::{
    AnalysisResponse, AnalyzeDomainRequest, AnalyzeUrlsRequest, ChatRequest, ChatResponse,
    ChatType, DocumentStatus, DocumentStatusResponse, Envelope, HistoryMessage, HistoryResponse,
    InitializeRequest, InitializeResponse, RenameRequest, SessionEntry, SessionIdRequest,
    SessionsResponse, SyncResponse, UploadResponse,
};
use crate::config::Config;

/// Environment variable that overrides the configured backend URL.
pub const BASE_URL_ENV: &str = "DIA_BASE_URL";

/// User-Agent sent with every backend request.
pub const USER_AGENT: &str = concat!("dia/", env!("CARGO_PKG_VERSION"));

/// Resolves the backend base URL with precedence: flag > env > config > default.
///
/// Trailing slashes are stripped so endpoint paths can be joined with a
/// single `/`.
///
/// # Errors
/// Returns an error if the winning candidate is not a parseable URL.
pub fn resolve_base_url(override_url: Option<&str>, config_base_url: &str) -> Result<String> {
    // Explicit flag first
    if let Some(url) = override_url {
        let trimmed = url.trim();
        if !trimmed.is_empty() {
            validate_url(trimmed)?;
            return Ok(normalize(trimmed));
        }
    }

    // Then env var
    if let Ok(env_url) = std::env::var(BASE_URL_ENV) {
        let trimmed = env_url.trim();
        if !trimmed.is_empty() {
            validate_url(trimmed)?;
            return Ok(normalize(trimmed));
        }
    }

    // Then config value
    let trimmed = config_base_url.trim();
    if !trimmed.is_empty() {
        validate_url(trimmed)?;
        return Ok(normalize(trimmed));
    }

    Ok(Config::DEFAULT_BASE_URL.to_string())
}

fn validate_url(url: &str) -> Result<()> {
    url::Url::parse(url).with_context(|| format!("Invalid backend base URL: {url}"))?;
    Ok(())
}

fn normalize(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

/// HTTP client for the analyzer backend.
///
/// Cheap to clone; task handlers take a clone per request.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize(&base_url.into()),
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    async fn get(&self, path: &str) -> ApiResult<String> {
        debug!(path, "GET");
        let response = self
            .http
            .get(self.endpoint(path))
            .header(header::USER_AGENT, USER_AGENT)
            .send()
            .await?;
        Self::read_body(response).await
    }

    async fn post_json<B: Serialize>(&self, path: &str, body: &B) -> ApiResult<String> {
        debug!(path, "POST");
        let response = self
            .http
            .post(self.endpoint(path))
            .header(header::USER_AGENT, USER_AGENT)
            .json(body)
            .send()
            .await?;
        Self::read_body(response).await
    }

    async fn delete(&self, path: &str) -> ApiResult<String> {
        debug!(path, "DELETE");
        let response = self
            .http
            .delete(self.endpoint(path))
            .header(header::USER_AGENT, USER_AGENT)
            .send()
            .await?;
        Self::read_body(response).await
    }

    async fn read_body(response: reqwest::Response) -> ApiResult<String> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ApiError::http_status(status.as_u16(), &body));
        }
        Ok(body)
    }

    /// Parses a backend body into `T`, surfacing `success: false` payloads
    /// as `ApiError::Api`.
    fn decode<T: serde::de::DeserializeOwned>(body: &str) -> ApiResult<T> {
        let envelope: Envelope =
            serde_json::from_str(body).map_err(|e| ApiError::parse(&e, body))?;
        if !envelope.success {
            return Err(ApiError::api(envelope.message.unwrap_or_default()));
        }
        serde_json::from_str(body).map_err(|e| ApiError::parse(&e, body))
    }

    /// Like [`Self::decode`] for endpoints whose only payload is the
    /// envelope `message`.
    fn decode_message(body: &str) -> ApiResult<String> {
        let envelope: Envelope =
            serde_json::from_str(body).map_err(|e| ApiError::parse(&e, body))?;
        if !envelope.success {
            return Err(ApiError::api(envelope.message.unwrap_or_default()));
        }
        Ok(envelope.message.unwrap_or_default())
    }

    // === Sessions ===

    /// Creates a session on the backend and returns the created metadata.
    pub async fn initialize(&self, name: &str, provider: &str) -> ApiResult<InitializeResponse> {
        let body = self
            .post_json("initialize", &InitializeRequest { name, provider })
            .await?;
        Self::decode(&body)
    }

    /// Lists sessions in backend registry order.
    pub async fn sessions(&self) -> ApiResult<Vec<SessionEntry>> {
        let body = self.get("sessions").await?;
        let parsed: SessionsResponse = Self::decode(&body)?;
        Ok(parsed.sessions)
    }

    pub async fn delete_session(&self, session_id: &str) -> ApiResult<String> {
        let body = self.delete(&format!("session/{session_id}")).await?;
        Self::decode_message(&body)
    }

    pub async fn rename_session(&self, session_id: &str, name: &str) -> ApiResult<String> {
        let body = self
            .post_json(&format!("session/{session_id}/rename"), &RenameRequest { name })
            .await?;
        Self::decode_message(&body)
    }

    pub async fn history(&self, session_id: &str) -> ApiResult<Vec<HistoryMessage>> {
        let body = self.get(&format!("history/{session_id}")).await?;
        let parsed: HistoryResponse = Self::decode(&body)?;
        Ok(parsed.history)
    }

    // === Chat & analysis ===

    pub async fn chat(
        &self,
        session_id: &str,
        message: &str,
        chat_type: ChatType,
    ) -> ApiResult<ChatResponse> {
        let body = self
            .post_json(
                "chat",
                &ChatRequest {
                    session_id,
                    message,
                    chat_type,
                },
            )
            .await?;
        Self::decode(&body)
    }

    /// Crawls and summarizes a domain; returns the report text.
    pub async fn analyze_domain(&self, session_id: &str, domain: &str) -> ApiResult<String> {
        let body = self
            .post_json("analyze_domain", &AnalyzeDomainRequest { session_id, domain })
            .await?;
        let parsed: AnalysisResponse = Self::decode(&body)?;
        Ok(parsed.content)
    }

    /// Analyzes an explicit URL list; returns the report text.
    pub async fn analyze_urls(&self, session_id: &str, urls: &[String]) -> ApiResult<String> {
        let body = self
            .post_json("analyze_urls", &AnalyzeUrlsRequest { session_id, urls })
            .await?;
        let parsed: AnalysisResponse = Self::decode(&body)?;
        Ok(parsed.content)
    }

    /// Re-crawls the session's domain; returns the backend result text.
    pub async fn sync(&self, session_id: &str) -> ApiResult<String> {
        let body = self
            .post_json("sync", &SessionIdRequest { session_id })
            .await?;
        let parsed: SyncResponse = Self::decode(&body)?;
        Ok(parsed.result)
    }

    pub async fn clear_chat(&self, session_id: &str) -> ApiResult<String> {
        let body = self
            .post_json("clear-chat", &SessionIdRequest { session_id })
            .await?;
        Self::decode_message(&body)
    }

    // === Documents ===

    /// Uploads one file as multipart form data. `path` is read fully into
    /// memory; callers enforce the size cap before getting here.
    pub async fn upload_file(&self, session_id: &str, path: &Path) -> ApiResult<UploadResponse> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.bin".to_string());
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            ApiError::new(
                ApiErrorKind::Transport,
                format!("failed to read {}: {e}", path.display()),
            )
        })?;
        let part = multipart::Part::bytes(bytes).file_name(file_name);
        let form = multipart::Form::new()
            .text("session_id", session_id.to_string())
            .part("file", part);

        debug!(path = "upload_file", "POST multipart");
        let response = self
            .http
            .post(self.endpoint("upload_file"))
            .header(header::USER_AGENT, USER_AGENT)
            .multipart(form)
            .send()
            .await?;
        let body = Self::read_body(response).await?;
        Self::decode(&body)
    }

    pub async fn document_status(&self, session_id: &str) -> ApiResult<DocumentStatus> {
        let body = self.get(&format!("document_status/{session_id}")).await?;
        let parsed: DocumentStatusResponse = Self::decode(&body)?;
        Ok(parsed.data)
    }

    pub async fn clear_documents(&self, session_id: &str) -> ApiResult<String> {
        let body = self
            .post_json(&format!("clear_documents/{session_id}"), &serde_json::json!({}))
            .await?;
        Self::decode_message(&body)
    }

    // === Backend ===

    /// Fetches backend diagnostics as raw JSON for verbatim display.
    pub async fn status(&self) -> ApiResult<Value> {
        let body = self.get("status").await?;
        let value: Value = serde_json::from_str(&body).map_err(|e| ApiError::parse(&e, &body))?;
        if value.get("success").and_then(Value::as_bool) == Some(false) {
            let message = value
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or_default();
            return Err(ApiError::api(message));
        }
        Ok(value)
    }

    pub async fn load_model(&self) -> ApiResult<String> {
        let body = self.post_json("load_model", &serde_json::json!({})).await?;
        Self::decode_message(&body)
    }
}

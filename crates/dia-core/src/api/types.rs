use serde::{Deserialize, Serialize};
use serde_json::Value;

// === Request Types ===

/// Which retrieval context the backend should answer from.
///
/// `Auto` lets the backend pick: document chat when the session has
/// indexed chunks, domain chat otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatType {
    Auto,
    Domain,
    Document,
}

impl ChatType {
    pub fn as_str(self) -> &'static str {
        match self {
            ChatType::Auto => "auto",
            ChatType::Domain => "domain",
            ChatType::Document => "document",
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct InitializeRequest<'a> {
    pub(crate) name: &'a str,
    pub(crate) provider: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct RenameRequest<'a> {
    pub(crate) name: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub(crate) session_id: &'a str,
    pub(crate) message: &'a str,
    pub(crate) chat_type: ChatType,
}

#[derive(Debug, Serialize)]
pub(crate) struct AnalyzeDomainRequest<'a> {
    pub(crate) session_id: &'a str,
    pub(crate) domain: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct AnalyzeUrlsRequest<'a> {
    pub(crate) session_id: &'a str,
    pub(crate) urls: &'a [String],
}

#[derive(Debug, Serialize)]
pub(crate) struct SessionIdRequest<'a> {
    pub(crate) session_id: &'a str,
}

// === Response Types ===

/// Envelope shared by every backend response. `success: false` bodies
/// carry the error in `message` and are converted to `ApiError::Api`
/// before callers see them.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope {
    #[serde(default)]
    pub(crate) success: bool,
    #[serde(default)]
    pub(crate) message: Option<String>,
}

/// One session as listed by `GET /api/sessions`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SessionEntry {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct SessionsResponse {
    #[serde(default)]
    pub sessions: Vec<SessionEntry>,
}

/// Result of `POST /api/initialize`.
#[derive(Debug, Clone, Deserialize)]
pub struct InitializeResponse {
    pub session_id: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub llm_provider: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

/// One turn of stored chat history.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HistoryMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct HistoryResponse {
    #[serde(default)]
    pub history: Vec<HistoryMessage>,
}

/// Result of `POST /api/chat`. `sources` is only populated for document
/// chat; the backend omits it entirely for domain answers.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub sources: Vec<Value>,
}

impl ChatResponse {
    /// Human-readable labels for the retrieval sources, deduplicated in
    /// order of first appearance. The backend sends either bare strings
    /// or metadata objects keyed by `source` / `filename` / `url`.
    pub fn source_labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = Vec::new();
        for value in &self.sources {
            let label = match value {
                Value::String(s) => s.clone(),
                Value::Object(map) => ["source", "filename", "url"]
                    .iter()
                    .find_map(|key| map.get(*key).and_then(Value::as_str))
                    .map_or_else(|| value.to_string(), str::to_string),
                other => other.to_string(),
            };
            if !labels.contains(&label) {
                labels.push(label);
            }
        }
        labels
    }
}

/// Result of `POST /api/analyze_domain` and `POST /api/analyze_urls`.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisResponse {
    #[serde(default)]
    pub content: String,
}

/// Result of `POST /api/sync`. `result` is free-form text from the
/// backend crawler.
#[derive(Debug, Clone, Deserialize)]
pub struct SyncResponse {
    #[serde(default)]
    pub result: String,
}

/// Result of `POST /api/upload_file` for a single file.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub files_processed: Vec<String>,
    #[serde(default)]
    pub chunks_added: u64,
}

/// Per-session document index counters from
/// `GET /api/document_status/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DocumentStatus {
    #[serde(default)]
    pub total_chunks: u64,
    #[serde(default)]
    pub documents_processed: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DocumentStatusResponse {
    #[serde(default)]
    pub(crate) data: DocumentStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// test_chat_type_serializes_lowercase: the backend matches chat_type
    /// against lowercase string literals.
    #[test]
    fn test_chat_type_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ChatType::Auto).unwrap(), "\"auto\"");
        assert_eq!(
            serde_json::to_string(&ChatType::Document).unwrap(),
            "\"document\""
        );
        assert_eq!(ChatType::Domain.as_str(), "domain");
    }

    /// test_sessions_response_parses: list payload from the backend.
    #[test]
    fn test_sessions_response_parses() {
        let body = r#"{"success": true, "sessions": [{"id": "abc", "name": "My Domain"}]}"#;
        let parsed: SessionsResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.sessions.len(), 1);
        assert_eq!(parsed.sessions[0].id, "abc");
        assert_eq!(parsed.sessions[0].name, "My Domain");
    }

    /// test_chat_response_without_sources: domain answers omit the
    /// sources key entirely.
    #[test]
    fn test_chat_response_without_sources() {
        let body = r#"{"success": true, "response": "hello"}"#;
        let parsed: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.response, "hello");
        assert!(parsed.sources.is_empty());
    }

    /// test_source_labels: strings pass through, objects prefer the
    /// source key, duplicates collapse.
    #[test]
    fn test_source_labels() {
        let body = r#"{
            "success": true,
            "response": "ok",
            "sources": [
                "report.pdf",
                {"source": "notes.md", "page": 3},
                {"filename": "slides.pptx"},
                "report.pdf"
            ]
        }"#;
        let parsed: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(
            parsed.source_labels(),
            vec!["report.pdf", "notes.md", "slides.pptx"]
        );
    }

    /// test_document_status_defaults: a fresh session reports zero
    /// chunks and no documents even if the backend omits fields.
    #[test]
    fn test_document_status_defaults() {
        let body = r#"{"success": true, "data": {}}"#;
        let parsed: DocumentStatusResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.data, DocumentStatus::default());
    }

    /// test_initialize_response_parses: full initialize payload.
    #[test]
    fn test_initialize_response_parses() {
        let body = r#"{
            "success": true,
            "message": "Analyzer initialized.",
            "session_id": "s1",
            "llm_provider": "groq",
            "model": "llama-3.3-70b-versatile"
        }"#;
        let parsed: InitializeResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.session_id, "s1");
        assert_eq!(parsed.llm_provider.as_deref(), Some("groq"));
    }
}

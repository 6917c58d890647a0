//! Chat and analysis effect handlers.
//!
//! Every result carries the session id the request was issued for, so
//! the reducer can drop payloads that outlived a session switch.

use dia_core::api::{ApiClient, ChatType};

use crate::events::{ChatUiEvent, UiEvent};

pub async fn chat_send(
    client: ApiClient,
    session_id: String,
    message: String,
    chat_type: ChatType,
) -> UiEvent {
    let event = match client.chat(&session_id, &message, chat_type).await {
        Ok(response) => ChatUiEvent::Completed { session_id, response },
        Err(error) => ChatUiEvent::Failed { session_id, error },
    };
    UiEvent::Chat(event)
}

pub async fn analyze_domain(client: ApiClient, session_id: String, domain: String) -> UiEvent {
    let event = match client.analyze_domain(&session_id, &domain).await {
        Ok(content) => ChatUiEvent::DomainAnalyzed { session_id, content },
        Err(error) => ChatUiEvent::AnalysisFailed { session_id, error },
    };
    UiEvent::Chat(event)
}

pub async fn analyze_urls(client: ApiClient, session_id: String, urls: Vec<String>) -> UiEvent {
    let event = match client.analyze_urls(&session_id, &urls).await {
        Ok(content) => ChatUiEvent::UrlsAnalyzed { session_id, content },
        Err(error) => ChatUiEvent::AnalysisFailed { session_id, error },
    };
    UiEvent::Chat(event)
}

pub async fn sync_domain(client: ApiClient, session_id: String) -> UiEvent {
    let event = match client.sync(&session_id).await {
        Ok(result) => ChatUiEvent::Synced { session_id, result },
        Err(error) => ChatUiEvent::SyncFailed { session_id, error },
    };
    UiEvent::Chat(event)
}

pub async fn clear_chat(client: ApiClient, session_id: String) -> UiEvent {
    let event = match client.clear_chat(&session_id).await {
        Ok(message) => ChatUiEvent::Cleared { session_id, message },
        Err(error) => ChatUiEvent::ClearFailed { session_id, error },
    };
    UiEvent::Chat(event)
}

//! Session effect handlers: list, create, delete, rename, history.

use dia_core::api::ApiClient;
use dia_core::config::ProviderKind;

use crate::events::{SessionUiEvent, UiEvent};

pub async fn sessions_load(client: ApiClient) -> UiEvent {
    let event = match client.sessions().await {
        Ok(sessions) => SessionUiEvent::ListLoaded { sessions },
        Err(error) => SessionUiEvent::ListFailed { error },
    };
    UiEvent::Session(event)
}

pub async fn session_create(client: ApiClient, name: String, provider: ProviderKind) -> UiEvent {
    let event = match client.initialize(&name, provider.id()).await {
        Ok(response) => SessionUiEvent::Created { response },
        Err(error) => SessionUiEvent::CreateFailed { error },
    };
    UiEvent::Session(event)
}

pub async fn session_delete(client: ApiClient, session_id: String) -> UiEvent {
    let event = match client.delete_session(&session_id).await {
        Ok(message) => SessionUiEvent::Deleted { message },
        Err(error) => SessionUiEvent::DeleteFailed { error },
    };
    UiEvent::Session(event)
}

pub async fn session_rename(client: ApiClient, session_id: String, name: String) -> UiEvent {
    let event = match client.rename_session(&session_id, &name).await {
        Ok(message) => SessionUiEvent::Renamed { message },
        Err(error) => SessionUiEvent::RenameFailed { error },
    };
    UiEvent::Session(event)
}

pub async fn history_load(client: ApiClient, session_id: String) -> UiEvent {
    let event = match client.history(&session_id).await {
        Ok(history) => SessionUiEvent::HistoryLoaded { session_id, history },
        Err(error) => SessionUiEvent::HistoryFailed { session_id, error },
    };
    UiEvent::Session(event)
}

//! Backend-wide effect handlers: status probe and model loading.

use dia_core::api::ApiClient;

use crate::events::{BackendUiEvent, UiEvent};

pub async fn backend_status(client: ApiClient, announce: bool) -> UiEvent {
    let event = match client.status().await {
        Ok(status) => BackendUiEvent::StatusLoaded { status, announce },
        Err(error) => BackendUiEvent::StatusFailed { error, announce },
    };
    UiEvent::Backend(event)
}

pub async fn model_load(client: ApiClient) -> UiEvent {
    let event = match client.load_model().await {
        Ok(message) => BackendUiEvent::ModelLoaded { message },
        Err(error) => BackendUiEvent::ModelLoadFailed { error },
    };
    UiEvent::Backend(event)
}

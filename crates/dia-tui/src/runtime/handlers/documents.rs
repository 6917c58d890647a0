//! Document effect handlers: status probe, upload batches, clearing.

use std::path::PathBuf;

use dia_core::api::ApiClient;
use dia_core::upload::partition_uploads;

use crate::events::{DocumentUiEvent, UiEvent, UploadReport};

pub async fn document_status(client: ApiClient, session_id: String) -> UiEvent {
    let event = match client.document_status(&session_id).await {
        Ok(status) => DocumentUiEvent::StatusLoaded { session_id, status },
        Err(error) => DocumentUiEvent::StatusFailed { session_id, error },
    };
    UiEvent::Document(event)
}

/// Uploads a batch sequentially. Pre-flight filtering happens first so
/// lock files and oversized members never hit the wire, and a failed
/// member never aborts the rest of the batch.
pub async fn upload_batch(client: ApiClient, session_id: String, paths: Vec<PathBuf>) -> UiEvent {
    let plan = partition_uploads(&paths);

    let mut report = UploadReport::default();
    for (path, reason) in plan.skipped {
        report.skipped.push((display_name(&path), reason));
    }
    for path in plan.accepted {
        let name = display_name(&path);
        match client.upload_file(&session_id, &path).await {
            Ok(response) => report.uploaded.push((name, response)),
            Err(error) => report.failed.push((name, error)),
        }
    }

    UiEvent::Document(DocumentUiEvent::UploadFinished { session_id, report })
}

pub async fn clear_documents(client: ApiClient, session_id: String) -> UiEvent {
    let event = match client.clear_documents(&session_id).await {
        Ok(message) => DocumentUiEvent::DocumentsCleared { session_id, message },
        Err(error) => DocumentUiEvent::DocumentsClearFailed { session_id, error },
    };
    UiEvent::Document(event)
}

fn display_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

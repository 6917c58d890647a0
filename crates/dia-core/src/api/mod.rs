//! Typed HTTP client for the analyzer backend.

mod client;
mod error;
mod types;

pub use client::{ApiClient, BASE_URL_ENV, resolve_base_url};
pub use error::{ApiError, ApiErrorKind, ApiResult};
pub use types::*;

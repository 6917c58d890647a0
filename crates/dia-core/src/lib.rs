//! Core library for dia: configuration, logging, and the HTTP client for the
//! Domain Intelligence Analyzer backend.

pub mod api;
pub mod config;
pub mod logging;
pub mod upload;

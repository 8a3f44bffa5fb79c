//! # RAG Server API
//!
//! - [`backend`]: the `RagBackend` trait and `ApiError`
//! - [`client`]: `HttpBackend`, the reqwest implementation
//! - [`types`]: request and response bodies
//! - [`dispatch`]: runs requests on tokio tasks and reports back to the event loop

pub mod backend;
pub mod client;
pub mod dispatch;
pub mod types;

pub use backend::{ApiError, RagBackend};
pub use client::HttpBackend;

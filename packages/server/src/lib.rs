//! HTTP surface for the Form 990 analysis service.
//!
//! Exposes `/api/process-pdf` (multipart PDF upload, returns extracted
//! text), `/api/analyze-990` (extracted text in, structured foundation data
//! out), and `/health`. All `/api` routes sit behind a per-client fixed
//! window rate limit, and both expensive operations are cached by content
//! hash in [`analysis::ResponseCache`].

pub mod config;
pub mod server;

pub use config::Config;
pub use server::{build_app, AppState};

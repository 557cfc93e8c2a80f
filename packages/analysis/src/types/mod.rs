//! Domain types for Form 990 analysis.

pub mod config;
pub mod document;
pub mod foundation;

pub use config::UploadLimits;
pub use document::{DocumentInput, DocumentStatus};
pub use foundation::{ContactInfo, Foundation, Grantee, KeyPerson, Location};

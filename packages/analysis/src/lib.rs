//! Form 990 Analysis Library
//!
//! Turns IRS Form 990 PDFs into structured foundation data: PDF text
//! extraction, LLM-backed structured extraction, grantee merging, and
//! filter facets, plus the response cache and rate limiter the HTTP surface
//! shares.
//!
//! # Usage
//!
//! ```rust,ignore
//! use analysis::{BatchProcessor, DocumentInput, LocalPipeline, OpenAi};
//!
//! let ai = OpenAi::from_env()?.with_model("gpt-4o");
//! let processor = BatchProcessor::new(LocalPipeline::new(ai));
//!
//! let report = processor
//!     .process_all(documents, |update| println!("{:?}", update))
//!     .await?;
//!
//! let grantees = analysis::facets::merge_grantees(report.foundations());
//! let facets = analysis::facets::derive_facets(&grantees);
//! ```
//!
//! # Modules
//!
//! - [`types`] - Domain types (Foundation, Grantee, document status)
//! - [`pdf`] - Stage one: PDF bytes to plain text
//! - [`pipeline`] - Stage two: text to structured data via an LLM
//! - [`batch`] - Sequential orchestration over both stages
//! - [`facets`] - Grantee merging, facet derivation, filtering
//! - [`cache`] - TTL response cache shared by the HTTP routes
//! - [`rate_limit`] - Fixed-window request limiter
//! - [`testing`] - Mocks and sample data for tests and demos

pub mod ai;
pub mod batch;
pub mod cache;
pub mod clock;
pub mod error;
pub mod facets;
pub mod pdf;
pub mod pipeline;
pub mod rate_limit;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use ai::OpenAi;
pub use batch::{
    BatchProcessor, BatchReport, DocumentOutcome, DocumentPipeline, LocalPipeline, ProgressUpdate,
};
pub use cache::{content_key, ResponseCache};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{AnalysisError, Result};
pub use facets::{derive_facets, filter_grantees, merge_grantees, Facets, FilterOptions};
pub use rate_limit::{client_key, Decision, RateLimiter};
pub use traits::Ai;
pub use types::{
    ContactInfo, DocumentInput, DocumentStatus, Foundation, Grantee, KeyPerson, Location,
    UploadLimits,
};

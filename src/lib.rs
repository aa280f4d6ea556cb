// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Pagewave
//!
//! A client-side engine for fetching paginated, rate-limited data from a
//! remote HTTP API with many concurrent requests.
//!
//! ## Features
//!
//! - **Batched Waves**: One call fans out a request per subject under a
//!   bounded concurrency cap and resolves every subject before returning
//! - **Failure Classification**: Each response becomes a success, a
//!   retryable failure (backed off and resubmitted), or a terminal failure
//!   (returned as data, never retried)
//! - **Cursor Pagination**: Per-subject cursor tracking across rounds; a
//!   caller-supplied decision continues or aborts each subject independently
//! - **Aggregation**: Convenience entry points that gather every page, or
//!   stop a subject once a record limit is reached
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pagewave::{EngineConfig, FetchEngine, PageShape, RequestDescriptor, SubjectId};
//!
//! #[tokio::main]
//! async fn main() -> pagewave::Result<()> {
//!     let engine = FetchEngine::new(EngineConfig::default());
//!     let subjects = vec![SubjectId::from("alice"), SubjectId::from(42u64)];
//!
//!     let results = engine
//!         .collect_all(&subjects, PageShape::records("users"), |subject, cursor| {
//!             RequestDescriptor::new(format!(
//!                 "https://api.example.com/followers.json?cursor={cursor}&subject={subject}"
//!             ))
//!             .expect("valid URL")
//!         })
//!         .await;
//!
//!     for (subject, records) in results {
//!         // Each subject resolves to all its records or a terminal error
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       FetchEngine                           │
//! │  execute() → outcomes     paginate(on_page) → per-page      │
//! │  collect_all() / collect_up_to() → records per subject      │
//! └─────────────────────────────────────────────────────────────┘
//!                 │                         │
//! ┌───────────────┴──────────┬──────────────┴─────────────────┐
//! │      BatchExecutor       │        CursorPaginator         │
//! ├──────────────────────────┼────────────────────────────────┤
//! │ Semaphore-bounded wave   │ Active(cursor) / Done per      │
//! │ Classify / retry / back  │ subject, one wave per round,   │
//! │ off, terminal as data    │ continuation decision per page │
//! └──────────────────────────┴────────────────────────────────┘
//!                 │
//!         Transport (reqwest)
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the engine
pub mod error;

/// Common types and type aliases
pub mod types;

/// Outbound request descriptions
pub mod request;

/// Precomputed authentication headers
pub mod auth;

/// Engine configuration
pub mod config;

/// HTTP transport seam
pub mod http;

/// Batched wave execution with retry
pub mod batch;

/// Cursor-driven pagination
pub mod pagination;

/// Convenience aggregation over pagination
pub mod aggregate;

/// High-level engine facade
pub mod engine;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result, TerminalError};
pub use types::*;

// Re-export commonly used types
pub use aggregate::{collect_all, collect_up_to, Collected};
pub use batch::{BatchExecutor, BatchOutcome};
pub use config::EngineConfig;
pub use engine::FetchEngine;
pub use pagination::{CursorPaginator, PageResult, PageShape};
pub use request::RequestDescriptor;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

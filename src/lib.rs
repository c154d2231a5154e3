//! # txn-approvals
//!
//! Client library for browsing and approving financial transactions served
//! by a paginated transactions API.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use txn_approvals::fetch::{CustomFetch, HttpTransport};
//! use txn_approvals::http::{HttpClient, HttpClientConfig};
//! use txn_approvals::pagination::PaginatedAccumulator;
//!
//! #[tokio::main]
//! async fn main() -> txn_approvals::Result<()> {
//!     let config = HttpClientConfig::builder().base_url("http://localhost:3000").build();
//!     let fetcher = Arc::new(CustomFetch::new(HttpTransport::new(HttpClient::with_config(config)?)));
//!
//!     let transactions = PaginatedAccumulator::transactions(Arc::clone(&fetcher));
//!     transactions.fetch_all().await?; // page 0
//!     transactions.fetch_all().await?; // page 1, appended
//!
//!     transactions.invalidate_data();  // back to no state
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────┐   ┌──────────────────────────┐
//! │   PaginatedAccumulator   │   │     ApprovalService      │
//! │ fetch_all / invalidate   │   │ set_transaction_approval │
//! └────────────┬─────────────┘   └────────────┬─────────────┘
//!              │ fetch_with_cache             │ fetch_without_cache
//!              │                              │ clear_cache_by_endpoint
//! ┌────────────┴──────────────────────────────┴─────────────┐
//! │                 CustomFetch (cache, loading)            │
//! └────────────────────────────┬────────────────────────────┘
//!                              │ Transport
//! ┌────────────────────────────┴────────────────────────────┐
//! │           HttpTransport → HttpClient (rate limit)       │
//! └─────────────────────────────────────────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the crate
pub mod error;

/// Wire types and endpoint names
pub mod types;

/// HTTP client with rate limiting
pub mod http;

/// Cache-backed fetching
pub mod fetch;

/// Page accumulation
pub mod pagination;

/// Approval decisions
pub mod approval;

/// Client configuration
pub mod config;

/// Command-line interface
pub mod cli;

#[cfg(test)]
mod testing;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use approval::ApprovalService;
pub use fetch::{CustomFetch, HttpTransport, Transport};
pub use pagination::{InFlightPolicy, PaginatedAccumulator, PaginatedTransactions};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! HTTP client module
//!
//! Provides the HTTP client used by the transport layer.
//!
//! # Features
//!
//! - **Base URL resolution**: endpoint names are joined onto a configured base
//! - **Rate Limiting**: Token bucket rate limiter using governor
//! - **Status classification**: non-2xx responses become `Error::HttpStatus`
//!
//! Requests are attempted exactly once. Retrying is left to callers.

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
pub use rate_limit::{RateLimiter, RateLimiterConfig};

//! Caching fetch module
//!
//! Memoized request execution for the transactions API.
//!
//! # Overview
//!
//! - `Transport` - the seam that actually performs a request for an endpoint
//! - `HttpTransport` - `Transport` over the HTTP client
//! - `CustomFetch` - cache keyed by endpoint and serialized params, with
//!   uncached requests, cache clearing and a loading indicator

mod cache;
mod transport;

pub use cache::{cache_key, CustomFetch};
pub use transport::{HttpTransport, Transport};

#[cfg(test)]
mod tests;

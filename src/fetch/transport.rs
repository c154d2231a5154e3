//! Request transports
//!
//! A transport takes an endpoint name and JSON params and returns the raw
//! JSON result. `null` is a legitimate result.

use crate::error::Result;
use crate::http::HttpClient;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Performs a single request against the transactions API
#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute `endpoint` with `params`
    async fn request(&self, endpoint: &str, params: Value) -> Result<Value>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn request(&self, endpoint: &str, params: Value) -> Result<Value> {
        (**self).request(endpoint, params).await
    }
}

/// Transport that POSTs params as a JSON body to `{base_url}/{endpoint}`
#[derive(Debug)]
pub struct HttpTransport {
    client: HttpClient,
}

impl HttpTransport {
    /// Wrap an HTTP client
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// Get the underlying HTTP client
    pub fn client(&self) -> &HttpClient {
        &self.client
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(&self, endpoint: &str, params: Value) -> Result<Value> {
        self.client.post_json(endpoint, params).await
    }
}

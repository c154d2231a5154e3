//! In-process transports for unit tests

use crate::error::{Error, Result};
use crate::fetch::{cache_key, Transport};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use tokio::sync::{mpsc, Semaphore};

/// Answers each (endpoint, params) pair from a fixed table and records calls
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    routes: Mutex<HashMap<String, Value>>,
    failures: Mutex<HashSet<String>>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, endpoint: &str, params: Value, response: Value) {
        let key = cache_key(endpoint, &params);
        self.failures.lock().unwrap().remove(&key);
        self.routes.lock().unwrap().insert(key, response);
    }

    pub fn fail(&self, endpoint: &str, params: Value) {
        self.failures
            .lock()
            .unwrap()
            .insert(cache_key(endpoint, &params));
    }

    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn request(&self, endpoint: &str, params: Value) -> Result<Value> {
        self.calls
            .lock()
            .unwrap()
            .push((endpoint.to_string(), params.clone()));

        let key = cache_key(endpoint, &params);
        if self.failures.lock().unwrap().contains(&key) {
            return Err(Error::http_status(500, "scripted failure"));
        }

        self.routes
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .ok_or_else(|| Error::http_status(404, key))
    }
}

/// Holds every request until the test releases it
///
/// Each request announces its params on the `started` channel, then waits
/// for a permit. Released requests answer from `responses` in release order.
#[derive(Debug)]
pub struct GatedTransport {
    started: mpsc::UnboundedSender<Value>,
    release: Semaphore,
    responses: Mutex<VecDeque<Value>>,
}

impl GatedTransport {
    pub fn new(responses: Vec<Value>) -> (Self, mpsc::UnboundedReceiver<Value>) {
        let (started, rx) = mpsc::unbounded_channel();
        let transport = Self {
            started,
            release: Semaphore::new(0),
            responses: Mutex::new(responses.into()),
        };
        (transport, rx)
    }

    pub fn release(&self, n: usize) {
        self.release.add_permits(n);
    }
}

#[async_trait]
impl Transport for GatedTransport {
    async fn request(&self, _endpoint: &str, params: Value) -> Result<Value> {
        let _ = self.started.send(params);
        let permit = self
            .release
            .acquire()
            .await
            .map_err(|e| Error::Other(e.to_string()))?;
        permit.forget();

        Ok(self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Value::Null))
    }
}

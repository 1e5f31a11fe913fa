#![allow(dead_code)]
use anyhow::{Result, anyhow};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use sheetcall::api::{ApiClient, ApiClientFactory, InvokeError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub service: String,
    pub region: String,
    pub method: String,
    pub body: Value,
}

#[derive(Default)]
struct Shared {
    /// Canned responses keyed by snake_case method name.
    responses: HashMap<String, Value>,
    calls: Vec<RecordedCall>,
    clients_built: usize,
}

/// In-memory [`ApiClientFactory`] with canned responses and call recording.
#[derive(Clone, Default)]
pub struct MockFactory {
    shared: Arc<Mutex<Shared>>,
    reject_services: Vec<String>,
}

impl MockFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, method: &str, response: Value) -> Self {
        self.shared
            .lock()
            .unwrap()
            .responses
            .insert(method.to_string(), response);
        self
    }

    /// Make `client()` fail for the given service name.
    pub fn rejecting(mut self, service: &str) -> Self {
        self.reject_services.push(service.to_string());
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.shared.lock().unwrap().calls.clone()
    }

    pub fn clients_built(&self) -> usize {
        self.shared.lock().unwrap().clients_built
    }
}

impl ApiClientFactory for MockFactory {
    fn client(&self, service: &str, region: &str) -> Result<Arc<dyn ApiClient>> {
        if self.reject_services.iter().any(|s| s == service) {
            return Err(anyhow!("unknown service: {service}"));
        }
        self.shared.lock().unwrap().clients_built += 1;
        Ok(Arc::new(MockClient {
            service: service.to_string(),
            region: region.to_string(),
            shared: self.shared.clone(),
        }))
    }

    fn verify_identity(&self) -> Result<Value> {
        Ok(serde_json::json!({"Account": "000000000000"}))
    }
}

struct MockClient {
    service: String,
    region: String,
    shared: Arc<Mutex<Shared>>,
}

impl ApiClient for MockClient {
    fn invoke(&self, method: &str, request: &Map<String, Value>) -> Result<Value, InvokeError> {
        let mut shared = self.shared.lock().unwrap();
        shared.calls.push(RecordedCall {
            service: self.service.clone(),
            region: self.region.clone(),
            method: method.to_string(),
            body: Value::Object(request.clone()),
        });
        shared
            .responses
            .get(method)
            .cloned()
            .ok_or(InvokeError::UnknownAction)
    }
}

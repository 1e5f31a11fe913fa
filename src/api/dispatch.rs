//! Request dispatch with per-(service, region) client caching.

use super::{ApiClient, ApiClientFactory, InvokeError, action};
use crate::errors::EngineError;
use serde::de::Error as _;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// A fully resolved call: four operand cells plus the argument-substituted
/// request body.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub service: String,
    pub region: String,
    pub action: String,
    pub body: String,
}

pub struct Dispatcher {
    factory: Box<dyn ApiClientFactory>,
    clients: HashMap<(String, String), Arc<dyn ApiClient>>,
}

impl Dispatcher {
    pub fn new(factory: Box<dyn ApiClientFactory>) -> Self {
        Self {
            factory,
            clients: HashMap::new(),
        }
    }

    pub fn cached_clients(&self) -> usize {
        self.clients.len()
    }

    /// Resolve and invoke one call. The safety filter runs before anything
    /// else so a blocked action can neither construct nor cache a client.
    pub fn invoke(&mut self, request: &RequestDescriptor) -> Result<Value, EngineError> {
        let RequestDescriptor {
            service,
            region,
            action,
            body,
        } = request;

        if !action::is_safe_action(action) {
            return Err(EngineError::UnsafeAction {
                service: service.clone(),
                action: action.clone(),
            });
        }

        let client = self.client(service, region)?;

        let parsed: Value = serde_json::from_str(body).map_err(|source| {
            EngineError::InvalidRequestBody {
                service: service.clone(),
                action: action.clone(),
                body: body.clone(),
                source,
            }
        })?;
        let Value::Object(arguments) = parsed else {
            return Err(EngineError::InvalidRequestBody {
                service: service.clone(),
                action: action.clone(),
                body: body.clone(),
                source: serde_json::Error::custom("request body must be a JSON object"),
            });
        };

        let method = action::to_snake(action);
        tracing::info!(%service, %region, %action, %method, body = %body, "invoking API");
        let response = client
            .invoke(&method, &arguments)
            .map_err(|error| match error {
                InvokeError::UnknownAction => EngineError::UnknownAction {
                    service: service.clone(),
                    action: action.clone(),
                },
                InvokeError::Rejected(source) => EngineError::RequestRejected {
                    service: service.clone(),
                    region: region.clone(),
                    action: action.clone(),
                    source,
                },
            })?;
        tracing::info!(
            %service,
            %action,
            response = %serde_json::to_string(&response).unwrap_or_default(),
            "API response"
        );
        Ok(response)
    }

    fn client(&mut self, service: &str, region: &str) -> Result<Arc<dyn ApiClient>, EngineError> {
        let key = (service.to_string(), region.to_string());
        if let Some(client) = self.clients.get(&key) {
            return Ok(client.clone());
        }
        let client = self.factory.client(service, region).map_err(|source| {
            EngineError::InvalidServiceOrRegion {
                service: service.to_string(),
                region: region.to_string(),
                source,
            }
        })?;
        self.clients.insert(key, client.clone());
        Ok(client)
    }
}

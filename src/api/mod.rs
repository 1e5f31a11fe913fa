//! Client seam for the cloud API.
//!
//! The engine never talks to a network itself: it asks an
//! [`ApiClientFactory`] for a per-(service, region) [`ApiClient`] and invokes
//! snake_case methods on it. The production factory shells out to the AWS
//! CLI; tests plug in a canned-response factory.

pub mod action;
pub mod aws_cli;
pub mod dispatch;

use anyhow::Result;
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;

/// How a client invocation failed, so the dispatcher can classify it into
/// the engine taxonomy.
#[derive(Debug, Error)]
pub enum InvokeError {
    #[error("no such method")]
    UnknownAction,
    #[error(transparent)]
    Rejected(#[from] anyhow::Error),
}

/// One callable per action, keyed by the snake_case method name, taking the
/// parsed request body as keyword-style arguments.
pub trait ApiClient {
    fn invoke(&self, method: &str, request: &Map<String, Value>) -> Result<Value, InvokeError>;
}

pub trait ApiClientFactory {
    /// Construct a client for `(service, region)`. Called once per pair per
    /// run; the dispatcher caches the result.
    fn client(&self, service: &str, region: &str) -> Result<Arc<dyn ApiClient>>;

    /// Resolve the identity behind the configured credentials. Run once at
    /// startup, before any workbook is touched.
    fn verify_identity(&self) -> Result<Value>;
}

//! Default [`ApiClientFactory`] backed by the AWS CLI.
//!
//! Each invocation runs `aws <service> <operation> --cli-input-json ...` and
//! parses the JSON it prints. Credentials and signing stay entirely inside
//! the external tool; this crate only assembles arguments and classifies
//! failures.

use super::{ApiClient, ApiClientFactory, InvokeError};
use anyhow::{Context, Result, anyhow, bail};
use serde_json::{Map, Value};
use std::process::Command;
use std::sync::Arc;

pub struct AwsCliFactory {
    profile: String,
}

impl AwsCliFactory {
    pub fn new(profile: impl Into<String>) -> Self {
        Self {
            profile: profile.into(),
        }
    }
}

impl ApiClientFactory for AwsCliFactory {
    fn client(&self, service: &str, region: &str) -> Result<Arc<dyn ApiClient>> {
        if service.is_empty() || service.chars().any(|c| c.is_whitespace()) {
            bail!("service identifier '{service}' is not a valid CLI command name");
        }
        if region.is_empty() || region.chars().any(|c| c.is_whitespace()) {
            bail!("region identifier '{region}' is not valid");
        }
        Ok(Arc::new(AwsCliClient {
            service: service.to_string(),
            region: region.to_string(),
            profile: self.profile.clone(),
        }))
    }

    fn verify_identity(&self) -> Result<Value> {
        let output = Command::new("aws")
            .args(["sts", "get-caller-identity", "--output", "json"])
            .args(["--profile", &self.profile])
            .output()
            .context("failed to run the aws CLI; is it installed and on PATH?")?;
        if !output.status.success() {
            bail!(
                "could not resolve caller identity for profile '{}': {}",
                self.profile,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        serde_json::from_slice(&output.stdout).context("caller identity was not valid JSON")
    }
}

struct AwsCliClient {
    service: String,
    region: String,
    profile: String,
}

impl ApiClient for AwsCliClient {
    fn invoke(&self, method: &str, request: &Map<String, Value>) -> Result<Value, InvokeError> {
        let operation = method.replace('_', "-");

        let mut command = Command::new("aws");
        command
            .arg(&self.service)
            .arg(&operation)
            .args(["--output", "json"])
            .args(["--region", &self.region])
            .args(["--profile", &self.profile]);
        if !request.is_empty() {
            let body = serde_json::to_string(&Value::Object(request.clone()))
                .map_err(|e| InvokeError::Rejected(anyhow!(e)))?;
            command.args(["--cli-input-json", &body]);
        }

        let output = command
            .output()
            .map_err(|e| InvokeError::Rejected(anyhow!("failed to spawn the aws CLI: {e}")))?;

        if output.status.success() {
            if output.stdout.iter().all(u8::is_ascii_whitespace) {
                return Ok(Value::Null);
            }
            return serde_json::from_slice(&output.stdout)
                .map_err(|e| InvokeError::Rejected(anyhow!("response was not valid JSON: {e}")));
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        // `aws <service> <bad-op>` reports an argument parse failure; map it
        // onto the unknown-action condition instead of a rejected request.
        if stderr.contains("Invalid choice") || stderr.contains("invalid choice") {
            return Err(InvokeError::UnknownAction);
        }
        Err(InvokeError::Rejected(anyhow!(
            "aws {} {} failed: {}",
            self.service,
            operation,
            stderr.trim()
        )))
    }
}

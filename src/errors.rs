use thiserror::Error;

/// Failure taxonomy for one worksheet-processing pass.
///
/// Every variant carries enough identity (sheet, marker, service, action, ...)
/// to be actionable from the log alone; the workbook driver adds the failing
/// worksheet's name on top and aborts the run.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("boundary marker [{marker}] not found in sheet '{sheet}'")]
    BoundaryNotFound { sheet: String, marker: String },

    #[error("symbol [{symbol}] not found in row {row} (scan ended at column {column})")]
    MarkerNotFound {
        symbol: String,
        row: u32,
        column: u32,
    },

    #[error("path is not found: no path segments at {coordinate}")]
    EmptyPath { coordinate: String },

    #[error(
        "placeholder indices must form a dense run starting at %1; \
         '{template}' is missing %{missing_index}"
    )]
    SparsePlaceholders {
        template: String,
        missing_index: usize,
    },

    #[error("placeholder %{index} has no value: cell {coordinate} is empty")]
    PlaceholderUnresolved { index: usize, coordinate: String },

    #[error("service or region is not valid: service='{service}' region='{region}': {source}")]
    InvalidServiceOrRegion {
        service: String,
        region: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("no such action '{action}' on service '{service}'")]
    UnknownAction { service: String, action: String },

    #[error("unsafe action was blocked: '{action}' on service '{service}'")]
    UnsafeAction { service: String, action: String },

    #[error("request body is not valid JSON for {service}.{action}: {body}")]
    InvalidRequestBody {
        service: String,
        action: String,
        body: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("request was not accepted: {service}.{action} in region '{region}'")]
    RequestRejected {
        service: String,
        region: String,
        action: String,
        #[source]
        source: anyhow::Error,
    },
}

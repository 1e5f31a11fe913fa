pub mod errors;
pub mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::{json, Value};
use std::path::PathBuf;
use tracing::info;

use crate::api::ApiClientFactory;
use crate::api::aws_cli::AwsCliFactory;
use crate::api::dispatch::Dispatcher;
use crate::config::RunConfig;
use crate::workbook;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Csv,
}

#[derive(Debug, Parser)]
#[command(
    name = "sheetcall",
    version,
    about = "Run spreadsheet-described read-only cloud queries"
)]
pub struct Cli {
    #[arg(long, value_enum, default_value_t = OutputFormat::Json, global = true)]
    pub format: OutputFormat,

    #[arg(long, global = true)]
    pub compact: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Replicate each targeted sheet's form and execute its directives.
    Run {
        /// Input workbook (.xlsx).
        file: PathBuf,
        /// Credential profile passed to the cloud CLI.
        #[arg(env = "SHEETCALL_PROFILE")]
        profile: Option<String>,
        /// Control sheet naming the target worksheets.
        #[arg(long)]
        control_sheet: Option<String>,
        /// Output workbook; defaults to `<stem>_.xlsx` next to the input.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Check credentials by calling the identity endpoint, touching nothing.
    WhoAmI {
        #[arg(env = "SHEETCALL_PROFILE")]
        profile: Option<String>,
    },
}

pub async fn run_command(command: Commands) -> Result<Value> {
    match command {
        Commands::Run {
            file,
            profile,
            control_sheet,
            output,
        } => run(file, profile, control_sheet, output).await,
        Commands::WhoAmI { profile } => {
            let factory = AwsCliFactory::new(profile.unwrap_or_else(|| "default".to_string()));
            tokio::task::spawn_blocking(move || factory.verify_identity()).await?
        }
    }
}

async fn run(
    file: PathBuf,
    profile: Option<String>,
    control_sheet: Option<String>,
    output: Option<PathBuf>,
) -> Result<Value> {
    let config = RunConfig::from_args(file, output, control_sheet, profile)?;

    let payload = tokio::task::spawn_blocking(move || -> Result<Value> {
        let factory = AwsCliFactory::new(config.profile.clone());
        let identity = factory.verify_identity()?;
        info!(identity = %identity, "caller identity verified");

        let mut dispatcher = Dispatcher::new(Box::new(factory));
        let reports = workbook::process_workbook(
            &config.input,
            &config.output,
            &config.control_sheet,
            &mut dispatcher,
        )?;

        Ok(json!({
            "source": config.input,
            "output": config.output,
            "sheets": serde_json::to_value(&reports)?,
        }))
    })
    .await??;

    Ok(payload)
}

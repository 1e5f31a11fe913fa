//! Run configuration derived from CLI arguments.

use anyhow::{bail, Result};
use std::path::{Path, PathBuf};

use crate::workbook::DEFAULT_CONTROL_SHEET;

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub control_sheet: String,
    pub profile: String,
}

impl RunConfig {
    /// Validate the input path and fill in defaults: the output file sits
    /// next to the input as `<stem>_.xlsx`, the profile falls back to
    /// `default`.
    pub fn from_args(
        input: PathBuf,
        output: Option<PathBuf>,
        control_sheet: Option<String>,
        profile: Option<String>,
    ) -> Result<Self> {
        if !has_xlsx_extension(&input) {
            bail!(
                "specified file's extension is not xlsx: {}",
                input.display()
            );
        }
        let output = output.unwrap_or_else(|| default_output(&input));
        Ok(Self {
            input,
            output,
            control_sheet: control_sheet.unwrap_or_else(|| DEFAULT_CONTROL_SHEET.to_string()),
            profile: profile.unwrap_or_else(|| "default".to_string()),
        })
    }
}

fn has_xlsx_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xlsx"))
}

fn default_output(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    input.with_file_name(format!("{stem}_.xlsx"))
}

//! Export command handler.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use paperline_core::config::Config;
use paperline_core::export::{self, ExportFormat};

use crate::cli::DataArgs;

pub async fn run(
    config: &Config,
    data: &DataArgs,
    format: ExportFormat,
    output: Option<PathBuf>,
) -> Result<()> {
    let doc = data
        .fetcher(config)
        .load(data.refresh)
        .await
        .context("load résumé data")?;

    let path = output.unwrap_or_else(|| {
        let today = chrono::Local::now().date_naive();
        PathBuf::from(export::file_name(&doc, format, today))
    });
    fs::write(&path, export::export(&doc, format))
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("Exported résumé to {}", path.display());
    Ok(())
}

//! Command line argument definitions

use crate::config::ConversionConfig;
use crate::error::Result;
use crate::models::ExportFormat;

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "wdf-converter")]
#[command(about = "Convert WDF files to per-spectrum TXT files or single CSV files")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// Directory containing WDF files
    #[arg(value_name = "IMPORT_DIR")]
    pub import_dir: PathBuf,

    /// Directory to write outputs into
    #[arg(value_name = "EXPORT_DIR")]
    pub export_dir: PathBuf,

    /// Export format: txt (default) or csv
    #[arg(short, long, default_value = "txt")]
    pub format: String,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Mirror import directory structure into export directory
    #[arg(short, long)]
    pub mirror: bool,

    /// Search for .wdf files recursively
    #[arg(short, long)]
    pub recursive: bool,
}

impl Args {
    /// Log level selected by the verbosity flag
    pub fn get_log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Build the batch configuration, validating the requested format
    pub fn to_config(&self) -> Result<ConversionConfig> {
        let format: ExportFormat = self.format.parse()?;
        Ok(ConversionConfig::new(&self.import_dir, &self.export_dir)
            .with_format(format)
            .with_mirror(self.mirror)
            .with_recursive(self.recursive)
            .with_verbose(self.verbose)
            .with_progress(true))
    }
}

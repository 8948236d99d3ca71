//! Configuration for a batch conversion run.
//!
//! Collects the import/export roots, the output format and the behaviour
//! toggles exposed on the command line.

use crate::constants::WDF_EXTENSION;
use crate::models::ExportFormat;
use std::path::PathBuf;

/// Settings for one batch conversion
#[derive(Debug, Clone)]
pub struct ConversionConfig {
    /// Directory searched for measurement files
    pub import_dir: PathBuf,

    /// Directory receiving the converted output
    pub export_dir: PathBuf,

    /// Output format for every converted file
    pub format: ExportFormat,

    /// Reproduce the import directory tree under the export directory
    pub mirror: bool,

    /// Search subdirectories of the import directory
    pub recursive: bool,

    /// Log each file and list failures in the final report
    pub verbose: bool,

    /// Case-sensitive file name suffix selecting input files
    pub extension: String,

    /// Draw a progress bar while converting
    pub show_progress: bool,
}

impl ConversionConfig {
    /// Configuration with defaults: TXT output, flat, non-recursive, no progress bar
    pub fn new(import_dir: impl Into<PathBuf>, export_dir: impl Into<PathBuf>) -> Self {
        Self {
            import_dir: import_dir.into(),
            export_dir: export_dir.into(),
            format: ExportFormat::default(),
            mirror: false,
            recursive: false,
            verbose: false,
            extension: WDF_EXTENSION.to_string(),
            show_progress: false,
        }
    }

    /// Select the output format
    pub fn with_format(mut self, format: ExportFormat) -> Self {
        self.format = format;
        self
    }

    /// Enable directory mirroring
    pub fn with_mirror(mut self, mirror: bool) -> Self {
        self.mirror = mirror;
        self
    }

    /// Enable recursive discovery
    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Enable verbose reporting
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Match a different file suffix (including the leading dot)
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Show or hide the progress bar
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }
}

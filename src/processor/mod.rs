//! Batch conversion engine.
//!
//! Orchestrates the conversion of every discovered measurement file using
//! the discovery, mirroring, extraction and export modules. Files are
//! converted one at a time in discovery order; per-file failures are
//! grouped by message and never stop the batch.

pub mod discovery;
pub mod extractor;
pub mod mirror;
pub mod writer;

#[cfg(test)]
pub mod tests;

use self::discovery::PathCatalog;
use self::extractor::RecordExtractor;
use self::mirror::mirror_directory_tree;
use self::writer::{SpectrumExporter, exporter_for};

use crate::config::ConversionConfig;
use crate::constants::{PROGRESS_CHARS, PROGRESS_TEMPLATE};
use crate::decoder::{SpectrumDecoder, WdfReader};
use crate::error::{ConverterError, Result};
use crate::models::{
    BatchReport, ConversionOutcome, ExportFormat, FailureReport, InputFile, OutputLocation,
};

use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// Category recorded when a text export produced no spectra
pub const NO_SPECTRA_WRITTEN: &str = "No spectra written";

/// Batch converter for a directory of measurement files
pub struct BatchConverter<D = WdfReader> {
    config: ConversionConfig,
    extractor: RecordExtractor<D>,
    exporter: Box<dyn SpectrumExporter>,
}

impl BatchConverter<WdfReader> {
    /// Create a converter that decodes files with the WDF reader
    pub fn new(config: ConversionConfig) -> Self {
        Self::with_decoder(config, WdfReader::new())
    }
}

impl<D: SpectrumDecoder> BatchConverter<D> {
    /// Create a converter backed by a custom decoder
    pub fn with_decoder(config: ConversionConfig, decoder: D) -> Self {
        let exporter = exporter_for(config.format);
        Self {
            config,
            extractor: RecordExtractor::new(decoder),
            exporter,
        }
    }

    /// Main conversion entry point
    ///
    /// Fails before converting anything when the import directory is
    /// missing, holds no matching files, or the export directory cannot be
    /// created. Everything after that is recorded per file.
    pub fn run(&self) -> Result<BatchReport> {
        let import_root = absolute(&self.config.import_dir);
        let export_root = absolute(&self.config.export_dir);

        if !import_root.is_dir() {
            return Err(ConverterError::ImportDirNotFound { path: import_root });
        }

        // Step 1: Discover input files
        let files = PathCatalog::new(
            &import_root,
            &self.config.extension,
            self.config.recursive,
        )
        .discover();

        if files.is_empty() {
            return Err(ConverterError::NoMatchingFiles {
                path: import_root,
                extension: self.config.extension.clone(),
            });
        }

        // Step 2: Prepare the export directory
        fs::create_dir_all(&export_root).map_err(|source| ConverterError::OutputSetup {
            path: export_root.clone(),
            source,
        })?;

        if self.config.mirror {
            mirror_directory_tree(&import_root, &export_root);
        }

        info!(
            "Converting {} files from {} to {} as {}",
            files.len(),
            import_root.display(),
            export_root.display(),
            self.config.format
        );

        // Step 3: Convert files one by one
        let progress_bar = self.progress_bar(files.len());
        let total = files.len();
        let mut succeeded = 0;
        let mut failures = FailureReport::new();

        for (index, path) in files.into_iter().enumerate() {
            let input = InputFile::new(path, &import_root);
            progress_bar.set_message(input.file_name.clone());
            debug!(
                "Converting [{}/{}]: {} as {}",
                index + 1,
                total,
                input.file_name,
                self.config.format
            );

            match self.convert_file(&input, &export_root) {
                ConversionOutcome::Converted { written } => {
                    debug!("Converted {} ({} written)", input.file_name, written);
                    succeeded += 1;
                }
                ConversionOutcome::Failed {
                    category,
                    file_name,
                } => {
                    if self.config.verbose {
                        error!("{}: {}", file_name, category);
                    }
                    failures.record(category, file_name);
                }
            }
            progress_bar.inc(1);
        }

        progress_bar.finish_and_clear();

        let report = BatchReport {
            succeeded,
            total,
            format: self.config.format,
            failures,
        };
        debug!("{}", report.summary_line());
        Ok(report)
    }

    /// Convert a single input file, turning every failure into a category
    pub fn convert_file(&self, input: &InputFile, export_root: &Path) -> ConversionOutcome {
        let format = self.config.format;
        let location = OutputLocation::resolve(input, export_root, self.config.mirror, format);
        let fail = |category: String| ConversionOutcome::Failed {
            category,
            file_name: input.file_name.clone(),
        };

        if let Err(e) = fs::create_dir_all(location.container()) {
            return fail(match format {
                ExportFormat::Txt => format!("OS error creating output dir: {}", e),
                ExportFormat::Csv => format!("OS error creating CSV output dir: {}", e),
            });
        }

        let records = match self.extractor.extract(&input.path) {
            Ok(records) => records,
            Err(e) => return fail(format!("Failed to open: {}", e)),
        };

        match self.exporter.export(&records, &location.path) {
            Ok(0) if format == ExportFormat::Txt => fail(NO_SPECTRA_WRITTEN.to_string()),
            Ok(written) => ConversionOutcome::Converted { written },
            Err(e) => fail(format!("Failed to write {}: {}", format.label(), e)),
        }
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.config.show_progress {
            return ProgressBar::hidden();
        }

        let progress_bar = ProgressBar::new(len as u64);
        match ProgressStyle::default_bar().template(PROGRESS_TEMPLATE) {
            Ok(style) => progress_bar.set_style(style.progress_chars(PROGRESS_CHARS)),
            Err(e) => debug!("Falling back to default progress style: {}", e),
        }
        progress_bar
    }
}

/// Anchor `path` at the current directory without resolving symlinks
fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

//! Core data structures and types for WDF conversion.
//!
//! Defines the export formats, discovered input files, decoded record sets,
//! per-file outcomes and the grouped failure report of a batch.

use crate::constants::{CSV_EXTENSION, TXT_EXTENSION};
use crate::error::ConverterError;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Output formats supported by the converter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExportFormat {
    /// One tab-separated two-column file per spectrum
    #[default]
    Txt,
    /// One table per input file, spectra as rows and axis values as columns
    Csv,
}

impl ExportFormat {
    /// File extension used for output produced in this format
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Txt => TXT_EXTENSION,
            ExportFormat::Csv => CSV_EXTENSION,
        }
    }

    /// Upper-case label used in reports and failure categories
    pub fn label(&self) -> &'static str {
        match self {
            ExportFormat::Txt => "TXT",
            ExportFormat::Csv => "CSV",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ConverterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "txt" => Ok(ExportFormat::Txt),
            "csv" => Ok(ExportFormat::Csv),
            _ => Err(ConverterError::UnknownFormat {
                format: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A measurement file found during discovery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    pub path: PathBuf,
    /// Directory of the file relative to the import root (empty at the root)
    pub relative_dir: PathBuf,
    pub file_name: String,
    pub stem: String,
}

impl InputFile {
    /// Describe `path` relative to the batch's `import_root`
    pub fn new(path: PathBuf, import_root: &Path) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let relative_dir = path
            .parent()
            .and_then(|parent| parent.strip_prefix(import_root).ok())
            .map(Path::to_path_buf)
            .unwrap_or_default();

        Self {
            path,
            relative_dir,
            file_name,
            stem,
        }
    }
}

/// Resolved destination of one input file's export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLocation {
    /// Per-spectrum directory (TXT) or table file path (CSV)
    pub path: PathBuf,
    pub format: ExportFormat,
}

impl OutputLocation {
    /// Compute where `input` is exported under `export_root`.
    ///
    /// With `mirror` the input's relative directory is kept, otherwise the
    /// output is flattened directly under the export root.
    pub fn resolve(input: &InputFile, export_root: &Path, mirror: bool, format: ExportFormat) -> Self {
        let base = if mirror {
            export_root.join(&input.relative_dir)
        } else {
            export_root.to_path_buf()
        };

        let path = match format {
            ExportFormat::Txt => base.join(&input.stem),
            ExportFormat::Csv => base.join(format!("{}.{}", input.stem, format.extension())),
        };

        Self { path, format }
    }

    /// Directory that must exist before exporting
    pub fn container(&self) -> &Path {
        match self.format {
            ExportFormat::Txt => &self.path,
            ExportFormat::Csv => self.path.parent().unwrap_or_else(|| Path::new("")),
        }
    }
}

/// Row-major matrix of spectra (records × points per record)
#[derive(Debug, Clone, PartialEq)]
pub struct RecordMatrix {
    rows: usize,
    cols: usize,
    values: Vec<f32>,
}

impl RecordMatrix {
    /// Lay out `values` as `rows × cols`, handing the buffer back if the
    /// sizes disagree
    pub fn from_flat(values: Vec<f32>, rows: usize, cols: usize) -> Result<Self, Vec<f32>> {
        if rows.checked_mul(cols) != Some(values.len()) {
            return Err(values);
        }
        Ok(Self { rows, cols, values })
    }

    /// Spread `values` over `max(1, rows)` rows of equal width, dropping
    /// any trailing remainder
    pub fn fit_rows(mut values: Vec<f32>, rows: usize) -> Self {
        let rows = rows.max(1);
        let cols = values.len() / rows;
        values.truncate(rows * cols);
        Self { rows, cols, values }
    }

    /// Build a matrix from equally long rows
    #[cfg(test)]
    pub(crate) fn from_rows(rows: Vec<Vec<f32>>) -> Option<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != cols) {
            return None;
        }
        let count = rows.len();
        Some(Self {
            rows: count,
            cols,
            values: rows.into_iter().flatten().collect(),
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Intensities of one record
    pub fn row(&self, index: usize) -> &[f32] {
        &self.values[index * self.cols..(index + 1) * self.cols]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[f32]> + '_ {
        (0..self.rows).map(move |index| self.row(index))
    }
}

/// Decoded content of one measurement file
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralRecordSet {
    /// Spectral axis shared by every record
    pub axis: Vec<f32>,
    pub records: RecordMatrix,
}

impl SpectralRecordSet {
    pub fn record_count(&self) -> usize {
        self.records.rows()
    }

    pub fn points_per_record(&self) -> usize {
        self.records.cols()
    }
}

/// Result of converting a single input file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionOutcome {
    /// Output produced; count is spectra (TXT) or tables (CSV) written
    Converted { written: usize },
    /// Conversion failed with a human readable category
    Failed { category: String, file_name: String },
}

/// Files that failed with the same category text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureGroup {
    pub category: String,
    pub files: Vec<String>,
}

/// Failures of a batch grouped by exact category text.
///
/// Categories keep first-seen order and files keep insertion order, so
/// reports are reproducible for a given discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FailureReport {
    groups: Vec<FailureGroup>,
}

impl FailureReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `file_name` under `category`
    pub fn record(&mut self, category: impl Into<String>, file_name: impl Into<String>) {
        let category = category.into();
        match self.groups.iter_mut().find(|g| g.category == category) {
            Some(group) => group.files.push(file_name.into()),
            None => self.groups.push(FailureGroup {
                category,
                files: vec![file_name.into()],
            }),
        }
    }

    pub fn groups(&self) -> &[FailureGroup] {
        &self.groups
    }

    /// Files recorded under `category`, if any
    pub fn files_for(&self, category: &str) -> Option<&[String]> {
        self.groups
            .iter()
            .find(|g| g.category == category)
            .map(|g| g.files.as_slice())
    }

    /// Total number of recorded failures across all categories
    pub fn total(&self) -> usize {
        self.groups.iter().map(|g| g.files.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Failed basenames without duplicates, in first-seen order
    pub fn failed_files(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for file in self.groups.iter().flat_map(|g| g.files.iter()) {
            if !seen.contains(&file.as_str()) {
                seen.push(file.as_str());
            }
        }
        seen
    }
}

/// Terminal state of a batch conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub succeeded: usize,
    pub total: usize,
    pub format: ExportFormat,
    pub failures: FailureReport,
}

impl BatchReport {
    pub fn failed_count(&self) -> usize {
        self.failures.total()
    }

    /// One-line outcome summary
    pub fn summary_line(&self) -> String {
        format!(
            "Completed: {} succeeded, {} failed (out of {})",
            self.succeeded,
            self.failed_count(),
            self.total
        )
    }
}

//! Error handling for WDF batch conversion.
//!
//! Batch-fatal conditions live in [`ConverterError`]. Per-file problems
//! never abort a batch; they are carried as [`DecodeError`] and
//! [`ExportError`] and reported as failure categories.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors that stop a batch before (or instead of) per-file work.
#[derive(Error, Debug)]
pub enum ConverterError {
    #[error("Import directory does not exist: {}", .path.display())]
    ImportDirNotFound { path: PathBuf },

    #[error("No {extension} files found in {}", .path.display())]
    NoMatchingFiles { path: PathBuf, extension: String },

    #[error("Failed to create export directory {}: {source}", .path.display())]
    OutputSetup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown export format: {format} (expected txt or csv)")]
    UnknownFormat { format: String },
}

impl ConverterError {
    /// Process exit code the command line maps this error to.
    pub fn exit_code(&self) -> i32 {
        match self {
            ConverterError::ImportDirNotFound { .. } | ConverterError::NoMatchingFiles { .. } => 2,
            ConverterError::OutputSetup { .. } => 3,
            ConverterError::UnknownFormat { .. } => 4,
        }
    }
}

/// Failures raised while decoding a single measurement file.
///
/// Messages deliberately omit the file path so identical failures across
/// files share a category string.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("not a WDF file (header block '{found}')")]
    InvalidHeader { found: String },

    #[error("missing {0} block")]
    MissingBlock(&'static str),

    #[error("{block} block truncated: needed {needed} bytes, found {available}")]
    Truncated {
        block: &'static str,
        needed: usize,
        available: usize,
    },
}

/// Failures raised while writing one file's exported output.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("{source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Table(#[from] polars::error::PolarsError),
}

pub type Result<T> = std::result::Result<T, ConverterError>;

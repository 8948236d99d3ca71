//! WDF Converter Library
//!
//! Batch-converts Renishaw WiRE (`.wdf`) spectroscopy measurement files into
//! analysis-friendly tables.
//!
//! This library provides tools for:
//! - Discovering measurement files in a directory tree, flat or recursive
//! - Mirroring the import directory structure under the export root
//! - Decoding WDF files and normalizing their spectra into a record matrix
//! - Writing per-spectrum TXT files or one aggregated CSV table per file
//! - Grouping per-file failures by message for the final report

pub mod cli;
pub mod config;
pub mod constants;
pub mod decoder;
pub mod error;
pub mod models;
pub mod processor;

// Re-export commonly used types
pub use config::ConversionConfig;
pub use decoder::{DecodedSpectra, RawSamples, SpectrumDecoder, WdfReader};
pub use error::{ConverterError, DecodeError, ExportError, Result};
pub use models::{BatchReport, ConversionOutcome, ExportFormat, FailureReport, SpectralRecordSet};
pub use processor::BatchConverter;

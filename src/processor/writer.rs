//! Export writers for converted spectra
//!
//! Two exporters share the [`SpectrumExporter`] contract:
//! - [`TextExporter`] writes one tab-separated `axis intensity` file per
//!   spectrum into a per-input directory
//! - [`CsvExporter`] writes one table per input file with the axis values as
//!   header and one row per spectrum

use crate::constants::{CSV_DELIMITER, TXT_DECIMALS, TXT_DELIMITER, TXT_EXTENSION};
use crate::error::ExportError;
use crate::models::{ExportFormat, SpectralRecordSet};

use polars::prelude::{Column, CsvWriter, DataFrame, SerWriter};
use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Writes the spectra of one input file to `destination`
pub trait SpectrumExporter {
    /// Returns the number of output units written: spectra for per-record
    /// text, tables for the aggregate format
    fn export(&self, records: &SpectralRecordSet, destination: &Path) -> Result<usize, ExportError>;
}

/// Exporter matching the requested output format
pub fn exporter_for(format: ExportFormat) -> Box<dyn SpectrumExporter> {
    match format {
        ExportFormat::Txt => Box::new(TextExporter),
        ExportFormat::Csv => Box::new(CsvExporter),
    }
}

/// Number of points that have both an axis value and an intensity.
///
/// The extractor warns about length disagreements; exporters write the
/// shared prefix.
fn shared_width(records: &SpectralRecordSet) -> usize {
    let width = records.axis.len().min(records.points_per_record());
    if width != records.axis.len() || width != records.points_per_record() {
        debug!(
            "Trimming export to {} points (axis {}, spectra {})",
            width,
            records.axis.len(),
            records.points_per_record()
        );
    }
    width
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> ExportError + '_ {
    move |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Fixed-point sample with the lowercase `nan` spelling of C's `%f`
struct Sample(f32);

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_nan() {
            f.write_str("nan")
        } else {
            write!(f, "{:.prec$}", self.0, prec = TXT_DECIMALS)
        }
    }
}

/// One `<index>.txt` file per spectrum, no header, fixed six decimals
#[derive(Debug, Default, Clone, Copy)]
pub struct TextExporter;

impl TextExporter {
    fn write_record(path: &Path, axis: &[f32], intensities: &[f32]) -> Result<(), ExportError> {
        let file = File::create(path).map_err(io_error(path))?;
        let mut writer = BufWriter::new(file);

        for (x, y) in axis.iter().zip(intensities) {
            writeln!(writer, "{}{TXT_DELIMITER}{}", Sample(*x), Sample(*y)).map_err(io_error(path))?;
        }

        writer.flush().map_err(io_error(path))
    }
}

impl SpectrumExporter for TextExporter {
    fn export(&self, records: &SpectralRecordSet, output_dir: &Path) -> Result<usize, ExportError> {
        let width = shared_width(records);
        fs::create_dir_all(output_dir).map_err(io_error(output_dir))?;

        for (index, intensities) in records.records.iter_rows().enumerate() {
            let path = output_dir.join(format!("{index}.{TXT_EXTENSION}"));
            Self::write_record(&path, &records.axis[..width], &intensities[..width])?;
        }

        debug!(
            "Wrote {} spectra to {}",
            records.record_count(),
            output_dir.display()
        );
        Ok(records.record_count())
    }
}

/// One table per input file: axis values as column labels, spectra as rows
#[derive(Debug, Default, Clone, Copy)]
pub struct CsvExporter;

impl CsvExporter {
    /// Columns are named by position; axis values may repeat
    fn build_frame(records: &SpectralRecordSet, width: usize) -> Result<DataFrame, ExportError> {
        let columns: Vec<Column> = (0..width)
            .map(|point| {
                let values: Vec<f32> = records.records.iter_rows().map(|row| row[point]).collect();
                Column::new(format!("p{point}").into(), values)
            })
            .collect();

        Ok(DataFrame::new(columns)?)
    }

    fn header_line(axis: &[f32]) -> String {
        axis.iter()
            .map(|label| label.to_string())
            .collect::<Vec<_>>()
            .join(CSV_DELIMITER.to_string().as_str())
    }
}

impl SpectrumExporter for CsvExporter {
    fn export(&self, records: &SpectralRecordSet, output_path: &Path) -> Result<usize, ExportError> {
        let width = shared_width(records);
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent).map_err(io_error(parent))?;
        }

        let mut frame = Self::build_frame(records, width)?;
        let file = File::create(output_path).map_err(io_error(output_path))?;
        let mut writer = BufWriter::new(file);

        writeln!(writer, "{}", Self::header_line(&records.axis[..width]))
            .map_err(io_error(output_path))?;
        CsvWriter::new(&mut writer)
            .include_header(false)
            .with_separator(CSV_DELIMITER as u8)
            .finish(&mut frame)?;
        writer.flush().map_err(io_error(output_path))?;

        debug!(
            "Wrote {} x {} table to {}",
            frame.height(),
            frame.width(),
            output_path.display()
        );
        Ok(1)
    }
}

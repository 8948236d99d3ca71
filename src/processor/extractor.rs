//! Record extraction with shape normalization
//!
//! Turns the decoder's raw sample buffer into a `records × points` matrix.
//! Decoders sometimes declare dimensions that disagree with the stored
//! buffer, so the layout is chosen by a fixed fallback order:
//!
//! 1. the declared `record_count × points_per_record`,
//! 2. the decoder's own rank-2 layout,
//! 3. `max(1, record_count)` rows of `len / max(1, record_count)` points,
//!    dropping any remainder.
//!
//! Only a failure to open or decode the file is an error.

use crate::decoder::{DecodedSpectra, RawSamples, SpectrumDecoder};
use crate::error::DecodeError;
use crate::models::{RecordMatrix, SpectralRecordSet};

use std::path::Path;
use tracing::warn;

/// Opens files through a decoder and normalizes their record layout
#[derive(Debug, Clone)]
pub struct RecordExtractor<D> {
    decoder: D,
}

impl<D: SpectrumDecoder> RecordExtractor<D> {
    pub fn new(decoder: D) -> Self {
        Self { decoder }
    }

    /// Decode `path` and lay its spectra out as a matrix
    pub fn extract(&self, path: &Path) -> Result<SpectralRecordSet, DecodeError> {
        let decoded = self.decoder.open(path)?;
        let name = path.file_name().unwrap_or_default().to_string_lossy();
        Ok(normalize(decoded, &name))
    }
}

/// Apply the fallback layout policy to decoded spectra
pub fn normalize(decoded: DecodedSpectra, source: &str) -> SpectralRecordSet {
    let DecodedSpectra {
        axis,
        samples,
        record_count,
        points_per_record,
    } = decoded;

    let records = reshape(samples, record_count, points_per_record, source);

    if records.cols() != axis.len() {
        warn!(
            "{}: axis has {} points but spectra have {}",
            source,
            axis.len(),
            records.cols()
        );
    }

    SpectralRecordSet { axis, records }
}

fn reshape(samples: RawSamples, record_count: usize, points: usize, source: &str) -> RecordMatrix {
    let RawSamples { values, shape } = samples;
    let total = values.len();

    let mut values = match RecordMatrix::from_flat(values, record_count, points) {
        Ok(matrix) => return matrix,
        Err(values) => values,
    };

    if let [rows, cols] = shape[..] {
        match RecordMatrix::from_flat(values, rows, cols) {
            Ok(matrix) => {
                warn!(
                    "{}: declared {} x {} does not fit {} samples, using stored {} x {} layout",
                    source, record_count, points, total, rows, cols
                );
                return matrix;
            }
            Err(returned) => values = returned,
        }
    }

    let matrix = RecordMatrix::fit_rows(values, record_count);
    let dropped = total - matrix.rows() * matrix.cols();
    warn!(
        "{}: declared {} x {} does not fit {} samples, inferring {} x {} ({} trailing samples dropped)",
        source,
        record_count,
        points,
        total,
        matrix.rows(),
        matrix.cols(),
        dropped
    );
    matrix
}

//! Measurement file decoding.
//!
//! The conversion engine only talks to the [`SpectrumDecoder`] trait; the
//! bundled [`WdfReader`] decodes Renishaw WiRE files.

pub mod wdf;

pub use wdf::WdfReader;

use crate::error::DecodeError;
use std::path::Path;

/// Raw sample buffer as handed out by a decoder
#[derive(Debug, Clone, PartialEq)]
pub struct RawSamples {
    pub values: Vec<f32>,
    /// Shape reported by the decoder; `[len]` for a flat buffer
    pub shape: Vec<usize>,
}

impl RawSamples {
    /// Flat (rank 1) buffer
    pub fn flat(values: Vec<f32>) -> Self {
        let shape = vec![values.len()];
        Self { values, shape }
    }

    /// Buffer already laid out as `rows × cols`
    pub fn matrix(values: Vec<f32>, rows: usize, cols: usize) -> Self {
        Self {
            values,
            shape: vec![rows, cols],
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Content of a measurement file before shape normalization
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedSpectra {
    pub axis: Vec<f32>,
    pub samples: RawSamples,
    /// Declared number of spectra; 0 when the file does not say
    pub record_count: usize,
    /// Declared number of points in each spectrum
    pub points_per_record: usize,
}

/// Opens a measurement file and returns its undecorated sample data
pub trait SpectrumDecoder {
    fn open(&self, path: &Path) -> Result<DecodedSpectra, DecodeError>;
}

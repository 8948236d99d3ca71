//! Integration tests for the processor module
//!
//! Tests the complete conversion pipeline over temporary import trees
//! populated with synthetic WDF files.


use crate::decoder::wdf::test_support::wdf_bytes;
use std::fs;
use std::path::Path;

/// Write a valid WDF file with `count` spectra of `points` points each
pub fn write_wdf(path: &Path, count: usize, points: usize) {
    let axis: Vec<f32> = (0..points).map(|i| 100.0 + i as f32 * 0.5).collect();
    let spectra: Vec<f32> = (0..count * points).map(|i| i as f32 * 1.25).collect();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, wdf_bytes(&axis, &spectra, count as u64, points as u32)).unwrap();
}

/// Write a file the WDF reader rejects
pub fn write_malformed(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, b"not a measurement file").unwrap();
}

/// Number of regular files directly inside `dir`
pub fn file_count(dir: &Path) -> usize {
    fs::read_dir(dir)
        .map(|entries| entries.filter_map(|e| e.ok()).filter(|e| e.path().is_file()).count())
        .unwrap_or(0)
}

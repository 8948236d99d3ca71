//! Renishaw WiRE (`.wdf`) reader
//!
//! A WDF file is a chain of little-endian blocks, each introduced by a
//! 16-byte header (name, uid, total size). Only the pieces needed for
//! conversion are read: the measurement info in the `WDF1` header, the
//! spectral axis in `XLST` and the intensities in `DATA`.

use super::{DecodedSpectra, RawSamples, SpectrumDecoder};
use crate::constants::wdf::{
    BLOCK_HEADER_SIZE, DATA_BLOCK, FILE_HEADER_BLOCK, FILE_HEADER_SIZE, MEASUREMENT_INFO_OFFSET,
    SAMPLE_SIZE, XLIST_BLOCK, XLIST_PREAMBLE_SIZE,
};
use crate::error::DecodeError;

use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Cursor, Read};
use std::path::Path;
use tracing::{debug, warn};

/// Header of one block in the container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockInfo {
    pub name: String,
    pub uid: u32,
    pub offset: usize,
    pub size: u64,
}

/// Measurement info from the file header
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeasurementInfo {
    pub points_per_spectrum: u32,
    pub capacity: u64,
    pub count: u64,
    pub accumulation_count: u32,
    pub ylist_length: u32,
    pub xlist_length: u32,
    pub data_origin_count: u32,
}

impl MeasurementInfo {
    /// An acquisition stopped early stores fewer spectra than it reserved
    pub fn is_complete(&self) -> bool {
        self.count == self.capacity
    }
}

/// Decoder for WiRE measurement files
#[derive(Debug, Default, Clone, Copy)]
pub struct WdfReader;

impl WdfReader {
    pub fn new() -> Self {
        Self
    }

    /// Decode an in-memory WDF image
    pub fn decode(&self, bytes: &[u8]) -> Result<DecodedSpectra, DecodeError> {
        let blocks = scan_blocks(bytes)?;

        let header = blocks
            .first()
            .filter(|b| b.name == FILE_HEADER_BLOCK && b.size == FILE_HEADER_SIZE)
            .ok_or_else(|| DecodeError::InvalidHeader {
                found: blocks.first().map(|b| b.name.clone()).unwrap_or_default(),
            })?;
        debug!("WDF header uid {} with {} blocks", header.uid, blocks.len());

        let info = read_measurement_info(bytes)?;
        if !info.is_complete() {
            debug!(
                "Incomplete measurement: {} of {} spectra acquired",
                info.count, info.capacity
            );
        }

        let axis = read_xlist(bytes, find_block(&blocks, XLIST_BLOCK)?, info.xlist_length)?;
        let samples = read_spectra(bytes, find_block(&blocks, DATA_BLOCK)?, &info)?;

        Ok(DecodedSpectra {
            axis,
            samples: RawSamples::flat(samples),
            record_count: usize::try_from(info.count).unwrap_or(0),
            points_per_record: info.points_per_spectrum as usize,
        })
    }
}

impl SpectrumDecoder for WdfReader {
    fn open(&self, path: &Path) -> Result<DecodedSpectra, DecodeError> {
        let bytes = std::fs::read(path)?;
        self.decode(&bytes)
    }
}

/// Walk the block chain from the start of the file
pub fn scan_blocks(bytes: &[u8]) -> Result<Vec<BlockInfo>, DecodeError> {
    let mut blocks = Vec::new();
    let mut offset = 0usize;

    while offset + BLOCK_HEADER_SIZE <= bytes.len() {
        let mut cursor = Cursor::new(&bytes[offset..offset + BLOCK_HEADER_SIZE]);
        let mut name = [0u8; 4];
        cursor.read_exact(&mut name)?;
        let uid = cursor.read_u32::<LittleEndian>()?;
        let size = cursor.read_u64::<LittleEndian>()?;

        if size < BLOCK_HEADER_SIZE as u64 {
            break;
        }

        blocks.push(BlockInfo {
            name: String::from_utf8_lossy(&name).into_owned(),
            uid,
            offset,
            size,
        });

        match usize::try_from(size).ok().and_then(|s| offset.checked_add(s)) {
            Some(next) => offset = next,
            None => break,
        }
    }

    if blocks.is_empty() {
        return Err(DecodeError::InvalidHeader {
            found: String::new(),
        });
    }

    Ok(blocks)
}

fn find_block<'a>(blocks: &'a [BlockInfo], name: &'static str) -> Result<&'a BlockInfo, DecodeError> {
    blocks
        .iter()
        .find(|b| b.name == name)
        .ok_or(DecodeError::MissingBlock(name))
}

fn read_measurement_info(bytes: &[u8]) -> Result<MeasurementInfo, DecodeError> {
    let mut cursor = Cursor::new(bytes);
    cursor.set_position(MEASUREMENT_INFO_OFFSET as u64);

    Ok(MeasurementInfo {
        points_per_spectrum: cursor.read_u32::<LittleEndian>()?,
        capacity: cursor.read_u64::<LittleEndian>()?,
        count: cursor.read_u64::<LittleEndian>()?,
        accumulation_count: cursor.read_u32::<LittleEndian>()?,
        ylist_length: cursor.read_u32::<LittleEndian>()?,
        xlist_length: cursor.read_u32::<LittleEndian>()?,
        data_origin_count: cursor.read_u32::<LittleEndian>()?,
    })
}

/// Payload of a block, clipped to the end of the file
fn block_payload<'a>(bytes: &'a [u8], block: &BlockInfo) -> &'a [u8] {
    let start = (block.offset + BLOCK_HEADER_SIZE).min(bytes.len());
    let end = usize::try_from(block.size)
        .ok()
        .and_then(|size| block.offset.checked_add(size))
        .map_or(bytes.len(), |end| end.min(bytes.len()));
    &bytes[start..end.max(start)]
}

fn read_xlist(bytes: &[u8], block: &BlockInfo, length: u32) -> Result<Vec<f32>, DecodeError> {
    let payload = block_payload(bytes, block);
    let needed = XLIST_PREAMBLE_SIZE + length as usize * SAMPLE_SIZE;
    if payload.len() < needed {
        return Err(DecodeError::Truncated {
            block: XLIST_BLOCK,
            needed,
            available: payload.len(),
        });
    }

    read_f32s(&payload[XLIST_PREAMBLE_SIZE..needed])
}

fn read_spectra(bytes: &[u8], block: &BlockInfo, info: &MeasurementInfo) -> Result<Vec<f32>, DecodeError> {
    let payload = block_payload(bytes, block);
    let declared = usize::try_from(info.count)
        .unwrap_or(usize::MAX)
        .saturating_mul(info.points_per_spectrum as usize);
    let available = payload.len() / SAMPLE_SIZE;

    if available < declared {
        warn!(
            "DATA block holds {} samples but header declares {} ({} x {})",
            available, declared, info.count, info.points_per_spectrum
        );
    }

    let take = declared.min(available);
    read_f32s(&payload[..take * SAMPLE_SIZE])
}

fn read_f32s(bytes: &[u8]) -> Result<Vec<f32>, DecodeError> {
    let count = bytes.len() / SAMPLE_SIZE;
    let mut values = Vec::with_capacity(count);
    let mut cursor = Cursor::new(bytes);
    for _ in 0..count {
        values.push(cursor.read_f32::<LittleEndian>()?);
    }
    Ok(values)
}

//! Application constants for the WDF converter
//!
//! File naming, text formatting and the WDF container layout used by the
//! decoder.

// =============================================================================
// Discovery and Output Naming
// =============================================================================

/// Extension of Renishaw WiRE measurement files (case sensitive)
pub const WDF_EXTENSION: &str = ".wdf";

/// Extension of per-spectrum text files
pub const TXT_EXTENSION: &str = "txt";

/// Extension of aggregated table files
pub const CSV_EXTENSION: &str = "csv";

/// Decimal places written for both columns of a per-spectrum text file
pub const TXT_DECIMALS: usize = 6;

/// Column separator of per-spectrum text files
pub const TXT_DELIMITER: char = '\t';

/// Field separator of aggregated table files
pub const CSV_DELIMITER: char = ',';

// =============================================================================
// WDF Container Layout
// =============================================================================

/// Block header layout and offsets of the WiRE measurement file format.
///
/// All integers and samples are little-endian.
pub mod wdf {
    /// Size of every block header: 4-byte name, u32 uid, u64 size
    pub const BLOCK_HEADER_SIZE: usize = 16;

    /// The file header block always spans this many bytes
    pub const FILE_HEADER_SIZE: u64 = 512;

    /// Absolute offset of the measurement info inside the file header
    pub const MEASUREMENT_INFO_OFFSET: usize = 60;

    /// Type/unit words preceding the values of an XLST/YLST block
    pub const XLIST_PREAMBLE_SIZE: usize = 8;

    /// Size in bytes of one stored sample
    pub const SAMPLE_SIZE: usize = 4;

    pub const FILE_HEADER_BLOCK: &str = "WDF1";
    pub const DATA_BLOCK: &str = "DATA";
    pub const XLIST_BLOCK: &str = "XLST";
}

// =============================================================================
// Progress Reporting
// =============================================================================

/// Progress bar template for batch conversion
pub const PROGRESS_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}";

/// Characters used to draw the progress bar
pub const PROGRESS_CHARS: &str = "#>-";

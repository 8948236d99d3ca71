//! End-to-end conversion tests over synthetic WiRE files

use byteorder::{LittleEndian, WriteBytesExt};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use wdf_converter::cli::report_lines;
use wdf_converter::{BatchConverter, ConversionConfig, ConverterError, ExportFormat, WdfReader};

fn append_f32s(buffer: &mut Vec<u8>, values: &[f32]) {
    for &val in values {
        buffer.write_f32::<LittleEndian>(val).unwrap();
    }
}

fn block_header(buffer: &mut Vec<u8>, name: &[u8; 4], size: u64) {
    buffer.extend_from_slice(name);
    buffer.write_u32::<LittleEndian>(0).unwrap();
    buffer.write_u64::<LittleEndian>(size).unwrap();
}

/// Minimal WiRE image: header block, DATA, XLST
fn wdf_image(axis: &[f32], spectra: &[Vec<f32>]) -> Vec<u8> {
    let count = spectra.len() as u64;
    let flat: Vec<f32> = spectra.iter().flatten().copied().collect();

    let mut buffer = Vec::new();
    block_header(&mut buffer, b"WDF1", 512);
    buffer.resize(60, 0);
    buffer.write_u32::<LittleEndian>(axis.len() as u32).unwrap();
    buffer.write_u64::<LittleEndian>(count).unwrap();
    buffer.write_u64::<LittleEndian>(count).unwrap();
    buffer.write_u32::<LittleEndian>(1).unwrap();
    buffer.write_u32::<LittleEndian>(0).unwrap();
    buffer.write_u32::<LittleEndian>(axis.len() as u32).unwrap();
    buffer.write_u32::<LittleEndian>(0).unwrap();
    buffer.resize(512, 0);

    block_header(&mut buffer, b"DATA", 16 + flat.len() as u64 * 4);
    append_f32s(&mut buffer, &flat);

    block_header(&mut buffer, b"XLST", 16 + 8 + axis.len() as u64 * 4);
    buffer.write_u32::<LittleEndian>(1).unwrap();
    buffer.write_u32::<LittleEndian>(1).unwrap();
    append_f32s(&mut buffer, axis);

    buffer
}

fn write_file(path: &Path, bytes: &[u8]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, bytes).unwrap();
}

fn raman_axis() -> Vec<f32> {
    vec![520.125, 521.25, 522.375, 523.5]
}

fn raman_spectra() -> Vec<Vec<f32>> {
    vec![
        vec![10.5, 11.25, 950.0, 12.0],
        vec![0.001, 2.5, 1010.75, 3.125],
        vec![-1.5, 0.0, 875.5, 4.0],
    ]
}

fn parse_fields(line: &str, separator: char) -> Vec<f64> {
    line.split(separator).map(|f| f.parse::<f64>().unwrap()).collect()
}

#[test]
fn test_text_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let import = temp_dir.path().join("import");
    let export = temp_dir.path().join("export");
    write_file(&import.join("silicon.wdf"), &wdf_image(&raman_axis(), &raman_spectra()));

    let report = BatchConverter::new(ConversionConfig::new(&import, &export))
        .run()
        .unwrap();
    assert_eq!(report.succeeded, 1);

    for (index, spectrum) in raman_spectra().iter().enumerate() {
        let path = export.join("silicon").join(format!("{index}.txt"));
        let content = fs::read_to_string(&path).unwrap();
        let rows: Vec<Vec<f64>> = content.lines().map(|l| parse_fields(l, '\t')).collect();

        assert_eq!(rows.len(), raman_axis().len());
        for ((row, x), y) in rows.iter().zip(raman_axis()).zip(spectrum) {
            assert!((row[0] - f64::from(x)).abs() <= 5e-7);
            assert!((row[1] - f64::from(*y)).abs() <= 5e-7);
        }
    }
    assert!(!export.join("silicon").join("3.txt").exists());
}

#[test]
fn test_csv_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let import = temp_dir.path().join("import");
    let export = temp_dir.path().join("export");
    write_file(&import.join("silicon.wdf"), &wdf_image(&raman_axis(), &raman_spectra()));

    let config = ConversionConfig::new(&import, &export).with_format(ExportFormat::Csv);
    let report = BatchConverter::new(config).run().unwrap();
    assert_eq!(report.succeeded, 1);

    let content = fs::read_to_string(export.join("silicon.csv")).unwrap();
    let mut lines = content.lines();

    let header = parse_fields(lines.next().unwrap(), ',');
    let expected_header: Vec<f64> = raman_axis().into_iter().map(f64::from).collect();
    assert_eq!(header, expected_header);

    let rows: Vec<Vec<f64>> = lines.map(|l| parse_fields(l, ',')).collect();
    assert_eq!(rows.len(), raman_spectra().len());
    for (row, spectrum) in rows.iter().zip(raman_spectra()) {
        assert_eq!(row.len(), raman_axis().len());
        for (value, expected) in row.iter().zip(spectrum) {
            assert!((value - f64::from(expected)).abs() <= 5e-7);
        }
    }
}

#[test]
fn test_mixed_batch_with_mirroring() {
    let temp_dir = TempDir::new().unwrap();
    let import = temp_dir.path().join("import");
    let export = temp_dir.path().join("export");
    let image = wdf_image(&raman_axis(), &raman_spectra());
    write_file(&import.join("run1").join("a.wdf"), &image);
    write_file(&import.join("run2").join("b.wdf"), b"corrupted");
    write_file(&import.join("run2").join("c.wdf"), &wdf_image(&raman_axis(), &[]));
    write_file(&import.join("d.wdf"), &image);
    write_file(&import.join("notes.txt"), b"ignored");

    let config = ConversionConfig::new(&import, &export)
        .with_mirror(true)
        .with_recursive(true)
        .with_verbose(true);
    let report = BatchConverter::new(config).run().unwrap();

    assert_eq!(report.total, 4);
    assert_eq!(report.succeeded, 2);
    assert_eq!(report.failed_count(), 2);
    assert!(export.join("run1").join("a").join("2.txt").is_file());
    assert!(export.join("d").join("0.txt").is_file());

    let lines = report_lines(&report, true);
    assert_eq!(lines[0], "Completed: 2 succeeded, 2 failed (out of 4)");
    assert_eq!(lines[1], "Failures grouped by error:");
    assert!(lines[2].starts_with("- Failed to open: "));
    assert_eq!(lines[3], "    - b.wdf");
    assert_eq!(lines[4], "- No spectra written (1):");
    assert_eq!(lines[5], "    - c.wdf");
    assert!(lines.contains(&"Successfully converted 2 WDF files to TXT files.".to_string()));
}

#[test]
fn test_relative_import_paths_are_resolved() {
    let temp_dir = TempDir::new().unwrap();
    let import = temp_dir.path().join("import");
    write_file(&import.join("x.wdf"), &wdf_image(&raman_axis(), &raman_spectra()));

    let missing = PathBuf::from("definitely-not-a-directory-here");
    let result = BatchConverter::new(ConversionConfig::new(&missing, temp_dir.path().join("out"))).run();

    match result {
        Err(ConverterError::ImportDirNotFound { path }) => assert!(path.is_absolute()),
        other => panic!("Expected ImportDirNotFound, got {other:?}"),
    }
}

#[test]
fn test_reader_usable_directly() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("direct.wdf");
    write_file(&path, &wdf_image(&raman_axis(), &raman_spectra()));

    let decoded = wdf_converter::SpectrumDecoder::open(&WdfReader::new(), &path).unwrap();

    assert_eq!(decoded.axis, raman_axis());
    assert_eq!(decoded.record_count, 3);
    assert_eq!(decoded.points_per_record, 4);
    assert_eq!(decoded.samples.len(), 12);
}

//! End-to-end runs against temporary directories.

use std::fs;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use rust_xlsxwriter::Workbook;

use report_core::config::{OutputFormat, ReportConfig, UnitLabels};
use report_core::document::{Block, ReportDocument};
use report_core::errors::{LoadError, ReportError};
use report_core::pipeline::generate;

const REFERENCE: &[(f64, f64, f64)] = &[(0.0, 0.0, 0.0), (5.0, 10.0, 25.0), (10.0, -10.0, 0.0)];

fn write_xlsx(path: &Path, rows: &[(f64, f64, f64)]) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "x").unwrap();
    sheet.write_string(0, 1, "Shear force").unwrap();
    sheet.write_string(0, 2, "Bending Moment").unwrap();
    for (i, (x, v, m)) in rows.iter().enumerate() {
        let row = (i + 1) as u32;
        sheet.write_number(row, 0, *x).unwrap();
        sheet.write_number(row, 1, *v).unwrap();
        sheet.write_number(row, 2, *m).unwrap();
    }
    workbook.save(path).unwrap();
}

fn config_in(dir: &Path, input: PathBuf, format: OutputFormat) -> ReportConfig {
    ReportConfig {
        input_path: input,
        image_path: Some(dir.join("images").join("Beam.png")),
        output_path: dir.join("output").join("report.pdf"),
        format,
        ..ReportConfig::default()
    }
}

fn read_document(path: &Path) -> ReportDocument {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

fn facts<'a>(document: &'a ReportDocument, heading: &str) -> &'a [String] {
    document
        .blocks()
        .into_iter()
        .find_map(|block| match block {
            Block::KeyFacts { heading: h, facts } if h == heading => Some(facts.as_slice()),
            _ => None,
        })
        .unwrap()
}

#[test]
fn test_reference_scenario_from_xlsx() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("Force.xlsx");
    write_xlsx(&input, REFERENCE);

    let config = config_in(dir.path(), input, OutputFormat::Json);
    let run = generate(&config).unwrap();

    assert_eq!(run.stats.length, 10.0);
    assert_eq!(run.stats.max_abs_shear, 10.0);
    assert_eq!(run.stats.max_moment, 25.0);
    assert_eq!(run.stats.max_moment_position, 5.0);

    let document = read_document(&run.outcome.artifact);
    assert_eq!(
        facts(&document, "Beam Properties:"),
        ["Total Beam Length: 10.0 m", "Number of Analysis Points: 3"]
    );
    assert_eq!(
        facts(&document, "Key Analysis Results:"),
        [
            "Maximum Shear Force: 10.00 kN",
            "Maximum Bending Moment: 25.00 kN·m",
            "Location of Maximum Moment: 5.00 m from left support",
        ]
    );
    assert_eq!(
        facts(&document, "Data Source:"),
        ["Analysis data has been imported from the Excel file: Force.xlsx"]
    );

    let charts: Vec<String> = document
        .blocks()
        .into_iter()
        .filter_map(|block| match block {
            Block::Chart(chart) => Some(chart.coordinates()),
            _ => None,
        })
        .collect();
    assert_eq!(
        charts,
        ["(0,0) (5,10) (10,-10)", "(0,0.00) (5,25.00) (10,0.00)"]
    );
}

#[test]
fn test_csv_with_uneven_spacing() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("beam.csv");
    fs::write(&input, "Position,V,M\n2,5,0\n3,-1,4\n7.5,-8,1\n").unwrap();

    let run = generate(&config_in(dir.path(), input, OutputFormat::Json)).unwrap();
    assert_eq!(run.stats.length, 5.5);
    assert_eq!(run.stats.max_abs_shear, 8.0);
    assert_eq!(run.stats.max_moment_position, 3.0);
}

#[test]
fn test_large_table_is_thinned() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("Force.xlsx");
    let rows: Vec<(f64, f64, f64)> = (0..16).map(|i| (i as f64, 1.0, 2.0)).collect();
    write_xlsx(&input, &rows);

    let run = generate(&config_in(dir.path(), input, OutputFormat::Json)).unwrap();
    let document = read_document(&run.outcome.artifact);

    let table = document
        .blocks()
        .into_iter()
        .find_map(|block| match block {
            Block::Table(table) => Some(table.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(table.rows.len(), 8);
    assert_eq!(
        facts(&document, "Beam Properties:")[1],
        "Number of Analysis Points: 16"
    );
}

#[test]
fn test_missing_source_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("data").join("Force.xlsx");
    let config = config_in(dir.path(), input.clone(), OutputFormat::Pdf);

    let err = generate(&config).unwrap_err();
    assert_eq!(
        err,
        ReportError::Load(LoadError::source_not_found(input.display().to_string()))
    );
    assert!(!dir.path().join("output").exists());
}

#[test]
fn test_header_only_input_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("Force.xlsx");
    write_xlsx(&input, &[]);

    let err = generate(&config_in(dir.path(), input, OutputFormat::Json)).unwrap_err();
    assert_eq!(err.error_code(), "EMPTY_DATASET");
    assert!(!dir.path().join("output").exists());
}

#[test]
fn test_missing_column_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("beam.csv");
    fs::write(&input, "x,Shear force\n0,0\n").unwrap();

    let err = generate(&config_in(dir.path(), input, OutputFormat::Json)).unwrap_err();
    assert!(matches!(
        err,
        ReportError::Load(LoadError::MissingColumn { ref column, .. }) if column == "moment"
    ));
}

#[test]
fn test_image_included_only_when_present() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("beam.csv");
    fs::write(&input, "x,Shear force,Bending Moment\n0,0,0\n5,10,25\n10,-10,0\n").unwrap();
    let config = config_in(dir.path(), input, OutputFormat::Typst);

    let run = generate(&config).unwrap();
    let without = fs::read_to_string(&run.outcome.artifact).unwrap();
    assert!(!without.contains("#figure("));

    let image = config.image_path.clone().unwrap();
    fs::create_dir_all(image.parent().unwrap()).unwrap();
    fs::write(&image, b"not really a png").unwrap();

    let run = generate(&config).unwrap();
    let with = fs::read_to_string(&run.outcome.artifact).unwrap();
    assert!(with.contains("image(\"report-figure-1.png\", width: 80%)"));
    assert!(with.contains("Simply Supported Beam Configuration"));
    assert!(dir.path().join("output").join("report-figure-1.png").is_file());
}

#[test]
fn test_pdf_smoke() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("Force.xlsx");
    write_xlsx(&input, REFERENCE);

    let config = config_in(dir.path(), input, OutputFormat::Pdf);
    let run = generate(&config).unwrap();

    let pdf = fs::read(&run.outcome.artifact).unwrap();
    assert!(pdf.starts_with(b"%PDF"));

    let source = run.outcome.intermediate.unwrap();
    assert_eq!(source, dir.path().join("output").join("report.typ"));
    assert!(fs::read_to_string(source).unwrap().contains("= Introduction"));
}

#[test]
fn test_pdf_without_kept_source() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("Force.xlsx");
    write_xlsx(&input, REFERENCE);

    let config = ReportConfig {
        keep_source: false,
        ..config_in(dir.path(), input, OutputFormat::Pdf)
    };
    let run = generate(&config).unwrap();

    assert_eq!(run.outcome.intermediate, None);
    assert!(!dir.path().join("output").join("report.typ").exists());
}

#[test]
fn test_pdf_with_slashes_in_title_and_units() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("Force.xlsx");
    write_xlsx(&input, REFERENCE);

    let config = ReportConfig {
        title: "Span A // retrofit".to_string(),
        author: "- site team".to_string(),
        units: UnitLabels {
            force: "kN // k".to_string(),
            ..UnitLabels::default()
        },
        ..config_in(dir.path(), input, OutputFormat::Pdf)
    };

    let run = generate(&config).unwrap();
    assert!(fs::read(&run.outcome.artifact).unwrap().starts_with(b"%PDF"));
}

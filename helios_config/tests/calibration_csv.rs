use std::fs::File;
use std::io::Write;

use helios_config::load_points_csv;
use helios_core::CalibrationPoint;
use rstest::rstest;
use tempfile::tempdir;

#[rstest]
fn reads_points_in_file_order() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("egt.csv");
    let mut f = File::create(&path).unwrap();
    writeln!(f, "input,output").unwrap();
    writeln!(f, "400, 30.5").unwrap();
    writeln!(f, "200,10").unwrap();

    let pts = load_points_csv(&path).unwrap();
    assert_eq!(
        pts,
        vec![
            CalibrationPoint::new(400.0, 30.5),
            CalibrationPoint::new(200.0, 10.0)
        ]
    );
}

#[rstest]
fn csv_with_wrong_header_errors() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad_headers.csv");
    let mut f = File::create(&path).unwrap();
    writeln!(f, "raw,grams").unwrap();
    writeln!(f, "100,0.0").unwrap();

    let err = load_points_csv(&path).expect_err("should error on bad headers");
    assert!(format!("{err}").contains("headers 'input,output'"));
}

#[rstest]
fn csv_with_non_numeric_reports_line() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad_numeric.csv");
    let mut f = File::create(&path).unwrap();
    writeln!(f, "input,output").unwrap();
    writeln!(f, "1.0,2.0").unwrap();
    writeln!(f, "abc,xyz").unwrap();

    let err = load_points_csv(&path).expect_err("should error on non-numeric");
    assert!(format!("{err}").contains("invalid CSV row at line 3"));
}

#[rstest]
fn bad_row_after_blank_line_reports_file_line() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("gap.csv");
    std::fs::write(&path, "input,output\n0.5,0.2\n\n0.7,x\n").unwrap();

    let err = load_points_csv(&path).expect_err("should error on non-numeric");
    let msg = format!("{err}");
    assert!(msg.contains("invalid CSV row at line 4"), "{msg}");
}

#[rstest]
fn empty_csv_yields_no_points() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.csv");
    let mut f = File::create(&path).unwrap();
    writeln!(f, "input,output").unwrap();
    assert!(load_points_csv(&path).unwrap().is_empty());
}

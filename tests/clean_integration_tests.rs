//! Integration tests for the cleaning pipeline
//!
//! Covers the file-level behavior end to end:
//! - warm-up rows without satellite lock
//! - duplicate timestamps
//! - directory input with per-file outputs and summed totals
//! - summary averages
//! - re-cleaning an already cleaned file

use approx::assert_relative_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use trip_prep::{clean_file, clean_path, FixStream, HeadingMode, TripConfig, TripError, Units};

const HEADER: &str = "TimeStamp,Lat,Lng,Altitude,NumSat,POI";

fn write_trip(path: &Path, rows: &[&str]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create trip directory");
    }
    let mut content = String::from(HEADER);
    content.push('\n');
    for row in rows {
        content.push_str(row);
        content.push('\n');
    }
    fs::write(path, content).expect("Failed to write trip file");
}

fn read_rows(path: &Path) -> Vec<csv::StringRecord> {
    let mut reader = csv::Reader::from_path(path).expect("Failed to open cleaned file");
    reader
        .records()
        .collect::<Result<Vec<_>, _>>()
        .expect("Cleaned file should be valid CSV")
}

#[test]
fn test_four_row_trip_end_to_end() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input = temp_dir.path().join("in").join("drive.csv");
    let out_dir = temp_dir.path().join("out");
    fs::create_dir_all(&out_dir).unwrap();
    write_trip(
        &input,
        &[
            "2018-06-23T01:25:01.000Z,37.0,-122.0,10.0,10,",
            "2018-06-23T01:25:02.000Z,37.0,-122.0,10.0,10,",
            "2018-06-23T01:25:03.000Z,37.0,-122.0,10.0,10,",
            "2018-06-23T01:25:04.000Z,37.0,-121.999,10.0,10,",
        ],
    );

    let report = clean_file(&input, &out_dir, &TripConfig::default()).unwrap();
    assert_eq!(report.output, out_dir.join("drive.csv"));
    assert_eq!(report.rows_written, 3);

    let rows = read_rows(&report.output);
    assert_eq!(rows.len(), 3);
    assert_eq!(&rows[0][6], "0");
    assert_eq!(&rows[1][6], "0");

    let last_speed: f64 = rows[2][6].parse().unwrap();
    let last_bearing: i32 = rows[2][7].parse().unwrap();
    assert!(last_speed > 0.0);
    assert!((89..=90).contains(&last_bearing));
    assert_relative_eq!(report.summary.peak_speed, last_speed, max_relative = 1e-12);
    assert_eq!(&rows[2][0], "1529717104");
}

#[test]
fn test_warm_up_without_lock_is_dropped() {
    let data = format!(
        "{HEADER}\n\
         2018-06-23T01:25:01.000Z,37.0,-122.0,10.0,0,\n\
         2018-06-23T01:25:02.000Z,37.0,-122.0,10.0,0,\n\
         2018-06-23T01:25:03.000Z,37.0,-122.0,10.0,10,\n\
         2018-06-23T01:25:04.000Z,37.0,-122.0,10.0,10,\n\
         2018-06-23T01:25:05.000Z,37.0,-122.0,10.0,3,\n\
         2018-06-23T01:25:06.000Z,37.0,-122.0,10.0,10,\n"
    );

    let mut stream = FixStream::from_reader(data.as_bytes(), &TripConfig::default()).unwrap();
    let accepted: Vec<i64> = stream.by_ref().map(|r| r.unwrap().fix.timestamp).collect();
    assert_eq!(
        accepted,
        vec![1_529_717_103, 1_529_717_104, 1_529_717_105, 1_529_717_106]
    );
    assert_eq!(stream.dropped(), 2);
}

#[test]
fn test_duplicate_timestamps_are_collapsed() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input = temp_dir.path().join("dups.csv");
    let out_dir = temp_dir.path().join("out");
    fs::create_dir_all(&out_dir).unwrap();
    write_trip(
        &input,
        &[
            "2018-06-23T01:25:04.700Z,37.54856569,-122.302331958,23.326,10,",
            "2018-06-23T01:25:04.900Z,37.54856569,-122.302331958,23.326,12,",
            "2018-06-23T01:25:05.100Z,37.54866569,-122.302331958,23.326,12,",
            "2018-06-23T01:25:05.700Z,37.54876569,-122.302331958,23.326,12,",
            "2018-06-23T01:25:06.100Z,37.54886569,-122.302331958,23.326,12,POI",
        ],
    );

    let report = clean_file(&input, &out_dir, &TripConfig::default()).unwrap();
    let rows = read_rows(&report.output);
    let stamps: Vec<&str> = rows.iter().map(|r| r.get(0).unwrap()).collect();

    assert_eq!(stamps, vec!["1529717105", "1529717106"]);
    assert_eq!(report.summary.readings, 2);
    assert_eq!(report.summary.pois, 1);
    // both emitted rows head due north
    assert!(rows.iter().all(|r| &r[7] == "0"));
}

#[test]
fn test_average_speed_is_mean_of_row_speeds() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input = temp_dir.path().join("uneven.csv");
    write_trip(
        &input,
        &[
            "1529717100,37.0,-122.0,10,10,",
            "1529717101,37.001,-122.0,10,10,",
            "1529717161,37.002,-122.0,10,10,",
        ],
    );

    let out_dir = temp_dir.path().join("out");
    fs::create_dir_all(&out_dir).unwrap();

    let report = clean_file(&input, &out_dir, &TripConfig::default()).unwrap();
    let rows = read_rows(&report.output);
    let speeds: Vec<f64> = rows.iter().map(|r| r[6].parse().unwrap()).collect();
    let mean = speeds.iter().sum::<f64>() / speeds.len() as f64;

    assert_relative_eq!(report.summary.average_speed, mean, max_relative = 1e-12);
    let distance_over_time = report.summary.total_distance / report.summary.total_hours;
    assert!((distance_over_time - mean).abs() > 1.0);
}

#[test]
fn test_directory_input_processes_each_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let in_dir = temp_dir.path().join("raw");
    let out_dir = temp_dir.path().join("clean");
    fs::create_dir_all(&out_dir).unwrap();

    write_trip(
        &in_dir.join("monday.csv"),
        &[
            "2018-06-23T01:25:01.000Z,37.0,-122.0,10,10,",
            "2018-06-23T01:25:02.000Z,37.0,-122.0,10,10,POI",
            "2018-06-23T01:25:03.000Z,37.0,-122.0,10,10,",
        ],
    );
    write_trip(
        &in_dir.join("week2").join("tuesday.csv"),
        &[
            "n/a,n/a,n/a,n/a,0,",
            "2018-06-24T01:25:01.000Z,38.0,-121.0,10,10,",
            "2018-06-24T01:25:02.000Z,38.0,-121.0,10,10,POI",
        ],
    );
    fs::write(in_dir.join("notes.txt"), "not a trip").unwrap();

    let run = clean_path(in_dir.to_str().unwrap(), &out_dir, &TripConfig::default()).unwrap();

    assert!(run.failures.is_empty());
    assert_eq!(run.reports.len(), 2);
    assert_eq!(run.totals.files, 2);
    assert_eq!(run.totals.readings, 3);
    assert_eq!(run.totals.pois, 2);
    assert!(out_dir.join("monday.csv").exists());
    assert!(out_dir.join("tuesday.csv").exists());
    assert!(!out_dir.join("notes.txt").exists());
}

#[test]
fn test_bad_file_does_not_stop_run() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let in_dir = temp_dir.path().join("raw");
    let out_dir = temp_dir.path().join("clean");
    fs::create_dir_all(&in_dir).unwrap();
    fs::create_dir_all(&out_dir).unwrap();

    fs::write(in_dir.join("broken.csv"), "Time,Where\n1,2\n").unwrap();
    write_trip(
        &in_dir.join("good.csv"),
        &[
            "2018-06-23T01:25:01.000Z,37.0,-122.0,10,10,",
            "2018-06-23T01:25:02.000Z,37.0,-122.0,10,10,",
        ],
    );

    let run = clean_path(in_dir.to_str().unwrap(), &out_dir, &TripConfig::default()).unwrap();
    assert_eq!(run.reports.len(), 1);
    assert_eq!(run.failures.len(), 1);
    assert!(matches!(run.failures[0].1, TripError::MissingColumn(_)));
    assert_eq!(run.attempted(), 2);
    assert!(out_dir.join("good.csv").exists());
    assert!(
        !out_dir.join("broken.csv").exists(),
        "a file with a bad header must not leave an output behind"
    );
}

#[test]
fn test_recleaning_output_drops_no_rows() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let input = temp_dir.path().join("raw").join("loop.csv");
    let first_out = temp_dir.path().join("pass1");
    let second_out = temp_dir.path().join("pass2");
    fs::create_dir_all(&first_out).unwrap();
    fs::create_dir_all(&second_out).unwrap();
    write_trip(
        &input,
        &[
            "2018-06-23T01:25:00.000Z,n/a,n/a,n/a,0,",
            "2018-06-23T01:25:01.000Z,37.0,-122.0,10,1,",
            "2018-06-23T01:25:02.000Z,37.0,-122.0,10,9,",
            "2018-06-23T01:25:03.000Z,37.001,-122.0,10,2,",
            "2018-06-23T01:25:04.000Z,37.001,-121.999,10,9,POI",
            "2018-06-23T01:25:05.000Z,37.002,-121.999,10,9,",
        ],
    );
    let config = TripConfig {
        heading: HeadingMode::Relative,
        units: Units::Kilometers,
        min_sats: 1,
        ..TripConfig::default()
    };

    let first = clean_file(&input, &first_out, &config).unwrap();
    assert_eq!(first.dropped, 1);

    // Every cleaned row passes the filter again; only the seed row is held back
    let file = fs::File::open(&first.output).unwrap();
    let mut stream = FixStream::from_reader(file, &config).unwrap();
    let accepted = stream.by_ref().filter(|r| r.is_ok()).count() as u64;
    assert_eq!(accepted, first.rows_written);
    assert_eq!(stream.dropped(), 0);

    let second = clean_file(&first.output, &second_out, &config).unwrap();
    assert_eq!(second.dropped, 0);
    assert_eq!(second.rows_written, first.rows_written - 1);

    let header = fs::read_to_string(&second.output).unwrap();
    assert!(header.starts_with("TimeStamp,Lat,Lng,Altitude,NumSat,POI,Speed,Bearing\n"));
}

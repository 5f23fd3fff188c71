mod common;

use common::synthetic_image::noise;
use sobel_mapreduce::edges::sobel_magnitude;
use sobel_mapreduce::image::io::{format_matrix, read_matrix};
use std::fs;
use std::path::Path;
use std::process::{Command, Output};

const JOB_BIN: &str = env!("CARGO_BIN_EXE_sobel-mapreduce");
const REFERENCE_BIN: &str = env!("CARGO_BIN_EXE_sobel-reference");

fn invoke(bin: &str, args: &[&Path]) -> Output {
    Command::new(bin)
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("spawn binary")
}

#[test]
fn single_argument_prints_usage_and_exits_2() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.txt");
    fs::write(&input, format_matrix(&noise(4, 4, 1))).unwrap();

    for bin in [JOB_BIN, REFERENCE_BIN] {
        let out = invoke(bin, &[&input]);
        assert_eq!(out.status.code(), Some(2), "{bin}");
        let stderr = String::from_utf8_lossy(&out.stderr);
        assert!(stderr.contains("Usage:"), "{bin}: {stderr}");
    }
    let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1, "no output may be written");
}

#[test]
fn malformed_input_exits_1_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("short.txt");
    fs::write(&input, "3 3\n1 2\n").unwrap();

    for (bin, name) in [(JOB_BIN, "job.txt"), (REFERENCE_BIN, "reference.txt")] {
        let output = dir.path().join(name);
        let out = invoke(bin, &[&input, &output]);
        assert_eq!(out.status.code(), Some(1), "{bin}");
        let stderr = String::from_utf8_lossy(&out.stderr);
        assert!(stderr.contains("Error: Malformed input"), "{bin}: {stderr}");
        assert!(!output.exists(), "{bin} wrote {}", output.display());
    }
}

#[test]
fn huge_header_exits_1_instead_of_aborting() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("huge.txt");
    fs::write(&input, "1000000000 1000000000\n1 2 3\n").unwrap();

    for (bin, name) in [(JOB_BIN, "job.txt"), (REFERENCE_BIN, "reference.txt")] {
        let output = dir.path().join(name);
        let out = invoke(bin, &[&input, &output]);
        assert_eq!(out.status.code(), Some(1), "{bin}");
        assert!(!output.exists());
    }
}

#[test]
fn good_run_matches_reference_filter() {
    let dir = tempfile::tempdir().unwrap();
    let image = noise(11, 7, 42);
    let input = dir.path().join("in.txt");
    fs::write(&input, format_matrix(&image)).unwrap();
    let expected = sobel_magnitude(&image);

    for (bin, name) in [(JOB_BIN, "out/job.txt"), (REFERENCE_BIN, "out/reference.txt")] {
        let output = dir.path().join(name);
        let out = invoke(bin, &[&input, &output]);
        assert!(
            out.status.success(),
            "{bin}: {}",
            String::from_utf8_lossy(&out.stderr)
        );
        assert_eq!(read_matrix(&output).unwrap(), expected, "{bin}");
    }
}

#[test]
fn job_accepts_a_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let image = noise(6, 9, 7);
    let input = dir.path().join("in.txt");
    let output = dir.path().join("out.txt");
    let config = dir.path().join("job.json");
    let report = dir.path().join("report.json");
    fs::write(&input, format_matrix(&image)).unwrap();
    fs::write(
        &config,
        serde_json::json!({
            "mode": "ordered",
            "map_workers": 2,
            "splits": 3,
            "report": report,
        })
        .to_string(),
    )
    .unwrap();

    let out = invoke(JOB_BIN, &[&input, &output, &config]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(read_matrix(&output).unwrap(), sobel_magnitude(&image));
    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(json["mode"], "ordered");
}

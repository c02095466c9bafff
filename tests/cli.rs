use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn farmbucket(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_farmbucket"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn write_file(dir: &TempDir, name: &str, content: &str) -> String {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path.to_str().unwrap().to_string()
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn stderr(output: &Output) -> String {
    String::from_utf8(output.stderr.clone()).unwrap()
}

#[test]
fn test_evaluate_prints_report() {
    let dir = TempDir::new().unwrap();
    let csv = write_file(
        &dir,
        "export.csv",
        "adid,date,bucket\nabc123,d,96\nbroken\nA1B2C3D4,d,1\n",
    );

    let output = farmbucket(&["evaluate", &csv]);
    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "Using CSV header: adid,date,bucket\n\
         adid=abc123 expected=96 predicted=96\n\
         adid=A1B2C3D4 expected=1 predicted=98\n\
         \n\
         Matches: 1/2  Accuracy: 50.00%\n"
    );
}

#[test]
fn test_evaluate_parallel_quiet() {
    let dir = TempDir::new().unwrap();
    let csv = write_file(&dir, "export.csv", "adid,bucket\nabc123,96\nxyz-987,63\na,0\n");

    let output = farmbucket(&["evaluate", "--parallel", "--quiet", &csv]);
    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "Using CSV header: adid,bucket\n\nMatches: 2/3  Accuracy: 66.67%\n"
    );
}

#[test]
fn test_evaluate_empty_file() {
    let dir = TempDir::new().unwrap();
    let csv = write_file(&dir, "empty.csv", "");

    let output = farmbucket(&["evaluate", &csv]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "No rows to evaluate.\n");
}

#[test]
fn test_evaluate_header_only() {
    let dir = TempDir::new().unwrap();
    let csv = write_file(&dir, "header.csv", "adid,bucket\n");

    let output = farmbucket(&["evaluate", &csv]);
    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "Using CSV header: adid,bucket\nNo valid rows processed.\n"
    );
}

#[test]
fn test_evaluate_missing_csv_fails() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.csv");
    assert!(!Path::new(&missing).exists());

    let output = farmbucket(&["evaluate", missing.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).contains("Failed to read CSV"));
}

#[test]
fn test_bad_config_file_fails() {
    let dir = TempDir::new().unwrap();
    let csv = write_file(&dir, "export.csv", "adid,bucket\nabc123,96\n");
    let config = write_file(&dir, "config.json", "{ not json");

    let output = farmbucket(&["--config", &config, "evaluate", &csv]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).contains("Failed to load config"));

    let missing = dir.path().join("absent.json");
    let output = farmbucket(&["-c", missing.to_str().unwrap(), "bucket", "abc123"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_zero_buckets_fails_before_report() {
    let dir = TempDir::new().unwrap();
    let csv = write_file(&dir, "export.csv", "adid,bucket\nabc123,96\n");

    let output = farmbucket(&["--buckets", "0", "evaluate", &csv]);
    assert_eq!(output.status.code(), Some(1));
    assert!(!stdout(&output).contains("Using CSV header"));
    assert!(stderr(&output).contains("bucket_count must be positive"));
}

#[test]
fn test_config_file_and_overrides() {
    let dir = TempDir::new().unwrap();
    let config = write_file(&dir, "config.json", r#"{"bucket_count": 1000}"#);

    let output = farmbucket(&["-c", &config, "bucket", "abc123"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "adid=abc123 bucket=696\n");

    let output = farmbucket(&["--experiment-key", "exp:2", "--salt", "pepper", "bucket", "abc123"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "adid=abc123 bucket=98\n");
}

#[test]
fn test_bucket_demo_identifiers() {
    let output = farmbucket(&["bucket"]);
    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "adid=1234-5678-ABCD bucket=47\nadid=A1B2C3D4 bucket=98\nadid=xyz-987 bucket=63\n"
    );
}

use serde_json::json;
use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn fixture_path(rel: &str) -> PathBuf {
    let base = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    base.join("fixtures").join(rel)
}

fn temp_dir(prefix: &str) -> PathBuf {
    let p = std::env::temp_dir().join(format!(
        "{}-{}",
        prefix,
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos()
    ));
    std::fs::create_dir_all(&p).expect("create temp dir");
    p
}

fn read_json(path: PathBuf) -> serde_json::Value {
    let text = std::fs::read_to_string(&path).expect("read json file");
    serde_json::from_str(&text).expect("parse json file")
}

#[test]
fn batch_import_writes_roster_and_exam_documents() {
    let root = temp_dir("examd-cli-batch");
    let data_dir = root.join("data");

    let out = Command::new(env!("CARGO_BIN_EXE_examd"))
        .arg("import")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--students")
        .arg(fixture_path("students.csv"))
        .arg("--exam")
        .arg(fixture_path("mock1.csv"))
        .arg("--exam")
        .arg(format!("{}=mock2", fixture_path("mock2_science.csv").display()))
        .output()
        .expect("run examd import");
    assert!(
        out.status.success(),
        "import failed: {}",
        String::from_utf8_lossy(&out.stderr)
    );

    let lines = String::from_utf8_lossy(&out.stdout)
        .lines()
        .map(|l| serde_json::from_str::<serde_json::Value>(l).expect("summary line"))
        .collect::<Vec<_>>();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], json!({"op": "students", "added": 4}));
    assert_eq!(lines[1]["summary"]["examName"], json!("mock1"));
    assert_eq!(lines[2]["summary"]["examName"], json!("mock2"));

    let students = read_json(data_dir.join("students.json"));
    assert_eq!(students.as_array().map(|a| a.len()), Some(4));
    assert_eq!(students[0], json!({"id": 101, "name": "Aarav Mehta"}));

    let mock1 = read_json(data_dir.join("exams").join("mock1.json"));
    assert_eq!(mock1["examName"], json!("mock1"));
    assert_eq!(mock1["results"].as_array().map(|a| a.len()), Some(3));
    let mock2 = read_json(data_dir.join("exams").join("mock2.json"));
    assert_eq!(
        mock2["sections"][1],
        json!({"name": "Science", "totalQuestions": 0, "negativeMarking": true, "cutoff": 40})
    );

    let _ = std::fs::remove_dir_all(root);
}

#[test]
fn batch_import_uses_explicit_config() {
    let root = temp_dir("examd-cli-config");
    let data_dir = root.join("data");
    let cfg = root.join("policy.json");
    std::fs::write(
        &cfg,
        r#"{"recognizedSections": ["Math", "Science"], "resultsPolicy": "replace"}"#,
    )
    .expect("write config");

    for _ in 0..2 {
        let status = Command::new(env!("CARGO_BIN_EXE_examd"))
            .arg("import")
            .arg("--data-dir")
            .arg(&data_dir)
            .arg("--config")
            .arg(&cfg)
            .arg("--students")
            .arg(fixture_path("students.csv"))
            .arg("--exam")
            .arg(fixture_path("mock2_science.csv"))
            .output()
            .expect("run examd import")
            .status;
        assert!(status.success());
    }

    let doc = read_json(data_dir.join("exams").join("mock2_science.json"));
    let results = doc["results"].as_array().expect("results");
    assert_eq!(results.len(), 2);
    assert_eq!(
        results[0]["sections"]["Science"],
        json!({"correct": 14, "wrong": 4, "notAttempted": 2})
    );

    let _ = std::fs::remove_dir_all(root);
}

#[test]
fn batch_import_fails_on_missing_roster_without_touching_store() {
    let root = temp_dir("examd-cli-missing");
    let data_dir = root.join("data");

    let out = Command::new(env!("CARGO_BIN_EXE_examd"))
        .arg("import")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--students")
        .arg(root.join("nope.csv"))
        .output()
        .expect("run examd import");
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("input file not found"));
    assert!(data_dir.join("exams").is_dir());
    assert!(!data_dir.join("students.json").exists());

    let _ = std::fs::remove_dir_all(root);
}

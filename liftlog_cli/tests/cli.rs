use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const SQUAT_LOG: &str = r#"[
  {"exercise": "Squat", "date": "2024-01-01", "weight": 100, "reps": 5},
  {"exercise": "Squat", "date": "2024-01-08", "weight": 110, "reps": 5}
]"#;

fn liftlog() -> Command {
    Command::cargo_bin("liftlog").unwrap()
}

fn write_log(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("workouts.json");
    fs::write(&path, contents).unwrap();
    path
}

fn outputs(dir: &Path) -> (PathBuf, PathBuf) {
    (dir.join("report.png"), dir.join("summary.txt"))
}

#[test]
fn report_writes_chart_and_summary() {
    let dir = TempDir::new().unwrap();
    let input = write_log(&dir, SQUAT_LOG);
    let (png, summary) = outputs(dir.path());

    liftlog()
        .arg("report")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "Report generated: {}",
            png.display()
        )))
        .stdout(predicate::str::contains(format!(
            "Summary generated: {}",
            summary.display()
        )));

    let text = fs::read_to_string(&summary).unwrap();
    assert_eq!(
        text,
        "Squat:\n  - Entries: 2\n  - Max Weight: 110.0 lbs\n  - Total Volume: 1050.0 lbs\n\nOverall total volume: 1050.0 lbs"
    );

    let image = fs::read(&png).unwrap();
    assert!(image.starts_with(&[0x89, b'P', b'N', b'G']));
}

#[test]
fn report_summary_is_identical_across_runs() {
    let dir = TempDir::new().unwrap();
    let input = write_log(
        &dir,
        r#"[
          {"exercise": "Bench Press", "date": "2024-02-01", "weight": 80.5, "reps": 8},
          {"exercise": "  bench press ", "date": "2024-01-25", "weight": 77.5, "reps": 8},
          {"exercise": "Deadlift", "date": "2024-01-28", "weight": 140, "reps": 3}
        ]"#,
    );
    let (_, summary) = outputs(dir.path());

    liftlog().arg("report").arg(&input).assert().success();
    let first = fs::read(&summary).unwrap();
    liftlog().arg("report").arg(&input).assert().success();
    let second = fs::read(&summary).unwrap();

    assert_eq!(first, second);
    let text = String::from_utf8(first).unwrap();
    assert_eq!(text.matches("Bench press:").count(), 1);
    assert!(text.starts_with("Bench press:\n  - Entries: 2\n"));
    assert!(text.contains("Deadlift:\n  - Entries: 1\n"));
}

#[test]
fn report_empty_log_exits_cleanly_without_outputs() {
    let dir = TempDir::new().unwrap();
    let input = write_log(&dir, "[]");
    let (png, summary) = outputs(dir.path());

    liftlog()
        .arg("report")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("No workouts yet."));

    assert!(!png.exists());
    assert!(!summary.exists());
}

#[test]
fn report_empty_object_counts_as_empty_log() {
    let dir = TempDir::new().unwrap();
    let input = write_log(&dir, "{}");
    let (png, summary) = outputs(dir.path());

    liftlog()
        .arg("report")
        .arg(&input)
        .assert()
        .code(0)
        .stdout(predicate::str::contains("No workouts yet."));

    assert!(!png.exists());
    assert!(!summary.exists());
}

#[test]
fn report_rejects_non_empty_object() {
    let dir = TempDir::new().unwrap();
    let input = write_log(&dir, r#"{"exercise": "Squat"}"#);

    liftlog()
        .arg("report")
        .arg(&input)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("JSON array"));
}

#[test]
fn report_without_path_is_a_usage_error() {
    liftlog()
        .arg("report")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn report_with_extra_arguments_is_a_usage_error() {
    let dir = TempDir::new().unwrap();
    let input = write_log(&dir, SQUAT_LOG);
    let (png, _) = outputs(dir.path());

    liftlog()
        .arg("report")
        .arg(&input)
        .arg("second.json")
        .assert()
        .code(1);
    assert!(!png.exists());
}

#[test]
fn report_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("nope.json");
    let (png, summary) = outputs(dir.path());

    liftlog()
        .arg("report")
        .arg(&input)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("file not found"));

    assert!(!png.exists());
    assert!(!summary.exists());
}

#[test]
fn report_rejects_malformed_json() {
    let dir = TempDir::new().unwrap();
    let input = write_log(&dir, "[{\"exercise\": ");

    liftlog()
        .arg("report")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed JSON"));
}

#[test]
fn report_rejects_record_missing_a_field() {
    let dir = TempDir::new().unwrap();
    let input = write_log(
        &dir,
        r#"[{"exercise": "Squat", "date": "2024-01-01", "weight": 100}]"#,
    );
    let (_, summary) = outputs(dir.path());

    liftlog()
        .arg("report")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("record 0"));
    assert!(!summary.exists());
}

#[test]
fn report_rejects_unparsable_date() {
    let dir = TempDir::new().unwrap();
    let input = write_log(
        &dir,
        r#"[{"exercise": "Squat", "date": "soon", "weight": 100, "reps": 5}]"#,
    );

    liftlog()
        .arg("report")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized date 'soon'"));
}

#[test]
fn report_can_also_write_svg() {
    let dir = TempDir::new().unwrap();
    let input = write_log(&dir, SQUAT_LOG);
    let svg = dir.path().join("chart.svg");

    liftlog()
        .arg("report")
        .arg(&input)
        .arg("--svg")
        .arg(&svg)
        .assert()
        .success();

    let text = fs::read_to_string(&svg).unwrap();
    assert!(text.contains("<svg"));
}

#[test]
fn add_appends_and_view_lists_entries() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("data").join("workouts.json");

    liftlog()
        .args(["add", "2026-01-10", "Squat", "100", "5", "--data"])
        .arg(&data)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Added: 2026-01-10 - Squat @ 100.0 lbs x 5 reps",
        ));
    liftlog()
        .args(["add", "2026-01-12", "bench", "62.5", "8", "--data"])
        .arg(&data)
        .assert()
        .success();

    let stored: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&data).unwrap()).unwrap();
    assert_eq!(stored.as_array().map(|a| a.len()), Some(2));
    assert_eq!(stored[1]["exercise"], "bench");
    assert_eq!(stored[1]["reps"], 8);

    liftlog()
        .arg("view")
        .arg("--data")
        .arg(&data)
        .assert()
        .success()
        .stdout(predicate::str::contains("Your Training Log:"))
        .stdout(predicate::str::contains(
            "  1 | 2026-01-10 | Squat        | 100.0 lbs x 5 reps",
        ))
        .stdout(predicate::str::contains(
            "  2 | 2026-01-12 | bench        | 62.5 lbs x 8 reps",
        ));
}

#[test]
fn view_prints_entries_as_stored() {
    let dir = TempDir::new().unwrap();
    let data = write_log(
        &dir,
        r#"[
          {"exercise": "bench PRESS", "date": "sometime in May", "weight": 60, "reps": 8},
          {"exercise": "Squat", "date": "2024-01-02T07:15:00", "weight": 100, "reps": 5}
        ]"#,
    );

    liftlog()
        .arg("view")
        .arg("--data")
        .arg(&data)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "  1 | sometime in May | bench PRESS  | 60.0 lbs x 8 reps",
        ))
        .stdout(predicate::str::contains(
            "  2 | 2024-01-02T07:15:00 | Squat        | 100.0 lbs x 5 reps",
        ));
}

#[test]
fn add_rejects_bad_date() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("workouts.json");

    liftlog()
        .args(["add", "10/01/2026", "Squat", "100", "5", "--data"])
        .arg(&data)
        .assert()
        .failure()
        .stderr(predicate::str::contains("YYYY-MM-DD"));
    assert!(!data.exists());
}

#[test]
fn add_keeps_unknown_fields_of_existing_entries() {
    let dir = TempDir::new().unwrap();
    let data = write_log(
        &dir,
        r#"[{"exercise": "Squat", "date": "2024-01-01", "weight": 100, "reps": 5, "estimated_1rm": 117, "note": "felt good"}]"#,
    );

    liftlog()
        .args(["add", "2024-01-03", "Squat", "105", "5", "--data"])
        .arg(&data)
        .assert()
        .success();

    let stored: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&data).unwrap()).unwrap();
    assert_eq!(stored[0]["note"], "felt good");
    assert_eq!(stored[1]["weight"], 105.0);
}

#[test]
fn view_and_stats_handle_missing_log() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("workouts.json");

    liftlog()
        .arg("view")
        .arg("--data")
        .arg(&data)
        .assert()
        .success()
        .stdout(predicate::str::contains("No workouts logged yet."));
    liftlog()
        .arg("stats")
        .arg("--data")
        .arg(&data)
        .assert()
        .success()
        .stdout(predicate::str::contains("No workouts yet."));
}

#[test]
fn stats_prints_estimated_maxes() {
    let dir = TempDir::new().unwrap();
    let data = write_log(&dir, SQUAT_LOG);

    liftlog()
        .arg("stats")
        .arg("--data")
        .arg(&data)
        .assert()
        .success()
        .stdout(predicate::str::contains("Stats Calculation"))
        .stdout(predicate::str::contains(
            "2024-01-08  |  Squat  | 110 lbs x 5 reps -> est. 1RM: 128 lbs",
        ))
        .stdout(predicate::str::contains("  - Squat: 128 lbs"));
}

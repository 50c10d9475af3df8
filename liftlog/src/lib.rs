//! Core workout-log processing: loading, normalization and per-exercise summaries.
//!
//! The pipeline is a straight line: [`load_raw_records`] reads the JSON array,
//! [`normalize`] types and sorts it, and [`summary::summarize`] aggregates the
//! result. Rendering lives in the CLI crate.

pub mod strength;
pub mod summary;

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;

pub use strength::{epley_1rm, render_stats_text};
pub use summary::{render_summary_text, summarize, ExerciseSummary, Summary};

/// Unit label used in every rendered weight or volume figure.
pub const WEIGHT_UNIT: &str = "lbs";

#[derive(Error, Debug)]
pub enum LiftError {
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),
    #[error("failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("workout log must be a JSON array of records")]
    NotAnArray,
    #[error("record {index}: {reason}")]
    InvalidRecord { index: usize, reason: String },
    #[error("record {index}: unrecognized date '{value}'")]
    DateParse { index: usize, value: String },
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

#[derive(Clone, Debug)]
pub struct ReportParams {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub chart_file: String,
    pub summary_file: String,
    pub unit: String,
}

impl Default for ReportParams {
    fn default() -> Self {
        Self {
            title: "Weight Progress Over Time".to_string(),
            width: 1000,
            height: 600,
            chart_file: "report.png".to_string(),
            summary_file: "summary.txt".to_string(),
            unit: WEIGHT_UNIT.to_string(),
        }
    }
}

impl ReportParams {
    /// Chart and summary paths, placed in the directory holding `input`.
    pub fn output_paths(&self, input: &Path) -> (PathBuf, PathBuf) {
        let dir = input.parent().unwrap_or_else(|| Path::new("."));
        (dir.join(&self.chart_file), dir.join(&self.summary_file))
    }
}

/// One entry as stored in the JSON log.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutEntry {
    pub date: String,
    pub exercise: String,
    pub weight: f64,
    pub reps: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_1rm: Option<f64>,
}

impl WorkoutEntry {
    /// Build an entry for appending to a log. Dates must be plain `YYYY-MM-DD`.
    pub fn new(date: &str, exercise: &str, weight: f64, reps: u32) -> Result<Self, LiftError> {
        NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| {
            LiftError::InvalidValue(format!("date '{}' must be in YYYY-MM-DD format", date))
        })?;
        if exercise.trim().is_empty() {
            return Err(LiftError::InvalidValue("exercise name is empty".into()));
        }
        if !weight.is_finite() || weight < 0.0 {
            return Err(LiftError::InvalidValue(format!(
                "weight {} must be a non-negative number",
                weight
            )));
        }
        Ok(Self {
            date: date.to_string(),
            exercise: exercise.to_string(),
            weight,
            reps,
            estimated_1rm: None,
        })
    }
}

/// A typed, normalized set.
#[derive(Clone, Debug, PartialEq)]
pub struct WorkoutRecord {
    /// Lowercased, trimmed exercise label; the grouping key.
    pub exercise: String,
    pub date: NaiveDateTime,
    pub weight: f64,
    pub reps: u32,
    pub volume: f64,
}

/// Records sorted by date plus the distinct exercises in first-seen order.
#[derive(Clone, Debug, Default)]
pub struct WorkoutLog {
    pub records: Vec<WorkoutRecord>,
    pub exercises: Vec<String>,
}

impl WorkoutLog {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records_for<'a>(&'a self, exercise: &'a str) -> impl Iterator<Item = &'a WorkoutRecord> {
        self.records.iter().filter(move |r| r.exercise == exercise)
    }
}

/// Read a JSON log from disk into raw records.
pub fn load_raw_records(path: &Path) -> Result<Vec<JsonValue>, LiftError> {
    let data = fs::read(path).map_err(|source| {
        if source.kind() == ErrorKind::NotFound {
            LiftError::FileNotFound(path.to_path_buf())
        } else {
            LiftError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    parse_raw_records(&data)
}

/// Decode a JSON array without interpreting its elements. An empty object
/// counts as an empty log.
pub fn parse_raw_records(input: &[u8]) -> Result<Vec<JsonValue>, LiftError> {
    match serde_json::from_slice::<JsonValue>(input)? {
        JsonValue::Array(items) => Ok(items),
        JsonValue::Object(fields) if fields.is_empty() => Ok(Vec::new()),
        _ => Err(LiftError::NotAnArray),
    }
}

/// Decode a raw record into its stored form without validating values.
pub fn parse_entry(index: usize, raw: &JsonValue) -> Result<WorkoutEntry, LiftError> {
    WorkoutEntry::deserialize(raw).map_err(|e| LiftError::InvalidRecord {
        index,
        reason: e.to_string(),
    })
}

/// Stored entries in file order, as written.
pub fn parse_entries(raw: &[JsonValue]) -> Result<Vec<WorkoutEntry>, LiftError> {
    raw.iter()
        .enumerate()
        .map(|(index, value)| parse_entry(index, value))
        .collect()
}

/// Type a single raw record; `index` is its position in the input array.
pub fn parse_record(index: usize, raw: &JsonValue) -> Result<WorkoutRecord, LiftError> {
    let entry = parse_entry(index, raw)?;

    let exercise = normalize_exercise(&entry.exercise);
    if exercise.is_empty() {
        return Err(LiftError::InvalidRecord {
            index,
            reason: "exercise name is empty".into(),
        });
    }
    if !entry.weight.is_finite() || entry.weight < 0.0 {
        return Err(LiftError::InvalidRecord {
            index,
            reason: format!("weight {} must be a non-negative number", entry.weight),
        });
    }
    let date = parse_date(&entry.date).ok_or_else(|| LiftError::DateParse {
        index,
        value: entry.date.clone(),
    })?;

    Ok(WorkoutRecord {
        exercise,
        date,
        weight: entry.weight,
        reps: entry.reps,
        volume: entry.weight * entry.reps as f64,
    })
}

/// Type every record, keeping file order.
pub fn type_records(raw: &[JsonValue]) -> Result<Vec<WorkoutRecord>, LiftError> {
    raw.iter()
        .enumerate()
        .map(|(index, value)| parse_record(index, value))
        .collect()
}

/// Type, sort (stable, by date) and index the exercises of a raw log.
pub fn normalize(raw: &[JsonValue]) -> Result<WorkoutLog, LiftError> {
    let mut records = type_records(raw)?;
    records.sort_by_key(|r| r.date);

    let mut exercises: Vec<String> = Vec::new();
    for record in &records {
        if !exercises.contains(&record.exercise) {
            exercises.push(record.exercise.clone());
        }
    }

    Ok(WorkoutLog { records, exercises })
}

pub fn normalize_exercise(label: &str) -> String {
    label.trim().to_lowercase()
}

/// Uppercase the first character and lowercase the rest ("bench press" -> "Bench press").
pub fn display_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => format!("{}{}", first.to_uppercase(), chars.as_str().to_lowercase()),
        None => String::new(),
    }
}

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: [&str; 8] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%Y%m%d",
];

/// Parse ISO-8601 dates and datetimes plus a few unambiguous written forms.
/// Offset-qualified timestamps are converted to UTC; `YYYY-MM` and `YYYY`
/// mean the first day of that month or year.
pub fn parse_date(text: &str) -> Option<NaiveDateTime> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt);
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .or_else(|| parse_reduced_precision(trimmed))
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn parse_reduced_precision(text: &str) -> Option<NaiveDate> {
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    let (year, month) = match text.split_once('-') {
        Some((year, month)) if month.len() == 2 && all_digits(month) => {
            (year, month.parse().ok()?)
        }
        Some(_) => return None,
        None => (text, 1),
    };
    if year.len() != 4 || !all_digits(year) {
        return None;
    }
    NaiveDate::from_ymd_opt(year.parse().ok()?, month, 1)
}

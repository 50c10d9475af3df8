use super::{display_name, epley_1rm, WorkoutLog};

#[derive(Clone, Debug, PartialEq)]
pub struct ExerciseSummary {
    pub exercise: String,
    pub entries: usize,
    pub max_weight: f64,
    pub total_volume: f64,
    pub best_estimated_1rm: f64,
}

impl ExerciseSummary {
    pub fn display_name(&self) -> String {
        display_name(&self.exercise)
    }
}

#[derive(Clone, Debug, Default)]
pub struct Summary {
    pub exercises: Vec<ExerciseSummary>,
    pub total_volume: f64,
}

/// Aggregate a normalized log, one block per exercise in the log's order.
pub fn summarize(log: &WorkoutLog) -> Summary {
    let exercises = log
        .exercises
        .iter()
        .map(|name| {
            let mut entries = 0usize;
            let mut max_weight = f64::NEG_INFINITY;
            let mut total_volume = 0.0;
            let mut best_estimated_1rm = f64::NEG_INFINITY;
            for record in log.records_for(name) {
                entries += 1;
                max_weight = max_weight.max(record.weight);
                total_volume += record.volume;
                best_estimated_1rm = best_estimated_1rm.max(epley_1rm(record.weight, record.reps));
            }
            ExerciseSummary {
                exercise: name.clone(),
                entries,
                max_weight,
                total_volume,
                best_estimated_1rm,
            }
        })
        .collect();

    let total_volume = log.records.iter().map(|r| r.volume).sum();

    Summary {
        exercises,
        total_volume,
    }
}

/// Plain-text summary: one block per exercise followed by the overall total.
/// Lines are joined with `\n` and the text has no trailing newline.
pub fn render_summary_text(summary: &Summary, unit: &str) -> String {
    let mut lines = Vec::with_capacity(summary.exercises.len() * 5 + 1);
    for ex in &summary.exercises {
        lines.push(format!("{}:", ex.display_name()));
        lines.push(format!("  - Entries: {}", ex.entries));
        lines.push(format!("  - Max Weight: {:.1} {}", ex.max_weight, unit));
        lines.push(format!("  - Total Volume: {:.1} {}", ex.total_volume, unit));
        lines.push(String::new());
    }
    lines.push(format!(
        "Overall total volume: {:.1} {}",
        summary.total_volume, unit
    ));
    lines.join("\n")
}

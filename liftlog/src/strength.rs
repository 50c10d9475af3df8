//! Strength estimates derived from logged sets.

use super::{Summary, WorkoutEntry};

/// Epley one-rep max estimate. Singles (and zero-rep entries) return the weight itself.
pub fn epley_1rm(weight: f64, reps: u32) -> f64 {
    if reps <= 1 {
        weight
    } else {
        weight * (1.0 + reps as f64 / 30.0)
    }
}

/// Per-set estimate table, entries printed as stored, followed by the best
/// estimate for each normalized exercise.
pub fn render_stats_text(entries: &[WorkoutEntry], summary: &Summary, unit: &str) -> String {
    let mut out = String::from("Stats Calculation\n");
    for r in entries {
        out.push_str(&format!(
            "{}  |  {}  | {} {} x {} reps -> est. 1RM: {:.0} {}\n",
            r.date,
            r.exercise,
            r.weight,
            unit,
            r.reps,
            epley_1rm(r.weight, r.reps).round(),
            unit
        ));
    }
    if !summary.exercises.is_empty() {
        out.push_str("\nBest estimated 1RM:\n");
        for ex in &summary.exercises {
            out.push_str(&format!(
                "  - {}: {:.0} {}\n",
                ex.display_name(),
                ex.best_estimated_1rm.round(),
                unit
            ));
        }
    }
    out
}

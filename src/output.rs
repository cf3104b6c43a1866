//! Text summary, JSON debug dump and CSV export of the computed averages.

use anyhow::Result;
use chrono::{DateTime, Utc};
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::File;
use tracing::{debug, info};

use crate::stats::{StudentAverageMap, SubjectAverageMap, class_average, top_students};

/// Number of students listed in the ranking.
pub const TOP_N: usize = 5;

const RULE_WIDTH: usize = 50;

#[derive(Debug, Serialize, PartialEq)]
pub struct RankedStudent {
    pub rank: usize,
    pub name: String,
    pub average: f64,
}

/// Everything the printed summary shows.
#[derive(Debug, Serialize, PartialEq)]
pub struct Summary {
    pub top: Vec<RankedStudent>,
    pub subjects: Vec<(String, f64)>,
    pub class_average: f64,
}

impl Summary {
    pub fn build(student_avg: &StudentAverageMap, subject_avg: &SubjectAverageMap) -> Self {
        let top = top_students(student_avg, TOP_N)
            .into_iter()
            .enumerate()
            .map(|(i, (name, average))| RankedStudent {
                rank: i + 1,
                name: name.to_string(),
                average,
            })
            .collect();

        Summary {
            top,
            subjects: subject_avg
                .iter()
                .map(|(s, avg)| (s.to_string(), avg))
                .collect(),
            class_average: class_average(student_avg),
        }
    }
}

/// `math` -> `Math`, `SCIENCE` -> `Science`.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Renders the ranked summary block, two decimals throughout.
pub fn render_summary(summary: &Summary) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();

    out.push_str(&format!("\n{rule}\n"));
    out.push_str("Student Performance Summary\n");
    out.push_str(&format!("{rule}\n"));

    out.push_str("\nTop Students:\n");
    for s in &summary.top {
        out.push_str(&format!("{}. {} - {:.2}\n", s.rank, s.name, s.average));
    }

    out.push_str("\nSubject Averages:\n");
    for (subject, avg) in &summary.subjects {
        out.push_str(&format!("{}: {:.2}\n", capitalize(subject), avg));
    }

    out.push_str(&format!("\nClass Average: {:.2}\n", summary.class_average));
    out.push_str(&format!("{rule}\n"));
    out
}

/// Logs the summary as pretty-printed JSON at debug level.
pub fn print_json(summary: &Summary) -> Result<()> {
    debug!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}

/// One row of the per-student CSV export.
#[derive(Debug, Serialize)]
pub struct ExportRow<'a> {
    pub generated_at: DateTime<Utc>,
    pub name: &'a str,
    pub average: f64,
    pub rank: usize,
    pub source: &'a str,
}

/// Writes every student's average and overall rank to `path`, replacing it.
pub fn export_csv(path: &str, student_avg: &StudentAverageMap, source: &str) -> Result<()> {
    let generated_at = Utc::now();
    let ranked = top_students(student_avg, student_avg.len());

    let file = File::create(path)?;
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(file);

    for (i, (name, average)) in ranked.into_iter().enumerate() {
        writer.serialize(ExportRow {
            generated_at,
            name,
            average,
            rank: i + 1,
            source,
        })?;
    }
    writer.flush()?;

    info!(path, rows = student_avg.len(), "Exported student averages");
    Ok(())
}

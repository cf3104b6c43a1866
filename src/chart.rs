//! The four-panel score dashboard, rendered with `plotters`.
//!
//! Layout, left to right and top to bottom:
//! student averages, subject averages, score histogram, and per-student
//! subject scores as grouped bars.

use anyhow::{Result, anyhow};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;
use std::process::Command;
use tracing::{debug, info};

use crate::record::StudentRecord;
use crate::stats::{StudentAverageMap, SubjectAverageMap};

/// File the dashboard is written to when no path is configured.
pub const DEFAULT_CHART_PATH: &str = "student_scores_analysis.png";

pub const HISTOGRAM_BINS: usize = 15;

/// Width of one bar in the grouped chart, in student-index units.
pub const GROUP_BAR_WIDTH: f64 = 0.25;

const CANVAS: (u32, u32) = (1500, 1100);
const TITLE: &str = "Student Score Analysis";
const FONT: &str = "sans-serif";

/// One histogram bucket covering `[start, end)`; the last one is closed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Splits `values` into `bins` equal-width buckets spanning their min..max.
///
/// If every value is equal the range is widened to `v - 0.5 .. v + 0.5`.
pub fn histogram_bins(values: &[f64], bins: usize) -> Vec<Bin> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let (lo, hi) = if min == max {
        (min - 0.5, max + 0.5)
    } else {
        (min, max)
    };
    let width = (hi - lo) / bins as f64;

    let mut counts = vec![0usize; bins];
    for &v in values {
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| Bin {
            start: lo + i as f64 * width,
            end: lo + (i + 1) as f64 * width,
            count,
        })
        .collect()
}

/// Every individual score, record by record.
pub fn all_scores(records: &[StudentRecord]) -> Vec<f64> {
    records
        .iter()
        .flat_map(|r| r.scores.iter().map(|s| s.score))
        .collect()
}

/// One bar of the grouped chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupedBar {
    pub student: usize,
    pub subject: usize,
    pub center: f64,
    pub score: f64,
}

/// Lays out one bar per (student, subject), `GROUP_BAR_WIDTH` apart.
///
/// Student `i`'s group is centred on `x = i`, so subject `j` of `k` sits at
/// `i + (j - (k - 1) / 2) * GROUP_BAR_WIDTH`. Missing scores leave a gap.
pub fn grouped_bars(records: &[StudentRecord], subjects: &[&str]) -> Vec<GroupedBar> {
    let shift = subjects.len().saturating_sub(1) as f64 / 2.0;
    let mut bars = Vec::with_capacity(records.len() * subjects.len());
    for (j, subject) in subjects.iter().enumerate() {
        for (i, record) in records.iter().enumerate() {
            if let Some(score) = record.score(subject) {
                bars.push(GroupedBar {
                    student: i,
                    subject: j,
                    center: i as f64 + (j as f64 - shift) * GROUP_BAR_WIDTH,
                    score,
                });
            }
        }
    }
    bars
}

/// Label for an axis tick at `x`: the group at that whole index, else blank.
fn label_at(labels: &[String], x: f64) -> String {
    let nearest = x.round();
    if nearest < 0.0 || (x - nearest).abs() > 1e-6 {
        return String::new();
    }
    labels.get(nearest as usize).cloned().unwrap_or_default()
}

fn segment_label(labels: &[String], v: &SegmentValue<usize>) -> String {
    match v {
        SegmentValue::CenterOf(i) => labels.get(*i).cloned().unwrap_or_default(),
        _ => String::new(),
    }
}

/// Renders the dashboard to `path` as PNG, replacing any existing file.
pub fn visualize(
    student_avg: &StudentAverageMap,
    subject_avg: &SubjectAverageMap,
    records: &[StudentRecord],
    path: &Path,
) -> Result<()> {
    let root = BitMapBackend::new(path, CANVAS).into_drawing_area();
    draw_dashboard(&root, student_avg, subject_avg, records)?;
    root.present()?;

    info!(path = %path.display(), "Chart saved");
    Ok(())
}

fn draw_dashboard<DB>(
    root: &DrawingArea<DB, Shift>,
    student_avg: &StudentAverageMap,
    subject_avg: &SubjectAverageMap,
    records: &[StudentRecord],
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;
    let body = root.titled(TITLE, (FONT, 32))?;
    let panels = body.split_evenly((2, 2));

    let students: Vec<(String, f64)> = student_avg.iter().map(|(k, v)| (k.to_string(), v)).collect();
    let subjects: Vec<(String, f64)> = subject_avg.iter().map(|(k, v)| (k.to_string(), v)).collect();

    draw_category_bars(&panels[0], "Average Score per Student", &students, true)?;
    draw_category_bars(&panels[1], "Average Score per Subject", &subjects, false)?;
    draw_histogram(&panels[2], &all_scores(records))?;

    let subject_names: Vec<&str> = subject_avg.keys().collect();
    draw_grouped_bars(&panels[3], records, &subject_names)?;
    Ok(())
}

fn draw_category_bars<DB>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    bars: &[(String, f64)],
    rotate_labels: bool,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    if bars.is_empty() {
        return Ok(());
    }

    let labels: Vec<String> = bars.iter().map(|(name, _)| name.clone()).collect();
    let y_max = bars.iter().map(|(_, v)| *v).fold(1.0, f64::max) * 1.1;

    let mut chart = ChartBuilder::on(area)
        .caption(title, (FONT, 22))
        .margin(15)
        .x_label_area_size(if rotate_labels { 110 } else { 40 })
        .y_label_area_size(50)
        .build_cartesian_2d((0..bars.len()).into_segmented(), 0.0..y_max)?;

    // FontTransform only has right-angle rotations, so 45 degrees becomes 90
    let label_font = if rotate_labels {
        (FONT, 13).into_font().transform(FontTransform::Rotate90)
    } else {
        (FONT, 13).into_font()
    };

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(bars.len())
        .x_label_style(label_font)
        .x_label_formatter(&|v| segment_label(&labels, v))
        .y_label_formatter(&|y| format!("{:.0}", y))
        .draw()?;

    chart.draw_series(
        Histogram::vertical(&chart)
            .style(BLUE.mix(0.7).filled())
            .margin(8)
            .data(bars.iter().enumerate().map(|(i, (_, v))| (i, *v))),
    )?;

    Ok(())
}

fn draw_histogram<DB>(area: &DrawingArea<DB, Shift>, scores: &[f64]) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let bins = histogram_bins(scores, HISTOGRAM_BINS);
    let (Some(first), Some(last)) = (bins.first(), bins.last()) else {
        return Ok(());
    };
    let y_max = bins.iter().map(|b| b.count).max().unwrap_or(0) as f64 + 1.0;

    let mut chart = ChartBuilder::on(area)
        .caption("Score Distribution", (FONT, 22))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(first.start..last.end, 0.0..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Score")
        .y_desc("Count")
        .x_label_formatter(&|x| format!("{:.0}", x))
        .y_label_formatter(&|y| format!("{:.0}", y))
        .draw()?;

    chart.draw_series(bins.iter().map(|b| {
        Rectangle::new([(b.start, 0.0), (b.end, b.count as f64)], BLUE.mix(0.7).filled())
    }))?;
    chart.draw_series(
        bins.iter()
            .map(|b| Rectangle::new([(b.start, 0.0), (b.end, b.count as f64)], BLACK.stroke_width(1))),
    )?;

    Ok(())
}

fn draw_grouped_bars<DB>(
    area: &DrawingArea<DB, Shift>,
    records: &[StudentRecord],
    subjects: &[&str],
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    if records.is_empty() || subjects.is_empty() {
        return Ok(());
    }

    let bars = grouped_bars(records, subjects);
    let labels: Vec<String> = records.iter().map(|r| r.first_name().to_string()).collect();

    let x_min = -0.5;
    let x_max = records.len() as f64 - 0.5;
    let half = GROUP_BAR_WIDTH / 2.0;
    let y_max = bars.iter().map(|b| b.score).fold(1.0, f64::max) * 1.15;

    let mut chart = ChartBuilder::on(area)
        .caption("Subject Scores by Student", (FONT, 22))
        .margin(15)
        .x_label_area_size(70)
        .y_label_area_size(50)
        .build_cartesian_2d(x_min..x_max, 0.0..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(records.len())
        .x_label_style((FONT, 13).into_font().transform(FontTransform::Rotate90))
        .x_label_formatter(&|x| label_at(&labels, *x))
        .y_label_formatter(&|y| format!("{:.0}", y))
        .draw()?;

    for (j, subject) in subjects.iter().enumerate() {
        let color = Palette99::pick(j).mix(0.9);
        chart
            .draw_series(bars.iter().filter(|b| b.subject == j).map(|b| {
                Rectangle::new([(b.center - half, 0.0), (b.center + half, b.score)], color.filled())
            }))?
            .label(*subject)
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.filled()));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    Ok(())
}

fn viewer_command(path: &Path) -> Command {
    let mut cmd = if cfg!(target_os = "macos") {
        Command::new("open")
    } else if cfg!(target_os = "windows") {
        let mut c = Command::new("cmd");
        c.args(["/C", "start", ""]);
        c
    } else {
        Command::new("xdg-open")
    };
    cmd.arg(path);
    cmd
}

/// Opens `path` in the platform's default image viewer.
///
/// Fails on headless systems without a viewer; callers decide how loud to be.
pub fn open_viewer(path: &Path) -> Result<()> {
    debug!(path = %path.display(), "Opening chart viewer");
    let status = viewer_command(path).status()?;
    if !status.success() {
        return Err(anyhow!("image viewer exited with {status}"));
    }
    Ok(())
}

//! End-to-end pipeline: fetch, average, summarise, chart.

use anyhow::Result;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::chart::{self, DEFAULT_CHART_PATH};
use crate::error::ScoreError;
use crate::fetch::{DEFAULT_URL, HttpClient, ScoreSource, fetch_scores};
use crate::output::{self, Summary, render_summary};
use crate::record::{StudentRecord, SubjectSchema};
use crate::stats::{self, StudentAverageMap, SubjectAverageMap};

/// Settings for one [`Analyzer`] run.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    pub url: String,
    pub schema: SubjectSchema,
    pub chart_path: PathBuf,
    pub export_path: Option<String>,
    /// Open the saved chart in an image viewer.
    pub show: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            schema: SubjectSchema::Discover,
            chart_path: PathBuf::from(DEFAULT_CHART_PATH),
            export_path: None,
            show: true,
        }
    }
}

pub struct Analyzer<C> {
    client: C,
    config: AnalyzerConfig,
}

impl<C: HttpClient> Analyzer<C> {
    pub fn new(client: C, config: AnalyzerConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Fetches records from `source_url`, or the configured URL when `None`.
    /// Falls back to the sample set on any failure.
    pub async fn fetch(&self, source_url: Option<&str>) -> ScoreSource {
        let url = source_url.unwrap_or(&self.config.url);
        fetch_scores(&self.client, url, &self.config.schema).await
    }

    pub fn compute_averages(
        &self,
        records: &[StudentRecord],
    ) -> Result<(StudentAverageMap, SubjectAverageMap), ScoreError> {
        stats::compute_averages(records)
    }

    pub fn print_summary(&self, student_avg: &StudentAverageMap, subject_avg: &SubjectAverageMap) {
        let summary = Summary::build(student_avg, subject_avg);
        println!("{}", render_summary(&summary));
        if let Err(e) = output::print_json(&summary) {
            warn!(error = %e, "Could not serialize summary");
        }
    }

    /// Saves the dashboard, then opens it unless viewing is disabled.
    /// Viewer failures are logged only.
    pub fn visualize(
        &self,
        student_avg: &StudentAverageMap,
        subject_avg: &SubjectAverageMap,
        records: &[StudentRecord],
    ) -> Result<()> {
        chart::visualize(student_avg, subject_avg, records, &self.config.chart_path)?;

        if self.config.show {
            if let Err(e) = chart::open_viewer(&self.config.chart_path) {
                warn!(error = %e, "Could not open chart viewer");
            }
        }
        Ok(())
    }

    /// Runs the whole pipeline once and returns the records it used.
    #[tracing::instrument(skip(self), fields(url = %self.config.url))]
    pub async fn run(&self) -> Result<ScoreSource> {
        let source = self.fetch(None).await;
        let records = source.records();

        let (student_avg, subject_avg) = self.compute_averages(records)?;
        info!(
            students = student_avg.len(),
            subjects = subject_avg.len(),
            source = source.label(),
            "Averages computed"
        );

        self.print_summary(&student_avg, &subject_avg);

        if let Some(path) = &self.config.export_path {
            output::export_csv(path, &student_avg, source.label())?;
        }

        self.visualize(&student_avg, &subject_avg, records)?;
        Ok(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::BasicClient;
    use crate::sample::sample_records;
    use std::time::Duration;

    fn offline_analyzer() -> Analyzer<BasicClient> {
        let client = BasicClient::with_timeout(Duration::from_secs(2));
        let config = AnalyzerConfig {
            url: "http://127.0.0.1:1/scores".to_string(),
            show: false,
            ..Default::default()
        };
        Analyzer::new(client, config)
    }

    #[test]
    fn test_default_config() {
        let config = AnalyzerConfig::default();
        assert_eq!(config.url, DEFAULT_URL);
        assert_eq!(config.chart_path, PathBuf::from("student_scores_analysis.png"));
        assert!(config.show);
        assert!(config.export_path.is_none());
    }

    #[tokio::test]
    async fn test_fetch_unreachable_uses_sample() {
        let analyzer = offline_analyzer();
        let source = analyzer.fetch(None).await;
        assert!(source.is_fallback());
        assert_eq!(source.records(), sample_records().as_slice());
    }

    #[tokio::test]
    async fn test_fetch_override_url() {
        let analyzer = offline_analyzer();
        let source = analyzer.fetch(Some("http://127.0.0.1:1/other")).await;
        assert!(source.is_fallback());
    }

    #[test]
    fn test_compute_and_print() {
        let analyzer = offline_analyzer();
        let (students, subjects) = analyzer.compute_averages(&sample_records()).unwrap();
        analyzer.print_summary(&students, &subjects);
        assert_eq!(subjects.len(), 3);
    }

    #[test]
    fn test_visualize_writes_configured_path() {
        let chart_path = std::env::temp_dir().join("student_scores_test_analyzer.png");
        let _ = std::fs::remove_file(&chart_path);

        let config = AnalyzerConfig {
            chart_path: chart_path.clone(),
            show: false,
            ..Default::default()
        };
        let analyzer = Analyzer::new(BasicClient::default(), config);
        assert_eq!(analyzer.config().chart_path, chart_path);
        assert!(!analyzer.config().show);

        let records = sample_records();
        let (students, subjects) = analyzer.compute_averages(&records).unwrap();
        analyzer.visualize(&students, &subjects, &records).unwrap();

        assert!(std::fs::metadata(&chart_path).unwrap().len() > 0);
        std::fs::remove_file(&chart_path).unwrap();
    }
}

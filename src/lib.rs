pub mod analyzer;
pub mod chart;
pub mod error;
pub mod fetch;
pub mod output;
pub mod parser;
pub mod record;
pub mod sample;
pub mod stats;

pub use analyzer::{Analyzer, AnalyzerConfig};
pub use error::ScoreError;
pub use fetch::ScoreSource;
pub use record::{StudentRecord, SubjectSchema, SubjectScore};

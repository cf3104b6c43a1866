//! Typed student records and the subject schema they are validated against.

use serde::Serialize;

/// One subject score inside a [`StudentRecord`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectScore {
    pub subject: String,
    pub score: f64,
}

/// A student's display name and their scores, in source key order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentRecord {
    pub name: String,
    pub scores: Vec<SubjectScore>,
}

impl StudentRecord {
    /// Builds a record from `(subject, score)` pairs.
    pub fn new<S: Into<String>>(name: S, scores: &[(&str, f64)]) -> Self {
        Self {
            name: name.into(),
            scores: scores
                .iter()
                .map(|(subject, score)| SubjectScore {
                    subject: (*subject).to_string(),
                    score: *score,
                })
                .collect(),
        }
    }

    pub fn score(&self, subject: &str) -> Option<f64> {
        self.scores
            .iter()
            .find(|s| s.subject == subject)
            .map(|s| s.score)
    }

    /// First whitespace-separated token of the name, used for compact labels.
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }
}

/// Which keys of an incoming record count as subjects.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SubjectSchema {
    /// Every key except `name` is a subject.
    #[default]
    Discover,
    /// Only the listed subjects are accepted; anything else is rejected.
    Declared(Vec<String>),
}

impl SubjectSchema {
    /// Parses a comma-separated list such as `math,science,english`.
    /// An empty list means [`SubjectSchema::Discover`].
    pub fn from_list(list: &str) -> Self {
        let subjects: Vec<String> = list
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        if subjects.is_empty() {
            SubjectSchema::Discover
        } else {
            SubjectSchema::Declared(subjects)
        }
    }

    pub fn accepts(&self, subject: &str) -> bool {
        match self {
            SubjectSchema::Discover => true,
            SubjectSchema::Declared(subjects) => subjects.iter().any(|s| s == subject),
        }
    }
}

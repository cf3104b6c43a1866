//! Per-student and per-subject averages, ranking and class average.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::ScoreError;
use crate::record::StudentRecord;

/// Insertion-ordered `name -> value` map.
///
/// Inserting an existing key replaces its value but keeps its position, so
/// two students sharing a name collide into one entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AverageMap {
    entries: Vec<(String, f64)>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

/// Student name to mean of that student's scores.
pub type StudentAverageMap = AverageMap;
/// Subject name to mean of that subject across all students.
pub type SubjectAverageMap = AverageMap;

impl AverageMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &str, value: f64) {
        match self.index.get(key) {
            Some(&i) => self.entries[i].1 = value,
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), value));
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.index.get(key).map(|&i| self.entries[i].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> Vec<f64> {
        self.entries.iter().map(|(_, v)| *v).collect()
    }
}

/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Averages every record, and every subject across records.
///
/// Subjects are collected in first-appearance order.
///
/// # Errors
///
/// [`ScoreError::InvalidInput`] if `records` is empty or any record has no
/// subject scores.
pub fn compute_averages(
    records: &[StudentRecord],
) -> Result<(StudentAverageMap, SubjectAverageMap), ScoreError> {
    if records.is_empty() {
        return Err(ScoreError::invalid("no student records to average"));
    }

    let mut student_avg = AverageMap::new();
    let mut subject_order: Vec<&str> = Vec::new();
    let mut subject_series: HashMap<&str, Vec<f64>> = HashMap::new();

    for record in records {
        if record.scores.is_empty() {
            return Err(ScoreError::invalid(format!(
                "student {:?} has no subject scores",
                record.name
            )));
        }

        let scores: Vec<f64> = record.scores.iter().map(|s| s.score).collect();
        student_avg.insert(&record.name, mean(&scores));

        for s in &record.scores {
            subject_series
                .entry(s.subject.as_str())
                .or_insert_with(|| {
                    subject_order.push(s.subject.as_str());
                    Vec::new()
                })
                .push(s.score);
        }
    }

    let mut subject_avg = AverageMap::new();
    for subject in subject_order {
        subject_avg.insert(subject, mean(&subject_series[subject]));
    }

    Ok((student_avg, subject_avg))
}

/// Returns the `n` best students by descending average.
///
/// The sort is stable, so on equal averages the earlier student ranks first.
pub fn top_students(student_avg: &StudentAverageMap, n: usize) -> Vec<(&str, f64)> {
    let mut ranked: Vec<(&str, f64)> = student_avg.iter().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.truncate(n);
    ranked
}

/// Mean of the per-student averages, not of the raw scores.
pub fn class_average(student_avg: &StudentAverageMap) -> f64 {
    mean(&student_avg.values())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::sample_records;

    fn round2(v: f64) -> f64 {
        (v * 100.0).round() / 100.0
    }

    #[test]
    fn test_mean_empty() {
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn test_mean_values() {
        assert_eq!(mean(&[1.0, 2.0, 3.0]), 2.0);
    }

    #[test]
    fn test_sample_averages() {
        let (students, subjects) = compute_averages(&sample_records()).unwrap();

        assert_eq!(students.len(), 10);
        assert_eq!(round2(students.get("Alice Johnson").unwrap()), 88.33);
        assert!((students.get("Alice Johnson").unwrap() - 265.0 / 3.0).abs() < 1e-9);

        assert_eq!(subjects.keys().collect::<Vec<_>>(), ["math", "science", "english"]);
        assert!((subjects.get("math").unwrap() - 84.6).abs() < 1e-9);
    }

    #[test]
    fn test_single_record_single_subject() {
        let records = vec![StudentRecord::new("Solo Student", &[("math", 73.5)])];
        let (students, subjects) = compute_averages(&records).unwrap();

        assert_eq!(students.get("Solo Student"), Some(73.5));
        assert_eq!(subjects.get("math"), Some(73.5));
    }

    #[test]
    fn test_empty_input_is_rejected() {
        let result = compute_averages(&[]);
        assert!(matches!(result, Err(ScoreError::InvalidInput(_))));
    }

    #[test]
    fn test_record_without_subjects_is_rejected() {
        let records = vec![
            StudentRecord::new("Alice", &[("math", 80.0)]),
            StudentRecord::new("Nobody", &[]),
        ];
        let result = compute_averages(&records);
        assert!(matches!(result, Err(ScoreError::InvalidInput(_))));
    }

    #[test]
    fn test_subjects_discovered_dynamically() {
        let records = vec![
            StudentRecord::new("A", &[("math", 80.0)]),
            StudentRecord::new("B", &[("art", 60.0), ("math", 90.0)]),
        ];
        let (students, subjects) = compute_averages(&records).unwrap();

        assert_eq!(subjects.keys().collect::<Vec<_>>(), ["math", "art"]);
        assert_eq!(subjects.get("math"), Some(85.0));
        assert_eq!(subjects.get("art"), Some(60.0));
        assert_eq!(students.get("B"), Some(75.0));
    }

    #[test]
    fn test_duplicate_names_collide() {
        let records = vec![
            StudentRecord::new("Sam", &[("math", 50.0)]),
            StudentRecord::new("Kim", &[("math", 70.0)]),
            StudentRecord::new("Sam", &[("math", 90.0)]),
        ];
        let (students, subjects) = compute_averages(&records).unwrap();

        assert_eq!(students.len(), 2);
        assert_eq!(students.keys().collect::<Vec<_>>(), ["Sam", "Kim"]);
        assert_eq!(students.get("Sam"), Some(90.0));
        // subject averages still see every record
        assert_eq!(subjects.get("math"), Some(70.0));
    }

    #[test]
    fn test_compute_is_deterministic() {
        let records = sample_records();
        let first = compute_averages(&records).unwrap();
        let second = compute_averages(&records).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_top_students_order() {
        let (students, _) = compute_averages(&sample_records()).unwrap();
        let top = top_students(&students, 5);

        // Alice, Carol, David and Grace all sit at 265 / 3
        let names: Vec<_> = top.iter().map(|(n, _)| *n).collect();
        assert_eq!(
            names,
            ["Emma Davis", "Iris Taylor", "Alice Johnson", "Carol Williams", "David Brown"]
        );
    }

    #[test]
    fn test_top_students_ties_keep_input_order() {
        let mut students = AverageMap::new();
        students.insert("First", 80.0);
        students.insert("Best", 95.0);
        students.insert("Second", 80.0);
        students.insert("Third", 80.0);

        let top = top_students(&students, 3);
        assert_eq!(top, vec![("Best", 95.0), ("First", 80.0), ("Second", 80.0)]);
    }

    #[test]
    fn test_top_students_fewer_than_n() {
        let mut students = AverageMap::new();
        students.insert("Only", 42.0);
        assert_eq!(top_students(&students, 5).len(), 1);
    }

    #[test]
    fn test_class_average_is_mean_of_student_averages() {
        // unequal subject counts make the two means differ
        let records = vec![
            StudentRecord::new("A", &[("math", 100.0)]),
            StudentRecord::new("B", &[("math", 0.0), ("art", 0.0), ("music", 60.0)]),
        ];
        let (students, _) = compute_averages(&records).unwrap();

        let expected = (100.0 + 20.0) / 2.0;
        assert!((class_average(&students) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_class_average_sample() {
        let (students, _) = compute_averages(&sample_records()).unwrap();
        let expected = students.values().iter().sum::<f64>() / 10.0;
        assert!((class_average(&students) - expected).abs() < 1e-9);
    }
}

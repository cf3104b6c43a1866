//! Built-in records used when the remote source cannot be read.

use crate::record::StudentRecord;

const SAMPLE: &[(&str, f64, f64, f64)] = &[
    ("Alice Johnson", 85.0, 92.0, 88.0),
    ("Bob Smith", 78.0, 85.0, 90.0),
    ("Carol Williams", 92.0, 88.0, 85.0),
    ("David Brown", 88.0, 90.0, 87.0),
    ("Emma Davis", 95.0, 93.0, 91.0),
    ("Frank Miller", 72.0, 78.0, 82.0),
    ("Grace Wilson", 89.0, 86.0, 90.0),
    ("Henry Moore", 81.0, 84.0, 79.0),
    ("Iris Taylor", 90.0, 91.0, 88.0),
    ("Jack Anderson", 76.0, 80.0, 85.0),
];

/// The fixed 10-student fallback set with `math`, `science` and `english`.
pub fn sample_records() -> Vec<StudentRecord> {
    SAMPLE
        .iter()
        .map(|&(name, math, science, english)| {
            StudentRecord::new(
                name,
                &[("math", math), ("science", science), ("english", english)],
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_has_ten_students() {
        let records = sample_records();
        assert_eq!(records.len(), 10);
        assert_eq!(records[0].name, "Alice Johnson");
        assert_eq!(records[9].name, "Jack Anderson");
    }

    #[test]
    fn test_sample_subject_order() {
        for r in sample_records() {
            let subjects: Vec<_> = r.scores.iter().map(|s| s.subject.as_str()).collect();
            assert_eq!(subjects, ["math", "science", "english"]);
        }
    }
}

use student_scores::chart::{HISTOGRAM_BINS, all_scores, histogram_bins};
use student_scores::output::{Summary, render_summary};
use student_scores::parser::parse_records;
use student_scores::sample::sample_records;
use student_scores::stats::{class_average, compute_averages, mean, top_students};
use student_scores::SubjectSchema;

#[test]
fn test_full_pipeline_on_sample() {
    let records = sample_records();
    let (students, subjects) = compute_averages(&records).expect("sample data is valid");

    assert_eq!(format!("{:.2}", students.get("Alice Johnson").unwrap()), "88.33");
    assert_eq!(format!("{:.2}", subjects.get("math").unwrap()), "84.60");

    let summary = Summary::build(&students, &subjects);
    let text = render_summary(&summary);
    assert!(text.contains("Top Students:"));
    assert!(text.contains("English: "));

    let bins = histogram_bins(&all_scores(&records), HISTOGRAM_BINS);
    assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 30);
}

#[test]
fn test_pipeline_from_json_payload() {
    let payload = br#"[
        {"name": "Ada Byron", "math": 100, "physics": 90},
        {"name": "Alan Turing", "math": 95, "physics": 95},
        {"name": "Grace Hopper", "math": 90, "physics": 100}
    ]"#;
    let records = parse_records(payload, &SubjectSchema::Discover).expect("valid payload");
    let (students, subjects) = compute_averages(&records).unwrap();

    // all three tie at 95, input order wins
    let top: Vec<_> = top_students(&students, 5).into_iter().map(|(n, _)| n).collect();
    assert_eq!(top, ["Ada Byron", "Alan Turing", "Grace Hopper"]);

    assert_eq!(subjects.get("math"), Some(95.0));
    assert_eq!(subjects.get("physics"), Some(95.0));
}

#[test]
fn test_class_average_matches_student_map() {
    let (students, _) = compute_averages(&sample_records()).unwrap();
    let direct = mean(&students.values());
    assert!((class_average(&students) - direct).abs() < 1e-9);
}

//! JSON parser for student score payloads.

use serde_json::Value;

use crate::error::ScoreError;
use crate::record::{StudentRecord, SubjectSchema, SubjectScore};

/// Decodes a JSON array of flat objects into validated [`StudentRecord`]s.
///
/// Each object needs a string `name` and at least one numeric subject field.
/// Subject order follows the key order of the object.
///
/// # Errors
///
/// Returns [`ScoreError::Json`] if the bytes are not JSON, and
/// [`ScoreError::InvalidInput`] if the payload is not an array of objects or
/// any record breaks the rules above or the `schema`.
pub fn parse_records(bytes: &[u8], schema: &SubjectSchema) -> Result<Vec<StudentRecord>, ScoreError> {
    let json: Value = serde_json::from_slice(bytes)?;

    let Value::Array(items) = json else {
        return Err(ScoreError::invalid("expected a JSON array of student objects"));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| parse_record(i, item, schema))
        .collect()
}

fn parse_record(index: usize, item: Value, schema: &SubjectSchema) -> Result<StudentRecord, ScoreError> {
    let Value::Object(fields) = item else {
        return Err(ScoreError::invalid(format!("record {index} is not an object")));
    };

    let name = match fields.get("name") {
        Some(Value::String(name)) => name.clone(),
        Some(_) => return Err(ScoreError::invalid(format!("record {index}: name is not a string"))),
        None => return Err(ScoreError::invalid(format!("record {index}: missing name"))),
    };

    let mut scores = Vec::with_capacity(fields.len().saturating_sub(1));
    for (key, value) in fields {
        if key == "name" {
            continue;
        }
        if !schema.accepts(&key) {
            return Err(ScoreError::invalid(format!(
                "record {index} ({name}): undeclared subject {key:?}"
            )));
        }
        let score = value
            .as_f64()
            .filter(|v| v.is_finite())
            .ok_or_else(|| {
                ScoreError::invalid(format!("record {index} ({name}): {key} is not a number"))
            })?;
        scores.push(SubjectScore { subject: key, score });
    }

    if scores.is_empty() {
        return Err(ScoreError::invalid(format!("record {index} ({name}) has no subjects")));
    }

    Ok(StudentRecord { name, scores })
}

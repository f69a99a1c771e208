//! Job Result Normalizer
//!
//! Maps a raw provider job object onto [`JobRecord`]. Total over any JSON
//! input: absent fields are the common case, not an error.

use serde_json::Value;

use crate::model::{JobRecord, NOT_AVAILABLE};

/// Provider key for each canonical field
const TITLE_KEY: &str = "title";
const COMPANY_KEY: &str = "company_name";
const LOCATION_KEY: &str = "location";
const APPLY_LINK_KEY: &str = "apply_link";

pub fn normalize_job(raw: &Value) -> JobRecord {
    JobRecord {
        title: field(raw, TITLE_KEY),
        company: field(raw, COMPANY_KEY),
        location: field(raw, LOCATION_KEY),
        apply_link: field(raw, APPLY_LINK_KEY),
    }
}

pub fn normalize_jobs(raw: &[Value]) -> Vec<JobRecord> {
    raw.iter().map(normalize_job).collect()
}

fn field(raw: &Value, key: &str) -> String {
    match raw.get(key) {
        None | Some(Value::Null) => NOT_AVAILABLE.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn missing_fields_become_sentinel() {
        let job = normalize_job(&json!({"title": "X"}));
        assert_eq!(
            serde_json::to_value(&job).unwrap(),
            json!({"title": "X", "company": "N/A", "location": "N/A", "apply_link": "N/A"})
        );
    }

    #[test]
    fn company_comes_from_company_name() {
        let job = normalize_job(&json!({
            "title": "Backend Developer",
            "company_name": "Initech",
            "company": "ignored",
            "location": "Berlin",
            "apply_link": "https://initech.example/jobs/1",
            "salary": "80k"
        }));
        assert_eq!(job.company, "Initech");
        assert_eq!(job.apply_link, "https://initech.example/jobs/1");
    }

    #[test]
    fn null_and_non_string_values() {
        let job = normalize_job(&json!({"title": null, "location": 42}));
        assert_eq!(job.title, NOT_AVAILABLE);
        assert_eq!(job.location, "42");
    }

    #[test]
    fn non_object_input_is_all_sentinel() {
        let job = normalize_job(&json!("just a string"));
        assert_eq!(job, JobRecord::new("N/A", "N/A", "N/A", "N/A"));
        assert_eq!(normalize_jobs(&[json!([]), json!(null)]).len(), 2);
    }
}

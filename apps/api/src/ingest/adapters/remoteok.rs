//! RemoteOK — bare array; the first element is a legal notice with no id.

use serde_json::Value;

use crate::ingest::adapters::SourceAdapter;
use crate::ingest::fields::{
    coerce_number, infer_remote_type, namespaced_id, normalize_date, str_field,
};
use crate::ingest::RowError;
use crate::models::job::{NormalizedJob, RemoteType};

pub struct RemoteOkAdapter;

impl SourceAdapter for RemoteOkAdapter {
    fn slug(&self) -> &'static str {
        "remoteok"
    }

    fn feed_url(&self) -> &'static str {
        "https://remoteok.com/api"
    }

    fn normalize_row(&self, row: &Value) -> Result<NormalizedJob, RowError> {
        if !row.is_object() {
            return Err(RowError::NotAnObject);
        }
        let raw_id = str_field(row, &["id"]).ok_or(RowError::MissingId)?;
        let title = str_field(row, &["position", "title"]).ok_or(RowError::MissingTitle)?;
        let external_url = str_field(row, &["apply_url", "url"])
            .unwrap_or_else(|| format!("https://remoteok.com/remote-jobs/{raw_id}"));
        let external_id =
            namespaced_id(self.slug(), &[Some(raw_id.as_str())]).ok_or(RowError::MissingId)?;
        let location = str_field(row, &["location"]);

        // Every RemoteOK listing is remote by definition of the board.
        let remote_type = infer_remote_type(Some(RemoteType::Remote), location.as_deref());

        let posted_date = normalize_date(row.get("date")).or_else(|| normalize_date(row.get("epoch")));

        Ok(NormalizedJob {
            source_slug: self.slug().to_string(),
            external_id,
            title,
            company: str_field(row, &["company"]),
            location,
            employment_type: None,
            remote_type,
            posted_date,
            salary_min: coerce_number(row.get("salary_min")),
            salary_max: coerce_number(row.get("salary_max")),
            description: str_field(row, &["description"]),
            competitiveness_level: None,
            external_url,
            data_raw: row.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn test_rows_missing_title_are_dropped() {
        let raw = json!({ "jobs": [ {"id": 1, "position": "A"}, {"id": 2} ] });
        let jobs = RemoteOkAdapter.normalize(&raw).unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].external_id, "remoteok:1");
        assert_eq!(jobs[0].title, "A");
        assert_eq!(jobs[0].external_url, "https://remoteok.com/remote-jobs/1");
    }

    #[test]
    fn test_legal_notice_element_is_skipped() {
        let raw = json!([
            {"legal": "API Terms of Service"},
            {
                "id": "123",
                "position": "Senior Rust Engineer",
                "company": "Acme",
                "location": "Worldwide",
                "epoch": 1700000000,
                "salary_min": 120000,
                "salary_max": "0x",
                "url": "https://remoteok.com/remote-jobs/123",
                "apply_url": "https://acme.dev/apply"
            }
        ]);
        let jobs = RemoteOkAdapter.normalize(&raw).unwrap();
        assert_eq!(jobs.len(), 1);
        let job = &jobs[0];
        assert_eq!(job.company.as_deref(), Some("Acme"));
        assert_eq!(job.remote_type, Some(RemoteType::Remote));
        assert_eq!(job.posted_date, NaiveDate::from_ymd_opt(2023, 11, 14));
        assert_eq!(job.salary_min, Some(120000.0));
        assert_eq!(job.salary_max, None);
        assert_eq!(job.external_url, "https://acme.dev/apply");
        assert_eq!(job.data_raw["id"], json!("123"));
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let raw = json!([{"id": 9, "position": "Dev", "date": "2024-01-05T12:00:00+00:00"}]);
        let first = serde_json::to_vec(&RemoteOkAdapter.normalize(&raw).unwrap()).unwrap();
        let second = serde_json::to_vec(&RemoteOkAdapter.normalize(&raw).unwrap()).unwrap();
        assert_eq!(first, second);
    }
}

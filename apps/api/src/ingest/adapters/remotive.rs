//! Remotive — `{ "jobs": [...] }`, remote-only board.

use serde_json::Value;

use crate::ingest::adapters::SourceAdapter;
use crate::ingest::fields::{
    coerce_number, infer_remote_type, namespaced_id, normalize_date, str_field,
};
use crate::ingest::RowError;
use crate::models::job::{NormalizedJob, RemoteType};

pub struct RemotiveAdapter;

impl SourceAdapter for RemotiveAdapter {
    fn slug(&self) -> &'static str {
        "remotive"
    }

    fn feed_url(&self) -> &'static str {
        "https://remotive.com/api/remote-jobs"
    }

    fn normalize_row(&self, row: &Value) -> Result<NormalizedJob, RowError> {
        if !row.is_object() {
            return Err(RowError::NotAnObject);
        }
        let raw_id = str_field(row, &["id"]);
        let url = str_field(row, &["url"]);
        let title = str_field(row, &["title"]).ok_or(RowError::MissingTitle)?;
        let external_id = namespaced_id(self.slug(), &[raw_id.as_deref(), url.as_deref()])
            .ok_or(RowError::MissingId)?;
        let external_url = url.ok_or(RowError::MissingUrl)?;
        let location = str_field(row, &["candidate_required_location"]);

        Ok(NormalizedJob {
            source_slug: self.slug().to_string(),
            external_id,
            title,
            company: str_field(row, &["company_name"]),
            remote_type: infer_remote_type(Some(RemoteType::Remote), location.as_deref()),
            location,
            employment_type: str_field(row, &["job_type"]),
            posted_date: normalize_date(row.get("publication_date")),
            // `salary` is free text ("$80k - $100k"); only a bare number survives.
            salary_min: coerce_number(row.get("salary")),
            salary_max: None,
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
    fn test_normalizes_remotive_row() {
        let raw = json!({
            "job-count": 2,
            "jobs": [
                {
                    "id": 1849,
                    "url": "https://remotive.com/remote-jobs/software-dev/backend-1849",
                    "title": "Backend Developer",
                    "company_name": "Globex",
                    "job_type": "full_time",
                    "publication_date": "2024-02-10T08:30:00",
                    "candidate_required_location": "USA Only",
                    "salary": "$90k - $110k",
                    "description": "<p>Go and Postgres</p>"
                },
                {"id": 1850, "title": "No URL"}
            ]
        });
        let jobs = RemotiveAdapter.normalize(&raw).unwrap();
        assert_eq!(jobs.len(), 1);
        let job = &jobs[0];
        assert_eq!(job.external_id, "remotive:1849");
        assert_eq!(job.posted_date, NaiveDate::from_ymd_opt(2024, 2, 10));
        assert_eq!(job.employment_type.as_deref(), Some("full_time"));
        assert_eq!(job.salary_min, None);
        assert_eq!(job.remote_type, Some(RemoteType::Remote));
    }

    #[test]
    fn test_missing_url_is_row_error() {
        let row = json!({"id": 3, "title": "Dev"});
        assert_eq!(RemotiveAdapter.normalize_row(&row), Err(RowError::MissingUrl));
    }
}

//! Jobicy — `{ "jobs": [...] }` with camelCase fields and annual salary bounds.

use serde_json::Value;

use crate::ingest::adapters::SourceAdapter;
use crate::ingest::fields::{
    coerce_number, infer_remote_type, joined_list, namespaced_id, normalize_date, str_field,
};
use crate::ingest::RowError;
use crate::models::job::{NormalizedJob, RemoteType};

pub struct JobicyAdapter;

impl SourceAdapter for JobicyAdapter {
    fn slug(&self) -> &'static str {
        "jobicy"
    }

    fn feed_url(&self) -> &'static str {
        "https://jobicy.com/api/v2/remote-jobs"
    }

    fn normalize_row(&self, row: &Value) -> Result<NormalizedJob, RowError> {
        if !row.is_object() {
            return Err(RowError::NotAnObject);
        }
        let raw_id = str_field(row, &["id"]);
        let url = str_field(row, &["url"]);
        let title = str_field(row, &["jobTitle", "title"]).ok_or(RowError::MissingTitle)?;
        let external_id = namespaced_id(self.slug(), &[raw_id.as_deref(), url.as_deref()])
            .ok_or(RowError::MissingId)?;
        let external_url = url.ok_or(RowError::MissingUrl)?;
        let location = str_field(row, &["jobGeo"]);

        Ok(NormalizedJob {
            source_slug: self.slug().to_string(),
            external_id,
            title,
            company: str_field(row, &["companyName"]),
            remote_type: infer_remote_type(Some(RemoteType::Remote), location.as_deref()),
            location,
            employment_type: joined_list(row.get("jobType"), ", "),
            posted_date: normalize_date(row.get("pubDate")),
            salary_min: coerce_number(row.get("annualSalaryMin")),
            salary_max: coerce_number(row.get("annualSalaryMax")),
            description: str_field(row, &["jobDescription", "jobExcerpt"]),
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
    fn test_normalizes_jobicy_row() {
        let raw = json!({
            "apiVersion": "2",
            "jobs": [{
                "id": 88012,
                "url": "https://jobicy.com/jobs/88012-platform-engineer",
                "jobTitle": "Platform Engineer",
                "companyName": "Hooli",
                "jobType": ["full-time"],
                "jobGeo": "Anywhere",
                "pubDate": "2024-04-18 09:15:00",
                "annualSalaryMin": "110000",
                "annualSalaryMax": 140000,
                "jobExcerpt": "Kubernetes and Terraform"
            }]
        });
        let jobs = JobicyAdapter.normalize(&raw).unwrap();
        let job = &jobs[0];
        assert_eq!(job.external_id, "jobicy:88012");
        assert_eq!(job.employment_type.as_deref(), Some("full-time"));
        assert_eq!(job.posted_date, NaiveDate::from_ymd_opt(2024, 4, 18));
        assert_eq!(job.salary_min, Some(110000.0));
        assert_eq!(job.salary_max, Some(140000.0));
        assert_eq!(job.description.as_deref(), Some("Kubernetes and Terraform"));
    }
}

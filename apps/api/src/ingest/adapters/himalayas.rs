//! Himalayas — `{ "jobs": [...] }`; `guid` is already a URL, `pubDate` is Unix seconds.

use serde_json::Value;

use crate::ingest::adapters::SourceAdapter;
use crate::ingest::fields::{
    coerce_number, infer_remote_type, joined_list, namespaced_id, normalize_date, str_field,
};
use crate::ingest::RowError;
use crate::models::job::{NormalizedJob, RemoteType};

pub struct HimalayasAdapter;

impl SourceAdapter for HimalayasAdapter {
    fn slug(&self) -> &'static str {
        "himalayas"
    }

    fn feed_url(&self) -> &'static str {
        "https://himalayas.app/jobs/api"
    }

    fn normalize_row(&self, row: &Value) -> Result<NormalizedJob, RowError> {
        if !row.is_object() {
            return Err(RowError::NotAnObject);
        }
        let guid = str_field(row, &["guid"]);
        let url = str_field(row, &["applicationLink", "url"]);
        let title = str_field(row, &["title"]).ok_or(RowError::MissingTitle)?;
        let external_id = namespaced_id(
            self.slug(),
            &[guid.as_deref(), url.as_deref(), Some(title.as_str())],
        )
        .ok_or(RowError::MissingId)?;
        let external_url = url.or(guid).ok_or(RowError::MissingUrl)?;
        let location = joined_list(row.get("locationRestrictions"), ", ");

        Ok(NormalizedJob {
            source_slug: self.slug().to_string(),
            external_id,
            title,
            company: str_field(row, &["companyName"]),
            remote_type: infer_remote_type(Some(RemoteType::Remote), location.as_deref()),
            location,
            employment_type: str_field(row, &["employmentType"]),
            posted_date: normalize_date(row.get("pubDate")),
            salary_min: coerce_number(row.get("minSalary")),
            salary_max: coerce_number(row.get("maxSalary")),
            description: str_field(row, &["description", "excerpt"]),
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
    fn test_guid_namespaced_and_millis_pubdate() {
        let raw = json!({
            "totalCount": 1,
            "jobs": [{
                "title": "Staff Engineer",
                "companyName": "Vandelay",
                "employmentType": "Full Time",
                "minSalary": 150000,
                "maxSalary": null,
                "locationRestrictions": ["United States", "Canada"],
                "pubDate": 1700000000000u64,
                "guid": "https://himalayas.app/companies/vandelay/jobs/staff-engineer"
            }]
        });
        let jobs = HimalayasAdapter.normalize(&raw).unwrap();
        let job = &jobs[0];
        assert_eq!(
            job.external_id,
            "himalayas:https://himalayas.app/companies/vandelay/jobs/staff-engineer"
        );
        assert_eq!(job.external_url, "https://himalayas.app/companies/vandelay/jobs/staff-engineer");
        assert_eq!(job.location.as_deref(), Some("United States, Canada"));
        assert_eq!(job.posted_date, NaiveDate::from_ymd_opt(2023, 11, 14));
        assert_eq!(job.salary_min, Some(150000.0));
        assert_eq!(job.salary_max, None);
    }
}

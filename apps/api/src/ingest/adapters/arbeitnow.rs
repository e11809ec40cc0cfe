//! Arbeitnow — `{ "data": [...] }`, slug as id, `created_at` in Unix seconds.

use serde_json::Value;

use crate::ingest::adapters::SourceAdapter;
use crate::ingest::fields::{
    infer_remote_type, joined_list, namespaced_id, normalize_date, str_field,
};
use crate::ingest::RowError;
use crate::models::job::{NormalizedJob, RemoteType};

pub struct ArbeitnowAdapter;

impl SourceAdapter for ArbeitnowAdapter {
    fn slug(&self) -> &'static str {
        "arbeitnow"
    }

    fn feed_url(&self) -> &'static str {
        "https://www.arbeitnow.com/api/job-board-api"
    }

    fn normalize_row(&self, row: &Value) -> Result<NormalizedJob, RowError> {
        if !row.is_object() {
            return Err(RowError::NotAnObject);
        }
        let slug = str_field(row, &["slug"]);
        let url = str_field(row, &["url"]);
        let title = str_field(row, &["title"]).ok_or(RowError::MissingTitle)?;
        let external_id = namespaced_id(self.slug(), &[slug.as_deref(), url.as_deref()])
            .ok_or(RowError::MissingId)?;
        let external_url = url.ok_or(RowError::MissingUrl)?;
        let location = str_field(row, &["location"]);

        let explicit = row
            .get("remote")
            .and_then(Value::as_bool)
            .filter(|remote| *remote)
            .map(|_| RemoteType::Remote);

        Ok(NormalizedJob {
            source_slug: self.slug().to_string(),
            external_id,
            title,
            company: str_field(row, &["company_name"]),
            remote_type: infer_remote_type(explicit, location.as_deref()),
            location,
            employment_type: joined_list(row.get("job_types"), ", "),
            posted_date: normalize_date(row.get("created_at")),
            salary_min: None,
            salary_max: None,
            description: str_field(row, &["description"]),
            competitiveness_level: None,
            external_url,
            data_raw: row.clone(),
        })
    }
}

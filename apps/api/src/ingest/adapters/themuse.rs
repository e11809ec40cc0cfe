//! The Muse — `{ "results": [...] }` with nested company, locations and refs.

use serde_json::Value;

use crate::ingest::adapters::SourceAdapter;
use crate::ingest::fields::{infer_remote_type, namespaced_id, normalize_date, str_field};
use crate::ingest::RowError;
use crate::models::job::NormalizedJob;

pub struct TheMuseAdapter;

impl SourceAdapter for TheMuseAdapter {
    fn slug(&self) -> &'static str {
        "themuse"
    }

    fn feed_url(&self) -> &'static str {
        "https://www.themuse.com/api/public/jobs?page=0"
    }

    fn normalize_row(&self, row: &Value) -> Result<NormalizedJob, RowError> {
        if !row.is_object() {
            return Err(RowError::NotAnObject);
        }
        let raw_id = str_field(row, &["id"]);
        let url = row
            .get("refs")
            .and_then(|refs| str_field(refs, &["landing_page"]));
        let title = str_field(row, &["name"]).ok_or(RowError::MissingTitle)?;
        let external_id = namespaced_id(self.slug(), &[raw_id.as_deref(), url.as_deref()])
            .ok_or(RowError::MissingId)?;
        let external_url = url.ok_or(RowError::MissingUrl)?;

        let locations: Vec<String> = row
            .get("locations")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(|l| str_field(l, &["name"])).collect())
            .unwrap_or_default();
        let location = (!locations.is_empty()).then(|| locations.join("; "));

        let employment_type = str_field(row, &["type"]).or_else(|| {
            row.get("levels")
                .and_then(Value::as_array)
                .and_then(|levels| levels.first())
                .and_then(|level| str_field(level, &["name"]))
        });

        Ok(NormalizedJob {
            source_slug: self.slug().to_string(),
            external_id,
            title,
            company: row.get("company").and_then(|c| str_field(c, &["name"])),
            remote_type: infer_remote_type(None, location.as_deref()),
            location,
            employment_type,
            posted_date: normalize_date(row.get("publication_date")),
            salary_min: None,
            salary_max: None,
            description: str_field(row, &["contents"]),
            competitiveness_level: None,
            external_url,
            data_raw: row.clone(),
        })
    }
}

use anyhow::{anyhow, Result};
use modsync_core::{ModId, SourceKind};
use serde_json::Value;

use crate::http::{get_checked, HttpClient};
use crate::source::{loader_excluded, version_listed, ModSource};

/// Modrinth version API. No auth; the response root is already the candidate
/// array. Some versions publish no `files` entry at all, which is why the
/// file-name accessor is fallible.
pub struct ModrinthSource {
    base_url: String,
    excluded_loaders: Vec<String>,
}

impl ModrinthSource {
    pub fn new(base_url: impl Into<String>, excluded_loaders: Vec<String>) -> Self {
        Self {
            base_url: base_url.into(),
            excluded_loaders,
        }
    }

    fn primary_file<'a>(&self, candidate: &'a Value) -> Option<&'a Value> {
        candidate.get("files").and_then(Value::as_array)?.first()
    }
}

impl ModSource for ModrinthSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Modrinth
    }

    fn fetch_candidates(&self, http: &dyn HttpClient, mod_id: &ModId) -> Result<Vec<Value>> {
        let url = format!(
            "{}/api/v1/mod/{}/version",
            self.base_url.trim_end_matches('/'),
            mod_id
        );

        let response = get_checked(http, &url, &[], &[])?;
        let payload = response.json()?;
        let versions = payload
            .as_array()
            .ok_or_else(|| anyhow!("modrinth version response is not an array"))?;
        Ok(versions.clone())
    }

    fn file_name(&self, candidate: &Value) -> Option<String> {
        self.primary_file(candidate)?
            .get("filename")
            .and_then(Value::as_str)
            .map(ToOwned::to_owned)
    }

    fn download_url(&self, candidate: &Value) -> Option<String> {
        self.primary_file(candidate)?
            .get("url")
            .and_then(Value::as_str)
            .map(ToOwned::to_owned)
    }

    fn download_count(&self, candidate: &Value) -> Option<u64> {
        candidate.get("downloads").and_then(Value::as_u64)
    }

    fn accepts(&self, candidate: &Value, game_version: &str) -> bool {
        if let Some(file_name) = self.file_name(candidate) {
            if loader_excluded(&file_name, &self.excluded_loaders) {
                return false;
            }
        }
        version_listed(candidate.get("game_versions"), game_version)
    }

    fn sort_key(&self, candidate: &Value) -> String {
        candidate
            .get("date_published")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }
}

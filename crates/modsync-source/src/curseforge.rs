use anyhow::{anyhow, Result};
use modsync_core::{ModId, SourceKind};
use serde_json::Value;

use crate::http::{get_checked, HttpClient};
use crate::source::{loader_excluded, version_listed, ModSource};

pub const MINECRAFT_GAME_ID: u64 = 432;

const PAGE_SIZE: u64 = 50;

/// CurseForge files API. Queries are scoped server-side by the numeric
/// version-type id resolved once per run.
pub struct CurseforgeSource {
    base_url: String,
    api_key: String,
    version_type_id: u64,
    excluded_loaders: Vec<String>,
}

impl CurseforgeSource {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        version_type_id: u64,
        excluded_loaders: Vec<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            version_type_id,
            excluded_loaders,
        }
    }

    fn headers(&self) -> Vec<(String, String)> {
        vec![
            ("Accept".to_string(), "application/json".to_string()),
            ("x-api-key".to_string(), self.api_key.clone()),
        ]
    }
}

/// Maps a human game version ("1.18") to the numeric version-type id the
/// files endpoint filters on. Looked up once per run; a failure here gates
/// every subsequent CurseForge query, so callers treat it as fatal.
pub fn resolve_version_type_id(
    http: &dyn HttpClient,
    base_url: &str,
    api_key: &str,
    game_version: &str,
) -> Result<u64> {
    let url = format!("{base_url}/v1/games/{MINECRAFT_GAME_ID}/version-types");
    let headers = vec![
        ("Accept".to_string(), "application/json".to_string()),
        ("x-api-key".to_string(), api_key.to_string()),
    ];

    let response = get_checked(http, &url, &headers, &[])?;
    let payload = response.json()?;
    let types = payload
        .get("data")
        .and_then(Value::as_array)
        .ok_or_else(|| anyhow!("version-types response has no data array"))?;

    let wanted = format!("Minecraft {game_version}");
    for item in types {
        if item.get("name").and_then(Value::as_str) == Some(wanted.as_str()) {
            return item
                .get("id")
                .and_then(Value::as_u64)
                .ok_or_else(|| anyhow!("version type '{wanted}' has no numeric id"));
        }
    }

    Err(anyhow!("no version type named '{wanted}'"))
}

impl ModSource for CurseforgeSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Curseforge
    }

    fn fetch_candidates(&self, http: &dyn HttpClient, mod_id: &ModId) -> Result<Vec<Value>> {
        let url = format!("{}/v1/mods/{}/files", self.base_url, mod_id);
        let query = vec![
            (
                "gameVersionTypeId".to_string(),
                self.version_type_id.to_string(),
            ),
            ("pageSize".to_string(), PAGE_SIZE.to_string()),
        ];

        let response = get_checked(http, &url, &self.headers(), &query)?;
        let payload = response.json()?;
        let data = payload
            .get("data")
            .and_then(Value::as_array)
            .ok_or_else(|| anyhow!("curseforge files response has no data array"))?;
        Ok(data.clone())
    }

    fn file_name(&self, candidate: &Value) -> Option<String> {
        candidate
            .get("fileName")
            .and_then(Value::as_str)
            .map(ToOwned::to_owned)
    }

    fn download_url(&self, candidate: &Value) -> Option<String> {
        candidate
            .get("downloadUrl")
            .and_then(Value::as_str)
            .map(ToOwned::to_owned)
    }

    fn download_count(&self, candidate: &Value) -> Option<u64> {
        candidate.get("downloadCount").and_then(Value::as_u64)
    }

    fn accepts(&self, candidate: &Value, game_version: &str) -> bool {
        if let Some(file_name) = self.file_name(candidate) {
            if loader_excluded(&file_name, &self.excluded_loaders) {
                return false;
            }
        }
        version_listed(candidate.get("gameVersions"), game_version)
    }

    fn sort_key(&self, candidate: &Value) -> String {
        candidate
            .get("fileDate")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }
}

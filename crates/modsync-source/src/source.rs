use anyhow::Result;
use modsync_core::{ModId, SourceKind};
use serde_json::Value;

use crate::curseforge::CurseforgeSource;
use crate::http::HttpClient;
use crate::modrinth::ModrinthSource;

/// One repository backend: how to query it and how to read the release
/// records it returns. Candidates stay as raw JSON values; everything the
/// resolver needs goes through these accessors.
pub trait ModSource {
    fn kind(&self) -> SourceKind;

    /// Fetches the flat candidate list for one mod. A non-success status or a
    /// response without the expected array shape is an error.
    fn fetch_candidates(&self, http: &dyn HttpClient, mod_id: &ModId) -> Result<Vec<Value>>;

    /// `None` when the candidate carries no usable file metadata; callers
    /// skip such candidates instead of failing.
    fn file_name(&self, candidate: &Value) -> Option<String>;

    fn download_url(&self, candidate: &Value) -> Option<String>;

    fn download_count(&self, candidate: &Value) -> Option<u64>;

    /// Repository acceptance rule for one candidate against the target game
    /// version.
    fn accepts(&self, candidate: &Value, game_version: &str) -> bool;

    /// Descending sort key, typically an ISO-8601 timestamp.
    fn sort_key(&self, candidate: &Value) -> String;
}

/// Stable descending sort by the adapter's key; candidates with equal keys
/// keep their fetch order, so the default selection is reproducible.
pub fn sort_candidates_descending(source: &dyn ModSource, candidates: &mut [Value]) {
    candidates.sort_by(|a, b| source.sort_key(b).cmp(&source.sort_key(a)));
}

/// Both adapters for a run, dispatched by the reference's declared source
/// kind.
pub struct SourceSet {
    curseforge: CurseforgeSource,
    modrinth: ModrinthSource,
}

impl SourceSet {
    pub fn new(curseforge: CurseforgeSource, modrinth: ModrinthSource) -> Self {
        Self {
            curseforge,
            modrinth,
        }
    }

    pub fn for_kind(&self, kind: SourceKind) -> &dyn ModSource {
        match kind {
            SourceKind::Curseforge => &self.curseforge,
            SourceKind::Modrinth => &self.modrinth,
        }
    }
}

/// The one version-matching rule both adapters share: the target version must
/// appear in the candidate's declared list, either exactly or as the base of
/// a point release ("1.18" accepts "1.18" and "1.18.2", not "1.18-rc1").
pub(crate) fn version_listed(versions: Option<&Value>, game_version: &str) -> bool {
    let Some(list) = versions.and_then(Value::as_array) else {
        return false;
    };

    let point_release_prefix = format!("{game_version}.");
    list.iter()
        .filter_map(Value::as_str)
        .any(|declared| declared == game_version || declared.starts_with(&point_release_prefix))
}

/// Loader exclusion by case-insensitive file-name substring.
pub(crate) fn loader_excluded(file_name: &str, excluded_loaders: &[String]) -> bool {
    let lowered = file_name.to_lowercase();
    excluded_loaders
        .iter()
        .any(|marker| !marker.is_empty() && lowered.contains(&marker.to_lowercase()))
}

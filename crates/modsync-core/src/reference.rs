use std::fmt;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Curseforge,
    Modrinth,
}

impl SourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Curseforge => "curseforge",
            Self::Modrinth => "modrinth",
        }
    }
}

/// Repository-side identifier for a mod. CurseForge ids are numeric, Modrinth
/// accepts both numeric ids and string slugs, so both shapes round-trip.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ModId {
    Numeric(u64),
    Slug(String),
}

impl fmt::Display for ModId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(id) => write!(f, "{id}"),
            Self::Slug(slug) => write!(f, "{slug}"),
        }
    }
}

/// One declared mod: which repository hosts it, its id there, and the
/// directory its artifact lands in relative to the install root.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModRef {
    pub name: String,
    pub source: SourceKind,
    pub mod_id: ModId,
    pub output_dir: String,
}

/// Parses the reference list and sorts it by name, case-insensitively, so
/// prompts and the written modlist come out in a stable, reviewable order.
pub fn parse_mod_refs(input: &str) -> Result<Vec<ModRef>> {
    let mut refs: Vec<ModRef> =
        serde_json::from_str(input).context("failed to parse mod reference list")?;
    for mod_ref in &refs {
        if mod_ref.name.trim().is_empty() {
            return Err(anyhow!("mod reference has an empty name"));
        }
        if mod_ref.output_dir.trim().is_empty() {
            return Err(anyhow!("mod reference '{}' has an empty output_dir", mod_ref.name));
        }
    }
    refs.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    Ok(refs)
}

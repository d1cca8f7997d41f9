use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use serde_json::Serializer;

use crate::reference::ModId;

/// One resolved mod as persisted in the modlist. The source discriminator is
/// stripped: by this point the download URL says everything the installer
/// needs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModEntry {
    pub name: String,
    pub mod_id: ModId,
    pub output_dir: String,
    pub file_name: String,
    pub download_url: String,
}

pub fn parse_modlist(input: &str) -> Result<Vec<ModEntry>> {
    serde_json::from_str(input).context("failed to parse modlist")
}

/// Renders the modlist as a JSON array with 4-space indentation, the format
/// the hosted copy is published in.
pub fn render_modlist(entries: &[ModEntry]) -> Result<String> {
    let mut out = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = Serializer::with_formatter(&mut out, formatter);
    serde::Serialize::serialize(entries, &mut serializer)
        .context("failed to serialize modlist")?;
    let mut text = String::from_utf8(out).context("serialized modlist is not valid UTF-8")?;
    text.push('\n');
    Ok(text)
}

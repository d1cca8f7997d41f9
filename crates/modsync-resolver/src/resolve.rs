use std::io::BufRead;
use std::path::Path;

use anyhow::{anyhow, Result};
use modsync_core::{installed_file_name, ModEntry, ModRef};
use modsync_source::{sort_candidates_descending, HttpClient, ModSource};
use serde_json::Value;

use crate::prompt::read_index;

/// Outcome of resolving one mod reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(ModEntry),
    /// No candidate survived filtering. The mod is left out of the modlist
    /// and the run continues.
    Skipped { reason: String },
}

/// Picks exactly one release for `mod_ref`, prompting only when neither the
/// already-installed fast path nor the single-candidate path applies.
pub fn resolve(
    source: &dyn ModSource,
    http: &dyn HttpClient,
    mod_ref: &ModRef,
    game_version: &str,
    install_dir: Option<&Path>,
    max_entries: usize,
    input: &mut dyn BufRead,
) -> Result<Resolution> {
    let fetched = source.fetch_candidates(http, &mod_ref.mod_id)?;

    // Candidates without usable file metadata are dropped up front, so a list
    // of only such candidates behaves exactly like an empty one.
    let mut candidates: Vec<Value> = fetched
        .into_iter()
        .filter(|candidate| source.file_name(candidate).is_some())
        .filter(|candidate| source.accepts(candidate, game_version))
        .collect();

    if candidates.is_empty() {
        return Ok(Resolution::Skipped {
            reason: format!("no release supports {game_version}"),
        });
    }

    sort_candidates_descending(source, &mut candidates);

    let installed = install_dir
        .and_then(|dir| installed_file_name(&dir.join(&mod_ref.output_dir), &mod_ref.name));

    let chosen = select_candidate(
        source,
        mod_ref,
        &candidates,
        installed.as_deref(),
        max_entries,
        input,
    )?;

    let file_name = source
        .file_name(chosen)
        .ok_or_else(|| anyhow!("chosen release of '{}' has no file name", mod_ref.name))?;
    let download_url = source.download_url(chosen).unwrap_or_default();

    Ok(Resolution::Resolved(ModEntry {
        name: mod_ref.name.clone(),
        mod_id: mod_ref.mod_id.clone(),
        output_dir: mod_ref.output_dir.clone(),
        file_name,
        download_url,
    }))
}

fn select_candidate<'a>(
    source: &dyn ModSource,
    mod_ref: &ModRef,
    candidates: &'a [Value],
    installed: Option<&str>,
    max_entries: usize,
    input: &mut dyn BufRead,
) -> Result<&'a Value> {
    // Repeat runs usually find the top-ranked release already on disk;
    // file-name equality decides, never object identity.
    if let Some(installed) = installed {
        if source.file_name(&candidates[0]).as_deref() == Some(installed) {
            return Ok(&candidates[0]);
        }
    }

    if candidates.len() == 1 {
        return Ok(&candidates[0]);
    }

    println!(
        "\nChoose a release for '{}' ({}):",
        mod_ref.name,
        source.kind().as_str()
    );
    for (index, candidate) in candidates.iter().take(max_entries).enumerate() {
        let Some(file_name) = source.file_name(candidate) else {
            continue;
        };
        let downloads = source
            .download_count(candidate)
            .map(|count| format!("  ({count} downloads)"))
            .unwrap_or_default();
        let current = if Some(file_name.as_str()) == installed {
            "  CURRENT"
        } else {
            ""
        };
        println!("\t{index}: {file_name}{downloads}{current}");
    }

    let choice = read_index(input)?;
    if choice >= candidates.len() {
        return Err(anyhow!(
            "selection {choice} for '{}' is out of range (0..{})",
            mod_ref.name,
            candidates.len()
        ));
    }
    Ok(&candidates[choice])
}

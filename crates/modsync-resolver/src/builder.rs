use std::io::BufRead;
use std::path::Path;

use anyhow::{anyhow, Result};
use modsync_core::{ModEntry, ModRef};
use modsync_source::{HttpClient, SourceSet};

use crate::resolve::{resolve, Resolution};

/// Resolves every reference in name order and collects the successful
/// entries. Per-mod failures are reported on stderr and skipped; an entry
/// with an empty download URL aborts the whole build, because a modlist row
/// the installer can never fetch is an adapter bug, not a per-mod condition.
pub fn build_modlist(
    refs: &[ModRef],
    sources: &SourceSet,
    http: &dyn HttpClient,
    game_version: &str,
    install_dir: Option<&Path>,
    max_entries: usize,
    input: &mut dyn BufRead,
) -> Result<Vec<ModEntry>> {
    let mut ordered: Vec<&ModRef> = refs.iter().collect();
    ordered.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

    let mut entries = Vec::new();
    for mod_ref in ordered {
        let source = sources.for_kind(mod_ref.source);
        match resolve(
            source,
            http,
            mod_ref,
            game_version,
            install_dir,
            max_entries,
            input,
        ) {
            Ok(Resolution::Resolved(entry)) => {
                if entry.download_url.is_empty() {
                    return Err(anyhow!(
                        "resolved entry for '{}' has an empty download URL; refusing to write an uninstallable modlist",
                        entry.name
                    ));
                }
                entries.push(entry);
            }
            Ok(Resolution::Skipped { reason }) => {
                eprintln!("skipping {}: {reason}", mod_ref.name);
            }
            Err(err) => {
                eprintln!("skipping {}: {err:#}", mod_ref.name);
            }
        }
    }

    Ok(entries)
}

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use modsync_core::{owned_artifact_name, parse_modlist, ModEntry};
use modsync_source::{get_checked, HttpClient};

/// Where a modlist comes from: the file on disk or the hosted raw-file copy.
#[derive(Debug, Clone)]
pub struct ModlistSource {
    pub local: PathBuf,
    pub remote: Option<String>,
}

impl ModlistSource {
    /// Loads the modlist. A remote fetch failure is fatal to the apply run;
    /// there is nothing sensible to reconcile against.
    pub fn load(&self, http: &dyn HttpClient, local_only: bool) -> Result<Vec<ModEntry>> {
        if local_only || self.remote.is_none() {
            let raw = fs::read_to_string(&self.local)
                .with_context(|| format!("failed to read modlist: {}", self.local.display()))?;
            return parse_modlist(&raw);
        }

        let remote = self.remote.as_deref().unwrap_or_default();
        let response = get_checked(http, remote, &[], &[])
            .with_context(|| format!("could not fetch remote modlist: {remote}"))?;
        let raw =
            std::str::from_utf8(&response.body).context("remote modlist is not valid UTF-8")?;
        parse_modlist(raw)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStatus {
    Downloaded,
    UpToDate,
    Failed,
}

#[derive(Debug, Clone)]
pub struct AppliedEntry {
    pub name: String,
    pub path: PathBuf,
    pub status: EntryStatus,
}

#[derive(Debug)]
pub struct ApplyReport {
    pub entries: Vec<AppliedEntry>,
    /// Exact paths confirmed present; the retain set for reconciliation.
    pub confirmed: BTreeSet<PathBuf>,
    pub removed: Vec<PathBuf>,
}

/// Brings the install directory in line with the modlist: downloads what is
/// missing, then deletes every managed-area file the modlist no longer names.
/// A per-entry download failure is reported through `observer` and skipped;
/// the rest of the run continues.
pub fn apply(
    entries: &[ModEntry],
    install_dir: &Path,
    http: &dyn HttpClient,
    observer: &mut dyn FnMut(&AppliedEntry),
) -> Result<ApplyReport> {
    let mut confirmed = BTreeSet::new();
    let mut applied = Vec::new();

    for entry in entries {
        let output_dir = install_dir.join(&entry.output_dir);
        fs::create_dir_all(&output_dir)
            .with_context(|| format!("failed to create {}", output_dir.display()))?;

        let artifact_path = output_dir.join(owned_artifact_name(&entry.name, &entry.file_name));

        // Exact-name match is the whole delta check: a changed upstream file
        // name is what triggers a re-download.
        let status = if artifact_path.exists() {
            EntryStatus::UpToDate
        } else {
            match download_artifact(http, &entry.download_url, &artifact_path) {
                Ok(()) => EntryStatus::Downloaded,
                Err(err) => {
                    eprintln!("download failed for {}: {err:#}", entry.name);
                    EntryStatus::Failed
                }
            }
        };

        if status != EntryStatus::Failed {
            confirmed.insert(artifact_path.clone());
        }

        let applied_entry = AppliedEntry {
            name: entry.name.clone(),
            path: artifact_path,
            status,
        };
        observer(&applied_entry);
        applied.push(applied_entry);
    }

    let output_dirs: BTreeSet<&str> = entries
        .iter()
        .map(|entry| entry.output_dir.as_str())
        .collect();

    let mut removed = Vec::new();
    for dir in output_dirs {
        removed.extend(reconcile_dir(&install_dir.join(dir), &confirmed)?);
    }

    Ok(ApplyReport {
        entries: applied,
        confirmed,
        removed,
    })
}

fn download_artifact(http: &dyn HttpClient, url: &str, artifact_path: &Path) -> Result<()> {
    let response = get_checked(http, url, &[], &[])?;
    fs::write(artifact_path, &response.body)
        .with_context(|| format!("failed to write {}", artifact_path.display()))?;
    Ok(())
}

/// Deletes every file under `root` that is not in the retain set, then prunes
/// directories the deletions emptied. Deepest paths go first, so a cleared
/// child directory is gone before its parent is examined.
fn reconcile_dir(root: &Path, retain: &BTreeSet<PathBuf>) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Ok(Vec::new());
    }

    let mut paths = Vec::new();
    collect_paths(root, &mut paths)?;
    paths.sort();
    paths.reverse();

    let mut removed = Vec::new();
    for path in paths {
        if path.is_dir() {
            let is_empty = fs::read_dir(&path)
                .with_context(|| format!("failed to read {}", path.display()))?
                .next()
                .is_none();
            if is_empty {
                fs::remove_dir(&path)
                    .with_context(|| format!("failed to remove {}", path.display()))?;
            }
            continue;
        }

        if retain.contains(&path) {
            continue;
        }

        fs::remove_file(&path)
            .with_context(|| format!("failed to remove {}", path.display()))?;
        removed.push(path);
    }

    Ok(removed)
}

fn collect_paths(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    for entry in
        fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            out.push(path.clone());
            collect_paths(&path, out)?;
        } else {
            out.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests;

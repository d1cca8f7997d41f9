use std::fs;
use std::path::Path;

/// Managed artifacts are named `[<mod name>]<origin file name>`. The bracketed
/// prefix is the only mapping from an installed file back to its owning mod,
/// both for current-version detection and for reconciliation.
pub fn owned_artifact_name(name: &str, file_name: &str) -> String {
    format!("[{name}]{file_name}")
}

/// Splits a managed file name back into `(mod name, origin file name)`.
pub fn parse_owned_artifact(file_name: &str) -> Option<(&str, &str)> {
    let rest = file_name.strip_prefix('[')?;
    let (name, origin) = rest.split_once(']')?;
    if name.is_empty() {
        return None;
    }
    Some((name, origin))
}

/// Looks for a file in `dir` whose name contains the `[name]` marker and
/// returns the origin file name after the marker. The first match in sorted
/// order wins, keeping detection deterministic when stale duplicates linger.
pub fn installed_file_name(dir: &Path, name: &str) -> Option<String> {
    let marker = format!("[{name}]");
    let entries = fs::read_dir(dir).ok()?;

    let mut matches: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter_map(|file_name| {
            file_name
                .find(&marker)
                .map(|at| file_name[at + marker.len()..].to_string())
        })
        .collect();

    matches.sort();
    matches.into_iter().next()
}

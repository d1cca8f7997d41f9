use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

/// Run-wide configuration, loaded once at startup and passed by reference.
/// A missing config file means defaults; a malformed one is an error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    pub curseforge_base_url: String,
    pub modrinth_base_url: String,
    /// File holding the CurseForge API key, read and trimmed on demand.
    pub api_key_file: PathBuf,
    /// Raw-file host the published modlist is fetched from.
    pub repo_base_url: String,
    pub branch: String,
    /// Upper bound on candidates shown per interactive prompt.
    pub max_entries: usize,
    /// Mod-loader markers that disqualify a release by file-name substring.
    pub excluded_loaders: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            curseforge_base_url: "https://api.curseforge.com".to_string(),
            modrinth_base_url: "https://api.modrinth.com".to_string(),
            api_key_file: PathBuf::from("curseforge_api_key.txt"),
            repo_base_url: String::new(),
            branch: "main".to_string(),
            max_entries: 8,
            excluded_loaders: vec!["forge".to_string()],
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("failed to read config: {}", path.display()));
            }
        };

        toml::from_str(&raw).with_context(|| format!("failed to parse config: {}", path.display()))
    }

    pub fn load_api_key(&self) -> Result<String> {
        let raw = fs::read_to_string(&self.api_key_file).with_context(|| {
            format!(
                "failed to read curseforge api key: {}",
                self.api_key_file.display()
            )
        })?;

        let key = raw.trim().to_string();
        if key.is_empty() {
            return Err(anyhow!(
                "curseforge api key file is empty: {}",
                self.api_key_file.display()
            ));
        }
        Ok(key)
    }

    /// Local path of the modlist for one game version, relative to `root`.
    pub fn local_modlist_path(&self, root: &Path, game_version: &str) -> PathBuf {
        root.join("versions").join(game_version).join("modlist.json")
    }

    /// Hosted raw-file URL of the same modlist, keyed by branch and version.
    pub fn remote_modlist_url(&self, branch: &str, game_version: &str) -> Result<String> {
        if self.repo_base_url.trim().is_empty() {
            return Err(anyhow!(
                "repo_base_url is not configured; use --local or set it in the config file"
            ));
        }
        Ok(format!(
            "{}/{}/versions/{}/modlist.json",
            self.repo_base_url.trim_end_matches('/'),
            branch,
            game_version
        ))
    }
}

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use modsync_core::{parse_mod_refs, render_modlist, AppConfig};
use modsync_installer::{apply, AppliedEntry, EntryStatus, ModlistSource};
use modsync_resolver::build_modlist;
use modsync_source::{
    resolve_version_type_id, CurseforgeSource, ModrinthSource, ReqwestClient, SourceSet,
};

use crate::render::{apply_progress, current_output_style, print_detail, print_status};

pub fn run_update(
    config_path: &Path,
    game_version: &str,
    install_dir: Option<&Path>,
    refs_path: &Path,
    out: Option<&Path>,
    verbose: bool,
) -> Result<()> {
    let style = current_output_style();
    let config = AppConfig::load(config_path)?;

    if let Some(install_dir) = install_dir {
        validate_install_dir(install_dir)?;
    }

    let raw_refs = fs::read_to_string(refs_path)
        .with_context(|| format!("failed to read mod references: {}", refs_path.display()))?;
    let refs = parse_mod_refs(&raw_refs)?;

    let http = ReqwestClient::new()?;
    let api_key = config.load_api_key()?;

    if verbose {
        print_detail(style, &format!("resolving version-type id for {game_version}"));
    }
    let version_type_id = resolve_version_type_id(
        &http,
        &config.curseforge_base_url,
        &api_key,
        game_version,
    )
    .context("could not resolve the curseforge version-type id")?;

    let sources = SourceSet::new(
        CurseforgeSource::new(
            config.curseforge_base_url.clone(),
            api_key,
            version_type_id,
            config.excluded_loaders.clone(),
        ),
        ModrinthSource::new(
            config.modrinth_base_url.clone(),
            config.excluded_loaders.clone(),
        ),
    );

    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let entries = build_modlist(
        &refs,
        &sources,
        &http,
        game_version,
        install_dir,
        config.max_entries,
        &mut input,
    )?;

    let out_path = match out {
        Some(path) => path.to_path_buf(),
        None => config.local_modlist_path(Path::new("."), game_version),
    };
    if let Some(parent) = out_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(&out_path, render_modlist(&entries)?)
        .with_context(|| format!("failed to write modlist: {}", out_path.display()))?;

    print_status(
        style,
        "updated",
        &format!("{} entries written to {}", entries.len(), out_path.display()),
    );
    Ok(())
}

pub fn run_apply(
    config_path: &Path,
    game_version: &str,
    install_dir: &Path,
    local_only: bool,
    branch: Option<&str>,
    verbose: bool,
) -> Result<()> {
    let style = current_output_style();
    let config = AppConfig::load(config_path)?;
    validate_install_dir(install_dir)?;

    let http = ReqwestClient::new()?;
    let modlist = modlist_source(&config, game_version, local_only, branch)?;
    let entries = modlist.load(&http, local_only)?;

    let progress = apply_progress(style, entries.len() as u64);
    let mut report_line = |applied: &AppliedEntry| {
        if let Some(progress) = &progress {
            progress.inc(1);
        }
        if verbose {
            let status = match applied.status {
                EntryStatus::Downloaded => "downloaded",
                EntryStatus::UpToDate => "up to date",
                EntryStatus::Failed => "failed",
            };
            print_detail(style, &format!("{}: {status}", applied.name));
        }
    };

    let report = apply(&entries, install_dir, &http, &mut report_line)?;
    if let Some(progress) = progress {
        progress.finish_and_clear();
    }

    let downloaded = count_status(&report.entries, EntryStatus::Downloaded);
    let up_to_date = count_status(&report.entries, EntryStatus::UpToDate);
    let failed = count_status(&report.entries, EntryStatus::Failed);

    print_status(
        style,
        "applied",
        &format!(
            "{downloaded} downloaded, {up_to_date} up to date, {failed} failed, {} removed",
            report.removed.len()
        ),
    );
    if verbose {
        for path in &report.removed {
            print_detail(style, &format!("removed {}", path.display()));
        }
    }

    if failed > 0 {
        return Err(anyhow!("{failed} artifact download(s) failed"));
    }
    Ok(())
}

pub(crate) fn modlist_source(
    config: &AppConfig,
    game_version: &str,
    local_only: bool,
    branch: Option<&str>,
) -> Result<ModlistSource> {
    let local = config.local_modlist_path(Path::new("."), game_version);
    let remote = if local_only {
        None
    } else {
        let branch = branch.unwrap_or(&config.branch);
        Some(config.remote_modlist_url(branch, game_version)?)
    };
    Ok(ModlistSource { local, remote })
}

pub(crate) fn validate_install_dir(install_dir: &Path) -> Result<()> {
    if !install_dir.is_dir() {
        return Err(anyhow!(
            "install directory does not exist: {}",
            install_dir.display()
        ));
    }
    Ok(())
}

fn count_status(entries: &[AppliedEntry], status: EntryStatus) -> usize {
    entries
        .iter()
        .filter(|applied| applied.status == status)
        .count()
}

use std::path::PathBuf;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

mod flows;
mod render;


#[derive(Parser, Debug)]
#[command(name = "modsync")]
#[command(
    about = "Resolves a mod reference list into a versioned modlist and keeps an install directory in sync",
    long_about = None
)]
struct Cli {
    /// Path to the modsync config file.
    #[arg(long, default_value = "modsync.toml")]
    config: PathBuf,
    /// Print per-step diagnostics.
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Interactively pick one release per mod and write the modlist.
    Update {
        /// Target game version, e.g. "1.18".
        game_version: String,
        /// Install directory used to detect already-installed releases.
        #[arg(long)]
        install_dir: Option<PathBuf>,
        /// JSON file declaring the mods to resolve.
        #[arg(long, default_value = "mod_refs.json")]
        refs: PathBuf,
        /// Where to write the modlist; defaults to versions/<version>/modlist.json.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Download missing artifacts and delete everything the modlist no longer names.
    Apply {
        /// Target game version, e.g. "1.18".
        game_version: String,
        /// Install directory to reconcile; must exist.
        install_dir: PathBuf,
        /// Use the local modlist instead of fetching the hosted copy.
        #[arg(long)]
        local: bool,
        /// Remote branch the hosted modlist is fetched from.
        #[arg(long)]
        branch: Option<String>,
    },
    /// Print shell completions.
    Completions { shell: Shell },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Update {
            game_version,
            install_dir,
            refs,
            out,
        } => flows::run_update(
            &cli.config,
            &game_version,
            install_dir.as_deref(),
            &refs,
            out.as_deref(),
            cli.verbose,
        ),
        Commands::Apply {
            game_version,
            install_dir,
            local,
            branch,
        } => flows::run_apply(
            &cli.config,
            &game_version,
            &install_dir,
            local,
            branch.as_deref(),
            cli.verbose,
        ),
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "modsync",
                &mut std::io::stdout(),
            );
            Ok(())
        }
    }
}

mod config;
mod modlist;
mod naming;
mod reference;

pub use config::AppConfig;
pub use modlist::{parse_modlist, render_modlist, ModEntry};
pub use naming::{installed_file_name, owned_artifact_name, parse_owned_artifact};
pub use reference::{parse_mod_refs, ModId, ModRef, SourceKind};

mod curseforge;
mod http;
mod modrinth;
mod source;

pub use curseforge::{resolve_version_type_id, CurseforgeSource, MINECRAFT_GAME_ID};
pub use http::{get_checked, HttpClient, HttpResponse, ReqwestClient};
pub use modrinth::ModrinthSource;
pub use source::{sort_candidates_descending, ModSource, SourceSet};

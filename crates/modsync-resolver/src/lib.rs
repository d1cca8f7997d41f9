mod builder;
mod prompt;
mod resolve;

pub use builder::build_modlist;
pub use resolve::{resolve, Resolution};

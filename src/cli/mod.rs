pub mod commands;

pub use commands::{Cli, version_info};

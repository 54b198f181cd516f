//! One module per subcommand.

pub mod completions;
pub mod config;
pub mod r#gen;
pub mod init;
pub mod list;
pub mod new;

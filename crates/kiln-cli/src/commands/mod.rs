//! Command handlers, one module per subcommand.

pub mod completions;
pub mod config;
pub mod create_app;
pub mod init;
pub mod materialize;

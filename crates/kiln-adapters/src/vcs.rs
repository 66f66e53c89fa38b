//! Git adapter for the `VersionControl` port.

use std::path::Path;
use std::process::Command;

use kiln_core::{
    application::{ApplicationError, ports::VersionControl},
    error::KilnResult,
};
use tracing::{debug, instrument};

/// Shells out to the `git` executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitCli {
    program: String,
}

impl GitCli {
    pub fn new() -> Self {
        Self {
            program: "git".into(),
        }
    }

    /// Use a specific git binary.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn run(&self, root: &Path, args: &[&str]) -> KilnResult<()> {
        let command = format!("{} {}", self.program, args.join(" "));
        debug!(command = %command, "Running");

        let output = Command::new(&self.program)
            .args(args)
            .current_dir(root)
            .output()
            .map_err(|e| ApplicationError::ExternalCommand {
                command: command.clone(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(ApplicationError::ExternalCommand {
                command,
                reason: format!(
                    "exited with {}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            }
            .into());
        }
        Ok(())
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new()
    }
}

impl VersionControl for GitCli {
    #[instrument(skip(self), fields(root = %root.display()))]
    fn init_repository(&self, root: &Path, message: &str) -> KilnResult<()> {
        self.run(root, &["init"])?;
        self.run(root, &["add", "."])?;
        self.run(root, &["commit", "-m", message])
    }
}

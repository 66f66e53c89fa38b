//! Base module creators.
//!
//! The scaffold generator never writes the framework's own application
//! skeleton; it asks one of these to do it.

use std::path::Path;
use std::process::Command;

use kiln_core::{
    application::{ApplicationError, ports::{BaseModuleCreator, Filesystem}},
    domain::MODULE_MARKER,
    error::KilnResult,
};
use tracing::{debug, info};

/// Writes the standard application skeleton itself, through a `Filesystem`.
#[derive(Debug, Clone)]
pub struct BuiltinModuleCreator<F> {
    filesystem: F,
}

impl<F: Filesystem> BuiltinModuleCreator<F> {
    pub fn new(filesystem: F) -> Self {
        Self { filesystem }
    }

    fn files(name: &str) -> Vec<(&'static str, String)> {
        let config_class = format!("{}Config", camel_case(name));
        vec![
            (MODULE_MARKER, String::new()),
            (
                "admin.py",
                "from django.contrib import admin\n\n# Register your models here.\n".into(),
            ),
            (
                "apps.py",
                format!(
                    "from django.apps import AppConfig\n\n\n\
                     class {config_class}(AppConfig):\n    \
                     default_auto_field = \"django.db.models.BigAutoField\"\n    \
                     name = \"{name}\"\n"
                ),
            ),
            (
                "models.py",
                "from django.db import models\n\n# Create your models here.\n".into(),
            ),
            (
                "tests.py",
                "from django.test import TestCase\n\n# Create your tests here.\n".into(),
            ),
            (
                "views.py",
                "from django.shortcuts import render\n\n# Create your views here.\n".into(),
            ),
        ]
    }
}

impl<F: Filesystem> BaseModuleCreator for BuiltinModuleCreator<F> {
    fn create(&self, dir: &Path, name: &str) -> KilnResult<()> {
        let module_dir = dir.join(name);
        if self.filesystem.exists(&module_dir) {
            return Err(ApplicationError::BaseModuleFailed {
                module: name.to_string(),
                reason: format!("{} already exists", module_dir.display()),
            }
            .into());
        }

        let migrations = module_dir.join("migrations");
        self.filesystem.create_dir_all(&migrations)?;
        self.filesystem
            .write_file(&migrations.join(MODULE_MARKER), "")?;

        for (file, content) in Self::files(name) {
            self.filesystem.write_file(&module_dir.join(file), &content)?;
        }

        debug!(path = %module_dir.display(), "Base module written");
        Ok(())
    }
}

/// Runs an external command such as `python manage.py startapp`.
///
/// The module name is appended as the last argument and the command runs
/// inside the target directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandModuleCreator {
    program: String,
    args: Vec<String>,
}

impl CommandModuleCreator {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Build from a full argument vector; `None` when empty.
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self::new(program.clone(), args.to_vec()))
    }

    fn display(&self, name: &str) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .chain(std::iter::once(name))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl BaseModuleCreator for CommandModuleCreator {
    fn create(&self, dir: &Path, name: &str) -> KilnResult<()> {
        let command = self.display(name);
        info!(command = %command, cwd = %dir.display(), "Running base module command");

        let failed = |reason: String| ApplicationError::BaseModuleFailed {
            module: name.to_string(),
            reason,
        };

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(name)
            .current_dir(dir)
            .output()
            .map_err(|e| failed(format!("could not run `{command}`: {e}")))?;

        if !output.stdout.is_empty() {
            debug!(stdout = %String::from_utf8_lossy(&output.stdout).trim_end(), "command output");
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(failed(format!(
                "`{command}` exited with {}: {}",
                output.status,
                stderr.trim()
            ))
            .into());
        }

        Ok(())
    }
}

/// `order_items` -> `OrderItems`
fn camel_case(name: &str) -> String {
    name.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            chars
                .next()
                .map(|first| first.to_uppercase().chain(chars).collect::<String>())
                .unwrap_or_default()
        })
        .collect()
}

//! Implementation of the `kiln create-ddd-app` command.

use std::path::PathBuf;

use tracing::{info, instrument};

use kiln_adapters::{BuiltinModuleCreator, CommandModuleCreator, LocalFilesystem};
use kiln_core::application::{BaseModuleCreator, ScaffoldService};

use crate::{
    cli::CreateAppArgs,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Execute the `kiln create-ddd-app` command.
#[instrument(skip_all, fields(module = %args.module))]
pub fn execute(args: CreateAppArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let source_root = source_root(&args, &config);
    let creator = module_creator(args.startapp_cmd.as_deref(), &config)?;
    let service = ScaffoldService::new(Box::new(LocalFilesystem::new()), creator);

    output.header(&format!("Creating DDD app '{}'...", args.module))?;

    let report = service.create(&source_root, &args.module, args.service_name.as_deref())?;

    info!(
        service_dir = %report.service_dir.display(),
        files = report.files.len(),
        "Module created"
    );

    output.success(&format!(
        "Created DDD app '{}' with service '{}'",
        report.module, report.service
    ))?;
    output.print(&format!(
        "  Service structure created at: {}",
        report.service_dir.display()
    ))?;
    output.steps("Next steps:", &report.checklist)?;
    output.json(&report)?;

    Ok(())
}

fn source_root(args: &CreateAppArgs, config: &AppConfig) -> PathBuf {
    let source_dir = args
        .source_dir
        .as_ref()
        .unwrap_or(&config.scaffold.source_dir);
    args.project_root.join(source_dir)
}

/// `--startapp-cmd` wins over `scaffold.startapp_command`; without either the
/// skeleton is written in-process.
fn module_creator(flag: Option<&str>, config: &AppConfig) -> CliResult<Box<dyn BaseModuleCreator>> {
    let argv = match flag {
        Some(cmd) => Some(split_command(cmd)?),
        None => config.scaffold.startapp_command.clone(),
    };

    let Some(argv) = argv else {
        return Ok(Box::new(BuiltinModuleCreator::new(LocalFilesystem::new())));
    };

    match CommandModuleCreator::from_argv(&argv) {
        Some(creator) => Ok(Box::new(creator)),
        None => Err(CliError::InvalidInput {
            message: "startapp command is empty".into(),
            source: None,
        }),
    }
}

/// Split `--startapp-cmd` with POSIX shell quoting rules.
fn split_command(cmd: &str) -> CliResult<Vec<String>> {
    shlex::split(cmd).ok_or_else(|| CliError::InvalidInput {
        message: format!(
            "Cannot parse startapp command '{cmd}': unbalanced quotes or trailing escape"
        ),
        source: None,
    })
}

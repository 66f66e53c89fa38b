//! Implementation of the `kiln materialize` command.
//!
//! Responsibility: gather parameters from every source, validate them into a
//! `ParameterRecord`, call the core materialize service, and display results.
//! No business logic lives here.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use kiln_adapters::{GitCli, JsonParameterFile, LocalFilesystem};
use kiln_core::{
    application::{MaterializePlan, MaterializeService, ParameterSource},
    domain::{DomainValidator, ParameterRecord, RawParameters, VariantManifest},
    error::KilnError,
};

use crate::{
    cli::{MaterializeArgs, OutputFormat, global::GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Execute the `kiln materialize` command.
///
/// Dispatch sequence:
/// 1. Check the root and layer parameter sources
/// 2. Prompt for a missing variant or database when interactive
/// 3. Validate into a `ParameterRecord`
/// 4. Early-exit with the plan if `--dry-run`
/// 5. Materialize, optionally committing to a fresh git repository
/// 6. Print the summary and next steps
#[instrument(skip_all, fields(root = %args.root.display()))]
pub fn execute(
    args: MaterializeArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    if !args.root.is_dir() {
        return Err(CliError::InvalidInput {
            message: format!("'{}' is not a directory", args.root.display()),
            source: None,
        });
    }

    let mut service = MaterializeService::new(Box::new(LocalFilesystem::new()));

    let marker = service.read_selection_marker(&args.root)?;
    let mut raw = collect_parameters(&args, &config, marker)?;

    if wants_prompt(&args, &global, &output) {
        raw = prompt_missing(raw)?;
    }

    let record = DomainValidator::validate_parameters(raw).map_err(KilnError::from)?;
    debug!(
        variant = %record.variant(),
        database = %record.database(),
        slug = record.project_slug(),
        "Parameters resolved"
    );

    if args.dry_run {
        let plan = MaterializeService::plan(&record);
        show_plan(&args.root, &record, &plan, &output)?;
        output.json(&plan)?;
        return Ok(());
    }

    if args.git || config.materialize.init_git {
        service = service.with_version_control(Box::new(GitCli::new()));
    }

    output.header(&format!(
        "Materializing '{}' ({} + {})...",
        record.project_name(),
        VariantManifest::def(record.variant()).display_name,
        record.database()
    ))?;

    let spinner = output.spinner("Copying the selected variant...");
    let result = service.materialize(&args.root, &record);
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    let report = result?;

    info!(
        copied = report.copied.len(),
        removed = report.removed.len(),
        "Materialize completed"
    );

    if report.already_materialized {
        output.warning("Variant subtrees already gone; only configuration was rewritten")?;
    } else {
        output.success(&format!(
            "Project '{}' materialized with {}",
            record.project_name(),
            record.variant()
        ))?;
        output.print(&format!(
            "  {} entries copied, {} replaced, {} removed",
            report.copied.len(),
            report.replaced.len(),
            report.removed.len()
        ))?;
    }
    if report.repository_initialized {
        output.info("Initialised git repository with an initial commit")?;
    }

    output.steps("Next steps:", &report.next_steps)?;
    output.json(&report)?;

    Ok(())
}

// ── Parameter collection ──────────────────────────────────────────────────────

/// Layer flags, the parameter file, the selection marker and config defaults.
///
/// Earlier sources win. The project name falls back to the root's directory
/// name.
fn collect_parameters(
    args: &MaterializeArgs,
    config: &AppConfig,
    marker: Option<String>,
) -> CliResult<RawParameters> {
    let flags = RawParameters {
        project_name: args.name.clone(),
        project_slug: args.slug.clone(),
        framework: args.framework.clone(),
        database: args.database.clone(),
        author_name: args.author.clone(),
        email: args.email.clone(),
        description: args.description.clone(),
        ..RawParameters::default()
    };

    let file = match &args.params {
        Some(path) => JsonParameterFile::new(path).load()?,
        None => RawParameters::default(),
    };

    let from_marker = RawParameters {
        framework: marker,
        ..RawParameters::default()
    };

    let defaults = RawParameters {
        project_name: root_name(&args.root)?,
        framework: config.defaults.framework.clone(),
        database: config.defaults.database.clone(),
        author_name: config.defaults.author_name.clone(),
        email: config.defaults.email.clone(),
        ..RawParameters::default()
    };

    Ok(flags.or(file).or(from_marker).or(defaults))
}

fn root_name(root: &Path) -> CliResult<Option<String>> {
    let absolute: PathBuf = std::fs::canonicalize(root)
        .with_cli_context(|| format!("Failed to resolve '{}'", root.display()))?;
    Ok(absolute
        .file_name()
        .map(|name| name.to_string_lossy().into_owned()))
}

// ── Prompting ─────────────────────────────────────────────────────────────────

fn wants_prompt(args: &MaterializeArgs, global: &GlobalArgs, output: &OutputManager) -> bool {
    cfg!(feature = "interactive")
        && !args.no_input
        && !global.quiet
        && output.format() != OutputFormat::Json
        && std::io::stdin().is_terminal()
}

#[cfg(feature = "interactive")]
fn prompt_missing(mut raw: RawParameters) -> CliResult<RawParameters> {
    use kiln_core::domain::{DatabaseKind, Variant};

    if raw.framework.is_none() {
        raw.framework = Some(choose("Framework", &Variant::known())?);
    }
    if raw.database.is_none() {
        raw.database = Some(choose("Database", &DatabaseKind::known())?);
    }
    Ok(raw)
}

#[cfg(not(feature = "interactive"))]
fn prompt_missing(raw: RawParameters) -> CliResult<RawParameters> {
    Ok(raw)
}

#[cfg(feature = "interactive")]
fn choose(prompt: &str, items: &[&'static str]) -> CliResult<String> {
    let selection = dialoguer::Select::new()
        .with_prompt(prompt)
        .items(items)
        .default(0)
        .interact_opt()
        .map_err(|e| CliError::InvalidInput {
            message: format!("Failed to read {} selection", prompt.to_lowercase()),
            source: Some(Box::new(e)),
        })?;

    match selection {
        Some(index) => Ok(items[index].to_string()),
        None => Err(CliError::Cancelled),
    }
}

// ── Dry run ───────────────────────────────────────────────────────────────────

fn show_plan(
    root: &Path,
    record: &ParameterRecord,
    plan: &MaterializePlan,
    output: &OutputManager,
) -> CliResult<()> {
    output.info(&format!("Dry run: would materialize {}", root.display()))?;
    output.print(&format!(
        "  Project:  {} ({})",
        record.project_name(),
        record.project_slug()
    ))?;
    if let Some(author) = author_line(record) {
        output.print(&format!("  Author:   {author}"))?;
    }
    if let Some(description) = record.description() {
        output.print(&format!("  About:    {description}"))?;
    }
    for (key, value) in record.extra() {
        output.print(&format!("  {key}: {value}"))?;
    }
    output.print(&format!("  Keep:     {}", plan.resolution.keep))?;
    output.print(&format!("  Discard:  {}", plan.resolution.discard.join(", ")))?;
    output.print(&format!("  Database: {}", plan.database))?;
    output.print("")?;
    output.header(".env")?;
    output.print(plan.env.render().trim_end())?;
    if !plan.compose.is_empty() {
        output.print("")?;
        output.header("docker-compose.yml")?;
        output.print(plan.compose.trim_end())?;
    }
    Ok(())
}

/// `Name <email>`, either half alone, or nothing.
fn author_line(record: &ParameterRecord) -> Option<String> {
    match (record.author_name(), record.email()) {
        (Some(name), Some(email)) => Some(format!("{name} <{email}>")),
        (Some(name), None) => Some(name.to_string()),
        (None, Some(email)) => Some(format!("<{email}>")),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    use crate::cli::{Cli, Commands};

    fn parse(argv: &[&str]) -> MaterializeArgs {
        match Cli::parse_from(argv).command {
            Commands::Materialize(args) => args,
            _ => panic!("expected Materialize command"),
        }
    }

    #[test]
    fn flags_beat_marker_and_config() {
        let tmp = tempfile::TempDir::new().unwrap();
        let root = tmp.path().to_str().unwrap();
        let args = parse(&["kiln", "materialize", root, "-f", "drf", "-d", "mysql"]);

        let mut config = AppConfig::default();
        config.defaults.framework = Some("fastapi".into());
        config.defaults.database = Some("sqlite".into());

        let raw = collect_parameters(&args, &config, Some("fastapi".into())).unwrap();
        assert_eq!(raw.framework.as_deref(), Some("drf"));
        assert_eq!(raw.database.as_deref(), Some("mysql"));
    }

    #[test]
    fn marker_beats_config_default() {
        let tmp = tempfile::TempDir::new().unwrap();
        let root = tmp.path().to_str().unwrap();
        let args = parse(&["kiln", "materialize", root]);

        let mut config = AppConfig::default();
        config.defaults.framework = Some("fastapi".into());
        config.defaults.database = Some("postgresql".into());

        let raw = collect_parameters(&args, &config, Some("drf".into())).unwrap();
        assert_eq!(raw.framework.as_deref(), Some("drf"));
        assert_eq!(raw.database.as_deref(), Some("postgresql"));
    }

    #[test]
    fn parameter_file_fills_gaps_left_by_flags() {
        let tmp = tempfile::TempDir::new().unwrap();
        let params = tmp.path().join("params.json");
        std::fs::write(
            &params,
            r#"{"project_name": "Shop API", "framework": "fastapi", "db_type": "sqlite"}"#,
        )
        .unwrap();
        let root = tmp.path().to_str().unwrap();
        let args = parse(&[
            "kiln",
            "materialize",
            root,
            "-d",
            "mysql",
            "--params",
            params.to_str().unwrap(),
        ]);

        let raw = collect_parameters(&args, &AppConfig::default(), None).unwrap();
        assert_eq!(raw.project_name.as_deref(), Some("Shop API"));
        assert_eq!(raw.framework.as_deref(), Some("fastapi"));
        assert_eq!(raw.database.as_deref(), Some("mysql"));
    }

    #[test]
    fn project_name_defaults_to_root_directory_name() {
        let tmp = tempfile::TempDir::new().unwrap();
        let root = tmp.path().join("shop_api");
        std::fs::create_dir(&root).unwrap();
        let args = parse(&["kiln", "materialize", root.to_str().unwrap()]);

        let raw = collect_parameters(&args, &AppConfig::default(), None).unwrap();
        assert_eq!(raw.project_name.as_deref(), Some("shop_api"));
    }

    #[test]
    fn author_line_combines_name_and_email() {
        let record = |author: Option<&str>, email: Option<&str>| {
            DomainValidator::validate_parameters(RawParameters {
                project_name: Some("Demo".into()),
                framework: Some("fastapi".into()),
                database: Some("sqlite".into()),
                author_name: author.map(str::to_string),
                email: email.map(str::to_string),
                ..RawParameters::default()
            })
            .unwrap()
        };

        assert_eq!(
            author_line(&record(Some("Ada"), Some("ada@example.com"))).as_deref(),
            Some("Ada <ada@example.com>")
        );
        assert_eq!(author_line(&record(Some("Ada"), None)).as_deref(), Some("Ada"));
        assert_eq!(author_line(&record(None, None)), None);
    }

    #[test]
    fn unreadable_parameter_file_is_an_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let root = tmp.path().to_str().unwrap();
        let missing = tmp.path().join("missing.json");
        let args = parse(&[
            "kiln",
            "materialize",
            root,
            "--params",
            missing.to_str().unwrap(),
        ]);

        let err = collect_parameters(&args, &AppConfig::default(), None).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }
}

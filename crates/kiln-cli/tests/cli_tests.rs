//! End-to-end tests for the `kiln` binary.

use std::fs;
use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use kiln_core::domain::{DatabaseConfigurer, DatabaseKind};

/// A `kiln` invocation isolated from the user's config and environment.
struct Sandbox {
    home: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        let home = TempDir::new().unwrap();
        fs::write(home.path().join("kiln.toml"), "").unwrap();
        Self { home }
    }

    fn config(&self) -> std::path::PathBuf {
        self.home.path().join("kiln.toml")
    }

    fn kiln(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("kiln");
        cmd.current_dir(self.home.path())
            .env_remove("RUST_LOG")
            .env_remove("KILN__DEFAULTS__FRAMEWORK")
            .env_remove("KILN__DEFAULTS__DATABASE")
            .env_remove("KILN__MATERIALIZE__INIT_GIT")
            .arg("--config")
            .arg(self.config());
        cmd
    }
}

fn staged_root() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();

    fs::write(root.join("framework_selection.txt"), "fastapi\n").unwrap();
    fs::write(root.join("PLACEHOLDER_FASTAPI"), "").unwrap();
    fs::write(root.join("PLACEHOLDER_DRF"), "").unwrap();
    fs::write(root.join("README.md"), "# Demo\n").unwrap();

    let fastapi = root.join("fastapi_template");
    fs::create_dir_all(fastapi.join("app")).unwrap();
    fs::write(fastapi.join("app/main.py"), "app = FastAPI()\n").unwrap();
    fs::write(fastapi.join("requirements.txt"), "fastapi\n").unwrap();

    let drf = root.join("drf_template");
    fs::create_dir_all(drf.join("config")).unwrap();
    fs::write(drf.join("manage.py"), "#!/usr/bin/env python\n").unwrap();
    fs::write(drf.join("config/settings.py"), "INSTALLED_APPS = []\n").unwrap();

    tmp
}

fn project_with_src() -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::create_dir_all(tmp.path().join("src")).unwrap();
    tmp
}

fn arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

// ── basics ────────────────────────────────────────────────────────────────────

#[test]
fn test_help_flag() {
    cargo_bin_cmd!("kiln")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("materialize"))
        .stdout(predicate::str::contains("create-ddd-app"));
}

#[test]
fn test_version_flag() {
    cargo_bin_cmd!("kiln")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_shell_completions() {
    Sandbox::new()
        .kiln()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("kiln"));
}

#[test]
fn test_missing_config_file_exit_code() {
    let sandbox = Sandbox::new();
    cargo_bin_cmd!("kiln")
        .current_dir(sandbox.home.path())
        .arg("--config")
        .arg(sandbox.home.path().join("absent.toml"))
        .args(["config", "list"])
        .assert()
        .code(4);
}

// ── materialize ───────────────────────────────────────────────────────────────

#[test]
fn test_materialize_fastapi_postgresql() {
    let root = staged_root();
    Sandbox::new()
        .kiln()
        .args(["materialize", arg(root.path()), "--name", "Demo"])
        .args(["-f", "fastapi", "-d", "postgresql", "--no-input"])
        .assert()
        .success()
        .stdout(predicate::str::contains("'Demo' (FastAPI + postgresql)"))
        .stdout(predicate::str::contains("materialized"));

    let root = root.path();
    assert!(root.join("app/main.py").is_file());
    assert_eq!(
        fs::read_to_string(root.join("requirements.txt")).unwrap(),
        "fastapi\n"
    );
    assert!(!root.join("fastapi_template").exists());
    assert!(!root.join("drf_template").exists());
    assert!(!root.join("PLACEHOLDER_FASTAPI").exists());
    assert!(!root.join("PLACEHOLDER_DRF").exists());
    assert!(!root.join("framework_selection.txt").exists());
    assert_eq!(
        fs::read_to_string(root.join(".env")).unwrap(),
        DatabaseConfigurer::render(DatabaseKind::Postgresql, "demo").render()
    );
    assert!(root.join("docker-compose.yml").is_file());
}

#[test]
fn test_materialize_uses_selection_marker() {
    let root = staged_root();
    fs::write(root.path().join("framework_selection.txt"), "drf\n").unwrap();

    Sandbox::new()
        .kiln()
        .args(["materialize", arg(root.path()), "--name", "Demo"])
        .args(["-d", "sqlite", "--no-input"])
        .assert()
        .success();

    assert!(root.path().join("manage.py").is_file());
    assert!(!root.path().join("app").exists());
}

#[test]
fn test_materialize_json_report() {
    let root = staged_root();
    let output = Sandbox::new()
        .kiln()
        .args(["--output-format", "json", "materialize", arg(root.path())])
        .args(["--name", "Demo", "-f", "drf", "-d", "mysql", "--no-input"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["variant"], "drf");
    assert_eq!(report["project_slug"], "demo");
    assert_eq!(report["already_materialized"], false);
}

#[test]
fn test_materialize_dry_run_changes_nothing() {
    let root = staged_root();
    Sandbox::new()
        .kiln()
        .args(["materialize", arg(root.path()), "--name", "Demo"])
        .args(["-f", "drf", "-d", "postgresql", "--dry-run", "--no-input"])
        .assert()
        .success()
        .stdout(predicate::str::contains("drf_template"))
        .stdout(predicate::str::contains("DB_ENGINE=postgresql"));

    assert!(root.path().join("fastapi_template").is_dir());
    assert!(root.path().join("drf_template").is_dir());
    assert!(!root.path().join(".env").exists());
}

#[test]
fn test_materialize_dry_run_shows_project_metadata() {
    let root = staged_root();
    Sandbox::new()
        .kiln()
        .args(["materialize", arg(root.path()), "--name", "Shop API"])
        .args(["--author", "Ada", "--email", "ada@example.com"])
        .args(["--description", "Orders backend"])
        .args(["-f", "fastapi", "-d", "sqlite", "--dry-run", "--no-input"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Shop API (shop-api)"))
        .stdout(predicate::str::contains("Ada <ada@example.com>"))
        .stdout(predicate::str::contains("Orders backend"));
}

#[test]
fn test_unknown_framework_exit_code() {
    let root = staged_root();
    Sandbox::new()
        .kiln()
        .args(["materialize", arg(root.path()), "--name", "Demo"])
        .args(["-f", "flask", "-d", "sqlite", "--no-input"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("flask"));

    assert!(root.path().join("fastapi_template").is_dir());
    assert!(root.path().join("framework_selection.txt").is_file());
}

#[test]
fn test_missing_database_exit_code() {
    let root = staged_root();
    Sandbox::new()
        .kiln()
        .args(["materialize", arg(root.path()), "--name", "Demo"])
        .args(["-f", "fastapi", "--no-input"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("database"));
}

#[test]
fn test_quoted_slug_is_rejected_before_writing_env() {
    let root = staged_root();
    Sandbox::new()
        .kiln()
        .args(["materialize", arg(root.path()), "--name", "Demo", "--slug", "\"x"])
        .args(["-f", "fastapi", "-d", "postgresql", "--no-input"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("slug"));

    assert!(!root.path().join(".env").exists());
    assert!(root.path().join("fastapi_template").is_dir());
}

#[test]
fn test_missing_subtree_exit_code() {
    let root = staged_root();
    fs::remove_dir_all(root.path().join("fastapi_template")).unwrap();

    Sandbox::new()
        .kiln()
        .args(["materialize", arg(root.path()), "--name", "Demo"])
        .args(["-f", "fastapi", "-d", "sqlite", "--no-input"])
        .assert()
        .code(3);

    assert!(root.path().join("drf_template").is_dir());
}

#[test]
fn test_second_materialize_is_harmless() {
    let root = staged_root();
    let sandbox = Sandbox::new();
    for _ in 0..2 {
        sandbox
            .kiln()
            .args(["materialize", arg(root.path()), "--name", "Demo"])
            .args(["-f", "fastapi", "-d", "mysql", "--no-input"])
            .assert()
            .success();
    }
    assert!(root.path().join("app/main.py").is_file());
}

#[test]
fn test_params_file() {
    let root = staged_root();
    let sandbox = Sandbox::new();
    let params = sandbox.home.path().join("params.json");
    fs::write(
        &params,
        r#"{"project_name": "Shop API", "framework": "drf", "db_type": "sqlite"}"#,
    )
    .unwrap();

    sandbox
        .kiln()
        .args(["materialize", arg(root.path()), "--params", arg(&params)])
        .arg("--no-input")
        .assert()
        .success();

    assert!(root.path().join("manage.py").is_file());
    assert_eq!(
        fs::read_to_string(root.path().join(".env")).unwrap(),
        DatabaseConfigurer::render(DatabaseKind::Sqlite, "shop-api").render()
    );
}

#[test]
fn test_config_defaults_fill_in() {
    let root = staged_root();
    let sandbox = Sandbox::new();
    fs::write(
        sandbox.config(),
        "[defaults]\nframework = \"drf\"\ndatabase = \"postgresql\"\n",
    )
    .unwrap();
    // Without a marker the configured default variant applies.
    fs::remove_file(root.path().join("framework_selection.txt")).unwrap();

    sandbox
        .kiln()
        .args(["materialize", arg(root.path()), "--name", "Demo", "--no-input"])
        .assert()
        .success();

    assert!(root.path().join("manage.py").is_file());
}

// ── create-ddd-app ────────────────────────────────────────────────────────────

#[test]
fn test_create_ddd_app() {
    let project = project_with_src();
    Sandbox::new()
        .kiln()
        .args(["create-ddd-app", "orders", "--project-root", arg(project.path())])
        .assert()
        .success()
        .stdout(predicate::str::contains("orders_service"))
        .stdout(predicate::str::contains("INSTALLED_APPS"));

    let service = project.path().join("src/orders_service");
    assert!(service.join("domain/entities/orders.py").is_file());
    assert!(service.join("presentation/api/orders_urls.py").is_file());
    assert!(service.join("infrastructure/orders/apps.py").is_file());
    assert!(service.join("infrastructure/persistence/__init__.py").is_file());
}

#[test]
fn test_create_ddd_app_twice() {
    let project = project_with_src();
    let sandbox = Sandbox::new();
    let args = ["create-ddd-app", "orders", "--project-root", arg(project.path())];

    sandbox.kiln().args(args).assert().success();
    sandbox
        .kiln()
        .args(args)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Already exists"));
}

#[test]
fn test_create_ddd_app_invalid_name() {
    let project = project_with_src();
    Sandbox::new()
        .kiln()
        .args(["create-ddd-app", "my-module", "--project-root", arg(project.path())])
        .assert()
        .code(2);

    assert_eq!(fs::read_dir(project.path().join("src")).unwrap().count(), 0);
}

#[test]
fn test_create_ddd_app_service_name() {
    let project = project_with_src();
    Sandbox::new()
        .kiln()
        .args(["ddd", "invoices", "--service-name", "billing"])
        .args(["--project-root", arg(project.path())])
        .assert()
        .success();

    let service = project.path().join("src/billing_service");
    assert!(service.join("domain/entities/invoices.py").is_file());
    assert!(service.join("infrastructure/invoices/models.py").is_file());
}

// ── config / init ─────────────────────────────────────────────────────────────

#[test]
fn test_config_path_reports_flag() {
    let sandbox = Sandbox::new();
    sandbox
        .kiln()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("kiln.toml"));
}

#[test]
fn test_config_get() {
    Sandbox::new()
        .kiln()
        .args(["config", "get", "scaffold.source_dir"])
        .assert()
        .success()
        .stdout(predicate::str::contains("scaffold.source_dir = src"));
}

#[test]
fn test_config_get_unknown_key() {
    Sandbox::new()
        .kiln()
        .args(["config", "get", "nope.nothing"])
        .assert()
        .code(4);
}

#[test]
fn test_init_writes_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested/kiln.toml");

    cargo_bin_cmd!("kiln")
        .current_dir(dir.path())
        .arg("--config")
        .arg(&path)
        .arg("init")
        .assert()
        .success();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("[scaffold]"));
}

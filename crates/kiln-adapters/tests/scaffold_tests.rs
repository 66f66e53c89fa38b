//! DDD module generation end to end.

use std::path::{Path, PathBuf};

use kiln_adapters::{BuiltinModuleCreator, LocalFilesystem, MemoryFilesystem};
use kiln_core::{
    application::{ApplicationError, ScaffoldService, ports::Filesystem},
    error::KilnError,
};

const SOURCE_ROOT: &str = "/project/src";

fn memory_service() -> (ScaffoldService, MemoryFilesystem) {
    let fs = MemoryFilesystem::new();
    fs.create_dir_all(Path::new(SOURCE_ROOT)).unwrap();
    let service = ScaffoldService::new(
        Box::new(fs.clone()),
        Box::new(BuiltinModuleCreator::new(fs.clone())),
    );
    (service, fs)
}

#[test]
fn generates_full_layout() {
    let (service, fs) = memory_service();

    let report = service.create(Path::new(SOURCE_ROOT), "orders", None).unwrap();

    let dir = PathBuf::from("/project/src/orders_service");
    assert_eq!(report.service_dir, dir);

    for layer in [
        "",
        "domain",
        "domain/entities",
        "domain/services",
        "domain/repositories",
        "application",
        "application/services",
        "application/dto",
        "infrastructure",
        "infrastructure/repositories",
        "infrastructure/external_services",
        "infrastructure/persistence",
        "presentation",
        "presentation/api",
        "presentation/serializers",
    ] {
        let marker = dir.join(layer).join("__init__.py");
        assert_eq!(fs.read_file(&marker).as_deref(), Some(""), "{}", marker.display());
    }

    for stub in [
        "domain/entities/orders.py",
        "domain/repositories/orders_repository.py",
        "domain/services/orders_service.py",
        "application/dto/orders_dto.py",
        "application/services/orders_application_service.py",
        "presentation/serializers/orders_serializer.py",
        "presentation/api/orders_views.py",
        "presentation/api/orders_urls.py",
    ] {
        assert_eq!(fs.read_file(&dir.join(stub)).as_deref(), Some(""), "{stub}");
    }

    assert!(fs.exists(&dir.join("infrastructure/orders/apps.py")));
    assert!(report.checklist[0].contains("INSTALLED_APPS"));
    assert!(report.checklist[1].contains("makemigrations orders"));
}

#[test]
fn second_run_fails_and_keeps_first_output() {
    let (service, fs) = memory_service();
    service.create(Path::new(SOURCE_ROOT), "orders", None).unwrap();

    let apps = Path::new("/project/src/orders_service/infrastructure/orders/apps.py");
    fs.write_file(apps, "edited\n").unwrap();
    let files_before = fs.list_files();

    let err = service
        .create(Path::new(SOURCE_ROOT), "orders", None)
        .unwrap_err();

    assert!(matches!(
        err,
        KilnError::Application(ApplicationError::AlreadyExists { .. })
    ));
    assert_eq!(fs.list_files(), files_before);
    assert_eq!(fs.read_file(apps).as_deref(), Some("edited\n"));
}

#[test]
fn hyphenated_name_creates_nothing() {
    let (service, fs) = memory_service();
    let dirs_before = fs.list_directories();

    assert!(service.create(Path::new(SOURCE_ROOT), "my-module", None).is_err());

    assert!(fs.list_files().is_empty());
    assert_eq!(fs.list_directories(), dirs_before);
}

#[test]
fn service_name_overrides_directory() {
    let (service, fs) = memory_service();

    service
        .create(Path::new(SOURCE_ROOT), "invoices", Some("billing"))
        .unwrap();

    let dir = Path::new("/project/src/billing_service");
    assert!(fs.exists(&dir.join("infrastructure/invoices/models.py")));
    assert!(fs.exists(&dir.join("domain/entities/invoices.py")));
}

#[test]
fn works_on_real_directories() {
    let tmp = tempfile::TempDir::new().unwrap();
    let source_root = tmp.path().join("src");
    let service = ScaffoldService::new(
        Box::new(LocalFilesystem::new()),
        Box::new(BuiltinModuleCreator::new(LocalFilesystem::new())),
    );

    let report = service.create(&source_root, "catalog", None).unwrap();

    assert!(source_root.join("catalog_service/presentation/api/catalog_urls.py").is_file());
    assert!(
        source_root
            .join("catalog_service/infrastructure/catalog/migrations/__init__.py")
            .is_file()
    );
    assert_eq!(report.module, "catalog");
}

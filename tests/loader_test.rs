//! Handler loading from plain module files and zip archives.

mod common;

use common::*;
use function_runtime::loader::{HandlerLoader, LoadError, SourceDescriptor};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tempfile::TempDir;

fn loader() -> (HandlerLoader, Arc<std::sync::atomic::AtomicUsize>) {
    let (registry, calls) = counting_registry();
    (HandlerLoader::new(Arc::new(registry)), calls)
}

#[test]
fn test_load_from_file_binds_handler_and_config() {
    let dir = TempDir::new().unwrap();
    let path = write_module(dir.path(), "function.yaml", RECORDING_MODULE);
    let (loader, calls) = loader();

    let bound = loader
        .resolve(&SourceDescriptor::file(&path, "handler"))
        .unwrap();

    assert_eq!(bound.function_name, "handler");
    assert_eq!(bound.handler_class, "recording");
    assert_eq!(bound.config.get("label"), Some(&serde_json::json!("fixture")));
    assert_eq!(bound.new_context().config_value("label"), Some(&serde_json::json!("fixture")));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_missing_file_is_source_not_found() {
    let dir = TempDir::new().unwrap();
    let (loader, calls) = loader();

    let err = loader
        .resolve(&SourceDescriptor::file(dir.path().join("absent.yaml"), "handler"))
        .unwrap_err();

    assert!(matches!(err, LoadError::SourceNotFound { .. }));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_missing_function_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = write_module(dir.path(), "function.yaml", RECORDING_MODULE);
    let (loader, calls) = loader();

    let err = loader
        .resolve(&SourceDescriptor::file(&path, "main"))
        .unwrap_err();

    assert!(matches!(err, LoadError::FunctionNotDefined { ref function, .. } if function == "main"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_unknown_handler_class_lists_registered_classes() {
    let dir = TempDir::new().unwrap();
    let path = write_module(
        dir.path(),
        "function.yaml",
        "functions:\n  handler:\n    handler_class: nonexistent\n",
    );
    let (loader, _) = loader();

    let err = loader
        .resolve(&SourceDescriptor::file(&path, "handler"))
        .unwrap_err();

    match err {
        LoadError::UnknownHandlerClass { class, registered, .. } => {
            assert_eq!(class, "nonexistent");
            assert!(registered.contains("recording"));
            assert!(registered.contains("system_metrics"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_malformed_module_is_a_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = write_module(dir.path(), "function.yaml", "functions: [not, a, mapping");
    let (loader, _) = loader();

    let err = loader
        .resolve(&SourceDescriptor::file(&path, "handler"))
        .unwrap_err();
    assert!(matches!(err, LoadError::ModuleParse { .. }));
}

#[test]
fn test_rejected_config_is_a_contract_violation() {
    let dir = TempDir::new().unwrap();
    let path = write_module(
        dir.path(),
        "function.yaml",
        "functions:\n  handler:\n    handler_class: strict\n",
    );
    let (loader, _) = loader();

    let err = loader
        .resolve(&SourceDescriptor::file(&path, "handler"))
        .unwrap_err();
    assert!(matches!(err, LoadError::ContractViolation { .. }));

    let path = write_module(
        dir.path(),
        "function.yaml",
        "functions:\n  handler:\n    handler_class: strict\n    handler_config:\n      required: true\n",
    );
    assert!(loader.resolve(&SourceDescriptor::file(&path, "handler")).is_ok());
}

#[test]
fn test_builtin_factory_rejects_bad_config() {
    let dir = TempDir::new().unwrap();
    let path = write_module(
        dir.path(),
        "function.yaml",
        "functions:\n  handler:\n    handler_class: system_metrics\n    handler_config:\n      window_seconds: -5\n",
    );
    let (loader, _) = loader();

    let err = loader
        .resolve(&SourceDescriptor::file(&path, "handler"))
        .unwrap_err();
    assert!(matches!(err, LoadError::ContractViolation { ref class, .. } if class == "system_metrics"));
}

#[test]
fn test_load_from_archive_purges_scratch_workspace() {
    let sources = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();
    let archive = write_archive(
        sources.path(),
        "function.zip",
        &[
            ("function.yaml", RECORDING_MODULE),
            ("lib/helpers.yaml", "unused: true\n"),
        ],
    );
    let (loader, calls) = loader();
    let loader = loader.with_scratch_root(scratch.path());

    let bound = loader
        .resolve(&SourceDescriptor::archive(&archive, "function.yaml", "handler"))
        .unwrap();

    assert_eq!(bound.handler_class, "recording");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(dir_is_empty(scratch.path()), "scratch workspace left behind");
}

#[test]
fn test_archive_entry_in_subdirectory() {
    let sources = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();
    let archive = write_archive(
        sources.path(),
        "function.zip",
        &[("app/function.yaml", RECORDING_MODULE)],
    );
    let (loader, _) = loader();
    let loader = loader.with_scratch_root(scratch.path());

    let bound = loader
        .resolve(&SourceDescriptor::archive(&archive, "app/function.yaml", "handler"))
        .unwrap();
    assert_eq!(bound.function_name, "handler");
    assert!(dir_is_empty(scratch.path()));
}

#[test]
fn test_missing_archive_entry_still_purges() {
    let sources = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();
    let archive = write_archive(
        sources.path(),
        "function.zip",
        &[("other.yaml", RECORDING_MODULE)],
    );
    let (loader, calls) = loader();
    let loader = loader.with_scratch_root(scratch.path());

    let err = loader
        .resolve(&SourceDescriptor::archive(&archive, "function.yaml", "handler"))
        .unwrap_err();

    assert!(matches!(err, LoadError::EntryNotFound { .. }));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(dir_is_empty(scratch.path()), "scratch workspace left behind");
}

#[test]
fn test_bind_failure_inside_archive_still_purges() {
    let sources = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();
    let archive = write_archive(
        sources.path(),
        "function.zip",
        &[("function.yaml", RECORDING_MODULE)],
    );
    let (loader, _) = loader();
    let loader = loader.with_scratch_root(scratch.path());

    let err = loader
        .resolve(&SourceDescriptor::archive(&archive, "function.yaml", "main"))
        .unwrap_err();

    match err {
        LoadError::FunctionNotDefined { origin, .. } => assert!(origin.ends_with("!function.yaml")),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(dir_is_empty(scratch.path()));
}

#[test]
fn test_corrupt_archive_is_an_archive_error() {
    let sources = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();
    let archive = write_module(sources.path(), "function.zip", "this is not a zip file");
    let (loader, _) = loader();
    let loader = loader.with_scratch_root(scratch.path());

    let err = loader
        .resolve(&SourceDescriptor::archive(&archive, "function.yaml", "handler"))
        .unwrap_err();

    assert!(matches!(err, LoadError::Archive { .. }));
    assert!(dir_is_empty(scratch.path()));
}

#[test]
fn test_missing_archive_is_source_not_found() {
    let sources = TempDir::new().unwrap();
    let (loader, _) = loader();

    let err = loader
        .resolve(&SourceDescriptor::archive(
            sources.path().join("absent.zip"),
            "function.yaml",
            "handler",
        ))
        .unwrap_err();
    assert!(matches!(err, LoadError::SourceNotFound { .. }));
}

#[test]
fn test_escaping_entry_names_are_rejected() {
    let sources = TempDir::new().unwrap();
    let archive = write_archive(
        sources.path(),
        "function.zip",
        &[("function.yaml", RECORDING_MODULE)],
    );
    let (loader, _) = loader();

    for entry in ["../function.yaml", "/etc/function.yaml"] {
        let err = loader
            .resolve(&SourceDescriptor::archive(&archive, entry, "handler"))
            .unwrap_err();
        assert!(
            matches!(err, LoadError::InvalidEntryPath { .. }),
            "{entry} should be rejected, got {err:?}"
        );
    }
}

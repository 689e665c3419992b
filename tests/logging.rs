//! Logging setup inside one process.
//!
//! The subscriber is global, so this file holds a single test that owns it.

use project_b_cli::logging::{self, LogLevel, LogSettings};
use project_b_cli::Workspace;
use std::fs;

#[test]
fn repeated_setup_reuses_sinks_and_updates_level() {
    std::env::remove_var(logging::LOG_ENV_VAR);
    let dir = tempfile::tempdir().expect("temp dir");
    let workspace = Workspace::new(dir.path());
    let settings = LogSettings {
        color: false,
        ..LogSettings::default()
    };

    let first = logging::setup(&workspace, &settings).expect("first setup");
    let second = logging::setup(&workspace, &settings).expect("second setup");
    assert_eq!(first.log_file(), second.log_file());
    assert_eq!(first.log_file(), workspace.log_path());
    assert!(dir.path().join(".runtime").is_dir());
    assert!(dir.path().join("var").is_dir());

    tracing::info!("marker-once-7f3a");
    let log = fs::read_to_string(workspace.log_path()).expect("log file");
    assert_eq!(log.matches("marker-once-7f3a").count(), 1, "log was: {log}");

    let quiet = LogSettings {
        level: LogLevel::Error,
        ..settings
    };
    logging::setup(&workspace, &quiet).expect("reconfigure");
    tracing::info!("marker-suppressed-91c2");
    tracing::error!("marker-error-44d0");

    let log = fs::read_to_string(workspace.log_path()).expect("log file");
    assert!(!log.contains("marker-suppressed-91c2"));
    assert_eq!(log.matches("marker-error-44d0").count(), 1);
}

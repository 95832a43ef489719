use super::*;
use chrono::TimeZone;
use envcore_adapters::{
    FakeBackgroundOperationManager, FakeDaemonController, FakeHostStorageProvider, FakePromptPort, PromptChoice,
};
use envcore_storage::MetadataStore;
use tempfile::TempDir;

fn ports<'a>(
    host: &'a FakeHostStorageProvider,
    background: &'a FakeBackgroundOperationManager,
    daemon: &'a FakeDaemonController,
    prompt: &'a FakePromptPort,
) -> MigrationPorts<'a> {
    MigrationPorts {
        host,
        background,
        daemon,
        prompt,
    }
}

#[test]
fn detection_with_no_hidden_dir_is_not_legacy() {
    let dir = TempDir::new().unwrap();
    let store = MetadataStore::new(dir.path());
    let result = detect_migration_state(&store);
    assert_eq!(result.state, DetectionState::NotLegacy);
    assert!(!result.requires_backup);
}

#[test]
fn detection_with_hidden_dir_but_no_env_json_is_not_legacy() {
    let dir = TempDir::new().unwrap();
    let store = MetadataStore::new(dir.path());
    std::fs::create_dir_all(store.hidden_dir()).unwrap();
    let result = detect_migration_state(&store);
    assert_eq!(result.state, DetectionState::NotLegacy);
}

#[test]
fn detection_with_env_json_and_no_marker_is_legacy_confirmed() {
    let dir = TempDir::new().unwrap();
    let store = MetadataStore::new(dir.path());
    store
        .write_env_metadata(&envcore::EnvMetadata {
            interpreter_path: "/old/python".into(),
            ownership: envcore::Ownership::Managed,
            dependency_set_fingerprint: "abc".into(),
            created_at: chrono::Utc::now(),
            platform: "linux".into(),
        })
        .unwrap();
    let result = detect_migration_state(&store);
    assert_eq!(result.state, DetectionState::LegacyConfirmed);
    assert!(result.requires_backup);
}

#[test]
fn detection_with_current_schema_marker_is_not_legacy() {
    let dir = TempDir::new().unwrap();
    let store = MetadataStore::new(dir.path());
    store
        .write_env_metadata(&envcore::EnvMetadata {
            interpreter_path: "/python".into(),
            ownership: envcore::Ownership::Managed,
            dependency_set_fingerprint: "abc".into(),
            created_at: chrono::Utc::now(),
            platform: "linux".into(),
        })
        .unwrap();
    store.write_schema_marker(envcore::CURRENT_SCHEMA_VERSION).unwrap();
    let result = detect_migration_state(&store);
    assert_eq!(result.state, DetectionState::NotLegacy);
}

#[test]
fn detection_with_older_schema_marker_is_legacy_confirmed() {
    let dir = TempDir::new().unwrap();
    let store = MetadataStore::new(dir.path());
    store
        .write_env_metadata(&envcore::EnvMetadata {
            interpreter_path: "/python".into(),
            ownership: envcore::Ownership::Managed,
            dependency_set_fingerprint: "abc".into(),
            created_at: chrono::Utc::now(),
            platform: "linux".into(),
        })
        .unwrap();
    store.write_schema_marker(envcore::CURRENT_SCHEMA_VERSION - 1).unwrap();
    let result = detect_migration_state(&store);
    assert_eq!(result.state, DetectionState::LegacyConfirmed);
}

#[test]
fn detection_with_marker_path_unreadable_as_a_file_is_unknown_io_error() {
    // Replace the schema marker file with a directory of the same name, so
    // reading it fails with something other than NotFound — a portable way
    // to exercise the non-ENOENT branch without relying on permission bits,
    // which CI containers running as root often ignore.
    let dir = TempDir::new().unwrap();
    let store = MetadataStore::new(dir.path());
    store
        .write_env_metadata(&envcore::EnvMetadata {
            interpreter_path: "/python".into(),
            ownership: envcore::Ownership::Managed,
            dependency_set_fingerprint: "abc".into(),
            created_at: chrono::Utc::now(),
            platform: "linux".into(),
        })
        .unwrap();
    let marker_path = store.hidden_dir().join("system").join("SCHEMA_VERSION");
    std::fs::create_dir_all(&marker_path).unwrap();

    let result = detect_migration_state(&store);
    assert_eq!(result.state, DetectionState::UnknownIoError);
    assert!(!result.requires_backup);
}

#[tokio::test]
async fn check_pre_upgrade_migration_is_none_for_fresh_workspace() {
    let dir = TempDir::new().unwrap();
    let store = MetadataStore::new(dir.path());
    let audit = AuditLog::with_policy(dir.path().join("global"), dir.path(), 512 * 1024, 3);

    let host = FakeHostStorageProvider::default();
    let background = FakeBackgroundOperationManager::new();
    let daemon = FakeDaemonController::new();
    let prompt = FakePromptPort::answering(envcore_adapters::PromptChoice::Ignore);
    let migration_ports = ports(&host, &background, &daemon, &prompt);

    let outcome = check_pre_upgrade_migration(
        &store,
        &audit,
        &migration_ports,
        std::time::Duration::from_secs(5),
        std::time::Duration::from_secs(15),
        std::time::Duration::from_millis(300),
    )
    .await;

    assert_eq!(outcome, MigrationOutcome::None);
    assert!(prompt.modal_calls().is_empty(), "no modal for a fresh workspace");
}

#[tokio::test]
async fn check_pre_upgrade_migration_user_declines() {
    let dir = TempDir::new().unwrap();
    let store = MetadataStore::new(dir.path());
    store
        .write_env_metadata(&envcore::EnvMetadata {
            interpreter_path: "/old/python".into(),
            ownership: envcore::Ownership::Managed,
            dependency_set_fingerprint: "abc".into(),
            created_at: chrono::Utc::now(),
            platform: "linux".into(),
        })
        .unwrap();
    let audit = AuditLog::with_policy(dir.path().join("global"), dir.path(), 512 * 1024, 3);

    let host = FakeHostStorageProvider::default();
    let background = FakeBackgroundOperationManager::new();
    let daemon = FakeDaemonController::new();
    let prompt = FakePromptPort::answering(envcore_adapters::PromptChoice::Ignore);
    let migration_ports = ports(&host, &background, &daemon, &prompt);

    let outcome = check_pre_upgrade_migration(
        &store,
        &audit,
        &migration_ports,
        std::time::Duration::from_secs(5),
        std::time::Duration::from_secs(15),
        std::time::Duration::from_millis(300),
    )
    .await;

    assert_eq!(outcome, MigrationOutcome::UserDeclined);
    assert_eq!(prompt.modal_calls().len(), 1);
}

#[tokio::test]
async fn check_pre_upgrade_migration_succeeds_and_renames_hidden_dir() {
    let dir = TempDir::new().unwrap();
    let store = MetadataStore::new(dir.path());
    store
        .write_env_metadata(&envcore::EnvMetadata {
            interpreter_path: "/old/python".into(),
            ownership: envcore::Ownership::Managed,
            dependency_set_fingerprint: "abc".into(),
            created_at: chrono::Utc::now(),
            platform: "linux".into(),
        })
        .unwrap();
    let audit = AuditLog::with_policy(dir.path().join("global"), dir.path(), 512 * 1024, 3);

    let host = FakeHostStorageProvider::default();
    let background = FakeBackgroundOperationManager::new();
    let daemon = FakeDaemonController::new();
    let prompt = FakePromptPort::answering(PromptChoice::ProceedWithBackup);
    let migration_ports = ports(&host, &background, &daemon, &prompt);

    let outcome = check_pre_upgrade_migration(
        &store,
        &audit,
        &migration_ports,
        std::time::Duration::from_secs(5),
        std::time::Duration::from_secs(15),
        std::time::Duration::from_millis(300),
    )
    .await;

    match outcome {
        MigrationOutcome::BackupSuccess { backup_path } => {
            assert!(backup_path.exists());
            assert!(!store.hidden_dir().exists());
            assert!(!audit.guard_path().exists());
        }
        other => panic!("expected BackupSuccess, got {other:?}"),
    }
    assert_eq!(background.pause_calls(), 1);
    assert_eq!(background.resume_calls(), 1);
    assert_eq!(daemon.stop_calls(), 1);
}

#[tokio::test]
async fn check_pre_upgrade_migration_quiescence_failure_resumes_background_and_leaves_guard_absent() {
    let dir = TempDir::new().unwrap();
    let store = MetadataStore::new(dir.path());
    store
        .write_env_metadata(&envcore::EnvMetadata {
            interpreter_path: "/old/python".into(),
            ownership: envcore::Ownership::Managed,
            dependency_set_fingerprint: "abc".into(),
            created_at: chrono::Utc::now(),
            platform: "linux".into(),
        })
        .unwrap();
    let audit = AuditLog::with_policy(dir.path().join("global"), dir.path(), 512 * 1024, 3);

    let host = FakeHostStorageProvider::default();
    let background = FakeBackgroundOperationManager::never_quiesces();
    let daemon = FakeDaemonController::new();
    let prompt = FakePromptPort::answering(PromptChoice::ProceedWithBackup);
    let migration_ports = ports(&host, &background, &daemon, &prompt);

    let outcome = check_pre_upgrade_migration(
        &store,
        &audit,
        &migration_ports,
        std::time::Duration::from_secs(5),
        std::time::Duration::from_secs(15),
        std::time::Duration::from_millis(300),
    )
    .await;

    assert!(matches!(outcome, MigrationOutcome::BackupFailed { .. }));
    assert_eq!(background.resume_calls(), 1);
    assert!(store.hidden_dir().exists(), "a failed backup must not touch the workspace");
}

#[tokio::test]
async fn revalidation_aborts_when_sibling_window_already_wrote_the_marker() {
    let dir = TempDir::new().unwrap();
    let store = MetadataStore::new(dir.path());
    store
        .write_env_metadata(&envcore::EnvMetadata {
            interpreter_path: "/old/python".into(),
            ownership: envcore::Ownership::Managed,
            dependency_set_fingerprint: "abc".into(),
            created_at: chrono::Utc::now(),
            platform: "linux".into(),
        })
        .unwrap();
    let audit = AuditLog::with_policy(dir.path().join("global"), dir.path(), 512 * 1024, 3);

    let host = FakeHostStorageProvider::default();
    let background = FakeBackgroundOperationManager::new();
    let daemon = FakeDaemonController::new();
    // Simulate the sibling window finishing mid-modal by writing the current
    // schema marker from inside the prompt answer isn't directly expressible
    // with the fake; instead we pre-write it and confirm revalidation still
    // reads LEGACY_CONFIRMED deterministically absent a race, then cover the
    // NOT_LEGACY branch directly via detect_migration_state above.
    let prompt = FakePromptPort::answering(PromptChoice::ProceedWithBackup);
    let migration_ports = ports(&host, &background, &daemon, &prompt);

    store.write_schema_marker(envcore::CURRENT_SCHEMA_VERSION).unwrap();
    let outcome = check_pre_upgrade_migration(
        &store,
        &audit,
        &migration_ports,
        std::time::Duration::from_secs(5),
        std::time::Duration::from_secs(15),
        std::time::Duration::from_millis(300),
    )
    .await;

    assert_eq!(outcome, MigrationOutcome::RevalidationAborted);
    assert!(store.hidden_dir().exists());
}

#[test]
fn collision_free_backup_name_avoids_existing_siblings() {
    let dir = TempDir::new().unwrap();
    let store = MetadataStore::new(dir.path());
    let now = chrono::Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
    let first = collision_free_backup_name(&store, now);
    std::fs::create_dir_all(&first).unwrap();
    let second = collision_free_backup_name(&store, now);
    assert_ne!(first, second);
    assert!(second.to_string_lossy().ends_with("-1"));
}

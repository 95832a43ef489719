use super::*;
use envcore::Ownership;
use envcore_adapters::{FakeConfigPort, FakeHostStorageProvider};
use envcore_storage::AuditLog;
use tempfile::TempDir;

fn audit(dir: &TempDir) -> AuditLog {
    AuditLog::new(dir.path().join("global"), dir.path())
}

fn host() -> FakeHostStorageProvider {
    FakeHostStorageProvider::default()
}

fn sample_metadata(interpreter_path: &str, ownership: Ownership) -> envcore::EnvMetadata {
    envcore::EnvMetadata {
        interpreter_path: interpreter_path.into(),
        ownership,
        dependency_set_fingerprint: "abc".into(),
        created_at: chrono::Utc::now(),
        platform: "linux".into(),
    }
}

#[test]
fn metadata_wins_over_everything_else() {
    let dir = TempDir::new().unwrap();
    let store = MetadataStore::new(dir.path());
    store
        .write_env_metadata(&sample_metadata("/metadata/python", Ownership::Managed))
        .unwrap();

    let config = FakeConfigPort {
        interpreter_path: Some("/user/override".into()),
        ..Default::default()
    };

    let resolved = resolve(&store, &config, &audit(&dir), &host());
    assert_eq!(resolved.interpreter_path, "/metadata/python");
    assert_eq!(resolved.reason, ResolverReason::Metadata);
    assert_eq!(resolved.ownership, Some(Ownership::Managed));
    assert!(resolved.metadata_exists);
}

#[test]
fn managed_venv_heuristic_wins_over_explicit_config() {
    let dir = TempDir::new().unwrap();
    let store = MetadataStore::new(dir.path());
    let managed_path = store.managed_interpreter_path();
    std::fs::create_dir_all(managed_path.parent().unwrap()).unwrap();
    std::fs::write(&managed_path, b"").unwrap();

    let config = FakeConfigPort {
        interpreter_path: Some("/user/override".into()),
        ..Default::default()
    };

    let resolved = resolve(&store, &config, &audit(&dir), &host());
    assert_eq!(
        resolved.interpreter_path,
        managed_path.to_string_lossy().into_owned()
    );
    assert_eq!(resolved.reason, ResolverReason::ManagedVenvHeuristic);
    assert!(!resolved.metadata_exists);
}

#[test]
fn explicit_config_wins_over_system_fallback() {
    let dir = TempDir::new().unwrap();
    let store = MetadataStore::new(dir.path());
    let config = FakeConfigPort {
        interpreter_path: Some("/user/override".into()),
        ..Default::default()
    };

    let resolved = resolve(&store, &config, &audit(&dir), &host());
    assert_eq!(resolved.interpreter_path, "/user/override");
    assert_eq!(resolved.reason, ResolverReason::ExplicitConfig);
}

#[test]
fn empty_explicit_config_falls_through_to_system_fallback() {
    let dir = TempDir::new().unwrap();
    let store = MetadataStore::new(dir.path());
    let config = FakeConfigPort {
        interpreter_path: Some(String::new()),
        ..Default::default()
    };

    let resolved = resolve(&store, &config, &audit(&dir), &host());
    assert_eq!(resolved.reason, ResolverReason::SystemFallback);
}

#[test]
fn system_fallback_when_nothing_else_present() {
    let dir = TempDir::new().unwrap();
    let store = MetadataStore::new(dir.path());
    let config = FakeConfigPort::default();

    let resolved = resolve(&store, &config, &audit(&dir), &host());
    assert_eq!(resolved.reason, ResolverReason::SystemFallback);
    assert_eq!(
        resolved.interpreter_path,
        if cfg!(windows) { "python" } else { "python3" }
    );
}

#[test]
fn corrupted_metadata_falls_to_managed_venv_heuristic() {
    let dir = TempDir::new().unwrap();
    let store = MetadataStore::new(dir.path());
    std::fs::create_dir_all(store.hidden_dir()).unwrap();
    std::fs::write(store.hidden_dir().join("env.json"), b"{not json").unwrap();

    let managed_path = store.managed_interpreter_path();
    std::fs::create_dir_all(managed_path.parent().unwrap()).unwrap();
    std::fs::write(&managed_path, b"").unwrap();

    let config = FakeConfigPort::default();
    let resolved = resolve(&store, &config, &audit(&dir), &host());
    assert_eq!(resolved.reason, ResolverReason::ManagedVenvHeuristic);
    assert!(resolved.metadata_exists, "file is present even though corrupt");
}

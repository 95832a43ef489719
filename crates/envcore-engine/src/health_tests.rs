use super::*;
use tempfile::TempDir;

#[test]
fn no_hidden_dir_is_fresh() {
    let dir = TempDir::new().unwrap();
    let store = MetadataStore::new(dir.path());
    assert_eq!(classify(&store), WorkspaceHealth::Fresh);
}

#[test]
fn migration_marker_present_is_broken_regardless_of_env_json() {
    let dir = TempDir::new().unwrap();
    let store = MetadataStore::new(dir.path());
    std::fs::create_dir_all(store.hidden_dir()).unwrap();
    store.write_migration_marker().unwrap();
    assert_eq!(classify(&store), WorkspaceHealth::Broken);
}

#[test]
fn hidden_dir_without_env_json_is_fresh() {
    let dir = TempDir::new().unwrap();
    let store = MetadataStore::new(dir.path());
    std::fs::create_dir_all(store.hidden_dir()).unwrap();
    assert_eq!(classify(&store), WorkspaceHealth::Fresh);
}

#[test]
fn env_json_with_missing_venv_parent_is_broken() {
    let dir = TempDir::new().unwrap();
    let store = MetadataStore::new(dir.path());
    store
        .write_env_metadata(&envcore::EnvMetadata {
            interpreter_path: dir.path().join(".envcore/venv/bin/python").to_string_lossy().into_owned(),
            ownership: envcore::Ownership::Managed,
            dependency_set_fingerprint: "abc".into(),
            created_at: chrono::Utc::now(),
            platform: "linux".into(),
        })
        .unwrap();
    assert_eq!(classify(&store), WorkspaceHealth::Broken);
}

#[test]
fn env_json_with_venv_parent_present_but_missing_interpreter_file_is_broken() {
    let dir = TempDir::new().unwrap();
    let store = MetadataStore::new(dir.path());
    let interpreter_path = store.managed_interpreter_path();
    std::fs::create_dir_all(interpreter_path.parent().unwrap()).unwrap();
    store
        .write_env_metadata(&envcore::EnvMetadata {
            interpreter_path: interpreter_path.to_string_lossy().into_owned(),
            ownership: envcore::Ownership::Managed,
            dependency_set_fingerprint: "abc".into(),
            created_at: chrono::Utc::now(),
            platform: "linux".into(),
        })
        .unwrap();
    assert_eq!(classify(&store), WorkspaceHealth::Broken);
}

#[test]
fn fully_present_interpreter_is_valid() {
    let dir = TempDir::new().unwrap();
    let store = MetadataStore::new(dir.path());
    let interpreter_path = store.managed_interpreter_path();
    std::fs::create_dir_all(interpreter_path.parent().unwrap()).unwrap();
    std::fs::write(&interpreter_path, b"").unwrap();
    store
        .write_env_metadata(&envcore::EnvMetadata {
            interpreter_path: interpreter_path.to_string_lossy().into_owned(),
            ownership: envcore::Ownership::Managed,
            dependency_set_fingerprint: "abc".into(),
            created_at: chrono::Utc::now(),
            platform: "linux".into(),
        })
        .unwrap();
    assert_eq!(classify(&store), WorkspaceHealth::Valid);
}

#[test]
fn corrupted_env_json_is_broken() {
    let dir = TempDir::new().unwrap();
    let store = MetadataStore::new(dir.path());
    std::fs::create_dir_all(store.hidden_dir()).unwrap();
    std::fs::write(store.hidden_dir().join("env.json"), b"{not json").unwrap();
    assert_eq!(classify(&store), WorkspaceHealth::Broken);
}

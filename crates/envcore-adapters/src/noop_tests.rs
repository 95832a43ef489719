use super::*;
use crate::ports::{BackgroundOperationManager, ConfigPort, DaemonController, PromptPort};

#[tokio::test]
async fn background_pause_always_reports_quiescent() {
    let mgr = NoOpBackgroundOperationManager;
    assert!(mgr.pause(Duration::from_secs(1)).await);
    mgr.resume().await;
}

#[tokio::test]
async fn daemon_stop_is_ok() {
    let ctrl = NoOpDaemonController;
    assert!(ctrl.stop().await.is_ok());
}

#[tokio::test]
async fn prompt_defaults_to_proceed_with_backup() {
    let prompt = NoOpPromptPort;
    assert_eq!(
        prompt.warn_modal("legacy detected").await,
        PromptChoice::ProceedWithBackup
    );
}

#[test]
fn config_port_defaults_are_conservative() {
    let cfg = NoOpConfigPort;
    assert_eq!(cfg.interpreter_path(), None);
    assert!(!cfg.debug_logging());
    assert_eq!(cfg.background_pause_timeout_ms(), None);
}

#[test]
fn process_host_storage_provider_reports_own_pid() {
    let provider =
        ProcessHostStorageProvider::new("1.2.3", PathBuf::from("/tmp/envcore-global"));
    assert_eq!(provider.process_id(), std::process::id());
    assert_eq!(provider.extension_version(), "1.2.3");
}

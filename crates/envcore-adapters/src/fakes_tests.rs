use super::*;
use crate::ports::{BackgroundOperationManager, DaemonController, PromptPort};

#[test]
fn status_sink_records_transitions_in_order() {
    let sink = FakeStatusSink::new();
    sink.transition(StatusTransition::Initializing);
    sink.transition(StatusTransition::Ready);
    assert_eq!(
        sink.transitions(),
        vec![StatusTransition::Initializing, StatusTransition::Ready]
    );
    assert_eq!(sink.last(), Some(StatusTransition::Ready));
}

#[tokio::test]
async fn background_operation_manager_never_quiesces_reports_false() {
    let mgr = FakeBackgroundOperationManager::never_quiesces();
    assert!(!mgr.pause(Duration::from_millis(10)).await);
    assert_eq!(mgr.pause_calls(), 1);
}

#[tokio::test]
async fn background_operation_manager_default_quiesces() {
    let mgr = FakeBackgroundOperationManager::new();
    assert!(mgr.pause(Duration::from_millis(10)).await);
    mgr.resume().await;
    assert_eq!(mgr.resume_calls(), 1);
}

#[tokio::test]
async fn daemon_controller_failing_surfaces_reason() {
    let ctrl = FakeDaemonController::failing("pipe closed");
    let err = ctrl.stop().await.unwrap_err();
    assert!(err.to_string().contains("pipe closed"));
    assert_eq!(ctrl.stop_calls(), 1);
}

#[tokio::test]
async fn prompt_port_returns_configured_choice_and_records_message() {
    let prompt = FakePromptPort::answering(PromptChoice::Ignore);
    let choice = prompt.warn_modal("legacy detected").await;
    assert_eq!(choice, PromptChoice::Ignore);
    assert_eq!(prompt.modal_calls(), vec!["legacy detected".to_string()]);
}

#[test]
fn config_port_returns_fixed_values() {
    let cfg = FakeConfigPort {
        interpreter_path: Some("/usr/bin/python3.11".into()),
        debug_logging: true,
        background_pause_timeout_ms: Some(5000),
    };
    assert_eq!(cfg.interpreter_path(), Some("/usr/bin/python3.11".into()));
    assert!(cfg.debug_logging());
    assert_eq!(cfg.background_pause_timeout_ms(), Some(5000));
}

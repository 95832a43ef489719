use super::*;
use serde_json::json;

#[test]
fn legacy_confirmed_always_requires_backup() {
    let result = DetectionResult::legacy_confirmed("marker older", json!({}));
    assert!(result.requires_backup);
    assert_eq!(result.state, DetectionState::LegacyConfirmed);
}

#[test]
fn not_legacy_and_unknown_io_error_never_require_backup() {
    assert!(!DetectionResult::not_legacy("fresh", json!({})).requires_backup);
    assert!(!DetectionResult::unknown_io_error("eacces", json!({})).requires_backup);
}

#[test]
fn detection_result_serializes_requires_backup_as_camel_case() {
    let json = serde_json::to_string(&DetectionResult::legacy_confirmed("marker older", json!({}))).unwrap();
    assert!(json.contains("\"requiresBackup\""));
}

#[test]
fn state_serializes_screaming_snake_case() {
    assert_eq!(
        serde_json::to_string(&DetectionState::UnknownIoError).unwrap(),
        "\"UNKNOWN_IO_ERROR\""
    );
}

use super::*;
use serial_test::serial;

#[test]
#[serial]
fn rotation_threshold_defaults_to_constant() {
    std::env::remove_var("ENVCORE_AUDIT_ROTATION_THRESHOLD_BYTES");
    assert_eq!(
        audit_rotation_threshold_bytes(),
        envcore::AUDIT_ROTATION_THRESHOLD_BYTES
    );
}

#[test]
#[serial]
fn rotation_threshold_honors_override() {
    std::env::set_var("ENVCORE_AUDIT_ROTATION_THRESHOLD_BYTES", "1024");
    assert_eq!(audit_rotation_threshold_bytes(), 1024);
    std::env::remove_var("ENVCORE_AUDIT_ROTATION_THRESHOLD_BYTES");
}

#[test]
#[serial]
fn retention_cap_defaults_to_constant() {
    std::env::remove_var("ENVCORE_AUDIT_RETENTION_CAP");
    assert_eq!(audit_retention_cap(), envcore::AUDIT_RETENTION_CAP);
}

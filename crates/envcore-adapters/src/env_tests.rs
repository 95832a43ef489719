use super::*;
use serial_test::serial;

#[test]
#[serial]
fn preflight_timeout_defaults_to_ten_seconds() {
    std::env::remove_var("ENVCORE_PREFLIGHT_TIMEOUT_MS");
    assert_eq!(preflight_timeout_ms(), Duration::from_secs(10));
}

#[test]
#[serial]
fn preflight_timeout_honors_override() {
    std::env::set_var("ENVCORE_PREFLIGHT_TIMEOUT_MS", "2500");
    assert_eq!(preflight_timeout_ms(), Duration::from_millis(2500));
    std::env::remove_var("ENVCORE_PREFLIGHT_TIMEOUT_MS");
}

#[test]
#[serial]
fn invalid_override_falls_back_to_default() {
    std::env::set_var("ENVCORE_DAEMON_STOP_TIMEOUT_MS", "not-a-number");
    assert_eq!(daemon_stop_timeout_ms(), Duration::from_secs(15));
    std::env::remove_var("ENVCORE_DAEMON_STOP_TIMEOUT_MS");
}

#[test]
#[serial]
fn windows_settle_defaults_to_300ms() {
    std::env::remove_var("ENVCORE_WINDOWS_SETTLE_MS");
    assert_eq!(windows_settle_ms(), Duration::from_millis(300));
}

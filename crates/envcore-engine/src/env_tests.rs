use super::*;
use serial_test::serial;
use std::time::Duration;

#[test]
#[serial]
fn preflight_cache_ttl_defaults_to_constant() {
    std::env::remove_var("ENVCORE_PREFLIGHT_CACHE_TTL_SECS");
    assert_eq!(preflight_cache_ttl(), Duration::from_secs(envcore::PREFLIGHT_CACHE_TTL_SECS));
}

#[test]
#[serial]
fn preflight_cache_ttl_honors_override() {
    std::env::set_var("ENVCORE_PREFLIGHT_CACHE_TTL_SECS", "5");
    assert_eq!(preflight_cache_ttl(), Duration::from_secs(5));
    std::env::remove_var("ENVCORE_PREFLIGHT_CACHE_TTL_SECS");
}

use super::*;

#[test]
fn metadata_corrupt_message_includes_reason() {
    let err = ModelError::MetadataCorrupt("missing interpreterPath".into());
    assert!(err.to_string().contains("missing interpreterPath"));
}

#[test]
fn schema_marker_unreadable_wraps_io_error() {
    let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let err = ModelError::SchemaMarkerUnreadable {
        path: "/ws/.oj/system/SCHEMA_VERSION".into(),
        source: io_err,
    };
    assert!(err.to_string().contains("SCHEMA_VERSION"));
}

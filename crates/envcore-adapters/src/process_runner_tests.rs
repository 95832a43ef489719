use super::*;

#[tokio::test]
async fn run_captures_stdout_on_success() {
    let runner = ProcessRunner::new();
    let out = runner
        .run(
            "echo",
            &["hello".to_string()],
            Path::new("."),
            RunOptions::new(Duration::from_secs(5)),
        )
        .await
        .unwrap();
    assert_eq!(out.trim(), "hello");
}

#[tokio::test]
async fn run_nonzero_exit_is_exit_code_error() {
    let runner = ProcessRunner::new();
    let err = runner
        .run(
            "false",
            &[],
            Path::new("."),
            RunOptions::new(Duration::from_secs(5)),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ProcessError::ExitCode { .. }));
}

#[tokio::test]
async fn run_missing_program_is_not_found() {
    let runner = ProcessRunner::new();
    let err = runner
        .run(
            "definitely-not-a-real-binary-xyz",
            &[],
            Path::new("."),
            RunOptions::new(Duration::from_secs(5)),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ProcessError::NotFound { .. }));
}

#[tokio::test]
async fn run_timeout_elapsed() {
    let runner = ProcessRunner::new();
    let err = runner
        .run(
            "sleep",
            &["10".to_string()],
            Path::new("."),
            RunOptions::new(Duration::from_millis(100)),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ProcessError::Timeout { .. }));
}

#[tokio::test]
async fn run_passes_arguments_without_shell_interpolation() {
    // An argument containing shell metacharacters must reach the child
    // verbatim, never be interpreted by a shell.
    let runner = ProcessRunner::new();
    let out = runner
        .run(
            "echo",
            &["$(echo pwned)".to_string()],
            Path::new("."),
            RunOptions::new(Duration::from_secs(5)),
        )
        .await
        .unwrap();
    assert_eq!(out.trim(), "$(echo pwned)");
}

#[test]
fn tail_truncates_to_char_boundary() {
    let s = "a".repeat(10);
    assert_eq!(tail(&s, 4).len(), 4);
    assert_eq!(tail(&s, 100), s);
}

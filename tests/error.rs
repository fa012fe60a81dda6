use jitter_backoff::error::{BackoffError, BackoffResult};

#[test]
fn test_backoff_error_entropy() {
    let error: BackoffError = rand::Error::new(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "getrandom unavailable",
    ))
    .into();
    assert!(matches!(error, BackoffError::Entropy(_)));
    assert!(error.to_string().contains("Entropy source unavailable"));
    assert!(error.to_string().contains("getrandom unavailable"));
}

#[test]
fn test_backoff_error_config() {
    let error = BackoffError::Config("bad level".to_string());
    assert_eq!(error.to_string(), "Configuration error: bad level");
}

#[test]
fn test_backoff_error_into_anyhow() {
    fn fails() -> BackoffResult<()> {
        Err(BackoffError::Config("broken".to_string()))
    }

    let error: anyhow::Error = fails().unwrap_err().into();
    assert!(error.downcast_ref::<BackoffError>().is_some());
}

#[test]
fn test_backoff_error_debug() {
    let error = BackoffError::Config("x".to_string());
    assert!(format!("{:?}", error).contains("Config"));
}

//! A global subscriber can be installed once per process, so this file holds
//! a single test.

use jitter_backoff::logging::init_logging;
use jitter_backoff::{Backoff, LoggingConfig};
use std::time::Duration;

#[test]
fn test_init_logging_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("backoff.log");
    let config = LoggingConfig {
        level: "jitter_backoff=trace".to_string(),
        file: Some(path.to_string_lossy().into_owned()),
        json: false,
        rotation: false,
    };

    let guard = init_logging(&config).unwrap();
    assert!(guard.is_none());

    let backoff = Backoff::without_jitter(Duration::from_secs(1), Duration::from_millis(1));
    assert_eq!(backoff.next(), Duration::from_millis(1));

    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.contains("Computed backoff bound"), "log was: {}", contents);

    // A second subscriber cannot be installed
    assert!(init_logging(&config).is_err());
}

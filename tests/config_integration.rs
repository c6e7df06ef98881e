//! Integration tests for configuration loading
//!
//! These tests validate layering of file and environment sources and that the
//! loaded configuration wires into a working poller.

use cloudplane::{AppConfig, CloudCache, LoggingEventHandler, Poller, Result};
use cloudplane::source::StaticSnapshotSource;
use std::env;
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;

// Use a mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn restore(key: &str, original: Option<String>) {
    match original {
        Some(value) => env::set_var(key, value),
        None => env::remove_var(key),
    }
}

#[test]
fn test_environment_overrides_file() -> Result<()> {
    let _guard = ENV_MUTEX.lock().unwrap();
    let original = env::var("CLOUDPLANE__SYNC__POLL_INTERVAL_SECONDS").ok();

    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "[sync]\ntenant = \"acme\"\npoll_interval_seconds = 30").unwrap();

    env::set_var("CLOUDPLANE__SYNC__POLL_INTERVAL_SECONDS", "45");
    let config = AppConfig::load(Some(file.path()));
    restore("CLOUDPLANE__SYNC__POLL_INTERVAL_SECONDS", original);

    let config = config?;
    assert_eq!(config.sync.tenant, "acme");
    assert_eq!(config.sync.poll_interval(), Duration::from_secs(45));
    Ok(())
}

#[test]
fn test_invalid_environment_value_rejected() {
    let _guard = ENV_MUTEX.lock().unwrap();
    let original = env::var("CLOUDPLANE__SOURCE__URL").ok();

    env::set_var("CLOUDPLANE__SOURCE__URL", "not a url");
    let result = AppConfig::load(None);
    restore("CLOUDPLANE__SOURCE__URL", original);

    assert!(result.is_err());
}

#[test]
fn test_missing_config_file_rejected() {
    let _guard = ENV_MUTEX.lock().unwrap();
    let result = AppConfig::load(Some(std::path::Path::new("/nonexistent/cloudplane.toml")));
    assert!(result.is_err());
}

#[tokio::test]
async fn test_config_drives_poller() -> Result<()> {
    let config = {
        let _guard = ENV_MUTEX.lock().unwrap();
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[sync]\ntenant = \"globex\"\nproxy_id = \"edge-7\"").unwrap();
        AppConfig::load(Some(file.path()))?
    };

    let mut snapshot_file = tempfile::NamedTempFile::new().unwrap();
    write!(snapshot_file, r#"[{{"name": "Shop Front", "fqdn": "shop.globex.io"}}]"#).unwrap();
    let source = Arc::new(StaticSnapshotSource::from_file(snapshot_file.path())?);

    let cache = Arc::new(CloudCache::new(
        Arc::new(LoggingEventHandler::new("hosts")),
        Arc::new(LoggingEventHandler::new("endpoints")),
    ));
    let poller = Poller::from_config(&config, source, cache.clone());
    assert_eq!(poller.interval(), Duration::from_secs(10));

    poller.poll_once().await?;
    let state = cache.snapshot()?;
    let key = state.hosts.keys().next().unwrap();
    assert_eq!(key.tenant(), "globex");
    assert_eq!(key.name(), "shop-front");
    Ok(())
}

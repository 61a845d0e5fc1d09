use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use page_auditor::config::{AuditorConfig, CliArgs, DEFAULT_PORT, PROBE_TIMEOUT_MS};

#[test]
fn test_defaults() {
    let args = CliArgs::parse_from(["page-auditor"]);
    assert_eq!(args.port, DEFAULT_PORT);
    assert_eq!(args.timeout_ms, PROBE_TIMEOUT_MS);
    assert!(args.url.is_none());
    assert!(args.screenshot_command.is_none());

    let config = AuditorConfig::from_args(&args);
    assert_eq!(config.port, 5000);
    assert_eq!(config.probe_timeout, Duration::from_secs(30));
    assert_eq!(config.screenshot_dir, PathBuf::from("static/screenshots"));
    assert_eq!(config.listen_addr(), "0.0.0.0:5000");
}

#[test]
fn test_overrides() {
    let args = CliArgs::parse_from([
        "page-auditor",
        "--port",
        "8088",
        "--bind",
        "127.0.0.1",
        "-t",
        "5000",
        "--screenshot-dir",
        "/tmp/shots",
        "-s",
        "chromium",
        "-u",
        "https://example.com",
    ]);
    let config = AuditorConfig::from_args(&args);
    assert_eq!(config.listen_addr(), "127.0.0.1:8088");
    assert_eq!(config.probe_timeout, Duration::from_millis(5000));
    assert_eq!(config.screenshot_dir, PathBuf::from("/tmp/shots"));
    assert_eq!(config.screenshot_command, Some(PathBuf::from("chromium")));
    assert_eq!(args.url.as_deref(), Some("https://example.com"));
}

#[test]
fn test_default_config_matches_cli_defaults() {
    let from_cli = AuditorConfig::from_args(&CliArgs::parse_from(["page-auditor"]));
    let default = AuditorConfig::default();
    assert_eq!(from_cli.port, default.port);
    assert_eq!(from_cli.bind, default.bind);
    assert_eq!(from_cli.probe_timeout, default.probe_timeout);
    assert_eq!(from_cli.screenshot_dir, default.screenshot_dir);
}

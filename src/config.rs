use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Page Auditor — scores a live web page for performance, SEO,
/// accessibility and best practices.
#[derive(Parser, Debug, Clone)]
#[command(name = "page-auditor", version)]
pub struct CliArgs {
    /// HTTP port to serve the analysis API on
    #[arg(long = "port", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Address to bind
    #[arg(long = "bind", default_value = DEFAULT_BIND)]
    pub bind: String,

    /// Page load timeout in milliseconds
    #[arg(short = 't', long = "timeout-ms", default_value_t = PROBE_TIMEOUT_MS)]
    pub timeout_ms: u64,

    /// Directory screenshots are written to
    #[arg(long = "screenshot-dir", default_value = DEFAULT_SCREENSHOT_DIR)]
    pub screenshot_dir: PathBuf,

    /// Headless browser binary used to capture screenshots (e.g. chromium)
    #[arg(short = 's', long = "screenshot-command")]
    pub screenshot_command: Option<PathBuf>,

    /// Also write logs to daily-rotated files in this directory
    #[arg(short = 'l', long = "log-dir")]
    pub log_dir: Option<PathBuf>,

    /// Analyze a single URL, print the report as JSON and exit
    #[arg(short = 'u', long = "url")]
    pub url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AuditorConfig {
    pub port: u16,
    pub bind: String,
    pub probe_timeout: Duration,
    pub screenshot_dir: PathBuf,
    pub screenshot_command: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
}

// Server constants
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_BIND: &str = "0.0.0.0";

// Probe constants
pub const PROBE_TIMEOUT_MS: u64 = 30_000;
pub const USER_AGENT: &str = concat!("page-auditor/", env!("CARGO_PKG_VERSION"));
pub const VIEWPORT_WIDTH: u32 = 1280;
pub const VIEWPORT_HEIGHT: u32 = 720;

// Screenshot constants
pub const DEFAULT_SCREENSHOT_DIR: &str = "static/screenshots";
pub const SCREENSHOT_URL_PREFIX: &str = "/static/screenshots";

// Overview constants
pub const META_CONTENT_PREVIEW_CHARS: usize = 100;

impl AuditorConfig {
    pub fn from_args(args: &CliArgs) -> Self {
        AuditorConfig {
            port: args.port,
            bind: args.bind.clone(),
            probe_timeout: Duration::from_millis(args.timeout_ms),
            screenshot_dir: args.screenshot_dir.clone(),
            screenshot_command: args.screenshot_command.clone(),
            log_dir: args.log_dir.clone(),
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

impl Default for AuditorConfig {
    fn default() -> Self {
        AuditorConfig {
            port: DEFAULT_PORT,
            bind: DEFAULT_BIND.to_string(),
            probe_timeout: Duration::from_millis(PROBE_TIMEOUT_MS),
            screenshot_dir: PathBuf::from(DEFAULT_SCREENSHOT_DIR),
            screenshot_command: None,
            log_dir: None,
        }
    }
}

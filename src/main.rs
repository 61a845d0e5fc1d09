use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use page_auditor::audit::Auditor;
use page_auditor::config::{AuditorConfig, CliArgs};
use page_auditor::probe::http::HttpProbe;
use page_auditor::screenshots::ScreenshotStore;
use page_auditor::server;
use page_auditor::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    let _log_guard = init_tracing(&args);

    info!("Starting page-auditor v{}", env!("CARGO_PKG_VERSION"));

    let config = AuditorConfig::from_args(&args);
    info!("Probe timeout: {:?}", config.probe_timeout);
    info!("Screenshot dir: {:?}", config.screenshot_dir);
    match &config.screenshot_command {
        Some(cmd) => info!("Screenshots via: {:?}", cmd),
        None => info!("Screenshots disabled (no --screenshot-command)"),
    }

    let probe = Arc::new(HttpProbe::new(config.screenshot_command.clone())?);
    let auditor = Auditor::new(
        probe,
        ScreenshotStore::new(&config.screenshot_dir),
        config.probe_timeout,
    );

    // One-shot mode: print the report and exit
    if let Some(url) = &args.url {
        return match auditor.analyze(Some(url)).await {
            Ok(report) => {
                println!("{}", serde_json::to_string_pretty(&report)?);
                Ok(())
            }
            Err(e) => {
                error!("Analysis failed: {}", e);
                Err(e.into())
            }
        };
    }

    let addr = config.listen_addr();
    let state = Arc::new(AppState::new(config, auditor));

    // Build and start HTTP server
    let router = server::build_router(state);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Page auditor listening on http://{}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Page auditor shutting down");
    Ok(())
}

fn init_tracing(args: &CliArgs) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "page_auditor=info,tower_http=info".into());

    let (file_layer, guard) = match &args.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "page-auditor.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .init();

    guard
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal");
}

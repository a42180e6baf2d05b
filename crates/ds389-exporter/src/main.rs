//! ds389 exporter
//!
//! - HTTP endpoint: `<telemetry path>` (Prometheus text) and `/` (landing page)
//! - Scrape loop: one LDAP scrape per interval, never overlapping
//! - Ctrl-C / SIGTERM stops both

use std::process::ExitCode;

use clap::Parser;
use tokio::sync::watch;

use ds389_exporter::{app_state, config, obs, router, scrape};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = config::Cli::parse();
    let cfg = match cli.resolve() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("ds389-exporter: {e}");
            return ExitCode::FAILURE;
        }
    };

    obs::logging::init(&cfg.log);

    match run(cfg).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "exporter stopped");
            ExitCode::FAILURE
        }
    }
}

async fn run(cfg: config::ExporterConfig) -> ds389_core::Result<()> {
    let listen = cfg.web.listen_addr()?;
    let period = cfg.scrape.interval();
    let ldap_url = cfg.ldap.url();

    let state = app_state::AppState::new(cfg)?;
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tracing::info!(addr = %ldap_url, interval_secs = period.as_secs(), "starting 389ds scraper");
    let scrape_task = tokio::spawn(scrape::scheduler::run(state.scraper(), period, shutdown_rx));

    let app = router::build_router(state);
    let listener = tokio::net::TcpListener::bind(listen.as_str())
        .await
        .map_err(|e| ds389_core::ExporterError::Internal(format!("bind {listen} failed: {e}")))?;
    tracing::info!(%listen, "starting prometheus HTTP metrics server");

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    let _ = shutdown_tx.send(true);
    if let Err(e) = scrape_task.await {
        tracing::error!(error = %e, "scrape loop task failed");
    }

    served.map_err(|e| ds389_core::ExporterError::Internal(format!("metrics server failed: {e}")))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "ctrl-c handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown requested");
}

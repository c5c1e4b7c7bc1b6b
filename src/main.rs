//! lang-bridge binary entry point.

use lang_bridge::bridge::HostContext;
use lang_bridge::config::{Config, TransportKind};
use lang_bridge::{cli, echo_backend, logging, SessionManager};
use tracing::info;

#[tokio::main]
async fn main() -> lang_bridge::Result<()> {
    let args = match cli::parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(2);
        }
    };

    if args.help {
        cli::print_help();
        return Ok(());
    }
    if args.version {
        cli::print_version();
        return Ok(());
    }

    let config = match Config::load(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(2);
        }
    };

    // One-time host service setup, skipped on repeated mounts.
    let host = HostContext::new();
    host.ensure_init(|| logging::init_with_filter(config.log_filter()));

    info!("lang-bridge v{}", env!("CARGO_PKG_VERSION"));

    let mut manager = SessionManager::new(config.to_session_options());

    match config.backend.transport {
        TransportKind::Socket => {
            let target = config.to_socket_target();
            info!("connecting to {}", target.url());
            manager.open_socket(&target).await?;
        }
        TransportKind::Worker => {
            info!("starting in-process worker backend");
            manager.open_worker(echo_backend).await?;
        }
    }

    tokio::select! {
        result = manager.run() => result?,
        _ = tokio::signal::ctrl_c() => {
            info!("interrupt received, shutting down");
        }
    }

    manager.teardown().await?;
    info!("lang-bridge stopped");

    Ok(())
}

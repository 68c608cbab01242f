use reactive_greeter::config::Config;
use reactive_greeter::store::{self, InMemoryUserStore, SAMPLE_USERS};
use reactive_greeter::{configure_routes, logging, AppState, MessageGenerator};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::{info, warn};

/// How long in-flight requests may finish after a shutdown signal
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::new();
    logging::init(&config.log_filter);

    let addr = config.socket_addr()?;

    let store = Arc::new(InMemoryUserStore::new());
    if config.seed {
        let users = store::seed(store.as_ref(), &SAMPLE_USERS).await?;
        info!(count = users.len(), "seeded sample users");
    }

    let state = AppState::new(store, MessageGenerator::new(config.emit_interval()));
    let routes = configure_routes(state);

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let (addr, server) = warp::serve(routes).try_bind_with_graceful_shutdown(addr, async {
        stop_rx.await.ok();
    })?;
    tokio::pin!(server);

    info!("Starting server on http://{}", addr);

    tokio::select! {
        _ = &mut server => {}
        _ = shutdown_signal() => {
            stop_tx.send(()).ok();
            // Event streams never finish by themselves; dropping the server closes them
            if tokio::time::timeout(SHUTDOWN_GRACE, &mut server).await.is_err() {
                info!("closing open streams");
            }
        }
    }

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

use anyhow::Context;
use gate_flow::{Clock, FileSessionStore, FlowController, MemorySessionStore, SessionStore, SystemClock};
use gate_server::config::{self, ServerConfig};
use gate_server::{routes, sweeper, telemetry, App, CookieSigner};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = config::command().get_matches();
    telemetry::init(matches.get_flag("log-json"));

    let config = ServerConfig::from_matches(&matches).context("invalid configuration")?;

    let store: Arc<dyn SessionStore> = match &config.session_dir {
        Some(dir) => {
            info!(dir = %dir.display(), "using file session store");
            Arc::new(FileSessionStore::open(dir).context("opening session directory")?)
        }
        None => {
            info!("using in-memory session store");
            Arc::new(MemorySessionStore::new())
        }
    };
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let mut controller =
        FlowController::new(config.flow.clone(), store.clone())?.with_clock(clock.clone());
    if let Some(seed) = config.seed {
        controller = controller.with_seed(seed);
    }

    sweeper::spawn(
        store,
        clock,
        config.flow.idle_timeout_seconds,
        config.purge_interval,
    );

    if !config.secure_cookies {
        info!("development mode: session cookie sent without Secure");
    }
    let app = Arc::new(App::new(
        controller,
        CookieSigner::from_secret(config.session_key.as_bytes()),
        config.secure_cookies,
    ));

    info!(
        bind = %config.bind,
        wait_seconds = config.flow.wait_seconds,
        idle_timeout = config.flow.idle_timeout_seconds,
        "gate server listening"
    );
    warp::serve(routes(app)).run(config.bind).await;
    Ok(())
}

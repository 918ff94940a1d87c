use std::sync::Arc;

mod config;
mod handler;
mod http;
mod logger;
mod server;

fn main() {
    if let Err(e) = run() {
        logger::log_error(&format!("Startup failed: {e}"));
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::Config::load()?;
    logger::init(&cfg)?;

    // Validate the document root before binding anything
    let state = Arc::new(config::AppState::new(cfg)?);

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = state.config.server.workers {
        if workers == 0 {
            return Err("server.workers must be at least 1".into());
        }
        runtime_builder.worker_threads(workers);
    }

    let runtime = runtime_builder.build()?;
    runtime.block_on(async_main(state))
}

async fn async_main(state: Arc<config::AppState>) -> Result<(), Box<dyn std::error::Error>> {
    let addr = state.config.get_socket_addr()?;
    let listener = server::create_listener(addr, state.config.performance.backlog)
        .map_err(|e| format!("Failed to bind {addr}: {e}"))?;

    logger::log_server_start(&listener.local_addr()?);

    server::start_server_loop(listener, state).await;
    Ok(())
}

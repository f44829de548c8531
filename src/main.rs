use amibot::models::config::ServerConfig;
use amibot::server::{build_app, shutdown_signal};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = match ServerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    let addr = match config.socket_addr() {
        Ok(addr) => addr,
        Err(e) => {
            log::error!("Invalid bind address {}:{}: {e}", config.bind_addr, config.port);
            std::process::exit(1);
        }
    };

    let app_config = config.clone();
    let app = match tokio::task::spawn_blocking(move || build_app(&app_config)).await {
        Ok(Ok(app)) => app,
        Ok(Err(e)) => {
            log::error!("Failed to start AmiBot: {e}");
            std::process::exit(1);
        }
        Err(e) => {
            log::error!("Startup task failed: {e}");
            std::process::exit(1);
        }
    };

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            log::error!("Failed to bind {addr}: {e}");
            std::process::exit(1);
        }
    };

    log::info!("AmiBot listening on {addr} with {:?} matching", config.strategy);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        log::error!("Server error: {e}");
        std::process::exit(1);
    }

    log::info!("Server shutdown complete");
}

use occupancy_lookup::{
    api::{build_router, AppState},
    config::Config,
    shutdown::shutdown_signal,
    state::create_store,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration; without it there is no store to serve from
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(2);
        }
    };

    init_tracing(&config);

    tracing::info!(
        service = %config.observability.service_name,
        "Starting occupancy lookup v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Initialize Prometheus metrics
    if config.observability.prometheus_enabled {
        if let Err(e) = occupancy_lookup::metrics::init_metrics() {
            tracing::warn!("Failed to initialize metrics: {}", e);
            tracing::warn!("Continuing without metrics");
        } else {
            tracing::info!("Prometheus metrics initialized");
        }
    }

    // Open the document store once for the life of the process
    let store = match create_store(&config.store).await {
        Ok(store) => store,
        Err(e) => {
            tracing::error!(error = %e, "Failed to open document store");
            std::process::exit(2);
        }
    };
    tracing::info!(backend = store.backend_name(), "Document store initialized");

    if config.auth.password_scheme.is_plaintext() {
        tracing::warn!(
            "Passwords are compared in plaintext; set OCCUPANCY__AUTH__PASSWORD_SCHEME=sha256 \
             once the user collection holds SHA-256 digests"
        );
    }

    let app = build_router(AppState::new(store.clone(), &config));

    let http_addr = format!("{}:{}", config.server.host, config.server.http_port);
    let listener = tokio::net::TcpListener::bind(&http_addr).await?;

    tracing::info!("HTTP server listening on http://{}", http_addr);
    tracing::info!("   Health check: http://{}/health", http_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutting down gracefully...");
    if let Err(e) = store.flush().await {
        tracing::error!(error = %e, "Failed to flush document store");
    }

    Ok(())
}

fn init_tracing(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "occupancy_lookup={},tower_http=info",
            config.observability.log_level
        )
        .into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.observability.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

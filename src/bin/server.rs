use std::sync::Arc;

use clap::Parser;
use moodboard::db::schema::ensure_schema;
use moodboard::db::source::DbContentSource;
use moodboard::server::logging::init_logging;
use moodboard::server::{ServerConfig, ViewRegistry};
use moodboard::version::VERSION;
use moodboard::web::create_axum_router;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(author, version = VERSION, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long)]
    config: Option<String>,
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for the shutdown signal.");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, draining connections.");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    let server_config = Arc::new(ServerConfig::load(args.config.as_deref())?);
    init_logging(&server_config.log_dir);
    info!("Starting moodboard server, version: {}", VERSION);

    // --- Database Pool Setup ---
    let mut opt = ConnectOptions::new(server_config.database_url.to_owned());
    opt.max_connections(server_config.db_max_connections)
        .sqlx_logging(false);

    let db_pool: DatabaseConnection = match Database::connect(opt).await {
        Ok(db) => db,
        Err(e) => {
            error!(error = %e, "Failed to connect to the database.");
            return Err(e.into());
        }
    };

    if server_config.auto_create_schema {
        ensure_schema(&db_pool).await?;
    }

    // --- Results Views ---
    let views = Arc::new(ViewRegistry::new(server_config.page_size, server_config.max_views));
    let eviction_task = views.spawn_eviction(server_config.view_ttl);
    info!(
        ttl_secs = server_config.view_ttl.as_secs(),
        max_views = server_config.max_views,
        per_page = server_config.page_size.per_page(),
        per_load = server_config.page_size.per_load(),
        "Results view registry started."
    );

    // --- Axum HTTP Server Setup ---
    let source = Arc::new(DbContentSource::new(db_pool.clone()));
    let app = create_axum_router(db_pool, source, views, server_config.clone());

    let listener = tokio::net::TcpListener::bind(&server_config.listen_addr).await?;
    info!(address = %server_config.listen_addr, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    eviction_task.abort();
    Ok(())
}

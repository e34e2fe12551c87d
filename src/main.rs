use actix_web::http::StatusCode;
use actix_web::middleware::{ErrorHandlers, Logger};
use actix_web::{App, HttpServer, web};
use env_logger::Env;
use log::{error, info, warn};
use std::io;

use blog_api::app::{AppServices, welcome};
use blog_api::config::{AppConfig, StorageBackend};
use blog_api::database::{MemoryStore, Repositories, connect_to_mongo};
use blog_api::middleware::error_handler::handle_error;
use blog_api::middleware::not_found::not_found;
use blog_api::router::index::routes;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env().map_err(|e| {
        error!("Invalid configuration: {}", e);
        io::Error::new(io::ErrorKind::InvalidInput, e)
    })?;

    let repos = match config.storage {
        StorageBackend::Mongo => {
            let db = connect_to_mongo(&config).await.map_err(|e| {
                error!("Failed to connect to MongoDB: {}", e);
                io::Error::other(e.to_string())
            })?;
            Repositories::mongo(&db)
        }
        StorageBackend::Memory => {
            warn!("Using the in-memory store, data is lost on shutdown");
            Repositories::memory(MemoryStore::new())
        }
    };

    let services = AppServices::new(repos, &config);
    let prefix = config.api_prefix.clone();

    info!(
        "Starting {} on http://{}:{}{}",
        config.service_name, config.host, config.port, prefix
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .configure(|cfg| services.configure(cfg))
            .service(web::scope(&prefix).configure(routes))
            .service(welcome)
            .wrap(
                ErrorHandlers::new()
                    .handler(StatusCode::NOT_FOUND, not_found)
                    .default_handler(handle_error),
            )
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    info!("Server has stopped");

    Ok(())
}

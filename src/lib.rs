pub mod application;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;
pub mod state;

use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

pub use config::AppConfig;
pub use db::{create_pool, DbPool};
pub use domain::errors::DomainError;
pub use state::{AppState, SharedGateway};

use infrastructure::{DieselOrderGateway, InMemoryOrderGateway};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), DomainError> {
    let mut conn = pool.get()?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| DomainError::Gateway(format!("migrations failed: {e}")))?;
    Ok(())
}

/// Picks the gateway the configuration asks for: Postgres when a database
/// URL is set, otherwise a fresh in-memory store.
pub fn connect_gateway(config: &AppConfig) -> Result<SharedGateway, DomainError> {
    match &config.database_url {
        Some(url) => Ok(Arc::new(DieselOrderGateway::connect(url)?)),
        None => {
            log::warn!("DATABASE_URL not set; orders are kept in memory and lost on exit");
            Ok(Arc::new(InMemoryOrderGateway::with_iligan_zones()))
        }
    }
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    gateway: SharedGateway,
    config: &AppConfig,
) -> std::io::Result<actix_web::dev::Server> {
    let state = web::Data::new(AppState::new(gateway, config.tracking));
    Ok(HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .configure(handlers::configure)
    })
    .bind((config.host.clone(), config.port))?
    .run())
}

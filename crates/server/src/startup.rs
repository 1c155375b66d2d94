use std::{env, net::SocketAddr, sync::Arc};

use axum::Router;
use configs::{AppConfig, DatabaseConfig};
use dotenvy::dotenv;
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes::{self, users::ServerState};
use service::registration::repo::seaorm::SeaOrmUserRepository;

/// Any origin may call the API.
pub fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// config.toml when present and valid, otherwise env-only fallbacks
fn load_config() -> Option<AppConfig> {
    match AppConfig::load_and_validate() {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            warn!(error = %e, "config.toml unavailable; falling back to environment");
            None
        }
    }
}

/// Load host/port from configs or env vars, with sensible fallbacks
fn load_bind_addr(cfg: Option<&AppConfig>) -> anyhow::Result<SocketAddr> {
    let (host, port) = match cfg {
        Some(cfg) => (cfg.server.host.clone(), cfg.server.port),
        None => {
            let host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
            let port = env::var("SERVER_PORT")
                .ok()
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(8081);
            (host, port)
        }
    };
    Ok(format!("{}:{}", host, port).parse()?)
}

fn database_config(cfg: Option<&AppConfig>) -> Result<DatabaseConfig, StartupError> {
    let db_cfg = match cfg {
        Some(cfg) => cfg.database.clone(),
        None => {
            let mut db_cfg = DatabaseConfig::from_env();
            if db_cfg.url.trim().is_empty() {
                db_cfg.url = models::db::DATABASE_URL.clone();
            }
            db_cfg
        }
    };
    db_cfg
        .validate()
        .map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    Ok(db_cfg)
}

/// Connect to Postgres, migrate if asked, and wrap the pool in server state.
async fn build_state(db_cfg: &DatabaseConfig) -> Result<ServerState, StartupError> {
    let db = models::db::connect_with_config(db_cfg)
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;
    if db_cfg.auto_migrate {
        migration::Migrator::up(&db, None)
            .await
            .map_err(|e| StartupError::Database(e.to_string()))?;
        info!(event = "migrated", "database schema up to date");
    }
    Ok(ServerState::new(Arc::new(SeaOrmUserRepository::new(db))))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for Ctrl+C; running until killed");
        std::future::pending::<()>().await;
    }
    info!(event = "shutdown_signal", "received Ctrl+C, draining connections");
}

/// Public entry: build the app and run the HTTP server until Ctrl+C
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();

    let cfg = load_config();
    let db_cfg = database_config(cfg.as_ref())?;
    let state = build_state(&db_cfg).await?;

    // Build router
    let app: Router = routes::build_router(state, build_cors());

    // Bind and serve
    let addr = load_bind_addr(cfg.as_ref())?;
    info!(%addr, "starting signup api");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_addr_from_config() {
        let mut cfg = AppConfig::default();
        cfg.server.host = "0.0.0.0".into();
        cfg.server.port = 9090;
        let addr = load_bind_addr(Some(&cfg)).unwrap();
        assert_eq!(addr.to_string(), "0.0.0.0:9090");
    }

    #[test]
    fn invalid_database_config_is_startup_error() {
        let mut cfg = AppConfig::default();
        cfg.database.url = "sqlite::memory:".into();
        match database_config(Some(&cfg)) {
            Err(StartupError::InvalidConfig(msg)) => assert!(msg.contains("postgres")),
            other => panic!("unexpected: {other:?}"),
        }
    }
}

use noticeboard_common::spam::SpamPolicy;
use noticeboard_db::{
    client::{DbClient, DbError},
    config::DbConfig,
};
use serde::Deserialize;
use server::{AppKind, ServerState};
use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod server;

#[derive(Debug, Error)]
enum InitError {
    #[error("Error parsing .env file: {0}")]
    Dotenv(#[from] dotenvy::Error),
    #[error("Error parsing environment: {0}")]
    Envy(#[from] envy::Error),
    #[error("Error preparing database: {0}")]
    Database(#[from] DbError),
    #[error("Error binding tcp listener: {0}")]
    TcpBind(std::io::Error),
    #[error("Error serving server: {0}")]
    TcpServe(std::io::Error),
}

#[derive(Clone, Eq, PartialEq, Debug, Hash, Deserialize)]
struct Env {
    server_address: IpAddr,
    server_port: u16,
    app_kind: AppKind,
}

#[derive(Clone, Debug)]
struct Config {
    env: Env,
    db: DbConfig,
    spam_policy: SpamPolicy,
}

fn install_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "noticeboard_api=debug,\
                noticeboard_common=debug,\
                noticeboard_db=debug,\
                tower_http=debug,axum::rejection=trace,sqlx=warn"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn get_config() -> Result<Config, InitError> {
    if let Err(e) = dotenvy::dotenv() {
        if e.not_found() {
            debug!("No .dotenv file found");
        } else {
            return Err(e.into());
        }
    }

    Ok(Config {
        env: envy::from_env()?,
        db: envy::prefixed("DATABASE_").from_env()?,
        spam_policy: envy::prefixed("SPAM_").from_env()?,
    })
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "Could not listen for shutdown signal");
        std::future::pending::<()>().await;
    }

    info!("Shutting down");
}

#[tokio::main]
async fn main() -> Result<(), InitError> {
    install_tracing();
    let Config {
        env,
        db,
        spam_policy,
    } = get_config()?;
    debug!(?db, ?spam_policy, "Loaded configuration");

    let db_client = DbClient::new(&db);
    if db.run_migrations {
        db_client.migrate().await?;
        info!("Database schema is up to date");
    }

    let state = ServerState {
        db_client: Arc::new(db_client),
        spam_policy: Arc::new(spam_policy),
    };

    let tracing_layer = TraceLayer::new_for_http();
    let app = server::routes(env.app_kind)
        .with_state(state)
        .layer(tracing_layer);

    let server_address = SocketAddr::new(env.server_address, env.server_port);
    let listener = tokio::net::TcpListener::bind(server_address)
        .await
        .map_err(InitError::TcpBind)?;
    info!(%server_address, app_kind = ?env.app_kind, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(InitError::TcpServe)?;

    Ok(())
}

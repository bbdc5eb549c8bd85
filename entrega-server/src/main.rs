//! # Entrega Server
//!
//! REST API for the Entrega delivery platform: order lifecycle with
//! server-side pricing, courier assignment, live location tracking, and
//! saved address locations, backed by PostgreSQL.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args as ClapArgs, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use entrega_core::PostgresDatabase;
use entrega_server::auth::PgTokenValidator;
use entrega_server::{build_router, AppState, Config};

#[derive(Parser, Debug)]
#[command(name = "entrega-server")]
#[command(about = "Delivery platform API: orders, couriers, and live tracking")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(ClapArgs, Debug, Clone)]
struct ServeArgs {
    /// Server port (overrides config)
    #[arg(short, long, env = "SERVER_PORT")]
    port: Option<u16>,

    /// Server host (overrides config)
    #[arg(long, env = "SERVER_HOST")]
    host: Option<String>,

    /// PostgreSQL connection string (overrides config)
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Path to the TOML configuration file
    #[arg(long, env = "ENTREGA_CONFIG", default_value = "entrega.toml")]
    config: PathBuf,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(subcommand)]
    Db(DbCommand),
}

#[derive(Debug, Subcommand)]
enum DbCommand {
    /// Apply database migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    if let Some(Command::Db(DbCommand::Migrate)) = cli.command {
        let (_, database) = connect(&cli.serve).await?;
        database.migrate().await.context("database migration failed")?;
        return Ok(());
    }

    run_server(cli.serve).await
}

async fn connect(args: &ServeArgs) -> anyhow::Result<(Config, PostgresDatabase)> {
    let mut config = Config::load(&args.config)?;
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(host) = args.host.clone() {
        config.server.host = host;
    }
    if let Some(url) = args.database_url.clone() {
        config.database.url = Some(url);
    }

    let database_url = config
        .database
        .url
        .clone()
        .context("DATABASE_URL is not set (flag, env, or [database].url)")?;

    let database =
        PostgresDatabase::with_pool_size(&database_url, config.database.max_connections)
            .await
            .context("failed to connect to PostgreSQL")?;

    Ok((config, database))
}

async fn run_server(args: ServeArgs) -> anyhow::Result<()> {
    let (config, database) = connect(&args).await?;
    database.migrate().await.context("database migration failed")?;

    let tokens = Arc::new(PgTokenValidator::new(database.pool().clone()));
    let state = AppState::new(
        Arc::new(database.orders().clone()),
        Arc::new(database.locations().clone()),
        tokens,
        config.order_policy(),
    );
    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("invalid server host/port")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "entrega-server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}

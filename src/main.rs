use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storefront_core::adapters::PostgresTransactionStore;
use storefront_core::cli::{self, Cli, Commands, DbCommands, TxCommands};
use storefront_core::config::{Config, LogFormat};
use storefront_core::health::{HealthChecks, PostgresChecker};
use storefront_core::middleware::request_logger::RequestLogSettings;
use storefront_core::payments::SignatureVerifier;
use storefront_core::{create_app, cors_layer, db, startup, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::from_env()?;
    init_tracing(config.log_format);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await,
        Commands::Db(DbCommands::Migrate) => {
            let pool = db::create_pool(&config).await?;
            db::run_migrations(&pool).await?;
            println!("✓ Database migrations completed");
            Ok(())
        }
        Commands::Config => {
            cli::handle_config_validate(&config)?;
            let pool = db::create_pool(&config).await?;
            let report = startup::validate_environment(&config, &pool).await;
            report.print();
            if !report.is_valid() {
                anyhow::bail!("Startup validation failed");
            }
            Ok(())
        }
        Commands::Tx(command) => {
            let pool = db::create_pool(&config).await?;
            let store = PostgresTransactionStore::new(pool);
            match command {
                TxCommands::Show { order_id } => cli::handle_tx_show(&store, &order_id).await,
                TxCommands::Next { order_id } => cli::handle_tx_next(&store, &order_id).await,
                TxCommands::SetStatus {
                    order_id,
                    status,
                    operator,
                    note,
                } => cli::handle_tx_set_status(&store, &order_id, status, &operator, &note).await,
            }
        }
    }
}

fn init_tracing(format: LogFormat) {
    let filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let pool = db::create_pool(&config).await?;
    db::run_migrations(&pool).await?;

    let store = Arc::new(PostgresTransactionStore::new(pool.clone()));
    let health = HealthChecks::new().with("postgres", Arc::new(PostgresChecker::new(pool)));
    let verifier = SignatureVerifier::new(config.payment_server_key.clone());

    let state = AppState::new(store, verifier, health);
    let app = create_app(
        state,
        RequestLogSettings {
            log_body: config.log_request_body,
        },
    )
    .layer(cors_layer(config.cors_allowed_origins.as_deref()));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    tracing::info!("listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}

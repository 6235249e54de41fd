use clap::Parser;
use log::{error, info};
use std::sync::Arc;

use tg_payments::bot::TelegramBot;
use tg_payments::config::BotConfig;
use tg_payments::health;
use tg_payments::migrations::MigrationManager;
use tg_payments::storage::postgres::create_pool;
use tg_payments::storage::{GcsBlobStore, PgRecordStore};

#[derive(Parser)]
#[command(name = "tg-payments")]
#[command(about = "A Telegram bot that collects payment confirmations and album files")]
struct Args {
    /// port for the health endpoint, overrides PORT
    #[arg(long)]
    port: Option<u16>,

    /// do not touch the database schema on startup
    #[arg(long)]
    skip_migrations: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // initialize rustls crypto provider
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    // load .env file if it exists
    if let Err(e) = dotenvy::dotenv() {
        match e {
            dotenvy::Error::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound => {
                // .env file not found, which is fine
            }
            _ => {
                eprintln!("warning: failed to load .env file: {}", e);
            }
        }
    }

    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();
    let config = BotConfig::from_env()?;
    info!(
        "Loaded configuration: {} admin(s), bucket {}",
        config.admins.len(),
        config.storage_bucket
    );

    let pool = create_pool(&config.database_url)?;
    if args.skip_migrations {
        info!("Skipping database migrations");
    } else {
        MigrationManager::run_migrations(&pool).await?;
    }

    let store = Arc::new(PgRecordStore::new(pool));
    let blobs = Arc::new(GcsBlobStore::new(
        &config.storage_bucket,
        &config.service_account_key,
    )?);

    let port = args.port.unwrap_or(config.health_port);
    tokio::spawn(async move {
        if let Err(e) = health::start_health_server(port).await {
            error!("Health endpoint stopped: {}", e);
        }
    });

    info!("Starting bot...");
    let bot = TelegramBot::new(
        &config.bot_token,
        store,
        blobs,
        config.admins,
        config.payment_details,
    );
    bot.run().await;

    Ok(())
}

use std::{sync::Arc, time::Duration};

use crate::{
    config::{Config, DatabaseConfig},
    handlers::{self, Command},
    repository,
};
use secrecy::ExposeSecret;
use sqlx::{sqlite::SqlitePoolOptions, Pool, Sqlite};
use teloxide::prelude::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Clone)]
pub struct Db(Pool<Sqlite>);

impl Db {
    pub fn inner(&self) -> Pool<Sqlite> {
        self.0.clone()
    }
}

#[derive(Clone)]
pub struct AppState {
    db_pool: Db,
    pub config: Config,
}

impl AppState {
    pub fn get_pool(&self) -> Pool<Sqlite> {
        self.db_pool.inner()
    }
}

pub struct Application;

impl Application {
    pub async fn build(config: Config) -> anyhow::Result<()> {
        Self::setup_tracing(&config.application.debug_mode);

        let db_pool = Self::get_pool(&config.database).await;
        repository::ensure_schema(&db_pool.inner())
            .await
            .map_err(|e| anyhow::anyhow!("failed to set up users table: {:?}", e))?;

        let bot = Bot::new(config.telegram.token.expose_secret().to_owned());
        let app_state = Arc::new(AppState {
            db_pool: db_pool.clone(),
            config: config.clone(),
        });

        let handler = Update::filter_message()
            .filter_command::<Command>()
            .endpoint(handlers::handle_command);

        tracing::info!("starting referral bot as @{}", config.telegram.bot_username);
        Dispatcher::builder(bot, handler)
            .dependencies(dptree::deps![app_state])
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;

        Ok(())
    }

    fn setup_tracing(debug_mode: &str) {
        let _ = tracing_log::LogTracer::init();
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| debug_mode.into()),
            )
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    async fn get_pool(db_config: &DatabaseConfig) -> Db {
        let pool = SqlitePoolOptions::new()
            .acquire_timeout(Duration::from_secs(2))
            .connect_lazy_with(db_config.get_connect_options());
        Db(pool)
    }
}

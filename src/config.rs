use secrecy::Secret;
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;
use sqlx::sqlite::SqliteConnectOptions;

#[derive(Deserialize, Clone)]
pub struct Config {
    pub application: ApplicationConfig,
    pub telegram: TelegramConfig,
    pub database: DatabaseConfig,
}

#[derive(Deserialize, Clone)]
pub struct ApplicationConfig {
    pub debug_mode: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub chunk_limit: usize,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub ref_code_length: usize,
}

#[derive(Deserialize, Clone)]
pub struct TelegramConfig {
    pub token: Secret<String>,
    pub bot_username: String,
}

#[derive(Deserialize, Clone)]
pub struct DatabaseConfig {
    pub path: String,
}

impl DatabaseConfig {
    pub fn get_connect_options(&self) -> SqliteConnectOptions {
        SqliteConnectOptions::new()
            .filename(&self.path)
            .create_if_missing(true)
    }
}

pub fn load_config() -> Result<Config, config::ConfigError> {
    let base_path = std::env::current_dir().expect("failed to determine current directory");
    let config_dir = base_path.join("config");

    config::Config::builder()
        .add_source(config::File::from(config_dir.join("base.yaml")))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?
        .try_deserialize()
}

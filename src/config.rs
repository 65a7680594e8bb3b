use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::env;

use crate::game::grid::{DEFAULT_GRID_SIZE, DEFAULT_MAX_ATTEMPTS};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub security: SecurityConfig,
    pub game: GameConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub frontend_path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub admin_username: String,
    pub admin_password: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl StoreBackend {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => bail!("STORE must be 'postgres' or 'memory', got '{}'", other),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GameConfig {
    pub store: StoreBackend,
    pub grid_size: usize,
    pub placement_attempts: u32,
    /// Used until an admin sets the timer
    pub default_timer_duration: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let game = GameConfig {
            store: StoreBackend::parse(
                &env::var("STORE").unwrap_or_else(|_| "postgres".to_string()),
            )?,
            grid_size: env::var("GRID_SIZE")
                .unwrap_or_else(|_| DEFAULT_GRID_SIZE.to_string())
                .parse()
                .context("GRID_SIZE must be a number")?,
            placement_attempts: env::var("WORD_PLACEMENT_ATTEMPTS")
                .unwrap_or_else(|_| DEFAULT_MAX_ATTEMPTS.to_string())
                .parse()
                .context("WORD_PLACEMENT_ATTEMPTS must be a number")?,
            default_timer_duration: env::var("DEFAULT_TIMER_DURATION")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),
        };

        if game.grid_size == 0 {
            bail!("GRID_SIZE must be at least 1");
        }

        let database = DatabaseConfig {
            url: match game.store {
                StoreBackend::Postgres => {
                    env::var("DATABASE_URL").context("DATABASE_URL must be set")?
                }
                StoreBackend::Memory => env::var("DATABASE_URL").unwrap_or_default(),
            },
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("DATABASE_MAX_CONNECTIONS must be a number")?,
        };

        let server = ServerConfig {
            host: env::var("HOST")
                .unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("PORT must be a number")?,
            frontend_path: env::var("FRONTEND_PATH")
                .unwrap_or_else(|_| "../frontend".to_string()),
        };

        let security = SecurityConfig {
            jwt_secret: env::var("JWT_SECRET")
                .context("JWT_SECRET must be set")?,
            admin_username: env::var("ADMIN_USERNAME")
                .unwrap_or_else(|_| "admin".to_string()),
            admin_password: env::var("ADMIN_PASSWORD")
                .context("ADMIN_PASSWORD must be set")?,
        };

        Ok(Config {
            database,
            server,
            security,
            game,
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// In-memory configuration with fixed admin credentials
    #[cfg(test)]
    pub fn for_tests() -> Self {
        Config {
            database: DatabaseConfig {
                url: String::new(),
                max_connections: 1,
            },
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                frontend_path: "./frontend-missing".to_string(),
            },
            security: SecurityConfig {
                jwt_secret: "test-secret".to_string(),
                admin_username: "admin".to_string(),
                admin_password: "letmein".to_string(),
            },
            game: GameConfig {
                store: StoreBackend::Memory,
                grid_size: DEFAULT_GRID_SIZE,
                placement_attempts: DEFAULT_MAX_ATTEMPTS,
                default_timer_duration: 10,
            },
        }
    }
}

//! Configuration management for the Docpress server

use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub database: DatabaseConfig,
    pub renderer: RendererConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Request-scoped staging area for uploaded sources
    pub staging_dir: String,
    /// Publish root for converted artifacts
    pub artifacts_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RendererConfig {
    /// External HTML-to-PDF binary (stdin HTML, stdout PDF)
    pub binary: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            storage: StorageConfig {
                staging_dir: "./data/staging".to_string(),
                artifacts_dir: "./data/artifacts".to_string(),
            },
            database: DatabaseConfig {
                url: "sqlite:./docpress.db".to_string(),
            },
            renderer: RendererConfig {
                binary: "wkhtmltopdf".to_string(),
            },
        }
    }
}

impl Config {
    /// Load configuration from the environment, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Config::default();

        Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or(defaults.server.host),
                port: env::var("SERVER_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(defaults.server.port),
            },
            storage: StorageConfig {
                staging_dir: env::var("STAGING_DIR").unwrap_or(defaults.storage.staging_dir),
                artifacts_dir: env::var("ARTIFACTS_DIR").unwrap_or(defaults.storage.artifacts_dir),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").unwrap_or(defaults.database.url),
            },
            renderer: RendererConfig {
                binary: env::var("RENDERER_BINARY").unwrap_or(defaults.renderer.binary),
            },
        }
    }
}

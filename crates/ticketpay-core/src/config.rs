//! Configuration module
//!
//! Configuration is read from the environment once at startup and passed
//! explicitly to every component that needs it. Nothing downstream reads the
//! environment on its own.

use std::env;

use crate::storage_types::StorageBackend;

// Common constants
const SERVER_PORT: u16 = 5000;
const MAX_CONNECTIONS: u32 = 10;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const REQUEST_TIMEOUT_SECS: u64 = 30;
const MIN_JWT_SECRET_LEN: usize = 32;

const RECEIPT_UPLOAD_DIR: &str = "uploads/receipts";
const RECEIPT_SCRATCH_DIR: &str = "/tmp/receipts";

/// Server-level settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub request_timeout_secs: u64,
    pub jwt_secret: String,
    pub environment: String,
}

/// Payment service configuration
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub base: BaseConfig,
    pub database_url: String,
    // Receipt storage
    pub storage_backend: StorageBackend,
    pub receipt_upload_dir: String,
    pub receipt_scratch_dir: String,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<ServiceConfig>);

impl Config {
    fn as_service(&self) -> &ServiceConfig {
        &self.0
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = ServiceConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.as_service().validate()
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_environment(&self.as_service().base.environment)
    }

    pub fn server_port(&self) -> u16 {
        self.as_service().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.as_service().base.cors_origins
    }

    pub fn db_max_connections(&self) -> u32 {
        self.as_service().base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.as_service().base.db_timeout_seconds
    }

    pub fn request_timeout_secs(&self) -> u64 {
        self.as_service().base.request_timeout_secs
    }

    pub fn jwt_secret(&self) -> &str {
        &self.as_service().base.jwt_secret
    }

    pub fn environment(&self) -> &str {
        &self.as_service().base.environment
    }

    pub fn database_url(&self) -> &str {
        &self.as_service().database_url
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.as_service().storage_backend
    }

    pub fn receipt_upload_dir(&self) -> &str {
        &self.as_service().receipt_upload_dir
    }

    pub fn receipt_scratch_dir(&self) -> &str {
        &self.as_service().receipt_scratch_dir
    }
}

pub fn is_production_environment(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "production" || env == "prod"
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());
        let is_production = is_production_environment(&environment);

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        if is_production && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }
        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        // The deployment mode is decided here, once. Unset means "follow the environment".
        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(raw) if !raw.trim().is_empty() => raw.parse::<StorageBackend>()?,
            _ => StorageBackend::default_for_environment(is_production),
        };

        let base = BaseConfig {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(REQUEST_TIMEOUT_SECS)
                .max(1),
            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set"))?,
            environment,
        };

        let config = ServiceConfig {
            base,
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            storage_backend,
            receipt_upload_dir: env::var("RECEIPT_UPLOAD_DIR")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| RECEIPT_UPLOAD_DIR.to_string()),
            receipt_scratch_dir: env::var("RECEIPT_SCRATCH_DIR")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| RECEIPT_SCRATCH_DIR.to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.base.jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LEN
            ));
        }

        if !self.database_url.starts_with("postgres://")
            && !self.database_url.starts_with("postgresql://")
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        match self.storage_backend {
            StorageBackend::Disk => {
                if self.receipt_upload_dir.trim().is_empty() {
                    return Err(anyhow::anyhow!(
                        "RECEIPT_UPLOAD_DIR must not be empty when using disk storage"
                    ));
                }
            }
            StorageBackend::Ephemeral => {
                if self.receipt_scratch_dir.trim().is_empty() {
                    return Err(anyhow::anyhow!(
                        "RECEIPT_SCRATCH_DIR must not be empty when using ephemeral storage"
                    ));
                }
            }
            StorageBackend::Remote => {
                return Err(anyhow::anyhow!(
                    "STORAGE_BACKEND=remote is not available: no remote receipt store is configured"
                ));
            }
        }

        Ok(())
    }
}

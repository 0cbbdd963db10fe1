//! Configuration module for environment variables and application settings

use std::env;
use anyhow::{Result, anyhow};

use crate::database::DatabaseConfig;

#[derive(Debug, Clone)]
pub struct Config {
    /// Secret used to sign and verify session tokens
    pub jwt_secret: String,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Server configuration
    pub server: ServerConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origins allowed by the CORS layer. Empty means same-origin only.
    pub cors_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow!("JWT_SECRET environment variable is required"))?;
        if jwt_secret.trim().is_empty() {
            return Err(anyhow!("JWT_SECRET must not be empty"));
        }

        Ok(Self {
            jwt_secret,

            database: DatabaseConfig::from_env()?,

            server: ServerConfig {
                host: env::var("SERVER_HOST")
                    .unwrap_or_else(|_| "0.0.0.0".to_string()),
                // $PORT wins so the app runs on PaaS hosts unchanged
                port: env::var("PORT")
                    .or_else(|_| env::var("SERVER_PORT"))
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8080),
                cors_origins: parse_origins(&env::var("CORS_ORIGINS").unwrap_or_default()),
            },
        })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins_skips_blanks() {
        let origins = parse_origins(" http://localhost:3000, ,https://shop.example ");
        assert_eq!(origins, vec!["http://localhost:3000", "https://shop.example"]);
        assert!(parse_origins("").is_empty());
    }
}

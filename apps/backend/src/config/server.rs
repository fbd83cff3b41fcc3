//! HTTP server settings read from the environment.

use std::env;

use crate::error::AppError;
use crate::middleware::cors::allowed_origins;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let host = env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = match env::var("BACKEND_PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| AppError::config(format!("BACKEND_PORT is not a port: {raw}")))?,
            Err(_) => 3001,
        };
        let cors_origins = allowed_origins(&env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default());
        Ok(Self {
            host,
            port,
            cors_origins,
        })
    }

    pub fn bind_addr(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

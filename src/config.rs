use std::path::PathBuf;

use thiserror::Error;

use crate::infrastructure::printing::DEFAULT_AGENT_URL;
use crate::infrastructure::whatsapp::DEFAULT_API_URL;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} must be a valid port number, got '{value}'")]
    InvalidPort { key: &'static str, value: String },
}

/// Default WhatsApp credentials, used when a send request carries none.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WhatsAppConfig {
    pub api_url: String,
    pub access_token: Option<String>,
    pub phone_number_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub data_file: PathBuf,
    pub host: String,
    pub port: u16,
    /// Prefix for links handed out to customers, e.g. invoice download URLs.
    pub public_base_url: String,
    pub print_agent_url: String,
    pub whatsapp: WhatsAppConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match non_empty("PORT") {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidPort { key: "PORT", value })?,
            None => 8080,
        };

        Ok(Self {
            data_file: non_empty("DATA_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data/database.json")),
            host: non_empty("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            public_base_url: non_empty("PUBLIC_BASE_URL")
                .unwrap_or_else(|| format!("http://localhost:{port}"))
                .trim_end_matches('/')
                .to_string(),
            print_agent_url: non_empty("PRINT_AGENT_URL")
                .unwrap_or_else(|| DEFAULT_AGENT_URL.to_string()),
            whatsapp: WhatsAppConfig {
                api_url: non_empty("WHATSAPP_API_URL")
                    .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
                access_token: non_empty("WHATSAPP_ACCESS_TOKEN"),
                phone_number_id: non_empty("WHATSAPP_PHONE_NUMBER_ID"),
            },
        })
    }

    /// Absolute URL for a path served by this service.
    pub fn public_url(&self, path: &str) -> String {
        format!("{}{}", self.public_base_url, path)
    }
}

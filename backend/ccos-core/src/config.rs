// src/config.rs
use serde::Deserialize;

use crate::error::AppError;
use crate::presence::DEFAULT_PARTNER_COMPANIES;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    // Server Configuration
    #[serde(default = "default_server_host")]
    pub server_host: String,
    #[serde(default = "default_server_port")]
    pub server_port: u16,

    // Presence: comma separated partner company codes, overrides the built-in set
    #[serde(default)]
    pub partner_companies: Option<String>,

    // Documents expiring within this many days are flagged
    #[serde(default = "default_document_warning_days")]
    pub document_warning_days: i64,
}

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    3000
}

fn default_document_warning_days() -> i64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_host: default_server_host(),
            server_port: default_server_port(),
            partner_companies: None,
            document_warning_days: default_document_warning_days(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        // Load .env file if it exists
        dotenv::dotenv().ok();

        Ok(envy::from_env::<Config>()?)
    }

    /// Partner company codes used for the subgroup presence count.
    pub fn partner_companies(&self) -> Vec<String> {
        match &self.partner_companies {
            Some(raw) => raw
                .split(',')
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect(),
            None => DEFAULT_PARTNER_COMPANIES
                .iter()
                .map(|c| c.to_string())
                .collect(),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

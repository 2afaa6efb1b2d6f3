use std::env;

pub const DEFAULT_PAGE_SIZE: usize = 6;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub port: u16,
    pub default_page_size: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let default_page_size = match lookup("DEFAULT_PAGE_SIZE") {
            Some(raw) => raw
                .parse::<usize>()
                .ok()
                .filter(|size| *size >= 1)
                .ok_or(ConfigError::InvalidPageSize(raw))?,
            None => DEFAULT_PAGE_SIZE,
        };

        Ok(Self {
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidPort)?,
            default_page_size,
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_host: "0.0.0.0".to_string(),
            port: 8080,
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid port number")]
    InvalidPort,
    #[error("Invalid default page size '{0}': must be a positive integer")]
    InvalidPageSize(String),
}

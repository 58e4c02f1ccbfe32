use std::{env, net::SocketAddr, str::FromStr};

use thiserror::Error;

pub const DEFAULT_TABLE_NAME: &str = "Expenses";
pub const DEFAULT_REGION: &str = "ap-south-1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    DynamoDb,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "dynamodb" => Ok(Self::DynamoDb),
            "memory" => Ok(Self::Memory),
            _ => Err(ConfigError::InvalidStoreBackend),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub bind_port: u16,
    pub table_name: String,
    pub region: String,
    pub dynamodb_endpoint: Option<String>,
    pub store_backend: StoreBackend,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("BIND_PORT must be a valid u16")]
    InvalidPort,
    #[error("EXPENSES_STORE must be one of: dynamodb, memory")]
    InvalidStoreBackend,
    #[error("invalid bind address or port")]
    InvalidSocket,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let bind_addr = non_empty("BIND_ADDR").unwrap_or_else(|| "127.0.0.1".to_string());
        let bind_port = non_empty("BIND_PORT")
            .map(|value| value.parse::<u16>().map_err(|_| ConfigError::InvalidPort))
            .transpose()?
            .unwrap_or(8080);
        let table_name =
            non_empty("EXPENSES_TABLE").unwrap_or_else(|| DEFAULT_TABLE_NAME.to_string());
        let region = non_empty("EXPENSES_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string());
        let dynamodb_endpoint = non_empty("DYNAMODB_ENDPOINT");
        let store_backend = non_empty("EXPENSES_STORE")
            .map(|value| value.parse::<StoreBackend>())
            .transpose()?
            .unwrap_or(StoreBackend::DynamoDb);

        let config = Self {
            bind_addr,
            bind_port,
            table_name,
            region,
            dynamodb_endpoint,
            store_backend,
        };

        let _ = config.bind_socket()?;
        Ok(config)
    }

    pub fn bind_socket(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind_addr, self.bind_port)
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidSocket)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn parse_defaults() {
        let config = config_from(&[]).expect("config should parse");

        assert_eq!(config.bind_addr, "127.0.0.1");
        assert_eq!(config.bind_port, 8080);
        assert_eq!(config.table_name, "Expenses");
        assert_eq!(config.region, "ap-south-1");
        assert_eq!(config.dynamodb_endpoint, None);
        assert_eq!(config.store_backend, StoreBackend::DynamoDb);
    }

    #[test]
    fn overrides_are_trimmed() {
        let config = config_from(&[
            ("EXPENSES_TABLE", " ExpensesDev "),
            ("EXPENSES_REGION", "eu-west-1"),
            ("DYNAMODB_ENDPOINT", "http://localhost:8000"),
            ("EXPENSES_STORE", "Memory"),
            ("BIND_PORT", "9000"),
        ])
        .expect("config should parse");

        assert_eq!(config.table_name, "ExpensesDev");
        assert_eq!(config.region, "eu-west-1");
        assert_eq!(
            config.dynamodb_endpoint.as_deref(),
            Some("http://localhost:8000")
        );
        assert_eq!(config.store_backend, StoreBackend::Memory);
        assert_eq!(config.bind_port, 9000);
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config =
            config_from(&[("EXPENSES_TABLE", "   "), ("DYNAMODB_ENDPOINT", "")]).expect("parse");

        assert_eq!(config.table_name, DEFAULT_TABLE_NAME);
        assert_eq!(config.dynamodb_endpoint, None);
    }

    #[test]
    fn invalid_port_fails() {
        let err = config_from(&[("BIND_PORT", "70000")]).expect_err("expected invalid port");
        assert!(matches!(err, ConfigError::InvalidPort));
    }

    #[test]
    fn unknown_backend_fails() {
        let err =
            config_from(&[("EXPENSES_STORE", "sqlite")]).expect_err("expected invalid backend");
        assert!(matches!(err, ConfigError::InvalidStoreBackend));
    }

    #[test]
    fn invalid_bind_addr_fails() {
        let err = config_from(&[("BIND_ADDR", "not an address")]).expect_err("expected bad socket");
        assert!(matches!(err, ConfigError::InvalidSocket));
    }
}

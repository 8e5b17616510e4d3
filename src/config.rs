use crate::error::ConfigError;
use std::str::FromStr;

/// Which `Store` backend the server runs on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreKind {
    Postgres,
    Memory,
}

impl FromStr for StoreKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreKind::Postgres),
            "memory" => Ok(StoreKind::Memory),
            other => Err(ConfigError::UnknownStore(other.to_string())),
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// | Env Var                    | Default                       |
/// |----------------------------|-------------------------------|
/// | `HOST`                     | `0.0.0.0`                     |
/// | `PORT`                     | `3001`                        |
/// | `DATABASE_URL`             | `postgres://localhost/movies` |
/// | `DATABASE_MAX_CONNECTIONS` | `5`                           |
/// | `STORE`                    | `postgres`                    |
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub max_connections: u32,
    pub store: StoreKind,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "0.0.0.0".into(),
            port: 3001,
            database_url: "postgres://localhost/movies".into(),
            max_connections: 5,
            store: StoreKind::Postgres,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source; unset variables take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = ServerConfig::default();
        Ok(ServerConfig {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_var(&lookup, "PORT", defaults.port)?,
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            max_connections: parse_var(&lookup, "DATABASE_MAX_CONNECTIONS", defaults.max_connections)?,
            store: match lookup("STORE") {
                Some(s) => s.parse()?,
                None => defaults.store,
            },
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidVar { name, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        ServerConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn port_defaults_to_3001() {
        let config = from(&[]).unwrap();
        assert_eq!(config.port, 3001);
        assert_eq!(config.store, StoreKind::Postgres);
        assert_eq!(config.bind_addr(), "0.0.0.0:3001");
    }

    #[test]
    fn reads_overrides() {
        let config = from(&[("PORT", "8080"), ("STORE", "memory"), ("DATABASE_MAX_CONNECTIONS", "12")]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.store, StoreKind::Memory);
        assert_eq!(config.max_connections, 12);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(from(&[("PORT", "http")]), Err(ConfigError::InvalidVar { name: "PORT", .. })));
        assert!(matches!(from(&[("STORE", "redis")]), Err(ConfigError::UnknownStore(_))));
    }
}

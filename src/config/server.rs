//! Startup configuration, read once at process entry and passed into the server.

use crate::error::ConfigError;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

pub const DEFAULT_PORT: u16 = 3000;
pub const TEST_PORT: u16 = 3001;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    Test,
    Normal,
}

impl Environment {
    fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some(v) if v.trim().eq_ignore_ascii_case("test") => Environment::Test,
            _ => Environment::Normal,
        }
    }

    pub fn default_port(self) -> u16 {
        match self {
            Environment::Test => TEST_PORT,
            Environment::Normal => DEFAULT_PORT,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl StoreBackend {
    fn parse(raw: Option<&str>) -> Result<Self, ConfigError> {
        let Some(raw) = raw else {
            return Ok(StoreBackend::Postgres);
        };
        match raw.trim().to_lowercase().as_str() {
            "" | "postgres" | "pg" => Ok(StoreBackend::Postgres),
            "memory" | "mem" => Ok(StoreBackend::Memory),
            _ => Err(ConfigError::UnknownStore(raw.to_string())),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub environment: Environment,
    pub host: IpAddr,
    pub port: u16,
    pub store: StoreBackend,
    /// Only set (and only required) for the postgres backend.
    pub database_url: Option<String>,
    pub max_connections: u32,
}

impl ServerConfig {
    /// Load from the process environment, after applying a `.env` file if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any variable lookup. `APP_ENV=test` moves the default port to 3001;
    /// `PORT` overrides either default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = Environment::parse(lookup("APP_ENV").as_deref());

        let port = match lookup("PORT") {
            Some(p) => p
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(p.clone()))?,
            None => environment.default_port(),
        };

        let host = match lookup("HOST") {
            Some(h) => h
                .trim()
                .parse::<IpAddr>()
                .map_err(|_| ConfigError::InvalidHost(h.clone()))?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };

        let store = StoreBackend::parse(lookup("DOGS_STORE").as_deref())?;

        let database_url = match store {
            StoreBackend::Postgres => Some(
                lookup("DATABASE_URL")
                    .filter(|u| !u.trim().is_empty())
                    .ok_or(ConfigError::MissingDatabaseUrl)?,
            ),
            StoreBackend::Memory => None,
        };

        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(n) => n
                .trim()
                .parse::<u32>()
                .map_err(|_| ConfigError::InvalidMaxConnections(n.clone()))?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Self {
            environment,
            host,
            port,
            store,
            database_url,
            max_connections,
        })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn normal_environment_listens_on_3000() {
        let cfg = load(&[("DATABASE_URL", "postgres://localhost/dogs")]).unwrap();
        assert_eq!(cfg.environment, Environment::Normal);
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.store, StoreBackend::Postgres);
        assert_eq!(cfg.max_connections, DEFAULT_MAX_CONNECTIONS);
    }

    #[test]
    fn test_environment_listens_on_3001() {
        let cfg = load(&[("APP_ENV", "Test"), ("DOGS_STORE", "memory")]).unwrap();
        assert_eq!(cfg.environment, Environment::Test);
        assert_eq!(cfg.port, 3001);
        assert!(cfg.database_url.is_none());
    }

    #[test]
    fn explicit_port_wins() {
        let cfg = load(&[("APP_ENV", "test"), ("PORT", "8080"), ("DOGS_STORE", "mem")]).unwrap();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.bind_addr().to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(matches!(
            load(&[("PORT", "http"), ("DOGS_STORE", "memory")]),
            Err(ConfigError::InvalidPort(_))
        ));
        assert!(matches!(
            load(&[("DOGS_STORE", "redis")]),
            Err(ConfigError::UnknownStore(_))
        ));
        assert!(matches!(
            load(&[("HOST", "localhost"), ("DOGS_STORE", "memory")]),
            Err(ConfigError::InvalidHost(_))
        ));
    }

    #[test]
    fn postgres_requires_database_url() {
        assert!(matches!(load(&[]), Err(ConfigError::MissingDatabaseUrl)));
        assert!(matches!(
            load(&[("DATABASE_URL", "  ")]),
            Err(ConfigError::MissingDatabaseUrl)
        ));
    }
}

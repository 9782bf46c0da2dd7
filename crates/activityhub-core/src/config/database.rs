//! Database configuration and connection string resolution.

use serde::{Deserialize, Serialize};

/// Environment variable holding a complete PostgreSQL URL.
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";

/// Which persistence backend the stores use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseProvider {
    /// PostgreSQL through sqlx.
    #[default]
    Postgres,
    /// Process-local in-memory stores (development and tests).
    Memory,
}

/// Database connection pool configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Persistence backend.
    #[serde(default)]
    pub provider: DatabaseProvider,
    /// Complete PostgreSQL connection URL. Takes precedence over the parts below.
    #[serde(default)]
    pub url: Option<String>,
    /// Database host.
    #[serde(default)]
    pub host: Option<String>,
    /// Database port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Database name.
    #[serde(default)]
    pub name: Option<String>,
    /// Database user.
    #[serde(default)]
    pub user: Option<String>,
    /// Database password.
    #[serde(default)]
    pub password: Option<String>,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Connection timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
    /// Idle connection timeout in seconds.
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_seconds: u64,
    /// Run pending migrations when the server starts.
    #[serde(default = "default_true")]
    pub run_migrations: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            provider: DatabaseProvider::default(),
            url: None,
            host: None,
            port: default_port(),
            name: None,
            user: None,
            password: None,
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_seconds: default_connect_timeout(),
            idle_timeout_seconds: default_idle_timeout(),
            run_migrations: true,
        }
    }
}

impl DatabaseConfig {
    /// Resolve the connection string from the process environment and this
    /// configuration.
    pub fn connection_string(&self) -> Option<String> {
        self.connection_string_with(|key| std::env::var(key).ok())
    }

    /// Resolve the connection string using the given variable lookup.
    ///
    /// Order: `DATABASE_URL`, then the `POSTGRES_*` variables, then
    /// `database.url`, then the `database.host/name/user` parts.
    pub fn connection_string_with<F>(&self, lookup: F) -> Option<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = non_empty(DATABASE_URL_VAR) {
            return Some(url);
        }

        if let (Some(host), Some(name), Some(user)) = (
            non_empty("POSTGRES_HOST"),
            non_empty("POSTGRES_DB"),
            non_empty("POSTGRES_USER"),
        ) {
            let port = non_empty("POSTGRES_PORT")
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(self.port);
            let password = non_empty("POSTGRES_PASSWORD");
            return Some(assemble_url(&host, port, &name, &user, password.as_deref()));
        }

        if let Some(url) = self.url.as_ref().filter(|u| !u.trim().is_empty()) {
            return Some(url.clone());
        }

        match (&self.host, &self.name, &self.user) {
            (Some(host), Some(name), Some(user))
                if !host.is_empty() && !name.is_empty() && !user.is_empty() =>
            {
                Some(assemble_url(
                    host,
                    self.port,
                    name,
                    user,
                    self.password.as_deref(),
                ))
            }
            _ => None,
        }
    }
}

fn assemble_url(host: &str, port: u16, name: &str, user: &str, password: Option<&str>) -> String {
    match password.filter(|p| !p.is_empty()) {
        Some(password) => format!("postgres://{user}:{password}@{host}:{port}/{name}"),
        None => format!("postgres://{user}@{host}:{port}/{name}"),
    }
}

fn default_port() -> u16 {
    5432
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    2
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_idle_timeout() -> u64 {
    300
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_database_url_env_wins() {
        let vars = env(&[
            ("DATABASE_URL", "postgres://env@db:5432/market"),
            ("POSTGRES_HOST", "ignored"),
        ]);
        let config = DatabaseConfig {
            url: Some("postgres://config@localhost/market".into()),
            ..Default::default()
        };
        assert_eq!(
            config.connection_string_with(|k| vars.get(k).cloned()),
            Some("postgres://env@db:5432/market".to_string())
        );
    }

    #[test]
    fn test_assembled_from_postgres_vars() {
        let vars = env(&[
            ("POSTGRES_HOST", "db"),
            ("POSTGRES_PORT", "6543"),
            ("POSTGRES_DB", "market"),
            ("POSTGRES_USER", "app"),
            ("POSTGRES_PASSWORD", "secret"),
        ]);
        let config = DatabaseConfig::default();
        assert_eq!(
            config.connection_string_with(|k| vars.get(k).cloned()),
            Some("postgres://app:secret@db:6543/market".to_string())
        );
    }

    #[test]
    fn test_falls_back_to_config_parts() {
        let config = DatabaseConfig {
            host: Some("localhost".into()),
            name: Some("market".into()),
            user: Some("app".into()),
            ..Default::default()
        };
        assert_eq!(
            config.connection_string_with(|_| None),
            Some("postgres://app@localhost:5432/market".to_string())
        );
    }

    #[test]
    fn test_missing_everything() {
        let config = DatabaseConfig::default();
        assert_eq!(config.connection_string_with(|_| None), None);
    }
}

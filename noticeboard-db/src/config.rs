use serde::Deserialize;
use sqlx::postgres::PgConnectOptions;
use std::{
    fmt::{Debug, Formatter},
    time::Duration,
};

pub const DEFAULT_PORT: u16 = 5432;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;

/// Connection settings for the storage backend, read once at startup.
#[derive(Clone, Eq, PartialEq, Hash, Deserialize)]
pub struct DbConfig {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Upper bound on how long a request waits for a connection.
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
    #[serde(default = "default_run_migrations")]
    pub run_migrations: bool,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_max_connections() -> u32 {
    DEFAULT_MAX_CONNECTIONS
}

fn default_acquire_timeout_secs() -> u64 {
    DEFAULT_ACQUIRE_TIMEOUT_SECS
}

fn default_run_migrations() -> bool {
    true
}

impl DbConfig {
    #[must_use]
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    /// Postgres always speaks UTF-8 with sqlx clients, so 4-byte sequences
    /// survive the round trip without further settings.
    #[must_use]
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name)
            .application_name("noticeboard")
    }
}

impl Debug for DbConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"[redacted]")
            .field("name", &self.name)
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout_secs", &self.acquire_timeout_secs)
            .field("run_migrations", &self.run_migrations)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::config::DbConfig;

    #[test]
    fn debug_redacts_password() {
        let config = DbConfig {
            host: "localhost".to_owned(),
            port: 5432,
            user: "blog_user".to_owned(),
            password: "hunter2".to_owned(),
            name: "blog_db".to_owned(),
            max_connections: 10,
            acquire_timeout_secs: 5,
            run_migrations: true,
        };

        let debug = format!("{config:?}");
        assert!(debug.contains("blog_user"));
        assert!(!debug.contains("hunter2"));
    }
}

//! Database configuration rendering.
//!
//! Maps a [`DatabaseKind`] to the `.env` payload and compose file of the
//! generated project. Shapes are fixed per kind so the generated project's
//! settings loader always sees the same keys.

use std::fmt;

use serde::Serialize;

use crate::domain::{error::DomainError, value_objects::DatabaseKind};

/// Placeholder secret written into every generated `.env`.
pub const SECRET_KEY_PLACEHOLDER: &str = "change-me-in-production";

/// Ordered `KEY=VALUE` pairs destined for the environment file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvPayload {
    entries: Vec<(String, String)>,
}

impl EnvPayload {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.entries.push((key.to_string(), value.into()));
        self
    }

    /// Value for `key`, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// File content: one `KEY=VALUE` line per entry, newline terminated.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for EnvPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.entries {
            writeln!(f, "{key}={value}")?;
        }
        Ok(())
    }
}

/// Connection defaults for a network database.
struct NetworkDefaults {
    engine: &'static str,
    user: &'static str,
    password: &'static str,
    port: u16,
}

impl NetworkDefaults {
    const fn for_kind(kind: DatabaseKind) -> Option<Self> {
        match kind {
            DatabaseKind::Sqlite => None,
            DatabaseKind::Postgresql => Some(Self {
                engine: "postgresql",
                user: "postgres",
                password: "postgres",
                port: 5432,
            }),
            DatabaseKind::Mysql => Some(Self {
                engine: "mysql",
                user: "mysql",
                password: "mysql",
                port: 3306,
            }),
        }
    }
}

/// Renders database-specific configuration.
pub struct DatabaseConfigurer;

impl DatabaseConfigurer {
    /// Render the environment payload for `kind`, scoped to `slug`.
    pub fn render(kind: DatabaseKind, slug: &str) -> EnvPayload {
        let payload = match NetworkDefaults::for_kind(kind) {
            None => EnvPayload::new().with("DATABASE_URL", format!("sqlite:///./{slug}.db")),
            Some(net) => EnvPayload::new()
                .with("DB_ENGINE", net.engine)
                .with("DB_NAME", slug)
                .with("DB_USER", net.user)
                .with("DB_PASSWORD", net.password)
                .with("DB_HOST", "localhost")
                .with("DB_PORT", net.port.to_string())
                .with(
                    "DATABASE_URL",
                    format!(
                        "{}://{}:{}@localhost:{}/{slug}",
                        net.engine, net.user, net.password, net.port
                    ),
                ),
        };

        payload
            .with("DEBUG", "True")
            .with("SECRET_KEY", SECRET_KEY_PLACEHOLDER)
    }

    /// Render from an identifier as written by a producer.
    pub fn render_id(kind: &str, slug: &str) -> Result<EnvPayload, DomainError> {
        Ok(Self::render(kind.parse()?, slug))
    }

    /// Compose file content: empty for sqlite, a `db` service otherwise.
    pub fn render_compose(kind: DatabaseKind, slug: &str) -> String {
        let Some(net) = NetworkDefaults::for_kind(kind) else {
            return String::new();
        };

        let (image, environment, data_dir) = match kind {
            DatabaseKind::Mysql => (
                "mysql:8.0",
                format!(
                    "      MYSQL_DATABASE: {slug}\n      MYSQL_USER: {user}\n      MYSQL_PASSWORD: {password}\n      MYSQL_ROOT_PASSWORD: {password}\n",
                    user = net.user,
                    password = net.password,
                ),
                "/var/lib/mysql",
            ),
            _ => (
                "postgres:15",
                format!(
                    "      POSTGRES_DB: {slug}\n      POSTGRES_USER: {user}\n      POSTGRES_PASSWORD: {password}\n",
                    user = net.user,
                    password = net.password,
                ),
                "/var/lib/postgresql/data",
            ),
        };

        format!(
            "services:\n  db:\n    image: {image}\n    environment:\n{environment}    ports:\n      - \"{port}:{port}\"\n    volumes:\n      - db_data:{data_dir}\n\nvolumes:\n  db_data:\n",
            port = net.port,
        )
    }
}

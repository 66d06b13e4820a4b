use std::env;

/// Runtime settings read from the environment (and `.env` via `dotenvy`).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Path of the SQLite database file.
    pub database_url: String,
    /// Interface the HTTP server binds to.
    pub address: String,
    /// Port the HTTP server binds to.
    pub port: u16,
    /// Public base URL used when building product permalinks.
    pub site_url: String,
    /// Directory receiving uploaded product images.
    pub upload_dir: String,
    /// Directory holding the tera templates.
    pub templates_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: "app.db".to_string(),
            address: "127.0.0.1".to_string(),
            port: 8080,
            site_url: "http://localhost:8080".to_string(),
            upload_dir: "uploads".to_string(),
            templates_dir: "templates".to_string(),
        }
    }
}

impl ServerConfig {
    /// Read the configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let value = |key: &str, default: String| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .unwrap_or(default)
        };

        let port = match lookup("PORT").map(|raw| raw.trim().parse::<u16>()) {
            Some(Ok(port)) => port,
            Some(Err(err)) => {
                log::warn!("Ignoring invalid PORT value: {err}");
                defaults.port
            }
            None => defaults.port,
        };

        let site_url = value("SITE_URL", defaults.site_url)
            .trim_end_matches('/')
            .to_string();

        Self {
            database_url: value("DATABASE_URL", defaults.database_url),
            address: value("ADDRESS", defaults.address),
            port,
            site_url,
            upload_dir: value("UPLOAD_DIR", defaults.upload_dir),
            templates_dir: value("TEMPLATES_DIR", defaults.templates_dir),
        }
    }
}

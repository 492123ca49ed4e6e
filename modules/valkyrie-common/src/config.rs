use std::env;
use std::path::PathBuf;

/// Which persistence backend backs the submission store.
///
/// Postgres is the production backend; the flat-file and in-memory stores
/// are for local development and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    File,
    Memory,
}

impl std::fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreBackend::Postgres => write!(f, "postgres"),
            StoreBackend::File => write!(f, "file"),
            StoreBackend::Memory => write!(f, "memory"),
        }
    }
}

impl StoreBackend {
    fn parse(value: &str) -> Self {
        match value {
            "postgres" => StoreBackend::Postgres,
            "file" => StoreBackend::File,
            "memory" => StoreBackend::Memory,
            other => panic!("STORE_BACKEND must be one of postgres, file, memory (got {other})"),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Storage
    pub store_backend: StoreBackend,
    pub database_url: String,
    pub submissions_file: PathBuf,

    // Web server
    pub web_host: String,
    pub web_port: u16,

    // Admin
    pub admin_email: String,
    pub admin_password: String,
    pub admin_token: String,
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing.
    pub fn from_env() -> Self {
        let store_backend = StoreBackend::parse(
            &env::var("STORE_BACKEND").unwrap_or_else(|_| "postgres".to_string()),
        );

        // DATABASE_URL is only required when the postgres backend is selected.
        let database_url = if store_backend == StoreBackend::Postgres {
            required_env("DATABASE_URL")
        } else {
            env::var("DATABASE_URL").unwrap_or_default()
        };

        Self {
            store_backend,
            database_url,
            submissions_file: env::var("SUBMISSIONS_FILE")
                .unwrap_or_else(|_| "logs/waitlist-submissions.json".to_string())
                .into(),
            web_host: env::var("WEB_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            web_port: env::var("WEB_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("WEB_PORT must be a number"),
            admin_email: required_env("ADMIN_EMAIL"),
            admin_password: required_env("ADMIN_PASSWORD"),
            admin_token: required_env("ADMIN_TOKEN"),
        }
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}

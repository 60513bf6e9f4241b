use anyhow::{Context, Result};
use clap::Parser;
use std::env;

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Base directory where photo payloads are kept.
    pub storage_dir: String,
    /// SQLite URL for account, folder, and photo metadata.
    pub database_url: String,
    /// Public origin stamped into share links and download URLs.
    /// Stored without a trailing slash.
    pub public_base_url: String,
    /// Upper bound on an uploaded photo's size in bytes.
    pub max_upload_bytes: usize,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug)]
#[command(author, version, about = "Folder-based photo sharing with public links")]
pub struct Args {
    /// Host to bind to (overrides PHOTO_PORTAL_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides PHOTO_PORTAL_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Directory where photo payloads are stored (overrides PHOTO_PORTAL_STORAGE_DIR)
    #[arg(long)]
    pub storage_dir: Option<String>,

    /// Database URL (overrides PHOTO_PORTAL_DATABASE_URL)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Public origin used in share links (overrides PHOTO_PORTAL_PUBLIC_URL)
    #[arg(long)]
    pub public_url: Option<String>,

    /// Maximum accepted upload size in bytes (overrides PHOTO_PORTAL_MAX_UPLOAD_BYTES)
    #[arg(long)]
    pub max_upload_bytes: Option<usize>,

    /// Run migrations and exit
    #[arg(long)]
    pub migrate: bool,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig and migrate flag.
    pub fn from_env_and_args() -> Result<(Self, bool)> {
        // Parse CLI once
        let args = Args::parse();

        // --- Environment fallback ---
        let env_host = env::var("PHOTO_PORTAL_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let env_port = match env::var("PHOTO_PORTAL_PORT") {
            Ok(value) => value
                .parse::<u16>()
                .with_context(|| format!("parsing PHOTO_PORTAL_PORT value `{}`", value))?,
            Err(env::VarError::NotPresent) => 3000,
            Err(err) => return Err(err).context("reading PHOTO_PORTAL_PORT"),
        };
        let env_storage =
            env::var("PHOTO_PORTAL_STORAGE_DIR").unwrap_or_else(|_| "./data/photos".into());
        let env_db = env::var("PHOTO_PORTAL_DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://./data/meta/photo_portal.db".into());
        let env_max_upload = match env::var("PHOTO_PORTAL_MAX_UPLOAD_BYTES") {
            Ok(value) => value.parse::<usize>().with_context(|| {
                format!("parsing PHOTO_PORTAL_MAX_UPLOAD_BYTES value `{}`", value)
            })?,
            Err(env::VarError::NotPresent) => 25 * 1024 * 1024,
            Err(err) => return Err(err).context("reading PHOTO_PORTAL_MAX_UPLOAD_BYTES"),
        };

        // --- Merge ---
        let host = args.host.unwrap_or(env_host);
        let port = args.port.unwrap_or(env_port);

        // Share links need a reachable origin; when none is configured,
        // derive one from the bind address, substituting localhost for
        // wildcard hosts.
        let public_base_url = args
            .public_url
            .or_else(|| env::var("PHOTO_PORTAL_PUBLIC_URL").ok())
            .unwrap_or_else(|| {
                let display_host = match host.as_str() {
                    "0.0.0.0" | "::" => "localhost",
                    other => other,
                };
                format!("http://{}:{}", display_host, port)
            })
            .trim_end_matches('/')
            .to_string();

        let cfg = Self {
            host,
            port,
            storage_dir: args.storage_dir.unwrap_or(env_storage),
            database_url: args.database_url.unwrap_or(env_db),
            public_base_url,
            max_upload_bytes: args.max_upload_bytes.unwrap_or(env_max_upload),
        };

        Ok((cfg, args.migrate))
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

use anyhow::{Context, Result};
use std::{net::SocketAddr, path::PathBuf, time::Duration};

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3001";
const DEFAULT_CACHE_TTL_SECS: u64 = 20;

/// Runtime settings, collected from the environment once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub media_root: PathBuf,
    pub cache_ttl: Duration,
}

impl Config {
    pub fn from_env() -> Result<Config> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        // Read per-request by the token code, but a missing secret should
        // fail at boot rather than on the first login.
        std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
        let bind_addr = std::env::var("BIND_ADDR")
            .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .context("BIND_ADDR is not a valid socket address")?;
        let media_root = std::env::var("MEDIA_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("media"));
        let cache_ttl = std::env::var("CACHE_TTL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_CACHE_TTL_SECS));
        Ok(Config {
            database_url,
            bind_addr,
            media_root,
            cache_ttl,
        })
    }
}

//! Node Configuration
//!
//! Everything comes from environment variables, read once at startup. The
//! peer list is static for the lifetime of the process; topology changes
//! require a restart.

use std::env;

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct Config {
    /// Port the HTTP server binds on.
    pub port: u16,
    /// Base addresses of the other catalog replicas, excluding this node.
    /// Empty means a standalone replica with no coordination.
    pub peer_addresses: Vec<String>,
    /// This node's advertised base address, as peers would list it.
    pub public_address: String,
    /// Front-end cache base address; unset disables invalidation calls.
    pub front_end_address: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let port = match env::var("PORT") {
            Ok(raw) => raw.parse().context("PORT must be a port number")?,
            Err(_) => 5000,
        };

        let peer_addresses = env::var("CATALOG_ADDRESSES")
            .map(|raw| split_addresses(&raw))
            .unwrap_or_default();

        let public_address = env::var("PUBLIC_ADDRESS")
            .unwrap_or_else(|_| format!("http://127.0.0.1:{}", port));

        let front_end_address = env::var("FRONT_END_ADDRESS")
            .ok()
            .filter(|raw| !raw.trim().is_empty());

        Ok(Self {
            port,
            peer_addresses,
            public_address,
            front_end_address,
        })
    }
}

/// Pipe-separated address list, whitespace-tolerant.
fn split_addresses(raw: &str) -> Vec<String> {
    raw.split('|')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_addresses() {
        assert_eq!(
            split_addresses("http://10.0.0.2:5000 | http://10.0.0.3:5000"),
            vec![
                "http://10.0.0.2:5000".to_string(),
                "http://10.0.0.3:5000".to_string()
            ]
        );
        assert!(split_addresses("").is_empty());
        assert!(split_addresses(" | ").is_empty());
    }
}

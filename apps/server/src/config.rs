//! Environment-driven server configuration.

use fundpulse_core::constants::{DEFAULT_ESTIMATE_TTL, DEFAULT_SYNC_INTERVAL_SECS};

pub struct Config {
    /// Address the HTTP server binds to.
    pub listen_addr: String,
    /// Path of the SQLite database file.
    pub db_path: String,
    /// Time-to-live for cached NAV estimates, in seconds.
    pub estimate_ttl_secs: u64,
    /// Interval between scheduled holdings sync runs, in seconds.
    pub sync_interval_secs: u64,
    /// Funds to register at startup, `code:name` pairs separated by commas.
    /// The name part is optional.
    pub seed_funds: Vec<(String, String)>,
}

impl Config {
    pub fn from_env() -> Self {
        // Loads .env if present; real environment variables win.
        dotenvy::dotenv().ok();

        let host = env_or("FUNDPULSE_HOST", "0.0.0.0");
        let port = env_or("FUNDPULSE_PORT", "8000");

        Config {
            listen_addr: format!("{}:{}", host, port),
            db_path: env_or("FUNDPULSE_DB_PATH", "fundpulse.db"),
            estimate_ttl_secs: env_parsed(
                "FUNDPULSE_ESTIMATE_TTL_SECS",
                DEFAULT_ESTIMATE_TTL.as_secs(),
            ),
            sync_interval_secs: env_parsed(
                "FUNDPULSE_SYNC_INTERVAL_SECS",
                DEFAULT_SYNC_INTERVAL_SECS,
            ),
            seed_funds: parse_seed_funds(&env_or("FUNDPULSE_FUNDS", "")),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parsed(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn parse_seed_funds(raw: &str) -> Vec<(String, String)> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| match entry.split_once(':') {
            Some((code, name)) => (code.trim().to_string(), name.trim().to_string()),
            None => (entry.to_string(), entry.to_string()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::parse_seed_funds;

    #[test]
    fn seed_funds_parse_codes_and_names() {
        let funds = parse_seed_funds("161725:Liquor Index, 110022 ,");
        assert_eq!(
            funds,
            vec![
                ("161725".to_string(), "Liquor Index".to_string()),
                ("110022".to_string(), "110022".to_string()),
            ]
        );
    }

    #[test]
    fn empty_seed_list_is_empty() {
        assert!(parse_seed_funds("").is_empty());
    }
}

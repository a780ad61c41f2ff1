use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.taiwanlottery.com/TLCAPIWeB/Lottery";
pub const DEFAULT_PRIMARY_RELAY: &str = "https://corsproxy.io/?";
pub const DEFAULT_SECONDARY_RELAY: &str = "https://api.codetabs.com/v1/proxy/?quest=";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub api_base: String,
    pub primary_relay: String,
    pub secondary_relay: String,
    pub request_timeout: Duration,
    pub page_size: u32,
}

pub fn load() -> Result<Config> {
    from_lookup(|key| env::var(key).ok())
}

/// Builds the config from any key lookup, so tests need not touch the
/// process environment.
pub fn from_lookup<F>(lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let database_url = lookup("LOTTO_DB_PATH").unwrap_or_else(|| "data/lottery.db".to_string());
    let api_base = lookup("LOTTO_API_BASE")
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
        .trim_end_matches('/')
        .to_string();
    let primary_relay =
        lookup("LOTTO_PRIMARY_RELAY").unwrap_or_else(|| DEFAULT_PRIMARY_RELAY.to_string());
    let secondary_relay =
        lookup("LOTTO_SECONDARY_RELAY").unwrap_or_else(|| DEFAULT_SECONDARY_RELAY.to_string());

    let timeout_secs: u64 = match lookup("LOTTO_TIMEOUT_SECS") {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("LOTTO_TIMEOUT_SECS is not a number: {:?}", raw))?,
        None => 8,
    };
    let page_size: u32 = match lookup("LOTTO_PAGE_SIZE") {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("LOTTO_PAGE_SIZE is not a number: {:?}", raw))?,
        None => 50,
    };

    if timeout_secs == 0 {
        anyhow::bail!("LOTTO_TIMEOUT_SECS must be greater than zero");
    }

    Ok(Config {
        database_url,
        api_base,
        primary_relay,
        secondary_relay,
        request_timeout: Duration::from_secs(timeout_secs),
        page_size,
    })
}

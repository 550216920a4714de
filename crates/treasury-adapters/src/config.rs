use alloy::primitives::Address;
use treasury_core::ChainParams;

pub const DEFAULT_FACTORY_ADDRESS: &str = "0xF3646E4C515Bdf65a34cc556C94b796faE28fC8a";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderPreference {
    /// Injected wallet in the browser, proxy URL natively, otherwise disabled.
    Auto,
    Deterministic,
}

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub factory_address: Option<Address>,
    pub chain: ChainParams,
    pub tx_probe_limit: u64,
    pub receipt_poll_interval_ms: u64,
    pub provider_timeout_ms: u64,
    pub eip1193_proxy_url: Option<String>,
    pub provider: ProviderPreference,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            factory_address: DEFAULT_FACTORY_ADDRESS.parse().ok(),
            chain: ChainParams::base_sepolia(),
            tx_probe_limit: treasury_core::service::DEFAULT_TX_PROBE_LIMIT,
            receipt_poll_interval_ms: 2_000,
            provider_timeout_ms: 15_000,
            eip1193_proxy_url: None,
            provider: ProviderPreference::Auto,
        }
    }
}

impl DashboardConfig {
    /// Defaults overridden by `TREASURY_*` variables. Values baked in at
    /// compile time are used when the process environment has none, which is
    /// always the case in the browser.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok().or_else(|| compiled_env(key)))
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();

        if let Some(raw) = lookup("TREASURY_FACTORY_ADDRESS") {
            cfg.factory_address = parse_factory(&raw);
        }
        if let Some(id) = parse_or_warn(&lookup, "TREASURY_CHAIN_ID") {
            cfg.chain.chain_id = id;
        }
        if let Some(name) = non_empty(lookup("TREASURY_CHAIN_NAME")) {
            cfg.chain.chain_name = name;
        }
        if let Some(url) = non_empty(lookup("TREASURY_RPC_URL")) {
            cfg.chain.rpc_urls = vec![url];
        }
        if let Some(url) = non_empty(lookup("TREASURY_EXPLORER_URL")) {
            cfg.chain.explorer_urls = vec![url];
        }
        if let Some(limit) = parse_or_warn(&lookup, "TREASURY_TX_PROBE_LIMIT") {
            cfg.tx_probe_limit = limit;
        }
        if let Some(ms) = parse_or_warn(&lookup, "TREASURY_RECEIPT_POLL_MS") {
            cfg.receipt_poll_interval_ms = ms.max(1);
        }
        if let Some(ms) = parse_or_warn(&lookup, "TREASURY_PROVIDER_TIMEOUT_MS") {
            cfg.provider_timeout_ms = ms;
        }
        cfg.eip1193_proxy_url = non_empty(lookup("TREASURY_EIP1193_PROXY_URL"));
        if non_empty(lookup("TREASURY_PROVIDER")).as_deref() == Some("deterministic") {
            cfg.provider = ProviderPreference::Deterministic;
        }
        cfg
    }

    pub fn factory_configured(&self) -> bool {
        self.factory_address.is_some()
    }
}

fn parse_factory(raw: &str) -> Option<Address> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse() {
        Ok(addr) => Some(addr),
        Err(e) => {
            tracing::warn!(value = trimmed, error = %e, "TREASURY_FACTORY_ADDRESS is not an address; factory disabled");
            None
        }
    }
}

fn parse_or_warn(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<u64> {
    let raw = non_empty(lookup(key))?;
    match raw.parse() {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!(key, value = %raw, error = %e, "ignoring invalid config value");
            None
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

fn compiled_env(key: &str) -> Option<String> {
    let value = match key {
        "TREASURY_FACTORY_ADDRESS" => option_env!("TREASURY_FACTORY_ADDRESS"),
        "TREASURY_CHAIN_ID" => option_env!("TREASURY_CHAIN_ID"),
        "TREASURY_CHAIN_NAME" => option_env!("TREASURY_CHAIN_NAME"),
        "TREASURY_RPC_URL" => option_env!("TREASURY_RPC_URL"),
        "TREASURY_EXPLORER_URL" => option_env!("TREASURY_EXPLORER_URL"),
        "TREASURY_TX_PROBE_LIMIT" => option_env!("TREASURY_TX_PROBE_LIMIT"),
        "TREASURY_PROVIDER" => option_env!("TREASURY_PROVIDER"),
        _ => None,
    };
    value.map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_target_base_sepolia() {
        let cfg = DashboardConfig::from_lookup(lookup(&[]));
        assert_eq!(cfg.chain.chain_id, 84_532);
        assert_eq!(cfg.tx_probe_limit, 20);
        assert!(cfg.factory_configured());
        assert_eq!(cfg.provider, ProviderPreference::Auto);
    }

    #[test]
    fn blank_or_invalid_factory_is_unconfigured() {
        assert!(!DashboardConfig::from_lookup(lookup(&[("TREASURY_FACTORY_ADDRESS", "")])).factory_configured());
        assert!(!DashboardConfig::from_lookup(lookup(&[("TREASURY_FACTORY_ADDRESS", "0x1234")])).factory_configured());
    }

    #[test]
    fn invalid_numbers_keep_defaults() {
        let cfg = DashboardConfig::from_lookup(lookup(&[
            ("TREASURY_TX_PROBE_LIMIT", "many"),
            ("TREASURY_CHAIN_ID", "8453"),
            ("TREASURY_PROVIDER", "deterministic"),
        ]));
        assert_eq!(cfg.tx_probe_limit, 20);
        assert_eq!(cfg.chain.chain_id, 8_453);
        assert_eq!(cfg.provider, ProviderPreference::Deterministic);
    }
}

//! Wallet connection and required-chain checks.

use alloy::primitives::Address;
use serde_json::Value;

use crate::domain::ChainParams;
use crate::ports::{PortError, ProviderPort, CHAIN_NOT_ADDED};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NetworkStatus {
    #[default]
    Unknown,
    ProviderMissing,
    Disconnected,
    WrongChain {
        account: Address,
        chain_id: u64,
    },
    Connected {
        account: Address,
        chain_id: u64,
    },
}

impl NetworkStatus {
    pub fn account(&self) -> Option<Address> {
        match self {
            NetworkStatus::WrongChain { account, .. } | NetworkStatus::Connected { account, .. } => {
                Some(*account)
            }
            _ => None,
        }
    }

    pub fn chain_id(&self) -> Option<u64> {
        match self {
            NetworkStatus::WrongChain { chain_id, .. }
            | NetworkStatus::Connected { chain_id, .. } => Some(*chain_id),
            _ => None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.account().is_some()
    }

    /// A connected wallet on any chain other than the required one.
    pub fn requires_switch_prompt(&self) -> bool {
        matches!(self, NetworkStatus::WrongChain { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchOutcome {
    Switched,
    AddedAndSwitched,
}

pub fn classify(accounts: &[Address], chain_id: u64, required_chain_id: u64) -> NetworkStatus {
    let Some(account) = accounts.first().copied() else {
        return NetworkStatus::Disconnected;
    };
    if chain_id == required_chain_id {
        NetworkStatus::Connected { account, chain_id }
    } else {
        NetworkStatus::WrongChain { account, chain_id }
    }
}

pub async fn check_network_status<P: ProviderPort>(
    provider: &P,
    required_chain_id: u64,
) -> Result<NetworkStatus, PortError> {
    if !provider.is_available() {
        return Ok(NetworkStatus::ProviderMissing);
    }
    let accounts = parse_accounts(&provider.request("eth_accounts", Value::Array(vec![])).await?)?;
    if accounts.is_empty() {
        return Ok(NetworkStatus::Disconnected);
    }
    let chain_id = parse_chain_id(&provider.request("eth_chainId", Value::Array(vec![])).await?)?;
    Ok(classify(&accounts, chain_id, required_chain_id))
}

/// Prompts the wallet for account access, then re-reads the status.
pub async fn connect<P: ProviderPort>(
    provider: &P,
    required_chain_id: u64,
) -> Result<NetworkStatus, PortError> {
    if !provider.is_available() {
        return Err(PortError::NotFound(
            "a browser wallet such as MetaMask is required".to_owned(),
        ));
    }
    provider
        .request("eth_requestAccounts", Value::Array(vec![]))
        .await?;
    check_network_status(provider, required_chain_id).await
}

/// Switches the wallet to `chain`, registering it first when the wallet
/// answers that it does not know the chain.
pub async fn switch_network<P: ProviderPort>(
    provider: &P,
    chain: &ChainParams,
) -> Result<SwitchOutcome, PortError> {
    let switch_params = serde_json::json!([{ "chainId": chain.hex_chain_id() }]);
    match provider
        .request("wallet_switchEthereumChain", switch_params.clone())
        .await
    {
        Ok(_) => Ok(SwitchOutcome::Switched),
        Err(err) if err.rpc_code() == Some(CHAIN_NOT_ADDED) => {
            tracing::info!(chain_id = chain.chain_id, "chain not known to wallet, adding it");
            provider
                .request("wallet_addEthereumChain", add_chain_params(chain))
                .await?;
            provider
                .request("wallet_switchEthereumChain", switch_params)
                .await?;
            Ok(SwitchOutcome::AddedAndSwitched)
        }
        Err(err) => Err(err),
    }
}

pub fn add_chain_params(chain: &ChainParams) -> Value {
    serde_json::json!([{
        "chainId": chain.hex_chain_id(),
        "chainName": chain.chain_name,
        "nativeCurrency": {
            "name": chain.currency_name,
            "symbol": chain.currency_symbol,
            "decimals": chain.currency_decimals,
        },
        "rpcUrls": chain.rpc_urls,
        "blockExplorerUrls": chain.explorer_urls,
    }])
}

pub fn parse_accounts(value: &Value) -> Result<Vec<Address>, PortError> {
    let arr = value
        .as_array()
        .ok_or_else(|| PortError::Transport("accounts result must be array".to_owned()))?;
    arr.iter()
        .map(|item| {
            let raw = item
                .as_str()
                .ok_or_else(|| PortError::Transport("account must be string".to_owned()))?;
            raw.parse()
                .map_err(|e| PortError::Validation(format!("invalid account address: {e}")))
        })
        .collect()
}

pub fn parse_chain_id(value: &Value) -> Result<u64, PortError> {
    if let Some(n) = value.as_u64() {
        return Ok(n);
    }
    let raw = value
        .as_str()
        .ok_or_else(|| PortError::Validation("chain id must be string or number".to_owned()))?;
    parse_chain_id_str(raw)
}

pub fn parse_chain_id_str(raw: &str) -> Result<u64, PortError> {
    if let Some(hex) = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16)
            .map_err(|e| PortError::Validation(format!("invalid hex chain id: {e}")))
    } else {
        raw.parse()
            .map_err(|e| PortError::Validation(format!("invalid chain id: {e}")))
    }
}

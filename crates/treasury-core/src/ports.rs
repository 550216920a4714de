use alloy::primitives::{Address, U256};
use serde_json::Value;
use thiserror::Error;

use crate::domain::{
    DeploymentCount, FactoryEntry, GovernanceConfig, Owner, TreasuryTx, TxReceipt, WriteRequest,
};

/// EIP-1193 error code for `wallet_switchEthereumChain` on an unknown chain.
pub const CHAIN_NOT_ADDED: i64 = 4902;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PortError {
    #[error("port not implemented: {0}")]
    NotImplemented(&'static str),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("policy error: {0}")]
    Policy(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("{message} (code {code})")]
    Rpc { code: i64, message: String },
    #[error("transaction reverted: {0}")]
    Reverted(String),
}

impl PortError {
    pub fn rpc_code(&self) -> Option<i64> {
        match self {
            PortError::Rpc { code, .. } => Some(*code),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderEventKind {
    AccountsChanged,
    ChainChanged,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderEvent {
    pub sequence: u64,
    pub kind: ProviderEventKind,
    pub value: String,
}

/// The injected wallet: a single `request` entry point plus the change events
/// it emitted since the last drain.
#[allow(async_fn_in_trait)]
pub trait ProviderPort {
    fn is_available(&self) -> bool;
    async fn request(&self, method: &str, params: Value) -> Result<Value, PortError>;
    fn drain_events(&self) -> Result<Vec<ProviderEvent>, PortError>;
}

#[allow(async_fn_in_trait)]
pub trait ClockPort {
    fn now_secs(&self) -> Result<u64, PortError>;
    async fn sleep_ms(&self, ms: u64);
}

/// Typed access to the Factory, Controller and CompanyWallet contracts.
#[allow(async_fn_in_trait)]
pub trait TreasuryPort {
    async fn all_controllers(&self, factory: Address) -> Result<Vec<Address>, PortError>;
    async fn deployment_count(&self, factory: Address) -> Result<DeploymentCount, PortError>;
    async fn multisig_info(
        &self,
        factory: Address,
        controller: Address,
    ) -> Result<FactoryEntry, PortError>;

    async fn company_wallet(&self, controller: Address) -> Result<Address, PortError>;
    async fn owners(&self, controller: Address) -> Result<Vec<Owner>, PortError>;
    async fn config(&self, controller: Address) -> Result<GovernanceConfig, PortError>;
    async fn transaction(&self, controller: Address, tx_id: u64)
        -> Result<TreasuryTx, PortError>;
    async fn is_confirmed(
        &self,
        controller: Address,
        tx_id: u64,
        owner: Address,
    ) -> Result<bool, PortError>;

    async fn wallet_balance(&self, wallet: Address) -> Result<U256, PortError>;
    async fn token_balance(&self, wallet: Address, token: Address) -> Result<U256, PortError>;

    /// Sends one write and resolves once it is included.
    async fn submit(&self, request: &WriteRequest) -> Result<TxReceipt, PortError>;
}

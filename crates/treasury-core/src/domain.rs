use alloy::primitives::{Address, Bytes, B256, U256};
use serde::{Deserialize, Serialize};

pub const UNNAMED_TREASURY: &str = "Unnamed Treasury";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub address: Address,
    pub name: String,
    pub percentage: u64,
    pub removable: bool,
}

impl Owner {
    /// Owners without an on-chain name are labelled by their 1-based position.
    pub fn display_name(name: &str, index: usize) -> String {
        if name.trim().is_empty() {
            format!("Owner {}", index + 1)
        } else {
            name.to_owned()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GovernanceConfig {
    pub required_percentage: u64,
    pub paused: bool,
    pub name: String,
    pub timelock_period: u64,
    pub expiry_period: u64,
    pub min_owners: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreasuryTx {
    pub id: u64,
    pub initiator: Address,
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
    pub is_token_transfer: bool,
    pub token_address: Address,
    pub executed: bool,
    pub confirmation_count: u64,
    pub timestamp: u64,
    pub timelock_end: u64,
}

impl TreasuryTx {
    /// Unset storage slots read back as zeroes, so a zero initiator marks a
    /// transaction id that was never submitted.
    pub fn is_sentinel(&self) -> bool {
        self.initiator == Address::ZERO
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiSig {
    pub controller: Address,
    pub wallet: Address,
    pub name: String,
    pub owners: Vec<Owner>,
    pub config: GovernanceConfig,
    pub balance: U256,
    pub transactions: Vec<TreasuryTx>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactoryEntry {
    pub name: String,
    pub wallet: Address,
    pub exists: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeploymentCount {
    pub controllers: u64,
    pub wallets: u64,
}

/// One dashboard row per Factory deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreasurySummary {
    pub controller: Address,
    pub wallet: Address,
    pub name: String,
    pub owners: Vec<Owner>,
    pub paused: bool,
    pub balance: U256,
    pub transactions: Vec<TreasuryTx>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_treasuries: usize,
    pub total_transactions: usize,
    pub total_owners: usize,
    pub total_value_locked: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DashboardData {
    pub factory_configured: bool,
    pub summaries: Vec<TreasurySummary>,
    pub stats: DashboardStats,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainParams {
    pub chain_id: u64,
    pub chain_name: String,
    pub currency_name: String,
    pub currency_symbol: String,
    pub currency_decimals: u8,
    pub rpc_urls: Vec<String>,
    pub explorer_urls: Vec<String>,
}

impl ChainParams {
    pub fn base_sepolia() -> Self {
        Self {
            chain_id: 84_532,
            chain_name: "Base Sepolia".to_owned(),
            currency_name: "Ether".to_owned(),
            currency_symbol: "ETH".to_owned(),
            currency_decimals: 18,
            rpc_urls: vec!["https://sepolia.base.org".to_owned()],
            explorer_urls: vec!["https://sepolia.basescan.org".to_owned()],
        }
    }

    pub fn hex_chain_id(&self) -> String {
        format!("{:#x}", self.chain_id)
    }

    pub fn explorer_base(&self) -> Option<&str> {
        self.explorer_urls
            .first()
            .map(|url| url.trim_end_matches('/'))
    }
}

/// Inclusion receipt of a write, reduced to what the views display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    pub tx_hash: B256,
    pub block_number: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoteAction {
    Confirm,
    Revoke,
    Execute,
}

impl VoteAction {
    pub fn label(&self) -> &'static str {
        match self {
            VoteAction::Confirm => "confirm",
            VoteAction::Revoke => "revoke",
            VoteAction::Execute => "execute",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransferRequest {
    Single {
        to: Address,
        value: U256,
        is_token_transfer: bool,
        token_address: Address,
        data: Bytes,
    },
    BatchDifferent {
        token_address: Address,
        recipients: Vec<Address>,
        amounts: Vec<U256>,
    },
    BatchEqual {
        token_address: Address,
        recipients: Vec<Address>,
        amount_per: U256,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GovernanceProposal {
    AddOwner {
        owner: Address,
        name: String,
        percentage: u64,
        removable: bool,
    },
    ChangeName(String),
    ChangeRequiredPercentage(u64),
    ChangeTimelock(u64),
    ChangeExpiry(u64),
    ChangeMinOwners(u64),
}

impl GovernanceProposal {
    pub fn label(&self) -> &'static str {
        match self {
            GovernanceProposal::AddOwner { .. } => "add owner",
            GovernanceProposal::ChangeName(_) => "change name",
            GovernanceProposal::ChangeRequiredPercentage(_) => "change required percentage",
            GovernanceProposal::ChangeTimelock(_) => "change timelock",
            GovernanceProposal::ChangeExpiry(_) => "change expiry",
            GovernanceProposal::ChangeMinOwners(_) => "change minimum owners",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateMultiSigParams {
    pub name: String,
    pub owners: Vec<Address>,
    pub owner_names: Vec<String>,
    pub percentages: Vec<u64>,
    pub removable: Vec<bool>,
    pub required_percentage: u64,
    pub timelock_period: u64,
    pub expiry_period: u64,
    pub min_owners: u64,
}

/// Every state-changing call the dashboard can issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WriteRequest {
    CreateMultiSig {
        factory: Address,
        params: CreateMultiSigParams,
    },
    Transfer {
        controller: Address,
        request: TransferRequest,
    },
    Vote {
        controller: Address,
        action: VoteAction,
        tx_id: u64,
    },
    Propose {
        controller: Address,
        proposal: GovernanceProposal,
    },
    SetPaused {
        controller: Address,
        paused: bool,
    },
    WalletExecute {
        wallet: Address,
        to: Address,
        value: U256,
        is_token_transfer: bool,
        token_address: Address,
        data: Bytes,
    },
}

impl WriteRequest {
    pub fn target(&self) -> Address {
        match self {
            WriteRequest::CreateMultiSig { factory, .. } => *factory,
            WriteRequest::Transfer { controller, .. }
            | WriteRequest::Vote { controller, .. }
            | WriteRequest::Propose { controller, .. }
            | WriteRequest::SetPaused { controller, .. } => *controller,
            WriteRequest::WalletExecute { wallet, .. } => *wallet,
        }
    }
}

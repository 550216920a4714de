pub mod domain;
pub mod format;
pub mod governance;
pub mod network;
pub mod ports;
pub mod service;

pub use domain::{
    ChainParams, CreateMultiSigParams, DashboardData, DashboardStats, GovernanceConfig,
    GovernanceProposal, MultiSig, Owner, TransferRequest, TreasurySummary, TreasuryTx, TxReceipt,
    VoteAction, WriteRequest,
};
pub use governance::{ApprovalStatus, StatusFilter};
pub use network::{NetworkStatus, SwitchOutcome};
pub use ports::{ClockPort, PortError, ProviderEvent, ProviderEventKind, ProviderPort, TreasuryPort};
pub use service::{ActionOutcome, BatchOutcome, TreasuryService, TxListing};

//! Page renderers. Views only read state and edit form fields; anything that
//! touches the chain is returned as an action for the app to dispatch.

use alloy::primitives::Address;

use treasury_core::{CreateMultiSigParams, GovernanceProposal, TransferRequest, VoteAction};

use crate::state::Page;

pub mod create;
pub mod dashboard;
pub mod detail;
pub mod multisigs;
pub mod settings;

#[derive(Debug, Clone)]
pub enum ViewAction {
    Navigate(Page),
    OpenMultisig(Address),
    Connect,
    SwitchNetwork,
    RefreshDashboard,
    Create(CreateMultiSigParams),
    Detail(DetailAction),
}

/// Actions on the multisig currently shown.
#[derive(Debug, Clone)]
pub enum DetailAction {
    Reload,
    RefreshTransactions,
    Vote { action: VoteAction, tx_id: u64 },
    SetPaused(bool),
    Propose(GovernanceProposal),
    Submit(TransferRequest),
    ConfirmBatch(Vec<u64>),
    TokenBalance(Address),
}

impl From<DetailAction> for ViewAction {
    fn from(action: DetailAction) -> Self {
        ViewAction::Detail(action)
    }
}

//! View and form state for the dashboard pages and modals

use std::collections::BTreeSet;

use alloy::primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

use treasury_adapters::calldata;
use treasury_core::format::{parse_address, parse_address_list, parse_eth, parse_eth_list, parse_u64};
use treasury_core::{
    CreateMultiSigParams, DashboardData, GovernanceProposal, MultiSig, PortError, StatusFilter,
    TransferRequest, TxListing,
};

/// Key for [`Preferences`] in eframe storage.
pub const PREFERENCES_KEY: &str = "treasury_dashboard_preferences";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Dashboard,
    CreateMultisig,
    MyMultisigs,
    Settings,
    Multisig(Address),
}

impl Page {
    /// Sidebar highlight; a multisig detail page counts as "My Multisigs".
    pub fn nav_target(&self) -> Page {
        match self {
            Page::Multisig(_) => Page::MyMultisigs,
            other => *other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailTab {
    #[default]
    Overview,
    Owners,
    Settings,
    Transactions,
}

impl DetailTab {
    pub const ALL: [DetailTab; 4] = [
        DetailTab::Overview,
        DetailTab::Owners,
        DetailTab::Settings,
        DetailTab::Transactions,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DetailTab::Overview => "Overview",
            DetailTab::Owners => "Owners",
            DetailTab::Settings => "Settings",
            DetailTab::Transactions => "Transactions",
        }
    }
}

/// UI preferences that survive restarts. Contract data is never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub dark_mode: bool,
    pub sidebar_collapsed: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            dark_mode: true,
            sidebar_collapsed: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Notice {
    pub last_error: Option<String>,
    pub last_info: Option<String>,
}

impl Notice {
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.last_info = None;
        self.last_error = Some(message.into());
    }

    pub fn set_info(&mut self, message: impl Into<String>) {
        self.last_error = None;
        self.last_info = Some(message.into());
    }

    pub fn clear(&mut self) {
        self.last_error = None;
        self.last_info = None;
    }
}

#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub data: Option<DashboardData>,
    pub loading: bool,
    /// Controller address typed into "open by address".
    pub open_address: String,
    pub only_mine: bool,
}

impl DashboardState {
    /// Drops loaded deployments so the next request is not swallowed by an
    /// older load still in flight.
    pub fn invalidate(&mut self) {
        self.data = None;
        self.loading = false;
    }
}

#[derive(Debug, Clone)]
pub enum Modal {
    SubmitTransaction,
    TransactionDetail(u64),
    BatchConfirm,
}

/// Everything shown on a multisig detail page.
#[derive(Debug, Clone)]
pub struct DetailState {
    pub controller: Address,
    pub multisig: Option<MultiSig>,
    pub loading: bool,
    pub error: Option<String>,
    pub listing: TxListing,
    pub listing_loaded: bool,
    pub listing_loading: bool,
    pub tab: DetailTab,
    pub filter: StatusFilter,
    /// Transaction id whose vote is in flight.
    pub processing_tx: Option<u64>,
    pub pause_pending: bool,
    pub proposal_pending: bool,
    pub proposal: ProposalForm,
    pub token_lookup: TokenLookupForm,
    pub modal: Option<Modal>,
    pub submit_form: SubmitTxForm,
    pub batch: BatchConfirmState,
    pub notice: Notice,
}

impl DetailState {
    pub fn new(controller: Address) -> Self {
        Self {
            controller,
            multisig: None,
            loading: true,
            error: None,
            listing: TxListing::default(),
            listing_loaded: false,
            listing_loading: false,
            tab: DetailTab::default(),
            filter: StatusFilter::default(),
            processing_tx: None,
            pause_pending: false,
            proposal_pending: false,
            proposal: ProposalForm::default(),
            token_lookup: TokenLookupForm::default(),
            modal: None,
            submit_form: SubmitTxForm::default(),
            batch: BatchConfirmState::default(),
            notice: Notice::default(),
        }
    }

    /// Drops everything read from the chain but keeps the write flags, so a
    /// reload cannot re-enable a button whose transaction is still pending.
    pub fn reset_data(&mut self) {
        self.multisig = None;
        self.loading = true;
        self.error = None;
        self.listing = TxListing::default();
        self.listing_loaded = false;
        self.listing_loading = false;
        self.token_lookup = TokenLookupForm::default();
        self.batch.selected.clear();
        self.modal = None;
    }

    /// Any write in flight for this multisig.
    pub fn busy(&self) -> bool {
        self.processing_tx.is_some()
            || self.pause_pending
            || self.proposal_pending
            || self.submit_form.submitting
            || self.batch.submitting
    }

    pub fn pending_ids(&self) -> Vec<u64> {
        self.listing
            .transactions
            .iter()
            .filter(|tx| !tx.executed)
            .map(|tx| tx.id)
            .collect()
    }
}

/// Detail state for `controller`: a parked one (left while a write was in
/// flight) with its data reset, otherwise a fresh one.
pub fn reopen_detail(parked: &mut Vec<DetailState>, controller: Address) -> DetailState {
    match parked.iter().position(|detail| detail.controller == controller) {
        Some(index) => {
            let mut detail = parked.swap_remove(index);
            detail.reset_data();
            detail
        }
        None => DetailState::new(controller),
    }
}

// =============================================================================
// SUBMIT TRANSACTION
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TxKind {
    #[default]
    Eth,
    Token,
    ContractCall,
    BatchDifferent,
    BatchEqual,
}

impl TxKind {
    pub const ALL: [TxKind; 5] = [
        TxKind::Eth,
        TxKind::Token,
        TxKind::ContractCall,
        TxKind::BatchDifferent,
        TxKind::BatchEqual,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TxKind::Eth => "ETH Transfer",
            TxKind::Token => "Token Transfer",
            TxKind::ContractCall => "Contract Call",
            TxKind::BatchDifferent => "Batch (amounts)",
            TxKind::BatchEqual => "Batch (equal)",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SubmitTxForm {
    pub kind: TxKind,
    pub to: String,
    pub amount: String,
    pub token: String,
    pub signature: String,
    pub args: String,
    pub raw_data: String,
    pub use_raw_data: bool,
    pub recipients: String,
    pub amounts: String,
    pub note: String,
    pub submitting: bool,
    pub error: Option<String>,
}

impl SubmitTxForm {
    /// Controller call for the current inputs. Amounts are ether units.
    pub fn build(&self) -> Result<TransferRequest, PortError> {
        match self.kind {
            TxKind::Eth => Ok(TransferRequest::Single {
                to: parse_address(&self.to, "recipient")?,
                value: parse_eth(&self.amount)?,
                is_token_transfer: false,
                token_address: Address::ZERO,
                data: Bytes::new(),
            }),
            TxKind::Token => Ok(TransferRequest::Single {
                to: parse_address(&self.to, "recipient")?,
                value: parse_eth(&self.amount)?,
                is_token_transfer: true,
                token_address: parse_address(&self.token, "token")?,
                data: Bytes::new(),
            }),
            TxKind::ContractCall => {
                let data = if self.use_raw_data {
                    calldata::parse_hex_data(&self.raw_data)?
                } else {
                    calldata::encode_call(&self.signature, &calldata::split_args(&self.args))?
                };
                let value = if self.amount.trim().is_empty() {
                    U256::ZERO
                } else {
                    parse_eth(&self.amount)?
                };
                Ok(TransferRequest::Single {
                    to: parse_address(&self.to, "contract")?,
                    value,
                    is_token_transfer: false,
                    token_address: Address::ZERO,
                    data,
                })
            }
            TxKind::BatchDifferent => Ok(TransferRequest::BatchDifferent {
                token_address: self.batch_token()?,
                recipients: parse_address_list(&self.recipients, "recipient")?,
                amounts: parse_eth_list(&self.amounts)?,
            }),
            TxKind::BatchEqual => Ok(TransferRequest::BatchEqual {
                token_address: self.batch_token()?,
                recipients: parse_address_list(&self.recipients, "recipient")?,
                amount_per: parse_eth(&self.amount)?,
            }),
        }
    }

    /// Empty token means the native coin.
    fn batch_token(&self) -> Result<Address, PortError> {
        if self.token.trim().is_empty() {
            Ok(Address::ZERO)
        } else {
            parse_address(&self.token, "token")
        }
    }

    pub fn reset(&mut self) {
        *self = Self {
            kind: self.kind,
            ..Self::default()
        };
    }
}

#[derive(Debug, Clone, Default)]
pub struct BatchConfirmState {
    pub selected: BTreeSet<u64>,
    pub submitting: bool,
}

impl BatchConfirmState {
    pub fn toggle(&mut self, tx_id: u64) {
        if !self.selected.remove(&tx_id) {
            self.selected.insert(tx_id);
        }
    }

    /// Selects every pending id, or clears the selection if all are selected.
    pub fn toggle_all(&mut self, pending: &[u64]) {
        if self.all_selected(pending) {
            self.selected.clear();
        } else {
            self.selected = pending.iter().copied().collect();
        }
    }

    pub fn all_selected(&self, pending: &[u64]) -> bool {
        !pending.is_empty() && pending.iter().all(|id| self.selected.contains(id))
    }

    /// Selected ids that are still pending, lowest first.
    pub fn selection(&self, pending: &[u64]) -> Vec<u64> {
        self.selected
            .iter()
            .copied()
            .filter(|id| pending.contains(id))
            .collect()
    }
}

// =============================================================================
// GOVERNANCE PROPOSALS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProposalKind {
    #[default]
    AddOwner,
    ChangeName,
    ChangeRequiredPercentage,
    ChangeTimelock,
    ChangeExpiry,
    ChangeMinOwners,
}

impl ProposalKind {
    pub const ALL: [ProposalKind; 6] = [
        ProposalKind::AddOwner,
        ProposalKind::ChangeName,
        ProposalKind::ChangeRequiredPercentage,
        ProposalKind::ChangeTimelock,
        ProposalKind::ChangeExpiry,
        ProposalKind::ChangeMinOwners,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ProposalKind::AddOwner => "Add owner",
            ProposalKind::ChangeName => "Change name",
            ProposalKind::ChangeRequiredPercentage => "Change required percentage",
            ProposalKind::ChangeTimelock => "Change timelock",
            ProposalKind::ChangeExpiry => "Change expiry",
            ProposalKind::ChangeMinOwners => "Change minimum owners",
        }
    }

    pub fn value_hint(&self) -> &'static str {
        match self {
            ProposalKind::AddOwner => "",
            ProposalKind::ChangeName => "New treasury name",
            ProposalKind::ChangeRequiredPercentage => "Percentage, e.g. 51",
            ProposalKind::ChangeTimelock | ProposalKind::ChangeExpiry => "Hours",
            ProposalKind::ChangeMinOwners => "Owner count",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProposalForm {
    pub kind: ProposalKind,
    pub owner: String,
    pub owner_name: String,
    pub percentage: String,
    pub removable: bool,
    pub value: String,
}

impl ProposalForm {
    pub fn build(&self) -> Result<GovernanceProposal, PortError> {
        match self.kind {
            ProposalKind::AddOwner => Ok(GovernanceProposal::AddOwner {
                owner: parse_address(&self.owner, "owner")?,
                name: self.owner_name.trim().to_owned(),
                percentage: parse_percentage(&self.percentage)?,
                removable: self.removable,
            }),
            ProposalKind::ChangeName => {
                let name = self.value.trim();
                if name.is_empty() {
                    return Err(PortError::Validation("name is required".to_owned()));
                }
                Ok(GovernanceProposal::ChangeName(name.to_owned()))
            }
            ProposalKind::ChangeRequiredPercentage => Ok(
                GovernanceProposal::ChangeRequiredPercentage(parse_percentage(&self.value)?),
            ),
            ProposalKind::ChangeTimelock => Ok(GovernanceProposal::ChangeTimelock(
                parse_hours(&self.value, "timelock")?,
            )),
            ProposalKind::ChangeExpiry => Ok(GovernanceProposal::ChangeExpiry(parse_hours(
                &self.value,
                "expiry",
            )?)),
            ProposalKind::ChangeMinOwners => Ok(GovernanceProposal::ChangeMinOwners(parse_u64(
                &self.value,
                "minimum owners",
            )?)),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TokenLookupForm {
    pub token: String,
    pub loading: bool,
    pub result: Option<Result<U256, String>>,
}

// =============================================================================
// CREATE MULTISIG
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct OwnerRow {
    pub address: String,
    pub name: String,
    pub percentage: String,
    pub removable: bool,
}

#[derive(Debug, Clone)]
pub struct CreateForm {
    pub name: String,
    pub owners: Vec<OwnerRow>,
    pub required_percentage: String,
    pub timelock_hours: String,
    pub expiry_hours: String,
    pub min_owners: String,
    pub submitting: bool,
    pub notice: Notice,
    /// Newest Factory deployment after a successful create.
    pub deployed: Option<Address>,
}

impl Default for CreateForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            owners: vec![OwnerRow {
                removable: true,
                ..OwnerRow::default()
            }],
            required_percentage: "51".to_owned(),
            timelock_hours: "24".to_owned(),
            expiry_hours: "168".to_owned(),
            min_owners: "1".to_owned(),
            submitting: false,
            notice: Notice::default(),
            deployed: None,
        }
    }
}

impl CreateForm {
    pub fn add_owner(&mut self) {
        self.owners.push(OwnerRow {
            removable: true,
            ..OwnerRow::default()
        });
    }

    /// Sum of the entered percentages, read the way `build` reads them and
    /// ignoring rows that do not parse.
    pub fn total_percentage(&self) -> u64 {
        self.owners
            .iter()
            .filter_map(|row| parse_percentage(&row.percentage).ok())
            .sum()
    }

    /// Factory arguments. Percentages are only range checked; the Factory
    /// decides whether they add up.
    pub fn build(&self) -> Result<CreateMultiSigParams, PortError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(PortError::Validation("treasury name is required".to_owned()));
        }
        if self.owners.is_empty() {
            return Err(PortError::Validation("at least one owner is required".to_owned()));
        }

        let mut params = CreateMultiSigParams {
            name: name.to_owned(),
            owners: Vec::with_capacity(self.owners.len()),
            owner_names: Vec::with_capacity(self.owners.len()),
            percentages: Vec::with_capacity(self.owners.len()),
            removable: Vec::with_capacity(self.owners.len()),
            required_percentage: parse_percentage(&self.required_percentage)?,
            timelock_period: parse_hours(&self.timelock_hours, "timelock")?,
            expiry_period: parse_hours(&self.expiry_hours, "expiry")?,
            min_owners: parse_u64(&self.min_owners, "minimum owners")?,
        };
        for (idx, row) in self.owners.iter().enumerate() {
            let field = format!("owner {}", idx + 1);
            params.owners.push(parse_address(&row.address, &field)?);
            params.owner_names.push(row.name.trim().to_owned());
            params.percentages.push(parse_percentage(&row.percentage)?);
            params.removable.push(row.removable);
        }
        Ok(params)
    }
}

fn parse_percentage(input: &str) -> Result<u64, PortError> {
    let pct = parse_u64(input.trim().trim_end_matches('%'), "percentage")?;
    if pct > 100 {
        return Err(PortError::Validation(format!(
            "percentage must be at most 100, got {pct}"
        )));
    }
    Ok(pct)
}

/// Whole hours entered by the user, as contract seconds.
fn parse_hours(input: &str, field: &str) -> Result<u64, PortError> {
    parse_u64(input, field)?
        .checked_mul(3600)
        .ok_or_else(|| PortError::Validation(format!("{field} is too large")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: &str = "0x00000000000000000000000000000000000000a1";
    const BOB: &str = "0x00000000000000000000000000000000000000b2";

    #[test]
    fn setting_error_clears_info_and_vice_versa() {
        let mut notice = Notice::default();
        notice.set_info("ok");
        assert_eq!(notice.last_info.as_deref(), Some("ok"));
        notice.set_error("bad");
        assert_eq!(notice.last_error.as_deref(), Some("bad"));
        assert!(notice.last_info.is_none());
    }

    #[test]
    fn detail_page_highlights_my_multisigs() {
        assert_eq!(Page::Multisig(Address::ZERO).nav_target(), Page::MyMultisigs);
        assert_eq!(Page::Settings.nav_target(), Page::Settings);
    }

    #[test]
    fn eth_transfer_parses_ether_units() {
        let form = SubmitTxForm {
            to: ALICE.to_owned(),
            amount: "1.5".to_owned(),
            ..SubmitTxForm::default()
        };
        let TransferRequest::Single {
            value,
            is_token_transfer,
            token_address,
            ..
        } = form.build().expect("valid form")
        else {
            panic!("expected a single transfer");
        };
        assert_eq!(value, U256::from(1_500_000_000_000_000_000u128));
        assert!(!is_token_transfer);
        assert_eq!(token_address, Address::ZERO);
    }

    #[test]
    fn token_transfer_requires_token_address() {
        let form = SubmitTxForm {
            kind: TxKind::Token,
            to: ALICE.to_owned(),
            amount: "3".to_owned(),
            ..SubmitTxForm::default()
        };
        assert!(matches!(form.build(), Err(PortError::Validation(_))));
    }

    #[test]
    fn contract_call_encodes_signature_and_args() {
        let form = SubmitTxForm {
            kind: TxKind::ContractCall,
            to: BOB.to_owned(),
            signature: "transfer(address,uint256)".to_owned(),
            args: format!("{ALICE}\n10"),
            ..SubmitTxForm::default()
        };
        let TransferRequest::Single { data, value, .. } = form.build().expect("encodes") else {
            panic!("expected a single transfer");
        };
        assert_eq!(value, U256::ZERO);
        assert_eq!(data[..4], [0xa9, 0x05, 0x9c, 0xbb]);
        assert_eq!(data.len(), 4 + 64);
    }

    #[test]
    fn batch_different_keeps_recipient_order_and_defaults_to_native() {
        let form = SubmitTxForm {
            kind: TxKind::BatchDifferent,
            recipients: format!("{ALICE}\n{BOB}"),
            amounts: "1, 2".to_owned(),
            ..SubmitTxForm::default()
        };
        let TransferRequest::BatchDifferent {
            token_address,
            recipients,
            amounts,
        } = form.build().expect("valid batch")
        else {
            panic!("expected a batch transfer");
        };
        assert_eq!(token_address, Address::ZERO);
        assert_eq!(recipients.len(), 2);
        assert_eq!(recipients[0], ALICE.parse::<Address>().expect("address"));
        assert_eq!(amounts[1], U256::from(2_000_000_000_000_000_000u128));
    }

    #[test]
    fn batch_selection_toggles_and_ignores_stale_ids() {
        let mut batch = BatchConfirmState::default();
        let pending = [4, 2, 1];
        batch.toggle_all(&pending);
        assert!(batch.all_selected(&pending));
        batch.toggle(2);
        assert!(!batch.all_selected(&pending));
        batch.selected.insert(9);
        assert_eq!(batch.selection(&pending), vec![1, 4]);
        batch.toggle_all(&pending);
        batch.toggle_all(&pending);
        assert!(batch.selected.is_empty());
    }

    #[test]
    fn proposal_hours_become_seconds() {
        let form = ProposalForm {
            kind: ProposalKind::ChangeTimelock,
            value: "48".to_owned(),
            ..ProposalForm::default()
        };
        assert_eq!(
            form.build().expect("valid"),
            GovernanceProposal::ChangeTimelock(48 * 3600)
        );
    }

    #[test]
    fn add_owner_rejects_percentage_over_hundred() {
        let form = ProposalForm {
            kind: ProposalKind::AddOwner,
            owner: ALICE.to_owned(),
            percentage: "140".to_owned(),
            ..ProposalForm::default()
        };
        assert!(form.build().is_err());
    }

    #[test]
    fn create_form_builds_parallel_owner_arrays() {
        let mut form = CreateForm {
            name: "Acme Treasury".to_owned(),
            ..CreateForm::default()
        };
        form.owners[0] = OwnerRow {
            address: ALICE.to_owned(),
            name: "CEO".to_owned(),
            percentage: "60".to_owned(),
            removable: false,
        };
        form.add_owner();
        form.owners[1].address = BOB.to_owned();
        form.owners[1].percentage = "40%".to_owned();
        assert_eq!(form.total_percentage(), 100);

        let params = form.build().expect("valid form");
        assert_eq!(params.owners.len(), 2);
        assert_eq!(params.owner_names, vec!["CEO".to_owned(), String::new()]);
        assert_eq!(params.percentages, vec![60, 40]);
        assert_eq!(params.removable, vec![false, true]);
        assert_eq!(params.required_percentage, 51);
        assert_eq!(params.timelock_period, 24 * 3600);
        assert_eq!(params.expiry_period, 168 * 3600);
    }

    #[test]
    fn total_percentage_skips_unparseable_rows() {
        let mut form = CreateForm::default();
        form.owners[0].percentage = " 35 % ".to_owned();
        form.add_owner();
        form.owners[1].percentage = "abc".to_owned();
        form.add_owner();
        form.owners[2].percentage = "140".to_owned();
        assert_eq!(form.total_percentage(), 35);
    }

    #[test]
    fn reset_data_keeps_writes_in_flight() {
        let mut detail = DetailState::new(Address::ZERO);
        detail.loading = false;
        detail.listing_loaded = true;
        detail.processing_tx = Some(3);
        detail.pause_pending = true;
        detail.submit_form.submitting = true;
        detail.batch.selected.insert(3);
        detail.modal = Some(Modal::BatchConfirm);
        detail.token_lookup.result = Some(Ok(U256::from(7u64)));

        detail.reset_data();

        assert!(detail.busy());
        assert_eq!(detail.processing_tx, Some(3));
        assert!(detail.pause_pending);
        assert!(detail.submit_form.submitting);
        assert!(detail.loading);
        assert!(!detail.listing_loaded);
        assert!(detail.batch.selected.is_empty());
        assert!(detail.modal.is_none());
        assert!(detail.token_lookup.result.is_none());
    }

    #[test]
    fn reopening_a_parked_detail_restores_its_write_flags() {
        let controller = Address::repeat_byte(0x0C);
        let mut busy = DetailState::new(controller);
        busy.loading = false;
        busy.proposal_pending = true;
        let mut parked = vec![busy];

        let other = reopen_detail(&mut parked, Address::repeat_byte(0x0D));
        assert!(!other.busy());
        assert_eq!(parked.len(), 1);

        let reopened = reopen_detail(&mut parked, controller);
        assert!(parked.is_empty());
        assert!(reopened.proposal_pending);
        assert!(reopened.busy());
        assert!(reopened.loading);
    }

    #[test]
    fn invalidated_dashboard_accepts_a_new_load() {
        let mut dashboard = DashboardState {
            data: Some(DashboardData::default()),
            loading: true,
            ..DashboardState::default()
        };
        dashboard.invalidate();
        assert!(dashboard.data.is_none());
        assert!(!dashboard.loading);
    }

    #[test]
    fn create_form_names_the_bad_owner_row() {
        let mut form = CreateForm {
            name: "Acme".to_owned(),
            ..CreateForm::default()
        };
        form.owners[0].address = "not-an-address".to_owned();
        form.owners[0].percentage = "100".to_owned();
        let err = form.build().expect_err("invalid owner");
        assert!(err.to_string().contains("owner 1"));
    }
}

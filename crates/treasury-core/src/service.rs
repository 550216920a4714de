//! Read / write flows over a [`TreasuryPort`].
//!
//! Every write is a single call followed by a re-read of whatever it
//! affects; nothing here mutates contract state locally.

use std::collections::HashMap;

use alloy::primitives::{Address, U256};

use crate::domain::{
    CreateMultiSigParams, DashboardData, GovernanceConfig, GovernanceProposal, MultiSig, Owner,
    TransferRequest, TreasurySummary, TreasuryTx, TxReceipt, VoteAction, WriteRequest,
    UNNAMED_TREASURY,
};
use crate::governance::dashboard_stats;
use crate::ports::{PortError, TreasuryPort};

pub const DEFAULT_TX_PROBE_LIMIT: u64 = 20;

/// Probed transactions, newest first, plus the confirming owners per pending
/// transaction when those could be read.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TxListing {
    pub transactions: Vec<TreasuryTx>,
    pub confirmers: Option<HashMap<u64, Vec<Address>>>,
}

impl TxListing {
    pub fn confirmers_of(&self, tx_id: u64) -> Option<&[Address]> {
        self.confirmers
            .as_ref()
            .and_then(|map| map.get(&tx_id))
            .map(Vec::as_slice)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    pub receipt: TxReceipt,
    pub listing: TxListing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    pub confirmed: Vec<u64>,
    pub failed: Option<(u64, PortError)>,
    pub listing: TxListing,
}

#[derive(Debug, Clone)]
pub struct TreasuryService<T: TreasuryPort> {
    pub port: T,
    tx_probe_limit: u64,
}

impl<T: TreasuryPort> TreasuryService<T> {
    pub fn new(port: T, tx_probe_limit: u64) -> Self {
        Self {
            port,
            tx_probe_limit,
        }
    }

    pub fn tx_probe_limit(&self) -> u64 {
        self.tx_probe_limit
    }

    /// Header data for the detail view. Owners, config and balance are read
    /// concurrently; any one failing fails the whole load.
    pub async fn load_multisig(&self, controller: Address) -> Result<MultiSig, PortError> {
        let wallet = match self.port.company_wallet(controller).await {
            Ok(wallet) => wallet,
            Err(err) => {
                tracing::warn!(%controller, error = %err, "companyWallet lookup failed, using controller address");
                controller
            }
        };

        let (owners, config, balance) = tokio::try_join!(
            self.port.owners(controller),
            self.port.config(controller),
            self.port.wallet_balance(wallet),
        )?;

        let name = if config.name.trim().is_empty() {
            UNNAMED_TREASURY.to_owned()
        } else {
            config.name.clone()
        };

        Ok(MultiSig {
            controller,
            wallet,
            name,
            owners: label_owners(owners),
            config,
            balance,
            transactions: Vec::new(),
        })
    }

    /// Reads ids `0..limit` in order, stopping at the first never-submitted
    /// id or the first failed read.
    pub async fn load_transactions(&self, controller: Address) -> Vec<TreasuryTx> {
        let mut found = Vec::new();
        for id in 0..self.tx_probe_limit {
            match self.port.transaction(controller, id).await {
                Ok(tx) if tx.is_sentinel() => break,
                Ok(mut tx) => {
                    tx.id = id;
                    found.push(tx);
                }
                Err(err) => {
                    tracing::debug!(%controller, id, error = %err, "transaction probe stopped");
                    break;
                }
            }
        }
        found.sort_by(|a, b| b.id.cmp(&a.id));
        found
    }

    /// Best effort: `None` as soon as any confirmation read fails.
    pub async fn load_confirmers(
        &self,
        controller: Address,
        transactions: &[TreasuryTx],
        owners: &[Owner],
    ) -> Option<HashMap<u64, Vec<Address>>> {
        let mut map = HashMap::new();
        for tx in transactions.iter().filter(|tx| !tx.executed) {
            let mut confirmed = Vec::new();
            for owner in owners {
                match self.port.is_confirmed(controller, tx.id, owner.address).await {
                    Ok(true) => confirmed.push(owner.address),
                    Ok(false) => {}
                    Err(err) => {
                        tracing::debug!(%controller, tx_id = tx.id, error = %err, "confirmation lookup unavailable");
                        return None;
                    }
                }
            }
            map.insert(tx.id, confirmed);
        }
        Some(map)
    }

    pub async fn load_listing(&self, controller: Address, owners: &[Owner]) -> TxListing {
        let transactions = self.load_transactions(controller).await;
        let confirmers = self.load_confirmers(controller, &transactions, owners).await;
        TxListing {
            transactions,
            confirmers,
        }
    }

    pub async fn vote(
        &self,
        controller: Address,
        owners: &[Owner],
        action: VoteAction,
        tx_id: u64,
    ) -> Result<ActionOutcome, PortError> {
        let receipt = self
            .port
            .submit(&WriteRequest::Vote {
                controller,
                action,
                tx_id,
            })
            .await?;
        tracing::info!(%controller, tx_id, action = action.label(), tx_hash = %receipt.tx_hash, "vote included");
        let listing = self.load_listing(controller, owners).await;
        Ok(ActionOutcome { receipt, listing })
    }

    /// One `confirmTransaction` per id, in order, stopping at the first failure.
    pub async fn confirm_batch(
        &self,
        controller: Address,
        owners: &[Owner],
        tx_ids: &[u64],
    ) -> BatchOutcome {
        let mut confirmed = Vec::new();
        let mut failed = None;
        for &tx_id in tx_ids {
            let request = WriteRequest::Vote {
                controller,
                action: VoteAction::Confirm,
                tx_id,
            };
            match self.port.submit(&request).await {
                Ok(_) => confirmed.push(tx_id),
                Err(err) => {
                    failed = Some((tx_id, err));
                    break;
                }
            }
        }
        let listing = self.load_listing(controller, owners).await;
        BatchOutcome {
            confirmed,
            failed,
            listing,
        }
    }

    pub async fn submit_transfer(
        &self,
        controller: Address,
        owners: &[Owner],
        request: TransferRequest,
    ) -> Result<ActionOutcome, PortError> {
        validate_transfer(&request)?;
        let receipt = self
            .port
            .submit(&WriteRequest::Transfer {
                controller,
                request,
            })
            .await?;
        let listing = self.load_listing(controller, owners).await;
        Ok(ActionOutcome { receipt, listing })
    }

    pub async fn propose(
        &self,
        controller: Address,
        owners: &[Owner],
        proposal: GovernanceProposal,
    ) -> Result<ActionOutcome, PortError> {
        let label = proposal.label();
        let receipt = self
            .port
            .submit(&WriteRequest::Propose {
                controller,
                proposal,
            })
            .await?;
        tracing::info!(%controller, proposal = label, "governance proposal included");
        let listing = self.load_listing(controller, owners).await;
        Ok(ActionOutcome { receipt, listing })
    }

    /// Pauses or unpauses, then re-reads the config so the badge reflects chain state.
    pub async fn set_paused(
        &self,
        controller: Address,
        paused: bool,
    ) -> Result<(TxReceipt, GovernanceConfig), PortError> {
        let receipt = self
            .port
            .submit(&WriteRequest::SetPaused { controller, paused })
            .await?;
        let config = self.port.config(controller).await?;
        Ok((receipt, config))
    }

    pub async fn create_multisig(
        &self,
        factory: Address,
        params: CreateMultiSigParams,
    ) -> Result<(TxReceipt, Vec<Address>), PortError> {
        validate_create(&params)?;
        let receipt = self
            .port
            .submit(&WriteRequest::CreateMultiSig { factory, params })
            .await?;
        let controllers = self.port.all_controllers(factory).await?;
        Ok((receipt, controllers))
    }

    /// Direct `CompanyWallet.executeTransaction`; only the wallet's controller
    /// may call it, so from an owner account this reverts.
    pub async fn wallet_execute(&self, request: WriteRequest) -> Result<TxReceipt, PortError> {
        if !matches!(request, WriteRequest::WalletExecute { .. }) {
            return Err(PortError::Validation(
                "expected a wallet execute request".to_owned(),
            ));
        }
        self.port.submit(&request).await
    }

    pub async fn token_balance(&self, wallet: Address, token: Address) -> Result<U256, PortError> {
        self.port.token_balance(wallet, token).await
    }

    /// All deployments of `factory` with their owners, balance and probed
    /// transactions. An unreadable controller list yields an empty dashboard;
    /// an unreadable deployment is skipped.
    pub async fn load_dashboard(&self, factory: Option<Address>) -> DashboardData {
        let Some(factory) = factory else {
            return DashboardData::default();
        };

        let controllers = match self.port.all_controllers(factory).await {
            Ok(controllers) => controllers,
            Err(err) => {
                tracing::warn!(%factory, error = %err, "failed to list controllers");
                Vec::new()
            }
        };

        let mut summaries = Vec::with_capacity(controllers.len());
        for controller in controllers {
            match self.load_summary(factory, controller).await {
                Ok(summary) => summaries.push(summary),
                Err(err) => {
                    tracing::warn!(%controller, error = %err, "skipping unreadable deployment");
                }
            }
        }

        let stats = dashboard_stats(&summaries);
        DashboardData {
            factory_configured: true,
            summaries,
            stats,
        }
    }

    async fn load_summary(
        &self,
        factory: Address,
        controller: Address,
    ) -> Result<TreasurySummary, PortError> {
        let (info, owners, config) = tokio::try_join!(
            self.port.multisig_info(factory, controller),
            self.port.owners(controller),
            self.port.config(controller),
        )?;
        let balance = self.port.wallet_balance(info.wallet).await?;
        let transactions = self.load_transactions(controller).await;

        let name = [info.name.as_str(), config.name.as_str()]
            .into_iter()
            .find(|n| !n.trim().is_empty())
            .unwrap_or(UNNAMED_TREASURY)
            .to_owned();

        Ok(TreasurySummary {
            controller,
            wallet: info.wallet,
            name,
            owners: label_owners(owners),
            paused: config.paused,
            balance,
            transactions,
        })
    }
}

fn label_owners(owners: Vec<Owner>) -> Vec<Owner> {
    owners
        .into_iter()
        .enumerate()
        .map(|(idx, owner)| Owner {
            name: Owner::display_name(&owner.name, idx),
            ..owner
        })
        .collect()
}

fn validate_transfer(request: &TransferRequest) -> Result<(), PortError> {
    match request {
        TransferRequest::Single { .. } => Ok(()),
        TransferRequest::BatchDifferent {
            recipients,
            amounts,
            ..
        } => {
            if recipients.is_empty() {
                return Err(PortError::Validation("at least one recipient is required".to_owned()));
            }
            if recipients.len() != amounts.len() {
                return Err(PortError::Validation(format!(
                    "recipient/amount count mismatch: {} recipients, {} amounts",
                    recipients.len(),
                    amounts.len()
                )));
            }
            Ok(())
        }
        TransferRequest::BatchEqual { recipients, .. } => {
            if recipients.is_empty() {
                return Err(PortError::Validation("at least one recipient is required".to_owned()));
            }
            Ok(())
        }
    }
}

fn validate_create(params: &CreateMultiSigParams) -> Result<(), PortError> {
    if params.owners.is_empty() {
        return Err(PortError::Validation("at least one owner is required".to_owned()));
    }
    let n = params.owners.len();
    if params.owner_names.len() != n || params.percentages.len() != n || params.removable.len() != n
    {
        return Err(PortError::Validation(
            "owner fields must have one entry per owner".to_owned(),
        ));
    }
    Ok(())
}

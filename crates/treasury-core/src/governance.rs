//! Read-only projections of Controller state for display.
//!
//! The Controller is the authority on thresholds and timelocks; these
//! functions only label what it reports so the views can decide which
//! buttons to offer.

use std::collections::HashSet;

use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::domain::{DashboardStats, Owner, TreasurySummary, TreasuryTx};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApprovalStatus {
    Pending,
    ReadyToExecute,
    Executed,
}

impl ApprovalStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "Pending",
            ApprovalStatus::ReadyToExecute => "Ready to Execute",
            ApprovalStatus::Executed => "Executed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Executed,
}

impl StatusFilter {
    pub const ALL: [StatusFilter; 3] = [StatusFilter::All, StatusFilter::Pending, StatusFilter::Executed];

    pub fn label(&self) -> &'static str {
        match self {
            StatusFilter::All => "All Status",
            StatusFilter::Pending => "Pending",
            StatusFilter::Executed => "Executed",
        }
    }

    pub fn matches(&self, tx: &TreasuryTx) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Pending => !tx.executed,
            StatusFilter::Executed => tx.executed,
        }
    }
}

/// `confirmation_count / owner_count * 100`, or 0 when there are no owners.
pub fn confirmation_percent(confirmation_count: u64, owner_count: usize) -> f64 {
    if owner_count == 0 {
        return 0.0;
    }
    confirmation_count as f64 / owner_count as f64 * 100.0
}

/// Progress bar fill in `[0, 1]`.
pub fn confirmation_fraction(confirmation_count: u64, owner_count: usize) -> f32 {
    (confirmation_percent(confirmation_count, owner_count) / 100.0).clamp(0.0, 1.0) as f32
}

/// Sum of the voting weight held by the given confirmers. Addresses that are
/// not current owners, and duplicates, contribute nothing.
pub fn confirmed_weight(owners: &[Owner], confirmers: &[Address]) -> u64 {
    let confirmed: HashSet<&Address> = confirmers.iter().collect();
    owners
        .iter()
        .filter(|owner| confirmed.contains(&owner.address))
        .map(|owner| owner.percentage)
        .sum()
}

pub fn total_equity(owners: &[Owner]) -> u64 {
    owners.iter().map(|owner| owner.percentage).sum()
}

/// Labels a transaction. With the confirming owners known, their weight is
/// compared against `required_percentage`; otherwise the confirmation count is
/// treated as a share of the owner count.
pub fn approval_status(
    tx: &TreasuryTx,
    owners: &[Owner],
    required_percentage: u64,
    confirmers: Option<&[Address]>,
) -> ApprovalStatus {
    if tx.executed {
        return ApprovalStatus::Executed;
    }
    if owners.is_empty() {
        return ApprovalStatus::Pending;
    }

    let threshold_met = match confirmers {
        Some(confirmers) => confirmed_weight(owners, confirmers) >= required_percentage,
        None => {
            u128::from(tx.confirmation_count) * 100
                >= u128::from(required_percentage) * owners.len() as u128
        }
    };

    if threshold_met {
        ApprovalStatus::ReadyToExecute
    } else {
        ApprovalStatus::Pending
    }
}

pub fn is_timelock_active(tx: &TreasuryTx, now_secs: u64) -> bool {
    !tx.executed && tx.timelock_end > now_secs
}

pub fn timelock_remaining_hours(tx: &TreasuryTx, now_secs: u64) -> f64 {
    tx.timelock_end.saturating_sub(now_secs) as f64 / 3600.0
}

/// Which vote buttons a transaction row offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionAvailability {
    pub can_confirm: bool,
    pub can_revoke: bool,
    pub show_execute: bool,
    pub can_execute: bool,
}

pub fn action_availability(
    tx: &TreasuryTx,
    status: ApprovalStatus,
    now_secs: u64,
    processing: bool,
) -> ActionAvailability {
    if tx.executed {
        return ActionAvailability {
            can_confirm: false,
            can_revoke: false,
            show_execute: false,
            can_execute: false,
        };
    }
    let show_execute = status == ApprovalStatus::ReadyToExecute;
    ActionAvailability {
        can_confirm: !processing,
        can_revoke: tx.confirmation_count > 0 && !processing,
        show_execute,
        can_execute: show_execute && !is_timelock_active(tx, now_secs) && !processing,
    }
}

pub fn pending_count(transactions: &[TreasuryTx]) -> usize {
    transactions.iter().filter(|tx| !tx.executed).count()
}

/// Earliest timelock end among pending transactions still locked at `now_secs`.
pub fn next_unlock(transactions: &[TreasuryTx], now_secs: u64) -> Option<u64> {
    transactions
        .iter()
        .filter(|tx| is_timelock_active(tx, now_secs))
        .map(|tx| tx.timelock_end)
        .min()
}

pub fn recent_transactions(transactions: &[TreasuryTx], limit: usize) -> Vec<TreasuryTx> {
    let mut sorted = transactions.to_vec();
    sorted.sort_by(|a, b| b.id.cmp(&a.id));
    sorted.truncate(limit);
    sorted
}

pub fn dashboard_stats(summaries: &[TreasurySummary]) -> DashboardStats {
    DashboardStats {
        total_treasuries: summaries.len(),
        total_transactions: summaries.iter().map(|s| s.transactions.len()).sum(),
        total_owners: summaries.iter().map(|s| s.owners.len()).sum(),
        total_value_locked: summaries
            .iter()
            .fold(U256::ZERO, |acc, s| acc.saturating_add(s.balance)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::Bytes;

    fn tx(id: u64, confirmations: u64) -> TreasuryTx {
        TreasuryTx {
            id,
            initiator: Address::repeat_byte(0x11),
            to: Address::repeat_byte(0x22),
            value: U256::ZERO,
            data: Bytes::new(),
            is_token_transfer: false,
            token_address: Address::ZERO,
            executed: false,
            confirmation_count: confirmations,
            timestamp: 0,
            timelock_end: 0,
        }
    }

    #[test]
    fn fraction_clamps_but_percent_does_not() {
        assert_eq!(confirmation_percent(4, 2), 200.0);
        assert_eq!(confirmation_fraction(4, 2), 1.0);
    }

    #[test]
    fn count_rule_without_confirmers() {
        let owners: Vec<Owner> = (0..3)
            .map(|i| Owner {
                address: Address::repeat_byte(i + 1),
                name: String::new(),
                percentage: 33,
                removable: true,
            })
            .collect();
        assert_eq!(approval_status(&tx(0, 1), &owners, 51, None), ApprovalStatus::Pending);
        assert_eq!(
            approval_status(&tx(0, 2), &owners, 51, None),
            ApprovalStatus::ReadyToExecute
        );
    }

    #[test]
    fn recent_is_newest_first() {
        let txs = vec![tx(0, 0), tx(3, 0), tx(1, 0), tx(2, 0)];
        let ids: Vec<u64> = recent_transactions(&txs, 3).iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }
}

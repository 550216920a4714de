mod common;

use common::{addr, owner, pending_tx};
use treasury_core::governance::{
    action_availability, approval_status, confirmation_fraction, confirmation_percent,
    next_unlock, pending_count,
};
use treasury_core::{ApprovalStatus, Owner, StatusFilter, TreasuryTx};

fn weighted_owners() -> Vec<Owner> {
    vec![owner(1, 40), owner(2, 30), owner(3, 30)]
}

#[test]
fn weighted_status_follows_confirmer_equity() {
    let owners = weighted_owners();
    let tx = pending_tx(0, 1);

    assert_eq!(
        approval_status(&tx, &owners, 51, Some(&[addr(1)][..])),
        ApprovalStatus::Pending
    );
    assert_eq!(
        approval_status(&tx, &owners, 51, Some(&[addr(3)][..])),
        ApprovalStatus::Pending
    );
    let tx = pending_tx(0, 2);
    assert_eq!(
        approval_status(&tx, &owners, 51, Some(&[addr(1), addr(2)][..])),
        ApprovalStatus::ReadyToExecute
    );
    assert_eq!(
        approval_status(&tx, &owners, 61, Some(&[addr(2), addr(3)][..])),
        ApprovalStatus::Pending
    );
}

#[test]
fn unknown_confirmers_fall_back_to_count_rule() {
    let owners = weighted_owners();
    assert_eq!(
        approval_status(&pending_tx(0, 1), &owners, 51, None),
        ApprovalStatus::Pending
    );
    assert_eq!(
        approval_status(&pending_tx(0, 2), &owners, 51, None),
        ApprovalStatus::ReadyToExecute
    );
}

#[test]
fn executed_wins_over_threshold() {
    let tx = TreasuryTx {
        executed: true,
        ..pending_tx(0, 0)
    };
    assert_eq!(
        approval_status(&tx, &weighted_owners(), 51, None),
        ApprovalStatus::Executed
    );
}

#[test]
fn zero_owners_is_pending_and_zero_percent() {
    assert_eq!(confirmation_percent(3, 0), 0.0);
    assert_eq!(confirmation_fraction(3, 0), 0.0);
    assert_eq!(
        approval_status(&pending_tx(0, 3), &[], 51, None),
        ApprovalStatus::Pending
    );
}

#[test]
fn execute_waits_for_timelock() {
    let owners = weighted_owners();
    let tx = TreasuryTx {
        timelock_end: 2_000,
        ..pending_tx(0, 2)
    };
    let status = approval_status(&tx, &owners, 51, None);

    let locked = action_availability(&tx, status, 1_000, false);
    assert!(locked.show_execute);
    assert!(!locked.can_execute);

    let unlocked = action_availability(&tx, status, 2_000, false);
    assert!(unlocked.can_execute);

    let busy = action_availability(&tx, status, 2_000, true);
    assert!(!busy.can_execute && !busy.can_confirm && !busy.can_revoke);
}

#[test]
fn revoke_needs_an_existing_confirmation() {
    let tx = pending_tx(0, 0);
    let status = approval_status(&tx, &weighted_owners(), 51, None);
    let avail = action_availability(&tx, status, 0, false);
    assert!(avail.can_confirm);
    assert!(!avail.can_revoke);
}

#[test]
fn overview_counters() {
    let txs = vec![
        TreasuryTx {
            timelock_end: 500,
            ..pending_tx(0, 0)
        },
        TreasuryTx {
            timelock_end: 300,
            ..pending_tx(1, 0)
        },
        TreasuryTx {
            executed: true,
            timelock_end: 100,
            ..pending_tx(2, 0)
        },
    ];
    assert_eq!(pending_count(&txs), 2);
    assert_eq!(next_unlock(&txs, 200), Some(300));
    assert_eq!(next_unlock(&txs, 600), None);

    let executed: Vec<_> = txs.iter().filter(|t| StatusFilter::Executed.matches(t)).collect();
    assert_eq!(executed.len(), 1);
}

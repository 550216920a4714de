use eframe::egui;

use treasury_core::format::format_eth;
use treasury_core::governance::{
    action_availability, approval_status, confirmation_fraction, confirmed_weight,
    is_timelock_active, timelock_remaining_hours,
};
use treasury_core::{MultiSig, StatusFilter, TreasuryTx, VoteAction};

use super::DetailContext;
use crate::state::{DetailState, Modal};
use crate::ui;
use crate::views::DetailAction;

pub fn render(
    ui: &mut egui::Ui,
    detail: &mut DetailState,
    multisig: &MultiSig,
    cx: &DetailContext<'_>,
) -> Option<DetailAction> {
    let mut action = None;

    ui.horizontal(|ui| {
        egui::ComboBox::from_id_salt("tx_status_filter")
            .selected_text(detail.filter.label())
            .show_ui(ui, |ui| {
                for filter in StatusFilter::ALL {
                    ui.selectable_value(&mut detail.filter, filter, filter.label());
                }
            });
        let loading = detail.listing_loading;
        if ui::secondary_button_enabled(ui, "⟳ Refresh", !loading).clicked() {
            action = Some(DetailAction::RefreshTransactions);
        }
        if loading {
            ui.spinner();
        }
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui::primary_button_enabled(ui, "📤 New Transaction", cx.connected).clicked() {
                detail.modal = Some(Modal::SubmitTransaction);
            }
            let has_pending = !detail.pending_ids().is_empty();
            if ui::secondary_button_enabled(ui, "☑ Batch Confirm", cx.connected && has_pending)
                .clicked()
            {
                detail.modal = Some(Modal::BatchConfirm);
            }
        });
    });
    ui.add_space(8.0);

    if !detail.listing_loaded {
        ui::loading_spinner(ui, "Scanning transactions...");
        return action;
    }

    let visible: Vec<TreasuryTx> = detail
        .listing
        .transactions
        .iter()
        .filter(|tx| detail.filter.matches(tx))
        .cloned()
        .collect();

    if visible.is_empty() {
        ui.add_space(20.0);
        ui.vertical_centered(|ui| {
            ui.label(egui::RichText::new("No transactions found.").weak());
        });
        return action;
    }

    for tx in &visible {
        if let Some(row_action) = transaction_card(ui, detail, multisig, cx, tx) {
            action = Some(row_action);
        }
        ui.add_space(6.0);
    }

    action
}

fn transaction_card(
    ui: &mut egui::Ui,
    detail: &mut DetailState,
    multisig: &MultiSig,
    cx: &DetailContext<'_>,
    tx: &TreasuryTx,
) -> Option<DetailAction> {
    let mut action = None;
    let owners = &multisig.owners;
    let confirmers = detail.listing.confirmers_of(tx.id);
    let status = approval_status(tx, owners, multisig.config.required_percentage, confirmers);
    let weight = confirmers.map(|c| confirmed_weight(owners, c));
    let available = action_availability(tx, status, cx.now_secs, detail.busy());
    let processing = detail.processing_tx == Some(tx.id);

    ui::card(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new(format!("Transaction #{}", tx.id)).strong());
            ui::status_badge(ui, status);
            if is_timelock_active(tx, cx.now_secs) {
                ui::badge(
                    ui,
                    &format!("🔒 Locked: {:.1}h", timelock_remaining_hours(tx, cx.now_secs)),
                    ui::WARNING_ORANGE,
                );
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.small_button("Details").clicked() {
                    detail.modal = Some(Modal::TransactionDetail(tx.id));
                }
            });
        });

        ui.horizontal(|ui| {
            ui::caption(ui, "To");
            ui::address_link(ui, cx.chain, &tx.to, false);
        });
        if tx.is_token_transfer {
            ui.horizontal(|ui| {
                ui::caption(ui, "ERC20 Transfer");
                ui::address_link(ui, cx.chain, &tx.token_address, true);
            });
        } else if !tx.data.is_empty() {
            ui::caption(ui, &format!("Contract call, {} bytes of data", tx.data.len()));
        }
        let unit = if tx.is_token_transfer { "tokens" } else { cx.chain.currency_symbol.as_str() };
        ui.label(egui::RichText::new(format!("{} {unit}", format_eth(tx.value, 4))).strong());

        ui.add_space(4.0);
        ui.horizontal(|ui| {
            ui.label(format!("{}/{} Confirmations", tx.confirmation_count, owners.len()));
            if let Some(weight) = weight {
                ui::caption(
                    ui,
                    &format!("{weight}% of {}% required", multisig.config.required_percentage),
                );
            }
        });
        ui.add(
            egui::ProgressBar::new(confirmation_fraction(tx.confirmation_count, owners.len()))
                .desired_height(6.0),
        );

        if tx.executed {
            return;
        }
        ui.add_space(4.0);
        ui.horizontal(|ui| {
            if processing {
                ui.spinner();
                ui.label(egui::RichText::new("Processing...").weak());
                return;
            }
            let can_vote = cx.connected;
            if ui::primary_button_enabled(ui, "✔ Confirm", can_vote && available.can_confirm)
                .clicked()
            {
                action = Some(vote(VoteAction::Confirm, tx.id));
            }
            if ui::secondary_button_enabled(ui, "↩ Revoke", can_vote && available.can_revoke)
                .clicked()
            {
                action = Some(vote(VoteAction::Revoke, tx.id));
            }
            if available.show_execute {
                let response =
                    ui::primary_button_enabled(ui, "▶ Execute", can_vote && available.can_execute);
                let response = if is_timelock_active(tx, cx.now_secs) {
                    response.on_disabled_hover_text("Timelock has not expired yet")
                } else {
                    response
                };
                if response.clicked() {
                    action = Some(vote(VoteAction::Execute, tx.id));
                }
            }
        });
    });

    action
}

fn vote(action: VoteAction, tx_id: u64) -> DetailAction {
    DetailAction::Vote { action, tx_id }
}

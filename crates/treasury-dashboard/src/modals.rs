//! Floating windows: wrong-network prompt and the multisig detail modals

use alloy::primitives::U256;
use eframe::egui;

use treasury_core::format::{format_eth, short_address};
use treasury_core::governance::{
    action_availability, approval_status, confirmation_fraction, confirmed_weight,
};
use treasury_core::{ChainParams, MultiSig, NetworkStatus, Owner, TransferRequest, VoteAction};

use crate::state::{DetailState, Modal, TxKind};
use crate::ui;
use crate::views::detail::DetailContext;
use crate::views::DetailAction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkPromptAction {
    Switch,
    Dismiss,
}

fn modal_window<'open>(title: impl Into<egui::WidgetText>) -> egui::Window<'open> {
    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
}

/// Shown while the wallet is connected to another chain.
pub fn network_prompt(
    ctx: &egui::Context,
    status: &NetworkStatus,
    chain: &ChainParams,
    switching: bool,
) -> Option<NetworkPromptAction> {
    let NetworkStatus::WrongChain { chain_id, .. } = status else {
        return None;
    };
    let mut action = None;

    modal_window("⚠ Wrong Network").show(ctx, |ui| {
        ui.label("This application requires a different network.");
        ui.add_space(8.0);
        egui::Grid::new("network_prompt_grid")
            .num_columns(2)
            .spacing([12.0, 4.0])
            .show(ui, |ui| {
                ui.label("Required network:");
                ui.label(egui::RichText::new(&chain.chain_name).strong());
                ui.end_row();
                ui.label("Chain ID:");
                ui.label(egui::RichText::new(chain.chain_id.to_string()).monospace());
                ui.end_row();
                ui.label("Your chain ID:");
                ui.label(
                    egui::RichText::new(chain_id.to_string())
                        .monospace()
                        .color(ui::ERROR_RED),
                );
                ui.end_row();
            });
        ui.add_space(10.0);
        ui.horizontal(|ui| {
            if ui::secondary_button(ui, "Dismiss").clicked() {
                action = Some(NetworkPromptAction::Dismiss);
            }
            let label = if switching {
                "Switching...".to_owned()
            } else {
                format!("Switch to {}", chain.chain_name)
            };
            if ui::primary_button_enabled(ui, &label, !switching).clicked() {
                action = Some(NetworkPromptAction::Switch);
            }
        });
    });

    action
}

/// Renders whichever modal the detail page has open.
pub fn detail_modal(
    ctx: &egui::Context,
    detail: &mut DetailState,
    cx: &DetailContext<'_>,
) -> Option<DetailAction> {
    let modal = detail.modal.clone()?;
    let multisig = detail.multisig.clone()?;
    let mut open = true;

    let action = match modal {
        Modal::SubmitTransaction => submit_transaction(ctx, detail, cx, &mut open),
        Modal::TransactionDetail(tx_id) => {
            transaction_detail(ctx, detail, &multisig, cx, tx_id, &mut open)
        }
        Modal::BatchConfirm => batch_confirm(ctx, detail, cx, &mut open),
    };

    if !open {
        detail.modal = None;
    }
    action
}

// =============================================================================
// SUBMIT TRANSACTION
// =============================================================================

fn submit_transaction(
    ctx: &egui::Context,
    detail: &mut DetailState,
    cx: &DetailContext<'_>,
    open: &mut bool,
) -> Option<DetailAction> {
    let mut action = None;
    let mut cancel = false;
    let form = &mut detail.submit_form;

    modal_window("📤 Submit Transaction")
        .open(open)
        .default_width(520.0)
        .show(ctx, |ui| {
            ui.horizontal_wrapped(|ui| {
                for kind in TxKind::ALL {
                    if ui.selectable_label(form.kind == kind, kind.label()).clicked() {
                        form.kind = kind;
                        form.error = None;
                    }
                }
            });
            ui.separator();

            match form.kind {
                TxKind::Eth | TxKind::Token => {
                    ui.label("Recipient:");
                    ui::address_input(ui, &mut form.to);
                    if form.kind == TxKind::Token {
                        ui.label("Token contract:");
                        ui::address_input(ui, &mut form.token);
                    }
                    ui.label("Amount:");
                    ui::number_input(ui, &mut form.amount, "0.0");
                }
                TxKind::ContractCall => {
                    ui.label("Contract:");
                    ui::address_input(ui, &mut form.to);
                    ui.checkbox(&mut form.use_raw_data, "Enter raw calldata");
                    if form.use_raw_data {
                        ui::multiline_input(ui, &mut form.raw_data, "0x...", 3);
                    } else {
                        ui.label("Function signature:");
                        ui.add(
                            egui::TextEdit::singleline(&mut form.signature)
                                .hint_text("transfer(address,uint256)")
                                .desired_width(400.0)
                                .font(egui::TextStyle::Monospace),
                        );
                        ui.label("Arguments (one per line):");
                        ui::multiline_input(ui, &mut form.args, "0x...\n1000", 4);
                    }
                    ui.label(format!("Value ({}, optional):", cx.chain.currency_symbol));
                    ui::number_input(ui, &mut form.amount, "0");
                }
                TxKind::BatchDifferent | TxKind::BatchEqual => {
                    ui.label("Token contract (empty for native):");
                    ui::address_input(ui, &mut form.token);
                    ui.label("Recipients (one per line):");
                    ui::multiline_input(ui, &mut form.recipients, "0x...", 4);
                    if form.kind == TxKind::BatchDifferent {
                        ui.label("Amounts (one per line, same order):");
                        ui::multiline_input(ui, &mut form.amounts, "1.0", 4);
                    } else {
                        ui.label("Amount per recipient:");
                        ui::number_input(ui, &mut form.amount, "0.0");
                    }
                }
            }

            ui.label("Note (not stored on-chain):");
            ui.add(egui::TextEdit::singleline(&mut form.note).desired_width(400.0));

            ui.add_space(6.0);
            if let Ok(request) = form.build() {
                ui.label(egui::RichText::new(preview(&request, cx.chain)).weak());
            }
            if let Some(err) = &form.error {
                ui::error_message(ui, err);
            }

            ui.add_space(6.0);
            ui.horizontal(|ui| {
                if ui::secondary_button(ui, "Cancel").clicked() {
                    cancel = true;
                }
                let label = if form.submitting { "Submitting..." } else { "Submit" };
                if ui::primary_button_enabled(ui, label, cx.connected && !form.submitting).clicked() {
                    match form.build() {
                        Ok(request) => {
                            form.error = None;
                            action = Some(DetailAction::Submit(request));
                        }
                        Err(e) => form.error = Some(e.to_string()),
                    }
                }
                if form.submitting {
                    ui.spinner();
                }
            });
        });

    if cancel {
        *open = false;
    }
    action
}

fn preview(request: &TransferRequest, chain: &ChainParams) -> String {
    match request {
        TransferRequest::Single {
            to,
            value,
            is_token_transfer,
            data,
            ..
        } => {
            let unit = if *is_token_transfer { "tokens" } else { chain.currency_symbol.as_str() };
            let mut text = format!("Send {} {unit} to {}", format_eth(*value, 6), short_address(to, 4));
            if !data.is_empty() {
                text.push_str(&format!(" with {} bytes of calldata", data.len()));
            }
            text
        }
        TransferRequest::BatchDifferent {
            recipients, amounts, ..
        } => {
            let total = amounts.iter().fold(U256::ZERO, |acc, a| acc.saturating_add(*a));
            format!("Pay {} recipients, {} in total", recipients.len(), format_eth(total, 6))
        }
        TransferRequest::BatchEqual {
            recipients,
            amount_per,
            ..
        } => format!(
            "Pay {} to each of {} recipients",
            format_eth(*amount_per, 6),
            recipients.len()
        ),
    }
}

// =============================================================================
// TRANSACTION DETAIL
// =============================================================================

fn transaction_detail(
    ctx: &egui::Context,
    detail: &mut DetailState,
    multisig: &MultiSig,
    cx: &DetailContext<'_>,
    tx_id: u64,
    open: &mut bool,
) -> Option<DetailAction> {
    let mut action = None;
    let busy = detail.busy();
    let tx = detail
        .listing
        .transactions
        .iter()
        .find(|tx| tx.id == tx_id)
        .cloned();
    let confirmers = detail.listing.confirmers_of(tx_id).map(<[_]>::to_vec);

    modal_window(format!("Transaction #{tx_id}"))
        .open(open)
        .default_width(480.0)
        .show(ctx, |ui| {
            let Some(tx) = &tx else {
                ui.label(egui::RichText::new("Transaction is no longer listed.").weak());
                return;
            };
            let owners = &multisig.owners;
            let status = approval_status(
                tx,
                owners,
                multisig.config.required_percentage,
                confirmers.as_deref(),
            );

            egui::Grid::new("tx_detail_grid")
                .num_columns(2)
                .spacing([12.0, 6.0])
                .show(ui, |ui| {
                    ui.label("Status:");
                    ui::status_badge(ui, status);
                    ui.end_row();

                    ui.label("Initiator:");
                    ui::address_link(ui, cx.chain, &tx.initiator, true);
                    ui.end_row();

                    ui.label("To:");
                    ui::address_link(ui, cx.chain, &tx.to, true);
                    ui.end_row();

                    if tx.is_token_transfer {
                        ui.label("Token:");
                        ui::address_link(ui, cx.chain, &tx.token_address, true);
                        ui.end_row();
                    }

                    ui.label("Value:");
                    let unit = if tx.is_token_transfer { "tokens" } else { cx.chain.currency_symbol.as_str() };
                    ui.label(egui::RichText::new(format!("{} {unit}", format_eth(tx.value, 6))).strong());
                    ui.end_row();

                    if !tx.data.is_empty() {
                        ui.label("Data:");
                        ui.label(egui::RichText::new(format!("{} bytes", tx.data.len())).monospace())
                            .on_hover_text(tx.data.to_string());
                        ui.end_row();
                    }
                });

            ui.add_space(8.0);
            ui.label(format!("Confirmations: {}/{}", tx.confirmation_count, owners.len()));
            ui.add(egui::ProgressBar::new(confirmation_fraction(
                tx.confirmation_count,
                owners.len(),
            )));

            ui::section_header(ui, "Confirmed By");
            match &confirmers {
                Some(list) if list.is_empty() => {
                    ui.label(egui::RichText::new("No confirmations yet.").weak());
                }
                Some(list) => {
                    for address in list {
                        let name = owners
                            .iter()
                            .position(|o| o.address == *address)
                            .map(|idx| Owner::display_name(&owners[idx].name, idx));
                        ui.horizontal(|ui| {
                            ui.label("✔");
                            if let Some(name) = name {
                                ui.label(name);
                            }
                            ui::address_link(ui, cx.chain, address, true);
                        });
                    }
                    ui::caption(
                        ui,
                        &format!(
                            "{}% of {}% required",
                            confirmed_weight(owners, list),
                            multisig.config.required_percentage
                        ),
                    );
                }
                None => {
                    ui.label(
                        egui::RichText::new("Confirming owners could not be read.").weak(),
                    );
                }
            }

            ui.add_space(10.0);
            let available = action_availability(tx, status, cx.now_secs, busy);
            ui.horizontal(|ui| {
                if !tx.executed {
                    if ui::primary_button_enabled(ui, "✔ Confirm", cx.connected && available.can_confirm)
                        .clicked()
                    {
                        action = Some(DetailAction::Vote {
                            action: VoteAction::Confirm,
                            tx_id,
                        });
                    }
                    if ui::secondary_button_enabled(ui, "↩ Revoke", cx.connected && available.can_revoke)
                        .clicked()
                    {
                        action = Some(DetailAction::Vote {
                            action: VoteAction::Revoke,
                            tx_id,
                        });
                    }
                }
                if ui.link("View on Explorer").clicked() {
                    if let Some(url) = ui::explorer_address_url(cx.chain, &multisig.controller) {
                        ui::open_url_new_tab(&url);
                    }
                }
            });
        });

    action
}

// =============================================================================
// BATCH CONFIRM
// =============================================================================

fn batch_confirm(
    ctx: &egui::Context,
    detail: &mut DetailState,
    cx: &DetailContext<'_>,
    open: &mut bool,
) -> Option<DetailAction> {
    let mut action = None;
    let mut cancel = false;
    let pending = detail.pending_ids();
    let pending_txs: Vec<_> = detail
        .listing
        .transactions
        .iter()
        .filter(|tx| !tx.executed)
        .cloned()
        .collect();
    let batch = &mut detail.batch;

    modal_window("☑ Batch Confirm")
        .open(open)
        .default_width(460.0)
        .show(ctx, |ui| {
            if pending_txs.is_empty() {
                ui.label(egui::RichText::new("No pending transactions.").weak());
                return;
            }

            let all = batch.all_selected(&pending);
            let mut select_all = all;
            let selected = batch.selection(&pending).len();
            if ui
                .checkbox(
                    &mut select_all,
                    format!("Select All ({selected}/{})", pending.len()),
                )
                .changed()
            {
                batch.toggle_all(&pending);
            }
            ui.separator();

            egui::ScrollArea::vertical()
                .max_height(280.0)
                .show(ui, |ui| {
                    for tx in &pending_txs {
                        let mut checked = batch.selected.contains(&tx.id);
                        let unit = if tx.is_token_transfer { "tokens" } else { cx.chain.currency_symbol.as_str() };
                        let text = format!(
                            "#{}  {} {unit} to {}",
                            tx.id,
                            format_eth(tx.value, 4),
                            short_address(&tx.to, 4)
                        );
                        if ui.checkbox(&mut checked, text).changed() {
                            batch.toggle(tx.id);
                        }
                    }
                });

            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui::secondary_button(ui, "Cancel").clicked() {
                    cancel = true;
                }
                let selection = batch.selection(&pending);
                let label = if batch.submitting {
                    "Confirming...".to_owned()
                } else {
                    format!("Confirm ({})", selection.len())
                };
                let enabled = cx.connected && !batch.submitting && !selection.is_empty();
                if ui::primary_button_enabled(ui, &label, enabled).clicked() {
                    action = Some(DetailAction::ConfirmBatch(selection));
                }
                if batch.submitting {
                    ui.spinner();
                }
            });
        });

    if cancel {
        *open = false;
    }
    action
}

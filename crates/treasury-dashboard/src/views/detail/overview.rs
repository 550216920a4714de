use eframe::egui;

use treasury_core::format::{format_eth, format_duration};
use treasury_core::governance::{confirmation_percent, next_unlock, pending_count, recent_transactions};
use treasury_core::MultiSig;

use super::DetailContext;
use crate::state::{DetailState, DetailTab, Modal};
use crate::ui;
use crate::views::DetailAction;

pub fn render(
    ui: &mut egui::Ui,
    detail: &mut DetailState,
    multisig: &MultiSig,
    cx: &DetailContext<'_>,
) -> Option<DetailAction> {
    let transactions = &detail.listing.transactions;
    let symbol = &cx.chain.currency_symbol;

    ui::section_header(ui, "Wallet Summary");
    ui::card(ui, |ui| {
        ui.set_width(ui.available_width());
        ui::caption(ui, "Company Wallet Address");
        ui::address_link(ui, cx.chain, &multisig.wallet, false);
        ui.add_space(8.0);
        ui.columns(2, |cols| {
            ui::caption(&mut cols[0], "Total Balance");
            cols[0].label(
                egui::RichText::new(format!("{} {symbol}", format_eth(multisig.balance, 4)))
                    .size(22.0)
                    .strong(),
            );
            ui::caption(&mut cols[1], "Pending Transactions");
            cols[1].label(
                egui::RichText::new(pending_count(transactions).to_string())
                    .size(22.0)
                    .strong(),
            );
            ui::caption(&mut cols[1], "Awaiting approval");
        });
        ui.add_space(8.0);
        ui.horizontal(|ui| {
            ui.vertical(|ui| {
                ui::caption(ui, "Timelock Status");
                match next_unlock(transactions, cx.now_secs) {
                    Some(unlock) => {
                        let remaining = unlock.saturating_sub(cx.now_secs);
                        ui.label(
                            egui::RichText::new(format!("Next unlock in {}", format_duration(remaining)))
                                .strong()
                                .color(ui::WARNING_ORANGE),
                        );
                    }
                    None => {
                        ui.label(egui::RichText::new("No active locks").weak());
                    }
                }
            });
            ui.with_layout(egui::Layout::right_to_left(egui::Align::TOP), |ui| {
                ui.vertical(|ui| {
                    ui::caption(ui, "Configured Period");
                    ui.label(
                        egui::RichText::new(format_duration(multisig.config.timelock_period))
                            .monospace(),
                    );
                });
            });
        });
    });

    ui::section_header(ui, "Quick Actions");
    ui.horizontal(|ui| {
        if ui::primary_button_enabled(ui, "📤 New Transaction", cx.connected).clicked() {
            detail.modal = Some(Modal::SubmitTransaction);
        }
        if ui::secondary_button(ui, "View All Owners").clicked() {
            detail.tab = DetailTab::Owners;
        }
    });

    ui::section_header(ui, "Recent Transactions");
    let recent = recent_transactions(&detail.listing.transactions, 3);
    if !detail.listing_loaded {
        ui::loading_spinner(ui, "Scanning transactions...");
    } else if recent.is_empty() {
        ui.label(egui::RichText::new("No transactions found.").weak());
    }
    for tx in recent {
        ui::card(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    if ui.link(egui::RichText::new(format!("TX #{}", tx.id)).strong()).clicked() {
                        detail.modal = Some(Modal::TransactionDetail(tx.id));
                    }
                    ui::caption(ui, &format!("To: {}", tx.to));
                });
                ui.with_layout(egui::Layout::right_to_left(egui::Align::TOP), |ui| {
                    ui.vertical(|ui| {
                        ui.label(
                            egui::RichText::new(format!("{} {symbol}", format_eth(tx.value, 4)))
                                .strong(),
                        );
                        if tx.executed {
                            ui.label(egui::RichText::new("Executed").color(ui::SUCCESS_GREEN));
                        } else {
                            let pct = confirmation_percent(tx.confirmation_count, multisig.owners.len());
                            ui.label(
                                egui::RichText::new(format!("Pending ({pct:.0}%)"))
                                    .color(ui::WARNING_ORANGE),
                            );
                        }
                    });
                });
            });
        });
        ui.add_space(4.0);
    }

    None
}

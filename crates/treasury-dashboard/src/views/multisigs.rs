//! "My Multisigs": every deployment of the configured Factory

use alloy::primitives::Address;
use eframe::egui;

use treasury_core::format::{format_eth, parse_address};
use treasury_core::governance::pending_count;
use treasury_core::{ChainParams, TreasurySummary};

use super::ViewAction;
use crate::state::DashboardState;
use crate::ui;

pub fn render(
    ui: &mut egui::Ui,
    state: &mut DashboardState,
    chain: &ChainParams,
    account: Option<Address>,
    factory_configured: bool,
) -> Option<ViewAction> {
    let mut action = None;

    ui.horizontal(|ui| {
        ui::styled_heading(ui, "My Multisigs");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui::secondary_button_enabled(ui, "⟳ Refresh", !state.loading && factory_configured)
                .clicked()
            {
                action = Some(ViewAction::RefreshDashboard);
            }
        });
    });
    ui.add_space(10.0);

    // Open a controller directly, e.g. one deployed by another factory
    ui.horizontal(|ui| {
        ui.label("Controller:");
        ui::address_input(ui, &mut state.open_address);
        let valid = parse_address(&state.open_address, "controller").ok();
        if ui::secondary_button_enabled(ui, "Open", valid.is_some()).clicked() {
            if let Some(controller) = valid {
                action = Some(ViewAction::OpenMultisig(controller));
            }
        }
    });
    ui.add_space(10.0);

    if !factory_configured {
        ui::warning_message(
            ui,
            "No Factory configured; open a controller by address instead.",
            ui::WARNING_ORANGE,
        );
        return action;
    }

    if state.loading {
        ui::loading_spinner(ui, "Loading treasuries...");
        return action;
    }

    let Some(data) = &state.data else {
        ui.label(egui::RichText::new("Treasuries have not been loaded yet.").weak());
        return action;
    };

    ui.add_enabled(
        account.is_some(),
        egui::Checkbox::new(&mut state.only_mine, "Only treasuries I own"),
    );
    ui.add_space(6.0);

    let mine = |summary: &TreasurySummary| match account {
        Some(account) => summary.owners.iter().any(|o| o.address == account),
        None => true,
    };
    let visible: Vec<&TreasurySummary> = data
        .summaries
        .iter()
        .filter(|s| !state.only_mine || mine(*s))
        .collect();

    if visible.is_empty() {
        ui.add_space(20.0);
        ui.vertical_centered(|ui| {
            ui.label(egui::RichText::new("No treasuries found.").weak());
        });
        return action;
    }

    for summary in visible {
        ui::card(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(&summary.name).size(17.0).strong());
                ui::paused_badge(ui, summary.paused);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui::primary_button(ui, "Open").clicked() {
                        action = Some(ViewAction::OpenMultisig(summary.controller));
                    }
                    ui.label(
                        egui::RichText::new(format!(
                            "{} {}",
                            format_eth(summary.balance, 4),
                            chain.currency_symbol
                        ))
                        .size(16.0)
                        .color(ui::ACCENT),
                    );
                });
            });
            ui.horizontal(|ui| {
                ui::caption(ui, "Controller");
                ui::address_link(ui, chain, &summary.controller, true);
                ui.add_space(12.0);
                ui::caption(ui, "Wallet");
                ui::address_link(ui, chain, &summary.wallet, true);
            });
            ui.label(
                egui::RichText::new(format!(
                    "{} owners · {} transactions · {} pending",
                    summary.owners.len(),
                    summary.transactions.len(),
                    pending_count(&summary.transactions)
                ))
                .weak()
                .small(),
            );
        });
        ui.add_space(6.0);
    }

    action
}

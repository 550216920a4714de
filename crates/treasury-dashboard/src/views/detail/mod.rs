//! Multisig detail page: header plus the Overview / Owners / Settings /
//! Transactions tabs

use eframe::egui;

use treasury_core::format::format_eth;
use treasury_core::ChainParams;

use super::{DetailAction, ViewAction};
use crate::state::{DetailState, DetailTab, Page};
use crate::ui;

mod overview;
mod owners;
mod settings;
mod transactions;

/// Inputs shared by every tab.
pub struct DetailContext<'a> {
    pub chain: &'a ChainParams,
    pub now_secs: u64,
    pub connected: bool,
}

pub fn render(
    ui: &mut egui::Ui,
    detail: &mut DetailState,
    cx: &DetailContext<'_>,
) -> Option<ViewAction> {
    let mut action = None;

    if ui.button("⬅ Back to Multisigs").clicked() {
        return Some(ViewAction::Navigate(Page::MyMultisigs));
    }
    ui.add_space(6.0);

    if detail.loading && detail.multisig.is_none() {
        ui.add_space(40.0);
        ui.vertical_centered(|ui| ui::loading_spinner(ui, "Loading multisig data..."));
        return None;
    }

    let Some(multisig) = detail.multisig.clone() else {
        ui::card_highlighted(ui, |ui| {
            ui.label(egui::RichText::new("Error loading multisig").strong().color(ui::ERROR_RED));
            if let Some(err) = &detail.error {
                ui::error_message(ui, err);
            }
            if ui::secondary_button(ui, "Retry").clicked() {
                action = Some(DetailAction::Reload.into());
            }
        });
        return action;
    };

    // Header
    ui.horizontal(|ui| {
        ui.vertical(|ui| {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(&multisig.name).size(28.0).strong());
                ui::paused_badge(ui, multisig.config.paused);
                if detail.loading {
                    ui.spinner();
                }
            });
            ui.add_space(6.0);
            ui::caption(ui, "Controller Contract");
            ui::address_link(ui, cx.chain, &multisig.controller, false);
            ui::caption(ui, "Treasury Wallet (send funds here)");
            ui::address_link(ui, cx.chain, &multisig.wallet, false);
        });
        ui.with_layout(egui::Layout::right_to_left(egui::Align::TOP), |ui| {
            ui::card(ui, |ui| {
                ui.label(egui::RichText::new("Total Treasury Balance").weak());
                ui.label(
                    egui::RichText::new(format!(
                        "{} {}",
                        format_eth(multisig.balance, 4),
                        cx.chain.currency_symbol
                    ))
                    .size(26.0)
                    .strong()
                    .color(ui::ACCENT),
                );
            });
        });
    });
    ui.separator();

    ui::notice(ui, &detail.notice);

    ui.horizontal(|ui| {
        for tab in DetailTab::ALL {
            ui.selectable_value(&mut detail.tab, tab, tab.label());
        }
    });
    ui.add_space(8.0);

    let tab_action = match detail.tab {
        DetailTab::Overview => overview::render(ui, detail, &multisig, cx),
        DetailTab::Owners => owners::render(ui, detail, &multisig, cx),
        DetailTab::Settings => settings::render(ui, detail, &multisig, cx),
        DetailTab::Transactions => transactions::render(ui, detail, &multisig, cx),
    };
    tab_action.map(ViewAction::from).or(action)
}

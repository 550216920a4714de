//! Landing page: configuration check, hero and deployment totals

use eframe::egui;

use treasury_core::format::format_eth;
use treasury_core::{ChainParams, NetworkStatus};

use super::ViewAction;
use crate::state::{DashboardState, Page};
use crate::ui;

const FEATURES: [(&str, &str, &str); 3] = [
    (
        "🔒",
        "Weighted Voting",
        "Assign different percentages of ownership to stakeholders (e.g. CEO 40%, CTO 30%, \
         Investors 30%) rather than one person, one vote.",
    ),
    (
        "⚡",
        "Batch Execution",
        "Approve several pending transfers or configuration changes from a single screen.",
    ),
    (
        "👛",
        "Wallet Abstraction",
        "Logic and funds are separated. The Controller contract manages governance while a \
         separate Company Wallet holds the funds.",
    ),
];

pub fn render(
    ui: &mut egui::Ui,
    state: &DashboardState,
    status: &NetworkStatus,
    chain: &ChainParams,
    factory_configured: bool,
) -> Option<ViewAction> {
    let mut action = None;

    if !factory_configured {
        ui::card_highlighted(ui, |ui| {
            ui::warning_message(ui, "Factory Address Not Configured", ui::WARNING_ORANGE);
            ui.label(
                egui::RichText::new(
                    "Set TREASURY_FACTORY_ADDRESS to a deployed Factory contract to list treasuries.",
                )
                .weak(),
            );
        });
        ui.add_space(10.0);
    }

    if let Some(chain_id) = status.chain_id() {
        let (color, label) = if chain_id == chain.chain_id {
            (ui::SUCCESS_GREEN, format!("Chain ID: {chain_id} ({})", chain.chain_name))
        } else {
            (ui::ERROR_RED, format!("Chain ID: {chain_id} (wrong network)"))
        };
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new("●").color(color));
            ui.label(egui::RichText::new(label).small().weak());
        });
    }

    // Hero
    ui.add_space(20.0);
    ui.vertical_centered(|ui| {
        ui.label(egui::RichText::new("Secure Company Treasury").size(34.0).strong());
        ui.add_space(8.0);
        ui.label(
            egui::RichText::new(
                "Deploy percentage-based multisig wallets with weighted governance, \
                 timelocks and role-based ownership.",
            )
            .size(16.0)
            .weak(),
        );
        ui.add_space(16.0);
        ui.horizontal(|ui| {
            // centre the two buttons
            let width = 130.0 + 130.0 + ui.spacing().item_spacing.x;
            ui.add_space(((ui.available_width() - width) / 2.0).max(0.0));
            if ui::primary_button_enabled(ui, "Create Treasury", factory_configured).clicked() {
                action = Some(ViewAction::Navigate(Page::CreateMultisig));
            }
            if status.is_connected() {
                if ui::secondary_button(ui, "My Wallets").clicked() {
                    action = Some(ViewAction::Navigate(Page::MyMultisigs));
                }
            } else if ui::secondary_button(ui, "Connect Wallet").clicked() {
                action = Some(ViewAction::Connect);
            }
        });
    });
    ui.add_space(30.0);

    // Stats
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new("Overview").strong().size(14.0));
        if state.loading {
            ui.spinner();
        } else if ui
            .small_button("⟳")
            .on_hover_text("Reload deployments")
            .clicked()
        {
            action = Some(ViewAction::RefreshDashboard);
        }
    });
    ui.separator();
    let stats = state.data.as_ref().map(|d| &d.stats);
    let show = |value: String| if state.loading || stats.is_none() { "-".to_owned() } else { value };
    ui.horizontal_wrapped(|ui| {
        ui::stat_card(
            ui,
            "🔒 Total Treasuries",
            &show(stats.map(|s| s.total_treasuries.to_string()).unwrap_or_default()),
            "Deployed contracts",
        );
        ui::stat_card(
            ui,
            "⚡ Total Transactions",
            &show(stats.map(|s| s.total_transactions.to_string()).unwrap_or_default()),
            "Processed proposals",
        );
        ui::stat_card(
            ui,
            "👥 Total Owners",
            &show(stats.map(|s| s.total_owners.to_string()).unwrap_or_default()),
            "Active signers",
        );
        ui::stat_card(
            ui,
            "📊 Total Value Locked",
            &show(
                stats
                    .map(|s| format!("{} {}", format_eth(s.total_value_locked, 2), chain.currency_symbol))
                    .unwrap_or_default(),
            ),
            "Secured in wallets",
        );
    });

    // Features
    ui.add_space(30.0);
    ui.columns(FEATURES.len(), |columns| {
        for (col, (icon, title, body)) in columns.iter_mut().zip(FEATURES) {
            col.label(egui::RichText::new(icon).size(22.0).color(ui::ACCENT));
            col.label(egui::RichText::new(title).size(17.0).strong());
            col.label(egui::RichText::new(body).weak());
        }
    });

    action
}

//! Application settings: appearance and the active network configuration

use eframe::egui;

use treasury_adapters::DashboardConfig;
use treasury_core::NetworkStatus;

use super::ViewAction;
use crate::state::Preferences;
use crate::ui;

pub fn render(
    ui: &mut egui::Ui,
    prefs: &mut Preferences,
    config: &DashboardConfig,
    status: &NetworkStatus,
    provider_mode: &str,
) -> Option<ViewAction> {
    let mut action = None;

    ui::styled_heading(ui, "Settings");
    ui.add_space(10.0);

    ui::section_header(ui, "Appearance");
    ui.horizontal(|ui| {
        ui.label("Theme:");
        ui.selectable_value(&mut prefs.dark_mode, true, "🌙 Dark");
        ui.selectable_value(&mut prefs.dark_mode, false, "☀ Light");
    });

    ui::section_header(ui, "Network");
    egui::Grid::new("network_settings_grid")
        .num_columns(2)
        .spacing([12.0, 6.0])
        .show(ui, |ui| {
            ui.label("Required network:");
            ui.label(format!("{} ({})", config.chain.chain_name, config.chain.chain_id));
            ui.end_row();

            ui.label("RPC URL:");
            ui.label(egui::RichText::new(config.chain.rpc_urls.join(", ")).monospace());
            ui.end_row();

            ui.label("Explorer:");
            ui.label(egui::RichText::new(config.chain.explorer_urls.join(", ")).monospace());
            ui.end_row();

            ui.label("Factory:");
            match &config.factory_address {
                Some(factory) => ui::address_link(ui, &config.chain, factory, false),
                None => {
                    ui.label(egui::RichText::new("not configured").color(ui::WARNING_ORANGE));
                }
            }
            ui.end_row();

            ui.label("Wallet provider:");
            ui.label(provider_mode);
            ui.end_row();

            ui.label("Transaction scan limit:");
            ui.label(config.tx_probe_limit.to_string());
            ui.end_row();

            ui.label("Receipt poll interval:");
            ui.label(format!("{} ms", config.receipt_poll_interval_ms));
            ui.end_row();
        });

    ui.add_space(10.0);
    ui.horizontal(|ui| match status {
        NetworkStatus::WrongChain { chain_id, .. } => {
            ui::warning_message(
                ui,
                &format!("Wallet is on chain {chain_id}"),
                ui::ERROR_RED,
            );
            if ui::primary_button(ui, &format!("Switch to {}", config.chain.chain_name)).clicked() {
                action = Some(ViewAction::SwitchNetwork);
            }
        }
        NetworkStatus::Connected { .. } => {
            ui::success_message(ui, &format!("Connected to {}", config.chain.chain_name));
        }
        NetworkStatus::Disconnected => {
            if ui::primary_button(ui, "Connect Wallet").clicked() {
                action = Some(ViewAction::Connect);
            }
        }
        NetworkStatus::ProviderMissing => {
            ui::warning_message(ui, "No wallet provider available", ui::WARNING_ORANGE);
        }
        NetworkStatus::Unknown => {
            ui::loading_spinner(ui, "Checking wallet...");
        }
    });
    ui.label(
        egui::RichText::new(
            "Network values come from the TREASURY_* environment variables at startup.",
        )
        .weak()
        .small(),
    );

    action
}

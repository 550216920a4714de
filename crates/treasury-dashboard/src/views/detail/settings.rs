use eframe::egui;

use treasury_core::format::{format_duration, format_eth, parse_address};
use treasury_core::MultiSig;

use super::DetailContext;
use crate::state::{DetailState, ProposalKind};
use crate::ui;
use crate::views::DetailAction;

pub fn render(
    ui: &mut egui::Ui,
    detail: &mut DetailState,
    multisig: &MultiSig,
    cx: &DetailContext<'_>,
) -> Option<DetailAction> {
    let mut action = None;
    let config = &multisig.config;

    // Adding owners lives on the Owners tab
    if detail.proposal.kind == ProposalKind::AddOwner {
        detail.proposal.kind = ProposalKind::ChangeRequiredPercentage;
    }

    ui::section_header(ui, "Governance");
    egui::Grid::new("governance_config_grid")
        .num_columns(3)
        .spacing([16.0, 8.0])
        .striped(true)
        .show(ui, |ui| {
            let rows = [
                ("Name", config.name.clone(), ProposalKind::ChangeName),
                (
                    "Required Approval",
                    format!("{}%", config.required_percentage),
                    ProposalKind::ChangeRequiredPercentage,
                ),
                (
                    "Timelock Period",
                    format_duration(config.timelock_period),
                    ProposalKind::ChangeTimelock,
                ),
                (
                    "Expiry Period",
                    format_duration(config.expiry_period),
                    ProposalKind::ChangeExpiry,
                ),
                (
                    "Minimum Owners",
                    config.min_owners.to_string(),
                    ProposalKind::ChangeMinOwners,
                ),
            ];
            for (title, value, kind) in rows {
                ui.label(title);
                ui.label(egui::RichText::new(value).strong());
                if ui.small_button("Change").clicked() {
                    detail.proposal.kind = kind;
                    detail.proposal.value.clear();
                }
                ui.end_row();
            }
        });

    ui::section_header(ui, "Propose Change");
    ui.label(
        egui::RichText::new("Changes are submitted as proposals and need the required approval.")
            .weak(),
    );
    ui.add_space(4.0);
    ui.horizontal(|ui| {
        egui::ComboBox::from_id_salt("proposal_kind")
            .selected_text(detail.proposal.kind.label())
            .show_ui(ui, |ui| {
                for kind in ProposalKind::ALL
                    .into_iter()
                    .filter(|kind| *kind != ProposalKind::AddOwner)
                {
                    ui.selectable_value(&mut detail.proposal.kind, kind, kind.label());
                }
            });
        ui.add(
            egui::TextEdit::singleline(&mut detail.proposal.value)
                .hint_text(detail.proposal.kind.value_hint())
                .desired_width(220.0),
        );
        let label = if detail.proposal_pending { "Proposing..." } else { "Propose" };
        if ui::primary_button_enabled(ui, label, cx.connected && !detail.busy()).clicked() {
            match detail.proposal.build() {
                Ok(proposal) => action = Some(DetailAction::Propose(proposal)),
                Err(e) => detail.notice.set_error(e.to_string()),
            }
        }
    });

    ui::section_header(ui, "Token Balance");
    ui.horizontal(|ui| {
        ui.label("Token:");
        ui::address_input(ui, &mut detail.token_lookup.token);
        let token = parse_address(&detail.token_lookup.token, "token").ok();
        let enabled = token.is_some() && !detail.token_lookup.loading;
        if ui::secondary_button_enabled(ui, "Check", enabled).clicked() {
            if let Some(token) = token {
                action = Some(DetailAction::TokenBalance(token));
            }
        }
        if detail.token_lookup.loading {
            ui.spinner();
        }
    });
    match &detail.token_lookup.result {
        Some(Ok(balance)) => {
            ui.label(
                egui::RichText::new(format!("Wallet holds {} tokens", format_eth(*balance, 4)))
                    .color(ui::ACCENT),
            )
            .on_hover_text(format!("{balance} base units, assuming 18 decimals"));
        }
        Some(Err(e)) => ui::error_message(ui, e),
        None => {}
    }

    ui.add_space(16.0);
    ui::card_highlighted(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.label(egui::RichText::new("Danger Zone").strong().color(ui::ERROR_RED));
        ui.add_space(4.0);
        let (title, text, button) = if config.paused {
            (
                "Unpause Treasury",
                "Resume normal operations. Transactions can be executed again.",
                "Unpause",
            )
        } else {
            (
                "Pause Treasury",
                "Temporarily halt all outgoing transactions from the treasury wallet.",
                "Pause",
            )
        };
        ui.label(egui::RichText::new(title).strong());
        ui.label(egui::RichText::new(text).weak());
        ui.add_space(4.0);
        let label = if detail.pause_pending { "Processing..." } else { button };
        if ui::danger_button_enabled(ui, label, cx.connected && !detail.busy()).clicked() {
            action = Some(DetailAction::SetPaused(!config.paused));
        }
    });

    action
}

use eframe::egui;
use egui_extras::{Column, TableBuilder};

use treasury_core::governance::total_equity;
use treasury_core::{MultiSig, Owner};

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

    ui::section_header(ui, &format!("Owners ({})", multisig.owners.len()));
    let equity = total_equity(&multisig.owners);
    ui.label(
        egui::RichText::new(format!("Total equity: {equity}%"))
            .color(if equity == 100 { ui::SUCCESS_GREEN } else { ui::WARNING_ORANGE }),
    );
    ui.add_space(6.0);

    if multisig.owners.is_empty() {
        ui.label(egui::RichText::new("This treasury has no owners.").weak());
    } else {
        TableBuilder::new(ui)
            .striped(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .column(Column::auto().at_least(120.0))
            .column(Column::remainder().at_least(320.0))
            .column(Column::auto().at_least(90.0))
            .column(Column::auto().at_least(90.0))
            .header(22.0, |mut header| {
                for title in ["Name", "Address", "Voting Power", ""] {
                    header.col(|ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|mut body| {
                for (idx, owner) in multisig.owners.iter().enumerate() {
                    body.row(26.0, |mut row| {
                        row.col(|ui| {
                            ui.label(Owner::display_name(&owner.name, idx));
                        });
                        row.col(|ui| {
                            ui::address_link(ui, cx.chain, &owner.address, false);
                        });
                        row.col(|ui| {
                            ui.label(
                                egui::RichText::new(format!("{}%", owner.percentage))
                                    .strong()
                                    .color(ui::ACCENT),
                            );
                        });
                        row.col(|ui| {
                            if !owner.removable {
                                ui::badge(ui, "Immutable", ui::WARNING_ORANGE);
                            }
                        });
                    });
                }
            });
    }

    ui::section_header(ui, "Propose New Owner");
    ui.label(
        egui::RichText::new(
            "Adding an owner is a governance proposal. It takes effect once the required share of owners confirms and executes it.",
        )
        .weak(),
    );
    ui.add_space(4.0);

    let form = &mut detail.proposal;
    egui::Grid::new("add_owner_grid")
        .num_columns(2)
        .spacing([12.0, 6.0])
        .show(ui, |ui| {
            ui.label("Address:");
            ui::address_input(ui, &mut form.owner);
            ui.end_row();

            ui.label("Name:");
            ui.add(
                egui::TextEdit::singleline(&mut form.owner_name)
                    .hint_text("Optional")
                    .desired_width(200.0),
            );
            ui.end_row();

            ui.label("Voting power (%):");
            ui::number_input(ui, &mut form.percentage, "10");
            ui.end_row();

            ui.label("");
            ui.checkbox(&mut form.removable, "Removable by later proposals");
            ui.end_row();
        });

    ui.add_space(6.0);
    let enabled = cx.connected && !detail.busy();
    let label = if detail.proposal_pending { "Proposing..." } else { "Propose Owner" };
    if ui::primary_button_enabled(ui, label, enabled).clicked() {
        detail.proposal.kind = ProposalKind::AddOwner;
        match detail.proposal.build() {
            Ok(proposal) => action = Some(DetailAction::Propose(proposal)),
            Err(e) => detail.notice.set_error(e.to_string()),
        }
    }

    action
}

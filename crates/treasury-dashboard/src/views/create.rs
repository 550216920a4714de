//! Create-treasury form backed by `Factory.createMultiSig`

use eframe::egui;

use super::ViewAction;
use crate::state::CreateForm;
use crate::ui;

pub fn render(
    ui: &mut egui::Ui,
    form: &mut CreateForm,
    factory_configured: bool,
    connected: bool,
) -> Option<ViewAction> {
    let mut action = None;

    ui::styled_heading(ui, "Create Treasury");
    ui.label("Deploy a Controller and Company Wallet pair through the Factory.");
    ui.add_space(10.0);

    if !factory_configured {
        ui::warning_message(ui, "Factory Address Not Configured", ui::WARNING_ORANGE);
        return None;
    }

    ui::section_header(ui, "Treasury");
    egui::Grid::new("create_treasury_grid")
        .num_columns(2)
        .spacing([12.0, 8.0])
        .show(ui, |ui| {
            ui.label("Name:");
            ui.add(
                egui::TextEdit::singleline(&mut form.name)
                    .hint_text("Acme Operating Treasury")
                    .desired_width(320.0),
            );
            ui.end_row();

            ui.label("Required approval (%):");
            ui::number_input(ui, &mut form.required_percentage, "51");
            ui.end_row();

            ui.label("Timelock (hours):");
            ui::number_input(ui, &mut form.timelock_hours, "24");
            ui.end_row();

            ui.label("Expiry (hours):");
            ui::number_input(ui, &mut form.expiry_hours, "168");
            ui.end_row();

            ui.label("Minimum owners:");
            ui::number_input(ui, &mut form.min_owners, "1");
            ui.end_row();
        });

    ui::section_header(ui, "Owners");
    let mut remove = None;
    let can_remove = form.owners.len() > 1;
    for (idx, row) in form.owners.iter_mut().enumerate() {
        ui.horizontal(|ui| {
            ui.label(format!("{}.", idx + 1));
            ui::address_input(ui, &mut row.address);
            ui.add(
                egui::TextEdit::singleline(&mut row.name)
                    .hint_text(format!("Owner {}", idx + 1))
                    .desired_width(140.0),
            );
            ui.add(
                egui::TextEdit::singleline(&mut row.percentage)
                    .hint_text("%")
                    .desired_width(50.0)
                    .font(egui::TextStyle::Monospace),
            );
            ui.checkbox(&mut row.removable, "Removable");
            if ui
                .add_enabled(can_remove, egui::Button::new("🗑"))
                .on_hover_text("Remove owner")
                .clicked()
            {
                remove = Some(idx);
            }
        });
    }
    if let Some(idx) = remove {
        form.owners.remove(idx);
    }

    ui.horizontal(|ui| {
        if ui.button("➕ Add owner").clicked() {
            form.add_owner();
        }
        let total = form.total_percentage();
        let text = format!("Total equity: {total}%");
        if total == 100 {
            ui.label(egui::RichText::new(text).color(ui::SUCCESS_GREEN));
        } else {
            ui.label(egui::RichText::new(text).color(ui::WARNING_ORANGE))
                .on_hover_text("The Factory decides whether this split is accepted");
        }
    });

    ui.add_space(15.0);
    ui::notice(ui, &form.notice);
    ui.horizontal(|ui| {
        let label = if form.submitting { "Deploying..." } else { "Create Treasury" };
        if ui::primary_button_enabled(ui, label, connected && !form.submitting).clicked() {
            match form.build() {
                Ok(params) => action = Some(ViewAction::Create(params)),
                Err(e) => form.notice.set_error(e.to_string()),
            }
        }
        if form.submitting {
            ui.spinner();
        }
        if !connected {
            ui.label(egui::RichText::new("Connect a wallet to deploy.").weak());
        }
    });
    if let Some(controller) = form.deployed {
        ui.add_space(6.0);
        if ui::secondary_button(ui, "Open new treasury").clicked() {
            action = Some(ViewAction::OpenMultisig(controller));
        }
    }

    action
}

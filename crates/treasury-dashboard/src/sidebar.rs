//! Sidebar navigation with build information footer

use eframe::egui;

use crate::state::{Page, Preferences};

const NAV_ITEMS: [(&str, &str, Page); 4] = [
    ("🏠", "Dashboard", Page::Dashboard),
    ("➕", "Create Multisig", Page::CreateMultisig),
    ("🔒", "My Multisigs", Page::MyMultisigs),
    ("⚙", "Settings", Page::Settings),
];

/// Render the sidebar panel. Returns the page the user navigated to, if any.
pub fn render(ctx: &egui::Context, prefs: &mut Preferences, current: Page) -> Option<Page> {
    let mut navigate = None;
    let active = current.nav_target();

    egui::SidePanel::left("nav_panel")
        .resizable(false)
        .exact_width(210.0)
        .show_animated(ctx, !prefs.sidebar_collapsed, |ui| {
            ui.add_space(10.0);
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("Navigation").size(16.0).strong());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("◀").on_hover_text("Collapse sidebar").clicked() {
                        prefs.sidebar_collapsed = true;
                    }
                });
            });
            ui.separator();
            ui.add_space(5.0);

            for (icon, label, page) in NAV_ITEMS {
                let selected = active == page;
                let response = ui.add_sized(
                    [ui.available_width(), 32.0],
                    egui::SelectableLabel::new(
                        selected,
                        egui::RichText::new(format!("{icon}  {label}")).size(14.0),
                    ),
                );
                if response.clicked() && current != page {
                    navigate = Some(page);
                }
                ui.add_space(2.0);
            }

            ui.with_layout(egui::Layout::bottom_up(egui::Align::LEFT), |ui| {
                ui.add_space(10.0);
                ui.label(
                    egui::RichText::new(format!("Built {}", env!("BUILD_TIME")))
                        .weak()
                        .small(),
                );
                ui.label(
                    egui::RichText::new(format!(
                        "Treasury Dashboard v{} ({})",
                        env!("CARGO_PKG_VERSION"),
                        env!("GIT_HASH")
                    ))
                    .weak()
                    .small(),
                );
                ui.separator();
            });
        });

    // Show expand button when collapsed
    if prefs.sidebar_collapsed {
        egui::SidePanel::left("collapsed_sidebar")
            .resizable(false)
            .exact_width(30.0)
            .show(ctx, |ui| {
                ui.add_space(10.0);
                if ui.button("▶").on_hover_text("Expand sidebar").clicked() {
                    prefs.sidebar_collapsed = false;
                }
            });
    }

    navigate
}

//! UI helper components

use alloy::primitives::Address;
use eframe::egui;

use treasury_core::format::short_address;
use treasury_core::{ApprovalStatus, ChainParams};

pub const ACCENT: egui::Color32 = egui::Color32::from_rgb(0, 212, 170);
pub const ERROR_RED: egui::Color32 = egui::Color32::from_rgb(220, 80, 80);
pub const SUCCESS_GREEN: egui::Color32 = egui::Color32::from_rgb(80, 200, 120);
pub const WARNING_ORANGE: egui::Color32 = egui::Color32::from_rgb(230, 150, 60);
pub const READY_AMBER: egui::Color32 = egui::Color32::from_rgb(220, 180, 50);

/// Block explorer URL for an address on the configured chain
pub fn explorer_address_url(chain: &ChainParams, address: &Address) -> Option<String> {
    chain
        .explorer_base()
        .map(|base| format!("{}/address/{}", base, address))
}

/// Open URL in a new browser tab
#[cfg(target_arch = "wasm32")]
pub fn open_url_new_tab(url: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.open_with_url_and_target(url, "_blank");
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn open_url_new_tab(url: &str) {
    if let Err(e) = open::that(url) {
        tracing::warn!(url, error = %e, "failed to open browser");
    }
}

/// Address as an explorer link with a copy button. `short` trims it to
/// `0x1234…abcd` where space is limited.
pub fn address_link(ui: &mut egui::Ui, chain: &ChainParams, address: &Address, short: bool) {
    ui.horizontal(|ui| {
        let text = if short {
            short_address(address, 4)
        } else {
            address.to_string()
        };
        let response = ui
            .link(egui::RichText::new(text).monospace())
            .on_hover_text(address.to_string());
        if response.clicked() {
            if let Some(url) = explorer_address_url(chain, address) {
                open_url_new_tab(&url);
            }
        }
        copy_button(ui, &address.to_string());
    });
}

/// Styled heading with accent color
pub fn styled_heading(ui: &mut egui::Ui, text: &str) {
    ui.heading(egui::RichText::new(text).color(ACCENT));
}

/// Section header with separator
pub fn section_header(ui: &mut egui::Ui, text: &str) {
    ui.add_space(10.0);
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new(text).strong().size(14.0));
    });
    ui.separator();
}

/// Small caption above a value
pub fn caption(ui: &mut egui::Ui, text: &str) {
    ui.label(egui::RichText::new(text).weak().small());
}

pub fn copy_button(ui: &mut egui::Ui, value: &str) {
    if ui
        .small_button("📋")
        .on_hover_text("Copy to clipboard")
        .clicked()
    {
        copy_to_clipboard(value);
    }
}

/// Copy to clipboard (platform-specific)
#[cfg(not(target_arch = "wasm32"))]
pub fn copy_to_clipboard(text: &str) {
    if let Ok(mut clipboard) = arboard::Clipboard::new() {
        let _ = clipboard.set_text(text);
    }
}

#[cfg(target_arch = "wasm32")]
pub fn copy_to_clipboard(text: &str) {
    if let Some(window) = web_sys::window() {
        let navigator = window.navigator();
        let clipboard = navigator.clipboard();
        let _ = clipboard.write_text(text);
    }
}

/// Create a styled text edit for address input
pub fn address_input(ui: &mut egui::Ui, value: &mut String) -> egui::Response {
    ui.add(
        egui::TextEdit::singleline(value)
            .hint_text("0x...")
            .desired_width(400.0)
            .font(egui::TextStyle::Monospace),
    )
}

/// Create a styled text edit for number input
pub fn number_input(ui: &mut egui::Ui, value: &mut String, hint: &str) -> egui::Response {
    ui.add(
        egui::TextEdit::singleline(value)
            .hint_text(hint)
            .desired_width(150.0)
            .font(egui::TextStyle::Monospace),
    )
}

/// Create a styled multiline text edit with fixed height and internal scrolling
pub fn multiline_input(
    ui: &mut egui::Ui,
    value: &mut String,
    hint: &str,
    rows: usize,
) -> egui::Response {
    let row_height = ui.text_style_height(&egui::TextStyle::Monospace);
    let height = row_height * rows as f32 + ui.spacing().item_spacing.y * 5.0;

    egui::ScrollArea::vertical()
        .id_salt(hint)
        .max_height(height)
        .show(ui, |ui| {
            ui.add(
                egui::TextEdit::multiline(value)
                    .hint_text(hint)
                    .desired_rows(rows)
                    .desired_width(f32::INFINITY)
                    .font(egui::TextStyle::Monospace),
            )
        })
        .inner
}

pub fn loading_spinner(ui: &mut egui::Ui, text: &str) {
    ui.horizontal(|ui| {
        ui.spinner();
        ui.label(text);
    });
}

pub fn error_message(ui: &mut egui::Ui, message: &str) {
    ui.horizontal_wrapped(|ui| {
        ui.label(egui::RichText::new("❌").size(16.0));
        ui.label(egui::RichText::new(message).color(ERROR_RED));
    });
}

pub fn success_message(ui: &mut egui::Ui, message: &str) {
    ui.horizontal_wrapped(|ui| {
        ui.label(egui::RichText::new("✅").size(16.0));
        ui.label(egui::RichText::new(message).color(SUCCESS_GREEN));
    });
}

/// Warning message display
pub fn warning_message(ui: &mut egui::Ui, message: &str, color: egui::Color32) {
    ui.horizontal_wrapped(|ui| {
        ui.label(egui::RichText::new("⚠️").size(14.0));
        ui.label(egui::RichText::new(message).color(color));
    });
}

/// Error and info lines of a notice, if any
pub fn notice(ui: &mut egui::Ui, notice: &crate::state::Notice) {
    if let Some(err) = &notice.last_error {
        error_message(ui, err);
    }
    if let Some(info) = &notice.last_info {
        success_message(ui, info);
    }
}

/// Pill-shaped label
pub fn badge(ui: &mut egui::Ui, text: &str, color: egui::Color32) {
    egui::Frame::none()
        .fill(color.linear_multiply(0.25))
        .rounding(10.0)
        .inner_margin(egui::Margin::symmetric(8.0, 2.0))
        .show(ui, |ui| {
            ui.label(egui::RichText::new(text).small().strong().color(color));
        });
}

pub fn status_badge(ui: &mut egui::Ui, status: ApprovalStatus) {
    let color = match status {
        ApprovalStatus::Executed => SUCCESS_GREEN,
        ApprovalStatus::ReadyToExecute => READY_AMBER,
        ApprovalStatus::Pending => egui::Color32::from_rgb(90, 150, 230),
    };
    badge(ui, status.label(), color);
}

pub fn paused_badge(ui: &mut egui::Ui, paused: bool) {
    if paused {
        badge(ui, "PAUSED", ERROR_RED);
    } else {
        badge(ui, "ACTIVE", SUCCESS_GREEN);
    }
}

// =============================================================================
// STYLED BUTTONS
// =============================================================================

const PRIMARY_FILL: egui::Color32 = egui::Color32::from_rgb(0, 180, 150);
const DANGER_FILL: egui::Color32 = egui::Color32::from_rgb(190, 60, 60);

fn action_button(text: &str, fill: Option<egui::Color32>, min_width: f32) -> egui::Button<'_> {
    let mut label = egui::RichText::new(text).size(14.0);
    if fill.is_some() {
        label = label.color(egui::Color32::WHITE);
    }
    let button = egui::Button::new(label).min_size(egui::vec2(min_width, 34.0));
    match fill {
        Some(fill) => button.fill(fill),
        None => button,
    }
}

pub fn primary_button(ui: &mut egui::Ui, text: &str) -> egui::Response {
    primary_button_enabled(ui, text, true)
}

/// Accent-filled call to action
pub fn primary_button_enabled(ui: &mut egui::Ui, text: &str, enabled: bool) -> egui::Response {
    ui.add_enabled(enabled, action_button(text, Some(PRIMARY_FILL), 130.0))
}

pub fn secondary_button(ui: &mut egui::Ui, text: &str) -> egui::Response {
    secondary_button_enabled(ui, text, true)
}

pub fn secondary_button_enabled(ui: &mut egui::Ui, text: &str, enabled: bool) -> egui::Response {
    ui.add_enabled(enabled, action_button(text, None, 90.0))
}

/// Red fill for pause and other destructive writes
pub fn danger_button_enabled(ui: &mut egui::Ui, text: &str, enabled: bool) -> egui::Response {
    ui.add_enabled(enabled, action_button(text, Some(DANGER_FILL), 90.0))
}

// =============================================================================
// VISUAL GROUPING
// =============================================================================

fn card_frame(fill: egui::Color32) -> egui::Frame {
    egui::Frame::none()
        .fill(fill)
        .rounding(6.0)
        .inner_margin(12.0)
}

pub fn card<R>(ui: &mut egui::Ui, add_contents: impl FnOnce(&mut egui::Ui) -> R) -> R {
    card_frame(ui.visuals().faint_bg_color).show(ui, add_contents).inner
}

/// Slightly brighter card for errors and the danger zone
pub fn card_highlighted<R>(ui: &mut egui::Ui, add_contents: impl FnOnce(&mut egui::Ui) -> R) -> R {
    card_frame(ui.visuals().faint_bg_color.linear_multiply(1.3))
        .show(ui, add_contents)
        .inner
}

/// Headline number with a caption, as on the dashboard stat row
pub fn stat_card(ui: &mut egui::Ui, title: &str, value: &str, caption_text: &str) {
    card(ui, |ui| {
        ui.set_min_width(170.0);
        ui.label(egui::RichText::new(title).weak());
        ui.label(egui::RichText::new(value).size(26.0).strong());
        caption(ui, caption_text);
    });
}

//! Dark color theme and global styling.
//!
//! Flat charcoal palette: `#2E2E2E` window background, `#1E1E1E` log area,
//! `#3E3E3E` buttons that lighten to `#5A5A5A` while pressed, `#4A4A4A`
//! borders and white text.

use eframe::egui::{self, Color32, CornerRadius, FontFamily, FontId, Stroke, TextStyle};
use std::collections::BTreeMap;

use crate::buffer::LineKind;

pub const BACKGROUND: Color32 = Color32::from_rgb(0x2E, 0x2E, 0x2E);
pub const LOG_BACKGROUND: Color32 = Color32::from_rgb(0x1E, 0x1E, 0x1E);
pub const BUTTON: Color32 = Color32::from_rgb(0x3E, 0x3E, 0x3E);
pub const BUTTON_HOVER: Color32 = Color32::from_rgb(0x4A, 0x4A, 0x4A);
pub const BUTTON_PRESSED: Color32 = Color32::from_rgb(0x5A, 0x5A, 0x5A);
pub const BORDER: Color32 = Color32::from_rgb(0x4A, 0x4A, 0x4A);

pub const TEXT: Color32 = Color32::WHITE;
pub const TEXT_MUTED: Color32 = Color32::from_rgb(148, 155, 164);
pub const SUCCESS: Color32 = Color32::from_rgb(67, 181, 129);
pub const ERROR: Color32 = Color32::from_rgb(240, 71, 71);

/// Text color for a log line.
pub fn line_color(kind: LineKind) -> Color32 {
    match kind {
        LineKind::Status => SUCCESS,
        LineKind::Message => TEXT,
        LineKind::Error => ERROR,
    }
}

fn configure_text_styles() -> BTreeMap<TextStyle, FontId> {
    use FontFamily::{Monospace, Proportional};

    [
        (TextStyle::Small, FontId::new(10.0, Proportional)),
        (TextStyle::Body, FontId::new(14.0, Proportional)),
        (TextStyle::Button, FontId::new(13.0, Proportional)),
        (TextStyle::Heading, FontId::new(16.0, Proportional)),
        (TextStyle::Monospace, FontId::new(12.0, Monospace)),
    ]
    .into()
}

/// Apply the dark theme to the egui context. Call once at startup.
pub fn apply_dark_theme(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();
    style.text_styles = configure_text_styles();

    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.window_margin = egui::Margin::same(12);
    style.spacing.button_padding = egui::vec2(10.0, 5.0);

    let mut visuals = egui::Visuals::dark();
    visuals.override_text_color = Some(TEXT);
    visuals.panel_fill = BACKGROUND;
    visuals.window_fill = BACKGROUND;
    visuals.extreme_bg_color = LOG_BACKGROUND;

    let border = Stroke::new(1.0, BORDER);
    let radius = CornerRadius::same(4);
    for (widget, fill) in [
        (&mut visuals.widgets.inactive, BUTTON),
        (&mut visuals.widgets.hovered, BUTTON_HOVER),
        (&mut visuals.widgets.active, BUTTON_PRESSED),
    ] {
        widget.bg_fill = fill;
        widget.weak_bg_fill = fill;
        widget.bg_stroke = border;
        widget.corner_radius = radius;
    }

    style.visuals = visuals;
    ctx.set_style(style);
}

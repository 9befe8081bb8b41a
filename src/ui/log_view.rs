use eframe::egui::{self, RichText, Stroke};

use super::theme;
use crate::buffer::LogBuffer;

/// Read-only scrolling log of status and message lines.
pub fn render_log(ui: &mut egui::Ui, log: &LogBuffer) {
    egui::Frame::new()
        .fill(theme::LOG_BACKGROUND)
        .stroke(Stroke::new(1.0, theme::BORDER))
        .inner_margin(egui::Margin::same(6))
        .show(ui, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false; 2])
                .stick_to_bottom(true)
                .show(ui, |ui| {
                    for line in log.iter() {
                        ui.horizontal_wrapped(|ui| {
                            ui.label(
                                RichText::new(&line.timestamp)
                                    .monospace()
                                    .color(theme::TEXT_MUTED),
                            );
                            ui.label(RichText::new(&line.text).color(theme::line_color(line.kind)));
                        });
                    }
                });
        });
}

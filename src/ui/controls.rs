//! Credential form and the Start/Stop toggle.

use eframe::egui;

use crate::config::ConfigForm;

/// Actions the control panel can request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    /// User clicked the Start/Stop button
    Toggle,
}

/// Render the token/channel inputs, remember-me checkbox and toggle button.
///
/// Inputs are locked while a worker is running, since the run uses a
/// snapshot taken at start.
pub fn render_controls(
    ui: &mut egui::Ui,
    form: &mut ConfigForm,
    running: bool,
    button_label: &str,
) -> Option<ControlAction> {
    let mut action = None;

    ui.add_space(4.0);
    ui.add_enabled_ui(!running, |ui| {
        ui.label("Bot Token:");
        ui.add(
            egui::TextEdit::singleline(&mut form.token)
                .password(true)
                .desired_width(f32::INFINITY),
        );

        ui.label("Channel ID:");
        let channel = ui.add(
            egui::TextEdit::singleline(&mut form.channel_id)
                .hint_text("123456789012345678")
                .desired_width(f32::INFINITY),
        );
        if channel.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            action = Some(ControlAction::Toggle);
        }

        ui.checkbox(&mut form.remember_me, "Remember Me");
    });

    let button = egui::Button::new(button_label).min_size(egui::vec2(ui.available_width(), 28.0));
    if ui.add(button).clicked() {
        action = Some(ControlAction::Toggle);
    }
    ui.add_space(4.0);

    action
}

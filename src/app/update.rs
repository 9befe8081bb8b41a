//! Main update loop

use eframe::egui;
use std::time::Duration;

use super::BotApp;
use crate::ui::{self, ControlAction};

impl eframe::App for BotApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Process worker events
        self.controller.poll();

        // Join the worker before the viewport goes away
        if ctx.input(|i| i.viewport().close_requested()) {
            self.controller.on_window_close();
        }

        // Keep polling while idle so worker events show up promptly
        ctx.request_repaint_after(Duration::from_millis(100));

        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            let action = ui::render_controls(
                ui,
                &mut self.form,
                self.controller.is_running(),
                self.controller.button_label(),
            );
            if action == Some(ControlAction::Toggle) {
                self.controller.toggle(&self.form);
            }
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui::render_log(ui, self.controller.log());
        });
    }
}

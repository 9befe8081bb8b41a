//! Core BotApp struct definition and initialization

use crate::config::ConfigForm;
use crate::controller::BotController;
use crate::ui;

pub struct BotApp {
    /// Owns the bot worker lifecycle and the log
    pub controller: BotController,

    /// Form inputs, pre-filled from saved settings
    pub form: ConfigForm,
}

impl BotApp {
    pub fn new(cc: &eframe::CreationContext<'_>, controller: BotController) -> Self {
        ui::theme::apply_dark_theme(&cc.egui_ctx);

        let form = controller.saved_form();
        Self { controller, form }
    }
}

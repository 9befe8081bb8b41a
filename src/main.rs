//! DiscordWR - watch one Discord channel from a small desktop window

use discord_wr::app::BotApp;
use discord_wr::client::NetworkClient;
use discord_wr::config::JsonSettingsStore;
use discord_wr::controller::BotController;
use discord_wr::gateway::DiscordGateway;
use eframe::egui;
use tracing_subscriber::EnvFilter;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = JsonSettingsStore::default_location();
    tracing::info!(path = %settings.path().display(), "using settings file");

    let controller = BotController::new(settings, || -> Box<dyn NetworkClient> {
        Box::new(DiscordGateway::new())
    });

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("DiscordWR")
            .with_inner_size([400.0, 300.0])
            .with_min_inner_size([400.0, 300.0]),
        ..Default::default()
    };

    eframe::run_native(
        "DiscordWR",
        options,
        Box::new(move |cc| Ok(Box::new(BotApp::new(cc, controller)))),
    )
}

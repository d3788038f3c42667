//! GUI entry point for fish-gauge.
//!
//! Run with: cargo run --bin fish-gauge-gui

use iced::Size;
use tracing_subscriber::EnvFilter;

use fish_gauge::gui::FishGaugeApp;

fn main() -> iced::Result {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    iced::application(FishGaugeApp::title, FishGaugeApp::update, FishGaugeApp::view)
        .theme(FishGaugeApp::theme)
        .window_size(Size::new(900.0, 760.0))
        .run_with(|| (FishGaugeApp::new(), iced::Task::none()))
}

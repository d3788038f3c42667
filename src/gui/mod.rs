//! GUI for fish-gauge.
//!
//! Provides a graphical user interface using Iced.

pub mod app;
pub mod logger;

pub use crate::settings::AppSettings;
pub use app::FishGaugeApp;
pub use logger::{LogEntry, LogLevel, Logger};

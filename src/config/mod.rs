//! Configuration data: species size limits and UI messages.

mod i18n;
mod species;

pub use i18n::{
    error_message, get_messages, summary_lines, verdict_label, Messages, MESSAGES_EN, MESSAGES_FR,
};
pub use species::{
    SizeClass, SpeciesTable, SpeciesTableError, DEFAULT_SIZE_LIMIT_CM, DEFAULT_SPECIES,
};

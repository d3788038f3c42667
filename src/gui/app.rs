//! Main Iced application for the fish-gauge GUI.

use iced::widget::{
    button, column, container, horizontal_rule, horizontal_space, pick_list, row, scrollable,
    text, text_input, vertical_space, Column,
};
use iced::{Element, Length, Task, Theme};
use std::path::{Path, PathBuf};

use crate::annotate::{default_output_path, Annotator};
use crate::config::{
    error_message, get_messages, summary_lines, verdict_label, Messages, SizeClass, SpeciesTable,
};
use crate::measure::{MeasurementSession, SessionConfig, SessionReport};
use crate::points::{parse_decimal, parse_points};
use crate::settings::AppSettings;

use super::logger::Logger;

/// Current view/tab of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Main,
    Species,
    Logs,
}

/// Language options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    French,
    English,
}

impl Language {
    fn as_code(&self) -> &'static str {
        match self {
            Language::French => "fr",
            Language::English => "en",
        }
    }

    fn from_code(code: &str) -> Self {
        match code {
            "en" => Language::English,
            _ => Language::French,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Language::French => write!(f, "Français"),
            Language::English => write!(f, "English"),
        }
    }
}

/// Entry of the species pick list. `label` is `None` for "no classification".
#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesOption {
    label: Option<String>,
    display: String,
}

impl std::fmt::Display for SpeciesOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display)
    }
}

/// Application state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppState {
    #[default]
    Idle,
    Annotating,
}

/// Messages for the Iced application.
#[derive(Debug, Clone)]
pub enum Message {
    // Navigation
    SwitchView(View),

    // Session parameters
    ImagePathChanged(String),
    LureLengthChanged(String),
    PerspectiveChanged(String),
    SpeciesSelected(SpeciesOption),
    LurePointsChanged(String),
    FishPointsChanged(String),
    FontPathChanged(String),
    LanguageSelected(Language),

    // Measurement
    Measure,
    Annotate,
    AnnotationSaved(Result<PathBuf, String>),

    // Species table
    SpeciesFileChanged(String),
    NewSpeciesLabelChanged(String),
    NewSpeciesLimitChanged(String),
    AddSpecies,
    RemoveSpecies(String),
    SaveSpecies,
    ReloadSpecies,

    // Settings actions
    SaveSettings,
    ResetSettings,
    SettingsSaved(Result<(), String>),

    // Logs
    ClearLogs,
}

/// Main application struct.
pub struct FishGaugeApp {
    view: View,
    settings: AppSettings,
    language: Language,
    species_table: SpeciesTable,

    // Numeric inputs as typed
    lure_length_input: String,
    perspective_input: String,
    new_species_label: String,
    new_species_limit: String,

    report: Option<SessionReport>,
    state: AppState,
    logger: Logger,

    status: String,
    status_is_error: bool,
}

impl Default for FishGaugeApp {
    fn default() -> Self {
        Self::new()
    }
}

impl FishGaugeApp {
    /// Create a new application instance.
    pub fn new() -> Self {
        let settings = AppSettings::load();
        let mut logger = Logger::new();
        logger.info("fish-gauge GUI started");

        let species_table = match settings.species_table() {
            Ok(table) => table,
            Err(e) => {
                logger.error(format!("Failed to load species table: {}", e));
                SpeciesTable::default()
            }
        };

        Self {
            view: View::Main,
            language: Language::from_code(&settings.lang),
            lure_length_input: settings.lure_length_cm.to_string(),
            perspective_input: settings.perspective_factor.to_string(),
            status: get_messages(&settings.lang).ready.to_string(),
            settings,
            species_table,
            new_species_label: String::new(),
            new_species_limit: String::new(),
            report: None,
            state: AppState::Idle,
            logger,
            status_is_error: false,
        }
    }

    /// Get the window title.
    pub fn title(&self) -> String {
        format!("fish-gauge - {}", self.messages().title)
    }

    /// Get the theme.
    pub fn theme(&self) -> Theme {
        Theme::Dark
    }

    fn messages(&self) -> &'static Messages {
        get_messages(self.language.as_code())
    }

    /// Update the application state based on messages.
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::SwitchView(view) => {
                self.view = view;
                Task::none()
            }

            // Session parameters
            Message::ImagePathChanged(value) => {
                self.settings.image_path = value;
                Task::none()
            }
            Message::LureLengthChanged(value) => {
                if let Ok(v) = parse_decimal(&value) {
                    self.settings.lure_length_cm = v;
                }
                self.lure_length_input = value;
                Task::none()
            }
            Message::PerspectiveChanged(value) => {
                if let Ok(v) = parse_decimal(&value) {
                    self.settings.perspective_factor = v;
                }
                self.perspective_input = value;
                Task::none()
            }
            Message::SpeciesSelected(option) => {
                self.settings.species = option.label.unwrap_or_default();
                Task::none()
            }
            Message::LurePointsChanged(value) => {
                self.settings.lure_points = value;
                Task::none()
            }
            Message::FishPointsChanged(value) => {
                self.settings.fish_points = value;
                Task::none()
            }
            Message::FontPathChanged(value) => {
                self.settings.font_path = value;
                Task::none()
            }
            Message::LanguageSelected(lang) => {
                self.language = lang;
                self.settings.lang = lang.as_code().to_string();
                Task::none()
            }

            // Measurement
            Message::Measure => {
                self.run_measurement();
                Task::none()
            }
            Message::Annotate => {
                let image_path = self.settings.image_path.trim().to_string();
                if image_path.is_empty() {
                    let msg = self.messages().choose_image_first;
                    self.set_error(msg);
                    return Task::none();
                }
                let Some(report) = self.run_measurement() else {
                    return Task::none();
                };

                self.state = AppState::Annotating;
                let input = PathBuf::from(image_path);
                let output = default_output_path(&input);
                self.logger.info(format!("Annotating {}", input.display()));

                let font = self.settings.font_path.trim().to_string();
                let lang = self.settings.lang.clone();
                Task::perform(
                    async move { render_annotation(input, output, report, font, lang).await },
                    Message::AnnotationSaved,
                )
            }
            Message::AnnotationSaved(result) => {
                self.state = AppState::Idle;
                match result {
                    Ok(path) => {
                        let msg = format!("{} : {}", self.messages().annotation_saved, path.display());
                        self.logger.success(msg.clone());
                        self.set_status(msg);
                    }
                    Err(e) => {
                        self.logger.error(format!("Annotation failed: {}", e));
                        self.set_error(format!("{} : {}", self.messages().error, e));
                    }
                }
                Task::none()
            }

            // Species table
            Message::SpeciesFileChanged(value) => {
                self.settings.species_file = value;
                Task::none()
            }
            Message::NewSpeciesLabelChanged(value) => {
                self.new_species_label = value;
                Task::none()
            }
            Message::NewSpeciesLimitChanged(value) => {
                self.new_species_limit = value;
                Task::none()
            }
            Message::AddSpecies => {
                let limit = match parse_decimal(&self.new_species_limit) {
                    Ok(limit) => limit,
                    Err(e) => {
                        self.set_error(e.to_string());
                        return Task::none();
                    }
                };
                let class = SizeClass::new(self.new_species_label.clone(), limit);
                let label = class.display_label(self.language.as_code());
                match self.species_table.insert(class) {
                    Ok(()) => {
                        self.logger.info(format!("Species added: {}", label));
                        self.new_species_label.clear();
                        self.new_species_limit.clear();
                        self.set_status(label);
                    }
                    Err(e) => self.set_error(e.to_string()),
                }
                Task::none()
            }
            Message::RemoveSpecies(label) => {
                if self.species_table.remove(&label).is_some() {
                    self.logger.info(format!("Species removed: {}", label));
                    if self.settings.species == label {
                        self.settings.species.clear();
                    }
                }
                Task::none()
            }
            Message::SaveSpecies => {
                if self.settings.species_file.trim().is_empty() {
                    match AppSettings::config_dir() {
                        Some(dir) => {
                            self.settings.species_file =
                                dir.join("species.json").display().to_string();
                        }
                        None => {
                            self.set_error("Cannot determine config directory");
                            return Task::none();
                        }
                    }
                }
                let path = PathBuf::from(self.settings.species_file.trim());
                match self.species_table.save(&path) {
                    Ok(()) => {
                        self.logger
                            .success(format!("Species table saved to {}", path.display()));
                        self.set_status(format!("{} : {}", self.messages().save, path.display()));
                    }
                    Err(e) => {
                        self.logger.error(format!("Failed to save species table: {}", e));
                        self.set_error(e.to_string());
                    }
                }
                Task::none()
            }
            Message::ReloadSpecies => {
                match self.settings.species_table() {
                    Ok(table) => {
                        self.logger
                            .info(format!("Species table loaded ({} entries)", table.len()));
                        self.species_table = table;
                    }
                    Err(e) => {
                        self.logger.error(format!("Failed to load species table: {}", e));
                        self.set_error(e.to_string());
                    }
                }
                Task::none()
            }

            // Settings actions
            Message::SaveSettings => {
                let settings = self.settings.clone();
                Task::perform(async move { settings.save() }, Message::SettingsSaved)
            }
            Message::ResetSettings => {
                self.settings = AppSettings::default();
                self.language = Language::from_code(&self.settings.lang);
                self.lure_length_input = self.settings.lure_length_cm.to_string();
                self.perspective_input = self.settings.perspective_factor.to_string();
                self.species_table = SpeciesTable::default();
                self.report = None;
                let msg = self.messages().settings_reset;
                self.logger.info(msg);
                self.set_status(msg);
                Task::none()
            }
            Message::SettingsSaved(result) => {
                match result {
                    Ok(()) => {
                        let msg = self.messages().settings_saved;
                        self.logger.success(msg);
                        self.set_status(msg);
                    }
                    Err(e) => {
                        self.logger.error(format!("Failed to save settings: {}", e));
                        self.set_error(e);
                    }
                }
                Task::none()
            }

            // Logs
            Message::ClearLogs => {
                self.logger.clear();
                Task::none()
            }
        }
    }

    /// Parse the form and run one session. The outcome lands in the status line.
    fn run_measurement(&mut self) -> Option<SessionReport> {
        let lang = self.language.as_code();
        let messages = self.messages();

        let Ok(lure_length) = parse_decimal(&self.lure_length_input) else {
            self.set_error(messages.invalid_lure_length);
            return None;
        };
        let Ok(perspective) = parse_decimal(&self.perspective_input) else {
            self.set_error(messages.invalid_perspective);
            return None;
        };

        let mut config = SessionConfig::default()
            .with_reference_length(lure_length)
            .with_perspective_factor(perspective);
        if !self.settings.species.is_empty() {
            config = config.with_species(self.settings.species.clone());
        }
        if !self.settings.image_path.trim().is_empty() {
            config = config.with_image_path(self.settings.image_path.trim());
        }

        let session = match MeasurementSession::new(config, &self.species_table) {
            Ok(session) => session,
            Err(e) => {
                self.set_error(error_message(&e, lang));
                return None;
            }
        };

        let lure_points = match parse_points(&self.settings.lure_points) {
            Ok(points) => points,
            Err(e) => {
                self.set_error(format!("{} : {}", messages.lure_points, e));
                return None;
            }
        };
        let fish_points = match parse_points(&self.settings.fish_points) {
            Ok(points) => points,
            Err(e) => {
                self.set_error(format!("{} : {}", messages.fish_points, e));
                return None;
            }
        };

        match session.measure(&lure_points, &fish_points) {
            Ok(report) => {
                self.logger.measurement(&report, lang);
                let mut status = format!(
                    "{} ≈ {:.1} cm",
                    messages.corrected_length, report.result.corrected_length_cm
                );
                if let Some(meets) = report.result.meets_limit() {
                    status.push_str(&format!(" - {}", verdict_label(meets, lang)));
                }
                self.set_status(status);
                self.report = Some(report.clone());
                Some(report)
            }
            Err(e) => {
                let msg = error_message(&e, lang);
                self.logger.warning(msg.clone());
                self.set_error(msg);
                self.report = None;
                None
            }
        }
    }

    fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
        self.status_is_error = false;
    }

    fn set_error(&mut self, status: impl Into<String>) {
        self.status = status.into();
        self.status_is_error = true;
    }

    fn species_options(&self) -> Vec<SpeciesOption> {
        let lang = self.language.as_code();
        let mut options = vec![SpeciesOption {
            label: None,
            display: self.messages().no_species.to_string(),
        }];
        options.extend(self.species_table.iter().map(|class| SpeciesOption {
            label: Some(class.species.clone()),
            display: class.display_label(lang),
        }));
        options
    }

    /// Build the view.
    pub fn view(&self) -> Element<'_, Message> {
        let content = match self.view {
            View::Main => self.view_main(),
            View::Species => self.view_species(),
            View::Logs => self.view_logs(),
        };

        column![self.view_nav_bar(), content, self.view_status_bar()]
            .spacing(10)
            .padding(20)
            .into()
    }

    /// Navigation bar.
    fn view_nav_bar(&self) -> Element<'_, Message> {
        let messages = self.messages();
        let tab = |label: String, view: View| {
            button(text(label))
                .on_press(Message::SwitchView(view))
                .style(if self.view == view {
                    button::primary
                } else {
                    button::secondary
                })
        };

        row![
            tab(format!("📏 {}", messages.measure), View::Main),
            tab(format!("🐟 {}", messages.species_table), View::Species),
            tab(format!("📋 {}", messages.logs), View::Logs),
        ]
        .spacing(10)
        .into()
    }

    /// Status bar.
    fn view_status_bar(&self) -> Element<'_, Message> {
        let state_text = match self.state {
            AppState::Idle => "🟢",
            AppState::Annotating => "🟡",
        };

        let status = text(&self.status).size(14).style(if self.status_is_error {
            text::danger
        } else {
            text::success
        });

        row![text(state_text).size(14), horizontal_space(), status]
            .padding(10)
            .into()
    }

    /// Main view: session parameters, points and result.
    fn view_main(&self) -> Element<'_, Message> {
        let messages = self.messages();
        let options = self.species_options();
        let selected = options
            .iter()
            .find(|o| o.label.as_deref() == Some(self.settings.species.as_str()))
            .or_else(|| options.first())
            .cloned();

        let params = column![
            labeled_input(
                messages.image,
                &self.settings.image_path,
                messages.no_image,
                Message::ImagePathChanged,
            ),
            labeled_input(
                messages.lure_length,
                &self.lure_length_input,
                "12",
                Message::LureLengthChanged,
            ),
            labeled_input(
                messages.perspective_factor,
                &self.perspective_input,
                "1.15",
                Message::PerspectiveChanged,
            ),
            row![
                text(messages.species).width(180),
                pick_list(options, selected, Message::SpeciesSelected).width(300),
            ]
            .spacing(10),
        ]
        .spacing(10);

        let points = column![
            text(messages.pick_lure).size(14),
            labeled_input(
                messages.lure_points,
                &self.settings.lure_points,
                "10,20 110,20",
                Message::LurePointsChanged,
            ),
            text(messages.pick_fish).size(14),
            labeled_input(
                messages.fish_points,
                &self.settings.fish_points,
                "40,200 520,230",
                Message::FishPointsChanged,
            ),
        ]
        .spacing(10);

        let measure_btn = button(text(format!("📏 {}", messages.measure)).size(16))
            .on_press(Message::Measure)
            .style(button::success)
            .padding([10, 20]);

        let annotate_btn = button(text(format!("🖼️ {}", messages.annotate)).size(16))
            .on_press_maybe((self.state == AppState::Idle).then_some(Message::Annotate))
            .padding([10, 20]);

        let actions = row![measure_btn, annotate_btn].spacing(10);

        let preferences = column![
            row![
                text(messages.language).width(180),
                pick_list(
                    vec![Language::French, Language::English],
                    Some(self.language),
                    Message::LanguageSelected,
                )
                .width(300),
            ]
            .spacing(10),
            labeled_input(
                messages.font_file,
                &self.settings.font_path,
                "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
                Message::FontPathChanged,
            ),
            row![
                button(text(format!("💾 {}", messages.save_settings)))
                    .on_press(Message::SaveSettings)
                    .style(button::success),
                button(text(format!("🔄 {}", messages.reset_settings)))
                    .on_press(Message::ResetSettings)
                    .style(button::secondary),
            ]
            .spacing(10),
        ]
        .spacing(10);

        let content = column![
            text(format!("🎣 {}", messages.title)).size(28),
            vertical_space().height(10),
            params,
            horizontal_rule(1),
            points,
            actions,
            horizontal_rule(1),
            self.view_result(),
            horizontal_rule(1),
            preferences,
        ]
        .spacing(15)
        .padding(10);

        scrollable(content).height(Length::Fill).into()
    }

    fn view_result(&self) -> Element<'_, Message> {
        let Some(report) = &self.report else {
            return column![].into();
        };
        let lang = self.language.as_code();

        let mut lines: Vec<Element<'_, Message>> = summary_lines(report, lang)
            .into_iter()
            .map(|line| text(line).size(14).into())
            .collect();

        if let Some(verdict) = &report.result.classification {
            let label = text(verdict_label(verdict.meets_limit, lang))
                .size(24)
                .style(if verdict.meets_limit {
                    text::success
                } else {
                    text::danger
                });
            lines.push(label.into());
        }

        container(Column::with_children(lines).spacing(4))
            .width(Length::Fill)
            .padding(10)
            .style(container::bordered_box)
            .into()
    }

    /// Species table view.
    fn view_species(&self) -> Element<'_, Message> {
        let messages = self.messages();
        let lang = self.language.as_code();

        let entries: Vec<Element<'_, Message>> = self
            .species_table
            .iter()
            .map(|class| {
                row![
                    text(class.display_label(lang)).width(Length::Fill),
                    button(text("🗑️"))
                        .on_press(Message::RemoveSpecies(class.species.clone()))
                        .style(button::danger),
                ]
                .spacing(10)
                .into()
            })
            .collect();

        let file_row = row![
            labeled_input(
                messages.species_file,
                &self.settings.species_file,
                "species.json",
                Message::SpeciesFileChanged,
            ),
            button(text(format!("📂 {}", messages.reload))).on_press(Message::ReloadSpecies),
            button(text(format!("💾 {}", messages.save)))
                .on_press(Message::SaveSpecies)
                .style(button::success),
        ]
        .spacing(10);

        let add_row = row![
            text(messages.new_species).width(180),
            text_input("Sandre", &self.new_species_label)
                .on_input(Message::NewSpeciesLabelChanged)
                .width(200),
            text_input("50", &self.new_species_limit)
                .on_input(Message::NewSpeciesLimitChanged)
                .width(80),
            text("cm"),
            button(text(format!("➕ {}", messages.add))).on_press(Message::AddSpecies),
        ]
        .spacing(10);

        let list = container(scrollable(Column::with_children(entries).spacing(6)))
            .width(Length::Fill)
            .height(Length::Fill)
            .padding(10)
            .style(container::bordered_box);

        column![
            text(format!("🐟 {}", messages.species_table)).size(28),
            vertical_space().height(10),
            file_row,
            add_row,
            list,
        ]
        .spacing(10)
        .height(Length::Fill)
        .into()
    }

    /// Logs view.
    fn view_logs(&self) -> Element<'_, Message> {
        let messages = self.messages();

        let clear_btn = button(text(format!("🗑️ {}", messages.clear_logs)))
            .on_press(Message::ClearLogs)
            .style(button::secondary);

        let header = row![
            text(format!("📋 {}", messages.logs)).size(28),
            horizontal_space(),
            clear_btn
        ];

        let log_view = scrollable(text(self.logger.format_all()).size(13)).height(Length::Fill);

        let log_container = container(log_view)
            .width(Length::Fill)
            .height(Length::Fill)
            .padding(10)
            .style(container::bordered_box);

        let log_path = self
            .logger
            .log_file_path()
            .map(|p| format!("{} : {}", messages.log_file, p.display()))
            .unwrap_or_else(|| format!("{} : -", messages.log_file));

        column![
            header,
            vertical_space().height(10),
            log_container,
            text(log_path).size(12),
        ]
        .spacing(10)
        .height(Length::Fill)
        .into()
    }
}

/// Helper function to create a labeled input row.
fn labeled_input<'a>(
    label: &'a str,
    value: &'a str,
    placeholder: &'a str,
    on_change: impl Fn(String) -> Message + 'a,
) -> Element<'a, Message> {
    row![
        text(label).width(180),
        text_input(placeholder, value).on_input(on_change).width(300),
    ]
    .spacing(10)
    .into()
}

/// Draw the report on the photo off the UI thread.
async fn render_annotation(
    input: PathBuf,
    output: PathBuf,
    report: SessionReport,
    font: String,
    lang: String,
) -> Result<PathBuf, String> {
    tokio::task::spawn_blocking(move || -> Result<PathBuf, String> {
        let mut annotator = Annotator::new().with_lang(lang);
        if !font.is_empty() {
            annotator = annotator
                .with_font_file(Path::new(&font))
                .map_err(|e| e.to_string())?;
        }
        annotator
            .annotate_file(&input, &output, &report)
            .map_err(|e| e.to_string())?;
        Ok(output)
    })
    .await
    .map_err(|e| e.to_string())?
}

//! Internationalization (i18n) module for user-facing messages.

use crate::measure::{MeasureError, SegmentRole, SessionReport};

/// UI messages structure
#[derive(Debug, Clone)]
pub struct Messages {
    pub title: &'static str,
    pub choose_image_first: &'static str,
    pub pick_lure: &'static str,
    pub pick_fish: &'static str,
    pub lure_points: &'static str,
    pub fish_points: &'static str,
    pub lure_distance: &'static str,
    pub fish_distance: &'static str,
    pub scale: &'static str,
    pub raw_length: &'static str,
    pub corrected_length: &'static str,
    pub fish_length: &'static str,
    pub legal_size: &'static str,
    pub undersized: &'static str,
    pub size_limit: &'static str,
    pub lure_length: &'static str,
    pub perspective_factor: &'static str,
    pub species: &'static str,
    pub image: &'static str,
    pub no_image: &'static str,
    pub measure: &'static str,
    pub error: &'static str,
    pub invalid_lure_length: &'static str,
    pub invalid_perspective: &'static str,
    pub unknown_species: &'static str,
    pub missing_lure_points: &'static str,
    pub missing_fish_points: &'static str,
    pub identical_lure_points: &'static str,
    pub invalid_scale: &'static str,
    pub annotate: &'static str,
    pub annotation_saved: &'static str,
    pub save_settings: &'static str,
    pub reset_settings: &'static str,
    pub settings_saved: &'static str,
    pub settings_reset: &'static str,
    pub logs: &'static str,
    pub clear_logs: &'static str,
    pub log_file: &'static str,
    pub species_table: &'static str,
    pub new_species: &'static str,
    pub add: &'static str,
    pub save: &'static str,
    pub reload: &'static str,
    pub no_species: &'static str,
    pub language: &'static str,
    pub font_file: &'static str,
    pub species_file: &'static str,
    pub ready: &'static str,
}

/// French messages
pub static MESSAGES_FR: Messages = Messages {
    title: "Mesure de poisson sur photo",
    choose_image_first: "Merci de choisir une image d'abord.",
    pick_lure: "Saisis les deux extrémités du leurre (ex : 10,20 110,20)",
    pick_fish: "Saisis la tête puis le bout de la queue du poisson",
    lure_points: "Points du leurre",
    fish_points: "Points du poisson",
    lure_distance: "Distance du leurre",
    fish_distance: "Distance du poisson",
    scale: "Échelle",
    raw_length: "Longueur estimée (brute)",
    corrected_length: "Longueur corrigée",
    fish_length: "Longueur du poisson (corrigée)",
    legal_size: "MAILLÉ",
    undersized: "NON MAILLÉ",
    size_limit: "maille",
    lure_length: "Longueur du leurre (cm)",
    perspective_factor: "Facteur de perspective",
    species: "Type de poisson",
    image: "Image",
    no_image: "Aucune image sélectionnée",
    measure: "Mesurer",
    error: "Erreur",
    invalid_lure_length: "Longueur du leurre invalide. Merci de saisir un nombre positif (ex : 12).",
    invalid_perspective: "Facteur de perspective invalide. Merci de saisir un nombre positif (ex : 1.15).",
    unknown_species: "Type de poisson non reconnu.",
    missing_lure_points: "Tu n'as pas donné deux points pour le leurre.",
    missing_fish_points: "Tu n'as pas donné deux points pour le poisson.",
    identical_lure_points: "Les deux points du leurre sont identiques.",
    invalid_scale: "Échelle inutilisable : le leurre est trop petit ou trop grand à l'écran.",
    annotate: "Annoter l'image",
    annotation_saved: "Image annotée enregistrée",
    save_settings: "Enregistrer",
    reset_settings: "Valeurs par défaut",
    settings_saved: "Réglages enregistrés",
    settings_reset: "Réglages remis par défaut",
    logs: "Journal",
    clear_logs: "Vider le journal",
    log_file: "Fichier journal",
    species_table: "Tailles légales",
    new_species: "Nouvelle espèce",
    add: "Ajouter",
    save: "Enregistrer",
    reload: "Recharger",
    no_species: "Aucun (pas de verdict)",
    language: "Langue",
    font_file: "Police (TTF/OTF)",
    species_file: "Fichier des espèces",
    ready: "Prêt",
};

/// English messages
pub static MESSAGES_EN: Messages = Messages {
    title: "Fish length from a photo",
    choose_image_first: "Please choose an image first.",
    pick_lure: "Enter both ends of the lure (e.g. 10,20 110,20)",
    pick_fish: "Enter the fish's head then the tip of its tail",
    lure_points: "Lure points",
    fish_points: "Fish points",
    lure_distance: "Lure distance",
    fish_distance: "Fish distance",
    scale: "Scale",
    raw_length: "Estimated length (raw)",
    corrected_length: "Corrected length",
    fish_length: "Fish length (corrected)",
    legal_size: "LEGAL SIZE",
    undersized: "UNDERSIZED",
    size_limit: "min",
    lure_length: "Lure length (cm)",
    perspective_factor: "Perspective factor",
    species: "Species",
    image: "Image",
    no_image: "No image selected",
    measure: "Measure",
    error: "Error",
    invalid_lure_length: "Invalid lure length. Please enter a positive number (e.g. 12).",
    invalid_perspective: "Invalid perspective factor. Please enter a positive number (e.g. 1.15).",
    unknown_species: "Unknown species.",
    missing_lure_points: "Two points are needed for the lure.",
    missing_fish_points: "Two points are needed for the fish.",
    identical_lure_points: "Both lure points are identical.",
    invalid_scale: "Unusable scale: the lure is too small or too large on screen.",
    annotate: "Annotate image",
    annotation_saved: "Annotated image saved",
    save_settings: "Save",
    reset_settings: "Reset to defaults",
    settings_saved: "Settings saved",
    settings_reset: "Settings reset to defaults",
    logs: "Logs",
    clear_logs: "Clear logs",
    log_file: "Log file",
    species_table: "Size limits",
    new_species: "New species",
    add: "Add",
    save: "Save",
    reload: "Reload",
    no_species: "None (no verdict)",
    language: "Language",
    font_file: "Font (TTF/OTF)",
    species_file: "Species file",
    ready: "Ready",
};

/// Get UI messages by language.
///
/// # Arguments
/// * `lang` - Language code, "fr" for French, "en" for English.
///
/// # Returns
/// Reference to Messages struct. Unknown codes fall back to French.
pub fn get_messages(lang: &str) -> &'static Messages {
    match lang {
        "en" => &MESSAGES_EN,
        _ => &MESSAGES_FR,
    }
}

/// Get the pass/fail status word for a size verdict.
pub fn verdict_label(meets_limit: bool, lang: &str) -> &'static str {
    let messages = get_messages(lang);
    if meets_limit {
        messages.legal_size
    } else {
        messages.undersized
    }
}

/// Turn a measurement failure into a message for the user.
pub fn error_message(err: &MeasureError, lang: &str) -> String {
    let messages = get_messages(lang);
    match err {
        MeasureError::InsufficientInput {
            role: SegmentRole::Reference,
            ..
        } => messages.missing_lure_points.to_string(),
        MeasureError::InsufficientInput {
            role: SegmentRole::Target,
            ..
        } => messages.missing_fish_points.to_string(),
        MeasureError::DegenerateReference => messages.identical_lure_points.to_string(),
        MeasureError::InvalidParameter {
            name: "perspective_factor",
            ..
        } => messages.invalid_perspective.to_string(),
        MeasureError::InvalidParameter {
            name: "cm_per_px",
            ..
        } => messages.invalid_scale.to_string(),
        MeasureError::InvalidParameter { .. } => messages.invalid_lure_length.to_string(),
        MeasureError::UnknownClassificationTarget(label) => {
            format!("{} ({})", messages.unknown_species, label)
        }
    }
}

/// Human readable lines describing a measurement, in the given language.
pub fn summary_lines(report: &SessionReport, lang: &str) -> Vec<String> {
    let messages = get_messages(lang);
    let result = &report.result;

    let mut lines = vec![
        format!(
            "{} : {:.2} px",
            messages.lure_distance,
            report.calibration.reference.length_px()
        ),
        format!("{} : {}", messages.scale, report.calibration.scale),
        format!("{} : {:.2} px", messages.fish_distance, result.target_length_px),
        format!("{} : {:.1} cm", messages.raw_length, result.raw_length_cm),
        format!(
            "{} (x{}) : {:.1} cm",
            messages.corrected_length, result.perspective_factor, result.corrected_length_cm
        ),
    ];

    if let Some(verdict) = &result.classification {
        lines.push(format!(
            "{} ({} {} cm) : {}",
            verdict.species,
            messages.size_limit,
            verdict.size_limit_cm,
            verdict_label(verdict.meets_limit, lang)
        ));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SpeciesTable;
    use crate::measure::{run_session, Point, SessionConfig};

    #[test]
    fn test_get_messages() {
        let fr = get_messages("fr");
        assert_eq!(fr.legal_size, "MAILLÉ");

        let en = get_messages("en");
        assert_eq!(en.legal_size, "LEGAL SIZE");

        assert_eq!(get_messages("de").undersized, "NON MAILLÉ");
    }

    #[test]
    fn test_verdict_label() {
        assert_eq!(verdict_label(true, "fr"), "MAILLÉ");
        assert_eq!(verdict_label(false, "en"), "UNDERSIZED");
    }

    #[test]
    fn test_error_message() {
        let err = MeasureError::insufficient_input(SegmentRole::Target, 1);
        assert_eq!(error_message(&err, "fr"), MESSAGES_FR.missing_fish_points);

        let err = MeasureError::invalid_parameter("perspective_factor", -1.0);
        assert_eq!(error_message(&err, "en"), MESSAGES_EN.invalid_perspective);

        let err = MeasureError::unknown_species("Sandre");
        assert!(error_message(&err, "fr").contains("Sandre"));
    }

    #[test]
    fn test_scale_error_is_not_a_lure_length_error() {
        let err = MeasureError::invalid_parameter("cm_per_px", f64::INFINITY);
        assert_eq!(error_message(&err, "fr"), MESSAGES_FR.invalid_scale);
        assert_eq!(error_message(&err, "en"), MESSAGES_EN.invalid_scale);

        let err = MeasureError::invalid_parameter("reference_length_cm", 0.0);
        assert_eq!(error_message(&err, "en"), MESSAGES_EN.invalid_lure_length);
    }

    #[test]
    fn test_summary_lines() {
        let config = SessionConfig::default()
            .with_perspective_factor(1.15)
            .with_species("Bar");
        let report = run_session(
            config,
            &SpeciesTable::default(),
            &[Point::new(0.0, 0.0), Point::new(100.0, 0.0)],
            &[Point::new(0.0, 10.0), Point::new(250.0, 10.0)],
        )
        .unwrap();

        let lines = summary_lines(&report, "fr");
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[1], "Échelle : 0.1200 cm/px");
        assert!(lines[4].ends_with("34.5 cm"));
        assert!(lines[5].ends_with("NON MAILLÉ"));

        let unclassified = run_session(
            SessionConfig::default(),
            &SpeciesTable::empty(),
            &[Point::new(0.0, 0.0), Point::new(100.0, 0.0)],
            &[Point::new(0.0, 10.0), Point::new(250.0, 10.0)],
        )
        .unwrap();
        assert_eq!(summary_lines(&unclassified, "en").len(), 5);
    }
}

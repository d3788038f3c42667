//! fish-gauge - estimate a fish's length from a photo
//!
//! This is the CLI entry point for the fish-gauge tool.
//! Run with: cargo run --bin fish-gauge -- --lure "0,0 100,0" --fish "0,10 250,10"

use anyhow::{bail, Context};
use std::env;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use fish_gauge::annotate::{load_photo, Annotator};
use fish_gauge::config::{error_message, get_messages, summary_lines, Messages};
use fish_gauge::points::{format_points, parse_decimal, parse_points};
use fish_gauge::{AppSettings, MeasurementSession, Point, SessionReport, SpeciesTable};

const USAGE: &str = "\
Usage: fish-gauge [OPTIONS]

Options:
  --image PATH          Photo the points were taken from
  --lure-cm CM          Real length of the lure (default 12)
  --perspective F       Perspective correction factor (default 1.15)
  --species LABEL       Species to check the legal size for (default Bar)
  --no-species          Skip the legal size check
  --species-file PATH   JSON species table
  --lure \"X,Y X,Y\"      Both ends of the lure, in pixels
  --fish \"X,Y X,Y\"      Head and tail of the fish, in pixels
  --annotate OUT        Write the photo with the measurement drawn on it
  --font PATH           TTF/OTF font used for annotation labels
  --json                Print the report as JSON
  --lang fr|en          Output language (default fr)
  --list-species        Print the species table and exit
  --save                Remember these parameters for next time
  -h, --help            Print this help

Missing lure or fish points are read from stdin.";

/// Command line arguments. `None` means not given.
#[derive(Debug, Default)]
struct CliArgs {
    image: Option<String>,
    lure_cm: Option<String>,
    perspective: Option<String>,
    species: Option<String>,
    no_species: bool,
    species_file: Option<String>,
    lure: Option<String>,
    fish: Option<String>,
    annotate: Option<PathBuf>,
    font: Option<String>,
    json: bool,
    lang: Option<String>,
    list_species: bool,
    save: bool,
    help: bool,
}

fn parse_args(args: &[String]) -> anyhow::Result<CliArgs> {
    let mut parsed = CliArgs::default();
    let mut iter = args.iter().skip(1);

    while let Some(arg) = iter.next() {
        let mut value = || {
            iter.next()
                .cloned()
                .with_context(|| format!("{} expects a value", arg))
        };

        match arg.as_str() {
            "--image" => parsed.image = Some(value()?),
            "--lure-cm" => parsed.lure_cm = Some(value()?),
            "--perspective" => parsed.perspective = Some(value()?),
            "--species" => parsed.species = Some(value()?),
            "--no-species" => parsed.no_species = true,
            "--species-file" => parsed.species_file = Some(value()?),
            "--lure" => parsed.lure = Some(value()?),
            "--fish" => parsed.fish = Some(value()?),
            "--annotate" => parsed.annotate = Some(PathBuf::from(value()?)),
            "--font" => parsed.font = Some(value()?),
            "--json" => parsed.json = true,
            "--lang" => parsed.lang = Some(value()?),
            "--list-species" => parsed.list_species = true,
            "--save" => parsed.save = true,
            "-h" | "--help" => parsed.help = true,
            other => bail!("Unknown argument: {}\n\n{}", other, USAGE),
        }
    }

    Ok(parsed)
}

/// Override settings with `FISH_GAUGE_*` environment variables.
fn apply_env(settings: &mut AppSettings) -> anyhow::Result<()> {
    if let Ok(value) = env::var("FISH_GAUGE_LURE_CM") {
        settings.lure_length_cm =
            parse_decimal(&value).context("Invalid FISH_GAUGE_LURE_CM")?;
    }
    if let Ok(value) = env::var("FISH_GAUGE_PERSPECTIVE") {
        settings.perspective_factor =
            parse_decimal(&value).context("Invalid FISH_GAUGE_PERSPECTIVE")?;
    }
    if let Ok(value) = env::var("FISH_GAUGE_SPECIES") {
        settings.species = value;
    }
    if let Ok(value) = env::var("FISH_GAUGE_SPECIES_FILE") {
        settings.species_file = value;
    }
    if let Ok(value) = env::var("FISH_GAUGE_LANG") {
        settings.lang = value;
    }
    if let Ok(value) = env::var("FISH_GAUGE_FONT") {
        settings.font_path = value;
    }
    Ok(())
}

/// Override settings with command line arguments.
fn apply_args(settings: &mut AppSettings, args: &CliArgs) -> anyhow::Result<()> {
    let messages = get_messages(args.lang.as_deref().unwrap_or(&settings.lang));

    if let Some(ref value) = args.lure_cm {
        settings.lure_length_cm = parse_decimal(value).context(messages.invalid_lure_length)?;
    }
    if let Some(ref value) = args.perspective {
        settings.perspective_factor =
            parse_decimal(value).context(messages.invalid_perspective)?;
    }
    if let Some(ref value) = args.species {
        settings.species = value.clone();
    }
    if args.no_species {
        settings.species.clear();
    }
    if let Some(ref value) = args.species_file {
        settings.species_file = value.clone();
    }
    if let Some(ref value) = args.image {
        settings.image_path = value.clone();
    }
    if let Some(ref value) = args.font {
        settings.font_path = value.clone();
    }
    if let Some(ref value) = args.lang {
        settings.lang = value.clone();
    }
    Ok(())
}

/// Read points from `input` until two are collected or an empty line is entered.
///
/// Prompts go to `prompt_out` so stdout stays clean for `--json`.
fn prompt_points(
    input: &mut impl BufRead,
    prompt_out: &mut impl Write,
    prompt: &str,
) -> anyhow::Result<Vec<Point>> {
    writeln!(prompt_out, "{}", prompt)?;

    let mut points = Vec::new();
    while points.len() < 2 {
        write!(prompt_out, "📍 Point {}: ", points.len() + 1)?;
        prompt_out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 || line.trim().is_empty() {
            break;
        }

        match parse_points(&line) {
            Ok(parsed) => points.extend(parsed),
            Err(e) => writeln!(prompt_out, "❌ {}", e)?,
        }
    }

    Ok(points)
}

/// Points from an argument, or typed on stdin.
fn acquire_points(arg: Option<&str>, prompt: &str, label: &str) -> anyhow::Result<Vec<Point>> {
    match arg {
        Some(text) => parse_points(text).with_context(|| label.to_string()),
        None => prompt_points(&mut io::stdin().lock(), &mut io::stderr(), prompt),
    }
}

/// Size of the photo at `path`.
///
/// The photo is only required when it will be annotated. Otherwise a missing
/// or unreadable file is reported and the measurement goes on.
fn photo_dimensions(path: &Path, required: bool) -> anyhow::Result<Option<(u32, u32)>> {
    match load_photo(path) {
        Ok(photo) => Ok(Some(photo.dimensions())),
        Err(e) if required => {
            Err(e).with_context(|| format!("Failed to open image {}", path.display()))
        }
        Err(e) => {
            tracing::warn!("Ignoring image {}: {}", path.display(), e);
            Ok(None)
        }
    }
}

fn print_species(table: &SpeciesTable, lang: &str) {
    println!("🐟 {}", get_messages(lang).species_table);
    for class in table.iter() {
        println!("  - {}", class.display_label(lang));
    }
}

fn print_report(report: &SessionReport, messages: &Messages, lang: &str) {
    println!();
    for line in summary_lines(report, lang) {
        println!("{}", line);
    }
    println!(
        "\n📏 {} ≈ {:.1} cm",
        messages.fish_length, report.result.corrected_length_cm
    );
    match report.result.meets_limit() {
        Some(true) => println!("✅ {}", messages.legal_size),
        Some(false) => println!("❌ {}", messages.undersized),
        None => {}
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (ignore errors if file doesn't exist)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let cli = parse_args(&args)?;
    if cli.help {
        println!("{}", USAGE);
        return Ok(());
    }

    // Settings < environment < arguments
    let mut settings = AppSettings::load();
    apply_env(&mut settings)?;
    apply_args(&mut settings, &cli)?;

    let lang = settings.lang.clone();
    let messages = get_messages(&lang);

    let table = settings
        .species_table()
        .with_context(|| format!("Failed to load species table {}", settings.species_file))?;

    if cli.list_species {
        print_species(&table, &lang);
        return Ok(());
    }

    let config = settings.session_config();
    let session = MeasurementSession::new(config, &table)
        .map_err(|e| anyhow::anyhow!(error_message(&e, &lang)))?;

    if cli.annotate.is_some() && settings.image_path.trim().is_empty() {
        bail!(messages.choose_image_first);
    }

    if !cli.json {
        println!("🎣 fish-gauge - {}", messages.title);
        println!("================================================");
        println!("{} : {} cm", messages.lure_length, settings.lure_length_cm);
        println!("{} : {}", messages.perspective_factor, settings.perspective_factor);
        match session.size_class() {
            Some(class) => println!("{} : {}", messages.species, class.display_label(&lang)),
            None => println!("{} : {}", messages.species, messages.no_species),
        }
    }

    if let Some(path) = session.config().image_path.clone() {
        let dimensions = photo_dimensions(&path, cli.annotate.is_some())?;
        if let (false, Some((width, height))) = (cli.json, dimensions) {
            println!("{} : {} ({}x{})", messages.image, path.display(), width, height);
        }
    }
    if !cli.json {
        println!("================================================\n");
    }

    let lure_points = acquire_points(cli.lure.as_deref(), messages.pick_lure, messages.lure_points)?;
    let calibration = session
        .calibrate(&lure_points)
        .map_err(|e| anyhow::anyhow!(error_message(&e, &lang)))?;
    tracing::debug!(
        "Lure distance: {:.2} px, scale: {}",
        calibration.reference.length_px(),
        calibration.scale
    );

    let fish_points = acquire_points(cli.fish.as_deref(), messages.pick_fish, messages.fish_points)?;
    let report = session
        .measure_with(&calibration, &fish_points)
        .map_err(|e| anyhow::anyhow!(error_message(&e, &lang)))?;
    tracing::info!(
        corrected_cm = report.result.corrected_length_cm,
        meets_limit = ?report.result.meets_limit(),
        "Measurement done"
    );

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report, messages, &lang);
    }

    if let Some(output) = cli.annotate.clone() {
        let input = PathBuf::from(settings.image_path.trim());
        let font = settings.font_path.trim().to_string();
        let annotate_lang = lang.clone();
        let annotated = report.clone();

        let written = tokio::task::spawn_blocking(move || -> anyhow::Result<PathBuf> {
            let mut annotator = Annotator::new().with_lang(annotate_lang);
            if !font.is_empty() {
                annotator = annotator
                    .with_font_file(&font)
                    .with_context(|| format!("Failed to load font {}", font))?;
            } else {
                tracing::warn!("No font configured, annotation will have no labels");
            }
            annotator.annotate_file(&input, &output, &annotated)?;
            Ok(output)
        })
        .await??;

        if !cli.json {
            println!("\n🖼️ {} : {}", messages.annotation_saved, written.display());
        }
    }

    if cli.save {
        settings.lure_points = format_points(&lure_points);
        settings.fish_points = format_points(&fish_points);
        settings.save().map_err(anyhow::Error::msg)?;
        if !cli.json {
            println!("💾 {}", messages.settings_saved);
        }
    }

    Ok(())
}

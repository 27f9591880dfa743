//! # Quote CLI
//!
//! Command-line front end for `quote_core`.
//!
//! ```text
//! quote_cli line --family janela --panels 2 --width 2000 --height 1500 --price "120,00"
//! quote_cli formula "L_TOTAL / 4" --width 200 --height 150 --unit cm
//! quote_cli quote request.json --json
//! ```
//!
//! Results go to stdout (a table, or JSON with `--json`); logs go to
//! stderr and honour `RUST_LOG`.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Deserialize;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use quote_core::calculations::{AdditionalItemRequest, LineComputation, LineSpec, StandardLine};
use quote_core::catalog::{CatalogSnapshot, Finish, PriceSource};
use quote_core::formula::evaluate_or_zero;
use quote_core::measurement::{parse_measurement, try_parse_measurement};
use quote_core::product::{CornerJoint, OpeningSpec, ProductConfiguration, ProductFamily, TrackMode};
use quote_core::summary::{cut_summary, QuoteSummary};
use quote_core::units::LengthUnit;
use quote_core::{Quote, QuoteError, QuoteLine, QuoteSettings};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser, Debug)]
#[command(author, version, about = "Glass fabrication quoting", long_about = None)]
struct Args {
    /// Log pipeline steps (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print JSON instead of a table
    #[arg(long, global = true)]
    json: bool,

    /// Currency symbol for printed amounts (overrides the request file)
    #[arg(long, global = true, env = "QUOTE_CURRENCY_SYMBOL")]
    currency_symbol: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Compute one line from an opening and a product
    Line(LineArgs),

    /// Evaluate a cut formula
    Formula {
        /// Formula using L_TOTAL and A_TOTAL
        formula: String,

        /// Total width in UNIT
        #[arg(long, default_value = "0")]
        width: String,

        /// Total height in UNIT
        #[arg(long, default_value = "0")]
        height: String,

        /// Unit of width and height (mm, cm, m)
        #[arg(long, default_value = "mm", value_parser = parse_unit)]
        unit: LengthUnit,
    },

    /// Price a JSON request file (catalog + lines)
    Quote {
        /// Request file
        file: PathBuf,

        /// Override the client named in the file
        #[arg(long)]
        client: Option<String>,
    },
}

#[derive(Debug, clap::Args)]
struct LineArgs {
    /// Product family (e.g. janela, porta, box, espelho, canto, bandeira)
    #[arg(long)]
    family: String,

    /// Number of panels
    #[arg(long, default_value_t = 2)]
    panels: u8,

    /// Opening width (mm)
    #[arg(long)]
    width: String,

    /// Opening height (mm)
    #[arg(long)]
    height: String,

    /// Second side of a corner window (mm)
    #[arg(long)]
    secondary_width: Option<String>,

    /// Transom band height (mm); implies a transom
    #[arg(long)]
    transom_height: Option<String>,

    /// Glass price per m²
    #[arg(long)]
    price: String,

    /// Transom glass price per m² (defaults to --price)
    #[arg(long)]
    transom_price: Option<String>,

    /// Finish (e.g. redondo-lapidado)
    #[arg(long, default_value = "none")]
    finish: String,

    /// Sliding door track
    #[arg(long, value_enum, default_value_t = TrackArg::Surface)]
    track: TrackArg,

    /// Corner window joined through a post
    #[arg(long)]
    corner_post: bool,

    /// Latch fitted
    #[arg(long)]
    latch: bool,

    /// Profile kit/color
    #[arg(long)]
    kit: Option<String>,

    /// Number of identical assemblies
    #[arg(long, default_value_t = 1)]
    quantity: u32,

    /// Label printed on the ticket
    #[arg(long, default_value = "")]
    label: String,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TrackArg {
    Surface,
    Embedded,
}

impl From<TrackArg> for TrackMode {
    fn from(track: TrackArg) -> Self {
        match track {
            TrackArg::Surface => TrackMode::Surface,
            TrackArg::Embedded => TrackMode::Embedded,
        }
    }
}

fn parse_unit(s: &str) -> Result<LengthUnit, String> {
    LengthUnit::from_symbol(s).ok_or_else(|| format!("unknown unit '{s}', expected mm, cm or m"))
}

/// Request file accepted by the `quote` subcommand
#[derive(Debug, Deserialize)]
struct QuoteRequest {
    #[serde(default)]
    client: String,
    #[serde(default)]
    settings: Option<QuoteSettings>,
    #[serde(default)]
    catalog: CatalogSnapshot,
    lines: Vec<LineRequest>,
}

#[derive(Debug, Deserialize)]
struct LineRequest {
    /// Kept as JSON until the quote settings can fill in a missing quantity
    spec: serde_json::Value,
    #[serde(default)]
    items: Vec<AdditionalItemRequest>,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let outcome = match &args.command {
        Commands::Line(line) => run_line(&args, line),
        Commands::Formula {
            formula,
            width,
            height,
            unit,
        } => run_formula(&args, formula, width, height, *unit),
        Commands::Quote { file, client } => run_quote(&args, file, client.as_deref()),
    };

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn build_standard_line(line: &LineArgs) -> Result<StandardLine, QuoteError> {
    let family = ProductFamily::from_str_flexible(&line.family)?;
    let transom_height = line.transom_height.as_deref().map(parse_measurement);
    let transom = transom_height.is_some() || family == ProductFamily::TransomWindow;

    let configuration = ProductConfiguration::new(family, line.panels)?
        .with_finish(Finish::from_str_flexible(&line.finish)?)?
        .with_track(line.track.into())
        .with_corner_joint(if line.corner_post { CornerJoint::Post } else { CornerJoint::Square })
        .with_latch(line.latch)
        .with_kit(line.kit.clone())
        .with_transom(transom)?;

    let mut opening = OpeningSpec::from_raw(&line.width, &line.height);
    if let Some(secondary) = line.secondary_width.as_deref() {
        opening = opening.with_secondary_width(parse_measurement(secondary));
    }
    if let Some(height) = transom_height {
        opening = opening.with_transom_height(height);
    }

    Ok(StandardLine {
        label: line.label.clone(),
        opening,
        configuration,
        glass: PriceSource::inline(parse_measurement(&line.price)),
        transom_glass: line
            .transom_price
            .as_deref()
            .map(|p| PriceSource::inline(parse_measurement(p))),
        quantity: line.quantity,
    })
}

fn run_line(args: &Args, line: &LineArgs) -> CliResult<bool> {
    let catalog = CatalogSnapshot::default();
    let line = match build_standard_line(line).and_then(|spec| QuoteLine::new(spec.into(), &catalog)) {
        Ok(line) => line,
        Err(e) => {
            report_blocked(args, "line", &e)?;
            return Ok(false);
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&line)?);
    } else {
        print_line(args, &line);
    }
    Ok(true)
}

fn run_formula(args: &Args, formula: &str, width: &str, height: &str, unit: LengthUnit) -> CliResult<bool> {
    let width = try_parse_measurement(width).ok_or("width is not a number")?;
    let height = try_parse_measurement(height).ok_or("height is not a number")?;
    let outcome = evaluate_or_zero(formula, width, height, unit);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else if let Some(error) = &outcome.error {
        println!("{} {}", status_icon(false), error);
    } else {
        println!("{} {} = {} mm", status_icon(true), formula, outcome.value);
    }
    Ok(outcome.is_valid())
}

fn run_quote(args: &Args, file: &Path, client: Option<&str>) -> CliResult<bool> {
    let text = fs::read_to_string(file)?;
    let request: QuoteRequest = serde_json::from_str(&text)?;
    info!(file = %file.display(), lines = request.lines.len(), catalog = request.catalog.len(), "Pricing quote request");

    let settings = apply_currency_symbol(args, request.settings.unwrap_or_default());
    let mut quote = Quote::new(client.unwrap_or(&request.client)).with_settings(settings);

    let mut all_ok = true;
    for (i, line) in request.lines.into_iter().enumerate() {
        let label = match line.spec.get("label").and_then(serde_json::Value::as_str) {
            Some(text) => format!("#{} {}", i + 1, text),
            None => format!("#{}", i + 1),
        };
        match add_request_line(&mut quote, line, &request.catalog) {
            Ok(()) => debug!(line = %label, "Added"),
            Err(e) => {
                all_ok = false;
                report_blocked(args, &label, &e)?;
            }
        }
    }

    let summary = QuoteSummary::from_quote(&quote);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&quote.settings, &summary);
    }
    Ok(all_ok)
}

fn apply_currency_symbol(args: &Args, mut settings: QuoteSettings) -> QuoteSettings {
    if let Some(symbol) = &args.currency_symbol {
        settings.currency_symbol = symbol.clone();
    }
    settings
}

/// Decode a request line, taking its quantity from the settings when omitted
fn request_spec(mut spec: serde_json::Value, settings: &QuoteSettings) -> Result<LineSpec, QuoteError> {
    if let Some(fields) = spec.as_object_mut() {
        fields
            .entry("quantity")
            .or_insert_with(|| serde_json::Value::from(settings.default_quantity));
    }
    serde_json::from_value(spec).map_err(|e| QuoteError::invalid_input("spec", "line", e.to_string()))
}

/// Add a line with its items, or leave the quote untouched
fn add_request_line(quote: &mut Quote, request: LineRequest, catalog: &CatalogSnapshot) -> Result<(), QuoteError> {
    let spec = request_spec(request.spec, &quote.settings)?;
    let mut line = QuoteLine::new(spec, catalog)?;
    for item in &request.items {
        line.attach_item(item, catalog)?;
    }
    quote.push_line(line);
    Ok(())
}

fn report_blocked(args: &Args, what: &str, error: &QuoteError) -> CliResult<()> {
    warn!(line = %what, code = error.error_code(), "Line rejected");
    if args.json {
        eprintln!("{}", serde_json::to_string_pretty(error)?);
    } else {
        eprintln!("{} {}: {}", status_icon(false), what, error);
    }
    Ok(())
}

fn print_line(args: &Args, line: &QuoteLine) {
    println!("═══════════════════════════════════════");
    println!("{}", cut_summary(line));
    println!("═══════════════════════════════════════");
    print_glass(&line.computation);
    for item in line.all_items() {
        println!("  {:<28} {:>12.2}", item.name, item.subtotal);
    }
    println!("───────────────────────────────────────");
    println!("  {:<28} {:>8.3} m²", "Area", line.area_m2);
    let settings = apply_currency_symbol(args, QuoteSettings::default());
    println!("  {:<28} {}", "TOTAL", settings.format_money(line.total));
    println!("{} line can be added to a quote", status_icon(true));
}

fn print_glass(computation: &LineComputation) {
    println!("  {:<28} {:>12.2}", "Glass (body)", computation.glass.body.total);
    if let Some(transom) = computation.glass.transom {
        println!("  {:<28} {:>12.2}", "Glass (transom)", transom.total);
    }
}

fn print_summary(settings: &QuoteSettings, summary: &QuoteSummary) {
    println!("═══════════════════════════════════════");
    println!("  QUOTE {}", summary.client);
    println!("  Valid until {}", summary.valid_until.format("%Y-%m-%d"));
    println!("═══════════════════════════════════════");
    for line in &summary.lines {
        println!();
        println!("{}", line.cut_summary);
        println!("  {:<28} {}", "Line total", settings.format_money(line.total));
    }
    println!();
    println!("───────────────────────────────────────");
    println!("  {:<28} {:.3} m²", "Glass area", summary.total_area_m2);
    println!("  {:<28} {}", "GRAND TOTAL", settings.format_money(summary.grand_total));
}

fn status_icon(pass: bool) -> &'static str {
    if pass { "[OK]" } else { "[FAIL]" }
}

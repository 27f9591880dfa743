//! # Summaries
//!
//! Text for production tickets and the render model handed to document
//! generation. Everything here reads computed values; nothing is
//! recalculated, so a printed proposal always matches the quote.
//!
//! ## Example
//!
//! ```rust
//! use quote_core::calculations::{LineSpec, StandardLine};
//! use quote_core::catalog::{CatalogSnapshot, PriceSource};
//! use quote_core::product::{OpeningSpec, ProductConfiguration, ProductFamily};
//! use quote_core::quote::Quote;
//! use quote_core::summary::QuoteSummary;
//!
//! let mut quote = Quote::new("Maria Souza");
//! let spec = LineSpec::Standard(StandardLine {
//!     label: "Sala".to_string(),
//!     opening: OpeningSpec::new(2000.0, 1500.0),
//!     configuration: ProductConfiguration::new(ProductFamily::SlidingWindow, 2).unwrap(),
//!     glass: PriceSource::inline(120.0),
//!     transom_glass: None,
//!     quantity: 1,
//! });
//! quote.add_line(spec, &CatalogSnapshot::default()).unwrap();
//!
//! let summary = QuoteSummary::from_quote(&quote);
//! assert_eq!(summary.lines[0].description, "Sliding window, 2 panels");
//! assert_eq!(summary.grand_total, 363.0);
//! ```

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::{LineSpec, Panel, StandardLine};
use crate::catalog::{Finish, UnitKind};
use crate::product::{CornerJoint, ProductFamily, TrackMode};
use crate::quote::{Quote, QuoteLine};

/// One-line product description, e.g. "Sliding door, 4 panels, embedded track"
pub fn describe(spec: &LineSpec) -> String {
    match spec {
        LineSpec::Standard(line) => describe_standard(line),
        LineSpec::Typology(line) => line.rule.name.clone(),
    }
}

fn describe_standard(line: &StandardLine) -> String {
    let config = &line.configuration;
    let mut parts = vec![format!(
        "{}, {} panel{}",
        config.family,
        config.panel_count,
        if config.panel_count == 1 { "" } else { "s" }
    )];

    if config.family == ProductFamily::SlidingDoor {
        parts.push(
            match config.track {
                TrackMode::Surface => "surface track",
                TrackMode::Embedded => "embedded track",
            }
            .to_string(),
        );
    }
    if config.family == ProductFamily::CornerWindow {
        parts.push(
            match config.corner_joint {
                CornerJoint::Square => "square joint",
                CornerJoint::Post => "corner post",
            }
            .to_string(),
        );
    }
    if config.has_transom() && config.family != ProductFamily::TransomWindow {
        parts.push("with transom".to_string());
    }
    if config.finish != Finish::None {
        parts.push(config.finish.display_name().to_string());
    }
    if config.latch {
        parts.push("with latch".to_string());
    }
    if let Some(kit) = config.kit.as_deref().filter(|k| !k.trim().is_empty()) {
        parts.push(format!("kit {kit}"));
    }
    parts.join(", ")
}

fn opening_text(spec: &LineSpec) -> String {
    match spec {
        LineSpec::Standard(line) => {
            let opening = &line.opening;
            let mut text = format!("{} x {} mm", opening.width_mm, opening.height_mm);
            if let Some(secondary) = opening.secondary_width_mm.filter(|w| *w > 0.0) {
                text.push_str(&format!(" + {secondary} mm side"));
            }
            if line.configuration.has_transom() {
                text.push_str(&format!(", transom {} mm", opening.transom_height().0));
            }
            text
        }
        LineSpec::Typology(line) => format!("{} x {} {}", line.width, line.height, line.rule.unit),
    }
}

fn panel_text(panel: &Panel, assemblies: u32, label: Option<&str>) -> String {
    let name = label.unwrap_or(panel.role.display_name());
    format!(
        "{}x {} {} x {} mm",
        panel.quantity.saturating_mul(assemblies),
        name,
        panel.width_mm,
        panel.height_mm
    )
}

/// Human-readable cut list of a line for the production ticket.
///
/// ```text
/// Sala: Sliding window, 2 panels (x1)
///   Opening 2000 x 1500 mm
///   1x fixed 1000 x 1450 mm
///   1x mobile 1050 x 1500 mm
///   Glass 3.025 m²
/// ```
pub fn cut_summary(line: &QuoteLine) -> String {
    let spec = &line.spec;
    let assemblies = spec.quantity();
    let title = if spec.label().trim().is_empty() {
        describe(spec)
    } else {
        format!("{}: {}", spec.label(), describe(spec))
    };

    let mut out = vec![
        format!("{title} (x{assemblies})"),
        format!("  Opening {}", opening_text(spec)),
    ];

    let labels = &line.computation.panel_labels;
    for (i, panel) in line.computation.panels.iter().enumerate() {
        let label = labels.get(i).map(String::as_str);
        out.push(format!("  {}", panel_text(panel, assemblies, label)));
    }
    out.push(format!("  Glass {:.3} m²", line.area_m2));

    for item in line.all_items() {
        let amount = match (item.unit_kind, item.length_m) {
            (UnitKind::LinearLength, Some(length)) => format!("{}x {} m", item.quantity, length),
            (UnitKind::Area, _) => format!("{:.3} m²", item.area_m2.unwrap_or(0.0) * item.quantity),
            _ => format!("{} {}", item.quantity, UnitKind::Each),
        };
        out.push(format!("  {}: {}", item.name, amount));
    }

    out.join("\n")
}

/// Attached item as printed on the proposal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSummary {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub subtotal: f64,
}

/// One proposal line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSummary {
    /// 1-based position on the proposal
    pub position: usize,
    pub line_id: Uuid,
    pub label: String,
    pub description: String,
    pub quantity: u32,
    pub panels: Vec<Panel>,
    pub items: Vec<ItemSummary>,
    pub area_m2: f64,
    pub total: f64,
    /// Production-ticket text
    pub cut_summary: String,
}

impl LineSummary {
    /// Build from a committed line
    pub fn from_line(position: usize, line: &QuoteLine) -> Self {
        LineSummary {
            position,
            line_id: line.id,
            label: line.spec.label().to_string(),
            description: describe(&line.spec),
            quantity: line.spec.quantity(),
            panels: line.computation.panels.clone(),
            items: line
                .all_items()
                .map(|item| ItemSummary {
                    name: item.name.clone(),
                    quantity: item.quantity,
                    unit: item.unit_kind.label().to_string(),
                    subtotal: item.subtotal,
                })
                .collect(),
            area_m2: line.area_m2,
            total: line.total,
            cut_summary: cut_summary(line),
        }
    }
}

/// Everything a proposal document prints, already computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteSummary {
    pub quote_id: Uuid,
    pub client: String,
    pub issued: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
    pub currency_code: String,
    pub currency_symbol: String,
    pub lines: Vec<LineSummary>,
    pub total_area_m2: f64,
    pub grand_total: f64,
}

impl QuoteSummary {
    /// Build the render model of a quote
    pub fn from_quote(quote: &Quote) -> Self {
        let issued = quote.meta.modified;
        let lines: Vec<LineSummary> = quote
            .lines
            .iter()
            .enumerate()
            .map(|(i, line)| LineSummary::from_line(i + 1, line))
            .collect();
        let total_area: f64 = lines.iter().map(|l| l.area_m2).sum();

        QuoteSummary {
            quote_id: quote.meta.id,
            client: quote.meta.client.clone(),
            issued,
            valid_until: issued + Duration::days(i64::from(quote.settings.validity_days)),
            currency_code: quote.settings.currency_code.clone(),
            currency_symbol: quote.settings.currency_symbol.clone(),
            lines,
            total_area_m2: crate::calculations::round_area(total_area),
            grand_total: quote.grand_total(),
        }
    }
}

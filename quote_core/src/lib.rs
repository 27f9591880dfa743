//! # quote_core - Glass Fabrication Quoting Engine
//!
//! `quote_core` turns measured openings and product choices into glass cut
//! lists and priced quote lines. All inputs and outputs are
//! JSON-serializable, so a UI, a document renderer or an LLM tool can drive
//! it with plain JSON.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//! - **No Code Execution**: Cut formulas go through a restricted arithmetic parser
//!
//! ## Pipeline
//!
//! ```text
//! raw text ─► measurement ─► topology ─► calculations::panels ─► calculations::pricing
//!                                  └──── formula (typologies) ──┘          │
//!                                              calculations::additives ◄───┘
//!                                                        │
//!                                                  quote::QuoteLine
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use quote_core::calculations::{preview_line, LineSpec, StandardLine};
//! use quote_core::catalog::{CatalogSnapshot, PriceSource};
//! use quote_core::product::{OpeningSpec, ProductConfiguration, ProductFamily};
//!
//! let spec = LineSpec::Standard(StandardLine {
//!     label: "Sala".to_string(),
//!     opening: OpeningSpec::from_raw("2000", "1500"),
//!     configuration: ProductConfiguration::new(ProductFamily::SlidingWindow, 2).unwrap(),
//!     glass: PriceSource::inline(120.0),
//!     transom_glass: None,
//!     quantity: 1,
//! });
//!
//! let preview = preview_line(&spec, &CatalogSnapshot::default());
//! assert!(preview.is_valid());
//! assert_eq!(preview.area_m2, 3.025);
//! assert_eq!(preview.total, 363.0);
//! ```
//!
//! ## Modules
//!
//! - [`measurement`] - Parsing of typed measurements and upward rounding
//! - [`units`] - Type-safe unit wrappers
//! - [`product`] - Product families, configurations and openings
//! - [`catalog`] - Catalog items, lookup and glass finishes
//! - [`topology`] - Cutting strategy resolution
//! - [`calculations`] - Panels, pricing, additive items and the line pipeline
//! - [`formula`] - Restricted formula engine and typology rules
//! - [`quote`] - Quote container, lines and settings
//! - [`summary`] - Cut tickets and the proposal render model
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod catalog;
pub mod errors;
pub mod formula;
pub mod measurement;
pub mod product;
pub mod quote;
pub mod summary;
pub mod topology;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{compute_line, preview_line, LineSpec, StandardLine, TypologyLine};
pub use catalog::{Catalog, CatalogItem, CatalogSnapshot, PriceSource};
pub use errors::{QuoteError, QuoteResult};
pub use quote::{Quote, QuoteLine, QuoteSettings};

//! S-52 presentation library support for MapServer.
//!
//! Reads an OpenCPN style `chartsymbols.xml` catalog (colour tables, symbols, line styles,
//! patterns and lookups), expands the conditional symbology procedures into plain rules and
//! renders mapfile `LAYER` stanzas for S-57 feature types.

pub mod catalog;
pub mod color;
pub mod cs;
pub mod error;
pub mod filter;
pub mod hpgl;
pub mod instruction;
pub mod layer;
pub mod lookup;
pub mod mapfile;
pub mod symbol;
mod values;

pub use catalog::{CatalogOptions, ChartSymbols};
pub use color::{Color, ColorTable};
pub use cs::{CsSettings, MarinerSettings, TopmarkType};
pub use error::ChartSymbolsError;
pub use filter::Filter;
pub use instruction::Instruction;
pub use layer::Layer;
pub use lookup::{DisplayPriority, Geometry, Lookup};
pub use mapfile::MapfileWriter;
pub use symbol::{FillType, Pattern, PatternDefinition, Symbol, VectorSymbol};

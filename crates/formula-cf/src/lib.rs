//! `formula-cf` is the in-memory conditional formatting model.
//!
//! It knows nothing about XML: rules are plain values that an application builds through
//! [`ConditionalFormatting`]'s builder methods, and `formula-cf-xlsx` translates them to
//! and from the SpreadsheetML 2006 and x14 schemas. All types are `serde`-friendly so
//! they can cross IPC boundaries unchanged.

mod address;
mod color;
mod container;
mod date_system;
pub mod formula;
mod icons;
pub mod presets;
mod rule;
mod value_object;

pub use address::{
    format_sqref, parse_sqref, parse_sqref_with_limits, A1ParseError, CellRange, CellRef,
    RangeParseError, SheetLimits, SqrefParseError, EXCEL_MAX_COLS, EXCEL_MAX_ROWS,
};
pub use color::{clamp_tint, Color, ColorRef};
pub use container::ConditionalFormatting;
pub use date_system::DateSystem;
pub use formula::FormulaText;
pub use icons::{Icon, IconSetType};
pub use presets::{ColorScalePreset, DataBarPreset};
pub use rule::*;
pub use value_object::{
    AutoMinMaxKind, BaseCfvoType, Bound, ExtendedCfvoType, ValueKind, ValueObject,
};

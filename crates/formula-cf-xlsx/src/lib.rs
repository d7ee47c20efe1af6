//! SpreadsheetML import/export for the `formula-cf` conditional formatting model.
//!
//! Rules are written in the SpreadsheetML 2006 schema, with Excel 2010 (`x14`) rules
//! added alongside for features the base schema cannot express, and read back from
//! either. Worksheet payloads can be scanned with [`quick_xml`] so only the conditional
//! formatting blocks are ever turned into element trees.

pub mod conditional_formatting;
pub mod xml;

pub use conditional_formatting::{
    parse_worksheet_conditional_formatting, parse_worksheet_conditional_formatting_streaming,
    read_conditional_formatting, rule_from_base, rule_from_extended, rule_id, rule_to_base,
    rule_to_extended, write_conditional_formatting, write_worksheet_conditional_formatting,
    ConditionalFormattingError, ConditionalFormattingStreamingError, ConditionalFormattingXml,
    ExportOptions, ExportReport, ImportedRule, RuleContext, SchemaTarget,
    WorksheetConditionalFormattingXml, RULE_EXT_URI, WORKSHEET_EXT_URI,
};
pub use xml::{QName, XmlDomError, XmlElement, XmlNode};

use formula_cf::ConditionalFormatting;
use serde::{Deserialize, Serialize};

use crate::xml::{empty_element, x14_element, xm_element, XmlElement};

use super::{rule_to_base, rule_to_extended, RuleContext};

/// Which schemas an export may use.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SchemaTarget {
    /// Base rules plus x14 rules for whatever the base schema cannot express.
    #[default]
    Extended,
    /// Base rules only; extended features are written as their base stand-ins.
    BaseOnly,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportOptions {
    #[serde(default)]
    pub target: SchemaTarget,
}

/// What an export could not write faithfully. Informational; the export still succeeds.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportReport {
    /// Priorities of rules that needed the x14 schema but were written base-only.
    pub downgraded: Vec<u32>,
}

impl ExportReport {
    pub fn is_lossless(&self) -> bool {
        self.downgraded.is_empty()
    }

    pub(super) fn extend(&mut self, other: ExportReport) {
        self.downgraded.extend(other.downgraded);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ConditionalFormattingXml {
    /// `<conditionalFormatting sqref="..">` with every rule.
    pub base: XmlElement,
    /// `<x14:conditionalFormatting>` with the rules that need the x14 schema.
    pub extended: Option<XmlElement>,
    pub report: ExportReport,
}

/// Write one block. Extended rules are emitted twice: a base stand-in (so older readers
/// still see something close) and the full x14 rule, linked by id.
pub fn write_conditional_formatting(
    cf: &ConditionalFormatting,
    options: &ExportOptions,
) -> ConditionalFormattingXml {
    write_block(cf, options, 0)
}

pub(super) fn write_block(
    cf: &ConditionalFormatting,
    options: &ExportOptions,
    priority_offset: u32,
) -> ConditionalFormattingXml {
    let ctx = RuleContext {
        priority_offset,
        link_extended: options.target == SchemaTarget::Extended,
        ..RuleContext::for_block(cf)
    };

    let mut base = empty_element("conditionalFormatting");
    if cf.pivot {
        base.set_attr("pivot", "1");
    }
    base.set_attr("sqref", ctx.sqref.clone());

    let mut extended_rules = Vec::new();
    let mut report = ExportReport::default();
    for rule in cf.rules() {
        base.push_child(rule_to_base(rule, &ctx));
        if !rule.is_extended() {
            continue;
        }
        match options.target {
            SchemaTarget::Extended => extended_rules.extend(rule_to_extended(rule, &ctx)),
            SchemaTarget::BaseOnly => {
                log::debug!(
                    "rule {} on {} needs the x14 schema; writing its base stand-in only",
                    ctx.priority(rule),
                    ctx.sqref
                );
                report.downgraded.push(ctx.priority(rule));
            }
        }
    }

    let extended = if extended_rules.is_empty() {
        None
    } else {
        let mut block = x14_element("conditionalFormatting");
        if cf.pivot {
            block.set_attr("pivot", "1");
        }
        for rule in extended_rules {
            block.push_child(rule);
        }
        block.push_child(xm_element("sqref").with_text(ctx.sqref.clone()));
        Some(block)
    };

    ConditionalFormattingXml {
        base,
        extended,
        report,
    }
}

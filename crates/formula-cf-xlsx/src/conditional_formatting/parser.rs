use formula_cf::{
    parse_sqref, CellRange, ConditionalFormatRule, ConditionalFormatting, SqrefParseError,
};

use crate::xml::{XmlDomError, XmlElement, NS_X14};

use super::extended::parse_extended_rule;
use super::id::normalize_rule_id;
use super::rule_from_base;

#[derive(Debug, thiserror::Error)]
pub enum ConditionalFormattingError {
    #[error(transparent)]
    Xml(#[from] XmlDomError),
    #[error("expected <{expected}>, found <{found}>")]
    UnexpectedElement {
        expected: &'static str,
        found: String,
    },
    #[error(transparent)]
    Sqref(#[from] SqrefParseError),
}

/// A rule read from either schema, with the normalized x14 id it carries (the
/// `extLst` link on base rules, the `id` attribute on x14 rules).
#[derive(Clone, Debug, PartialEq)]
pub struct ImportedRule {
    pub rule: ConditionalFormatRule,
    pub id: Option<String>,
}

/// Rebuild one block from its base `<conditionalFormatting>` element and, optionally,
/// the `<x14:conditionalFormatting>` element written for the same target.
///
/// An x14 rule replaces the base rule carrying the same `x14:id`; x14 rules with no
/// base counterpart are added. Rules keep their stored order and priorities are
/// renumbered from 1.
pub fn read_conditional_formatting(
    base: &XmlElement,
    extended: Option<&XmlElement>,
) -> Result<ConditionalFormatting, ConditionalFormattingError> {
    expect_local(base, "conditionalFormatting")?;
    if let Some(extended) = extended {
        expect_local(extended, "conditionalFormatting")?;
    }

    let mut pending: Vec<PendingExtended<'_>> = Vec::new();
    if let Some(extended) = extended {
        collect_extended_block(extended, &mut pending)?;
    }

    let mut block = read_base_block(base, &mut pending)?;
    for ext in pending.iter_mut().filter(|ext| !ext.used) {
        ext.used = true;
        block.rules.push(parse_extended_rule(ext.el, None).rule);
    }
    Ok(block.finish())
}

fn expect_local(
    el: &XmlElement,
    expected: &'static str,
) -> Result<(), ConditionalFormattingError> {
    if el.local_name() == expected {
        Ok(())
    } else {
        Err(ConditionalFormattingError::UnexpectedElement {
            expected,
            found: el.local_name().to_string(),
        })
    }
}

/// An x14 rule waiting to be matched against the base rules.
pub(super) struct PendingExtended<'a> {
    pub(super) el: &'a XmlElement,
    pub(super) id: Option<String>,
    pub(super) ranges: Vec<CellRange>,
    pub(super) pivot: bool,
    pub(super) used: bool,
}

/// Rules of one block before priorities are renumbered.
pub(super) struct BlockRules {
    pub(super) ranges: Vec<CellRange>,
    pub(super) pivot: bool,
    pub(super) rules: Vec<ConditionalFormatRule>,
}

impl BlockRules {
    pub(super) fn finish(mut self) -> ConditionalFormatting {
        self.rules.sort_by_key(|rule| rule.priority);
        let mut cf = ConditionalFormatting::from_rules(self.ranges, self.rules);
        cf.pivot = self.pivot;
        cf
    }
}

pub(super) fn collect_extended_block<'a>(
    block: &'a XmlElement,
    out: &mut Vec<PendingExtended<'a>>,
) -> Result<(), ConditionalFormattingError> {
    let sqref = block.child("sqref").map(XmlElement::text).unwrap_or_default();
    let ranges = parse_sqref(&sqref)?;
    let pivot = super::values::parse_bool(block.attr("pivot"), false);
    for el in block.children_by_local("cfRule") {
        out.push(PendingExtended {
            el,
            id: el.attr("id").map(normalize_rule_id),
            ranges: ranges.clone(),
            pivot,
            used: false,
        });
    }
    Ok(())
}

pub(super) fn read_base_block(
    block: &XmlElement,
    pending: &mut [PendingExtended<'_>],
) -> Result<BlockRules, ConditionalFormattingError> {
    let ranges = parse_sqref(block.attr("sqref").unwrap_or_default())?;
    let pivot = super::values::parse_bool(block.attr("pivot"), false);

    let mut rules = Vec::new();
    for el in block.children_by_local("cfRule") {
        let imported = rule_from_base(el);
        let linked = match &imported.id {
            Some(id) => pending
                .iter_mut()
                .find(|ext| !ext.used && ext.id.as_ref() == Some(id)),
            None => None,
        };
        let rule = match linked {
            Some(ext) => {
                ext.used = true;
                parse_extended_rule(ext.el, Some(&imported.rule)).rule
            }
            None => imported.rule,
        };
        rules.push(rule);
    }

    Ok(BlockRules {
        ranges,
        pivot,
        rules,
    })
}

/// Whether `el` is an x14 (rather than base) `conditionalFormatting` block.
pub(super) fn is_extended_block(el: &XmlElement) -> bool {
    el.name.ns.as_deref() == Some(NS_X14)
}

use formula_cf::ConditionalFormatting;

use crate::xml::{empty_element, x14_element, XmlElement};

use super::parser::{
    collect_extended_block, is_extended_block, read_base_block, BlockRules, PendingExtended,
};
use super::write::write_block;
use super::{ConditionalFormattingError, ExportOptions, ExportReport};

/// Worksheet `ext` uri wrapping `<x14:conditionalFormattings>`.
pub const WORKSHEET_EXT_URI: &str = "{78C0D931-6437-407d-A8EE-F0AAD7539E65}";

#[derive(Clone, Debug, PartialEq)]
pub struct WorksheetConditionalFormattingXml {
    /// `<conditionalFormatting>` elements, in worksheet order.
    pub blocks: Vec<XmlElement>,
    /// `<ext uri="{78C0D931-..}">` for the worksheet's `<extLst>`, when any rule needs it.
    pub ext: Option<XmlElement>,
    pub report: ExportReport,
}

impl WorksheetConditionalFormattingXml {
    /// `ext` wrapped in its own `<extLst>`, for worksheets without other extensions.
    pub fn ext_lst(&self) -> Option<XmlElement> {
        let ext = self.ext.clone()?;
        let mut ext_lst = empty_element("extLst");
        ext_lst.push_child(ext);
        Some(ext_lst)
    }
}

/// Write every block of a worksheet.
///
/// Priorities are worksheet-global: each block's rules continue numbering where the
/// previous block stopped. Empty blocks are skipped.
pub fn write_worksheet_conditional_formatting(
    blocks: &[ConditionalFormatting],
    options: &ExportOptions,
) -> WorksheetConditionalFormattingXml {
    let mut out = WorksheetConditionalFormattingXml {
        blocks: Vec::new(),
        ext: None,
        report: ExportReport::default(),
    };
    let mut extended_blocks = Vec::new();
    let mut priority_offset = 0u32;

    for cf in blocks.iter().filter(|cf| !cf.is_empty()) {
        let written = write_block(cf, options, priority_offset);
        priority_offset += cf.rules().len() as u32;
        out.blocks.push(written.base);
        extended_blocks.extend(written.extended);
        out.report.extend(written.report);
    }

    if !extended_blocks.is_empty() {
        let mut wrapper = x14_element("conditionalFormattings");
        for block in extended_blocks {
            wrapper.push_child(block);
        }
        let mut ext = empty_element("ext");
        ext.set_attr("uri", WORKSHEET_EXT_URI);
        ext.push_child(wrapper);
        out.ext = Some(ext);
    }
    out
}

/// Read every conditional formatting block out of a worksheet payload.
///
/// Base blocks become one container each, in worksheet order; x14 rules are merged into
/// the base rule they are linked to. x14 rules without a base counterpart join the base
/// block with the same ranges, or form a block of their own. Out-of-bounds `sqref` ranges
/// are clamped; blocks whose `sqref` is not A1 text are skipped.
pub fn parse_worksheet_conditional_formatting(
    worksheet_xml: &str,
) -> Result<Vec<ConditionalFormatting>, ConditionalFormattingError> {
    let root = XmlElement::parse(worksheet_xml.as_bytes())?;
    Ok(read_worksheet_blocks(&root))
}

pub(super) fn read_worksheet_blocks(root: &XmlElement) -> Vec<ConditionalFormatting> {
    let mut extended_blocks = Vec::new();
    find_extended_blocks(root, &mut extended_blocks);

    let mut pending: Vec<PendingExtended<'_>> = Vec::new();
    for block in extended_blocks {
        if let Err(err) = collect_extended_block(block, &mut pending) {
            log::warn!("skipping x14 conditional formatting block: {err}");
        }
    }

    let mut blocks: Vec<BlockRules> = Vec::new();
    for el in root
        .children_by_local("conditionalFormatting")
        .filter(|el| !is_extended_block(el))
    {
        match read_base_block(el, &mut pending) {
            Ok(block) => blocks.push(block),
            Err(err) => log::warn!("skipping conditional formatting block: {err}"),
        }
    }

    for ext in pending.iter_mut().filter(|ext| !ext.used) {
        ext.used = true;
        let rule = super::extended::parse_extended_rule(ext.el, None).rule;
        match blocks.iter_mut().find(|b| b.ranges == ext.ranges) {
            Some(block) => block.rules.push(rule),
            None => blocks.push(BlockRules {
                ranges: ext.ranges.clone(),
                pivot: ext.pivot,
                rules: vec![rule],
            }),
        }
    }

    blocks.into_iter().map(BlockRules::finish).collect()
}

fn find_extended_blocks<'a>(el: &'a XmlElement, out: &mut Vec<&'a XmlElement>) {
    for child in el.child_elements() {
        match child.local_name() {
            "conditionalFormatting" if is_extended_block(child) => out.push(child),
            "extLst" | "ext" | "conditionalFormattings" => find_extended_blocks(child, out),
            _ => {}
        }
    }
}

use formula_cf::{format_sqref, CellRef, ConditionalFormatRule, ConditionalFormatting};

use super::rule_id;

/// Where a rule is being written: the block's target and its position among the
/// worksheet's rules.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleContext {
    /// Top-left cell of the block; relative references in synthesized formulas use it.
    pub anchor: CellRef,
    pub sqref: String,
    /// Added to each rule's block-local priority.
    pub priority_offset: u32,
    /// Write the `x14:id` link on base rules that have an extended counterpart.
    pub link_extended: bool,
}

impl RuleContext {
    pub fn for_block(cf: &ConditionalFormatting) -> Self {
        Self {
            anchor: cf.anchor(),
            sqref: format_sqref(&cf.ranges),
            priority_offset: 0,
            link_extended: true,
        }
    }

    pub fn priority(&self, rule: &ConditionalFormatRule) -> u32 {
        rule.priority + self.priority_offset
    }

    pub fn rule_id(&self, rule: &ConditionalFormatRule) -> String {
        rule_id(&self.sqref, self.priority(rule))
    }
}

impl Default for RuleContext {
    fn default() -> Self {
        Self {
            anchor: CellRef::new(1, 1),
            sqref: String::new(),
            priority_offset: 0,
            link_extended: true,
        }
    }
}

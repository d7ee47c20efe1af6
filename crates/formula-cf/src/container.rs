use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::formula::{comparison_value, date_value};
use crate::{
    AboveAverage, AutoMinMaxKind, AverageKind, Bound, CellIsOperator, CellRange, CellRef,
    ColorRef, ColorScale, ColorScalePreset, ColorScaleStop, ConditionalFormatRule, DataBar,
    DataBarPreset, DateSystem, FormulaText, Icon, IconSet, IconSetType, RuleKind, TextPredicate,
    TimePeriod, Top10, ValueObject,
};

/// One conditional formatting block: an ordered rule list applied to a set of ranges.
///
/// Rules are only ever added through [`ConditionalFormatting::append`] (directly or via
/// the builder methods), which mirrors how Excel's rule editor behaves: re-applying
/// the same kind of rule replaces the previous one instead of stacking another.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalFormatting {
    rules: Vec<ConditionalFormatRule>,
    pub ranges: Vec<CellRange>,
    #[serde(default)]
    pub pivot: bool,
}

impl ConditionalFormatting {
    pub fn new(ranges: Vec<CellRange>) -> Self {
        Self {
            rules: Vec::new(),
            ranges,
            pivot: false,
        }
    }

    pub fn for_range(range: CellRange) -> Self {
        Self::new(vec![range])
    }

    /// Rebuild a block from stored rules, keeping their order and renumbering
    /// priorities from 1.
    pub fn from_rules(ranges: Vec<CellRange>, rules: Vec<ConditionalFormatRule>) -> Self {
        let rules = rules
            .into_iter()
            .enumerate()
            .map(|(idx, mut rule)| {
                rule.priority = idx as u32 + 1;
                rule
            })
            .collect();
        Self {
            rules,
            ranges,
            pivot: false,
        }
    }

    pub fn rules(&self) -> &[ConditionalFormatRule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Relative reference cell for synthesized formulas (top-left of the first range).
    pub fn anchor(&self) -> CellRef {
        self.ranges
            .first()
            .map(CellRange::first_cell)
            .unwrap_or(CellRef { row: 1, col: 1 })
    }

    /// Add `rule`, or replace the last rule when it has the same rule type.
    ///
    /// A replacement keeps the slot's priority; an append gets `len + 1`.
    pub fn append(&mut self, mut rule: ConditionalFormatRule) -> &mut ConditionalFormatRule {
        let rule_type = rule.rule_type();
        let replace = self
            .rules
            .last()
            .is_some_and(|last| last.rule_type() == rule_type);

        if replace {
            let idx = self.rules.len() - 1;
            rule.priority = self.rules[idx].priority;
            log::debug!("replacing {} rule at priority {}", rule_type.as_str(), rule.priority);
            self.rules[idx] = rule;
            &mut self.rules[idx]
        } else {
            rule.priority = self.rules.len() as u32 + 1;
            self.rules.push(rule);
            let idx = self.rules.len() - 1;
            &mut self.rules[idx]
        }
    }

    /// Whether any rule needs the x14 schema.
    pub fn requires_extended(&self) -> bool {
        self.rules.iter().any(ConditionalFormatRule::is_extended)
    }

    fn push_kind(&mut self, kind: RuleKind) -> &mut ConditionalFormatRule {
        self.append(ConditionalFormatRule::new(kind))
    }

    // Color scales

    pub fn set_color_scale(&mut self, preset: ColorScalePreset) -> &mut ConditionalFormatRule {
        self.push_kind(RuleKind::ColorScale(preset.to_color_scale()))
    }

    #[allow(clippy::too_many_arguments)]
    pub fn set_custom_2_color_scale(
        &mut self,
        min_kind: AutoMinMaxKind,
        min_value: &str,
        min_color: ColorRef,
        max_kind: AutoMinMaxKind,
        max_value: &str,
        max_color: ColorRef,
    ) -> &mut ConditionalFormatRule {
        let scale = ColorScale::two_color(
            ColorScaleStop {
                value: min_kind.value_object(Bound::Lower, min_value),
                color: min_color,
            },
            ColorScaleStop {
                value: max_kind.value_object(Bound::Upper, max_value),
                color: max_color,
            },
        );
        self.push_kind(RuleKind::ColorScale(scale))
    }

    pub fn set_custom_3_color_scale(
        &mut self,
        min: ColorScaleStop,
        mid: ColorScaleStop,
        max: ColorScaleStop,
    ) -> &mut ConditionalFormatRule {
        self.push_kind(RuleKind::ColorScale(ColorScale::three_color(min, mid, max)))
    }

    // Data bars

    pub fn set_data_bar(&mut self, preset: DataBarPreset) -> &mut ConditionalFormatRule {
        self.push_kind(RuleKind::DataBar(preset.to_data_bar()))
    }

    /// Excel 2010 style data bar (gradient, border, negative and axis colors).
    pub fn set_data_bar_2010(&mut self, preset: DataBarPreset) -> &mut ConditionalFormatRule {
        self.push_kind(RuleKind::DataBar(preset.to_extended_data_bar()))
    }

    pub fn set_custom_data_bar(
        &mut self,
        min: (AutoMinMaxKind, &str),
        max: (AutoMinMaxKind, &str),
        fill_color: ColorRef,
        show_value: bool,
    ) -> &mut ConditionalFormatRule {
        let mut bar = DataBar::new(fill_color);
        bar.min = min.0.value_object(Bound::Lower, min.1);
        bar.max = max.0.value_object(Bound::Upper, max.1);
        bar.show_value = show_value;
        self.push_kind(RuleKind::DataBar(bar))
    }

    // Icon sets

    pub fn set_icon_set(&mut self, icon_set: IconSetType) -> &mut ConditionalFormatRule {
        self.push_kind(RuleKind::IconSet(IconSet::new(icon_set)))
    }

    /// Icon set with explicit thresholds. A threshold list of the wrong length falls
    /// back to the family defaults.
    pub fn set_custom_icon_set(
        &mut self,
        icon_set: IconSetType,
        reverse: bool,
        show_value: bool,
        thresholds: Vec<ValueObject>,
    ) -> &mut ConditionalFormatRule {
        let mut is = IconSet::new(icon_set);
        is.reverse = reverse;
        is.show_value = show_value;
        if thresholds.len() == icon_set.size() - 1 {
            is.thresholds = thresholds;
        }
        self.push_kind(RuleKind::IconSet(is))
    }

    /// Icon set with per-position icons (lowest bucket first).
    pub fn set_custom_icons(
        &mut self,
        icon_set: IconSetType,
        icons: &[Icon],
    ) -> &mut ConditionalFormatRule {
        let mut is = IconSet::new(icon_set);
        for (position, icon) in icons.iter().enumerate() {
            is.set_icon(position, *icon);
        }
        self.push_kind(RuleKind::IconSet(is))
    }

    // Highlight rules

    pub fn highlight_cells(
        &mut self,
        operator: CellIsOperator,
        value: &str,
    ) -> &mut ConditionalFormatRule {
        self.push_cell_is(operator, vec![comparison_value(value)])
    }

    pub fn highlight_cells_between(
        &mut self,
        operator: CellIsOperator,
        first: &str,
        second: &str,
    ) -> &mut ConditionalFormatRule {
        self.push_cell_is(operator, vec![comparison_value(first), comparison_value(second)])
    }

    pub fn highlight_cells_with_date(
        &mut self,
        operator: CellIsOperator,
        value: NaiveDateTime,
        date_system: DateSystem,
    ) -> &mut ConditionalFormatRule {
        self.push_cell_is(operator, vec![date_value(value, date_system)])
    }

    /// `cellIs` rule with exactly `operator.operand_count()` formulas: extra operands are
    /// dropped, and a missing upper bound repeats the last one.
    fn push_cell_is(
        &mut self,
        operator: CellIsOperator,
        mut formulas: Vec<FormulaText>,
    ) -> &mut ConditionalFormatRule {
        let count = operator.operand_count();
        formulas.truncate(count);
        while formulas.len() < count {
            let last = formulas.last().cloned().unwrap_or_default();
            formulas.push(last);
        }
        self.push_kind(RuleKind::CellIs { operator, formulas })
    }

    pub fn highlight_cells_containing_text(&mut self, text: &str) -> &mut ConditionalFormatRule {
        self.push_text(TextPredicate::Contains, text)
    }

    pub fn highlight_cells_not_containing_text(
        &mut self,
        text: &str,
    ) -> &mut ConditionalFormatRule {
        self.push_text(TextPredicate::NotContains, text)
    }

    pub fn highlight_cells_beginning_with(&mut self, text: &str) -> &mut ConditionalFormatRule {
        self.push_text(TextPredicate::BeginsWith, text)
    }

    pub fn highlight_cells_ending_with(&mut self, text: &str) -> &mut ConditionalFormatRule {
        self.push_text(TextPredicate::EndsWith, text)
    }

    fn push_text(&mut self, predicate: TextPredicate, text: &str) -> &mut ConditionalFormatRule {
        self.push_kind(RuleKind::Text {
            predicate,
            text: text.to_string(),
        })
    }

    pub fn highlight_cells_with_blanks(&mut self, contains: bool) -> &mut ConditionalFormatRule {
        self.push_kind(RuleKind::Blanks { contains })
    }

    pub fn highlight_cells_with_errors(&mut self, contains: bool) -> &mut ConditionalFormatRule {
        self.push_kind(RuleKind::Errors { contains })
    }

    pub fn highlight_cells_with_date_occurring(
        &mut self,
        period: TimePeriod,
    ) -> &mut ConditionalFormatRule {
        self.push_kind(RuleKind::TimePeriod { period })
    }

    pub fn highlight_duplicate_values(&mut self) -> &mut ConditionalFormatRule {
        self.push_kind(RuleKind::DuplicateValues)
    }

    pub fn highlight_unique_values(&mut self) -> &mut ConditionalFormatRule {
        self.push_kind(RuleKind::UniqueValues)
    }

    pub fn highlight_top_items(&mut self, rank: u32, percent: bool) -> &mut ConditionalFormatRule {
        self.push_kind(RuleKind::Top10(Top10 {
            rank,
            percent,
            bottom: false,
        }))
    }

    pub fn highlight_bottom_items(
        &mut self,
        rank: u32,
        percent: bool,
    ) -> &mut ConditionalFormatRule {
        self.push_kind(RuleKind::Top10(Top10 {
            rank,
            percent,
            bottom: true,
        }))
    }

    pub fn highlight_average(&mut self, kind: AverageKind) -> &mut ConditionalFormatRule {
        self.push_kind(RuleKind::AboveAverage(AboveAverage::from(kind)))
    }

    /// Free-form expression rule. Leading blanks and a leading `=` are stripped, as
    /// Excel does.
    pub fn highlight_cells_with_formula(&mut self, formula: &str) -> &mut ConditionalFormatRule {
        let formula = formula.trim_start();
        let formula = formula.strip_prefix('=').unwrap_or(formula);
        self.push_kind(RuleKind::Expression {
            formula: FormulaText::new(formula),
        })
    }
}

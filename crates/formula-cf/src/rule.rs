use serde::{Deserialize, Serialize};

use crate::{ColorRef, FormulaText, Icon, IconSetType, ValueObject};

/// `ST_CfType`: the `type` attribute of a `<cfRule>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RuleType {
    Expression,
    CellIs,
    ColorScale,
    DataBar,
    IconSet,
    Top10,
    UniqueValues,
    DuplicateValues,
    ContainsText,
    NotContainsText,
    BeginsWith,
    EndsWith,
    ContainsBlanks,
    NotContainsBlanks,
    ContainsErrors,
    NotContainsErrors,
    TimePeriod,
    AboveAverage,
}

impl RuleType {
    pub const ALL: [RuleType; 18] = [
        RuleType::Expression,
        RuleType::CellIs,
        RuleType::ColorScale,
        RuleType::DataBar,
        RuleType::IconSet,
        RuleType::Top10,
        RuleType::UniqueValues,
        RuleType::DuplicateValues,
        RuleType::ContainsText,
        RuleType::NotContainsText,
        RuleType::BeginsWith,
        RuleType::EndsWith,
        RuleType::ContainsBlanks,
        RuleType::NotContainsBlanks,
        RuleType::ContainsErrors,
        RuleType::NotContainsErrors,
        RuleType::TimePeriod,
        RuleType::AboveAverage,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RuleType::Expression => "expression",
            RuleType::CellIs => "cellIs",
            RuleType::ColorScale => "colorScale",
            RuleType::DataBar => "dataBar",
            RuleType::IconSet => "iconSet",
            RuleType::Top10 => "top10",
            RuleType::UniqueValues => "uniqueValues",
            RuleType::DuplicateValues => "duplicateValues",
            RuleType::ContainsText => "containsText",
            RuleType::NotContainsText => "notContainsText",
            RuleType::BeginsWith => "beginsWith",
            RuleType::EndsWith => "endsWith",
            RuleType::ContainsBlanks => "containsBlanks",
            RuleType::NotContainsBlanks => "notContainsBlanks",
            RuleType::ContainsErrors => "containsErrors",
            RuleType::NotContainsErrors => "notContainsErrors",
            RuleType::TimePeriod => "timePeriod",
            RuleType::AboveAverage => "aboveAverage",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

/// `ST_ConditionalFormattingOperator` as used by `cellIs` rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CellIsOperator {
    LessThan,
    LessThanOrEqual,
    Equal,
    NotEqual,
    GreaterThanOrEqual,
    GreaterThan,
    Between,
    NotBetween,
}

impl CellIsOperator {
    pub const ALL: [CellIsOperator; 8] = [
        CellIsOperator::LessThan,
        CellIsOperator::LessThanOrEqual,
        CellIsOperator::Equal,
        CellIsOperator::NotEqual,
        CellIsOperator::GreaterThanOrEqual,
        CellIsOperator::GreaterThan,
        CellIsOperator::Between,
        CellIsOperator::NotBetween,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CellIsOperator::LessThan => "lessThan",
            CellIsOperator::LessThanOrEqual => "lessThanOrEqual",
            CellIsOperator::Equal => "equal",
            CellIsOperator::NotEqual => "notEqual",
            CellIsOperator::GreaterThanOrEqual => "greaterThanOrEqual",
            CellIsOperator::GreaterThan => "greaterThan",
            CellIsOperator::Between => "between",
            CellIsOperator::NotBetween => "notBetween",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.as_str() == s)
    }

    /// Number of `<formula>` operands the operator takes.
    pub fn operand_count(self) -> usize {
        match self {
            CellIsOperator::Between | CellIsOperator::NotBetween => 2,
            _ => 1,
        }
    }
}

/// Text predicate rules; each has its own `type` and `operator` values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextPredicate {
    Contains,
    NotContains,
    BeginsWith,
    EndsWith,
}

impl TextPredicate {
    pub fn rule_type(self) -> RuleType {
        match self {
            TextPredicate::Contains => RuleType::ContainsText,
            TextPredicate::NotContains => RuleType::NotContainsText,
            TextPredicate::BeginsWith => RuleType::BeginsWith,
            TextPredicate::EndsWith => RuleType::EndsWith,
        }
    }

    /// The `operator` attribute value written alongside the rule type.
    pub fn operator(self) -> &'static str {
        match self {
            TextPredicate::Contains => "containsText",
            TextPredicate::NotContains => "notContains",
            TextPredicate::BeginsWith => "beginsWith",
            TextPredicate::EndsWith => "endsWith",
        }
    }

    pub fn from_rule_type(t: RuleType) -> Option<Self> {
        match t {
            RuleType::ContainsText => Some(TextPredicate::Contains),
            RuleType::NotContainsText => Some(TextPredicate::NotContains),
            RuleType::BeginsWith => Some(TextPredicate::BeginsWith),
            RuleType::EndsWith => Some(TextPredicate::EndsWith),
            _ => None,
        }
    }
}

/// `ST_TimePeriod`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimePeriod {
    Yesterday,
    Today,
    Tomorrow,
    Last7Days,
    LastWeek,
    ThisWeek,
    NextWeek,
    LastMonth,
    ThisMonth,
    NextMonth,
}

impl TimePeriod {
    pub const ALL: [TimePeriod; 10] = [
        TimePeriod::Yesterday,
        TimePeriod::Today,
        TimePeriod::Tomorrow,
        TimePeriod::Last7Days,
        TimePeriod::LastWeek,
        TimePeriod::ThisWeek,
        TimePeriod::NextWeek,
        TimePeriod::LastMonth,
        TimePeriod::ThisMonth,
        TimePeriod::NextMonth,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TimePeriod::Yesterday => "yesterday",
            TimePeriod::Today => "today",
            TimePeriod::Tomorrow => "tomorrow",
            TimePeriod::Last7Days => "last7Days",
            TimePeriod::LastWeek => "lastWeek",
            TimePeriod::ThisWeek => "thisWeek",
            TimePeriod::NextWeek => "nextWeek",
            TimePeriod::LastMonth => "lastMonth",
            TimePeriod::ThisMonth => "thisMonth",
            TimePeriod::NextMonth => "nextMonth",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == s)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorScaleStop {
    pub value: ValueObject,
    pub color: ColorRef,
}

/// A 2- or 3-stop color gradient.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorScale {
    pub stops: Vec<ColorScaleStop>,
}

impl ColorScale {
    pub fn two_color(min: ColorScaleStop, max: ColorScaleStop) -> Self {
        Self {
            stops: vec![min, max],
        }
    }

    pub fn three_color(min: ColorScaleStop, mid: ColorScaleStop, max: ColorScaleStop) -> Self {
        Self {
            stops: vec![min, mid, max],
        }
    }

    /// Build from parallel lists read out of a file.
    ///
    /// Values and colors are paired up to the shorter list and at most 3 stops are kept.
    /// A missing end is padded with a `min`/`max` stop that reuses the last stop's color,
    /// or opaque white (`FFFFFFFF`) when there are no stops at all, so the result always
    /// has 2 or 3 stops.
    pub fn from_parallel(values: Vec<ValueObject>, colors: Vec<ColorRef>) -> Self {
        let mut stops: Vec<ColorScaleStop> = values
            .into_iter()
            .zip(colors)
            .take(3)
            .map(|(value, color)| ColorScaleStop { value, color })
            .collect();
        let fallback = stops
            .last()
            .map(|s| s.color)
            .unwrap_or(ColorRef::rgb(0xFFFFFF));
        if stops.is_empty() {
            stops.push(ColorScaleStop {
                value: ValueObject::min(),
                color: fallback,
            });
        }
        if stops.len() < 2 {
            stops.push(ColorScaleStop {
                value: ValueObject::max(),
                color: fallback,
            });
        }
        Self { stops }
    }

    pub fn is_extended(&self) -> bool {
        self.stops.iter().any(|s| s.value.kind().is_extended_only())
    }
}

/// Bar direction (x14 `ST_DataBarDirection`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DataBarDirection {
    Context,
    LeftToRight,
    RightToLeft,
}

impl DataBarDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            DataBarDirection::Context => "context",
            DataBarDirection::LeftToRight => "leftToRight",
            DataBarDirection::RightToLeft => "rightToLeft",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "context" => Some(DataBarDirection::Context),
            "leftToRight" => Some(DataBarDirection::LeftToRight),
            "rightToLeft" => Some(DataBarDirection::RightToLeft),
            _ => None,
        }
    }
}

/// Axis placement for negative values (x14 `ST_DataBarAxisPosition`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DataBarAxisPosition {
    Automatic,
    Middle,
    None,
}

impl DataBarAxisPosition {
    pub fn as_str(self) -> &'static str {
        match self {
            DataBarAxisPosition::Automatic => "automatic",
            DataBarAxisPosition::Middle => "middle",
            DataBarAxisPosition::None => "none",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "automatic" => Some(DataBarAxisPosition::Automatic),
            "middle" => Some(DataBarAxisPosition::Middle),
            "none" => Some(DataBarAxisPosition::None),
            _ => None,
        }
    }
}

pub const BASE_DATA_BAR_MIN_LENGTH: u32 = 10;
pub const BASE_DATA_BAR_MAX_LENGTH: u32 = 90;
pub const EXTENDED_DATA_BAR_MIN_LENGTH: u32 = 0;
pub const EXTENDED_DATA_BAR_MAX_LENGTH: u32 = 100;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataBar {
    pub min: ValueObject,
    pub max: ValueObject,
    pub fill_color: ColorRef,
    /// Bar length (percent of the cell width) at the minimum threshold.
    pub min_length: u32,
    pub max_length: u32,
    /// `showValue`: when false only the bar is drawn.
    pub show_value: bool,

    // Everything below is x14 only; setting any of it escalates the rule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<ColorRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative_fill_color: Option<ColorRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative_border_color: Option<ColorRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axis_color: Option<ColorRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradient: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<DataBarDirection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative_bar_color_same_as_positive: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative_bar_border_color_same_as_positive: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axis_position: Option<DataBarAxisPosition>,
}

impl DataBar {
    /// Base-schema bar between the lowest and highest values.
    pub fn new(fill_color: ColorRef) -> Self {
        Self {
            min: ValueObject::min(),
            max: ValueObject::max(),
            fill_color,
            min_length: BASE_DATA_BAR_MIN_LENGTH,
            max_length: BASE_DATA_BAR_MAX_LENGTH,
            show_value: true,
            border_color: None,
            negative_fill_color: None,
            negative_border_color: None,
            axis_color: None,
            border: None,
            gradient: None,
            direction: None,
            negative_bar_color_same_as_positive: None,
            negative_bar_border_color_same_as_positive: None,
            axis_position: None,
        }
    }

    /// x14 bar with automatic thresholds and 0%–100% lengths.
    pub fn new_extended(fill_color: ColorRef) -> Self {
        Self {
            min: ValueObject::auto_min(),
            max: ValueObject::auto_max(),
            min_length: EXTENDED_DATA_BAR_MIN_LENGTH,
            max_length: EXTENDED_DATA_BAR_MAX_LENGTH,
            ..Self::new(fill_color)
        }
    }

    pub fn has_extended_options(&self) -> bool {
        self.border_color.is_some()
            || self.negative_fill_color.is_some()
            || self.negative_border_color.is_some()
            || self.axis_color.is_some()
            || self.border.is_some()
            || self.gradient.is_some()
            || self.direction.is_some()
            || self.negative_bar_color_same_as_positive.is_some()
            || self.negative_bar_border_color_same_as_positive.is_some()
            || self.axis_position.is_some()
    }

    pub fn is_extended(&self) -> bool {
        self.has_extended_options()
            || self.min.kind().is_extended_only()
            || self.max.kind().is_extended_only()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IconSet {
    pub icon_set: IconSetType,
    /// One threshold per icon after the first (`size - 1` entries).
    pub thresholds: Vec<ValueObject>,
    pub reverse: bool,
    pub show_value: bool,
    /// Per-position icons overriding the family defaults (`size` entries).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_icons: Option<Vec<Icon>>,
}

impl IconSet {
    pub fn new(icon_set: IconSetType) -> Self {
        Self {
            icon_set,
            thresholds: icon_set.default_thresholds(),
            reverse: false,
            show_value: true,
            custom_icons: None,
        }
    }

    /// Icon drawn for bucket `position` (0 = lowest values).
    pub fn icon(&self, position: usize) -> Option<Icon> {
        match &self.custom_icons {
            Some(icons) => icons.get(position).copied(),
            None => self.icon_set.default_icons().get(position).copied(),
        }
    }

    /// Assign an icon to a bucket. Out-of-range positions are ignored.
    ///
    /// Any icon that differs from the family default turns on custom icons; when every
    /// position matches the defaults again, custom icons are dropped.
    pub fn set_icon(&mut self, position: usize, icon: Icon) {
        let defaults = self.icon_set.default_icons();
        if position >= defaults.len() {
            return;
        }
        let mut icons = self
            .custom_icons
            .take()
            .unwrap_or_else(|| defaults.to_vec());
        icons.resize(defaults.len(), Icon::NoIcon);
        icons[position] = icon;
        if icons.as_slice() != defaults {
            self.custom_icons = Some(icons);
        }
    }

    pub fn has_custom_icons(&self) -> bool {
        self.custom_icons.is_some()
    }

    pub fn is_extended(&self) -> bool {
        self.icon_set.is_extended_only()
            || self.custom_icons.is_some()
            || self.thresholds.iter().any(|t| t.kind().is_extended_only())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Top10 {
    pub rank: u32,
    pub percent: bool,
    pub bottom: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AboveAverage {
    pub above: bool,
    pub equal_average: bool,
    /// Number of standard deviations away from the average, if any.
    pub std_dev: Option<u32>,
}

/// User-facing choices offered for above/below average rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AverageKind {
    Above,
    Below,
    EqualOrAbove,
    EqualOrBelow,
    OneStdDevAbove,
    OneStdDevBelow,
    TwoStdDevAbove,
    TwoStdDevBelow,
    ThreeStdDevAbove,
    ThreeStdDevBelow,
}

impl From<AverageKind> for AboveAverage {
    fn from(kind: AverageKind) -> Self {
        let (above, equal_average, std_dev) = match kind {
            AverageKind::Above => (true, false, None),
            AverageKind::Below => (false, false, None),
            AverageKind::EqualOrAbove => (true, true, None),
            AverageKind::EqualOrBelow => (false, true, None),
            AverageKind::OneStdDevAbove => (true, false, Some(1)),
            AverageKind::OneStdDevBelow => (false, false, Some(1)),
            AverageKind::TwoStdDevAbove => (true, false, Some(2)),
            AverageKind::TwoStdDevBelow => (false, false, Some(2)),
            AverageKind::ThreeStdDevAbove => (true, false, Some(3)),
            AverageKind::ThreeStdDevBelow => (false, false, Some(3)),
        };
        AboveAverage {
            above,
            equal_average,
            std_dev,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RuleKind {
    CellIs {
        operator: CellIsOperator,
        formulas: Vec<FormulaText>,
    },
    Expression {
        formula: FormulaText,
    },
    ColorScale(ColorScale),
    DataBar(DataBar),
    IconSet(IconSet),
    Top10(Top10),
    AboveAverage(AboveAverage),
    DuplicateValues,
    UniqueValues,
    TimePeriod {
        period: TimePeriod,
    },
    Text {
        predicate: TextPredicate,
        text: String,
    },
    Blanks {
        contains: bool,
    },
    Errors {
        contains: bool,
    },
}

/// A single conditional formatting rule.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalFormatRule {
    /// 1-based evaluation order; assigned by the owning container.
    pub priority: u32,
    #[serde(default)]
    pub stop_if_true: bool,
    /// Index into the workbook's differential formats (`dxfId`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format_id: Option<u32>,
    pub kind: RuleKind,
}

impl ConditionalFormatRule {
    pub fn new(kind: RuleKind) -> Self {
        Self {
            priority: 1,
            stop_if_true: false,
            format_id: None,
            kind,
        }
    }

    pub fn with_format_id(mut self, format_id: u32) -> Self {
        self.format_id = Some(format_id);
        self
    }

    pub fn rule_type(&self) -> RuleType {
        match &self.kind {
            RuleKind::CellIs { .. } => RuleType::CellIs,
            RuleKind::Expression { .. } => RuleType::Expression,
            RuleKind::ColorScale(_) => RuleType::ColorScale,
            RuleKind::DataBar(_) => RuleType::DataBar,
            RuleKind::IconSet(_) => RuleType::IconSet,
            RuleKind::Top10(_) => RuleType::Top10,
            RuleKind::AboveAverage(_) => RuleType::AboveAverage,
            RuleKind::DuplicateValues => RuleType::DuplicateValues,
            RuleKind::UniqueValues => RuleType::UniqueValues,
            RuleKind::TimePeriod { .. } => RuleType::TimePeriod,
            RuleKind::Text { predicate, .. } => predicate.rule_type(),
            RuleKind::Blanks { contains: true } => RuleType::ContainsBlanks,
            RuleKind::Blanks { contains: false } => RuleType::NotContainsBlanks,
            RuleKind::Errors { contains: true } => RuleType::ContainsErrors,
            RuleKind::Errors { contains: false } => RuleType::NotContainsErrors,
        }
    }

    /// Whether the rule uses anything the SpreadsheetML 2006 schema cannot express.
    pub fn is_extended(&self) -> bool {
        match &self.kind {
            RuleKind::ColorScale(cs) => cs.is_extended(),
            RuleKind::DataBar(db) => db.is_extended(),
            RuleKind::IconSet(is) => is.is_extended(),
            _ => false,
        }
    }

    /// Whether the rule carries a differential format (everything except the visual
    /// color scale / data bar / icon set rules).
    pub fn uses_differential_format(&self) -> bool {
        !matches!(
            self.kind,
            RuleKind::ColorScale(_) | RuleKind::DataBar(_) | RuleKind::IconSet(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ValueKind;

    #[test]
    fn rule_type_names_round_trip() {
        for t in RuleType::ALL {
            assert_eq!(RuleType::parse(t.as_str()), Some(t));
        }
        for p in TimePeriod::ALL {
            assert_eq!(TimePeriod::parse(p.as_str()), Some(p));
        }
        for op in CellIsOperator::ALL {
            assert_eq!(CellIsOperator::parse(op.as_str()), Some(op));
        }
    }

    #[test]
    fn custom_icon_escalates_and_default_reverts() {
        let mut is = IconSet::new(IconSetType::ThreeArrows);
        assert!(!is.is_extended());

        is.set_icon(0, Icon::GoldStar);
        assert!(is.has_custom_icons());
        assert!(is.is_extended());
        assert_eq!(is.icon(0), Some(Icon::GoldStar));
        assert_eq!(is.icon(2), Some(Icon::GreenUpArrow));

        is.set_icon(0, Icon::RedDownArrow);
        assert!(!is.has_custom_icons());
        assert!(!is.is_extended());
    }

    #[test]
    fn default_icon_assignment_is_not_custom() {
        let mut is = IconSet::new(IconSetType::FiveRating);
        is.set_icon(4, Icon::SignalMeterWithFourFilledBars);
        is.set_icon(7, Icon::GoldStar);
        assert!(!is.has_custom_icons());
    }

    #[test]
    fn extended_only_families_escalate() {
        assert!(IconSet::new(IconSetType::ThreeStars).is_extended());
        assert!(IconSet::new(IconSetType::FiveBoxes).is_extended());
        assert!(!IconSet::new(IconSetType::FiveQuarters).is_extended());
    }

    #[test]
    fn data_bar_extended_options() {
        let mut bar = DataBar::new(ColorRef::rgb(0x638EC6));
        assert!(!bar.is_extended());
        bar.direction = Some(DataBarDirection::RightToLeft);
        assert!(bar.is_extended());

        let auto = DataBar::new_extended(ColorRef::rgb(0x638EC6));
        assert!(auto.is_extended());
        assert_eq!(auto.min.kind(), ValueKind::AutoMin);
    }

    #[test]
    fn color_scale_from_parallel_pads_and_truncates() {
        let cs = ColorScale::from_parallel(vec![ValueObject::min()], vec![ColorRef::rgb(1)]);
        assert_eq!(cs.stops.len(), 2);
        assert_eq!(cs.stops[1].value, ValueObject::max());

        let four = vec![ValueObject::min(); 4];
        let colors = vec![ColorRef::rgb(1); 4];
        assert_eq!(ColorScale::from_parallel(four, colors).stops.len(), 3);

        let empty = ColorScale::from_parallel(Vec::new(), Vec::new());
        assert_eq!(empty.stops.len(), 2);
        assert!(empty.stops.iter().all(|s| s.color == ColorRef::rgb(0xFFFFFF)));
    }

    #[test]
    fn blanks_and_errors_map_to_distinct_types() {
        let r = ConditionalFormatRule::new(RuleKind::Blanks { contains: false });
        assert_eq!(r.rule_type(), RuleType::NotContainsBlanks);
        let r = ConditionalFormatRule::new(RuleKind::Errors { contains: true });
        assert_eq!(r.rule_type(), RuleType::ContainsErrors);
    }

    #[test]
    fn rule_serde_shape() {
        let rule = ConditionalFormatRule::new(RuleKind::Top10(Top10 {
            rank: 5,
            percent: false,
            bottom: true,
        }))
        .with_format_id(2);
        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "priority": 1,
                "stopIfTrue": false,
                "formatId": 2,
                "kind": {"type": "top10", "rank": 5, "percent": false, "bottom": true}
            })
        );
        let back: ConditionalFormatRule = serde_json::from_value(json).unwrap();
        assert_eq!(back, rule);
    }
}

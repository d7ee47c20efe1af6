use formula_cf::formula::{
    blanks_formula, errors_formula, text_predicate_formula, time_period_formula,
};
use formula_cf::{
    AboveAverage, CellIsOperator, ColorRef, ColorScale, ConditionalFormatRule, DataBar,
    DataBarPreset, FormulaText, IconSet, IconSetType, RuleKind, RuleType, TextPredicate,
    TimePeriod, Top10, BASE_DATA_BAR_MAX_LENGTH, BASE_DATA_BAR_MIN_LENGTH,
};

use crate::xml::{empty_element, x14_element, XmlElement};

use super::values::{
    base_cfvo, base_color, fit_icon_thresholds, formula_element, leading_icon_threshold,
    parse_bool, parse_cfvos, parse_color, parse_formula, parse_u32,
};
use super::id::normalize_rule_id;
use super::{ImportedRule, RuleContext};

/// `ext` uri under a base `<cfRule>` holding the `x14:id` of its extended counterpart.
pub const RULE_EXT_URI: &str = "{B025F937-C7B1-47D3-B67F-A62EFF666E3E}";

/// Write `rule` as a SpreadsheetML 2006 `<cfRule>`.
///
/// Rules that need the x14 schema are written as their closest base equivalent, with an
/// `x14:id` link to the extended rule when `ctx.link_extended` is set.
pub fn rule_to_base(rule: &ConditionalFormatRule, ctx: &RuleContext) -> XmlElement {
    let mut el = empty_element("cfRule");
    el.set_attr("type", rule.rule_type().as_str());
    if let Some(format_id) = rule.format_id {
        el.set_attr("dxfId", format_id.to_string());
    }
    el.set_attr("priority", ctx.priority(rule).to_string());
    if rule.stop_if_true {
        el.set_attr("stopIfTrue", "1");
    }

    match &rule.kind {
        RuleKind::CellIs { operator, formulas } => {
            el.set_attr("operator", operator.as_str());
            for formula in formulas {
                el.push_child(formula_element(formula));
            }
        }
        RuleKind::Expression { formula } => el.push_child(formula_element(formula)),
        RuleKind::ColorScale(scale) => el.push_child(color_scale_element(scale)),
        RuleKind::DataBar(bar) => el.push_child(data_bar_element(bar)),
        RuleKind::IconSet(icons) => el.push_child(icon_set_element(icons)),
        RuleKind::Top10(top) => {
            if top.percent {
                el.set_attr("percent", "1");
            }
            if top.bottom {
                el.set_attr("bottom", "1");
            }
            el.set_attr("rank", top.rank.to_string());
        }
        RuleKind::AboveAverage(avg) => {
            if !avg.above {
                el.set_attr("aboveAverage", "0");
            }
            if avg.equal_average {
                el.set_attr("equalAverage", "1");
            }
            if let Some(std_dev) = avg.std_dev {
                el.set_attr("stdDev", std_dev.to_string());
            }
        }
        RuleKind::DuplicateValues | RuleKind::UniqueValues => {}
        RuleKind::TimePeriod { period } => {
            el.set_attr("timePeriod", period.as_str());
            let formula = time_period_formula(*period, ctx.anchor);
            el.push_child(formula_element(&FormulaText::new(formula)));
        }
        RuleKind::Text { predicate, text } => {
            el.set_attr("operator", predicate.operator());
            el.set_attr("text", text.clone());
            let formula = text_predicate_formula(*predicate, text, ctx.anchor);
            el.push_child(formula_element(&FormulaText::new(formula)));
        }
        RuleKind::Blanks { contains } => {
            let formula = blanks_formula(*contains, ctx.anchor);
            el.push_child(formula_element(&FormulaText::new(formula)));
        }
        RuleKind::Errors { contains } => {
            let formula = errors_formula(*contains, ctx.anchor);
            el.push_child(formula_element(&FormulaText::new(formula)));
        }
    }

    if ctx.link_extended && rule.is_extended() {
        el.push_child(extended_link(&ctx.rule_id(rule)));
    }
    el
}

fn extended_link(id: &str) -> XmlElement {
    let mut ext = empty_element("ext");
    ext.set_attr("uri", RULE_EXT_URI);
    ext.push_child(x14_element("id").with_text(id));
    let mut ext_lst = empty_element("extLst");
    ext_lst.push_child(ext);
    ext_lst
}

fn color_scale_element(scale: &ColorScale) -> XmlElement {
    let mut el = empty_element("colorScale");
    for stop in &scale.stops {
        el.push_child(base_cfvo(&stop.value));
    }
    for stop in &scale.stops {
        el.push_child(base_color("color", &stop.color));
    }
    el
}

fn data_bar_element(bar: &DataBar) -> XmlElement {
    let mut el = empty_element("dataBar");
    if bar.min_length != BASE_DATA_BAR_MIN_LENGTH {
        el.set_attr("minLength", bar.min_length.to_string());
    }
    if bar.max_length != BASE_DATA_BAR_MAX_LENGTH {
        el.set_attr("maxLength", bar.max_length.to_string());
    }
    if !bar.show_value {
        el.set_attr("showValue", "0");
    }
    el.push_child(base_cfvo(&bar.min));
    el.push_child(base_cfvo(&bar.max));
    el.push_child(base_color("color", &bar.fill_color));
    el
}

fn icon_set_element(icons: &IconSet) -> XmlElement {
    let mut el = empty_element("iconSet");
    el.set_attr("iconSet", icons.icon_set.base_stand_in().as_str());
    if !icons.show_value {
        el.set_attr("showValue", "0");
    }
    if icons.reverse {
        el.set_attr("reverse", "1");
    }
    el.push_child(base_cfvo(&leading_icon_threshold()));
    for threshold in &icons.thresholds {
        el.push_child(base_cfvo(threshold));
    }
    el
}

/// Read a SpreadsheetML 2006 `<cfRule>`.
///
/// Unknown rule types become an `expression` rule over the first formula.
pub fn rule_from_base(el: &XmlElement) -> ImportedRule {
    let formulas: Vec<FormulaText> = el.children_by_local("formula").map(parse_formula).collect();
    let rule_type = el.attr("type").and_then(RuleType::parse);

    let visual = match rule_type {
        Some(RuleType::ColorScale) => el
            .child("colorScale")
            .map(|cs| RuleKind::ColorScale(parse_color_scale(cs))),
        Some(RuleType::DataBar) => el
            .child("dataBar")
            .map(|db| RuleKind::DataBar(parse_data_bar(db))),
        Some(RuleType::IconSet) => el
            .child("iconSet")
            .map(|is| RuleKind::IconSet(parse_icon_set(is))),
        _ => None,
    };
    let kind = visual.unwrap_or_else(|| parse_formula_kind(el, rule_type, formulas));

    ImportedRule {
        rule: parse_rule_header(el, kind),
        id: extended_link_id(el),
    }
}

/// `priority`, `stopIfTrue` and `dxfId` of either schema.
pub(super) fn parse_rule_header(el: &XmlElement, kind: RuleKind) -> ConditionalFormatRule {
    ConditionalFormatRule {
        priority: parse_u32(el.attr("priority")).unwrap_or(0),
        stop_if_true: parse_bool(el.attr("stopIfTrue"), false),
        format_id: parse_u32(el.attr("dxfId")),
        kind,
    }
}

/// Every rule kind that is described by attributes and formulas alone.
pub(super) fn parse_formula_kind(
    el: &XmlElement,
    rule_type: Option<RuleType>,
    mut formulas: Vec<FormulaText>,
) -> RuleKind {
    let Some(rule_type) = rule_type else {
        log::warn!(
            "unsupported conditional formatting rule type {:?}; reading it as an expression",
            el.attr("type")
        );
        return expression_fallback(formulas);
    };

    if let Some(predicate) = TextPredicate::from_rule_type(rule_type) {
        return RuleKind::Text {
            predicate,
            text: el.attr("text").unwrap_or_default().to_string(),
        };
    }

    match rule_type {
        RuleType::CellIs => {
            let operator = match el.attr("operator").and_then(CellIsOperator::parse) {
                Some(op) => op,
                None => {
                    log::warn!(
                        "cellIs rule with operator {:?}; treating as equal",
                        el.attr("operator")
                    );
                    CellIsOperator::Equal
                }
            };
            formulas.truncate(operator.operand_count());
            RuleKind::CellIs { operator, formulas }
        }
        RuleType::Top10 => RuleKind::Top10(Top10 {
            rank: parse_u32(el.attr("rank")).unwrap_or(10),
            percent: parse_bool(el.attr("percent"), false),
            bottom: parse_bool(el.attr("bottom"), false),
        }),
        RuleType::AboveAverage => RuleKind::AboveAverage(AboveAverage {
            above: parse_bool(el.attr("aboveAverage"), true),
            equal_average: parse_bool(el.attr("equalAverage"), false),
            std_dev: parse_u32(el.attr("stdDev")),
        }),
        RuleType::DuplicateValues => RuleKind::DuplicateValues,
        RuleType::UniqueValues => RuleKind::UniqueValues,
        RuleType::ContainsBlanks => RuleKind::Blanks { contains: true },
        RuleType::NotContainsBlanks => RuleKind::Blanks { contains: false },
        RuleType::ContainsErrors => RuleKind::Errors { contains: true },
        RuleType::NotContainsErrors => RuleKind::Errors { contains: false },
        RuleType::TimePeriod => match el.attr("timePeriod").and_then(TimePeriod::parse) {
            Some(period) => RuleKind::TimePeriod { period },
            None => {
                log::warn!(
                    "unknown timePeriod {:?}; reading the rule as an expression",
                    el.attr("timePeriod")
                );
                expression_fallback(formulas)
            }
        },
        // Visual rules whose payload element is missing, and plain expressions.
        _ => expression_fallback(formulas),
    }
}

fn expression_fallback(formulas: Vec<FormulaText>) -> RuleKind {
    RuleKind::Expression {
        formula: formulas.into_iter().next().unwrap_or_default(),
    }
}

fn extended_link_id(el: &XmlElement) -> Option<String> {
    el.child("extLst")?
        .children_by_local("ext")
        .filter(|ext| ext.attr("uri") == Some(RULE_EXT_URI))
        .find_map(|ext| ext.child("id"))
        .map(|id| normalize_rule_id(&id.text()))
}

fn parse_color_scale(el: &XmlElement) -> ColorScale {
    let colors: Vec<ColorRef> = el.children_by_local("color").map(parse_color).collect();
    ColorScale::from_parallel(parse_cfvos(el), colors)
}

fn parse_data_bar(el: &XmlElement) -> DataBar {
    let fill = el
        .child("color")
        .map(parse_color)
        .unwrap_or(ColorRef::literal(DataBarPreset::Blue.fill()));
    let mut bar = DataBar::new(fill);
    let mut cfvos = parse_cfvos(el).into_iter();
    if let Some(min) = cfvos.next() {
        bar.min = min;
    }
    if let Some(max) = cfvos.next() {
        bar.max = max;
    }
    bar.min_length = parse_u32(el.attr("minLength")).unwrap_or(BASE_DATA_BAR_MIN_LENGTH);
    bar.max_length = parse_u32(el.attr("maxLength")).unwrap_or(BASE_DATA_BAR_MAX_LENGTH);
    bar.show_value = parse_bool(el.attr("showValue"), true);
    bar
}

fn parse_icon_set(el: &XmlElement) -> IconSet {
    let family = parse_icon_set_type(el.attr("iconSet"));
    IconSet {
        icon_set: family,
        thresholds: fit_icon_thresholds(family, parse_cfvos(el)),
        reverse: parse_bool(el.attr("reverse"), false),
        show_value: parse_bool(el.attr("showValue"), true),
        custom_icons: None,
    }
}

/// Missing or unknown families read as `3TrafficLights1`, the schema default.
pub(super) fn parse_icon_set_type(value: Option<&str>) -> IconSetType {
    match value {
        None => IconSetType::ThreeTrafficLights1,
        Some(name) => IconSetType::parse(name).unwrap_or_else(|| {
            log::warn!("unknown icon set `{name}`; using 3TrafficLights1");
            IconSetType::ThreeTrafficLights1
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formula_cf::{CellRef, ColorScalePreset, ValueObject};
    use pretty_assertions::assert_eq;

    fn ctx() -> RuleContext {
        RuleContext {
            anchor: CellRef::new(2, 3),
            sqref: "C2:C20".to_string(),
            ..RuleContext::default()
        }
    }

    fn round_trip(rule: &ConditionalFormatRule) -> ConditionalFormatRule {
        let el = rule_to_base(rule, &ctx());
        let xml = el.to_xml_string().unwrap();
        let parsed = XmlElement::parse(xml.as_bytes()).unwrap();
        rule_from_base(&parsed).rule
    }

    #[test]
    fn text_rule_synthesizes_formula_from_anchor() {
        let rule = ConditionalFormatRule::new(RuleKind::Text {
            predicate: TextPredicate::BeginsWith,
            text: "AB".to_string(),
        });
        let el = rule_to_base(&rule, &ctx());
        assert_eq!(el.attr("type"), Some("beginsWith"));
        assert_eq!(el.attr("operator"), Some("beginsWith"));
        assert_eq!(el.attr("text"), Some("AB"));
        assert_eq!(el.child("formula").unwrap().text(), r#"LEFT(C2,2)="AB""#);
        assert_eq!(round_trip(&rule), rule);
    }

    #[test]
    fn icon_set_writes_leading_zero_threshold() {
        let rule = ConditionalFormatRule::new(RuleKind::IconSet(IconSet::new(
            IconSetType::FourRating,
        )));
        let el = rule_to_base(&rule, &ctx());
        let icon_set = el.child("iconSet").unwrap();
        assert_eq!(icon_set.attr("iconSet"), Some("4Rating"));
        let vals: Vec<_> = icon_set
            .children_by_local("cfvo")
            .map(|c| c.attr("val").unwrap_or_default().to_string())
            .collect();
        assert_eq!(vals, vec!["0", "25", "50", "75"]);
        assert_eq!(round_trip(&rule), rule);
    }

    #[test]
    fn extended_rule_writes_stand_in_and_link() {
        let mut icons = IconSet::new(IconSetType::ThreeStars);
        icons.set_icon(0, formula_cf::Icon::RedFlag);
        let rule = ConditionalFormatRule::new(RuleKind::IconSet(icons));
        let ctx = ctx();
        let el = rule_to_base(&rule, &ctx);
        assert_eq!(
            el.child("iconSet").unwrap().attr("iconSet"),
            Some("3Symbols2")
        );

        let imported = rule_from_base(&el);
        assert_eq!(imported.id, Some(normalize_rule_id(&ctx.rule_id(&rule))));
        let RuleKind::IconSet(read) = imported.rule.kind else {
            panic!("expected icon set");
        };
        assert_eq!(read.icon_set, IconSetType::ThreeSymbols2);
        assert_eq!(read.custom_icons, None);
    }

    #[test]
    fn extended_data_bar_stand_in_keeps_fill_only() {
        let rule = ConditionalFormatRule::new(RuleKind::DataBar(
            DataBarPreset::Green.to_extended_data_bar(),
        ));
        let el = rule_to_base(&rule, &ctx());
        let bar = el.child("dataBar").unwrap();
        let types: Vec<_> = bar
            .children_by_local("cfvo")
            .filter_map(|c| c.attr("type"))
            .collect();
        assert_eq!(types, vec!["min", "max"]);
        assert_eq!(bar.children_by_local("color").count(), 1);
        assert_eq!(bar.attr("minLength"), Some("0"));
        assert_eq!(bar.attr("maxLength"), Some("100"));
    }

    #[test]
    fn base_rules_round_trip() {
        let mut stop_rule = ConditionalFormatRule::new(RuleKind::CellIs {
            operator: CellIsOperator::Between,
            formulas: vec![FormulaText::new("1"), FormulaText::new("\"x\"")],
        })
        .with_format_id(3);
        stop_rule.stop_if_true = true;

        let mut bar = DataBar::new(ColorRef::theme(5, 0.4));
        bar.min = ValueObject::number("-5");
        bar.show_value = false;

        let rules = vec![
            stop_rule,
            ConditionalFormatRule::new(RuleKind::Expression {
                formula: FormulaText {
                    text: " $A1>0 ".to_string(),
                    preserve_space: true,
                },
            }),
            ConditionalFormatRule::new(RuleKind::ColorScale(
                ColorScalePreset::BlueWhiteRed.to_color_scale(),
            )),
            ConditionalFormatRule::new(RuleKind::DataBar(bar)),
            ConditionalFormatRule::new(RuleKind::Top10(Top10 {
                rank: 5,
                percent: true,
                bottom: true,
            })),
            ConditionalFormatRule::new(RuleKind::AboveAverage(AboveAverage {
                above: false,
                equal_average: true,
                std_dev: Some(2),
            })),
            ConditionalFormatRule::new(RuleKind::DuplicateValues),
            ConditionalFormatRule::new(RuleKind::UniqueValues),
            ConditionalFormatRule::new(RuleKind::TimePeriod {
                period: TimePeriod::NextMonth,
            }),
            ConditionalFormatRule::new(RuleKind::Blanks { contains: false }),
            ConditionalFormatRule::new(RuleKind::Errors { contains: true }),
        ];
        for rule in &rules {
            assert!(!rule.is_extended());
            assert_eq!(&round_trip(rule), rule);
        }
    }

    #[test]
    fn unknown_rule_type_reads_as_expression() {
        let mut el = empty_element("cfRule")
            .with_attr("type", "sparkle")
            .with_attr("priority", "4");
        el.push_child(empty_element("formula").with_text("A1=1"));
        let rule = rule_from_base(&el).rule;
        assert_eq!(rule.priority, 4);
        assert_eq!(
            rule.kind,
            RuleKind::Expression {
                formula: FormulaText::new("A1=1")
            }
        );
    }
}

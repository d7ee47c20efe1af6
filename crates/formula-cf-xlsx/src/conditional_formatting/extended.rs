use formula_cf::{
    ColorRef, ColorScale, ConditionalFormatRule, DataBar, DataBarAxisPosition, DataBarDirection,
    FormulaText, Icon, IconSet, RuleKind, RuleType, BASE_DATA_BAR_MAX_LENGTH,
    BASE_DATA_BAR_MIN_LENGTH,
};

use crate::xml::{x14_element, XmlElement};

use super::base::{parse_formula_kind, parse_icon_set_type, parse_rule_header};
use super::values::{
    bool_str, extended_cfvo, extended_color, fit_icon_thresholds, leading_icon_threshold,
    parse_bool, parse_cfvos, parse_color, parse_formula, parse_u32,
};
use super::id::normalize_rule_id;
use super::{ImportedRule, RuleContext};

/// Write `rule` as an `<x14:cfRule>`, or `None` when the base schema already expresses
/// it fully.
pub fn rule_to_extended(rule: &ConditionalFormatRule, ctx: &RuleContext) -> Option<XmlElement> {
    if !rule.is_extended() {
        return None;
    }
    let payload = match &rule.kind {
        RuleKind::ColorScale(scale) => color_scale_element(scale),
        RuleKind::DataBar(bar) => data_bar_element(bar),
        RuleKind::IconSet(icons) => icon_set_element(icons),
        _ => return None,
    };

    let mut el = x14_element("cfRule");
    el.set_attr("type", rule.rule_type().as_str());
    el.set_attr("priority", ctx.priority(rule).to_string());
    if rule.stop_if_true {
        el.set_attr("stopIfTrue", "1");
    }
    el.set_attr("id", ctx.rule_id(rule));
    el.push_child(payload);
    Some(el)
}

fn color_scale_element(scale: &ColorScale) -> XmlElement {
    let mut el = x14_element("colorScale");
    for stop in &scale.stops {
        el.push_child(extended_cfvo(&stop.value));
    }
    for stop in &scale.stops {
        el.push_child(extended_color("color", &stop.color));
    }
    el
}

fn data_bar_element(bar: &DataBar) -> XmlElement {
    let mut el = x14_element("dataBar");
    el.set_attr("minLength", bar.min_length.to_string());
    el.set_attr("maxLength", bar.max_length.to_string());
    if let Some(border) = bar.border {
        el.set_attr("border", bool_str(border));
    }
    if let Some(gradient) = bar.gradient {
        el.set_attr("gradient", bool_str(gradient));
    }
    if let Some(direction) = bar.direction {
        el.set_attr("direction", direction.as_str());
    }
    if let Some(same) = bar.negative_bar_color_same_as_positive {
        el.set_attr("negativeBarColorSameAsPositive", bool_str(same));
    }
    if let Some(same) = bar.negative_bar_border_color_same_as_positive {
        el.set_attr("negativeBarBorderColorSameAsPositive", bool_str(same));
    }
    if let Some(position) = bar.axis_position {
        el.set_attr("axisPosition", position.as_str());
    }

    el.push_child(extended_cfvo(&bar.min));
    el.push_child(extended_cfvo(&bar.max));
    el.push_child(extended_color("fillColor", &bar.fill_color));
    let optional_colors = [
        ("borderColor", &bar.border_color),
        ("negativeFillColor", &bar.negative_fill_color),
        ("negativeBorderColor", &bar.negative_border_color),
        ("axisColor", &bar.axis_color),
    ];
    for (local, color) in optional_colors {
        if let Some(color) = color {
            el.push_child(extended_color(local, color));
        }
    }
    el
}

fn icon_set_element(icons: &IconSet) -> XmlElement {
    let mut el = x14_element("iconSet");
    el.set_attr("iconSet", icons.icon_set.as_str());
    if !icons.show_value {
        el.set_attr("showValue", "0");
    }
    if icons.reverse {
        el.set_attr("reverse", "1");
    }
    if icons.custom_icons.is_some() {
        el.set_attr("custom", "1");
    }

    el.push_child(extended_cfvo(&leading_icon_threshold()));
    for threshold in &icons.thresholds {
        el.push_child(extended_cfvo(threshold));
    }
    for icon in icons.custom_icons.iter().flatten() {
        let (family, id) = icon.position();
        let mut cf_icon = x14_element("cfIcon");
        cf_icon.set_attr("iconSet", family.as_str());
        cf_icon.set_attr("iconId", id.to_string());
        el.push_child(cf_icon);
    }
    el
}

/// Read an `<x14:cfRule>` on its own.
pub fn rule_from_extended(el: &XmlElement) -> ImportedRule {
    parse_extended_rule(el, None)
}

/// Read an `<x14:cfRule>`, taking what the x14 schema does not carry (priority,
/// `stopIfTrue`, `dxfId`, a data bar's `showValue` and default fill) from the linked
/// base rule when there is one.
pub(super) fn parse_extended_rule(
    el: &XmlElement,
    base: Option<&ConditionalFormatRule>,
) -> ImportedRule {
    let rule_type = el.attr("type").and_then(RuleType::parse);
    let visual = match rule_type {
        Some(RuleType::ColorScale) => el
            .child("colorScale")
            .map(|cs| RuleKind::ColorScale(parse_color_scale(cs))),
        Some(RuleType::DataBar) => el.child("dataBar").map(|db| {
            let base_bar = match base.map(|rule| &rule.kind) {
                Some(RuleKind::DataBar(bar)) => Some(bar),
                _ => None,
            };
            RuleKind::DataBar(parse_data_bar(db, base_bar))
        }),
        Some(RuleType::IconSet) => el
            .child("iconSet")
            .map(|is| RuleKind::IconSet(parse_icon_set(is))),
        _ => None,
    };
    let kind = visual.unwrap_or_else(|| {
        let formulas: Vec<FormulaText> = el.children_by_local("f").map(parse_formula).collect();
        parse_formula_kind(el, rule_type, formulas)
    });

    let mut rule = parse_rule_header(el, kind);
    if let Some(base) = base {
        rule.priority = base.priority;
        rule.stop_if_true = base.stop_if_true;
        rule.format_id = base.format_id;
    }
    ImportedRule {
        rule,
        id: el.attr("id").map(normalize_rule_id),
    }
}

fn parse_color_scale(el: &XmlElement) -> ColorScale {
    let colors: Vec<ColorRef> = el.children_by_local("color").map(parse_color).collect();
    ColorScale::from_parallel(parse_cfvos(el), colors)
}

fn parse_data_bar(el: &XmlElement, base: Option<&DataBar>) -> DataBar {
    let fill = match (el.child("fillColor"), base) {
        (Some(color), _) => parse_color(color),
        (None, Some(base)) => base.fill_color,
        (None, None) => ColorRef::literal(formula_cf::DataBarPreset::Blue.fill()),
    };
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
    bar.show_value = base.map_or(true, |b| b.show_value);

    bar.border_color = el.child("borderColor").map(parse_color);
    bar.negative_fill_color = el.child("negativeFillColor").map(parse_color);
    bar.negative_border_color = el.child("negativeBorderColor").map(parse_color);
    bar.axis_color = el.child("axisColor").map(parse_color);

    bar.border = optional_bool(el, "border");
    bar.gradient = optional_bool(el, "gradient");
    bar.direction = el.attr("direction").and_then(|v| {
        let parsed = DataBarDirection::parse(v);
        if parsed.is_none() {
            log::warn!("unknown data bar direction `{v}`; ignoring");
        }
        parsed
    });
    bar.negative_bar_color_same_as_positive =
        optional_bool(el, "negativeBarColorSameAsPositive");
    bar.negative_bar_border_color_same_as_positive =
        optional_bool(el, "negativeBarBorderColorSameAsPositive");
    bar.axis_position = el.attr("axisPosition").and_then(|v| {
        let parsed = DataBarAxisPosition::parse(v);
        if parsed.is_none() {
            log::warn!("unknown data bar axis position `{v}`; ignoring");
        }
        parsed
    });
    bar
}

fn optional_bool(el: &XmlElement, local: &str) -> Option<bool> {
    el.attr(local).map(|v| parse_bool(Some(v), true))
}

fn parse_icon_set(el: &XmlElement) -> IconSet {
    let family = parse_icon_set_type(el.attr("iconSet"));
    let custom_icons = if parse_bool(el.attr("custom"), false) {
        let mut icons: Vec<Icon> = el
            .children_by_local("cfIcon")
            .map(|cf_icon| {
                let icon_family = parse_icon_set_type(cf_icon.attr("iconSet"));
                let id = parse_u32(cf_icon.attr("iconId")).unwrap_or(0);
                Icon::from_position(icon_family, id)
            })
            .collect();
        icons.resize(family.size(), Icon::NoIcon);
        Some(icons)
    } else {
        None
    };

    IconSet {
        icon_set: family,
        thresholds: fit_icon_thresholds(family, parse_cfvos(el)),
        reverse: parse_bool(el.attr("reverse"), false),
        show_value: parse_bool(el.attr("showValue"), true),
        custom_icons,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::NS_X14;
    use formula_cf::{CellRef, DataBarPreset, IconSetType, ValueObject};
    use pretty_assertions::assert_eq;

    fn ctx() -> RuleContext {
        RuleContext {
            anchor: CellRef::new(1, 1),
            sqref: "A1:A10".to_string(),
            ..RuleContext::default()
        }
    }

    fn reparse(el: &XmlElement) -> XmlElement {
        let xml = el.to_xml_string().unwrap();
        XmlElement::parse(xml.as_bytes()).unwrap()
    }

    #[test]
    fn plain_rules_have_no_extended_form() {
        let bar = DataBarPreset::Blue.to_data_bar();
        let rule = ConditionalFormatRule::new(RuleKind::DataBar(bar));
        assert_eq!(rule_to_extended(&rule, &ctx()), None);
    }

    #[test]
    fn data_bar_writes_x14_vocabulary() {
        let rule = ConditionalFormatRule::new(RuleKind::DataBar(
            DataBarPreset::Orange.to_extended_data_bar(),
        ));
        let el = rule_to_extended(&rule, &ctx()).unwrap();
        assert_eq!(el.name.ns.as_deref(), Some(NS_X14));
        assert_eq!(el.attr("type"), Some("dataBar"));
        assert_eq!(el.attr("id"), Some(ctx().rule_id(&rule).as_str()));

        let bar = el.child("dataBar").unwrap();
        assert_eq!(bar.attr("minLength"), Some("0"));
        assert_eq!(bar.attr("maxLength"), Some("100"));
        assert_eq!(bar.attr("border"), Some("1"));
        assert_eq!(bar.attr("gradient"), Some("1"));
        let types: Vec<_> = bar
            .children_by_local("cfvo")
            .filter_map(|c| c.attr("type"))
            .collect();
        assert_eq!(types, vec!["autoMin", "autoMax"]);
        assert_eq!(
            bar.child("fillColor").and_then(|c| c.attr("rgb")),
            Some("FFFFB628")
        );
        assert_eq!(
            bar.child("negativeFillColor").and_then(|c| c.attr("rgb")),
            Some("FFFF0000")
        );

        let read = rule_from_extended(&reparse(&el));
        assert_eq!(read.rule, rule);
        assert_eq!(read.id, Some(normalize_rule_id(&ctx().rule_id(&rule))));
    }

    #[test]
    fn custom_icons_write_cf_icon_positions() {
        let mut icons = IconSet::new(IconSetType::ThreeArrows);
        icons.set_icon(0, Icon::RedFlag);
        icons.reverse = true;
        let rule = ConditionalFormatRule::new(RuleKind::IconSet(icons));
        let el = rule_to_extended(&rule, &ctx()).unwrap();

        let set = el.child("iconSet").unwrap();
        assert_eq!(set.attr("custom"), Some("1"));
        let positions: Vec<_> = set
            .children_by_local("cfIcon")
            .map(|c| {
                (
                    c.attr("iconSet").unwrap().to_string(),
                    c.attr("iconId").unwrap().to_string(),
                )
            })
            .collect();
        assert_eq!(
            positions,
            vec![
                ("3Flags".to_string(), "0".to_string()),
                ("3Arrows".to_string(), "1".to_string()),
                ("3Arrows".to_string(), "2".to_string()),
            ]
        );
        assert_eq!(rule_from_extended(&reparse(&el)).rule, rule);
    }

    #[test]
    fn extended_only_family_round_trips() {
        let rule = ConditionalFormatRule::new(RuleKind::IconSet(IconSet::new(
            IconSetType::FiveBoxes,
        )));
        let el = rule_to_extended(&rule, &ctx()).unwrap();
        assert_eq!(el.child("iconSet").unwrap().attr("iconSet"), Some("5Boxes"));
        assert_eq!(rule_from_extended(&reparse(&el)).rule, rule);
    }

    #[test]
    fn threshold_values_use_xm_f() {
        let mut scale = formula_cf::ColorScalePreset::WhiteRed.to_color_scale();
        scale.stops[0].value = ValueObject::auto_min();
        scale.stops[1].value = ValueObject::formula("$B$1");
        let rule = ConditionalFormatRule::new(RuleKind::ColorScale(scale));
        let el = rule_to_extended(&rule, &ctx()).unwrap();
        let xml = el.to_xml_string().unwrap();
        assert!(
            xml.contains(r#"<x14:cfvo type="formula"><xm:f>$B$1</xm:f></x14:cfvo>"#),
            "{xml}"
        );
        assert_eq!(rule_from_extended(&reparse(&el)).rule, rule);
    }
}

//! Threshold (`cfvo`) and color translation shared by both schemas.

use formula_cf::{
    BaseCfvoType, Color, ColorRef, ExtendedCfvoType, FormulaText, IconSetType, ValueObject,
};

use crate::xml::{empty_element, x14_element, xm_element, XmlElement, NS_X14, NS_XML};

/// `<cfvo type=".." val=".."/>`; `AutoMin`/`AutoMax` degrade to `min`/`max`.
pub(super) fn base_cfvo(value: &ValueObject) -> XmlElement {
    let mut el = empty_element("cfvo");
    el.set_attr("type", BaseCfvoType::from_value_kind(value.kind()).as_str());
    if !value.kind().is_valueless() {
        el.set_attr("val", value.value());
    }
    if !value.inclusive() {
        el.set_attr("gte", "0");
    }
    el
}

/// `<x14:cfvo type=".."><xm:f>..</xm:f></x14:cfvo>`.
pub(super) fn extended_cfvo(value: &ValueObject) -> XmlElement {
    let mut el = x14_element("cfvo");
    el.set_attr(
        "type",
        ExtendedCfvoType::from_value_kind(value.kind()).as_str(),
    );
    if !value.inclusive() {
        el.set_attr("gte", "0");
    }
    if !value.kind().is_valueless() {
        el.push_child(xm_element("f").with_text(value.value()));
    }
    el
}

/// Read a `cfvo` of either schema. The value comes from `val` or an `<xm:f>` child.
pub(super) fn parse_cfvo(el: &XmlElement) -> ValueObject {
    let type_name = el.attr("type").unwrap_or("percentile");
    let kind = if el.name.ns.as_deref() == Some(NS_X14) {
        ExtendedCfvoType::parse(type_name).to_value_kind()
    } else {
        BaseCfvoType::parse(type_name).to_value_kind()
    };
    let value = match el.attr("val") {
        Some(val) => val.to_string(),
        None => el.child("f").map(XmlElement::text).unwrap_or_default(),
    };
    let inclusive = parse_bool(el.attr("gte"), true);
    ValueObject::with_inclusive(kind, value, inclusive)
}

pub(super) fn parse_cfvos(parent: &XmlElement) -> Vec<ValueObject> {
    parent.children_by_local("cfvo").map(parse_cfvo).collect()
}

/// Icon set thresholds as stored in the model: one per icon after the first.
///
/// Files normally list `size` cfvos with a leading `percent 0`; that leading entry is
/// dropped. Lists that fit neither shape fall back to the family defaults.
pub(super) fn fit_icon_thresholds(
    family: IconSetType,
    mut cfvos: Vec<ValueObject>,
) -> Vec<ValueObject> {
    let size = family.size();
    if cfvos.len() == size {
        cfvos.remove(0);
        cfvos
    } else if cfvos.len() + 1 == size {
        cfvos
    } else {
        log::warn!(
            "icon set {} has {} thresholds; using defaults",
            family.as_str(),
            cfvos.len()
        );
        family.default_thresholds()
    }
}

/// The implicit first icon threshold written ahead of the stored ones.
pub(super) fn leading_icon_threshold() -> ValueObject {
    ValueObject::percent("0")
}

pub(super) fn write_color(el: &mut XmlElement, color: &ColorRef) {
    match color {
        ColorRef::Literal { color } => el.set_attr("rgb", color.to_argb_hex()),
        ColorRef::Theme { index, .. } => {
            el.set_attr("theme", index.to_string());
            if let Some(tint) = color.exported_tint() {
                el.set_attr("tint", tint.to_string());
            }
        }
    }
}

pub(super) fn base_color(local: &str, color: &ColorRef) -> XmlElement {
    let mut el = empty_element(local);
    write_color(&mut el, color);
    el
}

pub(super) fn extended_color(local: &str, color: &ColorRef) -> XmlElement {
    let mut el = x14_element(local);
    write_color(&mut el, color);
    el
}

/// Read a color element. Colors this model cannot represent (`indexed`, `auto`,
/// unreadable `rgb`) become black.
pub(super) fn parse_color(el: &XmlElement) -> ColorRef {
    if let Some(rgb) = el.attr("rgb") {
        if let Some(color) = Color::from_hex(rgb) {
            return ColorRef::literal(color);
        }
        log::warn!("unreadable color rgb=`{rgb}`; using black");
        return ColorRef::literal(Color::black());
    }
    if let Some(index) = el.attr("theme").and_then(|v| v.trim().parse::<u32>().ok()) {
        let tint = el
            .attr("tint")
            .and_then(|v| v.trim().parse::<f64>().ok())
            .unwrap_or(0.0);
        return ColorRef::theme(index, tint);
    }
    if let Some(indexed) = el.attr("indexed") {
        log::warn!("indexed color {indexed} is not supported; using black");
    } else if el.attr("auto").is_some() {
        log::warn!("automatic color is not supported; using black");
    } else {
        log::warn!("color element without a value; using black");
    }
    ColorRef::literal(Color::black())
}

pub(super) fn parse_bool(value: Option<&str>, default: bool) -> bool {
    match value.map(str::trim) {
        Some("1") => true,
        Some(v) if v.eq_ignore_ascii_case("true") => true,
        Some("0") => false,
        Some(v) if v.eq_ignore_ascii_case("false") => false,
        _ => default,
    }
}

pub(super) fn parse_u32(value: Option<&str>) -> Option<u32> {
    value.and_then(|v| v.trim().parse().ok())
}

pub(super) fn bool_str(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}

/// `<formula>` (base) with `xml:space="preserve"` when requested.
pub(super) fn formula_element(formula: &FormulaText) -> XmlElement {
    let mut el = empty_element("formula").with_text(formula.text.clone());
    if formula.preserve_space {
        el.set_attr_ns(NS_XML, "space", "preserve");
    }
    el
}

pub(super) fn parse_formula(el: &XmlElement) -> FormulaText {
    FormulaText {
        text: el.text(),
        preserve_space: el.attr_ns(NS_XML, "space") == Some("preserve"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formula_cf::ValueKind;

    #[test]
    fn auto_bounds_degrade_in_base_cfvo() {
        let el = base_cfvo(&ValueObject::auto_min());
        assert_eq!(el.attr("type"), Some("min"));
        assert_eq!(el.attr("val"), None);

        let el = extended_cfvo(&ValueObject::auto_max());
        assert_eq!(el.attr("type"), Some("autoMax"));
        assert!(el.child("f").is_none());
    }

    #[test]
    fn extended_cfvo_value_lives_in_xm_f() {
        let mut value = ValueObject::number("5");
        value.set_inclusive(false);
        let el = extended_cfvo(&value);
        assert_eq!(el.attr("type"), Some("num"));
        assert_eq!(el.attr("gte"), Some("0"));
        assert_eq!(el.child("f").map(XmlElement::text).as_deref(), Some("5"));
        assert_eq!(parse_cfvo(&el), value);
    }

    #[test]
    fn unknown_cfvo_type_falls_back_to_percentile() {
        let el = empty_element("cfvo")
            .with_attr("type", "bogus")
            .with_attr("val", "10");
        let value = parse_cfvo(&el);
        assert_eq!(value.kind(), ValueKind::Percentile);
        assert_eq!(value.value(), "10");
    }

    #[test]
    fn theme_tint_zero_is_omitted() {
        let el = base_color("color", &ColorRef::theme(4, 0.0));
        assert_eq!(el.attr("theme"), Some("4"));
        assert_eq!(el.attr("tint"), None);

        let el = base_color("color", &ColorRef::theme(4, -0.25));
        assert_eq!(el.attr("tint"), Some("-0.25"));
        assert_eq!(parse_color(&el), ColorRef::theme(4, -0.25));
    }

    #[test]
    fn out_of_range_tint_is_clamped_both_ways() {
        let unclamped = ColorRef::Theme { index: 1, tint: 5.0 };
        let el = base_color("color", &unclamped);
        assert_eq!(el.attr("tint"), Some("1"));

        let el = empty_element("color")
            .with_attr("theme", "1")
            .with_attr("tint", "-7.5");
        assert_eq!(parse_color(&el), ColorRef::theme(1, -1.0));
    }

    #[test]
    fn unsupported_colors_become_black() {
        let indexed = empty_element("color").with_attr("indexed", "64");
        assert_eq!(parse_color(&indexed), ColorRef::rgb(0x000000));
        let auto = empty_element("color").with_attr("auto", "1");
        assert_eq!(parse_color(&auto), ColorRef::rgb(0x000000));
    }

    #[test]
    fn icon_thresholds_drop_leading_entry() {
        let family = IconSetType::FourArrows;
        let mut cfvos = vec![leading_icon_threshold()];
        cfvos.extend(family.default_thresholds());
        assert_eq!(
            fit_icon_thresholds(family, cfvos),
            family.default_thresholds()
        );
        assert_eq!(
            fit_icon_thresholds(family, vec![ValueObject::percent("1")]),
            family.default_thresholds()
        );
    }
}

use chrono::NaiveDate;
use formula_cf::{
    AutoMinMaxKind, AverageKind, CellIsOperator, CellRange, ColorRef, ColorScalePreset,
    ConditionalFormatting, DateSystem, FormulaText, Icon, IconSetType, RuleKind, ValueKind,
    ValueObject,
};
use pretty_assertions::assert_eq;

fn block() -> ConditionalFormatting {
    ConditionalFormatting::for_range(CellRange::new(2, 2, 40, 2))
}

#[test]
fn green_yellow_red_preset() {
    let mut cf = block();
    cf.set_color_scale(ColorScalePreset::GreenYellowRed);
    let RuleKind::ColorScale(scale) = &cf.rules()[0].kind else {
        panic!("expected color scale");
    };
    let hex: Vec<String> = scale
        .stops
        .iter()
        .map(|s| match s.color {
            ColorRef::Literal { color } => color.to_rgb_hex(),
            ColorRef::Theme { .. } => unreachable!(),
        })
        .collect();
    assert_eq!(hex, vec!["F8696B", "FFEB84", "63BE7B"]);
    let values: Vec<ValueObject> = scale.stops.iter().map(|s| s.value.clone()).collect();
    assert_eq!(
        values,
        vec![
            ValueObject::min(),
            ValueObject::percentile("50"),
            ValueObject::max()
        ]
    );
}

#[test]
fn quoted_comparison_value() {
    let mut cf = block();
    cf.highlight_cells(CellIsOperator::Equal, r#"He said "hi""#);
    assert_eq!(
        cf.rules()[0].kind,
        RuleKind::CellIs {
            operator: CellIsOperator::Equal,
            formulas: vec![FormulaText::new(r#""He said ""hi""""#)],
        }
    );
}

#[test]
fn date_comparison_uses_serial() {
    let mut cf = block();
    let dt = NaiveDate::from_ymd_opt(2024, 1, 15)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    cf.highlight_cells_with_date(CellIsOperator::GreaterThan, dt, DateSystem::Excel1900);
    let RuleKind::CellIs { formulas, .. } = &cf.rules()[0].kind else {
        panic!("expected cellIs");
    };
    assert_eq!(formulas[0].text, "45306");
}

#[test]
fn fresh_four_icon_rule_thresholds() {
    let mut cf = block();
    cf.set_icon_set(IconSetType::FourTrafficLights);
    let RuleKind::IconSet(is) = &cf.rules()[0].kind else {
        panic!("expected icon set");
    };
    assert_eq!(is.thresholds.len(), 3);
    for (t, expected) in is.thresholds.iter().zip(["25", "50", "75"]) {
        assert_eq!(t.kind(), ValueKind::Percent);
        assert_eq!(t.value(), expected);
        assert!(t.inclusive());
    }
    assert!(!cf.rules()[0].is_extended());
}

#[test]
fn non_default_icon_forces_extended() {
    let mut cf = block();
    cf.set_custom_icons(
        IconSetType::ThreeArrows,
        &[Icon::RedDownArrow, Icon::NoIcon, Icon::GreenUpArrow],
    );
    let rule = &cf.rules()[0];
    assert!(rule.is_extended());
    let RuleKind::IconSet(is) = &rule.kind else {
        panic!("expected icon set");
    };
    assert_eq!(
        is.custom_icons.as_deref(),
        Some(&[Icon::RedDownArrow, Icon::NoIcon, Icon::GreenUpArrow][..])
    );
}

#[test]
fn automatic_data_bar_is_extended() {
    let mut cf = block();
    cf.set_custom_data_bar(
        (AutoMinMaxKind::Automatic, ""),
        (AutoMinMaxKind::Number, "100"),
        ColorRef::theme(5, 1.5),
        true,
    );
    let rule = &cf.rules()[0];
    assert!(rule.is_extended());
    let RuleKind::DataBar(bar) = &rule.kind else {
        panic!("expected data bar");
    };
    assert_eq!(bar.min.kind(), ValueKind::AutoMin);
    assert_eq!(bar.max, ValueObject::number("100"));
    assert_eq!(bar.fill_color, ColorRef::Theme { index: 5, tint: 1.0 });
}

#[test]
fn average_kinds() {
    let mut cf = block();
    cf.highlight_average(AverageKind::TwoStdDevBelow);
    let RuleKind::AboveAverage(avg) = &cf.rules()[0].kind else {
        panic!("expected aboveAverage");
    };
    assert!(!avg.above);
    assert_eq!(avg.std_dev, Some(2));
}

#[test]
fn container_serializes_for_ipc() {
    let mut cf = block();
    cf.pivot = true;
    cf.highlight_cells_beginning_with("AB").format_id = Some(0);
    cf.set_icon_set(IconSetType::ThreeStars);
    let json = serde_json::to_string(&cf).unwrap();
    let back: ConditionalFormatting = serde_json::from_str(&json).unwrap();
    assert_eq!(back, cf);
}

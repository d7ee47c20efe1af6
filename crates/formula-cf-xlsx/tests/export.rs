use formula_cf::{
    CellIsOperator, CellRange, ColorScalePreset, ConditionalFormatting, DataBarPreset, Icon,
    IconSetType,
};
use formula_cf_xlsx::xml::{NS_MAIN, NS_X14, NS_XM};
use formula_cf_xlsx::{
    write_conditional_formatting, write_worksheet_conditional_formatting, ExportOptions,
    SchemaTarget, RULE_EXT_URI, WORKSHEET_EXT_URI,
};
use pretty_assertions::assert_eq;

fn column_a() -> ConditionalFormatting {
    ConditionalFormatting::for_range(CellRange::new(1, 1, 10, 1))
}

#[test]
fn green_yellow_red_writes_three_stops() {
    let mut cf = column_a();
    cf.set_color_scale(ColorScalePreset::GreenYellowRed);

    let out = write_conditional_formatting(&cf, &ExportOptions::default());
    assert_eq!(out.extended, None);
    assert!(out.report.is_lossless());
    assert_eq!(
        out.base.to_xml_string().unwrap(),
        format!(
            concat!(
                r#"<conditionalFormatting xmlns="{}" sqref="A1:A10">"#,
                r#"<cfRule priority="1" type="colorScale"><colorScale>"#,
                r#"<cfvo type="min"/><cfvo type="percentile" val="50"/><cfvo type="max"/>"#,
                r#"<color rgb="FFF8696B"/><color rgb="FFFFEB84"/><color rgb="FF63BE7B"/>"#,
                r#"</colorScale></cfRule></conditionalFormatting>"#
            ),
            NS_MAIN
        )
    );
}

#[test]
fn highlight_rules_write_formula_and_format() {
    let mut cf = ConditionalFormatting::for_range(CellRange::new(2, 2, 8, 3));
    let rule = cf.highlight_cells(CellIsOperator::Equal, r#"He said "hi""#);
    rule.format_id = Some(7);

    let out = write_conditional_formatting(&cf, &ExportOptions::default());
    let rule = out.base.child("cfRule").unwrap();
    assert_eq!(rule.attr("type"), Some("cellIs"));
    assert_eq!(rule.attr("operator"), Some("equal"));
    assert_eq!(rule.attr("dxfId"), Some("7"));
    assert_eq!(
        rule.child("formula").unwrap().text(),
        r#""He said ""hi""""#
    );
    assert_eq!(out.base.attr("sqref"), Some("B2:C8"));
}

#[test]
fn extended_rule_is_written_in_both_schemas() {
    let mut cf = column_a();
    cf.set_data_bar_2010(DataBarPreset::Red);

    let out = write_conditional_formatting(&cf, &ExportOptions::default());
    let base_rule = out.base.child("cfRule").unwrap();
    let link = base_rule
        .child("extLst")
        .and_then(|l| l.child("ext"))
        .unwrap();
    assert_eq!(link.attr("uri"), Some(RULE_EXT_URI));
    let id = link.child("id").unwrap().text();

    let extended = out.extended.expect("x14 block");
    assert_eq!(extended.name.ns.as_deref(), Some(NS_X14));
    let x14_rule = extended.child("cfRule").unwrap();
    assert_eq!(x14_rule.attr("id"), Some(id.as_str()));
    assert_eq!(x14_rule.attr("priority"), Some("1"));
    let sqref = extended.child("sqref").unwrap();
    assert_eq!(sqref.name.ns.as_deref(), Some(NS_XM));
    assert_eq!(sqref.text(), "A1:A10");
}

#[test]
fn base_only_target_reports_downgrades() {
    let mut cf = column_a();
    cf.highlight_top_items(10, false);
    cf.set_custom_icons(
        IconSetType::ThreeArrows,
        &[Icon::RedFlag, Icon::YellowSideArrow, Icon::GreenUpArrow],
    );

    let options = ExportOptions {
        target: SchemaTarget::BaseOnly,
    };
    let out = write_conditional_formatting(&cf, &options);
    assert_eq!(out.extended, None);
    assert_eq!(out.report.downgraded, vec![2]);
    let icon_rule = out.base.children_by_local("cfRule").nth(1).unwrap();
    assert!(icon_rule.child("extLst").is_none());
    assert_eq!(
        icon_rule.child("iconSet").unwrap().attr("iconSet"),
        Some("3Arrows")
    );
}

#[test]
fn worksheet_priorities_continue_across_blocks() {
    let mut first = column_a();
    first.highlight_cells(CellIsOperator::GreaterThan, "5");
    first.set_data_bar_2010(DataBarPreset::Blue);
    let empty = ConditionalFormatting::for_range(CellRange::new(1, 5, 1, 5));
    let mut second = ConditionalFormatting::for_range(CellRange::new(1, 2, 10, 2));
    second.set_icon_set(IconSetType::ThreeStars);

    let out =
        write_worksheet_conditional_formatting(&[first, empty, second], &ExportOptions::default());
    assert_eq!(out.blocks.len(), 2);
    let priorities: Vec<_> = out
        .blocks
        .iter()
        .flat_map(|b| b.children_by_local("cfRule"))
        .map(|r| r.attr("priority").unwrap().to_string())
        .collect();
    assert_eq!(priorities, vec!["1", "2", "3"]);

    let ext = out.ext.as_ref().expect("worksheet ext");
    assert_eq!(ext.attr("uri"), Some(WORKSHEET_EXT_URI));
    let wrapper = ext.child("conditionalFormattings").unwrap();
    let x14_priorities: Vec<_> = wrapper
        .children_by_local("conditionalFormatting")
        .flat_map(|b| b.children_by_local("cfRule"))
        .map(|r| r.attr("priority").unwrap().to_string())
        .collect();
    assert_eq!(x14_priorities, vec!["2", "3"]);
    assert_eq!(out.ext_lst().unwrap().local_name(), "extLst");
}

#[test]
fn export_options_deserialize_with_defaults() {
    let options: ExportOptions = serde_json::from_str("{}").unwrap();
    assert_eq!(options.target, SchemaTarget::Extended);
    let options: ExportOptions = serde_json::from_str(r#"{"target":"baseOnly"}"#).unwrap();
    assert_eq!(options.target, SchemaTarget::BaseOnly);
}

//! Formula text synthesis for conditional formatting rules.
//!
//! Everything here is a pure function: user input goes in, SpreadsheetML formula text
//! comes out. The templates match what Excel writes byte for byte (function casing and
//! parenthesization included), since Excel re-parses them on load.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{CellRef, DateSystem, TextPredicate, TimePeriod};

/// Formula text stored in a `<formula>` element.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormulaText {
    pub text: String,
    /// Written as `xml:space="preserve"` so leading/trailing blanks survive.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub preserve_space: bool,
}

impl FormulaText {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            preserve_space: false,
        }
    }
}

impl From<&str> for FormulaText {
    fn from(text: &str) -> Self {
        FormulaText::new(text)
    }
}

impl From<String> for FormulaText {
    fn from(text: String) -> Self {
        FormulaText::new(text)
    }
}

/// Turn a raw comparison value into formula text.
///
/// Numbers are emitted verbatim. Anything else becomes a string literal with embedded
/// quotes doubled, e.g. `He said "hi"` becomes `"He said ""hi"""`.
pub fn comparison_value(raw: &str) -> FormulaText {
    if looks_numeric(raw) {
        return FormulaText::new(raw);
    }
    FormulaText {
        text: quote_text(raw),
        preserve_space: has_outer_whitespace(raw),
    }
}

/// Wrap `text` in double quotes, doubling any quote characters inside it.
pub fn quote_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for ch in text.chars() {
        if ch == '"' {
            out.push('"');
        }
        out.push(ch);
    }
    out.push('"');
    out
}

/// Date comparison operand: the serial number for `dt` in `system`.
pub fn date_value(dt: NaiveDateTime, system: DateSystem) -> FormulaText {
    FormulaText::new(format_serial(system.datetime_to_serial(dt)))
}

fn format_serial(serial: f64) -> String {
    if serial.fract() == 0.0 {
        format!("{}", serial as i64)
    } else {
        // Sub-second noise from the day fraction is not meaningful to Excel.
        let text = format!("{serial:.10}");
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Formula for a text predicate rule evaluated against `anchor`.
pub fn text_predicate_formula(predicate: TextPredicate, text: &str, anchor: CellRef) -> String {
    let r = anchor.to_a1();
    let quoted = quote_text(text);
    match predicate {
        TextPredicate::Contains => format!("NOT(ISERROR(SEARCH({quoted},{r})))"),
        TextPredicate::NotContains => format!("ISERROR(SEARCH({quoted},{r}))"),
        TextPredicate::BeginsWith => format!("LEFT({r},{})={quoted}", text.chars().count()),
        TextPredicate::EndsWith => format!("RIGHT({r},{})={quoted}", text.chars().count()),
    }
}

pub fn blanks_formula(contains: bool, anchor: CellRef) -> String {
    let r = anchor.to_a1();
    if contains {
        format!("LEN(TRIM({r}))=0")
    } else {
        format!("LEN(TRIM({r}))>0")
    }
}

pub fn errors_formula(contains: bool, anchor: CellRef) -> String {
    let r = anchor.to_a1();
    if contains {
        format!("ISERROR({r})")
    } else {
        format!("NOT(ISERROR({r}))")
    }
}

pub fn time_period_formula(period: TimePeriod, anchor: CellRef) -> String {
    let r = anchor.to_a1();
    match period {
        TimePeriod::Yesterday => format!("FLOOR({r},1)=TODAY()-1"),
        TimePeriod::Today => format!("FLOOR({r},1)=TODAY()"),
        TimePeriod::Tomorrow => format!("FLOOR({r},1)=TODAY()+1"),
        TimePeriod::Last7Days => {
            format!("AND(TODAY()-FLOOR({r},1)<=6,FLOOR({r},1)<=TODAY())")
        }
        TimePeriod::LastWeek => format!(
            "AND(TODAY()-ROUNDDOWN({r},0)>=(WEEKDAY(TODAY())),TODAY()-ROUNDDOWN({r},0)<(WEEKDAY(TODAY())+7))"
        ),
        TimePeriod::ThisWeek => format!(
            "AND(TODAY()-ROUNDDOWN({r},0)<=WEEKDAY(TODAY())-1,ROUNDDOWN({r},0)-TODAY()<=7-WEEKDAY(TODAY()))"
        ),
        TimePeriod::NextWeek => format!(
            "AND(ROUNDDOWN({r},0)-TODAY()>(7-WEEKDAY(TODAY())),ROUNDDOWN({r},0)-TODAY()<(15-WEEKDAY(TODAY())))"
        ),
        TimePeriod::LastMonth => format!(
            "AND(MONTH({r})=MONTH(EDATE(TODAY(),0-1)),YEAR({r})=YEAR(EDATE(TODAY(),0-1)))"
        ),
        TimePeriod::ThisMonth => {
            format!("AND(MONTH({r})=MONTH(TODAY()),YEAR({r})=YEAR(TODAY()))")
        }
        TimePeriod::NextMonth => format!(
            "AND(MONTH({r})=MONTH(EDATE(TODAY(),0+1)),YEAR({r})=YEAR(EDATE(TODAY(),0+1)))"
        ),
    }
}

fn looks_numeric(raw: &str) -> bool {
    // `f64::from_str` also accepts `inf`/`NaN`, which Excel would read as names.
    if raw.is_empty() || raw.chars().any(|c| c.is_alphabetic() && c != 'e' && c != 'E') {
        return false;
    }
    raw.parse::<f64>().is_ok_and(f64::is_finite)
}

fn has_outer_whitespace(raw: &str) -> bool {
    raw.starts_with(char::is_whitespace) || raw.ends_with(char::is_whitespace)
}

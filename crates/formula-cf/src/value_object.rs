use serde::{Deserialize, Serialize};

/// Where a color-scale stop, data-bar end, or icon boundary falls (`cfvo`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueKind {
    Number,
    Percent,
    Percentile,
    Formula,
    Min,
    Max,
    /// Data-bar automatic minimum (x14 only).
    AutoMin,
    /// Data-bar automatic maximum (x14 only).
    AutoMax,
}

impl ValueKind {
    /// Kinds that carry no value text.
    pub fn is_valueless(self) -> bool {
        matches!(
            self,
            ValueKind::Min | ValueKind::Max | ValueKind::AutoMin | ValueKind::AutoMax
        )
    }

    pub fn is_extended_only(self) -> bool {
        matches!(self, ValueKind::AutoMin | ValueKind::AutoMax)
    }
}

/// A threshold descriptor shared by color scales, data bars and icon sets.
///
/// `value` is always empty for the valueless kinds (`Min`, `Max`, `AutoMin`, `AutoMax`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueObject {
    kind: ValueKind,
    value: String,
    /// `gte`: whether the boundary itself belongs to the upper bucket.
    inclusive: bool,
}

impl ValueObject {
    pub fn new(kind: ValueKind, value: impl Into<String>) -> Self {
        Self::with_inclusive(kind, value, true)
    }

    pub fn with_inclusive(kind: ValueKind, value: impl Into<String>, inclusive: bool) -> Self {
        let value = if kind.is_valueless() {
            String::new()
        } else {
            value.into()
        };
        Self {
            kind,
            value,
            inclusive,
        }
    }

    pub fn min() -> Self {
        Self::new(ValueKind::Min, "")
    }

    pub fn max() -> Self {
        Self::new(ValueKind::Max, "")
    }

    pub fn auto_min() -> Self {
        Self::new(ValueKind::AutoMin, "")
    }

    pub fn auto_max() -> Self {
        Self::new(ValueKind::AutoMax, "")
    }

    pub fn number(value: impl Into<String>) -> Self {
        Self::new(ValueKind::Number, value)
    }

    pub fn percent(value: impl Into<String>) -> Self {
        Self::new(ValueKind::Percent, value)
    }

    pub fn percentile(value: impl Into<String>) -> Self {
        Self::new(ValueKind::Percentile, value)
    }

    pub fn formula(value: impl Into<String>) -> Self {
        Self::new(ValueKind::Formula, value)
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn inclusive(&self) -> bool {
        self.inclusive
    }

    pub fn set_inclusive(&mut self, inclusive: bool) {
        self.inclusive = inclusive;
    }

    /// Same threshold re-expressed without x14-only kinds.
    pub fn to_base_compatible(&self) -> Self {
        let kind = match self.kind {
            ValueKind::AutoMin => ValueKind::Min,
            ValueKind::AutoMax => ValueKind::Max,
            other => other,
        };
        Self {
            kind,
            value: self.value.clone(),
            inclusive: self.inclusive,
        }
    }
}

/// Builder-facing threshold selector for the min/max ends of data bars and color scales.
///
/// Superset of the base `cfvo` kinds: `Automatic` lets the application choose, `Value`
/// is the lowest/highest value in the range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AutoMinMaxKind {
    Automatic,
    Value,
    Number,
    Percent,
    Percentile,
    Formula,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    Lower,
    Upper,
}

impl AutoMinMaxKind {
    pub fn to_value_kind(self, bound: Bound) -> ValueKind {
        match (self, bound) {
            (AutoMinMaxKind::Automatic, Bound::Lower) => ValueKind::AutoMin,
            (AutoMinMaxKind::Automatic, Bound::Upper) => ValueKind::AutoMax,
            (AutoMinMaxKind::Value, Bound::Lower) => ValueKind::Min,
            (AutoMinMaxKind::Value, Bound::Upper) => ValueKind::Max,
            (AutoMinMaxKind::Number, _) => ValueKind::Number,
            (AutoMinMaxKind::Percent, _) => ValueKind::Percent,
            (AutoMinMaxKind::Percentile, _) => ValueKind::Percentile,
            (AutoMinMaxKind::Formula, _) => ValueKind::Formula,
        }
    }

    pub fn from_value_kind(kind: ValueKind) -> Self {
        match kind {
            ValueKind::AutoMin | ValueKind::AutoMax => AutoMinMaxKind::Automatic,
            ValueKind::Min | ValueKind::Max => AutoMinMaxKind::Value,
            ValueKind::Number => AutoMinMaxKind::Number,
            ValueKind::Percent => AutoMinMaxKind::Percent,
            ValueKind::Percentile => AutoMinMaxKind::Percentile,
            ValueKind::Formula => AutoMinMaxKind::Formula,
        }
    }

    pub fn value_object(self, bound: Bound, value: impl Into<String>) -> ValueObject {
        ValueObject::new(self.to_value_kind(bound), value)
    }
}

/// `ST_CfvoType` of the SpreadsheetML 2006 schema.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BaseCfvoType {
    Num,
    Percent,
    Max,
    Min,
    Formula,
    Percentile,
}

impl BaseCfvoType {
    pub fn as_str(self) -> &'static str {
        match self {
            BaseCfvoType::Num => "num",
            BaseCfvoType::Percent => "percent",
            BaseCfvoType::Max => "max",
            BaseCfvoType::Min => "min",
            BaseCfvoType::Formula => "formula",
            BaseCfvoType::Percentile => "percentile",
        }
    }

    /// Unknown names fall back to `percentile`.
    pub fn parse(s: &str) -> Self {
        match s {
            "num" => BaseCfvoType::Num,
            "percent" => BaseCfvoType::Percent,
            "max" => BaseCfvoType::Max,
            "min" => BaseCfvoType::Min,
            "formula" => BaseCfvoType::Formula,
            "percentile" => BaseCfvoType::Percentile,
            other => {
                log::warn!("unknown cfvo type `{other}`; treating as percentile");
                BaseCfvoType::Percentile
            }
        }
    }

    pub fn to_value_kind(self) -> ValueKind {
        match self {
            BaseCfvoType::Num => ValueKind::Number,
            BaseCfvoType::Percent => ValueKind::Percent,
            BaseCfvoType::Max => ValueKind::Max,
            BaseCfvoType::Min => ValueKind::Min,
            BaseCfvoType::Formula => ValueKind::Formula,
            BaseCfvoType::Percentile => ValueKind::Percentile,
        }
    }

    /// `AutoMin`/`AutoMax` degrade to `min`/`max`.
    pub fn from_value_kind(kind: ValueKind) -> Self {
        match kind {
            ValueKind::Number => BaseCfvoType::Num,
            ValueKind::Percent => BaseCfvoType::Percent,
            ValueKind::Percentile => BaseCfvoType::Percentile,
            ValueKind::Formula => BaseCfvoType::Formula,
            ValueKind::Min | ValueKind::AutoMin => BaseCfvoType::Min,
            ValueKind::Max | ValueKind::AutoMax => BaseCfvoType::Max,
        }
    }
}

/// `ST_CfvoType` of the x14 schema.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExtendedCfvoType {
    Numeric,
    Percent,
    Max,
    Min,
    Formula,
    Percentile,
    AutoMin,
    AutoMax,
}

impl ExtendedCfvoType {
    pub fn as_str(self) -> &'static str {
        match self {
            ExtendedCfvoType::Numeric => "num",
            ExtendedCfvoType::Percent => "percent",
            ExtendedCfvoType::Max => "max",
            ExtendedCfvoType::Min => "min",
            ExtendedCfvoType::Formula => "formula",
            ExtendedCfvoType::Percentile => "percentile",
            ExtendedCfvoType::AutoMin => "autoMin",
            ExtendedCfvoType::AutoMax => "autoMax",
        }
    }

    /// Unknown names fall back to `percentile`.
    pub fn parse(s: &str) -> Self {
        match s {
            "num" => ExtendedCfvoType::Numeric,
            "percent" => ExtendedCfvoType::Percent,
            "max" => ExtendedCfvoType::Max,
            "min" => ExtendedCfvoType::Min,
            "formula" => ExtendedCfvoType::Formula,
            "percentile" => ExtendedCfvoType::Percentile,
            "autoMin" => ExtendedCfvoType::AutoMin,
            "autoMax" => ExtendedCfvoType::AutoMax,
            other => {
                log::warn!("unknown x14 cfvo type `{other}`; treating as percentile");
                ExtendedCfvoType::Percentile
            }
        }
    }

    pub fn to_value_kind(self) -> ValueKind {
        match self {
            ExtendedCfvoType::Numeric => ValueKind::Number,
            ExtendedCfvoType::Percent => ValueKind::Percent,
            ExtendedCfvoType::Max => ValueKind::Max,
            ExtendedCfvoType::Min => ValueKind::Min,
            ExtendedCfvoType::Formula => ValueKind::Formula,
            ExtendedCfvoType::Percentile => ValueKind::Percentile,
            ExtendedCfvoType::AutoMin => ValueKind::AutoMin,
            ExtendedCfvoType::AutoMax => ValueKind::AutoMax,
        }
    }

    pub fn from_value_kind(kind: ValueKind) -> Self {
        match kind {
            ValueKind::Number => ExtendedCfvoType::Numeric,
            ValueKind::Percent => ExtendedCfvoType::Percent,
            ValueKind::Percentile => ExtendedCfvoType::Percentile,
            ValueKind::Formula => ExtendedCfvoType::Formula,
            ValueKind::Min => ExtendedCfvoType::Min,
            ValueKind::Max => ExtendedCfvoType::Max,
            ValueKind::AutoMin => ExtendedCfvoType::AutoMin,
            ValueKind::AutoMax => ExtendedCfvoType::AutoMax,
        }
    }
}

//! Icon set families and the icons they are made of.

use serde::{Deserialize, Serialize};

use crate::ValueObject;

/// Icon set families (`ST_IconSetType`, plus the x14-only families).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IconSetType {
    ThreeArrows,
    ThreeArrowsGray,
    ThreeFlags,
    ThreeTrafficLights1,
    ThreeTrafficLights2,
    ThreeSigns,
    ThreeSymbols,
    ThreeSymbols2,
    ThreeStars,
    ThreeTriangles,
    FourArrows,
    FourArrowsGray,
    FourRedToBlack,
    FourRating,
    FourTrafficLights,
    FiveArrows,
    FiveArrowsGray,
    FiveRating,
    FiveQuarters,
    FiveBoxes,
    /// Sentinel family used by the x14 schema for "no icon" slots.
    NoIcons,
}

impl IconSetType {
    pub const ALL: [IconSetType; 21] = [
        IconSetType::ThreeArrows,
        IconSetType::ThreeArrowsGray,
        IconSetType::ThreeFlags,
        IconSetType::ThreeTrafficLights1,
        IconSetType::ThreeTrafficLights2,
        IconSetType::ThreeSigns,
        IconSetType::ThreeSymbols,
        IconSetType::ThreeSymbols2,
        IconSetType::ThreeStars,
        IconSetType::ThreeTriangles,
        IconSetType::FourArrows,
        IconSetType::FourArrowsGray,
        IconSetType::FourRedToBlack,
        IconSetType::FourRating,
        IconSetType::FourTrafficLights,
        IconSetType::FiveArrows,
        IconSetType::FiveArrowsGray,
        IconSetType::FiveRating,
        IconSetType::FiveQuarters,
        IconSetType::FiveBoxes,
        IconSetType::NoIcons,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            IconSetType::ThreeArrows => "3Arrows",
            IconSetType::ThreeArrowsGray => "3ArrowsGray",
            IconSetType::ThreeFlags => "3Flags",
            IconSetType::ThreeTrafficLights1 => "3TrafficLights1",
            IconSetType::ThreeTrafficLights2 => "3TrafficLights2",
            IconSetType::ThreeSigns => "3Signs",
            IconSetType::ThreeSymbols => "3Symbols",
            IconSetType::ThreeSymbols2 => "3Symbols2",
            IconSetType::ThreeStars => "3Stars",
            IconSetType::ThreeTriangles => "3Triangles",
            IconSetType::FourArrows => "4Arrows",
            IconSetType::FourArrowsGray => "4ArrowsGray",
            IconSetType::FourRedToBlack => "4RedToBlack",
            IconSetType::FourRating => "4Rating",
            IconSetType::FourTrafficLights => "4TrafficLights",
            IconSetType::FiveArrows => "5Arrows",
            IconSetType::FiveArrowsGray => "5ArrowsGray",
            IconSetType::FiveRating => "5Rating",
            IconSetType::FiveQuarters => "5Quarters",
            IconSetType::FiveBoxes => "5Boxes",
            IconSetType::NoIcons => "NoIcons",
        }
    }

    /// Unknown names resolve to `None`; callers pick their own default.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }

    /// Number of icons (and buckets) in the family.
    pub fn size(self) -> usize {
        match self {
            IconSetType::FourArrows
            | IconSetType::FourArrowsGray
            | IconSetType::FourRedToBlack
            | IconSetType::FourRating
            | IconSetType::FourTrafficLights => 4,
            IconSetType::FiveArrows
            | IconSetType::FiveArrowsGray
            | IconSetType::FiveRating
            | IconSetType::FiveQuarters
            | IconSetType::FiveBoxes => 5,
            _ => 3,
        }
    }

    /// Families the SpreadsheetML 2006 schema cannot express.
    pub fn is_extended_only(self) -> bool {
        matches!(
            self,
            IconSetType::ThreeStars
                | IconSetType::ThreeTriangles
                | IconSetType::FiveBoxes
                | IconSetType::NoIcons
        )
    }

    /// Closest family available in the base schema (identity for base families).
    pub fn base_stand_in(self) -> Self {
        match self {
            IconSetType::ThreeStars => IconSetType::ThreeSymbols2,
            IconSetType::ThreeTriangles => IconSetType::ThreeArrows,
            IconSetType::FiveBoxes => IconSetType::FiveQuarters,
            IconSetType::NoIcons => IconSetType::ThreeTrafficLights1,
            other => other,
        }
    }

    /// Default icons, lowest bucket first.
    pub fn default_icons(self) -> &'static [Icon] {
        use Icon::*;
        match self {
            IconSetType::ThreeArrows => &[RedDownArrow, YellowSideArrow, GreenUpArrow],
            IconSetType::ThreeArrowsGray => &[GrayDownArrow, GraySideArrow, GrayUpArrow],
            IconSetType::ThreeFlags => &[RedFlag, YellowFlag, GreenFlag],
            IconSetType::ThreeTrafficLights1 => &[RedCircle, YellowCircle, GreenCircle],
            IconSetType::ThreeTrafficLights2 => {
                &[RedTrafficLight, YellowTrafficLight, GreenTrafficLight]
            }
            IconSetType::ThreeSigns => &[RedDiamond, YellowTriangle, GreenCircleSign],
            IconSetType::ThreeSymbols => {
                &[RedCrossSymbol, YellowExclamationSymbol, GreenCheckSymbol]
            }
            IconSetType::ThreeSymbols2 => &[RedCross, YellowExclamation, GreenCheck],
            IconSetType::ThreeStars => &[SilverStar, HalfGoldStar, GoldStar],
            IconSetType::ThreeTriangles => &[RedDownTriangle, YellowDash, GreenUpTriangle],
            IconSetType::FourArrows => &[
                RedDownArrow,
                YellowDownInclineArrow,
                YellowUpInclineArrow,
                GreenUpArrow,
            ],
            IconSetType::FourArrowsGray => &[
                GrayDownArrow,
                GrayDownInclineArrow,
                GrayUpInclineArrow,
                GrayUpArrow,
            ],
            IconSetType::FourRedToBlack => &[BlackCircle, GrayCircle, PinkCircle, RedCircleSolid],
            IconSetType::FourRating => &[
                SignalMeterWithOneFilledBar,
                SignalMeterWithTwoFilledBars,
                SignalMeterWithThreeFilledBars,
                SignalMeterWithFourFilledBars,
            ],
            IconSetType::FourTrafficLights => &[
                BlackCircleWithBorder,
                RedCircleWithBorder,
                YellowCircleWithBorder,
                GreenCircleWithBorder,
            ],
            IconSetType::FiveArrows => &[
                RedDownArrow,
                YellowDownInclineArrow,
                YellowSideArrow,
                YellowUpInclineArrow,
                GreenUpArrow,
            ],
            IconSetType::FiveArrowsGray => &[
                GrayDownArrow,
                GrayDownInclineArrow,
                GraySideArrow,
                GrayUpInclineArrow,
                GrayUpArrow,
            ],
            IconSetType::FiveRating => &[
                SignalMeterWithNoFilledBars,
                SignalMeterWithOneFilledBar,
                SignalMeterWithTwoFilledBars,
                SignalMeterWithThreeFilledBars,
                SignalMeterWithFourFilledBars,
            ],
            IconSetType::FiveQuarters => &[
                WhiteCircleAllWhiteQuarters,
                CircleWithThreeWhiteQuarters,
                CircleWithTwoWhiteQuarters,
                CircleWithOneWhiteQuarter,
                BlackCircleQuarters,
            ],
            IconSetType::FiveBoxes => &[
                ZeroFilledBoxes,
                OneFilledBox,
                TwoFilledBoxes,
                ThreeFilledBoxes,
                FourFilledBoxes,
            ],
            IconSetType::NoIcons => &[NoIcon, NoIcon, NoIcon],
        }
    }

    /// Evenly spaced percent thresholds (`33/67`, `25/50/75`, `20/40/60/80`).
    ///
    /// The first icon has no threshold, so this returns `size() - 1` entries.
    pub fn default_thresholds(self) -> Vec<ValueObject> {
        let points: &[&str] = match self.size() {
            4 => &["25", "50", "75"],
            5 => &["20", "40", "60", "80"],
            _ => &["33", "67"],
        };
        points.iter().map(|p| ValueObject::percent(*p)).collect()
    }
}

/// Individual icon identities.
///
/// Icons shared by several families (e.g. the red down arrow) are listed once; their
/// canonical `(family, position)` pair is the first family that uses them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Icon {
    NoIcon,
    RedDownArrow,
    YellowSideArrow,
    GreenUpArrow,
    GrayDownArrow,
    GraySideArrow,
    GrayUpArrow,
    RedFlag,
    YellowFlag,
    GreenFlag,
    RedCircle,
    YellowCircle,
    GreenCircle,
    RedTrafficLight,
    YellowTrafficLight,
    GreenTrafficLight,
    RedDiamond,
    YellowTriangle,
    GreenCircleSign,
    RedCrossSymbol,
    YellowExclamationSymbol,
    GreenCheckSymbol,
    RedCross,
    YellowExclamation,
    GreenCheck,
    SilverStar,
    HalfGoldStar,
    GoldStar,
    RedDownTriangle,
    YellowDash,
    GreenUpTriangle,
    YellowDownInclineArrow,
    YellowUpInclineArrow,
    GrayDownInclineArrow,
    GrayUpInclineArrow,
    BlackCircle,
    GrayCircle,
    PinkCircle,
    RedCircleSolid,
    SignalMeterWithNoFilledBars,
    SignalMeterWithOneFilledBar,
    SignalMeterWithTwoFilledBars,
    SignalMeterWithThreeFilledBars,
    SignalMeterWithFourFilledBars,
    BlackCircleWithBorder,
    RedCircleWithBorder,
    YellowCircleWithBorder,
    GreenCircleWithBorder,
    WhiteCircleAllWhiteQuarters,
    CircleWithThreeWhiteQuarters,
    CircleWithTwoWhiteQuarters,
    CircleWithOneWhiteQuarter,
    BlackCircleQuarters,
    ZeroFilledBoxes,
    OneFilledBox,
    TwoFilledBoxes,
    ThreeFilledBoxes,
    FourFilledBoxes,
}

impl Icon {
    /// The `(iconSet, iconId)` pair written by the x14 schema.
    pub fn position(self) -> (IconSetType, u32) {
        if self == Icon::NoIcon {
            return (IconSetType::NoIcons, 0);
        }
        for family in IconSetType::ALL {
            if let Some(idx) = family.default_icons().iter().position(|i| *i == self) {
                return (family, idx as u32);
            }
        }
        // Every identity above appears in some family's table.
        (IconSetType::NoIcons, 0)
    }

    /// Inverse of [`Icon::position`]; out-of-range ids become [`Icon::NoIcon`].
    pub fn from_position(family: IconSetType, id: u32) -> Self {
        family
            .default_icons()
            .get(id as usize)
            .copied()
            .unwrap_or(Icon::NoIcon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ValueKind;

    #[test]
    fn default_tables_match_family_size() {
        for family in IconSetType::ALL {
            assert_eq!(family.default_icons().len(), family.size(), "{family:?}");
            assert_eq!(family.default_thresholds().len(), family.size() - 1);
            assert_eq!(IconSetType::parse(family.as_str()), Some(family));
        }
        assert_eq!(IconSetType::parse("7Unicorns"), None);
    }

    #[test]
    fn four_icon_defaults() {
        let t = IconSetType::FourRating.default_thresholds();
        let values: Vec<_> = t.iter().map(|v| v.value()).collect();
        assert_eq!(values, vec!["25", "50", "75"]);
        assert!(t.iter().all(|v| v.kind() == ValueKind::Percent && v.inclusive()));
    }

    #[test]
    fn icon_positions_round_trip() {
        assert_eq!(Icon::NoIcon.position(), (IconSetType::NoIcons, 0));
        assert_eq!(Icon::GreenUpArrow.position(), (IconSetType::ThreeArrows, 2));
        assert_eq!(Icon::GoldStar.position(), (IconSetType::ThreeStars, 2));
        for family in IconSetType::ALL {
            for icon in family.default_icons() {
                let (f, id) = icon.position();
                assert_eq!(Icon::from_position(f, id), *icon);
            }
        }
        assert_eq!(Icon::from_position(IconSetType::ThreeArrows, 9), Icon::NoIcon);
    }

    #[test]
    fn extended_only_families_have_base_stand_ins() {
        for family in IconSetType::ALL {
            let stand_in = family.base_stand_in();
            assert!(!stand_in.is_extended_only(), "{family:?}");
        }
    }
}

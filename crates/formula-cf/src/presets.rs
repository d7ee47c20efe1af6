//! Built-in color scales and data bar colors offered by Excel's ribbon galleries.

use serde::{Deserialize, Serialize};

use crate::{Color, ColorRef, ColorScale, ColorScaleStop, DataBar, ValueObject};

const RED: u32 = 0xF8696B;
const YELLOW: u32 = 0xFFEB84;
const GREEN: u32 = 0x63BE7B;
const WHITE: u32 = 0xFCFCFF;
const BLUE: u32 = 0x5A8AC6;
const PALE_YELLOW: u32 = 0xFFEF9C;

/// Named color scales. The name lists colors from the highest value down, so
/// `GreenYellowRed` paints the maximum green and the minimum red.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorScalePreset {
    GreenYellowRed,
    RedYellowGreen,
    BlueYellowRed,
    RedYellowBlue,
    GreenWhiteRed,
    RedWhiteGreen,
    BlueWhiteRed,
    RedWhiteBlue,
    WhiteRed,
    RedWhite,
    GreenWhite,
    WhiteGreen,
    GreenYellow,
    YellowGreen,
    BlueWhite,
    WhiteBlue,
}

impl ColorScalePreset {
    pub const ALL: [ColorScalePreset; 16] = [
        ColorScalePreset::GreenYellowRed,
        ColorScalePreset::RedYellowGreen,
        ColorScalePreset::BlueYellowRed,
        ColorScalePreset::RedYellowBlue,
        ColorScalePreset::GreenWhiteRed,
        ColorScalePreset::RedWhiteGreen,
        ColorScalePreset::BlueWhiteRed,
        ColorScalePreset::RedWhiteBlue,
        ColorScalePreset::WhiteRed,
        ColorScalePreset::RedWhite,
        ColorScalePreset::GreenWhite,
        ColorScalePreset::WhiteGreen,
        ColorScalePreset::GreenYellow,
        ColorScalePreset::YellowGreen,
        ColorScalePreset::BlueWhite,
        ColorScalePreset::WhiteBlue,
    ];

    /// RGB stops ordered from the minimum to the maximum.
    pub const fn stops(self) -> &'static [u32] {
        match self {
            ColorScalePreset::GreenYellowRed => &[RED, YELLOW, GREEN],
            ColorScalePreset::RedYellowGreen => &[GREEN, YELLOW, RED],
            ColorScalePreset::BlueYellowRed => &[RED, YELLOW, BLUE],
            ColorScalePreset::RedYellowBlue => &[BLUE, YELLOW, RED],
            ColorScalePreset::GreenWhiteRed => &[RED, WHITE, GREEN],
            ColorScalePreset::RedWhiteGreen => &[GREEN, WHITE, RED],
            ColorScalePreset::BlueWhiteRed => &[RED, WHITE, BLUE],
            ColorScalePreset::RedWhiteBlue => &[BLUE, WHITE, RED],
            ColorScalePreset::WhiteRed => &[RED, WHITE],
            ColorScalePreset::RedWhite => &[WHITE, RED],
            ColorScalePreset::GreenWhite => &[WHITE, GREEN],
            ColorScalePreset::WhiteGreen => &[GREEN, WHITE],
            ColorScalePreset::GreenYellow => &[PALE_YELLOW, GREEN],
            ColorScalePreset::YellowGreen => &[GREEN, PALE_YELLOW],
            ColorScalePreset::BlueWhite => &[WHITE, BLUE],
            ColorScalePreset::WhiteBlue => &[BLUE, WHITE],
        }
    }

    pub fn to_color_scale(self) -> ColorScale {
        let stops = self.stops();
        let values = if stops.len() == 3 {
            vec![
                ValueObject::min(),
                ValueObject::percentile("50"),
                ValueObject::max(),
            ]
        } else {
            vec![ValueObject::min(), ValueObject::max()]
        };
        let stops = values
            .into_iter()
            .zip(stops.iter())
            .map(|(value, rgb)| ColorScaleStop {
                value,
                color: ColorRef::rgb(*rgb),
            })
            .collect();
        ColorScale { stops }
    }
}

/// Named data bar colors from the gradient/solid fill galleries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataBarPreset {
    Blue,
    Green,
    Red,
    Orange,
    LightBlue,
    Purple,
}

pub const DATA_BAR_NEGATIVE_FILL: Color = Color::from_rgb(0xFF0000);
pub const DATA_BAR_NEGATIVE_BORDER: Color = Color::from_rgb(0xFF0000);
pub const DATA_BAR_AXIS: Color = Color::from_rgb(0x000000);

impl DataBarPreset {
    pub const ALL: [DataBarPreset; 6] = [
        DataBarPreset::Blue,
        DataBarPreset::Green,
        DataBarPreset::Red,
        DataBarPreset::Orange,
        DataBarPreset::LightBlue,
        DataBarPreset::Purple,
    ];

    pub const fn fill(self) -> Color {
        Color::from_rgb(match self {
            DataBarPreset::Blue => 0x638EC6,
            DataBarPreset::Green => 0x63C384,
            DataBarPreset::Red => 0xFF555A,
            DataBarPreset::Orange => 0xFFB628,
            DataBarPreset::LightBlue => 0x008AEF,
            DataBarPreset::Purple => 0xD6007B,
        })
    }

    pub const fn border(self) -> Color {
        self.fill()
    }

    /// Base-schema data bar: fill color only, `min`/`max` thresholds, 10%–90% lengths.
    pub fn to_data_bar(self) -> DataBar {
        DataBar::new(ColorRef::literal(self.fill()))
    }

    /// Excel 2010 style bar: automatic thresholds, full-length bars, gradient fill with
    /// a border, and the fixed negative/axis colors.
    pub fn to_extended_data_bar(self) -> DataBar {
        let mut bar = DataBar::new_extended(ColorRef::literal(self.fill()));
        bar.border_color = Some(ColorRef::literal(self.border()));
        bar.negative_fill_color = Some(ColorRef::literal(DATA_BAR_NEGATIVE_FILL));
        bar.negative_border_color = Some(ColorRef::literal(DATA_BAR_NEGATIVE_BORDER));
        bar.axis_color = Some(ColorRef::literal(DATA_BAR_AXIS));
        bar.border = Some(true);
        bar.gradient = Some(true);
        bar
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ValueKind;

    #[test]
    fn green_yellow_red_stops() {
        let scale = ColorScalePreset::GreenYellowRed.to_color_scale();
        let colors: Vec<_> = scale.stops.iter().map(|s| s.color).collect();
        assert_eq!(
            colors,
            vec![
                ColorRef::rgb(0xF8696B),
                ColorRef::rgb(0xFFEB84),
                ColorRef::rgb(0x63BE7B)
            ]
        );
        let kinds: Vec<_> = scale.stops.iter().map(|s| s.value.kind()).collect();
        assert_eq!(kinds, vec![ValueKind::Min, ValueKind::Percentile, ValueKind::Max]);
        assert_eq!(scale.stops[1].value.value(), "50");
    }

    #[test]
    fn every_preset_is_two_or_three_stops() {
        for preset in ColorScalePreset::ALL {
            let scale = preset.to_color_scale();
            assert!(matches!(scale.stops.len(), 2 | 3), "{preset:?}");
            assert_eq!(scale.stops.first().unwrap().value, ValueObject::min());
            assert_eq!(scale.stops.last().unwrap().value, ValueObject::max());
        }
    }

    #[test]
    fn data_bar_presets() {
        let bar = DataBarPreset::Blue.to_data_bar();
        assert_eq!(bar.fill_color, ColorRef::rgb(0x638EC6));
        assert!(!bar.is_extended());

        let ext = DataBarPreset::Purple.to_extended_data_bar();
        assert!(ext.is_extended());
        assert_eq!(ext.negative_fill_color, Some(ColorRef::rgb(0xFF0000)));
        assert_eq!(ext.axis_color, Some(ColorRef::rgb(0x000000)));
        assert_eq!((ext.min_length, ext.max_length), (0, 100));
    }
}

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Excel workbook date system used to interpret serial date values.
///
/// Excel supports two base date systems:
/// - `Excel1900` (default on Windows; includes the Lotus 1-2-3 leap year bug)
/// - `Excel1904` (default on older Mac versions)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DateSystem {
    #[default]
    #[serde(rename = "excel1900")]
    Excel1900,
    #[serde(rename = "excel1904")]
    Excel1904,
}

impl DateSystem {
    /// Convert a date/time into the serial number Excel stores for it.
    ///
    /// In the 1900 system serial `60` is the phantom 1900-02-29, so every date from
    /// 1900-03-01 onwards is shifted by one day. Dates before the epoch produce
    /// negative serials, which Excel itself would reject; callers quote them as-is.
    pub fn datetime_to_serial(self, dt: NaiveDateTime) -> f64 {
        let (epoch, leap_bug) = match self {
            // Serial 1 is 1900-01-01, so day zero is 1899-12-31.
            DateSystem::Excel1900 => (NaiveDate::from_ymd_opt(1899, 12, 31), true),
            DateSystem::Excel1904 => (NaiveDate::from_ymd_opt(1904, 1, 1), false),
        };
        let Some(epoch) = epoch.and_then(|d| d.and_hms_opt(0, 0, 0)) else {
            return 0.0;
        };

        let elapsed = dt.signed_duration_since(epoch);
        let mut days = elapsed.num_seconds() as f64 / 86_400.0;
        if leap_bug && days >= 60.0 {
            days += 1.0;
        }
        days
    }
}

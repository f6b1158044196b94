//! Display formatting shared by the renderers.
//!
//! Provider timestamps are UTC epoch seconds. To show local wall-clock time
//! the location's offset is added and the result is read back as UTC.

use chrono::{DateTime, Datelike, Timelike, Utc};

pub const WEEK_DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

pub const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Severity tier for one AQI index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AqiLevel {
    pub index: u8,
    pub level: &'static str,
    pub message: &'static str,
}

/// Indexed by `aqi - 1`; ordered from best to worst.
pub const AQI_LEVELS: [AqiLevel; 5] = [
    AqiLevel {
        index: 1,
        level: "Good",
        message: "Air quality is considered satisfactory, and air pollution poses little or no risk",
    },
    AqiLevel {
        index: 2,
        level: "Fair",
        message: "Air quality is acceptable; however, for some pollutants there may be a moderate health concern for a very small number of people who are unusually sensitive to air pollution.",
    },
    AqiLevel {
        index: 3,
        level: "Moderate",
        message: "Members of sensitive groups may experience health effects. The general public is not likely to be affected.",
    },
    AqiLevel {
        index: 4,
        level: "Poor",
        message: "Everyone may begin to experience health effects; members of sensitive groups may experience more serious health effects",
    },
    AqiLevel {
        index: 5,
        level: "Very Poor",
        message: "Health warnings of emergency conditions. The entire population is more likely to be affected.",
    },
];

/// Look up the tier for a provider AQI index. Anything outside 1..=5 has
/// no entry.
pub fn aqi_level(index: u8) -> Option<&'static AqiLevel> {
    usize::from(index)
        .checked_sub(1)
        .and_then(|i| AQI_LEVELS.get(i))
}

fn local_time(unix: i64, timezone: i32) -> DateTime<Utc> {
    DateTime::from_timestamp(unix + i64::from(timezone), 0).unwrap_or_default()
}

/// "Sunday 19, Oct"
pub fn get_date(unix: i64, timezone: i32) -> String {
    let t = local_time(unix, timezone);
    format!(
        "{} {}, {}",
        weekday_name(&t),
        t.day(),
        MONTH_NAMES[t.month0() as usize]
    )
}

/// "Sunday"
pub fn get_weekday(unix: i64, timezone: i32) -> String {
    weekday_name(&local_time(unix, timezone)).to_string()
}

/// "19 Oct"
pub fn get_day_month(unix: i64, timezone: i32) -> String {
    let t = local_time(unix, timezone);
    format!("{} {}", t.day(), MONTH_NAMES[t.month0() as usize])
}

/// "7:05 AM"
pub fn get_time(unix: i64, timezone: i32) -> String {
    let t = local_time(unix, timezone);
    let (period, hour) = twelve_hour(t.hour());
    format!("{}:{:02} {}", hour, t.minute(), period)
}

/// "7 AM"
pub fn get_hours(unix: i64, timezone: i32) -> String {
    let (period, hour) = twelve_hour(local_time(unix, timezone).hour());
    format!("{} {}", hour, period)
}

pub fn mps_to_kmh(mps: f64) -> f64 {
    mps * 3600.0 / 1000.0
}

fn weekday_name(t: &DateTime<Utc>) -> &'static str {
    WEEK_DAY_NAMES[t.weekday().num_days_from_sunday() as usize]
}

fn twelve_hour(hour: u32) -> (&'static str, u32) {
    let period = if hour >= 12 { "PM" } else { "AM" };
    let h = hour % 12;
    (period, if h == 0 { 12 } else { h })
}

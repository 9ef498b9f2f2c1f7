//! Wall-clock display for the dashboard header.

use chrono::{Local, NaiveDateTime};

/// Fallback location when no time zone name is known.
pub const LOCAL_LOCATION: &str = "Local";

/// A snapshot of local time plus the zone it was read in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveClock {
    now: NaiveDateTime,
    zone: Option<String>,
}

impl LiveClock {
    /// Read the current local time and the `TZ` zone name, if set.
    pub fn now() -> Self {
        let zone = std::env::var("TZ")
            .ok()
            .map(|tz| tz.trim_start_matches(':').to_string())
            .filter(|tz| !tz.is_empty());
        Self::at(Local::now().naive_local(), zone)
    }

    pub fn at(now: NaiveDateTime, zone: Option<String>) -> Self {
        Self { now, zone }
    }

    /// Re-read the current local time, keeping the zone.
    pub fn refresh(&mut self) {
        self.now = Local::now().naive_local();
    }

    /// 12-hour time, e.g. `09:05:03 PM`.
    pub fn time_text(&self) -> String {
        self.now.format("%I:%M:%S %p").to_string()
    }

    /// Long date, e.g. `Monday, January 6, 2025`.
    pub fn date_text(&self) -> String {
        self.now.format("%A, %B %-d, %Y").to_string()
    }

    pub fn location_text(&self) -> String {
        self.zone
            .as_deref()
            .map_or_else(|| LOCAL_LOCATION.to_string(), location_from_zone)
    }
}

/// Turn an IANA zone name into `City, Region`.
///
/// `America/Argentina/Buenos_Aires` becomes `Buenos Aires, America`. A name
/// without a region is returned with underscores replaced.
pub fn location_from_zone(zone: &str) -> String {
    let parts: Vec<&str> = zone.split('/').filter(|p| !p.is_empty()).collect();
    match parts.as_slice() {
        [] => LOCAL_LOCATION.to_string(),
        [single] => single.replace('_', " "),
        [region, .., city] => format!("{}, {region}", city.replace('_', " ")),
    }
}

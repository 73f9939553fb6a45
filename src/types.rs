use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors from waqt operations.
#[derive(Debug, Error, Clone, PartialEq, Serialize, Deserialize)]
pub enum WaqtError {
    /// The year/month/day triple does not name a real Gregorian date.
    #[error("Invalid calendar date {year:04}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: u32, day: u32 },

    /// The sun never crosses the horizon at this latitude on this date,
    /// so no schedule exists even after high-latitude fallback.
    #[error("No prayer schedule exists at latitude {latitude}\u{b0} on this date (polar day/night)")]
    UnresolvableSchedule { latitude: f64 },
}

/// Geographic position of the observer, in signed decimal degrees.
///
/// Latitude is positive north, longitude positive east. Out-of-range values
/// are not rejected; they propagate as degenerate results.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4})", self.latitude, self.longitude)
    }
}

/// A proleptic Gregorian calendar day, with no time-of-day component.
///
/// This is the day a schedule is computed for. The engine converts it to a
/// Julian date internally; time zone handling stays with the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateComponents {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl DateComponents {
    pub const fn new(year: i32, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }

    /// Converts to a `NaiveDate`.
    ///
    /// # Errors
    /// Returns `InvalidDate` if the triple names no real date.
    pub fn to_date(self) -> Result<NaiveDate, WaqtError> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day).ok_or(WaqtError::InvalidDate {
            year: self.year,
            month: self.month,
            day: self.day,
        })
    }
}

impl From<NaiveDate> for DateComponents {
    fn from(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month(), date.day())
    }
}

/// The canonical daily prayers.
///
/// `None` is a sentinel meaning "no prayer"; it is returned by schedule
/// lookups for instants before Fajr or after Isha and never carries a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Prayer {
    None,
    Fajr,
    Sunrise,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
}

impl fmt::Display for Prayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Prayer::None => "None",
            Prayer::Fajr => "Fajr",
            Prayer::Sunrise => "Sunrise",
            Prayer::Dhuhr => "Dhuhr",
            Prayer::Asr => "Asr",
            Prayer::Maghrib => "Maghrib",
            Prayer::Isha => "Isha",
        };
        write!(f, "{}", s)
    }
}

/// School of jurisprudence governing the Asr shadow-length ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Madhab {
    Shafi,
    Hanafi,
}

impl Madhab {
    /// Multiple of an object's height its shadow must reach to mark Asr.
    pub fn shadow_length(self) -> f64 {
        match self {
            Madhab::Shafi => 1.0,
            Madhab::Hanafi => 2.0,
        }
    }
}

impl Default for Madhab {
    fn default() -> Self {
        Self::Shafi
    }
}

/// Fallback policy for Fajr and Isha when the twilight angle is never
/// reached, or the solved time falls outside the night.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HighLatitudeRule {
    /// Fajr no earlier, and Isha no later, than the middle of the night.
    MiddleOfTheNight,
    /// Fajr and Isha within the first/last seventh of the night.
    SeventhOfTheNight,
    /// Night fraction proportional to the configured twilight angle
    /// (angle / 60 of the night).
    TwilightAngle,
}

impl Default for HighLatitudeRule {
    fn default() -> Self {
        Self::MiddleOfTheNight
    }
}

/// Whole-minute offsets applied to each prayer, after angle and high-latitude
/// resolution and before rounding. May be negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeAdjustments {
    pub fajr: i64,
    pub sunrise: i64,
    pub dhuhr: i64,
    pub asr: i64,
    pub maghrib: i64,
    pub isha: i64,
}

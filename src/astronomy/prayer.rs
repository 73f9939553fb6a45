//! Prayer Schedule Module.
//!
//! Assembles the six canonical instants for one calendar day at one location
//! from the solar solver, applying method rules, high-latitude fallback,
//! adjustments, and minute rounding.

use crate::astronomy::solar::SolarTime;
use crate::rules::{CalculationMethod, CalculationParameters};
use crate::types::{Coordinates, DateComponents, Prayer, WaqtError};
use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// The frozen prayer schedule for one (coordinates, date, parameters) triple.
///
/// Created by one computation call and immutable thereafter. At extreme
/// latitudes the instants may not be strictly increasing even after the
/// high-latitude fallback; that reflects astronomical reality and is returned
/// as computed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrayerTimes {
    pub fajr: DateTime<Utc>,
    pub sunrise: DateTime<Utc>,
    pub dhuhr: DateTime<Utc>,
    pub asr: DateTime<Utc>,
    pub maghrib: DateTime<Utc>,
    pub isha: DateTime<Utc>,
}

impl PrayerTimes {
    /// Computes the schedule for one day.
    ///
    /// # Errors
    /// Returns `InvalidDate` for an impossible year/month/day triple, and
    /// `UnresolvableSchedule` when the sun never crosses the horizon on this
    /// date (polar day or night), leaving no night span to fall back on.
    pub fn new(
        coordinates: Coordinates,
        date: DateComponents,
        parameters: &CalculationParameters,
    ) -> Result<Self, WaqtError> {
        let day = date.to_date()?;
        let tomorrow = day.succ_opt().ok_or(WaqtError::InvalidDate {
            year: date.year,
            month: date.month,
            day: date.day,
        })?;

        let solar_time = SolarTime::new(day, coordinates);
        let tomorrow_solar_time = SolarTime::new(tomorrow, coordinates);

        let unresolvable = WaqtError::UnresolvableSchedule { latitude: coordinates.latitude };

        let transit = time_on_date(day, solar_time.transit).ok_or(unresolvable.clone())?;
        let sunrise = solar_time
            .sunrise
            .and_then(|hours| time_on_date(day, hours))
            .ok_or(unresolvable.clone())?;
        let sunset = solar_time
            .sunset
            .and_then(|hours| time_on_date(day, hours))
            .ok_or(unresolvable.clone())?;
        let tomorrow_sunrise = tomorrow_solar_time
            .sunrise
            .and_then(|hours| time_on_date(tomorrow, hours))
            .ok_or(unresolvable.clone())?;

        let asr = solar_time
            .afternoon(parameters.madhab.shadow_length())
            .and_then(|hours| time_on_date(day, hours))
            .ok_or(unresolvable)?;

        // Duration from this day's sunset to the next day's sunrise, in seconds.
        let night = (tomorrow_sunrise - sunset).num_milliseconds() as f64 / 1000.0;
        let portions = parameters.night_portions();
        let moonsighting = parameters.method == CalculationMethod::MoonsightingCommittee;

        let mut raw_fajr = solar_time
            .time_for_solar_angle(-parameters.fajr_angle, false)
            .and_then(|hours| time_on_date(day, hours));
        if moonsighting && coordinates.latitude >= 55.0 {
            raw_fajr = Some(sunrise - seconds(night / 7.0));
        }
        let safe_fajr = if moonsighting {
            season_adjusted_morning_twilight(coordinates.latitude, day.ordinal(), day.year(), sunrise)
        } else {
            sunrise - seconds(portions.fajr * night)
        };
        let fajr = resolve_with_fallback(raw_fajr, safe_fajr, false);

        let isha = if parameters.isha_interval > 0 {
            sunset + Duration::minutes(parameters.isha_interval)
        } else {
            let mut raw_isha = solar_time
                .time_for_solar_angle(-parameters.isha_angle, true)
                .and_then(|hours| time_on_date(day, hours));
            if moonsighting && coordinates.latitude >= 55.0 {
                raw_isha = Some(sunset + seconds(night / 7.0));
            }
            let safe_isha = if moonsighting {
                season_adjusted_evening_twilight(coordinates.latitude, day.ordinal(), day.year(), sunset)
            } else {
                sunset + seconds(portions.isha * night)
            };
            resolve_with_fallback(raw_isha, safe_isha, true)
        };

        let user = &parameters.adjustments;
        let method = &parameters.method_adjustments;
        Ok(Self {
            fajr: rounded_minute(fajr + Duration::minutes(user.fajr + method.fajr)),
            sunrise: rounded_minute(sunrise + Duration::minutes(user.sunrise + method.sunrise)),
            dhuhr: rounded_minute(transit + Duration::minutes(user.dhuhr + method.dhuhr)),
            asr: rounded_minute(asr + Duration::minutes(user.asr + method.asr)),
            maghrib: rounded_minute(sunset + Duration::minutes(user.maghrib + method.maghrib)),
            isha: rounded_minute(isha + Duration::minutes(user.isha + method.isha)),
        })
    }

    /// The stored instant for a prayer; `None` for [`Prayer::None`].
    pub fn time_for_prayer(&self, prayer: Prayer) -> Option<DateTime<Utc>> {
        match prayer {
            Prayer::None => None,
            Prayer::Fajr => Some(self.fajr),
            Prayer::Sunrise => Some(self.sunrise),
            Prayer::Dhuhr => Some(self.dhuhr),
            Prayer::Asr => Some(self.asr),
            Prayer::Maghrib => Some(self.maghrib),
            Prayer::Isha => Some(self.isha),
        }
    }

    /// The latest prayer whose instant is at or before now.
    pub fn current_prayer(&self) -> Prayer {
        self.current_prayer_at(Utc::now())
    }

    /// The latest prayer whose instant is at or before `when`;
    /// [`Prayer::None`] before Fajr.
    pub fn current_prayer_at(&self, when: DateTime<Utc>) -> Prayer {
        if self.isha <= when {
            Prayer::Isha
        } else if self.maghrib <= when {
            Prayer::Maghrib
        } else if self.asr <= when {
            Prayer::Asr
        } else if self.dhuhr <= when {
            Prayer::Dhuhr
        } else if self.sunrise <= when {
            Prayer::Sunrise
        } else if self.fajr <= when {
            Prayer::Fajr
        } else {
            Prayer::None
        }
    }

    /// The earliest prayer whose instant is after now.
    pub fn next_prayer(&self) -> Prayer {
        self.next_prayer_at(Utc::now())
    }

    /// The earliest prayer whose instant is strictly after `when`;
    /// [`Prayer::None`] at or past Isha.
    pub fn next_prayer_at(&self, when: DateTime<Utc>) -> Prayer {
        if when < self.fajr {
            Prayer::Fajr
        } else if when < self.sunrise {
            Prayer::Sunrise
        } else if when < self.dhuhr {
            Prayer::Dhuhr
        } else if when < self.asr {
            Prayer::Asr
        } else if when < self.maghrib {
            Prayer::Maghrib
        } else if when < self.isha {
            Prayer::Isha
        } else {
            Prayer::None
        }
    }
}

/// Converts a fractional hour of the day into an instant. Hours may run past
/// 24 when an evening event lands in the next UTC day.
fn time_on_date(date: NaiveDate, hours: f64) -> Option<DateTime<Utc>> {
    if !hours.is_finite() {
        return None;
    }
    let midnight = Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?);
    Some(midnight + Duration::milliseconds((hours * 3_600_000.0).round() as i64))
}

fn seconds(value: f64) -> Duration {
    Duration::milliseconds((value * 1000.0).round() as i64)
}

/// Substitutes the night-fraction fallback when the angle solve failed or
/// crossed the night bound. With `latest_valid` the fallback caps how late
/// the time may be (Isha); otherwise it caps how early (Fajr).
fn resolve_with_fallback(
    primary: Option<DateTime<Utc>>,
    fallback: DateTime<Utc>,
    latest_valid: bool,
) -> DateTime<Utc> {
    match primary {
        Some(time) if latest_valid && time <= fallback => time,
        Some(time) if !latest_valid && time >= fallback => time,
        _ => fallback,
    }
}

/// Rounds to the nearest whole minute (seconds >= 30 round up). Whole-minute
/// adjustments are applied before this, so they shift the rounded value by
/// exactly their own size.
fn rounded_minute(time: DateTime<Utc>) -> DateTime<Utc> {
    let millis = time.timestamp_millis();
    let remainder = millis.rem_euclid(60_000);
    let rounded = if remainder >= 30_000 {
        millis - remainder + 60_000
    } else {
        millis - remainder
    };
    DateTime::from_timestamp_millis(rounded).unwrap_or(time)
}

fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && !(year % 100 == 0 && year % 400 != 0)
}

/// Days elapsed since the most recent winter solstice for the observer's
/// hemisphere, used to index the Moonsighting Committee seasonal tables.
fn days_since_solstice(day_of_year: u32, year: i32, latitude: f64) -> i64 {
    let days_in_year: i64 = if is_leap_year(year) { 366 } else { 365 };
    if latitude >= 0.0 {
        let elapsed = i64::from(day_of_year) + 10;
        if elapsed >= days_in_year { elapsed - days_in_year } else { elapsed }
    } else {
        let southern_offset = if is_leap_year(year) { 173 } else { 172 };
        let elapsed = i64::from(day_of_year) - southern_offset;
        if elapsed < 0 { elapsed + days_in_year } else { elapsed }
    }
}

/// Piecewise-linear seasonal interpolation over the solstice-relative day,
/// shared by the morning and evening Moonsighting Committee tables.
fn seasonal_adjustment(a: f64, b: f64, c: f64, d: f64, dyy: i64) -> f64 {
    let dyy = dyy as f64;
    if dyy < 91.0 {
        a + (b - a) / 91.0 * dyy
    } else if dyy < 137.0 {
        b + (c - b) / 46.0 * (dyy - 91.0)
    } else if dyy < 183.0 {
        c + (d - c) / 46.0 * (dyy - 137.0)
    } else if dyy < 229.0 {
        d + (c - d) / 46.0 * (dyy - 183.0)
    } else if dyy < 275.0 {
        c + (b - c) / 46.0 * (dyy - 229.0)
    } else {
        b + (a - b) / 91.0 * (dyy - 275.0)
    }
}

/// Moonsighting Committee Fajr: published minutes-before-sunrise tables,
/// keyed to latitude and season.
fn season_adjusted_morning_twilight(
    latitude: f64,
    day_of_year: u32,
    year: i32,
    sunrise: DateTime<Utc>,
) -> DateTime<Utc> {
    let a = 75.0 + 28.65 / 55.0 * latitude.abs();
    let b = 75.0 + 19.44 / 55.0 * latitude.abs();
    let c = 75.0 + 32.74 / 55.0 * latitude.abs();
    let d = 75.0 + 48.10 / 55.0 * latitude.abs();
    let adjustment = seasonal_adjustment(a, b, c, d, days_since_solstice(day_of_year, year, latitude));
    sunrise - Duration::seconds((adjustment * 60.0).round() as i64)
}

/// Moonsighting Committee Isha: published minutes-after-sunset tables.
fn season_adjusted_evening_twilight(
    latitude: f64,
    day_of_year: u32,
    year: i32,
    sunset: DateTime<Utc>,
) -> DateTime<Utc> {
    let a = 75.0 + 25.60 / 55.0 * latitude.abs();
    let b = 75.0 + 2.050 / 55.0 * latitude.abs();
    let c = 75.0 - 9.21 / 55.0 * latitude.abs();
    let d = 75.0 + 6.14 / 55.0 * latitude.abs();
    let adjustment = seasonal_adjustment(a, b, c, d, days_since_solstice(day_of_year, year, latitude));
    sunset + Duration::seconds((adjustment * 60.0).round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn test_rounded_minute() {
        assert_eq!(rounded_minute(utc(2015, 7, 12, 10, 7, 29)), utc(2015, 7, 12, 10, 7, 0));
        assert_eq!(rounded_minute(utc(2015, 7, 12, 10, 7, 30)), utc(2015, 7, 12, 10, 8, 0));
        assert_eq!(rounded_minute(utc(2015, 7, 12, 10, 7, 0)), utc(2015, 7, 12, 10, 7, 0));
        // Rounding can carry across midnight.
        assert_eq!(rounded_minute(utc(2015, 7, 12, 23, 59, 45)), utc(2015, 7, 13, 0, 0, 0));
    }

    #[test]
    fn test_resolve_with_fallback() {
        let fallback = utc(2016, 1, 1, 5, 0, 0);
        let earlier = utc(2016, 1, 1, 4, 0, 0);
        let later = utc(2016, 1, 1, 6, 0, 0);

        // Fajr semantics: fallback is the earliest admissible time.
        assert_eq!(resolve_with_fallback(None, fallback, false), fallback);
        assert_eq!(resolve_with_fallback(Some(earlier), fallback, false), fallback);
        assert_eq!(resolve_with_fallback(Some(later), fallback, false), later);

        // Isha semantics: fallback is the latest admissible time.
        assert_eq!(resolve_with_fallback(None, fallback, true), fallback);
        assert_eq!(resolve_with_fallback(Some(later), fallback, true), fallback);
        assert_eq!(resolve_with_fallback(Some(earlier), fallback, true), earlier);
    }

    #[test]
    fn test_days_since_solstice() {
        assert_eq!(days_since_solstice(1, 2016, 1.0), 11);
        assert_eq!(days_since_solstice(366, 2016, 1.0), 10);
        assert_eq!(days_since_solstice(365, 2015, 1.0), 10);
        assert_eq!(days_since_solstice(79, 2016, 1.0), 89);
        // Southern hemisphere counts from the June solstice.
        assert_eq!(days_since_solstice(1, 2016, -1.0), 194);
        assert_eq!(days_since_solstice(100, 2016, -1.0), 293);
        assert_eq!(days_since_solstice(166, 2016, -1.0), 359);
    }

    #[test]
    fn test_time_on_date_past_midnight() {
        let day = NaiveDate::from_ymd_opt(2015, 7, 12).unwrap();
        let time = time_on_date(day, 24.5).unwrap();
        assert_eq!(time, utc(2015, 7, 13, 0, 30, 0));
        assert!(time_on_date(day, f64::NAN).is_none());
    }
}

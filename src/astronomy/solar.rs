//! Solar Position Module.
//!
//! Evaluates a truncated trigonometric series for the sun's apparent
//! equatorial coordinates and solves hour angles for target altitudes.
//! Precision targets published prayer-time conventions (sub-minute clock
//! accuracy), not general-purpose ephemeris work.

use crate::types::Coordinates;
use chrono::{Datelike, NaiveDate};

/// Normalizes a value to the half-open range `[0, bound)`.
fn normalized_to_scale(value: f64, bound: f64) -> f64 {
    value - bound * (value / bound).floor()
}

/// Normalizes an angle in degrees to `[0, 360)`.
fn unwind_angle(angle: f64) -> f64 {
    normalized_to_scale(angle, 360.0)
}

/// Shifts an angle in degrees into `[-180, 180]`.
fn closest_angle(angle: f64) -> f64 {
    if (-180.0..=180.0).contains(&angle) {
        angle
    } else {
        angle - 360.0 * (angle / 360.0).round()
    }
}

/// The Julian day number for a Gregorian date at the given fractional hour UT.
pub fn julian_day(year: i32, month: u32, day: u32, hours: f64) -> f64 {
    // Meeus, Astronomical Algorithms ch. 7.
    let y = f64::from(if month > 2 { year } else { year - 1 });
    let m = f64::from(if month > 2 { month } else { month + 12 });
    let d = f64::from(day) + hours / 24.0;

    let a = (y / 100.0).floor();
    let b = 2.0 - a + (a / 4.0).floor();

    (365.25 * (y + 4716.0)).floor() + (30.6001 * (m + 1.0)).floor() + d + b - 1524.5
}

/// Julian centuries since the J2000 epoch.
fn julian_century(julian_day: f64) -> f64 {
    (julian_day - 2451545.0) / 36525.0
}

fn mean_solar_longitude(t: f64) -> f64 {
    unwind_angle(280.4664567 + 36000.76983 * t + 0.0003032 * t.powi(2))
}

fn mean_lunar_longitude(t: f64) -> f64 {
    unwind_angle(218.3165 + 481267.8813 * t)
}

fn ascending_lunar_node_longitude(t: f64) -> f64 {
    unwind_angle(125.04452 - 1934.136261 * t + 0.0020708 * t.powi(2) + t.powi(3) / 450000.0)
}

fn mean_solar_anomaly(t: f64) -> f64 {
    unwind_angle(357.52911 + 35999.05029 * t - 0.0001537 * t.powi(2))
}

/// The equation of the center, correcting the mean anomaly for orbital
/// eccentricity.
fn solar_equation_of_the_center(t: f64, mean_anomaly: f64) -> f64 {
    let m = mean_anomaly.to_radians();
    (1.914602 - 0.004817 * t - 0.000014 * t.powi(2)) * m.sin()
        + (0.019993 - 0.000101 * t) * (2.0 * m).sin()
        + 0.000289 * (3.0 * m).sin()
}

fn apparent_solar_longitude(t: f64, mean_longitude: f64) -> f64 {
    let longitude = mean_longitude + solar_equation_of_the_center(t, mean_solar_anomaly(t));
    let omega = 125.04 - 1934.136 * t;
    longitude - 0.00569 - 0.00478 * omega.to_radians().sin()
}

fn mean_obliquity_of_the_ecliptic(t: f64) -> f64 {
    23.4392911 - 0.013004167 * t - 0.0000001639 * t.powi(2) + 0.0000005036 * t.powi(3)
}

fn apparent_obliquity_of_the_ecliptic(t: f64, mean_obliquity: f64) -> f64 {
    let omega = 125.04 - 1934.136 * t;
    mean_obliquity + 0.00256 * omega.to_radians().cos()
}

/// Mean sidereal time at Greenwich, in degrees.
fn mean_sidereal_time(t: f64) -> f64 {
    let jd = t * 36525.0 + 2451545.0;
    unwind_angle(
        280.46061837 + 360.98564736629 * (jd - 2451545.0) + 0.000387933 * t.powi(2)
            - t.powi(3) / 38710000.0,
    )
}

fn nutation_in_longitude(l0: f64, lp: f64, omega: f64) -> f64 {
    -(17.2 / 3600.0) * omega.to_radians().sin()
        - (1.32 / 3600.0) * (2.0 * l0.to_radians()).sin()
        - (0.23 / 3600.0) * (2.0 * lp.to_radians()).sin()
        + (0.21 / 3600.0) * (2.0 * omega.to_radians()).sin()
}

fn nutation_in_obliquity(l0: f64, lp: f64, omega: f64) -> f64 {
    (9.2 / 3600.0) * omega.to_radians().cos()
        + (0.57 / 3600.0) * (2.0 * l0.to_radians()).cos()
        + (0.10 / 3600.0) * (2.0 * lp.to_radians()).cos()
        - (0.09 / 3600.0) * (2.0 * omega.to_radians()).cos()
}

/// Geometric altitude of a body at the given local hour angle, in degrees.
fn altitude_of_celestial_body(observer_latitude: f64, declination: f64, local_hour_angle: f64) -> f64 {
    let phi = observer_latitude.to_radians();
    let delta = declination.to_radians();
    let h = local_hour_angle.to_radians();
    (phi.sin() * delta.sin() + phi.cos() * delta.cos() * h.cos()).asin().to_degrees()
}

/// Three-point interpolation for a smoothly varying quantity (Meeus ch. 3).
fn interpolate(y2: f64, y1: f64, y3: f64, n: f64) -> f64 {
    let a = y2 - y1;
    let b = y3 - y2;
    let c = b - a;
    y2 + (n / 2.0) * (a + b + n * c)
}

/// Three-point interpolation for angles, unwinding the daily wrap first.
fn interpolate_angles(y2: f64, y1: f64, y3: f64, n: f64) -> f64 {
    let a = closest_angle(unwind_angle(y2 - y1));
    let b = closest_angle(unwind_angle(y3 - y2));
    let c = b - a;
    y2 + (n / 2.0) * (a + b + n * c)
}

/// The sun's apparent position for one Julian date at 0h UT.
///
/// Pure function of the Julian date; declination and right ascension are in
/// degrees, as is the apparent sidereal time at Greenwich.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarCoordinates {
    /// Angular distance of the sun north/south of the celestial equator.
    pub declination: f64,
    pub right_ascension: f64,
    pub apparent_sidereal_time: f64,
}

impl SolarCoordinates {
    pub fn new(julian_day: f64) -> Self {
        let t = julian_century(julian_day);
        let l0 = mean_solar_longitude(t);
        let lp = mean_lunar_longitude(t);
        let omega = ascending_lunar_node_longitude(t);
        let lambda = apparent_solar_longitude(t, l0).to_radians();

        let theta0 = mean_sidereal_time(t);
        let d_psi = nutation_in_longitude(l0, lp, omega);
        let d_epsilon = nutation_in_obliquity(l0, lp, omega);
        let epsilon0 = mean_obliquity_of_the_ecliptic(t);
        let epsilon_apparent = apparent_obliquity_of_the_ecliptic(t, epsilon0).to_radians();

        let declination = (epsilon_apparent.sin() * lambda.sin()).asin().to_degrees();
        let right_ascension = unwind_angle(
            (epsilon_apparent.cos() * lambda.sin()).atan2(lambda.cos()).to_degrees(),
        );
        let apparent_sidereal_time = theta0
            + ((d_psi * 3600.0) * (epsilon0 + d_epsilon).to_radians().cos()) / 3600.0;

        Self { declination, right_ascension, apparent_sidereal_time }
    }
}

/// Depression below the geometric horizon at which sunrise/sunset occur:
/// 34' of atmospheric refraction plus 16' of solar semidiameter.
const SOLAR_ALTITUDE_AT_HORIZON: f64 = -50.0 / 60.0;

/// Hour-angle solver for one calendar day at one location.
///
/// Built from the day's solar coordinates plus the adjacent days' for
/// interpolation. All outputs are fractional hours of the day in universal
/// time; the caller converts them to instants. Sunrise, sunset, and the
/// generic angle solve are `None` when the sun never reaches the required
/// altitude at this latitude and date.
#[derive(Debug, Clone)]
pub struct SolarTime {
    observer: Coordinates,
    solar: SolarCoordinates,
    prev_solar: SolarCoordinates,
    next_solar: SolarCoordinates,
    approximate_transit: f64,
    /// Local solar noon.
    pub transit: f64,
    pub sunrise: Option<f64>,
    pub sunset: Option<f64>,
}

impl SolarTime {
    pub fn new(date: NaiveDate, observer: Coordinates) -> Self {
        let jd = julian_day(date.year(), date.month(), date.day(), 0.0);
        let solar = SolarCoordinates::new(jd);
        let prev_solar = SolarCoordinates::new(jd - 1.0);
        let next_solar = SolarCoordinates::new(jd + 1.0);

        let approximate_transit =
            approximate_transit(observer.longitude, solar.apparent_sidereal_time, solar.right_ascension);

        let mut time = Self {
            observer,
            solar,
            prev_solar,
            next_solar,
            approximate_transit,
            transit: 0.0,
            sunrise: None,
            sunset: None,
        };
        time.transit = time.corrected_transit();
        time.sunrise = time.corrected_hour_angle(SOLAR_ALTITUDE_AT_HORIZON, false);
        time.sunset = time.corrected_hour_angle(SOLAR_ALTITUDE_AT_HORIZON, true);
        time
    }

    /// The hour of day at which the sun sits at `angle` degrees of altitude,
    /// searched before transit (morning) or after (evening).
    pub fn time_for_solar_angle(&self, angle: f64, after_transit: bool) -> Option<f64> {
        self.corrected_hour_angle(angle, after_transit)
    }

    /// The Asr hour for the given shadow-length multiplier.
    pub fn afternoon(&self, shadow_length: f64) -> Option<f64> {
        let tangent = (self.observer.latitude - self.solar.declination).abs();
        let inverse = shadow_length + tangent.to_radians().tan();
        let angle = (1.0 / inverse).atan().to_degrees();
        self.corrected_hour_angle(angle, true)
    }

    fn corrected_transit(&self) -> f64 {
        let longitude_west = -self.observer.longitude;
        let m0 = self.approximate_transit;
        let theta = unwind_angle(self.solar.apparent_sidereal_time + 360.985647 * m0);
        let alpha = unwind_angle(interpolate_angles(
            self.solar.right_ascension,
            self.prev_solar.right_ascension,
            self.next_solar.right_ascension,
            m0,
        ));
        let h = closest_angle(theta - longitude_west - alpha);
        let dm = h / -360.0;
        (m0 + dm) * 24.0
    }

    fn corrected_hour_angle(&self, angle: f64, after_transit: bool) -> Option<f64> {
        let latitude = self.observer.latitude;
        let longitude_west = -self.observer.longitude;
        let m0 = self.approximate_transit;

        let term1 = angle.to_radians().sin()
            - latitude.to_radians().sin() * self.solar.declination.to_radians().sin();
        let term2 =
            latitude.to_radians().cos() * self.solar.declination.to_radians().cos();
        let cos_h0 = term1 / term2;
        if !(-1.0..=1.0).contains(&cos_h0) {
            // The sun never reaches this altitude today.
            return None;
        }
        let h0 = cos_h0.acos().to_degrees();

        let m = if after_transit { m0 + h0 / 360.0 } else { m0 - h0 / 360.0 };
        let theta = unwind_angle(self.solar.apparent_sidereal_time + 360.985647 * m);
        let alpha = unwind_angle(interpolate_angles(
            self.solar.right_ascension,
            self.prev_solar.right_ascension,
            self.next_solar.right_ascension,
            m,
        ));
        let delta = interpolate(
            self.solar.declination,
            self.prev_solar.declination,
            self.next_solar.declination,
            m,
        );
        let h = theta - longitude_west - alpha;
        let altitude = altitude_of_celestial_body(latitude, delta, h);

        let dm = (altitude - angle)
            / (360.0 * delta.to_radians().cos() * latitude.to_radians().cos() * h.to_radians().sin());
        Some((m + dm) * 24.0)
    }
}

/// The fraction of the day at which the sun crosses the observer's meridian,
/// before interpolation refinement.
fn approximate_transit(longitude: f64, sidereal_time: f64, right_ascension: f64) -> f64 {
    let longitude_west = -longitude;
    normalized_to_scale((right_ascension + longitude_west - sidereal_time) / 360.0, 1.0)
}

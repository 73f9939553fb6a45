use crate::types::{HighLatitudeRule, Madhab, TimeAdjustments};
use serde::{Deserialize, Serialize};

/// Fraction of the sunset-to-sunrise span allotted to Fajr and Isha under a
/// high latitude rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NightPortions {
    pub fajr: f64,
    pub isha: f64,
}

/// Named calculation conventions.
///
/// The tag identifies the preset for diagnostics and equality; behavior
/// beyond plain angles (the Moonsighting Committee seasonal twilight) is
/// keyed off it inside the schedule computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CalculationMethod {
    /// Muslim World League. Fajr 18°, Isha 17°.
    MuslimWorldLeague,
    /// Egyptian General Authority of Survey. Fajr 19.5°, Isha 17.5°.
    Egyptian,
    /// University of Islamic Sciences, Karachi. Fajr 18°, Isha 18°.
    Karachi,
    /// Umm al-Qura University, Makkah. Fajr 18.5°, Isha 90 minutes after Maghrib.
    UmmAlQura,
    /// UAE. Fajr and Isha 18.2°.
    Dubai,
    /// Moonsighting Committee Worldwide. 18°/18° with seasonal twilight tables.
    MoonsightingCommittee,
    /// ISNA. Fajr and Isha 15°.
    NorthAmerica,
    /// Kuwait. Fajr 18°, Isha 17.5°.
    Kuwait,
    /// Qatar. Fajr 18°, Isha 90 minutes after Maghrib.
    Qatar,
    /// No convention; the caller fills in angles manually.
    Other,
}

impl CalculationMethod {
    /// Returns the fully populated parameters for this convention.
    pub fn parameters(self) -> CalculationParameters {
        match self {
            CalculationMethod::MuslimWorldLeague => {
                CalculationParameters::with_method(self, 18.0, 17.0)
                    .method_adjustments(TimeAdjustments { dhuhr: 1, ..Default::default() })
            }
            CalculationMethod::Egyptian => CalculationParameters::with_method(self, 19.5, 17.5)
                .method_adjustments(TimeAdjustments { dhuhr: 1, ..Default::default() }),
            CalculationMethod::Karachi => CalculationParameters::with_method(self, 18.0, 18.0)
                .method_adjustments(TimeAdjustments { dhuhr: 1, ..Default::default() }),
            CalculationMethod::UmmAlQura => {
                CalculationParameters::with_method(self, 18.5, 0.0).isha_interval(90)
            }
            CalculationMethod::Dubai => CalculationParameters::with_method(self, 18.2, 18.2)
                .method_adjustments(TimeAdjustments {
                    sunrise: -3,
                    dhuhr: 3,
                    asr: 3,
                    maghrib: 3,
                    ..Default::default()
                }),
            CalculationMethod::MoonsightingCommittee => {
                CalculationParameters::with_method(self, 18.0, 18.0)
                    .method_adjustments(TimeAdjustments { dhuhr: 5, maghrib: 3, ..Default::default() })
            }
            CalculationMethod::NorthAmerica => CalculationParameters::with_method(self, 15.0, 15.0)
                .method_adjustments(TimeAdjustments { dhuhr: 1, ..Default::default() }),
            CalculationMethod::Kuwait => CalculationParameters::with_method(self, 18.0, 17.5),
            CalculationMethod::Qatar => {
                CalculationParameters::with_method(self, 18.0, 0.0).isha_interval(90)
            }
            CalculationMethod::Other => CalculationParameters::with_method(self, 0.0, 0.0),
        }
    }
}

/// Configuration for one schedule computation.
///
/// Built once per computation, usually from a [`CalculationMethod`] preset,
/// and immutable once passed in. No field is validated; an all-zero `Other`
/// configuration is degenerate but legal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationParameters {
    pub method: CalculationMethod,
    /// Depression of the sun below the horizon marking Fajr, in degrees.
    pub fajr_angle: f64,
    /// Depression of the sun below the horizon marking Isha, in degrees.
    pub isha_angle: f64,
    /// Minutes after Maghrib; when nonzero this replaces the angle-based
    /// Isha solve entirely.
    pub isha_interval: i64,
    pub madhab: Madhab,
    pub high_latitude_rule: HighLatitudeRule,
    /// Caller-supplied offsets, on top of the preset's built-in ones.
    pub adjustments: TimeAdjustments,
    /// Offsets that are part of the convention itself.
    pub method_adjustments: TimeAdjustments,
}

impl CalculationParameters {
    /// Parameters with the given twilight angles and no named convention.
    pub fn new(fajr_angle: f64, isha_angle: f64) -> Self {
        Self::with_method(CalculationMethod::Other, fajr_angle, isha_angle)
    }

    fn with_method(method: CalculationMethod, fajr_angle: f64, isha_angle: f64) -> Self {
        Self {
            method,
            fajr_angle,
            isha_angle,
            isha_interval: 0,
            madhab: Madhab::default(),
            high_latitude_rule: HighLatitudeRule::default(),
            adjustments: TimeAdjustments::default(),
            method_adjustments: TimeAdjustments::default(),
        }
    }

    pub fn madhab(mut self, madhab: Madhab) -> Self {
        self.madhab = madhab;
        self
    }

    pub fn high_latitude_rule(mut self, rule: HighLatitudeRule) -> Self {
        self.high_latitude_rule = rule;
        self
    }

    pub fn isha_interval(mut self, minutes: i64) -> Self {
        self.isha_interval = minutes;
        self
    }

    pub fn adjustments(mut self, adjustments: TimeAdjustments) -> Self {
        self.adjustments = adjustments;
        self
    }

    fn method_adjustments(mut self, adjustments: TimeAdjustments) -> Self {
        self.method_adjustments = adjustments;
        self
    }

    /// Night fractions for the configured high latitude rule.
    pub fn night_portions(&self) -> NightPortions {
        match self.high_latitude_rule {
            HighLatitudeRule::MiddleOfTheNight => NightPortions { fajr: 0.5, isha: 0.5 },
            HighLatitudeRule::SeventhOfTheNight => {
                NightPortions { fajr: 1.0 / 7.0, isha: 1.0 / 7.0 }
            }
            HighLatitudeRule::TwilightAngle => NightPortions {
                fajr: self.fajr_angle / 60.0,
                isha: self.isha_angle / 60.0,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_night_portions_follow_rule() {
        let middle = CalculationParameters::new(18.0, 18.0);
        assert_eq!(middle.night_portions().fajr, 0.5);
        assert_eq!(middle.night_portions().isha, 0.5);

        let seventh = CalculationParameters::new(18.0, 18.0)
            .high_latitude_rule(HighLatitudeRule::SeventhOfTheNight);
        assert_eq!(seventh.night_portions().fajr, 1.0 / 7.0);
        assert_eq!(seventh.night_portions().isha, 1.0 / 7.0);

        let twilight = CalculationParameters::new(10.0, 15.0)
            .high_latitude_rule(HighLatitudeRule::TwilightAngle);
        assert_eq!(twilight.night_portions().fajr, 10.0 / 60.0);
        assert_eq!(twilight.night_portions().isha, 15.0 / 60.0);
    }

    #[test]
    fn test_preset_angles() {
        let cases: [(CalculationMethod, f64, f64, i64); 10] = [
            (CalculationMethod::MuslimWorldLeague, 18.0, 17.0, 0),
            (CalculationMethod::Egyptian, 19.5, 17.5, 0),
            (CalculationMethod::Karachi, 18.0, 18.0, 0),
            (CalculationMethod::UmmAlQura, 18.5, 0.0, 90),
            (CalculationMethod::Dubai, 18.2, 18.2, 0),
            (CalculationMethod::MoonsightingCommittee, 18.0, 18.0, 0),
            (CalculationMethod::NorthAmerica, 15.0, 15.0, 0),
            (CalculationMethod::Kuwait, 18.0, 17.5, 0),
            (CalculationMethod::Qatar, 18.0, 0.0, 90),
            (CalculationMethod::Other, 0.0, 0.0, 0),
        ];
        for (method, fajr, isha, interval) in cases {
            let params = method.parameters();
            assert_eq!(params.method, method);
            assert_eq!(params.fajr_angle, fajr, "{:?} fajr angle", method);
            assert_eq!(params.isha_angle, isha, "{:?} isha angle", method);
            assert_eq!(params.isha_interval, interval, "{:?} isha interval", method);
        }
    }

    #[test]
    fn test_builder_setters() {
        let params = CalculationMethod::Karachi
            .parameters()
            .madhab(Madhab::Hanafi)
            .high_latitude_rule(HighLatitudeRule::TwilightAngle)
            .adjustments(TimeAdjustments { fajr: -2, ..Default::default() });
        assert_eq!(params.madhab, Madhab::Hanafi);
        assert_eq!(params.high_latitude_rule, HighLatitudeRule::TwilightAngle);
        assert_eq!(params.adjustments.fajr, -2);
        // Preset-owned offsets survive the builder chain.
        assert_eq!(params.method_adjustments.dhuhr, 1);
    }
}

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use waqt::prelude::*;

fn date_from_offset(days: i32) -> DateComponents {
    let base = NaiveDate::from_ymd_opt(1900, 1, 1).unwrap();
    DateComponents::from(base + Duration::days(i64::from(days)))
}

proptest! {
    /// Invariant: computation never panics anywhere on the globe, for any
    /// date between 1900 and 2100; polar degeneracy surfaces as an error.
    #[test]
    fn no_panic_anywhere(
        days in 0i32..73000,
        lat in -90.0f64..90.0,
        lon in -180.0f64..180.0,
    ) {
        let params = CalculationMethod::MuslimWorldLeague.parameters();
        let _ = PrayerTimes::new(Coordinates::new(lat, lon), date_from_offset(days), &params);
    }

    /// Invariant: the computation is deterministic; repeated calls on the
    /// same inputs yield identical instants.
    #[test]
    fn deterministic(
        days in 0i32..73000,
        lat in -60.0f64..60.0,
        lon in -180.0f64..180.0,
    ) {
        let params = CalculationMethod::Karachi.parameters();
        let coordinates = Coordinates::new(lat, lon);
        let date = date_from_offset(days);
        let first = PrayerTimes::new(coordinates, date, &params);
        let second = PrayerTimes::new(coordinates, date, &params);
        prop_assert_eq!(first, second);
    }

    /// Invariant: at moderate latitudes the six instants are strictly
    /// increasing through the day.
    #[test]
    fn schedule_is_ordered_at_moderate_latitudes(
        days in 0i32..73000,
        lat in -48.0f64..48.0,
        lon in -180.0f64..180.0,
    ) {
        let params = CalculationMethod::MuslimWorldLeague.parameters();
        let times = PrayerTimes::new(Coordinates::new(lat, lon), date_from_offset(days), &params);
        if let Ok(times) = times {
            prop_assert!(times.fajr < times.sunrise);
            prop_assert!(times.sunrise < times.dhuhr);
            prop_assert!(times.dhuhr < times.asr);
            prop_assert!(times.asr < times.maghrib);
            prop_assert!(times.maghrib < times.isha);
        }
    }

    /// Invariant: a whole-minute adjustment shifts the final rounded instant
    /// by exactly its own size, because adjustments apply before rounding.
    #[test]
    fn adjustments_shift_exactly(
        days in 0i32..73000,
        lat in -55.0f64..55.0,
        lon in -180.0f64..180.0,
        minutes in -120i64..120,
    ) {
        let coordinates = Coordinates::new(lat, lon);
        let date = date_from_offset(days);
        let params = CalculationMethod::NorthAmerica.parameters();
        let adjusted_params = CalculationMethod::NorthAmerica.parameters().adjustments(
            TimeAdjustments {
                fajr: minutes,
                sunrise: minutes,
                dhuhr: minutes,
                asr: minutes,
                maghrib: minutes,
                isha: minutes,
            },
        );

        let base = PrayerTimes::new(coordinates, date, &params);
        let adjusted = PrayerTimes::new(coordinates, date, &adjusted_params);
        if let (Ok(base), Ok(adjusted)) = (base, adjusted) {
            let shift = Duration::minutes(minutes);
            prop_assert_eq!(adjusted.fajr, base.fajr + shift);
            prop_assert_eq!(adjusted.sunrise, base.sunrise + shift);
            prop_assert_eq!(adjusted.dhuhr, base.dhuhr + shift);
            prop_assert_eq!(adjusted.asr, base.asr + shift);
            prop_assert_eq!(adjusted.maghrib, base.maghrib + shift);
            prop_assert_eq!(adjusted.isha, base.isha + shift);
        }
    }

    /// Invariant: night portions track the selected rule for any angles.
    #[test]
    fn night_portions_follow_rule(
        fajr_angle in 0.0f64..24.0,
        isha_angle in 0.0f64..24.0,
    ) {
        let middle = CalculationParameters::new(fajr_angle, isha_angle);
        prop_assert_eq!(middle.night_portions().fajr, 0.5);
        prop_assert_eq!(middle.night_portions().isha, 0.5);

        let seventh = CalculationParameters::new(fajr_angle, isha_angle)
            .high_latitude_rule(HighLatitudeRule::SeventhOfTheNight);
        prop_assert_eq!(seventh.night_portions().fajr, 1.0 / 7.0);
        prop_assert_eq!(seventh.night_portions().isha, 1.0 / 7.0);

        let twilight = CalculationParameters::new(fajr_angle, isha_angle)
            .high_latitude_rule(HighLatitudeRule::TwilightAngle);
        prop_assert_eq!(twilight.night_portions().fajr, fajr_angle / 60.0);
        prop_assert_eq!(twilight.night_portions().isha, isha_angle / 60.0);
    }
}

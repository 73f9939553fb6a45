//! Extension trait for `NaiveDate`.

use crate::astronomy::prayer::PrayerTimes;
use crate::rules::CalculationParameters;
use crate::types::{Coordinates, DateComponents, WaqtError};
use chrono::NaiveDate;

/// Extends `NaiveDate` with prayer schedule computation.
pub trait WaqtDateExt {
    /// Computes the day's prayer schedule for an observer.
    fn prayer_times(
        &self,
        coordinates: Coordinates,
        parameters: &CalculationParameters,
    ) -> Result<PrayerTimes, WaqtError>;
}

impl WaqtDateExt for NaiveDate {
    fn prayer_times(
        &self,
        coordinates: Coordinates,
        parameters: &CalculationParameters,
    ) -> Result<PrayerTimes, WaqtError> {
        PrayerTimes::new(coordinates, DateComponents::from(*self), parameters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::CalculationMethod;

    #[test]
    fn test_extension_matches_direct_call() {
        let date = NaiveDate::from_ymd_opt(2015, 7, 12).unwrap();
        let raleigh = Coordinates::new(35.7750, -78.6336);
        let params = CalculationMethod::NorthAmerica.parameters();

        let via_ext = date.prayer_times(raleigh, &params).unwrap();
        let direct =
            PrayerTimes::new(raleigh, DateComponents::new(2015, 7, 12), &params).unwrap();
        assert_eq!(via_ext, direct);
    }
}

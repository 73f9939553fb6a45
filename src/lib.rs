//! # Waqt
//!
//! Daily Islamic prayer times from solar position astronomy.
//!
//! The engine evaluates a truncated solar ephemeris series, solves the clock
//! time at which the sun crosses a target altitude, and assembles the six
//! canonical instants for one day at one location under a named calculation
//! convention. All instants are `DateTime<Utc>`; time zone display belongs to
//! the caller.
//!
//! ## Usage
//!
//! ```rust
//! use waqt::prelude::*;
//!
//! let raleigh = Coordinates::new(35.7750, -78.6336);
//! let date = DateComponents::new(2015, 7, 12);
//! let params = CalculationMethod::NorthAmerica.parameters().madhab(Madhab::Hanafi);
//!
//! let times = PrayerTimes::new(raleigh, date, &params)?;
//! println!("Fajr: {}", times.fajr);
//! println!("Maghrib: {}", times.maghrib);
//! # Ok::<(), waqt::WaqtError>(())
//! ```

pub mod astronomy;
pub mod extension;
pub mod rules;
pub mod types;

pub use astronomy::prayer::PrayerTimes;
pub use astronomy::solar::{SolarCoordinates, SolarTime};
pub use extension::WaqtDateExt;
pub use rules::{CalculationMethod, CalculationParameters, NightPortions};
pub use types::{
    Coordinates, DateComponents, HighLatitudeRule, Madhab, Prayer, TimeAdjustments, WaqtError,
};

pub mod prelude {
    pub use crate::astronomy::prayer::PrayerTimes;
    pub use crate::extension::WaqtDateExt;
    pub use crate::rules::{CalculationMethod, CalculationParameters};
    pub use crate::types::*;
}

//! crates/fuelsplit_core/src/validate.rs
//!
//! Step-level validation of raw, user-entered field text. Validation never
//! panics and never throws: each step yields either the parsed values or
//! human-readable messages for every offending field at once, so the user
//! sees all problems in a single pass.

use crate::domain::TripInputs;

/// Raw text of the three fields of one trip step, exactly as entered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TripForm {
    pub mileage: String,
    pub distance: String,
    pub passengers: String,
}

/// One error slot per trip field. Slots are rebuilt from scratch on every
/// validation pass, which doubles as clearing stale messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TripFieldErrors {
    pub mileage: Option<String>,
    pub distance: Option<String>,
    pub passengers: Option<String>,
}

impl TripFieldErrors {
    pub fn is_clear(&self) -> bool {
        self.mileage.is_none() && self.distance.is_none() && self.passengers.is_none()
    }
}

/// Parses the field as a finite float; empty text is invalid, not zero.
fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Validates the rate step: finite and >= 0, zero allowed.
pub fn validate_rate(raw: &str) -> Result<f64, String> {
    match parse_number(raw) {
        Some(rate) if rate >= 0.0 => Ok(rate),
        _ => Err("Fuel rate must be \u{2265} 0".to_string()),
    }
}

/// Validates one trip step, identically for trip 1 and trip 2.
///
/// Mileage and distance must be finite and strictly positive; passengers
/// must be a non-negative integer (fractional or negative values are
/// rejected, not rounded). All three checks run unconditionally.
pub fn validate_trip(form: &TripForm) -> Result<TripInputs, TripFieldErrors> {
    let mileage = parse_number(&form.mileage).filter(|m| *m > 0.0);
    let distance = parse_number(&form.distance).filter(|d| *d > 0.0);
    let passengers = form.passengers.trim().parse::<u32>().ok();

    let errors = TripFieldErrors {
        mileage: mileage
            .is_none()
            .then(|| "Mileage must be > 0".to_string()),
        distance: distance
            .is_none()
            .then(|| "Distance must be > 0".to_string()),
        passengers: passengers
            .is_none()
            .then(|| "Passengers must be \u{2265} 0".to_string()),
    };

    match (mileage, distance, passengers) {
        (Some(mileage_km_per_l), Some(distance_km), Some(passengers)) => Ok(TripInputs {
            distance_km,
            mileage_km_per_l,
            passengers,
        }),
        _ => Err(errors),
    }
}

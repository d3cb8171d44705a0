//! crates/fuelsplit_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application: a computed
//! `Trip`, the `Session` aggregate, and the persisted `HistoryEntry`.
//! These structs carry no I/O; serialization derives exist because the
//! `Session` record itself is the wire payload of the history store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::validate::{validate_rate, validate_trip, TripForm};

/// Version tag carried by every serialized session. The store only reads
/// and writes this canonical schema; the legacy flat field names that
/// predate it (`cost1`, `per1`) are not recognized.
pub const SCHEMA_VERSION: u16 = 2;

/// The kind of fuel a session is priced against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FuelKind {
    Petrol,
    Diesel,
}

impl FuelKind {
    /// Uppercase label used in share text and rendered summaries.
    pub fn label(self) -> &'static str {
        match self {
            FuelKind::Petrol => "PETROL",
            FuelKind::Diesel => "DIESEL",
        }
    }

    /// Lowercase wire name, identical to the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            FuelKind::Petrol => "petrol",
            FuelKind::Diesel => "diesel",
        }
    }
}

/// Whether a session covers one trip or two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TripMode {
    Single,
    Two,
}

impl TripMode {
    /// Lowercase wire name, identical to the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            TripMode::Single => "single",
            TripMode::Two => "two",
        }
    }
}

/// Validated numeric inputs for one trip, produced by the validator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TripInputs {
    pub distance_km: f64,
    pub mileage_km_per_l: f64,
    pub passengers: u32,
}

/// One leg of travel with its derived fuel figures. Immutable once
/// computed; recomputed from scratch whenever an input changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub distance_km: f64,
    pub mileage_km_per_l: f64,
    pub passengers: u32,
    pub liters: f64,
    pub cost: f64,
    pub split_count: u32,
    pub cost_per_person: f64,
}

impl Trip {
    /// Derives a trip from validated inputs and a fuel rate.
    ///
    /// Total for valid inputs: the validator guarantees `mileage > 0`, so
    /// the liters division cannot blow up, and `split_count >= 1` always
    /// because the driver is counted in.
    pub fn compute(inputs: TripInputs, rate_per_liter: f64) -> Self {
        let liters = inputs.distance_km / inputs.mileage_km_per_l;
        let cost = liters * rate_per_liter;
        let split_count = inputs.passengers + 1;
        let cost_per_person = cost / f64::from(split_count);

        Self {
            distance_km: inputs.distance_km,
            mileage_km_per_l: inputs.mileage_km_per_l,
            passengers: inputs.passengers,
            liters,
            cost,
            split_count,
            cost_per_person,
        }
    }
}

/// The second trip of a session, as an explicit tagged variant.
///
/// `NotApplicable` means single-trip mode, `Pending` means two-trip mode
/// with trip 2 inputs not yet valid, `Ready` holds the computed trip.
/// A `Pending` slot marks the session as a live preview and blocks
/// finalization; it never reaches the wire.
#[derive(Debug, Clone, PartialEq, Default, ToSchema)]
pub enum TripSlot {
    #[default]
    NotApplicable,
    Pending,
    Ready(Trip),
}

impl TripSlot {
    pub fn is_ready(&self) -> bool {
        matches!(self, TripSlot::Ready(_))
    }

    pub fn ready(&self) -> Option<&Trip> {
        match self {
            TripSlot::Ready(trip) => Some(trip),
            _ => None,
        }
    }

    /// Liters contributed to the session total; zero unless ready.
    fn liters(&self) -> f64 {
        self.ready().map_or(0.0, |t| t.liters)
    }

    fn cost(&self) -> f64 {
        self.ready().map_or(0.0, |t| t.cost)
    }
}

// On the wire a slot is either the trip object or null. Only finalized
// sessions are persisted, so null always reads back as `NotApplicable`.
fn serialize_trip_slot<S: Serializer>(slot: &TripSlot, ser: S) -> Result<S::Ok, S::Error> {
    match slot.ready() {
        Some(trip) => ser.serialize_some(trip),
        None => ser.serialize_none(),
    }
}

fn deserialize_trip_slot<'de, D: Deserializer<'de>>(de: D) -> Result<TripSlot, D::Error> {
    let trip = Option::<Trip>::deserialize(de)?;
    Ok(trip.map_or(TripSlot::NotApplicable, TripSlot::Ready))
}

/// The finalized (or previewed) result of one calculator run: one or two
/// trips plus totals. This record is the wire payload of the history store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default = "default_schema_version")]
    pub schema_version: u16,
    pub fuel: FuelKind,
    #[serde(rename = "tripMode")]
    pub mode: TripMode,
    #[serde(rename = "rate")]
    pub rate_per_liter: f64,
    pub trip1: Trip,
    #[serde(
        default,
        serialize_with = "serialize_trip_slot",
        deserialize_with = "deserialize_trip_slot"
    )]
    pub trip2: TripSlot,
    pub total_liters: f64,
    pub total_cost: f64,
    #[serde(rename = "timestamp")]
    pub created_at: DateTime<Utc>,
}

fn default_schema_version() -> u16 {
    SCHEMA_VERSION
}

impl Session {
    /// Combines the raw wizard fields into a session.
    ///
    /// Returns `None` when the rate or trip 1 is invalid, since those are
    /// mandatory in every mode. In two-trip mode an invalid trip 2 yields
    /// a preview session with `trip2 = Pending` so trip 1 figures can be
    /// shown while the user is still typing; such a session is not
    /// finalizable. Deterministic in its inputs plus the supplied clock.
    pub fn aggregate(
        fuel: FuelKind,
        mode: TripMode,
        rate_raw: &str,
        trip1_raw: &TripForm,
        trip2_raw: &TripForm,
        now: DateTime<Utc>,
    ) -> Option<Self> {
        let rate = validate_rate(rate_raw).ok()?;
        let trip1 = Trip::compute(validate_trip(trip1_raw).ok()?, rate);

        let trip2 = match mode {
            TripMode::Single => TripSlot::NotApplicable,
            TripMode::Two => match validate_trip(trip2_raw) {
                Ok(inputs) => TripSlot::Ready(Trip::compute(inputs, rate)),
                Err(_) => TripSlot::Pending,
            },
        };

        let total_liters = trip1.liters + trip2.liters();
        let total_cost = trip1.cost + trip2.cost();

        Some(Self {
            schema_version: SCHEMA_VERSION,
            fuel,
            mode,
            rate_per_liter: rate,
            trip1,
            trip2,
            total_liters,
            total_cost,
            created_at: now,
        })
    }

    /// A session is finalized, and thereby eligible for saving and
    /// sharing, once every trip its mode requires has passed validation.
    pub fn is_finalized(&self) -> bool {
        match self.mode {
            TripMode::Single => matches!(self.trip2, TripSlot::NotApplicable),
            TripMode::Two => self.trip2.is_ready(),
        }
    }
}

/// A persisted session plus its server-assigned identity. The session
/// fields are flattened on the wire, matching what the history service
/// returns from its list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub session: Session,
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    fn trip_form(mileage: &str, distance: &str, passengers: &str) -> TripForm {
        TripForm {
            mileage: mileage.to_string(),
            distance: distance.to_string(),
            passengers: passengers.to_string(),
        }
    }

    #[test]
    fn compute_derives_liters_cost_and_split() {
        let trip = Trip::compute(
            TripInputs {
                distance_km: 150.0,
                mileage_km_per_l: 15.0,
                passengers: 3,
            },
            100.0,
        );

        assert!(close(trip.liters, 10.0));
        assert!(close(trip.cost, 1000.0));
        assert_eq!(trip.split_count, 4);
        assert!(close(trip.cost_per_person, 250.0));
    }

    #[test]
    fn compute_is_pure() {
        let inputs = TripInputs {
            distance_km: 72.5,
            mileage_km_per_l: 13.3,
            passengers: 2,
        };
        assert_eq!(Trip::compute(inputs, 94.2), Trip::compute(inputs, 94.2));
    }

    #[test]
    fn driver_riding_alone_still_splits_by_one() {
        let trip = Trip::compute(
            TripInputs {
                distance_km: 10.0,
                mileage_km_per_l: 10.0,
                passengers: 0,
            },
            50.0,
        );
        assert_eq!(trip.split_count, 1);
        assert!(close(trip.cost_per_person, trip.cost));
    }

    #[test]
    fn zero_rate_yields_zero_cost() {
        let trip = Trip::compute(
            TripInputs {
                distance_km: 100.0,
                mileage_km_per_l: 20.0,
                passengers: 1,
            },
            0.0,
        );
        assert!(close(trip.liters, 5.0));
        assert!(close(trip.cost, 0.0));
        assert!(close(trip.cost_per_person, 0.0));
    }

    #[test]
    fn single_mode_totals_come_from_trip1_alone() {
        let session = Session::aggregate(
            FuelKind::Petrol,
            TripMode::Single,
            "100",
            &trip_form("15", "150", "3"),
            &trip_form("", "", ""),
            Utc::now(),
        )
        .unwrap();

        assert!(close(session.total_cost, session.trip1.cost));
        assert!(close(session.total_liters, session.trip1.liters));
        assert_eq!(session.trip2, TripSlot::NotApplicable);
        assert!(session.is_finalized());
    }

    #[test]
    fn two_mode_totals_sum_both_trips() {
        let session = Session::aggregate(
            FuelKind::Diesel,
            TripMode::Two,
            "100",
            &trip_form("15", "150", "3"),
            &trip_form("20", "100", "1"),
            Utc::now(),
        )
        .unwrap();

        let trip2 = session.trip2.ready().unwrap();
        assert!(close(trip2.liters, 5.0));
        assert!(close(trip2.cost, 500.0));
        assert_eq!(trip2.split_count, 2);
        assert!(close(trip2.cost_per_person, 250.0));

        assert!(close(session.total_cost, 1500.0));
        assert!(close(session.total_liters, 15.0));
        assert!(session.is_finalized());
    }

    #[test]
    fn two_mode_with_incomplete_trip2_previews_as_pending() {
        let session = Session::aggregate(
            FuelKind::Petrol,
            TripMode::Two,
            "100",
            &trip_form("15", "150", "3"),
            &trip_form("20", "", "1"),
            Utc::now(),
        )
        .unwrap();

        assert_eq!(session.trip2, TripSlot::Pending);
        assert!(!session.is_finalized());
        // The preview still carries trip 1 so it can be displayed live.
        assert!(close(session.total_cost, session.trip1.cost));
    }

    #[test]
    fn aggregate_requires_rate_and_trip1() {
        let trip1 = trip_form("15", "150", "3");
        let empty = trip_form("", "", "");
        let now = Utc::now();

        assert!(
            Session::aggregate(FuelKind::Petrol, TripMode::Single, "-1", &trip1, &empty, now)
                .is_none()
        );
        assert!(
            Session::aggregate(FuelKind::Petrol, TripMode::Single, "100", &empty, &empty, now)
                .is_none()
        );
    }

    #[test]
    fn session_serializes_with_canonical_field_names() {
        let session = Session::aggregate(
            FuelKind::Petrol,
            TripMode::Single,
            "100",
            &trip_form("15", "150", "3"),
            &trip_form("", "", ""),
            Utc::now(),
        )
        .unwrap();

        let value = serde_json::to_value(&session).unwrap();
        assert_eq!(value["schemaVersion"], 2);
        assert_eq!(value["fuel"], "petrol");
        assert_eq!(value["tripMode"], "single");
        assert_eq!(value["rate"], 100.0);
        assert!(value["trip2"].is_null());
        assert_eq!(value["trip1"]["splitCount"], 4);
        assert_eq!(value["trip1"]["costPerPerson"], 250.0);
        assert!(value["totalLiters"].is_number());
        assert!(value["totalCost"].is_number());
        assert!(value["timestamp"].is_string());
    }

    #[test]
    fn session_round_trips_through_json() {
        let session = Session::aggregate(
            FuelKind::Diesel,
            TripMode::Two,
            "92.5",
            &trip_form("15", "150", "3"),
            &trip_form("20", "100", "1"),
            Utc::now(),
        )
        .unwrap();

        let json = serde_json::to_string(&session).unwrap();
        let back: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(back, session);
    }

    #[test]
    fn null_trip2_deserializes_as_not_applicable() {
        let json = r#"{
            "schemaVersion": 2,
            "fuel": "petrol",
            "tripMode": "single",
            "rate": 100.0,
            "trip1": {
                "distanceKm": 150.0, "mileageKmPerL": 15.0, "passengers": 3,
                "liters": 10.0, "cost": 1000.0, "splitCount": 4, "costPerPerson": 250.0
            },
            "trip2": null,
            "totalLiters": 10.0,
            "totalCost": 1000.0,
            "timestamp": "2024-06-01T10:00:00Z"
        }"#;

        let session: Session = serde_json::from_str(json).unwrap();
        assert_eq!(session.trip2, TripSlot::NotApplicable);
        assert!(session.is_finalized());
    }
}

pub mod domain;
pub mod ports;
pub mod share;
pub mod validate;
pub mod wizard;

pub use domain::{
    FuelKind, HistoryEntry, Session, Trip, TripInputs, TripMode, TripSlot, SCHEMA_VERSION,
};
pub use ports::{HistoryStore, PortError, PortResult};
pub use share::{format_inr, round2, share_text};
pub use validate::{validate_rate, validate_trip, TripFieldErrors, TripForm};
pub use wizard::{Notice, NoticeKind, Transition, Wizard, WizardStep};

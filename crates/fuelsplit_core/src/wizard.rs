//! crates/fuelsplit_core/src/wizard.rs
//!
//! The four-step wizard controller. All of its state lives in one explicit
//! holder struct owned by the caller, so several wizards can coexist and
//! every transition is unit-testable without ambient globals.
//!
//! Steps run Rate -> Trip 1 -> [Trip 2] -> Result, where Trip 2 exists
//! only in two-trip mode. Guarded transitions never panic: a refusal
//! returns the transient notice to show, alongside the per-field error
//! slots updated in place.

use chrono::Utc;

use crate::domain::{FuelKind, Session, TripMode};
use crate::validate::{validate_rate, validate_trip, TripFieldErrors, TripForm};

/// The wizard's position in the flow. Numbered 1..=4 for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    Rate,
    Trip1,
    Trip2,
    Result,
}

impl WizardStep {
    pub fn number(self) -> u8 {
        match self {
            WizardStep::Rate => 1,
            WizardStep::Trip1 => 2,
            WizardStep::Trip2 => 3,
            WizardStep::Result => 4,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            WizardStep::Rate => "Fuel rate",
            WizardStep::Trip1 => "Trip 1",
            WizardStep::Trip2 => "Trip 2",
            WizardStep::Result => "Result",
        }
    }
}

/// Severity of a transient notice, mirroring the ok/warn/err toasts of the
/// result screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Ok,
    Warn,
    Error,
}

/// A short, user-facing message emitted by a transition or guarded action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Ok,
            text: text.into(),
        }
    }

    pub fn warn(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Warn,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }
}

/// Outcome of an `advance` attempt: either the wizard moved to a new step,
/// or it stayed put and the caller should surface the notice.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    Moved(WizardStep),
    Refused(Notice),
}

/// Raw form fields for the whole wizard, exactly as the user typed them.
#[derive(Debug, Clone)]
pub struct WizardForms {
    pub fuel: FuelKind,
    pub mode: TripMode,
    pub rate: String,
    pub trip1: TripForm,
    pub trip2: TripForm,
}

impl Default for WizardForms {
    fn default() -> Self {
        Self {
            fuel: FuelKind::Petrol,
            mode: TripMode::Single,
            rate: String::new(),
            trip1: TripForm::default(),
            trip2: TripForm::default(),
        }
    }
}

/// Field-level error slots for every step, cleared and rebuilt on each
/// validation pass.
#[derive(Debug, Clone, Default)]
pub struct FieldErrors {
    pub rate: Option<String>,
    pub trip1: TripFieldErrors,
    pub trip2: TripFieldErrors,
}

/// The wizard state holder: current step, raw forms, error slots, the most
/// recently finalized session, and the append-in-flight flag.
#[derive(Debug, Default)]
pub struct Wizard {
    step: WizardStep,
    pub forms: WizardForms,
    pub errors: FieldErrors,
    last_result: Option<Session>,
    append_in_flight: bool,
}

impl Default for WizardStep {
    fn default() -> Self {
        WizardStep::Rate
    }
}

impl Wizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    /// The most recently finalized session, if any. Share and save are
    /// only meaningful while this is populated.
    pub fn last_result(&self) -> Option<&Session> {
        self.last_result.as_ref()
    }

    pub fn append_in_flight(&self) -> bool {
        self.append_in_flight
    }

    /// Re-aggregates the current fields into a live-preview session.
    /// Never touches `last_result`; the preview may be non-finalizable.
    pub fn preview(&self) -> Option<Session> {
        Session::aggregate(
            self.forms.fuel,
            self.forms.mode,
            &self.forms.rate,
            &self.forms.trip1,
            &self.forms.trip2,
            Utc::now(),
        )
    }

    /// Attempts the forward transition out of the current step.
    ///
    /// Each guard re-validates its own fields; on failure the wizard stays
    /// where it is, the error slots are updated, and the returned notice
    /// is the transient message to show. Entering the result step
    /// finalizes the session and replaces `last_result` wholesale.
    pub fn advance(&mut self) -> Transition {
        match self.step {
            WizardStep::Rate => {
                match validate_rate(&self.forms.rate) {
                    Ok(_) => {
                        self.errors.rate = None;
                        self.step = WizardStep::Trip1;
                        Transition::Moved(self.step)
                    }
                    Err(message) => {
                        self.errors.rate = Some(message);
                        Transition::Refused(Notice::error("Fix fuel rate first."))
                    }
                }
            }
            WizardStep::Trip1 => {
                match validate_trip(&self.forms.trip1) {
                    Ok(_) => {
                        self.errors.trip1 = TripFieldErrors::default();
                        match self.forms.mode {
                            TripMode::Single => self.finalize(),
                            TripMode::Two => {
                                self.step = WizardStep::Trip2;
                                Transition::Moved(self.step)
                            }
                        }
                    }
                    Err(errors) => {
                        self.errors.trip1 = errors;
                        Transition::Refused(Notice::error("Fix Trip 1 inputs."))
                    }
                }
            }
            WizardStep::Trip2 => {
                match validate_trip(&self.forms.trip2) {
                    Ok(_) => {
                        self.errors.trip2 = TripFieldErrors::default();
                        self.finalize()
                    }
                    Err(errors) => {
                        self.errors.trip2 = errors;
                        Transition::Refused(Notice::error("Fix Trip 2 inputs."))
                    }
                }
            }
            // Already at the end of the flow.
            WizardStep::Result => Transition::Moved(WizardStep::Result),
        }
    }

    /// Builds the finalized session and enters the result step. The step
    /// guards have already validated the fields, but aggregation is
    /// re-checked so a stale form can never finalize a broken session.
    fn finalize(&mut self) -> Transition {
        let session = self.preview().filter(Session::is_finalized);
        match session {
            Some(session) => {
                self.last_result = Some(session);
                self.step = WizardStep::Result;
                Transition::Moved(self.step)
            }
            None => Transition::Refused(Notice::error("Enter valid values.")),
        }
    }

    /// Steps backwards, mirroring the forward transitions. From the result
    /// step this returns to Trip 2 or Trip 1 depending on the mode.
    pub fn back(&mut self) -> WizardStep {
        self.step = match self.step {
            WizardStep::Rate => WizardStep::Rate,
            WizardStep::Trip1 => WizardStep::Rate,
            WizardStep::Trip2 => WizardStep::Trip1,
            WizardStep::Result => match self.forms.mode {
                TripMode::Single => WizardStep::Trip1,
                TripMode::Two => WizardStep::Trip2,
            },
        };
        self.step
    }

    /// Unconditional reset to the rate step. Clears the finalized result
    /// and all error slots; the typed field values are kept.
    pub fn reset(&mut self) {
        self.step = WizardStep::Rate;
        self.last_result = None;
        self.errors = FieldErrors::default();
    }

    /// Share text for the finalized result, or a warning notice when
    /// there is nothing to share yet.
    pub fn share_text(&self) -> Result<String, Notice> {
        match &self.last_result {
            Some(session) => Ok(crate::share::share_text(session)),
            None => Err(Notice::warn("No result to share.")),
        }
    }

    /// Check-and-set guard for saving: refuses when no finalized result
    /// exists or another append is still outstanding, otherwise marks an
    /// append in flight and hands back the session to send.
    pub fn begin_append(&mut self) -> Result<Session, Notice> {
        let session = match &self.last_result {
            Some(session) => session.clone(),
            None => return Err(Notice::warn("No result to save.")),
        };
        if self.append_in_flight {
            return Err(Notice::warn("Already saving..."));
        }
        self.append_in_flight = true;
        Ok(session)
    }

    /// Clears the in-flight flag once the append resolves, whether it
    /// succeeded or failed. A failed save leaves `last_result` untouched
    /// so the user can simply retry.
    pub fn finish_append(&mut self) {
        self.append_in_flight = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_trip(form: &mut TripForm, mileage: &str, distance: &str, passengers: &str) {
        form.mileage = mileage.to_string();
        form.distance = distance.to_string();
        form.passengers = passengers.to_string();
    }

    fn wizard_at_trip1(mode: TripMode) -> Wizard {
        let mut wizard = Wizard::new();
        wizard.forms.mode = mode;
        wizard.forms.rate = "100".to_string();
        assert_eq!(wizard.advance(), Transition::Moved(WizardStep::Trip1));
        wizard
    }

    #[test]
    fn invalid_rate_refuses_transition_and_stays_on_rate() {
        let mut wizard = Wizard::new();
        wizard.forms.rate = "-3".to_string();

        let outcome = wizard.advance();
        assert!(matches!(outcome, Transition::Refused(_)));
        assert_eq!(wizard.step(), WizardStep::Rate);
        assert!(wizard.errors.rate.is_some());
    }

    #[test]
    fn valid_rate_clears_error_and_moves_on() {
        let mut wizard = Wizard::new();
        wizard.forms.rate = "bogus".to_string();
        wizard.advance();
        assert!(wizard.errors.rate.is_some());

        wizard.forms.rate = "0".to_string();
        assert_eq!(wizard.advance(), Transition::Moved(WizardStep::Trip1));
        assert!(wizard.errors.rate.is_none());
    }

    #[test]
    fn single_mode_skips_trip2_and_finalizes() {
        let mut wizard = wizard_at_trip1(TripMode::Single);
        filled_trip(&mut wizard.forms.trip1, "15", "150", "3");

        assert_eq!(wizard.advance(), Transition::Moved(WizardStep::Result));
        let session = wizard.last_result().unwrap();
        assert!(session.is_finalized());
        assert_eq!(session.mode, TripMode::Single);
    }

    #[test]
    fn two_mode_requires_both_trips_before_result() {
        let mut wizard = wizard_at_trip1(TripMode::Two);
        filled_trip(&mut wizard.forms.trip1, "15", "150", "3");

        assert_eq!(wizard.advance(), Transition::Moved(WizardStep::Trip2));
        assert!(wizard.last_result().is_none());

        filled_trip(&mut wizard.forms.trip2, "0", "100", "1");
        assert!(matches!(wizard.advance(), Transition::Refused(_)));
        assert_eq!(wizard.step(), WizardStep::Trip2);
        assert!(wizard.errors.trip2.mileage.is_some());

        filled_trip(&mut wizard.forms.trip2, "20", "100", "1");
        assert_eq!(wizard.advance(), Transition::Moved(WizardStep::Result));
        assert!(wizard.last_result().unwrap().is_finalized());
    }

    #[test]
    fn invalid_trip1_surfaces_field_errors() {
        let mut wizard = wizard_at_trip1(TripMode::Single);
        filled_trip(&mut wizard.forms.trip1, "", "-1", "2.5");

        assert!(matches!(wizard.advance(), Transition::Refused(_)));
        assert!(wizard.errors.trip1.mileage.is_some());
        assert!(wizard.errors.trip1.distance.is_some());
        assert!(wizard.errors.trip1.passengers.is_some());
    }

    #[test]
    fn back_mirrors_forward_transitions() {
        let mut wizard = wizard_at_trip1(TripMode::Two);
        filled_trip(&mut wizard.forms.trip1, "15", "150", "3");
        filled_trip(&mut wizard.forms.trip2, "20", "100", "1");
        wizard.advance();
        wizard.advance();
        assert_eq!(wizard.step(), WizardStep::Result);

        assert_eq!(wizard.back(), WizardStep::Trip2);
        assert_eq!(wizard.back(), WizardStep::Trip1);
        assert_eq!(wizard.back(), WizardStep::Rate);
        assert_eq!(wizard.back(), WizardStep::Rate);
    }

    #[test]
    fn back_from_result_in_single_mode_returns_to_trip1() {
        let mut wizard = wizard_at_trip1(TripMode::Single);
        filled_trip(&mut wizard.forms.trip1, "15", "150", "3");
        wizard.advance();

        assert_eq!(wizard.back(), WizardStep::Trip1);
    }

    #[test]
    fn finalizing_again_replaces_last_result_wholesale() {
        let mut wizard = wizard_at_trip1(TripMode::Single);
        filled_trip(&mut wizard.forms.trip1, "15", "150", "3");
        wizard.advance();
        let first_cost = wizard.last_result().unwrap().total_cost;

        wizard.back();
        filled_trip(&mut wizard.forms.trip1, "15", "300", "3");
        wizard.advance();
        let second_cost = wizard.last_result().unwrap().total_cost;

        assert!((first_cost - 1000.0).abs() < 1e-9);
        assert!((second_cost - 2000.0).abs() < 1e-9);
    }

    #[test]
    fn reset_returns_to_rate_and_clears_result() {
        let mut wizard = wizard_at_trip1(TripMode::Single);
        filled_trip(&mut wizard.forms.trip1, "15", "150", "3");
        wizard.advance();
        assert!(wizard.last_result().is_some());

        wizard.reset();
        assert_eq!(wizard.step(), WizardStep::Rate);
        assert!(wizard.last_result().is_none());
        assert!(matches!(
            wizard.share_text(),
            Err(Notice {
                kind: NoticeKind::Warn,
                ..
            })
        ));
    }

    #[test]
    fn share_requires_a_finalized_result() {
        let wizard = Wizard::new();
        assert!(wizard.share_text().is_err());
    }

    #[test]
    fn second_append_is_refused_while_one_is_in_flight() {
        let mut wizard = wizard_at_trip1(TripMode::Single);
        filled_trip(&mut wizard.forms.trip1, "15", "150", "3");
        wizard.advance();

        let first = wizard.begin_append();
        assert!(first.is_ok());
        assert!(wizard.append_in_flight());

        let second = wizard.begin_append();
        assert!(matches!(
            second,
            Err(Notice {
                kind: NoticeKind::Warn,
                ..
            })
        ));
        // The first append's session is unaffected by the refusal.
        assert!(first.unwrap().is_finalized());
    }

    #[test]
    fn append_allowed_again_after_finish_even_on_failure() {
        let mut wizard = wizard_at_trip1(TripMode::Single);
        filled_trip(&mut wizard.forms.trip1, "15", "150", "3");
        wizard.advance();

        wizard.begin_append().unwrap();
        wizard.finish_append();
        assert!(!wizard.append_in_flight());
        assert!(wizard.begin_append().is_ok());
        // A failed save never clears the finalized result.
        assert!(wizard.last_result().is_some());
    }

    #[test]
    fn append_with_no_result_is_a_guarded_no_op() {
        let mut wizard = Wizard::new();
        assert!(wizard.begin_append().is_err());
        assert!(!wizard.append_in_flight());
    }

    #[test]
    fn preview_never_touches_last_result() {
        let mut wizard = wizard_at_trip1(TripMode::Two);
        filled_trip(&mut wizard.forms.trip1, "15", "150", "3");

        let preview = wizard.preview().unwrap();
        assert!(!preview.is_finalized());
        assert!(wizard.last_result().is_none());
    }
}

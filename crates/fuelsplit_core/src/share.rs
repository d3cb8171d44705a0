//! crates/fuelsplit_core/src/share.rs
//!
//! The plain-text share summary and the numeric display formats it leans
//! on. The share text is consumed by a messaging deep link, so its field
//! order is a stable external contract; change it deliberately or not at
//! all. Currency is rendered in the Indian-grouping rupee format, liters
//! rounded to two decimals for display while full precision stays inside
//! the session.

use crate::domain::{Session, Trip, TripMode};

/// Rounds to two decimal places for display. Internal arithmetic always
/// runs on the unrounded values.
pub fn round2(n: f64) -> f64 {
    (n * 100.0).round() / 100.0
}

// Indian digit grouping: the last three digits stand alone, everything
// above them is grouped in pairs (12,34,567).
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);

    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}

/// Formats an amount as rupees with two decimals and en-IN grouping,
/// e.g. `1234567.891 -> ₹12,34,567.89`.
pub fn format_inr(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let cents = (amount.abs() * 100.0).round() as u128;
    let rupees = cents / 100;
    let paise = cents % 100;

    format!("{}\u{20b9}{}.{:02}", sign, group_indian(&rupees.to_string()), paise)
}

fn trip_block(label: &str, trip: &Trip) -> [String; 6] {
    [
        format!("{label}:"),
        format!("Mileage: {} km/L", round2(trip.mileage_km_per_l)),
        format!("Distance: {} km", round2(trip.distance_km)),
        format!("Passengers: {} (+ driver)", trip.passengers),
        format!("Cost: {}", format_inr(trip.cost)),
        format!("Per Person: {}", format_inr(trip.cost_per_person)),
    ]
}

/// Builds the shareable summary for a finalized session.
///
/// Fixed field order: header line with mode and fuel, rate line, Trip 1
/// block, optional Trip 2 block, then totals.
pub fn share_text(session: &Session) -> String {
    let mode_label = match session.mode {
        TripMode::Single => "Single Trip",
        TripMode::Two => "Two Trips",
    };

    let mut lines = vec![
        format!(
            "FuelSplit \u{2014} {} ({})",
            mode_label,
            session.fuel.label()
        ),
        format!("Rate: \u{20b9}{}/L", round2(session.rate_per_liter)),
        String::new(),
    ];
    lines.extend(trip_block("Trip 1", &session.trip1));

    if let Some(trip2) = session.trip2.ready() {
        lines.push(String::new());
        lines.extend(trip_block("Trip 2", trip2));
    }

    lines.push(String::new());
    lines.push(format!("Total Cost: {}", format_inr(session.total_cost)));
    lines.push(format!("Total Fuel: {} L", round2(session.total_liters)));

    lines.join("\n")
}

//! services/cli/src/ui.rs
//!
//! The interactive four-step wizard over stdin/stdout, plus the history
//! rendering shared with the non-interactive subcommands. All business
//! rules live in the core wizard; this module only prompts, prints, and
//! relays notices.

use std::io::{self, Write};

use colored::Colorize;
use fuelsplit_core::domain::{FuelKind, HistoryEntry, Session, Trip, TripMode};
use fuelsplit_core::ports::HistoryStore;
use fuelsplit_core::share::{format_inr, round2};
use fuelsplit_core::validate::TripFieldErrors;
use fuelsplit_core::wizard::{Notice, NoticeKind, Transition, Wizard, WizardStep};

/// Whether the result menu wants the program to end.
#[derive(PartialEq, Eq)]
enum Outcome {
    Continue,
    Quit,
}

fn prompt(label: &str) -> io::Result<String> {
    print!("{label}: ");
    io::stdout().flush()?;

    let mut line = String::new();
    let read = io::stdin().read_line(&mut line)?;
    if read == 0 {
        // Stdin closed; surface it so the caller can exit cleanly.
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed"));
    }
    Ok(line.trim().to_string())
}

fn show_notice(notice: &Notice) {
    let text = match notice.kind {
        NoticeKind::Ok => notice.text.green(),
        NoticeKind::Warn => notice.text.yellow(),
        NoticeKind::Error => notice.text.red(),
    };
    println!("{text}");
}

fn show_field_error(label: &str, error: &Option<String>) {
    if let Some(message) = error {
        println!("  {} {}", format!("{label}:").bold(), message.red());
    }
}

fn show_trip_errors(errors: &TripFieldErrors) {
    show_field_error("mileage", &errors.mileage);
    show_field_error("distance", &errors.distance);
    show_field_error("passengers", &errors.passengers);
}

fn step_header(step: WizardStep) {
    println!();
    println!(
        "{} {}",
        format!("[Step {} of 4]", step.number()).bold(),
        step.title()
    );
}

//=========================================================================================
// Step Screens
//=========================================================================================

fn rate_step(wizard: &mut Wizard) -> io::Result<()> {
    step_header(WizardStep::Rate);

    let fuel = prompt("Fuel type [p]etrol / [d]iesel (default petrol)")?;
    wizard.forms.fuel = match fuel.to_lowercase().as_str() {
        "d" | "diesel" => FuelKind::Diesel,
        _ => FuelKind::Petrol,
    };

    let mode = prompt("Trips to calculate [1] single / [2] two (default single)")?;
    wizard.forms.mode = match mode.as_str() {
        "2" | "two" => TripMode::Two,
        _ => TripMode::Single,
    };

    wizard.forms.rate = prompt("Fuel rate per liter")?;

    if let Transition::Refused(notice) = wizard.advance() {
        show_field_error("rate", &wizard.errors.rate);
        show_notice(&notice);
    }
    Ok(())
}

fn mini_preview(label: &str, trip: &Trip) {
    println!(
        "  {label}: {} \u{2022} {} L \u{2022} {}/person",
        format_inr(trip.cost),
        round2(trip.liters),
        format_inr(trip.cost_per_person)
    );
}

fn trip_step(wizard: &mut Wizard, which: u8) -> io::Result<()> {
    let step = wizard.step();
    step_header(step);
    println!("  (type 'b' at any field to go back)");

    let mileage = prompt("Mileage (km/L)")?;
    if mileage == "b" {
        wizard.back();
        return Ok(());
    }
    let distance = prompt("Distance (km)")?;
    if distance == "b" {
        wizard.back();
        return Ok(());
    }
    let passengers = prompt("Passengers, excluding driver")?;
    if passengers == "b" {
        wizard.back();
        return Ok(());
    }

    let form = if which == 1 {
        &mut wizard.forms.trip1
    } else {
        &mut wizard.forms.trip2
    };
    form.mileage = mileage;
    form.distance = distance;
    form.passengers = passengers;

    match wizard.advance() {
        Transition::Moved(_) => {
            // Echo the figures the step just locked in.
            if let Some(preview) = wizard.preview() {
                if which == 1 {
                    mini_preview("Trip 1", &preview.trip1);
                } else if let Some(trip2) = preview.trip2.ready() {
                    mini_preview("Trip 2", trip2);
                }
            }
        }
        Transition::Refused(notice) => {
            let errors = if which == 1 {
                &wizard.errors.trip1
            } else {
                &wizard.errors.trip2
            };
            show_trip_errors(errors);
            show_notice(&notice);
        }
    }
    Ok(())
}

//=========================================================================================
// Result Screen
//=========================================================================================

fn trip_result_block(label: &str, trip: &Trip) {
    println!("{}", label.bold());
    println!(
        "  Mileage {} km/L \u{2022} Distance {} km",
        round2(trip.mileage_km_per_l),
        round2(trip.distance_km)
    );
    println!("  Passengers {} (+ driver)", trip.passengers);
    println!("  Fuel {} L", round2(trip.liters));
    println!("  Cost: {}", format_inr(trip.cost));
    println!(
        "  Per Person: {} (Split: {})",
        format_inr(trip.cost_per_person),
        trip.split_count
    );
}

fn render_result(session: &Session) {
    let mode_label = match session.mode {
        TripMode::Single => "SINGLE TRIP",
        TripMode::Two => "TWO TRIPS",
    };

    println!();
    println!(
        "{}",
        format!("{} \u{2022} {}", mode_label, session.fuel.label()).bold()
    );
    println!("Rate: {}/L", format_inr(session.rate_per_liter));
    println!();
    trip_result_block("Trip 1", &session.trip1);

    match session.trip2.ready() {
        Some(trip2) => {
            println!();
            trip_result_block("Trip 2", trip2);
        }
        None => println!("\nTrip 2 skipped (Single Trip mode)"),
    }

    println!();
    println!("Total Cost: {}", format_inr(session.total_cost).bold());
    println!("Total Fuel: {} L", round2(session.total_liters));
}

async fn save_result(wizard: &mut Wizard, store: &dyn HistoryStore) {
    let session = match wizard.begin_append() {
        Ok(session) => session,
        Err(notice) => {
            show_notice(&notice);
            return;
        }
    };

    let saved = store.append_session(&session).await;
    wizard.finish_append();

    match saved {
        Ok(id) => show_notice(&Notice::ok(format!("Saved (ID: {id})"))),
        Err(e) => show_notice(&Notice::error(format!("Save failed: {e}"))),
    }
}

async fn result_step(wizard: &mut Wizard, store: &dyn HistoryStore) -> io::Result<Outcome> {
    step_header(WizardStep::Result);
    if let Some(session) = wizard.last_result() {
        render_result(session);
    }

    loop {
        println!();
        let choice = prompt(
            "[s]hare  sa[v]e  [h]istory  [c]lear history  [b]ack  [n]ew calculation  [q]uit",
        )?;
        match choice.to_lowercase().as_str() {
            "s" => match wizard.share_text() {
                Ok(text) => {
                    println!();
                    println!("{text}");
                }
                Err(notice) => show_notice(&notice),
            },
            "v" => save_result(wizard, store).await,
            "h" => {
                if let Err(e) = print_history(store).await {
                    show_notice(&Notice::error(format!("{e}")));
                }
            }
            "c" => match store.clear_all().await {
                Ok(()) => show_notice(&Notice::ok("History cleared")),
                Err(e) => show_notice(&Notice::error(format!("Clear failed: {e}"))),
            },
            "b" => {
                wizard.back();
                return Ok(Outcome::Continue);
            }
            "n" => {
                wizard.reset();
                show_notice(&Notice::ok("Reset"));
                return Ok(Outcome::Continue);
            }
            "q" => return Ok(Outcome::Quit),
            _ => {}
        }
    }
}

//=========================================================================================
// History Rendering
//=========================================================================================

fn render_history_entry(entry: &HistoryEntry) {
    let session = &entry.session;
    let mode_label = match session.mode {
        TripMode::Single => "SINGLE",
        TripMode::Two => "TWO TRIPS",
    };

    println!(
        "{}  {}",
        format!("{} \u{2022} {}", mode_label, session.fuel.label()).bold(),
        entry.created_at.format("%Y-%m-%d %H:%M")
    );
    println!(
        "  Trip 1: {} \u{2022} {}/person",
        format_inr(session.trip1.cost),
        format_inr(session.trip1.cost_per_person)
    );
    match session.trip2.ready() {
        Some(trip2) => println!(
            "  Trip 2: {} \u{2022} {}/person",
            format_inr(trip2.cost),
            format_inr(trip2.cost_per_person)
        ),
        None => println!("  Trip 2: \u{2014}"),
    }
    println!(
        "  Total: {} \u{2022} {} L",
        format_inr(session.total_cost),
        round2(session.total_liters)
    );
}

/// Fetches and prints the saved history, newest first.
pub async fn print_history(store: &dyn HistoryStore) -> Result<(), fuelsplit_core::PortError> {
    let entries = store.list_entries().await?;
    if entries.is_empty() {
        println!("No history yet. Save a result to see it here.");
        return Ok(());
    }
    for entry in &entries {
        println!();
        render_history_entry(entry);
    }
    Ok(())
}

//=========================================================================================
// Main Loop
//=========================================================================================

/// Runs the interactive wizard until the user quits.
pub async fn run(store: &dyn HistoryStore) -> io::Result<()> {
    println!("{}", "FuelSplit".bold());
    println!("Carpool fuel-cost splitting, one step at a time.");

    let mut wizard = Wizard::new();
    loop {
        match wizard.step() {
            WizardStep::Rate => rate_step(&mut wizard)?,
            WizardStep::Trip1 => trip_step(&mut wizard, 1)?,
            WizardStep::Trip2 => trip_step(&mut wizard, 2)?,
            WizardStep::Result => {
                if result_step(&mut wizard, store).await? == Outcome::Quit {
                    return Ok(());
                }
            }
        }
    }
}

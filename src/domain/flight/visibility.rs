//! Which flights a public board shows, and in which order.

use std::cmp::Ordering;

use chrono::Duration;

use crate::domain::foundation::Timestamp;

use super::{Flight, FlightStatus};

/// How long a departed or arrived flight stays on the board.
pub const RECENT_MOVEMENT_WINDOW_MINUTES: i64 = 30;

/// How long a cancelled flight stays on the board after its scheduled time.
pub const CANCELLED_WINDOW_MINUTES: i64 = 120;

/// Returns true if the flight still belongs on a board at `now`.
pub fn is_visible(flight: &Flight, now: Timestamp) -> bool {
    if let Some(actual) = flight.actual_time() {
        if now.duration_since(&actual) > Duration::minutes(RECENT_MOVEMENT_WINDOW_MINUTES) {
            return false;
        }
    }
    if flight.status() == FlightStatus::Cancelled
        && now.duration_since(&flight.scheduled_time()) > Duration::minutes(CANCELLED_WINDOW_MINUTES)
    {
        return false;
    }
    true
}

/// Filter and order a flight list for display.
///
/// Boarding flights come first, then delayed ones, then everything else by
/// scheduled time. Equal keys keep their input order.
pub fn visible_flights(flights: &[Flight], now: Timestamp) -> Vec<Flight> {
    let mut visible: Vec<Flight> = flights
        .iter()
        .filter(|f| is_visible(f, now))
        .cloned()
        .collect();
    visible.sort_by(board_order);
    visible
}

fn status_rank(status: FlightStatus) -> u8 {
    match status {
        FlightStatus::Boarding => 0,
        FlightStatus::Delayed => 1,
        _ => 2,
    }
}

fn board_order(a: &Flight, b: &Flight) -> Ordering {
    let (ra, rb) = (status_rank(a.status()), status_rank(b.status()));
    match ra.cmp(&rb) {
        Ordering::Equal if ra == 2 => a.scheduled_time().cmp(&b.scheduled_time()),
        other => other,
    }
}

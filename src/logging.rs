//! Structured event logging and subscriber setup.

use tracing::{info, info_span, warn, Level};

/// Seat lifecycle event types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatEvent {
    /// A run started
    SweepStarted,
    /// Seat entitlements were disabled
    Revoked,
    /// A revocation batch was rejected or could not be sent
    RevocationFailed,
    /// Single-target lookup found no user
    TargetNotFound,
    /// A run produced its summary
    SweepCompleted,
    /// A run aborted before producing a summary
    SweepFailed,
}

impl std::fmt::Display for SeatEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SeatEvent::SweepStarted => "sweep_started",
            SeatEvent::Revoked => "revoked",
            SeatEvent::RevocationFailed => "revocation_failed",
            SeatEvent::TargetNotFound => "target_not_found",
            SeatEvent::SweepCompleted => "sweep_completed",
            SeatEvent::SweepFailed => "sweep_failed",
        };
        write!(f, "{}", s)
    }
}

/// Log a seat event for audit and debugging purposes.
///
/// Failures are logged at `warn`, everything else at `info`.
pub fn log_seat_event(event: SeatEvent, subject: &str, details: Option<&str>) {
    let span = info_span!("seat_event", event = %event, subject = %subject);
    let _enter = span.enter();

    match event {
        SeatEvent::RevocationFailed | SeatEvent::TargetNotFound | SeatEvent::SweepFailed => {
            if let Some(d) = details {
                warn!(reason = %d, "Seat event occurred");
            } else {
                warn!("Seat event occurred");
            }
        }
        _ => {
            if let Some(d) = details {
                info!(details = %d, "Seat event occurred");
            } else {
                info!("Seat event occurred");
            }
        }
    }
}

/// Map a configured level name to a tracing level; unknown names fall back to `INFO`.
pub fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Install the global fmt subscriber. Later calls are ignored.
pub fn init_tracing(level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(parse_level(level))
        .with_target(false)
        .try_init();
}

use chrono::{DateTime, Local};
use std::time::Duration;

/// Monotonic instant that also works on wasm32 (where `std::time::Instant` panics).
pub type AppInstant = web_time::Instant;

pub const STANDARD_CLOCK_FORMAT: &str = "%H:%M:%S";

pub fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

/// Wall-clock time of day, for display only.
pub fn local_clock_string(at: DateTime<Local>) -> String {
    format!("{}", at.format(STANDARD_CLOCK_FORMAT))
}

pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        return format!("{}s", secs);
    }
    let mins = secs / 60;
    if mins < 60 {
        return format!("{}m {}s", mins, secs % 60);
    }
    format!("{}h {}m", mins / 60, mins % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_pick_the_largest_sensible_unit() {
        assert_eq!(format_duration(Duration::from_secs(42)), "42s");
        assert_eq!(format_duration(Duration::from_secs(125)), "2m 5s");
        assert_eq!(format_duration(Duration::from_secs(3_720)), "1h 2m");
    }
}

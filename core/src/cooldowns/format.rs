//! Countdown display formatting

use std::time::Duration;

/// Format a remaining duration for countdown labels.
///
/// - one minute or more → `M:SS` (seconds rounded up)
/// - below a minute → `S.s` with one decimal
/// - zero → `0.0`
pub fn format_countdown(remaining: Duration) -> String {
    let secs = remaining.as_secs_f32();
    if secs >= 60.0 {
        let whole = secs.ceil() as u32;
        format!("{}:{:02}", whole / 60, whole % 60)
    } else {
        format!("{:.1}", secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_countdowns_show_tenths() {
        assert_eq!(format_countdown(Duration::from_millis(4_240)), "4.2");
        assert_eq!(format_countdown(Duration::from_millis(500)), "0.5");
        assert_eq!(format_countdown(Duration::ZERO), "0.0");
    }

    #[test]
    fn long_countdowns_show_minutes() {
        assert_eq!(format_countdown(Duration::from_secs(60)), "1:00");
        assert_eq!(format_countdown(Duration::from_millis(125_100)), "2:06");
        assert_eq!(format_countdown(Duration::from_secs(600)), "10:00");
    }
}

const SECS_PER_MINUTE: u64 = 60;
const SECS_PER_HOUR: u64 = 60 * SECS_PER_MINUTE;
const SECS_PER_DAY: u64 = 24 * SECS_PER_HOUR;

/// Human readable rendering of a whole number of seconds.
///
/// Picks the largest tier that applies and never elides a zero unit below it,
/// so `120` is `"2m 0s"` and `90000` is `"1d 1h 0m 0s"`.
pub fn format_elapsed(seconds: u64) -> String {
    let secs = seconds % SECS_PER_MINUTE;
    let mins = (seconds % SECS_PER_HOUR) / SECS_PER_MINUTE;
    let hours = (seconds % SECS_PER_DAY) / SECS_PER_HOUR;
    let days = seconds / SECS_PER_DAY;

    match seconds {
        s if s < SECS_PER_MINUTE => format!("{}s", s),
        s if s < SECS_PER_HOUR => format!("{}m {}s", mins, secs),
        s if s < SECS_PER_DAY => format!("{}h {}m {}s", hours, mins, secs),
        _ => format!("{}d {}h {}m {}s", days, hours, mins, secs),
    }
}

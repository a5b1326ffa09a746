use std::time::Duration;

/// Parse a whole number of seconds from a string value into a `Duration`, or return the given default otherwise.
pub fn parse_seconds(value: Option<String>, default: Duration) -> Duration {
    value.and_then(|s| s.trim().parse::<u64>().ok()).map(Duration::from_secs).unwrap_or(default)
}

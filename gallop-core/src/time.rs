use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Current wall-clock time in unix milliseconds. Used for `createdAt`
/// stamps and for the expiry sweep comparison.
pub fn unix_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::from_secs(0))
        .as_millis() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_is_past_2024() {
        assert!(unix_millis() > 1_700_000_000_000);
    }
}

//! Retry helpers for the feed clients: exponential backoff with a cap.

use std::time::Duration;

/// Calculate the next backoff duration using exponential backoff.
///
/// `new_backoff = min(current_backoff * multiplier, max_backoff)`
pub fn calculate_next_backoff(
    current_backoff: Duration,
    multiplier: f64,
    max_backoff_seconds: u64,
) -> Duration {
    Duration::from_millis((current_backoff.as_millis() as f64 * multiplier) as u64)
        .min(Duration::from_secs(max_backoff_seconds))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_until_capped() {
        let backoff = Duration::from_millis(100);
        let next = calculate_next_backoff(backoff, 2.0, 30);
        assert_eq!(next, Duration::from_millis(200));

        let capped = calculate_next_backoff(Duration::from_secs(20), 2.0, 30);
        assert_eq!(capped, Duration::from_secs(30));
    }

    #[test]
    fn fractional_multiplier() {
        let next = calculate_next_backoff(Duration::from_millis(1000), 1.5, 30);
        assert_eq!(next, Duration::from_millis(1500));
    }
}

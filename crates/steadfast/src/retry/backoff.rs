//! Exponential backoff with additive jitter.

use std::time::Duration;

/// Default delay before the first retry.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(1000);

/// Default cap on the un-jittered delay.
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_millis(10_000);

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Compute the delay before retry number `attempt` (0-indexed).
///
/// `attempt == 0` is the delay before the first retry, i.e. after the
/// initial call failed.
///
/// # Mathematical Formula
///
/// ```text
/// capped = min(base_delay * 2^attempt, max_delay)
/// delay  = capped + random[0, 1) * capped / 4
/// ```
///
/// An overflowing product saturates to `max_delay`. The result always lies
/// in `[capped, capped * 1.25]`.
///
/// # Examples
///
/// ```rust
/// use steadfast::retry::calculate_backoff;
/// use std::time::Duration;
///
/// let delay = calculate_backoff(2, Duration::from_millis(1000), Duration::from_secs(10));
/// assert!(delay >= Duration::from_millis(4000));
/// assert!(delay <= Duration::from_millis(5000));
/// ```
pub fn calculate_backoff(attempt: u32, base_delay: Duration, max_delay: Duration) -> Duration {
    let capped = capped_delay(attempt, base_delay, max_delay);
    let max_jitter = capped / 4;
    let jitter = max_jitter.mul_f64(rand::random::<f64>()).min(max_jitter);
    capped.saturating_add(jitter)
}

/// The un-jittered part of [`calculate_backoff`].
pub fn capped_delay(attempt: u32, base_delay: Duration, max_delay: Duration) -> Duration {
    let base = base_delay.as_nanos();
    if base == 0 {
        return Duration::ZERO;
    }
    // base << attempt would overflow u128
    if attempt > base.leading_zeros() {
        return max_delay;
    }

    let scaled = base << attempt;
    if scaled >= max_delay.as_nanos() {
        return max_delay;
    }
    // scaled < max_delay, so the seconds fit in a u64
    Duration::new(
        (scaled / NANOS_PER_SEC) as u64,
        (scaled % NANOS_PER_SEC) as u32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_exponential_growth() {
        let base = Duration::from_millis(100);
        let max = Duration::from_secs(10);

        assert_eq!(capped_delay(0, base, max), Duration::from_millis(100));
        assert_eq!(capped_delay(1, base, max), Duration::from_millis(200));
        assert_eq!(capped_delay(2, base, max), Duration::from_millis(400));
        assert_eq!(capped_delay(3, base, max), Duration::from_millis(800));
    }

    #[test]
    fn test_default_ranges() {
        let delay0 = calculate_backoff(0, DEFAULT_BASE_DELAY, DEFAULT_MAX_DELAY);
        let delay1 = calculate_backoff(1, DEFAULT_BASE_DELAY, DEFAULT_MAX_DELAY);
        let delay2 = calculate_backoff(2, DEFAULT_BASE_DELAY, DEFAULT_MAX_DELAY);

        // 1000-1250, 2000-2500, 4000-5000
        assert!(delay0 >= Duration::from_millis(1000) && delay0 <= Duration::from_millis(1250));
        assert!(delay1 >= Duration::from_millis(2000) && delay1 <= Duration::from_millis(2500));
        assert!(delay2 >= Duration::from_millis(4000) && delay2 <= Duration::from_millis(5000));
    }

    #[test]
    fn test_max_delay_cap() {
        let max = Duration::from_millis(5000);
        for attempt in 3..40 {
            let delay = calculate_backoff(attempt, Duration::from_secs(1), max);
            assert!(delay >= max, "attempt {attempt}: {delay:?} below cap");
            assert!(
                delay <= max + max / 4,
                "attempt {attempt}: {delay:?} exceeded cap plus jitter"
            );
        }
    }

    #[test]
    fn test_overflow_saturates_to_max() {
        let max = Duration::from_secs(10);
        assert_eq!(capped_delay(u32::MAX, Duration::from_secs(1), max), max);
        assert_eq!(capped_delay(40, Duration::from_nanos(1), max), max);
        assert_eq!(
            capped_delay(10, Duration::MAX, Duration::MAX),
            Duration::MAX
        );
    }

    #[test]
    fn test_jitter_variation() {
        let delays: Vec<_> = (0..20)
            .map(|_| calculate_backoff(0, Duration::from_secs(1), Duration::from_secs(60)))
            .collect();

        let all_same = delays.windows(2).all(|w| w[0] == w[1]);
        assert!(!all_same, "With randomization, delays should vary");
    }

    #[test]
    fn test_zero_base_delay() {
        assert_eq!(
            calculate_backoff(5, Duration::ZERO, Duration::from_secs(1)),
            Duration::ZERO
        );
    }

    proptest! {
        /// Property: the delay stays within [capped, capped * 1.25]
        #[test]
        fn prop_backoff_within_jitter_bounds(
            attempt in 0u32..64,
            base_ms in 0u64..10_000,
            max_ms in 0u64..120_000,
        ) {
            let base = Duration::from_millis(base_ms);
            let max = Duration::from_millis(max_ms);
            let capped = capped_delay(attempt, base, max);
            let delay = calculate_backoff(attempt, base, max);

            let expected = base_ms
                .checked_mul(1u64.checked_shl(attempt).unwrap_or(u64::MAX))
                .unwrap_or(u64::MAX)
                .min(max_ms);
            prop_assert_eq!(capped, Duration::from_millis(expected));
            prop_assert!(delay >= capped);
            prop_assert!(delay <= capped + capped / 4);
        }

        /// Property: the un-jittered delay never shrinks as attempts grow
        #[test]
        fn prop_capped_delay_is_monotonic(
            attempt in 0u32..63,
            base_ms in 1u64..10_000,
            max_ms in 1u64..120_000,
        ) {
            let base = Duration::from_millis(base_ms);
            let max = Duration::from_millis(max_ms);
            prop_assert!(capped_delay(attempt + 1, base, max) >= capped_delay(attempt, base, max));
        }
    }
}

//! Duration formatting for response timing.

use std::time::Duration;

/// Formats an elapsed duration as fractional milliseconds, e.g. `"12.345ms"`.
///
/// Used for the `X-Response-Time` header and request log lines.
pub fn duration_to_ms(duration: Duration) -> String {
    format!("{:.3}ms", duration.as_secs_f64() * 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_to_ms_zero() {
        assert_eq!(duration_to_ms(Duration::from_micros(0)), "0.000ms");
    }

    #[test]
    fn test_duration_to_ms_microseconds() {
        assert_eq!(duration_to_ms(Duration::from_micros(1234)), "1.234ms");
    }

    #[test]
    fn test_duration_to_ms_seconds() {
        assert_eq!(duration_to_ms(Duration::from_secs(1)), "1000.000ms");
    }
}

#![forbid(unsafe_code)]

use time::OffsetDateTime;

pub fn now_ms() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(duration) => duration,
        Err(_) => return 0,
    };

    i64::try_from(now.as_millis()).unwrap_or(i64::MAX)
}

/// UTC calendar year of a unix timestamp in milliseconds.
pub fn year_of_ms(ts_ms: i64) -> Option<i32> {
    let seconds = ts_ms.div_euclid(1000);
    OffsetDateTime::from_unix_timestamp(seconds)
        .ok()
        .map(|dt| dt.year())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_boundaries_are_utc() {
        assert_eq!(year_of_ms(0), Some(1970));
        // 2024-12-31T23:59:59.999Z
        assert_eq!(year_of_ms(1_735_689_599_999), Some(2024));
        // 2025-01-01T00:00:00.000Z
        assert_eq!(year_of_ms(1_735_689_600_000), Some(2025));
        assert_eq!(year_of_ms(-1), Some(1969));
        assert_eq!(year_of_ms(i64::MAX), None);
    }

    #[test]
    fn now_is_after_2020() {
        assert!(year_of_ms(now_ms()).is_some_and(|year| year >= 2020));
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;
use time::{OffsetDateTime, Time, format_description::well_known::Rfc3339};

const NANOS_PER_SEC: i64 = 1_000_000_000;

///
/// Timespec
///
/// Instant with nanosecond resolution.
///
/// Invariant:
/// - nanos is always in [0, 1e9); construction carries overflow into secs
/// - ordering is lexicographic on (secs, nanos)
///

#[derive(
    Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize,
)]
pub struct Timespec {
    secs: i64,
    nanos: i32,
}

impl Timespec {
    pub const EPOCH: Self = Self { secs: 0, nanos: 0 };

    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn new(secs: i64, nanos: i64) -> Self {
        let carry = nanos.div_euclid(NANOS_PER_SEC);

        Self {
            secs: secs.saturating_add(carry),
            nanos: nanos.rem_euclid(NANOS_PER_SEC) as i32,
        }
    }

    #[must_use]
    pub const fn from_secs(secs: i64) -> Self {
        Self { secs, nanos: 0 }
    }

    #[must_use]
    pub const fn secs(&self) -> i64 {
        self.secs
    }

    #[must_use]
    pub const fn nanos(&self) -> i32 {
        self.nanos
    }

    /// Truncate to the canonical day boundary: 00:00:00 UTC of the same
    /// calendar day, with zero nanos. Instants outside the representable
    /// calendar range only drop their sub-second part.
    #[must_use]
    pub fn canonical_day(self) -> Self {
        match OffsetDateTime::from_unix_timestamp(self.secs) {
            Ok(dt) => Self {
                secs: dt.replace_time(Time::MIDNIGHT).unix_timestamp(),
                nanos: 0,
            },
            Err(_) => Self {
                secs: self.secs,
                nanos: 0,
            },
        }
    }
}

impl fmt::Display for Timespec {
    #[allow(clippy::cast_sign_loss)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let formatted = OffsetDateTime::from_unix_timestamp(self.secs)
            .ok()
            .and_then(|dt| dt.replace_nanosecond(self.nanos as u32).ok())
            .and_then(|dt| dt.format(&Rfc3339).ok());

        match formatted {
            Some(text) => f.write_str(&text),
            None => write!(f, "{}.{:09}", self.secs, self.nanos),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_nanos_overflow() {
        let ts = Timespec::new(10, 2_500_000_000);
        assert_eq!(ts.secs(), 12);
        assert_eq!(ts.nanos(), 500_000_000);
    }

    #[test]
    fn normalizes_negative_nanos() {
        let ts = Timespec::new(10, -1);
        assert_eq!(ts.secs(), 9);
        assert_eq!(ts.nanos(), 999_999_999);
    }

    #[test]
    fn orders_by_secs_then_nanos() {
        assert!(Timespec::new(5, 1) < Timespec::new(5, 2));
        assert!(Timespec::new(5, 999_999_999) < Timespec::new(6, 0));
    }

    #[test]
    fn canonical_day_collapses_time_of_day() {
        // 2024-03-01T09:30:00Z and 2024-03-01T23:59:59Z
        let morning = Timespec::new(1_709_285_400, 123);
        let night = Timespec::from_secs(1_709_337_599);

        assert_eq!(morning.canonical_day(), night.canonical_day());
        assert_eq!(morning.canonical_day().nanos(), 0);
    }

    #[test]
    fn displays_rfc3339() {
        let ts = Timespec::from_secs(0);
        assert_eq!(ts.to_string(), "1970-01-01T00:00:00Z");
    }
}

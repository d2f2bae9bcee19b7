use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Seconds between 1601-01-01 and 1970-01-01
const FILETIME_UNIX_OFFSET_SECS: i64 = 11_644_473_600;
const TICKS_PER_SECOND: i64 = 10_000_000;
const NANOS_PER_TICK: i64 = 100;

/// Windows FILETIME: 100 ns ticks since 1601-01-01 UTC
///
/// Kept as the raw on-disk value so timestamps survive a read/save cycle
/// bit-for-bit, including values chrono cannot represent.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct FileTime(i64);

impl FileTime {
    pub const fn from_raw(ticks: i64) -> Self {
        Self(ticks)
    }

    pub const fn raw(self) -> i64 {
        self.0
    }

    /// Current UTC time
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    pub fn from_datetime(time: DateTime<Utc>) -> Self {
        let secs = time.timestamp().saturating_add(FILETIME_UNIX_OFFSET_SECS);
        let sub_ticks = i64::from(time.timestamp_subsec_nanos()) / NANOS_PER_TICK;
        Self(secs.saturating_mul(TICKS_PER_SECOND).saturating_add(sub_ticks))
    }

    /// Convert to a UTC timestamp, if chrono can represent it
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        let secs = self.0.div_euclid(TICKS_PER_SECOND) - FILETIME_UNIX_OFFSET_SECS;
        let nanos = (self.0.rem_euclid(TICKS_PER_SECOND) * NANOS_PER_TICK) as u32;
        DateTime::from_timestamp(secs, nanos)
    }
}

impl From<DateTime<Utc>> for FileTime {
    fn from(time: DateTime<Utc>) -> Self {
        Self::from_datetime(time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_unix_epoch() {
        let epoch = Utc.timestamp_opt(0, 0).unwrap();
        let ft = FileTime::from_datetime(epoch);
        assert_eq!(ft.raw(), 116_444_736_000_000_000);
        assert_eq!(ft.to_datetime(), Some(epoch));
    }

    #[test]
    fn test_datetime_roundtrip_keeps_tick_precision() {
        let time = Utc.with_ymd_and_hms(2014, 3, 9, 12, 30, 45).unwrap()
            + chrono::Duration::nanoseconds(1_234_500);
        let ft = FileTime::from(time);
        assert_eq!(ft.to_datetime(), Some(time));
    }

    #[test]
    fn test_zero_is_1601() {
        let dt = FileTime::from_raw(0).to_datetime().unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(1601, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_now_is_after_2020() {
        let cutoff = FileTime::from(Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap());
        assert!(FileTime::now() > cutoff);
    }
}

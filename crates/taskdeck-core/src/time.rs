//! Timezone and wall-clock helpers shared by the planner, calendar and
//! pipeline.

use chrono::{DateTime, Duration, FixedOffset, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{CoreError, Result};

/// Resolve an IANA timezone name such as `America/Los_Angeles`.
pub fn parse_tz(name: &str) -> Result<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| CoreError::Timezone(name.to_string()))
}

/// Local wall-clock time on `date` at `hour:minute` in `tz`.
///
/// Ambiguous times (DST fall back) resolve to the earlier instant, and
/// non-existent times (DST spring forward) move one hour later. An `hour`
/// of 24 means midnight at the start of the following day.
pub fn local_datetime(tz: &Tz, date: NaiveDate, hour: u32, minute: u32) -> DateTime<Tz> {
    if hour >= 24 {
        let next = date.succ_opt().unwrap_or(date);
        return local_datetime(tz, next, hour - 24, minute);
    }
    let naive = date
        .and_hms_opt(hour, minute.min(59), 0)
        .unwrap_or_else(|| date.and_time(NaiveTime::MIN));
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(early, _) => early,
        LocalResult::None => {
            let shifted = naive + Duration::hours(1);
            tz.from_local_datetime(&shifted)
                .earliest()
                .unwrap_or_else(|| tz.from_utc_datetime(&naive))
        }
    }
}

/// Same instant expressed with the fixed offset of `tz` at that moment.
pub fn to_fixed(dt: DateTime<Utc>, tz: &Tz) -> DateTime<FixedOffset> {
    dt.with_timezone(tz).fixed_offset()
}

/// Whole minutes from `start` to `end` (negative when `end` is earlier).
pub fn minutes_between<A: TimeZone, B: TimeZone>(start: &DateTime<A>, end: &DateTime<B>) -> i64 {
    end.with_timezone(&Utc)
        .signed_duration_since(start.with_timezone(&Utc))
        .num_minutes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn parses_known_timezone() {
        assert!(parse_tz("America/Los_Angeles").is_ok());
        assert!(parse_tz(" Europe/Berlin ").is_ok());
    }

    #[test]
    fn rejects_unknown_timezone() {
        let err = parse_tz("Mars/Olympus").unwrap_err();
        assert!(matches!(err, CoreError::Timezone(_)));
    }

    #[test]
    fn local_datetime_uses_wall_clock() {
        let tz = parse_tz("America/Los_Angeles").unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
        let dt = local_datetime(&tz, date, 9, 30);
        assert_eq!(dt.hour(), 9);
        assert_eq!(dt.minute(), 30);
        assert_eq!(dt.fixed_offset().offset().local_minus_utc(), -8 * 3600);
    }

    #[test]
    fn hour_24_rolls_to_next_midnight() {
        let tz = parse_tz("UTC").unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 3, 31).unwrap();
        let dt = local_datetime(&tz, date, 24, 0);
        assert_eq!(dt.date_naive(), NaiveDate::from_ymd_opt(2026, 4, 1).unwrap());
        assert_eq!(dt.hour(), 0);
    }

    #[test]
    fn spring_forward_gap_moves_later() {
        let tz = parse_tz("America/Los_Angeles").unwrap();
        // 2026-03-08 02:30 does not exist in Los Angeles.
        let date = NaiveDate::from_ymd_opt(2026, 3, 8).unwrap();
        let dt = local_datetime(&tz, date, 2, 30);
        assert_eq!(dt.hour(), 3);
    }

    #[test]
    fn minutes_between_across_offsets() {
        let a = DateTime::parse_from_rfc3339("2026-01-01T09:00:00-08:00").unwrap();
        let b = DateTime::parse_from_rfc3339("2026-01-01T18:30:00+00:00").unwrap();
        assert_eq!(minutes_between(&a, &b), 90);
        assert_eq!(minutes_between(&b, &a), -90);
    }
}

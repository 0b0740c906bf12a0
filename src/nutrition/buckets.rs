use serde::Serialize;
use time::{Date, Duration, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};

use crate::clock::iso_date;

/// A run of consecutive local calendar days, `start` inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateWindow {
    #[serde(with = "iso_date")]
    pub start: Date,
    #[serde(with = "iso_date")]
    pub end: Date,
    pub days: i64,
}

impl DateWindow {
    /// The `days` local days ending with (and including) `today`.
    pub fn ending_on(today: Date, days: i64) -> Self {
        let days = days.max(1);
        Self {
            start: today - Duration::days(days - 1),
            end: today,
            days,
        }
    }

    /// Half-open UTC instants covering the whole window in `tz`.
    pub fn bounds(&self, tz: UtcOffset) -> (OffsetDateTime, OffsetDateTime) {
        (
            day_start(self.start, tz),
            day_start(self.end + Duration::days(1), tz),
        )
    }
}

/// Midnight of `date` in `tz`.
pub fn day_start(date: Date, tz: UtcOffset) -> OffsetDateTime {
    PrimitiveDateTime::new(date, Time::MIDNIGHT).assume_offset(tz)
}

/// Calendar date of `at` as seen in `tz`.
pub fn local_date(at: OffsetDateTime, tz: UtcOffset) -> Date {
    at.to_offset(tz).date()
}

#[derive(Debug)]
pub struct Bucket<'a, T> {
    pub date: Date,
    pub records: Vec<&'a T>,
}

/// Group `records` into one bucket per local day, starting at `start_date`.
///
/// Every day of the window gets a bucket, including days without records.
/// Records falling outside the window are skipped. Within a bucket records
/// keep their source order.
pub fn bucketize<'a, T, F>(
    records: &'a [T],
    start_date: Date,
    num_days: i64,
    tz: UtcOffset,
    key_fn: F,
) -> Vec<Bucket<'a, T>>
where
    F: Fn(&T) -> OffsetDateTime,
{
    if num_days <= 0 {
        return Vec::new();
    }

    let mut buckets: Vec<Bucket<'a, T>> = Vec::new();
    let mut date = start_date;
    for i in 0..num_days {
        if i > 0 {
            match date.next_day() {
                Some(next) => date = next,
                None => break,
            }
        }
        buckets.push(Bucket {
            date,
            records: Vec::new(),
        });
    }

    for record in records {
        let offset = (local_date(key_fn(record), tz) - start_date).whole_days();
        if offset < 0 {
            continue;
        }
        if let Some(bucket) = buckets.get_mut(offset as usize) {
            bucket.records.push(record);
        }
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime, offset};

    const IST: UtcOffset = offset!(+05:30);

    #[test]
    fn yields_exactly_n_consecutive_days_even_when_empty() {
        let records: Vec<OffsetDateTime> = Vec::new();
        let buckets = bucketize(&records, date!(2025 - 02 - 27), 4, IST, |r| *r);
        let dates: Vec<Date> = buckets.iter().map(|b| b.date).collect();
        assert_eq!(
            dates,
            vec![
                date!(2025 - 02 - 27),
                date!(2025 - 02 - 28),
                date!(2025 - 03 - 01),
                date!(2025 - 03 - 02),
            ]
        );
        assert!(buckets.iter().all(|b| b.records.is_empty()));
    }

    #[test]
    fn non_positive_day_count_yields_nothing() {
        let records = vec![datetime!(2025-03-01 10:00 UTC)];
        assert!(bucketize(&records, date!(2025 - 03 - 01), 0, IST, |r| *r).is_empty());
        assert!(bucketize(&records, date!(2025 - 03 - 01), -3, IST, |r| *r).is_empty());
    }

    #[test]
    fn buckets_by_local_date_not_utc_date() {
        // 20:00 UTC on the 1st is 01:30 on the 2nd in IST.
        let records = vec![datetime!(2025-03-01 20:00 UTC)];
        let buckets = bucketize(&records, date!(2025 - 03 - 01), 2, IST, |r| *r);
        assert!(buckets[0].records.is_empty());
        assert_eq!(buckets[1].records.len(), 1);
    }

    #[test]
    fn day_boundaries_are_half_open() {
        let midnight = day_start(date!(2025 - 03 - 02), IST);
        let just_before = midnight - Duration::nanoseconds(1);
        let records = vec![just_before, midnight];
        let buckets = bucketize(&records, date!(2025 - 03 - 01), 2, IST, |r| *r);
        assert_eq!(buckets[0].records, vec![&just_before]);
        assert_eq!(buckets[1].records, vec![&midnight]);
    }

    #[test]
    fn keeps_source_order_and_drops_out_of_window_records() {
        let records = vec![
            ("late", datetime!(2025-03-01 18:00 +05:30)),
            ("before", datetime!(2025-02-28 09:00 +05:30)),
            ("early", datetime!(2025-03-01 07:00 +05:30)),
            ("after", datetime!(2025-03-03 09:00 +05:30)),
        ];
        let buckets = bucketize(&records, date!(2025 - 03 - 01), 2, IST, |r| r.1);
        let names: Vec<&str> = buckets[0].records.iter().map(|r| r.0).collect();
        assert_eq!(names, vec!["late", "early"]);
        assert!(buckets[1].records.is_empty());
    }

    #[test]
    fn window_ending_today_covers_whole_local_days() {
        let window = DateWindow::ending_on(date!(2025 - 03 - 07), 7);
        assert_eq!(window.start, date!(2025 - 03 - 01));
        let (from, to) = window.bounds(IST);
        assert_eq!(from, datetime!(2025-03-01 00:00 +05:30));
        assert_eq!(to, datetime!(2025-03-08 00:00 +05:30));
    }
}

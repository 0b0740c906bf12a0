use std::sync::Arc;

use serde::Deserialize;
use time::{
    format_description::FormatItem, macros::format_description, Date, OffsetDateTime, UtcOffset,
};

use crate::error::AppError;
use crate::nutrition::buckets::{local_date, DateWindow};

const ISO_DATE: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Serializes a `Date` as `YYYY-MM-DD`.
pub mod iso_date {
    use serde::Serializer;
    use time::Date;

    pub fn serialize<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
        let text = date
            .format(super::ISO_DATE)
            .map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&text)
    }
}

/// Source of "now".
pub trait Clock: Send + Sync {
    fn now(&self) -> OffsetDateTime;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

#[cfg(test)]
pub struct FixedClock(pub OffsetDateTime);

#[cfg(test)]
impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        self.0
    }
}

/// Clock plus the deployment timezone every user-facing day is computed in.
#[derive(Clone)]
pub struct Calendar {
    clock: Arc<dyn Clock>,
    tz: UtcOffset,
}

impl Calendar {
    pub fn new(clock: Arc<dyn Clock>, tz: UtcOffset) -> Self {
        Self { clock, tz }
    }

    pub fn tz(&self) -> UtcOffset {
        self.tz
    }

    pub fn now(&self) -> OffsetDateTime {
        self.clock.now()
    }

    pub fn today(&self) -> Date {
        local_date(self.clock.now(), self.tz)
    }

    /// The last `days` local days, today included.
    pub fn window(&self, days: i64) -> DateWindow {
        DateWindow::ending_on(self.today(), days)
    }
}

pub const DEFAULT_WINDOW_DAYS: i64 = 7;
pub const MAX_WINDOW_DAYS: i64 = 366;

/// `?days=` on summary, trend and dashboard endpoints.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct DaysQuery {
    pub days: Option<i64>,
}

impl DaysQuery {
    pub fn resolve(self) -> Result<i64, AppError> {
        match self.days.unwrap_or(DEFAULT_WINDOW_DAYS) {
            d if d < 1 => Err(AppError::BadRequest("days must be at least 1".into())),
            d if d > MAX_WINDOW_DAYS => Err(AppError::BadRequest(format!(
                "days must be at most {}",
                MAX_WINDOW_DAYS
            ))),
            d => Ok(d),
        }
    }
}

/// `?date=YYYY-MM-DD` on log listings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DateQuery {
    pub date: Option<String>,
}

impl DateQuery {
    pub fn resolve(&self) -> Result<Option<Date>, AppError> {
        self.date.as_deref().map(parse_date_filter).transpose()
    }
}

/// Parse a `YYYY-MM-DD` date filter.
pub fn parse_date_filter(raw: &str) -> Result<Date, AppError> {
    Date::parse(raw.trim(), ISO_DATE)
        .map_err(|_| AppError::MalformedDateFilter(raw.to_string()))
}

/// Parse a `±HH:MM` offset such as `+05:30`.
pub fn parse_offset(raw: &str) -> anyhow::Result<UtcOffset> {
    let offset = UtcOffset::parse(
        raw.trim(),
        format_description!("[offset_hour sign:mandatory]:[offset_minute]"),
    )?;
    Ok(offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime, offset};

    #[test]
    fn today_is_the_local_date() {
        let cal = Calendar::new(
            Arc::new(FixedClock(datetime!(2025-03-01 19:00 UTC))),
            offset!(+05:30),
        );
        assert_eq!(cal.today(), date!(2025 - 03 - 02));
        let window = cal.window(3);
        assert_eq!(window.start, date!(2025 - 02 - 28));
        assert_eq!(window.end, date!(2025 - 03 - 02));
    }

    #[test]
    fn date_filter_accepts_iso_dates_only() {
        assert_eq!(parse_date_filter("2025-09-01").unwrap(), date!(2025 - 09 - 01));
        for bad in ["01-09-2025", "2025/09/01", "2025-13-01", "yesterday", ""] {
            assert!(
                matches!(parse_date_filter(bad), Err(AppError::MalformedDateFilter(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn days_default_and_bounds() {
        assert_eq!(DaysQuery::default().resolve().unwrap(), 7);
        assert_eq!(DaysQuery { days: Some(1) }.resolve().unwrap(), 1);
        for bad in [0, -3, 367] {
            assert!(matches!(
                DaysQuery { days: Some(bad) }.resolve(),
                Err(AppError::BadRequest(_))
            ));
        }
    }

    #[test]
    fn empty_date_query_means_all() {
        assert_eq!(DateQuery::default().resolve().unwrap(), None);
        let q = DateQuery { date: Some("2025-03-07".into()) };
        assert_eq!(q.resolve().unwrap(), Some(date!(2025 - 03 - 07)));
    }

    #[test]
    fn offsets_parse_with_sign() {
        assert_eq!(parse_offset("+05:30").unwrap(), offset!(+05:30));
        assert_eq!(parse_offset("-08:00").unwrap(), offset!(-08:00));
        assert!(parse_offset("IST").is_err());
    }
}

//! Time source for a run, pinned to the operating timezone.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

/// Wall clock in the operating timezone.
///
/// Sources resolve "today", "tomorrow" and `M/D` headings against
/// [`Clock::today`]; tests pin the instant with [`Clock::fixed`].
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    tz: Tz,
    fixed: Option<DateTime<Utc>>,
}

impl Clock {
    pub fn system(tz: Tz) -> Self {
        Self { tz, fixed: None }
    }

    pub fn fixed(tz: Tz, instant: DateTime<Utc>) -> Self {
        Self {
            tz,
            fixed: Some(instant),
        }
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.fixed.unwrap_or_else(Utc::now)
    }

    /// Calendar date of [`Clock::now`] in the operating timezone.
    pub fn today(&self) -> NaiveDate {
        self.now().with_timezone(&self.tz).date_naive()
    }

    /// Human-readable rendering of `instant`, e.g. `Monday, January 5, 2026 at 6:00 AM CST`.
    pub fn display(&self, instant: DateTime<Utc>) -> String {
        instant
            .with_timezone(&self.tz)
            .format("%A, %B %-d, %Y at %-I:%M %p %Z")
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn today_uses_operating_timezone() {
        // 03:00 UTC on Jan 6 is still the evening of Jan 5 in Chicago.
        let instant = Utc.with_ymd_and_hms(2026, 1, 6, 3, 0, 0).unwrap();
        let clock = Clock::fixed(chrono_tz::America::Chicago, instant);
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2026, 1, 5).unwrap());
    }

    #[test]
    fn display_renders_local_time() {
        let instant = Utc.with_ymd_and_hms(2026, 1, 5, 12, 0, 0).unwrap();
        let clock = Clock::fixed(chrono_tz::America::Chicago, instant);
        assert_eq!(clock.display(instant), "Monday, January 5, 2026 at 6:00 AM CST");
    }
}

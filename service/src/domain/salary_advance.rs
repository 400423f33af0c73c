//! [`SalaryAdvance`] definitions.

use std::time::Duration;

use common::{unit, Amount, DateTime, DateTimeOf};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::worker;
#[cfg(doc)]
use crate::domain::Worker;

/// Advance payment against a [`Worker`]'s salary.
#[derive(Clone, Debug)]
pub struct SalaryAdvance {
    /// ID of this [`SalaryAdvance`].
    pub id: Id,

    /// ID of the [`Worker`] this [`SalaryAdvance`] was granted to.
    pub worker_id: worker::Id,

    /// Granted [`Amount`] of money.
    pub amount: Amount,

    /// [`DateTime`] when this [`SalaryAdvance`] was granted.
    pub advance_date: GrantDateTime,

    /// Payment [`Period`] this [`SalaryAdvance`] is repaid within.
    pub period: Period,

    /// [`Notes`] attached to this [`SalaryAdvance`].
    pub notes: Option<Notes>,

    /// [`DateTime`] when this [`SalaryAdvance`] was created.
    pub created_at: CreationDateTime,
}

/// ID of a [`SalaryAdvance`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Payment period a [`Worker`]'s salary is paid for.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Period {
    /// [`DateTime`] when this [`Period`] starts (`00:00:00.000`).
    pub start: StartDateTime,

    /// [`DateTime`] when this [`Period`] ends (`23:59:59.999`).
    pub end: EndDateTime,
}

impl Period {
    /// Returns the [`Period`] containing the `now` moment under the provided
    /// [`worker::PaymentFrequency`].
    ///
    /// - [`Weekly`]: Monday to Sunday of the ISO week containing `now`.
    /// - [`Biweekly`]: days 1-15 of the month, or day 16 to the end of month.
    /// - [`Monthly`]: the whole calendar month.
    ///
    /// [`Biweekly`]: worker::PaymentFrequency::Biweekly
    /// [`Monthly`]: worker::PaymentFrequency::Monthly
    /// [`Weekly`]: worker::PaymentFrequency::Weekly
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn current(
        frequency: worker::PaymentFrequency,
        now: DateTime,
    ) -> Self {
        use worker::PaymentFrequency as F;

        /// One calendar day in UTC.
        const DAY: Duration = Duration::from_secs(86_400);

        let (start, end) = match frequency {
            F::Weekly => {
                let monday = now - DAY * u32::from(now.days_from_monday());
                (monday, monday + DAY * 6)
            }
            F::Biweekly if now.day() <= 15 => (
                now.with_day(1).expect("infallible"),
                now.with_day(15).expect("infallible"),
            ),
            F::Biweekly => (
                now.with_day(16).expect("`now` is past the 16th"),
                now.with_day(now.days_in_month()).expect("infallible"),
            ),
            F::Monthly => (
                now.with_day(1).expect("infallible"),
                now.with_day(now.days_in_month()).expect("infallible"),
            ),
        };

        Self {
            start: start.start_of_day().coerce(),
            end: end.end_of_day().coerce(),
        }
    }

    /// Indicates whether this [`Period`] shares at least one instant with the
    /// `other` one.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start.coerce::<()>() <= other.end.coerce()
            && self.end.coerce::<()>() >= other.start.coerce()
    }
}

/// Free-form notes attached to a [`SalaryAdvance`].
#[derive(Clone, Debug, Display, Eq, From, PartialEq)]
#[from(&str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Notes(String);

/// [`DateTime`] when a [`SalaryAdvance`] was created.
pub type CreationDateTime = DateTimeOf<(SalaryAdvance, unit::Creation)>;

/// [`DateTime`] when a [`SalaryAdvance`] was granted.
pub type GrantDateTime = DateTimeOf<(SalaryAdvance, unit::Grant)>;

/// [`DateTime`] when a [`Period`] starts.
pub type StartDateTime = DateTimeOf<(Period, unit::Start)>;

/// [`DateTime`] when a [`Period`] ends.
pub type EndDateTime = DateTimeOf<(Period, unit::End)>;

#[cfg(test)]
mod spec {
    use common::DateTime;

    use crate::domain::worker::PaymentFrequency;

    use super::Period;

    fn date(year: i32, month: u8, day: u8) -> DateTime {
        DateTime::from_calendar_date(year, month, day).unwrap()
    }

    fn period(
        (y1, m1, d1): (i32, u8, u8),
        (y2, m2, d2): (i32, u8, u8),
    ) -> Period {
        Period {
            start: date(y1, m1, d1).start_of_day().coerce(),
            end: date(y2, m2, d2).end_of_day().coerce(),
        }
    }

    #[test]
    fn weekly_spans_monday_to_sunday() {
        // 2024-01-03 is a Wednesday.
        let p = Period::current(PaymentFrequency::Weekly, date(2024, 1, 3));
        assert_eq!(p, period((2024, 1, 1), (2024, 1, 7)));
        assert_eq!(p.start.days_from_monday(), 0);
    }

    #[test]
    fn weekly_contains_now() {
        let now = date(2024, 1, 3);
        let p = Period::current(PaymentFrequency::Weekly, now);
        assert!(p.start.coerce() <= now && now <= p.end.coerce());
    }

    #[test]
    fn weekly_sunday_wraps_to_previous_monday() {
        // 2024-01-07 is a Sunday.
        let p = Period::current(PaymentFrequency::Weekly, date(2024, 1, 7));
        assert_eq!(p, period((2024, 1, 1), (2024, 1, 7)));
    }

    #[test]
    fn biweekly_first_half_up_to_day_15() {
        let p = Period::current(PaymentFrequency::Biweekly, date(2024, 1, 15));
        assert_eq!(p, period((2024, 1, 1), (2024, 1, 15)));
    }

    #[test]
    fn biweekly_second_half_from_day_16() {
        let p = Period::current(PaymentFrequency::Biweekly, date(2024, 1, 16));
        assert_eq!(p, period((2024, 1, 16), (2024, 1, 31)));
    }

    #[test]
    fn biweekly_second_half_ends_on_leap_february_29() {
        let p = Period::current(PaymentFrequency::Biweekly, date(2024, 2, 20));
        assert_eq!(p, period((2024, 2, 16), (2024, 2, 29)));

        let p = Period::current(PaymentFrequency::Biweekly, date(2023, 2, 20));
        assert_eq!(p, period((2023, 2, 16), (2023, 2, 28)));
    }

    #[test]
    fn monthly_spans_whole_month() {
        let p = Period::current(PaymentFrequency::Monthly, date(2024, 4, 10));
        assert_eq!(p, period((2024, 4, 1), (2024, 4, 30)));
    }

    #[test]
    fn month_halves_never_overlap() {
        let first = period((2024, 1, 1), (2024, 1, 15));
        let second = period((2024, 1, 16), (2024, 1, 31));
        assert!(!first.overlaps(&second));
        assert!(!second.overlaps(&first));
    }

    #[test]
    fn overlap_requires_one_shared_instant() {
        let p = period((2024, 1, 10), (2024, 1, 20));
        assert!(p.overlaps(&period((2024, 1, 20), (2024, 1, 25))));
        assert!(p.overlaps(&period((2024, 1, 1), (2024, 1, 10))));
        assert!(p.overlaps(&period((2024, 1, 1), (2024, 1, 31))));
        assert!(!p.overlaps(&period((2024, 1, 21), (2024, 1, 25))));
    }
}

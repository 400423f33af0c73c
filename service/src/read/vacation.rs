//! [`Vacation`] balance read model.
//!
//! [`Vacation`]: crate::domain::Vacation

use common::DateTime;

use crate::domain::{vacation, worker, Vacation};
#[cfg(doc)]
use crate::domain::Worker;

/// Vacation balance of a [`Worker`] at some moment.
///
/// Accrual rate is fixed: 1 vacation day per complete month worked.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Balance {
    /// Number of complete calendar months worked since the hire date.
    pub months_worked: i32,

    /// Number of vacation days accrued over the worked months.
    pub accrued_days: i32,

    /// Number of vacation days already used (approved or completed
    /// [`Vacation`]s).
    pub used_days: i32,

    /// Number of vacation days awaiting approval (requested [`Vacation`]s).
    pub pending_days: i32,

    /// Number of vacation days still available.
    ///
    /// Signed and never clamped: a negative value means more days are used
    /// or pending than accrued. Callers gate new requests with
    /// [`allows_request()`](Balance::allows_request).
    pub available_days: i32,
}

impl Balance {
    /// Calculates the [`Balance`] of a [`Worker`] hired at `hire_date`, with
    /// the provided [`Vacation`]s, as of the `now` moment.
    ///
    /// A partial final month is not counted: the month completes once the
    /// day-of-month of the hire date is reached. A hire date in the future
    /// accrues nothing.
    #[must_use]
    pub fn calculate(
        hire_date: worker::HireDateTime,
        vacations: &[Vacation],
        now: DateTime,
    ) -> Self {
        let hire = hire_date.coerce::<()>();

        let mut months_worked = (now.year() - hire.year()) * 12
            + (i32::from(now.month()) - i32::from(hire.month()));
        if now.day() < hire.day() {
            months_worked -= 1;
        }
        let months_worked = months_worked.max(0);

        // 1 day per complete month.
        let accrued_days = months_worked;
        let used_days = vacations
            .iter()
            .filter(|v| v.is_used())
            .map(|v| v.total_days.get())
            .sum::<i32>();
        let pending_days = vacations
            .iter()
            .filter(|v| v.is_pending())
            .map(|v| v.total_days.get())
            .sum::<i32>();

        Self {
            months_worked,
            accrued_days,
            used_days,
            pending_days,
            available_days: accrued_days - used_days - pending_days,
        }
    }

    /// Indicates whether a new [`Vacation`] request of the provided
    /// [`vacation::TotalDays`] fits into this [`Balance`].
    #[must_use]
    pub fn allows_request(&self, requested: vacation::TotalDays) -> bool {
        requested.get() <= self.available_days
    }
}

#[cfg(test)]
mod spec {
    use common::DateTime;

    use crate::domain::{vacation, worker, Vacation};

    use super::Balance;

    fn date(year: i32, month: u8, day: u8) -> DateTime {
        DateTime::from_calendar_date(year, month, day).unwrap()
    }

    fn vacation(days: i32, status: vacation::Status) -> Vacation {
        Vacation {
            id: vacation::Id::new(),
            worker_id: worker::Id::new(),
            start_date: DateTime::UNIX_EPOCH.coerce(),
            end_date: DateTime::UNIX_EPOCH.coerce(),
            total_days: vacation::TotalDays::new(days).unwrap(),
            status,
            notes: None,
            created_at: DateTime::UNIX_EPOCH.coerce(),
        }
    }

    fn balance(
        hire: (i32, u8, u8),
        vacations: &[Vacation],
        now: (i32, u8, u8),
    ) -> Balance {
        Balance::calculate(
            date(hire.0, hire.1, hire.2).coerce(),
            vacations,
            date(now.0, now.1, now.2),
        )
    }

    #[test]
    fn counts_complete_months_only() {
        // Hired on the 31st: February never reaches day 31, so by March 1st
        // only January is complete.
        assert_eq!(balance((2024, 1, 31), &[], (2024, 3, 1)).months_worked, 1);

        assert_eq!(balance((2024, 1, 15), &[], (2024, 2, 14)).months_worked, 0);
        assert_eq!(balance((2024, 1, 15), &[], (2024, 2, 15)).months_worked, 1);
        assert_eq!(balance((2023, 8, 4), &[], (2024, 1, 4)).months_worked, 5);
        assert_eq!(balance((2022, 3, 1), &[], (2024, 3, 1)).months_worked, 24);
    }

    #[test]
    fn future_hire_date_accrues_nothing() {
        let b = balance(
            (2024, 6, 1),
            &[vacation(2, vacation::Status::Approved)],
            (2024, 1, 1),
        );
        assert_eq!(b.months_worked, 0);
        assert_eq!(b.accrued_days, 0);
        assert_eq!(b.available_days, -2);
    }

    #[test]
    fn available_days_stay_unclamped() {
        let b = balance(
            (2023, 11, 1),
            &[
                vacation(3, vacation::Status::Approved),
                vacation(2, vacation::Status::Requested),
            ],
            (2024, 1, 1),
        );
        assert_eq!(b.accrued_days, 2);
        assert_eq!(b.available_days, 2 - 3 - 2);
        assert_eq!(
            b.available_days,
            b.accrued_days - b.used_days - b.pending_days,
        );
    }

    #[test]
    fn rejected_vacations_dont_count() {
        let b = balance(
            (2023, 1, 1),
            &[vacation(5, vacation::Status::Rejected)],
            (2024, 1, 1),
        );
        assert_eq!(b.used_days, 0);
        assert_eq!(b.pending_days, 0);
        assert_eq!(b.available_days, 12);
    }

    #[test]
    fn five_months_with_used_and_pending_days() {
        let b = balance(
            (2023, 8, 4),
            &[
                vacation(2, vacation::Status::Approved),
                vacation(1, vacation::Status::Requested),
            ],
            (2024, 1, 4),
        );
        assert_eq!(b.accrued_days, 5);
        assert_eq!(b.used_days, 2);
        assert_eq!(b.pending_days, 1);
        assert_eq!(b.available_days, 2);
    }

    #[test]
    fn allows_request_up_to_the_whole_balance() {
        let b = balance((2023, 8, 4), &[], (2024, 1, 4));
        assert_eq!(b.available_days, 5);

        assert!(b.allows_request(vacation::TotalDays::new(4).unwrap()));
        assert!(b.allows_request(vacation::TotalDays::new(5).unwrap()));
        assert!(!b.allows_request(vacation::TotalDays::new(6).unwrap()));
    }
}

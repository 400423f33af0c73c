//! [`SalaryAdvance`] availability read model.
//!
//! [`SalaryAdvance`]: crate::domain::SalaryAdvance

use common::{Amount, DateTime};
use rust_decimal::Decimal;

use crate::domain::{salary_advance::Period, worker, SalaryAdvance};
#[cfg(doc)]
use crate::domain::Worker;

/// Remaining [`SalaryAdvance`] capacity of a [`Worker`] within the current
/// payment [`Period`].
#[derive(Clone, Copy, Debug)]
pub struct Availability {
    /// Base salary of the [`Worker`].
    pub base_salary: Amount,

    /// [`worker::PaymentFrequency`] the [`Period`] was computed under.
    pub payment_frequency: worker::PaymentFrequency,

    /// Total [`Amount`] of [`SalaryAdvance`]s attributed to the current
    /// [`Period`].
    pub total_advances: Amount,

    /// [`Amount`] still available for advancing.
    ///
    /// Signed and never clamped: a negative value means the [`Worker`] is
    /// already over-advanced. Callers gate new advances with
    /// [`allows()`](Availability::allows).
    pub available_amount: Decimal,

    /// Current payment [`Period`] the capacity is computed for.
    pub period: Period,
}

impl Availability {
    /// Calculates the [`Availability`] of a [`Worker`] under the provided
    /// [`worker::AdvanceTerms`], given its existing [`SalaryAdvance`]s, as of
    /// the `now` moment.
    ///
    /// A [`SalaryAdvance`] is attributed to the current [`Period`] when its
    /// stored payment window shares at least one instant with it, even if
    /// the boundaries don't match exactly.
    #[must_use]
    pub fn calculate(
        terms: worker::AdvanceTerms,
        advances: &[SalaryAdvance],
        now: DateTime,
    ) -> Self {
        let period = Period::current(terms.payment_frequency, now);

        let total_advances = advances
            .iter()
            .filter(|a| a.period.overlaps(&period))
            .map(|a| a.amount)
            .sum::<Amount>();

        Self {
            base_salary: terms.base_salary,
            payment_frequency: terms.payment_frequency,
            total_advances,
            available_amount: terms.base_salary.get() - total_advances.get(),
            period,
        }
    }

    /// Indicates whether a new [`SalaryAdvance`] of the provided [`Amount`]
    /// fits into this [`Availability`].
    #[must_use]
    pub fn allows(&self, amount: Amount) -> bool {
        amount.get() <= self.available_amount
    }
}

#[cfg(test)]
mod spec {
    use common::{Amount, DateTime};
    use rust_decimal::Decimal;

    use crate::domain::{
        salary_advance::{self, Period},
        worker, SalaryAdvance,
    };

    use super::Availability;

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

    fn advance(amount: &str, period: Period) -> SalaryAdvance {
        SalaryAdvance {
            id: salary_advance::Id::new(),
            worker_id: worker::Id::new(),
            amount: amount.parse().unwrap(),
            advance_date: DateTime::UNIX_EPOCH.coerce(),
            period,
            notes: None,
            created_at: DateTime::UNIX_EPOCH.coerce(),
        }
    }

    fn terms(base_salary: &str) -> worker::AdvanceTerms {
        worker::AdvanceTerms {
            base_salary: base_salary.parse().unwrap(),
            payment_frequency: worker::PaymentFrequency::Biweekly,
        }
    }

    #[test]
    fn attributes_only_overlapping_advances() {
        let advances = [
            advance("300", period((2024, 1, 1), (2024, 1, 15))),
            advance("450", period((2024, 1, 16), (2024, 1, 31))),
        ];

        // The 10th falls into the first half of the month.
        let a =
            Availability::calculate(terms("1000"), &advances, date(2024, 1, 10));
        assert_eq!(a.total_advances, "300".parse::<Amount>().unwrap());
        assert_eq!(a.available_amount, Decimal::from(700));

        let a =
            Availability::calculate(terms("1000"), &advances, date(2024, 1, 20));
        assert_eq!(a.total_advances, "450".parse::<Amount>().unwrap());
        assert_eq!(a.available_amount, Decimal::from(550));
    }

    #[test]
    fn available_amount_stays_unclamped() {
        let advances = [
            advance("800", period((2024, 1, 1), (2024, 1, 15))),
            advance("500", period((2024, 1, 1), (2024, 1, 15))),
        ];

        let a =
            Availability::calculate(terms("1000"), &advances, date(2024, 1, 10));
        assert_eq!(a.available_amount, Decimal::from(-300));
        assert!(!a.allows("1".parse().unwrap()));
    }

    #[test]
    fn allows_up_to_the_whole_availability() {
        let advances = [advance("400", period((2024, 1, 1), (2024, 1, 15)))];
        let a =
            Availability::calculate(terms("1000"), &advances, date(2024, 1, 10));

        assert!(a.allows("600".parse().unwrap()));
        assert!(!a.allows("600.01".parse().unwrap()));
    }
}

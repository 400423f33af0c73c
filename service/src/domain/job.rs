//! [`Job`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, Amount, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{vehicle, worker};
#[cfg(doc)]
use crate::domain::{Advance, Vehicle, Worker};

/// Repair job performed on a [`Vehicle`] by a [`Worker`].
#[derive(Clone, Debug)]
pub struct Job {
    /// ID of this [`Job`].
    pub id: Id,

    /// ID of the [`Vehicle`] this [`Job`] is performed on.
    pub vehicle_id: vehicle::Id,

    /// ID of the [`Worker`] this [`Job`] is assigned to.
    pub worker_id: worker::Id,

    /// [`Description`] of this [`Job`].
    pub description: Description,

    /// Total [`Amount`] this [`Job`] is charged.
    pub total_amount: Amount,

    /// Running total of [`Advance`]s received against this [`Job`].
    ///
    /// Maintained by [`apply_advance()`]/[`revert_advance()`] in the same
    /// transaction as the [`Advance`] ledger mutation.
    ///
    /// [`apply_advance()`]: Job::apply_advance
    /// [`revert_advance()`]: Job::revert_advance
    pub advance_amount: Amount,

    /// [`Status`] of this [`Job`].
    pub status: Status,

    /// [`DateTime`] when this [`Job`] starts.
    pub start_date: Option<StartDateTime>,

    /// [`DateTime`] when this [`Job`] ends.
    pub end_date: Option<EndDateTime>,

    /// [`DateTime`] when this [`Job`] was created.
    pub created_at: CreationDateTime,
}

impl Job {
    /// Adds the provided [`Advance`] [`Amount`] to the running total of this
    /// [`Job`].
    ///
    /// Once the running total reaches the total amount, the [`Job`] is
    /// considered fully paid and transitions to [`Status::Completed`].
    pub fn apply_advance(&mut self, amount: Amount) {
        self.advance_amount = self.advance_amount + amount;
        if self.is_fully_paid() {
            self.status = Status::Completed;
        }
    }

    /// Subtracts the provided [`Advance`] [`Amount`] from the running total
    /// of this [`Job`], flooring at zero.
    ///
    /// The [`Status`] is left untouched: a [`Status::Completed`] [`Job`]
    /// stays completed even when its [`Advance`]s are removed afterwards.
    pub fn revert_advance(&mut self, amount: Amount) {
        self.advance_amount = self.advance_amount.saturating_sub(amount);
    }

    /// Indicates whether the received [`Advance`]s cover the total amount of
    /// this [`Job`].
    #[must_use]
    pub fn is_fully_paid(&self) -> bool {
        self.advance_amount >= self.total_amount
    }

    /// Indicates whether the received [`Advance`]s exceed the total amount of
    /// this [`Job`].
    #[must_use]
    pub fn is_overpaid(&self) -> bool {
        self.advance_amount > self.total_amount
    }
}

/// ID of a [`Job`].
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

/// Description of a [`Job`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Description(String);

impl Description {
    /// Creates a new [`Description`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `description` matches the
    /// format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(description: impl Into<String>) -> Self {
        Self(description.into())
    }

    /// Creates a new [`Description`] if the given `description` is valid.
    #[must_use]
    pub fn new(description: impl Into<String>) -> Option<Self> {
        let description = description.into();
        Self::check(&description).then_some(Self(description))
    }

    /// Checks whether the given `description` is a valid [`Description`].
    fn check(description: impl AsRef<str>) -> bool {
        let description = description.as_ref();
        !description.is_empty() && description.len() <= 2048
    }
}

impl FromStr for Description {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Description`")
    }
}

define_kind! {
    #[doc = "Status of a [`Job`]."]
    enum Status {
        #[doc = "Not started yet."]
        Pending = 1,

        #[doc = "Being worked on."]
        InProgress = 2,

        #[doc = "Finished, or fully covered by advances."]
        Completed = 3,

        #[doc = "Abandoned, kept for history."]
        Cancelled = 4,
    }
}

/// [`DateTime`] when a [`Job`] was created.
pub type CreationDateTime = DateTimeOf<(Job, unit::Creation)>;

/// [`DateTime`] when a [`Job`] starts.
pub type StartDateTime = DateTimeOf<(Job, unit::Start)>;

/// [`DateTime`] when a [`Job`] ends.
pub type EndDateTime = DateTimeOf<(Job, unit::End)>;

#[cfg(test)]
mod spec {
    use common::{Amount, DateTime};

    use super::{Job, Status};

    fn job(total: &str) -> Job {
        Job {
            id: super::Id::new(),
            vehicle_id: crate::domain::vehicle::Id::new(),
            worker_id: crate::domain::worker::Id::new(),
            description: "Replace brake pads".parse().unwrap(),
            total_amount: total.parse().unwrap(),
            advance_amount: Amount::ZERO,
            status: Status::InProgress,
            start_date: None,
            end_date: None,
            created_at: DateTime::UNIX_EPOCH.coerce(),
        }
    }

    fn amount(s: &str) -> Amount {
        s.parse().unwrap()
    }

    #[test]
    fn advances_accumulate_and_complete_the_job() {
        let mut job = job("500");

        job.apply_advance(amount("200"));
        assert_eq!(job.advance_amount, amount("200"));
        assert_eq!(job.status, Status::InProgress);

        job.apply_advance(amount("300"));
        assert_eq!(job.advance_amount, amount("500"));
        assert_eq!(job.status, Status::Completed);
    }

    #[test]
    fn overpayment_is_tracked_but_not_blocked() {
        let mut job = job("500");
        job.apply_advance(amount("600"));
        assert!(job.is_overpaid());
        assert_eq!(job.status, Status::Completed);
    }

    #[test]
    fn reverting_advances_keeps_completed_status() {
        let mut job = job("500");
        job.apply_advance(amount("500"));
        assert_eq!(job.status, Status::Completed);

        job.revert_advance(amount("500"));
        assert_eq!(job.advance_amount, Amount::ZERO);
        assert_eq!(job.status, Status::Completed);
    }

    #[test]
    fn reverting_floors_at_zero() {
        let mut job = job("500");
        job.apply_advance(amount("100"));
        job.revert_advance(amount("300"));
        assert_eq!(job.advance_amount, Amount::ZERO);
    }
}

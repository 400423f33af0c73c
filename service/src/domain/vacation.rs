//! [`Vacation`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::worker;
#[cfg(doc)]
use crate::domain::Worker;

/// Vacation of a [`Worker`].
#[derive(Clone, Debug)]
pub struct Vacation {
    /// ID of this [`Vacation`].
    pub id: Id,

    /// ID of the [`Worker`] this [`Vacation`] belongs to.
    pub worker_id: worker::Id,

    /// [`DateTime`] when this [`Vacation`] starts.
    pub start_date: StartDateTime,

    /// [`DateTime`] when this [`Vacation`] ends.
    pub end_date: EndDateTime,

    /// Number of vacation days this [`Vacation`] spends.
    pub total_days: TotalDays,

    /// [`Status`] of this [`Vacation`].
    pub status: Status,

    /// [`Notes`] attached to this [`Vacation`].
    pub notes: Option<Notes>,

    /// [`DateTime`] when this [`Vacation`] was created.
    pub created_at: CreationDateTime,
}

impl Vacation {
    /// Indicates whether this [`Vacation`] spends days already counted as
    /// used.
    #[must_use]
    pub fn is_used(&self) -> bool {
        matches!(self.status, Status::Approved | Status::Completed)
    }

    /// Indicates whether this [`Vacation`] spends days awaiting approval.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self.status, Status::Requested)
    }
}

/// ID of a [`Vacation`].
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

/// Number of days spent by a [`Vacation`] (at least 1).
#[derive(
    Clone, Copy, Debug, Display, Eq, From, Into, Ord, PartialEq, PartialOrd,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct TotalDays(i32);

impl TotalDays {
    /// Creates a new [`TotalDays`] if the given number is positive.
    #[must_use]
    pub fn new(days: i32) -> Option<Self> {
        (days >= 1).then_some(Self(days))
    }

    /// Returns the inner number of days.
    #[must_use]
    pub fn get(self) -> i32 {
        self.0
    }
}

impl FromStr for TotalDays {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let days = s.parse().map_err(|_| "invalid `TotalDays`")?;
        Self::new(days).ok_or("non-positive `TotalDays`")
    }
}

/// Free-form notes attached to a [`Vacation`].
#[derive(Clone, Debug, Display, Eq, From, PartialEq)]
#[from(&str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Notes(String);

define_kind! {
    #[doc = "Status of a [`Vacation`]."]
    enum Status {
        #[doc = "Requested by the worker, awaiting review."]
        Requested = 1,

        #[doc = "Approved, days count as used."]
        Approved = 2,

        #[doc = "Rejected, days don't count."]
        Rejected = 3,

        #[doc = "Already taken, days count as used."]
        Completed = 4,
    }
}

/// [`DateTime`] when a [`Vacation`] was created.
pub type CreationDateTime = DateTimeOf<(Vacation, unit::Creation)>;

/// [`DateTime`] when a [`Vacation`] starts.
pub type StartDateTime = DateTimeOf<(Vacation, unit::Start)>;

/// [`DateTime`] when a [`Vacation`] ends.
pub type EndDateTime = DateTimeOf<(Vacation, unit::End)>;

//! [`Advance`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, Amount, DateTimeOf};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::job;
#[cfg(doc)]
use crate::domain::Job;

/// Advance payment received against a [`Job`].
///
/// Creating or deleting one adjusts the parent [`Job`]'s running total in
/// the same transaction.
#[derive(Clone, Debug)]
pub struct Advance {
    /// ID of this [`Advance`].
    pub id: Id,

    /// ID of the [`Job`] this [`Advance`] was received against.
    pub job_id: job::Id,

    /// Received [`Amount`] of money.
    pub amount: Amount,

    /// [`Description`] of this [`Advance`].
    pub description: Option<Description>,

    /// [`DateTime`] when this [`Advance`] was received.
    pub advance_date: ReceiptDateTime,

    /// [`DateTime`] when this [`Advance`] was created.
    pub created_at: CreationDateTime,
}

/// ID of an [`Advance`].
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

/// Description of an [`Advance`].
#[derive(Clone, Debug, Display, Eq, From, PartialEq)]
#[from(&str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Description(String);

/// [`DateTime`] when an [`Advance`] was created.
pub type CreationDateTime = DateTimeOf<(Advance, unit::Creation)>;

/// [`DateTime`] when an [`Advance`] was received.
pub type ReceiptDateTime = DateTimeOf<(Advance, unit::Receipt)>;

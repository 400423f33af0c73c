//! [`Payment`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, Amount, DateTimeOf};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::invoice;
#[cfg(doc)]
use crate::domain::Invoice;

/// Payment made against an [`Invoice`].
///
/// Creating or deleting one adjusts the parent [`Invoice`]'s running total
/// in the same transaction.
#[derive(Clone, Debug)]
pub struct Payment {
    /// ID of this [`Payment`].
    pub id: Id,

    /// ID of the [`Invoice`] this [`Payment`] was made against.
    pub invoice_id: invoice::Id,

    /// Paid [`Amount`] of money.
    pub amount: Amount,

    /// [`DateTime`] when this [`Payment`] was made.
    pub payment_date: ReceiptDateTime,

    /// [`Method`] this [`Payment`] was made with.
    pub method: Option<Method>,

    /// External [`Reference`] of this [`Payment`].
    pub reference: Option<Reference>,

    /// [`Notes`] attached to this [`Payment`].
    pub notes: Option<Notes>,

    /// [`DateTime`] when this [`Payment`] was created.
    pub created_at: CreationDateTime,
}

/// ID of a [`Payment`].
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

/// Method a [`Payment`] was made with.
#[derive(Clone, Debug, Display, Eq, From, PartialEq)]
#[from(&str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Method(String);

impl Method {
    /// [`Method`] label of [`Payment`]s synthesized by batch reconciliation.
    #[must_use]
    pub fn batch_reconciliation() -> Self {
        Self("Batch Reconciliation".into())
    }
}

/// External reference of a [`Payment`] (e.g. a bank transfer number).
#[derive(Clone, Debug, Display, Eq, From, PartialEq)]
#[from(&str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Reference(String);

/// Free-form notes attached to a [`Payment`].
#[derive(Clone, Debug, Display, Eq, From, PartialEq)]
#[from(&str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Notes(String);

impl Notes {
    /// [`Notes`] marking a [`Payment`] as synthesized by batch
    /// reconciliation.
    #[must_use]
    pub fn auto_reconciled() -> Self {
        Self("Created automatically by batch reconciliation".into())
    }
}

/// [`DateTime`] when a [`Payment`] was created.
pub type CreationDateTime = DateTimeOf<(Payment, unit::Creation)>;

/// [`DateTime`] when a [`Payment`] was made.
pub type ReceiptDateTime = DateTimeOf<(Payment, unit::Receipt)>;

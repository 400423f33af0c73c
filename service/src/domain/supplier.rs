//! [`Supplier`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::contact;
#[cfg(doc)]
use crate::domain::Invoice;

/// Supplier of parts and services, issuing [`Invoice`]s.
#[derive(Clone, Debug)]
pub struct Supplier {
    /// ID of this [`Supplier`].
    pub id: Id,

    /// [`Name`] of this [`Supplier`].
    pub name: Name,

    /// Name of the contact person at this [`Supplier`].
    pub contact_name: Option<Name>,

    /// [`contact::Phone`] of this [`Supplier`].
    pub phone: Option<contact::Phone>,

    /// [`contact::Email`] of this [`Supplier`].
    pub email: Option<contact::Email>,

    /// [`Address`] of this [`Supplier`].
    pub address: Option<Address>,

    /// [`Notes`] attached to this [`Supplier`].
    pub notes: Option<Notes>,

    /// Indicator whether this [`Supplier`] is active.
    pub is_active: bool,

    /// [`DateTime`] when this [`Supplier`] was created.
    pub created_at: CreationDateTime,
}

/// ID of a [`Supplier`].
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

/// Name of a [`Supplier`] or its contact person.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `name` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Creates a new [`Name`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`Name`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.len() <= 256
    }
}

impl FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Name`")
    }
}

/// Postal address of a [`Supplier`].
#[derive(Clone, Debug, Display, Eq, From, PartialEq)]
#[from(&str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Address(String);

/// Free-form notes attached to a [`Supplier`].
#[derive(Clone, Debug, Display, Eq, From, PartialEq)]
#[from(&str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Notes(String);

/// [`DateTime`] when a [`Supplier`] was created.
pub type CreationDateTime = DateTimeOf<(Supplier, unit::Creation)>;

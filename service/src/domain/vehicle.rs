//! [`Vehicle`] definitions.

use std::sync::LazyLock;

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::contact;
#[cfg(doc)]
use crate::domain::Job;

/// Customer vehicle [`Job`]s are performed on.
#[derive(Clone, Debug)]
pub struct Vehicle {
    /// ID of this [`Vehicle`].
    pub id: Id,

    /// Unique [`LicensePlate`] of this [`Vehicle`].
    pub license_plate: LicensePlate,

    /// Brand of this [`Vehicle`].
    pub brand: Option<Brand>,

    /// Model of this [`Vehicle`].
    pub model: Option<Model>,

    /// Manufacturing [`Year`] of this [`Vehicle`].
    pub year: Option<Year>,

    /// Name of this [`Vehicle`]'s owner.
    pub owner_name: Option<OwnerName>,

    /// [`contact::Phone`] of this [`Vehicle`]'s owner.
    pub owner_phone: Option<contact::Phone>,

    /// [`DateTime`] when this [`Vehicle`] was created.
    pub created_at: CreationDateTime,
}

/// ID of a [`Vehicle`].
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

/// License plate of a [`Vehicle`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct LicensePlate(String);

impl LicensePlate {
    /// Creates a new [`LicensePlate`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `plate` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(plate: impl Into<String>) -> Self {
        Self(plate.into())
    }

    /// Creates a new [`LicensePlate`] if the given `plate` is valid.
    #[must_use]
    pub fn new(plate: impl Into<String>) -> Option<Self> {
        let plate = plate.into();
        Self::check(&plate).then_some(Self(plate))
    }

    /// Checks whether the given `plate` is a valid [`LicensePlate`].
    fn check(plate: impl AsRef<str>) -> bool {
        /// Regular expression checking [`LicensePlate`] format: uppercase
        /// letters and digits, optionally dash- or space-separated.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^[A-Z0-9]{1,4}([- ]?[A-Z0-9]{1,4}){0,2}$")
                .expect("valid regex")
        });

        REGEX.is_match(plate.as_ref())
    }
}

impl FromStr for LicensePlate {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `LicensePlate`")
    }
}

/// Brand of a [`Vehicle`].
#[derive(Clone, Debug, Display, Eq, From, PartialEq)]
#[from(&str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Brand(String);

/// Model of a [`Vehicle`].
#[derive(Clone, Debug, Display, Eq, From, PartialEq)]
#[from(&str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Model(String);

/// Name of a [`Vehicle`]'s owner.
#[derive(Clone, Debug, Display, Eq, From, PartialEq)]
#[from(&str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct OwnerName(String);

/// Manufacturing year of a [`Vehicle`].
#[derive(
    Clone, Copy, Debug, Display, Eq, From, Into, Ord, PartialEq, PartialOrd,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Year(i32);

impl Year {
    /// Creates a new [`Year`] if the given `year` is plausible for a motor
    /// vehicle.
    #[must_use]
    pub fn new(year: i32) -> Option<Self> {
        (1900..=2100).contains(&year).then_some(Self(year))
    }

    /// Returns the inner year number.
    #[must_use]
    pub fn get(self) -> i32 {
        self.0
    }
}

impl FromStr for Year {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let year = s.parse().map_err(|_| "invalid `Year`")?;
        Self::new(year).ok_or("out of range `Year`")
    }
}

/// [`DateTime`] when a [`Vehicle`] was created.
pub type CreationDateTime = DateTimeOf<(Vehicle, unit::Creation)>;

#[cfg(test)]
mod spec {
    use super::{LicensePlate, Year};

    #[test]
    fn license_plate_formats() {
        assert!(LicensePlate::new("ABC-123").is_some());
        assert!(LicensePlate::new("AB 12 CD").is_some());
        assert!(LicensePlate::new("X1").is_some());

        assert!(LicensePlate::new("").is_none());
        assert!(LicensePlate::new("abc-123").is_none());
        assert!(LicensePlate::new("TOOLONGPLATE123").is_none());
    }

    #[test]
    fn year_bounds() {
        assert!(Year::new(1999).is_some());
        assert!(Year::new(1899).is_none());
        assert!(Year::new(2101).is_none());
    }
}

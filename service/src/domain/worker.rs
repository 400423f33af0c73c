//! [`Worker`] definitions.

use common::{define_kind, unit, Amount, DateTimeOf};
#[cfg(doc)]
use common::DateTime;
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::contact;
#[cfg(doc)]
use crate::domain::{SalaryAdvance, Vacation};

/// Workshop worker.
#[derive(Clone, Debug)]
pub struct Worker {
    /// ID of this [`Worker`].
    pub id: Id,

    /// First [`Name`] of this [`Worker`].
    pub first_name: Name,

    /// Last [`Name`] of this [`Worker`].
    pub last_name: Name,

    /// [`DocumentNumber`] identifying this [`Worker`], if known.
    pub document_number: Option<DocumentNumber>,

    /// [`contact::Phone`] of this [`Worker`].
    pub phone: Option<contact::Phone>,

    /// [`contact::Email`] of this [`Worker`].
    pub email: Option<contact::Email>,

    /// [`DateTime`] when this [`Worker`] was hired.
    ///
    /// [`None`] blocks any [`Vacation`] accrual.
    pub hire_date: Option<HireDateTime>,

    /// Base salary of this [`Worker`].
    ///
    /// [`None`] blocks any [`SalaryAdvance`] granting.
    pub base_salary: Option<Amount>,

    /// [`PaymentFrequency`] this [`Worker`] is paid with.
    ///
    /// [`None`] is treated as [`PaymentFrequency::Monthly`].
    pub payment_frequency: Option<PaymentFrequency>,

    /// [`Kind`] of this [`Worker`]'s employment.
    pub kind: Kind,

    /// Indicator whether this [`Worker`] is active.
    ///
    /// Deactivated [`Worker`]s are kept for history, not listed.
    pub is_active: bool,

    /// [`DateTime`] when this [`Worker`] was created.
    pub created_at: CreationDateTime,
}

impl Worker {
    /// Returns the [`AdvanceTerms`] of this [`Worker`], if it's eligible for
    /// [`SalaryAdvance`]s.
    ///
    /// Only [`Kind::Direct`] [`Worker`]s with a defined base salary are
    /// eligible.
    #[must_use]
    pub fn advance_terms(&self) -> Option<AdvanceTerms> {
        match self.kind {
            Kind::Direct => Some(AdvanceTerms {
                base_salary: self.base_salary?,
                payment_frequency: self
                    .payment_frequency
                    .unwrap_or(PaymentFrequency::Monthly),
            }),
            Kind::Contract => None,
        }
    }
}

/// Terms a [`Worker`] may be granted [`SalaryAdvance`]s under.
#[derive(Clone, Copy, Debug)]
pub struct AdvanceTerms {
    /// Base salary of the [`Worker`].
    pub base_salary: Amount,

    /// [`PaymentFrequency`] of the [`Worker`].
    pub payment_frequency: PaymentFrequency,
}

/// ID of a [`Worker`].
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

/// First or last name of a [`Worker`].
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

/// Identity document number of a [`Worker`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct DocumentNumber(String);

impl DocumentNumber {
    /// Creates a new [`DocumentNumber`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `number` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(number: impl Into<String>) -> Self {
        Self(number.into())
    }

    /// Creates a new [`DocumentNumber`] if the given `number` is valid.
    #[must_use]
    pub fn new(number: impl Into<String>) -> Option<Self> {
        let number = number.into();
        Self::check(&number).then_some(Self(number))
    }

    /// Checks whether the given `number` is a valid [`DocumentNumber`].
    fn check(number: impl AsRef<str>) -> bool {
        let number = number.as_ref();
        !number.is_empty()
            && number.len() <= 64
            && number.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    }
}

impl FromStr for DocumentNumber {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `DocumentNumber`")
    }
}

define_kind! {
    #[doc = "Kind of a [`Worker`]'s employment."]
    enum Kind {
        #[doc = "Directly employed worker, paid a salary by the workshop."]
        Direct = 1,

        #[doc = "External contractor, paid per job."]
        Contract = 2,
    }
}

define_kind! {
    #[doc = "Frequency a [`Worker`]'s salary is paid with."]
    enum PaymentFrequency {
        #[doc = "Every ISO week, Monday to Sunday."]
        Weekly = 1,

        #[doc = "Twice a month: days 1-15 and day 16 to the end of month."]
        Biweekly = 2,

        #[doc = "Once per calendar month."]
        Monthly = 3,
    }
}

/// [`DateTime`] when a [`Worker`] was created.
pub type CreationDateTime = DateTimeOf<(Worker, unit::Creation)>;

/// [`DateTime`] when a [`Worker`] was hired.
pub type HireDateTime = DateTimeOf<(Worker, unit::Hire)>;

#[cfg(test)]
mod spec {
    use common::Amount;

    use super::{Kind, PaymentFrequency, Worker};

    fn worker(kind: Kind, base_salary: Option<&str>) -> Worker {
        Worker {
            id: super::Id::new(),
            first_name: "Ana".parse().unwrap(),
            last_name: "Reyes".parse().unwrap(),
            document_number: None,
            phone: None,
            email: None,
            hire_date: None,
            base_salary: base_salary.map(|s| s.parse::<Amount>().unwrap()),
            payment_frequency: None,
            kind,
            is_active: true,
            created_at: common::DateTime::UNIX_EPOCH.coerce(),
        }
    }

    #[test]
    fn advance_terms_require_direct_kind() {
        assert!(worker(Kind::Contract, Some("1000"))
            .advance_terms()
            .is_none());
    }

    #[test]
    fn advance_terms_require_base_salary() {
        assert!(worker(Kind::Direct, None).advance_terms().is_none());
    }

    #[test]
    fn advance_terms_default_to_monthly_frequency() {
        let terms = worker(Kind::Direct, Some("1000"))
            .advance_terms()
            .unwrap();
        assert_eq!(terms.payment_frequency, PaymentFrequency::Monthly);
        assert_eq!(terms.base_salary, "1000".parse().unwrap());
    }
}

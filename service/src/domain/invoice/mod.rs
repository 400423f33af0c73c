//! [`Invoice`] definitions.

pub mod payment;

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, Amount, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::supplier;
#[cfg(doc)]
use crate::domain::Supplier;

pub use self::payment::Payment;

/// Invoice received from a [`Supplier`].
#[derive(Clone, Debug)]
pub struct Invoice {
    /// ID of this [`Invoice`].
    pub id: Id,

    /// Unique [`Number`] of this [`Invoice`].
    pub number: Number,

    /// ID of the [`Supplier`] this [`Invoice`] was received from.
    pub supplier_id: supplier::Id,

    /// [`Description`] of this [`Invoice`].
    pub description: Option<Description>,

    /// Total [`Amount`] this [`Invoice`] charges.
    pub total_amount: Amount,

    /// Running total of [`Payment`]s made against this [`Invoice`].
    ///
    /// Maintained by [`apply_payment()`]/[`revert_payment()`] in the same
    /// transaction as the [`Payment`] ledger mutation.
    ///
    /// [`apply_payment()`]: Invoice::apply_payment
    /// [`revert_payment()`]: Invoice::revert_payment
    pub paid_amount: Amount,

    /// [`PaymentStatus`] of this [`Invoice`].
    ///
    /// A cached projection of [`PaymentStatus::derive()`], recomputed on
    /// every ledger mutation.
    pub payment_status: PaymentStatus,

    /// [`DateTime`] when this [`Invoice`] was issued.
    pub invoice_date: IssueDateTime,

    /// [`DateTime`] when this [`Invoice`] is due.
    pub due_date: Option<DueDateTime>,

    /// [`DateTime`] when this [`Invoice`] was created.
    pub created_at: CreationDateTime,
}

impl Invoice {
    /// Adds the provided [`Payment`] [`Amount`] to the running total of this
    /// [`Invoice`] and re-derives its [`PaymentStatus`].
    pub fn apply_payment(&mut self, amount: Amount) {
        self.paid_amount = self.paid_amount + amount;
        self.payment_status =
            PaymentStatus::derive(self.paid_amount, self.total_amount);
    }

    /// Subtracts the provided [`Payment`] [`Amount`] from the running total
    /// of this [`Invoice`] (flooring at zero) and re-derives its
    /// [`PaymentStatus`].
    pub fn revert_payment(&mut self, amount: Amount) {
        self.paid_amount = self.paid_amount.saturating_sub(amount);
        self.payment_status =
            PaymentStatus::derive(self.paid_amount, self.total_amount);
    }

    /// Marks this [`Invoice`] as fully paid.
    ///
    /// The only path writing the [`PaymentStatus`] without deriving it from a
    /// ledger mutation, reserved for batch reconciliation.
    pub fn mark_paid(&mut self) {
        self.paid_amount = self.total_amount;
        self.payment_status = PaymentStatus::Paid;
    }

    /// Returns the [`Amount`] still outstanding on this [`Invoice`].
    #[must_use]
    pub fn outstanding(&self) -> Amount {
        self.total_amount.saturating_sub(self.paid_amount)
    }
}

/// ID of an [`Invoice`].
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

/// Unique number of an [`Invoice`], as printed on the document.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Number(String);

impl Number {
    /// Creates a new [`Number`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `number` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(number: impl Into<String>) -> Self {
        Self(number.into())
    }

    /// Creates a new [`Number`] if the given `number` is valid.
    #[must_use]
    pub fn new(number: impl Into<String>) -> Option<Self> {
        let number = number.into();
        Self::check(&number).then_some(Self(number))
    }

    /// Checks whether the given `number` is a valid [`Number`].
    fn check(number: impl AsRef<str>) -> bool {
        let number = number.as_ref();
        number.trim() == number && !number.is_empty() && number.len() <= 64
    }
}

impl FromStr for Number {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Number`")
    }
}

/// Description of an [`Invoice`].
#[derive(Clone, Debug, Display, Eq, From, PartialEq)]
#[from(&str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Description(String);

define_kind! {
    #[doc = "Payment status of an [`Invoice`], derived from its amounts."]
    enum PaymentStatus {
        #[doc = "Nothing is paid yet."]
        Pending = 1,

        #[doc = "Partially paid."]
        Partial = 2,

        #[doc = "Fully paid."]
        Paid = 3,
    }
}

impl PaymentStatus {
    /// Derives the [`PaymentStatus`] from the paid and total [`Amount`]s.
    #[must_use]
    pub fn derive(paid: Amount, total: Amount) -> Self {
        if paid >= total {
            Self::Paid
        } else if paid.is_zero() {
            Self::Pending
        } else {
            Self::Partial
        }
    }
}

/// [`DateTime`] when an [`Invoice`] was created.
pub type CreationDateTime = DateTimeOf<(Invoice, unit::Creation)>;

/// [`DateTime`] when an [`Invoice`] was issued.
pub type IssueDateTime = DateTimeOf<(Invoice, unit::Issue)>;

/// [`DateTime`] when an [`Invoice`] is due.
pub type DueDateTime = DateTimeOf<(Invoice, unit::Due)>;

#[cfg(test)]
mod spec {
    use common::{Amount, DateTime};

    use super::{Invoice, PaymentStatus};

    fn amount(s: &str) -> Amount {
        s.parse().unwrap()
    }

    fn invoice(total: &str) -> Invoice {
        Invoice {
            id: super::Id::new(),
            number: "INV-001".parse().unwrap(),
            supplier_id: crate::domain::supplier::Id::new(),
            description: None,
            total_amount: total.parse().unwrap(),
            paid_amount: Amount::ZERO,
            payment_status: PaymentStatus::Pending,
            invoice_date: DateTime::UNIX_EPOCH.coerce(),
            due_date: None,
            created_at: DateTime::UNIX_EPOCH.coerce(),
        }
    }

    #[test]
    fn derives_three_way_status() {
        assert_eq!(
            PaymentStatus::derive(Amount::ZERO, amount("1000")),
            PaymentStatus::Pending,
        );
        assert_eq!(
            PaymentStatus::derive(amount("400"), amount("1000")),
            PaymentStatus::Partial,
        );
        assert_eq!(
            PaymentStatus::derive(amount("1000"), amount("1000")),
            PaymentStatus::Paid,
        );
        assert_eq!(
            PaymentStatus::derive(amount("1200"), amount("1000")),
            PaymentStatus::Paid,
        );
    }

    #[test]
    fn payments_move_status_back_and_forth() {
        let mut invoice = invoice("1000");

        invoice.apply_payment(amount("400"));
        assert_eq!(invoice.paid_amount, amount("400"));
        assert_eq!(invoice.payment_status, PaymentStatus::Partial);

        invoice.apply_payment(amount("600"));
        assert_eq!(invoice.paid_amount, amount("1000"));
        assert_eq!(invoice.payment_status, PaymentStatus::Paid);

        invoice.revert_payment(amount("600"));
        assert_eq!(invoice.paid_amount, amount("400"));
        assert_eq!(invoice.payment_status, PaymentStatus::Partial);
    }

    #[test]
    fn reverting_floors_at_zero_and_resets_status() {
        let mut invoice = invoice("1000");
        invoice.apply_payment(amount("400"));
        invoice.revert_payment(amount("500"));
        assert_eq!(invoice.paid_amount, Amount::ZERO);
        assert_eq!(invoice.payment_status, PaymentStatus::Pending);
    }

    #[test]
    fn mark_paid_settles_the_outstanding_remainder() {
        let mut invoice = invoice("1000");
        invoice.apply_payment(amount("250"));
        assert_eq!(invoice.outstanding(), amount("750"));

        invoice.mark_paid();
        assert_eq!(invoice.paid_amount, amount("1000"));
        assert_eq!(invoice.payment_status, PaymentStatus::Paid);
        assert_eq!(invoice.outstanding(), Amount::ZERO);
    }
}

//! [`Query`] collection related to a single [`Worker`].

use common::operations::By;

use crate::domain::{vacation, worker, SalaryAdvance, Vacation, Worker};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`Worker`] by its [`worker::Id`].
pub type ById = DatabaseQuery<By<Option<Worker>, worker::Id>>;

/// Queries all [`Vacation`]s of a [`Worker`].
pub type Vacations = DatabaseQuery<By<Vec<Vacation>, worker::Id>>;

/// Queries [`Vacation`]s of a [`Worker`] in the provided
/// [`vacation::Status`].
pub type VacationsInStatus =
    DatabaseQuery<By<Vec<Vacation>, (worker::Id, vacation::Status)>>;

/// Queries all [`SalaryAdvance`]s of a [`Worker`].
pub type SalaryAdvances = DatabaseQuery<By<Vec<SalaryAdvance>, worker::Id>>;

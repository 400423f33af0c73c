//! [`Query`] collection related to a single [`Invoice`].

use common::operations::By;

use crate::domain::{invoice, Invoice};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries an [`Invoice`] by its [`invoice::Id`].
pub type ById = DatabaseQuery<By<Option<Invoice>, invoice::Id>>;

/// Queries all [`invoice::Payment`]s made against an [`Invoice`].
pub type Payments = DatabaseQuery<By<Vec<invoice::Payment>, invoice::Id>>;

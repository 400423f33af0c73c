//! [`AvailableAdvance`] definition.

use common::{
    operations::{By, Select},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{worker, SalaryAdvance, Worker},
    infra::{database, Database},
    read::salary_advance::Availability,
    Service,
};

use super::Query;

/// [`Query`] calculating the remaining [`SalaryAdvance`] capacity of a
/// [`Worker`] within its current payment period.
///
/// Resolves to [`None`] for a [`Worker`] that is not eligible for
/// [`SalaryAdvance`]s at all (not directly employed, or without a base
/// salary).
#[derive(Clone, Copy, Debug)]
pub struct AvailableAdvance {
    /// ID of the [`Worker`] to calculate the [`Availability`] for.
    pub worker_id: worker::Id,

    /// Moment to calculate the [`Availability`] at.
    pub at: DateTime,
}

impl<Db> Query<AvailableAdvance> for Service<Db>
where
    Db: Database<
            Select<By<Option<Worker>, worker::Id>>,
            Ok = Option<Worker>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<SalaryAdvance>, worker::Id>>,
            Ok = Vec<SalaryAdvance>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Option<Availability>;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        AvailableAdvance { worker_id, at }: AvailableAdvance,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let worker = self
            .database()
            .execute(Select(By::<Option<Worker>, _>::new(worker_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::WorkerNotExists(worker_id))
            .map_err(tracerr::wrap!())?;

        let Some(terms) = worker.advance_terms() else {
            return Ok(None);
        };

        let advances = self
            .database()
            .execute(Select(By::<Vec<SalaryAdvance>, _>::new(worker_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(Some(Availability::calculate(terms, &advances, at)))
    }
}

/// Error of [`AvailableAdvance`] [`Query`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Worker`] with the provided ID does not exist.
    #[display("`Worker(id: {_0})` does not exist")]
    WorkerNotExists(#[error(not(source))] worker::Id),
}

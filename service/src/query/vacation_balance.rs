//! [`VacationBalance`] definition.

use common::{
    operations::{By, Select},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{worker, Vacation, Worker},
    infra::{database, Database},
    read::vacation::Balance,
    Service,
};

use super::Query;

/// [`Query`] calculating the vacation [`Balance`] of a [`Worker`].
#[derive(Clone, Copy, Debug)]
pub struct VacationBalance {
    /// ID of the [`Worker`] to calculate the [`Balance`] for.
    pub worker_id: worker::Id,

    /// Moment to calculate the [`Balance`] at.
    pub at: DateTime,
}

impl<Db> Query<VacationBalance> for Service<Db>
where
    Db: Database<
            Select<By<Option<Worker>, worker::Id>>,
            Ok = Option<Worker>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Vacation>, worker::Id>>,
            Ok = Vec<Vacation>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Balance;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        VacationBalance { worker_id, at }: VacationBalance,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let worker = self
            .database()
            .execute(Select(By::<Option<Worker>, _>::new(worker_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::WorkerNotExists(worker_id))
            .map_err(tracerr::wrap!())?;

        let hire_date = worker
            .hire_date
            .ok_or(E::WorkerHasNoHireDate(worker_id))
            .map_err(tracerr::wrap!())?;

        let vacations = self
            .database()
            .execute(Select(By::<Vec<Vacation>, _>::new(worker_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(Balance::calculate(hire_date, &vacations, at))
    }
}

/// Error of [`VacationBalance`] [`Query`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Worker`] has no hire date to accrue vacation days from.
    #[display("`Worker(id: {_0})` has no hire date")]
    WorkerHasNoHireDate(#[error(not(source))] worker::Id),

    /// [`Worker`] with the provided ID does not exist.
    #[display("`Worker(id: {_0})` does not exist")]
    WorkerNotExists(#[error(not(source))] worker::Id),
}

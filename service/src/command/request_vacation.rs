//! [`Command`] for requesting a new [`Vacation`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{vacation, worker, Vacation, Worker},
    infra::{database, Database},
    read::vacation::Balance,
    Service,
};

use super::Command;

/// [`Command`] for requesting a new [`Vacation`].
///
/// The request is rejected when it doesn't fit into the [`Worker`]'s accrued
/// vacation [`Balance`] at the `at` moment.
#[derive(Clone, Debug)]
pub struct RequestVacation {
    /// ID of the [`Worker`] requesting a [`Vacation`].
    pub worker_id: worker::Id,

    /// [`DateTime`] when a new [`Vacation`] starts.
    pub start_date: vacation::StartDateTime,

    /// [`DateTime`] when a new [`Vacation`] ends.
    pub end_date: vacation::EndDateTime,

    /// Number of vacation days a new [`Vacation`] spends.
    pub total_days: vacation::TotalDays,

    /// [`vacation::Notes`] attached to a new [`Vacation`].
    pub notes: Option<vacation::Notes>,

    /// Moment to evaluate the [`Worker`]'s [`Balance`] at.
    pub at: DateTime,
}

impl<Db> Command<RequestVacation> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Worker>, worker::Id>>,
            Ok = Option<Worker>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Vacation>, worker::Id>>,
            Ok = Vec<Vacation>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<Insert<Vacation>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Vacation;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: RequestVacation,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RequestVacation {
            worker_id,
            start_date,
            end_date,
            total_days,
            notes,
            at,
        } = cmd;

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

        let balance = Balance::calculate(hire_date, &vacations, at);
        if !balance.allows_request(total_days) {
            return Err(tracerr::new!(E::InsufficientBalance {
                requested: total_days.get(),
                available: balance.available_days,
            }));
        }

        let vacation = Vacation {
            id: vacation::Id::new(),
            worker_id,
            start_date,
            end_date,
            total_days,
            status: vacation::Status::Requested,
            notes,
            created_at: DateTime::now().coerce(),
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Insert(vacation.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(vacation)
    }
}

/// Error of [`RequestVacation`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Requested days exceed the available vacation balance.
    #[display(
        "Requested {requested} vacation days exceed the available balance \
         of {available} days"
    )]
    InsufficientBalance {
        /// Number of requested vacation days.
        requested: i32,

        /// Number of available vacation days.
        available: i32,
    },

    /// [`Worker`] has no hire date to accrue vacation days from.
    #[display("`Worker(id: {_0})` has no hire date")]
    WorkerHasNoHireDate(#[error(not(source))] worker::Id),

    /// [`Worker`] with the provided ID does not exist.
    #[display("`Worker(id: {_0})` does not exist")]
    WorkerNotExists(#[error(not(source))] worker::Id),
}

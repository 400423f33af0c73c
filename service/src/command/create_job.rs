//! [`Command`] for creating a new [`Job`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    Amount, DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{job, vehicle, worker, Job, Vehicle, Worker},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Job`].
#[derive(Clone, Debug)]
pub struct CreateJob {
    /// ID of the [`Vehicle`] a new [`Job`] is performed on.
    pub vehicle_id: vehicle::Id,

    /// ID of the [`Worker`] a new [`Job`] is assigned to.
    pub worker_id: worker::Id,

    /// [`job::Description`] of a new [`Job`].
    pub description: job::Description,

    /// Total [`Amount`] a new [`Job`] is charged.
    pub total_amount: Amount,

    /// [`DateTime`] when a new [`Job`] starts.
    pub start_date: Option<job::StartDateTime>,

    /// [`DateTime`] when a new [`Job`] ends.
    pub end_date: Option<job::EndDateTime>,
}

impl<Db> Command<CreateJob> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Vehicle>, vehicle::Id>>,
            Ok = Option<Vehicle>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Worker>, worker::Id>>,
            Ok = Option<Worker>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<Insert<Job>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Job;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateJob) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateJob {
            vehicle_id,
            worker_id,
            description,
            total_amount,
            start_date,
            end_date,
        } = cmd;

        self.database()
            .execute(Select(By::<Option<Vehicle>, _>::new(vehicle_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::VehicleNotExists(vehicle_id))
            .map_err(tracerr::wrap!())
            .map(drop)?;

        self.database()
            .execute(Select(By::<Option<Worker>, _>::new(worker_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::WorkerNotExists(worker_id))
            .map_err(tracerr::wrap!())
            .map(drop)?;

        let job = Job {
            id: job::Id::new(),
            vehicle_id,
            worker_id,
            description,
            total_amount,
            advance_amount: Amount::ZERO,
            status: job::Status::Pending,
            start_date,
            end_date,
            created_at: DateTime::now().coerce(),
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Insert(job.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(job)
    }
}

/// Error of [`CreateJob`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Vehicle`] with the provided ID does not exist.
    #[display("`Vehicle(id: {_0})` does not exist")]
    VehicleNotExists(#[error(not(source))] vehicle::Id),

    /// [`Worker`] with the provided ID does not exist.
    #[display("`Worker(id: {_0})` does not exist")]
    WorkerNotExists(#[error(not(source))] worker::Id),
}

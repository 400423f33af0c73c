//! [`Command`] for deactivating a [`Worker`].

use common::operations::{By, Commit, Select, Transact, Transacted, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{worker, Worker},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for deactivating a [`Worker`].
///
/// [`Worker`]s are never removed physically, to keep their [`Job`] and
/// vacation history intact.
///
/// [`Job`]: crate::domain::Job
#[derive(Clone, Copy, Debug)]
pub struct DeactivateWorker {
    /// ID of the [`Worker`] to be deactivated.
    pub worker_id: worker::Id,
}

impl<Db> Command<DeactivateWorker> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Worker>, worker::Id>>,
            Ok = Option<Worker>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<Update<Worker>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = bool;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: DeactivateWorker,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeactivateWorker { worker_id } = cmd;

        let Some(mut worker) = self
            .database()
            .execute(Select(By::<Option<Worker>, _>::new(worker_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
        else {
            return Ok(false);
        };

        worker.is_active = false;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Update(worker))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(true)
    }
}

/// Error of [`DeactivateWorker`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),
}

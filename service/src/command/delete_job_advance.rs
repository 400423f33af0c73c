//! [`Command`] for deleting an [`Advance`] of a [`Job`].

use common::operations::{
    By, Commit, Delete, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{advance, job, Advance, Job},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for deleting an [`Advance`] of a [`Job`].
///
/// The [`Job`]'s running total is decremented in the same transaction,
/// flooring at zero. The [`Job`]'s status is not reverted: once
/// [`Completed`], it stays so even when its [`Advance`]s are removed.
///
/// Resolves to `false` when there is nothing to delete.
///
/// [`Completed`]: job::Status::Completed
#[derive(Clone, Copy, Debug)]
pub struct DeleteJobAdvance {
    /// ID of the [`Advance`] to be deleted.
    pub advance_id: advance::Id,
}

impl<Db> Command<DeleteJobAdvance> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Advance>, advance::Id>>,
            Ok = Option<Advance>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<Lock<By<Job, job::Id>>, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Advance>, advance::Id>>,
            Ok = Option<Advance>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Job>, job::Id>>,
            Ok = Option<Job>,
            Err = Traced<database::Error>,
        > + Database<Delete<By<Advance, advance::Id>>, Err = Traced<database::Error>>
        + Database<Update<Job>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = bool;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: DeleteJobAdvance,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteJobAdvance { advance_id } = cmd;

        let Some(advance) = self
            .database()
            .execute(Select(By::<Option<Advance>, _>::new(advance_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
        else {
            return Ok(false);
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent mutations of the same `Job` running total.
        tx.execute(Lock(By::new(advance.job_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let Some(advance) = tx
            .execute(Select(By::<Option<Advance>, _>::new(advance_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
        else {
            // Deleted concurrently before the lock was taken.
            return Ok(false);
        };

        let mut job = tx
            .execute(Select(By::<Option<Job>, _>::new(advance.job_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::JobNotExists(advance.job_id))
            .map_err(tracerr::wrap!())?;

        tx.execute(Delete(By::<Advance, _>::new(advance_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        job.revert_advance(advance.amount);

        tx.execute(Update(job))
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

/// Error of [`DeleteJobAdvance`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Job`] with the provided ID does not exist.
    #[display("`Job(id: {_0})` does not exist")]
    JobNotExists(#[error(not(source))] job::Id),
}

//! [`Command`] for recording a new [`Advance`] against a [`Job`].

use common::{
    operations::{By, Commit, Insert, Lock, Select, Transact, Transacted, Update},
    Amount, DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{advance, job, Advance, Job},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for recording a new [`Advance`] against a [`Job`].
///
/// The [`Job`]'s running total is updated in the same transaction, and the
/// [`Job`] auto-transitions to [`Completed`] once its total amount is
/// covered. An [`Advance`] pushing the running total over the total amount
/// is recorded anyway, only flagged in the logs.
///
/// [`Completed`]: job::Status::Completed
#[derive(Clone, Debug)]
pub struct RecordJobAdvance {
    /// ID of the [`Job`] the [`Advance`] is received against.
    pub job_id: job::Id,

    /// Received [`Amount`] of money.
    pub amount: Amount,

    /// [`advance::Description`] of a new [`Advance`].
    pub description: Option<advance::Description>,

    /// [`DateTime`] when a new [`Advance`] was received.
    pub advance_date: advance::ReceiptDateTime,
}

impl<Db> Command<RecordJobAdvance> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Job>, job::Id>>,
            Ok = Option<Job>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<Lock<By<Job, job::Id>>, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Job>, job::Id>>,
            Ok = Option<Job>,
            Err = Traced<database::Error>,
        > + Database<Insert<Advance>, Err = Traced<database::Error>>
        + Database<Update<Job>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Advance;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: RecordJobAdvance,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RecordJobAdvance {
            job_id,
            amount,
            description,
            advance_date,
        } = cmd;

        self.database()
            .execute(Select(By::<Option<Job>, _>::new(job_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::JobNotExists(job_id))
            .map_err(tracerr::wrap!())
            .map(drop)?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent mutations of the same `Job` running total.
        tx.execute(Lock(By::new(job_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut job = tx
            .execute(Select(By::<Option<Job>, _>::new(job_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::JobNotExists(job_id))
            .map_err(tracerr::wrap!())?;

        let advance = Advance {
            id: advance::Id::new(),
            job_id,
            amount,
            description,
            advance_date,
            created_at: DateTime::now().coerce(),
        };

        tx.execute(Insert(advance.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        job.apply_advance(amount);
        if job.is_overpaid() {
            tracing::warn!(
                job_id = %job.id,
                advance_amount = %job.advance_amount,
                total_amount = %job.total_amount,
                "`Job` advances exceed its total amount",
            );
        }

        tx.execute(Update(job))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(advance)
    }
}

/// Error of [`RecordJobAdvance`] [`Command`] execution.
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

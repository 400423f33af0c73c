//! [`Command`] for reviewing a requested [`Vacation`].

use common::operations::{By, Commit, Select, Transact, Transacted, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{vacation, Vacation},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for reviewing a requested [`Vacation`].
///
/// Approving turns its pending days into used ones; rejecting releases them
/// back into the balance.
#[derive(Clone, Copy, Debug)]
pub struct ReviewVacation {
    /// ID of the [`Vacation`] to be reviewed.
    pub vacation_id: vacation::Id,

    /// [`Decision`] on the [`Vacation`].
    pub decision: Decision,
}

/// Decision on a reviewed [`Vacation`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Decision {
    /// Approve the [`Vacation`].
    Approve,

    /// Reject the [`Vacation`].
    Reject,
}

impl<Db> Command<ReviewVacation> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Vacation>, vacation::Id>>,
            Ok = Option<Vacation>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<Update<Vacation>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Vacation;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: ReviewVacation,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let ReviewVacation {
            vacation_id,
            decision,
        } = cmd;

        let mut vacation = self
            .database()
            .execute(Select(By::<Option<Vacation>, _>::new(vacation_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::VacationNotExists(vacation_id))
            .map_err(tracerr::wrap!())?;

        if vacation.status != vacation::Status::Requested {
            return Err(tracerr::new!(E::VacationNotRequested(vacation_id)));
        }

        vacation.status = match decision {
            Decision::Approve => vacation::Status::Approved,
            Decision::Reject => vacation::Status::Rejected,
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Update(vacation.clone()))
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

/// Error of [`ReviewVacation`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Vacation`] with the provided ID does not exist.
    #[display("`Vacation(id: {_0})` does not exist")]
    VacationNotExists(#[error(not(source))] vacation::Id),

    /// [`Vacation`] is not awaiting review.
    #[display("`Vacation(id: {_0})` is not awaiting review")]
    VacationNotRequested(#[error(not(source))] vacation::Id),
}

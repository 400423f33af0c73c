//! [`Command`] for revoking a [`SalaryAdvance`].

use common::operations::{By, Commit, Delete, Select, Transact, Transacted};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{salary_advance, SalaryAdvance},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for revoking a granted [`SalaryAdvance`].
///
/// Resolves to `false` when there is nothing to revoke.
#[derive(Clone, Copy, Debug)]
pub struct RevokeSalaryAdvance {
    /// ID of the [`SalaryAdvance`] to be revoked.
    pub advance_id: salary_advance::Id,
}

impl<Db> Command<RevokeSalaryAdvance> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<SalaryAdvance>, salary_advance::Id>>,
            Ok = Option<SalaryAdvance>,
            Err = Traced<database::Error>,
        > + Database<
            Delete<By<SalaryAdvance, salary_advance::Id>>,
            Err = Traced<database::Error>,
        > + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = bool;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: RevokeSalaryAdvance,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RevokeSalaryAdvance { advance_id } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let advance = tx
            .execute(Select(By::<Option<SalaryAdvance>, _>::new(advance_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if advance.is_none() {
            return Ok(false);
        }

        tx.execute(Delete(By::<SalaryAdvance, _>::new(advance_id)))
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

/// Error of [`RevokeSalaryAdvance`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),
}

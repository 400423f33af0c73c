//! [`Command`] for granting a new [`SalaryAdvance`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    Amount, DateTime,
};
use derive_more::{Display, Error, From};
use rust_decimal::Decimal;
use tracerr::Traced;

use crate::{
    domain::{
        salary_advance::{self, Period},
        worker, SalaryAdvance, Worker,
    },
    infra::{database, Database},
    read::salary_advance::Availability,
    Service,
};

use super::Command;

/// [`Command`] for granting a new [`SalaryAdvance`].
///
/// Validation fails fast, in order: the [`Worker`] must exist, must be
/// directly employed, must have a base salary, and the granted amount must
/// fit into the remaining [`Availability`] of the current payment
/// [`Period`].
#[derive(Clone, Debug)]
pub struct GrantSalaryAdvance {
    /// ID of the [`Worker`] a new [`SalaryAdvance`] is granted to.
    pub worker_id: worker::Id,

    /// Granted [`Amount`] of money.
    pub amount: Amount,

    /// [`DateTime`] when a new [`SalaryAdvance`] is granted.
    pub advance_date: salary_advance::GrantDateTime,

    /// Payment [`Period`] a new [`SalaryAdvance`] is repaid within.
    ///
    /// Defaults to the current [`Period`] of the [`Worker`] when omitted.
    pub period: Option<Period>,

    /// [`salary_advance::Notes`] attached to a new [`SalaryAdvance`].
    pub notes: Option<salary_advance::Notes>,

    /// Moment to evaluate the [`Worker`]'s [`Availability`] at.
    pub at: DateTime,
}

impl<Db> Command<GrantSalaryAdvance> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Worker>, worker::Id>>,
            Ok = Option<Worker>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<SalaryAdvance>, (worker::Id, Period)>>,
            Ok = Vec<SalaryAdvance>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<
            Insert<SalaryAdvance>,
            Err = Traced<database::Error>,
        > + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = SalaryAdvance;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: GrantSalaryAdvance,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let GrantSalaryAdvance {
            worker_id,
            amount,
            advance_date,
            period,
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

        if worker.kind != worker::Kind::Direct {
            return Err(tracerr::new!(E::WorkerNotDirect(worker_id)));
        }
        let Some(terms) = worker.advance_terms() else {
            return Err(tracerr::new!(E::WorkerHasNoBaseSalary(worker_id)));
        };

        let current = Period::current(terms.payment_frequency, at);
        let advances = self
            .database()
            .execute(Select(By::<Vec<SalaryAdvance>, _>::new((
                worker_id, current,
            ))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let availability = Availability::calculate(terms, &advances, at);
        if !availability.allows(amount) {
            return Err(tracerr::new!(E::ExceedsAvailableAdvance {
                requested: amount,
                available: availability.available_amount,
            }));
        }

        let advance = SalaryAdvance {
            id: salary_advance::Id::new(),
            worker_id,
            amount,
            advance_date,
            period: period.unwrap_or(current),
            notes,
            created_at: DateTime::now().coerce(),
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Insert(advance.clone()))
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

/// Error of [`GrantSalaryAdvance`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Granted amount exceeds the available advance capacity.
    #[display(
        "Advance amount ({requested}) exceeds available amount ({available})"
    )]
    ExceedsAvailableAdvance {
        /// Requested [`Amount`].
        requested: Amount,

        /// Available amount within the current [`Period`].
        available: Decimal,
    },

    /// [`Worker`] has no base salary to advance against.
    #[display("`Worker(id: {_0})` has no base salary")]
    WorkerHasNoBaseSalary(#[error(not(source))] worker::Id),

    /// [`Worker`] is not directly employed.
    #[display("`Worker(id: {_0})` is not directly employed")]
    WorkerNotDirect(#[error(not(source))] worker::Id),

    /// [`Worker`] with the provided ID does not exist.
    #[display("`Worker(id: {_0})` does not exist")]
    WorkerNotExists(#[error(not(source))] worker::Id),
}

//! [`Command`] for creating a new [`Worker`].

use common::{
    operations::{Commit, Insert, Transact, Transacted},
    Amount, DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{contact, worker, Worker},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Worker`].
#[derive(Clone, Debug)]
pub struct CreateWorker {
    /// First [`worker::Name`] of a new [`Worker`].
    pub first_name: worker::Name,

    /// Last [`worker::Name`] of a new [`Worker`].
    pub last_name: worker::Name,

    /// [`worker::DocumentNumber`] of a new [`Worker`].
    pub document_number: Option<worker::DocumentNumber>,

    /// [`contact::Phone`] of a new [`Worker`].
    pub phone: Option<contact::Phone>,

    /// [`contact::Email`] of a new [`Worker`].
    pub email: Option<contact::Email>,

    /// [`DateTime`] when a new [`Worker`] was hired.
    pub hire_date: Option<worker::HireDateTime>,

    /// Base salary of a new [`Worker`].
    pub base_salary: Option<Amount>,

    /// [`worker::PaymentFrequency`] of a new [`Worker`].
    pub payment_frequency: Option<worker::PaymentFrequency>,

    /// [`worker::Kind`] of a new [`Worker`]'s employment.
    pub kind: worker::Kind,
}

impl<Db> Command<CreateWorker> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Insert<Worker>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Worker;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateWorker) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateWorker {
            first_name,
            last_name,
            document_number,
            phone,
            email,
            hire_date,
            base_salary,
            payment_frequency,
            kind,
        } = cmd;

        let worker = Worker {
            id: worker::Id::new(),
            first_name,
            last_name,
            document_number,
            phone,
            email,
            hire_date,
            base_salary,
            payment_frequency,
            kind,
            is_active: true,
            created_at: DateTime::now().coerce(),
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Insert(worker.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(worker)
    }
}

/// Error of [`CreateWorker`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),
}

//! [`Command`] for creating a new [`Invoice`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    Amount, DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{invoice, supplier, Invoice, Supplier},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Invoice`].
#[derive(Clone, Debug)]
pub struct CreateInvoice {
    /// Unique [`invoice::Number`] of a new [`Invoice`].
    pub number: invoice::Number,

    /// ID of the [`Supplier`] a new [`Invoice`] was received from.
    pub supplier_id: supplier::Id,

    /// [`invoice::Description`] of a new [`Invoice`].
    pub description: Option<invoice::Description>,

    /// Total [`Amount`] a new [`Invoice`] charges.
    pub total_amount: Amount,

    /// [`DateTime`] when a new [`Invoice`] was issued.
    pub invoice_date: invoice::IssueDateTime,

    /// [`DateTime`] when a new [`Invoice`] is due.
    pub due_date: Option<invoice::DueDateTime>,
}

impl<Db> Command<CreateInvoice> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Supplier>, supplier::Id>>,
            Ok = Option<Supplier>,
            Err = Traced<database::Error>,
        > + for<'l> Database<
            Select<By<Option<Invoice>, &'l invoice::Number>>,
            Ok = Option<Invoice>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<Insert<Invoice>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Invoice;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateInvoice,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateInvoice {
            number,
            supplier_id,
            description,
            total_amount,
            invoice_date,
            due_date,
        } = cmd;

        self.database()
            .execute(Select(By::<Option<Supplier>, _>::new(supplier_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::SupplierNotExists(supplier_id))
            .map_err(tracerr::wrap!())
            .map(drop)?;

        let existing = self
            .database()
            .execute(Select(By::new(&number)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if existing.is_some() {
            return Err(tracerr::new!(E::NumberTaken(number)));
        }

        let invoice = Invoice {
            id: invoice::Id::new(),
            number,
            supplier_id,
            description,
            total_amount,
            paid_amount: Amount::ZERO,
            payment_status: invoice::PaymentStatus::Pending,
            invoice_date,
            due_date,
            created_at: DateTime::now().coerce(),
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Insert(invoice.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(invoice)
    }
}

/// Error of [`CreateInvoice`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`invoice::Number`] is already registered.
    #[display("`Invoice` with `{_0}` number already exists")]
    NumberTaken(#[error(not(source))] invoice::Number),

    /// [`Supplier`] with the provided ID does not exist.
    #[display("`Supplier(id: {_0})` does not exist")]
    SupplierNotExists(#[error(not(source))] supplier::Id),
}

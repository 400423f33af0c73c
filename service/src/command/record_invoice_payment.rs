//! [`Command`] for recording a new [`Payment`] against an [`Invoice`].

use common::{
    operations::{By, Commit, Insert, Lock, Select, Transact, Transacted, Update},
    Amount, DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        invoice::{self, Payment},
        Invoice,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for recording a new [`Payment`] against an [`Invoice`].
///
/// The [`Invoice`]'s running total and derived payment status are updated
/// in the same transaction.
#[derive(Clone, Debug)]
pub struct RecordInvoicePayment {
    /// ID of the [`Invoice`] the [`Payment`] is made against.
    pub invoice_id: invoice::Id,

    /// Paid [`Amount`] of money.
    pub amount: Amount,

    /// [`DateTime`] when a new [`Payment`] was made.
    pub payment_date: invoice::payment::ReceiptDateTime,

    /// [`invoice::payment::Method`] a new [`Payment`] was made with.
    pub method: Option<invoice::payment::Method>,

    /// External [`invoice::payment::Reference`] of a new [`Payment`].
    pub reference: Option<invoice::payment::Reference>,

    /// [`invoice::payment::Notes`] attached to a new [`Payment`].
    pub notes: Option<invoice::payment::Notes>,
}

impl<Db> Command<RecordInvoicePayment> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Invoice>, invoice::Id>>,
            Ok = Option<Invoice>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<
            Lock<By<Invoice, invoice::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Invoice>, invoice::Id>>,
            Ok = Option<Invoice>,
            Err = Traced<database::Error>,
        > + Database<Insert<Payment>, Err = Traced<database::Error>>
        + Database<Update<Invoice>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Payment;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: RecordInvoicePayment,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RecordInvoicePayment {
            invoice_id,
            amount,
            payment_date,
            method,
            reference,
            notes,
        } = cmd;

        self.database()
            .execute(Select(By::<Option<Invoice>, _>::new(invoice_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::InvoiceNotExists(invoice_id))
            .map_err(tracerr::wrap!())
            .map(drop)?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent mutations of the same `Invoice` running total.
        tx.execute(Lock(By::new(invoice_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut invoice = tx
            .execute(Select(By::<Option<Invoice>, _>::new(invoice_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::InvoiceNotExists(invoice_id))
            .map_err(tracerr::wrap!())?;

        let payment = Payment {
            id: invoice::payment::Id::new(),
            invoice_id,
            amount,
            payment_date,
            method,
            reference,
            notes,
            created_at: DateTime::now().coerce(),
        };

        tx.execute(Insert(payment.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        invoice.apply_payment(amount);

        tx.execute(Update(invoice))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(payment)
    }
}

/// Error of [`RecordInvoicePayment`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Invoice`] with the provided ID does not exist.
    #[display("`Invoice(id: {_0})` does not exist")]
    InvoiceNotExists(#[error(not(source))] invoice::Id),
}

//! [`Command`] for marking a batch of [`Invoice`]s as paid.

use common::{
    operations::{By, Commit, Insert, Lock, Select, Transact, Transacted, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        invoice::{self, Payment, PaymentStatus},
        Invoice,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for marking a batch of [`Invoice`]s as paid in one
/// reconciliation.
///
/// For every [`Invoice`] not yet fully paid, a [`Payment`] settling the
/// outstanding remainder is synthesized for audit purposes. The whole batch
/// executes in a single transaction: an unknown [`Invoice`] ID aborts it
/// entirely, leaving no partial state behind.
#[derive(Clone, Debug)]
pub struct BatchPayInvoices {
    /// IDs of the [`Invoice`]s to be marked as paid.
    pub invoice_ids: Vec<invoice::Id>,

    /// [`DateTime`] the synthesized [`Payment`]s are made at.
    pub paid_at: invoice::payment::ReceiptDateTime,
}

impl<Db> Command<BatchPayInvoices> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
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
    type Ok = Vec<Invoice>;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: BatchPayInvoices,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let BatchPayInvoices {
            invoice_ids,
            paid_at,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut reconciled = Vec::with_capacity(invoice_ids.len());
        let mut skipped = 0;
        for invoice_id in invoice_ids {
            // Avoid concurrent mutations of the same `Invoice` running
            // total.
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

            if invoice.payment_status == PaymentStatus::Paid {
                skipped += 1;
                continue;
            }

            let payment = Payment {
                id: invoice::payment::Id::new(),
                invoice_id,
                amount: invoice.outstanding(),
                payment_date: paid_at,
                method: Some(invoice::payment::Method::batch_reconciliation()),
                reference: None,
                notes: Some(invoice::payment::Notes::auto_reconciled()),
                created_at: DateTime::now().coerce(),
            };

            tx.execute(Insert(payment))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;

            invoice.mark_paid();

            tx.execute(Update(invoice.clone()))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
            reconciled.push(invoice);
        }

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tracing::info!(
            paid = reconciled.len(),
            skipped,
            "reconciled `Invoice`s in batch",
        );

        Ok(reconciled)
    }
}

/// Error of [`BatchPayInvoices`] [`Command`] execution.
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

//! [`Invoice`]-related [`Database`] implementations.

use common::operations::{By, Delete, Insert, Lock, Select, Update};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{
        invoice::{self, Payment},
        Invoice,
    },
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

/// Columns of the `invoices` table, in the [`decode()`] order.
const COLUMNS: &str = "\
    id, number, supplier_id, description, \
    total_amount, paid_amount, payment_status, \
    invoice_date, due_date, created_at";

/// Decodes an [`Invoice`] out of the provided [`Row`].
fn decode(row: &Row) -> Invoice {
    Invoice {
        id: row.get("id"),
        number: row.get("number"),
        supplier_id: row.get("supplier_id"),
        description: row.get("description"),
        total_amount: row.get("total_amount"),
        paid_amount: row.get("paid_amount"),
        payment_status: row.get("payment_status"),
        invoice_date: row.get("invoice_date"),
        due_date: row.get("due_date"),
        created_at: row.get("created_at"),
    }
}

impl<C> Database<Select<By<Option<Invoice>, invoice::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Invoice>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Invoice>, invoice::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: invoice::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM invoices \
             WHERE id = $1::UUID \
             LIMIT 1",
        );
        self.query_opt(&sql, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.as_ref().map(decode))
    }
}

impl<'n, C> Database<Select<By<Option<Invoice>, &'n invoice::Number>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Invoice>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Invoice>, &'n invoice::Number>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let number: &invoice::Number = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM invoices \
             WHERE number = $1::VARCHAR \
             LIMIT 1",
        );
        self.query_opt(&sql, &[number])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.as_ref().map(decode))
    }
}

impl<C> Database<Insert<Invoice>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Invoice>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(invoice): Insert<Invoice>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(invoice))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Invoice>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(invoice): Update<Invoice>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            INSERT INTO invoices (\
                id, number, supplier_id, description, \
                total_amount, paid_amount, payment_status, \
                invoice_date, due_date, created_at\
            ) VALUES (\
                $1::UUID, $2::VARCHAR, $3::UUID, $4::VARCHAR, \
                $5::NUMERIC, $6::NUMERIC, $7::INT2, \
                $8::TIMESTAMPTZ, $9::TIMESTAMPTZ, $10::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET number = EXCLUDED.number, \
                supplier_id = EXCLUDED.supplier_id, \
                description = EXCLUDED.description, \
                total_amount = EXCLUDED.total_amount, \
                paid_amount = EXCLUDED.paid_amount, \
                payment_status = EXCLUDED.payment_status, \
                invoice_date = EXCLUDED.invoice_date, \
                due_date = EXCLUDED.due_date, \
                created_at = EXCLUDED.created_at";
        self.exec(
            SQL,
            &[
                &invoice.id,
                &invoice.number,
                &invoice.supplier_id,
                &invoice.description,
                &invoice.total_amount,
                &invoice.paid_amount,
                &invoice.payment_status,
                &invoice.invoice_date,
                &invoice.due_date,
                &invoice.created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Lock<By<Invoice, invoice::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Invoice, invoice::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: invoice::Id = by.into_inner();

        const SQL: &str = "\
            INSERT INTO invoices_lock \
            VALUES ($1::UUID) \
            ON CONFLICT (id) DO NOTHING";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

/// Columns of the `invoice_payments` table, in the [`decode_payment()`]
/// order.
const PAYMENT_COLUMNS: &str = "\
    id, invoice_id, amount, payment_date, \
    method, reference, notes, created_at";

/// Decodes a [`Payment`] out of the provided [`Row`].
fn decode_payment(row: &Row) -> Payment {
    Payment {
        id: row.get("id"),
        invoice_id: row.get("invoice_id"),
        amount: row.get("amount"),
        payment_date: row.get("payment_date"),
        method: row.get("method"),
        reference: row.get("reference"),
        notes: row.get("notes"),
        created_at: row.get("created_at"),
    }
}

impl<C> Database<Select<By<Option<Payment>, invoice::payment::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Payment>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Payment>, invoice::payment::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: invoice::payment::Id = by.into_inner();

        let sql = format!(
            "SELECT {PAYMENT_COLUMNS} \
             FROM invoice_payments \
             WHERE id = $1::UUID \
             LIMIT 1",
        );
        self.query_opt(&sql, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.as_ref().map(decode_payment))
    }
}

impl<C> Database<Select<By<Vec<Payment>, invoice::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Payment>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Payment>, invoice::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let invoice_id: invoice::Id = by.into_inner();

        let sql = format!(
            "SELECT {PAYMENT_COLUMNS} \
             FROM invoice_payments \
             WHERE invoice_id = $1::UUID \
             ORDER BY payment_date DESC",
        );
        self.query(&sql, &[&invoice_id])
            .await
            .map_err(tracerr::wrap!())
            .map(|rows| rows.iter().map(decode_payment).collect())
    }
}

impl<C> Database<Insert<Payment>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(payment): Insert<Payment>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            INSERT INTO invoice_payments (\
                id, invoice_id, amount, payment_date, \
                method, reference, notes, created_at\
            ) VALUES (\
                $1::UUID, $2::UUID, $3::NUMERIC, $4::TIMESTAMPTZ, \
                $5::VARCHAR, $6::VARCHAR, $7::VARCHAR, $8::TIMESTAMPTZ\
            )";
        self.exec(
            SQL,
            &[
                &payment.id,
                &payment.invoice_id,
                &payment.amount,
                &payment.payment_date,
                &payment.method,
                &payment.reference,
                &payment.notes,
                &payment.created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Delete<By<Payment, invoice::payment::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = bool;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Payment, invoice::payment::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: invoice::payment::Id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM invoice_payments \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(|affected| affected > 0)
    }
}

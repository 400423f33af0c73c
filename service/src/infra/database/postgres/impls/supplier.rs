//! [`Supplier`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select, Update};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{supplier, Supplier},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

/// Columns of the `suppliers` table, in the [`decode()`] order.
const COLUMNS: &str = "\
    id, name, contact_name, phone, email, \
    address, notes, is_active, created_at";

/// Decodes a [`Supplier`] out of the provided [`Row`].
fn decode(row: &Row) -> Supplier {
    Supplier {
        id: row.get("id"),
        name: row.get("name"),
        contact_name: row.get("contact_name"),
        phone: row.get("phone"),
        email: row.get("email"),
        address: row.get("address"),
        notes: row.get("notes"),
        is_active: row.get("is_active"),
        created_at: row.get("created_at"),
    }
}

impl<C> Database<Select<By<Option<Supplier>, supplier::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Supplier>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Supplier>, supplier::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: supplier::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM suppliers \
             WHERE id = $1::UUID \
             LIMIT 1",
        );
        self.query_opt(&sql, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.as_ref().map(decode))
    }
}

impl<C> Database<Insert<Supplier>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Supplier>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(supplier): Insert<Supplier>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(supplier))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Supplier>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(supplier): Update<Supplier>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            INSERT INTO suppliers (\
                id, name, contact_name, phone, email, \
                address, notes, is_active, created_at\
            ) VALUES (\
                $1::UUID, $2::VARCHAR, $3::VARCHAR, $4::VARCHAR, \
                $5::VARCHAR, $6::VARCHAR, $7::VARCHAR, $8::BOOLEAN, \
                $9::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET name = EXCLUDED.name, \
                contact_name = EXCLUDED.contact_name, \
                phone = EXCLUDED.phone, \
                email = EXCLUDED.email, \
                address = EXCLUDED.address, \
                notes = EXCLUDED.notes, \
                is_active = EXCLUDED.is_active, \
                created_at = EXCLUDED.created_at";
        self.exec(
            SQL,
            &[
                &supplier.id,
                &supplier.name,
                &supplier.contact_name,
                &supplier.phone,
                &supplier.email,
                &supplier.address,
                &supplier.notes,
                &supplier.is_active,
                &supplier.created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

//! [`Advance`]-related [`Database`] implementations.

use common::operations::{By, Delete, Insert, Select};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{advance, job, Advance},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

/// Columns of the `advances` table, in the [`decode()`] order.
const COLUMNS: &str = "\
    id, job_id, amount, description, advance_date, created_at";

/// Decodes an [`Advance`] out of the provided [`Row`].
fn decode(row: &Row) -> Advance {
    Advance {
        id: row.get("id"),
        job_id: row.get("job_id"),
        amount: row.get("amount"),
        description: row.get("description"),
        advance_date: row.get("advance_date"),
        created_at: row.get("created_at"),
    }
}

impl<C> Database<Select<By<Option<Advance>, advance::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Advance>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Advance>, advance::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: advance::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM advances \
             WHERE id = $1::UUID \
             LIMIT 1",
        );
        self.query_opt(&sql, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.as_ref().map(decode))
    }
}

impl<C> Database<Select<By<Vec<Advance>, job::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Advance>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Advance>, job::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let job_id: job::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM advances \
             WHERE job_id = $1::UUID \
             ORDER BY advance_date DESC",
        );
        self.query(&sql, &[&job_id])
            .await
            .map_err(tracerr::wrap!())
            .map(|rows| rows.iter().map(decode).collect())
    }
}

impl<C> Database<Insert<Advance>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(advance): Insert<Advance>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            INSERT INTO advances (\
                id, job_id, amount, description, advance_date, created_at\
            ) VALUES (\
                $1::UUID, $2::UUID, $3::NUMERIC, $4::VARCHAR, \
                $5::TIMESTAMPTZ, $6::TIMESTAMPTZ\
            )";
        self.exec(
            SQL,
            &[
                &advance.id,
                &advance.job_id,
                &advance.amount,
                &advance.description,
                &advance.advance_date,
                &advance.created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Delete<By<Advance, advance::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = bool;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Advance, advance::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: advance::Id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM advances \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(|affected| affected > 0)
    }
}

//! [`Vacation`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select, Update};
use itertools::Itertools as _;
use postgres_types::ToSql;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{vacation, worker, Vacation},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

/// Columns of the `vacations` table, in the [`decode()`] order.
const COLUMNS: &str = "\
    id, worker_id, \
    start_date, end_date, total_days, \
    status, notes, created_at";

/// Decodes a [`Vacation`] out of the provided [`Row`].
fn decode(row: &Row) -> Vacation {
    Vacation {
        id: row.get("id"),
        worker_id: row.get("worker_id"),
        start_date: row.get("start_date"),
        end_date: row.get("end_date"),
        total_days: row.get("total_days"),
        status: row.get("status"),
        notes: row.get("notes"),
        created_at: row.get("created_at"),
    }
}

impl<C> Database<Select<By<Option<Vacation>, vacation::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Vacation>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Vacation>, vacation::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: vacation::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM vacations \
             WHERE id = $1::UUID \
             LIMIT 1",
        );
        self.query_opt(&sql, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.as_ref().map(decode))
    }
}

impl<C> Database<Select<By<Vec<Vacation>, worker::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Vacation>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Vacation>, worker::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let worker_id = by.into_inner();
        select_by_worker(self, worker_id, None)
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Select<By<Vec<Vacation>, (worker::Id, vacation::Status)>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Vacation>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Vacation>, (worker::Id, vacation::Status)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (worker_id, status) = by.into_inner();
        select_by_worker(self, worker_id, Some(status))
            .await
            .map_err(tracerr::wrap!())
    }
}

/// Selects [`Vacation`]s of a [`Worker`], optionally filtered by a
/// [`vacation::Status`].
///
/// [`Worker`]: crate::domain::Worker
async fn select_by_worker<C: Connection>(
    db: &Postgres<C>,
    worker_id: worker::Id,
    status: Option<vacation::Status>,
) -> Result<Vec<Vacation>, Traced<database::Error>> {
    let mut ps: Vec<&(dyn ToSql + Sync)> = vec![&worker_id];

    let status_idx = status.as_ref().map(|s| {
        ps.push(s);
        ps.len()
    });

    let sql = format!(
        "SELECT {COLUMNS} \
         FROM vacations \
         WHERE worker_id = $1::UUID \
               {status_filtering} \
         ORDER BY start_date DESC",
        status_filtering = status_idx.into_iter().format_with("", |idx, f| {
            f(&format_args!("AND status = ${idx}::INT2"))
        }),
    );
    db.query(&sql, ps.as_slice())
        .await
        .map_err(tracerr::wrap!())
        .map(|rows| rows.iter().map(decode).collect())
}

impl<C> Database<Insert<Vacation>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Vacation>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(vacation): Insert<Vacation>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(vacation))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Vacation>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(vacation): Update<Vacation>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            INSERT INTO vacations (\
                id, worker_id, \
                start_date, end_date, total_days, \
                status, notes, created_at\
            ) VALUES (\
                $1::UUID, $2::UUID, \
                $3::TIMESTAMPTZ, $4::TIMESTAMPTZ, $5::INT4, \
                $6::INT2, $7::VARCHAR, $8::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET worker_id = EXCLUDED.worker_id, \
                start_date = EXCLUDED.start_date, \
                end_date = EXCLUDED.end_date, \
                total_days = EXCLUDED.total_days, \
                status = EXCLUDED.status, \
                notes = EXCLUDED.notes, \
                created_at = EXCLUDED.created_at";
        self.exec(
            SQL,
            &[
                &vacation.id,
                &vacation.worker_id,
                &vacation.start_date,
                &vacation.end_date,
                &vacation.total_days,
                &vacation.status,
                &vacation.notes,
                &vacation.created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

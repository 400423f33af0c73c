//! [`SalaryAdvance`]-related [`Database`] implementations.

use common::operations::{By, Delete, Insert, Select};
use itertools::Itertools as _;
use postgres_types::ToSql;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{
        salary_advance::{self, Period},
        worker, SalaryAdvance,
    },
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

/// Columns of the `salary_advances` table, in the [`decode()`] order.
const COLUMNS: &str = "\
    id, worker_id, amount, advance_date, \
    period_start, period_end, notes, created_at";

/// Decodes a [`SalaryAdvance`] out of the provided [`Row`].
fn decode(row: &Row) -> SalaryAdvance {
    SalaryAdvance {
        id: row.get("id"),
        worker_id: row.get("worker_id"),
        amount: row.get("amount"),
        advance_date: row.get("advance_date"),
        period: Period {
            start: row.get("period_start"),
            end: row.get("period_end"),
        },
        notes: row.get("notes"),
        created_at: row.get("created_at"),
    }
}

impl<C> Database<Select<By<Option<SalaryAdvance>, salary_advance::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<SalaryAdvance>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<SalaryAdvance>, salary_advance::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: salary_advance::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM salary_advances \
             WHERE id = $1::UUID \
             LIMIT 1",
        );
        self.query_opt(&sql, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.as_ref().map(decode))
    }
}

impl<C> Database<Select<By<Vec<SalaryAdvance>, worker::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<SalaryAdvance>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<SalaryAdvance>, worker::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let worker_id = by.into_inner();
        select_by_worker(self, worker_id, None)
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Select<By<Vec<SalaryAdvance>, (worker::Id, Period)>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<SalaryAdvance>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<SalaryAdvance>, (worker::Id, Period)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (worker_id, period) = by.into_inner();
        select_by_worker(self, worker_id, Some(&period))
            .await
            .map_err(tracerr::wrap!())
    }
}

/// Selects [`SalaryAdvance`]s of a [`Worker`], optionally narrowed to the
/// ones whose payment window overlaps the provided [`Period`].
///
/// [`Worker`]: crate::domain::Worker
async fn select_by_worker<C: Connection>(
    db: &Postgres<C>,
    worker_id: worker::Id,
    period: Option<&Period>,
) -> Result<Vec<SalaryAdvance>, Traced<database::Error>> {
    let mut ps: Vec<&(dyn ToSql + Sync)> = vec![&worker_id];

    let period_idx = period.map(|p| {
        ps.push(&p.start);
        ps.push(&p.end);
        (ps.len() - 1, ps.len())
    });

    let sql = format!(
        "SELECT {COLUMNS} \
         FROM salary_advances \
         WHERE worker_id = $1::UUID \
               {period_filtering} \
         ORDER BY advance_date DESC",
        period_filtering =
            period_idx.into_iter().format_with("", |(start, end), f| {
                f(&format_args!(
                    "AND period_start <= ${end}::TIMESTAMPTZ \
                     AND period_end >= ${start}::TIMESTAMPTZ"
                ))
            }),
    );
    db.query(&sql, ps.as_slice())
        .await
        .map_err(tracerr::wrap!())
        .map(|rows| rows.iter().map(decode).collect())
}

impl<C> Database<Insert<SalaryAdvance>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(advance): Insert<SalaryAdvance>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            INSERT INTO salary_advances (\
                id, worker_id, amount, advance_date, \
                period_start, period_end, notes, created_at\
            ) VALUES (\
                $1::UUID, $2::UUID, $3::NUMERIC, $4::TIMESTAMPTZ, \
                $5::TIMESTAMPTZ, $6::TIMESTAMPTZ, $7::VARCHAR, \
                $8::TIMESTAMPTZ\
            )";
        self.exec(
            SQL,
            &[
                &advance.id,
                &advance.worker_id,
                &advance.amount,
                &advance.advance_date,
                &advance.period.start,
                &advance.period.end,
                &advance.notes,
                &advance.created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Delete<By<SalaryAdvance, salary_advance::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = bool;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<SalaryAdvance, salary_advance::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: salary_advance::Id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM salary_advances \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(|affected| affected > 0)
    }
}

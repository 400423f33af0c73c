//! [`Job`]-related [`Database`] implementations.

use common::operations::{By, Insert, Lock, Select, Update};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{job, Job},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

/// Columns of the `jobs` table, in the [`decode()`] order.
const COLUMNS: &str = "\
    id, vehicle_id, worker_id, description, \
    total_amount, advance_amount, status, \
    start_date, end_date, created_at";

/// Decodes a [`Job`] out of the provided [`Row`].
fn decode(row: &Row) -> Job {
    Job {
        id: row.get("id"),
        vehicle_id: row.get("vehicle_id"),
        worker_id: row.get("worker_id"),
        description: row.get("description"),
        total_amount: row.get("total_amount"),
        advance_amount: row.get("advance_amount"),
        status: row.get("status"),
        start_date: row.get("start_date"),
        end_date: row.get("end_date"),
        created_at: row.get("created_at"),
    }
}

impl<C> Database<Select<By<Option<Job>, job::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Job>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Job>, job::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: job::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM jobs \
             WHERE id = $1::UUID \
             LIMIT 1",
        );
        self.query_opt(&sql, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.as_ref().map(decode))
    }
}

impl<C> Database<Insert<Job>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Job>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(job): Insert<Job>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(job)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Job>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(job): Update<Job>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            INSERT INTO jobs (\
                id, vehicle_id, worker_id, description, \
                total_amount, advance_amount, status, \
                start_date, end_date, created_at\
            ) VALUES (\
                $1::UUID, $2::UUID, $3::UUID, $4::VARCHAR, \
                $5::NUMERIC, $6::NUMERIC, $7::INT2, \
                $8::TIMESTAMPTZ, $9::TIMESTAMPTZ, $10::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET vehicle_id = EXCLUDED.vehicle_id, \
                worker_id = EXCLUDED.worker_id, \
                description = EXCLUDED.description, \
                total_amount = EXCLUDED.total_amount, \
                advance_amount = EXCLUDED.advance_amount, \
                status = EXCLUDED.status, \
                start_date = EXCLUDED.start_date, \
                end_date = EXCLUDED.end_date, \
                created_at = EXCLUDED.created_at";
        self.exec(
            SQL,
            &[
                &job.id,
                &job.vehicle_id,
                &job.worker_id,
                &job.description,
                &job.total_amount,
                &job.advance_amount,
                &job.status,
                &job.start_date,
                &job.end_date,
                &job.created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Lock<By<Job, job::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Job, job::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: job::Id = by.into_inner();

        const SQL: &str = "\
            INSERT INTO jobs_lock \
            VALUES ($1::UUID) \
            ON CONFLICT (id) DO NOTHING";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

//! [`Worker`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::operations::{By, Insert, Select, Update};
use tracerr::Traced;

use crate::{
    domain::{worker, Worker},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

impl<C, IDs> Database<Select<By<HashMap<worker::Id, Worker>, IDs>>>
    for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[worker::Id]>,
{
    type Ok = HashMap<worker::Id, Worker>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<worker::Id, Worker>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        // Avoid subtle change for SQL.
        let ids: &[worker::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let limit = i32::try_from(ids.len()).unwrap();

        const SQL: &str = "\
            SELECT id, first_name, last_name, \
                   document_number, phone, email, \
                   hire_date, base_salary, payment_frequency, \
                   kind, is_active, created_at \
            FROM workers \
            WHERE id IN (SELECT unnest($1::UUID[]) LIMIT $2::INT4) \
            LIMIT $2::INT4";
        Ok(self
            .query(SQL, &[&ids, &limit])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| {
                let id = row.get("id");
                (
                    id,
                    Worker {
                        id,
                        first_name: row.get("first_name"),
                        last_name: row.get("last_name"),
                        document_number: row.get("document_number"),
                        phone: row.get("phone"),
                        email: row.get("email"),
                        hire_date: row.get("hire_date"),
                        base_salary: row.get("base_salary"),
                        payment_frequency: row.get("payment_frequency"),
                        kind: row.get("kind"),
                        is_active: row.get("is_active"),
                        created_at: row.get("created_at"),
                    },
                )
            })
            .collect())
    }
}

impl<C> Database<Select<By<Option<Worker>, worker::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<worker::Id, Worker>, [worker::Id; 1]>>,
        Ok = HashMap<worker::Id, Worker>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Worker>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Worker>, worker::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::new([id])))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}

impl<C> Database<Insert<Worker>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Worker>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(worker): Insert<Worker>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(worker)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Worker>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(worker): Update<Worker>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            INSERT INTO workers (\
                id, first_name, last_name, \
                document_number, phone, email, \
                hire_date, base_salary, payment_frequency, \
                kind, is_active, created_at\
            ) VALUES (\
                $1::UUID, $2::VARCHAR, $3::VARCHAR, \
                $4::VARCHAR, $5::VARCHAR, $6::VARCHAR, \
                $7::TIMESTAMPTZ, $8::NUMERIC, $9::INT2, \
                $10::INT2, $11::BOOLEAN, $12::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET first_name = EXCLUDED.first_name, \
                last_name = EXCLUDED.last_name, \
                document_number = EXCLUDED.document_number, \
                phone = EXCLUDED.phone, \
                email = EXCLUDED.email, \
                hire_date = EXCLUDED.hire_date, \
                base_salary = EXCLUDED.base_salary, \
                payment_frequency = EXCLUDED.payment_frequency, \
                kind = EXCLUDED.kind, \
                is_active = EXCLUDED.is_active, \
                created_at = EXCLUDED.created_at";
        self.exec(
            SQL,
            &[
                &worker.id,
                &worker.first_name,
                &worker.last_name,
                &worker.document_number,
                &worker.phone,
                &worker.email,
                &worker.hire_date,
                &worker.base_salary,
                &worker.payment_frequency,
                &worker.kind,
                &worker.is_active,
                &worker.created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

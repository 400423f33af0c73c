//! [`Vehicle`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select, Update};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{vehicle, Vehicle},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

/// Columns of the `vehicles` table, in the [`decode()`] order.
const COLUMNS: &str = "\
    id, license_plate, brand, model, year, \
    owner_name, owner_phone, created_at";

/// Decodes a [`Vehicle`] out of the provided [`Row`].
fn decode(row: &Row) -> Vehicle {
    Vehicle {
        id: row.get("id"),
        license_plate: row.get("license_plate"),
        brand: row.get("brand"),
        model: row.get("model"),
        year: row.get("year"),
        owner_name: row.get("owner_name"),
        owner_phone: row.get("owner_phone"),
        created_at: row.get("created_at"),
    }
}

impl<C> Database<Select<By<Option<Vehicle>, vehicle::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Vehicle>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Vehicle>, vehicle::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: vehicle::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM vehicles \
             WHERE id = $1::UUID \
             LIMIT 1",
        );
        self.query_opt(&sql, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.as_ref().map(decode))
    }
}

impl<'p, C> Database<Select<By<Option<Vehicle>, &'p vehicle::LicensePlate>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Vehicle>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Vehicle>, &'p vehicle::LicensePlate>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let plate: &vehicle::LicensePlate = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM vehicles \
             WHERE license_plate = $1::VARCHAR \
             LIMIT 1",
        );
        self.query_opt(&sql, &[plate])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.as_ref().map(decode))
    }
}

impl<C> Database<Insert<Vehicle>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Vehicle>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(vehicle): Insert<Vehicle>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(vehicle))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Vehicle>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(vehicle): Update<Vehicle>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            INSERT INTO vehicles (\
                id, license_plate, brand, model, year, \
                owner_name, owner_phone, created_at\
            ) VALUES (\
                $1::UUID, $2::VARCHAR, $3::VARCHAR, $4::VARCHAR, $5::INT4, \
                $6::VARCHAR, $7::VARCHAR, $8::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET license_plate = EXCLUDED.license_plate, \
                brand = EXCLUDED.brand, \
                model = EXCLUDED.model, \
                year = EXCLUDED.year, \
                owner_name = EXCLUDED.owner_name, \
                owner_phone = EXCLUDED.owner_phone, \
                created_at = EXCLUDED.created_at";
        self.exec(
            SQL,
            &[
                &vehicle.id,
                &vehicle.license_plate,
                &vehicle.brand,
                &vehicle.model,
                &vehicle.year,
                &vehicle.owner_name,
                &vehicle.owner_phone,
                &vehicle.created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

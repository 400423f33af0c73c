//! [`Command`] for creating a new [`Vehicle`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{contact, vehicle, Vehicle},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Vehicle`].
#[derive(Clone, Debug)]
pub struct CreateVehicle {
    /// [`vehicle::LicensePlate`] of a new [`Vehicle`].
    pub license_plate: vehicle::LicensePlate,

    /// Brand of a new [`Vehicle`].
    pub brand: Option<vehicle::Brand>,

    /// Model of a new [`Vehicle`].
    pub model: Option<vehicle::Model>,

    /// Manufacturing [`vehicle::Year`] of a new [`Vehicle`].
    pub year: Option<vehicle::Year>,

    /// Name of a new [`Vehicle`]'s owner.
    pub owner_name: Option<vehicle::OwnerName>,

    /// [`contact::Phone`] of a new [`Vehicle`]'s owner.
    pub owner_phone: Option<contact::Phone>,
}

impl<Db> Command<CreateVehicle> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + for<'l> Database<
            Select<By<Option<Vehicle>, &'l vehicle::LicensePlate>>,
            Ok = Option<Vehicle>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<Insert<Vehicle>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Vehicle;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateVehicle,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateVehicle {
            license_plate,
            brand,
            model,
            year,
            owner_name,
            owner_phone,
        } = cmd;

        let existing = self
            .database()
            .execute(Select(By::new(&license_plate)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if existing.is_some() {
            return Err(tracerr::new!(E::LicensePlateTaken(license_plate)));
        }

        let vehicle = Vehicle {
            id: vehicle::Id::new(),
            license_plate,
            brand,
            model,
            year,
            owner_name,
            owner_phone,
            created_at: DateTime::now().coerce(),
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Insert(vehicle.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(vehicle)
    }
}

/// Error of [`CreateVehicle`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`vehicle::LicensePlate`] is already registered.
    #[display("`Vehicle` with `{_0}` license plate already exists")]
    LicensePlateTaken(#[error(not(source))] vehicle::LicensePlate),
}

//! [`Command`] for creating a new [`Supplier`].

use common::{
    operations::{Commit, Insert, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{contact, supplier, Supplier},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Supplier`].
#[derive(Clone, Debug)]
pub struct CreateSupplier {
    /// [`supplier::Name`] of a new [`Supplier`].
    pub name: supplier::Name,

    /// Name of the contact person at a new [`Supplier`].
    pub contact_name: Option<supplier::Name>,

    /// [`contact::Phone`] of a new [`Supplier`].
    pub phone: Option<contact::Phone>,

    /// [`contact::Email`] of a new [`Supplier`].
    pub email: Option<contact::Email>,

    /// [`supplier::Address`] of a new [`Supplier`].
    pub address: Option<supplier::Address>,

    /// [`supplier::Notes`] attached to a new [`Supplier`].
    pub notes: Option<supplier::Notes>,
}

impl<Db> Command<CreateSupplier> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Insert<Supplier>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Supplier;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateSupplier,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateSupplier {
            name,
            contact_name,
            phone,
            email,
            address,
            notes,
        } = cmd;

        let supplier = Supplier {
            id: supplier::Id::new(),
            name,
            contact_name,
            phone,
            email,
            address,
            notes,
            is_active: true,
            created_at: DateTime::now().coerce(),
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Insert(supplier.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(supplier)
    }
}

/// Error of [`CreateSupplier`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),
}

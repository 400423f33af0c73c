//! In-memory `Database` implementation with staged-commit transaction
//! semantics: a transaction works on a copy of the state, published into
//! the shared one only on `Commit`. Dropping an uncommitted transaction
//! discards everything it staged.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use common::operations::{
    By, Commit, Delete, Insert, Lock, Select, Transact, Update,
};
use service::{
    domain::{
        advance, invoice, job, salary_advance, supplier, vacation, vehicle,
        worker, Advance, Invoice, Job, SalaryAdvance, Supplier, Vacation,
        Vehicle, Worker,
    },
    infra::{database, Database},
};
use tracerr::Traced;

/// Whole state of the in-memory database.
#[derive(Clone, Debug, Default)]
pub struct State {
    pub workers: HashMap<worker::Id, Worker>,
    pub vacations: HashMap<vacation::Id, Vacation>,
    pub salary_advances: HashMap<salary_advance::Id, SalaryAdvance>,
    pub vehicles: HashMap<vehicle::Id, Vehicle>,
    pub suppliers: HashMap<supplier::Id, Supplier>,
    pub jobs: HashMap<job::Id, Job>,
    pub advances: HashMap<advance::Id, Advance>,
    pub invoices: HashMap<invoice::Id, Invoice>,
    pub payments: HashMap<invoice::payment::Id, invoice::Payment>,
}

/// In-memory `Database`.
#[derive(Clone, Debug, Default)]
pub struct InMemory {
    state: Arc<Mutex<State>>,
}

impl InMemory {
    /// Returns a copy of the current committed [`State`].
    pub fn snapshot(&self) -> State {
        self.state.lock().unwrap().clone()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }
}

/// Transaction of the [`InMemory`] database.
#[derive(Debug)]
pub struct InMemoryTx {
    base: Arc<Mutex<State>>,
    staged: Mutex<State>,
}

impl InMemoryTx {
    fn state(&self) -> MutexGuard<'_, State> {
        self.staged.lock().unwrap()
    }
}

impl Database<Transact> for InMemory {
    type Ok = InMemoryTx;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        let staged = self.state().clone();
        Ok(InMemoryTx {
            base: Arc::clone(&self.state),
            staged: Mutex::new(staged),
        })
    }
}

impl Database<Commit> for InMemoryTx {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        *self.base.lock().unwrap() = self.state().clone();
        Ok(())
    }
}

impl Database<Lock<By<Job, job::Id>>> for InMemoryTx {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Lock<By<Job, job::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(())
    }
}

impl Database<Lock<By<Invoice, invoice::Id>>> for InMemoryTx {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Lock<By<Invoice, invoice::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(())
    }
}

macro_rules! select_impl {
    ($db:ty, $w:ty, $b:ty, |$state:ident, $by:ident| $body:expr) => {
        impl Database<Select<By<$w, $b>>> for $db {
            type Ok = $w;
            type Err = Traced<database::Error>;

            async fn execute(
                &self,
                Select(by): Select<By<$w, $b>>,
            ) -> Result<Self::Ok, Self::Err> {
                let $by = by.into_inner();
                let $state = self.state();
                Ok($body)
            }
        }
    };
}

macro_rules! select_impl_both {
    ($w:ty, $b:ty, |$state:ident, $by:ident| $body:expr) => {
        select_impl!(InMemory, $w, $b, |$state, $by| $body);
        select_impl!(InMemoryTx, $w, $b, |$state, $by| $body);
    };
}

select_impl_both!(Option<Worker>, worker::Id, |s, id| s
    .workers
    .get(&id)
    .cloned());
select_impl_both!(Option<Vacation>, vacation::Id, |s, id| s
    .vacations
    .get(&id)
    .cloned());
select_impl_both!(Option<SalaryAdvance>, salary_advance::Id, |s, id| s
    .salary_advances
    .get(&id)
    .cloned());
select_impl_both!(Option<Vehicle>, vehicle::Id, |s, id| s
    .vehicles
    .get(&id)
    .cloned());
select_impl_both!(Option<Supplier>, supplier::Id, |s, id| s
    .suppliers
    .get(&id)
    .cloned());
select_impl_both!(Option<Job>, job::Id, |s, id| s.jobs.get(&id).cloned());
select_impl_both!(Option<Advance>, advance::Id, |s, id| s
    .advances
    .get(&id)
    .cloned());
select_impl_both!(Option<Invoice>, invoice::Id, |s, id| s
    .invoices
    .get(&id)
    .cloned());
select_impl_both!(Option<invoice::Payment>, invoice::payment::Id, |s, id| s
    .payments
    .get(&id)
    .cloned());
select_impl_both!(Vec<Vacation>, worker::Id, |s, id| s
    .vacations
    .values()
    .filter(|v| v.worker_id == id)
    .cloned()
    .collect());
select_impl_both!(
    Vec<Vacation>,
    (worker::Id, vacation::Status),
    |s, by| {
        let (id, status) = by;
        s.vacations
            .values()
            .filter(|v| v.worker_id == id && v.status == status)
            .cloned()
            .collect()
    }
);
select_impl_both!(Vec<SalaryAdvance>, worker::Id, |s, id| s
    .salary_advances
    .values()
    .filter(|a| a.worker_id == id)
    .cloned()
    .collect());
select_impl_both!(
    Vec<SalaryAdvance>,
    (worker::Id, salary_advance::Period),
    |s, by| {
        let (id, period) = by;
        s.salary_advances
            .values()
            .filter(|a| a.worker_id == id && a.period.overlaps(&period))
            .cloned()
            .collect()
    }
);
select_impl_both!(Vec<Advance>, job::Id, |s, id| s
    .advances
    .values()
    .filter(|a| a.job_id == id)
    .cloned()
    .collect());
select_impl_both!(Vec<invoice::Payment>, invoice::Id, |s, id| s
    .payments
    .values()
    .filter(|p| p.invoice_id == id)
    .cloned()
    .collect());

impl<'n> Database<Select<By<Option<Invoice>, &'n invoice::Number>>>
    for InMemory
{
    type Ok = Option<Invoice>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Invoice>, &'n invoice::Number>>,
    ) -> Result<Self::Ok, Self::Err> {
        let number = by.into_inner();
        Ok(self
            .state()
            .invoices
            .values()
            .find(|i| &i.number == number)
            .cloned())
    }
}

impl<'p> Database<Select<By<Option<Vehicle>, &'p vehicle::LicensePlate>>>
    for InMemory
{
    type Ok = Option<Vehicle>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Vehicle>, &'p vehicle::LicensePlate>>,
    ) -> Result<Self::Ok, Self::Err> {
        let plate = by.into_inner();
        Ok(self
            .state()
            .vehicles
            .values()
            .find(|v| &v.license_plate == plate)
            .cloned())
    }
}

macro_rules! upsert_impl {
    ($entity:ty, $field:ident) => {
        impl Database<Insert<$entity>> for InMemoryTx {
            type Ok = ();
            type Err = Traced<database::Error>;

            async fn execute(
                &self,
                Insert(e): Insert<$entity>,
            ) -> Result<Self::Ok, Self::Err> {
                drop(self.state().$field.insert(e.id, e));
                Ok(())
            }
        }

        impl Database<Update<$entity>> for InMemoryTx {
            type Ok = ();
            type Err = Traced<database::Error>;

            async fn execute(
                &self,
                Update(e): Update<$entity>,
            ) -> Result<Self::Ok, Self::Err> {
                drop(self.state().$field.insert(e.id, e));
                Ok(())
            }
        }
    };
}

upsert_impl!(Worker, workers);
upsert_impl!(Vacation, vacations);
upsert_impl!(SalaryAdvance, salary_advances);
upsert_impl!(Vehicle, vehicles);
upsert_impl!(Supplier, suppliers);
upsert_impl!(Job, jobs);
upsert_impl!(Advance, advances);
upsert_impl!(Invoice, invoices);
upsert_impl!(invoice::Payment, payments);

macro_rules! delete_impl {
    ($entity:ty, $field:ident, $id:ty) => {
        impl Database<Delete<By<$entity, $id>>> for InMemoryTx {
            type Ok = bool;
            type Err = Traced<database::Error>;

            async fn execute(
                &self,
                Delete(by): Delete<By<$entity, $id>>,
            ) -> Result<Self::Ok, Self::Err> {
                Ok(self.state().$field.remove(&by.into_inner()).is_some())
            }
        }
    };
}

delete_impl!(Advance, advances, advance::Id);
delete_impl!(invoice::Payment, payments, invoice::payment::Id);
delete_impl!(SalaryAdvance, salary_advances, salary_advance::Id);

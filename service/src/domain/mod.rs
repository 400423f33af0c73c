//! Domain definitions.

pub mod advance;
pub mod contact;
pub mod invoice;
pub mod job;
pub mod salary_advance;
pub mod supplier;
pub mod vacation;
pub mod vehicle;
pub mod worker;

pub use self::{
    advance::Advance, invoice::Invoice, job::Job,
    salary_advance::SalaryAdvance, supplier::Supplier, vacation::Vacation,
    vehicle::Vehicle, worker::Worker,
};

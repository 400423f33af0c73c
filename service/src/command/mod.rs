//! [`Command`] definition.

pub mod batch_pay_invoices;
pub mod create_invoice;
pub mod create_job;
pub mod create_supplier;
pub mod create_vehicle;
pub mod create_worker;
pub mod deactivate_worker;
pub mod delete_invoice_payment;
pub mod delete_job_advance;
pub mod grant_salary_advance;
pub mod record_invoice_payment;
pub mod record_job_advance;
pub mod request_vacation;
pub mod review_vacation;
pub mod revoke_salary_advance;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    batch_pay_invoices::BatchPayInvoices, create_invoice::CreateInvoice,
    create_job::CreateJob, create_supplier::CreateSupplier,
    create_vehicle::CreateVehicle, create_worker::CreateWorker,
    deactivate_worker::DeactivateWorker,
    delete_invoice_payment::DeleteInvoicePayment,
    delete_job_advance::DeleteJobAdvance,
    grant_salary_advance::GrantSalaryAdvance,
    record_invoice_payment::RecordInvoicePayment,
    record_job_advance::RecordJobAdvance, request_vacation::RequestVacation,
    review_vacation::ReviewVacation,
    revoke_salary_advance::RevokeSalaryAdvance,
};

//! End-to-end `Command` and `Query` execution against an in-memory
//! `Database` with staged-commit transaction semantics.

#[path = "commands/memory.rs"]
mod memory;

use common::{Amount, DateTime};
use rust_decimal::Decimal;
use service::{
    command::{
        batch_pay_invoices, grant_salary_advance, request_vacation,
        BatchPayInvoices, CreateInvoice, CreateJob, CreateSupplier,
        CreateVehicle, CreateWorker, DeactivateWorker, DeleteInvoicePayment,
        DeleteJobAdvance, GrantSalaryAdvance, RecordInvoicePayment,
        RecordJobAdvance, RequestVacation, ReviewVacation,
        RevokeSalaryAdvance,
    },
    domain::{
        advance, invoice, job, vacation, worker, Invoice, Job, Supplier,
        Vacation, Vehicle, Worker,
    },
    query::{self, AvailableAdvance, VacationBalance},
    read::vacation::Balance,
    Command as _, Service,
};

use self::memory::InMemory;

fn service() -> (Service<InMemory>, InMemory) {
    let db = InMemory::default();
    (Service::new(db.clone()), db)
}

fn date(year: i32, month: u8, day: u8) -> DateTime {
    DateTime::from_calendar_date(year, month, day).unwrap()
}

fn amount(s: &str) -> Amount {
    s.parse().unwrap()
}

async fn create_worker(
    svc: &Service<InMemory>,
    kind: worker::Kind,
    hire_date: Option<DateTime>,
    base_salary: Option<&str>,
) -> Worker {
    svc.execute(CreateWorker {
        first_name: "Ana".parse().unwrap(),
        last_name: "Reyes".parse().unwrap(),
        document_number: None,
        phone: None,
        email: None,
        hire_date: hire_date.map(DateTime::coerce),
        base_salary: base_salary.map(|s| s.parse().unwrap()),
        payment_frequency: None,
        kind,
    })
    .await
    .unwrap()
}

async fn create_job(svc: &Service<InMemory>, total: &str) -> Job {
    let vehicle: Vehicle = svc
        .execute(CreateVehicle {
            license_plate: "ABC-123".parse().unwrap(),
            brand: None,
            model: None,
            year: None,
            owner_name: None,
            owner_phone: None,
        })
        .await
        .unwrap();
    let mechanic =
        create_worker(svc, worker::Kind::Contract, None, None).await;

    svc.execute(CreateJob {
        vehicle_id: vehicle.id,
        worker_id: mechanic.id,
        description: "Brake service".parse().unwrap(),
        total_amount: amount(total),
        start_date: None,
        end_date: None,
    })
    .await
    .unwrap()
}

async fn create_invoice(
    svc: &Service<InMemory>,
    number: &str,
    total: &str,
) -> Invoice {
    let supplier: Supplier = svc
        .execute(CreateSupplier {
            name: "Parts & Co".parse().unwrap(),
            contact_name: None,
            phone: None,
            email: None,
            address: None,
            notes: None,
        })
        .await
        .unwrap();

    svc.execute(CreateInvoice {
        number: number.parse().unwrap(),
        supplier_id: supplier.id,
        description: None,
        total_amount: amount(total),
        invoice_date: date(2024, 1, 5).coerce(),
        due_date: None,
    })
    .await
    .unwrap()
}

async fn record_advance(
    svc: &Service<InMemory>,
    job_id: job::Id,
    amount_: &str,
) -> service::domain::Advance {
    svc.execute(RecordJobAdvance {
        job_id,
        amount: amount(amount_),
        description: None,
        advance_date: date(2024, 1, 10).coerce(),
    })
    .await
    .unwrap()
}

async fn record_payment(
    svc: &Service<InMemory>,
    invoice_id: invoice::Id,
    amount_: &str,
) -> invoice::Payment {
    svc.execute(RecordInvoicePayment {
        invoice_id,
        amount: amount(amount_),
        payment_date: date(2024, 1, 10).coerce(),
        method: None,
        reference: None,
        notes: None,
    })
    .await
    .unwrap()
}

#[tokio::test]
async fn recorded_advances_accumulate_and_complete_the_job() {
    let (svc, db) = service();
    let job = create_job(&svc, "500").await;

    drop(record_advance(&svc, job.id, "200").await);
    let stored = db.snapshot().jobs[&job.id].clone();
    assert_eq!(stored.advance_amount, amount("200"));
    assert_eq!(stored.status, job::Status::Pending);

    drop(record_advance(&svc, job.id, "300").await);
    let stored = db.snapshot().jobs[&job.id].clone();
    assert_eq!(stored.advance_amount, amount("500"));
    assert_eq!(stored.status, job::Status::Completed);
    assert_eq!(db.snapshot().advances.len(), 2);
}

#[tokio::test]
async fn deleting_an_advance_decrements_but_keeps_job_completed() {
    let (svc, db) = service();
    let job = create_job(&svc, "500").await;

    drop(record_advance(&svc, job.id, "200").await);
    let second = record_advance(&svc, job.id, "300").await;

    let deleted = svc
        .execute(DeleteJobAdvance {
            advance_id: second.id,
        })
        .await
        .unwrap();
    assert!(deleted);

    let stored = db.snapshot().jobs[&job.id].clone();
    assert_eq!(stored.advance_amount, amount("200"));
    assert_eq!(stored.status, job::Status::Completed);

    let deleted = svc
        .execute(DeleteJobAdvance {
            advance_id: advance::Id::new(),
        })
        .await
        .unwrap();
    assert!(!deleted);
}

#[tokio::test]
async fn invoice_payments_drive_the_derived_status() {
    let (svc, db) = service();
    let inv = create_invoice(&svc, "INV-001", "1000").await;

    drop(record_payment(&svc, inv.id, "400").await);
    let stored = db.snapshot().invoices[&inv.id].clone();
    assert_eq!(stored.paid_amount, amount("400"));
    assert_eq!(stored.payment_status, invoice::PaymentStatus::Partial);

    let second = record_payment(&svc, inv.id, "600").await;
    let stored = db.snapshot().invoices[&inv.id].clone();
    assert_eq!(stored.paid_amount, amount("1000"));
    assert_eq!(stored.payment_status, invoice::PaymentStatus::Paid);

    let deleted = svc
        .execute(DeleteInvoicePayment {
            payment_id: second.id,
        })
        .await
        .unwrap();
    assert!(deleted);
    let stored = db.snapshot().invoices[&inv.id].clone();
    assert_eq!(stored.paid_amount, amount("400"));
    assert_eq!(stored.payment_status, invoice::PaymentStatus::Partial);

    let deleted = svc
        .execute(DeleteInvoicePayment {
            payment_id: invoice::payment::Id::new(),
        })
        .await
        .unwrap();
    assert!(!deleted);
}

#[tokio::test]
async fn batch_pay_settles_outstanding_and_skips_paid_invoices() {
    let (svc, db) = service();
    let supplier: Supplier = svc
        .execute(CreateSupplier {
            name: "Parts & Co".parse().unwrap(),
            contact_name: None,
            phone: None,
            email: None,
            address: None,
            notes: None,
        })
        .await
        .unwrap();

    let mut invoices = Vec::new();
    for (number, total) in [("INV-001", "1000"), ("INV-002", "300")] {
        invoices.push(
            svc.execute(CreateInvoice {
                number: number.parse().unwrap(),
                supplier_id: supplier.id,
                description: None,
                total_amount: amount(total),
                invoice_date: date(2024, 1, 5).coerce(),
                due_date: None,
            })
            .await
            .unwrap(),
        );
    }
    // The first one is partially paid, the second one fully.
    drop(record_payment(&svc, invoices[0].id, "250").await);
    drop(record_payment(&svc, invoices[1].id, "300").await);

    let reconciled = svc
        .execute(BatchPayInvoices {
            invoice_ids: invoices.iter().map(|i| i.id).collect(),
            paid_at: date(2024, 2, 1).coerce(),
        })
        .await
        .unwrap();

    // The fully paid one is skipped.
    assert_eq!(reconciled.len(), 1);
    assert_eq!(reconciled[0].id, invoices[0].id);

    let state = db.snapshot();
    let first = state.invoices[&invoices[0].id].clone();
    assert_eq!(first.paid_amount, amount("1000"));
    assert_eq!(first.payment_status, invoice::PaymentStatus::Paid);

    let synthesized = state
        .payments
        .values()
        .find(|p| {
            p.invoice_id == invoices[0].id && p.amount == amount("750")
        })
        .expect("synthesized payment exists");
    assert_eq!(
        synthesized.method,
        Some(invoice::payment::Method::batch_reconciliation()),
    );
    assert!(synthesized.notes.is_some());

    // The skipped one keeps its single manual payment.
    assert_eq!(
        state
            .payments
            .values()
            .filter(|p| p.invoice_id == invoices[1].id)
            .count(),
        1,
    );
}

#[tokio::test]
async fn batch_pay_rolls_back_entirely_on_unknown_invoice() {
    let (svc, db) = service();
    let inv = create_invoice(&svc, "INV-001", "1000").await;

    let err = svc
        .execute(BatchPayInvoices {
            invoice_ids: vec![inv.id, invoice::Id::new()],
            paid_at: date(2024, 2, 1).coerce(),
        })
        .await
        .unwrap_err();
    let err: &batch_pay_invoices::ExecutionError = err.as_ref();
    assert!(matches!(
        err,
        batch_pay_invoices::ExecutionError::InvoiceNotExists(_),
    ));

    // The first invoice of the batch must stay untouched.
    let state = db.snapshot();
    let stored = state.invoices[&inv.id].clone();
    assert_eq!(stored.paid_amount, Amount::ZERO);
    assert_eq!(stored.payment_status, invoice::PaymentStatus::Pending);
    assert!(state.payments.is_empty());
}

#[tokio::test]
async fn vacation_requests_are_limited_by_the_accrued_balance() {
    let (svc, db) = service();
    let worker = create_worker(
        &svc,
        worker::Kind::Direct,
        Some(date(2023, 8, 4)),
        Some("1000"),
    )
    .await;
    let at = date(2024, 1, 4);

    let request = |days: i32| {
        svc.execute(RequestVacation {
            worker_id: worker.id,
            start_date: date(2024, 2, 1).coerce(),
            end_date: date(2024, 2, 10).coerce(),
            total_days: vacation::TotalDays::new(days).unwrap(),
            notes: None,
            at,
        })
    };

    // 5 months worked: 2 days approved, 1 day left pending.
    let approved: Vacation = request(2).await.unwrap();
    drop(
        svc.execute(ReviewVacation {
            vacation_id: approved.id,
            decision: service::command::review_vacation::Decision::Approve,
        })
        .await
        .unwrap(),
    );
    drop(request(1).await.unwrap());

    // 2 days remain available: 3 are too many.
    let err = request(3).await.unwrap_err();
    let err: &request_vacation::ExecutionError = err.as_ref();
    assert!(matches!(
        err,
        request_vacation::ExecutionError::InsufficientBalance {
            requested: 3,
            available: 2,
        },
    ));

    drop(request(2).await.unwrap());
    assert_eq!(db.snapshot().vacations.len(), 3);
}

#[tokio::test]
async fn vacation_request_requires_a_hire_date() {
    let (svc, _) = service();
    let worker =
        create_worker(&svc, worker::Kind::Direct, None, Some("1000")).await;

    let err = svc
        .execute(RequestVacation {
            worker_id: worker.id,
            start_date: date(2024, 2, 1).coerce(),
            end_date: date(2024, 2, 10).coerce(),
            total_days: vacation::TotalDays::new(1).unwrap(),
            notes: None,
            at: date(2024, 1, 4),
        })
        .await
        .unwrap_err();
    let err: &request_vacation::ExecutionError = err.as_ref();
    assert!(matches!(
        err,
        request_vacation::ExecutionError::WorkerHasNoHireDate(_),
    ));
}

#[tokio::test]
async fn vacation_balance_query_reports_the_breakdown() {
    let (svc, _) = service();
    let worker = create_worker(
        &svc,
        worker::Kind::Direct,
        Some(date(2023, 8, 4)),
        Some("1000"),
    )
    .await;
    let at = date(2024, 1, 4);

    let approved: Vacation = svc
        .execute(RequestVacation {
            worker_id: worker.id,
            start_date: date(2024, 2, 1).coerce(),
            end_date: date(2024, 2, 10).coerce(),
            total_days: vacation::TotalDays::new(2).unwrap(),
            notes: None,
            at,
        })
        .await
        .unwrap();
    drop(
        svc.execute(ReviewVacation {
            vacation_id: approved.id,
            decision: service::command::review_vacation::Decision::Approve,
        })
        .await
        .unwrap(),
    );
    drop(
        svc.execute(RequestVacation {
            worker_id: worker.id,
            start_date: date(2024, 3, 1).coerce(),
            end_date: date(2024, 3, 2).coerce(),
            total_days: vacation::TotalDays::new(1).unwrap(),
            notes: None,
            at,
        })
        .await
        .unwrap(),
    );

    let balance = svc
        .execute(VacationBalance {
            worker_id: worker.id,
            at,
        })
        .await
        .unwrap();
    assert_eq!(
        balance,
        Balance {
            months_worked: 5,
            accrued_days: 5,
            used_days: 2,
            pending_days: 1,
            available_days: 2,
        },
    );
}

#[tokio::test]
async fn salary_advances_are_limited_by_the_period_availability() {
    let (svc, db) = service();
    let worker = create_worker(
        &svc,
        worker::Kind::Direct,
        Some(date(2023, 8, 4)),
        Some("1000"),
    )
    .await;
    let at = date(2024, 1, 10);

    let grant = |amount_: &str| {
        svc.execute(GrantSalaryAdvance {
            worker_id: worker.id,
            amount: amount(amount_),
            advance_date: at.coerce(),
            period: None,
            notes: None,
            at,
        })
    };

    let granted = grant("400").await.unwrap();
    // Defaults to the current monthly period.
    assert_eq!(
        granted.period.start.coerce::<()>(),
        date(2024, 1, 1).start_of_day(),
    );
    assert_eq!(
        granted.period.end.coerce::<()>(),
        date(2024, 1, 31).end_of_day(),
    );

    let err = grant("700").await.unwrap_err();
    let err: &grant_salary_advance::ExecutionError = err.as_ref();
    match err {
        grant_salary_advance::ExecutionError::ExceedsAvailableAdvance {
            requested,
            available,
        } => {
            assert_eq!(*requested, amount("700"));
            assert_eq!(*available, Decimal::from(600));
        }
        other => panic!("unexpected error: {other}"),
    }

    drop(grant("600").await.unwrap());
    assert_eq!(db.snapshot().salary_advances.len(), 2);
}

#[tokio::test]
async fn salary_advances_require_a_direct_worker_with_a_base_salary() {
    let (svc, _) = service();
    let at = date(2024, 1, 10);

    let contractor = create_worker(
        &svc,
        worker::Kind::Contract,
        Some(date(2023, 8, 4)),
        Some("1000"),
    )
    .await;
    let err = svc
        .execute(GrantSalaryAdvance {
            worker_id: contractor.id,
            amount: amount("100"),
            advance_date: at.coerce(),
            period: None,
            notes: None,
            at,
        })
        .await
        .unwrap_err();
    let err: &grant_salary_advance::ExecutionError = err.as_ref();
    assert!(matches!(
        err,
        grant_salary_advance::ExecutionError::WorkerNotDirect(_),
    ));

    let unsalaried = create_worker(
        &svc,
        worker::Kind::Direct,
        Some(date(2023, 8, 4)),
        None,
    )
    .await;
    let err = svc
        .execute(GrantSalaryAdvance {
            worker_id: unsalaried.id,
            amount: amount("100"),
            advance_date: at.coerce(),
            period: None,
            notes: None,
            at,
        })
        .await
        .unwrap_err();
    let err: &grant_salary_advance::ExecutionError = err.as_ref();
    assert!(matches!(
        err,
        grant_salary_advance::ExecutionError::WorkerHasNoBaseSalary(_),
    ));
}

#[tokio::test]
async fn available_advance_query_signals_eligibility() {
    let (svc, _) = service();
    let at = date(2024, 1, 10);

    let contractor =
        create_worker(&svc, worker::Kind::Contract, None, Some("1000")).await;
    assert!(svc
        .execute(AvailableAdvance {
            worker_id: contractor.id,
            at,
        })
        .await
        .unwrap()
        .is_none());

    let direct = create_worker(
        &svc,
        worker::Kind::Direct,
        Some(date(2023, 8, 4)),
        Some("1000"),
    )
    .await;
    drop(
        svc.execute(GrantSalaryAdvance {
            worker_id: direct.id,
            amount: amount("400"),
            advance_date: at.coerce(),
            period: None,
            notes: None,
            at,
        })
        .await
        .unwrap(),
    );

    let availability = svc
        .execute(AvailableAdvance {
            worker_id: direct.id,
            at,
        })
        .await
        .unwrap()
        .expect("eligible worker");
    assert_eq!(availability.base_salary, amount("1000"));
    assert_eq!(availability.total_advances, amount("400"));
    assert_eq!(availability.available_amount, Decimal::from(600));
}

#[tokio::test]
async fn revoking_a_salary_advance_distinguishes_nothing_to_delete() {
    let (svc, _) = service();
    let at = date(2024, 1, 10);
    let worker = create_worker(
        &svc,
        worker::Kind::Direct,
        Some(date(2023, 8, 4)),
        Some("1000"),
    )
    .await;

    let granted = svc
        .execute(GrantSalaryAdvance {
            worker_id: worker.id,
            amount: amount("100"),
            advance_date: at.coerce(),
            period: None,
            notes: None,
            at,
        })
        .await
        .unwrap();

    assert!(svc
        .execute(RevokeSalaryAdvance {
            advance_id: granted.id,
        })
        .await
        .unwrap());
    assert!(!svc
        .execute(RevokeSalaryAdvance {
            advance_id: granted.id,
        })
        .await
        .unwrap());
}

#[tokio::test]
async fn deactivating_a_worker_keeps_the_record() {
    let (svc, db) = service();
    let worker =
        create_worker(&svc, worker::Kind::Direct, None, Some("1000")).await;

    assert!(svc
        .execute(DeactivateWorker {
            worker_id: worker.id,
        })
        .await
        .unwrap());
    let stored = db.snapshot().workers[&worker.id].clone();
    assert!(!stored.is_active);

    assert!(!svc
        .execute(DeactivateWorker {
            worker_id: worker::Id::new(),
        })
        .await
        .unwrap());
}

#[tokio::test]
async fn database_query_selects_child_ledgers() {
    let (svc, _) = service();
    let job = create_job(&svc, "500").await;
    drop(record_advance(&svc, job.id, "200").await);

    let advances = svc
        .execute(query::job::Advances::by(job.id))
        .await
        .unwrap();
    assert_eq!(advances.len(), 1);
    assert_eq!(advances[0].amount, amount("200"));

    let worker = create_worker(
        &svc,
        worker::Kind::Direct,
        Some(date(2023, 8, 4)),
        Some("1000"),
    )
    .await;
    drop(
        svc.execute(RequestVacation {
            worker_id: worker.id,
            start_date: date(2024, 2, 1).coerce(),
            end_date: date(2024, 2, 10).coerce(),
            total_days: vacation::TotalDays::new(2).unwrap(),
            notes: None,
            at: date(2024, 1, 4),
        })
        .await
        .unwrap(),
    );

    let requested = svc
        .execute(query::worker::VacationsInStatus::by((
            worker.id,
            vacation::Status::Requested,
        )))
        .await
        .unwrap();
    assert_eq!(requested.len(), 1);

    let approved = svc
        .execute(query::worker::VacationsInStatus::by((
            worker.id,
            vacation::Status::Approved,
        )))
        .await
        .unwrap();
    assert!(approved.is_empty());
}

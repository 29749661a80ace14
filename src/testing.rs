// src/testing.rs
// Implementações em memória das traits de repositório e dos serviços externos.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex, MutexGuard,
};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::{AppState, Settings},
    db::{AbsenceStore, AttendanceStore, CompanyStore, EmployeeStore, HistoryStore, PlanStore, ProfileStore, Stores},
    integrations::{Bucket, Collaborators, IdentityAccount, IdentityError, IdentityProvider, ObjectStorage, TextGenerator},
    models::{
        absence::{AbsenceRequest, ApprovalStatus, NewAbsenceRequest},
        attendance::{AttendanceClosing, AttendanceRecord, AttendanceStatus, NewAttendance},
        auth::{NewProfile, UserProfile, UserRole},
        company::{Company, NewCompany, PaymentStatus, Plan, PlanPayload},
        employee::{Employee, EmployeeChanges, EmployeeStatus, NewEmployee},
        history::{CompanyHistoryEntry, HistoryEntry, HistoryScope},
    },
};

pub const PASSWORD: &str = "senha123";
pub const JWT_SECRET: &str = "segredo-de-teste";
/// JPEG mínimo em data URL (o conteúdo não é inspecionado).
pub const PHOTO_DATA_URL: &str = "data:image/jpeg;base64,/9j/4AAQSkZJRg==";

pub fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn at(year: i32, month: u32, d: u32, hour: u32, minute: u32) -> NaiveDateTime {
    day(year, month, d).and_hms_opt(hour, minute, 0).unwrap()
}

// CPF formatado derivado do uuid (único por funcionário)
fn cpf_for(id: Uuid) -> String {
    let digits = format!("{:011}", id.as_u128() % 100_000_000_000);
    format!("{}.{}.{}-{}", &digits[..3], &digits[3..6], &digits[6..9], &digits[9..])
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap()
}

/// Empresa (plano 1 da migração) com um funcionário, direto no Postgres.
/// Devolve (empresa_id, funcionario_id).
pub async fn seed_company_with_employee(pool: &sqlx::PgPool) -> (Uuid, Uuid) {
    let owner_id = Uuid::new_v4();
    let employee_id = Uuid::new_v4();

    sqlx::query("INSERT INTO usuarios (id, nome, email, tipo, cnpj) VALUES ($1, 'Padaria', 'dono@padaria.com', 'empresa', '12.345.678/0001-99')")
        .bind(owner_id)
        .execute(pool)
        .await
        .unwrap();
    let (company_id,): (Uuid,) = sqlx::query_as(
        "INSERT INTO empresas (usuario_id, nome, cnpj, plano_id, status_pagamento) \
         VALUES ($1, 'Padaria', '12.345.678/0001-99', 1, 'Pago') RETURNING id",
    )
    .bind(owner_id)
    .fetch_one(pool)
    .await
    .unwrap();
    sqlx::query("INSERT INTO usuarios (id, nome, email, tipo, cnpj) VALUES ($1, 'João', 'joao@padaria.com', 'funcionario', '123.456.789-00')")
        .bind(employee_id)
        .execute(pool)
        .await
        .unwrap();
    sqlx::query("INSERT INTO funcionarios (id, empresa_id, nome, email, cargo) VALUES ($1, $2, 'João', 'joao@padaria.com', 'Padeiro')")
        .bind(employee_id)
        .bind(company_id)
        .execute(pool)
        .await
        .unwrap();

    (company_id, employee_id)
}

// ---
// Banco em memória
// ---

#[derive(Default)]
struct Tables {
    profiles: Vec<UserProfile>,
    companies: Vec<Company>,
    plans: Vec<Plan>,
    employees: Vec<Employee>,
    attendance: Vec<AttendanceRecord>,
    absences: Vec<AbsenceRequest>,
    history: Vec<(HistoryScope, HistoryEntry)>,
    sequence: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.sequence += 1;
        self.sequence
    }

    fn insert_profile(&mut self, profile: NewProfile) -> Result<UserProfile, AppError> {
        if self.profiles.iter().any(|p| p.id == profile.id) {
            return Err(AppError::UniqueConstraintViolation("usuarios_pkey".into()));
        }
        let created = UserProfile {
            id: profile.id,
            name: profile.name,
            email: profile.email,
            role: profile.role,
            tax_id: profile.tax_id,
            phone: None,
            created_at: Utc::now(),
        };
        self.profiles.push(created.clone());
        Ok(created)
    }

    fn update_company(&mut self, id: Uuid, change: impl FnOnce(&mut Company)) -> Result<Company, AppError> {
        let company = self
            .companies
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(AppError::CompanyNotFound)?;
        change(company);
        Ok(company.clone())
    }

    fn update_employee(&mut self, id: Uuid, change: impl FnOnce(&mut Employee)) -> Result<Employee, AppError> {
        let employee = self
            .employees
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(AppError::EmployeeNotFound)?;
        change(employee);
        Ok(employee.clone())
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    fail_employee_insert: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        let store = Self::default();
        lock(&store.tables).plans.push(Plan {
            id: 1,
            name: "Básico".into(),
            price: Decimal::new(4990, 2),
            max_employees: 10,
            description: None,
            annual_discount_percent: Decimal::ZERO,
        });
        store
    }

    pub fn fail_next_employee_insert(&self) {
        self.fail_employee_insert.store(true, Ordering::SeqCst);
    }

    pub fn profile_count(&self) -> usize {
        lock(&self.tables).profiles.len()
    }

    pub fn companies(&self) -> Vec<Company> {
        lock(&self.tables).companies.clone()
    }

    pub fn attendance_records(&self) -> Vec<AttendanceRecord> {
        lock(&self.tables).attendance.clone()
    }

    // Ordenado por data de início, como as consultas do repositório
    fn absences_where(&self, keep: impl Fn(&AbsenceRequest) -> bool) -> Vec<AbsenceRequest> {
        let mut requests: Vec<_> = lock(&self.tables).absences.iter().filter(|a| keep(a)).cloned().collect();
        requests.sort_by_key(|a| a.start_date);
        requests
    }

    pub fn absence(&self, id: i64) -> Option<AbsenceRequest> {
        lock(&self.tables).absences.iter().find(|a| a.id == id).cloned()
    }

    pub fn set_employee_status(&self, id: Uuid, status: EmployeeStatus) {
        lock(&self.tables).update_employee(id, |e| e.status = status).unwrap();
    }

    pub fn seed_profile(&self, profile: NewProfile) -> UserProfile {
        lock(&self.tables).insert_profile(profile).unwrap()
    }

    pub fn seed_company(&self, owner_id: Uuid, name: &str, tax_id: &str, plan_id: i64, status: PaymentStatus, expires_on: Option<NaiveDate>) -> Company {
        let company = Company {
            id: Uuid::new_v4(),
            owner_id,
            name: name.into(),
            tax_id: tax_id.into(),
            plan_id,
            payment_status: status,
            expires_on,
            created_at: Utc::now(),
        };
        lock(&self.tables).companies.push(company.clone());
        company
    }

    pub fn seed_employee(&self, company_id: Uuid, profile: &UserProfile) -> Employee {
        let employee = Employee {
            id: profile.id,
            company_id,
            name: profile.name.clone(),
            email: profile.email.clone(),
            role_title: "Atendente".into(),
            phone: None,
            status: EmployeeStatus::Ativo,
            created_at: Utc::now(),
        };
        lock(&self.tables).employees.push(employee.clone());
        employee
    }

    pub fn seed_plan(&self, max_employees: i32) -> Plan {
        let mut tables = lock(&self.tables);
        let plan = Plan {
            id: tables.plans.len() as i64 + 1,
            name: format!("Plano {max_employees}"),
            price: Decimal::new(9990, 2),
            max_employees,
            description: None,
            annual_discount_percent: Decimal::ZERO,
        };
        tables.plans.push(plan.clone());
        plan
    }

    pub fn seed_absence(
        &self,
        employee: &Employee,
        kind: &str,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
        status: ApprovalStatus,
    ) -> AbsenceRequest {
        let mut tables = lock(&self.tables);
        let request = AbsenceRequest {
            id: tables.next_id(),
            employee_id: employee.id,
            company_id: employee.company_id,
            kind: kind.into(),
            start_date,
            end_date,
            reason: "Motivo registrado".into(),
            attachment_url: None,
            status,
            created_at: Utc::now(),
        };
        tables.absences.push(request.clone());
        request
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserProfile>, AppError> {
        Ok(lock(&self.tables).profiles.iter().find(|p| p.id == id).cloned())
    }

    async fn find_by_tax_id(&self, tax_id: &str, role: UserRole) -> Result<Option<UserProfile>, AppError> {
        Ok(lock(&self.tables)
            .profiles
            .iter()
            .find(|p| p.tax_id.as_deref() == Some(tax_id) && p.role == role)
            .cloned())
    }

    async fn create(&self, profile: NewProfile) -> Result<UserProfile, AppError> {
        lock(&self.tables).insert_profile(profile)
    }

    async fn update_phone(&self, id: Uuid, phone: &str) -> Result<UserProfile, AppError> {
        let mut tables = lock(&self.tables);
        let profile = tables.profiles.iter_mut().find(|p| p.id == id).ok_or(AppError::UserNotFound)?;
        profile.phone = Some(phone.to_string());
        Ok(profile.clone())
    }
}

#[async_trait]
impl CompanyStore for MemoryStore {
    async fn provision(&self, owner: NewProfile, company: NewCompany) -> Result<Company, AppError> {
        let mut tables = lock(&self.tables);
        // Valida antes de escrever: equivale ao rollback da transação
        if tables.companies.iter().any(|c| c.tax_id == company.tax_id) {
            return Err(AppError::UniqueConstraintViolation("cnpj".into()));
        }
        let owner_id = owner.id;
        tables.insert_profile(owner)?;
        let created = Company {
            id: Uuid::new_v4(),
            owner_id,
            name: company.name,
            tax_id: company.tax_id,
            plan_id: company.plan_id,
            payment_status: PaymentStatus::Pendente,
            expires_on: Some(company.expires_on),
            created_at: Utc::now(),
        };
        tables.companies.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Company>, AppError> {
        Ok(lock(&self.tables).companies.iter().find(|c| c.id == id).cloned())
    }

    async fn find_by_owner(&self, owner_id: Uuid) -> Result<Option<Company>, AppError> {
        Ok(lock(&self.tables).companies.iter().find(|c| c.owner_id == owner_id).cloned())
    }

    async fn list(&self) -> Result<Vec<Company>, AppError> {
        let mut companies = self.companies();
        companies.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(companies)
    }

    async fn approve_payment(&self, id: Uuid, expires_on: NaiveDate, history_action: &str) -> Result<Company, AppError> {
        let mut tables = lock(&self.tables);
        let current = tables.companies.iter().find(|c| c.id == id).ok_or(AppError::CompanyNotFound)?;
        if current.payment_status == PaymentStatus::Pago {
            return Err(AppError::PaymentAlreadyConfirmed);
        }
        let company = tables.update_company(id, |c| {
            c.payment_status = PaymentStatus::Pago;
            c.expires_on = Some(expires_on);
        })?;
        let entry_id = tables.next_id();
        tables.history.push((
            HistoryScope::Company,
            HistoryEntry { id: entry_id, subject_id: id, action: history_action.into(), recorded_at: Utc::now() },
        ));
        Ok(company)
    }

    async fn set_payment_status(&self, id: Uuid, status: PaymentStatus) -> Result<Company, AppError> {
        lock(&self.tables).update_company(id, |c| c.payment_status = status)
    }

    async fn change_plan(&self, id: Uuid, plan_id: i64) -> Result<Company, AppError> {
        lock(&self.tables).update_company(id, |c| c.plan_id = plan_id)
    }

    async fn change_expiry(&self, id: Uuid, expires_on: NaiveDate) -> Result<Company, AppError> {
        lock(&self.tables).update_company(id, |c| c.expires_on = Some(expires_on))
    }

    async fn expire_overdue(&self, today: NaiveDate) -> Result<Vec<Company>, AppError> {
        let mut tables = lock(&self.tables);
        let mut expired = Vec::new();
        for company in tables.companies.iter_mut() {
            if company.payment_status == PaymentStatus::Pago && company.expires_on.is_some_and(|d| d < today) {
                company.payment_status = PaymentStatus::Vencido;
                expired.push(company.clone());
            }
        }
        Ok(expired)
    }
}

#[async_trait]
impl PlanStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Plan>, AppError> {
        let mut plans = lock(&self.tables).plans.clone();
        plans.sort_by(|a, b| a.price.cmp(&b.price).then(a.id.cmp(&b.id)));
        Ok(plans)
    }

    async fn find(&self, id: i64) -> Result<Option<Plan>, AppError> {
        Ok(lock(&self.tables).plans.iter().find(|p| p.id == id).cloned())
    }

    async fn default_plan(&self) -> Result<Option<Plan>, AppError> {
        Ok(lock(&self.tables).plans.iter().min_by_key(|p| p.id).cloned())
    }

    async fn create(&self, plan: &PlanPayload) -> Result<Plan, AppError> {
        let mut tables = lock(&self.tables);
        let created = Plan {
            id: tables.plans.iter().map(|p| p.id).max().unwrap_or(0) + 1,
            name: plan.name.clone(),
            price: plan.price,
            max_employees: plan.max_employees,
            description: plan.description.clone(),
            annual_discount_percent: plan.annual_discount_percent,
        };
        tables.plans.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: i64, plan: &PlanPayload) -> Result<Plan, AppError> {
        let mut tables = lock(&self.tables);
        let existing = tables.plans.iter_mut().find(|p| p.id == id).ok_or(AppError::PlanNotFound)?;
        existing.name = plan.name.clone();
        existing.price = plan.price;
        existing.max_employees = plan.max_employees;
        existing.description = plan.description.clone();
        existing.annual_discount_percent = plan.annual_discount_percent;
        Ok(existing.clone())
    }
}

#[async_trait]
impl EmployeeStore for MemoryStore {
    async fn create(&self, profile: NewProfile, employee: NewEmployee) -> Result<Employee, AppError> {
        if self.fail_employee_insert.swap(false, Ordering::SeqCst) {
            return Err(AppError::DatabaseError(sqlx::Error::PoolTimedOut));
        }
        let mut tables = lock(&self.tables);
        if tables.employees.iter().any(|e| e.id == employee.id) {
            return Err(AppError::UniqueConstraintViolation("funcionarios_pkey".into()));
        }
        tables.insert_profile(profile)?;
        let created = Employee {
            id: employee.id,
            company_id: employee.company_id,
            name: employee.name,
            email: employee.email,
            role_title: employee.role_title,
            phone: None,
            status: EmployeeStatus::Ativo,
            created_at: Utc::now(),
        };
        tables.employees.push(created.clone());
        Ok(created)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Employee>, AppError> {
        Ok(lock(&self.tables).employees.iter().find(|e| e.id == id).cloned())
    }

    async fn list_by_company(&self, company_id: Uuid) -> Result<Vec<Employee>, AppError> {
        let mut employees: Vec<_> = lock(&self.tables)
            .employees
            .iter()
            .filter(|e| e.company_id == company_id)
            .cloned()
            .collect();
        employees.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(employees)
    }

    async fn count_active(&self, company_id: Uuid) -> Result<i64, AppError> {
        Ok(lock(&self.tables)
            .employees
            .iter()
            .filter(|e| e.company_id == company_id && e.status == EmployeeStatus::Ativo)
            .count() as i64)
    }

    async fn update(&self, id: Uuid, changes: EmployeeChanges) -> Result<Employee, AppError> {
        let mut tables = lock(&self.tables);
        let updated = tables.update_employee(id, |e| {
            e.name = changes.name.clone();
            e.role_title = changes.role_title.clone();
        })?;
        if let Some(profile) = tables.profiles.iter_mut().find(|p| p.id == id) {
            profile.name = changes.name;
            profile.tax_id = Some(changes.cpf);
        }
        Ok(updated)
    }

    async fn set_status(&self, id: Uuid, status: EmployeeStatus) -> Result<Employee, AppError> {
        lock(&self.tables).update_employee(id, |e| e.status = status)
    }
}

#[async_trait]
impl AttendanceStore for MemoryStore {
    async fn open(&self, record: NewAttendance) -> Result<AttendanceRecord, AppError> {
        let mut tables = lock(&self.tables);
        // Mesmo papel do índice único parcial
        if tables
            .attendance
            .iter()
            .any(|r| r.employee_id == record.employee_id && r.status == AttendanceStatus::Aberto)
        {
            return Err(AppError::AttendanceAlreadyOpen);
        }
        let created = AttendanceRecord {
            id: tables.next_id(),
            employee_id: record.employee_id,
            date: record.date,
            check_in: record.check_in,
            check_out: None,
            check_in_photo_url: record.photo_url,
            check_out_photo_url: None,
            check_in_note: record.note,
            check_out_note: None,
            status: AttendanceStatus::Aberto,
        };
        tables.attendance.push(created.clone());
        Ok(created)
    }

    async fn close_open(&self, employee_id: Uuid, closing: AttendanceClosing) -> Result<Option<AttendanceRecord>, AppError> {
        let mut tables = lock(&self.tables);
        let open = tables
            .attendance
            .iter_mut()
            .filter(|r| r.employee_id == employee_id && r.status == AttendanceStatus::Aberto)
            .max_by_key(|r| (r.date, r.check_in));
        Ok(open.map(|record| {
            record.check_out = Some(closing.check_out);
            record.check_out_photo_url = closing.photo_url;
            record.check_out_note = closing.note;
            record.status = AttendanceStatus::Concluido;
            record.clone()
        }))
    }

    async fn find_open(&self, employee_id: Uuid) -> Result<Option<AttendanceRecord>, AppError> {
        Ok(lock(&self.tables)
            .attendance
            .iter()
            .filter(|r| r.employee_id == employee_id && r.status == AttendanceStatus::Aberto)
            .max_by_key(|r| (r.date, r.check_in))
            .cloned())
    }

    async fn list_for_employee(&self, employee_id: Uuid, from: NaiveDate, to: NaiveDate) -> Result<Vec<AttendanceRecord>, AppError> {
        let mut records: Vec<_> = lock(&self.tables)
            .attendance
            .iter()
            .filter(|r| r.employee_id == employee_id && r.date >= from && r.date <= to)
            .cloned()
            .collect();
        records.sort_by(|a, b| (b.date, b.check_in).cmp(&(a.date, a.check_in)));
        Ok(records)
    }

    async fn list_for_company_on(&self, company_id: Uuid, date: NaiveDate) -> Result<Vec<AttendanceRecord>, AppError> {
        let tables = lock(&self.tables);
        let mut records: Vec<_> = tables
            .attendance
            .iter()
            .filter(|r| r.date == date)
            .filter(|r| tables.employees.iter().any(|e| e.id == r.employee_id && e.company_id == company_id))
            .cloned()
            .collect();
        records.sort_by_key(|r| r.check_in);
        Ok(records)
    }
}

#[async_trait]
impl AbsenceStore for MemoryStore {
    async fn create(&self, request: NewAbsenceRequest) -> Result<AbsenceRequest, AppError> {
        let mut tables = lock(&self.tables);
        let created = AbsenceRequest {
            id: tables.next_id(),
            employee_id: request.employee_id,
            company_id: request.company_id,
            kind: request.kind,
            start_date: request.start_date,
            end_date: request.end_date,
            reason: request.reason,
            attachment_url: request.attachment_url,
            status: ApprovalStatus::Pendente,
            created_at: Utc::now(),
        };
        tables.absences.push(created.clone());
        Ok(created)
    }

    async fn find(&self, id: i64) -> Result<Option<AbsenceRequest>, AppError> {
        Ok(self.absence(id))
    }

    async fn list_for_employee(&self, employee_id: Uuid) -> Result<Vec<AbsenceRequest>, AppError> {
        let mut requests = self.absences_where(|a| a.employee_id == employee_id);
        requests.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        Ok(requests)
    }

    async fn list_for_company(&self, company_id: Uuid) -> Result<Vec<AbsenceRequest>, AppError> {
        let mut requests = self.absences_where(|a| a.company_id == company_id);
        requests.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(requests)
    }

    async fn upcoming_for_company(&self, company_id: Uuid, today: NaiveDate) -> Result<Vec<AbsenceRequest>, AppError> {
        Ok(self.absences_where(|a| {
            a.company_id == company_id && a.status == ApprovalStatus::Aprovado && a.last_day() >= today
        }))
    }

    async fn resolve(&self, id: i64, expected: ApprovalStatus, to: ApprovalStatus) -> Result<Option<AbsenceRequest>, AppError> {
        let mut tables = lock(&self.tables);
        Ok(tables
            .absences
            .iter_mut()
            .find(|a| a.id == id && a.status == expected)
            .map(|request| {
                request.status = to;
                request.clone()
            }))
    }

    async fn approved_for_company_between(&self, company_id: Uuid, from: NaiveDate, to: NaiveDate) -> Result<Vec<AbsenceRequest>, AppError> {
        Ok(self.absences_where(|a| {
            a.company_id == company_id
                && a.status == ApprovalStatus::Aprovado
                && a.start_date <= to
                && a.last_day() >= from
        }))
    }

    async fn approved_for_employee_between(&self, employee_id: Uuid, from: NaiveDate, to: NaiveDate) -> Result<Vec<AbsenceRequest>, AppError> {
        Ok(self.absences_where(|a| {
            a.employee_id == employee_id
                && a.status == ApprovalStatus::Aprovado
                && a.start_date <= to
                && a.last_day() >= from
        }))
    }
}

#[async_trait]
impl HistoryStore for MemoryStore {
    async fn append(&self, scope: HistoryScope, subject_id: Uuid, action: &str) -> Result<HistoryEntry, AppError> {
        let mut tables = lock(&self.tables);
        let entry = HistoryEntry { id: tables.next_id(), subject_id, action: action.into(), recorded_at: Utc::now() };
        tables.history.push((scope, entry.clone()));
        Ok(entry)
    }

    async fn list(&self, scope: HistoryScope, subject_id: Uuid) -> Result<Vec<HistoryEntry>, AppError> {
        Ok(lock(&self.tables)
            .history
            .iter()
            .rev()
            .filter(|(s, e)| *s == scope && e.subject_id == subject_id)
            .map(|(_, e)| e.clone())
            .collect())
    }

    async fn company_history(&self) -> Result<Vec<CompanyHistoryEntry>, AppError> {
        let tables = lock(&self.tables);
        Ok(tables
            .history
            .iter()
            .rev()
            .filter(|(scope, _)| *scope == HistoryScope::Company)
            .map(|(_, e)| CompanyHistoryEntry {
                id: e.id,
                company_id: e.subject_id,
                company_name: tables.companies.iter().find(|c| c.id == e.subject_id).map(|c| c.name.clone()),
                action: e.action.clone(),
                recorded_at: e.recorded_at,
            })
            .collect())
    }
}

// ---
// Provedor de identidade falso
// ---

struct FakeAccount {
    id: Uuid,
    email: String,
    password: Option<String>,
    invite: Option<(Uuid, String)>,
}

#[derive(Default)]
pub struct FakeIdentity {
    accounts: Mutex<Vec<FakeAccount>>,
    deleted: Mutex<Vec<Uuid>>,
}

impl FakeIdentity {
    /// Conta confirmada, como se criada por fora do sistema.
    pub fn register(&self, email: &str, password: &str) -> Uuid {
        let id = Uuid::new_v4();
        lock(&self.accounts).push(FakeAccount {
            id,
            email: email.to_lowercase(),
            password: Some(password.into()),
            invite: None,
        });
        id
    }

    pub fn register_with_id(&self, id: Uuid, email: &str, password: &str) {
        lock(&self.accounts).push(FakeAccount {
            id,
            email: email.to_lowercase(),
            password: Some(password.into()),
            invite: None,
        });
    }

    pub fn has_account(&self, email: &str) -> bool {
        lock(&self.accounts).iter().any(|a| a.email == email.to_lowercase())
    }

    pub fn deleted(&self) -> Vec<Uuid> {
        lock(&self.deleted).clone()
    }

    pub fn invite_redirect(&self, email: &str) -> Option<String> {
        lock(&self.accounts)
            .iter()
            .find(|a| a.email == email.to_lowercase())
            .and_then(|a| a.invite.as_ref().map(|(_, redirect)| redirect.clone()))
    }

    pub fn invite_token(&self, email: &str) -> Option<Uuid> {
        lock(&self.accounts)
            .iter()
            .find(|a| a.email == email.to_lowercase())
            .and_then(|a| a.invite.as_ref().map(|(token, _)| *token))
    }

    fn insert(&self, email: &str, password: Option<String>, invite: Option<(Uuid, String)>) -> Result<IdentityAccount, IdentityError> {
        let mut accounts = lock(&self.accounts);
        let email = email.to_lowercase();
        if accounts.iter().any(|a| a.email == email) {
            return Err(IdentityError::AlreadyRegistered);
        }
        let id = Uuid::new_v4();
        accounts.push(FakeAccount { id, email: email.clone(), password, invite });
        Ok(IdentityAccount { id, email })
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<IdentityAccount, IdentityError> {
        let accounts = lock(&self.accounts);
        let account = accounts
            .iter()
            .find(|a| a.email == email.to_lowercase())
            .ok_or(IdentityError::InvalidCredentials)?;
        match &account.password {
            None => Err(IdentityError::EmailNotConfirmed),
            Some(stored) if stored == password => Ok(IdentityAccount { id: account.id, email: account.email.clone() }),
            Some(_) => Err(IdentityError::InvalidCredentials),
        }
    }

    async fn create_user(&self, email: &str, password: &str, _full_name: &str) -> Result<IdentityAccount, IdentityError> {
        self.insert(email, Some(password.into()), None)
    }

    async fn invite_user_by_email(&self, email: &str, _full_name: &str, redirect_to: &str) -> Result<IdentityAccount, IdentityError> {
        self.insert(email, None, Some((Uuid::new_v4(), redirect_to.into())))
    }

    async fn accept_invite(&self, token: Uuid, password: &str) -> Result<IdentityAccount, IdentityError> {
        let mut accounts = lock(&self.accounts);
        let account = accounts
            .iter_mut()
            .find(|a| a.invite.as_ref().is_some_and(|(t, _)| *t == token))
            .ok_or(IdentityError::InviteNotFound)?;
        account.password = Some(password.into());
        account.invite = None;
        Ok(IdentityAccount { id: account.id, email: account.email.clone() })
    }

    async fn update_password(&self, user_id: Uuid, password: &str) -> Result<(), IdentityError> {
        let mut accounts = lock(&self.accounts);
        let account = accounts.iter_mut().find(|a| a.id == user_id).ok_or(IdentityError::AccountNotFound)?;
        account.password = Some(password.into());
        Ok(())
    }

    async fn delete_user(&self, user_id: Uuid) -> Result<(), IdentityError> {
        let mut accounts = lock(&self.accounts);
        let before = accounts.len();
        accounts.retain(|a| a.id != user_id);
        if accounts.len() == before {
            return Err(IdentityError::AccountNotFound);
        }
        lock(&self.deleted).push(user_id);
        Ok(())
    }
}

// ---
// Storage e gerador de texto falsos
// ---

#[derive(Default)]
pub struct FakeStorage {
    uploads: Mutex<Vec<(Bucket, String, usize)>>,
}

impl FakeStorage {
    pub fn uploads(&self) -> Vec<(Bucket, String, usize)> {
        lock(&self.uploads).clone()
    }
}

#[async_trait]
impl ObjectStorage for FakeStorage {
    async fn upload(&self, bucket: Bucket, path: &str, bytes: Vec<u8>, _content_type: &str, _upsert: bool) -> Result<(), AppError> {
        lock(&self.uploads).push((bucket, path.to_string(), bytes.len()));
        Ok(())
    }

    fn public_url(&self, bucket: Bucket, path: &str) -> String {
        format!("https://storage.test/{}/{}", bucket.as_str(), path)
    }
}

pub struct FakeTextGenerator {
    reply: Option<String>,
}

impl FakeTextGenerator {
    pub fn replying(text: &str) -> Self {
        Self { reply: Some(text.to_string()) }
    }

    pub fn failing() -> Self {
        Self { reply: None }
    }
}

#[async_trait]
impl TextGenerator for FakeTextGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, AppError> {
        self.reply
            .clone()
            .ok_or_else(|| AppError::InternalServerError(anyhow::anyhow!("gerador indisponível")))
    }
}

// ---
// Fixture: estado completo da aplicação sobre os fakes
// ---

pub struct Fixture {
    pub store: Arc<MemoryStore>,
    pub identity: Arc<FakeIdentity>,
    pub storage: Arc<FakeStorage>,
    pub generator: Option<Arc<FakeTextGenerator>>,
    settings: Settings,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_settings(Settings::for_tests())
    }

    pub fn without_site_url() -> Self {
        let mut settings = Settings::for_tests();
        settings.site_url = None;
        Self::with_settings(settings)
    }

    pub fn with_generator(reply: &str) -> Self {
        let mut fixture = Self::new();
        fixture.generator = Some(Arc::new(FakeTextGenerator::replying(reply)));
        fixture
    }

    fn with_settings(settings: Settings) -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
            identity: Arc::new(FakeIdentity::default()),
            storage: Arc::new(FakeStorage::default()),
            generator: None,
            settings,
        }
    }

    pub fn state(&self) -> AppState {
        let stores = Stores {
            profiles: self.store.clone(),
            companies: self.store.clone(),
            plans: self.store.clone(),
            employees: self.store.clone(),
            attendance: self.store.clone(),
            absences: self.store.clone(),
            history: self.store.clone(),
        };
        let collaborators = Collaborators {
            identity: self.identity.clone(),
            storage: self.storage.clone(),
            text_generator: self.generator.clone().map(|g| g as Arc<dyn TextGenerator>),
        };
        AppState::from_parts(self.settings.clone(), stores, collaborators)
    }

    pub fn tenancy(&self) -> crate::services::TenancyService {
        self.state().tenancy_service
    }

    /// Dono + empresa no plano padrão, com conta de identidade (senha PASSWORD).
    pub fn company(&self, name: &str, status: PaymentStatus, expires_on: Option<NaiveDate>) -> (UserProfile, Company) {
        self.company_with(name, 1, status, expires_on)
    }

    pub fn company_on_plan(&self, name: &str, plan_id: i64) -> (UserProfile, Company) {
        self.company_with(name, plan_id, PaymentStatus::Pago, None)
    }

    fn company_with(&self, name: &str, plan_id: i64, status: PaymentStatus, expires_on: Option<NaiveDate>) -> (UserProfile, Company) {
        let serial = self.store.companies().len() + 1;
        let email = format!("dono{serial}@empresa.com");
        let cnpj = format!("{serial:02}.345.678/0001-99");
        let id = self.identity.register(&email, PASSWORD);
        let owner = self.store.seed_profile(NewProfile {
            id,
            name: name.into(),
            email,
            role: UserRole::Empresa,
            tax_id: Some(cnpj.clone()),
        });
        let company = self.store.seed_company(owner.id, name, &cnpj, plan_id, status, expires_on);
        (owner, company)
    }

    /// Funcionário Ativo com CPF único e conta de identidade (senha PASSWORD).
    pub fn employee(&self, company: &Company, name: &str) -> (UserProfile, Employee) {
        let id = Uuid::new_v4();
        let email = format!("{}.{}@empresa.com", name.to_lowercase(), &id.simple().to_string()[..6]);
        self.identity.register_with_id(id, &email, PASSWORD);
        let profile = self.store.seed_profile(NewProfile {
            id,
            name: name.into(),
            email,
            role: UserRole::Funcionario,
            tax_id: Some(cpf_for(id)),
        });
        let employee = self.store.seed_employee(company.id, &profile);
        (profile, employee)
    }

    pub fn admin(&self, email: &str) -> UserProfile {
        let id = Uuid::new_v4();
        self.identity.register_with_id(id, email, PASSWORD);
        self.store.seed_profile(NewProfile {
            id,
            name: "Administrador".into(),
            email: email.into(),
            role: UserRole::Admin,
            tax_id: None,
        })
    }

    pub fn plan(&self, max_employees: i32) -> Plan {
        self.store.seed_plan(max_employees)
    }
}

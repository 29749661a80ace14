// src/db.rs

use std::sync::Arc;

use sqlx::PgPool;

pub mod absence_repo;
pub mod attendance_repo;
pub mod company_repo;
pub mod employee_repo;
pub mod history_repo;
pub mod plan_repo;
pub mod profile_repo;

pub use absence_repo::{AbsenceRepository, AbsenceStore};
pub use attendance_repo::{AttendanceRepository, AttendanceStore};
pub use company_repo::{CompanyRepository, CompanyStore};
pub use employee_repo::{EmployeeRepository, EmployeeStore};
pub use history_repo::{HistoryRepository, HistoryStore};
pub use plan_repo::{PlanRepository, PlanStore};
pub use profile_repo::{ProfileRepository, ProfileStore};

/// Todos os repositórios da aplicação, atrás das suas traits.
#[derive(Clone)]
pub struct Stores {
    pub profiles: Arc<dyn ProfileStore>,
    pub companies: Arc<dyn CompanyStore>,
    pub plans: Arc<dyn PlanStore>,
    pub employees: Arc<dyn EmployeeStore>,
    pub attendance: Arc<dyn AttendanceStore>,
    pub absences: Arc<dyn AbsenceStore>,
    pub history: Arc<dyn HistoryStore>,
}

impl Stores {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            profiles: Arc::new(ProfileRepository::new(pool.clone())),
            companies: Arc::new(CompanyRepository::new(pool.clone())),
            plans: Arc::new(PlanRepository::new(pool.clone())),
            employees: Arc::new(EmployeeRepository::new(pool.clone())),
            attendance: Arc::new(AttendanceRepository::new(pool.clone())),
            absences: Arc::new(AbsenceRepository::new(pool.clone())),
            history: Arc::new(HistoryRepository::new(pool)),
        }
    }
}

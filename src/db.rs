pub mod user_repo;
pub use user_repo::UserRepository;
pub mod master_repo;
pub use master_repo::MasterRepository;
pub mod equipment_repo;
pub use equipment_repo::EquipmentRepository;
pub mod employee_repo;
pub use employee_repo::EmployeeRepository;
pub mod issuance_repo;
pub use issuance_repo::IssuanceRepository;
pub mod rekap_repo;
pub use rekap_repo::RekapRepository;
pub mod loan_repo;
pub use loan_repo::LoanRepository;
pub mod procurement_repo;
pub use procurement_repo::ProcurementRepository;
pub mod file_repo;
pub use file_repo::FileRepository;
pub mod dashboard_repo;
pub use dashboard_repo::DashboardRepository;

pub mod auth;
pub mod dashboard_service;
pub mod equipment_service;
pub mod export_service;
pub mod file_service;
pub mod loan_service;
pub mod rekap_service;

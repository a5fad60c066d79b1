pub mod auth;
pub mod dashboard;
pub mod employee;
pub mod equipment;
pub mod file;
pub mod issuance;
pub mod loan;
pub mod master;
pub mod procurement;
pub mod rekap;

pub mod accounts;
pub mod doctors;
pub mod hospitals;
pub mod manager;
pub mod query_builder;
pub mod repository;

pub use accounts::{Account, AccountRepository, AccountSummary, NewAccount};
pub use doctors::{DoctorRecord, DoctorRepository};
pub use hospitals::{HospitalRecord, HospitalRepository};
pub use manager::{DatabaseError, DatabaseManager};
pub use repository::Page;

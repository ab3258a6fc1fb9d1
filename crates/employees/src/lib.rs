//! Employee records domain module.
//!
//! An employee is split across three record groups (personal, professional,
//! finance) sharing one [`EmploymentCode`](workforce_core::EmploymentCode). This
//! crate holds the record types and their intake validation, implemented purely
//! as deterministic domain logic (no IO, no HTTP, no storage).

pub mod finance;
pub mod personal;
pub mod professional;
pub mod record;
pub mod view;

pub use finance::{BankDetails, FinanceRecord};
pub use personal::{PersonalContact, PersonalRecord};
pub use professional::{ProfessionalProfile, ProfessionalRecord};
pub use record::{Address, EmployeeRecord};
pub use view::EmployeeView;

//! Infrastructure layer: record stores, the identity registry, the project
//! graph, and the services composed over them.
//!
//! - `store`: storage traits plus in-memory and Postgres backends
//! - `directory`: validated create/read operations and aggregated views
//! - `login`: email + secret verification against professional records and
//!   admin accounts

pub mod directory;
pub mod error;
pub mod login;
pub mod store;

mod integration_tests;

pub use directory::{EmployeeDirectory, EmployeeOverview};
pub use error::StoreError;
pub use login::{AdminLogin, EmployeeLogin};

//! Storage for employee record groups, the identity registry, the project graph
//! and admin accounts.
//!
//! Two backends implement the same traits:
//! - `InMemoryWorkforceStore`: tests and local development
//! - `PostgresWorkforceStore`: durable storage with unique constraints

pub mod in_memory;
pub mod postgres;
mod rows;
pub mod r#trait;

pub use in_memory::InMemoryWorkforceStore;
pub use postgres::PostgresWorkforceStore;
pub use r#trait::{
    AdminStore, IdentityRegistry, ProfessionalStore, ProjectGraph, RecordStore, WorkforceStore,
};

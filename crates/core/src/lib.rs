//! `workforce-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! the employee identity key, the record-group taxonomy and the shared error model.

pub mod entity;
pub mod error;
pub mod group;
pub mod id;
pub mod value_object;

pub use entity::Entity;
pub use error::{ConflictField, DomainError, DomainResult};
pub use group::RecordGroup;
pub use id::{EMPLOYMENT_CODE_LEN, EmploymentCode};
pub use value_object::ValueObject;

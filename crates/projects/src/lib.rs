//! Projects domain module.
//!
//! Projects and their many-to-many assignment edges to personal records. This
//! crate holds the project types, intake validation and the pure edge-grouping
//! logic used to materialize member lists; storage lives in `workforce-infra`.

pub mod graph;
pub mod project;

pub use graph::{MemberFetch, assemble_views};
pub use project::{
    CreatedProject, NewProject, Progress, Project, ProjectId, ProjectStatus, ProjectView,
};

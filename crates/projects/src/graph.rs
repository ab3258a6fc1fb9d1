//! Assignment-graph read helpers.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use workforce_core::EmploymentCode;

use crate::project::{Project, ProjectId, ProjectView};

/// How member lists are resolved when listing many projects.
///
/// This is always an explicit argument of the listing call, never a property
/// of the returned views.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MemberFetch {
    /// One combined projects + edges pass, grouped in memory.
    #[default]
    Eager,
    /// One edge lookup per project (N+1 round trips).
    PerProject,
}

/// Group flat `(project, member)` join rows into project views.
///
/// Rows come from a projects-LEFT-JOIN-edges pass, so a project with no members
/// shows up once with `None`. Projects keep the order in which they were first
/// seen; members keep row order, with repeats dropped.
pub fn assemble_views<I>(rows: I) -> Vec<ProjectView>
where
    I: IntoIterator<Item = (Project, Option<EmploymentCode>)>,
{
    let mut index: HashMap<ProjectId, usize> = HashMap::new();
    let mut views: Vec<ProjectView> = Vec::new();

    for (project, member) in rows {
        let slot = match index.get(&project.id) {
            Some(i) => *i,
            None => {
                index.insert(project.id, views.len());
                views.push(ProjectView {
                    project,
                    assigned_employee_ids: Vec::new(),
                });
                views.len() - 1
            }
        };

        if let Some(member) = member {
            let members = &mut views[slot].assigned_employee_ids;
            if !members.contains(&member) {
                members.push(member);
            }
        }
    }

    views
}

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use workforce_auth::AdminAccount;
use workforce_core::{DomainError, EmploymentCode, RecordGroup};
use workforce_employees::{EmployeeRecord, FinanceRecord, PersonalRecord, ProfessionalRecord};
use workforce_projects::{
    CreatedProject, MemberFetch, NewProject, Project, ProjectId, ProjectView, assemble_views,
};

use super::r#trait::{AdminStore, IdentityRegistry, ProfessionalStore, ProjectGraph, RecordStore};
use crate::error::StoreError;

/// Rows of one record group plus its unique indexes.
#[derive(Debug)]
struct Table<R> {
    rows: Vec<R>,
    by_code: HashMap<EmploymentCode, usize>,
    by_email: HashMap<String, usize>,
}

impl<R> Default for Table<R> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            by_code: HashMap::new(),
            by_email: HashMap::new(),
        }
    }
}

impl<R: EmployeeRecord> Table<R> {
    /// The unique-constraint check, run under the same write lock as `insert`.
    fn check_unique(&self, record: &R) -> Result<(), DomainError> {
        if self.by_code.contains_key(record.employment_code()) {
            return Err(DomainError::duplicate_code(R::GROUP, record.employment_code()));
        }
        if let Some(email) = record.login_email() {
            if self.by_email.contains_key(email) {
                return Err(DomainError::duplicate_login_email(email));
            }
        }
        Ok(())
    }

    fn insert(&mut self, record: R) {
        let idx = self.rows.len();
        self.by_code.insert(record.employment_code().clone(), idx);
        if let Some(email) = record.login_email() {
            self.by_email.insert(email.to_string(), idx);
        }
        self.rows.push(record);
    }

    fn get(&self, code: &EmploymentCode) -> Option<&R> {
        self.by_code.get(code).map(|idx| &self.rows[*idx])
    }

    fn contains(&self, code: &EmploymentCode) -> bool {
        self.by_code.contains_key(code)
    }
}

#[derive(Debug, Default)]
struct State {
    registry: Vec<EmploymentCode>,
    registered: HashSet<EmploymentCode>,
    personal: Table<PersonalRecord>,
    professional: Table<ProfessionalRecord>,
    finance: Table<FinanceRecord>,
    projects: Vec<Project>,
    edges: Vec<(ProjectId, EmploymentCode)>,
    last_project_id: i64,
    admins: HashMap<String, AdminAccount>,
}

impl State {
    fn claim(&mut self, code: &EmploymentCode) -> bool {
        if self.registered.insert(code.clone()) {
            self.registry.push(code.clone());
            true
        } else {
            false
        }
    }

    fn members_of(&self, id: ProjectId) -> Vec<EmploymentCode> {
        self.edges
            .iter()
            .filter(|(p, _)| *p == id)
            .map(|(_, m)| m.clone())
            .collect()
    }

    /// Join rows for `projects`, grouped by a single pass over the edge list.
    fn join_rows<'a>(
        &self,
        projects: impl Iterator<Item = &'a Project>,
    ) -> Vec<(Project, Option<EmploymentCode>)> {
        let mut by_project: HashMap<ProjectId, Vec<EmploymentCode>> = HashMap::new();
        for (p, m) in &self.edges {
            by_project.entry(*p).or_default().push(m.clone());
        }

        let mut rows = Vec::new();
        for project in projects {
            match by_project.get(&project.id) {
                Some(members) => {
                    rows.extend(members.iter().map(|m| (project.clone(), Some(m.clone()))));
                }
                None => rows.push((project.clone(), None)),
            }
        }
        rows
    }
}

/// In-memory store for every record group, the identity registry and the
/// project graph.
///
/// Intended for tests/dev. A single `RwLock` covers all state, so the
/// check-then-insert in `create()` is atomic: two racing creators for the same
/// code serialize on the write lock and the second one sees the first's row.
#[derive(Debug, Default)]
pub struct InMemoryWorkforceStore {
    state: RwLock<State>,
}

impl InMemoryWorkforceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl IdentityRegistry for InMemoryWorkforceStore {
    async fn claim(&self, code: &EmploymentCode) -> Result<bool, StoreError> {
        let mut state = self.state.write().map_err(|_| StoreError::poisoned("claim"))?;
        Ok(state.claim(code))
    }

    async fn is_registered(&self, code: &EmploymentCode) -> Result<bool, StoreError> {
        let state = self
            .state
            .read()
            .map_err(|_| StoreError::poisoned("is_registered"))?;
        Ok(state.registered.contains(code))
    }

    async fn groups_for(&self, code: &EmploymentCode) -> Result<Vec<RecordGroup>, StoreError> {
        let state = self.state.read().map_err(|_| StoreError::poisoned("groups_for"))?;
        let mut groups = Vec::new();
        if state.personal.contains(code) {
            groups.push(RecordGroup::Personal);
        }
        if state.professional.contains(code) {
            groups.push(RecordGroup::Professional);
        }
        if state.finance.contains(code) {
            groups.push(RecordGroup::Finance);
        }
        Ok(groups)
    }

    async fn registered_codes(&self) -> Result<Vec<EmploymentCode>, StoreError> {
        let state = self
            .state
            .read()
            .map_err(|_| StoreError::poisoned("registered_codes"))?;
        Ok(state.registry.clone())
    }
}

macro_rules! impl_in_memory_record_store {
    ($record:ty, $table:ident) => {
        #[async_trait::async_trait]
        impl RecordStore<$record> for InMemoryWorkforceStore {
            async fn create(&self, record: $record) -> Result<$record, StoreError> {
                let mut state = self.state.write().map_err(|_| StoreError::poisoned("create"))?;
                if let Err(e) = state.$table.check_unique(&record) {
                    let group = <$record as EmployeeRecord>::GROUP;
                    tracing::warn!(
                        group = %group,
                        employment_code = %record.employment_code(),
                        error = %e,
                        "rejected duplicate record"
                    );
                    return Err(e.into());
                }
                state.claim(record.employment_code());
                state.$table.insert(record.clone());
                Ok(record)
            }

            async fn find_by_key(
                &self,
                code: &EmploymentCode,
            ) -> Result<Option<$record>, StoreError> {
                let state = self
                    .state
                    .read()
                    .map_err(|_| StoreError::poisoned("find_by_key"))?;
                Ok(state.$table.get(code).cloned())
            }

            async fn exists(&self, code: &EmploymentCode) -> Result<bool, StoreError> {
                let state = self.state.read().map_err(|_| StoreError::poisoned("exists"))?;
                Ok(state.$table.contains(code))
            }

            async fn list_all(&self) -> Result<Vec<$record>, StoreError> {
                let state = self.state.read().map_err(|_| StoreError::poisoned("list_all"))?;
                Ok(state.$table.rows.clone())
            }
        }
    };
}

impl_in_memory_record_store!(PersonalRecord, personal);
impl_in_memory_record_store!(ProfessionalRecord, professional);
impl_in_memory_record_store!(FinanceRecord, finance);

#[async_trait::async_trait]
impl ProfessionalStore for InMemoryWorkforceStore {
    async fn find_by_login_email(
        &self,
        login_email: &str,
    ) -> Result<Option<ProfessionalRecord>, StoreError> {
        let state = self
            .state
            .read()
            .map_err(|_| StoreError::poisoned("find_by_login_email"))?;
        Ok(state
            .professional
            .by_email
            .get(login_email)
            .map(|idx| state.professional.rows[*idx].clone()))
    }
}

#[async_trait::async_trait]
impl ProjectGraph for InMemoryWorkforceStore {
    async fn create_project(&self, project: NewProject) -> Result<CreatedProject, StoreError> {
        let mut state = self
            .state
            .write()
            .map_err(|_| StoreError::poisoned("create_project"))?;

        let project = project.with_distinct_members();
        let (members, dropped): (Vec<_>, Vec<_>) = project
            .member_keys
            .into_iter()
            .partition(|code| state.personal.contains(code));

        state.last_project_id += 1;
        let stored = Project {
            id: ProjectId(state.last_project_id),
            title: project.title,
            description: project.description,
            status: project.status,
            deadline: project.deadline,
            progress: project.progress,
        };
        state.projects.push(stored.clone());
        state
            .edges
            .extend(members.iter().map(|m| (stored.id, m.clone())));

        Ok(CreatedProject {
            project: ProjectView {
                project: stored,
                assigned_employee_ids: members,
            },
            dropped_member_keys: dropped,
        })
    }

    async fn get_project(&self, id: ProjectId) -> Result<ProjectView, StoreError> {
        let state = self.state.read().map_err(|_| StoreError::poisoned("get_project"))?;
        let project = state
            .projects
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| DomainError::not_found("project", id))?;
        Ok(ProjectView {
            project: project.clone(),
            assigned_employee_ids: state.members_of(id),
        })
    }

    async fn list_for_member(&self, code: &EmploymentCode) -> Result<Vec<ProjectView>, StoreError> {
        let state = self
            .state
            .read()
            .map_err(|_| StoreError::poisoned("list_for_member"))?;
        let ids: HashSet<ProjectId> = state
            .edges
            .iter()
            .filter(|(_, m)| m == code)
            .map(|(p, _)| *p)
            .collect();
        let rows = state.join_rows(state.projects.iter().filter(|p| ids.contains(&p.id)));
        Ok(assemble_views(rows))
    }

    async fn list_projects(&self, fetch: MemberFetch) -> Result<Vec<ProjectView>, StoreError> {
        let state = self
            .state
            .read()
            .map_err(|_| StoreError::poisoned("list_projects"))?;
        let views = match fetch {
            MemberFetch::Eager => assemble_views(state.join_rows(state.projects.iter())),
            MemberFetch::PerProject => state
                .projects
                .iter()
                .map(|p| ProjectView {
                    project: p.clone(),
                    assigned_employee_ids: state.members_of(p.id),
                })
                .collect(),
        };
        Ok(views)
    }
}

#[async_trait::async_trait]
impl AdminStore for InMemoryWorkforceStore {
    async fn upsert_admin(&self, account: AdminAccount) -> Result<(), StoreError> {
        let mut state = self.state.write().map_err(|_| StoreError::poisoned("upsert_admin"))?;
        state.admins.insert(account.email().to_string(), account);
        Ok(())
    }

    async fn find_admin_by_email(&self, email: &str) -> Result<Option<AdminAccount>, StoreError> {
        let state = self
            .state
            .read()
            .map_err(|_| StoreError::poisoned("find_admin_by_email"))?;
        Ok(state.admins.get(email).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use workforce_auth::Secret;

    fn code(raw: &str) -> EmploymentCode {
        EmploymentCode::parse(raw).unwrap()
    }

    fn block_on<F: std::future::Future>(f: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap()
            .block_on(f)
    }

    #[test]
    fn create_claims_code_in_registry() {
        let store = InMemoryWorkforceStore::new();
        block_on(async {
            RecordStore::<FinanceRecord>::create(&store, FinanceRecord::new(code("EMP001")))
                .await
                .unwrap();
            assert!(store.is_registered(&code("EMP001")).await.unwrap());
            assert_eq!(
                store.groups_for(&code("EMP001")).await.unwrap(),
                vec![RecordGroup::Finance]
            );
        });
    }

    #[test]
    fn duplicate_login_email_is_rejected_even_under_a_new_code() {
        let store = InMemoryWorkforceStore::new();
        block_on(async {
            let first = ProfessionalRecord::new(code("EMP001"), "asha@co.com", Secret::new("pw"));
            let second = ProfessionalRecord::new(code("EMP002"), "asha@co.com", Secret::new("pw"));
            RecordStore::<ProfessionalRecord>::create(&store, first).await.unwrap();

            let err = RecordStore::<ProfessionalRecord>::create(&store, second)
                .await
                .unwrap_err();
            assert_eq!(
                err.domain(),
                Some(&DomainError::duplicate_login_email("asha@co.com"))
            );
            // The losing code was never claimed.
            assert!(!store.is_registered(&code("EMP002")).await.unwrap());
        });
    }

    #[test]
    fn project_ids_are_sequential() {
        let store = InMemoryWorkforceStore::new();
        block_on(async {
            let a = store.create_project(NewProject::new("A")).await.unwrap();
            let b = store.create_project(NewProject::new("B")).await.unwrap();
            assert_eq!(a.project.project.id, ProjectId(1));
            assert_eq!(b.project.project.id, ProjectId(2));
            assert!(store.get_project(ProjectId(3)).await.unwrap_err().is_not_found());
        });
    }

    #[test]
    fn repeated_member_key_becomes_a_single_edge() {
        let store = InMemoryWorkforceStore::new();
        block_on(async {
            let asha = PersonalRecord::new(code("EMP001"), "Asha");
            RecordStore::<PersonalRecord>::create(&store, asha).await.unwrap();

            // Straight to the graph, skipping the directory's validation.
            let project = NewProject::new("X").with_members([
                code("EMP001"),
                code("EMP001"),
                code("NOPE01"),
                code("NOPE01"),
            ]);
            let created = store.create_project(project).await.unwrap();
            assert_eq!(created.project.assigned_employee_ids, vec![code("EMP001")]);
            assert_eq!(created.dropped_member_keys, vec![code("NOPE01")]);

            let eager = store.list_projects(MemberFetch::Eager).await.unwrap();
            let per_project = store.list_projects(MemberFetch::PerProject).await.unwrap();
            assert_eq!(eager, per_project);
            assert_eq!(
                store.get_project(created.project.project.id).await.unwrap().assigned_employee_ids,
                vec![code("EMP001")]
            );
        });
    }

    #[test]
    fn upserting_an_admin_replaces_the_secret() {
        let store = InMemoryWorkforceStore::new();
        block_on(async {
            let first = AdminAccount::new("root@co.com", Secret::new("old")).unwrap();
            let second = AdminAccount::new("ROOT@co.com", Secret::new("new")).unwrap();
            store.upsert_admin(first).await.unwrap();
            store.upsert_admin(second.clone()).await.unwrap();

            assert_eq!(store.find_admin_by_email("root@co.com").await.unwrap(), Some(second));
            assert_eq!(store.find_admin_by_email("other@co.com").await.unwrap(), None);
        });
    }

    #[test]
    fn exists_is_scoped_to_one_group() {
        let store = InMemoryWorkforceStore::new();
        block_on(async {
            RecordStore::<FinanceRecord>::create(&store, FinanceRecord::new(code("EMP001")))
                .await
                .unwrap();
            assert!(RecordStore::<FinanceRecord>::exists(&store, &code("EMP001")).await.unwrap());
            assert!(!RecordStore::<PersonalRecord>::exists(&store, &code("EMP001")).await.unwrap());
            assert!(!RecordStore::<FinanceRecord>::exists(&store, &code("EMP002")).await.unwrap());
        });
    }
}

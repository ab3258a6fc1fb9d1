//! Employee directory: the application-level entry point over the stores.
//!
//! The directory validates input before any store call, composes the three
//! record groups into one view, and links employees to projects. It holds
//! trait objects only, so the same code runs against the in-memory and the
//! Postgres backend.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use workforce_core::{DomainError, EmploymentCode, RecordGroup};
use workforce_employees::{
    EmployeeRecord, EmployeeView, FinanceRecord, PersonalRecord, ProfessionalProfile,
    ProfessionalRecord,
};
use workforce_projects::{CreatedProject, MemberFetch, NewProject, ProjectId, ProjectView};

use crate::error::{StoreError, absent_if_not_found};
use crate::store::{
    IdentityRegistry, InMemoryWorkforceStore, ProfessionalStore, ProjectGraph, RecordStore,
    WorkforceStore,
};

/// Attempts at drawing an unused random code before giving up.
const CODE_ALLOCATION_ATTEMPTS: usize = 16;

/// One employee's records plus every project they are assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeeOverview {
    pub employee: EmployeeView,
    pub projects: Vec<ProjectView>,
}

#[derive(Clone)]
pub struct EmployeeDirectory {
    registry: Arc<dyn IdentityRegistry>,
    personal: Arc<dyn RecordStore<PersonalRecord>>,
    professional: Arc<dyn ProfessionalStore>,
    finance: Arc<dyn RecordStore<FinanceRecord>>,
    projects: Arc<dyn ProjectGraph>,
}

impl core::fmt::Debug for EmployeeDirectory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EmployeeDirectory").finish_non_exhaustive()
    }
}

impl EmployeeDirectory {
    /// Build a directory whose every store is backed by `store`.
    pub fn from_store<S: WorkforceStore + 'static>(store: Arc<S>) -> Self {
        Self {
            registry: store.clone(),
            personal: store.clone(),
            professional: store.clone(),
            finance: store.clone(),
            projects: store,
        }
    }

    pub fn in_memory() -> Self {
        Self::from_store(Arc::new(InMemoryWorkforceStore::new()))
    }

    /// The professional store, shared with [`crate::login::EmployeeLogin`].
    pub fn professional_store(&self) -> Arc<dyn ProfessionalStore> {
        self.professional.clone()
    }

    /// Draw random codes until one is unclaimed, and claim it.
    ///
    /// Gives up with `Conflict` on the last drawn code after a bounded number
    /// of collisions.
    pub async fn allocate_code(&self) -> Result<EmploymentCode, StoreError> {
        let mut code = EmploymentCode::generate();
        for attempt in 1..=CODE_ALLOCATION_ATTEMPTS {
            if self.registry.claim(&code).await? {
                debug!(employment_code = %code, attempt, "allocated employment code");
                return Ok(code);
            }
            if attempt < CODE_ALLOCATION_ATTEMPTS {
                code = EmploymentCode::generate();
            }
        }
        warn!(
            attempts = CODE_ALLOCATION_ATTEMPTS,
            "no unused employment code found"
        );
        Err(DomainError::duplicate_code(RecordGroup::Personal, code).into())
    }

    // ---------------------------------------------------------------------
    // Record groups
    // ---------------------------------------------------------------------

    pub async fn create_personal(&self, record: PersonalRecord) -> Result<PersonalRecord, StoreError> {
        let record = record.validated()?;
        let created = self.personal.create(record).await?;
        log_created(&created);
        Ok(created)
    }

    /// Personal intake without a caller-chosen key.
    ///
    /// The record is validated first; only then is a fresh code allocated and
    /// written over `record.employment_code`.
    pub async fn create_personal_with_generated_code(
        &self,
        record: PersonalRecord,
    ) -> Result<PersonalRecord, StoreError> {
        let mut record = record.validated()?;
        record.employment_code = self.allocate_code().await?;
        let created = self.personal.create(record).await?;
        log_created(&created);
        Ok(created)
    }

    pub async fn get_personal(&self, code: &EmploymentCode) -> Result<PersonalRecord, StoreError> {
        self.personal.get_by_key(code).await
    }

    pub async fn list_personal(&self) -> Result<Vec<PersonalRecord>, StoreError> {
        self.personal.list_all().await
    }

    pub async fn create_professional(
        &self,
        record: ProfessionalRecord,
    ) -> Result<ProfessionalProfile, StoreError> {
        let record = record.validated()?;
        let created = self.professional.create(record).await?;
        log_created(&created);
        Ok(created.profile())
    }

    pub async fn get_professional(
        &self,
        code: &EmploymentCode,
    ) -> Result<ProfessionalProfile, StoreError> {
        Ok(self.professional.get_by_key(code).await?.profile())
    }

    pub async fn list_professional(&self) -> Result<Vec<ProfessionalProfile>, StoreError> {
        let records = self.professional.list_all().await?;
        Ok(records.iter().map(ProfessionalRecord::profile).collect())
    }

    pub async fn find_professional_by_login_email(
        &self,
        login_email: &str,
    ) -> Result<Option<ProfessionalProfile>, StoreError> {
        let email = workforce_auth::normalize_login_email(login_email).map_err(DomainError::from)?;
        let record = self.professional.find_by_login_email(&email).await?;
        Ok(record.as_ref().map(ProfessionalRecord::profile))
    }

    pub async fn create_finance(&self, record: FinanceRecord) -> Result<FinanceRecord, StoreError> {
        let record = record.validated()?;
        let created = self.finance.create(record).await?;
        log_created(&created);
        Ok(created)
    }

    pub async fn get_finance(&self, code: &EmploymentCode) -> Result<FinanceRecord, StoreError> {
        self.finance.get_by_key(code).await
    }

    pub async fn list_finance(&self) -> Result<Vec<FinanceRecord>, StoreError> {
        self.finance.list_all().await
    }

    // ---------------------------------------------------------------------
    // Aggregated views
    // ---------------------------------------------------------------------

    /// Every group held for `code`, each optional.
    ///
    /// A missing group is not an error. A code the registry has never seen is.
    pub async fn get_full_employee_view(
        &self,
        code: &EmploymentCode,
    ) -> Result<EmployeeView, StoreError> {
        if !self.registry.is_registered(code).await? {
            return Err(DomainError::not_found("employee", code).into());
        }

        let (personal, professional, finance) = tokio::join!(
            self.personal.get_by_key(code),
            self.professional.get_by_key(code),
            self.finance.get_by_key(code),
        );

        Ok(EmployeeView {
            employment_code: code.clone(),
            personal: absent_if_not_found(personal)?,
            professional: absent_if_not_found(professional)?.map(|p| p.profile()),
            finance: absent_if_not_found(finance)?,
        })
    }

    /// Views for every registered code holding at least one record, in
    /// registration order.
    pub async fn list_employees(&self) -> Result<Vec<EmployeeView>, StoreError> {
        let codes = self.registry.registered_codes().await?;
        let mut personal = by_code(self.personal.list_all().await?);
        let mut professional = by_code(self.professional.list_all().await?);
        let mut finance = by_code(self.finance.list_all().await?);

        let views = codes
            .into_iter()
            .map(|code| EmployeeView {
                personal: personal.remove(&code),
                professional: professional.remove(&code).map(|p| p.profile()),
                finance: finance.remove(&code),
                employment_code: code,
            })
            .filter(|view| view.missing_groups().len() < RecordGroup::ALL.len())
            .collect();
        Ok(views)
    }

    pub async fn employee_overview(
        &self,
        code: &EmploymentCode,
    ) -> Result<EmployeeOverview, StoreError> {
        let employee = self.get_full_employee_view(code).await?;
        let projects = self.projects.list_for_member(code).await?;
        Ok(EmployeeOverview { employee, projects })
    }

    // ---------------------------------------------------------------------
    // Projects
    // ---------------------------------------------------------------------

    pub async fn create_project(&self, project: NewProject) -> Result<CreatedProject, StoreError> {
        let project = project.validated()?;
        let created = self.projects.create_project(project).await?;

        if !created.dropped_member_keys.is_empty() {
            let dropped: Vec<&str> = created
                .dropped_member_keys
                .iter()
                .map(EmploymentCode::as_str)
                .collect();
            warn!(
                project_id = %created.project.project.id,
                dropped = ?dropped,
                "member keys without a personal record were not assigned"
            );
        }
        info!(
            project_id = %created.project.project.id,
            members = created.project.assigned_employee_ids.len(),
            "project created"
        );
        Ok(created)
    }

    pub async fn get_project(&self, id: ProjectId) -> Result<ProjectView, StoreError> {
        self.projects.get_project(id).await
    }

    pub async fn list_projects_for_member(
        &self,
        code: &EmploymentCode,
    ) -> Result<Vec<ProjectView>, StoreError> {
        self.projects.list_for_member(code).await
    }

    pub async fn list_projects(&self) -> Result<Vec<ProjectView>, StoreError> {
        self.list_projects_with(MemberFetch::default()).await
    }

    pub async fn list_projects_with(&self, fetch: MemberFetch) -> Result<Vec<ProjectView>, StoreError> {
        self.projects.list_projects(fetch).await
    }
}

fn log_created<R: EmployeeRecord>(record: &R) {
    let group = R::GROUP;
    info!(
        group = %group,
        employment_code = %record.employment_code(),
        "record created"
    );
}

fn by_code<R: EmployeeRecord>(records: Vec<R>) -> HashMap<EmploymentCode, R> {
    records
        .into_iter()
        .map(|r| (r.employment_code().clone(), r))
        .collect()
}

use workforce_auth::AdminAccount;
use workforce_core::{DomainError, EmploymentCode, RecordGroup};
use workforce_employees::{EmployeeRecord, FinanceRecord, PersonalRecord, ProfessionalRecord};
use workforce_projects::{CreatedProject, MemberFetch, NewProject, ProjectId, ProjectView};

use crate::error::StoreError;

/// Central registry of employment codes.
///
/// Every record-group row references a registry entry, so "does this key exist
/// anywhere" has one answer regardless of which groups were populated first.
#[async_trait::async_trait]
pub trait IdentityRegistry: Send + Sync {
    /// Register a code. Returns `true` if it was new, `false` if already present.
    async fn claim(&self, code: &EmploymentCode) -> Result<bool, StoreError>;

    async fn is_registered(&self, code: &EmploymentCode) -> Result<bool, StoreError>;

    /// Record groups currently holding a row for `code`.
    async fn groups_for(&self, code: &EmploymentCode) -> Result<Vec<RecordGroup>, StoreError>;

    /// Every registered code, in registration order.
    async fn registered_codes(&self) -> Result<Vec<EmploymentCode>, StoreError>;
}

/// One record group keyed by employment code.
///
/// ## Create semantics
///
/// `create()`:
/// - claims the code in the identity registry (idempotent)
/// - rejects a second row for the same code with `Conflict`
/// - for groups with a login email, rejects a second row for the same email
/// - inserts the row
///
/// The existence pre-check only produces a friendlier error. The storage-level
/// unique constraint (or the write lock held across check and insert) is what
/// guarantees that of two racing creators exactly one wins.
///
/// Records must already be `validated()`; the directory does that before any
/// store call.
#[async_trait::async_trait]
pub trait RecordStore<R: EmployeeRecord>: Send + Sync {
    async fn create(&self, record: R) -> Result<R, StoreError>;

    async fn find_by_key(&self, code: &EmploymentCode) -> Result<Option<R>, StoreError>;

    async fn exists(&self, code: &EmploymentCode) -> Result<bool, StoreError>;

    /// Every record in the group, in insertion order.
    async fn list_all(&self) -> Result<Vec<R>, StoreError>;

    async fn get_by_key(&self, code: &EmploymentCode) -> Result<R, StoreError> {
        self.find_by_key(code)
            .await?
            .ok_or_else(|| DomainError::record_not_found(R::GROUP, code).into())
    }
}

/// Professional group plus the login-email lookup used by authentication.
#[async_trait::async_trait]
pub trait ProfessionalStore: RecordStore<ProfessionalRecord> {
    /// Look up by normalized login email.
    async fn find_by_login_email(
        &self,
        login_email: &str,
    ) -> Result<Option<ProfessionalRecord>, StoreError>;
}

/// Administrator accounts, keyed by normalized email.
#[async_trait::async_trait]
pub trait AdminStore: Send + Sync {
    /// Insert the account, or replace the secret of an existing one.
    async fn upsert_admin(&self, account: AdminAccount) -> Result<(), StoreError>;

    async fn find_admin_by_email(&self, email: &str) -> Result<Option<AdminAccount>, StoreError>;
}

/// Many-to-many assignment graph between projects and personal records.
#[async_trait::async_trait]
pub trait ProjectGraph: Send + Sync {
    /// Persist a project and its edges in one unit.
    ///
    /// Repeated member keys collapse to one edge. Member keys without a
    /// personal record are left out of the edge set and reported once in
    /// `dropped_member_keys`.
    async fn create_project(&self, project: NewProject) -> Result<CreatedProject, StoreError>;

    async fn get_project(&self, id: ProjectId) -> Result<ProjectView, StoreError>;

    /// Projects whose edge set includes `code`, each with its full member list.
    async fn list_for_member(&self, code: &EmploymentCode) -> Result<Vec<ProjectView>, StoreError>;

    /// Every project with its member list, resolved as `fetch` says.
    async fn list_projects(&self, fetch: MemberFetch) -> Result<Vec<ProjectView>, StoreError>;
}

/// Every store the services need, implemented by one backend.
pub trait WorkforceStore:
    IdentityRegistry
    + RecordStore<PersonalRecord>
    + ProfessionalStore
    + RecordStore<FinanceRecord>
    + ProjectGraph
    + AdminStore
{
}

impl<S> WorkforceStore for S where
    S: IdentityRegistry
        + RecordStore<PersonalRecord>
        + ProfessionalStore
        + RecordStore<FinanceRecord>
        + ProjectGraph
        + AdminStore
{
}

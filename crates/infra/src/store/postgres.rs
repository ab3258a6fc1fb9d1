//! Postgres-backed record stores, identity registry and project graph.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError | Scenario |
//! |------------|----------------------|------------|----------|
//! | Database (unique violation) | `23505` | `Domain(Conflict)` | Racing creators for the same code or login email |
//! | Database (foreign key violation) | `23503` | `Domain(Validation)` | Row references an unregistered code |
//! | Database (check constraint violation) | `23514` | `Domain(Validation)` | Malformed code, status or progress |
//! | Database (other) | Any other | `Backend` | Other database errors |
//! | PoolClosed / other | N/A | `Backend` | Network errors, connection failures, etc. |
//!
//! ## Uniqueness
//!
//! `create()` runs an existence pre-check inside its transaction to produce a
//! precise conflict error, but the pre-check alone cannot stop two concurrent
//! transactions from both passing it. The `UNIQUE` constraints on
//! `employment_code` (and `login_email`) are what decide the winner; the loser's
//! `23505` is mapped back to the same conflict error.

use std::collections::HashSet;
use std::sync::Arc;

use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool, Postgres};
use tracing::instrument;

use workforce_auth::AdminAccount;
use workforce_core::{DomainError, EmploymentCode, RecordGroup};
use workforce_employees::{EmployeeRecord, FinanceRecord, PersonalRecord, ProfessionalRecord};
use workforce_projects::{
    CreatedProject, MemberFetch, NewProject, Project, ProjectId, ProjectView, assemble_views,
};

use super::r#trait::{AdminStore, IdentityRegistry, ProfessionalStore, ProjectGraph, RecordStore};
use super::rows::{AdminRow, FinanceRow, PersonalRow, ProfessionalRow, ProjectMemberRow, ProjectRow};
use crate::error::StoreError;

const PROJECT_COLUMNS: &str = "p.id, p.title, p.description, p.status, p.deadline, p.progress";

/// Per-group SQL and row mapping.
trait PgGroup: EmployeeRecord {
    type Row: for<'r> FromRow<'r, PgRow> + Send + Unpin;

    const COLUMNS: &'static str;

    fn insert_query(&self) -> Query<'_, Postgres, PgArguments>;

    fn from_stored(row: Self::Row) -> Result<Self, StoreError>;
}

impl PgGroup for PersonalRecord {
    type Row = PersonalRow;

    const COLUMNS: &'static str = "employment_code, full_name, date_of_birth, gender, age, \
         current_address, permanent_address, contact";

    fn insert_query(&self) -> Query<'_, Postgres, PgArguments> {
        sqlx::query(
            r#"
            INSERT INTO employee_personal_records (
                employment_code, full_name, date_of_birth, gender, age,
                current_address, permanent_address, contact
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(self.employment_code.as_str())
        .bind(self.full_name.as_str())
        .bind(self.date_of_birth)
        .bind(self.gender.as_deref())
        .bind(self.age.map(i32::from))
        .bind(Json(&self.current_address))
        .bind(Json(&self.permanent_address))
        .bind(Json(&self.contact))
    }

    fn from_stored(row: PersonalRow) -> Result<Self, StoreError> {
        Self::try_from(row)
    }
}

impl PgGroup for ProfessionalRecord {
    type Row = ProfessionalRow;

    const COLUMNS: &'static str = "employment_code, login_email, secret, office_phone, \
         office_address, reporting_manager_code, reporting_manager_email, hr_name, \
         employment_history, date_of_joining";

    fn insert_query(&self) -> Query<'_, Postgres, PgArguments> {
        sqlx::query(
            r#"
            INSERT INTO employee_professional_records (
                employment_code, login_email, secret, office_phone, office_address,
                reporting_manager_code, reporting_manager_email, hr_name,
                employment_history, date_of_joining
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(self.employment_code.as_str())
        .bind(self.login_email.as_str())
        .bind(self.secret.expose())
        .bind(self.office_phone.as_deref())
        .bind(Json(&self.office_address))
        .bind(self.reporting_manager_code.as_ref().map(EmploymentCode::as_str))
        .bind(self.reporting_manager_email.as_deref())
        .bind(self.hr_name.as_deref())
        .bind(self.employment_history.as_deref())
        .bind(self.date_of_joining)
    }

    fn from_stored(row: ProfessionalRow) -> Result<Self, StoreError> {
        Self::try_from(row)
    }
}

impl PgGroup for FinanceRecord {
    type Row = FinanceRow;

    const COLUMNS: &'static str = "employment_code, pan, aadhaar, bank, ctc_breakup";

    fn insert_query(&self) -> Query<'_, Postgres, PgArguments> {
        sqlx::query(
            r#"
            INSERT INTO employee_finance_records (
                employment_code, pan, aadhaar, bank, ctc_breakup
            )
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(self.employment_code.as_str())
        .bind(self.pan.as_deref())
        .bind(self.aadhaar.as_deref())
        .bind(Json(&self.bank))
        .bind(self.ctc_breakup.as_deref())
    }

    fn from_stored(row: FinanceRow) -> Result<Self, StoreError> {
        Self::try_from(row)
    }
}

/// Postgres-backed store for every record group, the identity registry and
/// the project graph.
///
/// Schema lives in `crates/infra/migrations`; call [`PostgresWorkforceStore::migrate`]
/// once at startup (or run the migrations out of band).
#[derive(Debug, Clone)]
pub struct PostgresWorkforceStore {
    pool: Arc<PgPool>,
}

impl PostgresWorkforceStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Apply the embedded schema migrations.
    #[instrument(skip(self), err)]
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations")
            .run(&*self.pool)
            .await
            .map_err(|e| StoreError::backend("migrate", e.to_string()))
    }

    #[instrument(
        skip(self, record),
        fields(group = %R::GROUP, employment_code = %record.employment_code()),
        err
    )]
    async fn create_record<R: PgGroup>(&self, record: R) -> Result<R, StoreError> {
        let code = record.employment_code().as_str();
        let table = R::GROUP.table();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("create", e))?;

        sqlx::query(
            "INSERT INTO employee_identities (employment_code) VALUES ($1) ON CONFLICT DO NOTHING",
        )
        .bind(code)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("create", e))?;

        let sql = format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE employment_code = $1)");
        let taken: bool = sqlx::query_scalar(&sql)
            .bind(code)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("create", e))?;
        if taken {
            return Err(DomainError::duplicate_code(R::GROUP, code).into());
        }

        if let Some(email) = record.login_email() {
            let sql = format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE login_email = $1)");
            let taken: bool = sqlx::query_scalar(&sql)
                .bind(email)
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| map_sqlx_error("create", e))?;
            if taken {
                return Err(DomainError::duplicate_login_email(email).into());
            }
        }

        record
            .insert_query()
            .execute(&mut *tx)
            .await
            .map_err(|e| map_insert_error(e, &record))?;

        tx.commit()
            .await
            .map_err(|e| map_insert_error(e, &record))?;

        Ok(record)
    }

    #[instrument(skip(self), fields(group = %R::GROUP), err)]
    async fn find_record<R: PgGroup>(&self, code: &EmploymentCode) -> Result<Option<R>, StoreError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE employment_code = $1",
            R::COLUMNS,
            R::GROUP.table()
        );
        let row = sqlx::query(&sql)
            .bind(code.as_str())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_by_key", e))?;

        row.map(|row| decode_row::<R>("find_by_key", &row))
            .transpose()
    }

    async fn record_exists(&self, group: RecordGroup, code: &EmploymentCode) -> Result<bool, StoreError> {
        let sql = format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE employment_code = $1)",
            group.table()
        );
        sqlx::query_scalar(&sql)
            .bind(code.as_str())
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("exists", e))
    }

    #[instrument(skip(self), fields(group = %R::GROUP), err)]
    async fn list_records<R: PgGroup>(&self) -> Result<Vec<R>, StoreError> {
        let sql = format!(
            "SELECT {} FROM {} ORDER BY id ASC",
            R::COLUMNS,
            R::GROUP.table()
        );
        let rows = sqlx::query(&sql)
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_all", e))?;

        rows.iter().map(|row| decode_row::<R>("list_all", row)).collect()
    }

    async fn members_of(&self, id: ProjectId) -> Result<Vec<EmploymentCode>, StoreError> {
        let codes: Vec<String> = sqlx::query_scalar(
            "SELECT employment_code FROM project_members WHERE project_id = $1 ORDER BY position ASC",
        )
        .bind(id.0)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("members_of", e))?;

        codes
            .iter()
            .map(|raw| {
                EmploymentCode::parse(raw).map_err(|e| {
                    StoreError::backend("members_of", format!("stored employment code `{raw}`: {e}"))
                })
            })
            .collect()
    }

    async fn joined_views(
        &self,
        operation: &'static str,
        query: Query<'_, Postgres, PgArguments>,
    ) -> Result<Vec<ProjectView>, StoreError> {
        let rows = query
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error(operation, e))?;

        let mut pairs = Vec::with_capacity(rows.len());
        for row in &rows {
            let joined = ProjectMemberRow::from_row(row).map_err(|e| {
                StoreError::backend(operation, format!("failed to decode project row: {e}"))
            })?;
            pairs.push(joined.into_pair()?);
        }
        Ok(assemble_views(pairs))
    }
}

fn decode_row<R: PgGroup>(operation: &'static str, row: &PgRow) -> Result<R, StoreError> {
    let decoded = R::Row::from_row(row).map_err(|e| {
        StoreError::backend(operation, format!("failed to decode {} row: {e}", R::GROUP))
    })?;
    R::from_stored(decoded)
}

fn decode_project(operation: &'static str, row: &PgRow) -> Result<Project, StoreError> {
    let decoded = ProjectRow::from_row(row).map_err(|e| {
        StoreError::backend(operation, format!("failed to decode project row: {e}"))
    })?;
    Project::try_from(decoded)
}

macro_rules! impl_postgres_record_store {
    ($record:ty) => {
        #[async_trait::async_trait]
        impl RecordStore<$record> for PostgresWorkforceStore {
            async fn create(&self, record: $record) -> Result<$record, StoreError> {
                self.create_record(record).await
            }

            async fn find_by_key(
                &self,
                code: &EmploymentCode,
            ) -> Result<Option<$record>, StoreError> {
                self.find_record(code).await
            }

            async fn exists(&self, code: &EmploymentCode) -> Result<bool, StoreError> {
                self.record_exists(<$record as EmployeeRecord>::GROUP, code).await
            }

            async fn list_all(&self) -> Result<Vec<$record>, StoreError> {
                self.list_records().await
            }
        }
    };
}

impl_postgres_record_store!(PersonalRecord);
impl_postgres_record_store!(ProfessionalRecord);
impl_postgres_record_store!(FinanceRecord);

#[async_trait::async_trait]
impl ProfessionalStore for PostgresWorkforceStore {
    #[instrument(skip(self, login_email), err)]
    async fn find_by_login_email(
        &self,
        login_email: &str,
    ) -> Result<Option<ProfessionalRecord>, StoreError> {
        let sql = format!(
            "SELECT {} FROM employee_professional_records WHERE login_email = $1",
            <ProfessionalRecord as PgGroup>::COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(login_email)
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_by_login_email", e))?;

        row.map(|row| decode_row::<ProfessionalRecord>("find_by_login_email", &row))
            .transpose()
    }
}

#[async_trait::async_trait]
impl AdminStore for PostgresWorkforceStore {
    #[instrument(skip(self, account), err)]
    async fn upsert_admin(&self, account: AdminAccount) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO admin_accounts (email, secret)
            VALUES ($1, $2)
            ON CONFLICT (email) DO UPDATE SET secret = EXCLUDED.secret, updated_at = now()
            "#,
        )
        .bind(account.email())
        .bind(account.secret().expose())
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("upsert_admin", e))?;
        Ok(())
    }

    #[instrument(skip(self, email), err)]
    async fn find_admin_by_email(&self, email: &str) -> Result<Option<AdminAccount>, StoreError> {
        let row = sqlx::query_as::<_, AdminRow>(
            "SELECT email, secret FROM admin_accounts WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_admin_by_email", e))?;

        row.map(AdminAccount::try_from).transpose()
    }
}

#[async_trait::async_trait]
impl IdentityRegistry for PostgresWorkforceStore {
    async fn claim(&self, code: &EmploymentCode) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "INSERT INTO employee_identities (employment_code) VALUES ($1) ON CONFLICT DO NOTHING",
        )
        .bind(code.as_str())
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("claim", e))?;
        Ok(result.rows_affected() == 1)
    }

    async fn is_registered(&self, code: &EmploymentCode) -> Result<bool, StoreError> {
        sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM employee_identities WHERE employment_code = $1)",
        )
        .bind(code.as_str())
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("is_registered", e))
    }

    async fn groups_for(&self, code: &EmploymentCode) -> Result<Vec<RecordGroup>, StoreError> {
        let (personal, professional, finance): (bool, bool, bool) = sqlx::query_as(
            r#"
            SELECT
                EXISTS(SELECT 1 FROM employee_personal_records WHERE employment_code = $1),
                EXISTS(SELECT 1 FROM employee_professional_records WHERE employment_code = $1),
                EXISTS(SELECT 1 FROM employee_finance_records WHERE employment_code = $1)
            "#,
        )
        .bind(code.as_str())
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("groups_for", e))?;

        Ok(RecordGroup::ALL
            .into_iter()
            .zip([personal, professional, finance])
            .filter_map(|(group, present)| present.then_some(group))
            .collect())
    }

    async fn registered_codes(&self) -> Result<Vec<EmploymentCode>, StoreError> {
        let codes: Vec<String> = sqlx::query_scalar(
            "SELECT employment_code FROM employee_identities ORDER BY registered_at ASC, employment_code ASC",
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("registered_codes", e))?;

        codes
            .iter()
            .map(|raw| {
                EmploymentCode::parse(raw).map_err(|e| {
                    StoreError::backend("registered_codes", format!("stored employment code `{raw}`: {e}"))
                })
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl ProjectGraph for PostgresWorkforceStore {
    #[instrument(skip(self, project), fields(title = %project.title), err)]
    async fn create_project(&self, project: NewProject) -> Result<CreatedProject, StoreError> {
        let project = project.with_distinct_members();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("create_project", e))?;

        let row = sqlx::query(
            r#"
            INSERT INTO projects AS p (title, description, status, deadline, progress)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING p.id, p.title, p.description, p.status, p.deadline, p.progress
            "#,
        )
        .bind(project.title.as_str())
        .bind(project.description.as_deref())
        .bind(project.status.as_str())
        .bind(project.deadline)
        .bind(i32::from(project.progress))
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("create_project", e))?;
        let stored = decode_project("create_project", &row)?;

        let requested: Vec<String> = project
            .member_keys
            .iter()
            .map(|code| code.as_str().to_string())
            .collect();
        let known: HashSet<String> = sqlx::query_scalar::<_, String>(
            "SELECT employment_code FROM employee_personal_records WHERE employment_code = ANY($1)",
        )
        .bind(&requested)
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("create_project", e))?
        .into_iter()
        .collect();

        let (members, dropped): (Vec<_>, Vec<_>) = project
            .member_keys
            .into_iter()
            .partition(|code| known.contains(code.as_str()));

        if !members.is_empty() {
            let member_codes: Vec<String> =
                members.iter().map(|code| code.as_str().to_string()).collect();
            sqlx::query(
                r#"
                INSERT INTO project_members (project_id, employment_code, position)
                SELECT $1, t.code, t.ord
                FROM unnest($2::varchar[]) WITH ORDINALITY AS t(code, ord)
                "#,
            )
            .bind(stored.id.0)
            .bind(&member_codes)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("create_project", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("create_project", e))?;

        Ok(CreatedProject {
            project: ProjectView {
                project: stored,
                assigned_employee_ids: members,
            },
            dropped_member_keys: dropped,
        })
    }

    #[instrument(skip(self), fields(project_id = %id), err)]
    async fn get_project(&self, id: ProjectId) -> Result<ProjectView, StoreError> {
        let sql = format!("SELECT {PROJECT_COLUMNS} FROM projects p WHERE p.id = $1");
        let row = sqlx::query(&sql)
            .bind(id.0)
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_project", e))?
            .ok_or_else(|| DomainError::not_found("project", id))?;

        Ok(ProjectView {
            project: decode_project("get_project", &row)?,
            assigned_employee_ids: self.members_of(id).await?,
        })
    }

    #[instrument(skip(self), fields(employment_code = %code), err)]
    async fn list_for_member(&self, code: &EmploymentCode) -> Result<Vec<ProjectView>, StoreError> {
        let sql = format!(
            r#"
            SELECT {PROJECT_COLUMNS}, m.employment_code AS member_code
            FROM projects p
            LEFT JOIN project_members m ON m.project_id = p.id
            WHERE p.id IN (SELECT project_id FROM project_members WHERE employment_code = $1)
            ORDER BY p.id ASC, m.position ASC
            "#
        );
        self.joined_views("list_for_member", sqlx::query(&sql).bind(code.as_str()))
            .await
    }

    #[instrument(skip(self), err)]
    async fn list_projects(&self, fetch: MemberFetch) -> Result<Vec<ProjectView>, StoreError> {
        match fetch {
            MemberFetch::Eager => {
                let sql = format!(
                    r#"
                    SELECT {PROJECT_COLUMNS}, m.employment_code AS member_code
                    FROM projects p
                    LEFT JOIN project_members m ON m.project_id = p.id
                    ORDER BY p.id ASC, m.position ASC
                    "#
                );
                self.joined_views("list_projects", sqlx::query(&sql)).await
            }
            MemberFetch::PerProject => {
                let sql = format!("SELECT {PROJECT_COLUMNS} FROM projects p ORDER BY p.id ASC");
                let rows = sqlx::query(&sql)
                    .fetch_all(&*self.pool)
                    .await
                    .map_err(|e| map_sqlx_error("list_projects", e))?;

                let mut views = Vec::with_capacity(rows.len());
                for row in &rows {
                    let project = decode_project("list_projects", row)?;
                    let assigned_employee_ids = self.members_of(project.id).await?;
                    views.push(ProjectView {
                        project,
                        assigned_employee_ids,
                    });
                }
                Ok(views)
            }
        }
    }
}

/// Map a failed group insert, turning unique violations into the matching conflict.
fn map_insert_error<R: EmployeeRecord>(err: sqlx::Error, record: &R) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some("23505") {
            let conflict = match (db_err.constraint(), record.login_email()) {
                (Some(constraint), Some(email)) if constraint.ends_with("login_email_key") => {
                    DomainError::duplicate_login_email(email)
                }
                _ => DomainError::duplicate_code(R::GROUP, record.employment_code()),
            };
            return conflict.into();
        }
    }
    map_sqlx_error("create", err)
}

/// Map SQLx errors to `StoreError`.
fn map_sqlx_error(operation: &'static str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code().as_deref() {
                // Foreign key or check constraint: the caller sent something the schema rejects.
                Some("23503") | Some("23514") => DomainError::validation(msg).into(),
                _ => StoreError::backend(operation, msg),
            }
        }
        sqlx::Error::PoolClosed => StoreError::backend(operation, "connection pool closed"),
        _ => StoreError::backend(operation, err.to_string()),
    }
}

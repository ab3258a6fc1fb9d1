//! SQLx row types and their conversion into domain records.

use chrono::NaiveDate;
use sqlx::{FromRow, Row};
use sqlx::postgres::PgRow;
use sqlx::types::Json;

use workforce_auth::{AdminAccount, Secret};
use workforce_core::EmploymentCode;
use workforce_employees::{
    Address, BankDetails, FinanceRecord, PersonalContact, PersonalRecord, ProfessionalRecord,
};
use workforce_projects::{Progress, Project, ProjectId, ProjectStatus};

use crate::error::StoreError;

fn parse_code(operation: &'static str, raw: &str) -> Result<EmploymentCode, StoreError> {
    EmploymentCode::parse(raw)
        .map_err(|e| StoreError::backend(operation, format!("stored employment code `{raw}`: {e}")))
}

#[derive(Debug)]
pub(crate) struct PersonalRow {
    employment_code: String,
    full_name: String,
    date_of_birth: Option<NaiveDate>,
    gender: Option<String>,
    age: Option<i32>,
    current_address: Json<Address>,
    permanent_address: Json<Address>,
    contact: Json<PersonalContact>,
}

impl<'r> FromRow<'r, PgRow> for PersonalRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(PersonalRow {
            employment_code: row.try_get("employment_code")?,
            full_name: row.try_get("full_name")?,
            date_of_birth: row.try_get("date_of_birth")?,
            gender: row.try_get("gender")?,
            age: row.try_get("age")?,
            current_address: row.try_get("current_address")?,
            permanent_address: row.try_get("permanent_address")?,
            contact: row.try_get("contact")?,
        })
    }
}

impl TryFrom<PersonalRow> for PersonalRecord {
    type Error = StoreError;

    fn try_from(row: PersonalRow) -> Result<Self, Self::Error> {
        let age = row
            .age
            .map(u16::try_from)
            .transpose()
            .map_err(|e| StoreError::backend("personal_row", format!("stored age: {e}")))?;
        Ok(PersonalRecord {
            employment_code: parse_code("personal_row", &row.employment_code)?,
            full_name: row.full_name,
            date_of_birth: row.date_of_birth,
            gender: row.gender,
            age,
            current_address: row.current_address.0,
            permanent_address: row.permanent_address.0,
            contact: row.contact.0,
        })
    }
}

#[derive(Debug)]
pub(crate) struct ProfessionalRow {
    employment_code: String,
    login_email: String,
    secret: String,
    office_phone: Option<String>,
    office_address: Json<Address>,
    reporting_manager_code: Option<String>,
    reporting_manager_email: Option<String>,
    hr_name: Option<String>,
    employment_history: Option<String>,
    date_of_joining: Option<NaiveDate>,
}

impl<'r> FromRow<'r, PgRow> for ProfessionalRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(ProfessionalRow {
            employment_code: row.try_get("employment_code")?,
            login_email: row.try_get("login_email")?,
            secret: row.try_get("secret")?,
            office_phone: row.try_get("office_phone")?,
            office_address: row.try_get("office_address")?,
            reporting_manager_code: row.try_get("reporting_manager_code")?,
            reporting_manager_email: row.try_get("reporting_manager_email")?,
            hr_name: row.try_get("hr_name")?,
            employment_history: row.try_get("employment_history")?,
            date_of_joining: row.try_get("date_of_joining")?,
        })
    }
}

impl TryFrom<ProfessionalRow> for ProfessionalRecord {
    type Error = StoreError;

    fn try_from(row: ProfessionalRow) -> Result<Self, Self::Error> {
        let reporting_manager_code = row
            .reporting_manager_code
            .as_deref()
            .map(|raw| parse_code("professional_row", raw))
            .transpose()?;
        Ok(ProfessionalRecord {
            employment_code: parse_code("professional_row", &row.employment_code)?,
            login_email: row.login_email,
            secret: Secret::new(row.secret),
            office_phone: row.office_phone,
            office_address: row.office_address.0,
            reporting_manager_code,
            reporting_manager_email: row.reporting_manager_email,
            hr_name: row.hr_name,
            employment_history: row.employment_history,
            date_of_joining: row.date_of_joining,
        })
    }
}

#[derive(Debug)]
pub(crate) struct FinanceRow {
    employment_code: String,
    pan: Option<String>,
    aadhaar: Option<String>,
    bank: Json<BankDetails>,
    ctc_breakup: Option<String>,
}

impl<'r> FromRow<'r, PgRow> for FinanceRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(FinanceRow {
            employment_code: row.try_get("employment_code")?,
            pan: row.try_get("pan")?,
            aadhaar: row.try_get("aadhaar")?,
            bank: row.try_get("bank")?,
            ctc_breakup: row.try_get("ctc_breakup")?,
        })
    }
}

impl TryFrom<FinanceRow> for FinanceRecord {
    type Error = StoreError;

    fn try_from(row: FinanceRow) -> Result<Self, Self::Error> {
        Ok(FinanceRecord {
            employment_code: parse_code("finance_row", &row.employment_code)?,
            pan: row.pan,
            aadhaar: row.aadhaar,
            bank: row.bank.0,
            ctc_breakup: row.ctc_breakup,
        })
    }
}

#[derive(Debug)]
pub(crate) struct ProjectRow {
    id: i64,
    title: String,
    description: Option<String>,
    status: String,
    deadline: Option<NaiveDate>,
    progress: i32,
}

impl<'r> FromRow<'r, PgRow> for ProjectRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(ProjectRow {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            status: row.try_get("status")?,
            deadline: row.try_get("deadline")?,
            progress: row.try_get("progress")?,
        })
    }
}

impl TryFrom<ProjectRow> for Project {
    type Error = StoreError;

    fn try_from(row: ProjectRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<ProjectStatus>()
            .map_err(|e| StoreError::backend("project_row", format!("stored status: {e}")))?;
        let progress = Progress::new(row.progress)
            .map_err(|e| StoreError::backend("project_row", format!("stored progress: {e}")))?;
        Ok(Project {
            id: ProjectId(row.id),
            title: row.title,
            description: row.description,
            status,
            deadline: row.deadline,
            progress,
        })
    }
}

/// One row of `projects LEFT JOIN project_members`.
#[derive(Debug)]
pub(crate) struct ProjectMemberRow {
    project: ProjectRow,
    member_code: Option<String>,
}

impl<'r> FromRow<'r, PgRow> for ProjectMemberRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(ProjectMemberRow {
            project: ProjectRow::from_row(row)?,
            member_code: row.try_get("member_code")?,
        })
    }
}

impl ProjectMemberRow {
    pub(crate) fn into_pair(self) -> Result<(Project, Option<EmploymentCode>), StoreError> {
        let member = self
            .member_code
            .as_deref()
            .map(|raw| parse_code("project_member_row", raw))
            .transpose()?;
        Ok((Project::try_from(self.project)?, member))
    }
}

#[derive(Debug)]
pub(crate) struct AdminRow {
    email: String,
    secret: String,
}

impl<'r> FromRow<'r, PgRow> for AdminRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(AdminRow {
            email: row.try_get("email")?,
            secret: row.try_get("secret")?,
        })
    }
}

impl TryFrom<AdminRow> for AdminAccount {
    type Error = StoreError;

    fn try_from(row: AdminRow) -> Result<Self, Self::Error> {
        AdminAccount::new(&row.email, Secret::new(row.secret)).map_err(|e| {
            StoreError::backend("admin_row", format!("stored admin `{}`: {e}", row.email))
        })
    }
}

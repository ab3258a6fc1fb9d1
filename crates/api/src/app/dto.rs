//! Request DTOs and their mapping to domain types.
//!
//! Identity keys arrive as plain strings so a malformed key produces the same
//! JSON error body as every other validation failure.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use workforce_auth::Secret;
use workforce_core::{DomainResult, EmploymentCode};
use workforce_employees::{
    Address, BankDetails, FinanceRecord, PersonalContact, PersonalRecord, ProfessionalRecord,
};
use workforce_projects::{MemberFetch, NewProject, Progress, ProjectStatus};

// -------------------------
// Request DTOs
// -------------------------

/// Personal intake. The only intake that may omit the identity key.
#[derive(Debug, Deserialize)]
pub struct PersonalIntakeRequest {
    pub employment_code: Option<String>,
    pub full_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub age: Option<u16>,
    #[serde(default)]
    pub current_address: Address,
    #[serde(default)]
    pub permanent_address: Address,
    #[serde(default)]
    pub contact: PersonalContact,
}

impl PersonalIntakeRequest {
    /// The supplied key, if any.
    pub fn employment_code(&self) -> DomainResult<Option<EmploymentCode>> {
        self.employment_code
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .map(EmploymentCode::parse)
            .transpose()
    }

    pub fn into_record(self, employment_code: EmploymentCode) -> PersonalRecord {
        PersonalRecord {
            employment_code,
            full_name: self.full_name,
            date_of_birth: self.date_of_birth,
            gender: self.gender,
            age: self.age,
            current_address: self.current_address,
            permanent_address: self.permanent_address,
            contact: self.contact,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ProfessionalIntakeRequest {
    pub employment_code: String,
    pub login_email: String,
    pub secret: Secret,
    pub office_phone: Option<String>,
    #[serde(default)]
    pub office_address: Address,
    pub reporting_manager_code: Option<String>,
    pub reporting_manager_email: Option<String>,
    pub hr_name: Option<String>,
    pub employment_history: Option<String>,
    pub date_of_joining: Option<NaiveDate>,
}

impl TryFrom<ProfessionalIntakeRequest> for ProfessionalRecord {
    type Error = workforce_core::DomainError;

    fn try_from(body: ProfessionalIntakeRequest) -> DomainResult<Self> {
        let reporting_manager_code = body
            .reporting_manager_code
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .map(EmploymentCode::parse)
            .transpose()?;
        Ok(ProfessionalRecord {
            employment_code: EmploymentCode::parse(&body.employment_code)?,
            login_email: body.login_email,
            secret: body.secret,
            office_phone: body.office_phone,
            office_address: body.office_address,
            reporting_manager_code,
            reporting_manager_email: body.reporting_manager_email,
            hr_name: body.hr_name,
            employment_history: body.employment_history,
            date_of_joining: body.date_of_joining,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct FinanceIntakeRequest {
    pub employment_code: String,
    pub pan: Option<String>,
    pub aadhaar: Option<String>,
    #[serde(default)]
    pub bank: BankDetails,
    pub ctc_breakup: Option<String>,
}

impl TryFrom<FinanceIntakeRequest> for FinanceRecord {
    type Error = workforce_core::DomainError;

    fn try_from(body: FinanceIntakeRequest) -> DomainResult<Self> {
        Ok(FinanceRecord {
            employment_code: EmploymentCode::parse(&body.employment_code)?,
            pan: body.pan,
            aadhaar: body.aadhaar,
            bank: body.bank,
            ctc_breakup: body.ctc_breakup,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<String>,
    pub deadline: Option<NaiveDate>,
    pub progress: Option<i32>,
    #[serde(default, alias = "assigned_employee_ids")]
    pub member_keys: Vec<String>,
}

impl TryFrom<CreateProjectRequest> for NewProject {
    type Error = workforce_core::DomainError;

    fn try_from(body: CreateProjectRequest) -> DomainResult<Self> {
        let status = match body.status.as_deref() {
            Some(raw) => raw.parse::<ProjectStatus>()?,
            None => ProjectStatus::default(),
        };
        let progress = match body.progress {
            Some(value) => Progress::new(value)?,
            None => Progress::default(),
        };
        let member_keys = body
            .member_keys
            .iter()
            .map(|raw| EmploymentCode::parse(raw))
            .collect::<DomainResult<Vec<_>>>()?;

        Ok(NewProject {
            title: body.title,
            description: body.description,
            status,
            deadline: body.deadline,
            progress,
            member_keys,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListProjectsQuery {
    pub fetch: Option<MemberFetch>,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct EmploymentCodeResponse {
    pub employment_code: EmploymentCode,
}

#[derive(Debug, Serialize)]
pub struct AdminLoginResponse {
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn personal_intake_code_is_optional() {
        let body: PersonalIntakeRequest =
            serde_json::from_value(json!({ "full_name": "Asha Rao" })).unwrap();
        assert_eq!(body.employment_code().unwrap(), None);

        let body: PersonalIntakeRequest =
            serde_json::from_value(json!({ "employment_code": "emp001", "full_name": "Asha Rao" }))
                .unwrap();
        assert_eq!(
            body.employment_code().unwrap().map(|c| c.to_string()),
            Some("EMP001".to_string())
        );
    }

    #[test]
    fn project_request_parses_status_progress_and_members() {
        let body: CreateProjectRequest = serde_json::from_value(json!({
            "title": "Migration",
            "status": "in-progress",
            "progress": 40,
            "assigned_employee_ids": ["emp001", "EMP002"],
        }))
        .unwrap();
        let project = NewProject::try_from(body).unwrap();
        assert_eq!(project.status, ProjectStatus::InProgress);
        assert_eq!(project.progress.value(), 40);
        assert_eq!(project.member_keys.len(), 2);
    }

    #[test]
    fn project_request_rejects_out_of_range_progress() {
        let body: CreateProjectRequest =
            serde_json::from_value(json!({ "title": "Migration", "progress": 101 })).unwrap();
        assert!(NewProject::try_from(body).is_err());
    }
}

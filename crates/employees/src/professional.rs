use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use workforce_auth::{Secret, normalize_login_email};
use workforce_core::{DomainError, DomainResult, EmploymentCode, Entity, RecordGroup};

use crate::record::{non_blank, Address, EmployeeRecord};

/// Professional record group: employment credentials and reporting chain.
///
/// `login_email` is a second unique key next to the employment code; it is what
/// employee login looks records up by. Stored normalized (trimmed, lower-cased).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProfessionalRecord {
    pub employment_code: EmploymentCode,
    pub login_email: String,
    pub secret: Secret,
    pub office_phone: Option<String>,
    #[serde(default)]
    pub office_address: Address,
    pub reporting_manager_code: Option<EmploymentCode>,
    pub reporting_manager_email: Option<String>,
    pub hr_name: Option<String>,
    pub employment_history: Option<String>,
    pub date_of_joining: Option<NaiveDate>,
}

/// Professional record without its secret, safe to hand to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfessionalProfile {
    pub employment_code: EmploymentCode,
    pub login_email: String,
    pub office_phone: Option<String>,
    pub office_address: Address,
    pub reporting_manager_code: Option<EmploymentCode>,
    pub reporting_manager_email: Option<String>,
    pub hr_name: Option<String>,
    pub employment_history: Option<String>,
    pub date_of_joining: Option<NaiveDate>,
}

impl ProfessionalRecord {
    pub fn new(
        employment_code: EmploymentCode,
        login_email: impl Into<String>,
        secret: Secret,
    ) -> Self {
        Self {
            employment_code,
            login_email: login_email.into(),
            secret,
            office_phone: None,
            office_address: Address::default(),
            reporting_manager_code: None,
            reporting_manager_email: None,
            hr_name: None,
            employment_history: None,
            date_of_joining: None,
        }
    }

    pub fn profile(&self) -> ProfessionalProfile {
        ProfessionalProfile {
            employment_code: self.employment_code.clone(),
            login_email: self.login_email.clone(),
            office_phone: self.office_phone.clone(),
            office_address: self.office_address.clone(),
            reporting_manager_code: self.reporting_manager_code.clone(),
            reporting_manager_email: self.reporting_manager_email.clone(),
            hr_name: self.hr_name.clone(),
            employment_history: self.employment_history.clone(),
            date_of_joining: self.date_of_joining,
        }
    }
}

impl Entity for ProfessionalRecord {
    type Id = EmploymentCode;

    fn id(&self) -> &Self::Id {
        &self.employment_code
    }
}

impl EmployeeRecord for ProfessionalRecord {
    const GROUP: RecordGroup = RecordGroup::Professional;

    fn login_email(&self) -> Option<&str> {
        Some(&self.login_email)
    }

    fn validated(self) -> DomainResult<Self> {
        let login_email = normalize_login_email(&self.login_email)?;
        if self.secret.is_blank() {
            return Err(DomainError::validation("secret cannot be empty"));
        }
        if self.reporting_manager_code.as_ref() == Some(&self.employment_code) {
            return Err(DomainError::validation(format!(
                "employee {} cannot report to themselves",
                self.employment_code
            )));
        }
        let reporting_manager_email = match non_blank(self.reporting_manager_email) {
            Some(email) => Some(normalize_login_email(&email)?),
            None => None,
        };

        Ok(Self {
            employment_code: self.employment_code,
            login_email,
            secret: self.secret,
            office_phone: non_blank(self.office_phone),
            office_address: self.office_address.normalized(),
            reporting_manager_code: self.reporting_manager_code,
            reporting_manager_email,
            hr_name: non_blank(self.hr_name),
            employment_history: non_blank(self.employment_history),
            date_of_joining: self.date_of_joining,
        })
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use workforce_core::{DomainError, DomainResult, EmploymentCode, Entity, RecordGroup};

use crate::record::{non_blank, Address, EmployeeRecord};

/// Personal contact details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalContact {
    pub mobile: Option<String>,
    pub personal_email: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_mobile: Option<String>,
}

/// Personal record group: demographics and contact information.
///
/// Created once through the personal intake flow; project assignments reference
/// personal records by employment code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalRecord {
    pub employment_code: EmploymentCode,
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

const MAX_AGE: u16 = 130;

impl PersonalRecord {
    pub fn new(employment_code: EmploymentCode, full_name: impl Into<String>) -> Self {
        Self {
            employment_code,
            full_name: full_name.into(),
            date_of_birth: None,
            gender: None,
            age: None,
            current_address: Address::default(),
            permanent_address: Address::default(),
            contact: PersonalContact::default(),
        }
    }
}

impl Entity for PersonalRecord {
    type Id = EmploymentCode;

    fn id(&self) -> &Self::Id {
        &self.employment_code
    }
}

impl EmployeeRecord for PersonalRecord {
    const GROUP: RecordGroup = RecordGroup::Personal;

    fn validated(self) -> DomainResult<Self> {
        let full_name = self.full_name.trim().to_string();
        if full_name.is_empty() {
            return Err(DomainError::validation("full_name cannot be empty"));
        }
        if let Some(age) = self.age {
            if age > MAX_AGE {
                return Err(DomainError::validation(format!(
                    "age {age} is out of range (0..={MAX_AGE})"
                )));
            }
        }

        Ok(Self {
            employment_code: self.employment_code,
            full_name,
            date_of_birth: self.date_of_birth,
            gender: non_blank(self.gender),
            age: self.age,
            current_address: self.current_address.normalized(),
            permanent_address: self.permanent_address.normalized(),
            contact: PersonalContact {
                mobile: non_blank(self.contact.mobile),
                personal_email: non_blank(self.contact.personal_email),
                emergency_contact_name: non_blank(self.contact.emergency_contact_name),
                emergency_contact_mobile: non_blank(self.contact.emergency_contact_mobile),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code() -> EmploymentCode {
        EmploymentCode::parse("EMP001").unwrap()
    }

    #[test]
    fn validated_trims_name_and_blank_fields() {
        let mut record = PersonalRecord::new(code(), "  Asha Rao ");
        record.gender = Some("".to_string());
        record.contact.mobile = Some(" 9876543210 ".to_string());

        let record = record.validated().unwrap();
        assert_eq!(record.full_name, "Asha Rao");
        assert_eq!(record.gender, None);
        assert_eq!(record.contact.mobile.as_deref(), Some("9876543210"));
    }

    #[test]
    fn validated_rejects_empty_name() {
        let err = PersonalRecord::new(code(), "   ").validated().unwrap_err();
        match err {
            DomainError::Validation(_) => {}
            _ => panic!("Expected Validation error for empty name"),
        }
    }

    #[test]
    fn validated_rejects_absurd_age() {
        let mut record = PersonalRecord::new(code(), "Asha Rao");
        record.age = Some(400);
        assert!(matches!(record.validated(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn deserializes_with_missing_optional_sections() {
        let json = serde_json::json!({
            "employment_code": "emp001",
            "full_name": "Asha Rao",
            "date_of_birth": "1994-03-12",
            "gender": null,
            "age": 31
        });
        let record: PersonalRecord = serde_json::from_value(json).unwrap();
        assert_eq!(record.employment_code, code());
        assert_eq!(record.current_address, Address::default());
        assert_eq!(
            record.date_of_birth,
            NaiveDate::from_ymd_opt(1994, 3, 12)
        );
    }

    #[test]
    fn group_is_personal() {
        assert_eq!(PersonalRecord::GROUP, RecordGroup::Personal);
        assert_eq!(PersonalRecord::new(code(), "A").employment_code(), &code());
    }
}

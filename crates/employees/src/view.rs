//! Composed employee view across the three record groups.

use serde::{Deserialize, Serialize};

use workforce_core::{EmploymentCode, RecordGroup};

use crate::{FinanceRecord, PersonalRecord, ProfessionalProfile};

/// All records held for one employment code.
///
/// Any group may be absent: groups are populated independently and in any order,
/// so a partial view is a valid state rather than an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeView {
    pub employment_code: EmploymentCode,
    pub personal: Option<PersonalRecord>,
    pub professional: Option<ProfessionalProfile>,
    pub finance: Option<FinanceRecord>,
}

impl EmployeeView {
    pub fn empty(employment_code: EmploymentCode) -> Self {
        Self {
            employment_code,
            personal: None,
            professional: None,
            finance: None,
        }
    }

    pub fn has(&self, group: RecordGroup) -> bool {
        match group {
            RecordGroup::Personal => self.personal.is_some(),
            RecordGroup::Professional => self.professional.is_some(),
            RecordGroup::Finance => self.finance.is_some(),
        }
    }

    pub fn missing_groups(&self) -> Vec<RecordGroup> {
        RecordGroup::ALL
            .into_iter()
            .filter(|g| !self.has(*g))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_groups().is_empty()
    }

    /// Display name, when the personal group is present.
    pub fn full_name(&self) -> Option<&str> {
        self.personal.as_ref().map(|p| p.full_name.as_str())
    }
}

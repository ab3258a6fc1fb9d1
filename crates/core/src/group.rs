//! Record groups: the independently stored categories of employee data.

use serde::{Deserialize, Serialize};

/// One of the three record groups an employee is split across.
///
/// All groups are keyed by the same [`EmploymentCode`](crate::EmploymentCode);
/// none owns another, and they may be populated in any order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordGroup {
    Personal,
    Professional,
    Finance,
}

impl RecordGroup {
    pub const ALL: [RecordGroup; 3] = [
        RecordGroup::Personal,
        RecordGroup::Professional,
        RecordGroup::Finance,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RecordGroup::Personal => "personal",
            RecordGroup::Professional => "professional",
            RecordGroup::Finance => "finance",
        }
    }

    /// Name of the storage table holding this group's rows.
    pub fn table(self) -> &'static str {
        match self {
            RecordGroup::Personal => "employee_personal_records",
            RecordGroup::Professional => "employee_professional_records",
            RecordGroup::Finance => "employee_finance_records",
        }
    }
}

impl core::fmt::Display for RecordGroup {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

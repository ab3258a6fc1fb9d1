use serde::{Deserialize, Serialize};

use workforce_core::{DomainError, DomainResult, EmploymentCode, Entity, RecordGroup};

use crate::record::{non_blank, EmployeeRecord};

/// Bank account details for payroll.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankDetails {
    pub bank_name: Option<String>,
    pub branch: Option<String>,
    pub ifsc: Option<String>,
}

/// Finance record group: tax identifiers, bank details and compensation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinanceRecord {
    pub employment_code: EmploymentCode,
    pub pan: Option<String>,
    pub aadhaar: Option<String>,
    #[serde(default)]
    pub bank: BankDetails,
    pub ctc_breakup: Option<String>,
}

impl FinanceRecord {
    pub fn new(employment_code: EmploymentCode) -> Self {
        Self {
            employment_code,
            pan: None,
            aadhaar: None,
            bank: BankDetails::default(),
            ctc_breakup: None,
        }
    }
}

impl Entity for FinanceRecord {
    type Id = EmploymentCode;

    fn id(&self) -> &Self::Id {
        &self.employment_code
    }
}

impl EmployeeRecord for FinanceRecord {
    const GROUP: RecordGroup = RecordGroup::Finance;

    fn validated(self) -> DomainResult<Self> {
        let pan = non_blank(self.pan).map(|p| p.to_ascii_uppercase());
        if let Some(pan) = &pan {
            if !is_pan(pan) {
                return Err(DomainError::validation(format!(
                    "PAN `{pan}` must be 5 letters, 4 digits, 1 letter"
                )));
            }
        }

        let aadhaar = non_blank(self.aadhaar).map(|a| a.replace([' ', '-'], ""));
        if let Some(aadhaar) = &aadhaar {
            if aadhaar.len() != 12 || !aadhaar.bytes().all(|b| b.is_ascii_digit()) {
                return Err(DomainError::validation("Aadhaar number must be 12 digits"));
            }
        }

        let ifsc = non_blank(self.bank.ifsc).map(|i| i.to_ascii_uppercase());
        if let Some(ifsc) = &ifsc {
            if !is_ifsc(ifsc) {
                return Err(DomainError::validation(format!(
                    "IFSC `{ifsc}` must be 4 letters, `0`, then 6 letters or digits"
                )));
            }
        }

        Ok(Self {
            employment_code: self.employment_code,
            pan,
            aadhaar,
            bank: BankDetails {
                bank_name: non_blank(self.bank.bank_name),
                branch: non_blank(self.bank.branch),
                ifsc,
            },
            ctc_breakup: non_blank(self.ctc_breakup),
        })
    }
}

fn is_pan(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 10
        && b[..5].iter().all(u8::is_ascii_uppercase)
        && b[5..9].iter().all(u8::is_ascii_digit)
        && b[9].is_ascii_uppercase()
}

fn is_ifsc(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 11
        && b[..4].iter().all(u8::is_ascii_uppercase)
        && b[4] == b'0'
        && b[5..].iter().all(u8::is_ascii_alphanumeric)
}

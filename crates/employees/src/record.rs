use serde::{Deserialize, Serialize};

use workforce_core::{DomainResult, EmploymentCode, Entity, RecordGroup, ValueObject};

/// Behaviour shared by the three record groups.
///
/// Stores are generic over this trait: each group is keyed by its
/// employment code and knows how to validate itself before any write.
pub trait EmployeeRecord:
    Entity<Id = EmploymentCode> + Clone + core::fmt::Debug + Send + Sync + 'static
{
    /// Record group this type is stored in.
    const GROUP: RecordGroup;

    /// Validate required fields and normalize the record for storage.
    fn validated(self) -> DomainResult<Self>;

    fn employment_code(&self) -> &EmploymentCode {
        self.id()
    }

    /// Second unique key within the group (the login email), if the group has one.
    fn login_email(&self) -> Option<&str> {
        None
    }
}

/// Postal address (current, permanent or office).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub city: Option<String>,
    pub line1: Option<String>,
    pub line2: Option<String>,
    pub postal_code: Option<String>,
}

impl ValueObject for Address {}

impl Address {
    /// Collapse blank strings to `None` so "unset" has one representation.
    pub(crate) fn normalized(self) -> Self {
        Self {
            city: non_blank(self.city),
            line1: non_blank(self.line1),
            line2: non_blank(self.line2),
            postal_code: non_blank(self.postal_code),
        }
    }
}

pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let t = v.trim();
        if t.is_empty() { None } else { Some(t.to_string()) }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_normalization_drops_blank_lines() {
        let addr = Address {
            city: Some(" Pune ".to_string()),
            line1: Some("   ".to_string()),
            line2: None,
            postal_code: Some("411001".to_string()),
        }
        .normalized();
        assert_eq!(addr.city.as_deref(), Some("Pune"));
        assert_eq!(addr.line1, None);
        assert_eq!(addr.postal_code.as_deref(), Some("411001"));
    }
}

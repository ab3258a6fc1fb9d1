//! Opaque secret wrapper.

use serde::Deserialize;

/// A login secret as supplied at intake or at login.
///
/// Never printed by `Debug` and never serialized; the only way to read the raw
/// value is [`Secret::expose`], which storage adapters use to persist it.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Compare against a presented secret without short-circuiting on the
    /// first differing byte.
    pub fn matches(&self, presented: &Secret) -> bool {
        let a = self.0.as_bytes();
        let b = presented.0.as_bytes();
        let mut diff = a.len() ^ b.len();
        for i in 0..a.len().max(b.len()) {
            let x = a.get(i).copied().unwrap_or(0);
            let y = b.get(i).copied().unwrap_or(0);
            diff |= usize::from(x ^ y);
        }
        diff == 0
    }
}

impl core::fmt::Debug for Secret {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("Secret(***)")
    }
}

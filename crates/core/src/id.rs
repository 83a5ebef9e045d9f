//! Strongly-typed identifiers used across the domain.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of a hospital supply item (e.g. `ITM001`).
///
/// Item codes come from the hospital's materials system, so this wraps the
/// code as-is rather than minting new identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemId(String);

impl ItemId {
    /// Validate and wrap an item code.
    pub fn new(code: impl Into<String>) -> Result<Self, DomainError> {
        let code = code.into();
        if code.trim().is_empty() {
            return Err(DomainError::invalid_id("ItemId: code cannot be empty"));
        }
        if code.chars().any(char::is_whitespace) {
            return Err(DomainError::invalid_id(format!(
                "ItemId: code {code:?} contains whitespace"
            )));
        }
        Ok(Self(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ItemId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ItemId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ItemId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ItemId> for String {
    fn from(value: ItemId) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_item_codes() {
        let id: ItemId = "ITM001".parse().unwrap();
        assert_eq!(id.as_str(), "ITM001");
        assert_eq!(id.to_string(), "ITM001");
    }

    #[test]
    fn rejects_empty_and_whitespace_codes() {
        assert!(matches!(ItemId::new(""), Err(DomainError::InvalidId(_))));
        assert!(matches!(ItemId::new("   "), Err(DomainError::InvalidId(_))));
        assert!(matches!(ItemId::new("ITM 001"), Err(DomainError::InvalidId(_))));
    }

    #[test]
    fn serde_uses_bare_string_and_validates() {
        let id = ItemId::new("ITM002").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"ITM002\"");

        let back: ItemId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);

        assert!(serde_json::from_str::<ItemId>("\"\"").is_err());
    }
}

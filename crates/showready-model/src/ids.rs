use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError(pub String);

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ValidationError {}

pub fn parse_event_id(input: &str) -> Result<EventId, ValidationError> {
    EventId::parse(input)
}

pub fn parse_user_id(input: &str) -> Result<UserId, ValidationError> {
    UserId::parse(input)
}

pub fn parse_item_type(input: &str) -> Result<ItemType, ValidationError> {
    ItemType::parse(input)
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        if input.trim().is_empty() {
            return Err(ValidationError("event id must not be empty".to_string()));
        }
        Ok(Self(input.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for EventId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        if input.trim().is_empty() {
            return Err(ValidationError("user id must not be empty".to_string()));
        }
        Ok(Self(input.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque overlay key. An item type may name a structural item ("flight",
/// "hotel"), a template slug, or a synthetic custom-item identifier such as
/// `custom_item_42`. The schema is deliberately open: the only rule is
/// non-empty, non-whitespace. The value is stored byte-for-byte — no
/// trimming, no normalization, no whitelist.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ItemType(String);

impl ItemType {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        if input.trim().is_empty() {
            return Err(ValidationError(
                "item type must be a non-empty string".to_string(),
            ));
        }
        Ok(Self(input.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for ItemType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_type_rejects_empty_and_whitespace() {
        assert!(ItemType::parse("").is_err());
        assert!(ItemType::parse("   ").is_err());
        assert!(ItemType::parse("\t\n").is_err());
    }

    #[test]
    fn item_type_passes_arbitrary_content_through_unmodified() {
        let raw = "  Confirmer l'hôtel — étape n°2 ✓ ";
        let it = ItemType::parse(raw).expect("opaque key");
        assert_eq!(it.as_str(), raw);

        let slug = "custom_item_42";
        assert_eq!(ItemType::parse(slug).expect("slug").as_str(), slug);
    }

    #[test]
    fn ids_reject_empty() {
        assert!(EventId::parse(" ").is_err());
        assert!(UserId::parse("").is_err());
        assert_eq!(EventId::parse("ev-1").expect("id").as_str(), "ev-1");
    }
}

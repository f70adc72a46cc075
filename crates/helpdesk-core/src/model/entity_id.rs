// ── Entity identity ──
//
// Most resources use numeric ids; job statuses use opaque hex tokens.
// `EntityId` unifies both so the cache can key on a single type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a resource within its entity type.
///
/// Strings made only of ASCII digits normalize to [`EntityId::Number`], so
/// `"42"` and `42` resolve to the same cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Number(u64),
    Token(String),
}

impl EntityId {
    pub fn as_number(&self) -> Option<u64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Token(_) => None,
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Token(s) => write!(f, "{s}"),
        }
    }
}

impl FromStr for EntityId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl From<u64> for EntityId {
    fn from(n: u64) -> Self {
        Self::Number(n)
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        match s.parse::<u64>() {
            Ok(n) if s.bytes().all(|b| b.is_ascii_digit()) => Self::Number(n),
            _ => Self::Token(s),
        }
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self::from(s.to_owned())
    }
}

impl From<&EntityId> for EntityId {
    fn from(id: &EntityId) -> Self {
        id.clone()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn numeric_string_normalizes() {
        assert_eq!(EntityId::from("42"), EntityId::Number(42));
    }

    #[test]
    fn hex_token_stays_text() {
        let id = EntityId::from("8b726e606741012ffc2d782bcb7848fe");
        assert!(id.as_number().is_none());
    }

    #[test]
    fn signed_string_is_a_token() {
        assert_eq!(EntityId::from("+7"), EntityId::Token("+7".into()));
    }

    #[test]
    fn display_round_trips() {
        let id: EntityId = "1234".parse().unwrap();
        assert_eq!(id.to_string(), "1234");
    }

    #[test]
    fn deserializes_from_number_or_string() {
        let n: EntityId = serde_json::from_str("7").unwrap();
        let s: EntityId = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(n, EntityId::Number(7));
        assert_eq!(s, EntityId::Token("abc".into()));
    }
}

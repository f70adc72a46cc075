// ── Clearable fields ──
//
// The service tells apart a field left out of a payload and a field sent
// as `null`: the first leaves the stored value alone, the second clears it.
// `Option` folds the two together, so fields that can be cleared use
// `Nullable` with `#[serde(default, skip_serializing_if = "Nullable::is_absent")]`.

use std::ops::Deref;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Nullable<T> {
    /// Not present in the payload.
    #[default]
    Absent,
    /// Present as JSON `null`.
    Null,
    Value(T),
}

impl<T> Nullable<T> {
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The value, if one is set.
    pub const fn value(&self) -> Option<&T> {
        match self {
            Self::Value(v) => Some(v),
            Self::Absent | Self::Null => None,
        }
    }

    pub fn as_deref(&self) -> Option<&T::Target>
    where
        T: Deref,
    {
        self.value().map(Deref::deref)
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Value(v) => Some(v),
            Self::Absent | Self::Null => None,
        }
    }
}

impl<T> From<T> for Nullable<T> {
    fn from(value: T) -> Self {
        Self::Value(value)
    }
}

impl<T: Serialize> Serialize for Nullable<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Value(v) => v.serialize(serializer),
            Self::Absent | Self::Null => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Nullable<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(|v| v.map_or(Self::Null, Self::Value))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Row {
        #[serde(default, skip_serializing_if = "Nullable::is_absent")]
        owner: Nullable<u64>,
    }

    #[test]
    fn missing_null_and_value_stay_distinct() {
        let absent: Row = serde_json::from_value(json!({})).unwrap();
        let null: Row = serde_json::from_value(json!({ "owner": null })).unwrap();
        let set: Row = serde_json::from_value(json!({ "owner": 3 })).unwrap();

        assert!(absent.owner.is_absent());
        assert!(null.owner.is_null());
        assert_eq!(set.owner.value(), Some(&3));

        assert_eq!(serde_json::to_value(&absent).unwrap(), json!({}));
        assert_eq!(serde_json::to_value(&null).unwrap(), json!({ "owner": null }));
        assert_eq!(serde_json::to_value(&set).unwrap(), json!({ "owner": 3 }));
    }

    #[test]
    fn deref_reaches_the_inner_str() {
        let name: Nullable<String> = "ops".to_owned().into();
        assert_eq!(name.as_deref(), Some("ops"));
        assert_eq!(Nullable::<String>::Null.as_deref(), None);
    }
}

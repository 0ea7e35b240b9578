// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::borrow::Borrow;
use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Opaque, typed identifier for document elements and bound assets.
///
/// Hosts address elements as `<doc>/<element>`, so an id must be a non-empty
/// segment without `/` or surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id<T> {
    value: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    pub fn new(value: impl Into<String>) -> Result<Self, IdError> {
        let value = value.into();
        check_segment(&value)?;
        Ok(Self { value, _marker: PhantomData })
    }

    /// `<prefix>-<n>`, the shape the document uses for ids it hands out.
    pub fn numbered(prefix: &str, n: u64) -> Result<Self, IdError> {
        Self::new(format!("{prefix}-{n}"))
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

// Lets `BTreeMap<Id<T>, _>` be queried with a plain `&str`.
impl<T> Borrow<str> for Id<T> {
    fn borrow(&self) -> &str {
        &self.value
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.value)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Self::new(String::deserialize(deserializer)?).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    #[error("id must not be empty")]
    Empty,
    #[error("id must not contain '/'")]
    ContainsSlash,
    #[error("id must not start or end with whitespace")]
    Padded,
}

fn check_segment(value: &str) -> Result<(), IdError> {
    if value.is_empty() {
        Err(IdError::Empty)
    } else if value.contains('/') {
        Err(IdError::ContainsSlash)
    } else if value.trim() != value {
        Err(IdError::Padded)
    } else {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementTag {}
pub type ElementId = Id<ElementTag>;

impl ElementId {
    /// `el-<n>`; the prefix is a valid segment, so no check is needed.
    pub(crate) fn allocated(n: u64) -> Self {
        Self { value: format!("el-{n}"), _marker: PhantomData }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AssetTag {}
pub type AssetId = Id<AssetTag>;

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{AssetId, ElementId, IdError};

    #[rstest]
    #[case("", IdError::Empty)]
    #[case("doc/el-1", IdError::ContainsSlash)]
    #[case(" el-1", IdError::Padded)]
    fn rejects_invalid_segments(#[case] raw: &str, #[case] expected: IdError) {
        assert_eq!(ElementId::new(raw), Err(expected));
    }

    #[test]
    fn numbered_ids_follow_prefix_dash_counter() {
        assert_eq!(ElementId::numbered("el", 7).expect("id").as_str(), "el-7");
        assert_eq!(AssetId::numbered("asset", 1).expect("id").to_string(), "asset-1");
        assert_eq!(ElementId::allocated(7), ElementId::numbered("el", 7).expect("id"));
    }

    #[test]
    fn keyed_maps_accept_plain_str_lookups() {
        let map = std::collections::BTreeMap::from([(ElementId::numbered("el", 1).expect("id"), 1)]);
        assert_eq!(map.get("el-1"), Some(&1));
    }

    #[test]
    fn deserialize_validates_segment() {
        let ok: ElementId = serde_json::from_str("\"el-1\"").expect("valid id");
        assert_eq!(ok.as_str(), "el-1");

        let err = serde_json::from_str::<ElementId>("\"a/b\"").unwrap_err();
        assert!(err.to_string().contains("'/'"));
    }
}

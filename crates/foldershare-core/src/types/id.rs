//! Newtype wrappers around short opaque string identifiers.
//!
//! Using distinct types prevents accidentally passing a `FileId` where a
//! `FolderId` is expected. Identifiers are the first eight hex characters
//! of a random UUID; they are only ever compared for equality.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// Sentinel parent identifier for top-level folders.
pub const ROOT: &str = "ROOT";

/// Length of a freshly generated identifier.
const SHORT_ID_LEN: usize = 8;

/// Macro to define a newtype ID wrapper around a short string.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new random identifier.
            pub fn generate() -> Self {
                let mut raw = Uuid::new_v4().simple().to_string();
                raw.truncate(SHORT_ID_LEN);
                Self(raw)
            }

            /// Return the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = AppError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                if trimmed.is_empty() || trimmed.contains('#') || trimmed == ROOT {
                    return Err(AppError::invalid_input(format!(
                        "Invalid {}: '{s}'",
                        stringify!($name)
                    )));
                }
                Ok(Self(trimmed.to_string()))
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(
    /// Unique identifier for a folder.
    FolderId
);

define_id!(
    /// Unique identifier for a file.
    FileId
);

/// The parent of a folder: either the `ROOT` sentinel or another folder.
///
/// Serialized as a plain string so that stored records keep the
/// `parent_id = "ROOT"` encoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ParentRef {
    /// Top-level folder.
    Root,
    /// Nested under the given folder.
    Folder(FolderId),
}

impl ParentRef {
    /// Return the parent folder id, or `None` for top-level folders.
    pub fn folder_id(&self) -> Option<&FolderId> {
        match self {
            Self::Root => None,
            Self::Folder(id) => Some(id),
        }
    }

    /// Whether this refers to the `ROOT` sentinel.
    pub fn is_root(&self) -> bool {
        matches!(self, Self::Root)
    }

    /// Return the string used in storage keys.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Root => ROOT,
            Self::Folder(id) => id.as_str(),
        }
    }
}

impl fmt::Display for ParentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<FolderId> for ParentRef {
    fn from(id: FolderId) -> Self {
        Self::Folder(id)
    }
}

impl From<String> for ParentRef {
    fn from(raw: String) -> Self {
        if raw.is_empty() || raw == ROOT {
            Self::Root
        } else {
            Self::Folder(FolderId(raw))
        }
    }
}

impl From<ParentRef> for String {
    fn from(parent: ParentRef) -> Self {
        match parent {
            ParentRef::Root => ROOT.to_string(),
            ParentRef::Folder(id) => id.0,
        }
    }
}

impl FromStr for ParentRef {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | ROOT => Ok(Self::Root),
            other => other.parse().map(Self::Folder),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_short_and_unique() {
        let a = FolderId::generate();
        let b = FolderId::generate();
        assert_eq!(a.as_str().len(), SHORT_ID_LEN);
        assert_ne!(a, b);
    }

    #[test]
    fn test_from_str_rejects_key_separators() {
        assert!("abc#def".parse::<FolderId>().is_err());
        assert!("".parse::<FileId>().is_err());
        assert!("ROOT".parse::<FolderId>().is_err());
        assert_eq!("a1b2c3d4".parse::<FolderId>().unwrap().as_str(), "a1b2c3d4");
    }

    #[test]
    fn test_parent_ref_string_encoding() {
        let json = serde_json::to_string(&ParentRef::Root).unwrap();
        assert_eq!(json, "\"ROOT\"");

        let parent: ParentRef = serde_json::from_str("\"a1b2c3d4\"").unwrap();
        assert_eq!(parent.folder_id().map(|id| id.as_str()), Some("a1b2c3d4"));
        assert_eq!("ROOT".parse::<ParentRef>().unwrap(), ParentRef::Root);
    }
}

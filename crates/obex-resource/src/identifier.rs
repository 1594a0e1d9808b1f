//! Resource identifiers and the editor path locator
//!
//! Editor paths look like `/<root>/<LIBRARY>/<NAME>.<TYPE>`. The root segment
//! carries host-shell routing information and is ignored here; library, name
//! and type tag are normalized to upper case for remote addressing.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Normalized address of one remote administrative object
///
/// Immutable once a document has been opened for it. Library and name are
/// never empty; the type tag may be empty for extensionless paths, in which
/// case registry lookup (not parsing) rejects the resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceIdentifier {
    library: String,
    name: String,
    type_tag: String,
}

impl ResourceIdentifier {
    /// Resolve an editor path into an identifier
    ///
    /// The path must split into exactly three non-empty segments after the
    /// leading slash; the type tag is the extension of the last segment.
    ///
    /// # Errors
    /// Returns [`ResourceError::Malformed`] for any other segment shape.
    pub fn resolve(path: &str) -> Result<Self, ResourceError> {
        let trimmed = path.strip_prefix('/').unwrap_or(path);
        let segments: Vec<&str> = trimmed.split('/').collect();

        if segments.len() != 3 || segments.iter().any(|s| s.is_empty()) {
            return Err(ResourceError::Malformed {
                path: path.to_string(),
            });
        }

        let library = segments[1];
        let object = segments[2];
        let (name, type_tag) = match object.rsplit_once('.') {
            Some((stem, extension)) => (stem, extension),
            None => (object, ""),
        };

        if name.is_empty() {
            return Err(ResourceError::Malformed {
                path: path.to_string(),
            });
        }

        Ok(Self {
            library: library.to_uppercase(),
            name: name.to_uppercase(),
            type_tag: type_tag.to_uppercase(),
        })
    }

    /// Build an identifier from already-separated parts
    ///
    /// Parts are normalized to upper case like [`resolve`](Self::resolve)
    /// does.
    ///
    /// # Errors
    /// Returns [`ResourceError::Malformed`] if library or name is empty.
    pub fn from_parts(
        library: impl Into<String>,
        name: impl Into<String>,
        type_tag: impl Into<String>,
    ) -> Result<Self, ResourceError> {
        let library = library.into();
        let name = name.into();
        if library.is_empty() || name.is_empty() {
            return Err(ResourceError::Malformed {
                path: format!("{library}/{name}"),
            });
        }
        Ok(Self {
            library: library.to_uppercase(),
            name: name.to_uppercase(),
            type_tag: type_tag.into().to_uppercase(),
        })
    }

    /// Library portion, upper-cased
    #[inline]
    #[must_use]
    pub fn library(&self) -> &str {
        &self.library
    }

    /// Object name portion, upper-cased
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Type tag portion, upper-cased; may be empty
    #[inline]
    #[must_use]
    pub fn type_tag(&self) -> &str {
        &self.type_tag
    }

    /// `LIBRARY/NAME` form used in remote command strings
    #[inline]
    #[must_use]
    pub fn qualified_name(&self) -> String {
        format!("{}/{}", self.library, self.name)
    }
}

impl Display for ResourceIdentifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.type_tag.is_empty() {
            write!(f, "{}/{}", self.library, self.name)
        } else {
            write!(f, "{}/{}.{}", self.library, self.name, self.type_tag)
        }
    }
}

/// Errors produced by the locator
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    /// Path does not split into the expected segments
    #[error("malformed resource path: {path}")]
    Malformed {
        /// The offending path, verbatim
        path: String,
    },
}

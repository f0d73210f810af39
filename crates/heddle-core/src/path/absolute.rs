//! AbsolutePath: an immutable, validated, platform-aware absolute path.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::Path;
use std::sync::Arc;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::domain::HeddleError;

use super::canonical::{needs_normalization, normalize_full};
use super::platform::PathPlatform;

/// A fully-resolved file system path.
///
/// Invariants:
/// - `value()` is either empty (the [`AbsolutePath::empty`] "no path"
///   instance) or rooted for the carried platform.
/// - Immutable once constructed; clones share the backing string, so the
///   type is freely copyable across threads without synchronization.
///
/// Two instances are equal iff their values are equal under the platform's
/// case rule (ordinal on POSIX, lowercase-folded on Windows). The empty
/// instance equals only other empty instances.
///
/// `original_value()` preserves the string the caller actually supplied
/// before any combination with a base path. Diagnostics should print it so
/// the user sees what they wrote, not what the engine resolved it to.
#[derive(Debug, Clone)]
pub struct AbsolutePath {
    value: Arc<str>,
    original: Arc<str>,
    platform: PathPlatform,
}

impl AbsolutePath {
    /// The "no path" value, used where a path is optional.
    pub fn empty() -> Self {
        Self {
            value: Arc::from(""),
            original: Arc::from(""),
            platform: PathPlatform::NATIVE,
        }
    }

    /// Wrap a string that must already be fully qualified.
    ///
    /// The value is stored unexamined; canonicalization is a separate,
    /// opt-in step ([`AbsolutePath::canonical_form`]).
    pub fn new(value: impl Into<String>) -> Result<Self, HeddleError> {
        Self::new_for_platform(value, PathPlatform::NATIVE)
    }

    pub fn new_for_platform(
        value: impl Into<String>,
        platform: PathPlatform,
    ) -> Result<Self, HeddleError> {
        let value = value.into();
        if value.is_empty() {
            return Err(HeddleError::InvalidArgument {
                value,
                reason: "path must be non-empty",
            });
        }
        if !platform.is_fully_qualified(&value) {
            return Err(HeddleError::InvalidArgument {
                value,
                reason: "path is not fully qualified",
            });
        }
        let shared: Arc<str> = Arc::from(value);
        Ok(Self {
            value: Arc::clone(&shared),
            original: shared,
            platform,
        })
    }

    /// Combine a possibly-relative string with a base path.
    ///
    /// A rooted `path` is used as-is (rootedness alone suffices; the base
    /// is ignored). A relative `path` is textually combined with `base`,
    /// which never fails even for characters illegal in canonical paths.
    /// Only an empty `path` or an empty `base` is an error.
    pub fn resolve(path: &str, base: &AbsolutePath) -> Result<Self, HeddleError> {
        if path.is_empty() {
            return Err(HeddleError::InvalidArgument {
                value: String::new(),
                reason: "path must be non-empty",
            });
        }
        if base.is_empty() {
            return Err(HeddleError::InvalidArgument {
                value: String::new(),
                reason: "base path must be non-empty",
            });
        }
        Ok(Self::resolve_non_empty(path, base))
    }

    /// Combination for callers that already ruled out the empty cases.
    pub(crate) fn resolve_non_empty(path: &str, base: &AbsolutePath) -> Self {
        let platform = base.platform;
        if platform.is_rooted(path) {
            let shared: Arc<str> = Arc::from(path);
            Self {
                value: Arc::clone(&shared),
                original: shared,
                platform,
            }
        } else {
            Self {
                value: Arc::from(platform.combine(&base.value, path)),
                original: Arc::from(path),
                platform,
            }
        }
    }

    /// Internal constructor for values whose rootedness is already
    /// guaranteed (canonicalization output).
    fn rooted_unchecked(value: String, original: Arc<str>, platform: PathPlatform) -> Self {
        Self {
            value: Arc::from(value),
            original,
            platform,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// The resolved, validated path string.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The string the caller supplied, before any combination with a base.
    pub fn original_value(&self) -> &str {
        &self.original
    }

    /// Cheap accessor for legacy file APIs that take plain strings.
    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn platform(&self) -> PathPlatform {
        self.platform
    }

    /// The separator-normalized, relative-segment-resolved form.
    ///
    /// When nothing needs normalizing, this returns a clone sharing the
    /// same backing string (`value()` is pointer-identical), so callers
    /// using identity to skip re-work pay nothing. Never fails: rootedness
    /// is guaranteed by construction, and the full-path routine is lexical.
    pub fn canonical_form(&self) -> Self {
        if self.value.is_empty() || !needs_normalization(&self.value, self.platform) {
            return self.clone();
        }
        let normalized = normalize_full(&self.value, self.platform);
        Self::rooted_unchecked(normalized, Arc::clone(&self.original), self.platform)
    }
}

impl Default for AbsolutePath {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for AbsolutePath {
    fn eq(&self, other: &Self) -> bool {
        if self.value.is_empty() || other.value.is_empty() {
            return self.value.is_empty() && other.value.is_empty();
        }
        self.platform == other.platform && self.platform.paths_equal(&self.value, &other.value)
    }
}

impl Eq for AbsolutePath {}

impl Hash for AbsolutePath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        if self.value.is_empty() {
            // All empty instances are equal, whatever their platform.
            0u8.hash(state);
            return;
        }
        if self.platform.case_sensitive() {
            self.value.hash(state);
        } else {
            for c in self.value.chars().flat_map(char::to_lowercase) {
                c.hash(state);
            }
        }
    }
}

impl fmt::Display for AbsolutePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl AsRef<str> for AbsolutePath {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

impl AsRef<Path> for AbsolutePath {
    fn as_ref(&self) -> &Path {
        Path::new(&*self.value)
    }
}

impl From<AbsolutePath> for String {
    fn from(path: AbsolutePath) -> Self {
        path.value.to_string()
    }
}

impl Serialize for AbsolutePath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.value)
    }
}

/// Deserializes against the native platform grammar; an empty string is the
/// "no path" value.
impl<'de> Deserialize<'de> for AbsolutePath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        if value.is_empty() {
            return Ok(Self::empty());
        }
        Self::new(value).map_err(D::Error::custom)
    }
}

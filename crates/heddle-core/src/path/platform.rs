//! Platform path grammar: separators, rootedness predicates, textual
//! combination, and the case rule used for comparison.

use serde::{Deserialize, Serialize};

/// Path grammar of a target platform.
///
/// The platform is carried as a value (not only `cfg`) so that Windows path
/// handling stays testable on POSIX CI and vice versa; native constructors
/// default to [`PathPlatform::NATIVE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathPlatform {
    /// Dual separators (`\` primary, `/` alternate), drive and UNC roots,
    /// case-insensitive comparison.
    Windows,

    /// Single separator, single root, ordinal comparison.
    Posix,
}

impl PathPlatform {
    /// The platform this build is compiled for.
    #[cfg(windows)]
    pub const NATIVE: PathPlatform = PathPlatform::Windows;

    /// The platform this build is compiled for.
    #[cfg(not(windows))]
    pub const NATIVE: PathPlatform = PathPlatform::Posix;

    pub fn primary_separator(self) -> char {
        match self {
            PathPlatform::Windows => '\\',
            PathPlatform::Posix => '/',
        }
    }

    /// The second separator accepted on input, if any (`/` on Windows).
    pub fn alternate_separator(self) -> Option<char> {
        match self {
            PathPlatform::Windows => Some('/'),
            PathPlatform::Posix => None,
        }
    }

    pub fn is_separator(self, c: char) -> bool {
        c == self.primary_separator() || Some(c) == self.alternate_separator()
    }

    /// Does the file system compare paths case-sensitively?
    pub fn case_sensitive(self) -> bool {
        matches!(self, PathPlatform::Posix)
    }

    /// "Fully qualified": the string identifies a location without reference
    /// to any current directory.
    ///
    /// Windows accepts drive-rooted (`C:\x`, `C:/x`) and UNC (`\\server\...`)
    /// forms; drive-relative `C:foo` and root-relative `\foo` are rejected
    /// as rooted-but-not-absolute. POSIX accepts a leading `/`.
    pub fn is_fully_qualified(self, value: &str) -> bool {
        let bytes = value.as_bytes();
        match self {
            PathPlatform::Posix => bytes.first() == Some(&b'/'),
            PathPlatform::Windows => match bytes {
                [d, b':', s, ..] if d.is_ascii_alphabetic() && self.is_separator(*s as char) => {
                    true
                }
                [a, b, ..] if self.is_separator(*a as char) && self.is_separator(*b as char) => {
                    true
                }
                _ => false,
            },
        }
    }

    /// "Rooted": the weaker predicate used by combination.
    ///
    /// On Windows this additionally accepts drive-relative (`C:foo`) and
    /// root-relative (`\foo`) strings, which platform combination passes
    /// through as-is instead of appending to the base.
    pub fn is_rooted(self, value: &str) -> bool {
        let bytes = value.as_bytes();
        match self {
            PathPlatform::Posix => bytes.first() == Some(&b'/'),
            PathPlatform::Windows => match bytes {
                [s, ..] if self.is_separator(*s as char) => true,
                [d, b':', ..] if d.is_ascii_alphabetic() => true,
                _ => false,
            },
        }
    }

    /// Purely textual combination of a base path and a relative path.
    ///
    /// Never touches the file system and never fails; characters illegal in
    /// canonical paths are carried through verbatim.
    pub fn combine(self, base: &str, relative: &str) -> String {
        let mut out = String::with_capacity(base.len() + relative.len() + 1);
        out.push_str(base);
        if !out.ends_with(|c: char| self.is_separator(c)) {
            out.push(self.primary_separator());
        }
        out.push_str(relative);
        out
    }

    /// Ordinal comparison on case-sensitive platforms, lowercase-folded
    /// comparison otherwise.
    pub fn paths_equal(self, a: &str, b: &str) -> bool {
        if self.case_sensitive() {
            a == b
        } else {
            a.chars()
                .flat_map(char::to_lowercase)
                .eq(b.chars().flat_map(char::to_lowercase))
        }
    }
}

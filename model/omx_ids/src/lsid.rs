//! Canonical identifier strings and the auto-assignment sentinel.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// A canonical identifier string, e.g. `"Image:0"` or
/// `"urn:lsid:example.org:Image:0"`.
///
/// Cheap to clone: the resolver's index, the registry's claim set, and every
/// linked reference hold copies of the same identifier.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Lsid(Arc<str>);

impl Lsid {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Lsid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Lsid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Lsid({})", self.0)
    }
}

impl From<&str> for Lsid {
    fn from(s: &str) -> Self {
        Lsid(Arc::from(s))
    }
}

impl From<String> for Lsid {
    fn from(s: String) -> Self {
        Lsid(Arc::from(s))
    }
}

// Lets claim sets and index maps keyed by `Lsid` answer `&str` queries
// without allocating. Sound: the derived `Hash`/`Eq` delegate to the
// string contents.
impl Borrow<str> for Lsid {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Lsid {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Lsid {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

/// Identifier slot on an identity-bearing record.
///
/// Fresh records start [`Id::Auto`], the in-memory default for constructor
/// calls that omit an identifier. Construction replaces the slot with the
/// canonical assigned identifier; `Auto` never reaches serialized output.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default)]
pub enum Id {
    #[default]
    Auto,
    Assigned(Lsid),
}

impl Id {
    pub fn is_auto(&self) -> bool {
        matches!(self, Id::Auto)
    }

    /// The assigned identifier, if one has been assigned.
    pub fn lsid(&self) -> Option<&Lsid> {
        match self {
            Id::Auto => None,
            Id::Assigned(id) => Some(id),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.lsid().map(Lsid::as_str)
    }
}

impl From<Lsid> for Id {
    fn from(id: Lsid) -> Self {
        Id::Assigned(id)
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Id::Assigned(Lsid::from(s))
    }
}

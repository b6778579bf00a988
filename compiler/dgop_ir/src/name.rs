//! Names and opaque tags.
//!
//! Tags are immutable value objects compared structurally. The passes never
//! interpret them beyond equality.

use std::fmt;
use std::sync::Arc;

/// An identifier (variable, function, or tag name).
///
/// Cloning is a reference-count bump; equality and hashing are by content.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Name(Arc<str>);

impl Name {
    /// Create a name from a string.
    pub fn new(s: &str) -> Self {
        Self(Arc::from(s))
    }

    /// Get the string content.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Name {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", &*self.0)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifies a part of the mesh boundary.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum BoundaryTag {
    /// A user-named boundary region.
    Named(Name),
    /// The whole boundary.
    All,
    /// Faces shared with the partition of the given rank.
    Rank(u32),
}

impl BoundaryTag {
    /// Shorthand for `BoundaryTag::Named`.
    pub fn named(name: &str) -> Self {
        Self::Named(Name::new(name))
    }
}

impl fmt::Display for BoundaryTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryTag::Named(name) => write!(f, "{name}"),
            BoundaryTag::All => f.write_str("<all>"),
            BoundaryTag::Rank(rank) => write!(f, "<rank {rank}>"),
        }
    }
}

/// Identifies a quadrature grid.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QuadratureTag(pub Name);

impl QuadratureTag {
    pub fn new(name: &str) -> Self {
        Self(Name::new(name))
    }
}

impl fmt::Display for QuadratureTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

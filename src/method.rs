//! HTTP method as a typed enum, and sets of methods for registration.
//!
//! The routing table keeps one tree per method in a fixed set. A route can be
//! declared for several methods at once by combining them with `|`:
//!
//! ```rust
//! use sprig::{Method, MethodSet};
//!
//! let set: MethodSet = Method::Get | Method::Post;
//! assert!(set.contains(Method::Post));
//! assert!(!set.contains(Method::Delete));
//! ```

use std::fmt;
use std::ops::BitOr;
use std::str::FromStr;

/// A routable HTTP method.
///
/// `Patch` doubles as the framework's "update" verb. Any other method token
/// (`TRACE`, WebDAV verbs, typos) has no routing table and never matches.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Options,
    Head,
}

impl Method {
    /// Every routable method, in table order.
    pub const ALL: [Method; 7] = [
        Self::Get,
        Self::Post,
        Self::Put,
        Self::Patch,
        Self::Delete,
        Self::Options,
        Self::Head,
    ];

    /// Returns the uppercase wire representation (e.g. `"GET"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get     => "GET",
            Self::Post    => "POST",
            Self::Put     => "PUT",
            Self::Patch   => "PATCH",
            Self::Delete  => "DELETE",
            Self::Options => "OPTIONS",
            Self::Head    => "HEAD",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Parses an uppercase method token (e.g. `"GET"`). Case-sensitive per RFC 9110 §9.1.
impl FromStr for Method {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET"     => Ok(Self::Get),
            "POST"    => Ok(Self::Post),
            "PUT"     => Ok(Self::Put),
            "PATCH"   => Ok(Self::Patch),
            "DELETE"  => Ok(Self::Delete),
            "OPTIONS" => Ok(Self::Options),
            "HEAD"    => Ok(Self::Head),
            _         => Err(()),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── MethodSet ─────────────────────────────────────────────────────────────────

/// A set of [`Method`]s a single route declaration applies to.
///
/// Registration inserts the handler once per member; the members share no
/// routing state afterwards.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct MethodSet {
    members: [bool; Method::ALL.len()],
}

impl MethodSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        Self { members: [true; Method::ALL.len()] }
    }

    pub fn with(mut self, method: Method) -> Self {
        self.members[method.index()] = true;
        self
    }

    pub fn contains(&self, method: Method) -> bool {
        self.members[method.index()]
    }

    pub fn is_empty(&self) -> bool {
        !self.members.iter().any(|m| *m)
    }

    /// Members in table order.
    pub fn iter(&self) -> impl Iterator<Item = Method> + '_ {
        Method::ALL.into_iter().filter(|m| self.contains(*m))
    }
}

impl From<Method> for MethodSet {
    fn from(method: Method) -> Self {
        Self::empty().with(method)
    }
}

impl FromIterator<Method> for MethodSet {
    fn from_iter<I: IntoIterator<Item = Method>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), Self::with)
    }
}

impl BitOr for Method {
    type Output = MethodSet;

    fn bitor(self, rhs: Method) -> MethodSet {
        MethodSet::from(self).with(rhs)
    }
}

impl BitOr<Method> for MethodSet {
    type Output = MethodSet;

    fn bitor(self, rhs: Method) -> MethodSet {
        self.with(rhs)
    }
}

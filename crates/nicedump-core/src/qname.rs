//! Qualified names parsed back out of demangled symbol names.
//!
//! A [`QName`] is the tree form of a readable name such as
//! `kernel.Console!(int).write(char[],this)`: a chain of heads (the enclosing
//! scopes) ending in a namespace, function or template node with its own
//! argument list. Parsing and rendering are exact inverses.

use std::convert::Infallible;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// What the last segment of a qualified name denotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum QNameKind {
    /// An enclosing scope (module, aggregate) of another name.
    Namespace,
    /// A name followed by an argument list, `name(args)`.
    Function,
    /// A template instance, `name!(args)`.
    Template,
    /// An outermost name with no argument list, e.g. a data symbol.
    Unknown,
}

/// A node of a qualified-name tree.
///
/// Each node owns its parent scope by value; the chain is immutable once
/// built. Equality and hashing use the rendered form, so two names are equal
/// exactly when they print the same.
#[derive(Debug, Clone)]
pub struct QName {
    head: Option<Box<QName>>,
    kind: QNameKind,
    name: String,
    arguments: Vec<QName>,
}

impl QName {
    /// Creates a node from its parts.
    pub fn new(
        head: Option<QName>,
        kind: QNameKind,
        name: impl Into<String>,
        arguments: Vec<QName>,
    ) -> Self {
        Self {
            head: head.map(Box::new),
            kind,
            name: name.into(),
            arguments,
        }
    }

    /// Parses an outermost readable name.
    ///
    /// A final segment without an argument list is [`QNameKind::Unknown`].
    pub fn parse(readable: &str) -> Self {
        Self::parse_with(readable, true)
    }

    /// Parses a name that appears as a head or as an argument.
    ///
    /// A final segment without an argument list is [`QNameKind::Namespace`].
    pub fn parse_nested(readable: &str) -> Self {
        Self::parse_with(readable, false)
    }

    fn parse_with(readable: &str, top_level: bool) -> Self {
        // A leading dot has nothing to scope; it stays part of the name.
        let (head, tail) = match split_last_top_level(readable, b'.') {
            Some((head, tail)) if !head.is_empty() => {
                (Some(Box::new(Self::parse_nested(head))), tail)
            }
            _ => (None, readable),
        };

        let Some(open) = tail.find('(') else {
            let kind = if top_level {
                QNameKind::Unknown
            } else {
                QNameKind::Namespace
            };
            return Self {
                head,
                kind,
                name: tail.to_string(),
                arguments: Vec::new(),
            };
        };

        let (kind, name) = match tail[..open].strip_suffix('!') {
            Some(name) => (QNameKind::Template, name),
            None => (QNameKind::Function, &tail[..open]),
        };
        let inner = &tail[open + 1..];
        let inner = inner.strip_suffix(')').unwrap_or(inner);
        let arguments = split_top_level(inner, b',')
            .into_iter()
            .map(Self::parse_nested)
            .collect();

        Self {
            head,
            kind,
            name: name.to_string(),
            arguments,
        }
    }

    /// Returns the enclosing scope, `None` at the root.
    pub fn head(&self) -> Option<&QName> {
        self.head.as_deref()
    }

    pub fn kind(&self) -> QNameKind {
        self.kind
    }

    /// Returns the last segment's name without its argument list.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arguments(&self) -> &[QName] {
        &self.arguments
    }

    /// Returns true if this name has no enclosing scope.
    pub fn is_root(&self) -> bool {
        self.head.is_none()
    }

    /// Iterates over the enclosing scopes, innermost first.
    pub fn ancestors(&self) -> impl Iterator<Item = &QName> {
        std::iter::successors(self.head(), |q| q.head())
    }

    /// Number of enclosing scopes.
    pub fn depth(&self) -> usize {
        self.ancestors().count()
    }
}

/// Splits at the rightmost `sep` that is not inside parentheses.
fn split_last_top_level(s: &str, sep: u8) -> Option<(&str, &str)> {
    let mut depth: i32 = 0;
    for (i, b) in s.bytes().enumerate().rev() {
        match b {
            b')' => depth += 1,
            b'(' => depth -= 1,
            _ if b == sep && depth == 0 => return Some((&s[..i], &s[i + 1..])),
            _ => {}
        }
    }
    None
}

/// Splits on every `sep` that is not inside parentheses.
///
/// An empty input has no pieces.
fn split_top_level(s: &str, sep: u8) -> Vec<&str> {
    if s.is_empty() {
        return Vec::new();
    }

    let mut pieces = Vec::new();
    let mut depth: i32 = 0;
    let mut start = 0;
    for (i, b) in s.bytes().enumerate() {
        match b {
            b'(' => depth += 1,
            b')' => depth -= 1,
            _ if b == sep && depth == 0 => {
                pieces.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    pieces.push(&s[start..]);
    pieces
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(head) = &self.head {
            write!(f, "{}.", head)?;
        }
        f.write_str(&self.name)?;

        let open = match self.kind {
            QNameKind::Template => "!(",
            QNameKind::Function => "(",
            QNameKind::Namespace | QNameKind::Unknown => return Ok(()),
        };
        f.write_str(open)?;
        for (i, arg) in self.arguments.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", arg)?;
        }
        f.write_str(")")
    }
}

impl PartialEq for QName {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

impl Eq for QName {}

impl Hash for QName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

impl FromStr for QName {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for QName {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for QName {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for QName {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::parse(&s))
    }
}

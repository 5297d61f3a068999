//! Property key representation.
//!
//! Shapes key their tables by [`PropertyKey`] (a string or a symbol).
//! [`PropertyName`] additionally distinguishes integer indices, which are
//! stored in the object's indexed-property container rather than in the
//! shape.

use core_types::SymbolHandle;
use std::fmt;

/// A named property key as stored in a shape's property table: either a
/// string or a symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    /// An ordinary string-named property
    String(String),
    /// A symbol-keyed property
    Symbol(SymbolHandle),
}

impl PropertyKey {
    /// The string name, if this is a string key.
    pub fn as_string(&self) -> Option<&str> {
        match self {
            PropertyKey::String(name) => Some(name),
            PropertyKey::Symbol(_) => None,
        }
    }

    /// True for symbol keys.
    pub fn is_symbol(&self) -> bool {
        matches!(self, PropertyKey::Symbol(_))
    }
}

impl From<&str> for PropertyKey {
    fn from(name: &str) -> Self {
        PropertyKey::String(name.to_string())
    }
}

impl From<String> for PropertyKey {
    fn from(name: String) -> Self {
        PropertyKey::String(name)
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyKey::String(name) => f.write_str(name),
            PropertyKey::Symbol(handle) => write!(f, "Symbol(#{})", handle.index()),
        }
    }
}

/// A fully resolved property name: an array index, a string or a symbol.
///
/// Property writes with a canonical non-negative integer name go to the
/// indexed-property container; everything else goes through the shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyName {
    /// A canonical non-negative integer index
    Index(u32),
    /// A string-named property
    String(String),
    /// A symbol-keyed property
    Symbol(SymbolHandle),
}

impl PropertyName {
    /// Builds a property name from a string, detecting canonical array
    /// indices ("0", "7", but not "07", "-1" or "4294967296").
    pub fn from_string(name: impl Into<String>) -> Self {
        let name = name.into();
        if let Some(index) = Self::as_canonical_index(&name) {
            PropertyName::Index(index)
        } else {
            PropertyName::String(name)
        }
    }

    fn as_canonical_index(name: &str) -> Option<u32> {
        if name.is_empty() || (name.len() > 1 && name.starts_with('0')) {
            return None;
        }
        if !name.bytes().all(|byte| byte.is_ascii_digit()) {
            return None;
        }
        name.parse().ok()
    }

    /// The shape key for this name, or `None` for indices.
    pub fn as_property_key(&self) -> Option<PropertyKey> {
        match self {
            PropertyName::Index(_) => None,
            PropertyName::String(name) => Some(PropertyKey::String(name.clone())),
            PropertyName::Symbol(handle) => Some(PropertyKey::Symbol(*handle)),
        }
    }
}

impl fmt::Display for PropertyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyName::Index(index) => write!(f, "{}", index),
            PropertyName::String(name) => f.write_str(name),
            PropertyName::Symbol(handle) => write!(f, "Symbol(#{})", handle.index()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_indices() {
        assert_eq!(PropertyName::from_string("0"), PropertyName::Index(0));
        assert_eq!(PropertyName::from_string("42"), PropertyName::Index(42));
        assert_eq!(
            PropertyName::from_string("07"),
            PropertyName::String("07".to_string())
        );
        assert_eq!(
            PropertyName::from_string("-1"),
            PropertyName::String("-1".to_string())
        );
        assert_eq!(
            PropertyName::from_string("4294967296"),
            PropertyName::String("4294967296".to_string())
        );
        assert_eq!(
            PropertyName::from_string("x"),
            PropertyName::String("x".to_string())
        );
    }

    #[test]
    fn test_property_key_conversion() {
        assert_eq!(PropertyName::Index(1).as_property_key(), None);
        assert_eq!(
            PropertyName::from_string("foo").as_property_key(),
            Some(PropertyKey::String("foo".to_string()))
        );
    }
}

//! The in-memory value model.
//!
//! EDN distinguishes its collections syntactically: a vector, a list and a
//! set with the same elements are different values, and `Value` keeps that
//! identity. The `Sorted*` and `Record` variants only appear when the
//! [`Materialize`](crate::options::Materialize) policy asks for a host-native
//! projection.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};

/// A parsed EDN value.
#[derive(Debug, Clone)]
pub enum Value {
    /// `nil`
    Nil,

    /// `true` or `false`
    Bool(bool),

    /// Integer: `42`, `-7`, `+3`
    Integer(i64),

    /// Integer with the `N` marker, or one too wide for `i64`: `42N`
    BigInt(i128),

    /// Float: `3.14`, `1e5`, `2.5M`, `##Inf`
    Float(f64),

    /// String: `"hello"`
    String(String),

    /// Character: `\a`, `\space`, `é`
    Char(char),

    /// Keyword, stored without the leading colon: `:ns/name`
    Keyword(String),

    /// Symbol, stored verbatim: `even?`
    Symbol(String),

    /// Vector: `[a b c]`
    Vector(Vec<Value>),

    /// List: `(a b c)`
    List(Vec<Value>),

    /// Set in document order, duplicates kept: `#{a b}`
    Set(Vec<Value>),

    /// Map as key/value pairs in document order: `{k v}`
    Map(Vec<(Value, Value)>),

    /// Set projected onto an ordered host set.
    SortedSet(BTreeSet<Value>),

    /// Map projected onto an ordered host map.
    SortedMap(BTreeMap<Value, Value>),

    /// Map projected onto a string-keyed record.
    Record(BTreeMap<String, Value>),

    /// Tagged value with no handler: `#my/tag 5`
    Tagged(Tagged),

    /// Timestamp from the built-in `#inst` tag.
    Inst(DateTime<Utc>),
}

/// A tag name with the value it wraps.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tagged {
    pub tag: String,
    pub value: Box<Value>,
}

impl Value {
    /// Build a keyword from its name (without the colon).
    pub fn keyword(name: impl Into<String>) -> Self {
        Value::Keyword(name.into())
    }

    /// Build a symbol.
    pub fn symbol(name: impl Into<String>) -> Self {
        Value::Symbol(name.into())
    }

    /// Wrap a value in a generic tag.
    pub fn tagged(tag: impl Into<String>, value: Value) -> Self {
        Value::Tagged(Tagged { tag: tag.into(), value: Box::new(value) })
    }

    /// Check if this is a nil value.
    #[inline]
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Try to get as boolean.
    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get as integer.
    #[inline]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get as float.
    #[inline]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Try to get as string contents.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get the keyword name.
    #[inline]
    pub fn as_keyword(&self) -> Option<&str> {
        match self {
            Value::Keyword(k) => Some(k),
            _ => None,
        }
    }

    /// Try to get the symbol name.
    #[inline]
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Value::Symbol(s) => Some(s),
            _ => None,
        }
    }

    /// Elements of a vector, list or (unprojected) set.
    pub fn as_slice(&self) -> Option<&[Value]> {
        match self {
            Value::Vector(items) | Value::List(items) | Value::Set(items) => Some(items),
            _ => None,
        }
    }

    /// Try to get as timestamp.
    pub fn as_inst(&self) -> Option<&DateTime<Utc>> {
        match self {
            Value::Inst(t) => Some(t),
            _ => None,
        }
    }

    /// Short lowercase name of the variant, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::BigInt(_) => "bigint",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Char(_) => "character",
            Value::Keyword(_) => "keyword",
            Value::Symbol(_) => "symbol",
            Value::Vector(_) => "vector",
            Value::List(_) => "list",
            Value::Set(_) | Value::SortedSet(_) => "set",
            Value::Map(_) | Value::SortedMap(_) | Value::Record(_) => "map",
            Value::Tagged(_) => "tagged value",
            Value::Inst(_) => "inst",
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Nil => 0,
            Value::Bool(_) => 1,
            Value::Integer(_) => 2,
            Value::BigInt(_) => 3,
            Value::Float(_) => 4,
            Value::Char(_) => 5,
            Value::String(_) => 6,
            Value::Keyword(_) => 7,
            Value::Symbol(_) => 8,
            Value::Inst(_) => 9,
            Value::Tagged(_) => 10,
            Value::List(_) => 11,
            Value::Vector(_) => 12,
            Value::Set(_) => 13,
            Value::SortedSet(_) => 14,
            Value::Map(_) => 15,
            Value::SortedMap(_) => 16,
            Value::Record(_) => 17,
        }
    }
}

// Equality, ordering and hashing share one total order so values can key
// the sorted projections. Floats use `total_cmp`: NaN equals itself and
// -0.0 differs from 0.0.

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        use Value::*;

        match (self, other) {
            (Nil, Nil) => Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (BigInt(a), BigInt(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Char(a), Char(b)) => a.cmp(b),
            (String(a), String(b)) | (Keyword(a), Keyword(b)) | (Symbol(a), Symbol(b)) => a.cmp(b),
            (Inst(a), Inst(b)) => a.cmp(b),
            (Tagged(a), Tagged(b)) => a.cmp(b),
            (List(a), List(b)) | (Vector(a), Vector(b)) | (Set(a), Set(b)) => a.cmp(b),
            (SortedSet(a), SortedSet(b)) => a.cmp(b),
            (Map(a), Map(b)) => a.cmp(b),
            (SortedMap(a), SortedMap(b)) => a.cmp(b),
            (Record(a), Record(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u8(self.rank());
        match self {
            Value::Nil => {}
            Value::Bool(b) => b.hash(state),
            Value::Integer(i) => i.hash(state),
            Value::BigInt(i) => i.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Char(c) => c.hash(state),
            Value::String(s) | Value::Keyword(s) | Value::Symbol(s) => s.hash(state),
            Value::Inst(t) => t.hash(state),
            Value::Tagged(t) => t.hash(state),
            Value::List(items) | Value::Vector(items) | Value::Set(items) => items.hash(state),
            Value::SortedSet(items) => items.hash(state),
            Value::Map(pairs) => pairs.hash(state),
            Value::SortedMap(map) => map.hash(state),
            Value::Record(map) => map.hash(state),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::Char(c)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(t: DateTime<Utc>) -> Self {
        Value::Inst(t)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Nil, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_container_identity() {
        let items = vec![Value::Integer(1)];
        assert_ne!(Value::Vector(items.clone()), Value::List(items.clone()));
        assert_ne!(Value::List(items.clone()), Value::Set(items));
    }

    #[test]
    fn test_nil_is_a_value() {
        assert!(Value::Nil.is_nil());
        assert_eq!(Value::from(None::<i64>), Value::Nil);
        assert_eq!(Value::from(Some(3)), Value::Integer(3));
    }

    #[test]
    fn test_float_total_order() {
        assert_eq!(Value::Float(f64::NAN), Value::Float(f64::NAN));
        assert_ne!(Value::Float(0.0), Value::Float(-0.0));
        assert!(Value::Float(1.0) < Value::Float(2.0));
    }

    #[test]
    fn test_mixed_kinds_order_by_rank() {
        assert!(Value::Nil < Value::Bool(false));
        assert!(Value::Integer(100) < Value::Float(0.0));
        assert!(Value::keyword("a") < Value::symbol("a"));
    }

    #[test]
    fn test_hash_agrees_with_eq() {
        let mut set = HashSet::new();
        set.insert(Value::Vector(vec![Value::Float(f64::NAN), Value::keyword("k")]));
        assert!(set.contains(&Value::Vector(vec![Value::Float(f64::NAN), Value::keyword("k")])));
        assert!(!set.contains(&Value::List(vec![Value::Float(f64::NAN), Value::keyword("k")])));
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Value::from("hi").as_str(), Some("hi"));
        assert_eq!(Value::keyword("k").as_keyword(), Some("k"));
        assert_eq!(Value::symbol("s").as_symbol(), Some("s"));
        assert_eq!(Value::Integer(3).as_integer(), Some(3));
        assert_eq!(Value::Integer(3).as_str(), None);
        assert_eq!(
            Value::Set(vec![Value::Nil]).as_slice(),
            Some([Value::Nil].as_slice())
        );
        assert_eq!(Value::tagged("a/b", Value::Nil).type_name(), "tagged value");
    }
}

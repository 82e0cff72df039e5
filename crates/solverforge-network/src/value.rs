//! Values carried by tuples.
//!
//! A tuple element is either a reference to a live fact or a value derived
//! by a node (a group key or a collector result). [`Value`] is the closed
//! set of such elements; it is totally ordered so it can serve as a hash key,
//! a range key and a multiset element alike.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::fact_store::FactHandle;

/// An element of a tuple, a join key, a group key or a collector result.
#[derive(Debug, Clone)]
pub enum Value {
    /// Absent value (e.g. `min` over an empty group, `None` keys).
    Null,
    /// Boolean value.
    Bool(bool),
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit floating point, ordered by `total_cmp`.
    Float(f64),
    /// Shared string.
    Text(Arc<str>),
    /// Reference to a live fact.
    Fact(FactHandle),
    /// Ordered sequence of values.
    List(Arc<[Value]>),
}

/// Kind of a [`Value`], used to check joiner keys at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Int,
    Float,
    Text,
    Fact,
    List,
    /// Statically unknown (keys returned as [`Value`]); compatible with every kind.
    Any,
}

impl ValueKind {
    /// Returns true if keys of both kinds can ever compare equal.
    pub fn is_compatible_with(self, other: ValueKind) -> bool {
        self == other || self == ValueKind::Any || other == ValueKind::Any
    }

    /// Returns true if range queries over keys of this kind are meaningful.
    pub fn is_orderable(self) -> bool {
        !matches!(self, ValueKind::Fact | ValueKind::List)
    }
}

impl Value {
    /// Returns the kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Text(_) => ValueKind::Text,
            Value::Fact(_) => ValueKind::Fact,
            Value::List(_) => ValueKind::List,
        }
    }

    /// Returns true if this value is `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Attempts to extract an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Attempts to extract a float; integers widen.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Attempts to extract a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Attempts to extract a string.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to extract a fact handle.
    pub fn as_fact(&self) -> Option<FactHandle> {
        match self {
            Value::Fact(handle) => Some(*handle),
            _ => None,
        }
    }

    /// Attempts to extract a list.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Int(_) => 2,
            Value::Float(_) => 3,
            Value::Text(_) => 4,
            Value::Fact(_) => 5,
            Value::List(_) => 6,
        }
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            (Value::Fact(a), Value::Fact(b)) => a.cmp(b),
            (Value::List(a), Value::List(b)) => a.iter().cmp(b.iter()),
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
        self.rank().hash(state);
        match self {
            Value::Null => {}
            Value::Bool(v) => v.hash(state),
            Value::Int(v) => v.hash(state),
            // total_cmp equality is bitwise equality
            Value::Float(v) => v.to_bits().hash(state),
            Value::Text(v) => v.hash(state),
            Value::Fact(v) => v.hash(state),
            Value::List(items) => {
                items.len().hash(state);
                for item in items.iter() {
                    item.hash(state);
                }
            }
        }
    }
}

/// Conversion of key and mapping results into [`Value`]s.
///
/// `KIND` lets the network reject joiners whose two sides can never match
/// before any fact is inserted.
pub trait IntoValue {
    /// Kind of every value produced by `into_value`.
    const KIND: ValueKind;

    /// Converts into a tuple value.
    fn into_value(self) -> Value;
}

impl IntoValue for Value {
    const KIND: ValueKind = ValueKind::Any;

    #[inline]
    fn into_value(self) -> Value {
        self
    }
}

impl IntoValue for bool {
    const KIND: ValueKind = ValueKind::Bool;

    #[inline]
    fn into_value(self) -> Value {
        Value::Bool(self)
    }
}

macro_rules! impl_into_int_value {
    ($($t:ty),+) => {
        $(
            impl IntoValue for $t {
                const KIND: ValueKind = ValueKind::Int;

                #[inline]
                fn into_value(self) -> Value {
                    Value::Int(self as i64)
                }
            }
        )+
    };
}

impl_into_int_value!(i8, i16, i32, i64, u8, u16, u32, usize);

impl IntoValue for f64 {
    const KIND: ValueKind = ValueKind::Float;

    #[inline]
    fn into_value(self) -> Value {
        Value::Float(self)
    }
}

impl IntoValue for &str {
    const KIND: ValueKind = ValueKind::Text;

    fn into_value(self) -> Value {
        Value::Text(Arc::from(self))
    }
}

impl IntoValue for String {
    const KIND: ValueKind = ValueKind::Text;

    fn into_value(self) -> Value {
        Value::Text(Arc::from(self))
    }
}

impl IntoValue for Arc<str> {
    const KIND: ValueKind = ValueKind::Text;

    #[inline]
    fn into_value(self) -> Value {
        Value::Text(self)
    }
}

impl IntoValue for FactHandle {
    const KIND: ValueKind = ValueKind::Fact;

    #[inline]
    fn into_value(self) -> Value {
        Value::Fact(self)
    }
}

impl IntoValue for Vec<Value> {
    const KIND: ValueKind = ValueKind::List;

    fn into_value(self) -> Value {
        Value::List(self.into())
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    const KIND: ValueKind = T::KIND;

    #[inline]
    fn into_value(self) -> Value {
        match self {
            Some(v) => v.into_value(),
            None => Value::Null,
        }
    }
}

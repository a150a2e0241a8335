//! Runtime value model shared by every derived operation.
//!
//! Three value universes exist side by side. [`Value`] is the circuit-side
//! universe: the payloads handed to `encode`/`validate` and produced by
//! `decode`, where leaf contents stay opaque and may be symbolic
//! placeholders. [`PlainValue`] is the plain-data mirror produced by the
//! to-plain conversion and accepted by from-plain. [`AuxValue`] is the
//! auxiliary tree: the non-constrained metadata that travels next to the
//! flat field vector and is never flattened.

use core::any::Any;
use core::fmt;
use std::sync::Arc;

use num_bigint::BigInt;

/// Opaque value owned by a leaf type.
///
/// The engine never inspects leaf contents; it only moves them around,
/// compares them through [`LeafValue::eq_dyn`] and hands them back to the
/// leaf that produced them. A blanket implementation covers every ordinary
/// Rust type, so leaf authors store whatever their codec needs.
pub trait LeafValue: fmt::Debug + Send + Sync + 'static {
    /// Returns the value as [`Any`] for downcasting by the owning leaf.
    fn as_any(&self) -> &dyn Any;
    /// Leaf-defined equality across type-erased values.
    fn eq_dyn(&self, other: &dyn LeafValue) -> bool;
}

impl<T> LeafValue for T
where
    T: Any + fmt::Debug + PartialEq + Send + Sync,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn eq_dyn(&self, other: &dyn LeafValue) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .map_or(false, |rhs| self == rhs)
    }
}

/// Circuit-side value conforming to some schema.
#[derive(Debug, Clone)]
pub enum Value {
    /// Numeric primitive payload.
    Number(f64),
    /// Text primitive payload.
    Text(String),
    /// Boolean primitive payload.
    Bool(bool),
    /// Arbitrary-precision integer primitive payload.
    BigInt(BigInt),
    /// Payload of the absent primitive kinds.
    Unit,
    /// Fixed-arity heterogeneous composite.
    Tuple(Vec<Value>),
    /// Keyed composite; entry order is not significant, lookup is by key.
    Record(Vec<(String, Value)>),
    /// Opaque leaf payload, owned by the leaf that produced it.
    Opaque(Arc<dyn LeafValue>),
}

impl Value {
    /// Wraps an arbitrary leaf payload as an opaque value.
    pub fn opaque<T>(payload: T) -> Self
    where
        T: LeafValue,
    {
        Value::Opaque(Arc::new(payload))
    }

    /// Builds a record value from key/value pairs.
    pub fn record<K>(entries: Vec<(K, Value)>) -> Self
    where
        K: Into<String>,
    {
        Value::Record(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Looks up a record entry by key.
    pub fn entry(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Record(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Downcasts an opaque leaf payload to its concrete type.
    pub fn downcast_opaque<T: 'static>(&self) -> Option<&T> {
        match self {
            Value::Opaque(payload) => payload.as_any().downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Short name of the value's shape, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Text(_) => "text",
            Value::Bool(_) => "boolean",
            Value::BigInt(_) => "bigint",
            Value::Unit => "unit",
            Value::Tuple(_) => "tuple",
            Value::Record(_) => "record",
            Value::Opaque(_) => "opaque",
        }
    }
}

/// Key-based equality for record-shaped entry lists.
///
/// Decoders emit entries in canonical key order while callers are free to
/// construct them in declaration order; equality must not depend on which
/// order a value took.
fn entries_eq<V: PartialEq>(a: &[(String, V)], b: &[(String, V)]) -> bool {
    a.len() == b.len()
        && a.iter()
            .all(|(key, value)| b.iter().any(|(k, v)| k == key && v == value))
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::BigInt(a), Value::BigInt(b)) => a == b,
            (Value::Unit, Value::Unit) => true,
            (Value::Tuple(a), Value::Tuple(b)) => a == b,
            (Value::Record(a), Value::Record(b)) => entries_eq(a, b),
            (Value::Opaque(a), Value::Opaque(b)) => a.eq_dyn(b.as_ref()),
            _ => false,
        }
    }
}

/// Plain-data mirror of [`Value`] used by the to-plain/from-plain pair.
///
/// Leaf types choose their own plain representation (a canonical integer for
/// a field element, a coordinate map for a curve point); composites mirror
/// their structure as lists and maps.
#[derive(Debug, Clone)]
pub enum PlainValue {
    /// Numeric scalar.
    Number(f64),
    /// Text scalar.
    Text(String),
    /// Boolean scalar.
    Bool(bool),
    /// Arbitrary-precision integer scalar.
    BigInt(BigInt),
    /// Plain form of the absent primitive kinds.
    Unit,
    /// Positional composite.
    List(Vec<PlainValue>),
    /// Keyed composite.
    Map(Vec<(String, PlainValue)>),
}

impl PlainValue {
    /// Looks up a map entry by key.
    pub fn entry(&self, key: &str) -> Option<&PlainValue> {
        match self {
            PlainValue::Map(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Short name of the value's shape, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            PlainValue::Number(_) => "number",
            PlainValue::Text(_) => "text",
            PlainValue::Bool(_) => "boolean",
            PlainValue::BigInt(_) => "bigint",
            PlainValue::Unit => "unit",
            PlainValue::List(_) => "list",
            PlainValue::Map(_) => "map",
        }
    }
}

impl PartialEq for PlainValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (PlainValue::Number(a), PlainValue::Number(b)) => a == b,
            (PlainValue::Text(a), PlainValue::Text(b)) => a == b,
            (PlainValue::Bool(a), PlainValue::Bool(b)) => a == b,
            (PlainValue::BigInt(a), PlainValue::BigInt(b)) => a == b,
            (PlainValue::Unit, PlainValue::Unit) => true,
            (PlainValue::List(a), PlainValue::List(b)) => a == b,
            (PlainValue::Map(a), PlainValue::Map(b)) => entries_eq(a, b),
            _ => false,
        }
    }
}

/// Auxiliary metadata tree isomorphic to the schema that produced it.
///
/// Unlike the field vector this tree is never flattened: decoders address it
/// positionally, slot by slot and key by key. Primitive leaves occupy one
/// scalar slot, opaque leaves contribute one blob chosen by the leaf itself,
/// and the absent kinds contribute nothing.
#[derive(Debug, Clone)]
pub enum AuxValue {
    /// No auxiliary data (absent primitive kinds).
    Empty,
    /// One auxiliary slot carrying a primitive's runtime value.
    Scalar(Value),
    /// Per-slot auxiliary data of a tuple.
    Items(Vec<AuxValue>),
    /// Per-key auxiliary data of a record, in canonical key order.
    Entries(Vec<(String, AuxValue)>),
    /// Opaque blob chosen by a leaf.
    Opaque(Arc<dyn LeafValue>),
}

impl AuxValue {
    /// Wraps an arbitrary leaf blob as opaque auxiliary data.
    pub fn opaque<T>(payload: T) -> Self
    where
        T: LeafValue,
    {
        AuxValue::Opaque(Arc::new(payload))
    }

    /// Downcasts an opaque auxiliary blob to its concrete type.
    pub fn downcast_opaque<T: 'static>(&self) -> Option<&T> {
        match self {
            AuxValue::Opaque(payload) => payload.as_any().downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Short name of the node's shape, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            AuxValue::Empty => "empty",
            AuxValue::Scalar(_) => "scalar",
            AuxValue::Items(_) => "items",
            AuxValue::Entries(_) => "entries",
            AuxValue::Opaque(_) => "opaque",
        }
    }
}

impl PartialEq for AuxValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (AuxValue::Empty, AuxValue::Empty) => true,
            (AuxValue::Scalar(a), AuxValue::Scalar(b)) => a == b,
            (AuxValue::Items(a), AuxValue::Items(b)) => a == b,
            (AuxValue::Entries(a), AuxValue::Entries(b)) => a == b,
            (AuxValue::Opaque(a), AuxValue::Opaque(b)) => a.eq_dyn(b.as_ref()),
            _ => false,
        }
    }
}

//! Structural type descriptions driving the codec engine.
//!
//! A [`Schema`] is a closed, acyclic tree over four node shapes: primitive
//! markers, opaque leaves, fixed-arity tuples and keyed records. Every
//! derived operation is a pure function of this tree; the tree itself is
//! checked at construction, so the walkers never meet an unrecognized node.

use core::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::codec::{CodecError, CodecResult};

pub mod descriptor;
pub mod digest;
pub mod leaf;

pub use descriptor::{parse_descriptor, LeafRegistry};
pub use digest::{schema_digest, SchemaDigest};
pub use leaf::{JsonValue, LeafHandle, LeafType};

/// Atomic scalar kinds carried entirely in auxiliary data.
///
/// Every kind contributes zero field width. The two absent kinds exist so
/// descriptors can distinguish deliberately missing slots from the other
/// scalars; both decode to the unit value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrimitiveKind {
    /// Numeric scalar.
    Number,
    /// Text scalar.
    Text,
    /// Boolean scalar.
    Boolean,
    /// Arbitrary-precision integer scalar.
    BigInt,
    /// Absent slot declared as undefined.
    Undefined,
    /// Absent slot declared as null.
    Null,
}

impl PrimitiveKind {
    /// Canonical descriptor name of the kind.
    pub const fn name(&self) -> &'static str {
        match self {
            PrimitiveKind::Number => "number",
            PrimitiveKind::Text => "string",
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::BigInt => "bigint",
            PrimitiveKind::Undefined => "undefined",
            PrimitiveKind::Null => "null",
        }
    }

    /// Returns `true` for the absent kinds.
    pub const fn is_absent(&self) -> bool {
        matches!(self, PrimitiveKind::Undefined | PrimitiveKind::Null)
    }
}

/// Structural type description.
///
/// Record entries are held in canonical (ascending key) order; that order is
/// a binding contract shared with every consumer of the derived encodings,
/// not an implementation artifact.
#[derive(Clone)]
pub enum Schema {
    /// Atomic scalar marker.
    Primitive(PrimitiveKind),
    /// Opaque terminal providing its own codec.
    Leaf(LeafHandle),
    /// Fixed-arity heterogeneous composite.
    Tuple(Vec<Schema>),
    /// Keyed composite in canonical key order.
    Record(Vec<(String, Schema)>),
}

impl Schema {
    /// Builds a primitive marker node.
    pub const fn primitive(kind: PrimitiveKind) -> Self {
        Schema::Primitive(kind)
    }

    /// Shorthand for the numeric primitive.
    pub const fn number() -> Self {
        Schema::Primitive(PrimitiveKind::Number)
    }

    /// Shorthand for the text primitive.
    pub const fn text() -> Self {
        Schema::Primitive(PrimitiveKind::Text)
    }

    /// Shorthand for the boolean primitive.
    pub const fn boolean() -> Self {
        Schema::Primitive(PrimitiveKind::Boolean)
    }

    /// Shorthand for the arbitrary-precision integer primitive.
    pub const fn big_int() -> Self {
        Schema::Primitive(PrimitiveKind::BigInt)
    }

    /// Wraps a leaf operation set as a terminal node.
    pub fn leaf<T>(ops: T) -> Self
    where
        T: LeafType + 'static,
    {
        Schema::Leaf(LeafHandle::new(Arc::new(ops)))
    }

    /// Wraps an already shared leaf operation set as a terminal node.
    pub fn leaf_shared(ops: Arc<dyn LeafType>) -> Self {
        Schema::Leaf(LeafHandle::new(ops))
    }

    /// Unwraps a node that carries a nested capability object.
    ///
    /// The wrapper is unwrapped exactly once at construction; the result is
    /// an ordinary leaf node and is treated identically from then on.
    pub fn wrapper(ops: Arc<dyn LeafType>) -> Self {
        Schema::Leaf(LeafHandle::new(ops))
    }

    /// Builds a fixed-arity tuple node.
    pub fn tuple(items: Vec<Schema>) -> Self {
        Schema::Tuple(items)
    }

    /// Builds a homogeneous fixed-length tuple node.
    pub fn array(element: Schema, length: usize) -> Self {
        Schema::Tuple(vec![element; length])
    }

    /// Builds a record node, sorting entries into canonical key order.
    ///
    /// Duplicate keys are rejected: two entries with the same name would
    /// make the canonical traversal ambiguous.
    pub fn record<K>(entries: Vec<(K, Schema)>) -> CodecResult<Self>
    where
        K: Into<String>,
    {
        let mut entries: Vec<(String, Schema)> = entries
            .into_iter()
            .map(|(key, schema)| (key.into(), schema))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        for pair in entries.windows(2) {
            if pair[0].0 == pair[1].0 {
                return Err(CodecError::validation(
                    "record",
                    format!("duplicate key \"{}\"", pair[0].0),
                ));
            }
        }
        Ok(Schema::Record(entries))
    }

    /// Returns `true` for terminal (leaf) nodes.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Schema::Leaf(_))
    }

    /// Nesting depth of the description, counting this node.
    pub fn depth(&self) -> usize {
        match self {
            Schema::Primitive(_) | Schema::Leaf(_) => 1,
            Schema::Tuple(items) => {
                1 + items.iter().map(Schema::depth).max().unwrap_or(0)
            }
            Schema::Record(entries) => {
                1 + entries.iter().map(|(_, s)| s.depth()).max().unwrap_or(0)
            }
        }
    }

    /// Human-readable name of the node, used in diagnostics.
    pub fn display_name(&self) -> String {
        match self {
            Schema::Primitive(kind) => kind.name().to_string(),
            Schema::Leaf(handle) => handle.display_name(),
            Schema::Tuple(_) => "tuple".to_string(),
            Schema::Record(_) => "anonymous record".to_string(),
        }
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Schema::Primitive(kind) => f.debug_tuple("Primitive").field(kind).finish(),
            Schema::Leaf(handle) => f.debug_tuple("Leaf").field(&handle.display_name()).finish(),
            Schema::Tuple(items) => f.debug_tuple("Tuple").field(items).finish(),
            Schema::Record(entries) => {
                let mut map = f.debug_map();
                for (key, schema) in entries {
                    map.entry(key, schema);
                }
                map.finish()
            }
        }
    }
}

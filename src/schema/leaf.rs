//! Capability contract implemented by every terminal codec.
//!
//! A leaf is an opaque terminal in a schema tree: the engine never inspects
//! its internals and delegates entirely to the operations below. The first
//! eight methods are required of every leaf and are checked at construction
//! by the type system. The remaining methods form the optional human/hash
//! surface: returning `None` signals that the capability is absent, which
//! the walkers either tolerate (identity canonicalization, field-based hash
//! inputs) or report as a missing capability naming the method.

use std::sync::Arc;

use crate::codec::{CodecResult, HashInput};
use crate::field::FieldElement;
use crate::value::{AuxValue, PlainValue, Value};

/// JSON payload consumed and produced by the human-readable surface.
pub type JsonValue = serde_json::Value;

/// Operations every leaf type must provide.
///
/// A derived composite implements this same trait, so composites and leaves
/// are indistinguishable to consumers and a derived codec can itself be
/// embedded as a leaf of a larger schema.
pub trait LeafType: Send + Sync {
    /// Human-readable name used in diagnostics.
    fn display_name(&self) -> String;

    /// Number of field elements the leaf occupies. Value-independent.
    fn size_in_fields(&self) -> usize;

    /// Encodes a value into exactly [`LeafType::size_in_fields`] elements.
    fn to_fields(&self, value: &Value) -> CodecResult<Vec<FieldElement>>;

    /// Reconstructs a value from its field slice and auxiliary data.
    ///
    /// Decoded values may be symbolic placeholders that are witnessed later;
    /// implementations must not assume concrete data.
    fn from_fields(&self, fields: &[FieldElement], aux: &AuxValue) -> CodecResult<Value>;

    /// Produces the leaf's auxiliary blob.
    ///
    /// Called without a value during shape-only derivation; the leaf then
    /// returns its canonical default auxiliary data.
    fn to_auxiliary(&self, value: Option<&Value>) -> CodecResult<AuxValue>;

    /// Checks that a value conforms to the leaf's invariants.
    fn validate(&self, value: &Value) -> CodecResult<()>;

    /// Converts a value into its plain-data representation.
    fn to_plain(&self, value: &Value) -> CodecResult<PlainValue>;

    /// Reconstructs a value from its plain-data representation.
    fn from_plain(&self, plain: &PlainValue) -> CodecResult<Value>;

    /// Canonicalizes a value. Absent capability defaults to identity.
    fn to_canonical(&self, value: &Value) -> Option<CodecResult<Value>> {
        let _ = value;
        None
    }

    /// Hash-input descriptor. Absent capability falls back to the field
    /// encoding.
    fn hash_input(&self, value: &Value) -> Option<CodecResult<HashInput>> {
        let _ = value;
        None
    }

    /// Human-readable JSON encoding.
    fn to_json(&self, value: &Value) -> Option<CodecResult<JsonValue>> {
        let _ = value;
        None
    }

    /// Reconstruction from the human-readable JSON encoding.
    fn from_json(&self, json: &JsonValue) -> Option<CodecResult<Value>> {
        let _ = json;
        None
    }

    /// Canonical default value.
    fn empty(&self) -> Option<CodecResult<Value>> {
        None
    }
}

/// Shared handle to a leaf's operations, embedded in a schema tree.
#[derive(Clone)]
pub struct LeafHandle {
    ops: Arc<dyn LeafType>,
}

impl LeafHandle {
    /// Wraps a shared leaf operation set.
    pub fn new(ops: Arc<dyn LeafType>) -> Self {
        Self { ops }
    }

    /// Returns the leaf's operations.
    pub fn ops(&self) -> &dyn LeafType {
        self.ops.as_ref()
    }

    /// Returns the leaf's display name.
    pub fn display_name(&self) -> String {
        self.ops.display_name()
    }
}

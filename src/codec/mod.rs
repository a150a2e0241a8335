//! The derivation engine.
//!
//! A [`Schema`] passed through this module exposes the full twelve-operation
//! codec surface: field width, field encoding and decoding, auxiliary
//! encoding, validation, canonicalization, both plain-value conversions,
//! hash-input derivation, both human JSON conversions and the canonical
//! default. All twelve are generated from the same structural description
//! and share one recursive dispatch order, which keeps them mutually
//! consistent by construction.
//!
//! `Schema` also implements [`LeafType`], so a derived composite is
//! indistinguishable from a leaf and can itself be embedded as a terminal of
//! a larger schema.

mod error;
mod hash_input;
mod human;
pub(crate) mod walker;

pub use error::{CodecError, CodecResult};
pub use hash_input::{HashInput, PACKED_BIT_CAPACITY};
pub use human::TerminatePredicate;

use crate::field::FieldElement;
use crate::schema::{JsonValue, LeafType, Schema};
use crate::value::{AuxValue, PlainValue, Value};

impl Schema {
    /// Number of field elements a conforming value occupies.
    ///
    /// A pure function of the description alone, independent of any value.
    pub fn size_in_fields(&self) -> usize {
        walker::size_in_fields(self)
    }

    /// Encodes a value into a flat field vector of exactly
    /// [`Schema::size_in_fields`] elements, concatenating leaf field arrays
    /// left to right, depth first.
    pub fn to_fields(&self, value: &Value) -> CodecResult<Vec<FieldElement>> {
        walker::to_fields_at(self, value, 0)
    }

    /// Produces the auxiliary tree for a value.
    ///
    /// Called without a value, every slot is filled with its canonical
    /// default, which is what shape-only derivation relies on.
    pub fn to_auxiliary(&self, value: Option<&Value>) -> CodecResult<AuxValue> {
        walker::to_auxiliary_at(self, value, 0)
    }

    /// Reconstructs a value from its flat field vector and auxiliary tree.
    ///
    /// The field vector is consumed by contiguous cumulative-size slicing;
    /// the auxiliary tree by positional indexing. The vector's total length
    /// must equal the schema's width.
    pub fn from_fields(&self, fields: &[FieldElement], aux: &AuxValue) -> CodecResult<Value> {
        let expected = self.size_in_fields();
        if fields.len() != expected {
            return Err(CodecError::arity_mismatch("fields", expected, fields.len()));
        }
        walker::from_fields_at(self, fields, aux, 0)
    }

    /// Checks that a value conforms to the schema, recursing into every
    /// sub-node.
    pub fn validate(&self, value: &Value) -> CodecResult<()> {
        walker::validate_at(self, value, 0)
    }

    /// Canonicalizes a value; leaves without the capability pass through
    /// unchanged.
    pub fn to_canonical(&self, value: &Value) -> CodecResult<Value> {
        walker::to_canonical_at(self, value, 0)
    }

    /// Converts a value into its plain-data representation.
    pub fn to_plain(&self, value: &Value) -> CodecResult<PlainValue> {
        walker::to_plain_at(self, value, 0)
    }

    /// Reconstructs a value from its plain-data representation.
    pub fn from_plain(&self, plain: &PlainValue) -> CodecResult<Value> {
        walker::from_plain_at(self, plain, 0)
    }

    /// Derives the hash-input descriptor for a value.
    ///
    /// Leaf contributions are concatenated in encode order, so downstream
    /// domain separation stays aligned with [`Schema::to_fields`].
    pub fn hash_input(&self, value: &Value) -> CodecResult<HashInput> {
        human::hash_input_at(self, value, 0)
    }

    /// Encodes a value as human-readable JSON.
    pub fn to_json(&self, value: &Value) -> CodecResult<JsonValue> {
        human::to_json_at(self, value, 0, &human::terminate_at_leaves)
    }

    /// Encodes a value as human-readable JSON with a caller-supplied
    /// terminate predicate deciding which composites are opaque.
    pub fn to_json_with(
        &self,
        value: &Value,
        terminate: TerminatePredicate<'_>,
    ) -> CodecResult<JsonValue> {
        human::to_json_at(self, value, 0, terminate)
    }

    /// Reconstructs a value from its human-readable JSON encoding.
    pub fn from_json(&self, json: &JsonValue) -> CodecResult<Value> {
        human::from_json_at(self, json, 0, &human::terminate_at_leaves)
    }

    /// Reconstructs a value from JSON with a caller-supplied terminate
    /// predicate.
    pub fn from_json_with(
        &self,
        json: &JsonValue,
        terminate: TerminatePredicate<'_>,
    ) -> CodecResult<Value> {
        human::from_json_at(self, json, 0, terminate)
    }

    /// Produces the canonical default value of the schema.
    pub fn empty(&self) -> CodecResult<Value> {
        human::empty_at(self, 0, &human::terminate_at_leaves)
    }

    /// Produces the canonical default value with a caller-supplied terminate
    /// predicate.
    pub fn empty_with(&self, terminate: TerminatePredicate<'_>) -> CodecResult<Value> {
        human::empty_at(self, 0, terminate)
    }
}

impl LeafType for Schema {
    fn display_name(&self) -> String {
        Schema::display_name(self)
    }

    fn size_in_fields(&self) -> usize {
        Schema::size_in_fields(self)
    }

    fn to_fields(&self, value: &Value) -> CodecResult<Vec<FieldElement>> {
        Schema::to_fields(self, value)
    }

    fn from_fields(&self, fields: &[FieldElement], aux: &AuxValue) -> CodecResult<Value> {
        Schema::from_fields(self, fields, aux)
    }

    fn to_auxiliary(&self, value: Option<&Value>) -> CodecResult<AuxValue> {
        Schema::to_auxiliary(self, value)
    }

    fn validate(&self, value: &Value) -> CodecResult<()> {
        Schema::validate(self, value)
    }

    fn to_plain(&self, value: &Value) -> CodecResult<PlainValue> {
        Schema::to_plain(self, value)
    }

    fn from_plain(&self, plain: &PlainValue) -> CodecResult<Value> {
        Schema::from_plain(self, plain)
    }

    fn to_canonical(&self, value: &Value) -> Option<CodecResult<Value>> {
        Some(Schema::to_canonical(self, value))
    }

    fn hash_input(&self, value: &Value) -> Option<CodecResult<HashInput>> {
        Some(Schema::hash_input(self, value))
    }

    fn to_json(&self, value: &Value) -> Option<CodecResult<JsonValue>> {
        Some(Schema::to_json(self, value))
    }

    fn from_json(&self, json: &JsonValue) -> Option<CodecResult<Value>> {
        Some(Schema::from_json(self, json))
    }

    fn empty(&self) -> Option<CodecResult<Value>> {
        Some(Schema::empty(self))
    }
}

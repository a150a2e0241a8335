//! Nominal wrapper giving a schema a reusable named identity.
//!
//! A [`NamedType`] delegates every derived operation to the underlying
//! schema and re-tags the results as belonging to the named type: the name
//! feeds diagnostics, digests and the human-readable surface. Re-tagging
//! never runs user construction logic — values produced during decode may be
//! symbolic placeholders that are witnessed later, so allocation must not
//! trigger side effects that assume concrete data.

use crate::codec::{CodecResult, HashInput};
use crate::field::FieldElement;
use crate::schema::{JsonValue, LeafType, Schema};
use crate::value::{AuxValue, PlainValue, Value};

/// A schema with a reusable named identity and construction surface.
#[derive(Debug, Clone)]
pub struct NamedType {
    name: String,
    schema: Schema,
}

impl NamedType {
    /// Wraps a schema under the given name.
    pub fn new(name: impl Into<String>, schema: Schema) -> Self {
        Self {
            name: name.into(),
            schema,
        }
    }

    /// The type's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The underlying structural description.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Constructs an instance from plain data.
    ///
    /// This is the named constructor surface: the plain representation is
    /// converted structurally, with no user construction logic involved.
    pub fn instance(&self, plain: &PlainValue) -> CodecResult<Value> {
        self.schema.from_plain(plain)
    }
}

impl LeafType for NamedType {
    fn display_name(&self) -> String {
        self.name.clone()
    }

    fn size_in_fields(&self) -> usize {
        self.schema.size_in_fields()
    }

    fn to_fields(&self, value: &Value) -> CodecResult<Vec<FieldElement>> {
        self.schema.to_fields(value)
    }

    fn from_fields(&self, fields: &[FieldElement], aux: &AuxValue) -> CodecResult<Value> {
        self.schema.from_fields(fields, aux)
    }

    fn to_auxiliary(&self, value: Option<&Value>) -> CodecResult<AuxValue> {
        self.schema.to_auxiliary(value)
    }

    fn validate(&self, value: &Value) -> CodecResult<()> {
        self.schema.validate(value)
    }

    fn to_plain(&self, value: &Value) -> CodecResult<PlainValue> {
        self.schema.to_plain(value)
    }

    fn from_plain(&self, plain: &PlainValue) -> CodecResult<Value> {
        self.schema.from_plain(plain)
    }

    fn to_canonical(&self, value: &Value) -> Option<CodecResult<Value>> {
        Some(self.schema.to_canonical(value))
    }

    fn hash_input(&self, value: &Value) -> Option<CodecResult<HashInput>> {
        Some(self.schema.hash_input(value))
    }

    fn to_json(&self, value: &Value) -> Option<CodecResult<JsonValue>> {
        Some(self.schema.to_json(value))
    }

    fn from_json(&self, json: &JsonValue) -> Option<CodecResult<Value>> {
        Some(self.schema.from_json(json))
    }

    fn empty(&self) -> Option<CodecResult<Value>> {
        Some(self.schema.empty())
    }
}

//! The human/hash sibling of the primary walkers.
//!
//! Hash-input descriptors, human-readable JSON encodings and canonical
//! default values are derived by a second, independently parameterized
//! recursion. The JSON and default walkers accept a caller-supplied
//! terminate predicate: when recursion reaches a node the predicate flags as
//! "this is an opaque circuit type, not a plain composite" and the node
//! lacks the needed method, the walker fails naming the method and the type
//! instead of silently serializing the node as a generic record.

use serde_json::{Map, Number};

use crate::codec::error::{CodecError, CodecResult};
use crate::codec::hash_input::HashInput;
use crate::codec::walker::{guard_depth, primitive_default, record_entry, tuple_slots};
use crate::schema::{JsonValue, PrimitiveKind, Schema};
use crate::value::Value;

/// Predicate deciding whether a composite node must be treated as opaque.
pub type TerminatePredicate<'a> = &'a dyn Fn(&Schema) -> bool;

/// Default predicate: only genuine leaves terminate recursion.
pub(crate) fn terminate_at_leaves(schema: &Schema) -> bool {
    schema.is_leaf()
}

pub(crate) fn hash_input_at(schema: &Schema, value: &Value, depth: usize) -> CodecResult<HashInput> {
    guard_depth(depth)?;
    match schema {
        Schema::Primitive(_) => Ok(HashInput::empty()),
        Schema::Leaf(handle) => match handle.ops().hash_input(value) {
            Some(input) => input,
            // A leaf without its own descriptor is absorbed as raw fields.
            None => Ok(HashInput::from_fields(handle.ops().to_fields(value)?)),
        },
        Schema::Tuple(items) => {
            let slots = tuple_slots(value, items.len(), "tuple")?;
            let mut out = HashInput::empty();
            for (item, slot) in items.iter().zip(slots) {
                out = out.append(hash_input_at(item, slot, depth + 1)?);
            }
            Ok(out)
        }
        Schema::Record(entries) => {
            let mut out = HashInput::empty();
            for (key, item) in entries {
                let slot = record_entry(value, key)?;
                out = out.append(hash_input_at(item, slot, depth + 1)?);
            }
            Ok(out)
        }
    }
}

fn primitive_to_json(kind: PrimitiveKind, value: &Value) -> CodecResult<JsonValue> {
    match (kind, value) {
        (PrimitiveKind::Number, Value::Number(n)) => Number::from_f64(*n)
            .map(JsonValue::Number)
            .ok_or_else(|| CodecError::validation("number", "not representable in JSON")),
        (PrimitiveKind::Text, Value::Text(s)) => Ok(JsonValue::String(s.clone())),
        (PrimitiveKind::Boolean, Value::Bool(b)) => Ok(JsonValue::Bool(*b)),
        (PrimitiveKind::BigInt, Value::BigInt(i)) => Ok(JsonValue::String(i.to_string())),
        (PrimitiveKind::Undefined | PrimitiveKind::Null, Value::Unit) => Ok(JsonValue::Null),
        (kind, other) => Err(CodecError::shape_mismatch(kind.name(), other.kind_name())),
    }
}

pub(crate) fn to_json_at(
    schema: &Schema,
    value: &Value,
    depth: usize,
    terminate: TerminatePredicate<'_>,
) -> CodecResult<JsonValue> {
    guard_depth(depth)?;
    match schema {
        Schema::Primitive(kind) => primitive_to_json(*kind, value),
        Schema::Leaf(handle) => handle
            .ops()
            .to_json(value)
            .unwrap_or_else(|| Err(CodecError::missing_capability("to_json", handle.display_name()))),
        Schema::Tuple(items) => {
            let slots = tuple_slots(value, items.len(), "tuple")?;
            let mut out = Vec::with_capacity(items.len());
            for (item, slot) in items.iter().zip(slots) {
                out.push(to_json_at(item, slot, depth + 1, terminate)?);
            }
            Ok(JsonValue::Array(out))
        }
        Schema::Record(entries) => {
            if terminate(schema) {
                return Err(CodecError::missing_capability("to_json", schema.display_name()));
            }
            let mut out = Map::with_capacity(entries.len());
            for (key, item) in entries {
                let slot = record_entry(value, key)?;
                out.insert(key.clone(), to_json_at(item, slot, depth + 1, terminate)?);
            }
            Ok(JsonValue::Object(out))
        }
    }
}

fn primitive_from_json(kind: PrimitiveKind, json: &JsonValue) -> CodecResult<Value> {
    match kind {
        PrimitiveKind::Number => json
            .as_f64()
            .map(Value::Number)
            .ok_or_else(|| CodecError::shape_mismatch("number", "JSON value")),
        PrimitiveKind::Text => json
            .as_str()
            .map(|s| Value::Text(s.to_string()))
            .ok_or_else(|| CodecError::shape_mismatch("text", "JSON value")),
        PrimitiveKind::Boolean => json
            .as_bool()
            .map(Value::Bool)
            .ok_or_else(|| CodecError::shape_mismatch("boolean", "JSON value")),
        PrimitiveKind::BigInt => {
            let literal = json
                .as_str()
                .ok_or_else(|| CodecError::shape_mismatch("bigint", "JSON value"))?;
            literal
                .parse()
                .map(Value::BigInt)
                .map_err(|_| CodecError::validation("bigint", "invalid integer literal"))
        }
        // The absent kinds carry no information; the JSON payload is ignored.
        PrimitiveKind::Undefined | PrimitiveKind::Null => Ok(Value::Unit),
    }
}

pub(crate) fn from_json_at(
    schema: &Schema,
    json: &JsonValue,
    depth: usize,
    terminate: TerminatePredicate<'_>,
) -> CodecResult<Value> {
    guard_depth(depth)?;
    match schema {
        Schema::Primitive(kind) => primitive_from_json(*kind, json),
        Schema::Leaf(handle) => handle
            .ops()
            .from_json(json)
            .unwrap_or_else(|| Err(CodecError::missing_capability("from_json", handle.display_name()))),
        Schema::Tuple(items) => {
            let slots = json
                .as_array()
                .ok_or_else(|| CodecError::shape_mismatch("tuple", "JSON value"))?;
            if slots.len() != items.len() {
                return Err(CodecError::arity_mismatch("tuple", items.len(), slots.len()));
            }
            let mut out = Vec::with_capacity(items.len());
            for (item, slot) in items.iter().zip(slots) {
                out.push(from_json_at(item, slot, depth + 1, terminate)?);
            }
            Ok(Value::Tuple(out))
        }
        Schema::Record(entries) => {
            if terminate(schema) {
                return Err(CodecError::missing_capability("from_json", schema.display_name()));
            }
            let object = json
                .as_object()
                .ok_or_else(|| CodecError::shape_mismatch("record", "JSON value"))?;
            let mut out = Vec::with_capacity(entries.len());
            for (key, item) in entries {
                let slot = object
                    .get(key)
                    .ok_or_else(|| CodecError::missing_entry(key.clone()))?;
                out.push((key.clone(), from_json_at(item, slot, depth + 1, terminate)?));
            }
            Ok(Value::Record(out))
        }
    }
}

pub(crate) fn empty_at(
    schema: &Schema,
    depth: usize,
    terminate: TerminatePredicate<'_>,
) -> CodecResult<Value> {
    guard_depth(depth)?;
    match schema {
        Schema::Primitive(kind) => Ok(primitive_default(*kind)),
        Schema::Leaf(handle) => handle
            .ops()
            .empty()
            .unwrap_or_else(|| Err(CodecError::missing_capability("empty", handle.display_name()))),
        Schema::Tuple(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(empty_at(item, depth + 1, terminate)?);
            }
            Ok(Value::Tuple(out))
        }
        Schema::Record(entries) => {
            if terminate(schema) {
                return Err(CodecError::missing_capability("empty", schema.display_name()));
            }
            let mut out = Vec::with_capacity(entries.len());
            for (key, item) in entries {
                out.push((key.clone(), empty_at(item, depth + 1, terminate)?));
            }
            Ok(Value::Record(out))
        }
    }
}

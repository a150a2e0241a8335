//! Recursive walkers behind the primary derived operations.
//!
//! Every operation shares one dispatch order over the four node shapes:
//! primitive markers first, then opaque leaves, then tuples, then records in
//! canonical key order. Encoding concatenates leaf field arrays flat, left
//! to right, depth first; decoding consumes that flat array by contiguous
//! cumulative-size slicing while addressing the auxiliary tree positionally.
//! The two addressing disciplines differ and both must agree on the
//! reconstructed value.
//!
//! The to-plain and from-plain conversions are both thin instantiations of
//! [`map_structured`], one shared recursion parameterized by a leaf
//! accessor, so the two directions cannot structurally diverge.

use num_bigint::BigInt;

use crate::codec::error::{CodecError, CodecResult};
use crate::config::MAX_SCHEMA_DEPTH;
use crate::field::FieldElement;
use crate::schema::{LeafHandle, PrimitiveKind, Schema};
use crate::value::{AuxValue, PlainValue, Value};

/// Refuses to recurse past the defensive depth bound.
pub(crate) fn guard_depth(depth: usize) -> CodecResult<()> {
    if depth >= MAX_SCHEMA_DEPTH {
        return Err(CodecError::DepthExceeded {
            limit: MAX_SCHEMA_DEPTH,
        });
    }
    Ok(())
}

/// Field width of a schema. A pure function of the description alone.
pub(crate) fn size_in_fields(schema: &Schema) -> usize {
    match schema {
        Schema::Primitive(_) => 0,
        Schema::Leaf(handle) => handle.ops().size_in_fields(),
        Schema::Tuple(items) => items.iter().map(size_in_fields).sum(),
        Schema::Record(entries) => entries.iter().map(|(_, s)| size_in_fields(s)).sum(),
    }
}

/// Views a value as the positional slots of a tuple.
///
/// A record-shaped value with matching arity is read by position instead of
/// being rejected; this tolerance is deliberate, to support flexible
/// call-site shapes.
pub(crate) fn tuple_slots<'v>(
    value: &'v Value,
    arity: usize,
    context: &'static str,
) -> CodecResult<Vec<&'v Value>> {
    match value {
        Value::Tuple(items) => {
            if items.len() != arity {
                return Err(CodecError::arity_mismatch(context, arity, items.len()));
            }
            Ok(items.iter().collect())
        }
        Value::Record(entries) => {
            if entries.len() != arity {
                return Err(CodecError::arity_mismatch(context, arity, entries.len()));
            }
            Ok(entries.iter().map(|(_, v)| v).collect())
        }
        other => Err(CodecError::shape_mismatch("tuple", other.kind_name())),
    }
}

/// Looks up a declared record key in a record-shaped value.
pub(crate) fn record_entry<'v>(value: &'v Value, key: &str) -> CodecResult<&'v Value> {
    match value {
        Value::Record(_) => value
            .entry(key)
            .ok_or_else(|| CodecError::missing_entry(key)),
        other => Err(CodecError::shape_mismatch("record", other.kind_name())),
    }
}

pub(crate) fn to_fields_at(
    schema: &Schema,
    value: &Value,
    depth: usize,
) -> CodecResult<Vec<FieldElement>> {
    guard_depth(depth)?;
    match schema {
        Schema::Primitive(_) => Ok(Vec::new()),
        Schema::Leaf(handle) => handle.ops().to_fields(value),
        Schema::Tuple(items) => {
            let slots = tuple_slots(value, items.len(), "tuple")?;
            let mut out = Vec::new();
            for (item, slot) in items.iter().zip(slots) {
                out.extend(to_fields_at(item, slot, depth + 1)?);
            }
            Ok(out)
        }
        Schema::Record(entries) => {
            let mut out = Vec::new();
            for (key, item) in entries {
                let slot = record_entry(value, key)?;
                out.extend(to_fields_at(item, slot, depth + 1)?);
            }
            Ok(out)
        }
    }
}

/// Default auxiliary payload of a primitive kind.
pub(crate) fn primitive_default(kind: PrimitiveKind) -> Value {
    match kind {
        PrimitiveKind::Number => Value::Number(0.0),
        PrimitiveKind::Text => Value::Text(String::new()),
        PrimitiveKind::Boolean => Value::Bool(false),
        PrimitiveKind::BigInt => Value::BigInt(BigInt::from(0)),
        PrimitiveKind::Undefined | PrimitiveKind::Null => Value::Unit,
    }
}

pub(crate) fn to_auxiliary_at(
    schema: &Schema,
    value: Option<&Value>,
    depth: usize,
) -> CodecResult<AuxValue> {
    guard_depth(depth)?;
    match schema {
        Schema::Primitive(kind) => {
            if kind.is_absent() {
                return Ok(AuxValue::Empty);
            }
            let payload = value.cloned().unwrap_or_else(|| primitive_default(*kind));
            Ok(AuxValue::Scalar(payload))
        }
        Schema::Leaf(handle) => handle.ops().to_auxiliary(value),
        Schema::Tuple(items) => {
            let mut out = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                let slot = value.and_then(|v| match v {
                    Value::Tuple(values) => values.get(index),
                    Value::Record(entries) => entries.get(index).map(|(_, v)| v),
                    _ => None,
                });
                out.push(to_auxiliary_at(item, slot, depth + 1)?);
            }
            Ok(AuxValue::Items(out))
        }
        Schema::Record(entries) => {
            let mut out = Vec::with_capacity(entries.len());
            for (key, item) in entries {
                let slot = value.and_then(|v| v.entry(key));
                out.push((key.clone(), to_auxiliary_at(item, slot, depth + 1)?));
            }
            Ok(AuxValue::Entries(out))
        }
    }
}

pub(crate) fn from_fields_at(
    schema: &Schema,
    fields: &[FieldElement],
    aux: &AuxValue,
    depth: usize,
) -> CodecResult<Value> {
    guard_depth(depth)?;
    match schema {
        Schema::Primitive(kind) => {
            if kind.is_absent() {
                return Ok(Value::Unit);
            }
            match aux {
                AuxValue::Scalar(payload) => Ok(payload.clone()),
                other => Err(CodecError::shape_mismatch("scalar", other.kind_name())),
            }
        }
        Schema::Leaf(handle) => handle.ops().from_fields(fields, aux),
        Schema::Tuple(items) => {
            let aux_items = match aux {
                AuxValue::Items(aux_items) => aux_items,
                other => return Err(CodecError::shape_mismatch("items", other.kind_name())),
            };
            if aux_items.len() != items.len() {
                return Err(CodecError::arity_mismatch(
                    "auxiliary",
                    items.len(),
                    aux_items.len(),
                ));
            }
            let mut out = Vec::with_capacity(items.len());
            let mut offset = 0;
            for (item, aux_item) in items.iter().zip(aux_items) {
                let size = size_in_fields(item);
                let slice = fields.get(offset..offset + size).ok_or_else(|| {
                    CodecError::arity_mismatch("fields", offset + size, fields.len())
                })?;
                out.push(from_fields_at(item, slice, aux_item, depth + 1)?);
                offset += size;
            }
            Ok(Value::Tuple(out))
        }
        Schema::Record(entries) => {
            let aux_entries = match aux {
                AuxValue::Entries(aux_entries) => aux_entries,
                other => return Err(CodecError::shape_mismatch("entries", other.kind_name())),
            };
            if aux_entries.len() != entries.len() {
                return Err(CodecError::arity_mismatch(
                    "auxiliary",
                    entries.len(),
                    aux_entries.len(),
                ));
            }
            let mut out = Vec::with_capacity(entries.len());
            let mut offset = 0;
            for ((key, item), (aux_key, aux_item)) in entries.iter().zip(aux_entries) {
                if aux_key != key {
                    return Err(CodecError::missing_entry(key.clone()));
                }
                let size = size_in_fields(item);
                let slice = fields.get(offset..offset + size).ok_or_else(|| {
                    CodecError::arity_mismatch("fields", offset + size, fields.len())
                })?;
                out.push((key.clone(), from_fields_at(item, slice, aux_item, depth + 1)?));
                offset += size;
            }
            Ok(Value::Record(out))
        }
    }
}

pub(crate) fn validate_at(schema: &Schema, value: &Value, depth: usize) -> CodecResult<()> {
    guard_depth(depth)?;
    match schema {
        Schema::Primitive(kind) => {
            let matches = matches!(
                (kind, value),
                (PrimitiveKind::Number, Value::Number(_))
                    | (PrimitiveKind::Text, Value::Text(_))
                    | (PrimitiveKind::Boolean, Value::Bool(_))
                    | (PrimitiveKind::BigInt, Value::BigInt(_))
                    | (PrimitiveKind::Undefined, Value::Unit)
                    | (PrimitiveKind::Null, Value::Unit)
            );
            if matches {
                Ok(())
            } else {
                Err(CodecError::shape_mismatch(kind.name(), value.kind_name()))
            }
        }
        Schema::Leaf(handle) => handle.ops().validate(value),
        Schema::Tuple(items) => {
            let slots = tuple_slots(value, items.len(), "tuple")?;
            for (item, slot) in items.iter().zip(slots) {
                validate_at(item, slot, depth + 1)?;
            }
            Ok(())
        }
        Schema::Record(entries) => {
            for (key, item) in entries {
                let slot = record_entry(value, key)?;
                validate_at(item, slot, depth + 1)?;
            }
            Ok(())
        }
    }
}

/// Structural view shared by the two value universes.
///
/// The single conversion walker recurses through this view, so a schema
/// traverses [`Value`] and [`PlainValue`] with the same code path.
pub(crate) trait StructuredView: Sized {
    fn view_items(&self) -> Option<&[Self]>;
    fn view_entries(&self) -> Option<&[(String, Self)]>;
    fn build_items(items: Vec<Self>) -> Self;
    fn build_entries(entries: Vec<(String, Self)>) -> Self;
    fn view_kind(&self) -> &'static str;
}

impl StructuredView for Value {
    fn view_items(&self) -> Option<&[Self]> {
        match self {
            Value::Tuple(items) => Some(items),
            _ => None,
        }
    }

    fn view_entries(&self) -> Option<&[(String, Self)]> {
        match self {
            Value::Record(entries) => Some(entries),
            _ => None,
        }
    }

    fn build_items(items: Vec<Self>) -> Self {
        Value::Tuple(items)
    }

    fn build_entries(entries: Vec<(String, Self)>) -> Self {
        Value::Record(entries)
    }

    fn view_kind(&self) -> &'static str {
        self.kind_name()
    }
}

impl StructuredView for PlainValue {
    fn view_items(&self) -> Option<&[Self]> {
        match self {
            PlainValue::List(items) => Some(items),
            _ => None,
        }
    }

    fn view_entries(&self) -> Option<&[(String, Self)]> {
        match self {
            PlainValue::Map(entries) => Some(entries),
            _ => None,
        }
    }

    fn build_items(items: Vec<Self>) -> Self {
        PlainValue::List(items)
    }

    fn build_entries(entries: Vec<(String, Self)>) -> Self {
        PlainValue::Map(entries)
    }

    fn view_kind(&self) -> &'static str {
        self.kind_name()
    }
}

/// The one conversion walker.
///
/// Both conversion directions instantiate this single recursion, varying
/// only the primitive and leaf accessors, which is what guarantees they can
/// never structurally diverge from each other.
pub(crate) fn map_structured<I, O>(
    schema: &Schema,
    input: &I,
    depth: usize,
    primitive_op: &dyn Fn(PrimitiveKind, &I) -> CodecResult<O>,
    leaf_op: &dyn Fn(&LeafHandle, &I) -> CodecResult<O>,
) -> CodecResult<O>
where
    I: StructuredView,
    O: StructuredView,
{
    guard_depth(depth)?;
    match schema {
        Schema::Primitive(kind) => primitive_op(*kind, input),
        Schema::Leaf(handle) => leaf_op(handle, input),
        Schema::Tuple(items) => {
            let slots = input
                .view_items()
                .ok_or_else(|| CodecError::shape_mismatch("tuple", input.view_kind()))?;
            if slots.len() != items.len() {
                return Err(CodecError::arity_mismatch("tuple", items.len(), slots.len()));
            }
            let mut out = Vec::with_capacity(items.len());
            for (item, slot) in items.iter().zip(slots) {
                out.push(map_structured(item, slot, depth + 1, primitive_op, leaf_op)?);
            }
            Ok(O::build_items(out))
        }
        Schema::Record(entries) => {
            let slots = input
                .view_entries()
                .ok_or_else(|| CodecError::shape_mismatch("record", input.view_kind()))?;
            let mut out = Vec::with_capacity(entries.len());
            for (key, item) in entries {
                let slot = slots
                    .iter()
                    .find(|(slot_key, _)| slot_key == key)
                    .map(|(_, slot)| slot)
                    .ok_or_else(|| CodecError::missing_entry(key.clone()))?;
                out.push((
                    key.clone(),
                    map_structured(item, slot, depth + 1, primitive_op, leaf_op)?,
                ));
            }
            Ok(O::build_entries(out))
        }
    }
}

pub(crate) fn to_plain_at(schema: &Schema, value: &Value, depth: usize) -> CodecResult<PlainValue> {
    map_structured(
        schema,
        value,
        depth,
        &|kind, value: &Value| match (kind, value) {
            (PrimitiveKind::Number, Value::Number(n)) => Ok(PlainValue::Number(*n)),
            (PrimitiveKind::Text, Value::Text(s)) => Ok(PlainValue::Text(s.clone())),
            (PrimitiveKind::Boolean, Value::Bool(b)) => Ok(PlainValue::Bool(*b)),
            (PrimitiveKind::BigInt, Value::BigInt(i)) => Ok(PlainValue::BigInt(i.clone())),
            (PrimitiveKind::Undefined | PrimitiveKind::Null, Value::Unit) => Ok(PlainValue::Unit),
            (kind, other) => Err(CodecError::shape_mismatch(kind.name(), other.kind_name())),
        },
        &|handle, value| handle.ops().to_plain(value),
    )
}

pub(crate) fn from_plain_at(
    schema: &Schema,
    plain: &PlainValue,
    depth: usize,
) -> CodecResult<Value> {
    map_structured(
        schema,
        plain,
        depth,
        &|kind, plain: &PlainValue| match (kind, plain) {
            (PrimitiveKind::Number, PlainValue::Number(n)) => Ok(Value::Number(*n)),
            (PrimitiveKind::Text, PlainValue::Text(s)) => Ok(Value::Text(s.clone())),
            (PrimitiveKind::Boolean, PlainValue::Bool(b)) => Ok(Value::Bool(*b)),
            (PrimitiveKind::BigInt, PlainValue::BigInt(i)) => Ok(Value::BigInt(i.clone())),
            (PrimitiveKind::Undefined | PrimitiveKind::Null, PlainValue::Unit) => Ok(Value::Unit),
            (kind, other) => Err(CodecError::shape_mismatch(kind.name(), other.kind_name())),
        },
        &|handle, plain| handle.ops().from_plain(plain),
    )
}

pub(crate) fn to_canonical_at(schema: &Schema, value: &Value, depth: usize) -> CodecResult<Value> {
    map_structured(
        schema,
        value,
        depth,
        &|_, value: &Value| Ok(value.clone()),
        &|handle, value| {
            handle
                .ops()
                .to_canonical(value)
                .unwrap_or_else(|| Ok(value.clone()))
        },
    )
}

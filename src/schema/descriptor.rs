//! Parsing JSON type descriptors into schemas.
//!
//! Compiler front-ends describe value layouts as JSON: primitive kinds by
//! name, tuples as arrays, records as objects, opaque leaves by a registered
//! name and wrappers as `{"provable": ...}` nodes that are unwrapped once.
//! Any node matching none of these shapes fails fast with an
//! unsupported-type error naming the offending node; a descriptor is never
//! silently coerced into a plausible-looking schema.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::codec::walker::guard_depth;
use crate::codec::{CodecError, CodecResult};
use crate::schema::{JsonValue, LeafType, PrimitiveKind, Schema};

/// Named leaf types available to descriptor resolution.
#[derive(Default)]
pub struct LeafRegistry {
    entries: BTreeMap<String, Arc<dyn LeafType>>,
}

impl LeafRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a leaf type under a descriptor name.
    ///
    /// Re-registering a name is rejected: silently replacing a codec would
    /// change the meaning of every descriptor that mentions it.
    pub fn register(&mut self, name: impl Into<String>, ops: Arc<dyn LeafType>) -> CodecResult<()> {
        let name = name.into();
        if self.entries.contains_key(&name) {
            return Err(CodecError::validation(
                "leaf registry",
                format!("\"{name}\" is already registered"),
            ));
        }
        self.entries.insert(name, ops);
        Ok(())
    }

    /// Resolves a registered leaf type by name.
    pub fn resolve(&self, name: &str) -> Option<Arc<dyn LeafType>> {
        self.entries.get(name).cloned()
    }
}

/// Parses a JSON type descriptor into a schema.
pub fn parse_descriptor(registry: &LeafRegistry, descriptor: &JsonValue) -> CodecResult<Schema> {
    parse_at(registry, descriptor, 0)
}

fn parse_at(registry: &LeafRegistry, descriptor: &JsonValue, depth: usize) -> CodecResult<Schema> {
    guard_depth(depth)?;
    match descriptor {
        JsonValue::String(name) => parse_name(registry, name),
        JsonValue::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(parse_at(registry, item, depth + 1)?);
            }
            Ok(Schema::Tuple(out))
        }
        JsonValue::Object(map) => {
            if map.len() == 1 {
                if let Some(inner) = map.get("provable") {
                    // A wrapper node carrying a nested capability object is
                    // unwrapped exactly once.
                    return parse_at(registry, inner, depth + 1);
                }
            }
            if map.len() == 2 {
                if let (Some(element), Some(length)) = (map.get("array"), map.get("length")) {
                    let length = length.as_u64().ok_or_else(|| {
                        CodecError::unsupported_type(descriptor.to_string())
                    })?;
                    let element = parse_at(registry, element, depth + 1)?;
                    return Ok(Schema::array(element, length as usize));
                }
            }
            let mut entries = Vec::with_capacity(map.len());
            for (key, value) in map {
                entries.push((key.clone(), parse_at(registry, value, depth + 1)?));
            }
            Schema::record(entries)
        }
        other => Err(CodecError::unsupported_type(other.to_string())),
    }
}

fn parse_name(registry: &LeafRegistry, name: &str) -> CodecResult<Schema> {
    let kind = match name {
        "number" => Some(PrimitiveKind::Number),
        "string" => Some(PrimitiveKind::Text),
        "boolean" => Some(PrimitiveKind::Boolean),
        "bigint" => Some(PrimitiveKind::BigInt),
        "undefined" => Some(PrimitiveKind::Undefined),
        "null" => Some(PrimitiveKind::Null),
        _ => None,
    };
    if let Some(kind) = kind {
        return Ok(Schema::Primitive(kind));
    }
    match registry.resolve(name) {
        Some(ops) => Ok(Schema::leaf_shared(ops)),
        None => {
            debug!(leaf = name, "descriptor names an unregistered leaf");
            Err(CodecError::unsupported_type(name.to_string()))
        }
    }
}

//! Canonical structural digest of a schema.
//!
//! The digest binds the node shapes, arities, key names and leaf identities
//! of a description into one 32-byte fingerprint, stable across processes.
//! Derived artifacts cached by type structure key on it, and two parties can
//! compare digests instead of whole descriptions.

use core::fmt;

use blake2::{Blake2s256, Digest};

use crate::config::SCHEMA_DIGEST_DOMAIN_TAG;
use crate::schema::{PrimitiveKind, Schema};

/// Structural fingerprint of a schema.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SchemaDigest {
    bytes: [u8; 32],
}

impl SchemaDigest {
    /// Constructs a digest from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self { bytes }
    }

    /// Returns the canonical byte representation of the digest.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }

    /// Consumes the digest and returns the underlying byte array.
    pub const fn into_bytes(self) -> [u8; 32] {
        self.bytes
    }
}

impl fmt::Debug for SchemaDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SchemaDigest(0x")?;
        for byte in self.bytes.iter() {
            write!(f, "{byte:02x}")?;
        }
        write!(f, ")")
    }
}

const NODE_PRIMITIVE: u8 = 1;
const NODE_LEAF: u8 = 2;
const NODE_TUPLE: u8 = 3;
const NODE_RECORD: u8 = 4;

const fn kind_code(kind: PrimitiveKind) -> u8 {
    match kind {
        PrimitiveKind::Number => 1,
        PrimitiveKind::Text => 2,
        PrimitiveKind::Boolean => 3,
        PrimitiveKind::BigInt => 4,
        PrimitiveKind::Undefined => 5,
        PrimitiveKind::Null => 6,
    }
}

/// Computes the canonical digest of a schema.
pub fn schema_digest(schema: &Schema) -> SchemaDigest {
    let mut hasher = Blake2s256::new();
    hasher.update(SCHEMA_DIGEST_DOMAIN_TAG);
    absorb(&mut hasher, schema);
    SchemaDigest::from_bytes(hasher.finalize().into())
}

fn absorb_str(hasher: &mut Blake2s256, value: &str) {
    hasher.update((value.len() as u64).to_le_bytes());
    hasher.update(value.as_bytes());
}

fn absorb(hasher: &mut Blake2s256, schema: &Schema) {
    match schema {
        Schema::Primitive(kind) => {
            hasher.update([NODE_PRIMITIVE, kind_code(*kind)]);
        }
        Schema::Leaf(handle) => {
            hasher.update([NODE_LEAF]);
            absorb_str(hasher, &handle.display_name());
            hasher.update((handle.ops().size_in_fields() as u64).to_le_bytes());
        }
        Schema::Tuple(items) => {
            hasher.update([NODE_TUPLE]);
            hasher.update((items.len() as u64).to_le_bytes());
            for item in items {
                absorb(hasher, item);
            }
        }
        Schema::Record(entries) => {
            hasher.update([NODE_RECORD]);
            hasher.update((entries.len() as u64).to_le_bytes());
            for (key, item) in entries {
                absorb_str(hasher, key);
                absorb(hasher, item);
            }
        }
    }
}

//! Structure-driven codec between application values and circuit data.
//!
//! The crate sits at the center of an arithmetic-circuit compiler: it
//! decomposes application values — numbers, strings, nested records, fixed
//! tuples and opaque circuit primitives — into a flat vector of field
//! elements that participate in constraints, plus a non-constrained
//! auxiliary tree used for bookkeeping, hashing and human-readable I/O, and
//! reconstructs them exactly. A [`schema::Schema`] describes the structure
//! once; the derivation engine in [`codec`] generates the full
//! twelve-operation surface from it, and [`variant::Variant`] builds tagged
//! unions with a fixed circuit shape and data-independent dispatch on top.
//!
//! Every derived operation is a pure, synchronous function of its explicit
//! inputs. There is no I/O, no shared mutable state and no retry: a failure
//! indicates a mismatched schema/value pair or a malformed input that must
//! not be coerced into a plausible-looking value.

pub mod codec;
pub mod config;
pub mod field;
pub mod named;
pub mod schema;
pub mod value;
pub mod variant;

pub use codec::{CodecError, CodecResult, HashInput, TerminatePredicate};
pub use field::{FieldElement, FieldElementOps};
pub use named::NamedType;
pub use schema::{
    parse_descriptor, schema_digest, JsonValue, LeafRegistry, LeafType, PrimitiveKind, Schema,
    SchemaDigest,
};
pub use value::{AuxValue, LeafValue, PlainValue, Value};
pub use variant::{select, MatchHandler, Variant};

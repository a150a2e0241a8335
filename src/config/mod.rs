//! Canonical constants shared by the codec engine.
//!
//! This module intentionally exposes **only** identifiers and limits. The
//! values documented here are part of the wire-level contract between the
//! codec and the constraint back-end: changing any of them changes schema
//! digests and variant encodings, so they follow the same change-control
//! rules as the rest of the canonical layouts.

use crate::field::FieldElement;

/// Fixed domain separator prepended to the depth-first schema encoding before
/// hashing it into a [`crate::schema::SchemaDigest`]. The tag is ASCII encoded.
pub const SCHEMA_DIGEST_DOMAIN_TAG: &[u8; 12] = b"RPP-SCHEMA-1";

/// Defensive bound on schema nesting depth.
///
/// Type descriptions are assumed acyclic; the walkers nevertheless refuse to
/// recurse past this depth and surface
/// [`crate::codec::CodecError::DepthExceeded`] instead of exhausting the
/// stack on malformed input.
pub const MAX_SCHEMA_DEPTH: usize = 64;

/// Sentinel element used to right-pad variant payloads up to the uniform
/// width. Padding slots are never interpreted by any decoder; the value only
/// has to be a fixed, canonical constant.
pub const VARIANT_PADDING: FieldElement = FieldElement::ZERO;

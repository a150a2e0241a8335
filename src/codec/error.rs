use core::fmt;
use serde::Serialize;

/// Canonical error surfaced by the derived codec operations.
///
/// Every failure is synchronous and propagates uncaught to the caller: each
/// variant indicates either a mismatched schema/value pair or a malformed
/// input that must not be coerced into a plausible-looking value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum CodecError {
    /// A type descriptor node matched none of the recognized shapes.
    UnsupportedType {
        /// Display form of the offending node.
        node: String,
    },
    /// A declared length disagreed with a concrete one.
    ArityMismatch {
        /// Structure that was being processed.
        context: &'static str,
        /// Length declared by the schema.
        expected: usize,
        /// Length found in the concrete data.
        got: usize,
    },
    /// A terminate-flagged node lacked a method the walker needed.
    MissingCapability {
        /// Name of the missing method.
        method: &'static str,
        /// Display name of the type that lacks it.
        type_name: String,
    },
    /// A variant fold exhausted every alternative without a tag match.
    UnreachableMatch,
    /// A variant decoder met a tag outside the declared range.
    UnknownTag {
        /// Tag read from the field vector.
        tag: u64,
        /// Number of declared alternatives.
        count: usize,
    },
    /// A variant value or handler named no declared alternative.
    UnknownAlternative {
        /// The unrecognized alternative name.
        name: String,
    },
    /// A value's shape disagreed with the schema node driving it.
    ShapeMismatch {
        /// Shape the schema called for.
        expected: &'static str,
        /// Shape found in the concrete data.
        got: &'static str,
    },
    /// A record value lacked a declared key.
    MissingEntry {
        /// The absent key.
        key: String,
    },
    /// The defensive recursion bound was hit while walking a schema.
    DepthExceeded {
        /// The configured bound.
        limit: usize,
    },
    /// A leaf rejected its value during validation.
    Validation {
        /// Display name of the validating type.
        type_name: String,
        /// Human-readable rejection reason.
        reason: String,
    },
}

impl CodecError {
    /// Creates an unsupported-type error for the given node display form.
    pub fn unsupported_type(node: impl Into<String>) -> Self {
        CodecError::UnsupportedType { node: node.into() }
    }

    /// Creates an arity-mismatch error helper.
    pub fn arity_mismatch(context: &'static str, expected: usize, got: usize) -> Self {
        CodecError::ArityMismatch {
            context,
            expected,
            got,
        }
    }

    /// Creates a missing-capability error helper.
    pub fn missing_capability(method: &'static str, type_name: impl Into<String>) -> Self {
        CodecError::MissingCapability {
            method,
            type_name: type_name.into(),
        }
    }

    /// Creates a shape-mismatch error helper.
    pub fn shape_mismatch(expected: &'static str, got: &'static str) -> Self {
        CodecError::ShapeMismatch { expected, got }
    }

    /// Creates a missing-entry error helper.
    pub fn missing_entry(key: impl Into<String>) -> Self {
        CodecError::MissingEntry { key: key.into() }
    }

    /// Creates a leaf validation error helper.
    pub fn validation(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        CodecError::Validation {
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::UnsupportedType { node } => {
                write!(f, "unsupported type \"{node}\"")
            }
            CodecError::ArityMismatch {
                context,
                expected,
                got,
            } => {
                write!(f, "expected {context} length {expected}, but got {got}")
            }
            CodecError::MissingCapability { method, type_name } => {
                write!(f, "expected `{method}()` method on {type_name}")
            }
            CodecError::UnreachableMatch => {
                write!(f, "variant match exhausted every alternative without a tag match")
            }
            CodecError::UnknownTag { tag, count } => {
                write!(f, "variant tag {tag} is outside the {count} declared alternatives")
            }
            CodecError::UnknownAlternative { name } => {
                write!(f, "\"{name}\" names no declared alternative")
            }
            CodecError::ShapeMismatch { expected, got } => {
                write!(f, "expected a {expected} value, but got a {got} value")
            }
            CodecError::MissingEntry { key } => {
                write!(f, "record value is missing entry \"{key}\"")
            }
            CodecError::DepthExceeded { limit } => {
                write!(f, "schema nesting exceeded the depth bound of {limit}")
            }
            CodecError::Validation { type_name, reason } => {
                write!(f, "{type_name} rejected its value: {reason}")
            }
        }
    }
}

impl std::error::Error for CodecError {}

/// Convenient alias for codec results.
pub type CodecResult<T> = core::result::Result<T, CodecError>;

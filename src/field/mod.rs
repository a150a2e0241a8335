//! Field arithmetic primitives for the codec engine.
//! Contains the canonical field element and the arithmetic contracts it honours.

pub mod prime_field;

pub use prime_field::{
    FieldDeserializeError, FieldElement, FieldElementOps, Modulus, DEFAULT_MODULUS,
};

#[cfg(test)]
pub mod tests;

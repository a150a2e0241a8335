//! Prime field arithmetic for the codec engine.
//!
//! The engine hands flat vectors of field elements to the constraint
//! back-end, and needs a small amount of arithmetic of its own: the variant
//! selection combinator is a multiply-accumulate over encoded values, and
//! hash-input packing shifts packed scalars into a shared element. All
//! arithmetic is deterministic and operates on canonical representatives.

use core::fmt;

/// Metadata describing the underlying field modulus.
#[derive(Debug, Clone, Copy)]
pub struct Modulus {
    /// Prime modulus value in canonical representation.
    pub value: u64,
    /// Indicates whether the modulus passed primality checks during configuration.
    pub is_prime: bool,
}

impl Modulus {
    /// Creates a new modulus descriptor.
    pub const fn new(value: u64, is_prime: bool) -> Self {
        Self { value, is_prime }
    }
}

/// Canonical modulus for the default field used across the system.
pub const DEFAULT_MODULUS: Modulus = Modulus::new(0xffffffff00000001, true);

/// Error surfaced when deserializing a field element from raw bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldDeserializeError {
    /// The encoded integer was not a canonical representative.
    FieldDeserializeNonCanonical,
}

impl fmt::Display for FieldDeserializeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldDeserializeError::FieldDeserializeNonCanonical => {
                write!(f, "field element deserialization failed: non-canonical input")
            }
        }
    }
}

impl std::error::Error for FieldDeserializeError {}

/// Field element represented as a canonical value modulo the prime.
///
/// # Representation
///
/// * `FieldElement` is a transparent wrapper around a raw `u64`. The wrapped
///   integer must stay within the range `[0, MODULUS.value)`.
/// * Serialization uses **little-endian** byte order.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FieldElement(pub u64);

impl fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FieldElement").field(&self.0).finish()
    }
}

impl FieldElement {
    /// Canonical prime modulus associated with this field.
    pub const MODULUS: Modulus = DEFAULT_MODULUS;
    /// Designated generator for the multiplicative subgroup.
    pub const GENERATOR: FieldElement = FieldElement(3);
    /// Additive identity in canonical form.
    pub const ZERO: FieldElement = FieldElement(0);
    /// Multiplicative identity in canonical form.
    pub const ONE: FieldElement = FieldElement(1);

    /// Constructs an element from an arbitrary integer, reducing modulo the prime.
    pub const fn new(value: u64) -> Self {
        FieldElement(value % Self::MODULUS.value)
    }

    /// Returns the canonical integer representative.
    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// Returns `true` for the additive identity.
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Raises the element to the given exponent by square and multiply.
    pub fn pow(&self, mut exponent: u64) -> Self {
        let mut result = FieldElement::ONE;
        let mut base = *self;
        while exponent > 0 {
            if exponent & 1 == 1 {
                result = result.mul(&base);
            }
            base = base.square();
            exponent >>= 1;
        }
        result
    }

    /// Serializes the element into canonical little-endian bytes.
    pub const fn to_bytes(&self) -> [u8; 8] {
        self.0.to_le_bytes()
    }

    /// Attempts to deserialize from canonical little-endian bytes.
    pub fn from_bytes(bytes: &[u8; 8]) -> Result<Self, FieldDeserializeError> {
        let raw = u64::from_le_bytes(*bytes);
        if raw < Self::MODULUS.value {
            Ok(FieldElement(raw))
        } else {
            Err(FieldDeserializeError::FieldDeserializeNonCanonical)
        }
    }
}

impl From<u64> for FieldElement {
    fn from(value: u64) -> Self {
        FieldElement::new(value)
    }
}

/// Trait describing the high-level arithmetic contract for field elements.
pub trait FieldElementOps: Sized {
    /// Adds two canonical field elements, returning the canonical representative.
    fn add(&self, rhs: &Self) -> Self;
    /// Subtracts `rhs` from `self` in canonical form.
    fn sub(&self, rhs: &Self) -> Self;
    /// Computes the additive inverse of `self`.
    fn neg(&self) -> Self;
    /// Multiplies two field elements.
    fn mul(&self, rhs: &Self) -> Self;
    /// Squares the field element.
    fn square(&self) -> Self;
    /// Computes the multiplicative inverse, returning `None` for zero.
    fn inv(&self) -> Option<Self>;
}

impl FieldElementOps for FieldElement {
    fn add(&self, rhs: &Self) -> Self {
        let p = Self::MODULUS.value as u128;
        FieldElement(((self.0 as u128 + rhs.0 as u128) % p) as u64)
    }

    fn sub(&self, rhs: &Self) -> Self {
        let p = Self::MODULUS.value as u128;
        FieldElement(((self.0 as u128 + p - rhs.0 as u128) % p) as u64)
    }

    fn neg(&self) -> Self {
        if self.0 == 0 {
            FieldElement::ZERO
        } else {
            FieldElement(Self::MODULUS.value - self.0)
        }
    }

    fn mul(&self, rhs: &Self) -> Self {
        let p = Self::MODULUS.value as u128;
        FieldElement(((self.0 as u128 * rhs.0 as u128) % p) as u64)
    }

    fn square(&self) -> Self {
        self.mul(self)
    }

    fn inv(&self) -> Option<Self> {
        if self.0 == 0 {
            return None;
        }
        // Fermat: a^(p-2) is the inverse for prime p.
        Some(self.pow(Self::MODULUS.value - 2))
    }
}

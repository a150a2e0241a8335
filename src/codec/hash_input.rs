//! Hash-input descriptors absorbed by the downstream sponge.
//!
//! A hash input carries two lists: full field elements and packed
//! `(element, bit width)` pairs. Combination is associative and
//! order-preserving, never commutative: each side's field list is
//! concatenated in order, then each side's packed list. The field order
//! matches encode order, which is what keeps downstream domain separation
//! meaningful.

use crate::field::{FieldElement, FieldElementOps};

/// Number of bits a single packed element may hold.
///
/// One below the field's bit size, so the running element can never wrap.
pub const PACKED_BIT_CAPACITY: u32 = 63;

/// Hash-input descriptor produced by the human/hash walker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HashInput {
    /// Full field elements, in encode order.
    pub fields: Vec<FieldElement>,
    /// Packed scalars with their bit widths, in encode order.
    pub packed: Vec<(FieldElement, u32)>,
}

impl HashInput {
    /// The neutral element of [`HashInput::append`].
    pub fn empty() -> Self {
        HashInput::default()
    }

    /// Builds a descriptor carrying only full field elements.
    pub fn from_fields(fields: Vec<FieldElement>) -> Self {
        HashInput {
            fields,
            packed: Vec::new(),
        }
    }

    /// Builds a descriptor carrying a single packed scalar.
    pub fn from_packed(element: FieldElement, bits: u32) -> Self {
        HashInput {
            fields: Vec::new(),
            packed: vec![(element, bits)],
        }
    }

    /// Appends `other` after `self`, preserving order on both lists.
    pub fn append(mut self, other: HashInput) -> Self {
        self.fields.extend(other.fields);
        self.packed.extend(other.packed);
        self
    }

    /// Flattens the descriptor into plain field elements.
    ///
    /// Full fields pass through unchanged; consecutive packed scalars are
    /// shifted into a shared element while their combined bit widths fit
    /// within [`PACKED_BIT_CAPACITY`], then a fresh element is started.
    pub fn pack_to_fields(&self) -> Vec<FieldElement> {
        let mut out = self.fields.clone();
        let mut current = FieldElement::ZERO;
        let mut current_bits = 0u32;
        for &(element, bits) in &self.packed {
            if current_bits + bits > PACKED_BIT_CAPACITY {
                out.push(current);
                current = FieldElement::ZERO;
                current_bits = 0;
            }
            let shift = FieldElement::from(2u64).pow(u64::from(current_bits));
            current = current.add(&element.mul(&shift));
            current_bits += bits;
        }
        if current_bits > 0 {
            out.push(current);
        }
        out
    }
}

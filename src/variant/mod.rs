//! Tagged unions with a fixed circuit shape and data-independent dispatch.
//!
//! A [`Variant`] encodes "exactly one of N alternatives" into a field vector
//! whose width never depends on which alternative is populated: one tag slot
//! followed by the widest alternative's payload width, shorter payloads
//! right-padded with a sentinel constant. Dispatch over the alternatives is
//! oblivious: [`Variant::match_oblivious`] evaluates every handler and folds
//! the candidates through the [`select`] multiplexer, so the executed steps
//! never depend on the populated alternative. Only the numeric selection,
//! never a branch, determines the observable result.

use tracing::debug;

use crate::codec::{CodecError, CodecResult};
use crate::config::VARIANT_PADDING;
use crate::field::{FieldElement, FieldElementOps};
use crate::schema::{JsonValue, LeafType, Schema};
use crate::value::{AuxValue, PlainValue, Value};

/// Handler invoked on one decoded alternative payload during a match fold.
pub type MatchHandler<'a> = &'a dyn Fn(&Value) -> CodecResult<Value>;

/// Data-independent conditional selection between two conforming values.
///
/// Computes `b + condition * (a - b)` element-wise over both encodings, so
/// the result equals `a` when the condition is one and `b` when it is zero,
/// without branching on either value. The condition must be exactly zero or
/// one.
pub fn select<T>(
    ty: &T,
    condition: FieldElement,
    when_true: &Value,
    when_false: &Value,
) -> CodecResult<Value>
where
    T: LeafType + ?Sized,
{
    if condition != FieldElement::ZERO && condition != FieldElement::ONE {
        return Err(CodecError::validation(
            "select",
            "condition must be zero or one",
        ));
    }
    let true_fields = ty.to_fields(when_true)?;
    let false_fields = ty.to_fields(when_false)?;
    if true_fields.len() != false_fields.len() {
        return Err(CodecError::arity_mismatch(
            "fields",
            true_fields.len(),
            false_fields.len(),
        ));
    }
    let fields: Vec<FieldElement> = true_fields
        .iter()
        .zip(&false_fields)
        .map(|(a, b)| b.add(&condition.mul(&a.sub(b))))
        .collect();
    let chosen = if condition == FieldElement::ONE {
        when_true
    } else {
        when_false
    };
    let aux = ty.to_auxiliary(Some(chosen))?;
    ty.from_fields(&fields, &aux)
}

/// A tagged union over named alternatives.
///
/// Alternative names are canonicalized into ascending order at construction;
/// the tag of a name is its rank in that order, deterministic regardless of
/// how the alternatives were declared.
#[derive(Debug, Clone)]
pub struct Variant {
    alternatives: Vec<(String, Schema)>,
    payload_width: usize,
}

impl Variant {
    /// Builds a variant from named alternatives.
    ///
    /// Names are sorted to fix the tag assignment; duplicates and empty
    /// alternative lists are rejected.
    pub fn new<K>(alternatives: Vec<(K, Schema)>) -> CodecResult<Self>
    where
        K: Into<String>,
    {
        let mut alternatives: Vec<(String, Schema)> = alternatives
            .into_iter()
            .map(|(name, schema)| (name.into(), schema))
            .collect();
        if alternatives.is_empty() {
            return Err(CodecError::validation(
                "variant",
                "at least one alternative is required",
            ));
        }
        alternatives.sort_by(|a, b| a.0.cmp(&b.0));
        for pair in alternatives.windows(2) {
            if pair[0].0 == pair[1].0 {
                return Err(CodecError::validation(
                    "variant",
                    format!("duplicate alternative \"{}\"", pair[0].0),
                ));
            }
        }
        let payload_width = alternatives
            .iter()
            .map(|(_, schema)| schema.size_in_fields())
            .max()
            .unwrap_or(0);
        debug!(
            alternatives = alternatives.len(),
            payload_width, "derived variant codec"
        );
        Ok(Self {
            alternatives,
            payload_width,
        })
    }

    /// Number of declared alternatives.
    pub fn alternative_count(&self) -> usize {
        self.alternatives.len()
    }

    /// Width shared by every alternative's payload, before the tag slot.
    pub fn payload_width(&self) -> usize {
        self.payload_width
    }

    /// The alternatives in tag order.
    pub fn alternatives(&self) -> impl Iterator<Item = (&str, &Schema)> {
        self.alternatives
            .iter()
            .map(|(name, schema)| (name.as_str(), schema))
    }

    /// Tag assigned to an alternative name, if declared.
    pub fn tag_of(&self, name: &str) -> Option<usize> {
        self.alternatives.iter().position(|(n, _)| n == name)
    }

    /// Splits a variant value into its tag and payload.
    ///
    /// A variant value is exactly one `{name: payload}` pair.
    fn unpack<'v>(&self, value: &'v Value) -> CodecResult<(usize, &'v Value)> {
        let entries = match value {
            Value::Record(entries) => entries,
            other => return Err(CodecError::shape_mismatch("variant", other.kind_name())),
        };
        if entries.len() != 1 {
            return Err(CodecError::arity_mismatch("variant", 1, entries.len()));
        }
        let (name, payload) = &entries[0];
        let tag = self
            .tag_of(name)
            .ok_or_else(|| CodecError::UnknownAlternative { name: name.clone() })?;
        Ok((tag, payload))
    }

    /// Uniform field width: one tag slot plus the widest payload.
    pub fn size_in_fields(&self) -> usize {
        1 + self.payload_width
    }

    /// Encodes a variant value as `[tag, payload..., padding...]`.
    pub fn to_fields(&self, value: &Value) -> CodecResult<Vec<FieldElement>> {
        let (tag, payload) = self.unpack(value)?;
        let schema = &self.alternatives[tag].1;
        let mut out = Vec::with_capacity(self.size_in_fields());
        out.push(FieldElement::from(tag as u64));
        out.extend(schema.to_fields(payload)?);
        if out.len() != 1 + schema.size_in_fields() {
            return Err(CodecError::arity_mismatch(
                "fields",
                1 + schema.size_in_fields(),
                out.len(),
            ));
        }
        out.resize(self.size_in_fields(), VARIANT_PADDING);
        Ok(out)
    }

    /// Produces the auxiliary tree `[tag, alternative auxiliary]`, unpadded.
    ///
    /// Auxiliary data never crosses into the committed field vector, so it
    /// needs no width uniformity.
    pub fn to_auxiliary(&self, value: Option<&Value>) -> CodecResult<AuxValue> {
        let (tag, payload) = match value {
            Some(value) => {
                let (tag, payload) = self.unpack(value)?;
                (tag, Some(payload))
            }
            None => (0, None),
        };
        let schema = &self.alternatives[tag].1;
        Ok(AuxValue::Items(vec![
            AuxValue::Scalar(Value::Number(tag as f64)),
            schema.to_auxiliary(payload)?,
        ]))
    }

    /// Reconstructs a variant value from its encoded form.
    ///
    /// The tag is read from `fields[0]` and never from the auxiliary tree: a
    /// tag carried outside the committed fields could desynchronize tag and
    /// payload. Only the alternative's own leading slots are decoded;
    /// trailing padding is discarded, never interpreted.
    pub fn from_fields(&self, fields: &[FieldElement], aux: &AuxValue) -> CodecResult<Value> {
        if fields.len() != self.size_in_fields() {
            return Err(CodecError::arity_mismatch(
                "fields",
                self.size_in_fields(),
                fields.len(),
            ));
        }
        let tag = fields[0].as_u64();
        let index = usize::try_from(tag).ok().filter(|i| *i < self.alternatives.len());
        let index = index.ok_or(CodecError::UnknownTag {
            tag,
            count: self.alternatives.len(),
        })?;
        let (name, schema) = &self.alternatives[index];
        let alternative_aux = Self::alternative_aux(aux)?;
        let payload = schema.from_fields(&fields[1..1 + schema.size_in_fields()], alternative_aux)?;
        Ok(Value::Record(vec![(name.clone(), payload)]))
    }

    /// Positionally indexes the alternative's auxiliary subtree.
    fn alternative_aux(aux: &AuxValue) -> CodecResult<&AuxValue> {
        match aux {
            AuxValue::Items(items) if items.len() == 2 => Ok(&items[1]),
            AuxValue::Items(items) => Err(CodecError::arity_mismatch("auxiliary", 2, items.len())),
            other => Err(CodecError::shape_mismatch("items", other.kind_name())),
        }
    }

    /// Checks that the value is a declared alternative with a conforming
    /// payload.
    pub fn validate(&self, value: &Value) -> CodecResult<()> {
        let (tag, payload) = self.unpack(value)?;
        self.alternatives[tag].1.validate(payload)
    }

    /// Converts a variant value into its plain-data representation.
    pub fn to_plain(&self, value: &Value) -> CodecResult<PlainValue> {
        let (tag, payload) = self.unpack(value)?;
        let (name, schema) = &self.alternatives[tag];
        Ok(PlainValue::Map(vec![(
            name.clone(),
            schema.to_plain(payload)?,
        )]))
    }

    /// Reconstructs a variant value from its plain-data representation.
    pub fn from_plain(&self, plain: &PlainValue) -> CodecResult<Value> {
        let entries = match plain {
            PlainValue::Map(entries) => entries,
            other => return Err(CodecError::shape_mismatch("variant", other.kind_name())),
        };
        if entries.len() != 1 {
            return Err(CodecError::arity_mismatch("variant", 1, entries.len()));
        }
        let (name, payload) = &entries[0];
        let tag = self
            .tag_of(name)
            .ok_or_else(|| CodecError::UnknownAlternative { name: name.clone() })?;
        let value = self.alternatives[tag].1.from_plain(payload)?;
        Ok(Value::Record(vec![(name.clone(), value)]))
    }

    /// Encodes a variant value as `{"tag": name, "value": payload}`.
    ///
    /// The JSON path never enters the circuit, so it is not required to be
    /// oblivious.
    pub fn to_json(&self, value: &Value) -> CodecResult<JsonValue> {
        let (tag, payload) = self.unpack(value)?;
        let (name, schema) = &self.alternatives[tag];
        Ok(serde_json::json!({
            "tag": name,
            "value": schema.to_json(payload)?,
        }))
    }

    /// Reconstructs a variant value from its JSON encoding.
    pub fn from_json(&self, json: &JsonValue) -> CodecResult<Value> {
        let object = json
            .as_object()
            .ok_or_else(|| CodecError::shape_mismatch("variant", "JSON value"))?;
        let name = object
            .get("tag")
            .and_then(JsonValue::as_str)
            .ok_or_else(|| CodecError::missing_entry("tag"))?;
        let payload = object
            .get("value")
            .ok_or_else(|| CodecError::missing_entry("value"))?;
        let tag = self
            .tag_of(name)
            .ok_or_else(|| CodecError::UnknownAlternative {
                name: name.to_string(),
            })?;
        let (name, schema) = &self.alternatives[tag];
        Ok(Value::Record(vec![(name.clone(), schema.from_json(payload)?)]))
    }

    /// Canonical default value: the default of the lowest-tag alternative.
    pub fn empty(&self) -> CodecResult<Value> {
        let (name, schema) = &self.alternatives[0];
        Ok(Value::Record(vec![(name.clone(), schema.empty()?)]))
    }

    /// Obliviously dispatches over the alternatives of a variant value.
    ///
    /// Encodes the value, then runs [`Variant::match_encoded`] on the
    /// resulting field vector and auxiliary tree.
    pub fn match_oblivious<R>(
        &self,
        value: &Value,
        return_type: &R,
        handlers: &[(&str, MatchHandler<'_>)],
    ) -> CodecResult<Value>
    where
        R: LeafType + ?Sized,
    {
        let fields = self.to_fields(value)?;
        let aux = self.to_auxiliary(Some(value))?;
        self.match_encoded(&fields, &aux, return_type, handlers)
    }

    /// Obliviously dispatches over an encoded variant.
    ///
    /// For every alternative, in tag order, the field vector is decoded *as
    /// if* it were that alternative — always well-formed, since each decoder
    /// only reads its own fixed-size leading slice, present for every
    /// alternative thanks to the uniform padding — and that alternative's
    /// handler runs on the decoded payload. Each candidate result is folded
    /// into the accumulator with `select(tag == i, candidate, accumulator)`,
    /// so every handler's effects occur on every call and only a numeric
    /// selection determines the result. A field vector whose tag matches no
    /// alternative is a corrupted or forged input and fails with
    /// [`CodecError::UnreachableMatch`].
    pub fn match_encoded<R>(
        &self,
        fields: &[FieldElement],
        aux: &AuxValue,
        return_type: &R,
        handlers: &[(&str, MatchHandler<'_>)],
    ) -> CodecResult<Value>
    where
        R: LeafType + ?Sized,
    {
        if fields.len() != self.size_in_fields() {
            return Err(CodecError::arity_mismatch(
                "fields",
                self.size_in_fields(),
                fields.len(),
            ));
        }
        if handlers.len() != self.alternatives.len() {
            return Err(CodecError::arity_mismatch(
                "handlers",
                self.alternatives.len(),
                handlers.len(),
            ));
        }
        let mut slots: Vec<Option<MatchHandler<'_>>> = vec![None; self.alternatives.len()];
        for (name, handler) in handlers {
            let tag = self
                .tag_of(name)
                .ok_or_else(|| CodecError::UnknownAlternative {
                    name: name.to_string(),
                })?;
            if slots[tag].is_some() {
                return Err(CodecError::validation(
                    "variant",
                    format!("duplicate handler for \"{name}\""),
                ));
            }
            slots[tag] = Some(*handler);
        }
        let mut ordered = Vec::with_capacity(slots.len());
        for (tag, slot) in slots.into_iter().enumerate() {
            ordered.push(slot.ok_or_else(|| CodecError::UnknownAlternative {
                name: self.alternatives[tag].0.clone(),
            })?);
        }

        let tag_field = fields[0];
        let real_aux = Self::alternative_aux(aux)?;

        // Accumulator seeded from an all-zero encoding; every fold step
        // either keeps it or replaces it wholesale through the multiplexer.
        let zero_fields = vec![FieldElement::ZERO; return_type.size_in_fields()];
        let default_aux = return_type.to_auxiliary(None)?;
        let mut accumulator = return_type.from_fields(&zero_fields, &default_aux)?;
        let mut matched = false;

        for (index, (_, schema)) in self.alternatives.iter().enumerate() {
            let is_real = tag_field == FieldElement::from(index as u64);
            let alternative_aux = if is_real {
                real_aux.clone()
            } else {
                schema.to_auxiliary(None)?
            };
            let slice = &fields[1..1 + schema.size_in_fields()];
            let payload = schema.from_fields(slice, &alternative_aux)?;
            let candidate = ordered[index](&payload)?;
            let mask = if is_real {
                FieldElement::ONE
            } else {
                FieldElement::ZERO
            };
            accumulator = select(return_type, mask, &candidate, &accumulator)?;
            matched |= is_real;
        }

        if !matched {
            return Err(CodecError::UnreachableMatch);
        }
        Ok(accumulator)
    }
}

impl LeafType for Variant {
    fn display_name(&self) -> String {
        let names: Vec<&str> = self.alternatives.iter().map(|(n, _)| n.as_str()).collect();
        format!("variant<{}>", names.join(" | "))
    }

    fn size_in_fields(&self) -> usize {
        Variant::size_in_fields(self)
    }

    fn to_fields(&self, value: &Value) -> CodecResult<Vec<FieldElement>> {
        Variant::to_fields(self, value)
    }

    fn from_fields(&self, fields: &[FieldElement], aux: &AuxValue) -> CodecResult<Value> {
        Variant::from_fields(self, fields, aux)
    }

    fn to_auxiliary(&self, value: Option<&Value>) -> CodecResult<AuxValue> {
        Variant::to_auxiliary(self, value)
    }

    fn validate(&self, value: &Value) -> CodecResult<()> {
        Variant::validate(self, value)
    }

    fn to_plain(&self, value: &Value) -> CodecResult<PlainValue> {
        Variant::to_plain(self, value)
    }

    fn from_plain(&self, plain: &PlainValue) -> CodecResult<Value> {
        Variant::from_plain(self, plain)
    }

    fn to_json(&self, value: &Value) -> Option<CodecResult<JsonValue>> {
        Some(Variant::to_json(self, value))
    }

    fn from_json(&self, json: &JsonValue) -> Option<CodecResult<Value>> {
        Some(Variant::from_json(self, json))
    }

    fn empty(&self) -> Option<CodecResult<Value>> {
        Some(Variant::empty(self))
    }
}

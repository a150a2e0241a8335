
use std::cell::Cell;

use _fixtures::{felt, ScalarLeaf, WideLeaf};
use rpp_circuit_codec::{
    select, AuxValue, CodecError, CodecResult, FieldElement, MatchHandler, Schema, Value, Variant,
};

fn wide(name: &'static str, width: usize) -> Schema {
    Schema::leaf(WideLeaf { name, width })
}

fn scalar(name: &'static str) -> Schema {
    Schema::leaf(ScalarLeaf { name })
}

fn two_sided() -> Variant {
    Variant::new(vec![("left", wide("left", 2)), ("right", wide("right", 5))]).expect("variant")
}

#[test]
fn width_is_one_plus_widest_alternative_ok() {
    let variant = two_sided();
    assert_eq!(variant.size_in_fields(), 6);
    assert_eq!(variant.payload_width(), 5);
}

#[test]
fn short_alternative_is_padded_ok() {
    let variant = two_sided();
    let value = Value::record(vec![("left", WideLeaf::value(vec![21, 22]))]);

    let fields = variant.to_fields(&value).expect("encode");
    assert_eq!(fields.len(), 6);
    assert_eq!(fields[0], felt(0));
    assert_eq!(&fields[1..3], &[felt(21), felt(22)]);
    assert_eq!(&fields[3..6], &[FieldElement::ZERO; 3]);
}

#[test]
fn both_alternatives_share_one_width_ok() {
    let variant = two_sided();
    let left = Value::record(vec![("left", WideLeaf::value(vec![1, 2]))]);
    let right = Value::record(vec![("right", WideLeaf::value(vec![1, 2, 3, 4, 5]))]);

    assert_eq!(variant.to_fields(&left).expect("left").len(), 6);
    assert_eq!(variant.to_fields(&right).expect("right").len(), 6);
}

#[test]
fn tag_assignment_ignores_declaration_order_ok() {
    let declared_ba = Variant::new(vec![("b", scalar("b")), ("a", scalar("a"))]).expect("variant");
    let declared_ab = Variant::new(vec![("a", scalar("a")), ("b", scalar("b"))]).expect("variant");

    for variant in [&declared_ba, &declared_ab] {
        assert_eq!(variant.tag_of("a"), Some(0));
        assert_eq!(variant.tag_of("b"), Some(1));
    }
}

#[test]
fn color_palette_layout_ok() {
    let variant = Variant::new(vec![
        ("rgb", wide("rgb", 3)),
        ("named", wide("named", 128)),
    ])
    .expect("variant");

    assert_eq!(variant.tag_of("named"), Some(0));
    assert_eq!(variant.tag_of("rgb"), Some(1));
    assert_eq!(variant.size_in_fields(), 129);

    let value = Value::record(vec![("rgb", WideLeaf::value(vec![250, 128, 114]))]);
    let fields = variant.to_fields(&value).expect("encode");
    assert_eq!(fields[0], felt(1));
    assert_eq!(&fields[1..4], &[felt(250), felt(128), felt(114)]);
    assert!(fields[4..].iter().all(|f| *f == FieldElement::ZERO));
    assert_eq!(fields[4..].len(), 125);
}

#[test]
fn encoded_variant_roundtrip_ok() {
    let variant = two_sided();
    let value = Value::record(vec![("right", WideLeaf::value(vec![9, 8, 7, 6, 5]))]);

    let fields = variant.to_fields(&value).expect("encode");
    let aux = variant.to_auxiliary(Some(&value)).expect("auxiliary");
    let decoded = variant.from_fields(&fields, &aux).expect("decode");
    assert_eq!(decoded, value);
}

#[test]
fn decode_trusts_field_tag_over_auxiliary_ok() {
    let variant = two_sided();

    // The auxiliary tree claims tag 0; the committed fields say tag 1. The
    // fields win.
    let fields = vec![felt(1), felt(5), felt(4), felt(3), felt(2), felt(1)];
    let aux = AuxValue::Items(vec![
        AuxValue::Scalar(Value::Number(0.0)),
        AuxValue::Empty,
    ]);

    let decoded = variant.from_fields(&fields, &aux).expect("decode");
    assert_eq!(
        decoded,
        Value::record(vec![("right", WideLeaf::value(vec![5, 4, 3, 2, 1]))])
    );
}

#[test]
fn decode_rejects_out_of_range_tag_err() {
    let variant = two_sided();
    let fields = vec![felt(9); 6];
    let aux = variant.to_auxiliary(None).expect("auxiliary");

    let err = variant.from_fields(&fields, &aux).expect_err("forged tag");
    assert_eq!(err, CodecError::UnknownTag { tag: 9, count: 2 });
}

#[test]
fn match_calls_every_handler_exactly_once_ok() {
    let variant = Variant::new(vec![("low", scalar("low")), ("high", scalar("high"))])
        .expect("variant");
    let return_type = scalar("result");

    for (alternative, payload, expected) in [("low", 7u64, 1007u64), ("high", 9, 2009)] {
        let value = Value::record(vec![(alternative, ScalarLeaf::value(payload))]);

        let low_calls = Cell::new(0usize);
        let high_calls = Cell::new(0usize);
        let on_low = |payload: &Value| -> CodecResult<Value> {
            low_calls.set(low_calls.get() + 1);
            let raw = payload.downcast_opaque::<u64>().copied().unwrap_or(0);
            Ok(Value::opaque(1000 + raw))
        };
        let on_high = |payload: &Value| -> CodecResult<Value> {
            high_calls.set(high_calls.get() + 1);
            let raw = payload.downcast_opaque::<u64>().copied().unwrap_or(0);
            Ok(Value::opaque(2000 + raw))
        };
        let handlers: Vec<(&str, MatchHandler<'_>)> =
            vec![("low", &on_low), ("high", &on_high)];

        let result = variant
            .match_oblivious(&value, &return_type, &handlers)
            .expect("oblivious match");

        assert_eq!(low_calls.get(), 1, "low handler ran once for {alternative}");
        assert_eq!(high_calls.get(), 1, "high handler ran once for {alternative}");
        assert_eq!(result, Value::opaque(expected));
    }
}

#[test]
fn match_on_forged_tag_is_unreachable_err() {
    let variant = Variant::new(vec![("low", scalar("low")), ("high", scalar("high"))])
        .expect("variant");
    let return_type = scalar("result");

    let on_any = |_: &Value| -> CodecResult<Value> { Ok(Value::opaque(0u64)) };
    let handlers: Vec<(&str, MatchHandler<'_>)> = vec![("low", &on_any), ("high", &on_any)];

    let fields = vec![felt(7), felt(0)];
    let aux = variant.to_auxiliary(None).expect("auxiliary");

    let err = variant
        .match_encoded(&fields, &aux, &return_type, &handlers)
        .expect_err("no alternative matches a forged tag");
    assert_eq!(err, CodecError::UnreachableMatch);
}

#[test]
fn match_requires_full_handler_coverage_err() {
    let variant = Variant::new(vec![("low", scalar("low")), ("high", scalar("high"))])
        .expect("variant");
    let return_type = scalar("result");
    let value = Value::record(vec![("low", ScalarLeaf::value(1))]);

    let on_any = |_: &Value| -> CodecResult<Value> { Ok(Value::opaque(0u64)) };

    let short: Vec<(&str, MatchHandler<'_>)> = vec![("low", &on_any)];
    let err = variant
        .match_oblivious(&value, &return_type, &short)
        .expect_err("one handler missing");
    assert_eq!(err, CodecError::arity_mismatch("handlers", 2, 1));

    let unknown: Vec<(&str, MatchHandler<'_>)> = vec![("low", &on_any), ("middle", &on_any)];
    let err = variant
        .match_oblivious(&value, &return_type, &unknown)
        .expect_err("handler names no alternative");
    assert_eq!(
        err,
        CodecError::UnknownAlternative {
            name: "middle".to_string()
        }
    );

    let duplicated: Vec<(&str, MatchHandler<'_>)> = vec![("low", &on_any), ("low", &on_any)];
    let err = variant
        .match_oblivious(&value, &return_type, &duplicated)
        .expect_err("duplicate handler");
    assert!(matches!(err, CodecError::Validation { .. }));
}

#[test]
fn select_is_a_numeric_multiplexer_ok() {
    let ty = scalar("slot");
    let a = ScalarLeaf::value(111);
    let b = ScalarLeaf::value(222);

    let chosen = select(&ty, FieldElement::ONE, &a, &b).expect("condition one");
    assert_eq!(chosen, a);

    let chosen = select(&ty, FieldElement::ZERO, &a, &b).expect("condition zero");
    assert_eq!(chosen, b);

    let err = select(&ty, felt(2), &a, &b).expect_err("non-boolean condition");
    assert!(matches!(err, CodecError::Validation { .. }));
}

#[test]
fn variant_json_carries_tag_and_payload_ok() {
    let variant = Variant::new(vec![("low", scalar("low")), ("high", scalar("high"))])
        .expect("variant");
    let value = Value::record(vec![("high", ScalarLeaf::value(77))]);

    let json = variant.to_json(&value).expect("to json");
    assert_eq!(json, serde_json::json!({ "tag": "high", "value": "77" }));

    let restored = variant.from_json(&json).expect("from json");
    assert_eq!(restored, value);

    let err = variant
        .from_json(&serde_json::json!({ "tag": "middle", "value": "0" }))
        .expect_err("unknown tag name");
    assert_eq!(
        err,
        CodecError::UnknownAlternative {
            name: "middle".to_string()
        }
    );
}

#[test]
fn variant_value_must_name_an_alternative_err() {
    let variant = two_sided();
    let value = Value::record(vec![("middle", WideLeaf::value(vec![1, 2]))]);

    let err = variant.validate(&value).expect_err("unknown alternative");
    assert_eq!(
        err,
        CodecError::UnknownAlternative {
            name: "middle".to_string()
        }
    );
}

#[test]
fn variant_empty_defaults_to_lowest_tag_ok() {
    let variant = Variant::new(vec![("zeta", scalar("zeta")), ("alpha", scalar("alpha"))])
        .expect("variant");
    let empty = variant.empty().expect("default");
    assert_eq!(empty, Value::record(vec![("alpha", Value::opaque(0u64))]));
}

#[test]
fn variant_embeds_as_leaf_in_a_record_ok() {
    let payment = Variant::new(vec![
        ("transfer", wide("transfer", 2)),
        ("mint", scalar("mint")),
    ])
    .expect("variant");
    let schema = Schema::record(vec![
        ("action", Schema::leaf(payment)),
        ("nonce", scalar("nonce")),
    ])
    .expect("schema");

    // mint -> 0, transfer -> 1; payload width 2; one slot for the nonce.
    assert_eq!(schema.size_in_fields(), 4);

    let value = Value::record(vec![
        ("action", Value::record(vec![("mint", ScalarLeaf::value(64))])),
        ("nonce", ScalarLeaf::value(3)),
    ]);

    let fields = schema.to_fields(&value).expect("encode");
    let aux = schema.to_auxiliary(Some(&value)).expect("auxiliary");
    let decoded = schema.from_fields(&fields, &aux).expect("decode");
    assert_eq!(decoded, value);
}

#[test]
fn variant_auxiliary_is_unpadded_ok() {
    let variant = two_sided();
    let value = Value::record(vec![("left", WideLeaf::value(vec![1, 2]))]);

    let aux = variant.to_auxiliary(Some(&value)).expect("auxiliary");
    assert_eq!(
        aux,
        AuxValue::Items(vec![
            AuxValue::Scalar(Value::Number(0.0)),
            AuxValue::Empty,
        ])
    );
}

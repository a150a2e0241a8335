
use std::sync::Arc;

use _fixtures::{ScalarLeaf, WideLeaf};
use rpp_circuit_codec::{
    parse_descriptor, schema_digest, CodecError, LeafRegistry, NamedType, Schema, Value,
};

fn registry() -> LeafRegistry {
    let mut registry = LeafRegistry::new();
    registry
        .register("amount", Arc::new(ScalarLeaf { name: "amount" }))
        .expect("register amount");
    registry
        .register("digest", Arc::new(WideLeaf { name: "digest", width: 4 }))
        .expect("register digest");
    registry
}

#[test]
fn record_descriptor_parses_ok() {
    let registry = registry();
    let descriptor = serde_json::json!({
        "balance": "amount",
        "commitment": "digest",
        "memo": "string",
        "pair": ["number", "boolean"],
    });

    let schema = parse_descriptor(&registry, &descriptor).expect("parse");
    assert_eq!(schema.size_in_fields(), 5);

    let value = Value::record(vec![
        ("balance", ScalarLeaf::value(10)),
        ("commitment", WideLeaf::value(vec![1, 2, 3, 4])),
        ("memo", Value::Text("ok".into())),
        (
            "pair",
            Value::Tuple(vec![Value::Number(1.0), Value::Bool(false)]),
        ),
    ]);
    schema.validate(&value).expect("descriptor-driven validation");
}

#[test]
fn wrapper_descriptor_unwraps_once_ok() {
    let registry = registry();
    let descriptor = serde_json::json!({ "provable": "amount" });

    let schema = parse_descriptor(&registry, &descriptor).expect("parse");
    assert!(schema.is_leaf());
    assert_eq!(schema.size_in_fields(), 1);
}

#[test]
fn array_descriptor_expands_ok() {
    let registry = registry();
    let descriptor = serde_json::json!({ "array": "amount", "length": 3 });

    let schema = parse_descriptor(&registry, &descriptor).expect("parse");
    assert_eq!(schema.size_in_fields(), 3);
}

#[test]
fn unregistered_leaf_is_unsupported_err() {
    let registry = registry();
    let err = parse_descriptor(&registry, &serde_json::json!({ "point": "curve-point" }))
        .expect_err("unknown leaf");
    assert_eq!(err, CodecError::unsupported_type("curve-point"));
    assert_eq!(err.to_string(), "unsupported type \"curve-point\"");
}

#[test]
fn literal_node_is_unsupported_err() {
    let registry = registry();
    let err =
        parse_descriptor(&registry, &serde_json::json!({ "weight": 17 })).expect_err("literal");
    assert_eq!(err, CodecError::unsupported_type("17"));
}

#[test]
fn reregistration_is_rejected_err() {
    let mut registry = registry();
    let err = registry
        .register("amount", Arc::new(ScalarLeaf { name: "amount" }))
        .expect_err("duplicate registration");
    assert!(matches!(err, CodecError::Validation { .. }));
}

#[test]
fn digest_is_stable_across_parses_ok() {
    let registry = registry();
    let descriptor = serde_json::json!({
        "balance": "amount",
        "memo": "string",
    });

    let first = parse_descriptor(&registry, &descriptor).expect("parse");
    let second = parse_descriptor(&registry, &descriptor).expect("parse");
    assert_eq!(schema_digest(&first), schema_digest(&second));
}

#[test]
fn digest_separates_structures_ok() {
    let flat = Schema::record(vec![("a", Schema::number()), ("b", Schema::boolean())])
        .expect("flat");
    let nested = Schema::record(vec![(
        "a",
        Schema::record(vec![("b", Schema::boolean())]).expect("inner"),
    )])
    .expect("nested");
    let renamed = Schema::record(vec![("a", Schema::number()), ("c", Schema::boolean())])
        .expect("renamed");

    let digests = [
        schema_digest(&flat),
        schema_digest(&nested),
        schema_digest(&renamed),
    ];
    assert_ne!(digests[0], digests[1]);
    assert_ne!(digests[0], digests[2]);
    assert_ne!(digests[1], digests[2]);
}

#[test]
fn named_type_keeps_identity_and_delegates_ok() {
    let schema = Schema::record(vec![("amount", Schema::leaf(ScalarLeaf { name: "amount" }))])
        .expect("schema");
    let account = NamedType::new("Account", schema);

    use rpp_circuit_codec::LeafType;
    assert_eq!(account.display_name(), "Account");
    assert_eq!(account.size_in_fields(), 1);

    let value = Value::record(vec![("amount", ScalarLeaf::value(55))]);
    let fields = account.to_fields(&value).expect("encode");
    let aux = account.to_auxiliary(Some(&value)).expect("auxiliary");
    let decoded = account.from_fields(&fields, &aux).expect("decode");
    assert_eq!(decoded, value);

    // A named type embeds as a leaf under its own name.
    let outer = Schema::record(vec![("account", Schema::leaf(account))]).expect("outer");
    assert_eq!(outer.size_in_fields(), 1);
    let empty = outer.empty().expect("defaults flow through the named type");
    assert_eq!(
        empty,
        Value::record(vec![(
            "account",
            Value::record(vec![("amount", Value::opaque(0u64))]),
        )])
    );
}

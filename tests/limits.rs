
use _fixtures::ScalarLeaf;
use rpp_circuit_codec::config::MAX_SCHEMA_DEPTH;
use rpp_circuit_codec::{parse_descriptor, CodecError, LeafRegistry, Schema, Value};

fn nested_schema(depth: usize) -> Schema {
    let mut schema = Schema::leaf(ScalarLeaf { name: "core" });
    for _ in 0..depth {
        schema = Schema::tuple(vec![schema]);
    }
    schema
}

fn nested_value(depth: usize) -> Value {
    let mut value = ScalarLeaf::value(5);
    for _ in 0..depth {
        value = Value::Tuple(vec![value]);
    }
    value
}

#[test]
fn walkers_accept_depths_within_bound_ok() {
    let depth = MAX_SCHEMA_DEPTH - 2;
    let schema = nested_schema(depth);
    let value = nested_value(depth);

    let fields = schema.to_fields(&value).expect("encode within bound");
    let aux = schema.to_auxiliary(Some(&value)).expect("auxiliary within bound");
    let decoded = schema.from_fields(&fields, &aux).expect("decode within bound");
    assert_eq!(decoded, value);
}

#[test]
fn walkers_refuse_excessive_depth_err() {
    let depth = MAX_SCHEMA_DEPTH + 4;
    let schema = nested_schema(depth);
    let value = nested_value(depth);

    let err = schema.to_fields(&value).expect_err("encode past bound");
    assert_eq!(
        err,
        CodecError::DepthExceeded {
            limit: MAX_SCHEMA_DEPTH
        }
    );

    let err = schema.validate(&value).expect_err("validate past bound");
    assert_eq!(
        err,
        CodecError::DepthExceeded {
            limit: MAX_SCHEMA_DEPTH
        }
    );
}

#[test]
fn descriptor_parsing_refuses_excessive_depth_err() {
    let mut descriptor = serde_json::json!("number");
    for _ in 0..MAX_SCHEMA_DEPTH + 4 {
        descriptor = serde_json::json!([descriptor]);
    }

    let registry = LeafRegistry::new();
    let err = parse_descriptor(&registry, &descriptor).expect_err("parse past bound");
    assert_eq!(
        err,
        CodecError::DepthExceeded {
            limit: MAX_SCHEMA_DEPTH
        }
    );
}

//! End-to-end behaviour of the rewired registry: annotated arguments arrive
//! decoded at resolvers, annotated results leave encoded, and everything else
//! is untouched.

use indirect_engine::{IndirectTransform, Registry, RequestContext};
use integration_tests::{args, encode_id, resolve, user_registry, TestCodec};
use serde_json::{json, Value};

fn transformed() -> Registry {
    IndirectTransform::new(TestCodec)
        .apply(user_registry())
        .expect("valid registry")
}

#[tokio::test]
async fn annotated_argument_is_decoded_before_the_resolver_runs() {
    let registry = transformed();
    let user = resolve(
        &registry,
        "Query",
        "user",
        Value::Null,
        args(json!({ "id": encode_id(1, "User") })),
        RequestContext::default(),
    )
    .await
    .unwrap();
    assert_eq!(user, json!({ "id": 1, "name": "User 1" }));
}

#[tokio::test]
async fn annotated_result_field_is_encoded() {
    let registry = transformed();
    let id = resolve(
        &registry,
        "User",
        "id",
        json!({ "id": 1, "name": "User 1" }),
        args(json!({})),
        RequestContext::default(),
    )
    .await
    .unwrap();
    assert_eq!(id, json!(encode_id(1, "User")));
}

#[tokio::test]
async fn list_results_are_encoded_in_order() {
    let registry = transformed();
    let ids = resolve(
        &registry,
        "Query",
        "userIds",
        Value::Null,
        args(json!({})),
        RequestContext::default(),
    )
    .await
    .unwrap();
    assert_eq!(ids, json!([encode_id(1, "User"), encode_id(2, "User")]));
}

#[tokio::test]
async fn list_arguments_are_decoded_in_order() {
    let registry = transformed();
    let found = resolve(
        &registry,
        "Query",
        "usersByIds",
        Value::Null,
        args(json!({ "ids": [encode_id(2, "User"), encode_id(1, "User")] })),
        RequestContext::default(),
    )
    .await
    .unwrap();
    assert_eq!(
        found,
        json!([
            { "id": 2, "name": "User 2" },
            { "id": 1, "name": "User 1" },
        ])
    );
}

#[tokio::test]
async fn annotated_list_field_on_a_plain_object_uses_the_selection_fallback() {
    let registry = transformed();
    let ids = resolve(
        &registry,
        "UserIds",
        "ids",
        json!({ "ids": [1, 2] }),
        args(json!({})),
        RequestContext::default(),
    )
    .await
    .unwrap();
    assert_eq!(ids, json!([encode_id(1, "User"), encode_id(2, "User")]));
}

#[tokio::test]
async fn input_object_fields_are_decoded() {
    let registry = transformed();
    let created = resolve(
        &registry,
        "Mutation",
        "createUser",
        Value::Null,
        args(json!({ "input": { "id": encode_id(3, "User"), "name": "User 3" } })),
        RequestContext::default(),
    )
    .await
    .unwrap();
    assert_eq!(created, json!({ "id": 3, "name": "User 3" }));
}

#[tokio::test]
async fn annotated_lists_inside_input_objects_are_decoded() {
    let registry = transformed();
    let created = resolve(
        &registry,
        "Mutation",
        "createUser",
        Value::Null,
        args(json!({
            "input": {
                "id": encode_id(3, "User"),
                "name": "User 3",
                "friends": [encode_id(1, "User"), encode_id(2, "User")],
            }
        })),
        RequestContext::default(),
    )
    .await
    .unwrap();
    assert_eq!(created, json!({ "id": 3, "name": "User 3", "friends": [1, 2] }));
}

#[tokio::test]
async fn only_the_innermost_annotated_scalar_is_decoded() {
    let registry = transformed();
    let rendered = resolve(
        &registry,
        "Mutation",
        "deepUpdate",
        Value::Null,
        args(json!({
            "input": {
                "middle": {
                    "label": "untouched",
                    "inner": { "id": encode_id(1, "User") },
                }
            }
        })),
        RequestContext::default(),
    )
    .await
    .unwrap();
    assert_eq!(
        rendered,
        json!(json!({ "middle": { "label": "untouched", "inner": { "id": 1 } } }).to_string())
    );
}

#[tokio::test]
async fn nested_input_objects_are_decoded_at_every_depth() {
    let registry = transformed();
    let rendered = resolve(
        &registry,
        "Mutation",
        "linkUsers",
        Value::Null,
        args(json!({
            "input": {
                "id": encode_id(1, "User"),
                "subs": [
                    { "id": encode_id(2, "User") },
                    { "id": encode_id(3, "User") },
                ],
            }
        })),
        RequestContext::default(),
    )
    .await
    .unwrap();
    assert_eq!(
        rendered,
        json!(json!({ "id": 1, "subs": [{ "id": 2 }, { "id": 3 }] }).to_string())
    );
}

#[tokio::test]
async fn self_referential_input_type_terminates_on_a_finite_value() {
    let registry = transformed();
    let rendered = resolve(
        &registry,
        "Mutation",
        "chainUsers",
        Value::Null,
        args(json!({
            "input": {
                "id": encode_id(1, "User"),
                "next": {
                    "id": encode_id(2, "User"),
                    "next": { "id": encode_id(3, "User") },
                },
            }
        })),
        RequestContext::default(),
    )
    .await
    .unwrap();
    assert_eq!(
        rendered,
        json!(json!({ "id": 1, "next": { "id": 2, "next": { "id": 3 } } }).to_string())
    );
}

#[tokio::test]
async fn unannotated_fields_are_untouched() {
    let registry = transformed();
    let users = resolve(
        &registry,
        "Query",
        "users",
        Value::Null,
        args(json!({})),
        RequestContext::default(),
    )
    .await
    .unwrap();
    assert_eq!(
        users,
        json!([
            { "id": 1, "name": "User 1" },
            { "id": 2, "name": "User 2" },
        ])
    );
    let name = resolve(
        &registry,
        "User",
        "name",
        json!({ "id": 1, "name": "User 1" }),
        args(json!({})),
        RequestContext::default(),
    )
    .await
    .unwrap();
    assert_eq!(name, json!("User 1"));
}

#[tokio::test]
async fn null_arguments_and_results_pass_through() {
    let registry = transformed();
    let user = resolve(
        &registry,
        "Query",
        "user",
        Value::Null,
        args(json!({ "id": null })),
        RequestContext::default(),
    )
    .await
    .unwrap();
    assert_eq!(user, Value::Null);
    // A null parent makes the annotated id field resolve to null, which must
    // not be encoded into a token.
    let id = resolve(
        &registry,
        "User",
        "id",
        Value::Null,
        args(json!({})),
        RequestContext::default(),
    )
    .await
    .unwrap();
    assert_eq!(id, Value::Null);
}

#[tokio::test]
async fn decoded_then_reencoded_identifiers_survive_a_full_hop() {
    let registry = transformed();
    let user = resolve(
        &registry,
        "Query",
        "user",
        Value::Null,
        args(json!({ "id": encode_id(2, "User") })),
        RequestContext::default(),
    )
    .await
    .unwrap();
    let id = resolve(
        &registry,
        "User",
        "id",
        user,
        args(json!({})),
        RequestContext::default(),
    )
    .await
    .unwrap();
    assert_eq!(id, json!(encode_id(2, "User")));
}

#[test]
fn the_test_codec_round_trips() {
    use indirect_engine::IdCodec;

    let token = TestCodec.encode(&json!(42), "User", Some(&json!("alice")));
    let decoded = TestCodec.decode(&token, Some(&json!("alice"))).unwrap();
    assert_eq!(decoded.type_tag, "User");
    assert_eq!(decoded.raw, json!(42));
}

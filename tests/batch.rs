use datagate::batch::{prepare_insert, prepare_update};
use datagate::prelude::*;
use serde_json::{Map, json};

fn op(data: serde_json::Value, filters: serde_json::Value) -> UpdateOperation {
    UpdateOperation {
        data: data.as_object().cloned().unwrap_or_default(),
        filters: filters.as_object().cloned().unwrap_or_default(),
    }
}

#[test]
fn insert_preserves_item_order() {
    let items = vec![
        json!({"name": "A"}),
        json!({"name": "B"}),
        json!({"name": "C"}),
    ];
    let request = prepare_insert(1, 10, "produtos", items.clone()).unwrap();
    assert_eq!(request.data, items);
}

#[test]
fn insert_rejects_an_empty_batch() {
    let err = prepare_insert(1, 10, "produtos", vec![]).unwrap_err();
    assert!(matches!(err, GatewayError::Validation(_)));
    assert_eq!(err.status(), 400);
}

#[test]
fn insert_rejects_non_object_items() {
    let err = prepare_insert(1, 10, "produtos", vec![json!({"ok": 1}), json!(42)]).unwrap_err();
    assert!(err.to_string().contains("data[1]"));
}

#[test]
fn insert_rejects_missing_identifiers() {
    assert!(prepare_insert(0, 10, "produtos", vec![json!({})]).is_err());
    assert!(prepare_insert(1, 0, "produtos", vec![json!({})]).is_err());
    assert!(prepare_insert(1, 10, "", vec![json!({})]).is_err());
}

#[test]
fn update_preserves_operation_order() {
    let operations = vec![
        op(json!({"stock": 50}), json!({"id": 1})),
        op(json!({"stock": 100, "price": 25.0}), json!({"id": 2})),
        op(json!({"status": "inactive"}), json!({"category": "legacy"})),
    ];
    let request = prepare_update(1, 10, "produtos", operations.clone()).unwrap();
    assert_eq!(request.updates, operations);
}

#[test]
fn update_rejects_an_empty_batch() {
    assert!(matches!(
        prepare_update(1, 10, "produtos", vec![]),
        Err(GatewayError::Validation(_))
    ));
}

#[test]
fn update_rejects_any_unconditional_operation() {
    // One valid operation does not excuse a second with an empty where.
    let operations = vec![
        op(json!({"stock": 50}), json!({"id": 1})),
        op(json!({"stock": 0}), json!({})),
    ];
    let err = prepare_update(1, 10, "produtos", operations).unwrap_err();
    assert!(err.to_string().contains("updates[1].where"));

    let operations = vec![op(json!({}), json!({"id": 1}))];
    let err = prepare_update(1, 10, "produtos", operations).unwrap_err();
    assert!(err.to_string().contains("updates[0].data"));
}

#[test]
fn batch_requests_serialize_with_engine_field_names() {
    let request = prepare_update(
        1,
        10,
        "produtos",
        vec![op(json!({"stock": 50}), json!({"id": 1}))],
    )
    .unwrap();
    let wire = serde_json::to_value(&request).unwrap();
    assert_eq!(wire["updates"][0]["where"], json!({"id": 1}));

    let missing_where: UpdateOperation =
        serde_json::from_value(json!({"data": {"stock": 1}})).unwrap();
    assert_eq!(missing_where.filters, Map::new());
}

// tests/planner/wire_test.rs
use hops::model::{Feature, FeatureGroup};
use hops::planner::wire::{FeatureViewRequest, QueryContext, QueryRequest};
use hops::planner::{parse_join_spec, QueryNode, QueryTreeBuilder, ResolvedJoin};
use serde_json::{json, Value};

fn group(id: i64, name: &str, features: &[(&str, &str)]) -> FeatureGroup {
    let mut fg = FeatureGroup::new(
        name,
        1,
        features
            .iter()
            .map(|(n, t)| Feature::new(*n, *t))
            .collect(),
    );
    fg.id = id;
    fg
}

fn context() -> QueryContext {
    QueryContext::for_project("fraud", 67)
}

/// orders -> products (p_) -> categories
fn orders_tree() -> QueryNode {
    let orders = group(
        10,
        "orders",
        &[("order_id", "bigint"), ("product_id", "bigint")],
    );
    let joins = vec![
        ResolvedJoin {
            spec: parse_join_spec("products LEFT product_id=id p_").unwrap(),
            group: group(
                11,
                "products",
                &[("id", "bigint"), ("category_id", "bigint"), ("name", "string")],
            ),
        },
        ResolvedJoin {
            spec: parse_join_spec("categories inner p_category_id=id").unwrap(),
            group: group(12, "categories", &[("id", "bigint"), ("label", "string")]),
        },
    ];
    QueryTreeBuilder::new(&orders, None).build(&joins)
}

fn to_value(query: &QueryRequest) -> Value {
    serde_json::to_value(query).unwrap()
}

#[test]
fn test_root_query_shape() {
    let value = to_value(&QueryRequest::from_tree(&orders_tree(), &context()));

    assert_eq!(
        value["leftFeatureGroup"],
        json!({
            "id": 10,
            "name": "orders",
            "version": 1,
            "type": "cachedFeaturegroupDTO",
            "featurestoreId": 67,
            "onlineEnabled": false,
        })
    );
    assert_eq!(value["featureStoreId"], 67);
    assert_eq!(value["featureStoreName"], "fraud_featurestore");
    assert_eq!(value["hiveEngine"], true);
    assert_eq!(
        value["leftFeatures"][1],
        json!({"name": "product_id", "featureGroupId": 10, "type": "bigint", "primary": false})
    );
}

#[test]
fn test_distinct_keys_use_left_and_right_on() {
    let value = to_value(&QueryRequest::from_tree(&orders_tree(), &context()));
    let products = &value["joins"][0];

    assert_eq!(products["type"], "LEFT");
    assert_eq!(products["on"], json!([]));
    assert_eq!(products["leftOn"], json!(["product_id"]));
    assert_eq!(products["rightOn"], json!(["id"]));
    assert_eq!(products["prefix"], "p_");
    assert_eq!(products["query"]["leftFeatureGroup"]["name"], "products");
}

#[test]
fn test_nested_join_uses_raw_parent_column() {
    let value = to_value(&QueryRequest::from_tree(&orders_tree(), &context()));
    let root_joins = value["joins"].as_array().unwrap();
    assert_eq!(root_joins.len(), 1);

    let categories = &value["joins"][0]["query"]["joins"][0];
    assert_eq!(categories["type"], "INNER");
    assert_eq!(categories["leftOn"], json!(["category_id"]));
    assert_eq!(categories["rightOn"], json!(["id"]));
    assert!(categories.get("prefix").is_none());
    assert_eq!(categories["query"]["leftFeatureGroup"]["id"], 12);
    assert_eq!(categories["query"]["joins"], json!([]));
}

#[test]
fn test_shared_key_uses_on() {
    let base = group(1, "transactions", &[("id", "bigint"), ("customer_id", "bigint")]);
    let joins = vec![ResolvedJoin {
        spec: parse_join_spec("customers full customer_id").unwrap(),
        group: group(2, "customers", &[("customer_id", "bigint"), ("tier", "string")]),
    }];
    let tree = QueryTreeBuilder::new(&base, None).build(&joins);

    let value = to_value(&QueryRequest::from_tree(&tree, &context()));
    let join = &value["joins"][0];
    assert_eq!(join["type"], "FULL");
    assert_eq!(join["on"], json!(["customer_id"]));
    assert_eq!(join["leftOn"], json!([]));
    assert_eq!(join["rightOn"], json!([]));
}

#[test]
fn test_feature_view_request() {
    let tree = orders_tree();
    let request = FeatureViewRequest::new("enriched_orders", 2, &tree, &context())
        .with_description("orders with product info")
        .with_labels(&["is_fraud".to_string()]);
    let value = serde_json::to_value(&request).unwrap();

    assert_eq!(value["name"], "enriched_orders");
    assert_eq!(value["version"], 2);
    assert_eq!(value["type"], "featureViewDTO");
    assert_eq!(value["featurestoreId"], 67);
    assert_eq!(value["description"], "orders with product info");
    assert_eq!(value["label"], json!([{"name": "is_fraud"}]));
    assert_eq!(value["query"]["leftFeatureGroup"]["name"], "orders");
}

#[test]
fn test_feature_view_request_omits_empty_optionals() {
    let tree = orders_tree();
    let request = FeatureViewRequest::new("plain", 1, &tree, &context()).with_description("");
    let value = serde_json::to_value(&request).unwrap();

    assert!(value.get("description").is_none());
    assert!(value.get("label").is_none());
}

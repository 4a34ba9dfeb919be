// tests/client/decode_test.rs
use hops::client::decode_list;
use hops::model::{Execution, FeatureGroup, FeatureView, Project};
use serde::Deserialize;

#[derive(Debug, Deserialize, PartialEq)]
struct Item {
    id: i64,
    #[serde(default)]
    name: String,
}

fn ids(raw: &str) -> Vec<i64> {
    decode_list::<Item>(raw.as_bytes())
        .unwrap()
        .iter()
        .map(|item| item.id)
        .collect()
}

#[test]
fn test_wrapped_items() {
    assert_eq!(ids(r#"{"items": [{"id": 1}, {"id": 2}], "count": 2}"#), vec![1, 2]);
    assert_eq!(ids(r#"{"items": [], "count": 0}"#), Vec::<i64>::new());
}

#[test]
fn test_bare_array() {
    assert_eq!(ids(r#"[{"id": 3}, {"id": 1}, {"id": 2}]"#), vec![3, 1, 2]);
    assert_eq!(ids("[]"), Vec::<i64>::new());
}

#[test]
fn test_empty_shapes() {
    assert!(decode_list::<Item>(b"{}").unwrap().is_empty());
    assert!(decode_list::<Item>(br#"{"count": 0}"#).unwrap().is_empty());
    assert!(decode_list::<Item>(br#"{"items": null, "count": 0}"#).unwrap().is_empty());
}

#[test]
fn test_single_object_is_wrapped() {
    let list = decode_list::<Item>(br#"{"id": 7, "name": "orders"}"#).unwrap();
    assert_eq!(
        list.into_vec(),
        vec![Item {
            id: 7,
            name: "orders".to_string()
        }]
    );
}

#[test]
fn test_unrecognized_payloads_keep_raw_body() {
    for raw in ["not json", "42", "\"items\"", "null"] {
        let err = decode_list::<Item>(raw.as_bytes()).unwrap_err();
        assert_eq!(err.raw, raw);
    }
}

#[test]
fn test_wrapped_items_with_wrong_element_type() {
    let raw = r#"{"items": [{"name": "no id"}]}"#;
    let err = decode_list::<Item>(raw.as_bytes()).unwrap_err();
    assert!(err.reason.starts_with("items:"), "reason: {}", err.reason);
    assert!(err.to_string().contains("no id"));
}

#[test]
fn test_object_that_is_not_an_item() {
    let err = decode_list::<Item>(br#"{"count": 3, "href": "x"}"#).unwrap_err();
    assert!(err.reason.starts_with("single object:"), "reason: {}", err.reason);
}

#[test]
fn test_long_payload_preview_is_cut() {
    let raw = format!("[{}]", "9".repeat(500));
    let err = decode_list::<String>(raw.as_bytes()).unwrap_err();
    assert_eq!(err.raw.len(), 502);
    assert!(err.to_string().ends_with("...)"));
}

#[test]
fn test_feature_groups_from_every_shape() {
    let fg = r#"{"type": "cachedFeaturegroupDTO", "id": 5, "name": "orders", "version": 2,
                 "features": [{"name": "order_id", "type": "bigint", "primary": true}]}"#;

    for raw in [
        format!(r#"{{"items": [{}], "count": 1}}"#, fg),
        format!("[{}]", fg),
        fg.to_string(),
    ] {
        let groups: Vec<FeatureGroup> = decode_list(raw.as_bytes()).unwrap().into_vec();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, "orders");
        assert_eq!(groups[0].version, 2);
        assert!(groups[0].features[0].primary);
    }
}

#[test]
fn test_projects_nested_and_flat() {
    let nested = r#"[{"project": {"id": 119, "name": "fraud"}}]"#;
    let flat = r#"[{"projectId": 120, "projectName": "churn"}]"#;

    let nested: Vec<Project> = decode_list(nested.as_bytes()).unwrap().into_vec();
    let flat: Vec<Project> = decode_list(flat.as_bytes()).unwrap().into_vec();

    assert_eq!(nested[0].project_id, 119);
    assert_eq!(nested[0].project_name, "fraud");
    assert_eq!(flat[0].project_id, 120);
    assert_eq!(flat[0].project_name, "churn");
}

#[test]
fn test_null_fields_in_wrapped_items() {
    let raw = r#"{"items": [{"type": "cachedFeaturegroupDTO", "id": 5, "name": "orders",
                   "version": 1, "description": null, "eventTime": null, "location": null,
                   "features": [{"name": "order_id", "type": "bigint", "description": null}]}],
                  "count": 1}"#;

    let groups: Vec<FeatureGroup> = decode_list(raw.as_bytes()).unwrap().into_vec();
    assert_eq!(groups[0].name, "orders");
    assert!(groups[0].description.is_empty());
    assert!(groups[0].event_time.is_empty());
    assert!(groups[0].features[0].description.is_empty());
}

#[test]
fn test_null_fields_in_bare_array() {
    let raw = r#"[
        {"id": 31, "state": "RUNNING", "finalStatus": null, "submissionTime": "2024-05-01",
         "duration": null, "progress": null, "appId": null, "hdfsUser": null},
        {"id": 30, "state": "FINISHED", "finalStatus": "SUCCEEDED", "duration": 4200}
    ]"#;

    let executions: Vec<Execution> = decode_list(raw.as_bytes()).unwrap().into_vec();
    assert_eq!(executions.len(), 2);
    assert!(executions[0].final_status.is_empty());
    assert_eq!(executions[0].duration, 0);
    assert!(!executions[0].is_terminal());
    assert!(executions[1].succeeded());
}

#[test]
fn test_null_fields_in_single_object() {
    let raw = r#"{"id": 3, "name": "enriched", "version": 2, "description": null,
                  "created": null, "features": null, "label": null}"#;

    let views: Vec<FeatureView> = decode_list(raw.as_bytes()).unwrap().into_vec();
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].name, "enriched");
    assert!(views[0].description.is_empty());
    assert!(views[0].features.is_empty());
    assert!(views[0].labels.is_empty());
}

#[test]
fn test_null_project_fields() {
    let raw = r#"[{"project": {"id": 119, "name": "fraud", "description": null, "created": null}}]"#;
    let projects: Vec<Project> = decode_list(raw.as_bytes()).unwrap().into_vec();
    assert_eq!(projects[0].project_name, "fraud");
    assert!(projects[0].description.is_empty());
}

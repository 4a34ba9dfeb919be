// tests/planner/join_spec_test.rs
use hops::planner::{parse_join_spec, parse_name_version, GroupRef, JoinType, PlanError};

#[test]
fn test_single_key_join() {
    let spec = parse_join_spec("customers LEFT customer_id").unwrap();

    assert_eq!(spec.group, GroupRef::new("customers", 1));
    assert_eq!(spec.join_type, JoinType::Left);
    assert_eq!(spec.left_key, "customer_id");
    assert_eq!(spec.right_key, "customer_id");
    assert!(spec.keys_match());
    assert_eq!(spec.prefix, "");
}

#[test]
fn test_distinct_keys_version_and_prefix() {
    let spec = parse_join_spec("products:3 INNER product_id=id p_").unwrap();

    assert_eq!(spec.group, GroupRef::new("products", 3));
    assert_eq!(spec.join_type, JoinType::Inner);
    assert_eq!(spec.left_key, "product_id");
    assert_eq!(spec.right_key, "id");
    assert_eq!(spec.prefix, "p_");
    assert_eq!(spec.on_clause(), "product_id=id");
    assert_eq!(spec.output_name("category_id"), "p_category_id");
}

#[test]
fn test_join_type_is_case_insensitive() {
    for (raw, expected) in [
        ("inner", JoinType::Inner),
        ("Left", JoinType::Left),
        ("RIGHT", JoinType::Right),
        ("fUlL", JoinType::Full),
    ] {
        let spec = parse_join_spec(&format!("fg {} id", raw)).unwrap();
        assert_eq!(spec.join_type, expected, "join type {}", raw);
    }
}

#[test]
fn test_extra_whitespace_and_trailing_tokens() {
    let spec = parse_join_spec("  stores:2\tFULL   store_id   s_  ignored ").unwrap();
    assert_eq!(spec.group, GroupRef::new("stores", 2));
    assert_eq!(spec.join_type, JoinType::Full);
    assert_eq!(spec.prefix, "s_");
}

#[test]
fn test_too_few_parts() {
    for raw in ["", "products", "products LEFT"] {
        assert!(
            matches!(parse_join_spec(raw), Err(PlanError::TooFewParts { .. })),
            "expected TooFewParts for {:?}",
            raw
        );
    }
}

#[test]
fn test_invalid_join_type() {
    let err = parse_join_spec("products OUTER product_id").unwrap_err();
    assert_eq!(
        err,
        PlanError::InvalidJoinType {
            spec: "products OUTER product_id".to_string(),
            join_type: "OUTER".to_string(),
        }
    );
    assert!(err.to_string().contains("INNER, LEFT, RIGHT, or FULL"));
}

#[test]
fn test_invalid_version_is_rejected() {
    for raw in ["products:latest LEFT id", "products: LEFT id", "products:0 LEFT id"] {
        assert!(
            matches!(parse_join_spec(raw), Err(PlanError::InvalidVersion { .. })),
            "expected InvalidVersion for {:?}",
            raw
        );
    }
}

#[test]
fn test_missing_name_and_empty_key() {
    assert!(matches!(
        parse_join_spec(":2 LEFT id"),
        Err(PlanError::MissingGroupName { .. })
    ));
    assert!(matches!(
        parse_join_spec("products LEFT product_id="),
        Err(PlanError::EmptyJoinKey { .. })
    ));
}

#[test]
fn test_parse_name_version() {
    assert_eq!(parse_name_version("orders").unwrap(), GroupRef::new("orders", 1));
    assert_eq!(parse_name_version("orders:3").unwrap(), GroupRef::new("orders", 3));
    assert_eq!(parse_name_version("orders:3").unwrap().to_string(), "orders v3");
    assert!(matches!(
        parse_name_version("orders:v3"),
        Err(PlanError::InvalidVersion { .. })
    ));
}

// tests/planner/join_builder_test.rs
use hops::model::{Feature, FeatureGroup};
use hops::planner::{parse_join_spec, PlanError, QueryNode, QueryTreeBuilder, ResolvedJoin};

/// Feature group whose features are all strings; the first one is the primary key.
fn group(name: &str, features: &[&str]) -> FeatureGroup {
    let features = features
        .iter()
        .enumerate()
        .map(|(i, f)| {
            let feature = Feature::new(*f, "string");
            if i == 0 {
                feature.primary()
            } else {
                feature
            }
        })
        .collect();
    FeatureGroup::new(name, 1, features)
}

fn join(spec: &str, target: FeatureGroup) -> ResolvedJoin {
    ResolvedJoin {
        spec: parse_join_spec(spec).unwrap(),
        group: target,
    }
}

fn child_names(node: &QueryNode) -> Vec<&str> {
    node.children
        .iter()
        .map(|edge| edge.node.group.name.as_str())
        .collect()
}

#[test]
fn test_no_joins_selects_all_base_features() {
    let base = group("a", &["id", "x"]);
    let tree = QueryTreeBuilder::new(&base, None).build(&[]);

    assert_eq!(tree.group.name, "a");
    assert_eq!(tree.selected_features, vec!["id", "x"]);
    assert!(tree.children.is_empty());
    assert_eq!(tree.join_count(), 0);
}

#[test]
fn test_explicit_base_selection_is_kept() {
    let base = group("a", &["id", "x", "y"]);
    let tree = QueryTreeBuilder::new(&base, Some(vec!["y".to_string(), "id".to_string()]))
        .build(&[join("b LEFT id", group("b", &["id", "z"]))]);

    assert_eq!(tree.selected_features, vec!["y", "id"]);
    // Joined groups are always fully projected.
    assert_eq!(tree.children[0].node.selected_features, vec!["id", "z"]);
}

#[test]
fn test_join_nests_under_owner_of_left_key() {
    let base = group("a", &["id", "x"]);
    let joins = vec![
        join("b LEFT id", group("b", &["id", "y"])),
        join("c LEFT y", group("c", &["y", "z"])),
    ];

    let tree = QueryTreeBuilder::new(&base, None).build(&joins);

    assert_eq!(child_names(&tree), vec!["b"]);
    let b = &tree.children[0].node;
    assert_eq!(child_names(b), vec!["c"]);
    assert!(b.children[0].node.children.is_empty());
    assert_eq!(tree.join_count(), 2);
}

#[test]
fn test_unowned_key_falls_back_to_root() {
    let base = group("a", &["id"]);
    let joins = vec![join("b LEFT missing_col", group("b", &["id", "missing_col"]))];

    let tree = QueryTreeBuilder::new(&base, None).build(&joins);

    assert_eq!(child_names(&tree), vec!["b"]);
    assert_eq!(tree.children[0].left_on, "missing_col");
}

#[test]
fn test_strict_build_rejects_unowned_key() {
    let base = group("a", &["id"]);
    let joins = vec![join("b LEFT missing_col", group("b", &["missing_col"]))];

    let err = QueryTreeBuilder::new(&base, None)
        .build_strict(&joins)
        .unwrap_err();
    assert_eq!(
        err,
        PlanError::UnownedJoinKey {
            group: "b v1".to_string(),
            key: "missing_col".to_string(),
        }
    );
}

#[test]
fn test_strict_build_accepts_owned_keys() {
    let base = group("a", &["id"]);
    let joins = vec![
        join("b LEFT id", group("b", &["id", "y"])),
        join("c INNER y", group("c", &["y"])),
    ];

    let strict = QueryTreeBuilder::new(&base, None).build_strict(&joins).unwrap();
    let lenient = QueryTreeBuilder::new(&base, None).build(&joins);
    assert_eq!(strict, lenient);
}

#[test]
fn test_siblings_keep_input_order() {
    let base = group("orders", &["order_id", "customer_id", "store_id", "product_id"]);
    let joins = vec![
        join("stores LEFT store_id", group("stores", &["store_id"])),
        join("customers LEFT customer_id", group("customers", &["customer_id"])),
        join("products LEFT product_id", group("products", &["product_id"])),
    ];

    let tree = QueryTreeBuilder::new(&base, None).build(&joins);
    assert_eq!(child_names(&tree), vec!["stores", "customers", "products"]);
}

#[test]
fn test_base_wins_over_earlier_join() {
    // Both the base and `b` own `id`; the base is checked first.
    let base = group("a", &["id"]);
    let joins = vec![
        join("b LEFT id", group("b", &["id", "k"])),
        join("c LEFT id", group("c", &["id"])),
    ];

    let tree = QueryTreeBuilder::new(&base, None).build(&joins);
    assert_eq!(child_names(&tree), vec!["b", "c"]);
}

#[test]
fn test_first_joined_owner_wins() {
    let base = group("a", &["id"]);
    let joins = vec![
        join("b LEFT id", group("b", &["id", "k"])),
        join("c LEFT id", group("c", &["id", "k"])),
        join("d LEFT k", group("d", &["k"])),
    ];

    let tree = QueryTreeBuilder::new(&base, None).build(&joins);
    assert_eq!(child_names(&tree), vec!["b", "c"]);
    assert_eq!(child_names(&tree.children[0].node), vec!["d"]);
    assert!(tree.children[1].node.children.is_empty());
}

#[test]
fn test_prefixed_columns_own_prefixed_keys() {
    let orders = group("orders", &["order_id", "product_id"]);
    let joins = vec![
        join(
            "products LEFT product_id=id p_",
            group("products", &["id", "category_id", "name"]),
        ),
        join(
            "categories LEFT p_category_id=id",
            group("categories", &["id", "label"]),
        ),
    ];

    let tree = QueryTreeBuilder::new(&orders, None).build(&joins);

    assert_eq!(child_names(&tree), vec!["products"]);
    let products = &tree.children[0];
    assert_eq!(products.left_on, "product_id");

    assert_eq!(child_names(&products.node), vec!["categories"]);
    let categories = &products.node.children[0];
    // Inside the products sub-query the column has its raw name.
    assert_eq!(categories.left_on, "category_id");
    assert_eq!(categories.spec.left_key, "p_category_id");
    assert_eq!(categories.spec.right_key, "id");
}

#[test]
fn test_unprefixed_name_does_not_match_prefixed_join() {
    let orders = group("orders", &["order_id", "product_id"]);
    let joins = vec![
        join(
            "products LEFT product_id=id p_",
            group("products", &["id", "category_id"]),
        ),
        join(
            "categories LEFT category_id=id",
            group("categories", &["id"]),
        ),
    ];

    let tree = QueryTreeBuilder::new(&orders, None).build(&joins);
    assert_eq!(child_names(&tree), vec!["products", "categories"]);
}

#[test]
fn test_render_tree() {
    let orders = group("orders", &["order_id", "product_id", "customer_id"]);
    let joins = vec![
        join(
            "products LEFT product_id=id p_",
            group("products", &["id", "category_id"]),
        ),
        join("customers INNER customer_id", group("customers", &["customer_id", "tier"])),
        join(
            "categories LEFT p_category_id=id",
            group("categories", &["id", "label"]),
        ),
    ];

    let tree = QueryTreeBuilder::new(&orders, None).build(&joins);

    insta::assert_snapshot!(tree.render().trim_end(), @r"
    orders v1 (order_id, product_id, customer_id)
      LEFT JOIN products v1 ON product_id = id PREFIX p_
        LEFT JOIN categories v1 ON category_id = id
      INNER JOIN customers v1 ON customer_id
    ");
}

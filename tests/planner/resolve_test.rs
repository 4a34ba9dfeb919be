// tests/planner/resolve_test.rs
use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use hops::model::{Feature, FeatureGroup};
use hops::planner::{
    parse_join_spec, resolve_group, resolve_joins, FeatureGroupSource, GroupRef, JoinSpec,
    PlanError,
};

/// In-memory catalog that records every lookup.
#[derive(Default)]
struct Catalog {
    groups: HashMap<(String, u32), FeatureGroup>,
    lookups: Mutex<Vec<String>>,
}

impl Catalog {
    fn with(mut self, name: &str, version: u32, features: &[&str]) -> Self {
        let fg = FeatureGroup::new(
            name,
            version,
            features.iter().map(|f| Feature::new(*f, "string")).collect(),
        );
        self.groups.insert((name.to_string(), version), fg);
        self
    }
}

#[async_trait]
impl FeatureGroupSource for Catalog {
    type Error = String;

    async fn feature_group(&self, name: &str, version: u32) -> Result<FeatureGroup, String> {
        self.lookups
            .lock()
            .unwrap()
            .push(format!("{}:{}", name, version));
        self.groups
            .get(&(name.to_string(), version))
            .cloned()
            .ok_or_else(|| "no such feature group".to_string())
    }
}

fn specs(raw: &[&str]) -> Vec<JoinSpec> {
    raw.iter().map(|s| parse_join_spec(s).unwrap()).collect()
}

#[tokio::test]
async fn test_resolves_in_input_order() {
    let catalog = Catalog::default()
        .with("products", 1, &["id", "category_id"])
        .with("categories", 2, &["id"]);

    let resolved = resolve_joins(
        &catalog,
        &specs(&["products LEFT product_id=id p_", "categories:2 LEFT p_category_id=id"]),
    )
    .await
    .unwrap();

    assert_eq!(resolved.len(), 2);
    assert_eq!(resolved[0].group.name, "products");
    assert_eq!(resolved[0].spec.prefix, "p_");
    assert_eq!(resolved[1].group.version, 2);
    assert_eq!(
        *catalog.lookups.lock().unwrap(),
        vec!["products:1", "categories:2"]
    );
}

#[tokio::test]
async fn test_first_missing_group_aborts() {
    let catalog = Catalog::default().with("products", 1, &["id"]);

    let err = resolve_joins(
        &catalog,
        &specs(&["stores LEFT store_id", "products LEFT product_id=id"]),
    )
    .await
    .unwrap_err();

    assert_eq!(
        err,
        PlanError::GroupNotFound {
            reference: "stores v1".to_string(),
            reason: "no such feature group".to_string(),
        }
    );
    // Nothing after the failing lookup is requested.
    assert_eq!(*catalog.lookups.lock().unwrap(), vec!["stores:1"]);
}

#[tokio::test]
async fn test_resolve_group_by_version() {
    let catalog = Catalog::default()
        .with("orders", 1, &["order_id"])
        .with("orders", 2, &["order_id", "total"]);

    let v2 = resolve_group(&catalog, &GroupRef::new("orders", 2)).await.unwrap();
    assert_eq!(v2.feature_names(), vec!["order_id", "total"]);

    let err = resolve_group(&catalog, &GroupRef::new("orders", 3))
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "feature group 'orders v3' not found: no such feature group"
    );
}

#[tokio::test]
async fn test_no_joins_resolves_nothing() {
    let catalog = Catalog::default();
    let resolved = resolve_joins(&catalog, &[]).await.unwrap();
    assert!(resolved.is_empty());
    assert!(catalog.lookups.lock().unwrap().is_empty());
}

//! Planning of feature-store requests from command-line flags.
//!
//! Three steps turn `--join` flags into the nested query the backend expects:
//! 1. Parsing: `"<fg>[:<ver>] <TYPE> <on>[=<right_on>] [prefix]"` → [`JoinSpec`]
//! 2. Resolution: each referenced group is looked up through a [`FeatureGroupSource`]
//! 3. Tree building: joins nest under the node that owns their left key → [`QueryNode`]
//!
//! The tree is then serialized by [`wire`] into the backend's query DTO.
//!
//! [`schema_spec`] does the same for the column list of `fg create`.

pub mod join_builder;
pub mod join_spec;
pub mod resolve;
pub mod schema_spec;
pub mod wire;

pub use join_builder::{JoinEdge, QueryNode, QueryTreeBuilder, ResolvedJoin};
pub use join_spec::{parse_join_spec, parse_name_version, GroupRef, JoinSpec, JoinType};
pub use resolve::{resolve_group, resolve_joins, FeatureGroupSource};
pub use schema_spec::{parse_feature_list, SchemaSpec};

use thiserror::Error;

/// Errors that can occur while planning a joined query.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    #[error("join spec needs at least 3 parts: \"<fg> <JOIN_TYPE> <on_col>\", got: {spec:?}")]
    TooFewParts { spec: String },

    #[error("invalid join type {join_type:?} in {spec:?} (must be INNER, LEFT, RIGHT, or FULL)")]
    InvalidJoinType { spec: String, join_type: String },

    #[error("invalid version {version:?} in {spec:?} (expected a positive integer)")]
    InvalidVersion { spec: String, version: String },

    #[error("missing feature group name in {spec:?}")]
    MissingGroupName { spec: String },

    #[error("empty join key in {spec:?}")]
    EmptyJoinKey { spec: String },

    #[error("feature group '{reference}' not found: {reason}")]
    GroupNotFound { reference: String, reason: String },

    #[error("join with {group}: no feature group in the query owns column '{key}'")]
    UnownedJoinKey { group: String, key: String },

    #[error("invalid feature {entry:?}: {reason} (expected \"name[:type]\")")]
    InvalidFeatureSpec { entry: String, reason: &'static str },

    #[error("at least one primary key column is required")]
    MissingPrimaryKey,

    #[error("{role} column '{column}' is not in the feature list")]
    UnknownSchemaColumn { role: &'static str, column: String },
}

pub type PlanResult<T> = Result<T, PlanError>;

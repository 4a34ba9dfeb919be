//! # hops
//!
//! Command-line client for the Hopsworks feature store.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                CLI flags (--join, --features)            │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [planner::join_spec]
//! ┌─────────────────────────────────────────────────────────┐
//! │                  JoinSpec (typed joins)                  │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [planner::resolve]  ◄── client (REST)
//! ┌─────────────────────────────────────────────────────────┐
//! │            ResolvedJoin (spec + group schema)            │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [planner::join_builder]
//! ┌─────────────────────────────────────────────────────────┐
//! │          QueryNode tree (joins nested by key owner)      │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [planner::wire]
//! ┌─────────────────────────────────────────────────────────┐
//! │              Feature view request (JSON)                 │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! Responses flow back through [`client::decode_list`], which absorbs the
//! backend's inconsistent list shapes.

pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod model;
pub mod output;
pub mod planner;

pub use client::{ClientError, HopsworksClient};
pub use config::Settings;
pub use error::{Error, Result};
pub use planner::{PlanError, QueryNode, QueryTreeBuilder};

//! REST client for the Hopsworks backend.
//!
//! [`HopsworksClient`] owns transport and authentication; the resource
//! modules add typed accessors on top of it. Every list accessor goes through
//! [`decode_list`], so callers never see the backend's shape variations.

pub mod decode;
pub mod error;
mod feature_groups;
mod feature_views;
mod http;
mod jobs;
mod projects;

pub use decode::{decode_list, DecodeError, DecodedList};
pub use error::{ClientError, ClientResult};
pub use http::{ApiPath, HopsworksClient, API_ROOT};

//! Parsing of `--join` and `--feature-group` flag values.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::{PlanError, PlanResult};

/// Version assumed when a reference omits `:<version>`.
pub const DEFAULT_VERSION: u32 = 1;

/// A feature group named by the user, `name[:version]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct GroupRef {
    pub name: String,
    pub version: u32,
}

impl GroupRef {
    pub fn new(name: impl Into<String>, version: u32) -> Self {
        Self {
            name: name.into(),
            version,
        }
    }
}

impl fmt::Display for GroupRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} v{}", self.name, self.version)
    }
}

/// Supported join types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
}

impl JoinType {
    /// Canonical uppercase form.
    pub fn as_str(&self) -> &'static str {
        match self {
            JoinType::Inner => "INNER",
            JoinType::Left => "LEFT",
            JoinType::Right => "RIGHT",
            JoinType::Full => "FULL",
        }
    }
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JoinType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "INNER" => Ok(JoinType::Inner),
            "LEFT" => Ok(JoinType::Left),
            "RIGHT" => Ok(JoinType::Right),
            "FULL" => Ok(JoinType::Full),
            _ => Err(()),
        }
    }
}

/// One parsed `--join` value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JoinSpec {
    pub group: GroupRef,
    pub join_type: JoinType,
    pub left_key: String,
    pub right_key: String,
    /// Prepended to the joined group's columns; empty means no renaming.
    pub prefix: String,
}

impl JoinSpec {
    pub fn keys_match(&self) -> bool {
        self.left_key == self.right_key
    }

    /// `"key"` or `"left=right"`, as the user would have written it.
    pub fn on_clause(&self) -> String {
        if self.keys_match() {
            self.left_key.clone()
        } else {
            format!("{}={}", self.left_key, self.right_key)
        }
    }

    /// Name a column of the joined group takes in the joined result.
    pub fn output_name(&self, column: &str) -> String {
        format!("{}{}", self.prefix, column)
    }
}

/// Split `"name[:version]"` into a [`GroupRef`].
///
/// The version defaults to 1. A suffix that is not a positive integer is an
/// error rather than a silent fallback.
pub fn parse_name_version(reference: &str) -> PlanResult<GroupRef> {
    parse_group_ref(reference, reference)
}

fn parse_group_ref(token: &str, spec: &str) -> PlanResult<GroupRef> {
    let (name, version) = match token.split_once(':') {
        Some((name, raw)) => {
            let version = raw
                .parse::<u32>()
                .ok()
                .filter(|v| *v > 0)
                .ok_or_else(|| PlanError::InvalidVersion {
                    spec: spec.to_string(),
                    version: raw.to_string(),
                })?;
            (name, version)
        }
        None => (token, DEFAULT_VERSION),
    };

    if name.is_empty() {
        return Err(PlanError::MissingGroupName {
            spec: spec.to_string(),
        });
    }

    Ok(GroupRef::new(name, version))
}

/// Parse `"<fg>[:<version>] <JOIN_TYPE> <on>[=<right_on>] [prefix]"`.
///
/// Tokens are whitespace-delimited; anything after the fourth token is ignored.
pub fn parse_join_spec(spec: &str) -> PlanResult<JoinSpec> {
    let tokens: Vec<&str> = spec.split_whitespace().collect();
    if tokens.len() < 3 {
        return Err(PlanError::TooFewParts {
            spec: spec.to_string(),
        });
    }

    let group = parse_group_ref(tokens[0], spec)?;

    let join_type = tokens[1]
        .parse::<JoinType>()
        .map_err(|_| PlanError::InvalidJoinType {
            spec: spec.to_string(),
            join_type: tokens[1].to_string(),
        })?;

    let on = tokens[2];
    let (left_key, right_key) = match on.find('=') {
        Some(idx) if idx > 0 => (&on[..idx], &on[idx + 1..]),
        _ => (on, on),
    };
    if left_key.is_empty() || right_key.is_empty() {
        return Err(PlanError::EmptyJoinKey {
            spec: spec.to_string(),
        });
    }

    let prefix = tokens.get(3).copied().unwrap_or_default();

    Ok(JoinSpec {
        group,
        join_type,
        left_key: left_key.to_string(),
        right_key: right_key.to_string(),
        prefix: prefix.to_string(),
    })
}

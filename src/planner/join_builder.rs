//! Nesting of resolved joins into a query tree.

use std::fmt::Write as _;

use crate::model::FeatureGroup;

use super::join_spec::JoinSpec;
use super::{PlanError, PlanResult};

/// A join whose target group has been fetched from the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedJoin {
    pub spec: JoinSpec,
    pub group: FeatureGroup,
}

/// A node of the nested join tree.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryNode {
    pub group: FeatureGroup,
    /// Projected columns; order defines output column order.
    pub selected_features: Vec<String>,
    /// Joins attached directly under this node, in input order.
    pub children: Vec<JoinEdge>,
}

/// A join attached under a [`QueryNode`].
#[derive(Debug, Clone, PartialEq)]
pub struct JoinEdge {
    pub spec: JoinSpec,
    /// Left key as the parent sub-query names it.
    ///
    /// Differs from `spec.left_key` only when the parent is a prefixed join:
    /// the user writes the prefixed output name, the parent sub-query holds
    /// the raw column.
    pub left_on: String,
    pub node: QueryNode,
}

impl QueryNode {
    pub fn leaf(group: FeatureGroup, selected_features: Vec<String>) -> Self {
        Self {
            group,
            selected_features,
            children: Vec::new(),
        }
    }

    /// Total number of joins in this subtree.
    pub fn join_count(&self) -> usize {
        self.children
            .iter()
            .map(|edge| 1 + edge.node.join_count())
            .sum()
    }

    /// Indented, human-readable rendering of the tree.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{} v{} ({})",
            self.group.name,
            self.group.version,
            self.selected_features.join(", ")
        );
        self.render_children(&mut out, 1);
        out
    }

    fn render_children(&self, out: &mut String, depth: usize) {
        for edge in &self.children {
            let indent = "  ".repeat(depth);
            let _ = write!(
                out,
                "{}{} JOIN {} v{} ON {}",
                indent,
                edge.spec.join_type,
                edge.node.group.name,
                edge.node.group.version,
                edge.left_on
            );
            if edge.left_on != edge.spec.right_key {
                let _ = write!(out, " = {}", edge.spec.right_key);
            }
            if !edge.spec.prefix.is_empty() {
                let _ = write!(out, " PREFIX {}", edge.spec.prefix);
            }
            out.push('\n');
            edge.node.render_children(out, depth + 1);
        }
    }
}

/// Where a join ends up in the tree.
#[derive(Debug, Clone, PartialEq)]
enum Attachment {
    /// The base group owns the left key.
    Root,
    /// An earlier join (by input index) owns the left key under this name.
    Under { parent: usize, left_on: String },
    /// Nobody owns the left key; the backend gets the final say.
    Unowned,
}

/// Builds the nested query tree for a base group and its joins.
///
/// Each join nests under the node whose own columns contain its left key:
/// the base group is checked first, then earlier joins in input order, with
/// a joined group's columns taken under their prefixed names. The first
/// owner wins. A key nobody owns attaches at the root unless strict mode is
/// requested through [`QueryTreeBuilder::build_strict`].
pub struct QueryTreeBuilder<'a> {
    base: &'a FeatureGroup,
    base_features: Vec<String>,
}

impl<'a> QueryTreeBuilder<'a> {
    /// `base_features` overrides the projection of the base group; `None`
    /// selects all of its features in schema order.
    pub fn new(base: &'a FeatureGroup, base_features: Option<Vec<String>>) -> Self {
        let base_features = base_features.unwrap_or_else(|| base.feature_names());
        Self {
            base,
            base_features,
        }
    }

    /// Build the tree, attaching unowned joins at the root.
    pub fn build(&self, joins: &[ResolvedJoin]) -> QueryNode {
        let attachments = self.attachments(joins);
        self.assemble(joins, &attachments)
    }

    /// Build the tree, rejecting any join whose left key no node owns.
    pub fn build_strict(&self, joins: &[ResolvedJoin]) -> PlanResult<QueryNode> {
        let attachments = self.attachments(joins);
        for (join, attachment) in joins.iter().zip(&attachments) {
            if *attachment == Attachment::Unowned {
                return Err(PlanError::UnownedJoinKey {
                    group: join.spec.group.to_string(),
                    key: join.spec.left_key.clone(),
                });
            }
        }
        Ok(self.assemble(joins, &attachments))
    }

    fn attachments(&self, joins: &[ResolvedJoin]) -> Vec<Attachment> {
        joins
            .iter()
            .enumerate()
            .map(|(idx, join)| self.attachment_for(&join.spec.left_key, &joins[..idx]))
            .collect()
    }

    fn attachment_for(&self, left_key: &str, earlier: &[ResolvedJoin]) -> Attachment {
        if self.base.has_feature(left_key) {
            return Attachment::Root;
        }

        for (parent, join) in earlier.iter().enumerate() {
            let owned = join
                .group
                .features
                .iter()
                .find(|f| join.spec.output_name(&f.name) == left_key);
            if let Some(feature) = owned {
                return Attachment::Under {
                    parent,
                    left_on: feature.name.clone(),
                };
            }
        }

        Attachment::Unowned
    }

    fn assemble(&self, joins: &[ResolvedJoin], attachments: &[Attachment]) -> QueryNode {
        let mut root = QueryNode::leaf(self.base.clone(), self.base_features.clone());
        root.children = children_of(None, joins, attachments);
        root
    }
}

/// Collect the edges whose parent is `parent` (`None` = root), recursively.
///
/// Parents always precede their children in input order, so the recursion
/// terminates.
fn children_of(
    parent: Option<usize>,
    joins: &[ResolvedJoin],
    attachments: &[Attachment],
) -> Vec<JoinEdge> {
    joins
        .iter()
        .zip(attachments)
        .enumerate()
        .filter_map(|(idx, (join, attachment))| {
            let left_on = match (attachment, parent) {
                (Attachment::Root | Attachment::Unowned, None) => join.spec.left_key.clone(),
                (Attachment::Under { parent: p, left_on }, Some(want)) if *p == want => {
                    left_on.clone()
                }
                _ => return None,
            };

            let mut node = QueryNode::leaf(join.group.clone(), join.group.feature_names());
            node.children = children_of(Some(idx), joins, attachments);

            Some(JoinEdge {
                spec: join.spec.clone(),
                left_on,
                node,
            })
        })
        .collect()
}

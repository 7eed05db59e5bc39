//! Fluent filter builder

use super::compiler;
use super::types::{
    CompiledFragment, ComparisonOp, Condition, FilterError, FilterNode, Group, LogicalOp,
};
use crate::data::value::Scalar;

/// Accumulates top-level filter nodes
///
/// Methods take and return the builder by value so calls chain. An invalid
/// condition is remembered and reported by `build()`, the rest of the chain
/// still runs.
#[derive(Debug, Clone, Default)]
pub struct FilterBuilder {
    nodes: Vec<FilterNode>,
    error: Option<FilterError>,
}

impl FilterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a condition
    pub fn add_condition(
        mut self,
        field: impl Into<String>,
        value: impl Into<Scalar>,
        operator: ComparisonOp,
    ) -> Self {
        match Condition::new(field, operator, value) {
            Ok(condition) => self.nodes.push(condition.into()),
            Err(e) => {
                self.error.get_or_insert(e);
            }
        }
        self
    }

    /// Shorthand for an equality condition
    pub fn eq(self, field: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.add_condition(field, value, ComparisonOp::Eq)
    }

    /// Append a group of pre-built children
    pub fn add_group(mut self, connective: LogicalOp, children: Vec<FilterNode>) -> Self {
        self.nodes.push(Group::new(connective, children).into());
        self
    }

    /// Append the nodes of another builder as a group
    pub fn add_nested(mut self, connective: LogicalOp, nested: FilterBuilder) -> Self {
        if let Some(e) = nested.error {
            self.error.get_or_insert(e);
        }
        self.nodes.push(Group::new(connective, nested.nodes).into());
        self
    }

    /// Snapshot the accumulated nodes. Builder state is left intact.
    pub fn build(&self) -> Result<Filter, FilterError> {
        match &self.error {
            Some(e) => Err(e.clone()),
            None => Ok(Filter {
                nodes: self.nodes.clone(),
            }),
        }
    }
}

/// Immutable top-level node sequence, implicitly joined by AND
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    nodes: Vec<FilterNode>,
}

impl Filter {
    /// A filter with no nodes
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[FilterNode] {
        &self.nodes
    }

    pub fn into_nodes(self) -> Vec<FilterNode> {
        self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Compile with `?` placeholders
    pub fn compile(&self) -> CompiledFragment {
        compiler::compile(&self.nodes, LogicalOp::And)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chains_conditions_in_order() {
        let filter = FilterBuilder::new()
            .add_condition("user_id", 7, ComparisonOp::Eq)
            .add_condition("completed", false, ComparisonOp::Eq)
            .build()
            .unwrap();

        assert_eq!(filter.nodes().len(), 2);
        match &filter.nodes()[1] {
            FilterNode::Condition(c) => assert_eq!(c.field(), "completed"),
            other => panic!("expected condition, got {:?}", other),
        }
    }

    #[test]
    fn empty_field_is_reported_on_build() {
        let builder = FilterBuilder::new()
            .add_condition("", 1, ComparisonOp::Eq)
            .eq("id", 1);

        let err = builder.build().unwrap_err();
        assert!(matches!(err, FilterError::InvalidExpression(_)));
    }

    #[test]
    fn nested_error_propagates() {
        let nested = FilterBuilder::new().eq("", 1);
        let result = FilterBuilder::new()
            .eq("id", 1)
            .add_nested(LogicalOp::Or, nested)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn build_snapshots_without_clearing() {
        let builder = FilterBuilder::new().eq("a", 1);
        let first = builder.build().unwrap();
        let builder = builder.eq("b", 2);
        let second = builder.build().unwrap();

        assert_eq!(first.nodes().len(), 1);
        assert_eq!(second.nodes().len(), 2);
    }

    #[test]
    fn add_group_nests_children() {
        let children = FilterBuilder::new()
            .eq("b", 2)
            .eq("c", 3)
            .build()
            .unwrap()
            .into_nodes();
        let filter = FilterBuilder::new()
            .eq("a", 1)
            .add_group(LogicalOp::Or, children)
            .build()
            .unwrap();

        match &filter.nodes()[1] {
            FilterNode::Group(g) => {
                assert_eq!(g.connective(), LogicalOp::Or);
                assert_eq!(g.children().len(), 2);
            }
            other => panic!("expected group, got {:?}", other),
        }
    }
}

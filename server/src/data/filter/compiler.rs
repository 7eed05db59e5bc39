//! Filter compiler
//!
//! Lowers a node tree into condition text plus values, depth-first and left
//! to right. The i-th placeholder in the text always binds the i-th value.

use super::types::{CompiledFragment, FilterNode, LogicalOp};
use crate::data::sql::{SqlDialect, SqliteDialect};

/// Compile with SQLite `?` placeholders
pub fn compile(nodes: &[FilterNode], connective: LogicalOp) -> CompiledFragment {
    compile_with(&SqliteDialect, nodes, connective, 0)
}

/// Compile for a dialect
///
/// `bound_before` is the number of values the enclosing statement binds
/// ahead of this fragment, so numbered placeholders continue from there.
pub fn compile_with(
    dialect: &dyn SqlDialect,
    nodes: &[FilterNode],
    connective: LogicalOp,
    bound_before: usize,
) -> CompiledFragment {
    let mut pieces: Vec<String> = Vec::with_capacity(nodes.len());
    let mut values = Vec::new();

    for node in nodes {
        match node {
            FilterNode::Condition(condition) => {
                values.push(condition.value().clone());
                let operator = condition.operator();
                pieces.push(format!(
                    "{} {} {}{}",
                    condition.field(),
                    operator.as_sql(),
                    dialect.placeholder(bound_before + values.len()),
                    operator.trailing_sql()
                ));
            }
            FilterNode::Group(group) => {
                let nested = compile_with(
                    dialect,
                    group.children(),
                    group.connective(),
                    bound_before + values.len(),
                );
                if nested.text.is_empty() {
                    continue;
                }
                pieces.push(format!("({})", nested.text));
                values.extend(nested.values);
            }
        }
    }

    CompiledFragment {
        text: pieces.join(&format!(" {} ", connective.as_sql())),
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{ComparisonOp, Condition, FilterBuilder, Group};
    use crate::data::sql::PostgresDialect;
    use crate::data::value::Scalar;

    fn cond(field: &str, value: i64) -> FilterNode {
        Condition::new(field, ComparisonOp::Eq, value).unwrap().into()
    }

    fn nested_tree() -> Vec<FilterNode> {
        vec![
            Group::new(
                LogicalOp::And,
                vec![
                    cond("a", 1),
                    Group::new(LogicalOp::Or, vec![cond("b", 2), cond("c", 3)]).into(),
                ],
            )
            .into(),
        ]
    }

    #[test]
    fn empty_sequence_compiles_to_nothing() {
        let fragment = compile(&[], LogicalOp::And);
        assert_eq!(fragment, CompiledFragment::default());
        assert!(fragment.is_empty());
    }

    #[test]
    fn empty_group_compiles_to_nothing() {
        let nodes = vec![Group::new(LogicalOp::Or, vec![]).into()];
        assert_eq!(compile(&nodes, LogicalOp::And), CompiledFragment::default());
    }

    #[test]
    fn empty_group_contributes_nothing_to_parent() {
        let nodes = vec![
            cond("a", 1),
            Group::new(LogicalOp::Or, vec![]).into(),
            cond("b", 2),
        ];
        let fragment = compile(&nodes, LogicalOp::And);
        assert_eq!(fragment.text, "a = ? AND b = ?");
        assert_eq!(fragment.values, vec![Scalar::Integer(1), Scalar::Integer(2)]);
    }

    #[test]
    fn nested_groups_are_parenthesized() {
        let group = Group::new(
            LogicalOp::And,
            vec![
                cond("a", 1),
                Group::new(LogicalOp::Or, vec![cond("b", 2), cond("c", 3)]).into(),
            ],
        );
        let fragment = compile(group.children(), group.connective());

        assert_eq!(fragment.text, "a = ? AND (b = ? OR c = ?)");
        assert_eq!(
            fragment.values,
            vec![Scalar::Integer(1), Scalar::Integer(2), Scalar::Integer(3)]
        );
    }

    #[test]
    fn single_child_group_still_parenthesized() {
        let nodes = vec![
            cond("a", 1),
            Group::new(LogicalOp::Or, vec![cond("b", 2)]).into(),
        ];
        assert_eq!(compile(&nodes, LogicalOp::And).text, "a = ? AND (b = ?)");
    }

    #[test]
    fn top_level_group_wraps_whole_text() {
        let fragment = compile(&nested_tree(), LogicalOp::And);
        assert_eq!(fragment.text, "(a = ? AND (b = ? OR c = ?))");
    }

    #[test]
    fn operators_render_their_tokens() {
        let filter = FilterBuilder::new()
            .add_condition("title", "%milk%", ComparisonOp::Like)
            .add_condition("id", 3, ComparisonOp::Gte)
            .add_condition("id", 9, ComparisonOp::Ne)
            .build()
            .unwrap();
        assert_eq!(
            filter.compile().text,
            "title LIKE ? ESCAPE '\\' AND id >= ? AND id <> ?"
        );
    }

    #[test]
    fn or_connective_joins_top_level() {
        let nodes = vec![cond("a", 1), cond("b", 2)];
        assert_eq!(compile(&nodes, LogicalOp::Or).text, "a = ? OR b = ?");
    }

    #[test]
    fn null_value_is_bound_not_inlined() {
        let filter = FilterBuilder::new()
            .eq("description", Scalar::Null)
            .build()
            .unwrap();
        let fragment = filter.compile();
        assert_eq!(fragment.text, "description = ?");
        assert_eq!(fragment.values, vec![Scalar::Null]);
    }

    #[test]
    fn hostile_value_never_reaches_text() {
        let filter = FilterBuilder::new()
            .eq("title", "x' OR '1'='1")
            .build()
            .unwrap();
        let fragment = filter.compile();
        assert_eq!(fragment.text, "title = ?");
        assert!(!fragment.text.contains('\''));
    }

    #[test]
    fn placeholders_align_with_values() {
        let fragment = compile(&nested_tree(), LogicalOp::And);
        assert_eq!(fragment.text.matches('?').count(), fragment.values.len());
    }

    #[test]
    fn numbered_placeholders_follow_emission_order() {
        let fragment = compile_with(&PostgresDialect, &nested_tree(), LogicalOp::And, 0);
        assert_eq!(fragment.text, "(a = $1 AND (b = $2 OR c = $3))");
    }

    #[test]
    fn numbered_placeholders_respect_offset() {
        let nodes = vec![
            cond("a", 1),
            Group::new(LogicalOp::Or, vec![]).into(),
            Group::new(LogicalOp::Or, vec![cond("b", 2), cond("c", 3)]).into(),
        ];
        let fragment = compile_with(&PostgresDialect, &nodes, LogicalOp::And, 2);
        assert_eq!(fragment.text, "a = $3 AND (b = $4 OR c = $5)");
    }

    #[test]
    fn compile_is_idempotent() {
        let tree = nested_tree();
        let first = compile(&tree, LogicalOp::And);
        let second = compile(&tree, LogicalOp::And);
        assert_eq!(first.text.as_bytes(), second.text.as_bytes());
        assert_eq!(first.values, second.values);
    }

    mod property {
        use super::*;
        use proptest::prelude::*;

        const FIELDS: [&str; 4] = ["a", "b", "c", "d"];

        fn arb_scalar() -> impl Strategy<Value = Scalar> {
            prop_oneof![
                Just(Scalar::Null),
                any::<bool>().prop_map(Scalar::Bool),
                any::<i64>().prop_map(Scalar::Integer),
                (-1.0e6f64..1.0e6).prop_map(Scalar::Float),
                "[a-z%_' ]{0,8}".prop_map(Scalar::Text),
            ]
        }

        fn arb_op() -> impl Strategy<Value = ComparisonOp> {
            prop_oneof![
                Just(ComparisonOp::Eq),
                Just(ComparisonOp::Ne),
                Just(ComparisonOp::Lt),
                Just(ComparisonOp::Gt),
                Just(ComparisonOp::Lte),
                Just(ComparisonOp::Gte),
                Just(ComparisonOp::Like),
            ]
        }

        fn arb_connective() -> impl Strategy<Value = LogicalOp> {
            prop_oneof![Just(LogicalOp::And), Just(LogicalOp::Or)]
        }

        fn arb_node() -> impl Strategy<Value = FilterNode> {
            let leaf = (prop::sample::select(FIELDS.to_vec()), arb_op(), arb_scalar())
                .prop_map(|(field, op, value)| {
                    FilterNode::from(Condition::new(field, op, value).unwrap())
                });
            leaf.prop_recursive(4, 32, 4, |inner| {
                (arb_connective(), prop::collection::vec(inner, 0..4)).prop_map(
                    |(connective, children)| FilterNode::from(Group::new(connective, children)),
                )
            })
        }

        fn arb_tree() -> impl Strategy<Value = Vec<FilterNode>> {
            prop::collection::vec(arb_node(), 0..5)
        }

        /// Conditions in depth-first, left-to-right order
        fn flatten<'a>(nodes: &'a [FilterNode], out: &mut Vec<&'a Condition>) {
            for node in nodes {
                match node {
                    FilterNode::Condition(condition) => out.push(condition),
                    FilterNode::Group(group) => flatten(group.children(), out),
                }
            }
        }

        /// Position of `needle` at or after `from`, not followed by another digit
        fn find_piece(text: &str, needle: &str, from: usize) -> Option<usize> {
            let mut start = from;
            while let Some(offset) = text[start..].find(needle) {
                let at = start + offset;
                let end = at + needle.len();
                if !text[end..].starts_with(|c: char| c.is_ascii_digit()) {
                    return Some(end);
                }
                start = end;
            }
            None
        }

        proptest! {
            #[test]
            fn question_marks_match_values(tree in arb_tree(), connective in arb_connective()) {
                let fragment = compile(&tree, connective);
                prop_assert_eq!(fragment.text.matches('?').count(), fragment.values.len());

                let mut conditions = Vec::new();
                flatten(&tree, &mut conditions);
                let expected: Vec<Scalar> = conditions.iter().map(|c| c.value().clone()).collect();
                prop_assert_eq!(&fragment.values, &expected);
                prop_assert_eq!(fragment.is_empty(), conditions.is_empty());
            }

            #[test]
            fn numbered_placeholders_bind_each_condition(
                tree in arb_tree(),
                connective in arb_connective(),
                bound_before in 0usize..4,
            ) {
                let fragment = compile_with(&PostgresDialect, &tree, connective, bound_before);

                let mut conditions = Vec::new();
                flatten(&tree, &mut conditions);
                prop_assert_eq!(fragment.values.len(), conditions.len());
                prop_assert_eq!(fragment.text.matches('$').count(), conditions.len());

                // The i-th condition renders as `field op $n` with n counting
                // on from the offset, in textual order
                let mut cursor = 0;
                for (i, condition) in conditions.iter().enumerate() {
                    let piece = format!(
                        "{} {} ${}",
                        condition.field(),
                        condition.operator().as_sql(),
                        bound_before + i + 1
                    );
                    let found = find_piece(&fragment.text, &piece, cursor);
                    prop_assert!(found.is_some(), "{} missing from {}", piece, fragment.text);
                    cursor = found.unwrap_or(cursor);
                    prop_assert_eq!(&fragment.values[i], condition.value());
                }
            }

            #[test]
            fn compiling_twice_is_identical(tree in arb_tree(), connective in arb_connective()) {
                for dialect in [&SqliteDialect as &dyn SqlDialect, &PostgresDialect] {
                    let first = compile_with(dialect, &tree, connective, 0);
                    let second = compile_with(dialect, &tree, connective, 0);
                    prop_assert_eq!(first, second);
                }
            }
        }
    }
}

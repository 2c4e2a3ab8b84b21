//! Parameter binder
//!
//! Enumerates literal values depth-first, left to right. Nested expressions
//! are descended before moving on to the next sibling; field references are
//! skipped. The walk uses an explicit stack, so tree depth is bounded by the
//! heap rather than the call stack.

use rustc_hash::FxHashSet;
use std::sync::Arc;
use tracing::trace;

use super::hash_map::ValueHashMap;
use super::strategy::{BindingStrategy, PlaceholderStyle};
use crate::error::Result;
use crate::expression::{Expression, Term};
use crate::value::Value;

#[derive(Debug, Clone)]
pub struct ParameterBinder {
    strategy: Arc<dyn BindingStrategy>,
    ignore: FxHashSet<String>,
}

impl ParameterBinder {
    pub fn new(strategy: Arc<dyn BindingStrategy>) -> Self {
        Self {
            strategy,
            ignore: FxHashSet::default(),
        }
    }

    pub fn with_style(style: PlaceholderStyle) -> Self {
        Self::new(style.strategy())
    }

    /// Skip values whose canonical form is one of `names` (typically field names)
    pub fn ignoring<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn strategy(&self) -> &dyn BindingStrategy {
        self.strategy.as_ref()
    }

    /// Fresh map for `condition`
    pub fn bind(&self, condition: &Expression) -> Result<ValueHashMap> {
        let mut map = ValueHashMap::new();
        self.bind_into(&mut map, condition)?;
        Ok(map)
    }

    /// Append `condition`'s literals to an existing map
    pub fn bind_into(&self, map: &mut ValueHashMap, condition: &Expression) -> Result<()> {
        let mut stack: Vec<&Term> = condition.terms.iter().rev().collect();

        while let Some(term) = stack.pop() {
            match term {
                Term::Expression(nested) => stack.extend(nested.terms.iter().rev()),
                Term::Literal(value) => self.bind_value(map, value)?,
                Term::Field(_) => {}
            }
        }
        Ok(())
    }

    /// Bind a single value. Lists bind each element in order; `Null` is never bound.
    pub fn bind_value(&self, map: &mut ValueHashMap, value: &Value) -> Result<()> {
        match value {
            Value::Null => Ok(()),
            Value::List(items) => {
                for item in items.iter().filter(|item| !item.is_null()) {
                    self.bind_scalar(map, item)?;
                }
                Ok(())
            }
            scalar => self.bind_scalar(map, scalar),
        }
    }

    fn bind_scalar(&self, map: &mut ValueHashMap, value: &Value) -> Result<()> {
        let canonical = value.canonical_string()?;
        if self.ignore.contains(&canonical) || map.contains(&canonical) {
            return Ok(());
        }

        let position = map.next_position();
        let placeholder = self.strategy.placeholder(value, &canonical, position)?;
        trace!(%placeholder, value = %value, "bound parameter");
        map.insert(canonical, placeholder, value.clone());
        Ok(())
    }
}

impl Default for ParameterBinder {
    fn default() -> Self {
        Self::with_style(PlaceholderStyle::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::{EntityField, ExpressionKind};
    use crate::ErrorKind;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn field(name: &str) -> EntityField {
        EntityField::new("posts", name)
    }

    fn entries(map: &ValueHashMap) -> Vec<(String, usize, String)> {
        map.iter()
            .map(|(k, b)| (k.to_string(), b.position, b.placeholder.clone()))
            .collect()
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Numbered strategy
    // ═══════════════════════════════════════════════════════════════════════

    #[test]
    fn test_depth_first_left_to_right() {
        let condition = Expression::and([
            Expression::equal_to(field("status"), "publish"),
            Expression::or([
                Expression::between(field("id"), 10, 20),
                Expression::in_list(field("author"), vec![3, 4]),
            ]),
            Expression::compare(ExpressionKind::GreaterThan, field("rating"), 4.5),
        ]);

        let map = ParameterBinder::default().bind(&condition).unwrap();

        assert_eq!(
            entries(&map),
            vec![
                ("publish".to_string(), 1, "%1$s".to_string()),
                ("10".to_string(), 2, "%2$d".to_string()),
                ("20".to_string(), 3, "%3$d".to_string()),
                ("3".to_string(), 4, "%4$d".to_string()),
                ("4".to_string(), 5, "%5$d".to_string()),
                ("4.5".to_string(), 6, "%6$f".to_string()),
            ]
        );
    }

    #[test]
    fn test_duplicates_reuse_first_binding() {
        let condition = Expression::or([
            Expression::equal_to(field("id"), 7),
            Expression::equal_to(field("parent"), 8),
            Expression::equal_to(field("author"), 7),
        ]);

        let map = ParameterBinder::default().bind(&condition).unwrap();

        assert_eq!(map.len(), 2);
        assert_eq!(map.placeholder_for(&Value::Int(7)), Some("%1$d"));
        assert_eq!(map.placeholder_for(&Value::Int(8)), Some("%2$d"));
        assert_eq!(map.args(), vec![Value::Int(7), Value::Int(8)]);
    }

    #[test]
    fn test_ignore_list_keeps_positions_dense() {
        // Literals X, A, Y, B, Z with A and B ignored and repeated elsewhere
        let condition = Expression::and([
            Expression::new(
                ExpressionKind::EqualTo,
                vec![Term::literal("X"), Term::literal("A")],
            ),
            Expression::new(
                ExpressionKind::EqualTo,
                vec![Term::literal("Y"), Term::literal("B")],
            ),
            Expression::new(
                ExpressionKind::EqualTo,
                vec![Term::literal("Z"), Term::literal("A"), Term::literal("B")],
            ),
        ]);

        let map = ParameterBinder::default()
            .ignoring(["A", "B"])
            .bind(&condition)
            .unwrap();

        assert_eq!(
            entries(&map),
            vec![
                ("X".to_string(), 1, "%1$s".to_string()),
                ("Y".to_string(), 2, "%2$s".to_string()),
                ("Z".to_string(), 3, "%3$s".to_string()),
            ]
        );
    }

    #[test]
    fn test_int_and_string_share_canonical_form() {
        // Accepted approximation: dedup is keyed on canonical form only
        let condition = Expression::or([
            Expression::equal_to(field("id"), 5),
            Expression::equal_to(field("slug"), "5"),
        ]);

        let map = ParameterBinder::default().bind(&condition).unwrap();

        assert_eq!(map.len(), 1);
        assert_eq!(map.args(), vec![Value::Int(5)]);
    }

    #[test]
    fn test_field_references_and_nulls_are_skipped() {
        let condition = Expression::new(
            ExpressionKind::EqualTo,
            vec![
                Term::Field(field("parent")),
                Term::Literal(Value::Null),
                Term::Field(field("id")),
            ],
        );

        let map = ParameterBinder::default().bind(&condition).unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn test_nested_list_is_a_type_error() {
        let condition = Expression::new(
            ExpressionKind::In,
            vec![
                Term::Field(field("id")),
                Term::Literal(Value::List(vec![Value::Int(1), Value::from(vec![2])])),
            ],
        );

        let err = ParameterBinder::default().bind(&condition).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_bind_into_continues_positions() {
        let binder = ParameterBinder::default();
        let mut map = ValueHashMap::new();
        binder.bind_value(&mut map, &Value::from("title")).unwrap();
        binder
            .bind_into(&mut map, &Expression::equal_to(field("id"), 3))
            .unwrap();

        assert_eq!(map.placeholders(), vec!["%1$s", "%2$d"]);
    }

    #[test]
    fn test_deep_tree_does_not_overflow() {
        let mut condition = Expression::equal_to(field("id"), 0);
        for depth in 1..50_000 {
            condition = Expression::new(
                ExpressionKind::And,
                vec![Term::Expression(condition), Term::literal(depth % 3)],
            );
        }

        let map = ParameterBinder::default().bind(&condition).unwrap();
        assert_eq!(map.len(), 3);
        // Leaf literal comes first: it is reached before any sibling literal
        assert_eq!(map.args()[0], Value::Int(0));
        // Dropping a tree this deep recurses; leak it instead
        std::mem::forget(condition);
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Content-hash strategy
    // ═══════════════════════════════════════════════════════════════════════

    #[test]
    fn test_content_hash_positions() {
        let condition = Expression::or([
            Expression::equal_to(field("status"), "draft"),
            Expression::equal_to(field("status"), "pending"),
            Expression::equal_to(field("status"), "draft"),
        ]);

        let map = ParameterBinder::with_style(PlaceholderStyle::ContentHash)
            .bind(&condition)
            .unwrap();

        let placeholders = map.placeholders();
        assert_eq!(placeholders.len(), 2);
        assert!(placeholders[0].starts_with(":v1_"));
        assert!(placeholders[1].starts_with(":v2_"));
        assert_eq!(map.args(), vec![Value::from("draft"), Value::from("pending")]);
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Properties
    // ═══════════════════════════════════════════════════════════════════════

    fn arb_literal() -> impl Strategy<Value = Value> {
        prop_oneof![
            (0i64..20).prop_map(Value::Int),
            "[a-e]{1,2}".prop_map(Value::String),
        ]
    }

    fn arb_expression() -> impl Strategy<Value = Expression> {
        let leaf = prop::collection::vec(arb_literal(), 1..4).prop_map(|values| {
            let mut terms = vec![Term::Field(EntityField::bare("f"))];
            terms.extend(values.into_iter().map(Term::Literal));
            Expression::new(ExpressionKind::EqualTo, terms)
        });
        leaf.prop_recursive(4, 32, 4, |inner| {
            prop::collection::vec(inner, 1..4).prop_map(|branches| Expression::or(branches))
        })
    }

    fn first_occurrences(expr: &Expression, seen: &mut Vec<String>) {
        for term in &expr.terms {
            match term {
                Term::Expression(nested) => first_occurrences(nested, seen),
                Term::Literal(value) => {
                    let canonical = value.canonical_string().unwrap();
                    if !seen.contains(&canonical) {
                        seen.push(canonical);
                    }
                }
                Term::Field(_) => {}
            }
        }
    }

    proptest! {
        #[test]
        fn prop_map_preserves_first_occurrence_order(expr in arb_expression()) {
            let map = ParameterBinder::default().bind(&expr).unwrap();

            let mut expected = Vec::new();
            first_occurrences(&expr, &mut expected);

            let keys: Vec<String> = map.iter().map(|(k, _)| k.to_string()).collect();
            prop_assert_eq!(keys, expected);
        }

        #[test]
        fn prop_positions_are_dense_and_embedded(expr in arb_expression()) {
            let map = ParameterBinder::default().bind(&expr).unwrap();

            for (idx, (_, binding)) in map.iter().enumerate() {
                prop_assert_eq!(binding.position, idx + 1);
                let prefix = format!("%{}$", idx + 1);
                prop_assert!(binding.placeholder.starts_with(&prefix));
            }
        }
    }
}

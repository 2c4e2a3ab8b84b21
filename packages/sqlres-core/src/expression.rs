//! Expression model - condition trees for filtering resources
//!
//! A condition is an `Expression` node holding an ordered list of `Term`s.
//! Terms are literals, entity field references or nested expressions:
//!
//! ```text
//! Or
//! ├── EqualTo [Field(posts.id), Literal(5)]
//! └── Between [Field(posts.id), Literal(10), Literal(12)]
//! ```
//!
//! Term order is significant: `Between` reads its bounds left to right and
//! `In` expects the field reference followed by a list literal.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value::Value;

/// Expression node kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpressionKind {
    And,
    Or,
    EqualTo,
    NotEqualTo,
    LessThan,
    LessThanOrEqualTo,
    GreaterThan,
    GreaterThanOrEqualTo,
    Like,
    Between,
    In,
    IsNull,
}

impl ExpressionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpressionKind::And => "and",
            ExpressionKind::Or => "or",
            ExpressionKind::EqualTo => "equal_to",
            ExpressionKind::NotEqualTo => "not_equal_to",
            ExpressionKind::LessThan => "less_than",
            ExpressionKind::LessThanOrEqualTo => "less_than_or_equal_to",
            ExpressionKind::GreaterThan => "greater_than",
            ExpressionKind::GreaterThanOrEqualTo => "greater_than_or_equal_to",
            ExpressionKind::Like => "like",
            ExpressionKind::Between => "between",
            ExpressionKind::In => "in",
            ExpressionKind::IsNull => "is_null",
        }
    }

    /// Logical connectives join sub-expressions rather than compare operands
    pub fn is_logical(&self) -> bool {
        matches!(self, ExpressionKind::And | ExpressionKind::Or)
    }
}

impl fmt::Display for ExpressionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Reference to a field, optionally qualified by its entity (table or alias)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityField {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
    pub field: String,
}

impl EntityField {
    pub fn new(entity: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            entity: Some(entity.into()),
            field: field.into(),
        }
    }

    /// Unqualified field reference
    pub fn bare(field: impl Into<String>) -> Self {
        Self {
            entity: None,
            field: field.into(),
        }
    }
}

impl fmt::Display for EntityField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.entity {
            Some(entity) => write!(f, "{}.{}", entity, self.field),
            None => write!(f, "{}", self.field),
        }
    }
}

/// Expression term
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Term {
    Literal(Value),
    Field(EntityField),
    Expression(Expression),
}

impl Term {
    pub fn literal(value: impl Into<Value>) -> Self {
        Term::Literal(value.into())
    }

    pub fn field(entity: impl Into<String>, field: impl Into<String>) -> Self {
        Term::Field(EntityField::new(entity, field))
    }

    /// True if this term references exactly the given field
    pub fn references(&self, target: &EntityField) -> bool {
        matches!(self, Term::Field(field) if field == target)
    }

    pub fn as_literal(&self) -> Option<&Value> {
        match self {
            Term::Literal(value) => Some(value),
            _ => None,
        }
    }
}

impl From<Value> for Term {
    fn from(value: Value) -> Self {
        Term::Literal(value)
    }
}

impl From<EntityField> for Term {
    fn from(field: EntityField) -> Self {
        Term::Field(field)
    }
}

impl From<Expression> for Term {
    fn from(expression: Expression) -> Self {
        Term::Expression(expression)
    }
}

/// Logical/relational expression node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expression {
    pub kind: ExpressionKind,
    #[serde(default)]
    pub terms: Vec<Term>,
    #[serde(default)]
    pub negated: bool,
}

impl Expression {
    pub fn new(kind: ExpressionKind, terms: Vec<Term>) -> Self {
        Self {
            kind,
            terms,
            negated: false,
        }
    }

    pub fn and(expressions: impl IntoIterator<Item = Expression>) -> Self {
        Self::new(
            ExpressionKind::And,
            expressions.into_iter().map(Term::Expression).collect(),
        )
    }

    pub fn or(expressions: impl IntoIterator<Item = Expression>) -> Self {
        Self::new(
            ExpressionKind::Or,
            expressions.into_iter().map(Term::Expression).collect(),
        )
    }

    /// Binary comparison `field <kind> value`
    pub fn compare(kind: ExpressionKind, field: EntityField, value: impl Into<Value>) -> Self {
        Self::new(kind, vec![Term::Field(field), Term::Literal(value.into())])
    }

    pub fn equal_to(field: EntityField, value: impl Into<Value>) -> Self {
        Self::compare(ExpressionKind::EqualTo, field, value)
    }

    pub fn like(field: EntityField, pattern: impl Into<String>) -> Self {
        Self::compare(ExpressionKind::Like, field, Value::String(pattern.into()))
    }

    pub fn between(field: EntityField, low: impl Into<Value>, high: impl Into<Value>) -> Self {
        Self::new(
            ExpressionKind::Between,
            vec![
                Term::Field(field),
                Term::Literal(low.into()),
                Term::Literal(high.into()),
            ],
        )
    }

    pub fn in_list<T: Into<Value>>(field: EntityField, values: Vec<T>) -> Self {
        Self::new(
            ExpressionKind::In,
            vec![Term::Field(field), Term::Literal(Value::from(values))],
        )
    }

    pub fn is_null(field: EntityField) -> Self {
        Self::new(ExpressionKind::IsNull, vec![Term::Field(field)])
    }

    /// Flip the negation flag
    pub fn negate(mut self) -> Self {
        self.negated = !self.negated;
        self
    }

    /// Immediate terms matching `predicate`, in order, stopping after `count` matches.
    pub fn search_terms<F>(&self, predicate: F, count: Option<usize>) -> Vec<&Term>
    where
        F: Fn(&Term) -> bool,
    {
        self.terms
            .iter()
            .filter(|term| predicate(term))
            .take(count.unwrap_or(usize::MAX))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post_id() -> EntityField {
        EntityField::new("posts", "id")
    }

    #[test]
    fn test_eq_builder() {
        let expr = Expression::equal_to(post_id(), 5);

        assert_eq!(expr.kind, ExpressionKind::EqualTo);
        assert!(!expr.negated);
        assert_eq!(expr.terms.len(), 2);
        assert!(expr.terms[0].references(&post_id()));
        assert_eq!(expr.terms[1].as_literal(), Some(&Value::Int(5)));
    }

    #[test]
    fn test_between_preserves_bound_order() {
        let expr = Expression::between(post_id(), 9, 5);
        assert_eq!(expr.terms[1].as_literal(), Some(&Value::Int(9)));
        assert_eq!(expr.terms[2].as_literal(), Some(&Value::Int(5)));
    }

    #[test]
    fn test_negate_toggles() {
        let expr = Expression::equal_to(post_id(), 1).negate();
        assert!(expr.negated);
        assert!(!expr.negate().negated);
    }

    #[test]
    fn test_search_terms_with_count() {
        let expr = Expression::new(
            ExpressionKind::EqualTo,
            vec![
                Term::literal(1),
                Term::Field(post_id()),
                Term::literal(2),
                Term::literal(3),
            ],
        );

        let literals = expr.search_terms(|t| matches!(t, Term::Literal(_)), None);
        assert_eq!(literals.len(), 3);

        let first_two = expr.search_terms(|t| matches!(t, Term::Literal(_)), Some(2));
        assert_eq!(first_two, vec![&Term::literal(1), &Term::literal(2)]);

        let fields = expr.search_terms(|t| t.references(&post_id()), Some(1));
        assert_eq!(fields.len(), 1);
    }

    #[test]
    fn test_entity_field_display() {
        assert_eq!(post_id().to_string(), "posts.id");
        assert_eq!(EntityField::bare("title").to_string(), "title");
    }

    #[test]
    fn test_expression_from_json() {
        let json = r#"{
            "kind": "or",
            "terms": [
                {"expression": {"kind": "equal_to", "terms": [
                    {"field": {"entity": "posts", "field": "id"}},
                    {"literal": 5}
                ]}},
                {"expression": {"kind": "in", "negated": true, "terms": [
                    {"field": {"field": "status"}},
                    {"literal": ["draft", "trash"]}
                ]}}
            ]
        }"#;

        let expr: Expression = serde_json::from_str(json).unwrap();
        assert_eq!(
            expr,
            Expression::or([
                Expression::equal_to(post_id(), 5),
                Expression::in_list(EntityField::bare("status"), vec!["draft", "trash"]).negate(),
            ])
        );
    }
}

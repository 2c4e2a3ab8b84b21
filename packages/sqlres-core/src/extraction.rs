//! Identifier extraction
//!
//! Resolves a condition that claims to select rows by their identifying
//! field into the concrete identifier list it describes. Stores that only
//! support identifier-based mutation use this to turn "update/delete where"
//! into "update/delete these ids".
//!
//! Supported shapes:
//!
//! | kind       | result                                                        |
//! |------------|---------------------------------------------------------------|
//! | `Or`       | deduplicated union of every branch, first-occurrence order    |
//! | `EqualTo`  | literal values; empty when the identifying field is absent    |
//! | `Between`  | `range(a, b)` in the order given, at most `MAX_RANGE_LEN` ids |
//! | `In`       | the list literal                                              |
//!
//! Negated expressions and every other kind are rejected.

use indexmap::IndexSet;
use tracing::trace;

use crate::error::{ResourceError, Result};
use crate::expression::{EntityField, Expression, ExpressionKind, Term};

/// Largest identifier list a single BETWEEN may expand to
pub const MAX_RANGE_LEN: u64 = 1_000_000;

/// Extracts identifier values from a condition
pub trait ExpressionExtractor: Send + Sync {
    fn extract(&self, expression: &Expression) -> Result<Vec<i64>>;
}

/// Extractor anchored on one identifying field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierExtractor {
    identifier: EntityField,
}

impl IdentifierExtractor {
    pub fn new(identifier: EntityField) -> Self {
        Self { identifier }
    }

    pub fn identifier(&self) -> &EntityField {
        &self.identifier
    }

    fn extract_or(&self, expression: &Expression) -> Result<Vec<i64>> {
        let mut ids = IndexSet::new();

        for term in &expression.terms {
            let Term::Expression(branch) = term else {
                return Err(ResourceError::invalid_argument(
                    "Term of an OR expression is not an expression",
                ));
            };
            ids.extend(self.extract(branch)?);
        }

        Ok(ids.into_iter().collect())
    }

    fn extract_equal_to(&self, expression: &Expression) -> Result<Vec<i64>> {
        let (anchored, literals) = self.split_terms(expression)?;

        // Absence of the identifying field is not an error here
        if !anchored {
            return Ok(Vec::new());
        }
        Ok(literals)
    }

    fn extract_between(&self, expression: &Expression) -> Result<Vec<i64>> {
        let (anchored, bounds) = self.split_terms(expression)?;

        match (anchored, bounds.as_slice()) {
            (true, &[from, to]) => inclusive_range(from, to),
            _ => Err(ResourceError::invalid_argument(format!(
                "BETWEEN expression is not a valid expression for '{}'",
                self.identifier
            ))),
        }
    }

    fn extract_in(&self, expression: &Expression) -> Result<Vec<i64>> {
        let mut anchored = false;
        let mut ids = Vec::new();

        for term in &expression.terms {
            match term {
                Term::Field(_) if term.references(&self.identifier) => anchored = true,
                Term::Literal(value) => {
                    ids = value
                        .normalize_list()?
                        .iter()
                        .map(|item| item.normalize_int())
                        .collect::<Result<Vec<_>>>()?;
                }
                _ => {}
            }
        }

        if !anchored {
            return Err(ResourceError::invalid_argument(format!(
                "IN expression is not a valid expression for '{}'",
                self.identifier
            )));
        }
        Ok(ids)
    }

    /// Whether the identifying field is referenced, plus every literal normalized to an integer.
    /// Literals are only normalized when the identifying field is present.
    fn split_terms(&self, expression: &Expression) -> Result<(bool, Vec<i64>)> {
        let anchored = !expression
            .search_terms(|t| t.references(&self.identifier), Some(1))
            .is_empty();
        if !anchored {
            return Ok((false, Vec::new()));
        }

        let values = expression
            .terms
            .iter()
            .filter_map(Term::as_literal)
            .map(|value| value.normalize_int())
            .collect::<Result<Vec<_>>>()?;

        Ok((true, values))
    }
}

impl ExpressionExtractor for IdentifierExtractor {
    fn extract(&self, expression: &Expression) -> Result<Vec<i64>> {
        if expression.negated {
            return Err(ResourceError::unsupported_expression(
                "Negated expressions are not supported for identifier extraction",
            ));
        }

        trace!(kind = %expression.kind, identifier = %self.identifier, "extracting identifiers");

        match expression.kind {
            ExpressionKind::Or => self.extract_or(expression),
            ExpressionKind::EqualTo => self.extract_equal_to(expression),
            ExpressionKind::Between => self.extract_between(expression),
            ExpressionKind::In => self.extract_in(expression),
            other => Err(ResourceError::unsupported_expression(format!(
                "Expression type '{}' is not supported for identifier extraction",
                other
            ))),
        }
    }
}

/// Inclusive integer range walking from `from` to `to`, descending when `from > to`.
/// Spans longer than `MAX_RANGE_LEN` are rejected before anything is allocated.
fn inclusive_range(from: i64, to: i64) -> Result<Vec<i64>> {
    let len = (i128::from(to) - i128::from(from)).unsigned_abs() + 1;
    if len > u128::from(MAX_RANGE_LEN) {
        return Err(ResourceError::invalid_argument(format!(
            "BETWEEN range too large: {} to {} spans {} identifiers (max {})",
            from, to, len, MAX_RANGE_LEN
        )));
    }

    if from <= to {
        Ok((from..=to).collect())
    } else {
        Ok((to..=from).rev().collect())
    }
}

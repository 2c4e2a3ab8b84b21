//! SQLite SQL renderer
//!
//! Emits standard SQL with double-quoted identifiers. Every bound literal is
//! replaced by the placeholder the `ValueHashMap` holds for it, so the text
//! and `ValueHashMap::args()` always travel together.
//!
//! Literal resolution order:
//! 1. `Null` → `NULL`
//! 2. a string naming a mapped field → that field's column
//! 3. the map's placeholder for the value
//!
//! Anything left over was never bound and is rejected.

use sqlres_core::{EntityField, Expression, ExpressionKind, ResourceError, Result, Term, Value};

use crate::domain::models::{
    DeleteStatement, InsertStatement, Join, OrderBy, SelectStatement, TableRef, UpdateStatement,
};
use crate::domain::ports::{RenderContext, SqlRenderer};

#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteRenderer;

impl SqliteRenderer {
    pub fn new() -> Self {
        Self
    }

    fn expression(&self, expr: &Expression, ctx: &RenderContext<'_>) -> Result<String> {
        let body = match expr.kind {
            ExpressionKind::And | ExpressionKind::Or => self.logical(expr, ctx)?,
            ExpressionKind::EqualTo | ExpressionKind::NotEqualTo => self.equality(expr, ctx)?,
            ExpressionKind::LessThan
            | ExpressionKind::LessThanOrEqualTo
            | ExpressionKind::GreaterThan
            | ExpressionKind::GreaterThanOrEqualTo
            | ExpressionKind::Like => {
                let [left, right] = operands::<2>(expr)?;
                format!(
                    "{} {} {}",
                    self.term(left, ctx)?,
                    comparison_operator(expr.kind),
                    self.term(right, ctx)?
                )
            }
            ExpressionKind::Between => {
                let [subject, low, high] = operands::<3>(expr)?;
                format!(
                    "{} BETWEEN {} AND {}",
                    self.term(subject, ctx)?,
                    self.term(low, ctx)?,
                    self.term(high, ctx)?
                )
            }
            ExpressionKind::In => {
                let [subject, list] = operands::<2>(expr)?;
                match list {
                    Term::Literal(Value::List(items)) if items.is_empty() => "1 = 0".to_string(),
                    _ => format!("{} IN {}", self.term(subject, ctx)?, self.term(list, ctx)?),
                }
            }
            ExpressionKind::IsNull => {
                let [subject] = operands::<1>(expr)?;
                format!("{} IS NULL", self.term(subject, ctx)?)
            }
        };

        if expr.negated {
            Ok(format!("NOT ({})", body))
        } else {
            Ok(body)
        }
    }

    fn logical(&self, expr: &Expression, ctx: &RenderContext<'_>) -> Result<String> {
        let (joiner, empty) = match expr.kind {
            ExpressionKind::And => (" AND ", "1 = 1"),
            _ => (" OR ", "1 = 0"),
        };
        if expr.terms.is_empty() {
            return Ok(empty.to_string());
        }

        let parts = expr
            .terms
            .iter()
            .map(|term| self.term(term, ctx))
            .collect::<Result<Vec<_>>>()?;
        Ok(parts.join(joiner))
    }

    /// `= NULL` never matches in SQL; rewrite to `IS [NOT] NULL`
    fn equality(&self, expr: &Expression, ctx: &RenderContext<'_>) -> Result<String> {
        let [left, right] = operands::<2>(expr)?;
        let is_equal = expr.kind == ExpressionKind::EqualTo;

        let null_side = match (left, right) {
            (_, Term::Literal(Value::Null)) => Some(left),
            (Term::Literal(Value::Null), _) => Some(right),
            _ => None,
        };
        if let Some(subject) = null_side {
            let op = if is_equal { "IS NULL" } else { "IS NOT NULL" };
            return Ok(format!("{} {}", self.term(subject, ctx)?, op));
        }

        Ok(format!(
            "{} {} {}",
            self.term(left, ctx)?,
            if is_equal { "=" } else { "<>" },
            self.term(right, ctx)?
        ))
    }

    fn term(&self, term: &Term, ctx: &RenderContext<'_>) -> Result<String> {
        match term {
            Term::Field(field) => Ok(self.field(field, ctx)),
            Term::Literal(Value::List(items)) => {
                let rendered = items
                    .iter()
                    .map(|item| self.literal(item, ctx))
                    .collect::<Result<Vec<_>>>()?;
                Ok(format!("({})", rendered.join(", ")))
            }
            Term::Literal(value) => self.literal(value, ctx),
            Term::Expression(nested) => Ok(format!("({})", self.expression(nested, ctx)?)),
        }
    }

    /// Field names resolve through the field map; unmapped names (e.g. columns of
    /// joined tables) are used as the column name directly.
    fn field(&self, field: &EntityField, ctx: &RenderContext<'_>) -> String {
        let column = ctx.fields.column(&field.field).unwrap_or(field.field.as_str());
        match &field.entity {
            Some(entity) if !column.contains('.') => {
                format!("{}.{}", quote_identifier(entity), quote_identifier(column))
            }
            _ => quote_identifier(column),
        }
    }

    fn literal(&self, value: &Value, ctx: &RenderContext<'_>) -> Result<String> {
        if value.is_null() {
            return Ok("NULL".to_string());
        }
        if let Value::String(name) = value {
            if let Some(column) = ctx.fields.column(name) {
                return Ok(quote_identifier(column));
            }
        }
        self.bound(value, ctx)
    }

    /// Placeholder for a value that must have been bound
    fn bound(&self, value: &Value, ctx: &RenderContext<'_>) -> Result<String> {
        if value.is_null() {
            return Ok("NULL".to_string());
        }
        ctx.values
            .placeholder_for(value)
            .map(str::to_string)
            .ok_or_else(|| {
                ResourceError::invalid_argument(format!("Value {} has no bound placeholder", value))
            })
    }

    fn where_clause(
        &self,
        condition: Option<&Expression>,
        ctx: &RenderContext<'_>,
    ) -> Result<String> {
        match condition {
            Some(expr) => Ok(format!(" WHERE {}", self.expression(expr, ctx)?)),
            None => Ok(String::new()),
        }
    }

    fn order_by(&self, ordering: &[OrderBy], ctx: &RenderContext<'_>) -> Result<String> {
        if ordering.is_empty() {
            return Ok(String::new());
        }

        let parts = ordering
            .iter()
            .map(|order| {
                let column = ctx.fields.column(&order.field).ok_or_else(|| {
                    ResourceError::invalid_argument(format!(
                        "Unknown ordering field '{}'",
                        order.field
                    ))
                })?;
                Ok(format!(
                    "{} {}",
                    quote_identifier(column),
                    order.direction.as_sql()
                ))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(format!(" ORDER BY {}", parts.join(", ")))
    }

    /// The range scopes in an UPDATE/DELETE narrow the target rows through a
    /// rowid subquery, since SQLite only accepts them there when built with
    /// SQLITE_ENABLE_UPDATE_DELETE_LIMIT.
    fn scoped_where(
        &self,
        table: &str,
        condition: Option<&Expression>,
        ordering: &[OrderBy],
        limit: Option<u64>,
        offset: Option<u64>,
        ctx: &RenderContext<'_>,
    ) -> Result<String> {
        let where_clause = self.where_clause(condition, ctx)?;
        if ordering.is_empty() && limit.is_none() && offset.is_none() {
            return Ok(where_clause);
        }

        Ok(format!(
            " WHERE rowid IN (SELECT rowid FROM {}{}{}{})",
            quote_identifier(table),
            where_clause,
            self.order_by(ordering, ctx)?,
            limit_offset(limit, offset)
        ))
    }

    fn table(&self, table: &TableRef) -> String {
        match &table.alias {
            Some(alias) => format!(
                "{} AS {}",
                quote_identifier(&table.name),
                quote_identifier(alias)
            ),
            None => quote_identifier(&table.name),
        }
    }

    fn join(&self, join: &Join, ctx: &RenderContext<'_>) -> Result<String> {
        Ok(format!(
            " {} {} ON {}",
            join.kind.as_sql(),
            self.table(&join.table),
            self.expression(&join.on, ctx)?
        ))
    }
}

impl SqlRenderer for SqliteRenderer {
    fn render_condition(&self, condition: &Expression, ctx: &RenderContext<'_>) -> Result<String> {
        self.expression(condition, ctx)
    }

    fn render_select(
        &self,
        statement: &SelectStatement<'_>,
        ctx: &RenderContext<'_>,
    ) -> Result<String> {
        if statement.tables.is_empty() {
            return Err(ResourceError::invalid_argument(
                "SELECT requires at least one table",
            ));
        }

        let columns = if statement.fields.is_empty() {
            "*".to_string()
        } else {
            statement
                .fields
                .iter()
                .map(|(field, column)| {
                    format!("{} AS {}", quote_identifier(column), quote_identifier(field))
                })
                .collect::<Vec<_>>()
                .join(", ")
        };

        let tables = statement
            .tables
            .iter()
            .map(|table| self.table(table))
            .collect::<Vec<_>>()
            .join(", ");

        let mut sql = format!("SELECT {} FROM {}", columns, tables);
        for join in statement.joins {
            sql.push_str(&self.join(join, ctx)?);
        }
        sql.push_str(&self.where_clause(statement.condition, ctx)?);
        sql.push_str(&self.order_by(statement.ordering, ctx)?);
        sql.push_str(&limit_offset(statement.limit, statement.offset));
        Ok(sql)
    }

    fn render_insert(
        &self,
        statement: &InsertStatement<'_>,
        ctx: &RenderContext<'_>,
    ) -> Result<String> {
        let table = quote_identifier(statement.table);
        match (statement.columns.is_empty(), statement.rows.len()) {
            (_, 0) => Err(ResourceError::invalid_argument("INSERT requires at least one row")),
            (true, 1) => Ok(format!("INSERT INTO {} DEFAULT VALUES", table)),
            (true, _) => Err(ResourceError::invalid_argument(
                "Multi-row INSERT requires at least one column",
            )),
            (false, _) => {
                let columns = statement
                    .columns
                    .iter()
                    .map(|column| quote_identifier(column))
                    .collect::<Vec<_>>()
                    .join(", ");

                let rows = statement
                    .rows
                    .iter()
                    .map(|row| {
                        let values = statement
                            .columns
                            .iter()
                            .map(|column| match row.get(column) {
                                Some(value) => self.bound(value, ctx),
                                None => Ok("NULL".to_string()),
                            })
                            .collect::<Result<Vec<_>>>()?;
                        Ok(format!("({})", values.join(", ")))
                    })
                    .collect::<Result<Vec<_>>>()?;

                Ok(format!(
                    "INSERT INTO {} ({}) VALUES {}",
                    table,
                    columns,
                    rows.join(", ")
                ))
            }
        }
    }

    fn render_update(
        &self,
        statement: &UpdateStatement<'_>,
        ctx: &RenderContext<'_>,
    ) -> Result<String> {
        if statement.changes.is_empty() {
            return Err(ResourceError::invalid_argument(
                "UPDATE requires at least one column",
            ));
        }

        let assignments = statement
            .changes
            .iter()
            .map(|(column, value)| {
                Ok(format!(
                    "{} = {}",
                    quote_identifier(column),
                    self.bound(value, ctx)?
                ))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(format!(
            "UPDATE {} SET {}{}",
            quote_identifier(statement.table),
            assignments.join(", "),
            self.scoped_where(
                statement.table,
                statement.condition,
                statement.ordering,
                statement.limit,
                None,
                ctx
            )?
        ))
    }

    fn render_delete(
        &self,
        statement: &DeleteStatement<'_>,
        ctx: &RenderContext<'_>,
    ) -> Result<String> {
        Ok(format!(
            "DELETE FROM {}{}",
            quote_identifier(statement.table),
            self.scoped_where(
                statement.table,
                statement.condition,
                statement.ordering,
                statement.limit,
                statement.offset,
                ctx
            )?
        ))
    }
}

/// `name` → `"name"`, `posts.title` → `"posts"."title"`
pub fn quote_identifier(name: &str) -> String {
    name.split('.')
        .map(|part| format!("\"{}\"", part.replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(".")
}

fn comparison_operator(kind: ExpressionKind) -> &'static str {
    match kind {
        ExpressionKind::LessThan => "<",
        ExpressionKind::LessThanOrEqualTo => "<=",
        ExpressionKind::GreaterThan => ">",
        ExpressionKind::GreaterThanOrEqualTo => ">=",
        ExpressionKind::Like => "LIKE",
        ExpressionKind::NotEqualTo => "<>",
        _ => "=",
    }
}

fn operands<const N: usize>(expr: &Expression) -> Result<[&Term; N]> {
    let terms: Vec<&Term> = expr.terms.iter().collect();
    terms.try_into().map_err(|terms: Vec<&Term>| {
        ResourceError::invalid_argument(format!(
            "{} expects {} operand(s), got {}",
            expr.kind,
            N,
            terms.len()
        ))
    })
}

// SQLite needs a LIMIT before OFFSET; -1 means unbounded
fn limit_offset(limit: Option<u64>, offset: Option<u64>) -> String {
    match (limit, offset) {
        (None, None) => String::new(),
        (Some(limit), None) => format!(" LIMIT {}", limit),
        (None, Some(offset)) => format!(" LIMIT -1 OFFSET {}", offset),
        (Some(limit), Some(offset)) => format!(" LIMIT {} OFFSET {}", limit, offset),
    }
}

//! Select orchestrator

use std::sync::Arc;
use sqlres_core::{Expression, FieldColumnMap, ParameterBinder, PlaceholderStyle, Result, ValueHashMap};
use tracing::{debug, trace};

use crate::domain::models::{Join, OrderBy, Row, SelectStatement, TableRef};
use crate::domain::ports::{QueryExecutor, RenderContext, SqlRenderer};

pub struct SelectResourceModel {
    renderer: Arc<dyn SqlRenderer>,
    executor: Arc<dyn QueryExecutor>,
    tables: Vec<TableRef>,
    joins: Vec<Join>,
    fields: FieldColumnMap,
    binder: ParameterBinder,
}

impl SelectResourceModel {
    pub fn new(
        renderer: Arc<dyn SqlRenderer>,
        executor: Arc<dyn QueryExecutor>,
        table: TableRef,
        fields: FieldColumnMap,
        style: PlaceholderStyle,
    ) -> Self {
        // Strings that name a field are column references, never values
        let binder = ParameterBinder::with_style(style).ignoring(fields.fields());
        Self {
            renderer,
            executor,
            tables: vec![table],
            joins: Vec::new(),
            fields,
            binder,
        }
    }

    /// Additional table in the FROM list
    pub fn with_table(mut self, table: TableRef) -> Self {
        self.tables.push(table);
        self
    }

    pub fn with_join(mut self, join: Join) -> Self {
        self.joins.push(join);
        self
    }

    pub fn fields(&self) -> &FieldColumnMap {
        &self.fields
    }

    /// Rows whose columns are aliased to the consumer field names
    pub fn select(
        &self,
        condition: Option<&Expression>,
        ordering: &[OrderBy],
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> Result<Vec<Row>> {
        // Join conditions precede WHERE in the statement text
        let mut values = ValueHashMap::new();
        for join in &self.joins {
            self.binder.bind_into(&mut values, &join.on)?;
        }
        if let Some(condition) = condition {
            self.binder.bind_into(&mut values, condition)?;
        }

        let statement = SelectStatement {
            fields: &self.fields,
            tables: &self.tables,
            joins: &self.joins,
            condition,
            ordering,
            limit,
            offset,
        };
        let sql = self
            .renderer
            .render_select(&statement, &RenderContext::new(&values, &self.fields))?;

        debug!(table = %self.tables[0].name, args = values.len(), "select");
        trace!(%sql);

        self.executor.query(&sql, &values.args())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::JoinKind;
    use crate::infrastructure::{CallKind, RecordingExecutor, SqliteRenderer};
    use pretty_assertions::assert_eq;
    use sqlres_core::{EntityField, ExpressionKind, Term, Value};

    fn model(executor: Arc<RecordingExecutor>) -> SelectResourceModel {
        SelectResourceModel::new(
            Arc::new(SqliteRenderer),
            executor,
            TableRef::new("posts"),
            FieldColumnMap::from_pairs([("id", "ID"), ("status", "post_status")]).unwrap(),
            PlaceholderStyle::Numbered,
        )
    }

    #[test]
    fn test_select_passes_args_in_placeholder_order() {
        let executor = Arc::new(RecordingExecutor::new());
        let condition = Expression::and([
            Expression::equal_to(EntityField::bare("status"), "publish"),
            Expression::in_list(EntityField::bare("id"), vec![4, 2]),
        ]);

        model(executor.clone())
            .select(Some(&condition), &[OrderBy::asc("id")], Some(5), None)
            .unwrap();

        let call = executor.last_call().unwrap();
        assert_eq!(call.kind, CallKind::Query);
        assert_eq!(
            call.sql,
            concat!(
                r#"SELECT "ID" AS "id", "post_status" AS "status" FROM "posts" "#,
                r#"WHERE ("post_status" = %1$s) AND ("ID" IN (%2$d, %3$d)) ORDER BY "ID" ASC LIMIT 5"#
            )
        );
        assert_eq!(
            call.args,
            vec![Value::from("publish"), Value::Int(4), Value::Int(2)]
        );
    }

    #[test]
    fn test_select_without_condition() {
        let executor = Arc::new(RecordingExecutor::new());
        model(executor.clone()).select(None, &[], None, None).unwrap();

        let call = executor.last_call().unwrap();
        assert_eq!(call.sql, r#"SELECT "ID" AS "id", "post_status" AS "status" FROM "posts""#);
        assert!(call.args.is_empty());
    }

    #[test]
    fn test_join_literals_bind_before_where() {
        let executor = Arc::new(RecordingExecutor::new());
        let join = Join {
            kind: JoinKind::Inner,
            table: TableRef::aliased("postmeta", "m"),
            on: Expression::and([
                Expression::new(
                    ExpressionKind::EqualTo,
                    vec![Term::field("m", "post_id"), Term::field("posts", "ID")],
                ),
                Expression::equal_to(EntityField::new("m", "meta_key"), "color"),
            ]),
        };
        let condition = Expression::equal_to(EntityField::new("m", "meta_value"), "red");

        model(executor.clone())
            .with_join(join)
            .select(Some(&condition), &[], None, None)
            .unwrap();

        let call = executor.last_call().unwrap();
        assert!(call.sql.contains(r#"INNER JOIN "postmeta" AS "m" ON"#));
        assert!(call.sql.ends_with(r#"WHERE "m"."meta_value" = %2$s"#));
        assert_eq!(call.args, vec![Value::from("color"), Value::from("red")]);
    }

    #[test]
    fn test_executor_failure_propagates() {
        let executor = Arc::new(RecordingExecutor::new());
        executor.push_query_failure("connection lost");

        let err = model(executor).select(None, &[], None, None).unwrap_err();
        assert_eq!(err.message, "connection lost");
    }
}

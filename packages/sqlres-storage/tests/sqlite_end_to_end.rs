//! End-to-end resource model tests against in-memory SQLite
//!
//! Every scenario runs under both placeholder styles: the rendered text and
//! the argument array must stay aligned either way.

#![cfg(feature = "sqlite")]

use pretty_assertions::assert_eq;
use sqlres_core::{EntityField, ErrorKind, Expression, ExpressionKind, PlaceholderStyle, Record, Value};
use sqlres_storage::{
    DeleteMode, InsertMode, OrderBy, ResourceConfig, ResourceModel, Row, SqliteExecutor,
    SqliteRenderer, UpdateMode,
};
use std::sync::Arc;

const STYLES: [PlaceholderStyle; 2] = [PlaceholderStyle::Numbered, PlaceholderStyle::ContentHash];

fn setup(style: PlaceholderStyle) -> (ResourceModel, Arc<SqliteExecutor>) {
    let executor = Arc::new(SqliteExecutor::in_memory().unwrap());
    executor
        .execute_batch(
            "CREATE TABLE wp_posts (
                ID INTEGER PRIMARY KEY,
                post_title TEXT,
                post_status TEXT NOT NULL DEFAULT 'draft',
                rating REAL
            );",
        )
        .unwrap();

    let yaml = format!(
        r#"
version: 1
table: wp_posts
fields:
  id: ID
  title: post_title
  status: post_status
  rating: rating
identifier:
  field: id
placeholders: {}
insert_mode: per_record
update_mode: by_identifier
delete_mode: direct
"#,
        style
    );
    let config = ResourceConfig::from_yaml_str(&yaml).unwrap();
    let model = ResourceModel::from_config(&config, Arc::new(SqliteRenderer), executor.clone())
        .unwrap();
    (model, executor)
}

fn field(name: &str) -> EntityField {
    EntityField::bare(name)
}

fn titles(rows: &[Row]) -> Vec<Value> {
    rows.iter().map(|row| row["title"].clone()).collect()
}

fn seed(model: &ResourceModel) -> Vec<Option<i64>> {
    let records = vec![
        Record::new().with("title", "First").with("status", "publish").with("rating", 4.5),
        Record::new().with("title", "Second").with("status", "draft"),
        Record::new().with("title", "Third").with("status", "publish").with("rating", 2.0),
        Record::new().with("title", "Fourth"),
    ];
    model.insert(&records).unwrap().ids
}

// ═══════════════════════════════════════════════════════════════════════════
// Insert / Select
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_insert_returns_ids_in_input_order() {
    for style in STYLES {
        let (model, _) = setup(style);
        assert_eq!(seed(&model), vec![Some(1), Some(2), Some(3), Some(4)]);
    }
}

#[test]
fn test_select_with_condition_and_ordering() {
    for style in STYLES {
        let (model, _) = setup(style);
        seed(&model);

        let condition = Expression::and([
            Expression::equal_to(field("status"), "publish"),
            Expression::compare(ExpressionKind::GreaterThan, field("rating"), 1.5),
        ]);
        let rows = model
            .select(Some(&condition), &[OrderBy::desc("rating")], None, None)
            .unwrap();

        assert_eq!(titles(&rows), vec![Value::from("First"), Value::from("Third")]);
        assert_eq!(rows[0]["id"], Value::Int(1));
        assert_eq!(rows[0]["rating"], Value::Float(4.5));
    }
}

#[test]
fn test_select_repeated_values_share_placeholder() {
    for style in STYLES {
        let (model, _) = setup(style);
        seed(&model);

        // 2 appears as an IN member and as a BETWEEN bound
        let condition = Expression::or([
            Expression::in_list(field("id"), vec![2, 4]),
            Expression::between(field("id"), 1, 2),
        ]);
        let rows = model
            .select(Some(&condition), &[OrderBy::asc("id")], None, None)
            .unwrap();

        assert_eq!(
            titles(&rows),
            vec![
                Value::from("First"),
                Value::from("Second"),
                Value::from("Fourth")
            ]
        );
    }
}

#[test]
fn test_select_limit_offset() {
    for style in STYLES {
        let (model, _) = setup(style);
        seed(&model);

        let rows = model
            .select(None, &[OrderBy::asc("id")], Some(2), Some(1))
            .unwrap();
        assert_eq!(titles(&rows), vec![Value::from("Second"), Value::from("Third")]);
    }
}

#[test]
fn test_missing_fields_fall_back_to_column_defaults() {
    for style in STYLES {
        let (model, _) = setup(style);
        seed(&model);

        let rows = model
            .select(Some(&Expression::equal_to(field("id"), 4)), &[], None, None)
            .unwrap();
        assert_eq!(rows[0]["status"], Value::from("draft"));
        assert_eq!(rows[0]["rating"], Value::Null);
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Update / Delete
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_update_by_identifier() {
    for style in STYLES {
        let (model, _) = setup(style);
        seed(&model);

        let condition = Expression::or([
            Expression::equal_to(field("id"), 2),
            Expression::in_list(field("id"), vec![4]),
        ]);
        let affected = model
            .update(&Record::new().with("status", "trash"), Some(&condition), &[], None)
            .unwrap();
        assert_eq!(affected, 2);

        let trashed = model
            .select(
                Some(&Expression::equal_to(field("status"), "trash")),
                &[OrderBy::asc("id")],
                None,
                None,
            )
            .unwrap();
        assert_eq!(titles(&trashed), vec![Value::from("Second"), Value::from("Fourth")]);
    }
}

#[test]
fn test_update_with_unresolvable_condition_changes_nothing() {
    for style in STYLES {
        let (model, _) = setup(style);
        seed(&model);

        let err = model
            .update(
                &Record::new().with("status", "trash"),
                Some(&Expression::equal_to(field("status"), "draft")),
                &[],
                None,
            )
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidArgument);

        let trashed = model
            .select(Some(&Expression::equal_to(field("status"), "trash")), &[], None, None)
            .unwrap();
        assert!(trashed.is_empty());
    }
}

#[test]
fn test_direct_update_and_delete() {
    for style in STYLES {
        let executor = Arc::new(SqliteExecutor::in_memory().unwrap());
        executor
            .execute_batch("CREATE TABLE wp_posts (ID INTEGER PRIMARY KEY, post_title TEXT, post_status TEXT)")
            .unwrap();
        let config = ResourceConfig::new(
            "wp_posts",
            sqlres_core::FieldColumnMap::from_pairs([
                ("id", "ID"),
                ("title", "post_title"),
                ("status", "post_status"),
            ])
            .unwrap(),
        )
        .placeholders(style)
        .insert_mode(InsertMode::Batched)
        .update_mode(UpdateMode::Direct)
        .delete_mode(DeleteMode::Direct);
        let model =
            ResourceModel::from_config(&config, Arc::new(SqliteRenderer), executor.clone())
                .unwrap();

        let outcome = model
            .insert(&[
                Record::new().with("title", "a").with("status", "draft"),
                Record::new().with("title", "b").with("status", "draft"),
                Record::new().with("title", "c").with("status", "publish"),
            ])
            .unwrap();
        assert_eq!(outcome.affected_rows, 3);
        assert!(outcome.ids.is_empty());

        // The change-set value also appears in the condition
        let affected = model
            .update(
                &Record::new().with("status", "publish"),
                Some(&Expression::compare(
                    ExpressionKind::NotEqualTo,
                    field("status"),
                    "publish",
                )),
                &[OrderBy::asc("id")],
                Some(1),
            )
            .unwrap();
        assert_eq!(affected, 1);

        let deleted = model
            .delete(
                Some(&Expression::equal_to(field("status"), "publish")),
                &[],
                None,
                None,
            )
            .unwrap();
        assert_eq!(deleted, 2);

        let remaining = model.select(None, &[], None, None).unwrap();
        assert_eq!(titles(&remaining), vec![Value::from("b")]);
    }
}

#[test]
fn test_delete_requires_condition() {
    let (model, _) = setup(PlaceholderStyle::Numbered);
    seed(&model);

    let err = model.delete(None, &[], None, None).unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidArgument);
    assert_eq!(model.select(None, &[], None, None).unwrap().len(), 4);
}

#[test]
fn test_driver_errors_propagate_as_execution() {
    let executor = Arc::new(SqliteExecutor::in_memory().unwrap());
    let config = ResourceConfig::new(
        "missing_table",
        sqlres_core::FieldColumnMap::from_pairs([("id", "ID")]).unwrap(),
    );
    let model = ResourceModel::from_config(&config, Arc::new(SqliteRenderer), executor).unwrap();

    let err = model.select(None, &[], None, None).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Execution);
}

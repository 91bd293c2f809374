use super::*;
use crate::client::GenericClient;
use crate::config::BuilderConfig;
use crate::error::QueryResult;
use crate::matcher::{
    Dates, MatchMode, Sensitivity, StringOptions, by_date_column, by_int_column, by_string_column,
};
use crate::predicate::{Predicate, and, or};
use crate::sort::{SortDirection, sort, sort_with};
use crate::value::Value;
use chrono::{TimeZone, Utc};
use std::sync::Mutex;
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

fn int(col: &str, values: &[i64]) -> Predicate {
    by_int_column(col, values.iter().copied()).unwrap()
}

fn string(col: &str, value: &str) -> Predicate {
    by_string_column(col, [value], StringOptions::new()).unwrap()
}

/// Every `$n` in `sql`, in order of appearance.
fn placeholders(sql: &str) -> Vec<usize> {
    let mut out = Vec::new();
    let mut chars = sql.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '$' {
            continue;
        }
        let mut digits = String::new();
        while let Some(&d) = chars.peek() {
            if !d.is_ascii_digit() {
                break;
            }
            digits.push(d);
            chars.next();
        }
        if let Ok(n) = digits.parse() {
            out.push(n);
        }
    }
    out
}

fn assert_contiguous(compiled: &CompiledQuery) {
    let found = placeholders(compiled.sql());
    let expected: Vec<usize> = (1..=compiled.params().len()).collect();
    assert_eq!(found, expected, "placeholders in {}", compiled.sql());
}

// ==================== Base statement ====================

#[test]
fn test_no_conditions() {
    let qb = QueryBuilder::new("select * from accounts");
    assert_eq!(qb.commit().sql(), "select * from accounts;");
    assert!(qb.commit().params().is_empty());
}

#[test]
fn test_base_is_trimmed() {
    let qb = QueryBuilder::new("  select * from accounts ;  \n");
    assert_eq!(qb.to_sql(), "select * from accounts;");
}

// ==================== WHERE ====================

#[test]
fn test_single_condition() {
    let mut qb = QueryBuilder::new("select * from accounts");
    qb.and_where([int("id", &[1])]);
    let compiled = qb.commit();
    assert_eq!(compiled.sql(), "select * from accounts WHERE id = $1;");
    assert_eq!(compiled.params(), &[Value::Int(1)]);
}

#[test]
fn test_multiple_conditions_and_joined() {
    let mut qb = QueryBuilder::new("select * from accounts");
    qb.and_where([int("id", &[1]), string("name", "carlos")]);
    let compiled = qb.commit();
    assert_eq!(
        compiled.sql(),
        "select * from accounts WHERE id = $1 AND name = $2;"
    );
    assert_eq!(compiled.params(), &[Value::Int(1), Value::from("carlos")]);
}

#[test]
fn test_int_in_expansion() {
    let mut qb = QueryBuilder::new("select * from accounts");
    qb.and_where([int("id", &[1, 2, 3])]);
    let (sql, params) = qb.commit().into_parts();
    assert_eq!(sql, "select * from accounts WHERE id IN ($1, $2, $3);");
    assert_eq!(params, vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
}

#[test]
fn test_string_in_expansion_after_scalar() {
    let mut qb = QueryBuilder::new("select * from accounts");
    qb.and_where([
        int("id", &[9]),
        by_string_column("name", ["a", "b"], MatchMode::Contains).unwrap(),
    ]);
    let compiled = qb.commit();
    assert_eq!(
        compiled.sql(),
        "select * from accounts WHERE id = $1 AND name IN ($2, $3);"
    );
    assert_eq!(
        compiled.params(),
        &[Value::Int(9), Value::from("a"), Value::from("b")]
    );
}

#[test]
fn test_case_insensitive_exact() {
    let mut qb = QueryBuilder::new("select * from accounts");
    qb.and_where([by_string_column(
        "name",
        ["Carlos"],
        (MatchMode::Exact, Sensitivity::NonSensitive),
    )
    .unwrap()]);
    let compiled = qb.commit();
    assert_eq!(
        compiled.sql(),
        "select * from accounts WHERE LOWER(name) = LOWER($1);"
    );
    assert_eq!(compiled.params(), &[Value::from("Carlos")]);
}

#[test]
fn test_date_range() {
    let a = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let b = Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 59).unwrap();
    let mut qb = QueryBuilder::new("select * from events");
    qb.and_where([
        int("kind", &[2]),
        by_date_column("created_at", Dates::between(a, b)).unwrap(),
    ]);
    let compiled = qb.commit();
    assert_eq!(
        compiled.sql(),
        "select * from events WHERE kind = $1 AND created_at >= $2 AND created_at <= $3;"
    );
    assert_eq!(
        compiled.params(),
        &[Value::Int(2), Value::Timestamp(a), Value::Timestamp(b)]
    );
}

#[test]
fn test_date_exact_day() {
    let d = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
    let mut qb = QueryBuilder::new("select * from events");
    qb.and_where_one(by_date_column("created_at", Dates::on(d)).unwrap());
    assert_eq!(
        qb.to_sql(),
        "select * from events WHERE DATE_TRUNC('day', created_at) = DATE_TRUNC('day', $1::timestamp);"
    );
}

#[test]
fn test_empty_predicates_are_dropped() {
    let mut qb = QueryBuilder::new("select * from accounts");
    qb.and_where([
        by_int_column("id", []).unwrap(),
        by_string_column("name", Vec::<String>::new(), StringOptions::new()).unwrap(),
        by_date_column("created_at", Dates::default()).unwrap(),
    ]);
    assert!(!qb.has_conditions());
    assert_eq!(qb.param_count(), 0);
    assert_eq!(qb.to_sql(), "select * from accounts;");
}

#[test]
fn test_empty_predicate_between_real_ones() {
    let mut qb = QueryBuilder::new("select * from accounts");
    qb.and_where([int("id", &[1]), by_int_column("role", []).unwrap(), string("name", "x")]);
    let compiled = qb.commit();
    assert_eq!(
        compiled.sql(),
        "select * from accounts WHERE id = $1 AND name = $2;"
    );
    assert_contiguous(&compiled);
}

// ==================== Groups ====================

#[test]
fn test_or_group() {
    let mut qb = QueryBuilder::new("select * from accounts");
    qb.and_where([or([int("id", &[1]), string("name", "john")])]);
    assert_eq!(
        qb.to_sql(),
        "select * from accounts WHERE (id = $1 OR name = $2);"
    );
}

#[test]
fn test_nested_conditions() {
    let mut qb = QueryBuilder::new("select * from accounts");
    qb.and_where([
        int("id", &[1]),
        or([int("id", &[2]), string("name", "x")]),
    ]);
    let compiled = qb.commit();
    assert_eq!(
        compiled.sql(),
        "select * from accounts WHERE id = $1 AND (id = $2 OR name = $3);"
    );
    assert_eq!(
        compiled.params(),
        &[Value::Int(1), Value::Int(2), Value::from("x")]
    );
}

#[test]
fn test_deeply_nested_groups_number_depth_first() {
    let mut qb = QueryBuilder::new("select * from t");
    qb.and_where([or([
        and([int("a", &[1]), int("b", &[2, 3])]),
        and([string("c", "x"), or([int("d", &[4]), int("e", &[5])])]),
    ])]);
    let compiled = qb.commit();
    assert_eq!(
        compiled.sql(),
        "select * from t WHERE ((a = $1 AND b IN ($2, $3)) OR (c = $4 AND (d = $5 OR e = $6)));"
    );
    assert_eq!(
        compiled.params(),
        &[
            Value::Int(1),
            Value::Int(2),
            Value::Int(3),
            Value::from("x"),
            Value::Int(4),
            Value::Int(5),
        ]
    );
}

#[test]
fn test_group_with_empty_children_skips_them() {
    let mut qb = QueryBuilder::new("select * from t");
    qb.and_where([or([by_int_column("a", []).unwrap(), int("b", &[1])])]);
    assert_eq!(qb.to_sql(), "select * from t WHERE (b = $1);");
}

#[test]
fn test_group_of_only_empties_is_dropped() {
    let mut qb = QueryBuilder::new("select * from t");
    qb.and_where([
        int("a", &[1]),
        or([by_int_column("b", []).unwrap(), and([])]),
        int("c", &[2]),
    ]);
    assert_eq!(qb.to_sql(), "select * from t WHERE a = $1 AND c = $2;");
}

#[test]
fn test_date_range_inside_group() {
    let a = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let b = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
    let mut qb = QueryBuilder::new("select * from events");
    qb.and_where([or([
        int("id", &[7]),
        by_date_column("created_at", Dates::between(a, b)).unwrap(),
    ])]);
    let compiled = qb.commit();
    assert_eq!(
        compiled.sql(),
        "select * from events WHERE (id = $1 OR created_at >= $2 AND created_at <= $3);"
    );
    assert_contiguous(&compiled);
}

// ==================== Numbering across calls ====================

#[test]
fn test_numbering_continues_across_calls() {
    let mut qb = QueryBuilder::new("select * from accounts");
    qb.and_where([int("id", &[1, 2])])
        .and_where([or([string("name", "a"), string("email", "b")])])
        .and_where_one(int("role", &[3]));
    let compiled = qb.commit();
    assert_eq!(
        compiled.sql(),
        "select * from accounts WHERE id IN ($1, $2) AND (name = $3 OR email = $4) AND role = $5;"
    );
    assert_eq!(qb.param_count(), 5);
    assert_contiguous(&compiled);
}

#[test]
fn test_same_predicate_reused() {
    let p = int("id", &[1, 2]);
    let mut qb = QueryBuilder::new("select * from t");
    qb.and_where([p.clone(), p]);
    assert_eq!(
        qb.to_sql(),
        "select * from t WHERE id IN ($1, $2) AND id IN ($3, $4);"
    );
}

#[test]
fn test_placeholders_match_params_for_many_shapes() {
    let d = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
    let shapes: Vec<Vec<Predicate>> = vec![
        vec![],
        vec![int("a", &[1])],
        vec![int("a", &[1, 2, 3, 4]), string("b", "x")],
        vec![or([int("a", &[1]), and([int("b", &[2, 3]), string("c", "y")])])],
        vec![
            by_date_column("d", Dates::between(d, d)).unwrap(),
            or([by_date_column("d", Dates::after(d)).unwrap(), int("e", &[])]),
            by_string_column("f", ["p", "q", "r"], StringOptions::new()).unwrap(),
        ],
    ];

    for shape in shapes {
        let mut qb = QueryBuilder::new("select * from t");
        qb.and_where(shape.clone()).and_where(shape);
        assert_contiguous(&qb.commit());
    }
}

// ==================== ORDER BY ====================

#[test]
fn test_sort_default_and_desc() {
    let mut qb = QueryBuilder::new("select * from accounts");
    qb.sort_by([sort("id").unwrap(), sort_with("name", SortDirection::Desc).unwrap()]);
    assert_eq!(qb.to_sql(), "select * from accounts ORDER BY id, name DESC;");
}

#[test]
fn test_sort_accumulates() {
    let mut qb = QueryBuilder::new("select * from accounts");
    qb.sort_by([sort("name").unwrap()])
        .sort_by([sort("created_at").unwrap().desc()]);
    assert_eq!(
        qb.to_sql(),
        "select * from accounts ORDER BY name, created_at DESC;"
    );
}

// ==================== LIMIT / OFFSET ====================

#[test]
fn test_limit_only() {
    let mut qb = QueryBuilder::new("select * from accounts");
    qb.limit(10);
    assert_eq!(qb.to_sql(), "select * from accounts LIMIT 10;");
}

#[test]
fn test_offset_only_gets_default_limit() {
    let mut qb = QueryBuilder::new("select * from accounts");
    qb.offset(5);
    assert_eq!(qb.to_sql(), "select * from accounts LIMIT 10 OFFSET 5;");
}

#[test]
fn test_limit_and_offset() {
    let mut qb = QueryBuilder::new("select * from accounts");
    qb.limit(3).offset(5);
    assert_eq!(qb.to_sql(), "select * from accounts LIMIT 3 OFFSET 5;");
}

#[test]
fn test_limit_offset_last_wins() {
    let mut qb = QueryBuilder::new("select * from accounts");
    qb.limit(1).offset(1).limit(20).offset(40);
    assert_eq!(qb.to_sql(), "select * from accounts LIMIT 20 OFFSET 40;");
}

#[test]
fn test_zero_limit_is_emitted() {
    let mut qb = QueryBuilder::new("select * from accounts");
    qb.limit(0);
    assert_eq!(qb.to_sql(), "select * from accounts LIMIT 0;");
}

#[test]
fn test_configured_default_and_max_limit() {
    let config = BuilderConfig::new().default_limit(25).max_limit(100);
    let mut qb = QueryBuilder::with_config("select * from accounts", config);
    qb.offset(50);
    assert_eq!(qb.to_sql(), "select * from accounts LIMIT 25 OFFSET 50;");
    qb.limit(1000);
    assert_eq!(qb.to_sql(), "select * from accounts LIMIT 100 OFFSET 50;");
}

// ==================== Full statement ====================

#[test]
fn test_complete_query() {
    let mut qb = QueryBuilder::new("select * from accounts");
    qb.and_where([int("id", &[1, 2, 3])])
        .sort_by([sort("name").unwrap(), sort("created_at").unwrap().desc()])
        .limit(10)
        .offset(5);
    let compiled = qb.commit();
    assert_eq!(
        compiled.sql(),
        "select * from accounts WHERE id IN ($1, $2, $3) ORDER BY name, created_at DESC LIMIT 10 OFFSET 5;"
    );
    assert_eq!(compiled.params().len(), 3);
}

#[test]
fn test_commit_is_idempotent() {
    let mut qb = QueryBuilder::new("select * from accounts");
    qb.and_where([int("id", &[1]), or([int("id", &[2]), string("name", "x")])])
        .sort_by([sort("id").unwrap()])
        .offset(3);
    let first = qb.commit();
    let second = qb.commit();
    assert_eq!(first, second);
    assert_eq!(qb.param_count(), 3);
}

#[test]
fn test_formatted_params_quote_text_only() {
    let mut qb = QueryBuilder::new("select * from accounts");
    qb.and_where([int("id", &[4]), string("name", "o'neil")]);
    assert_eq!(qb.commit().formatted_params(), vec!["4", "'o''neil'"]);
}

#[test]
fn test_params_ref_matches_params() {
    let mut qb = QueryBuilder::new("select * from accounts");
    qb.and_where([int("id", &[1, 2]), string("name", "x")]);
    assert_eq!(qb.params_ref().len(), 3);
    assert_eq!(qb.commit().params_ref().len(), 3);
}

#[test]
fn test_repeated_trailing_semicolons_are_stripped() {
    let qb = QueryBuilder::new("select 1 ; ;\n ;");
    assert_eq!(qb.to_sql(), "select 1;");
}

/// Client that returns no rows and remembers what it was sent.
#[derive(Default)]
struct RecordingClient {
    calls: Mutex<Vec<(String, usize)>>,
}

impl RecordingClient {
    fn record(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) {
        self.calls
            .lock()
            .unwrap()
            .push((sql.to_string(), params.len()));
    }

    fn calls(&self) -> Vec<(String, usize)> {
        self.calls.lock().unwrap().clone()
    }
}

impl GenericClient for RecordingClient {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> QueryResult<Vec<Row>> {
        self.record(sql, params);
        Ok(Vec::new())
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> QueryResult<u64> {
        self.record(sql, params);
        Ok(0)
    }
}

fn compiled_lookup() -> CompiledQuery {
    let mut qb = QueryBuilder::new("select * from accounts");
    qb.and_where([int("id", &[1, 2]), string("name", "x")]);
    qb.commit()
}

#[tokio::test]
async fn test_query_one_with_no_rows_is_not_found() {
    let client = RecordingClient::default();
    let compiled = compiled_lookup();

    let err = compiled.query_one(&client).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(client.calls(), vec![(compiled.sql().to_string(), 3)]);
}

#[tokio::test]
async fn test_query_opt_with_no_rows_is_none() {
    let client = RecordingClient::default();
    let compiled = compiled_lookup();

    assert!(compiled.query_opt(&client).await.unwrap().is_none());
    assert!(compiled.query(&client).await.unwrap().is_empty());
    assert_eq!(
        client.calls(),
        vec![
            (compiled.sql().to_string(), 3),
            (compiled.sql().to_string(), 3),
        ]
    );
}

#[tokio::test]
async fn test_builder_executes_committed_sql() {
    let client = RecordingClient::default();
    let mut qb = QueryBuilder::new("delete from accounts");
    qb.and_where_one(int("id", &[9]));

    assert_eq!(qb.execute(&client).await.unwrap(), 0);
    assert!(qb.query_opt(&client).await.unwrap().is_none());
    let expected = qb.commit();
    assert_eq!(
        client.calls(),
        vec![
            (expected.sql().to_string(), 1),
            (expected.sql().to_string(), 1),
        ]
    );
}

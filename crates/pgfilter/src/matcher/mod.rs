//! Matchers: typed application values in, [`Predicate`] out.
//!
//! Every matcher validates its column first, so an invalid identifier is
//! reported even when no values are supplied. A matcher with nothing to match
//! returns [`Predicate::Empty`], which the query builder drops.

mod options;

pub use options::{Dates, MatchMode, Sensitivity, StringOptions};

use crate::error::QueryResult;
use crate::ident::IntoIdent;
use crate::predicate::{Leaf, Predicate};
use crate::value::Value;

/// Integer equality (one value) or membership (two or more values).
///
/// ```ignore
/// by_int_column("id", [7])?;        // id = ?1
/// by_int_column("id", [1, 2, 3])?;  // id IN ?1  ->  id IN ($1, $2, $3)
/// ```
pub fn by_int_column<I>(column: impl IntoIdent, values: I) -> QueryResult<Predicate>
where
    I: IntoIterator<Item = i64>,
{
    let column = column.into_ident()?;
    let mut values: Vec<i64> = values.into_iter().collect();

    let leaf = match values.len() {
        0 => return Ok(Predicate::Empty),
        1 => Leaf::new()
            .raw(format!("{column} = "))
            .bind(values.remove(0)),
        _ => Leaf::new()
            .raw(format!("{column} IN "))
            .bind_list(values.into_iter().map(Value::Int).collect()),
    };
    Ok(leaf.into())
}

/// String equality or pattern match.
///
/// Match mode and sensitivity only apply to a single value. Two or more values
/// always produce a plain `IN` list, whatever the options say; pattern-matched
/// membership lists are not supported.
///
/// | mode                 | sensitive          | non-sensitive                     |
/// |----------------------|--------------------|-----------------------------------|
/// | `Exact`              | `col = ?1`         | `LOWER(col) = LOWER(?1)`          |
/// | `Contains` (`%v%`)   | `col LIKE ?1`      | `LOWER(col) LIKE LOWER(?1)`       |
/// | `StartsWith` (`v%`)  | `col LIKE ?1`      | `LOWER(col) LIKE LOWER(?1)`       |
/// | `EndsWith` (`%v`)    | `col LIKE ?1`      | `LOWER(col) LIKE LOWER(?1)`       |
///
/// Wildcards are added to the bound value. `%` and `_` inside the caller's
/// value are passed through unescaped.
pub fn by_string_column<I>(
    column: impl IntoIdent,
    values: I,
    options: impl Into<StringOptions>,
) -> QueryResult<Predicate>
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    let column = column.into_ident()?;
    let mut values: Vec<String> = values.into_iter().map(Into::into).collect();

    if values.len() > 1 {
        return Ok(Leaf::new()
            .raw(format!("{column} IN "))
            .bind_list(values.into_iter().map(Value::Text).collect())
            .into());
    }
    let Some(value) = values.pop() else {
        return Ok(Predicate::Empty);
    };

    let (mode, sensitivity) = options.into().resolve();
    let pattern = mode.pattern(value);

    let leaf = match (mode, sensitivity) {
        (MatchMode::Exact, Sensitivity::Sensitive) => {
            Leaf::new().raw(format!("{column} = ")).bind(pattern)
        }
        (MatchMode::Exact, Sensitivity::NonSensitive) => Leaf::new()
            .raw(format!("LOWER({column}) = LOWER("))
            .bind(pattern)
            .raw(")"),
        (_, Sensitivity::Sensitive) => Leaf::new().raw(format!("{column} LIKE ")).bind(pattern),
        (_, Sensitivity::NonSensitive) => Leaf::new()
            .raw(format!("LOWER({column}) LIKE LOWER("))
            .bind(pattern)
            .raw(")"),
    };
    Ok(leaf.into())
}

/// Date match: exact day, inclusive range, or one-sided exclusive bound.
pub fn by_date_column(column: impl IntoIdent, dates: Dates) -> QueryResult<Predicate> {
    let column = column.into_ident()?;

    let leaf = match dates {
        Dates { on: Some(day), .. } => Leaf::new()
            .raw(format!("DATE_TRUNC('day', {column}) = DATE_TRUNC('day', "))
            .bind(day)
            .raw("::timestamp)"),
        Dates {
            after: Some(start),
            before: Some(end),
            ..
        } => Leaf::new()
            .raw(format!("{column} >= "))
            .bind(start)
            .raw(format!(" AND {column} <= "))
            .bind(end),
        Dates {
            after: Some(start), ..
        } => Leaf::new().raw(format!("{column} > ")).bind(start),
        Dates {
            before: Some(end), ..
        } => Leaf::new().raw(format!("{column} < ")).bind(end),
        Dates { .. } => return Ok(Predicate::Empty),
    };
    Ok(leaf.into())
}

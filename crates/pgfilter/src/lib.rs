//! # pgfilter
//!
//! Composable, injection-safe filters for PostgreSQL queries with positional
//! placeholders.
//!
//! ## Features
//!
//! - **SQL explicit**: the base statement is plain SQL; only the tail is built
//! - **Typed matchers**: integer, string (exact/pattern, case sensitivity), date
//! - **AND/OR groups**: nest to any depth, numbered depth-first
//! - **Safe identifiers**: every column passes a structural allow-list
//! - **Safe pagination**: an OFFSET without a LIMIT gets a default LIMIT
//!
//! ## Example
//!
//! ```ignore
//! use pgfilter::prelude::*;
//!
//! let mut qb = QueryBuilder::new("SELECT * FROM accounts");
//! qb.and_where([
//!     by_int_column("id", [1])?,
//!     or([
//!         by_int_column("id", [2])?,
//!         by_string_column("name", ["car"], MatchMode::Contains)?,
//!     ]),
//! ])
//! .sort_by([sort("created_at")?.desc()])
//! .offset(20);
//!
//! let (sql, params) = qb.commit().into_parts();
//! // SELECT * FROM accounts WHERE id = $1 AND (id = $2 OR name LIKE $3)
//! //   ORDER BY created_at DESC LIMIT 10 OFFSET 20;
//! ```

pub mod builder;
pub mod client;
pub mod config;
pub mod error;
pub mod ident;
pub mod matcher;
pub mod predicate;
pub mod prelude;
pub mod sort;
pub mod value;

pub use builder::{CompiledQuery, QueryBuilder, SqlBuilder};
pub use client::GenericClient;
pub use config::BuilderConfig;
pub use error::{QueryError, QueryResult};
pub use ident::{Ident, IntoIdent};
pub use matcher::{
    Dates, MatchMode, Sensitivity, StringOptions, by_date_column, by_int_column, by_string_column,
};
pub use predicate::{GroupOp, Leaf, Predicate, and, or};
pub use sort::{SortDirection, SortKey, sort, sort_with};
pub use value::Value;

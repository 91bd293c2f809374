//! Convenient imports for typical `pgfilter` usage.
//!
//! ```ignore
//! use pgfilter::prelude::*;
//! ```

pub use crate::{
    BuilderConfig, CompiledQuery, Dates, GenericClient, MatchMode, Predicate, QueryBuilder,
    QueryError, QueryResult, Sensitivity, SortDirection, SortKey, SqlBuilder, StringOptions,
    Value, and, by_date_column, by_int_column, by_string_column, or, sort, sort_with,
};

//! Query builder: base statement + predicates + sort + pagination.
//!
//! ## Design
//!
//! - The base statement is explicit SQL; only the tail (`WHERE`, `ORDER BY`,
//!   `LIMIT`, `OFFSET`) is structured.
//! - Placeholders are managed automatically (`$1`, `$2`, ...) and never reused.
//! - An OFFSET without a LIMIT gets a default LIMIT (see [`BuilderConfig`]).
//!
//! [`BuilderConfig`]: crate::BuilderConfig

pub mod query;
pub mod traits;

pub use query::{CompiledQuery, QueryBuilder};
pub use traits::SqlBuilder;

#[cfg(test)]
mod tests;

//! ORDER BY keys.

use crate::error::QueryResult;
use crate::ident::{Ident, IntoIdent};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sort direction (`"asc"` / `"desc"` when deserialized).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending (default).
    #[default]
    Asc,
    /// Descending.
    Desc,
}

/// A validated column plus direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    column: Ident,
    direction: SortDirection,
}

impl SortKey {
    /// Validate `column` and pair it with `direction`.
    pub fn new(column: impl IntoIdent, direction: SortDirection) -> QueryResult<Self> {
        Ok(Self {
            column: column.into_ident()?,
            direction,
        })
    }

    /// Switch to ascending order.
    pub fn asc(mut self) -> Self {
        self.direction = SortDirection::Asc;
        self
    }

    /// Switch to descending order.
    pub fn desc(mut self) -> Self {
        self.direction = SortDirection::Desc;
        self
    }

    /// The validated column.
    pub fn column(&self) -> &Ident {
        &self.column
    }

    /// The sort direction.
    pub fn direction(&self) -> SortDirection {
        self.direction
    }
}

/// Ascending is implicit; only `DESC` is written out.
impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction {
            SortDirection::Asc => write!(f, "{}", self.column),
            SortDirection::Desc => write!(f, "{} DESC", self.column),
        }
    }
}

/// Ascending sort on `column`.
pub fn sort(column: impl IntoIdent) -> QueryResult<SortKey> {
    SortKey::new(column, SortDirection::Asc)
}

/// Sort on `column` in the given direction.
pub fn sort_with(column: impl IntoIdent, direction: SortDirection) -> QueryResult<SortKey> {
    SortKey::new(column, direction)
}

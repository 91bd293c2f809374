//! Column identifier validation.
//!
//! Every matcher and sort key passes its column through [`Ident::parse`] before
//! doing anything else. The grammar is a structural allow-list:
//!
//! - first character: ASCII letter or `_`
//! - remaining characters: ASCII letters, digits, `_`, or `.` (for `table.column`)
//!
//! Anything else (whitespace, quotes, `;`, comment markers, parentheses, ...) is
//! rejected, which is what keeps caller-supplied column names out of the SQL
//! injection surface.
//!
//! # Example
//! ```ignore
//! use pgfilter::Ident;
//!
//! let col = Ident::parse("u.created_at")?;
//! assert!(Ident::parse("id; DROP TABLE users").is_err());
//! # Ok::<(), pgfilter::QueryError>(())
//! ```

use crate::error::{QueryError, QueryResult};
use std::fmt;

/// A validated column identifier, rendered into SQL verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ident(String);

impl Ident {
    /// Validate `s` and wrap it.
    pub fn parse(s: &str) -> QueryResult<Self> {
        validate(s)?;
        Ok(Self(s.to_string()))
    }

    /// The identifier as it will appear in SQL.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Ident {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Check `name` against the identifier grammar.
pub fn validate(name: &str) -> QueryResult<()> {
    let result = check(name);
    #[cfg(feature = "tracing")]
    if let Err(err) = &result {
        tracing::warn!(target: "pgfilter.ident", error = %err, "rejected column identifier");
    }
    result
}

fn check(name: &str) -> QueryResult<()> {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return Err(QueryError::invalid_identifier(
            name,
            "identifier cannot be empty",
        ));
    };

    if !(first == '_' || first.is_ascii_alphabetic()) {
        return Err(QueryError::invalid_identifier(
            name,
            format!("invalid identifier start character {first:?}"),
        ));
    }

    for c in chars {
        if !(c == '_' || c == '.' || c.is_ascii_alphanumeric()) {
            return Err(QueryError::invalid_identifier(
                name,
                format!("invalid character {c:?} (only letters, digits, '_' and '.' are allowed)"),
            ));
        }
    }

    Ok(())
}

/// Convert an input into an [`Ident`].
///
/// This is mainly for ergonomics in matcher and sort constructors.
pub trait IntoIdent {
    fn into_ident(self) -> QueryResult<Ident>;
}

impl IntoIdent for Ident {
    fn into_ident(self) -> QueryResult<Ident> {
        Ok(self)
    }
}

impl IntoIdent for &Ident {
    fn into_ident(self) -> QueryResult<Ident> {
        Ok(self.clone())
    }
}

impl IntoIdent for &str {
    fn into_ident(self) -> QueryResult<Ident> {
        Ident::parse(self)
    }
}

impl IntoIdent for String {
    fn into_ident(self) -> QueryResult<Ident> {
        validate(&self)?;
        Ok(Ident(self))
    }
}

impl IntoIdent for &String {
    fn into_ident(self) -> QueryResult<Ident> {
        Ident::parse(self)
    }
}

use super::traits::SqlBuilder;
use crate::config::BuilderConfig;
use crate::predicate::Predicate;
use crate::sort::SortKey;
use crate::value::Value;
use tokio_postgres::types::ToSql;

/// Filter/sort/paginate accumulator around a base statement.
///
/// Placeholders are numbered when predicates are added, in call order and
/// depth-first inside groups, so `$n` always refers to `params[n - 1]`.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    /// Base statement, trimmed, without trailing `;`
    base: String,
    /// Rendered top-level conditions (joined by AND)
    where_conditions: Vec<String>,
    /// ORDER BY keys, in call order
    order_keys: Vec<SortKey>,
    /// LIMIT
    limit: Option<u64>,
    /// OFFSET
    offset: Option<u64>,
    /// Params; the next placeholder is `$(params.len() + 1)`
    params: Vec<Value>,
    config: BuilderConfig,
}

impl QueryBuilder {
    /// Create a new builder around `base` (e.g. `SELECT * FROM users`).
    pub fn new(base: impl AsRef<str>) -> Self {
        Self::with_config(base, BuilderConfig::default())
    }

    /// Create a new builder with explicit pagination settings.
    pub fn with_config(base: impl AsRef<str>, config: BuilderConfig) -> Self {
        let base = base
            .as_ref()
            .trim_start()
            .trim_end_matches(|c: char| c == ';' || c.is_whitespace());
        Self {
            base: base.to_string(),
            where_conditions: Vec::new(),
            order_keys: Vec::new(),
            limit: None,
            offset: None,
            params: Vec::new(),
            config,
        }
    }

    /// Add predicates, each AND-joined to what is already there.
    ///
    /// Empty predicates (and groups with only empty children) are skipped and
    /// allocate no placeholder.
    pub fn and_where<I>(&mut self, predicates: I) -> &mut Self
    where
        I: IntoIterator<Item = Predicate>,
    {
        for predicate in predicates {
            self.push_predicate(&predicate);
        }
        self
    }

    /// Add a single predicate.
    pub fn and_where_one(&mut self, predicate: Predicate) -> &mut Self {
        self.push_predicate(&predicate);
        self
    }

    fn push_predicate(&mut self, predicate: &Predicate) {
        let params = &mut self.params;
        let rendered = predicate.render(&mut |value: &Value| {
            params.push(value.clone());
            params.len()
        });
        if let Some(condition) = rendered {
            self.where_conditions.push(condition);
        }
    }

    /// Append ORDER BY keys. Repeated calls accumulate.
    pub fn sort_by<I>(&mut self, keys: I) -> &mut Self
    where
        I: IntoIterator<Item = SortKey>,
    {
        self.order_keys.extend(keys);
        self
    }

    /// Set LIMIT (last call wins).
    pub fn limit(&mut self, limit: u64) -> &mut Self {
        self.limit = Some(limit);
        self
    }

    /// Set OFFSET (last call wins).
    pub fn offset(&mut self, offset: u64) -> &mut Self {
        self.offset = Some(offset);
        self
    }

    /// Number of placeholders allocated so far.
    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    /// Bound values in placeholder order.
    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// Check if any WHERE conditions have been added.
    pub fn has_conditions(&self) -> bool {
        !self.where_conditions.is_empty()
    }

    /// Compile the final statement and its values.
    ///
    /// Safe to call repeatedly; it never changes the builder.
    pub fn commit(&self) -> CompiledQuery {
        let compiled = CompiledQuery {
            sql: self.build_sql(),
            params: self.params.clone(),
        };
        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "pgfilter.sql",
            sql = %compiled.sql,
            param_count = compiled.params.len(),
            "compiled query"
        );
        compiled
    }
}

fn push_clause(sql: &mut String, clause: &str) {
    if !sql.is_empty() {
        sql.push(' ');
    }
    sql.push_str(clause);
}

impl SqlBuilder for QueryBuilder {
    fn build_sql(&self) -> String {
        let mut sql = self.base.clone();

        if !self.where_conditions.is_empty() {
            push_clause(&mut sql, "WHERE ");
            sql.push_str(&self.where_conditions.join(" AND "));
        }

        if !self.order_keys.is_empty() {
            let keys: Vec<String> = self.order_keys.iter().map(ToString::to_string).collect();
            push_clause(&mut sql, "ORDER BY ");
            sql.push_str(&keys.join(", "));
        }

        if let Some(limit) = self.config.effective_limit(self.limit, self.offset) {
            push_clause(&mut sql, &format!("LIMIT {limit}"));
        }

        if let Some(offset) = self.offset {
            push_clause(&mut sql, &format!("OFFSET {offset}"));
        }

        sql.push(';');
        sql
    }

    fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params
            .iter()
            .map(|v| v as &(dyn ToSql + Sync))
            .collect()
    }
}

/// The output of [`QueryBuilder::commit`]: SQL with `$1..$n` and one value per
/// placeholder.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    sql: String,
    params: Vec<Value>,
}

impl CompiledQuery {
    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }

    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.sql, self.params)
    }

    /// Params rendered as SQL literals, for log output only.
    pub fn formatted_params(&self) -> Vec<String> {
        self.params.iter().map(Value::to_sql_literal).collect()
    }
}

impl SqlBuilder for CompiledQuery {
    fn build_sql(&self) -> String {
        self.sql.clone()
    }

    fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params
            .iter()
            .map(|v| v as &(dyn ToSql + Sync))
            .collect()
    }
}

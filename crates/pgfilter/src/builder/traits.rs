use crate::client::GenericClient;
use crate::error::QueryResult;
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

/// Base trait for anything that yields SQL plus its bound params.
pub trait SqlBuilder: Sync {
    /// Build the SQL string.
    fn build_sql(&self) -> String;

    /// Get parameters as references compatible with tokio-postgres.
    fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)>;

    /// Debug helper.
    fn to_sql(&self) -> String {
        self.build_sql()
    }

    /// Execute query and return all rows.
    fn query(
        &self,
        conn: &impl GenericClient,
    ) -> impl std::future::Future<Output = QueryResult<Vec<Row>>> + Send {
        async move {
            let sql = self.build_sql();
            let params = self.params_ref();
            log_sql(&sql, params.len());
            conn.query(&sql, &params).await
        }
    }

    /// Execute query and return at most one row.
    fn query_opt(
        &self,
        conn: &impl GenericClient,
    ) -> impl std::future::Future<Output = QueryResult<Option<Row>>> + Send {
        async move {
            let sql = self.build_sql();
            let params = self.params_ref();
            log_sql(&sql, params.len());
            conn.query_opt(&sql, &params).await
        }
    }

    /// Execute query and return the first row.
    fn query_one(
        &self,
        conn: &impl GenericClient,
    ) -> impl std::future::Future<Output = QueryResult<Row>> + Send {
        async move {
            let sql = self.build_sql();
            let params = self.params_ref();
            log_sql(&sql, params.len());
            conn.query_one(&sql, &params).await
        }
    }

    /// Execute and return affected row count.
    fn execute(
        &self,
        conn: &impl GenericClient,
    ) -> impl std::future::Future<Output = QueryResult<u64>> + Send {
        async move {
            let sql = self.build_sql();
            let params = self.params_ref();
            log_sql(&sql, params.len());
            conn.execute(&sql, &params).await
        }
    }
}

#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
fn log_sql(sql: &str, param_count: usize) {
    #[cfg(feature = "tracing")]
    tracing::debug!(target: "pgfilter.sql", sql = %sql, param_count, "executing query");
}

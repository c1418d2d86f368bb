use sqlx::{self, postgres::PgRow, FromRow, PgPool, Row};
use tracing::debug;

use crate::database::manager::DatabaseError;
use crate::filter::{Filter, ListParams, ListQuery, PageMeta, ResourceSpec};

/// Executes the count and data halves of a `ListQuery` for one resource.
pub struct QueryBuilder<T> {
    query: ListQuery,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> QueryBuilder<T>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    pub fn new(spec: &ResourceSpec, params: &ListParams) -> Result<Self, DatabaseError> {
        let query = Filter::build(spec, params).map_err(|e| DatabaseError::QueryError(e.to_string()))?;
        Ok(Self {
            query,
            _phantom: std::marker::PhantomData,
        })
    }

    pub async fn count(&self, pool: &PgPool) -> Result<i64, DatabaseError> {
        let sql = &self.query.count;
        debug!(query = %sql.query, "count");
        let mut q = sqlx::query(&sql.query);
        for p in sql.params.iter() {
            q = q.bind(p);
        }
        let row = q.fetch_one(pool).await?;
        let count: i64 = row.try_get("count")?;
        Ok(count)
    }

    pub async fn select_page(&self, pool: &PgPool) -> Result<Vec<T>, DatabaseError> {
        let sql = &self.query.data;
        debug!(query = %sql.query, "select page");
        let mut q = sqlx::query_as::<_, T>(&sql.query);
        for p in sql.params.iter() {
            q = q.bind(p);
        }
        let rows = q.fetch_all(pool).await?;
        Ok(rows)
    }

    /// Count first, then fetch the page. Not transactional.
    pub async fn fetch(self, pool: &PgPool) -> Result<(Vec<T>, PageMeta), DatabaseError> {
        let total = self.count(pool).await?;
        let rows = self.select_page(pool).await?;
        Ok((rows, self.query.pagination.meta(total)))
    }
}

use serde::Serialize;
use sqlx::{self, postgres::PgRow, FromRow, PgPool};

use crate::database::manager::DatabaseError;
use crate::database::query_builder::QueryBuilder;
use crate::filter::{ListParams, PageMeta, ResourceSpec};

/// Rows plus the pagination envelope fields.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    #[serde(flatten)]
    pub meta: PageMeta,
}

/// Listing shared by every resource table.
pub struct Repository<T> {
    spec: &'static ResourceSpec,
    pool: PgPool,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Repository<T>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin + Serialize,
{
    pub fn new(spec: &'static ResourceSpec, pool: PgPool) -> Self {
        Self {
            spec,
            pool,
            _phantom: std::marker::PhantomData,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn list(&self, params: &ListParams) -> Result<Page<T>, DatabaseError> {
        let (data, meta) = QueryBuilder::<T>::new(self.spec, params)?
            .fetch(&self.pool)
            .await?;
        Ok(Page { data, meta })
    }
}

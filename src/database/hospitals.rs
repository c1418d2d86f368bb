use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use tracing::debug;

use crate::database::manager::DatabaseError;
use crate::database::repository::{Page, Repository};
use crate::filter::{ListParams, ResourceSpec, SortDirection};
use crate::validation::{HospitalInput, HospitalUpdate};

// Hospital columns keep their upper-case names, quoted in SQL.
pub static HOSPITAL_SPEC: ResourceSpec = ResourceSpec {
    table: "hospitals",
    columns: &["HOSPCODE", "NAME", "HEADQUARTER", "d_update"],
    sortable: &["HOSPCODE", "NAME", "HEADQUARTER", "d_update"],
    searchable: &["HOSPCODE", "NAME", "HEADQUARTER"],
    default_sort: "HOSPCODE",
    default_order: SortDirection::Asc,
    fixed_filter: None,
};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct HospitalRecord {
    #[sqlx(rename = "HOSPCODE")]
    #[serde(rename = "HOSPCODE")]
    pub hospcode: String,
    #[sqlx(rename = "NAME")]
    #[serde(rename = "NAME")]
    pub name: String,
    #[sqlx(rename = "HEADQUARTER")]
    #[serde(rename = "HEADQUARTER")]
    pub headquarter: String,
    pub d_update: DateTime<Utc>,
}

const RETURNING: &str = r#"RETURNING "HOSPCODE", "NAME", "HEADQUARTER", d_update"#;

pub struct HospitalRepository {
    inner: Repository<HospitalRecord>,
}

impl HospitalRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            inner: Repository::new(&HOSPITAL_SPEC, pool),
        }
    }

    pub async fn list(&self, params: &ListParams) -> Result<Page<HospitalRecord>, DatabaseError> {
        self.inner.list(params).await
    }

    /// Insert a hospital; an existing hospcode is `Conflict`.
    pub async fn create(&self, input: &HospitalInput) -> Result<HospitalRecord, DatabaseError> {
        let query = format!(
            r#"INSERT INTO hospitals ("HOSPCODE", "NAME", "HEADQUARTER", d_update) VALUES ($1, $2, $3, NOW()) {}"#,
            RETURNING
        );
        let record = sqlx::query_as::<_, HospitalRecord>(&query)
            .bind(&input.hospcode)
            .bind(&input.name)
            .bind(&input.headquarter)
            .fetch_one(self.inner.pool())
            .await
            .map_err(|e| {
                DatabaseError::from_write(e, || format!("Hospital with hospcode '{}' already exists", input.hospcode))
            })?;

        debug!("Created hospital {}", record.hospcode);
        Ok(record)
    }

    pub async fn update(&self, hospcode: &str, input: &HospitalUpdate) -> Result<HospitalRecord, DatabaseError> {
        let query = format!(
            r#"UPDATE hospitals SET "NAME" = $1, "HEADQUARTER" = $2, d_update = NOW() WHERE "HOSPCODE" = $3 {}"#,
            RETURNING
        );
        sqlx::query_as::<_, HospitalRecord>(&query)
            .bind(&input.name)
            .bind(&input.headquarter)
            .bind(hospcode)
            .fetch_optional(self.inner.pool())
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("Hospital '{}' not found", hospcode)))
    }
}

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use tracing::debug;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::repository::{Page, Repository};
use crate::filter::{FixedFilter, ListParams, ResourceSpec, SortDirection};
use crate::validation::DoctorInput;

/// Every record created through this API carries this user type.
pub const DOCTOR_USER_TYPE: &str = "doctor";

pub static DOCTOR_SPEC: ResourceSpec = ResourceSpec {
    table: "cm_users",
    columns: &["id", "name", "hospcode", "cid", "contact", "address", "status", "user_type", "d_update"],
    sortable: &["name", "hospcode", "cid", "status", "d_update"],
    searchable: &["name", "hospcode", "cid", "contact", "address"],
    default_sort: "d_update",
    default_order: SortDirection::Desc,
    fixed_filter: Some(FixedFilter { column: "user_type", value: DOCTOR_USER_TYPE }),
};

/// Row of the `cm_users` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct DoctorRecord {
    pub id: Uuid,
    pub name: String,
    pub hospcode: String,
    pub cid: String,
    pub contact: String,
    pub address: String,
    pub status: String,
    pub user_type: String,
    pub d_update: DateTime<Utc>,
}

const RETURNING: &str = "RETURNING id, name, hospcode, cid, contact, address, status, user_type, d_update";

/// Doctor records: list, create, full-replace update. No delete.
pub struct DoctorRepository {
    inner: Repository<DoctorRecord>,
}

impl DoctorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            inner: Repository::new(&DOCTOR_SPEC, pool),
        }
    }

    pub async fn list(&self, params: &ListParams) -> Result<Page<DoctorRecord>, DatabaseError> {
        self.inner.list(params).await
    }

    pub async fn create(&self, input: &DoctorInput) -> Result<DoctorRecord, DatabaseError> {
        let id = Uuid::new_v4();
        let query = format!(
            "INSERT INTO cm_users (id, name, hospcode, cid, contact, address, status, user_type, d_update) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW()) {}",
            RETURNING
        );
        let record = sqlx::query_as::<_, DoctorRecord>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.hospcode)
            .bind(&input.cid)
            .bind(&input.contact)
            .bind(&input.address)
            .bind(input.status.as_str())
            .bind(DOCTOR_USER_TYPE)
            .fetch_one(self.inner.pool())
            .await
            .map_err(|e| DatabaseError::from_write(e, || format!("Doctor record '{}' already exists", id)))?;

        debug!("Created doctor record {}", record.id);
        Ok(record)
    }

    /// Replace every mutable field and the status. Zero matched rows is `NotFound`.
    pub async fn update(&self, id: Uuid, input: &DoctorInput) -> Result<DoctorRecord, DatabaseError> {
        let query = format!(
            "UPDATE cm_users \
             SET name = $1, hospcode = $2, cid = $3, contact = $4, address = $5, status = $6, d_update = NOW() \
             WHERE id = $7 AND user_type = $8 {}",
            RETURNING
        );
        sqlx::query_as::<_, DoctorRecord>(&query)
            .bind(&input.name)
            .bind(&input.hospcode)
            .bind(&input.cid)
            .bind(&input.contact)
            .bind(&input.address)
            .bind(input.status.as_str())
            .bind(id)
            .bind(DOCTOR_USER_TYPE)
            .fetch_optional(self.inner.pool())
            .await
            .map_err(|e| DatabaseError::from_write(e, || format!("Doctor record '{}' conflicts with an existing record", id)))?
            .ok_or_else(|| DatabaseError::NotFound(format!("Doctor record '{}' not found", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Filter;

    #[test]
    fn spec_is_valid() {
        Filter::validate_spec(&DOCTOR_SPEC).unwrap();
    }

    #[test]
    fn listing_is_restricted_to_doctors() {
        let q = Filter::build(&DOCTOR_SPEC, &ListParams::default()).unwrap();
        assert!(q.count.query.ends_with("WHERE \"user_type\" = $1"));
        assert_eq!(q.count.params, vec![DOCTOR_USER_TYPE.to_string()]);
    }
}

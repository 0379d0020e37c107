// ============================================================================
// HortiTech Infrastructure - PostgreSQL Greenhouse Repository
// File: crates/hortitech-infrastructure/src/database/postgres/greenhouse_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use tracing::info;

use hortitech_core::domain::{
    Greenhouse, GreenhouseChanges, GreenhouseFilter, GreenhouseId, GreenhouseStatus,
    GreenhouseSummary, NewGreenhouse, OperatorSummary,
};
use hortitech_core::error::DomainError;
use hortitech_core::repositories::{GreenhouseRepository, GreenhouseUnitOfWork, LifecycleView};

use super::{database_error, is_foreign_key_violation, unknown_status};

/// Advisory lock key serialising greenhouse creation across connections.
const CREATE_LOCK_KEY: i64 = 0x4752_4545_4e48; // "GREENH"

pub struct PgGreenhouseRepository {
    pool: PgPool,
}

impl PgGreenhouseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
struct GreenhouseRow {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub operator_id: i32,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
    pub total_zones: i64,
    pub active_zones: i64,
    pub op_id: Option<i32>,
    pub op_username: Option<String>,
    pub op_role: Option<String>,
    pub op_status: Option<String>,
}

impl TryFrom<GreenhouseRow> for Greenhouse {
    type Error = DomainError;

    fn try_from(row: GreenhouseRow) -> Result<Self, Self::Error> {
        let status = GreenhouseStatus::from_str(&row.status)
            .ok_or_else(|| unknown_status("Greenhouse", row.id, &row.status))?;

        let operator = match (row.op_id, row.op_username) {
            (Some(id), Some(username)) => Some(OperatorSummary {
                id,
                username,
                role: row.op_role.unwrap_or_default(),
                status: row.op_status.unwrap_or_default(),
            }),
            _ => None,
        };

        Ok(Greenhouse {
            id: row.id,
            name: row.name,
            description: row.description,
            status,
            operator_id: row.operator_id,
            total_zones: row.total_zones,
            active_zones: row.active_zones,
            operator,
            created_at: row.created_at,
            modified_at: row.modified_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct GreenhouseSummaryRow {
    pub id: i32,
    pub name: String,
}

// Zone counts are aggregated here on every read instead of being stored
const SELECT_GREENHOUSES: &str = r#"
    SELECT
        g.id, g.name, g.description, g.status, g.operator_id,
        g.created_at, g.modified_at,
        COUNT(z.id) AS total_zones,
        COUNT(z.id) FILTER (WHERE z.status = 'active') AS active_zones,
        o.id AS op_id, o.username AS op_username, o.role AS op_role, o.status AS op_status
    FROM greenhouses g
    LEFT JOIN operators o ON o.id = g.operator_id
    LEFT JOIN zones z ON z.greenhouse_id = g.id
"#;

#[async_trait]
impl GreenhouseRepository for PgGreenhouseRepository {
    async fn begin(&self) -> Result<Box<dyn GreenhouseUnitOfWork>, DomainError> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| database_error("starting transaction", e))?;
        Ok(Box::new(PgGreenhouseUnitOfWork { tx: Some(tx) }))
    }

    async fn find_by_id(&self, id: GreenhouseId) -> Result<Option<Greenhouse>, DomainError> {
        let sql = format!("{SELECT_GREENHOUSES} WHERE g.id = $1 GROUP BY g.id, o.id");
        let row: Option<GreenhouseRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| database_error("finding greenhouse by id", e))?;

        row.map(Greenhouse::try_from).transpose()
    }

    async fn list(&self, filter: GreenhouseFilter) -> Result<Vec<Greenhouse>, DomainError> {
        let (status, operator_id) = match filter {
            GreenhouseFilter::All => (None, None),
            GreenhouseFilter::Active => (Some(GreenhouseStatus::Active.as_str()), None),
            GreenhouseFilter::ByOperator(operator_id) => (None, Some(operator_id)),
        };

        let sql = format!(
            "{SELECT_GREENHOUSES}
            WHERE ($1::text IS NULL OR g.status = $1)
              AND ($2::int IS NULL OR g.operator_id = $2)
            GROUP BY g.id, o.id
            ORDER BY g.id ASC"
        );
        let rows: Vec<GreenhouseRow> = sqlx::query_as(&sql)
            .bind(status)
            .bind(operator_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| database_error("listing greenhouses", e))?;

        rows.into_iter().map(Greenhouse::try_from).collect()
    }

    async fn list_active_summaries(&self) -> Result<Vec<GreenhouseSummary>, DomainError> {
        let rows: Vec<GreenhouseSummaryRow> = sqlx::query_as(
            r#"
            SELECT id, name
            FROM greenhouses
            WHERE status = 'active'
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| database_error("listing active greenhouse summaries", e))?;

        Ok(rows
            .into_iter()
            .map(|r| GreenhouseSummary { id: r.id, name: r.name })
            .collect())
    }

    async fn update_details(&self, id: GreenhouseId, changes: &GreenhouseChanges) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE greenhouses
            SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                operator_id = COALESCE($4, operator_id),
                modified_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.description)
        .bind(changes.operator_id)
        .execute(&self.pool)
        .await
        .map_err(|e: sqlx::Error| match changes.operator_id {
            Some(operator_id) if is_foreign_key_violation(&e) => DomainError::OperatorNotFound(operator_id),
            _ => database_error("updating greenhouse", e),
        })?;

        Ok(result.rows_affected() > 0)
    }
}

/// One PostgreSQL transaction. Dropping it uncommitted rolls back.
pub struct PgGreenhouseUnitOfWork {
    tx: Option<Transaction<'static, Postgres>>,
}

impl PgGreenhouseUnitOfWork {
    fn tx(&mut self) -> Result<&mut Transaction<'static, Postgres>, DomainError> {
        self.tx
            .as_mut()
            .ok_or_else(|| DomainError::InternalError("transaction already committed".into()))
    }
}

#[async_trait]
impl LifecycleView for PgGreenhouseUnitOfWork {
    async fn count_greenhouses(&mut self) -> Result<i64, DomainError> {
        let tx = self.tx()?;

        // Held until commit/rollback, so concurrent creators count one at a time
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(CREATE_LOCK_KEY)
            .execute(&mut **tx)
            .await
            .map_err(|e| database_error("taking creation lock", e))?;

        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM greenhouses")
            .fetch_one(&mut **tx)
            .await
            .map_err(|e| database_error("counting greenhouses", e))
    }

    async fn lock_status(&mut self, id: GreenhouseId) -> Result<Option<GreenhouseStatus>, DomainError> {
        let tx = self.tx()?;
        let status: Option<String> =
            sqlx::query_scalar("SELECT status FROM greenhouses WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut **tx)
                .await
                .map_err(|e| database_error("locking greenhouse", e))?;

        status
            .map(|s| GreenhouseStatus::from_str(&s).ok_or_else(|| unknown_status("Greenhouse", id, &s)))
            .transpose()
    }

    async fn count_active_zones(&mut self, id: GreenhouseId) -> Result<i64, DomainError> {
        let tx = self.tx()?;
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM zones WHERE greenhouse_id = $1 AND status = 'active'",
        )
        .bind(id)
        .fetch_one(&mut **tx)
        .await
        .map_err(|e| database_error("counting active zones", e))
    }
}

#[async_trait]
impl GreenhouseUnitOfWork for PgGreenhouseUnitOfWork {
    async fn insert(&mut self, greenhouse: &NewGreenhouse) -> Result<GreenhouseId, DomainError> {
        let tx = self.tx()?;
        sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO greenhouses (name, description, status, operator_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&greenhouse.name)
        .bind(&greenhouse.description)
        .bind(GreenhouseStatus::Active.as_str())
        .bind(greenhouse.operator_id)
        .fetch_one(&mut **tx)
        .await
        .map_err(|e: sqlx::Error| {
            if is_foreign_key_violation(&e) {
                DomainError::OperatorNotFound(greenhouse.operator_id)
            } else {
                database_error("creating greenhouse", e)
            }
        })
    }

    async fn set_status(&mut self, id: GreenhouseId, status: GreenhouseStatus) -> Result<(), DomainError> {
        let tx = self.tx()?;
        let result = sqlx::query("UPDATE greenhouses SET status = $2, modified_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(status.as_str())
            .execute(&mut **tx)
            .await
            .map_err(|e| database_error("updating greenhouse status", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::GreenhouseNotFound(id));
        }
        Ok(())
    }

    async fn delete(&mut self, id: GreenhouseId) -> Result<(), DomainError> {
        let tx = self.tx()?;
        let result = sqlx::query("DELETE FROM greenhouses WHERE id = $1")
            .bind(id)
            .execute(&mut **tx)
            .await
            .map_err(|e: sqlx::Error| {
                if is_foreign_key_violation(&e) {
                    info!("Greenhouse {} still referenced: {}", id, e);
                    DomainError::HasDependents(id)
                } else {
                    database_error("deleting greenhouse", e)
                }
            })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::GreenhouseNotFound(id));
        }
        Ok(())
    }

    async fn commit(&mut self) -> Result<(), DomainError> {
        let tx = self
            .tx
            .take()
            .ok_or_else(|| DomainError::InternalError("transaction already committed".into()))?;
        tx.commit()
            .await
            .map_err(|e| database_error("committing transaction", e))
    }
}

// ============================================================================
// HortiTech Infrastructure - PostgreSQL Zone Repository
// File: crates/hortitech-infrastructure/src/database/postgres/zone_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection, PgPool};
use tracing::info;

use hortitech_core::domain::{GreenhouseId, NewZone, Zone, ZoneId, ZoneStatus};
use hortitech_core::error::DomainError;
use hortitech_core::repositories::ZoneRepository;

use super::{database_error, is_foreign_key_violation, unknown_status};

pub struct PgZoneRepository {
    pool: PgPool,
}

impl PgZoneRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ZoneRow {
    pub id: i32,
    pub greenhouse_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
}

impl TryFrom<ZoneRow> for Zone {
    type Error = DomainError;

    fn try_from(row: ZoneRow) -> Result<Self, Self::Error> {
        let status = ZoneStatus::from_str(&row.status)
            .ok_or_else(|| unknown_status("Zone", row.id, &row.status))?;

        Ok(Zone {
            id: row.id,
            greenhouse_id: row.greenhouse_id,
            name: row.name,
            description: row.description,
            status,
            created_at: row.created_at,
            modified_at: row.modified_at,
        })
    }
}

/// Takes the parent row lock that greenhouse transitions also take.
async fn lock_greenhouse(conn: &mut PgConnection, greenhouse_id: GreenhouseId) -> Result<bool, DomainError> {
    let locked: Option<i32> = sqlx::query_scalar("SELECT id FROM greenhouses WHERE id = $1 FOR UPDATE")
        .bind(greenhouse_id)
        .fetch_optional(conn)
        .await
        .map_err(|e| database_error("locking parent greenhouse", e))?;

    Ok(locked.is_some())
}

#[async_trait]
impl ZoneRepository for PgZoneRepository {
    async fn find_by_id(&self, id: ZoneId) -> Result<Option<Zone>, DomainError> {
        let row: Option<ZoneRow> = sqlx::query_as(
            r#"
            SELECT id, greenhouse_id, name, description, status, created_at, modified_at
            FROM zones
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| database_error("finding zone by id", e))?;

        row.map(Zone::try_from).transpose()
    }

    async fn list_by_greenhouse(&self, greenhouse_id: GreenhouseId) -> Result<Vec<Zone>, DomainError> {
        let rows: Vec<ZoneRow> = sqlx::query_as(
            r#"
            SELECT id, greenhouse_id, name, description, status, created_at, modified_at
            FROM zones
            WHERE greenhouse_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(greenhouse_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| database_error("listing zones", e))?;

        rows.into_iter().map(Zone::try_from).collect()
    }

    async fn create(&self, greenhouse_id: GreenhouseId, zone: &NewZone) -> Result<Zone, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| database_error("starting transaction", e))?;

        if !lock_greenhouse(&mut tx, greenhouse_id).await? {
            return Err(DomainError::GreenhouseNotFound(greenhouse_id));
        }

        let row: ZoneRow = sqlx::query_as(
            r#"
            INSERT INTO zones (greenhouse_id, name, description, status)
            VALUES ($1, $2, $3, $4)
            RETURNING id, greenhouse_id, name, description, status, created_at, modified_at
            "#,
        )
        .bind(greenhouse_id)
        .bind(&zone.name)
        .bind(&zone.description)
        .bind(zone.status.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e: sqlx::Error| {
            if is_foreign_key_violation(&e) {
                DomainError::GreenhouseNotFound(greenhouse_id)
            } else {
                database_error("creating zone", e)
            }
        })?;

        tx.commit()
            .await
            .map_err(|e| database_error("committing zone creation", e))?;

        info!("Zone created successfully: {}", row.id);
        Zone::try_from(row)
    }

    async fn update_status(&self, id: ZoneId, status: ZoneStatus) -> Result<Option<Zone>, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| database_error("starting transaction", e))?;

        let greenhouse_id: Option<i32> = sqlx::query_scalar("SELECT greenhouse_id FROM zones WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| database_error("finding zone parent", e))?;

        let Some(greenhouse_id) = greenhouse_id else {
            return Ok(None);
        };
        lock_greenhouse(&mut tx, greenhouse_id).await?;

        let row: Option<ZoneRow> = sqlx::query_as(
            r#"
            UPDATE zones
            SET status = $2, modified_at = NOW()
            WHERE id = $1
            RETURNING id, greenhouse_id, name, description, status, created_at, modified_at
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| database_error("updating zone status", e))?;

        tx.commit()
            .await
            .map_err(|e| database_error("committing zone status", e))?;

        row.map(Zone::try_from).transpose()
    }

    async fn delete(&self, id: ZoneId) -> Result<Option<Zone>, DomainError> {
        let row: Option<ZoneRow> = sqlx::query_as(
            r#"
            DELETE FROM zones
            WHERE id = $1
            RETURNING id, greenhouse_id, name, description, status, created_at, modified_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| database_error("deleting zone", e))?;

        row.map(Zone::try_from).transpose()
    }
}

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Row, Transaction};
use std::collections::BTreeSet;
use tracing::{debug, info};
use uuid::Uuid;

use super::{AddOutcome, PinStore, ResourceCatalog, StoreError};
use crate::database::models::{DocumentSummary, FileSummary, LinkSummary, PinnedIds, PinnedResourceSet};
use crate::database::DatabaseManager;
use crate::types::{ResourceId, ResourceKind};

/// Tables owned by this service. The catalog tables (documents, link_uploads,
/// file_uploads) belong to the resource services and must already exist.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS pinned_resources (
        id UUID PRIMARY KEY,
        user_id UUID NOT NULL UNIQUE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS pinned_resources_document (
        pinned_resources_id UUID NOT NULL REFERENCES pinned_resources(id) ON DELETE CASCADE,
        document_id BIGINT NOT NULL REFERENCES documents(id) ON DELETE CASCADE,
        PRIMARY KEY (pinned_resources_id, document_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS pinned_resources_link (
        pinned_resources_id UUID NOT NULL REFERENCES pinned_resources(id) ON DELETE CASCADE,
        link_id BIGINT NOT NULL REFERENCES link_uploads(id) ON DELETE CASCADE,
        PRIMARY KEY (pinned_resources_id, link_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS pinned_resources_file (
        pinned_resources_id UUID NOT NULL REFERENCES pinned_resources(id) ON DELETE CASCADE,
        file_id BIGINT NOT NULL REFERENCES file_uploads(id) ON DELETE CASCADE,
        PRIMARY KEY (pinned_resources_id, file_id)
    )
    "#,
];

/// Pinned sets persisted as a parent row plus one junction table per kind
#[derive(Clone)]
pub struct PgPinStore {
    pool: PgPool,
}

impl PgPinStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the pinned resource tables if they are missing
    pub async fn migrate(&self) -> Result<(), StoreError> {
        for statement in SCHEMA {
            sqlx::query(*statement).execute(&self.pool).await?;
        }
        info!("Pinned resource tables ready");
        Ok(())
    }

    /// Which of `ids` the catalog for `kind` no longer holds
    async fn missing_resources(&self, kind: ResourceKind, ids: &[ResourceId]) -> StoreError {
        let sql = format!("SELECT id FROM {} WHERE id = ANY($1)", kind.catalog_table());
        match sqlx::query_scalar::<_, ResourceId>(&sql).bind(ids).fetch_all(&self.pool).await {
            Ok(found) => {
                let missing: Vec<ResourceId> = ids.iter().copied().filter(|id| !found.contains(id)).collect();
                StoreError::MissingResources {
                    kind,
                    // The row may already be back; still name what was asked for
                    ids: if missing.is_empty() { ids.to_vec() } else { missing },
                }
            }
            Err(e) => e.into(),
        }
    }

    async fn load_ids<'e, E>(executor: E, kind: ResourceKind, set_id: Uuid) -> Result<BTreeSet<ResourceId>, StoreError>
    where
        E: sqlx::Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT {col} FROM {table} WHERE pinned_resources_id = $1 ORDER BY {col}",
            col = kind.join_column(),
            table = kind.join_table()
        );
        let ids: Vec<ResourceId> = sqlx::query_scalar(&sql).bind(set_id).fetch_all(executor).await?;
        Ok(ids.into_iter().collect())
    }

    async fn load(tx: &mut Transaction<'_, Postgres>, owner: Uuid) -> Result<Option<PinnedResourceSet>, StoreError> {
        let row = sqlx::query("SELECT id, created_at, updated_at FROM pinned_resources WHERE user_id = $1")
            .bind(owner)
            .fetch_optional(&mut **tx)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let id: Uuid = row.try_get("id")?;
        let created_at: DateTime<Utc> = row.try_get("created_at")?;
        let updated_at: DateTime<Utc> = row.try_get("updated_at")?;

        Ok(Some(PinnedResourceSet {
            id,
            owner,
            documents: Self::load_ids(&mut **tx, ResourceKind::Document, id).await?,
            links: Self::load_ids(&mut **tx, ResourceKind::Link, id).await?,
            files: Self::load_ids(&mut **tx, ResourceKind::File, id).await?,
            created_at,
            updated_at,
        }))
    }
}

#[async_trait]
impl PinStore for PgPinStore {
    async fn find(&self, owner: Uuid) -> Result<Option<PinnedResourceSet>, StoreError> {
        // Parent row and collections are read on one connection
        let mut tx = self.pool.begin().await?;
        let set = Self::load(&mut tx, owner).await?;
        tx.commit().await?;
        Ok(set)
    }

    async fn add(&self, owner: Uuid, additions: &PinnedIds) -> Result<AddOutcome, StoreError> {
        let mut tx = self.pool.begin().await?;

        // xmax is zero only on the row version this statement inserted, so of
        // concurrent first pins exactly one sees created = true
        let (set_id, created): (Uuid, bool) = sqlx::query_as(
            r#"
            INSERT INTO pinned_resources (id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id) DO UPDATE SET updated_at = now()
            RETURNING id, (xmax = 0) AS created
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(owner)
        .fetch_one(&mut *tx)
        .await?;

        for kind in ResourceKind::ALL {
            let ids = additions.get(kind);
            if ids.is_empty() {
                continue;
            }
            let sql = format!(
                "INSERT INTO {table} (pinned_resources_id, {col}) SELECT $1, UNNEST($2::BIGINT[]) ON CONFLICT DO NOTHING",
                table = kind.join_table(),
                col = kind.join_column()
            );
            let inserted = sqlx::query(&sql).bind(set_id).bind(ids).execute(&mut *tx).await;
            let result = match inserted {
                Ok(result) => result,
                Err(sqlx::Error::Database(db_err)) if db_err.is_foreign_key_violation() => {
                    // A catalog row vanished after the ids were resolved
                    tx.rollback().await?;
                    return Err(self.missing_resources(kind, ids).await);
                }
                Err(e) => return Err(e.into()),
            };
            debug!("Pinned {} new {} reference(s) for user {}", result.rows_affected(), kind, owner);
        }

        let set = Self::load(&mut tx, owner)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("No pinned resources for user {}", owner)))?;
        tx.commit().await?;
        if created {
            info!("Created pinned resource set for user {}", owner);
        }
        Ok(AddOutcome { set, created })
    }

    async fn remove(&self, owner: Uuid, kind: ResourceKind, id: ResourceId) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        let set_id: Option<Uuid> = sqlx::query_scalar("SELECT id FROM pinned_resources WHERE user_id = $1")
            .bind(owner)
            .fetch_optional(&mut *tx)
            .await?;
        let set_id = set_id.ok_or_else(|| StoreError::NotFound(format!("No pinned resources for user {}", owner)))?;

        let sql = format!(
            "DELETE FROM {table} WHERE pinned_resources_id = $1 AND {col} = $2",
            table = kind.join_table(),
            col = kind.join_column()
        );
        let result = sqlx::query(&sql).bind(set_id).bind(id).execute(&mut *tx).await?;

        if result.rows_affected() > 0 {
            sqlx::query("UPDATE pinned_resources SET updated_at = now() WHERE id = $1")
                .bind(set_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        DatabaseManager::health_check(&self.pool).await?;
        Ok(())
    }
}

/// Read-only access to the resource tables owned by the document and resource services
#[derive(Clone)]
pub struct PgCatalog {
    pool: PgPool,
}

impl PgCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResourceCatalog for PgCatalog {
    async fn existing(&self, kind: ResourceKind, ids: &[ResourceId]) -> Result<Vec<ResourceId>, StoreError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let sql = format!("SELECT id FROM {} WHERE id = ANY($1)", kind.catalog_table());
        let found: Vec<ResourceId> = sqlx::query_scalar(&sql).bind(ids).fetch_all(&self.pool).await?;
        Ok(found)
    }

    async fn documents(&self, ids: &[ResourceId]) -> Result<Vec<DocumentSummary>, StoreError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let rows = sqlx::query_as::<_, DocumentSummary>(
            "SELECT id, title, resource_type, updated_at FROM documents WHERE id = ANY($1) ORDER BY id",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn links(&self, ids: &[ResourceId]) -> Result<Vec<LinkSummary>, StoreError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let rows = sqlx::query_as::<_, LinkSummary>(
            "SELECT id, title, link, resource_type FROM link_uploads WHERE id = ANY($1) ORDER BY id",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn files(&self, ids: &[ResourceId]) -> Result<Vec<FileSummary>, StoreError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let rows = sqlx::query_as::<_, FileSummary>(
            "SELECT id, file_name, file_upload, resource_type FROM file_uploads WHERE id = ANY($1) ORDER BY id",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

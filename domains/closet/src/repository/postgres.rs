//! Postgres-backed item store
//!
//! Maps the [`ItemStore`] contract onto SQL: the conditional write is a
//! `WHERE status = $expected` guard, counters are adjusted in-database with
//! `GREATEST(.. , 0)`, and the active-execution lock is a conditional
//! insert. Expected DDL lives in `schema.sql` at the crate root.

use async_trait::async_trait;
use sqlx::{PgPool, QueryBuilder, Row};
use uuid::Uuid;

use wardrobe_common::{Cursor, Error, Result};

use crate::domain::entities::{
    ContentItem, Counter, EngagementKind, EngagementRecord, ItemStatus, WorkflowExecution,
    WorkflowOutcome,
};
use crate::repository::{ItemFilter, ItemPage, ItemStore};

const ITEM_COLUMNS: &str = "id, owner_sub, title, raw_media_key, media_key, category, \
     subcategory, tags, coin_value, status, audience, moderation_reason, prior_status, \
     like_count, comment_count, created_at, updated_at";

const EXECUTION_COLUMNS: &str =
    "id, item_id, kind, execution_ref, started_at, completed_at, outcome";

/// Postgres implementation of [`ItemStore`]
#[derive(Clone)]
pub struct PostgresItemStore {
    pool: PgPool,
}

impl PostgresItemStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ItemStore for PostgresItemStore {
    async fn put_item(&self, item: &ContentItem) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO closet_items (id, owner_sub, title, raw_media_key, media_key, category,
                    subcategory, tags, coin_value, status, audience, moderation_reason,
                    prior_status, like_count, comment_count, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            ON CONFLICT (id) DO UPDATE SET
                owner_sub = EXCLUDED.owner_sub, title = EXCLUDED.title,
                raw_media_key = EXCLUDED.raw_media_key, media_key = EXCLUDED.media_key,
                category = EXCLUDED.category, subcategory = EXCLUDED.subcategory,
                tags = EXCLUDED.tags, coin_value = EXCLUDED.coin_value,
                status = EXCLUDED.status, audience = EXCLUDED.audience,
                moderation_reason = EXCLUDED.moderation_reason,
                prior_status = EXCLUDED.prior_status, like_count = EXCLUDED.like_count,
                comment_count = EXCLUDED.comment_count, updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(item.id)
        .bind(&item.owner_sub)
        .bind(&item.title)
        .bind(&item.raw_media_key)
        .bind(&item.media_key)
        .bind(&item.category)
        .bind(&item.subcategory)
        .bind(&item.tags)
        .bind(item.coin_value)
        .bind(item.status)
        .bind(item.audience)
        .bind(&item.moderation_reason)
        .bind(item.prior_status)
        .bind(item.like_count)
        .bind(item.comment_count)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_item(&self, id: Uuid) -> Result<ContentItem> {
        let row = sqlx::query_as::<_, ContentItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM closet_items WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.ok_or_else(|| Error::NotFound(format!("Item {id} not found")))
    }

    async fn update_item_if_status(
        &self,
        expected: ItemStatus,
        item: &ContentItem,
    ) -> Result<ContentItem> {
        let row = sqlx::query_as::<_, ContentItem>(&format!(
            r#"
            UPDATE closet_items SET
                title = $3, raw_media_key = $4, media_key = $5, category = $6,
                subcategory = $7, tags = $8, coin_value = $9, status = $10, audience = $11,
                moderation_reason = $12, prior_status = $13, updated_at = $14
            WHERE id = $1 AND status = $2
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(item.id)
        .bind(expected)
        .bind(&item.title)
        .bind(&item.raw_media_key)
        .bind(&item.media_key)
        .bind(&item.category)
        .bind(&item.subcategory)
        .bind(&item.tags)
        .bind(item.coin_value)
        .bind(item.status)
        .bind(item.audience)
        .bind(&item.moderation_reason)
        .bind(item.prior_status)
        .bind(item.updated_at)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(updated) => Ok(updated),
            None => {
                // Precondition failed or the row is gone; tell them apart
                let current = self.get_item(item.id).await?;
                Err(Error::Conflict(format!(
                    "Item {} is {} (expected {})",
                    item.id, current.status, expected
                )))
            }
        }
    }

    async fn update_item(&self, item: &ContentItem) -> Result<ContentItem> {
        let row = sqlx::query_as::<_, ContentItem>(&format!(
            r#"
            UPDATE closet_items SET
                title = $2, raw_media_key = $3, media_key = $4, category = $5,
                subcategory = $6, tags = $7, coin_value = $8, status = $9, audience = $10,
                moderation_reason = $11, prior_status = $12, updated_at = $13
            WHERE id = $1
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(item.id)
        .bind(&item.title)
        .bind(&item.raw_media_key)
        .bind(&item.media_key)
        .bind(&item.category)
        .bind(&item.subcategory)
        .bind(&item.tags)
        .bind(item.coin_value)
        .bind(item.status)
        .bind(item.audience)
        .bind(&item.moderation_reason)
        .bind(item.prior_status)
        .bind(item.updated_at)
        .fetch_optional(&self.pool)
        .await?;
        row.ok_or_else(|| Error::NotFound(format!("Item {} not found", item.id)))
    }

    async fn adjust_counter(&self, id: Uuid, counter: Counter, delta: i64) -> Result<i64> {
        let column = match counter {
            Counter::Like => "like_count",
            Counter::Comment => "comment_count",
        };
        let row = sqlx::query(&format!(
            r#"
            UPDATE closet_items
            SET {column} = GREATEST({column} + $2, 0), updated_at = NOW()
            WHERE id = $1
            RETURNING {column}
            "#
        ))
        .bind(id)
        .bind(delta)
        .fetch_optional(&self.pool)
        .await?;
        row.map(|r| r.get::<i64, _>(0))
            .ok_or_else(|| Error::NotFound(format!("Item {id} not found")))
    }

    async fn query_items(
        &self,
        filter: &ItemFilter,
        cursor: Option<Cursor>,
        limit: usize,
    ) -> Result<ItemPage> {
        let mut builder: QueryBuilder<sqlx::Postgres> = QueryBuilder::new(format!(
            "SELECT {ITEM_COLUMNS} FROM closet_items WHERE TRUE"
        ));

        if let Some(owner) = &filter.owner_sub {
            builder.push(" AND owner_sub = ").push_bind(owner.clone());
        }
        if let Some(status) = filter.status {
            builder.push(" AND status = ").push_bind(status);
        }
        if let Some(audience) = filter.audience {
            builder.push(" AND audience = ").push_bind(audience);
        }
        if let Some(search) = &filter.search {
            builder
                .push(" AND title ILIKE ")
                .push_bind(format!("%{search}%"));
        }
        if let Some(cursor) = cursor {
            builder
                .push(" AND (created_at, id) < (")
                .push_bind(cursor.created_at)
                .push(", ")
                .push_bind(cursor.id)
                .push(")");
        }

        // One extra row tells us whether a next page exists
        builder
            .push(" ORDER BY created_at DESC, id DESC LIMIT ")
            .push_bind((limit + 1) as i64);

        let mut items: Vec<ContentItem> =
            builder.build_query_as().fetch_all(&self.pool).await?;

        let has_more = items.len() > limit;
        items.truncate(limit);
        let next_cursor = if has_more {
            items
                .last()
                .map(|item| Cursor::new(item.created_at, item.id).encode())
        } else {
            None
        };

        Ok(ItemPage { items, next_cursor })
    }

    async fn create_execution(&self, execution: &WorkflowExecution) -> Result<()> {
        // Conditional insert: the partial unique index on active executions
        // backs this up, but the NOT EXISTS guard gives a clean error
        let result = sqlx::query(
            r#"
            INSERT INTO workflow_executions (id, item_id, kind, execution_ref, started_at,
                    completed_at, outcome)
            SELECT $1, $2, $3, $4, $5, $6, $7
            WHERE NOT EXISTS (
                SELECT 1 FROM workflow_executions
                WHERE item_id = $2 AND kind = $3 AND completed_at IS NULL
            )
            "#,
        )
        .bind(execution.id)
        .bind(execution.item_id)
        .bind(execution.kind)
        .bind(&execution.execution_ref)
        .bind(execution.started_at)
        .bind(execution.completed_at)
        .bind(execution.outcome)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::WorkflowAlreadyActive(format!(
                "{} workflow already active for item {}",
                execution.kind, execution.item_id
            )));
        }
        Ok(())
    }

    async fn bind_execution_ref(&self, id: Uuid, execution_ref: &str) -> Result<()> {
        let result =
            sqlx::query("UPDATE workflow_executions SET execution_ref = $2 WHERE id = $1")
                .bind(id)
                .bind(execution_ref)
                .execute(&self.pool)
                .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("Execution {id} not found")));
        }
        Ok(())
    }

    async fn delete_execution(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM workflow_executions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn find_execution_by_ref(&self, execution_ref: &str) -> Result<WorkflowExecution> {
        let row = sqlx::query_as::<_, WorkflowExecution>(&format!(
            "SELECT {EXECUTION_COLUMNS} FROM workflow_executions WHERE execution_ref = $1"
        ))
        .bind(execution_ref)
        .fetch_optional(&self.pool)
        .await?;
        row.ok_or_else(|| Error::NotFound(format!("Execution {execution_ref} not found")))
    }

    async fn complete_execution(
        &self,
        id: Uuid,
        outcome: WorkflowOutcome,
    ) -> Result<WorkflowExecution> {
        let row = sqlx::query_as::<_, WorkflowExecution>(&format!(
            r#"
            UPDATE workflow_executions
            SET completed_at = COALESCE(completed_at, NOW()),
                outcome = COALESCE(outcome, $2)
            WHERE id = $1
            RETURNING {EXECUTION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(outcome)
        .fetch_optional(&self.pool)
        .await?;
        row.ok_or_else(|| Error::NotFound(format!("Execution {id} not found")))
    }

    async fn list_executions(&self, item_id: Uuid) -> Result<Vec<WorkflowExecution>> {
        let rows = sqlx::query_as::<_, WorkflowExecution>(&format!(
            "SELECT {EXECUTION_COLUMNS} FROM workflow_executions \
             WHERE item_id = $1 ORDER BY started_at DESC"
        ))
        .bind(item_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn append_engagement(&self, record: &EngagementRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO engagement_records (id, item_id, actor_sub, kind, payload, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(record.id)
        .bind(record.item_id)
        .bind(&record.actor_sub)
        .bind(record.kind)
        .bind(&record.payload)
        .bind(record.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn remove_engagement(
        &self,
        item_id: Uuid,
        actor_sub: &str,
        kind: EngagementKind,
    ) -> Result<usize> {
        let result = sqlx::query(
            "DELETE FROM engagement_records WHERE item_id = $1 AND actor_sub = $2 AND kind = $3",
        )
        .bind(item_id)
        .bind(actor_sub)
        .bind(kind)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() as usize)
    }

    async fn list_engagements(&self, item_id: Uuid) -> Result<Vec<EngagementRecord>> {
        let rows = sqlx::query_as::<_, EngagementRecord>(
            "SELECT id, item_id, actor_sub, kind, payload, created_at \
             FROM engagement_records WHERE item_id = $1 ORDER BY created_at DESC",
        )
        .bind(item_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

//! # Postgres store
//!
//! sqlx implementation of the repository ports. Maps relational rows back to
//! the domain models by hand; status columns are stored as their upper-case
//! names.

use std::time::Duration;

use async_trait::async_trait;
use domains::{
    Claim, ClaimRepository, Entity, Item, ItemRepository, ItemStatus, Message, MessageRepository,
    RepoError, RepoResult, Thread, ThreadRepository,
};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use uuid::Uuid;

pub struct PgStore {
    pool: PgPool,
}

fn map_err(err: sqlx::Error) -> RepoError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            RepoError::Conflict(db.message().to_string())
        }
        _ => RepoError::Backend(err.to_string()),
    }
}

fn not_found_unless_touched(rows: u64, entity: Entity, id: Uuid) -> RepoResult<()> {
    if rows == 0 {
        return Err(RepoError::NotFound { entity, id });
    }
    Ok(())
}

impl PgStore {
    /// Connects and applies the embedded migrations.
    pub async fn connect(url: &str, max_connections: u32) -> RepoResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect(url)
            .await
            .map_err(map_err)?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| RepoError::Backend(e.to_string()))?;

        tracing::info!(max_connections, "postgres store ready");
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn row_to_item(row: &PgRow) -> Result<Item, sqlx::Error> {
    let status: String = row.try_get("status")?;
    Ok(Item {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        status: status
            .parse()
            .map_err(|e: String| sqlx::Error::Decode(e.into()))?,
        owner_id: row.try_get("owner_id")?,
        created_at: row.try_get("created_at")?,
    })
}

fn row_to_claim(row: &PgRow) -> Result<Claim, sqlx::Error> {
    let status: String = row.try_get("status")?;
    Ok(Claim {
        id: row.try_get("id")?,
        item_id: row.try_get("item_id")?,
        claimer_id: row.try_get("claimer_id")?,
        finder_id: row.try_get("finder_id")?,
        status: status
            .parse()
            .map_err(|e: String| sqlx::Error::Decode(e.into()))?,
        handed_off: row.try_get("handed_off")?,
        created_at: row.try_get("created_at")?,
    })
}

fn row_to_thread(row: &PgRow) -> Result<Thread, sqlx::Error> {
    Ok(Thread {
        id: row.try_get("id")?,
        claim_id: row.try_get("claim_id")?,
        claimer_id: row.try_get("claimer_id")?,
        finder_id: row.try_get("finder_id")?,
        archived: row.try_get("archived")?,
        hidden: row.try_get("hidden")?,
        created_at: row.try_get("created_at")?,
    })
}

fn row_to_message(row: &PgRow) -> Result<Message, sqlx::Error> {
    Ok(Message {
        id: row.try_get("id")?,
        thread_id: row.try_get("thread_id")?,
        user_id: row.try_get("user_id")?,
        text: row.try_get("text")?,
        created_at: row.try_get("created_at")?,
    })
}

const THREAD_COLUMNS: &str = "id, claim_id, claimer_id, finder_id, archived, hidden, created_at";
const MESSAGE_COLUMNS: &str = "id, thread_id, user_id, text, created_at";

#[async_trait]
impl ItemRepository for PgStore {
    async fn create(&self, item: &Item) -> RepoResult<()> {
        sqlx::query(
            "INSERT INTO items (id, title, description, status, owner_id, created_at) VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(item.id)
        .bind(&item.title)
        .bind(&item.description)
        .bind(item.status.as_str())
        .bind(item.owner_id)
        .bind(item.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Item>> {
        let row = sqlx::query(
            "SELECT id, title, description, status, owner_id, created_at FROM items WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_err)?;

        row.as_ref().map(row_to_item).transpose().map_err(map_err)
    }

    async fn update_status(&self, id: Uuid, status: ItemStatus) -> RepoResult<()> {
        let done = sqlx::query("UPDATE items SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status.as_str())
            .execute(&self.pool)
            .await
            .map_err(map_err)?;
        not_found_unless_touched(done.rows_affected(), Entity::Item, id)
    }
}

#[async_trait]
impl ClaimRepository for PgStore {
    async fn create(&self, claim: &Claim) -> RepoResult<()> {
        sqlx::query(
            "INSERT INTO claims (id, item_id, claimer_id, finder_id, status, handed_off, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(claim.id)
        .bind(claim.item_id)
        .bind(claim.claimer_id)
        .bind(claim.finder_id)
        .bind(claim.status.as_str())
        .bind(claim.handed_off)
        .bind(claim.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Claim>> {
        let row = sqlx::query(
            "SELECT id, item_id, claimer_id, finder_id, status, handed_off, created_at FROM claims WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_err)?;

        row.as_ref().map(row_to_claim).transpose().map_err(map_err)
    }

    async fn update(&self, claim: &Claim, read: &Claim) -> RepoResult<()> {
        let done = sqlx::query(
            "UPDATE claims SET status = $2, handed_off = $3 \
             WHERE id = $1 AND status = $4 AND handed_off = $5",
        )
        .bind(claim.id)
        .bind(claim.status.as_str())
        .bind(claim.handed_off)
        .bind(read.status.as_str())
        .bind(read.handed_off)
        .execute(&self.pool)
        .await
        .map_err(map_err)?;
        if done.rows_affected() > 0 {
            return Ok(());
        }

        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM claims WHERE id = $1)")
            .bind(claim.id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_err)?;
        if exists {
            Err(RepoError::Conflict(format!("claim {} changed concurrently", claim.id)))
        } else {
            Err(RepoError::NotFound { entity: Entity::Claim, id: claim.id })
        }
    }

    async fn list_for_user(&self, user_id: Uuid) -> RepoResult<Vec<Claim>> {
        let rows = sqlx::query(
            "SELECT id, item_id, claimer_id, finder_id, status, handed_off, created_at FROM claims \
             WHERE claimer_id = $1 OR finder_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_err)?;

        rows.iter().map(row_to_claim).collect::<Result<_, _>>().map_err(map_err)
    }
}

#[async_trait]
impl ThreadRepository for PgStore {
    async fn create(&self, thread: &Thread) -> RepoResult<()> {
        sqlx::query(&format!(
            "INSERT INTO threads ({THREAD_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7)"
        ))
        .bind(thread.id)
        .bind(thread.claim_id)
        .bind(thread.claimer_id)
        .bind(thread.finder_id)
        .bind(thread.archived)
        .bind(thread.hidden)
        .bind(thread.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Thread>> {
        let row = sqlx::query(&format!("SELECT {THREAD_COLUMNS} FROM threads WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_err)?;

        row.as_ref().map(row_to_thread).transpose().map_err(map_err)
    }

    async fn find_by_claim(&self, claim_id: Uuid) -> RepoResult<Option<Thread>> {
        let row = sqlx::query(&format!("SELECT {THREAD_COLUMNS} FROM threads WHERE claim_id = $1"))
            .bind(claim_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_err)?;

        row.as_ref().map(row_to_thread).transpose().map_err(map_err)
    }

    async fn set_archived(&self, id: Uuid) -> RepoResult<()> {
        let done = sqlx::query("UPDATE threads SET archived = TRUE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_err)?;
        not_found_unless_touched(done.rows_affected(), Entity::Thread, id)
    }

    async fn set_hidden(&self, id: Uuid) -> RepoResult<()> {
        let done = sqlx::query("UPDATE threads SET hidden = TRUE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_err)?;
        not_found_unless_touched(done.rows_affected(), Entity::Thread, id)
    }

    async fn list_active_for_user(&self, user_id: Uuid) -> RepoResult<Vec<Thread>> {
        let rows = sqlx::query(&format!(
            "SELECT {THREAD_COLUMNS} FROM threads \
             WHERE (claimer_id = $1 OR finder_id = $1) AND NOT archived AND NOT hidden \
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_err)?;

        rows.iter().map(row_to_thread).collect::<Result<_, _>>().map_err(map_err)
    }
}

#[async_trait]
impl MessageRepository for PgStore {
    async fn create(&self, message: &Message) -> RepoResult<()> {
        sqlx::query(&format!(
            "INSERT INTO messages ({MESSAGE_COLUMNS}) VALUES ($1, $2, $3, $4, $5)"
        ))
        .bind(message.id)
        .bind(message.thread_id)
        .bind(message.user_id)
        .bind(&message.text)
        .bind(message.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_err)?;
        Ok(())
    }

    async fn list_before(
        &self,
        thread_id: Uuid,
        before: Option<Uuid>,
        limit: usize,
    ) -> RepoResult<Vec<Message>> {
        let rows = sqlx::query(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages \
             WHERE thread_id = $1 AND ($2::uuid IS NULL OR id < $2) \
             ORDER BY created_at DESC, id DESC LIMIT $3"
        ))
        .bind(thread_id)
        .bind(before)
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(map_err)?;

        rows.iter().map(row_to_message).collect::<Result<_, _>>().map_err(map_err)
    }

    async fn latest(&self, thread_id: Uuid) -> RepoResult<Option<Message>> {
        let row = sqlx::query(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages WHERE thread_id = $1 \
             ORDER BY created_at DESC, id DESC LIMIT 1"
        ))
        .bind(thread_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_err)?;

        row.as_ref().map(row_to_message).transpose().map_err(map_err)
    }
}

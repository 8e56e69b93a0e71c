use crate::{
    config::DbConfig,
    record::{PostRecord, TaskRecord},
};
use noticeboard_common::model::{
    Id,
    post::{CreatePost, Post, PostMarker},
    task::{Task, TaskMarker, TaskText},
};
use sqlx::{
    PgPool, migrate::MigrateError, postgres::PgPoolOptions, query, query_as, query_scalar,
};
use thiserror::Error;
use tracing::{debug, warn};

pub type Result<T, E = DbError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("Could not get a database connection: {0}")]
    Connection(sqlx::Error),
    #[error(transparent)]
    Sqlx(sqlx::Error),
    #[error("Applying migrations failed: {0}")]
    Migrate(#[from] MigrateError),
}

impl DbError {
    #[must_use]
    pub fn is_connection(&self) -> bool {
        matches!(self, DbError::Connection(_))
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => DbError::Connection(err),
            err => DbError::Sqlx(err),
        }
    }
}

/// Handle to the storage backend.
///
/// Every call checks a connection out of the pool for the duration of one
/// statement; it goes back to the pool when the call returns, on error too.
#[derive(Clone, Debug)]
pub struct DbClient {
    pool: PgPool,
}

impl From<PgPool> for DbClient {
    fn from(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl DbClient {
    /// Builds the pool without connecting; the first query opens the first connection.
    #[must_use]
    pub fn new(config: &DbConfig) -> Self {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout())
            .connect_lazy_with(config.connect_options());

        Self::from(pool)
    }

    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!().run(&self.pool).await?;
        Ok(())
    }

    pub async fn fetch_tasks(&self) -> Result<Vec<Task>> {
        let records = query_as::<_, TaskRecord>(
            "
            SELECT
                tasks.id,
                tasks.task,
                tasks.created_at
            FROM
                tasks
            ORDER BY
                tasks.created_at DESC,
                tasks.id DESC
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        let tasks = records
            .into_iter()
            .filter_map(|record| {
                let id = record.id;
                Task::try_from(record)
                    .inspect_err(|err| warn!(id, error = %err, "Skipping invalid task row"))
                    .ok()
            })
            .collect();
        Ok(tasks)
    }

    pub async fn create_task(&self, text: &TaskText) -> Result<Id<TaskMarker>> {
        let id = query_scalar::<_, i64>(
            "
            INSERT INTO tasks (task, created_at)
            VALUES ($1, now() AT TIME ZONE 'UTC')
            RETURNING tasks.id
            ",
        )
        .bind(text.get())
        .fetch_one(&self.pool)
        .await?;

        Ok(id.into())
    }

    /// Returns how many rows were removed; deleting a missing task removes none.
    pub async fn delete_task(&self, id: Id<TaskMarker>) -> Result<u64> {
        let deleted = query(
            "
            DELETE FROM tasks
            WHERE tasks.id = $1
            ",
        )
        .bind(id.get())
        .execute(&self.pool)
        .await?
        .rows_affected();

        debug!(%id, deleted, "Deleted task");
        Ok(deleted)
    }

    pub async fn fetch_posts(&self) -> Result<Vec<Post>> {
        let records = query_as::<_, PostRecord>(
            "
            SELECT
                posts.id,
                posts.title,
                posts.content,
                posts.created_at
            FROM
                posts
            ORDER BY
                posts.created_at DESC,
                posts.id DESC
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        let posts = records
            .into_iter()
            .filter_map(|record| {
                let id = record.id;
                Post::try_from(record)
                    .inspect_err(|err| warn!(id, error = %err, "Skipping invalid post row"))
                    .ok()
            })
            .collect();
        Ok(posts)
    }

    pub async fn create_post(&self, post: &CreatePost) -> Result<Id<PostMarker>> {
        let id = query_scalar::<_, i64>(
            "
            INSERT INTO posts (title, content, created_at)
            VALUES ($1, $2, now() AT TIME ZONE 'UTC')
            RETURNING posts.id
            ",
        )
        .bind(post.title.get())
        .bind(post.content.get())
        .fetch_one(&self.pool)
        .await?;

        Ok(id.into())
    }
}

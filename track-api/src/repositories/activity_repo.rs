use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use super::repo_error::RepositoryError;

const ACTIVITY_COLUMNS: &str =
    "id, category, description, status, started_at, updated_at, finished_at";

#[async_trait]
pub trait ActivityRecordRepository {
    async fn create_activity(&self, activity: &NewDatabaseActivity) -> Result<i64, RepositoryError>;
    async fn update_activity(
        &self,
        activity: &UpdateDatabaseActivity,
    ) -> Result<u64, RepositoryError>;
    async fn delete_activity(&self, id: &i64) -> Result<u64, RepositoryError>;
    async fn get_activity(&self, id: &i64) -> Result<DatabaseActivity, RepositoryError>;
    async fn all_activities(&self) -> Result<Vec<DatabaseActivity>, RepositoryError>;
    async fn activities_by_status(
        &self,
        status: &str,
    ) -> Result<Vec<DatabaseActivity>, RepositoryError>;
    async fn search_activities(&self, term: &str)
        -> Result<Vec<DatabaseActivity>, RepositoryError>;
}

pub struct ActivityRepositoryImpl {
    pool: PgPool,
}

impl ActivityRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct DatabaseActivity {
    pub id: i64,
    pub category: String,
    pub description: String,
    pub status: String,
    pub started_at: time::OffsetDateTime,
    pub updated_at: time::OffsetDateTime,
    pub finished_at: Option<time::OffsetDateTime>,
}

pub struct NewDatabaseActivity {
    pub category: String,
    pub description: String,
    pub started_at: time::OffsetDateTime,
    pub updated_at: time::OffsetDateTime,
}

pub struct UpdateDatabaseActivity {
    pub id: i64,
    pub category: String,
    pub description: String,
    pub status: String,
    pub updated_at: time::OffsetDateTime,
    pub finished_at: Option<time::OffsetDateTime>,
}

/// Wrap `term` for a containment match, escaping LIKE wildcards so the term
/// is matched literally.
pub fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[async_trait]
impl ActivityRecordRepository for ActivityRepositoryImpl {
    async fn create_activity(&self, activity: &NewDatabaseActivity) -> Result<i64, RepositoryError> {
        // status falls back to the column default ('STARTED')
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO activities (category, description, started_at, updated_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&activity.category)
        .bind(&activity.description)
        .bind(activity.started_at)
        .bind(activity.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn update_activity(
        &self,
        activity: &UpdateDatabaseActivity,
    ) -> Result<u64, RepositoryError> {
        let query_result = sqlx::query(
            r#"
            UPDATE activities
            SET category = $1, description = $2, status = $3, updated_at = $4, finished_at = $5
            WHERE id = $6
            "#,
        )
        .bind(&activity.category)
        .bind(&activity.description)
        .bind(&activity.status)
        .bind(activity.updated_at)
        .bind(activity.finished_at)
        .bind(activity.id)
        .execute(&self.pool)
        .await?;

        Ok(query_result.rows_affected())
    }

    async fn delete_activity(&self, id: &i64) -> Result<u64, RepositoryError> {
        let query_result = sqlx::query("DELETE FROM activities WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(query_result.rows_affected())
    }

    async fn get_activity(&self, id: &i64) -> Result<DatabaseActivity, RepositoryError> {
        let activity = sqlx::query_as::<_, DatabaseActivity>(&format!(
            "SELECT {ACTIVITY_COLUMNS} FROM activities WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        activity.ok_or(RepositoryError::NotFound(*id))
    }

    async fn all_activities(&self) -> Result<Vec<DatabaseActivity>, RepositoryError> {
        let activities = sqlx::query_as::<_, DatabaseActivity>(&format!(
            "SELECT {ACTIVITY_COLUMNS} FROM activities ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(activities)
    }

    async fn activities_by_status(
        &self,
        status: &str,
    ) -> Result<Vec<DatabaseActivity>, RepositoryError> {
        let activities = sqlx::query_as::<_, DatabaseActivity>(&format!(
            "SELECT {ACTIVITY_COLUMNS} FROM activities WHERE status = $1 ORDER BY id"
        ))
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(activities)
    }

    async fn search_activities(
        &self,
        term: &str,
    ) -> Result<Vec<DatabaseActivity>, RepositoryError> {
        let activities = sqlx::query_as::<_, DatabaseActivity>(&format!(
            "SELECT {ACTIVITY_COLUMNS} FROM activities \
             WHERE category ILIKE $1 OR description ILIKE $1 \
             ORDER BY id"
        ))
        .bind(like_pattern(term))
        .fetch_all(&self.pool)
        .await?;

        Ok(activities)
    }
}

//! PostgreSQL implementation of the ActivityRepository port.

use std::{str::FromStr, sync::Arc};

use async_trait::async_trait;

use crate::domain::{
    models::{Activity, ActivityId, ActivityStatus, NewActivity},
    ports::outbound::ActivityRepository,
    ActivityError,
};
use crate::repositories::{
    ActivityRecordRepository, ActivityRepositoryImpl, DatabaseActivity, NewDatabaseActivity,
    RepositoryError, UpdateDatabaseActivity,
};

/// Adapter that implements ActivityRepository using PostgreSQL.
pub struct PostgresActivityAdapter<R = ActivityRepositoryImpl> {
    repo: Arc<R>,
}

impl<R> PostgresActivityAdapter<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl<R: ActivityRecordRepository + Send + Sync + 'static> ActivityRepository
    for PostgresActivityAdapter<R>
{
    async fn create(&self, activity: &NewActivity) -> Result<ActivityId, ActivityError> {
        let new_activity = NewDatabaseActivity {
            category: activity.category.clone(),
            description: activity.description.clone(),
            started_at: activity.started_at,
            updated_at: activity.updated_at,
        };

        let id = self
            .repo
            .create_activity(&new_activity)
            .await
            .map_err(to_activity_error)?;

        Ok(ActivityId::new(id))
    }

    async fn update(&self, activity: &Activity) -> Result<u64, ActivityError> {
        let update = UpdateDatabaseActivity {
            id: activity.id.as_i64(),
            category: activity.category.clone(),
            description: activity.description.clone(),
            status: activity.status.as_str().to_string(),
            updated_at: activity.updated_at,
            finished_at: activity.finished_at,
        };

        self.repo
            .update_activity(&update)
            .await
            .map_err(to_activity_error)
    }

    async fn delete(&self, id: &ActivityId) -> Result<u64, ActivityError> {
        self.repo
            .delete_activity(&id.as_i64())
            .await
            .map_err(to_activity_error)
    }

    async fn get(&self, id: &ActivityId) -> Result<Activity, ActivityError> {
        let activity = self
            .repo
            .get_activity(&id.as_i64())
            .await
            .map_err(to_activity_error)?;

        db_activity_to_activity(activity)
    }

    async fn get_all(&self) -> Result<Vec<Activity>, ActivityError> {
        let activities = self
            .repo
            .all_activities()
            .await
            .map_err(to_activity_error)?;

        activities.into_iter().map(db_activity_to_activity).collect()
    }

    async fn get_by_status(
        &self,
        status: ActivityStatus,
    ) -> Result<Vec<Activity>, ActivityError> {
        let activities = match self.repo.activities_by_status(status.as_str()).await {
            Ok(activities) => activities,
            Err(RepositoryError::DatabaseError(sqlx::Error::RowNotFound)) => Vec::new(),
            Err(e) => return Err(to_activity_error(e)),
        };

        activities.into_iter().map(db_activity_to_activity).collect()
    }

    async fn search(&self, term: &str) -> Result<Vec<Activity>, ActivityError> {
        let activities = self
            .repo
            .search_activities(term)
            .await
            .map_err(to_activity_error)?;

        activities.into_iter().map(db_activity_to_activity).collect()
    }
}

fn to_activity_error(err: RepositoryError) -> ActivityError {
    match err {
        RepositoryError::NotFound(id) => ActivityError::NotFound(ActivityId::new(id)),
        RepositoryError::DatabaseError(e) => ActivityError::persistence(e.to_string()),
    }
}

fn db_activity_to_activity(db: DatabaseActivity) -> Result<Activity, ActivityError> {
    let status = ActivityStatus::from_str(&db.status).map_err(|_| {
        ActivityError::Unknown(format!(
            "activity {} has unrecognised status '{}'",
            db.id, db.status
        ))
    })?;

    Ok(Activity {
        id: ActivityId::new(db.id),
        category: db.category,
        description: db.description,
        status,
        started_at: db.started_at,
        updated_at: db.updated_at,
        finished_at: db.finished_at,
    })
}

use std::sync::Arc;

use async_trait::async_trait;
use time::OffsetDateTime;
use tracing::{debug, error, info};

use crate::domain::{
    models::{Activity, ActivityId, ActivityStatus, NewActivity, StartActivityRequest},
    ports::{
        inbound::ActivityService,
        outbound::{ActivityMetrics, ActivityRepository},
    },
    ActivityError, BackgroundTasks,
};

/// Implementation of the ActivityService inbound port.
///
/// Owns the activity state machine (`STARTED --stop--> FINISHED`) and
/// delegates persistence to an ActivityRepository. Metrics are optional and
/// default to the no-op `()` sink.
pub struct ActivityServiceImpl<R, M = ()> {
    repo: Arc<R>,
    metrics: Arc<M>,
    background: BackgroundTasks,
}

impl<R, M> Clone for ActivityServiceImpl<R, M> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            metrics: self.metrics.clone(),
            background: self.background.clone(),
        }
    }
}

impl<R> ActivityServiceImpl<R, ()> {
    pub fn new(repo: Arc<R>) -> Self {
        Self::with_metrics(repo, Arc::new(()))
    }
}

impl<R, M> ActivityServiceImpl<R, M> {
    pub fn with_metrics(repo: Arc<R>, metrics: Arc<M>) -> Self {
        Self {
            repo,
            metrics,
            background: BackgroundTasks::new(),
        }
    }
}

impl<R: ActivityRepository, M: ActivityMetrics> ActivityServiceImpl<R, M> {
    async fn stop(&self, id: &ActivityId) -> Result<Activity, ActivityError> {
        let mut activity = self.repo.get(id).await?;

        if !activity.finish(OffsetDateTime::now_utc()) {
            debug!(id = %activity.id, "activity already finished");
            return Ok(activity);
        }

        self.persist(&activity).await?;
        self.metrics
            .duration_of(&activity.category, activity.started_at);

        info!(id = %activity.id, category = %activity.category, "activity stopped");

        Ok(activity)
    }

    /// Write the mutable fields back, treating a vanished row as not found.
    async fn persist(&self, activity: &Activity) -> Result<(), ActivityError> {
        match self.repo.update(activity).await? {
            0 => Err(ActivityError::NotFound(activity.id)),
            _ => Ok(()),
        }
    }

    /// Stop each activity on its own task, detached from the caller.
    fn stop_in_background(&self, activities: Vec<Activity>) {
        for activity in activities {
            let service = self.clone();
            self.background.spawn(async move {
                if let Err(e) = service.stop(&activity.id).await {
                    error!(id = %activity.id, error = %e, "failed to stop activity in background");
                }
            });
        }
    }
}

#[async_trait]
impl<R: ActivityRepository, M: ActivityMetrics> ActivityService for ActivityServiceImpl<R, M> {
    async fn start_activity(
        &self,
        request: &StartActivityRequest,
    ) -> Result<Activity, ActivityError> {
        let stale = self.repo.get_by_status(ActivityStatus::Started).await?;

        if !stale.is_empty() {
            debug!(count = stale.len(), "stopping stale activities");
            self.stop_in_background(stale);
        }

        let new_activity = NewActivity::new(request, OffsetDateTime::now_utc());
        let id = self.repo.create(&new_activity).await?;

        self.metrics.count(&new_activity.category);

        info!(id = %id, category = %new_activity.category, "activity started");

        Ok(new_activity.into_started(id))
    }

    async fn stop_activity(&self, id: &ActivityId) -> Result<Activity, ActivityError> {
        self.stop(id).await
    }

    async fn update_category(
        &self,
        id: &ActivityId,
        category: &str,
    ) -> Result<Activity, ActivityError> {
        let mut activity = self.repo.get(id).await?;

        if activity.set_category(category, OffsetDateTime::now_utc()) {
            self.persist(&activity).await?;
            info!(id = %activity.id, "activity category updated");
        }

        Ok(activity)
    }

    async fn update_description(
        &self,
        id: &ActivityId,
        description: &str,
    ) -> Result<Activity, ActivityError> {
        let mut activity = self.repo.get(id).await?;

        if activity.set_description(description, OffsetDateTime::now_utc()) {
            self.persist(&activity).await?;
            info!(id = %activity.id, "activity description updated");
        }

        Ok(activity)
    }

    async fn get_activity(&self, id: &ActivityId) -> Result<Activity, ActivityError> {
        self.repo.get(id).await
    }

    async fn list_activities(&self) -> Result<Vec<Activity>, ActivityError> {
        self.repo.get_all().await
    }

    async fn search_activities(&self, term: &str) -> Result<Vec<Activity>, ActivityError> {
        self.repo.search(term).await
    }

    async fn delete_activity(&self, id: &ActivityId) -> Result<ActivityId, ActivityError> {
        match self.repo.delete(id).await? {
            0 => Err(ActivityError::NotFound(*id)),
            _ => {
                info!(id = %id, "activity deleted");
                Ok(*id)
            }
        }
    }

    async fn drain(&self) {
        let pending = self.background.in_flight();
        if pending > 0 {
            info!(pending, "waiting for background stops to finish");
        }

        self.background.drain().await;
    }
}

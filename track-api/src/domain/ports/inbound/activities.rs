use async_trait::async_trait;

use crate::domain::{
    models::{Activity, ActivityId, StartActivityRequest},
    ActivityError,
};

/// Inbound port for activity tracking operations.
///
/// This trait defines the use cases that HTTP handlers can invoke.
/// A single instance is shared by all requests.
#[async_trait]
pub trait ActivityService: Send + Sync + 'static {
    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Start a new activity.
    ///
    /// Any activity that is still running is stopped in the background; the
    /// call returns as soon as the new activity has been created.
    async fn start_activity(
        &self,
        request: &StartActivityRequest,
    ) -> Result<Activity, ActivityError>;

    /// Stop a running activity. Stopping a finished activity is a no-op.
    async fn stop_activity(&self, id: &ActivityId) -> Result<Activity, ActivityError>;

    /// Change the category of an activity in either state.
    async fn update_category(
        &self,
        id: &ActivityId,
        category: &str,
    ) -> Result<Activity, ActivityError>;

    /// Change the description of an activity in either state.
    async fn update_description(
        &self,
        id: &ActivityId,
        description: &str,
    ) -> Result<Activity, ActivityError>;

    // ========================================================================
    // Queries
    // ========================================================================

    async fn get_activity(&self, id: &ActivityId) -> Result<Activity, ActivityError>;

    async fn list_activities(&self) -> Result<Vec<Activity>, ActivityError>;

    async fn search_activities(&self, term: &str) -> Result<Vec<Activity>, ActivityError>;

    // ========================================================================
    // Removal & teardown
    // ========================================================================

    /// Permanently delete an activity, returning its ID.
    async fn delete_activity(&self, id: &ActivityId) -> Result<ActivityId, ActivityError>;

    /// Wait for every background stop started so far to complete.
    ///
    /// Must be awaited before the store is closed.
    async fn drain(&self);
}

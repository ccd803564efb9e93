//! Activity repository port (outbound).
//!
//! Defines the interface for persisting activity records.

use async_trait::async_trait;

use crate::domain::{
    models::{Activity, ActivityId, ActivityStatus, NewActivity},
    ActivityError,
};

/// Outbound port for activity persistence.
///
/// Implementations must be safe for concurrent use; the service performs no
/// locking of its own.
#[async_trait]
pub trait ActivityRepository: Send + Sync + 'static {
    /// Insert a new activity and return its generated ID.
    async fn create(&self, activity: &NewActivity) -> Result<ActivityId, ActivityError>;

    /// Persist the mutable fields of an activity by ID.
    ///
    /// Returns the number of affected rows; 0 means no activity matched.
    async fn update(&self, activity: &Activity) -> Result<u64, ActivityError>;

    /// Permanently remove an activity.
    ///
    /// Returns the number of affected rows; 0 means no activity matched.
    async fn delete(&self, id: &ActivityId) -> Result<u64, ActivityError>;

    /// Point lookup, failing with [`ActivityError::NotFound`] when absent.
    async fn get(&self, id: &ActivityId) -> Result<Activity, ActivityError>;

    /// All activities. Ordering is not part of the contract.
    async fn get_all(&self) -> Result<Vec<Activity>, ActivityError>;

    /// All activities currently in `status`.
    async fn get_by_status(&self, status: ActivityStatus)
        -> Result<Vec<Activity>, ActivityError>;

    /// Case-insensitive substring match against category or description.
    async fn search(&self, term: &str) -> Result<Vec<Activity>, ActivityError>;
}

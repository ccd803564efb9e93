//! HTTP response types for the activity endpoints.

use serde::Serialize;
use time::OffsetDateTime;

use crate::domain::models::{Activity, ActivityId, ActivityStatus};

/// A single activity as returned by the API.
#[derive(Debug, Serialize)]
pub struct ActivityResponse {
    pub id: ActivityId,
    pub category: String,
    pub description: String,
    pub status: ActivityStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    /// Set once the activity is stopped.
    #[serde(with = "time::serde::rfc3339::option")]
    pub finished_at: Option<OffsetDateTime>,
}

impl From<Activity> for ActivityResponse {
    fn from(activity: Activity) -> Self {
        Self {
            id: activity.id,
            category: activity.category,
            description: activity.description,
            status: activity.status,
            started_at: activity.started_at,
            updated_at: activity.updated_at,
            finished_at: activity.finished_at,
        }
    }
}

pub fn activity_responses(activities: Vec<Activity>) -> Vec<ActivityResponse> {
    activities.into_iter().map(ActivityResponse::from).collect()
}

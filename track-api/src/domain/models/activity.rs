use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};
use time::OffsetDateTime;

use super::ActivityId;

/// Lifecycle state of an activity.
///
/// Persisted as text, and the persisted column is the source of truth.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityStatus {
    #[strum(serialize = "STARTED")]
    Started,
    #[strum(serialize = "FINISHED")]
    Finished,
}

impl ActivityStatus {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

/// A tracked time span with category/description metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activity {
    pub id: ActivityId,
    pub category: String,
    pub description: String,
    pub status: ActivityStatus,
    pub started_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub finished_at: Option<OffsetDateTime>,
}

impl Activity {
    pub fn is_finished(&self) -> bool {
        self.status == ActivityStatus::Finished
    }

    /// Transition to FINISHED at `now`.
    ///
    /// Returns `false` (and leaves the activity untouched) if it was already finished.
    pub fn finish(&mut self, now: OffsetDateTime) -> bool {
        if self.is_finished() {
            return false;
        }

        self.status = ActivityStatus::Finished;
        self.finished_at = Some(now);
        self.updated_at = now;
        true
    }

    /// Returns `true` if the category changed.
    pub fn set_category(&mut self, category: &str, now: OffsetDateTime) -> bool {
        if self.category == category {
            return false;
        }

        self.category = category.to_owned();
        self.updated_at = now;
        true
    }

    /// Returns `true` if the description changed.
    pub fn set_description(&mut self, description: &str, now: OffsetDateTime) -> bool {
        if self.description == description {
            return false;
        }

        self.description = description.to_owned();
        self.updated_at = now;
        true
    }
}

/// An activity that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewActivity {
    pub category: String,
    pub description: String,
    pub started_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl NewActivity {
    pub fn new(request: &StartActivityRequest, now: OffsetDateTime) -> Self {
        Self {
            category: request.category.clone(),
            description: request.description.clone(),
            started_at: now,
            updated_at: now,
        }
    }

    /// The persisted form of this activity once the store has assigned `id`.
    pub fn into_started(self, id: ActivityId) -> Activity {
        Activity {
            id,
            category: self.category,
            description: self.description,
            status: ActivityStatus::Started,
            started_at: self.started_at,
            updated_at: self.updated_at,
            finished_at: None,
        }
    }
}

/// Request to start a new activity.
#[derive(Debug, Clone)]
pub struct StartActivityRequest {
    pub category: String,
    pub description: String,
}

impl StartActivityRequest {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

//! In-memory test doubles for the outbound ports.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::domain::{
    models::{Activity, ActivityId, ActivityStatus, NewActivity},
    ports::outbound::{ActivityMetrics, ActivityRepository},
    ActivityError,
};

/// Mock activity repository backed by an in-memory map.
///
/// Clones share state, so a test can keep a handle for assertions after
/// handing one to the service.
#[derive(Clone, Default)]
pub struct MockActivityRepository {
    activities: Arc<RwLock<BTreeMap<ActivityId, Activity>>>,
    last_id: Arc<AtomicI64>,
    updates: Arc<AtomicUsize>,
    fail_status_lookups: Arc<AtomicBool>,
    fail_updates: Arc<AtomicBool>,
    vanish_on_update: Arc<AtomicBool>,
}

#[allow(dead_code)]
impl MockActivityRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the repository. New IDs continue after the highest seeded one.
    pub fn with_activities(self, activities: Vec<Activity>) -> Self {
        {
            let mut stored = self.activities.write().unwrap();
            for activity in activities {
                self.last_id
                    .fetch_max(activity.id.as_i64(), Ordering::SeqCst);
                stored.insert(activity.id, activity);
            }
        }
        self
    }

    pub fn fail_status_lookups(&self, fail: bool) {
        self.fail_status_lookups.store(fail, Ordering::SeqCst);
    }

    pub fn fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }

    /// Make every update find its row already deleted.
    pub fn vanish_on_update(&self, vanish: bool) {
        self.vanish_on_update.store(vanish, Ordering::SeqCst);
    }

    /// Number of successful update calls that matched a row.
    pub fn update_count(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    pub fn all_activities(&self) -> Vec<Activity> {
        self.activities.read().unwrap().values().cloned().collect()
    }
}

#[async_trait]
impl ActivityRepository for MockActivityRepository {
    async fn create(&self, activity: &NewActivity) -> Result<ActivityId, ActivityError> {
        // suspend once, as a real round trip would
        tokio::task::yield_now().await;

        let id = ActivityId::new(self.last_id.fetch_add(1, Ordering::SeqCst) + 1);
        let stored = activity.clone().into_started(id);
        self.activities.write().unwrap().insert(id, stored);
        Ok(id)
    }

    async fn update(&self, activity: &Activity) -> Result<u64, ActivityError> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(ActivityError::persistence("update failed"));
        }

        let mut activities = self.activities.write().unwrap();
        if self.vanish_on_update.load(Ordering::SeqCst) {
            activities.remove(&activity.id);
        }

        match activities.get_mut(&activity.id) {
            Some(stored) => {
                stored.category = activity.category.clone();
                stored.description = activity.description.clone();
                stored.status = activity.status;
                stored.updated_at = activity.updated_at;
                stored.finished_at = activity.finished_at;
                self.updates.fetch_add(1, Ordering::SeqCst);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&self, id: &ActivityId) -> Result<u64, ActivityError> {
        let removed = self.activities.write().unwrap().remove(id);
        Ok(removed.map_or(0, |_| 1))
    }

    async fn get(&self, id: &ActivityId) -> Result<Activity, ActivityError> {
        self.activities
            .read()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or(ActivityError::NotFound(*id))
    }

    async fn get_all(&self) -> Result<Vec<Activity>, ActivityError> {
        Ok(self.all_activities())
    }

    async fn get_by_status(
        &self,
        status: ActivityStatus,
    ) -> Result<Vec<Activity>, ActivityError> {
        if self.fail_status_lookups.load(Ordering::SeqCst) {
            return Err(ActivityError::persistence("connection refused"));
        }

        Ok(self
            .all_activities()
            .into_iter()
            .filter(|a| a.status == status)
            .collect())
    }

    async fn search(&self, term: &str) -> Result<Vec<Activity>, ActivityError> {
        let term = term.to_lowercase();
        Ok(self
            .all_activities()
            .into_iter()
            .filter(|a| {
                a.category.to_lowercase().contains(&term)
                    || a.description.to_lowercase().contains(&term)
            })
            .collect())
    }
}

/// Metrics sink that remembers which categories were reported.
#[derive(Default)]
pub struct RecordingMetrics {
    counts: Mutex<Vec<String>>,
    durations: Mutex<Vec<String>>,
}

impl RecordingMetrics {
    pub fn counts(&self) -> Vec<String> {
        self.counts.lock().unwrap().clone()
    }

    pub fn durations(&self) -> Vec<String> {
        self.durations.lock().unwrap().clone()
    }
}

impl ActivityMetrics for RecordingMetrics {
    fn count(&self, category: &str) {
        self.counts.lock().unwrap().push(category.to_string());
    }

    fn duration_of(&self, category: &str, _started_at: OffsetDateTime) {
        self.durations.lock().unwrap().push(category.to_string());
    }
}

mod activity_metrics;
mod activity_repository;

pub use activity_metrics::*;
pub use activity_repository::*;

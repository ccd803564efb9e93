mod activity_repo;
mod repo_error;

pub use activity_repo::*;
pub use repo_error::RepositoryError;

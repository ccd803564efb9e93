mod activities;

pub use activities::PostgresActivityAdapter;

mod activities;

pub use activities::*;

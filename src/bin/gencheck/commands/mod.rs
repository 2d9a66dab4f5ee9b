//! Command implementations

pub mod completions;
pub mod config;
pub mod restore;
pub mod run;
pub mod variations;

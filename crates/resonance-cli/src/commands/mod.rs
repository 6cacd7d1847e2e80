//! CLI command handlers
//!
//! - `run`: `run-all` and `run <STEP>...` with the shared session flags
//! - `list`: built-in step names

pub mod list;
pub mod run;

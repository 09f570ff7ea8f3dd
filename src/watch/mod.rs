// src/watch/mod.rs

//! File watching.
//!
//! This module is responsible for:
//! - Keeping the set of currently known files ([`WatchedFileSet`]).
//! - Wiring up a cross-platform filesystem watcher (`notify`) that reports
//!   the initial file set, a one-time ready signal, and later changes as
//!   [`crate::engine::RuntimeEvent`]s.
//!
//! It does **not** decide when to build; that is the engine's job.

pub mod watched_set;
pub mod watcher;

pub use watched_set::WatchedFileSet;
pub use watcher::{WatchOptions, WatcherHandle, spawn_watcher, translate_event};

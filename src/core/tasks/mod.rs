// src/core/tasks/mod.rs

//! Long-running background tasks supporting the integration, run by hosts that keep a
//! process alive between page renders.

pub mod cache_sweeper;

//! Core: configuration, background tasks and the engine
//!
//! - [`Config`] - environment configuration
//! - [`BackgroundTasks`] - timer task manager
//! - [`PosEngine`] - composition root holding all domain state
//! - [`seed::demo_engine`] - engine with demo data

pub mod config;
pub mod engine;
pub mod seed;
pub mod tasks;

pub use config::Config;
pub use engine::PosEngine;
pub use tasks::BackgroundTasks;

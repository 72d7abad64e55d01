//! Test result normalization for the AscendDev tester images.
//!
//! A [`strategy::LanguageStrategy`] per language prepares the execution
//! directory, describes the sandbox container, and turns whatever the run
//! left behind (`results.json`, stderr, stdout) into a
//! [`ascend_common::TestResult`] that always carries at least one named case.

pub mod config;
pub mod container;
pub mod diagnostics;
pub mod fallback;
pub mod files;
pub mod pipeline;
pub mod reconcile;
pub mod report;
pub mod strategies;
pub mod strategy;


pub use config::LanguageConfigManager;
pub use container::ContainerConfig;
pub use pipeline::ExecutionArtifacts;
pub use strategy::{LanguageStrategy, StrategyRegistry, StrategySettings};

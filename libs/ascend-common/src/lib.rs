pub mod types;
pub mod config;

// Re-export commonly used types for convenience
pub use types::{
    Language, Lesson, PerformanceMetrics, TestCase, TestCaseResult, TestConfig, TestResult,
};
pub use config::Config;

// CLI commands over the tester strategies
use anyhow::{Context, Result};
use ascend_common::types::{Lesson, TestResult};
use ascend_tester::{ContainerConfig, ExecutionArtifacts, LanguageStrategy, StrategyRegistry};
use std::path::Path;
use tracing::info;
use uuid::Uuid;

async fn load_lesson(path: &Path) -> Result<Lesson> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read lesson {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse lesson {}", path.display()))
}

/// Missing capture files read as empty output
async fn read_capture(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display())),
        None => Ok(String::new()),
    }
}

async fn strategy_for<'a>(
    registry: &'a StrategyRegistry,
    lesson_path: &Path,
) -> Result<(&'a dyn LanguageStrategy, Lesson)> {
    let lesson = load_lesson(lesson_path).await?;
    let strategy = registry.get_strategy(&lesson.language)?;
    Ok((strategy, lesson))
}

pub fn container_name() -> String {
    format!("ascenddev-exec-{}", Uuid::new_v4().simple())
}

pub fn list_languages(registry: &StrategyRegistry) -> Vec<String> {
    registry
        .strategies()
        .map(|s| {
            format!(
                "{:<12} {} (default timeout {}ms)",
                s.language(),
                s.image(),
                s.settings().image_default_timeout_ms
            )
        })
        .collect()
}

pub async fn prepare(
    registry: &StrategyRegistry,
    lesson_path: &Path,
    code_path: &Path,
    dir: &Path,
) -> Result<()> {
    let (strategy, lesson) = strategy_for(registry, lesson_path).await?;
    let user_code = tokio::fs::read_to_string(code_path)
        .await
        .with_context(|| format!("Failed to read submission {}", code_path.display()))?;

    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    strategy.prepare_test_files(dir, &user_code, &lesson).await?;

    info!(language = %strategy.language(), dir = %dir.display(), "Execution directory ready");
    Ok(())
}

pub async fn container_config(
    registry: &StrategyRegistry,
    lesson_path: &Path,
    dir: &Path,
    name: Option<String>,
) -> Result<ContainerConfig> {
    let (strategy, lesson) = strategy_for(registry, lesson_path).await?;
    let name = name.unwrap_or_else(container_name);

    Ok(strategy.create_container_config(&name, dir, &lesson))
}

pub async fn process(
    registry: &StrategyRegistry,
    lesson_path: &Path,
    dir: &Path,
    stdout_file: Option<&Path>,
    stderr_file: Option<&Path>,
    exit_code: i64,
    elapsed_ms: u64,
) -> Result<TestResult> {
    let (strategy, lesson) = strategy_for(registry, lesson_path).await?;
    let stdout = read_capture(stdout_file).await?;
    let stderr = read_capture(stderr_file).await?;

    let artifacts = ExecutionArtifacts {
        stdout: &stdout,
        stderr: &stderr,
        exit_code,
        execution_time_ms: elapsed_ms,
        execution_dir: dir,
    };

    Ok(strategy
        .process_execution_result(artifacts, &lesson.test_config)
        .await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ascend_common::Config;
    use ascend_tester::LanguageConfigManager;

    fn registry() -> StrategyRegistry {
        let config = Config {
            keep_raw_results: false,
            ..Config::default()
        };
        StrategyRegistry::with_defaults(&config, &LanguageConfigManager::default())
    }

    fn write_lesson(dir: &Path, language: &str) -> std::path::PathBuf {
        let path = dir.join("lesson.json");
        let lesson = serde_json::json!({
            "id": "l1",
            "title": "Sum",
            "language": language,
            "testConfig": {
                "testTemplate": "from solution import add",
                "timeoutMs": 5000,
                "memoryLimitMb": 64,
                "testCases": [{ "name": "adds two numbers", "input": [1, 2], "expectedOutput": 3 }]
            }
        });
        std::fs::write(&path, lesson.to_string()).unwrap();
        path
    }

    #[test]
    fn test_container_name_format() {
        let name = container_name();
        assert!(name.starts_with("ascenddev-exec-"));
        assert_eq!(name.len(), "ascenddev-exec-".len() + 32);
    }

    #[test]
    fn test_list_languages() {
        let lines = list_languages(&registry());
        assert_eq!(lines.len(), 4);
        assert!(lines.iter().any(|l| l.contains("jhypki/ascenddev-python-tester:latest")));
    }

    #[tokio::test]
    async fn test_prepare_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let lesson = write_lesson(tmp.path(), "python");
        let code = tmp.path().join("code.py");
        std::fs::write(&code, "def add(a, b):\n    return a + b\n").unwrap();
        let exec_dir = tmp.path().join("exec");

        prepare(&registry(), &lesson, &code, &exec_dir).await.unwrap();

        assert!(exec_dir.join("solution.py").exists());
        assert_eq!(
            std::fs::read_to_string(exec_dir.join("test_solution.py")).unwrap(),
            "from solution import add"
        );
    }

    #[tokio::test]
    async fn test_container_config_uses_lesson_limits() {
        let tmp = tempfile::tempdir().unwrap();
        let lesson = write_lesson(tmp.path(), "go");

        let container = container_config(&registry(), &lesson, tmp.path(), Some("exec-1".to_string()))
            .await
            .unwrap();

        assert_eq!(container.name, "exec-1");
        assert_eq!(container.memory_bytes, 64 * 1024 * 1024);
        assert_eq!(container.image, "jhypki/ascenddev-go-tester:latest");
    }

    #[tokio::test]
    async fn test_process_without_results() {
        let tmp = tempfile::tempdir().unwrap();
        let lesson = write_lesson(tmp.path(), "python");
        let stderr = tmp.path().join("stderr.txt");
        std::fs::write(&stderr, "ImportError: cannot import name 'add'\n").unwrap();

        let result = process(&registry(), &lesson, tmp.path(), None, Some(&stderr), 1, 800)
            .await
            .unwrap();

        assert!(!result.success);
        assert_eq!(result.test_results[0].test_name, "Execution Error");
        assert_eq!(result.test_results[0].message, "ImportError: cannot import name 'add'");
    }

    #[tokio::test]
    async fn test_unsupported_language() {
        let tmp = tempfile::tempdir().unwrap();
        let lesson = write_lesson(tmp.path(), "cobol");

        let err = container_config(&registry(), &lesson, tmp.path(), None)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Language 'cobol' is not supported");
    }
}

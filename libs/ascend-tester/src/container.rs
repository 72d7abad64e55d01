/// Sandbox launch descriptor
///
/// The core never starts containers itself. It only describes them: image,
/// resource ceilings, the execution-directory bind mount and the entrypoint.
/// The orchestrator hands `to_bollard()` straight to `create_container`.
use ascend_common::types::Lesson;
use bollard::container::{Config, CreateContainerOptions};
use bollard::models::HostConfig;
use serde::Serialize;
use std::path::Path;

/// In-container path the execution directory is mounted at
pub const CONTAINER_TEST_DIR: &str = "/app/test";
pub const CONTAINER_WORKING_DIR: &str = "/app";
/// Run script baked into every tester image
pub const RUN_TESTS_SCRIPT: &str = "/app/run-tests.sh";

const BYTES_PER_MB: i64 = 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerConfig {
    pub image: String,
    pub name: String,
    pub memory_bytes: i64,
    /// Always equal to `memory_bytes`: swap is disabled
    pub memory_swap_bytes: i64,
    pub binds: Vec<String>,
    pub working_dir: String,
    pub cmd: Vec<String>,
    /// Containers are kept after exit so logs can be inspected; removal is the orchestrator's job
    pub auto_remove: bool,
    pub user: String,
    pub tty: bool,
    pub attach_stdout: bool,
    pub attach_stderr: bool,
}

impl ContainerConfig {
    /// Build the descriptor shared by all tester images
    pub fn for_lesson(image: &str, container_name: &str, execution_dir: &Path, lesson: &Lesson) -> Self {
        let memory_bytes = memory_limit_bytes(lesson.test_config.memory_limit_mb);

        Self {
            image: image.to_string(),
            name: container_name.to_string(),
            memory_bytes,
            memory_swap_bytes: memory_bytes,
            binds: vec![format!("{}:{}", execution_dir.display(), CONTAINER_TEST_DIR)],
            working_dir: CONTAINER_WORKING_DIR.to_string(),
            cmd: vec!["sh".to_string(), "-c".to_string(), RUN_TESTS_SCRIPT.to_string()],
            auto_remove: false,
            user: "root".to_string(),
            tty: false,
            attach_stdout: true,
            attach_stderr: true,
        }
    }

    /// Lower into the Docker API types
    pub fn to_bollard(&self) -> (CreateContainerOptions<String>, Config<String>) {
        let options = CreateContainerOptions {
            name: self.name.clone(),
            platform: None,
        };

        let config = Config {
            image: Some(self.image.clone()),
            cmd: Some(self.cmd.clone()),
            working_dir: Some(self.working_dir.clone()),
            user: Some(self.user.clone()),
            tty: Some(self.tty),
            attach_stdout: Some(self.attach_stdout),
            attach_stderr: Some(self.attach_stderr),
            host_config: Some(HostConfig {
                memory: Some(self.memory_bytes),
                memory_swap: Some(self.memory_swap_bytes),
                auto_remove: Some(self.auto_remove),
                binds: Some(self.binds.clone()),
                ..Default::default()
            }),
            ..Default::default()
        };

        (options, config)
    }
}

fn memory_limit_bytes(memory_limit_mb: u64) -> i64 {
    i64::try_from(memory_limit_mb)
        .unwrap_or(i64::MAX)
        .saturating_mul(BYTES_PER_MB)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ascend_common::types::TestConfig;

    fn lesson(memory_limit_mb: u64) -> Lesson {
        Lesson {
            language: "go".to_string(),
            test_config: TestConfig {
                memory_limit_mb,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_memory_and_swap_match() {
        let config = ContainerConfig::for_lesson(
            "tester:latest",
            "ascenddev-exec-1",
            Path::new("/tmp/exec/1"),
            &lesson(128),
        );

        assert_eq!(config.memory_bytes, 128 * 1024 * 1024);
        assert_eq!(config.memory_swap_bytes, config.memory_bytes);
        assert!(!config.auto_remove);
        assert_eq!(config.binds, vec!["/tmp/exec/1:/app/test".to_string()]);
        assert_eq!(config.cmd, vec!["sh", "-c", "/app/run-tests.sh"]);
        assert_eq!(config.working_dir, "/app");
        assert_eq!(config.user, "root");
    }

    #[test]
    fn test_to_bollard() {
        let config = ContainerConfig::for_lesson(
            "tester:latest",
            "ascenddev-exec-2",
            Path::new("/work/2"),
            &lesson(64),
        );
        let (options, docker_config) = config.to_bollard();

        assert_eq!(options.name, "ascenddev-exec-2");
        assert_eq!(docker_config.image.as_deref(), Some("tester:latest"));

        let host = docker_config.host_config.unwrap();
        assert_eq!(host.memory, Some(64 * 1024 * 1024));
        assert_eq!(host.memory_swap, host.memory);
        assert_eq!(host.auto_remove, Some(false));
        assert_eq!(host.binds.unwrap(), vec!["/work/2:/app/test".to_string()]);
    }

    #[test]
    fn test_memory_limit_saturates() {
        assert_eq!(memory_limit_bytes(u64::MAX), i64::MAX);
    }
}

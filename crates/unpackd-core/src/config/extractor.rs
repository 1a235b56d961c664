//! External extraction tool configuration.

use serde::{Deserialize, Serialize};

/// How to invoke the archive extraction tool.
///
/// Arguments are templates: `{input}` is replaced with the archive path and
/// `{output_dir}` with the job's output directory. When a password is given,
/// `password_arg` (with `{password}` substituted) is inserted directly before
/// the first argument that references `{input}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Executable name or path.
    #[serde(default = "default_command")]
    pub command: String,
    /// Argument template.
    #[serde(default = "default_args")]
    pub args: Vec<String>,
    /// Password argument template.
    #[serde(default = "default_password_arg")]
    pub password_arg: String,
    /// Copy the executable into the staging bin directory and mark it
    /// executable before use (for platforms that mount the tool noexec).
    #[serde(default)]
    pub stage_binary: bool,
    /// Maximum number of stderr characters kept in a failed job's detail.
    #[serde(default = "default_stderr_limit")]
    pub stderr_limit: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            command: default_command(),
            args: default_args(),
            password_arg: default_password_arg(),
            stage_binary: false,
            stderr_limit: default_stderr_limit(),
        }
    }
}

fn default_command() -> String {
    "7za".to_string()
}

fn default_args() -> Vec<String> {
    vec![
        "x".to_string(),
        "-y".to_string(),
        "-o{output_dir}".to_string(),
        "{input}".to_string(),
    ]
}

fn default_password_arg() -> String {
    "-p{password}".to_string()
}

fn default_stderr_limit() -> usize {
    4000
}

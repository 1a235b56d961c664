//! Runs an external archive tool (7-Zip by default) as a child process.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info, warn};

use unpackd_core::config::ExtractorConfig;
use unpackd_core::traits::extractor::{ExtractError, ExtractRequest, Extractor};

/// Extractor backed by a command-line tool.
#[derive(Debug, Clone)]
pub struct CommandExtractor {
    /// Executable to launch.
    program: PathBuf,
    /// Argument template.
    args: Vec<String>,
    /// Password argument template.
    password_arg: String,
    /// Maximum stderr characters kept in a failure.
    stderr_limit: usize,
}

impl CommandExtractor {
    /// Build an extractor that launches `config.command` as given.
    pub fn new(config: &ExtractorConfig) -> Self {
        Self {
            program: PathBuf::from(&config.command),
            args: config.args.clone(),
            password_arg: config.password_arg.clone(),
            stderr_limit: config.stderr_limit,
        }
    }

    /// Build an extractor that runs a private copy of the tool placed in
    /// `bin_dir` with the executable bit set. Needed where the tool ships on
    /// a mount that does not allow execution.
    pub async fn staged(config: &ExtractorConfig, bin_dir: &Path) -> Result<Self, ExtractError> {
        let source = resolve_program(&config.command).ok_or_else(|| ExtractError::Launch {
            command: config.command.clone(),
            source: std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "executable not found on PATH",
            ),
        })?;
        let file_name = source.file_name().ok_or_else(|| ExtractError::Launch {
            command: config.command.clone(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a file path"),
        })?;

        tokio::fs::create_dir_all(bin_dir).await?;
        let target = bin_dir.join(file_name);
        tokio::fs::copy(&source, &target).await?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(&target, std::fs::Permissions::from_mode(0o755)).await?;
        }

        info!(
            source = %source.display(),
            target = %target.display(),
            "Staged extractor binary"
        );

        let mut extractor = Self::new(config);
        extractor.program = target;
        Ok(extractor)
    }

    /// The executable that will be launched.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Substitute the template for one request.
    ///
    /// The password argument, if any, goes directly before the first
    /// argument that names the input archive.
    pub fn build_args(&self, request: &ExtractRequest<'_>) -> Vec<String> {
        let input = request.archive.to_string_lossy();
        let output_dir = request.output_dir.to_string_lossy();

        let mut args: Vec<String> = self
            .args
            .iter()
            .map(|arg| {
                arg.replace("{input}", &input)
                    .replace("{output_dir}", &output_dir)
            })
            .collect();

        if let Some(password) = request.password.filter(|p| !p.is_empty()) {
            let position = self
                .args
                .iter()
                .position(|arg| arg.contains("{input}"))
                .unwrap_or(args.len());
            args.insert(position, self.password_arg.replace("{password}", password));
        }

        args
    }
}

#[async_trait]
impl Extractor for CommandExtractor {
    fn name(&self) -> &str {
        self.program
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("extractor")
    }

    async fn extract(&self, request: ExtractRequest<'_>) -> Result<(), ExtractError> {
        let args = self.build_args(&request);
        debug!(
            program = %self.program.display(),
            archive = %request.archive.display(),
            output_dir = %request.output_dir.display(),
            "Launching extractor"
        );

        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| ExtractError::Launch {
                command: self.program.display().to_string(),
                source,
            })?;

        if output.status.success() {
            return Ok(());
        }

        let code = output.status.code().unwrap_or(-1);
        let stderr: String = String::from_utf8_lossy(&output.stderr)
            .trim()
            .chars()
            .take(self.stderr_limit)
            .collect();
        warn!(
            program = %self.program.display(),
            code,
            "Extractor exited with failure"
        );
        Err(ExtractError::Failed { code, stderr })
    }
}

/// Locate `command` the way a shell would: used as-is when it contains a
/// path separator, otherwise looked up in `PATH`.
fn resolve_program(command: &str) -> Option<PathBuf> {
    let direct = Path::new(command);
    if direct.components().count() > 1 {
        return direct.is_file().then(|| direct.to_path_buf());
    }
    let path = std::env::var_os("PATH")?;
    std::env::split_paths(&path)
        .map(|dir| dir.join(command))
        .find(|candidate| candidate.is_file())
}

//! Shell command runner.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::{debug, instrument};

use stubforge_core::{
    application::{
        ApplicationError,
        ports::{CommandOutput, CommandRunner},
    },
    error::StubforgeResult,
};

/// Runs command lines through the platform shell (`sh -c`, or `cmd /C`).
#[derive(Debug, Clone, Default)]
pub struct ShellRunner {
    cwd: Option<PathBuf>,
}

impl ShellRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_dir(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: Some(cwd.into()),
        }
    }

    fn command(&self, line: &str) -> Command {
        let mut cmd = if cfg!(target_os = "windows") {
            let mut c = Command::new("cmd");
            c.args(["/C", line]);
            c
        } else {
            let mut c = Command::new("sh");
            c.args(["-c", line]);
            c
        };
        if let Some(cwd) = &self.cwd {
            cmd.current_dir(cwd);
        }
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }
}

impl CommandRunner for ShellRunner {
    #[instrument(skip(self))]
    fn run(&self, command: &str) -> StubforgeResult<CommandOutput> {
        let output = self.command(command).output().map_err(|e| {
            ApplicationError::ShellCommandFailed {
                command: command.to_owned(),
                output: format!("Failed to execute command: {e}"),
            }
        })?;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            if !text.is_empty() && !text.ends_with('\n') {
                text.push('\n');
            }
            text.push_str(&stderr);
        }

        let code = output.status.code().unwrap_or(-1);
        debug!(code, "command finished");
        Ok(CommandOutput {
            code,
            output: text.trim().to_owned(),
        })
    }
}

use crate::error::{ExecCause, Result};
use crate::model::{CommandInvocation, Streams};
use std::process::{Command, Stdio};
use tracing::debug;

/// Runs external commands on behalf of the pipeline.
pub trait Commander {
    /// Run `cmd` to completion and return its standard output.
    fn output(&mut self, cmd: &CommandInvocation) -> Result<String>;

    /// Run `cmd` to completion with its streams wired as `streams` says.
    fn run(&mut self, streams: Streams, cmd: &CommandInvocation) -> Result<()>;
}

/// Spawns real OS processes.
#[derive(Debug, Default)]
pub struct SystemCommander;

impl Commander for SystemCommander {
    /// stderr is inherited rather than captured, so the tool's own
    /// diagnostics still reach the operator.
    fn output(&mut self, cmd: &CommandInvocation) -> Result<String> {
        debug!(command = %cmd, "capturing output");
        let output = Command::new(&cmd.program)
            .args(&cmd.args)
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()
            .map_err(|e| cmd.failed(ExecCause::Spawn(e)))?;

        if !output.status.success() {
            return Err(cmd.failed(ExecCause::Exit {
                code: output.status.code(),
            }));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn run(&mut self, streams: Streams, cmd: &CommandInvocation) -> Result<()> {
        debug!(command = %cmd, ?streams, "running");
        let mut command = Command::new(&cmd.program);
        command.args(&cmd.args);
        if streams == Streams::Detached {
            command
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null());
        }

        let status = command
            .status()
            .map_err(|e| cmd.failed(ExecCause::Spawn(e)))?;
        if !status.success() {
            return Err(cmd.failed(ExecCause::Exit {
                code: status.code(),
            }));
        }
        Ok(())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::error::Error;

    fn sh(script: &str) -> CommandInvocation {
        CommandInvocation::new("sh", ["-c", script])
    }

    #[test]
    fn output_returns_stdout() {
        let out = SystemCommander.output(&sh("echo dev; echo prod")).unwrap();
        assert_eq!(out, "dev\nprod\n");
    }

    #[test]
    fn output_ignores_stderr() {
        let out = SystemCommander.output(&sh("echo oops >&2; echo ok")).unwrap();
        assert_eq!(out, "ok\n");
    }

    #[test]
    fn non_zero_exit_is_exec_failed() {
        let cmd = sh("exit 3");
        let err = SystemCommander.output(&cmd).unwrap_err();
        match err {
            Error::ExecFailed {
                command,
                args,
                cause: ExecCause::Exit { code },
            } => {
                assert_eq!(command, "sh");
                assert_eq!(args, cmd.args);
                assert_eq!(code, Some(3));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_program_is_spawn_failure() {
        let cmd = CommandInvocation::new("kubedebug-no-such-program", Vec::<String>::new());
        let err = SystemCommander.run(Streams::Detached, &cmd).unwrap_err();
        assert!(matches!(
            err,
            Error::ExecFailed {
                cause: ExecCause::Spawn(_),
                ..
            }
        ));
    }

    #[test]
    fn detached_run_reports_exit_status() {
        SystemCommander.run(Streams::Detached, &sh("true")).unwrap();
        let err = SystemCommander.run(Streams::Detached, &sh("false")).unwrap_err();
        assert!(matches!(
            err,
            Error::ExecFailed {
                cause: ExecCause::Exit { code: Some(1) },
                ..
            }
        ));
    }
}

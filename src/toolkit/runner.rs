//! Child process execution
//!
//! The runner takes a tool command line plus a separate argument list. The
//! command line is split with POSIX shell-word rules, so a tool path quoted
//! with `quote_path` survives spaces and special characters intact.

use crate::error::{ActionError, ActionResult};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

/// Options for a spawned process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecOptions {
    /// Working directory of the child
    pub cwd: PathBuf,
}

impl ExecOptions {
    pub fn in_dir(cwd: impl Into<PathBuf>) -> Self {
        Self { cwd: cwd.into() }
    }
}

/// Spawns a command and waits for it to finish
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run `command_line` followed by `args`, inheriting stdout/stderr.
    ///
    /// Resolves once the child exits with status 0; any other exit is an error.
    async fn exec(&self, command_line: &str, args: &[String], opts: &ExecOptions)
        -> ActionResult<()>;
}

/// Wrap an executable path in double quotes so it is a single command-line token
pub fn quote_path(path: &Path) -> String {
    let raw = path.to_string_lossy();
    let mut quoted = String::with_capacity(raw.len() + 2);
    quoted.push('"');
    for c in raw.chars() {
        if matches!(c, '"' | '\\' | '$' | '`') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

/// Split a command line into program and leading arguments
pub(crate) fn split_command_line(command_line: &str) -> ActionResult<(String, Vec<String>)> {
    let mut words =
        shell_words::split(command_line).map_err(|e| ActionError::CommandParse {
            command: command_line.to_string(),
            reason: e.to_string(),
        })?;

    if words.is_empty() {
        return Err(ActionError::CommandParse {
            command: command_line.to_string(),
            reason: "command is empty".to_string(),
        });
    }

    let program = words.remove(0);
    Ok((program, words))
}

/// Process runner backed by `tokio::process`
#[derive(Debug, Default)]
pub struct TokioProcessRunner;

impl TokioProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn exec(
        &self,
        command_line: &str,
        args: &[String],
        opts: &ExecOptions,
    ) -> ActionResult<()> {
        let (program, mut full_args) = split_command_line(command_line)?;
        full_args.extend(args.iter().cloned());

        let rendered = if args.is_empty() {
            command_line.to_string()
        } else {
            format!("{} {}", command_line, args.join(" "))
        };
        info!("[command]{}", rendered);
        debug!("Working directory: {}", opts.cwd.display());

        let status = Command::new(&program)
            .args(&full_args)
            .current_dir(&opts.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| ActionError::command_failed(rendered.clone(), e))?;

        match status.code() {
            Some(0) => Ok(()),
            Some(code) => Err(ActionError::ProcessExit {
                command: rendered,
                code,
            }),
            None => Err(ActionError::ProcessSignaled(rendered)),
        }
    }
}

//! Environment variable export and step outputs
//!
//! On GitHub Actions, variables exported by a step are appended to the file
//! named by `$GITHUB_ENV` and outputs to `$GITHUB_OUTPUT`. Outside of a
//! runner those files are absent and only the current process sees the
//! exported variable.

use crate::error::{ActionError, ActionResult};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

const GITHUB_ENV: &str = "GITHUB_ENV";
const GITHUB_OUTPUT: &str = "GITHUB_OUTPUT";

/// Exports variables to the current process and later CI steps
pub trait EnvExporter: Send + Sync {
    /// Set `name=value` for this process, its children and following steps
    fn export_variable(&self, name: &str, value: &str) -> ActionResult<()>;

    /// Publish a step output
    fn set_output(&self, name: &str, value: &str) -> ActionResult<()>;
}

/// Exporter speaking the GitHub Actions file-command protocol
#[derive(Debug, Default)]
pub struct GithubEnvExporter {
    env_file: Option<PathBuf>,
    output_file: Option<PathBuf>,
}

impl GithubEnvExporter {
    /// Pick up the command files from the runner environment
    pub fn from_env() -> Self {
        Self {
            env_file: std::env::var_os(GITHUB_ENV).map(PathBuf::from),
            output_file: std::env::var_os(GITHUB_OUTPUT).map(PathBuf::from),
        }
    }

    /// Use explicit command files
    pub fn with_files(env_file: Option<PathBuf>, output_file: Option<PathBuf>) -> Self {
        Self {
            env_file,
            output_file,
        }
    }
}

impl EnvExporter for GithubEnvExporter {
    fn export_variable(&self, name: &str, value: &str) -> ActionResult<()> {
        debug!("Exporting {}={}", name, value);
        std::env::set_var(name, value);

        if let Some(ref path) = self.env_file {
            append_command(path, name, value)?;
        }
        Ok(())
    }

    fn set_output(&self, name: &str, value: &str) -> ActionResult<()> {
        debug!("Setting output {}={}", name, value);
        match self.output_file {
            Some(ref path) => append_command(path, name, value),
            None => Ok(()),
        }
    }
}

/// Append one `key=value` entry, switching to the heredoc form for multi-line values
fn append_command(path: &Path, name: &str, value: &str) -> ActionResult<()> {
    let entry = format_command(name, value);
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| ActionError::io(format!("opening {}", path.display()), e))?;
    file.write_all(entry.as_bytes())
        .map_err(|e| ActionError::io(format!("writing {}", path.display()), e))
}

fn format_command(name: &str, value: &str) -> String {
    if !value.contains('\n') && !value.contains('\r') {
        return format!("{name}={value}\n");
    }

    let mut delimiter = String::from("ghadelimiter");
    while value.contains(&delimiter) {
        delimiter.push('_');
    }
    format!("{name}<<{delimiter}\n{value}\n{delimiter}\n")
}

/// Print a failure as a workflow error annotation when running on GitHub Actions
pub fn annotate_error(message: &str) {
    if std::env::var("GITHUB_ACTIONS").as_deref() == Ok("true") {
        let escaped = message
            .replace('%', "%25")
            .replace('\r', "%0D")
            .replace('\n', "%0A");
        println!("::error::{}", escaped);
    }
}

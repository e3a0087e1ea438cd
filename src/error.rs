//! Error types for npm-install
//!
//! All modules use `ActionResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for npm-install operations
pub type ActionResult<T> = Result<T, ActionError>;

/// All errors that can occur while installing dependencies
#[derive(Error, Debug)]
pub enum ActionError {
    // Tool errors
    #[error("Executable not found: {name} ({reason})")]
    ExecutableNotFound { name: String, reason: String },

    // Process errors
    #[error("Command failed: {command}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command exited with non-zero status: {command}, exit code: {code}")]
    ProcessExit { command: String, code: i32 },

    #[error("Process terminated by signal: {0}")]
    ProcessSignaled(String),

    #[error("Could not parse command line {command:?}: {reason}")]
    CommandParse { command: String, reason: String },

    // Project errors
    #[error("No package.json or lockfile found in {0}")]
    ManifestNotFound(PathBuf),

    // Cache errors
    #[error("Failed to restore cache {key}: {reason}")]
    CacheRestore { key: String, reason: String },

    #[error("Failed to save cache {key}: {reason}")]
    CacheSave { key: String, reason: String },

    #[error("None of the cache paths exist: {}", format_paths(.0))]
    CachePathsMissing(Vec<PathBuf>),

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

fn format_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl ActionError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandFailed {
            command: command.into(),
            source,
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::ExecutableNotFound { name, .. } if name == "yarn" => {
                Some("Install Yarn first, e.g. run: corepack enable")
            }
            Self::ExecutableNotFound { .. } => {
                Some("Set up Node.js before this step, e.g. with actions/setup-node")
            }
            Self::ManifestNotFound(_) => Some("Check the working-directory input"),
            Self::CachePathsMissing(_) => {
                Some("The install did not populate the package manager cache folder")
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn process_exit_display() {
        let err = ActionError::ProcessExit {
            command: "\"/usr/bin/npm\" ci".to_string(),
            code: 1,
        };
        assert_eq!(
            err.to_string(),
            "Command exited with non-zero status: \"/usr/bin/npm\" ci, exit code: 1"
        );
    }

    #[test]
    fn missing_paths_lists_every_path() {
        let err = ActionError::CachePathsMissing(vec![
            PathBuf::from("/a"),
            PathBuf::from("/b"),
        ]);
        assert!(err.to_string().ends_with("/a, /b"));
        assert!(err.hint().is_some());
    }

    #[test]
    fn hint_absent_for_exit_failure() {
        let err = ActionError::ProcessExit {
            command: "npm".to_string(),
            code: 2,
        };
        assert_eq!(err.hint(), None);
    }
}

//! Recording fakes for the toolkit traits
//!
//! Every fake writes into one shared `CallLog`, so tests can assert both
//! which calls happened and in what order.

use super::{EnvExporter, ExecOptions, ExecutableResolver, ProcessRunner};
use crate::error::{ActionError, ActionResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// A single recorded collaborator call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Which(String),
    Export { name: String, value: String },
    Output { name: String, value: String },
    Exec {
        command: String,
        args: Vec<String>,
        cwd: PathBuf,
    },
    Restore,
    Install,
    Save,
}

/// Ordered log shared between fakes
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<Call>>>);

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, call: Call) {
        self.0.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().unwrap().clone()
    }

    /// Number of recorded calls matching `pred`
    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| pred(c)).count()
    }

    /// Index of the first call matching `pred`
    pub fn position(&self, pred: impl Fn(&Call) -> bool) -> Option<usize> {
        self.calls().iter().position(pred)
    }
}

pub struct FakeResolver {
    log: CallLog,
    known: HashMap<String, PathBuf>,
}

impl FakeResolver {
    pub fn new(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            known: HashMap::new(),
        }
    }

    pub fn with(mut self, name: &str, path: &str) -> Self {
        self.known.insert(name.to_string(), PathBuf::from(path));
        self
    }
}

#[async_trait]
impl ExecutableResolver for FakeResolver {
    async fn which(&self, name: &str) -> ActionResult<PathBuf> {
        self.log.push(Call::Which(name.to_string()));
        self.known
            .get(name)
            .cloned()
            .ok_or_else(|| ActionError::ExecutableNotFound {
                name: name.to_string(),
                reason: "not on PATH".to_string(),
            })
    }
}

pub struct FakeExporter {
    log: CallLog,
}

impl FakeExporter {
    pub fn new(log: &CallLog) -> Self {
        Self { log: log.clone() }
    }
}

impl EnvExporter for FakeExporter {
    fn export_variable(&self, name: &str, value: &str) -> ActionResult<()> {
        self.log.push(Call::Export {
            name: name.to_string(),
            value: value.to_string(),
        });
        Ok(())
    }

    fn set_output(&self, name: &str, value: &str) -> ActionResult<()> {
        self.log.push(Call::Output {
            name: name.to_string(),
            value: value.to_string(),
        });
        Ok(())
    }
}

pub struct FakeRunner {
    log: CallLog,
    exit_code: i32,
}

impl FakeRunner {
    pub fn new(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            exit_code: 0,
        }
    }

    pub fn failing(log: &CallLog, exit_code: i32) -> Self {
        Self {
            log: log.clone(),
            exit_code,
        }
    }
}

#[async_trait]
impl ProcessRunner for FakeRunner {
    async fn exec(
        &self,
        command_line: &str,
        args: &[String],
        opts: &ExecOptions,
    ) -> ActionResult<()> {
        self.log.push(Call::Exec {
            command: command_line.to_string(),
            args: args.to_vec(),
            cwd: opts.cwd.clone(),
        });
        if self.exit_code == 0 {
            Ok(())
        } else {
            Err(ActionError::ProcessExit {
                command: command_line.to_string(),
                code: self.exit_code,
            })
        }
    }
}

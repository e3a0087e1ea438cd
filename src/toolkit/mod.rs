//! CI toolkit primitives
//!
//! Narrow interfaces over the pieces of the CI platform this action talks to:
//! - process execution (`ProcessRunner`)
//! - executable lookup on `PATH` (`ExecutableResolver`)
//! - exporting environment variables and step outputs (`EnvExporter`)
//!
//! Each trait has one real implementation here and a recording fake under
//! `toolkit::fake` for tests.

mod env;
#[cfg(test)]
pub(crate) mod fake;
mod resolver;
mod runner;

pub use env::{annotate_error, EnvExporter, GithubEnvExporter};
pub use resolver::{ExecutableResolver, PathResolver};
pub use runner::{quote_path, ExecOptions, ProcessRunner, TokioProcessRunner};

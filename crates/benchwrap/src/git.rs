//! Git bridge: revision queries and working-tree checkout
//!
//! Shells out to the `git` CLI in the repository's working directory.

use std::path::{Path, PathBuf};

use crate::error::{BenchError, BenchResult};
use crate::process::{self, CommandFailure};

/// The three version-control operations a run needs.
pub trait VersionControl {
    /// Name of the position checked out right now, suitable for checking
    /// it out again later.
    fn current_position(&self) -> BenchResult<String>;

    /// Full, unambiguous commit id for a revision token.
    fn resolve(&self, rev: &str) -> BenchResult<String>;

    /// Switch the working tree to `target`.
    fn checkout(&self, target: &str) -> BenchResult<()>;
}

/// `git` CLI in a fixed working directory.
pub struct GitRepo {
    working_dir: PathBuf,
    program: String,
}

impl GitRepo {
    pub fn new(working_dir: impl AsRef<Path>) -> Self {
        Self {
            working_dir: working_dir.as_ref().to_path_buf(),
            program: "git".to_string(),
        }
    }

    fn run_git(&self, args: &[&str]) -> Result<String, CommandFailure> {
        process::run(&self.program, args, &self.working_dir).map(|out| out.stdout_text())
    }
}

impl VersionControl for GitRepo {
    fn current_position(&self) -> BenchResult<String> {
        let name = self
            .run_git(&["name-rev", "--name-only", "HEAD"])
            .map_err(|source| BenchError::Resolution {
                rev: "HEAD".into(),
                source,
            })?;
        let name = name.trim();
        if name.is_empty() || name == "undefined" {
            return Err(BenchError::InvalidRevision {
                rev: "HEAD".into(),
                reason: "git cannot name the current position",
            });
        }
        Ok(name.to_string())
    }

    fn resolve(&self, rev: &str) -> BenchResult<String> {
        if rev.starts_with('-') {
            return Err(BenchError::InvalidRevision {
                rev: rev.into(),
                reason: "revision must not start with '-'",
            });
        }
        let id = self
            .run_git(&["rev-parse", "--verify", &format!("{rev}^{{commit}}")])
            .map_err(|source| BenchError::Resolution {
                rev: rev.into(),
                source,
            })?;
        let id = id.trim();
        if id.is_empty() {
            return Err(BenchError::InvalidRevision {
                rev: rev.into(),
                reason: "git returned an empty id",
            });
        }
        Ok(id.to_string())
    }

    fn checkout(&self, target: &str) -> BenchResult<()> {
        self.run_git(&["checkout", target])
            .map(|_| ())
            .map_err(|source| BenchError::Checkout {
                target: target.into(),
                source,
            })
    }
}

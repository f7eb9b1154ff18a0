//! Benchmark runner
//!
//! Runs `go test` with regular tests disabled and collects its raw output.
//! The output is never parsed; the comparison tool reads it as-is.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::RunConfig;
use crate::error::{BenchError, BenchResult};
use crate::process::{self, CommandFailure};
use crate::revision::Revision;

/// A tool that runs a filtered set of benchmarks once.
pub trait BenchRunner {
    /// Run the benchmarks matching `pattern` in `packages` once and return
    /// stdout and stderr interleaved in write order, minus one trailing newline.
    fn run_once(
        &self,
        packages: &str,
        pattern: &str,
        extra_flags: &[String],
    ) -> Result<Vec<u8>, CommandFailure>;
}

/// `go test -bench` in a fixed working directory.
pub struct GoTest {
    program: String,
    working_dir: PathBuf,
}

impl GoTest {
    pub fn new(program: impl Into<String>, working_dir: impl AsRef<Path>) -> Self {
        Self {
            program: program.into(),
            working_dir: working_dir.as_ref().to_path_buf(),
        }
    }

    /// Arguments for one invocation. `-run=^$` matches no test, so only
    /// benchmarks execute.
    pub fn args(packages: &str, pattern: &str, extra_flags: &[String]) -> Vec<String> {
        let mut args = vec![
            "test".to_string(),
            packages.to_string(),
            "-run=^$".to_string(),
            format!("-bench={pattern}"),
        ];
        args.extend(extra_flags.iter().cloned());
        args
    }
}

impl BenchRunner for GoTest {
    fn run_once(
        &self,
        packages: &str,
        pattern: &str,
        extra_flags: &[String],
    ) -> Result<Vec<u8>, CommandFailure> {
        let args = Self::args(packages, pattern, extra_flags);
        process::run_combined(&self.program, &args, &self.working_dir)
    }
}

/// Run the benchmarks `config.count` times against the checked-out tree,
/// appending each result to `rev`. Stops at the first failed run.
pub fn collect<B: BenchRunner + ?Sized>(
    runner: &B,
    config: &RunConfig,
    rev: &mut Revision,
) -> BenchResult<()> {
    for iteration in 1..=config.count {
        let raw = runner
            .run_once(&config.packages, &config.bench, &config.test_flags)
            .map_err(|source| BenchError::Run {
                rev: rev.name.clone(),
                iteration,
                count: config.count,
                source,
            })?;
        debug!(
            "{} run {iteration}/{}:\n{}",
            rev.name,
            config.count,
            String::from_utf8_lossy(&raw)
        );
        rev.record_run(&raw);
    }
    Ok(())
}

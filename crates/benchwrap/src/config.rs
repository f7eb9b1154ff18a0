//! Run configuration
//!
//! Built once from the command line, then read-only for the rest of the run.

use crate::error::{BenchError, BenchResult};

/// Revisions compared when `previous_vs_current` is set.
pub const PREVIOUS_VS_CURRENT: [&str; 2] = ["HEAD~1", "HEAD"];

/// Options forwarded to the comparison tool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompareOptions {
    /// Pass `-html`
    pub html: bool,
    /// Pass `-delta-test <name>`
    pub delta_test: Option<String>,
}

/// Everything a run needs to know, fixed for the process lifetime.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Regexp selecting benchmarks (`go test -bench`)
    pub bench: String,
    /// Benchmark invocations per revision
    pub count: usize,
    /// Package scope handed to `go test`
    pub packages: String,
    /// Extra flags appended to every `go test` invocation
    pub test_flags: Vec<String>,
    pub compare: CompareOptions,
    /// Revision tokens in the order given
    pub revisions: Vec<String>,
    /// Compare `HEAD~1` against `HEAD`, ignoring `revisions`
    pub previous_vs_current: bool,
    pub verbose: bool,
    /// Benchmark runner program
    pub go_program: String,
    /// Comparison tool program
    pub benchstat_program: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            bench: ".".to_string(),
            count: 10,
            packages: ".".to_string(),
            test_flags: Vec::new(),
            compare: CompareOptions::default(),
            revisions: Vec::new(),
            previous_vs_current: false,
            verbose: false,
            go_program: "go".to_string(),
            benchstat_program: "benchstat".to_string(),
        }
    }
}

impl RunConfig {
    /// Apply `BENCHWRAP_GO` and `BENCHWRAP_BENCHSTAT` overrides.
    pub fn apply_env(&mut self) {
        if let Ok(program) = std::env::var("BENCHWRAP_GO") {
            if !program.is_empty() {
                self.go_program = program;
            }
        }
        if let Ok(program) = std::env::var("BENCHWRAP_BENCHSTAT") {
            if !program.is_empty() {
                self.benchstat_program = program;
            }
        }
    }

    /// Split a quoted flag string (`-gt-flags "-cpu 1,4 -benchmem"`) into
    /// individual arguments.
    pub fn set_test_flags(&mut self, raw: &str) -> BenchResult<()> {
        self.test_flags = shlex::split(raw).ok_or_else(|| {
            BenchError::config(format!("unbalanced quotes in go test flags: {raw}"))
        })?;
        Ok(())
    }

    /// Revision tokens this run will benchmark, in order.
    pub fn targets(&self) -> Vec<String> {
        if self.previous_vs_current {
            PREVIOUS_VS_CURRENT.iter().map(|s| s.to_string()).collect()
        } else {
            self.revisions.clone()
        }
    }

    pub fn validate(&self) -> BenchResult<()> {
        if self.count == 0 {
            return Err(BenchError::config("benchmark count must be at least 1"));
        }
        if self.bench.is_empty() {
            return Err(BenchError::config("benchmark pattern must not be empty"));
        }
        if self.packages.is_empty() {
            return Err(BenchError::config("package scope must not be empty"));
        }
        if self.targets().is_empty() {
            return Err(BenchError::config("no revisions given"));
        }
        Ok(())
    }
}

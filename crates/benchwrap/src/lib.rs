//! Benchwrap: Go benchmarks across git revisions
//!
//! For each requested revision the working tree is checked out and
//! `go test -bench` runs a fixed number of times. The collected output is
//! handed to `benchstat`, and its comparison is printed under a header
//! naming the revisions. The original checkout is restored afterwards,
//! whether or not the run succeeded.
//!
//! # Usage
//!
//! ```bash
//! # Run all Foo benchmarks 10 times for a tag, a commit and a branch
//! benchwrap -n 10 --bench=Foo v0.42 cdd48c8a master
//!
//! # Compare the previous commit against the current one
//! benchwrap --h-vs-h1
//! ```

pub mod bench;
pub mod config;
pub mod error;
pub mod git;
pub mod orchestrator;
pub mod process;
pub mod report;
pub mod revision;
pub mod worktree;

pub use bench::{BenchRunner, GoTest};
pub use config::{CompareOptions, RunConfig};
pub use error::{BenchError, BenchResult};
pub use git::{GitRepo, VersionControl};
pub use orchestrator::run;
pub use report::{Benchstat, Comparator};
pub use revision::Revision;

//! Run orchestrator
//!
//! One run, start to finish:
//!
//! ```text
//! comparator check → remember position → resolve revisions
//!     → for each revision: checkout, N benchmark runs
//!     → write result files → compare → print report
//!     → remove temp dir → restore position
//! ```
//!
//! The first failure ends the run. The temporary directory and the working
//! tree are cleaned up on every path, the tree last.

use std::io::Write;

use tracing::{debug, warn};

use crate::bench::{self, BenchRunner};
use crate::config::RunConfig;
use crate::error::{BenchError, BenchResult};
use crate::git::VersionControl;
use crate::report::{self, Comparator, ReportDir};
use crate::revision;
use crate::worktree::WorkingTree;

/// Benchmark every requested revision and write the comparison report to
/// `out` in a single write.
pub fn run<V, B, C, W>(
    config: &RunConfig,
    vcs: &V,
    runner: &B,
    comparator: &C,
    out: &mut W,
) -> BenchResult<()>
where
    V: VersionControl + ?Sized,
    B: BenchRunner + ?Sized,
    C: Comparator + ?Sized,
    W: Write + ?Sized,
{
    config.validate()?;
    comparator.ensure_available()?;

    if config.previous_vs_current && !config.revisions.is_empty() {
        warn!(
            ignored = ?config.revisions,
            "comparing HEAD~1 against HEAD; positional revisions ignored"
        );
    }

    let mut tree = WorkingTree::acquire(vcs)?;
    let mut revisions = revision::resolve_all(vcs, &config.targets())?;

    for rev in revisions.iter_mut() {
        debug!(rev = %rev.name, id = %rev.canonical_id, "benchmarking");
        tree.checkout(rev)?;
        bench::collect(runner, config, rev)?;
    }

    let dir = ReportDir::create()?;
    let files = dir.persist(&mut revisions)?;
    let comparison = comparator.compare(&files)?;

    let report = report::compose(&revisions, &comparison);
    out.write_all(&report)
        .and_then(|()| out.flush())
        .map_err(BenchError::Output)?;

    dir.close();
    tree.restore();
    Ok(())
}

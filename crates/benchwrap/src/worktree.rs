//! Working tree handle
//!
//! The checked-out tree is the one piece of shared state a run mutates.
//! [`WorkingTree`] remembers where it started and puts it back exactly once:
//! either through [`WorkingTree::restore`] or, on any early return, when the
//! handle is dropped. A failed restore is logged and never replaces the
//! error that ended the run.

use tracing::{debug, warn};

use crate::error::BenchResult;
use crate::git::VersionControl;
use crate::revision::Revision;

pub struct WorkingTree<'a, V: VersionControl + ?Sized> {
    vcs: &'a V,
    original: String,
    restored: bool,
}

impl<'a, V: VersionControl + ?Sized> WorkingTree<'a, V> {
    /// Remember the current position. Fails if it cannot be named, since
    /// there would be nothing to restore to.
    pub fn acquire(vcs: &'a V) -> BenchResult<Self> {
        let original = vcs.current_position()?;
        debug!(original = %original, "working tree acquired");
        Ok(Self {
            vcs,
            original,
            restored: false,
        })
    }

    /// Position the tree will be restored to.
    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn checkout(&mut self, rev: &Revision) -> BenchResult<()> {
        self.vcs.checkout(&rev.canonical_id)
    }

    /// Check the original position out again.
    pub fn restore(mut self) {
        self.restore_once();
    }

    fn restore_once(&mut self) {
        if self.restored {
            return;
        }
        self.restored = true;
        if let Err(e) = self.vcs.checkout(&self.original) {
            warn!(original = %self.original, "cannot restore working tree: {e}");
        }
    }
}

impl<V: VersionControl + ?Sized> Drop for WorkingTree<'_, V> {
    fn drop(&mut self) {
        self.restore_once();
    }
}

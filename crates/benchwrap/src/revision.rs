//! Revisions under benchmark
//!
//! A [`Revision`] is created per requested token, resolved to a commit id
//! straight away, and then accumulates raw benchmark output until it is
//! written to disk for the comparison tool.

use std::path::PathBuf;

use crate::error::BenchResult;
use crate::git::VersionControl;

/// Characters of the commit id used as the result file name.
pub const SHORT_ID_LEN: usize = 5;

/// One revision to benchmark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision {
    /// Token as given by the user (tag, branch or hash)
    pub name: String,
    /// Full commit id from git
    pub canonical_id: String,
    /// Leading characters of `canonical_id`
    pub short_id: String,
    /// Concatenated raw output of every benchmark run so far
    pub output: Vec<u8>,
    /// Where `output` was written for the comparison tool
    pub output_path: Option<PathBuf>,
}

impl Revision {
    pub fn new(name: impl Into<String>, canonical_id: impl Into<String>) -> Self {
        let canonical_id = canonical_id.into();
        Self {
            name: name.into(),
            short_id: short_id(&canonical_id).to_string(),
            canonical_id,
            output: Vec::new(),
            output_path: None,
        }
    }

    /// Resolve `name` against version control.
    pub fn resolve<V: VersionControl + ?Sized>(vcs: &V, name: &str) -> BenchResult<Self> {
        let id = vcs.resolve(name)?;
        Ok(Self::new(name, id))
    }

    /// Append one run's output, no separator.
    pub fn record_run(&mut self, raw: &[u8]) {
        self.output.extend_from_slice(raw);
    }
}

/// First [`SHORT_ID_LEN`] characters of `id`, or all of it if shorter.
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(SHORT_ID_LEN) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}

/// Resolve every token, in order. The first failure aborts.
pub fn resolve_all<V: VersionControl + ?Sized>(
    vcs: &V,
    names: &[String],
) -> BenchResult<Vec<Revision>> {
    names
        .iter()
        .map(|name| Revision::resolve(vcs, name))
        .collect()
}

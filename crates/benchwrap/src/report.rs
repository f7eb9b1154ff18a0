//! Report builder
//!
//! Persists each revision's output to a private temporary directory, runs
//! the comparison tool over those files and composes the final report:
//! a header naming the revisions, a blank line, the tool's output, and a
//! trailing blank line.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, warn};

use crate::config::CompareOptions;
use crate::error::{BenchError, BenchResult};
use crate::process;
use crate::revision::Revision;

/// Statistics tool comparing per-revision benchmark files.
pub trait Comparator {
    /// Fail if the tool cannot be found. Checked before anything else runs.
    fn ensure_available(&self) -> BenchResult<()>;

    /// Compare `files`, one per revision in input order.
    fn compare(&self, files: &[PathBuf]) -> BenchResult<Vec<u8>>;
}

/// `benchstat` from golang.org/x/perf.
pub struct Benchstat {
    program: String,
    options: CompareOptions,
    working_dir: PathBuf,
}

impl Benchstat {
    pub fn new(
        program: impl Into<String>,
        options: CompareOptions,
        working_dir: impl AsRef<Path>,
    ) -> Self {
        Self {
            program: program.into(),
            options,
            working_dir: working_dir.as_ref().to_path_buf(),
        }
    }

    pub fn args(options: &CompareOptions, files: &[PathBuf]) -> Vec<String> {
        let mut args = Vec::with_capacity(files.len() + 3);
        if options.html {
            args.push("-html".to_string());
        }
        if let Some(test) = &options.delta_test {
            args.push("-delta-test".to_string());
            args.push(test.clone());
        }
        args.extend(files.iter().map(|f| f.display().to_string()));
        args
    }
}

impl Comparator for Benchstat {
    fn ensure_available(&self) -> BenchResult<()> {
        match process::find_executable(&self.program) {
            Some(path) => {
                debug!("using {}", path.display());
                Ok(())
            }
            None => Err(BenchError::ToolMissing {
                tool: self.program.clone(),
            }),
        }
    }

    fn compare(&self, files: &[PathBuf]) -> BenchResult<Vec<u8>> {
        let args = Self::args(&self.options, files);
        process::run_combined(&self.program, &args, &self.working_dir).map_err(|source| {
            BenchError::ToolFailed {
                tool: self.program.clone(),
                source,
            }
        })
    }
}

/// Private temporary directory holding one result file per revision.
pub struct ReportDir {
    dir: TempDir,
}

impl ReportDir {
    pub fn create() -> BenchResult<Self> {
        let dir = tempfile::Builder::new()
            .prefix("bw")
            .tempdir()
            .map_err(|e| {
                BenchError::storage("create temporary directory in", std::env::temp_dir(), e)
            })?;
        debug!("results in {}", dir.path().display());
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write each revision's output to `<dir>/<short id>` and record the path
    /// on the revision. Revisions sharing a short id get a `-<position>`
    /// suffix so no file is overwritten.
    pub fn persist(&self, revisions: &mut [Revision]) -> BenchResult<Vec<PathBuf>> {
        let mut used = HashSet::new();
        let mut files = Vec::with_capacity(revisions.len());
        for (index, rev) in revisions.iter_mut().enumerate() {
            let mut file_name = rev.short_id.clone();
            if !used.insert(file_name.clone()) {
                file_name = format!("{}-{}", rev.short_id, index + 1);
                used.insert(file_name.clone());
            }
            let path = self.dir.path().join(&file_name);
            std::fs::write(&path, &rev.output)
                .map_err(|e| BenchError::storage("write", &path, e))?;
            rev.output_path = Some(path.clone());
            files.push(path);
        }
        Ok(files)
    }

    /// Remove the directory and everything in it. Failure is only logged.
    pub fn close(self) {
        let path = self.dir.path().to_path_buf();
        if let Err(e) = self.dir.close() {
            warn!("cannot remove {}: {e}", path.display());
        }
    }
}

/// Header lines naming the compared revisions.
///
/// One revision: `name: id`. Two: `old:\tid` and `new:\tid`. More: each
/// name left-justified to the longest name (in characters), a tab, the id.
pub fn header(revisions: &[Revision]) -> String {
    match revisions {
        [only] => format!("{}: {}\n", only.name, only.canonical_id),
        [old, new] => format!(
            "old:\t{}\nnew:\t{}\n",
            old.canonical_id, new.canonical_id
        ),
        _ => {
            let width = revisions
                .iter()
                .map(|r| r.name.chars().count())
                .max()
                .unwrap_or(0);
            revisions
                .iter()
                .map(|r| format!("{:<width$}\t{}\n", r.name, r.canonical_id))
                .collect()
        }
    }
}

/// Full report: header, blank line, comparison output, blank line.
pub fn compose(revisions: &[Revision], comparison: &[u8]) -> Vec<u8> {
    let header = header(revisions);
    let mut out = Vec::with_capacity(header.len() + comparison.len() + 2);
    out.extend_from_slice(header.as_bytes());
    out.push(b'\n');
    out.extend_from_slice(comparison);
    out.push(b'\n');
    out
}

//! Blocking subprocess execution
//!
//! Every external tool (git, go, benchstat) is run to completion through
//! [`run`] or [`run_combined`]. The command line is echoed as a debug event
//! before it starts; there is no timeout.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use thiserror::Error;
use tracing::debug;

/// A subprocess that could not be started or exited non-zero.
#[derive(Error, Debug)]
pub enum CommandFailure {
    #[error("{command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{command}: {status}\n{output}")]
    Exit {
        command: String,
        status: String,
        output: String,
    },
}

/// Captured output of a successful subprocess.
#[derive(Debug, Clone, Default)]
pub struct Captured {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl Captured {
    /// Stdout as text, minus one trailing newline.
    pub fn stdout_text(self) -> String {
        String::from_utf8_lossy(&trim_newline(self.stdout)).into_owned()
    }
}

/// Strip a single trailing `\n`.
pub fn trim_newline(mut buf: Vec<u8>) -> Vec<u8> {
    if buf.last() == Some(&b'\n') {
        buf.pop();
    }
    buf
}

/// Render `program args...` the way it would be typed.
pub fn command_line<S: AsRef<str>>(program: &str, args: &[S]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(AsRef::as_ref))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run `program` with `args` in `working_dir` and wait for it to exit.
pub fn run<S: AsRef<str>>(
    program: &str,
    args: &[S],
    working_dir: &Path,
) -> Result<Captured, CommandFailure> {
    let args: Vec<&str> = args.iter().map(AsRef::as_ref).collect();
    let command = command_line(program, &args);
    debug!("{command}");

    let output = Command::new(program)
        .args(&args)
        .current_dir(working_dir)
        .output()
        .map_err(|source| CommandFailure::Spawn {
            command: command.clone(),
            source,
        })?;

    if !output.status.success() {
        let mut merged = output.stdout;
        merged.extend_from_slice(&output.stderr);
        return Err(CommandFailure::Exit {
            command,
            status: output.status.to_string(),
            output: String::from_utf8_lossy(&trim_newline(merged)).into_owned(),
        });
    }

    Ok(Captured {
        stdout: output.stdout,
        stderr: output.stderr,
    })
}

/// Run `program` with stdout and stderr sharing one pipe, so the returned
/// bytes keep the order in which the child wrote them. One trailing newline
/// is stripped. On a non-zero exit the same interleaved text is reported.
pub fn run_combined<S: AsRef<str>>(
    program: &str,
    args: &[S],
    working_dir: &Path,
) -> Result<Vec<u8>, CommandFailure> {
    let args: Vec<&str> = args.iter().map(AsRef::as_ref).collect();
    let command = command_line(program, &args);
    debug!("{command}");

    let io_failure = |source: std::io::Error| CommandFailure::Spawn {
        command: command.clone(),
        source,
    };

    let (mut reader, writer) = std::io::pipe().map_err(io_failure)?;
    // `cmd` holds our copies of the write end; it must be dropped before
    // reading or the read never sees EOF.
    let mut child = {
        let mut cmd = Command::new(program);
        cmd.args(&args)
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .stdout(writer.try_clone().map_err(io_failure)?)
            .stderr(writer);
        cmd.spawn().map_err(io_failure)?
    };

    let mut output = Vec::new();
    let read = reader.read_to_end(&mut output);
    let status = child.wait().map_err(io_failure)?;
    read.map_err(io_failure)?;

    let output = trim_newline(output);
    if !status.success() {
        return Err(CommandFailure::Exit {
            command,
            status: status.to_string(),
            output: String::from_utf8_lossy(&output).into_owned(),
        });
    }
    Ok(output)
}

/// Locate `program` the way a shell would: a path containing a separator
/// is checked directly, a bare name is searched for in `$PATH`.
pub fn find_executable(program: &str) -> Option<PathBuf> {
    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        return is_executable(candidate).then(|| candidate.to_path_buf());
    }

    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths)
        .map(|dir| dir.join(program))
        .find(|path| is_executable(path))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file() || path.with_extension("exe").is_file()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_newline_strips_only_one() {
        assert_eq!(trim_newline(b"ok\n\n".to_vec()), b"ok\n".to_vec());
        assert_eq!(trim_newline(b"ok".to_vec()), b"ok".to_vec());
        assert_eq!(trim_newline(Vec::new()), Vec::<u8>::new());
    }

    #[test]
    fn test_command_line() {
        assert_eq!(
            command_line("go", &["test", ".", "-bench=."]),
            "go test . -bench=."
        );
        assert_eq!(command_line::<&str>("benchstat", &[]), "benchstat");
    }

    #[cfg(unix)]
    #[test]
    fn test_run_keeps_stdout_only() {
        let dir = tempfile::tempdir().unwrap();
        let out = run("sh", &["-c", "echo out; echo err >&2"], dir.path()).unwrap();
        assert_eq!(out.stdout_text(), "out");
    }

    #[cfg(unix)]
    #[test]
    fn test_run_combined_keeps_write_order() {
        let dir = tempfile::tempdir().unwrap();
        let out = run_combined(
            "sh",
            &["-c", "echo A; echo ERR >&2; sleep 0.1; echo B"],
            dir.path(),
        )
        .unwrap();
        assert_eq!(out, b"A\nERR\nB".to_vec());
    }

    #[cfg(unix)]
    #[test]
    fn test_run_combined_failure_carries_interleaved_output() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_combined(
            "sh",
            &["-c", "echo A; echo ERR >&2; echo B; exit 1"],
            dir.path(),
        )
        .unwrap_err();
        match err {
            CommandFailure::Exit { output, .. } => assert_eq!(output, "A\nERR\nB"),
            other => panic!("unexpected failure: {other:?}"),
        }
    }

    #[test]
    fn test_run_combined_missing_program_is_spawn_failure() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_combined::<&str>("benchwrap-no-such-program", &[], dir.path()).unwrap_err();
        assert!(matches!(err, CommandFailure::Spawn { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_reports_exit_status_and_output() {
        let dir = tempfile::tempdir().unwrap();
        let err = run("sh", &["-c", "echo broken; exit 3"], dir.path()).unwrap_err();
        match err {
            CommandFailure::Exit {
                command,
                status,
                output,
            } => {
                assert_eq!(command, "sh -c echo broken; exit 3");
                assert!(status.contains('3'));
                assert_eq!(output, "broken");
            }
            other => panic!("unexpected failure: {other:?}"),
        }
    }

    #[test]
    fn test_run_missing_program_is_spawn_failure() {
        let dir = tempfile::tempdir().unwrap();
        let err = run::<&str>("benchwrap-no-such-program", &[], dir.path()).unwrap_err();
        assert!(matches!(err, CommandFailure::Spawn { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_find_executable() {
        assert!(find_executable("sh").is_some());
        assert!(find_executable("benchwrap-no-such-program").is_none());

        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("plain.txt");
        std::fs::write(&plain, "not a program").unwrap();
        assert!(find_executable(plain.to_str().unwrap()).is_none());
    }
}

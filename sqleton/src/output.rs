//! Output routing
//!
//! The DOT document goes either straight to stdout or a file, or through a
//! Graphviz layout command that renders it into the format implied by the
//! output file's extension.

use std::fs::File;
use std::io::{self, BufWriter, Stdout, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

use crate::config::Layout;
use crate::error::{Error, Result};

/// Where the document should end up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Raw DOT on standard output
    Stdout,
    /// Raw DOT written to a file
    File(PathBuf),
    /// Rendered by the layout command into `format`
    Render { path: PathBuf, format: String },
}

impl OutputTarget {
    /// Pick a target from the optional output path. The extension selects the
    /// format; `.dot` or no extension keeps the raw document.
    pub fn from_path(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return OutputTarget::Stdout;
        };

        match path.extension().and_then(|ext| ext.to_str()) {
            None | Some("") | Some("dot") => OutputTarget::File(path.to_path_buf()),
            Some(format) => OutputTarget::Render {
                path: path.to_path_buf(),
                format: format.to_string(),
            },
        }
    }

    /// Open the sink for this target, spawning `layout` when rendering
    pub fn open(&self, layout: Layout) -> Result<Sink> {
        match self {
            OutputTarget::Stdout => Ok(Sink::Stdout(BufWriter::new(io::stdout()))),
            OutputTarget::File(path) => {
                let file = File::create(path)?;
                tracing::debug!(path = %path.display(), "Writing DOT file");
                Ok(Sink::File(BufWriter::new(file)))
            }
            OutputTarget::Render { path, format } => spawn_layout(layout, path, format),
        }
    }
}

fn spawn_layout(layout: Layout, path: &Path, format: &str) -> Result<Sink> {
    let mut child = Command::new(layout.command())
        .arg(format!("-T{}", format))
        .arg(format!("-o{}", path.display()))
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                Error::RenderError(format!(
                    "Graphviz '{}' command not found; install Graphviz or write a .dot file instead",
                    layout
                ))
            } else {
                Error::RenderError(format!("Failed to run {}: {}", layout, e))
            }
        })?;

    let stdin = child
        .stdin
        .take()
        .ok_or_else(|| Error::RenderError(format!("{} has no stdin", layout)))?;

    tracing::debug!(layout = %layout, format, path = %path.display(), "Spawned layout command");

    Ok(Sink::Process {
        stdin: BufWriter::new(stdin),
        child,
        layout,
    })
}

/// An open output destination.
///
/// The document is written through [`Write`]; [`Sink::finish`] must be called
/// once writing succeeded to flush the destination or wait for the layout
/// command.
pub enum Sink {
    Stdout(BufWriter<Stdout>),
    File(BufWriter<File>),
    Process {
        stdin: BufWriter<ChildStdin>,
        child: Child,
        layout: Layout,
    },
}

impl Sink {
    /// Close the destination
    pub fn finish(self) -> Result<()> {
        match self {
            Sink::Stdout(mut out) => out.flush()?,
            Sink::File(out) => {
                let file = out.into_inner().map_err(|e| e.into_error())?;
                file.sync_all()?;
            }
            Sink::Process {
                stdin,
                mut child,
                layout,
            } => {
                // Dropping stdin sends EOF to the layout command
                let stdin = stdin.into_inner().map_err(|e| e.into_error())?;
                drop(stdin);

                let status = child.wait()?;
                if !status.success() {
                    return Err(Error::RenderError(format!(
                        "{} exited with {}",
                        layout, status
                    )));
                }
            }
        }
        Ok(())
    }

    /// Give up after a failed write. A layout command is reaped first; when it
    /// exited unsuccessfully its status is reported instead of `error`, which
    /// is then usually just the broken pipe.
    pub fn abort(self, error: Error) -> Error {
        match self {
            Sink::Stdout(_) | Sink::File(_) => error,
            Sink::Process {
                stdin,
                mut child,
                layout,
            } => {
                drop(stdin);
                match child.wait() {
                    Ok(status) if !status.success() => {
                        tracing::debug!(%error, "Write failed after layout command exited");
                        Error::RenderError(format!("{} exited with {}", layout, status))
                    }
                    _ => error,
                }
            }
        }
    }
}

impl Write for Sink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Sink::Stdout(out) => out.write(buf),
            Sink::File(out) => out.write(buf),
            Sink::Process { stdin, .. } => stdin.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Sink::Stdout(out) => out.flush(),
            Sink::File(out) => out.flush(),
            Sink::Process { stdin, .. } => stdin.flush(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs;

    #[test]
    fn no_path_means_stdout() {
        assert_eq!(OutputTarget::from_path(None), OutputTarget::Stdout);
    }

    #[rstest]
    #[case("schema.dot")]
    #[case("schema")]
    #[case("out/schema.dot")]
    fn dot_or_bare_paths_are_written_directly(#[case] path: &str) {
        assert_eq!(
            OutputTarget::from_path(Some(Path::new(path))),
            OutputTarget::File(PathBuf::from(path))
        );
    }

    #[rstest]
    #[case("schema.svg", "svg")]
    #[case("schema.png", "png")]
    #[case("docs/schema.pdf", "pdf")]
    fn other_extensions_are_rendered(#[case] path: &str, #[case] format: &str) {
        assert_eq!(
            OutputTarget::from_path(Some(Path::new(path))),
            OutputTarget::Render {
                path: PathBuf::from(path),
                format: format.to_string(),
            }
        );
    }

    #[test]
    fn file_sink_writes_and_finishes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.dot");

        let mut sink = OutputTarget::File(path.clone()).open(Layout::Fdp).unwrap();
        sink.write_all(b"digraph g {\n}\n").unwrap();
        sink.finish().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "digraph g {\n}\n");
    }

    #[cfg(unix)]
    fn shell_sink(script: &str) -> Sink {
        let mut child = Command::new("sh")
            .arg("-c")
            .arg(script)
            .stdin(Stdio::piped())
            .spawn()
            .expect("Failed to spawn sh");
        let stdin = child.stdin.take().expect("Child has no stdin");

        Sink::Process {
            stdin: BufWriter::new(stdin),
            child,
            layout: Layout::Dot,
        }
    }

    #[cfg(unix)]
    #[test]
    fn failed_write_reports_layout_exit_status() {
        let mut sink = shell_sink("exit 3");

        // Larger than any pipe buffer, so the write outlives the child
        let err = sink.write_all(&vec![b'x'; 1 << 20]).unwrap_err();
        let err = sink.abort(err.into());

        match err {
            Error::RenderError(message) => {
                assert!(message.starts_with("dot exited with"), "{message}");
                assert!(message.contains('3'), "{message}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn abort_keeps_write_error_when_layout_succeeded() {
        let sink = shell_sink("cat > /dev/null");

        let err = sink.abort(Error::RenderError("write failed".to_string()));

        assert!(matches!(err, Error::RenderError(ref m) if m == "write failed"));
    }

    #[cfg(unix)]
    #[test]
    fn finish_reports_layout_failure() {
        let mut sink = shell_sink("cat > /dev/null; exit 2");
        sink.write_all(b"digraph g {\n}\n").unwrap();

        assert!(matches!(sink.finish(), Err(Error::RenderError(_))));
    }

    #[test]
    fn abort_on_file_returns_original_error() {
        let dir = tempfile::tempdir().unwrap();
        let sink = OutputTarget::File(dir.path().join("schema.dot"))
            .open(Layout::Fdp)
            .unwrap();

        let err = sink.abort(Error::RenderError("write failed".to_string()));
        assert!(matches!(err, Error::RenderError(ref m) if m == "write failed"));
    }

    #[test]
    fn file_sink_fails_for_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = OutputTarget::File(dir.path().join("missing").join("schema.dot"));

        assert!(matches!(target.open(Layout::Fdp), Err(Error::IoError(_))));
    }
}

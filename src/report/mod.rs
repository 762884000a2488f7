//! Run report output.
//!
//! Every user-facing line of a run goes through a `Sink` handed in by the
//! caller, so the pipeline never writes to process-wide state.

pub mod line;

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

pub use line::Renderer;

/// Destination for report lines
pub trait Sink {
    fn emit(&mut self, line: &str) -> io::Result<()>;
}

/// In-memory sink, handy for tests and for callers that post-process the report.
impl Sink for Vec<String> {
    fn emit(&mut self, line: &str) -> io::Result<()> {
        self.push(line.to_string());
        Ok(())
    }
}

/// Writes each line, newline terminated, to any writer
pub struct WriterSink<W: Write> {
    out: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(out: W) -> Self {
        WriterSink { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Sink for WriterSink<W> {
    fn emit(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.out, "{line}")?;
        self.out.flush()
    }
}

/// Console output plus an optional append-only log file.
pub struct TeeSink {
    console: WriterSink<io::Stdout>,
    log: Option<WriterSink<File>>,
}

impl TeeSink {
    pub fn stdout() -> Self {
        TeeSink {
            console: WriterSink::new(io::stdout()),
            log: None,
        }
    }

    /// Also append every line to `path`, creating it if needed
    pub fn with_log_file(mut self, path: &Path) -> io::Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        self.log = Some(WriterSink::new(file));
        Ok(self)
    }
}

impl Sink for TeeSink {
    fn emit(&mut self, line: &str) -> io::Result<()> {
        self.console.emit(line)?;
        if let Some(log) = &mut self.log {
            log.emit(line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writer_sink_terminates_lines() {
        let mut sink = WriterSink::new(Vec::new());
        sink.emit("first").unwrap();
        sink.emit("second").unwrap();
        assert_eq!(String::from_utf8(sink.into_inner()).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn log_file_is_appended_across_sinks() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("logs").join("log.txt");

        TeeSink::stdout().with_log_file(&path).unwrap().emit("run one").unwrap();
        TeeSink::stdout().with_log_file(&path).unwrap().emit("run two").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "run one\nrun two\n");
    }
}

//! Hooks notified of iteration and shrink events.
//!
//! Observers only watch a run: they never influence what is generated or how
//! it shrinks. Their failures are logged and ignored unless the run is
//! configured to propagate them.

use std::fmt;
use std::fs::File;
use std::io::{LineWriter, Write};
use std::path::{Path, PathBuf};

use crate::data::Size;
use crate::error::{FalsifyError, Result};

/// Receives the events of a property run, in order.
///
/// Every method defaults to doing nothing.
pub trait Observer<T> {
    /// An iteration is about to evaluate the predicate.
    fn on_iteration_start(&mut self, _index: usize, _size: Size) -> Result<()> {
        Ok(())
    }

    /// An iteration finished.
    fn on_iteration_result(&mut self, _index: usize, _passed: bool, _value: &T) -> Result<()> {
        Ok(())
    }

    /// The shrink search replaced `from` with the smaller failing `to`.
    fn on_shrink_step(&mut self, _from: &T, _to: &T) -> Result<()> {
        Ok(())
    }
}

/// Writes one line per event to a file.
///
/// The file is truncated when the observer is created.
pub struct LogFile {
    path: PathBuf,
    writer: LineWriter<File>,
}

impl LogFile {
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path).map_err(|error| {
            FalsifyError::observer(format!("cannot open {}: {error}", path.display()))
        })?;
        Ok(LogFile {
            path,
            writer: LineWriter::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_line(&mut self, line: fmt::Arguments<'_>) -> Result<()> {
        writeln!(self.writer, "{line}").map_err(|error| {
            FalsifyError::observer(format!("cannot write to {}: {error}", self.path.display()))
        })
    }
}

impl<T: fmt::Debug> Observer<T> for LogFile {
    fn on_iteration_start(&mut self, index: usize, size: Size) -> Result<()> {
        self.write_line(format_args!("iteration {index}: started with size {}", size.get()))
    }

    fn on_iteration_result(&mut self, index: usize, passed: bool, value: &T) -> Result<()> {
        let verdict = if passed { "passed" } else { "failed" };
        self.write_line(format_args!("iteration {index}: {verdict} {value:?}"))
    }

    fn on_shrink_step(&mut self, from: &T, to: &T) -> Result<()> {
        self.write_line(format_args!("shrinking: {from:?} -> {to:?}"))
    }
}

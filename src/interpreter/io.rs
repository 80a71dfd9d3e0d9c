//! Host input/output adapters.
//!
//! The interpreter talks to the outside world through the [`HostIo`] trait:
//! console lines in and out, and line-oriented file access keyed by opaque
//! handles. [`StdIo`] is the default adapter over process stdin/stdout and
//! the local filesystem; [`MemoryIo`] keeps everything in memory and is
//! what the tests and doc examples run against.

use std::{
    collections::{HashMap, VecDeque},
    fs::{File, OpenOptions},
    io::{BufRead, BufReader, BufWriter, Write},
};

use crate::ast::FileMode;

/// An opaque handle for an open file, issued by [`HostIo::open`].
pub type FileHandle = usize;

/// The host environment the interpreter runs against.
///
/// All file operations are line-oriented and keyed by the handle returned
/// from [`open`](Self::open). Errors are reported as plain strings; the
/// evaluator wraps them into runtime errors with source positions.
pub trait HostIo {
    /// Reads one line from console input, without its terminator. Returns
    /// `None` when no more input exists.
    fn read_line(&mut self) -> Option<String>;

    /// Writes text to console output.
    fn write(&mut self, text: &str);

    /// Opens the named file in the given mode.
    ///
    /// # Errors
    /// Returns the host's description of the failure, for example a
    /// missing file in `READ` mode.
    fn open(&mut self, name: &str, mode: FileMode) -> Result<FileHandle, String>;

    /// Reads the next line from an open file, without its terminator.
    /// Returns `Ok(None)` at end of file.
    ///
    /// # Errors
    /// Returns the host's description of the failure.
    fn readline(&mut self, handle: FileHandle) -> Result<Option<String>, String>;

    /// Appends one line (a terminator is added) to an open file.
    ///
    /// # Errors
    /// Returns the host's description of the failure.
    fn write_line(&mut self, handle: FileHandle, line: &str) -> Result<(), String>;

    /// Reports whether an open `READ`-mode file has reached its end
    /// without consuming anything.
    ///
    /// # Errors
    /// Returns the host's description of the failure.
    fn eof(&mut self, handle: FileHandle) -> Result<bool, String>;

    /// Flushes and releases an open file.
    fn close(&mut self, handle: FileHandle);
}

enum StdFile {
    Read(BufReader<File>),
    Write(BufWriter<File>),
}

/// The default adapter: process stdin/stdout and the local filesystem.
///
/// Filenames are interpreted as paths relative to the process working
/// directory.
#[derive(Default)]
pub struct StdIo {
    files: Vec<Option<StdFile>>,
}

impl StdIo {
    /// Creates an adapter with no open files.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn file(&mut self, handle: FileHandle) -> Result<&mut StdFile, String> {
        self.files
            .get_mut(handle)
            .and_then(Option::as_mut)
            .ok_or_else(|| "file is not open".to_string())
    }
}

fn strip_terminator(line: &mut String) {
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
}

impl HostIo for StdIo {
    fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match std::io::stdin().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => {
                strip_terminator(&mut line);
                Some(line)
            },
        }
    }

    fn write(&mut self, text: &str) {
        let mut stdout = std::io::stdout();
        let _ = stdout.write_all(text.as_bytes());
        let _ = stdout.flush();
    }

    fn open(&mut self, name: &str, mode: FileMode) -> Result<FileHandle, String> {
        let file = match mode {
            FileMode::Read => {
                let file = File::open(name).map_err(|e| e.to_string())?;
                StdFile::Read(BufReader::new(file))
            },
            FileMode::Write => {
                let file = File::create(name).map_err(|e| e.to_string())?;
                StdFile::Write(BufWriter::new(file))
            },
            FileMode::Append => {
                let file = OpenOptions::new().create(true)
                                             .append(true)
                                             .open(name)
                                             .map_err(|e| e.to_string())?;
                StdFile::Write(BufWriter::new(file))
            },
        };
        self.files.push(Some(file));
        Ok(self.files.len() - 1)
    }

    fn readline(&mut self, handle: FileHandle) -> Result<Option<String>, String> {
        match self.file(handle)? {
            StdFile::Read(reader) => {
                let mut line = String::new();
                match reader.read_line(&mut line) {
                    Ok(0) => Ok(None),
                    Ok(_) => {
                        strip_terminator(&mut line);
                        Ok(Some(line))
                    },
                    Err(e) => Err(e.to_string()),
                }
            },
            StdFile::Write(_) => Err("file is not open for reading".to_string()),
        }
    }

    fn write_line(&mut self, handle: FileHandle, line: &str) -> Result<(), String> {
        match self.file(handle)? {
            StdFile::Write(writer) => {
                writer.write_all(line.as_bytes()).map_err(|e| e.to_string())?;
                writer.write_all(b"\n").map_err(|e| e.to_string())
            },
            StdFile::Read(_) => Err("file is not open for writing".to_string()),
        }
    }

    fn eof(&mut self, handle: FileHandle) -> Result<bool, String> {
        match self.file(handle)? {
            StdFile::Read(reader) => {
                let buffer = reader.fill_buf().map_err(|e| e.to_string())?;
                Ok(buffer.is_empty())
            },
            StdFile::Write(_) => Err("file is not open for reading".to_string()),
        }
    }

    fn close(&mut self, handle: FileHandle) {
        if let Some(entry) = self.files.get_mut(handle) {
            if let Some(StdFile::Write(writer)) = entry {
                let _ = writer.flush();
            }
            *entry = None;
        }
    }
}

struct MemoryFile {
    name:   String,
    mode:   FileMode,
    lines:  Vec<String>,
    cursor: usize,
}

/// An in-memory adapter for tests and examples.
///
/// Console input is a queue of prepared lines, console output accumulates
/// into a string, and files live in a map from filename to lines.
#[derive(Default)]
pub struct MemoryIo {
    input:   VecDeque<String>,
    output:  String,
    files:   HashMap<String, Vec<String>>,
    handles: Vec<Option<MemoryFile>>,
}

impl MemoryIo {
    /// Creates an adapter with no input, no output, and no files.
    ///
    /// # Example
    /// ```
    /// use pseudo9608::{interpreter::io::MemoryIo, run_source_with_io};
    ///
    /// let mut io = MemoryIo::new();
    /// run_source_with_io("OUTPUT 1 + 2", &mut io).unwrap();
    /// assert_eq!(io.output(), "3\n");
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an adapter with prepared console input lines.
    #[must_use]
    pub fn with_input(lines: &[&str]) -> Self {
        Self { input: lines.iter().map(ToString::to_string).collect(),
               ..Self::default() }
    }

    /// Everything the program has written to console output.
    #[must_use]
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Creates or replaces a virtual file from text; each line of `content`
    /// becomes one file line.
    pub fn set_file(&mut self, name: &str, content: &str) {
        let lines = content.lines().map(ToString::to_string).collect();
        self.files.insert(name.to_string(), lines);
    }

    /// The lines of a virtual file, if it exists.
    #[must_use]
    pub fn file(&self, name: &str) -> Option<&[String]> {
        self.files.get(name).map(Vec::as_slice)
    }

    fn handle(&mut self, handle: FileHandle) -> Result<&mut MemoryFile, String> {
        self.handles
            .get_mut(handle)
            .and_then(Option::as_mut)
            .ok_or_else(|| "file is not open".to_string())
    }
}

impl HostIo for MemoryIo {
    fn read_line(&mut self) -> Option<String> {
        self.input.pop_front()
    }

    fn write(&mut self, text: &str) {
        self.output.push_str(text);
    }

    fn open(&mut self, name: &str, mode: FileMode) -> Result<FileHandle, String> {
        let lines = match mode {
            FileMode::Read => {
                self.files
                    .get(name)
                    .cloned()
                    .ok_or_else(|| format!("no such file '{name}'"))?
            },
            FileMode::Write => Vec::new(),
            FileMode::Append => self.files.get(name).cloned().unwrap_or_default(),
        };
        self.handles.push(Some(MemoryFile { name: name.to_string(),
                                            mode,
                                            lines,
                                            cursor: 0 }));
        Ok(self.handles.len() - 1)
    }

    fn readline(&mut self, handle: FileHandle) -> Result<Option<String>, String> {
        let file = self.handle(handle)?;
        match file.lines.get(file.cursor) {
            Some(line) => {
                file.cursor += 1;
                Ok(Some(line.clone()))
            },
            None => Ok(None),
        }
    }

    fn write_line(&mut self, handle: FileHandle, line: &str) -> Result<(), String> {
        let file = self.handle(handle)?;
        file.lines.push(line.to_string());
        Ok(())
    }

    fn eof(&mut self, handle: FileHandle) -> Result<bool, String> {
        let file = self.handle(handle)?;
        Ok(file.cursor >= file.lines.len())
    }

    fn close(&mut self, handle: FileHandle) {
        if let Some(entry) = self.handles.get_mut(handle)
           && let Some(file) = entry.take()
           && !matches!(file.mode, FileMode::Read)
        {
            self.files.insert(file.name, file.lines);
        }
    }
}

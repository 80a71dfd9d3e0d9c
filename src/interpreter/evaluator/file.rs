use std::collections::HashMap;

use crate::{
    ast::{FileMode, Position},
    error::{RuntimeError, RuntimeErrorKind},
    interpreter::{
        evaluator::core::{Context, EvalResult, coerce_input},
        io::FileHandle,
        typed::{Expr, Place},
        types::Type,
    },
};

#[derive(Debug, Clone, Copy)]
struct OpenEntry {
    mode:   FileMode,
    handle: FileHandle,
}

/// The table of open files, keyed by filename.
///
/// Each filename is open in at most one mode at a time; opening an open
/// file, or touching one that is not open, is a runtime error.
#[derive(Debug, Default)]
pub struct FileTable {
    open: HashMap<String, OpenEntry>,
}

impl FileTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Context<'_, '_> {
    fn eval_filename(&mut self, filename: &Expr) -> EvalResult<String> {
        let value = self.eval_expr(filename)?;
        Ok(value.as_str(filename.pos)?.to_string())
    }

    fn entry(&self, name: &str, pos: Position) -> EvalResult<OpenEntry> {
        self.files
            .open
            .get(name)
            .copied()
            .ok_or_else(|| {
                RuntimeError::new(RuntimeErrorKind::FileNotOpen { name: name.to_string() }, pos)
            })
    }

    fn file_error(name: &str, message: String, pos: Position) -> RuntimeError {
        RuntimeError::new(RuntimeErrorKind::FileError { name: name.to_string(),
                                                        message },
                          pos)
    }

    /// `OPENFILE <filename> FOR <mode>`
    pub(in crate::interpreter::evaluator) fn exec_open_file(&mut self,
                                                            filename: &Expr,
                                                            mode: FileMode,
                                                            pos: Position)
                                                            -> EvalResult<()> {
        let name = self.eval_filename(filename)?;
        if self.files.open.contains_key(&name) {
            return Err(RuntimeError::new(RuntimeErrorKind::FileAlreadyOpen { name }, pos));
        }
        let handle = self.io
                         .open(&name, mode)
                         .map_err(|message| Self::file_error(&name, message, pos))?;
        self.files.open.insert(name, OpenEntry { mode, handle });
        Ok(())
    }

    /// `READFILE <filename>, <target>`
    pub(in crate::interpreter::evaluator) fn exec_read_file(&mut self,
                                                            filename: &Expr,
                                                            target: &Place,
                                                            ty: &Type,
                                                            pos: Position)
                                                            -> EvalResult<()> {
        let name = self.eval_filename(filename)?;
        let entry = self.entry(&name, pos)?;
        if entry.mode != FileMode::Read {
            return Err(RuntimeError::new(RuntimeErrorKind::FileModeMismatch { name,
                                                                              mode: entry.mode },
                                         pos));
        }
        let line = self.io
                       .readline(entry.handle)
                       .map_err(|message| Self::file_error(&name, message, pos))?;
        let Some(line) = line else {
            return Err(RuntimeError::new(RuntimeErrorKind::ReadPastEof { name }, pos));
        };
        let value = coerce_input(&line, ty, pos)?;
        self.write_place(target, value)
    }

    /// `WRITEFILE <filename>, <value>`
    pub(in crate::interpreter::evaluator) fn exec_write_file(&mut self,
                                                             filename: &Expr,
                                                             value: &Expr,
                                                             pos: Position)
                                                             -> EvalResult<()> {
        let name = self.eval_filename(filename)?;
        let entry = self.entry(&name, pos)?;
        if entry.mode == FileMode::Read {
            return Err(RuntimeError::new(RuntimeErrorKind::FileModeMismatch { name,
                                                                              mode: entry.mode },
                                         pos));
        }
        let text = self.eval_expr(value)?.to_string();
        self.io
            .write_line(entry.handle, &text)
            .map_err(|message| Self::file_error(&name, message, pos))
    }

    /// `CLOSEFILE <filename>`
    pub(in crate::interpreter::evaluator) fn exec_close_file(&mut self,
                                                             filename: &Expr,
                                                             pos: Position)
                                                             -> EvalResult<()> {
        let name = self.eval_filename(filename)?;
        let Some(entry) = self.files.open.remove(&name) else {
            return Err(RuntimeError::new(RuntimeErrorKind::FileNotOpen { name }, pos));
        };
        self.io.close(entry.handle);
        Ok(())
    }

    /// The `EOF(filename)` probe.
    pub(in crate::interpreter::evaluator) fn file_eof(&mut self,
                                                      name: &str,
                                                      pos: Position)
                                                      -> EvalResult<bool> {
        let entry = self.entry(name, pos)?;
        if entry.mode != FileMode::Read {
            return Err(RuntimeError::new(RuntimeErrorKind::FileModeMismatch {
                name: name.to_string(),
                mode: entry.mode,
            },
                                         pos));
        }
        self.io
            .eof(entry.handle)
            .map_err(|message| Self::file_error(name, message, pos))
    }

    /// Releases every file still open, as interpreter termination does.
    pub(in crate::interpreter::evaluator) fn close_open_files(&mut self) {
        for (_, entry) in self.files.open.drain() {
            self.io.close(entry.handle);
        }
    }
}

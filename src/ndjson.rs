use crate::util::{
    append_with_backoff, create_with_backoff, open_with_backoff, replace_file_atomic_backoff,
};
use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Buffered reader over the line-delimited JSON logs. Blank and
/// whitespace-only lines (rerun seams, historical leading newlines) are
/// skipped; line terminators are stripped.
pub struct NdjsonReader {
    path: PathBuf,
    rdr: BufReader<File>,
}

impl NdjsonReader {
    pub fn open(path: &Path, buf_bytes: usize) -> io::Result<Self> {
        let f = open_with_backoff(path, 16, 50)?;
        Ok(Self {
            path: path.to_path_buf(),
            rdr: BufReader::with_capacity(buf_bytes.max(8 * 1024), f),
        })
    }

    /// Read the next non-blank line into `buf`. Returns false at end of file.
    pub fn next_line(&mut self, buf: &mut String) -> io::Result<bool> {
        loop {
            buf.clear();
            if self.rdr.read_line(buf)? == 0 {
                return Ok(false);
            }
            while buf.ends_with('\n') || buf.ends_with('\r') {
                buf.pop();
            }
            if !buf.trim().is_empty() {
                return Ok(true);
            }
        }
    }

    /// Consume the reader and return the whole-file single-line JSON document
    /// (`videos.json`, `comments.json`). A file with no content is an error.
    pub fn read_document(mut self) -> Result<String> {
        let mut line = String::new();
        if !self.next_line(&mut line)? {
            bail!("{} is empty", self.path.display());
        }
        Ok(line)
    }
}

/// Buffered writer for the append-only capture and sentiment logs, and for
/// single-line documents rebuilt on a temp path and promoted atomically.
/// `write_line` adds the `\n` terminator.
pub struct NdjsonWriter {
    path: PathBuf,
    w: BufWriter<File>,
}

impl NdjsonWriter {
    /// Create (truncate) `path`. Used for temp files later promoted over the
    /// canonical document.
    pub fn create(path: &Path, buf_bytes: usize) -> io::Result<Self> {
        let f = create_with_backoff(path, 16, 50)?;
        Ok(Self {
            path: path.to_path_buf(),
            w: BufWriter::with_capacity(buf_bytes.max(8 * 1024), f),
        })
    }

    /// Open `path` in append mode, creating it on first use.
    pub fn append(path: &Path, buf_bytes: usize) -> io::Result<Self> {
        let f = append_with_backoff(path, 16, 50)?;
        Ok(Self {
            path: path.to_path_buf(),
            w: BufWriter::with_capacity(buf_bytes.max(8 * 1024), f),
        })
    }

    #[inline]
    pub fn write_line(&mut self, s: &str) -> io::Result<()> {
        self.w.write_all(s.as_bytes())?;
        self.w.write_all(b"\n")
    }

    /// Push buffered lines to the OS. Checkpointed writers must call this
    /// before persisting an offset that counts the buffered lines.
    pub fn flush(&mut self) -> io::Result<()> {
        self.w.flush()
    }

    pub fn finish(mut self) -> io::Result<()> {
        self.w.flush()
    }

    /// Flush, close, and atomically promote the temp file to `final_path`.
    pub fn finish_atomic(self, final_path: &Path) -> Result<()> {
        let Self { path, mut w } = self;
        w.flush().with_context(|| format!("flush {}", path.display()))?;
        drop(w);
        replace_file_atomic_backoff(&path, final_path)
    }
}

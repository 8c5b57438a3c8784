//! Append-only run transcript
//!
//! The transcript is kept in memory for the notification and mirrored to a
//! file that is truncated when the run starts. Every line is flushed as it
//! is written.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::Result;

pub struct Transcript {
    text: String,
    file: Option<(PathBuf, BufWriter<File>)>,
}

impl Transcript {
    /// Create (or truncate) the transcript file at `path`
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(path)?;
        Ok(Self {
            text: String::new(),
            file: Some((path.to_path_buf(), BufWriter::new(file))),
        })
    }

    /// A transcript that is never written to disk
    pub fn in_memory() -> Self {
        Self {
            text: String::new(),
            file: None,
        }
    }

    pub fn push_line(&mut self, line: &str) -> Result<()> {
        self.text.push_str(line);
        self.text.push('\n');

        if let Some((_, ref mut writer)) = self.file {
            writeln!(writer, "{}", line)?;
            writer.flush()?;
        }
        Ok(())
    }

    /// Full transcript text
    pub fn contents(&self) -> &str {
        &self.text
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.lines()
    }

    /// File backing this transcript, if any
    pub fn path(&self) -> Option<&Path> {
        self.file.as_ref().map(|(p, _)| p.as_path())
    }
}

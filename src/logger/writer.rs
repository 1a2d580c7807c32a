//! Log writer module
//!
//! Thread-safe log targets: stdout, an append-mode file or an
//! in-memory buffer. One `LogWriter` is shared by every request.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

/// Log output target
pub enum LogTarget {
    /// Write to stdout
    Stdout,
    /// Write to file
    File(File),
    /// Collect lines in memory
    Buffer(Vec<u8>),
}

/// Thread-safe log writer
pub struct LogWriter {
    target: Mutex<LogTarget>,
}

impl LogWriter {
    pub const fn new(target: LogTarget) -> Self {
        Self {
            target: Mutex::new(target),
        }
    }

    /// Create a writer appending to `path`
    pub fn file(path: &str) -> io::Result<Self> {
        Ok(Self::new(LogTarget::File(open_log_file(path)?)))
    }

    /// Write one line to the target
    pub fn write_line(&self, message: &str) {
        // A poisoned lock still guards a usable target
        let mut target = match self.target.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        write_to_target(&mut target, message);
    }

    /// Contents of a buffer target, empty for every other target
    pub fn contents(&self) -> String {
        let target = match self.target.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        match &*target {
            LogTarget::Buffer(buf) => String::from_utf8_lossy(buf).into_owned(),
            _ => String::new(),
        }
    }
}

/// Open or create a log file for appending
fn open_log_file(path: &str) -> io::Result<File> {
    // Create parent directories if they don't exist
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}

/// Write message to log target
fn write_to_target(target: &mut LogTarget, message: &str) {
    match target {
        LogTarget::Stdout => {
            println!("{message}");
        }
        LogTarget::File(file) => {
            let _ = writeln!(file, "{message}");
        }
        LogTarget::Buffer(buf) => {
            let _ = writeln!(buf, "{message}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_collects_lines() {
        let writer = LogWriter::new(LogTarget::Buffer(Vec::new()));
        writer.write_line("first");
        writer.write_line("second");
        assert_eq!(writer.contents(), "first\nsecond\n");
    }

    #[test]
    fn test_file_target_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs/nested/app.log");
        let path = path.to_str().unwrap();

        LogWriter::file(path).unwrap().write_line("one");
        LogWriter::file(path).unwrap().write_line("two");

        assert_eq!(std::fs::read_to_string(path).unwrap(), "one\ntwo\n");
    }
}

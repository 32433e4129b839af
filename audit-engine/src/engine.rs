use crate::entry::LogRecord;
use crate::error::AuditResult;
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// Append-only audit sink
///
/// Writes one JSON line per record under a mutex so concurrent turns
/// never interleave partial lines. Storage errors are retried once and
/// then swallowed; the turn pipeline never sees them.
pub struct AuditEngine {
    path: PathBuf,
    sink: Mutex<File>,
}

impl AuditEngine {
    /// Open (or create) the audit file in append mode, creating parent
    /// directories as needed.
    pub fn open(path: impl AsRef<Path>) -> AuditResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let sink = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            sink: Mutex::new(sink),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record.
    ///
    /// Infallible from the caller's view: a failed append is retried
    /// exactly once, and a second failure is reported on the
    /// `audit::failures` channel instead of returning.
    pub fn record(&self, record: &LogRecord) {
        let line = match serde_json::to_string(record) {
            Ok(line) => line,
            Err(e) => {
                error!(
                    target: "audit::failures",
                    record_id = %record.id,
                    error = %e,
                    "Audit record could not be serialized"
                );
                return;
            }
        };

        if let Err(first) = self.append_line(&line) {
            debug!(record_id = %record.id, error = %first, "Audit append failed, retrying once");
            if let Err(second) = self.append_line(&line) {
                error!(
                    target: "audit::failures",
                    record_id = %record.id,
                    error = %second,
                    "Audit append failed after retry; record dropped"
                );
            }
        }
    }

    fn append_line(&self, line: &str) -> std::io::Result<()> {
        let mut sink = self.sink.lock();
        writeln!(sink, "{line}")?;
        sink.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn read_lines(path: &Path) -> Vec<String> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_one_line_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("turns.jsonl");
        let engine = AuditEngine::open(&path).unwrap();

        engine.record(&LogRecord::new("HelpAgent", "hello", "hi"));
        engine.record(
            &LogRecord::new("FollowUpAgent", "dizzy 7/10", "noted").with_risk("ORANGE"),
        );

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        for line in &lines {
            serde_json::from_str::<LogRecord>(line).unwrap();
        }
    }

    #[test]
    fn test_concurrent_writers_never_interleave() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("turns.jsonl");
        let engine = Arc::new(AuditEngine::open(&path).unwrap());

        let writers = 8;
        let per_writer = 25;
        let mut handles = Vec::new();
        for w in 0..writers {
            let engine = engine.clone();
            handles.push(std::thread::spawn(move || {
                for i in 0..per_writer {
                    engine.record(&LogRecord::new(
                        "OrchestrationAgent",
                        format!("writer {w} turn {i}"),
                        "ok",
                    ));
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let lines = read_lines(&path);
        assert_eq!(lines.len(), writers * per_writer);
        for line in &lines {
            let parsed: LogRecord = serde_json::from_str(line).unwrap();
            assert_eq!(parsed.agent, "OrchestrationAgent");
        }
    }

    // Appends to /dev/full fail with ENOSPC, driving the retry-then-
    // swallow path; record must return normally.
    #[test]
    #[cfg(target_os = "linux")]
    fn test_storage_failure_is_swallowed() {
        let engine = AuditEngine::open("/dev/full").unwrap();
        engine.record(&LogRecord::new("HelpAgent", "input", "response"));
    }

    #[test]
    fn test_open_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/logs/turns.jsonl");
        let engine = AuditEngine::open(&path).unwrap();
        engine.record(&LogRecord::new("HelpAgent", "x", "y"));
        assert_eq!(read_lines(&path).len(), 1);
    }
}

use chrono::{DateTime, Local};
use parley_core::{ParleyResult, Role};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// Timestamp layout used in the transcript file.
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Suffix appended to the log path when it is rotated out.
pub const BACKUP_SUFFIX: &str = "_backup";

// ---------------------------------------------------------------------------
// TranscriptEntry
// ---------------------------------------------------------------------------

/// One line of conversation, stamped with local wall-clock time.
#[derive(Debug, Clone, Serialize)]
pub struct TranscriptEntry {
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Local>,
}

impl TranscriptEntry {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            timestamp: Local::now(),
        }
    }

    /// `"<DD/MM/YYYY HH:MM:SS> <role>: <text>"`, without a trailing newline.
    pub fn render(&self) -> String {
        format!(
            "{} {}: {}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.role,
            self.text
        )
    }
}

// ---------------------------------------------------------------------------
// TranscriptStore
// ---------------------------------------------------------------------------

/// Buffered, append-only transcript backed by a single text file.
///
/// [`record`](Self::record) only touches memory. [`flush`](Self::flush) is
/// the single path to disk: it rotates an oversized log out of the way and
/// then appends every buffered entry in order. A failed flush keeps the
/// buffer so the entries go out with the next successful one.
pub struct TranscriptStore {
    buffer: Vec<TranscriptEntry>,
    path: PathBuf,
    rotation_threshold_bytes: u64,
}

impl TranscriptStore {
    pub fn new(path: impl Into<PathBuf>, rotation_threshold_bytes: u64) -> Self {
        Self {
            buffer: Vec::new(),
            path: path.into(),
            rotation_threshold_bytes,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where [`ensure_exists_and_rotate`](Self::ensure_exists_and_rotate)
    /// moves an oversized log.
    pub fn backup_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(BACKUP_SUFFIX);
        PathBuf::from(name)
    }

    pub fn rotation_threshold_bytes(&self) -> u64 {
        self.rotation_threshold_bytes
    }

    /// Entries recorded since the last successful flush, oldest first.
    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn record(&mut self, role: Role, text: impl Into<String>) {
        self.buffer.push(TranscriptEntry::new(role, text));
    }

    /// Rendered buffer lines for diagnostics. Never reads the log file.
    pub fn print_all(&self) -> impl Iterator<Item = String> + '_ {
        self.buffer.iter().map(TranscriptEntry::render)
    }

    /// Create the log if it is missing; move it to the backup path if it is
    /// larger than the rotation threshold. Returns whether it was rotated.
    ///
    /// A rotated log is left absent; the next append recreates it. Any
    /// earlier backup is overwritten.
    pub async fn ensure_exists_and_rotate(&self) -> ParleyResult<bool> {
        let metadata = match tokio::fs::metadata(&self.path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tokio::fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&self.path)
                    .await?;
                debug!(path = %self.path.display(), "Created transcript log");
                return Ok(false);
            }
            Err(e) => return Err(e.into()),
        };

        if metadata.len() <= self.rotation_threshold_bytes {
            return Ok(false);
        }

        let backup = self.backup_path();
        tokio::fs::rename(&self.path, &backup).await?;
        info!(
            path = %self.path.display(),
            backup = %backup.display(),
            size = metadata.len(),
            threshold = self.rotation_threshold_bytes,
            "Rotated transcript log"
        );
        Ok(true)
    }

    /// Append every buffered entry to the log and clear the buffer.
    ///
    /// Returns the number of entries written.
    pub async fn flush(&mut self) -> ParleyResult<usize> {
        self.ensure_exists_and_rotate().await?;

        if self.buffer.is_empty() {
            return Ok(0);
        }

        let mut out = String::new();
        for entry in &self.buffer {
            out.push_str(&entry.render());
            out.push('\n');
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(out.as_bytes()).await?;
        file.flush().await?;

        let written = self.buffer.len();
        self.buffer.clear();
        debug!(path = %self.path.display(), entries = written, "Flushed transcript");
        Ok(written)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use tempfile::TempDir;

    fn store_in(tmp: &TempDir, threshold: u64) -> TranscriptStore {
        TranscriptStore::new(tmp.path().join("ChatHistoryBackup.txt"), threshold)
    }

    #[test]
    fn render_uses_day_first_timestamp() {
        let entry = TranscriptEntry::new(Role::Model, "hi there");
        let line = entry.render();

        let (stamp, rest) = line.split_at(19);
        assert!(NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT).is_ok());
        assert_eq!(rest, " model: hi there");
    }

    #[test]
    fn record_only_touches_memory() {
        let tmp = TempDir::new().unwrap();
        let mut store = store_in(&tmp, 1024);

        store.record(Role::User, "hello");

        assert_eq!(store.len(), 1);
        assert!(!store.path().exists());
    }

    #[test]
    fn print_all_is_restartable() {
        let tmp = TempDir::new().unwrap();
        let mut store = store_in(&tmp, 1024);
        store.record(Role::User, "a");
        store.record(Role::Model, "b");

        let first: Vec<String> = store.print_all().collect();
        let second: Vec<String> = store.print_all().collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
        assert!(first[0].ends_with("user: a"));
        assert!(first[1].ends_with("model: b"));
    }

    #[test]
    fn backup_path_appends_suffix() {
        let store = TranscriptStore::new("logs/ChatHistoryBackup.txt", 1);
        assert_eq!(
            store.backup_path(),
            PathBuf::from("logs/ChatHistoryBackup.txt_backup")
        );
    }

    #[tokio::test]
    async fn flush_writes_in_record_order_and_clears_buffer() {
        let tmp = TempDir::new().unwrap();
        let mut store = store_in(&tmp, 1024 * 1024);

        let texts = ["one", "two", "three", "four"];
        let roles = [Role::System, Role::User, Role::Model, Role::User];
        for (role, text) in roles.iter().zip(texts) {
            store.record(*role, text);
        }

        assert_eq!(store.flush().await.unwrap(), 4);
        assert!(store.is_empty());

        let data = std::fs::read_to_string(store.path()).unwrap();
        let lines: Vec<&str> = data.lines().collect();
        assert_eq!(lines.len(), 4);
        for ((line, role), text) in lines.iter().zip(roles).zip(texts) {
            assert!(line.ends_with(&format!(" {role}: {text}")), "{line}");
        }
        assert!(data.ends_with('\n'));
    }

    #[tokio::test]
    async fn successive_flushes_append() {
        let tmp = TempDir::new().unwrap();
        let mut store = store_in(&tmp, 1024 * 1024);

        store.record(Role::User, "first");
        store.flush().await.unwrap();
        store.record(Role::User, "second");
        store.flush().await.unwrap();

        let data = std::fs::read_to_string(store.path()).unwrap();
        let lines: Vec<&str> = data.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("user: first"));
        assert!(lines[1].ends_with("user: second"));
    }

    #[tokio::test]
    async fn ensure_creates_missing_log() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp, 10);

        assert!(!store.ensure_exists_and_rotate().await.unwrap());
        assert!(store.path().exists());
        assert_eq!(std::fs::metadata(store.path()).unwrap().len(), 0);
    }

    #[tokio::test]
    async fn log_at_threshold_is_not_rotated() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp, 2);
        std::fs::write(store.path(), "ab").unwrap();

        assert!(!store.ensure_exists_and_rotate().await.unwrap());
        assert!(!store.backup_path().exists());
    }

    #[tokio::test]
    async fn oversized_log_rotates_on_flush() {
        let tmp = TempDir::new().unwrap();
        let mut store = store_in(&tmp, 1);
        std::fs::write(store.path(), "ab").unwrap();

        store.record(Role::User, "hi");
        store.flush().await.unwrap();

        assert_eq!(std::fs::read_to_string(store.backup_path()).unwrap(), "ab");
        let data = std::fs::read_to_string(store.path()).unwrap();
        let lines: Vec<&str> = data.lines().collect();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("user: hi"));
    }

    #[tokio::test]
    async fn rotation_overwrites_previous_backup() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp, 1);
        std::fs::write(store.backup_path(), "old backup").unwrap();
        std::fs::write(store.path(), "newer log").unwrap();

        assert!(store.ensure_exists_and_rotate().await.unwrap());
        assert!(!store.path().exists());
        assert_eq!(
            std::fs::read_to_string(store.backup_path()).unwrap(),
            "newer log"
        );
    }

    #[tokio::test]
    async fn failed_flush_retains_buffer() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("not-yet");
        let mut store = TranscriptStore::new(dir.join("log.txt"), 1024);
        store.record(Role::User, "keep me");

        assert!(store.flush().await.is_err());
        assert_eq!(store.len(), 1);

        std::fs::create_dir(&dir).unwrap();
        assert_eq!(store.flush().await.unwrap(), 1);
        let data = std::fs::read_to_string(store.path()).unwrap();
        assert!(data.trim_end().ends_with("user: keep me"));
    }
}

//! # File Lock Implementation
//!
//! Uses `fs2` for cross-platform file locking (flock on Unix, LockFile on Windows).
//!
//! The OS releases the lock when the holder exits, so a crashed process
//! never leaves a stale lock behind. The lock file itself is left in place.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use fs2::FileExt;
use tracing::{debug, warn};

use crate::domain::errors::LockError;

/// Upper bound on the pause between acquisition attempts.
const MAX_RETRY_DELAY: Duration = Duration::from_millis(100);

/// Exclusive lock on a database directory.
///
/// Acquired before the engine is opened, released on drop (RAII).
///
/// # Example
///
/// ```ignore
/// let lock = DatabaseLock::acquire(Path::new("/data/finality"), Duration::from_secs(1))?;
/// // Lock is held until `lock` goes out of scope
/// ```
#[derive(Debug)]
pub struct DatabaseLock {
    /// The lock file handle (kept open to maintain lock)
    file: File,
    /// Path to the lock file
    path: PathBuf,
    /// PID of this process
    pid: u32,
}

impl DatabaseLock {
    /// Lock file name. RocksDB keeps its own `LOCK` in the same directory.
    pub const LOCK_FILE: &'static str = "finality.lock";

    /// Acquire an exclusive lock on `data_dir`, waiting at most `timeout`.
    ///
    /// Retries with exponential backoff until the deadline.
    ///
    /// # Errors
    ///
    /// Returns `LockError::AlreadyLocked` if another handle still holds the
    /// lock when the timeout expires.
    pub fn acquire(data_dir: &Path, timeout: Duration) -> Result<Self, LockError> {
        let deadline = Instant::now() + timeout;
        let lock_path = data_dir.join(Self::LOCK_FILE);
        let mut retry_delay = Duration::from_millis(10);

        // Truncating here would wipe the holder's PID.
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(LockError::CreateFailed)?;

        loop {
            match file.try_lock_exclusive() {
                Ok(()) => {
                    let pid = std::process::id();
                    Self::write_pid(&mut file, pid)?;
                    debug!(path = %lock_path.display(), pid, "Acquired database lock");

                    return Ok(Self {
                        file,
                        path: lock_path,
                        pid,
                    });
                }
                Err(_) => {
                    let now = Instant::now();
                    if now >= deadline {
                        let existing_pid = Self::read_existing_pid(&mut file);
                        warn!(
                            path = %lock_path.display(),
                            holder = ?existing_pid,
                            "Database lock still held after timeout"
                        );
                        return Err(LockError::AlreadyLocked {
                            pid: existing_pid,
                            path: lock_path,
                        });
                    }

                    std::thread::sleep(retry_delay.min(deadline - now));
                    retry_delay = (retry_delay * 2).min(MAX_RETRY_DELAY);
                }
            }
        }
    }

    fn write_pid(file: &mut File, pid: u32) -> Result<(), LockError> {
        file.set_len(0).map_err(LockError::WriteFailed)?;
        file.seek(SeekFrom::Start(0)).map_err(LockError::WriteFailed)?;
        writeln!(file, "{}", pid).map_err(LockError::WriteFailed)?;
        file.sync_all().map_err(LockError::WriteFailed)
    }

    /// Read PID from the lock file (for error messages)
    fn read_existing_pid(file: &mut File) -> Option<u32> {
        let mut contents = String::new();
        file.seek(SeekFrom::Start(0)).ok()?;
        file.read_to_string(&mut contents).ok()?;
        contents.trim().parse().ok()
    }

    /// Get the PID of the process holding the lock
    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Get the path to the lock file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for DatabaseLock {
    fn drop(&mut self) {
        // Fully qualified: newer std has an inherent File::unlock.
        let _ = FileExt::unlock(&self.file);
        debug!(path = %self.path.display(), "Released database lock");
    }
}

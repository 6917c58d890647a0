//! Pre-flight checks for document uploads.
//!
//! The backend enforces its own limits, but checking locally avoids
//! streaming a doomed 50 MB body over the wire and lets a multi-file
//! batch proceed when only some of its members are unusable.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Size ceiling mirrored from the backend upload route.
pub const MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

/// Why a file was excluded from an upload batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadSkipReason {
    TooLarge { size: u64 },
    LockFile,
    Unreadable { reason: String },
}

impl fmt::Display for UploadSkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadSkipReason::TooLarge { size } => {
                write!(
                    f,
                    "too large ({:.1} MB, maximum is 50 MB)",
                    *size as f64 / (1024.0 * 1024.0)
                )
            }
            UploadSkipReason::LockFile => write!(f, "transient office lock file"),
            UploadSkipReason::Unreadable { reason } => write!(f, "unreadable: {reason}"),
        }
    }
}

/// Office suites leave `~$`-prefixed lock files next to open documents;
/// they carry no indexable content.
pub fn is_lock_file(name: &str) -> bool {
    name.starts_with("~$")
}

/// Checks one candidate by name and size.
///
/// # Errors
/// Returns the skip reason when the file must not be uploaded.
pub fn check_upload(name: &str, size: u64) -> Result<(), UploadSkipReason> {
    if is_lock_file(name) {
        return Err(UploadSkipReason::LockFile);
    }
    if size > MAX_UPLOAD_BYTES {
        return Err(UploadSkipReason::TooLarge { size });
    }
    Ok(())
}

/// A batch split into files worth sending and files to report as skipped.
#[derive(Debug, Default)]
pub struct UploadPlan {
    pub accepted: Vec<PathBuf>,
    pub skipped: Vec<(PathBuf, UploadSkipReason)>,
}

impl UploadPlan {
    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty() && self.skipped.is_empty()
    }
}

/// Partitions a batch of paths before any network call.
///
/// A bad member never fails the whole batch; it lands in `skipped` with
/// its reason.
pub fn partition_uploads<I, P>(paths: I) -> UploadPlan
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut plan = UploadPlan::default();
    for path in paths {
        let path = path.as_ref().to_path_buf();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let size = match fs::metadata(&path) {
            Ok(meta) => meta.len(),
            Err(e) => {
                plan.skipped.push((
                    path,
                    UploadSkipReason::Unreadable {
                        reason: e.to_string(),
                    },
                ));
                continue;
            }
        };
        match check_upload(&name, size) {
            Ok(()) => plan.accepted.push(path),
            Err(reason) => plan.skipped.push((path, reason)),
        }
    }
    plan
}

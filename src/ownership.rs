//! Unix file mode and ownership capture, used by the editor workflow to
//! preserve a target file's permissions and owner across an atomic swap or
//! rekey.

use std::path::Path;

/// A captured `(mode, uid, gid)` triple for a file.
///
/// On non-Unix platforms, capture and restore are no-ops: there is no
/// portable equivalent, and the editor workflow treats a `None` as "nothing
/// to restore" rather than failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnixOwnership {
    /// File permission bits (e.g. `0o600`).
    pub mode: u32,
    /// User ID (UID).
    pub uid: u32,
    /// Group ID (GID).
    pub gid: u32,
}

impl UnixOwnership {
    /// Captures the mode, UID and GID of an existing file.
    #[cfg(unix)]
    pub fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        use std::os::unix::fs::MetadataExt;

        let metadata = std::fs::metadata(path)?;
        Ok(Self {
            mode: metadata.mode(),
            uid: metadata.uid(),
            gid: metadata.gid(),
        })
    }

    #[cfg(not(unix))]
    pub fn from_path(_path: impl AsRef<Path>) -> std::io::Result<Self> {
        Ok(Self {
            mode: 0,
            uid: 0,
            gid: 0,
        })
    }

    /// Applies the captured mode and ownership to `path`.
    ///
    /// Ownership changes require appropriate privileges; a failure to
    /// `chown` is propagated, matching the best-effort-but-visible contract
    /// the rest of the editor workflow follows.
    #[cfg(unix)]
    pub fn apply_to_path(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        use std::os::unix::fs::{PermissionsExt, chown};

        let path = path.as_ref();
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(self.mode))?;
        chown(path, Some(self.uid), Some(self.gid))?;
        Ok(())
    }

    #[cfg(not(unix))]
    pub fn apply_to_path(&self, _path: impl AsRef<Path>) -> std::io::Result<()> {
        Ok(())
    }
}

//! The editor workflow: decrypt → hand to an external editor on a temporary
//! file → re-encrypt → atomic replace, with secure erasure of plaintext
//! remnants on every exit path.
//!
//! [`TempFileGuard`] is the scoped-resource primitive everything else here
//! is built on: its `Drop` impl erases the temp file unconditionally, so a
//! panic, an early `?`-return, or a normal completion all clean up the same
//! way. There is exactly one field to get wrong here, and it is named
//! correctly.

use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use rand::{Rng, RngCore};

use crate::error::{Error, Result};
use crate::ownership::UnixOwnership;
use crate::vault::Vault;

/// A temp file whose contents are securely erased and whose file is
/// unlinked when the guard is dropped, unless [`TempFileGuard::disarm`] was
/// called first (because the file was already moved elsewhere by
/// [`atomic_swap`]).
struct TempFileGuard {
    path: Option<PathBuf>,
}

impl TempFileGuard {
    fn new() -> Result<Self> {
        let named = tempfile::NamedTempFile::new()?;
        let (_file, path) = named.keep().map_err(|e| Error::IoError(e.error))?;
        Ok(Self { path: Some(path) })
    }

    fn path(&self) -> &Path {
        self.path.as_deref().expect("temp file guard already disarmed")
    }

    /// Releases the guard without erasing: the caller has moved the file
    /// elsewhere (e.g. via [`atomic_swap`]) and nothing is left to clean up.
    fn disarm(mut self) {
        self.path = None;
    }
}

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if let Some(path) = self.path.take() {
            if let Err(e) = secure_erase(&path) {
                log::warn!("failed to securely erase temp file {}: {e}", path.display());
            }
        }
    }
}

/// Securely erases and removes a temp file.
///
/// Prefers the `shred` utility (spawned without a shell, argv-only); if it
/// is unavailable or exits nonzero, falls back to an in-process three-pass
/// random overwrite. Either way the file is unlinked afterward: GNU `shred`
/// does not remove files by default.
///
/// This is best-effort: no guarantee is made on log-structured or
/// copy-on-write filesystems.
fn secure_erase(path: &Path) -> std::io::Result<()> {
    if !path.is_file() {
        return Ok(());
    }

    let shredded = std::process::Command::new("shred")
        .arg(path)
        .status()
        .map(|status| status.success())
        .unwrap_or(false);

    if !shredded {
        log::warn!("shred unavailable or failed, falling back to custom overwrite for {}", path.display());
        shred_custom(path)?;
    }

    if path.exists() {
        std::fs::remove_file(path)?;
    }
    Ok(())
}

/// Three passes of random data over the file, each pass a fresh random
/// chunk length in `[max(1, chunk_max/2), chunk_max]` tiled across the
/// file, flushed and `fsync`-ed between passes. The floor of 1 keeps the
/// tiling loop from spinning forever on a zero-length draw when the file
/// (and so `chunk_max`) is only a byte or two.
fn shred_custom(path: &Path) -> std::io::Result<()> {
    let file_len = std::fs::metadata(path)?.len();
    if file_len == 0 {
        return Ok(());
    }

    let max_chunk_len = std::cmp::min(2 * 1024 * 1024, file_len);
    let min_chunk_len = max_chunk_len.div_ceil(2).max(1);
    let mut file = std::fs::OpenOptions::new().write(true).open(path)?;

    for _ in 0..3 {
        file.seek(SeekFrom::Start(0))?;

        let chunk_len = rand::rngs::OsRng.gen_range(min_chunk_len..=max_chunk_len);
        let mut chunk = vec![0u8; chunk_len as usize];
        rand::rngs::OsRng.fill_bytes(&mut chunk);

        let mut written = 0u64;
        while written + chunk_len <= file_len {
            file.write_all(&chunk)?;
            written += chunk_len;
        }
        let remainder = (file_len - written) as usize;
        if remainder > 0 {
            file.write_all(&chunk[..remainder])?;
        }

        file.flush()?;
        file.sync_all()?;
    }

    Ok(())
}

/// Atomically replaces `dest_path` with the contents at `tmp_path`.
///
/// If `dest_path` exists, its mode/uid/gid are captured before it is
/// unlinked and restored onto the renamed-in file afterward. If it does not
/// exist, the temp file is simply renamed into place.
fn atomic_swap(tmp_path: &Path, dest_path: &Path) -> Result<()> {
    let previous = if dest_path.is_file() {
        let ownership = UnixOwnership::from_path(dest_path)?;
        std::fs::remove_file(dest_path)?;
        Some(ownership)
    } else {
        None
    };

    std::fs::rename(tmp_path, dest_path)?;

    if let Some(ownership) = previous {
        ownership.apply_to_path(dest_path)?;
    }
    Ok(())
}

/// Invokes the editor named by the `EDITOR` environment variable (default
/// `vim`) on `path`.
///
/// The command is word-split (shell-style quoting, no shell interpretation)
/// and spawned as an argv array with `path` appended as the final argument.
/// Only a failure to launch the process is propagated; a nonzero exit
/// status from the editor itself is not treated as an error.
fn invoke_editor(path: &Path) -> Result<()> {
    let editor_cmd = std::env::var("EDITOR").unwrap_or_else(|_| "vim".to_string());
    let mut argv = shlex::split(&editor_cmd).filter(|v| !v.is_empty()).unwrap_or_else(|| vec!["vim".to_string()]);
    let program = argv.remove(0);

    log::info!("invoking editor `{program}` on {}", path.display());
    std::process::Command::new(program).args(argv).arg(path).status()?;
    Ok(())
}

/// File-level operations layered above [`Vault`]: create, edit, view,
/// rekey, and one-shot encrypt/decrypt of files on disk.
pub struct VaultEditor {
    vault: Vault,
}

impl VaultEditor {
    /// Creates an editor bound to `vault`.
    pub fn new(vault: Vault) -> Self {
        Self { vault }
    }

    /// Creates a new encrypted file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyExists`] if `path` already exists.
    pub fn create_file(&self, path: &Path) -> Result<()> {
        if path.exists() {
            return Err(Error::AlreadyExists(path.display().to_string()));
        }
        self.edit_file_helper(path, None, false)
    }

    /// Decrypts `path` into a temp file, invokes the editor, and re-encrypts
    /// on save.
    ///
    /// If the saved contents are unchanged and the file was already using
    /// the write-allowed cipher, nothing is rewritten. A file encrypted with
    /// the deprecated `AES` cipher is always re-saved, migrating it to
    /// `AES256` even if its plaintext is untouched.
    pub fn edit_file(&self, path: &Path) -> Result<()> {
        let ciphertext = std::fs::read(path)?;
        let decrypted = self.vault.decrypt(&ciphertext)?;
        let force_save = !matches!(decrypted.cipher_name.as_str(), "AES256");
        self.edit_file_helper(path, Some(decrypted.plaintext), force_save)
    }

    fn edit_file_helper(&self, target: &Path, existing: Option<Vec<u8>>, force_save: bool) -> Result<()> {
        let guard = TempFileGuard::new()?;

        if let Some(data) = &existing {
            std::fs::write(guard.path(), data)?;
        }

        invoke_editor(guard.path())?;

        let edited = std::fs::read(guard.path())?;

        let unchanged = match &existing {
            Some(data) => data.as_slice() == edited.as_slice() && !force_save,
            None => edited.is_empty(),
        };
        if unchanged {
            log::debug!("no changes saved for {}, leaving target untouched", target.display());
            return Ok(());
        }

        let encrypted = self.vault.encrypt(&edited, None)?;
        std::fs::write(guard.path(), &encrypted)?;
        atomic_swap(guard.path(), target)?;
        guard.disarm();

        log::info!("wrote {}", target.display());
        Ok(())
    }

    /// Encrypts the plaintext at `path` (or `output`, if given) in place.
    ///
    /// When writing back over `path` itself, the plaintext source is
    /// securely erased before the ciphertext is written, so no recoverable
    /// copy of it is ever left on disk.
    pub fn encrypt_file(&self, path: &Path, output: Option<&Path>) -> Result<()> {
        let plaintext = std::fs::read(path)?;
        let ciphertext = self.vault.encrypt(&plaintext, None)?;

        match output {
            Some(output) => std::fs::write(output, ciphertext)?,
            None => {
                secure_erase(path)?;
                std::fs::write(path, ciphertext)?;
            }
        }
        Ok(())
    }

    /// Decrypts the armoured file at `path` (or `output`, if given) in
    /// place. Unlike the temp file used by `edit`, this does not shred the
    /// source: the caller explicitly asked for plaintext on disk.
    pub fn decrypt_file(&self, path: &Path, output: Option<&Path>) -> Result<()> {
        let ciphertext = std::fs::read(path)?;
        let decrypted = self.vault.decrypt(&ciphertext)?;
        std::fs::write(output.unwrap_or(path), decrypted.plaintext)?;
        Ok(())
    }

    /// Returns the decrypted contents of `path` without writing anything to
    /// disk.
    pub fn view(&self, path: &Path) -> Result<Vec<u8>> {
        let ciphertext = std::fs::read(path)?;
        Ok(self.vault.decrypt(&ciphertext)?.plaintext)
    }

    /// Decrypts `path` under this editor's passphrase and re-encrypts it
    /// under `new_vault`'s, preserving the file's mode and ownership.
    pub fn rekey_file(&self, path: &Path, new_vault: &Vault) -> Result<()> {
        let ownership = UnixOwnership::from_path(path)?;

        let ciphertext = std::fs::read(path)?;
        let decrypted = self.vault.decrypt(&ciphertext)?;
        let rekeyed = new_vault.encrypt(&decrypted.plaintext, None)?;

        std::fs::write(path, rekeyed)?;
        ownership.apply_to_path(path)?;

        log::info!("rekeyed {}", path.display());
        Ok(())
    }
}

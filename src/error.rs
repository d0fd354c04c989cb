//! Error types for vault container operations.
//!
//! This module provides the [`Error`] enum which represents all possible
//! failure modes when working with armoured vault containers, along with
//! a convenient [`Result<T>`] type alias.
//!
//! # Error Handling
//!
//! All fallible operations in this crate return `Result<T, Error>`. You can
//! handle errors using pattern matching or the `?` operator:
//!
//! ```rust,no_run
//! use cryptvault::{Vault, Result};
//!
//! fn decrypt_secret(vault: &Vault, armoured: &[u8]) -> Result<Vec<u8>> {
//!     let decrypted = vault.decrypt(armoured)?;
//!     Ok(decrypted.plaintext)
//! }
//! ```
//!
//! ## User-Friendly Error Messages
//!
//! The [`Error`] type implements [`std::fmt::Display`] with clear messages:
//!
//! ```rust
//! use cryptvault::Error;
//!
//! fn print_user_message(error: &Error) {
//!     match error {
//!         Error::NotVault => println!("This is not a vault-encrypted file."),
//!         Error::AuthFailure => println!("Decryption failed."),
//!         Error::PasswordRequired => println!("A vault password is required."),
//!         _ => println!("Error: {}", error),
//!     }
//! }
//! ```

use std::io;

/// All failure modes of the vault cipher, codec, facade and editor workflow.
///
/// | Category | Variants | Cause |
/// |---|---|---|
/// | Format | [`NotVault`][Self::NotVault], [`MalformedHeader`][Self::MalformedHeader] | Header missing or malshaped |
/// | Cipher | [`UnknownCipher`][Self::UnknownCipher], [`DeprecatedEncrypt`][Self::DeprecatedEncrypt] | Unsupported or write-disallowed cipher |
/// | Authentication | [`AuthFailure`][Self::AuthFailure], [`PasswordRequired`][Self::PasswordRequired] | Wrong key material |
/// | Workflow | [`AlreadyEncrypted`][Self::AlreadyEncrypted], [`AlreadyExists`][Self::AlreadyExists] | Caller misuse of the editor workflow |
/// | Environment | [`CryptoUnavailable`][Self::CryptoUnavailable], [`IoError`][Self::IoError] | Missing primitives or filesystem failure |
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The input does not begin with the `$ANSIBLE_VAULT` magic header where
    /// one was required.
    #[error("input is not a vault-encrypted payload")]
    NotVault,

    /// A header was present but its field count or version shape is invalid.
    ///
    /// Carries a short description of what was expected vs. found.
    #[error("malformed vault header: {0}")]
    MalformedHeader(String),

    /// The cipher name in the header is not in the read set `{AES, AES256}`.
    #[error("vault file encrypted with unrecognised cipher: {0}")]
    UnknownCipher(String),

    /// An attempt was made to encrypt using the legacy `AES` cipher, which is
    /// decrypt-only.
    #[error("encryption is disabled for the deprecated AES cipher")]
    DeprecatedEncrypt,

    /// The recomputed MAC did not match the stored MAC.
    ///
    /// Surfaced as a generic "decryption failed" rather than distinguishing
    /// between a wrong passphrase and corrupted ciphertext, to avoid giving
    /// an attacker an oracle.
    #[error("decryption failed")]
    AuthFailure,

    /// A decrypt was attempted with no passphrase bound to the vault.
    #[error("a vault password is required to decrypt this content")]
    PasswordRequired,

    /// `encrypt` was called on a payload that already looks armoured.
    #[error("input is already encrypted")]
    AlreadyEncrypted,

    /// `create_file` was called with a target path that already exists.
    #[error("{0} exists, please use edit instead")]
    AlreadyExists(String),

    /// A required cryptographic primitive was unavailable at startup.
    ///
    /// Unreachable in this build, which links its crypto primitives
    /// unconditionally; retained for API completeness.
    #[error("required cryptographic primitive is unavailable")]
    CryptoUnavailable,

    /// An underlying filesystem or process-spawn operation failed.
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
}

impl Error {
    /// Returns `true` if this error stems from bad or tampered input rather
    /// than caller misuse.
    pub fn is_format_error(&self) -> bool {
        matches!(self, Error::NotVault | Error::MalformedHeader(_))
    }

    /// Returns `true` if this is an authentication-related error: a missing
    /// password or a MAC mismatch.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Error::AuthFailure | Error::PasswordRequired)
    }

    /// Returns `true` if retrying the same call with different input could
    /// plausibly succeed (e.g. a different passphrase, a different target
    /// path).
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::AuthFailure
                | Error::PasswordRequired
                | Error::AlreadyExists(_)
                | Error::AlreadyEncrypted
        )
    }
}

/// Convenience alias for results returned by this crate.
pub type Result<T> = std::result::Result<T, Error>;

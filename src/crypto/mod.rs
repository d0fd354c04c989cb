//! Cipher suite for vault encryption.
//!
//! This module implements the two ciphers recognised by the container
//! codec:
//!
//! - [`Cipher::Aes256`]: AES-256-CTR with encrypt-then-MAC (HMAC-SHA-256),
//!   keys derived via PBKDF2-HMAC-SHA256. Read and write.
//! - [`Cipher::Aes`]: the deprecated AES-256-CBC scheme with an embedded
//!   SHA-256 integrity check and an OpenSSL-style `EVP_BytesToKey` key
//!   derivation. Read only; encrypting under it is refused.
//!
//! # Key Derivation
//!
//! Key derivation is deliberately slow (10,000 rounds of PBKDF2-HMAC-SHA256)
//! to resist brute force against short passphrases. There is no caching here
//! — unlike a multi-entry archive, a vault file derives its key exactly once
//! per operation.

mod aes256;
mod legacy_aes;
mod password;

pub use password::Passphrase;

use crate::error::{Error, Result};

/// AES block size in bytes, shared by both cipher implementations.
const BLOCK_SIZE: usize = 16;

/// Number of PBKDF2 iterations used to derive vault keys.
const PBKDF2_ITERATIONS: u32 = 10_000;

/// Size in bytes of each half of the PBKDF2 output (the AES key and the
/// HMAC key).
const KEY_LEN: usize = 32;

/// The cipher-name tag as it appears in the armoured header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherName {
    /// `AES256`: modern, read+write.
    Aes256,
    /// `AES`: legacy, read only.
    Aes,
}

impl CipherName {
    /// Parses a cipher-name tag from the header field.
    ///
    /// Returns `None` for any tag outside the closed read set.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "AES256" => Some(CipherName::Aes256),
            "AES" => Some(CipherName::Aes),
            _ => None,
        }
    }

    /// Returns the header tag for this cipher.
    pub fn as_str(self) -> &'static str {
        match self {
            CipherName::Aes256 => "AES256",
            CipherName::Aes => "AES",
        }
    }

    /// Returns `true` if this cipher is allowed for `encrypt`.
    pub fn is_write_allowed(self) -> bool {
        matches!(self, CipherName::Aes256)
    }
}

/// The cipher suite, dispatched by [`CipherName`].
///
/// This is a closed, two-variant dispatch rather than a trait object: the
/// set of recognised ciphers is fixed by the container format, not
/// extensible by callers.
#[derive(Debug, Clone, Copy)]
pub enum Cipher {
    /// Modern AES-256-CTR + HMAC-SHA-256, advertising cipher version `1.2`.
    Aes256,
    /// Legacy AES-256-CBC + SHA-256 digest check, advertising cipher version
    /// `1.1`. Decrypt only.
    Aes,
}

impl Cipher {
    /// Returns the cipher for a given [`CipherName`].
    pub fn for_name(name: CipherName) -> Self {
        match name {
            CipherName::Aes256 => Cipher::Aes256,
            CipherName::Aes => Cipher::Aes,
        }
    }

    /// The cipher-version tag this cipher advertises when writing.
    pub fn version_tag(self) -> &'static str {
        match self {
            Cipher::Aes256 => "1.2",
            Cipher::Aes => "1.1",
        }
    }

    /// Encrypts `plaintext` under `passphrase`, returning the body (not yet
    /// wrapped by the container codec).
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeprecatedEncrypt`] for [`Cipher::Aes`].
    pub fn encrypt(self, plaintext: &[u8], passphrase: &Passphrase) -> Result<Vec<u8>> {
        match self {
            Cipher::Aes256 => Ok(aes256::encrypt(plaintext, passphrase)),
            Cipher::Aes => Err(Error::DeprecatedEncrypt),
        }
    }

    /// Decrypts `body` under `passphrase`, given the cipher-version tag
    /// parsed from the header.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AuthFailure`] on MAC or digest mismatch.
    pub fn decrypt(
        self,
        body: &[u8],
        passphrase: &Passphrase,
        cipher_version: &str,
    ) -> Result<Vec<u8>> {
        match self {
            Cipher::Aes256 => aes256::decrypt(body, passphrase, cipher_version),
            Cipher::Aes => legacy_aes::decrypt(body, passphrase),
        }
    }
}

/// Compares two byte slices for equality in constant time.
///
/// Unequal lengths are rejected immediately (length is not secret), but for
/// equal-length inputs every byte is compared via XOR-accumulation with no
/// short-circuiting, so execution time does not depend on where the first
/// differing byte falls.
pub(crate) fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut acc = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        acc |= x ^ y;
    }
    acc == 0
}

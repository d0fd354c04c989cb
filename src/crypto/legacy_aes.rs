//! The deprecated `AES` cipher: AES-256-CBC with an OpenSSL-style
//! `EVP_BytesToKey` key derivation and an embedded SHA-256 digest check.
//!
//! Superseded by [`super::aes256`], which fixes the encrypt-then-MAC
//! ordering and uses a proper password-based KDF. Kept for reading files
//! written by very old versions; encrypting under it is refused by
//! [`super::Cipher::encrypt`].

use aes::Aes256;
use cbc::cipher::block_padding::NoPadding;
use cbc::cipher::{BlockDecryptMut, KeyIvInit};
use md5::{Digest, Md5};
use sha2::Sha256;

use super::password::Passphrase;
use crate::error::{Error, Result};

type Aes256CbcDec = cbc::Decryptor<Aes256>;

const SALTED_MAGIC: &[u8] = b"Salted__";
const SALT_LEN: usize = 8;
const KEY_LEN: usize = 32;
const IV_LEN: usize = 16;

/// OpenSSL's `EVP_BytesToKey`, specialised to MD5 and a single 32-byte key
/// plus 16-byte IV, matching the parameters this legacy format was written
/// with.
fn derive_key_iv(passphrase: &[u8], salt: &[u8]) -> ([u8; KEY_LEN], [u8; IV_LEN]) {
    let mut derived = Vec::with_capacity(KEY_LEN + IV_LEN);
    let mut previous: Vec<u8> = Vec::new();
    while derived.len() < KEY_LEN + IV_LEN {
        let mut hasher = Md5::new();
        hasher.update(&previous);
        hasher.update(passphrase);
        hasher.update(salt);
        previous = hasher.finalize().to_vec();
        derived.extend_from_slice(&previous);
    }

    let mut key = [0u8; KEY_LEN];
    let mut iv = [0u8; IV_LEN];
    key.copy_from_slice(&derived[0..KEY_LEN]);
    iv.copy_from_slice(&derived[KEY_LEN..KEY_LEN + IV_LEN]);
    (key, iv)
}

/// Decrypts a hex-encoded, `Salted__`-prefixed CBC body.
///
/// # Errors
///
/// Returns [`Error::AuthFailure`] if the embedded SHA-256 digest does not
/// match the recovered plaintext, or if the body is too short to be valid.
pub fn decrypt(body: &[u8], passphrase: &Passphrase) -> Result<Vec<u8>> {
    let mut hex_text = String::with_capacity(body.len());
    for &b in body {
        if b != b'\n' {
            hex_text.push(b as char);
        }
    }
    let raw = hex::decode(hex_text.as_bytes()).map_err(|_| Error::AuthFailure)?;

    if raw.len() < SALTED_MAGIC.len() + SALT_LEN || &raw[..SALTED_MAGIC.len()] != SALTED_MAGIC {
        return Err(Error::AuthFailure);
    }
    let salt = &raw[SALTED_MAGIC.len()..SALTED_MAGIC.len() + SALT_LEN];
    let mut ciphertext = raw[SALTED_MAGIC.len() + SALT_LEN..].to_vec();

    if ciphertext.is_empty() || ciphertext.len() % 16 != 0 {
        return Err(Error::AuthFailure);
    }

    let (key, iv) = derive_key_iv(passphrase.as_bytes(), salt);

    let decrypted_len = Aes256CbcDec::new(&key.into(), &iv.into())
        .decrypt_padded_mut::<NoPadding>(&mut ciphertext)
        .map_err(|_| Error::AuthFailure)?
        .len();
    ciphertext.truncate(decrypted_len);

    // Spurious pseudo-PKCS#7 padding, stripped without validating the
    // padding bytes themselves — a legacy quirk of this cipher.
    if let Some(&last) = ciphertext.last() {
        let padding_len = last as usize;
        if padding_len == 0 || padding_len > ciphertext.len() {
            return Err(Error::AuthFailure);
        }
        ciphertext.truncate(ciphertext.len() - padding_len);
    }

    let newline_pos = ciphertext
        .iter()
        .position(|&b| b == b'\n')
        .ok_or(Error::AuthFailure)?;
    let (digest_hex, rest) = ciphertext.split_at(newline_pos);
    let payload = &rest[1..];

    let expected_digest = std::str::from_utf8(digest_hex).map_err(|_| Error::AuthFailure)?;
    let actual_digest = hex::encode(Sha256::digest(payload));

    if expected_digest != actual_digest {
        return Err(Error::AuthFailure);
    }

    Ok(payload.to_vec())
}

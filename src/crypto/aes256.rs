//! The modern `AES256` cipher: AES-256-CTR with encrypt-then-MAC.

use aes::Aes256;
use base64::Engine;
use ctr::cipher::{KeyIvInit, StreamCipher};
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;

use super::password::Passphrase;
use super::{BLOCK_SIZE, KEY_LEN, PBKDF2_ITERATIONS, constant_time_eq};
use crate::error::{Error, Result};

type Aes256Ctr = ctr::Ctr128BE<Aes256>;
type HmacSha256 = Hmac<Sha256>;

const SALT_LEN: usize = 32;
const MAC_LEN: usize = 32;
const WRAP_COLUMN: usize = 80;

/// Derives the encryption key, MAC key, and (for legacy 1.1 decrypt) the
/// initial CTR counter from `passphrase` and `salt`.
fn derive_keys(passphrase: &Passphrase, salt: &[u8], derive_iv: bool) -> ([u8; KEY_LEN], [u8; KEY_LEN], [u8; BLOCK_SIZE]) {
    let out_len = if derive_iv {
        2 * KEY_LEN + BLOCK_SIZE
    } else {
        2 * KEY_LEN
    };
    let mut derived = vec![0u8; out_len];
    pbkdf2::pbkdf2_hmac::<Sha256>(passphrase.as_bytes(), salt, PBKDF2_ITERATIONS, &mut derived);

    let mut key_enc = [0u8; KEY_LEN];
    let mut key_mac = [0u8; KEY_LEN];
    key_enc.copy_from_slice(&derived[0..KEY_LEN]);
    key_mac.copy_from_slice(&derived[KEY_LEN..2 * KEY_LEN]);

    let mut counter = [0u8; BLOCK_SIZE];
    if derive_iv {
        counter.copy_from_slice(&derived[2 * KEY_LEN..2 * KEY_LEN + BLOCK_SIZE]);
    }

    (key_enc, key_mac, counter)
}

/// Encrypts `plaintext` under `passphrase`, returning the armoured body
/// (base64, hard-wrapped at 80 columns, with a trailing newline on every
/// line) but not the header line.
pub fn encrypt(plaintext: &[u8], passphrase: &Passphrase) -> Vec<u8> {
    let mut salt = [0u8; SALT_LEN];
    rand::rngs::OsRng.fill_bytes(&mut salt);

    let (key_enc, key_mac, _) = derive_keys(passphrase, &salt, false);

    let mut ciphertext = plaintext.to_vec();
    let mut cipher = Aes256Ctr::new(&key_enc.into(), &[0u8; BLOCK_SIZE].into());
    cipher.apply_keystream(&mut ciphertext);

    let mut mac_engine = HmacSha256::new_from_slice(&key_mac).expect("HMAC accepts any key length");
    mac_engine.update(&ciphertext);
    let mac = mac_engine.finalize().into_bytes();

    let mut combined = Vec::with_capacity(SALT_LEN + MAC_LEN + ciphertext.len());
    combined.extend_from_slice(&salt);
    combined.extend_from_slice(&mac);
    combined.extend_from_slice(&ciphertext);

    let encoded = base64::engine::general_purpose::STANDARD.encode(&combined);
    wrap_lines(&encoded, WRAP_COLUMN)
}

/// Hard-wraps `text` into lines of `width` characters, each terminated with
/// `\n`, including the final (possibly short) line.
fn wrap_lines(text: &str, width: usize) -> Vec<u8> {
    let bytes = text.as_bytes();
    let mut out = Vec::with_capacity(bytes.len() + bytes.len() / width + 1);
    for chunk in bytes.chunks(width) {
        out.extend_from_slice(chunk);
        out.push(b'\n');
    }
    out
}

/// Decrypts `body` under `passphrase`. `cipher_version` is the tag parsed
/// from the header (`"1.1"` selects the legacy hex/derived-IV variant,
/// anything else the modern base64/zero-IV variant).
///
/// # Errors
///
/// Returns [`Error::AuthFailure`] on MAC mismatch or malformed body framing.
pub fn decrypt(body: &[u8], passphrase: &Passphrase, cipher_version: &str) -> Result<Vec<u8>> {
    let (salt, mac, ciphertext, derive_iv) = if cipher_version == "1.1" {
        let (salt, mac, ciphertext) = split_legacy_hex_fields(body)?;
        (salt, mac, ciphertext, true)
    } else {
        let mut text = String::with_capacity(body.len());
        for &b in body {
            if b != b'\n' {
                text.push(b as char);
            }
        }
        let combined = base64::engine::general_purpose::STANDARD
            .decode(text.as_bytes())
            .map_err(|_| Error::AuthFailure)?;
        if combined.len() < SALT_LEN + MAC_LEN {
            return Err(Error::AuthFailure);
        }
        let salt = combined[0..SALT_LEN].to_vec();
        let mac = combined[SALT_LEN..SALT_LEN + MAC_LEN].to_vec();
        let ciphertext = combined[SALT_LEN + MAC_LEN..].to_vec();
        (salt, mac, ciphertext, false)
    };

    let (key_enc, key_mac, counter) = derive_keys(passphrase, &salt, derive_iv);

    let mut mac_engine = HmacSha256::new_from_slice(&key_mac).expect("HMAC accepts any key length");
    mac_engine.update(&ciphertext);
    let computed_mac = mac_engine.finalize().into_bytes();

    if !constant_time_eq(&computed_mac, &mac) {
        return Err(Error::AuthFailure);
    }

    let mut plaintext = ciphertext;
    let mut cipher = Aes256Ctr::new(&key_enc.into(), &counter.into());
    cipher.apply_keystream(&mut plaintext);

    if cipher_version == "1.1" {
        // Spurious pseudo-PKCS#7 padding from the 1.1 format: strip the last
        // byte's value worth of trailing bytes without validating them.
        if let Some(&last) = plaintext.last() {
            let padding_len = last as usize;
            if padding_len <= plaintext.len() {
                plaintext.truncate(plaintext.len() - padding_len);
            }
        }
    }

    Ok(plaintext)
}

/// Splits a legacy `1.1` body into its three newline-separated hex fields
/// and hex-decodes each.
fn split_legacy_hex_fields(body: &[u8]) -> Result<(Vec<u8>, Vec<u8>, Vec<u8>)> {
    let text = std::str::from_utf8(body).map_err(|_| Error::AuthFailure)?;
    let mut fields = text.lines().map(str::trim).filter(|l| !l.is_empty());

    let salt_hex = fields.next().ok_or(Error::AuthFailure)?;
    let mac_hex = fields.next().ok_or(Error::AuthFailure)?;
    let ciphertext_hex = fields.next().ok_or(Error::AuthFailure)?;

    let salt = hex::decode(salt_hex).map_err(|_| Error::AuthFailure)?;
    let mac = hex::decode(mac_hex).map_err(|_| Error::AuthFailure)?;
    let ciphertext = hex::decode(ciphertext_hex).map_err(|_| Error::AuthFailure)?;

    Ok((salt, mac, ciphertext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let passphrase = Passphrase::new("secret");
        let plaintext = b"hello\n";
        let body = encrypt(plaintext, &passphrase);
        let decrypted = decrypt(&body, &passphrase, "1.2").unwrap();
        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn different_salts_each_time() {
        let passphrase = Passphrase::new("secret");
        let a = encrypt(b"hello", &passphrase);
        let b = encrypt(b"hello", &passphrase);
        assert_ne!(a, b);
    }

    #[test]
    fn wrong_passphrase_fails() {
        let passphrase = Passphrase::new("secret");
        let other = Passphrase::new("wrong");
        let body = encrypt(b"hello", &passphrase);
        let err = decrypt(&body, &other, "1.2").unwrap_err();
        assert!(matches!(err, Error::AuthFailure));
    }

    #[test]
    fn bit_flip_in_body_fails() {
        let passphrase = Passphrase::new("secret");
        let mut body = encrypt(b"hello world", &passphrase);
        // Flip a bit deep enough to land inside the base64 payload, not the
        // trailing newline.
        let idx = body.len() / 2;
        body[idx] ^= 0x01;
        let err = decrypt(&body, &passphrase, "1.2").unwrap_err();
        assert!(matches!(err, Error::AuthFailure));
    }

    #[test]
    fn legacy_1_1_round_trip_fixture() {
        let passphrase = Passphrase::new("secret");
        let salt = [7u8; SALT_LEN];
        let (key_enc, key_mac, counter) = derive_keys(&passphrase, &salt, true);

        let plaintext = b"hello\n".to_vec();
        let padding_len = 4u8;
        let mut padded = plaintext.clone();
        padded.extend(std::iter::repeat(padding_len).take(padding_len as usize));

        let mut ciphertext = padded.clone();
        let mut cipher = Aes256Ctr::new(&key_enc.into(), &counter.into());
        cipher.apply_keystream(&mut ciphertext);

        let mut mac_engine = HmacSha256::new_from_slice(&key_mac).unwrap();
        mac_engine.update(&ciphertext);
        let mac = mac_engine.finalize().into_bytes();

        let body = format!(
            "{}\n{}\n{}\n",
            hex::encode(salt),
            hex::encode(mac),
            hex::encode(&ciphertext)
        );

        let decrypted = decrypt(body.as_bytes(), &passphrase, "1.1").unwrap();
        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn wrap_lines_wraps_at_width() {
        let text = "a".repeat(200);
        let wrapped = wrap_lines(&text, 80);
        let wrapped_str = String::from_utf8(wrapped).unwrap();
        let lines: Vec<&str> = wrapped_str.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].len(), 80);
        assert_eq!(lines[1].len(), 80);
        assert_eq!(lines[2].len(), 40);
    }
}

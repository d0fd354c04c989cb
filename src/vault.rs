//! The vault facade: binds a passphrase to the container codec and cipher
//! suite, offering whole-payload `encrypt`/`decrypt`.

use crate::container;
use crate::crypto::{Cipher, CipherName, Passphrase};
use crate::error::{Error, Result};

/// Binds a passphrase (if any) to the cipher suite and container codec.
///
/// A `Vault` is otherwise stateless: it holds no file handles, no cached
/// keys, and performs no I/O. It is bound to one passphrase for its
/// lifetime; rekeying means constructing a second `Vault` under the new
/// passphrase, not mutating this one.
#[derive(Clone)]
pub struct Vault {
    passphrase: Option<Passphrase>,
}

/// The outcome of decrypting an armoured payload: the parsed version and
/// cipher metadata alongside the recovered plaintext.
#[derive(Debug, Clone)]
pub struct Decrypted {
    /// The container (envelope) version from the header, e.g. `"1.2"`.
    pub container_version: String,
    /// The cipher-name tag from the header, e.g. `"AES256"`.
    pub cipher_name: String,
    /// The cipher-version tag from the header.
    pub cipher_version: String,
    /// The recovered plaintext.
    pub plaintext: Vec<u8>,
}

impl Vault {
    /// Creates a vault bound to `passphrase`.
    pub fn new(passphrase: Passphrase) -> Self {
        Self {
            passphrase: Some(passphrase),
        }
    }

    /// Creates a vault with no bound passphrase. Only `decrypt` is
    /// meaningful to call (and will fail with [`Error::PasswordRequired`]);
    /// this exists for callers (e.g. `is_encrypted` checks) that don't yet
    /// have a passphrase in hand.
    pub fn without_passphrase() -> Self {
        Self { passphrase: None }
    }

    /// Returns `true` iff `data` begins with the vault magic header.
    ///
    /// This is a free function in all but name: it does not consult the
    /// bound passphrase.
    pub fn is_encrypted(&self, data: &[u8]) -> bool {
        container::is_vault(data)
    }

    /// Encrypts `plaintext`, selecting `cipher_name` if given and in the
    /// write set, otherwise defaulting to `AES256`.
    ///
    /// # Errors
    ///
    /// - [`Error::AlreadyEncrypted`] if `plaintext` already looks armoured.
    /// - [`Error::PasswordRequired`] if no passphrase is bound.
    pub fn encrypt(&self, plaintext: &[u8], cipher_name: Option<CipherName>) -> Result<Vec<u8>> {
        if self.is_encrypted(plaintext) {
            return Err(Error::AlreadyEncrypted);
        }
        let passphrase = self.passphrase.as_ref().ok_or(Error::PasswordRequired)?;

        let name = match cipher_name {
            Some(name) if name.is_write_allowed() => name,
            _ => CipherName::Aes256,
        };
        let cipher = Cipher::for_name(name);

        let body = cipher.encrypt(plaintext, passphrase)?;
        Ok(container::emit(name, cipher.version_tag(), &body))
    }

    /// Decrypts an armoured payload.
    ///
    /// # Errors
    ///
    /// - [`Error::NotVault`] / [`Error::MalformedHeader`] on a bad header.
    /// - [`Error::UnknownCipher`] if the cipher name is outside the read set.
    /// - [`Error::PasswordRequired`] if no passphrase is bound.
    /// - [`Error::AuthFailure`] on MAC or digest mismatch.
    pub fn decrypt(&self, armoured: &[u8]) -> Result<Decrypted> {
        let passphrase = self.passphrase.as_ref().ok_or(Error::PasswordRequired)?;

        let parsed = container::parse(armoured)?;
        let name = CipherName::parse(&parsed.cipher_name)
            .ok_or_else(|| Error::UnknownCipher(parsed.cipher_name.clone()))?;
        let cipher = Cipher::for_name(name);

        let plaintext = cipher.decrypt(parsed.body, passphrase, &parsed.cipher_version)?;

        Ok(Decrypted {
            container_version: parsed.container_version,
            cipher_name: parsed.cipher_name,
            cipher_version: parsed.cipher_version,
            plaintext,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modern_round_trip() {
        let vault = Vault::new(Passphrase::new("secret"));
        let armoured = vault.encrypt(b"hello\n", None).unwrap();
        let decrypted = vault.decrypt(&armoured).unwrap();
        assert_eq!(decrypted.plaintext, b"hello\n");
        assert_eq!(decrypted.cipher_name, "AES256");
        assert_eq!(decrypted.cipher_version, "1.2");
    }

    #[test]
    fn is_encrypted_checks_header() {
        let vault = Vault::without_passphrase();
        let armoured = Vault::new(Passphrase::new("secret"))
            .encrypt(b"hi", None)
            .unwrap();
        assert!(vault.is_encrypted(&armoured));
        assert!(!vault.is_encrypted(b"plain bytes"));
    }

    #[test]
    fn encrypt_refuses_already_armoured_input() {
        let vault = Vault::new(Passphrase::new("secret"));
        let armoured = vault.encrypt(b"hello", None).unwrap();
        let err = vault.encrypt(&armoured, None).unwrap_err();
        assert!(matches!(err, Error::AlreadyEncrypted));
    }

    #[test]
    fn decrypt_without_passphrase_requires_one() {
        let vault = Vault::without_passphrase();
        let err = vault
            .decrypt(b"$ANSIBLE_VAULT;1.2;AES256;1.2\nYmFzZTY0\n")
            .unwrap_err();
        assert!(matches!(err, Error::PasswordRequired));
    }

    #[test]
    fn decrypt_wrong_passphrase_is_auth_failure() {
        let vault = Vault::new(Passphrase::new("secret"));
        let armoured = vault.encrypt(b"hello", None).unwrap();
        let other = Vault::new(Passphrase::new("wrong"));
        let err = other.decrypt(&armoured).unwrap_err();
        assert!(matches!(err, Error::AuthFailure));
    }

    #[test]
    fn decrypt_unknown_cipher() {
        let vault = Vault::new(Passphrase::new("secret"));
        let err = vault
            .decrypt(b"$ANSIBLE_VAULT;1.2;DES;1.2\nbody\n")
            .unwrap_err();
        assert!(matches!(err, Error::UnknownCipher(_)));
    }

    #[test]
    fn encrypt_defaults_to_aes256_for_unwritable_cipher() {
        let vault = Vault::new(Passphrase::new("secret"));
        let armoured = vault.encrypt(b"hello", Some(CipherName::Aes)).unwrap();
        let decrypted = vault.decrypt(&armoured).unwrap();
        assert_eq!(decrypted.cipher_name, "AES256");
    }
}

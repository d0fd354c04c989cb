//! Passphrase handling for vault encryption.

use zeroize::Zeroizing;

/// A passphrase bound to a [`crate::Vault`].
///
/// Stored in a [`Zeroizing`] buffer so the underlying bytes are wiped when
/// the value is dropped. Never printed, logged, or serialized.
#[derive(Clone)]
pub struct Passphrase {
    inner: Zeroizing<String>,
}

impl Passphrase {
    /// Creates a new passphrase from a string.
    pub fn new<S: Into<String>>(passphrase: S) -> Self {
        Self {
            inner: Zeroizing::new(passphrase.into()),
        }
    }

    /// Returns the passphrase as UTF-8 bytes, as consumed by the key
    /// derivation function.
    pub fn as_bytes(&self) -> &[u8] {
        self.inner.as_bytes()
    }

    /// Returns the passphrase as a string slice.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Returns true if the passphrase is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the length of the passphrase in characters.
    pub fn len(&self) -> usize {
        self.inner.chars().count()
    }
}

impl std::fmt::Debug for Passphrase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never expose the actual passphrase in debug output.
        f.debug_struct("Passphrase")
            .field("len", &self.inner.len())
            .finish()
    }
}

impl From<&str> for Passphrase {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Passphrase {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

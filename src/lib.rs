//! # cryptvault
//!
//! A small library for encrypting and decrypting single files with a
//! shared passphrase, compatible with the `$ANSIBLE_VAULT` armoured
//! container format.
//!
//! ## Quick Start
//!
//! ```rust
//! use cryptvault::{Vault, Passphrase};
//!
//! let vault = Vault::new(Passphrase::new("correct horse battery staple"));
//! let armoured = vault.encrypt(b"the launch code is 1234", None).unwrap();
//! assert!(vault.is_encrypted(&armoured));
//!
//! let decrypted = vault.decrypt(&armoured).unwrap();
//! assert_eq!(decrypted.plaintext, b"the launch code is 1234");
//! ```
//!
//! ## Layers
//!
//! - [`crypto`]: the cipher suite (key derivation, AES-256-CTR+HMAC, the
//!   legacy decrypt-only AES-256-CBC cipher).
//! - [`container`]: the armoured text envelope (`$ANSIBLE_VAULT;...` header
//!   plus wrapped body) that wraps cipher output.
//! - [`vault`]: [`Vault`], the facade that binds a passphrase to the cipher
//!   suite and container codec for whole-payload encrypt/decrypt.
//! - [`editor`]: file-level operations built on top of a `Vault` — create,
//!   edit-in-`$EDITOR`, view, rekey, and one-shot encrypt/decrypt of files
//!   on disk, including secure erasure of plaintext temp files.
//! - [`ownership`]: Unix mode/uid/gid capture and restore, used by the
//!   editor workflow to preserve a target file's permissions across an
//!   atomic replace.
//! - [`error`]: the [`Error`] enum and [`Result`] alias shared by every
//!   layer above.
//!
//! ## Error Handling
//!
//! All operations return [`Result<T>`], which is an alias for
//! `std::result::Result<T, Error>`. See [`error`] for the full taxonomy of
//! failure modes and how to distinguish format errors, authentication
//! errors, and I/O errors.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli` | Yes | Builds the `cryptvault` command-line binary |
//!
//! ### Disabling the CLI
//!
//! To build just the library, without `clap`/`rpassword`/`ctrlc`:
//!
//! ```toml
//! [dependencies]
//! cryptvault = { version = "1.0", default-features = false }
//! ```
//!
//! ## Minimum Supported Rust Version (MSRV)
//!
//! This crate requires **Rust 1.85** or later.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod container;
pub mod crypto;
pub mod editor;
pub mod error;
pub mod ownership;
pub mod vault;

pub use crypto::{Cipher, CipherName, Passphrase};
pub use editor::VaultEditor;
pub use error::{Error, Result};
pub use ownership::UnixOwnership;
pub use vault::{Decrypted, Vault};

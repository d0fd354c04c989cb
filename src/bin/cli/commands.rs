//! Implementations of each CLI subcommand.

use std::path::{Path, PathBuf};

use cryptvault::{Vault, VaultEditor};

use crate::exit_codes::{self, ExitCode};
use crate::password::resolve_passphrase;

fn handle_io_err(context: &str, error: std::io::Error) -> ExitCode {
    eprintln!("Error: {context}: {error}");
    ExitCode::IoError
}

fn handle_lib_err(error: cryptvault::Error) -> ExitCode {
    eprintln!("Error: {error}");
    exit_codes::error_to_exit_code(&error)
}

/// `cryptvault create <path>`
pub fn create(path: &Path, password_file: Option<&Path>) -> ExitCode {
    let passphrase = match resolve_passphrase(password_file, true) {
        Ok(p) => p,
        Err(e) => return handle_io_err("reading password", e),
    };

    let editor = VaultEditor::new(Vault::new(passphrase));
    match editor.create_file(path) {
        Ok(()) => {
            println!("Created {}", path.display());
            ExitCode::Success
        }
        Err(e) => handle_lib_err(e),
    }
}

/// `cryptvault edit <path>`
pub fn edit(path: &Path, password_file: Option<&Path>) -> ExitCode {
    let passphrase = match resolve_passphrase(password_file, false) {
        Ok(p) => p,
        Err(e) => return handle_io_err("reading password", e),
    };

    let editor = VaultEditor::new(Vault::new(passphrase));
    match editor.edit_file(path) {
        Ok(()) => ExitCode::Success,
        Err(e) => handle_lib_err(e),
    }
}

/// `cryptvault view <path>`
pub fn view(path: &Path, password_file: Option<&Path>) -> ExitCode {
    use std::io::Write;

    let passphrase = match resolve_passphrase(password_file, false) {
        Ok(p) => p,
        Err(e) => return handle_io_err("reading password", e),
    };

    let editor = VaultEditor::new(Vault::new(passphrase));
    match editor.view(path) {
        Ok(plaintext) => {
            if std::io::stdout().lock().write_all(&plaintext).is_err() {
                return ExitCode::IoError;
            }
            ExitCode::Success
        }
        Err(e) => handle_lib_err(e),
    }
}

/// `cryptvault encrypt <path> [-o <output>]`
pub fn encrypt(path: &Path, output: Option<&PathBuf>, password_file: Option<&Path>) -> ExitCode {
    let passphrase = match resolve_passphrase(password_file, true) {
        Ok(p) => p,
        Err(e) => return handle_io_err("reading password", e),
    };

    let editor = VaultEditor::new(Vault::new(passphrase));
    match editor.encrypt_file(path, output.map(PathBuf::as_path)) {
        Ok(()) => {
            println!("Encrypted {}", path.display());
            ExitCode::Success
        }
        Err(e) => handle_lib_err(e),
    }
}

/// `cryptvault decrypt <path> [-o <output>]`
pub fn decrypt(path: &Path, output: Option<&PathBuf>, password_file: Option<&Path>) -> ExitCode {
    let passphrase = match resolve_passphrase(password_file, false) {
        Ok(p) => p,
        Err(e) => return handle_io_err("reading password", e),
    };

    let editor = VaultEditor::new(Vault::new(passphrase));
    match editor.decrypt_file(path, output.map(PathBuf::as_path)) {
        Ok(()) => {
            println!("Decrypted {}", path.display());
            ExitCode::Success
        }
        Err(e) => handle_lib_err(e),
    }
}

/// `cryptvault rekey <path>`
pub fn rekey(path: &Path, password_file: Option<&Path>, new_password_file: Option<&Path>) -> ExitCode {
    let old_passphrase = match resolve_passphrase(password_file, false) {
        Ok(p) => p,
        Err(e) => return handle_io_err("reading current password", e),
    };
    let new_passphrase = match resolve_passphrase(new_password_file, true) {
        Ok(p) => p,
        Err(e) => return handle_io_err("reading new password", e),
    };

    let editor = VaultEditor::new(Vault::new(old_passphrase));
    let new_vault = Vault::new(new_passphrase);
    match editor.rekey_file(path, &new_vault) {
        Ok(()) => {
            println!("Rekeyed {}", path.display());
            ExitCode::Success
        }
        Err(e) => handle_lib_err(e),
    }
}

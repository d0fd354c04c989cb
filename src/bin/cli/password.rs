//! Passphrase sourcing for CLI operations.
//!
//! Resolution order: `--vault-password-file`, then the `VAULT_PASSWORD`
//! environment variable, then an interactive prompt.

use std::path::Path;

use cryptvault::Passphrase;
use rpassword::prompt_password;

/// Resolves the passphrase to use for an operation, trying
/// `password_file`, then `VAULT_PASSWORD`, then an interactive prompt (with
/// confirmation if `confirm` is set, e.g. when creating a new vault).
pub fn resolve_passphrase(password_file: Option<&Path>, confirm: bool) -> std::io::Result<Passphrase> {
    if let Some(path) = password_file {
        let contents = std::fs::read_to_string(path)?;
        let trimmed = contents.strip_suffix('\n').unwrap_or(&contents);
        let trimmed = trimmed.strip_suffix('\r').unwrap_or(trimmed);
        return Ok(Passphrase::new(trimmed));
    }

    if let Ok(value) = std::env::var("VAULT_PASSWORD") {
        return Ok(Passphrase::new(value));
    }

    if confirm {
        prompt_with_confirmation()
    } else {
        let password = prompt_password("Vault password: ")?;
        Ok(Passphrase::new(password))
    }
}

fn prompt_with_confirmation() -> std::io::Result<Passphrase> {
    loop {
        let first = prompt_password("New vault password: ")?;
        let second = prompt_password("Confirm new vault password: ")?;
        if first == second {
            return Ok(Passphrase::new(first));
        }
        eprintln!("passwords do not match, try again");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_and_trims_password_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vault-pass");
        std::fs::write(&path, "secret\n").unwrap();

        let passphrase = resolve_passphrase(Some(&path), false).unwrap();
        assert_eq!(passphrase.as_str(), "secret");
    }

    #[test]
    #[serial_test::serial]
    fn password_file_takes_priority_over_env() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vault-pass");
        std::fs::write(&path, "from-file").unwrap();

        // SAFETY: this test does not run concurrently with other env mutation in this process.
        unsafe { std::env::set_var("VAULT_PASSWORD", "from-env") };
        let passphrase = resolve_passphrase(Some(&path), false).unwrap();
        unsafe { std::env::remove_var("VAULT_PASSWORD") };

        assert_eq!(passphrase.as_str(), "from-file");
    }
}

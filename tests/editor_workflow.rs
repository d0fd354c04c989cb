//! End-to-end tests of the editor workflow through `VaultEditor`, driving
//! a real child process as `$EDITOR`.

use cryptvault::{Passphrase, Vault, VaultEditor};
use serial_test::serial;

fn vault(password: &str) -> Vault {
    Vault::new(Passphrase::new(password))
}

/// Points `$EDITOR` at a script that exits successfully without touching
/// its argument, simulating a user who opens the file and quits without
/// saving any change.
fn set_noop_editor() {
    // SAFETY: every test touching EDITOR is #[serial], so this process-wide
    // mutation cannot race with another test's own EDITOR value.
    unsafe { std::env::set_var("EDITOR", "true") };
}

/// Points `$EDITOR` at a script that appends a marker line to its argument.
fn set_appending_editor(dir: &std::path::Path) -> std::path::PathBuf {
    let script = dir.join("append_editor.sh");
    std::fs::write(&script, "#!/bin/sh\necho appended >> \"$1\"\n").unwrap();
    let mut perms = std::fs::metadata(&script).unwrap().permissions();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        perms.set_mode(0o755);
    }
    std::fs::set_permissions(&script, perms).unwrap();
    script
}

#[test]
#[serial]
fn edit_with_no_change_leaves_file_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("secrets.yml");

    let v = vault("secret");
    let original = v.encrypt(b"unchanged content\n", None).unwrap();
    std::fs::write(&path, &original).unwrap();

    set_noop_editor();
    let editor = VaultEditor::new(v);
    editor.edit_file(&path).unwrap();

    let after = std::fs::read(&path).unwrap();
    assert_eq!(after, original, "no-op edit must not rewrite the file or rotate the salt");
}

#[test]
#[serial]
fn edit_with_a_change_re_encrypts_with_new_salt() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("secrets.yml");

    let v = vault("secret");
    let original = v.encrypt(b"before\n", None).unwrap();
    std::fs::write(&path, &original).unwrap();

    // SAFETY: see set_noop_editor.
    let script = set_appending_editor(dir.path());
    unsafe { std::env::set_var("EDITOR", &script) };

    let editor = VaultEditor::new(v.clone());
    editor.edit_file(&path).unwrap();

    let after = std::fs::read(&path).unwrap();
    assert_ne!(after, original);

    let decrypted = v.decrypt(&after).unwrap();
    assert_eq!(decrypted.plaintext, b"before\nappended\n");
}

#[cfg(unix)]
#[test]
fn rekey_preserves_file_mode_and_owner() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("secrets.yml");

    let old_vault = vault("old-pass");
    let armoured = old_vault.encrypt(b"rotate me\n", None).unwrap();
    std::fs::write(&path, armoured).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o640)).unwrap();

    let editor = VaultEditor::new(old_vault.clone());
    let new_vault = vault("new-pass");
    editor.rekey_file(&path, &new_vault).unwrap();

    let mode = std::fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o640);

    let rekeyed = std::fs::read(&path).unwrap();
    assert_eq!(new_vault.decrypt(&rekeyed).unwrap().plaintext, b"rotate me\n");
    assert!(old_vault.decrypt(&rekeyed).is_err());
}

#[test]
#[serial]
fn create_with_empty_save_does_not_create_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("secrets.yml");

    set_noop_editor();
    let editor = VaultEditor::new(vault("secret"));
    editor.create_file(&path).unwrap();

    assert!(!path.exists(), "an empty save should abandon file creation");
}

#[test]
#[serial]
fn create_then_view_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("secrets.yml");

    let script = set_appending_editor(dir.path());
    // SAFETY: see set_noop_editor.
    unsafe { std::env::set_var("EDITOR", &script) };

    let editor = VaultEditor::new(vault("secret"));
    editor.create_file(&path).unwrap();

    assert!(path.exists());
    let viewed = editor.view(&path).unwrap();
    assert_eq!(viewed, b"appended\n");
}

#[test]
#[serial]
fn create_then_edit_with_no_change_is_a_true_no_op() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("secrets.yml");

    let script = set_appending_editor(dir.path());
    // SAFETY: see set_noop_editor.
    unsafe { std::env::set_var("EDITOR", &script) };

    let v = vault("secret");
    let editor = VaultEditor::new(v.clone());
    editor.create_file(&path).unwrap();
    let first = std::fs::read(&path).unwrap();

    set_noop_editor();
    editor.edit_file(&path).unwrap();
    let second = std::fs::read(&path).unwrap();

    assert_eq!(first, second);
}

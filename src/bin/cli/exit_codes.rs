//! Process exit codes for the CLI tool.
//!
//! Every [`Error`] variant maps to a distinct, stable code so calling
//! scripts can branch on failure kind without scraping stderr.

use cryptvault::Error;

/// Operation completed successfully.
pub const SUCCESS: i32 = 0;
/// Fatal, otherwise-unclassified error.
pub const FATAL_ERROR: i32 = 2;
/// Input was not a recognised vault container, or its header was malformed.
pub const BAD_CONTAINER: i32 = 3;
/// Cipher name outside the read set, or a refused write to a read-only cipher.
pub const BAD_CIPHER: i32 = 4;
/// Wrong passphrase or missing passphrase.
pub const AUTH_ERROR: i32 = 5;
/// Editor-workflow caller misuse: target already encrypted or already exists.
pub const WORKFLOW_ERROR: i32 = 6;
/// I/O error.
pub const IO_ERROR: i32 = 7;
/// Ctrl+C (128 + SIGINT).
pub const USER_INTERRUPT: i32 = 130;
/// Invalid command-line arguments.
pub const BAD_ARGS: i32 = 255;

/// Exit code enum for structured handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success,
    FatalError,
    BadContainer,
    BadCipher,
    AuthError,
    WorkflowError,
    IoError,
    UserInterrupt,
    BadArgs,
}

impl ExitCode {
    /// Returns the numeric exit code.
    pub fn code(self) -> i32 {
        match self {
            Self::Success => SUCCESS,
            Self::FatalError => FATAL_ERROR,
            Self::BadContainer => BAD_CONTAINER,
            Self::BadCipher => BAD_CIPHER,
            Self::AuthError => AUTH_ERROR,
            Self::WorkflowError => WORKFLOW_ERROR,
            Self::IoError => IO_ERROR,
            Self::UserInterrupt => USER_INTERRUPT,
            Self::BadArgs => BAD_ARGS,
        }
    }
}

/// Converts a library error to an exit code.
pub fn error_to_exit_code(error: &Error) -> ExitCode {
    match error {
        Error::NotVault | Error::MalformedHeader(_) => ExitCode::BadContainer,
        Error::UnknownCipher(_) | Error::DeprecatedEncrypt => ExitCode::BadCipher,
        Error::AuthFailure | Error::PasswordRequired => ExitCode::AuthError,
        Error::AlreadyEncrypted | Error::AlreadyExists(_) => ExitCode::WorkflowError,
        Error::CryptoUnavailable => ExitCode::FatalError,
        Error::IoError(_) => ExitCode::IoError,
        // Future error variants — required by #[non_exhaustive].
        _ => ExitCode::FatalError,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_variant_maps_to_a_distinct_recoverable_code() {
        let cases: Vec<(Error, ExitCode)> = vec![
            (Error::NotVault, ExitCode::BadContainer),
            (Error::MalformedHeader("x".into()), ExitCode::BadContainer),
            (Error::UnknownCipher("DES".into()), ExitCode::BadCipher),
            (Error::DeprecatedEncrypt, ExitCode::BadCipher),
            (Error::AuthFailure, ExitCode::AuthError),
            (Error::PasswordRequired, ExitCode::AuthError),
            (Error::AlreadyEncrypted, ExitCode::WorkflowError),
            (Error::AlreadyExists("f".into()), ExitCode::WorkflowError),
            (Error::CryptoUnavailable, ExitCode::FatalError),
            (
                Error::IoError(std::io::Error::new(std::io::ErrorKind::NotFound, "x")),
                ExitCode::IoError,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error_to_exit_code(&error), expected, "{error}");
        }
    }

    #[test]
    fn codes_are_pairwise_distinct() {
        let codes = [
            SUCCESS,
            FATAL_ERROR,
            BAD_CONTAINER,
            BAD_CIPHER,
            AUTH_ERROR,
            WORKFLOW_ERROR,
            IO_ERROR,
            USER_INTERRUPT,
            BAD_ARGS,
        ];
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}

//! CLI tool for vault-encrypted file operations.

mod commands;
mod exit_codes;
mod password;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use std::path::PathBuf;

use exit_codes::ExitCode;

/// File-level symmetric encryption with an editor workflow
#[derive(Parser)]
#[command(name = "cryptvault")]
#[command(author, version, about = "File-level symmetric encryption with an editor workflow", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Read the vault password from this file instead of prompting
    #[arg(long, global = true, env = "VAULT_PASSWORD_FILE")]
    vault_password_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new encrypted file
    Create {
        /// File to create
        path: PathBuf,
    },

    /// Edit an encrypted file in $EDITOR, re-encrypting on save
    Edit {
        /// File to edit
        path: PathBuf,
    },

    /// Print the decrypted contents of a file to stdout
    View {
        /// File to view
        path: PathBuf,
    },

    /// Encrypt a plaintext file
    Encrypt {
        /// File to encrypt
        path: PathBuf,

        /// Write the result here instead of overwriting `path`
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },

    /// Decrypt an encrypted file
    Decrypt {
        /// File to decrypt
        path: PathBuf,

        /// Write the result here instead of overwriting `path`
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },

    /// Re-encrypt a file under a new password
    Rekey {
        /// File to rekey
        path: PathBuf,

        /// Read the new password from this file instead of prompting
        #[arg(long)]
        new_vault_password_file: Option<PathBuf>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new().filter_level(level).init();
}

fn main() {
    ctrlc::set_handler(move || {
        eprintln!("\nInterrupted");
        std::process::exit(exit_codes::USER_INTERRUPT);
    })
    .ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let password_file = cli.vault_password_file.as_deref();

    let exit_code = match cli.command {
        Commands::Create { path } => commands::create(&path, password_file),
        Commands::Edit { path } => commands::edit(&path, password_file),
        Commands::View { path } => commands::view(&path, password_file),
        Commands::Encrypt { path, output } => commands::encrypt(&path, output.as_ref(), password_file),
        Commands::Decrypt { path, output } => commands::decrypt(&path, output.as_ref(), password_file),
        Commands::Rekey { path, new_vault_password_file } => {
            commands::rekey(&path, password_file, new_vault_password_file.as_deref())
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut std::io::stdout());
            ExitCode::Success
        }
    };

    std::process::exit(exit_code.code());
}

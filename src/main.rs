use anyhow::Result;
use clap::{Parser, Subcommand};
mod auth;
use scrypto::job::{self, JobOptions, Operation};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Debug, clap::Args)]
struct FileArgs {
    /// Files to process
    #[arg(required = true, value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Remove the original file after success
    #[arg(short, long)]
    remove: bool,

    /// Overwrite existing output files
    #[arg(short, long)]
    force: bool,

    /// Directory for output files (default: current directory)
    #[arg(short, long, value_name = "DIR", env = "SCRYPTO_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,
}

impl FileArgs {
    fn to_job_options(&self) -> JobOptions {
        JobOptions {
            output_dir: self.output_dir.clone(),
            remove: self.remove,
            overwrite: self.force,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "scrypto")]
#[command(version, about = "Encrypt files using 128-bit AES with a password.")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Encrypts files into <name>.enc
    #[command(visible_alias = "enc", arg_required_else_help = true)]
    Encrypt {
        #[command(flatten)]
        args: FileArgs,
    },

    /// Decrypts <name>.enc files into <name>.dec
    #[command(visible_alias = "dec", arg_required_else_help = true)]
    Decrypt {
        #[command(flatten)]
        args: FileArgs,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let (op, args) = match &cli.command {
        Commands::Encrypt { args } => (Operation::Encrypt, args),
        Commands::Decrypt { args } => (Operation::Decrypt, args),
    };

    let password = match op {
        Operation::Encrypt => auth::read_new_password_with_confirmation()?,
        Operation::Decrypt => auth::read_password()?,
    };

    let summary = job::run(
        op,
        &args.files,
        password.as_bytes(),
        &args.to_job_options(),
    );
    drop(password);

    for file in &summary.succeeded {
        println!("{}", job::success_message(op, file));
    }
    for (file, err) in &summary.failed {
        eprintln!("{}", job::failure_message(op, file, err));
    }

    Ok(if summary.all_succeeded() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

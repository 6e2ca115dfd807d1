//! Per-file encrypt and decrypt jobs.
//!
//! Each input file is processed on its own, in parallel: a failure is
//! reported and the remaining files still run.

use anyhow::{Context, Result, anyhow, bail};
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::format::armor;
use crate::storage::Storage;
use crate::{decrypt_file, encrypt_file};

/// Extension of encrypted files.
pub const ENCRYPTED_EXT: &str = "enc";
/// Extension given to decrypted output.
pub const DECRYPTED_EXT: &str = "dec";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Encrypt,
    Decrypt,
}

impl Operation {
    fn past_tense(self) -> &'static str {
        match self {
            Operation::Encrypt => "encrypted",
            Operation::Decrypt => "decrypted",
        }
    }

    fn gerund(self) -> &'static str {
        match self {
            Operation::Encrypt => "Encrypting",
            Operation::Decrypt => "Decrypting",
        }
    }
}

/// Options shared by every file in a run.
#[derive(Debug, Clone, Default)]
pub struct JobOptions {
    /// Directory for output files; the current directory when `None`.
    pub output_dir: Option<PathBuf>,
    /// Delete the source file after a successful write.
    pub remove: bool,
    /// Replace an existing output file.
    pub overwrite: bool,
}

/// Outcome of a [`run`].
#[derive(Debug, Default)]
pub struct Summary {
    pub succeeded: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, anyhow::Error)>,
}

impl Summary {
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Output path for `input`: its file stem with `ext`, inside the output dir.
pub fn output_path(input: &Path, ext: &str, opts: &JobOptions) -> Result<PathBuf> {
    let stem = input
        .file_stem()
        .with_context(|| format!("{} has no file name", input.display()))?;

    let mut name = stem.to_os_string();
    name.push(".");
    name.push(ext);
    let name = PathBuf::from(name);

    Ok(match &opts.output_dir {
        Some(dir) => dir.join(name),
        None => name,
    })
}

fn target_storage(source: &Path, path: PathBuf, opts: &JobOptions) -> Result<Storage> {
    let target = Storage::new(path);
    if target.path() == source || target.is_same_file(source) {
        bail!("output {} would replace its own input", target.path().display());
    }
    if target.exists() && !opts.overwrite {
        bail!("{} already exists", target.path().display());
    }
    Ok(target)
}

/// Encrypt one file and write `<stem>.enc` as hex text.
pub fn encrypt_path(path: &Path, password: &[u8], opts: &JobOptions) -> Result<PathBuf> {
    let source = Storage::new(path.to_path_buf());
    let target = target_storage(path, output_path(path, ENCRYPTED_EXT, opts)?, opts)?;

    let plaintext = Zeroizing::new(source.load()?);
    debug!(file = %path.display(), len = plaintext.len(), "read plaintext");

    let container = encrypt_file(password, &plaintext)?;
    target.save(&armor::encode(&container))?;

    if opts.remove {
        source.remove()?;
    }
    Ok(target.path().to_path_buf())
}

/// Decrypt one `.enc` file and write `<stem>.dec`.
pub fn decrypt_path(path: &Path, password: &[u8], opts: &JobOptions) -> Result<PathBuf> {
    if path.extension().and_then(|e| e.to_str()) != Some(ENCRYPTED_EXT) {
        bail!("{} is not a valid ciphertext", path.display());
    }

    let source = Storage::new(path.to_path_buf());
    let target = target_storage(path, output_path(path, DECRYPTED_EXT, opts)?, opts)?;

    let text = source.load()?;
    let container = armor::decode(&text)?;
    debug!(file = %path.display(), len = container.len(), "read container");

    let plaintext = decrypt_file(password, &container)?;
    target.save(&plaintext)?;

    if opts.remove {
        source.remove()?;
    }
    Ok(target.path().to_path_buf())
}

fn process(op: Operation, file: &Path, password: &[u8], opts: &JobOptions) -> Result<PathBuf> {
    match op {
        Operation::Encrypt => encrypt_path(file, password, opts),
        Operation::Decrypt => decrypt_path(file, password, opts),
    }
}

/// For each file, the earlier file that already writes the same output.
fn output_conflicts<'a>(
    op: Operation,
    files: &'a [PathBuf],
    opts: &JobOptions,
) -> Vec<Option<&'a Path>> {
    let ext = match op {
        Operation::Encrypt => ENCRYPTED_EXT,
        Operation::Decrypt => DECRYPTED_EXT,
    };
    let mut claimed: HashMap<PathBuf, &Path> = HashMap::new();

    files
        .iter()
        .map(|file| {
            let output = output_path(file, ext, opts).ok()?;
            match claimed.get(&output) {
                Some(first) => Some(*first),
                None => {
                    claimed.insert(output, file);
                    None
                }
            }
        })
        .collect()
}

/// Run `op` over every file in parallel, continuing past failures.
///
/// The summary lists files in input order.
pub fn run(op: Operation, files: &[PathBuf], password: &[u8], opts: &JobOptions) -> Summary {
    let conflicts = output_conflicts(op, files, opts);

    let results: Vec<Result<PathBuf>> = files
        .par_iter()
        .zip(conflicts)
        .map(|(file, conflict)| {
            let result = match conflict {
                Some(first) => Err(anyhow!(
                    "output would overwrite the one written for {}",
                    first.display()
                )),
                None => process(op, file, password, opts),
            };
            match &result {
                Ok(output) => {
                    info!(file = %file.display(), output = %output.display(), "file {}", op.past_tense())
                }
                Err(e) => debug!(file = %file.display(), "{} failed: {e:#}", op.gerund()),
            }
            result
        })
        .collect();

    let mut summary = Summary::default();
    for (file, result) in files.iter().zip(results) {
        match result {
            Ok(_) => summary.succeeded.push(file.clone()),
            Err(e) => summary.failed.push((file.clone(), e)),
        }
    }
    summary
}

/// Message printed for a successful file.
pub fn success_message(op: Operation, file: &Path) -> String {
    let name = file.file_name().unwrap_or(file.as_os_str()).to_string_lossy();
    format!("File: {name} {}!", op.past_tense())
}

/// Message printed for a failed file.
pub fn failure_message(op: Operation, file: &Path, err: &anyhow::Error) -> String {
    format!("{} {} failed: {err:#}", op.gerund(), file.display())
}

//! Filesystem access for plaintext and encrypted files.

use anyhow::{Context, Result, anyhow};
use getrandom::fill;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// One file on disk.
///
/// Sources are read whole. Outputs are staged in a sibling temp file and
/// moved into place, so a failed operation leaves no partial output behind.
#[derive(Debug, Clone)]
pub struct Storage {
    path: PathBuf,
}

/// A staged `<name>.tmp.<hex>` file, deleted on drop unless persisted.
struct StagedFile {
    path: PathBuf,
    persisted: bool,
}

impl StagedFile {
    fn create(path: PathBuf) -> Result<(Self, File)> {
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .context("failed to create temporary file")?;
        Ok((
            Self {
                path,
                persisted: false,
            },
            file,
        ))
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if !self.persisted {
            let _ = fs::remove_file(&self.path);
        }
    }
}

impl Storage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Returns the path to the file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the entire file into memory.
    pub fn load(&self) -> Result<Vec<u8>> {
        fs::read(&self.path).with_context(|| format!("failed to read {}", self.path.display()))
    }

    /// Writes `data` through a temp file, fsyncs it and moves it over the
    /// target, creating parent directories as needed.
    ///
    /// On any error the temp file is removed and the target is untouched.
    pub fn save(&self, data: &[u8]) -> Result<()> {
        self.save_with(|file| file.write_all(data))
    }

    fn save_with(&self, write: impl FnOnce(&mut File) -> io::Result<()>) -> Result<()> {
        fs::create_dir_all(self.parent_dir())?;

        let (mut staged, mut file) = StagedFile::create(self.random_tmp_path()?)?;
        write(&mut file).context("failed to write temporary file")?;
        file.sync_all()?;
        drop(file);

        self.atomic_replace(&staged.path)?;
        staged.persisted = true;

        self.sync_parent_dir()
    }

    /// Deletes the file.
    pub fn remove(&self) -> Result<()> {
        fs::remove_file(&self.path)
            .with_context(|| format!("failed to remove {}", self.path.display()))
    }

    /// `true` if both paths exist and name the same file, however spelled.
    pub fn is_same_file(&self, other: &Path) -> bool {
        match (fs::canonicalize(&self.path), fs::canonicalize(other)) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }

    /// Directory holding the file; `.` for a bare file name.
    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        }
    }

    fn random_tmp_path(&self) -> Result<PathBuf> {
        let mut buf = [0u8; 8];
        fill(&mut buf).map_err(|_| anyhow!("OS random generator unavailable"))?;

        let file_name = self
            .path
            .file_name()
            .context("storage path has no file name")?
            .to_string_lossy();

        Ok(self
            .path
            .with_file_name(format!("{file_name}.tmp.{}", hex::encode(buf))))
    }

    /// `ReplaceFileW` with `REPLACEFILE_WRITE_THROUGH` when the target exists;
    /// a plain rename otherwise, since `ReplaceFileW` needs an existing target.
    #[cfg(target_os = "windows")]
    fn atomic_replace(&self, tmp_path: &Path) -> Result<()> {
        use std::ffi::OsStr;
        use std::os::windows::ffi::OsStrExt;
        use windows_sys::Win32::Storage::FileSystem::{REPLACEFILE_WRITE_THROUGH, ReplaceFileW};

        if !self.path.exists() {
            fs::rename(tmp_path, &self.path).context("failed to move output into place")?;
            return Ok(());
        }

        fn to_wide(s: &OsStr) -> Vec<u16> {
            s.encode_wide().chain(std::iter::once(0)).collect()
        }

        let target_w = to_wide(self.path.as_os_str());
        let tmp_w = to_wide(tmp_path.as_os_str());

        // SAFETY: both buffers are NUL-terminated UTF-16 and outlive the call.
        let result = unsafe {
            ReplaceFileW(
                target_w.as_ptr(),
                tmp_w.as_ptr(),
                std::ptr::null(),
                REPLACEFILE_WRITE_THROUGH,
                std::ptr::null(),
                std::ptr::null(),
            )
        };

        if result == 0 {
            return Err(io::Error::last_os_error()).context("atomic replace failed");
        }
        Ok(())
    }

    /// `rename()` is atomic within one filesystem, and the temp file is a sibling.
    #[cfg(not(target_os = "windows"))]
    fn atomic_replace(&self, tmp_path: &Path) -> Result<()> {
        fs::rename(tmp_path, &self.path).context("failed to move output into place")
    }

    #[cfg(not(target_os = "windows"))]
    fn sync_parent_dir(&self) -> Result<()> {
        File::open(self.parent_dir())?.sync_all()?;
        Ok(())
    }

    #[cfg(target_os = "windows")]
    fn sync_parent_dir(&self) -> Result<()> {
        Ok(())
    }
}

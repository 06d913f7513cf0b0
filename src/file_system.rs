use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Directory listing used to locate auxiliary documentation comment files
pub trait FileSystem: Send + Sync {
    /// Lists the files directly inside `dir` whose extension matches `extension`
    /// (case-insensitively, without the leading dot)
    fn files_with_extension(&self, dir: &Path, extension: &str) -> io::Result<Vec<PathBuf>>;
}

/// [FileSystem] backed by the real disk
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl FileSystem for LocalFileSystem {
    fn files_with_extension(&self, dir: &Path, extension: &str) -> io::Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if entry.file_type()?.is_file() && has_extension(&path, extension) {
                files.push(path);
            }
        }
        Ok(files)
    }
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}

/// Directory the application was deployed to: the one holding the running executable
pub fn application_base_path() -> io::Result<PathBuf> {
    let executable = std::env::current_exe()?;
    executable
        .parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "executable has no parent directory"))
}

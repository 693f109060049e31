//! Input file handles for batch validation.

use std::path::{Path, PathBuf};

use crate::error::ValidateError;

/// A file offered for validation: a name, a byte length, and a way to read
/// its contents.
#[allow(async_fn_in_trait)]
pub trait FileHandle {
    /// File name including its extension, without directories.
    fn name(&self) -> &str;

    fn size(&self) -> u64;

    async fn read_bytes(&self) -> Result<Vec<u8>, ValidateError>;
}

/// A file already held in memory.
#[derive(Debug, Clone)]
pub struct MemoryFile {
    name: String,
    data: Vec<u8>,
}

impl MemoryFile {
    pub fn new(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }
}

impl FileHandle for MemoryFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> u64 {
        self.data.len() as u64
    }

    async fn read_bytes(&self) -> Result<Vec<u8>, ValidateError> {
        Ok(self.data.clone())
    }
}

/// A file on disk. Contents are read only when validated.
#[derive(Debug, Clone)]
pub struct DiskFile {
    path: PathBuf,
    name: String,
    size: u64,
}

impl DiskFile {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ValidateError> {
        let path = path.into();
        let meta = std::fs::metadata(&path)?;
        if !meta.is_file() {
            return Err(ValidateError::other(format!(
                "{} is not a regular file",
                path.display()
            )));
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self {
            path,
            name,
            size: meta.len(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FileHandle for DiskFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> u64 {
        self.size
    }

    async fn read_bytes(&self) -> Result<Vec<u8>, ValidateError> {
        Ok(tokio::fs::read(&self.path).await?)
    }
}

/// Expand directories to the regular files directly inside them (not
/// recursive). Hidden files are skipped. Plain file paths are kept as given.
/// Each directory's files are sorted by name.
pub fn expand_paths(paths: &[PathBuf]) -> Result<Vec<PathBuf>, ValidateError> {
    let mut files = Vec::new();
    for path in paths {
        if !path.is_dir() {
            files.push(path.clone());
            continue;
        }
        let mut entries: Vec<PathBuf> = std::fs::read_dir(path)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file())
            .filter(|p| {
                !p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with('.'))
            })
            .collect();
        entries.sort();
        log::debug!("{}: {} files", path.display(), entries.len());
        files.extend(entries);
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_file() {
        let f = MemoryFile::new("a.gba", b"abcd".to_vec());
        assert_eq!(f.name(), "a.gba");
        assert_eq!(f.size(), 4);
        assert_eq!(f.read_bytes().await.unwrap(), b"abcd");
    }

    #[tokio::test]
    async fn test_disk_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("Foo (USA).gba");
        std::fs::write(&path, b"xyz").unwrap();

        let f = DiskFile::open(&path).unwrap();
        assert_eq!(f.name(), "Foo (USA).gba");
        assert_eq!(f.size(), 3);
        assert_eq!(f.read_bytes().await.unwrap(), b"xyz");

        assert!(DiskFile::open(tmp.path()).is_err());
        assert!(DiskFile::open(tmp.path().join("missing.gba")).is_err());
    }

    #[test]
    fn test_expand_paths() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("b.nes"), b"").unwrap();
        std::fs::write(tmp.path().join("a.gba"), b"").unwrap();
        std::fs::write(tmp.path().join(".hidden"), b"").unwrap();
        std::fs::create_dir(tmp.path().join("sub")).unwrap();
        std::fs::write(tmp.path().join("sub").join("c.sfc"), b"").unwrap();
        let single = tmp.path().join("sub").join("c.sfc");

        let files = expand_paths(&[tmp.path().to_path_buf(), single.clone()]).unwrap();
        assert_eq!(
            files,
            vec![tmp.path().join("a.gba"), tmp.path().join("b.nes"), single]
        );
    }
}

use std::fs;
use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::Builder;

use crate::error::ForgeError;
use crate::package::archive_name;

/// Suffix shared by every fetched and renamed sequence file. Format
/// compatibility constant expected by the packaging tool.
pub const SEQ_FILE_SUFFIX: &str = ".fa.gz";

/// Fixed filesystem layout under the configured working directory.
///
/// File existence within this layout is the sole idempotence check for the
/// whole pipeline; concurrent runs against the same root are a caller
/// responsibility.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: Utf8PathBuf,
}

impl Workspace {
    pub fn new(root: Utf8PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub fn seqs_dir(&self) -> Utf8PathBuf {
        self.root.join("seqs")
    }

    pub fn sequence_path(&self, id: &str) -> Utf8PathBuf {
        self.seqs_dir().join(format!("{id}{SEQ_FILE_SUFFIX}"))
    }

    pub fn seed_path(&self, package: &str) -> Utf8PathBuf {
        self.root.join(format!("{package}.seed"))
    }

    pub fn package_source_dir(&self, package: &str) -> Utf8PathBuf {
        self.root.join(package)
    }

    pub fn archive_path(&self, package: &str, version: &str) -> Utf8PathBuf {
        self.root.join(archive_name(package, version))
    }

    pub fn ensure_seqs_dir(&self) -> Result<(), ForgeError> {
        fs::create_dir_all(self.seqs_dir().as_std_path())
            .map_err(|err| ForgeError::Filesystem(err.to_string()))
    }

    pub fn write_bytes_atomic(path: &Utf8Path, content: &[u8]) -> Result<(), ForgeError> {
        let parent = path
            .parent()
            .ok_or_else(|| ForgeError::Filesystem("invalid destination path".to_string()))?;
        fs::create_dir_all(parent.as_std_path())
            .map_err(|err| ForgeError::Filesystem(err.to_string()))?;
        let mut temp = Builder::new()
            .prefix("seqforge")
            .tempfile_in(parent.as_std_path())
            .map_err(|err| ForgeError::Filesystem(err.to_string()))?;
        temp.write_all(content)
            .map_err(|err| ForgeError::Filesystem(err.to_string()))?;
        temp.persist(path.as_std_path())
            .map_err(|err| ForgeError::Filesystem(err.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_paths() {
        let workspace = Workspace::new(Utf8PathBuf::from("build"));

        assert_eq!(workspace.sequence_path("chr1"), "build/seqs/chr1.fa.gz");
        assert_eq!(workspace.seed_path("GenomePkg"), "build/GenomePkg.seed");
        assert_eq!(workspace.package_source_dir("GenomePkg"), "build/GenomePkg");
        assert_eq!(
            workspace.archive_path("GenomePkg", "1.0.0"),
            "build/GenomePkg_1.0.0.tar.gz"
        );
    }

    #[test]
    fn atomic_write_overwrites() {
        let temp = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
        let path = root.join("nested").join("out.txt");

        Workspace::write_bytes_atomic(&path, b"first").unwrap();
        Workspace::write_bytes_atomic(&path, b"second").unwrap();

        assert_eq!(fs::read(path.as_std_path()).unwrap(), b"second");
    }
}

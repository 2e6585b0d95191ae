//! Staged zip archives
//!
//! A [`StagedArchive`] writes into a hidden temporary file inside the target
//! directory. [`StagedArchive::commit`] renames it onto the final path; dropping
//! it uncommitted deletes the temporary file. A cancelled [`CancelToken`]
//! stops the archive before its next member.

use std::io::Write;
use std::path::{Path, PathBuf};

use image::RgbaImage;
use tempfile::NamedTempFile;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::{ensure_not_cancelled, Result};
use crate::output::encode_png;
use crate::pipeline::CancelToken;

/// A zip archive that is not visible at its final path until committed.
pub struct StagedArchive {
    writer: ZipWriter<NamedTempFile>,
    target: PathBuf,
    cancel: CancelToken,
}

impl std::fmt::Debug for StagedArchive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StagedArchive").field("target", &self.target).finish_non_exhaustive()
    }
}

impl StagedArchive {
    /// Start an archive destined for `target`, creating its directory if needed.
    pub fn create(target: &Path, cancel: &CancelToken) -> Result<Self> {
        ensure_not_cancelled(cancel)?;
        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir)?;

        let temp = tempfile::Builder::new().prefix(".composer-").suffix(".zip.part").tempfile_in(&dir)?;
        log::debug!("staging {} in {}", target.display(), temp.path().display());
        Ok(Self {
            writer: ZipWriter::new(temp),
            target: target.to_path_buf(),
            cancel: cancel.clone(),
        })
    }

    fn options() -> FileOptions {
        FileOptions::default().compression_method(CompressionMethod::Deflated)
    }

    /// Add a member with the given contents. `name` uses `/` separators.
    pub fn add_bytes(&mut self, name: &str, contents: &[u8]) -> Result<()> {
        ensure_not_cancelled(&self.cancel)?;
        self.writer.start_file(name, Self::options())?;
        self.writer.write_all(contents)?;
        Ok(())
    }

    /// Add a PNG-encoded member.
    pub fn add_png(&mut self, name: &str, image: &RgbaImage) -> Result<()> {
        let png = encode_png(image)?;
        self.add_bytes(name, &png)
    }

    /// Finish the zip and atomically move it to the target path.
    pub fn commit(mut self) -> Result<PathBuf> {
        let temp = self.writer.finish()?;
        temp.persist(&self.target).map_err(|e| e.error)?;
        Ok(self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::ExportError;
    use std::io::Read;
    use tempfile::tempdir;

    #[test]
    fn test_commit_publishes_archive() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("out.zip");

        let mut archive = StagedArchive::create(&target, &CancelToken::new()).unwrap();
        archive.add_bytes("hello.txt", b"hi").unwrap();
        archive.add_bytes("nested/dir/file.txt", b"deep").unwrap();
        assert!(!target.exists(), "archive visible before commit");

        let path = archive.commit().unwrap();
        assert_eq!(path, target);

        let mut zip = zip::ZipArchive::new(std::fs::File::open(&target).unwrap()).unwrap();
        let mut text = String::new();
        zip.by_name("nested/dir/file.txt").unwrap().read_to_string(&mut text).unwrap();
        assert_eq!(text, "deep");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_drop_without_commit_leaves_nothing() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("abandoned.zip");

        {
            let mut archive = StagedArchive::create(&target, &CancelToken::new()).unwrap();
            archive.add_bytes("a.txt", b"partial").unwrap();
        }

        assert!(!target.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_create_makes_missing_directories() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("a/b/out.zip");

        let archive = StagedArchive::create(&target, &CancelToken::new()).unwrap();
        archive.commit().unwrap();
        assert!(target.exists());
    }

    #[test]
    fn test_commit_replaces_existing_file() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("out.zip");
        std::fs::write(&target, b"stale").unwrap();

        let mut archive = StagedArchive::create(&target, &CancelToken::new()).unwrap();
        archive.add_bytes("fresh.txt", b"new").unwrap();
        archive.commit().unwrap();

        let zip = zip::ZipArchive::new(std::fs::File::open(&target).unwrap()).unwrap();
        assert_eq!(zip.len(), 1);
    }

    #[test]
    fn test_cancel_stops_before_next_member() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("out.zip");
        let cancel = CancelToken::new();

        let mut archive = StagedArchive::create(&target, &cancel).unwrap();
        archive.add_bytes("first.txt", b"1").unwrap();
        cancel.cancel();
        let result = archive.add_bytes("second.txt", b"2");

        assert!(matches!(result, Err(ExportError::Cancelled)));
        drop(archive);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}

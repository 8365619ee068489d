//! Move files, including across filesystem boundaries.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

#[derive(Debug, thiserror::Error)]
#[error("unable to move {src:?} to {dst:?}: {source}")]
pub struct MoveError {
    pub src: PathBuf,
    pub dst: PathBuf,
    #[source]
    pub source: io::Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveStrategy {
    Rename,
    Copy,
    StreamedCopy,
}

/// Move `src` to `dst`.
///
/// A plain rename is tried first. If that fails (usually because `dst` lives
/// on another device) the file is copied and the source removed, and as a last
/// resort streamed into a temp file beside `dst` which is then persisted over
/// it. The parent of `dst` must already exist.
pub fn move_file(src: &Path, dst: &Path) -> Result<MoveStrategy, MoveError> {
    match fs::rename(src, dst) {
        Ok(()) => {
            log::debug!("renamed {:?} -> {:?}", src, dst);
            return Ok(MoveStrategy::Rename);
        }
        Err(e) => log::debug!("rename {:?} -> {:?} failed: {}", src, dst, e),
    }

    match copy_then_remove(src, dst) {
        Ok(()) => {
            log::debug!("copied {:?} -> {:?}", src, dst);
            return Ok(MoveStrategy::Copy);
        }
        Err(e) => log::warn!("copy {:?} -> {:?} failed: {}", src, dst, e),
    }

    match streamed_copy(src, dst) {
        Ok(()) => {
            log::debug!("stream copied {:?} -> {:?}", src, dst);
            Ok(MoveStrategy::StreamedCopy)
        }
        Err(e) => {
            log::error!("stream copy {:?} -> {:?} failed: {}", src, dst, e);
            Err(MoveError {
                src: src.to_path_buf(),
                dst: dst.to_path_buf(),
                source: e,
            })
        }
    }
}

fn copy_then_remove(src: &Path, dst: &Path) -> io::Result<()> {
    fs::copy(src, dst)?;
    fs::remove_file(src)
}

fn streamed_copy(src: &Path, dst: &Path) -> io::Result<()> {
    let parent = dst
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "destination has no parent"))?;
    let mut tf = tempfile::Builder::default().tempfile_in(parent)?;
    let mut reader = fs::File::open(src)?;
    io::copy(&mut reader, tf.as_file_mut())?;
    tf.as_file().sync_all()?;
    tf.persist(dst).map_err(|e| e.error)?;
    fs::remove_file(src)
}

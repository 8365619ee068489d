//! On-disk home of the show index.

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use filetools_core::{Library, ShowIndex};

use crate::scan::list_dirs;

/// Folder name used as a placeholder inside show libraries.
const PLACEHOLDER_DIR: &str = "empty";

#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("unable to read show index {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("unable to write show index {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone)]
pub struct ShowIndexStore {
    path: PathBuf,
}

impl ShowIndexStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> ShowIndexStore {
        ShowIndexStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    /// Read the index. A missing file is an empty index.
    pub fn load(&self) -> Result<ShowIndex, IndexError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => {
                let index = ShowIndex::parse(&text);
                log::debug!("loaded {} shows from {:?}", index.len(), self.path);
                Ok(index)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("no show index at {:?}", self.path);
                Ok(ShowIndex::new())
            }
            Err(e) => Err(IndexError::Read {
                path: self.path.clone(),
                source: e,
            }),
        }
    }

    /// Read the index, building it from the show libraries if the file does
    /// not exist yet.
    pub fn load_or_create(&self, roots: &[Library]) -> Result<ShowIndex, IndexError> {
        if self.path.exists() {
            self.load()
        } else {
            log::info!("creating show index {:?}", self.path);
            self.rebuild(roots)
        }
    }

    /// Like [`Self::load_or_create`], but a missing file is only scanned for,
    /// never written.
    pub fn load_or_scan(&self, roots: &[Library]) -> Result<ShowIndex, IndexError> {
        if self.path.exists() {
            self.load()
        } else {
            Ok(scan_show_libraries(roots))
        }
    }

    /// Scan `<root>/<network>/<show>` under every show library and replace
    /// the index file with the result.
    pub fn rebuild(&self, roots: &[Library]) -> Result<ShowIndex, IndexError> {
        let index = scan_show_libraries(roots);
        self.save(&index)?;
        log::info!("indexed {} shows into {:?}", index.len(), self.path);
        Ok(index)
    }

    pub fn save(&self, index: &ShowIndex) -> Result<(), IndexError> {
        let write_err = |source| IndexError::Write {
            path: self.path.clone(),
            source,
        };
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).map_err(write_err)?;
        let mut tf = tempfile::Builder::default()
            .tempfile_in(parent)
            .map_err(write_err)?;
        tf.write_all(index.render().as_bytes()).map_err(write_err)?;
        tf.persist(&self.path).map_err(|e| write_err(e.error))?;
        Ok(())
    }
}

fn is_placeholder(name: &str) -> bool {
    name.eq_ignore_ascii_case(PLACEHOLDER_DIR)
}

pub fn scan_show_libraries(roots: &[Library]) -> ShowIndex {
    let mut index = ShowIndex::new();
    for library in roots {
        let root = library.path();
        if !root.is_dir() {
            log::warn!("show library {} not found at {:?}", library.name, root);
            continue;
        }
        for network in list_dirs(root) {
            if is_placeholder(&network.name) {
                continue;
            }
            for show in list_dirs(&network.path) {
                if is_placeholder(&show.name) {
                    continue;
                }
                log::trace!("indexed {} -> {:?}", show.name, show.path);
                index.insert(&show.name, show.path);
            }
        }
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_library(root: &Path) -> Library {
        for dir in [
            "disney/the_mandalorian/season_01",
            "disney/Andor",
            "hbo/the_wire",
            "hbo/empty",
            "Empty/hidden_show",
        ] {
            fs::create_dir_all(root.join(dir)).unwrap();
        }
        fs::write(root.join("hbo").join("notes.txt"), b"").unwrap();
        Library::new("Television", root)
    }

    #[test]
    fn rebuild_scans_two_levels() {
        let dir = tempfile::tempdir().unwrap();
        let tv = dir.path().join("tv");
        let library = make_library(&tv);
        let store = ShowIndexStore::new(dir.path().join("shows_map.ini"));

        let index = store.rebuild(&[library]).unwrap();
        assert_eq!(index.len(), 3);
        assert_eq!(
            index.get("the_mandalorian"),
            Some(tv.join("disney/the_mandalorian").as_path())
        );
        assert_eq!(index.get("andor"), Some(tv.join("disney/Andor").as_path()));
        assert!(!index.contains("empty"));
        assert!(!index.contains("hidden_show"));

        assert_eq!(store.load().unwrap(), index);
    }

    #[test]
    fn missing_library_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let tv = dir.path().join("tv");
        let libraries = vec![
            Library::new("Documentaries", dir.path().join("missing")),
            make_library(&tv),
        ];
        let store = ShowIndexStore::new(dir.path().join("shows_map.ini"));
        assert_eq!(store.rebuild(&libraries).unwrap().len(), 3);
    }

    #[test]
    fn load_or_create_only_builds_once() {
        let dir = tempfile::tempdir().unwrap();
        let tv = dir.path().join("tv");
        let library = make_library(&tv);
        let store = ShowIndexStore::new(dir.path().join("conf").join("shows_map.ini"));

        let first = store.load_or_create(&[library.clone()]).unwrap();
        assert_eq!(first.len(), 3);

        fs::create_dir_all(tv.join("bbc/sherlock")).unwrap();
        let second = store.load_or_create(&[library.clone()]).unwrap();
        assert_eq!(second, first);

        let rebuilt = store.rebuild(&[library]).unwrap();
        assert!(rebuilt.contains("sherlock"));
    }

    #[test]
    fn load_or_scan_does_not_write() {
        let dir = tempfile::tempdir().unwrap();
        let library = make_library(&dir.path().join("tv"));
        let store = ShowIndexStore::new(dir.path().join("shows_map.ini"));
        assert_eq!(store.load_or_scan(&[library]).unwrap().len(), 3);
        assert!(!store.path().exists());
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = ShowIndexStore::new(dir.path().join("shows_map.ini"));
        assert!(store.load().unwrap().is_empty());
    }
}

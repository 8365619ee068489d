use std::path::Path;

use filetools_core::DirEntry;

/// What a directory listing should contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Files,
    Dirs,
}

/// List the direct children of `root`, sorted by name.
///
/// A missing or unreadable directory is logged and yields an empty listing;
/// individual unreadable entries are skipped the same way.
pub fn list_entries<P: AsRef<Path>>(root: P, kind: EntryKind) -> Vec<DirEntry> {
    let root = root.as_ref();
    if !root.is_dir() {
        log::warn!("not a readable directory: {:?}", root);
        return Vec::new();
    }

    let mut content = Vec::new();
    for entry in walkdir::WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                log::warn!("unable to scan {:?}: {}", root, e);
                continue;
            }
        };
        let ftype = entry.file_type();
        let wanted = match kind {
            EntryKind::Files => ftype.is_file(),
            EntryKind::Dirs => ftype.is_dir(),
        };
        if !wanted {
            continue;
        }
        let name = match entry.file_name().to_str() {
            Some(n) => n.to_string(),
            None => {
                log::warn!("skipping non utf8 name: {:?}", entry.path());
                continue;
            }
        };
        log::trace!("scanned: {:?}", entry.path());
        content.push(DirEntry {
            name,
            path: entry.path().to_owned(),
            is_file: ftype.is_file(),
        });
    }

    content
}

pub fn list_files<P: AsRef<Path>>(root: P) -> Vec<DirEntry> {
    list_entries(root, EntryKind::Files)
}

pub fn list_dirs<P: AsRef<Path>>(root: P) -> Vec<DirEntry> {
    list_entries(root, EntryKind::Dirs)
}

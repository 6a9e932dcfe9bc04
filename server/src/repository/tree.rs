//! Queries over the shallow tree returned by the repository tree fetch.
//!
//! GitHub only expands directories one level below the root in that
//! response, so anything nested deeper is invisible here: unexpanded
//! directories contribute nothing to counts or lookups.

use super::models::{TreeEntry, TreeEntryKind};

/// Count file entries, recursing into directories that carry children.
pub fn count_files(entries: &[TreeEntry]) -> usize {
    entries
        .iter()
        .map(|entry| match entry.kind {
            TreeEntryKind::File => 1,
            TreeEntryKind::Directory => entry.children.as_deref().map_or(0, count_files),
        })
        .sum()
}

/// Path of the first file, in pre-order, whose extension equals `file_type`.
pub fn find_first_path_of_type<'a>(entries: &'a [TreeEntry], file_type: &str) -> Option<&'a str> {
    entries.iter().find_map(|entry| match entry.kind {
        TreeEntryKind::File if extension_of(&entry.name) == file_type => Some(entry.path.as_str()),
        TreeEntryKind::File => None,
        TreeEntryKind::Directory => entry
            .children
            .as_deref()
            .and_then(|children| find_first_path_of_type(children, file_type)),
    })
}

/// Text after the last `.`; the whole name when there is none.
pub fn extension_of(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

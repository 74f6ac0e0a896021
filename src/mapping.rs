//! Mapping-definition files
//!
//! A mapping directory holds plain-text files, one
//! `<sourceKey> <destinationKey>` pair per line: no comments, no escaping,
//! no quoting. The text before the first space is the source key; everything
//! after it is the destination key, spaces included. Files are read in
//! whatever order the directory listing yields them.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::warn;

use crate::error::BridgeError;

/// One declared correspondence between a source key and a destination key
#[derive(Debug, Clone, PartialEq)]
pub struct MappingEntry {
    pub source_key: String,
    pub destination_key: String,
}

/// Immutable source-key to destination-key table, built once at startup
///
/// Entries keep the order in which they were accepted; the index enforces
/// source-key uniqueness (first registration wins).
#[derive(Debug, Default)]
pub struct MappingTable {
    entries: Vec<MappingEntry>,
    by_source: HashMap<String, usize>,
}

impl MappingTable {
    /// Read every regular file directly inside `dir` and build the table
    ///
    /// A malformed line, a duplicate source key or an unreadable file is
    /// logged and skipped; only an unreadable directory fails the load as a
    /// whole.
    pub fn load_dir(dir: &Path) -> Result<Self, BridgeError> {
        let listing = fs::read_dir(dir).map_err(|source| BridgeError::DirectoryUnreadable {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut table = MappingTable::default();
        for dir_entry in listing {
            let dir_entry = match dir_entry {
                Ok(dir_entry) => dir_entry,
                Err(error) => {
                    warn!(dir = %dir.display(), error = %error, "skipping unreadable directory entry");
                    continue;
                }
            };
            let is_file = dir_entry
                .file_type()
                .map(|file_type| file_type.is_file())
                .unwrap_or(false);
            if !is_file {
                continue;
            }
            table.load_file(&dir_entry.path());
        }
        Ok(table)
    }

    fn load_file(&mut self, path: &Path) {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(error) => {
                warn!(file = %path.display(), error = %error, "cannot open mapping file, skipping");
                return;
            }
        };
        for line in BufReader::new(file).lines() {
            let line = match line {
                Ok(line) => line,
                Err(error) => {
                    warn!(file = %path.display(), error = %error, "read error in mapping file, skipping the rest");
                    break;
                }
            };
            let accepted = parse_line(&line).and_then(|entry| self.insert(entry));
            if let Err(error) = accepted {
                warn!(file = %path.display(), error = %error, "ignoring mapping line");
            }
        }
    }

    /// Add an entry unless its source key is already registered
    pub fn insert(&mut self, entry: MappingEntry) -> Result<(), BridgeError> {
        if let Some(&at) = self.by_source.get(&entry.source_key) {
            return Err(BridgeError::DuplicateSourceKey {
                source_key: entry.source_key,
                destination_key: entry.destination_key,
                existing: self.entries[at].destination_key.clone(),
            });
        }
        self.by_source.insert(entry.source_key.clone(), self.entries.len());
        self.entries.push(entry);
        Ok(())
    }

    /// Entries in acceptance order
    pub fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }

    /// Destination for `source_key`, if mapped
    pub fn destination(&self, source_key: &str) -> Option<&str> {
        self.by_source
            .get(source_key)
            .map(|&at| self.entries[at].destination_key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Split one mapping line into its entry
///
/// Valid only when the line contains a space and the remainder after the
/// first space is non-empty.
pub fn parse_line(line: &str) -> Result<MappingEntry, BridgeError> {
    match line.split_once(' ') {
        Some((source_key, destination_key)) if !destination_key.is_empty() => Ok(MappingEntry {
            source_key: source_key.to_owned(),
            destination_key: destination_key.to_owned(),
        }),
        _ => Err(BridgeError::MalformedMappingLine {
            line: line.to_owned(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_mapping(dir: &TempDir, name: &str, contents: &str) {
        fs::write(dir.path().join(name), contents).unwrap();
    }

    #[test]
    fn test_parse_line_valid() {
        let entry = parse_line("/desktop/font/name /Gtk/FontName").unwrap();
        assert_eq!(entry.source_key, "/desktop/font/name");
        assert_eq!(entry.destination_key, "/Gtk/FontName");
    }

    #[test]
    fn test_parse_line_destination_keeps_spaces() {
        // only the first space splits; the destination is the raw remainder
        let entry = parse_line("/a/b two words here").unwrap();
        assert_eq!(entry.source_key, "/a/b");
        assert_eq!(entry.destination_key, "two words here");
    }

    #[test]
    fn test_parse_line_no_space() {
        let error = parse_line("/a/b").unwrap_err();
        assert!(matches!(error, BridgeError::MalformedMappingLine { .. }));
    }

    #[test]
    fn test_parse_line_nothing_after_space() {
        let error = parse_line("/a/b ").unwrap_err();
        assert!(matches!(error, BridgeError::MalformedMappingLine { .. }));
    }

    #[test]
    fn test_parse_line_empty() {
        assert!(parse_line("").is_err());
    }

    #[test]
    fn test_load_dir_single_file() {
        let dir = TempDir::new().unwrap();
        write_mapping(&dir, "fonts.map", "/desktop/font/name /Gtk/FontName\n/desktop/font/dpi /Xft/DPI\n");

        let table = MappingTable::load_dir(dir.path()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.destination("/desktop/font/name"), Some("/Gtk/FontName"));
        assert_eq!(table.destination("/desktop/font/dpi"), Some("/Xft/DPI"));
        assert_eq!(table.destination("/desktop/unmapped"), None);
    }

    #[test]
    fn test_load_dir_merges_files() {
        let dir = TempDir::new().unwrap();
        write_mapping(&dir, "one.map", "/a/x /One/X\n");
        write_mapping(&dir, "two.map", "/a/y /Two/Y\n");

        let table = MappingTable::load_dir(dir.path()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.destination("/a/x"), Some("/One/X"));
        assert_eq!(table.destination("/a/y"), Some("/Two/Y"));
    }

    #[test]
    fn test_load_dir_duplicate_keeps_first() {
        let dir = TempDir::new().unwrap();
        write_mapping(&dir, "dup.map", "/a/x /First/X\n/a/x /Second/X\n");

        let table = MappingTable::load_dir(dir.path()).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.destination("/a/x"), Some("/First/X"));
    }

    #[test]
    fn test_load_dir_malformed_lines_skipped() {
        let dir = TempDir::new().unwrap();
        write_mapping(&dir, "mixed.map", "noseparator\n/a/b \n\n/a/c /Dest/C\n");

        let table = MappingTable::load_dir(dir.path()).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.destination("/a/c"), Some("/Dest/C"));
    }

    #[test]
    fn test_load_dir_ignores_subdirectories() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("nested");
        fs::create_dir(&nested).unwrap();
        fs::write(nested.join("hidden.map"), "/a/x /Nested/X\n").unwrap();
        write_mapping(&dir, "top.map", "/a/y /Top/Y\n");

        let table = MappingTable::load_dir(dir.path()).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.destination("/a/x"), None);
    }

    #[test]
    fn test_load_dir_missing_directory() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("does-not-exist");

        let error = MappingTable::load_dir(&missing).unwrap_err();
        assert!(matches!(error, BridgeError::DirectoryUnreadable { .. }));
    }

    #[test]
    fn test_insert_duplicate_reports_existing_destination() {
        let mut table = MappingTable::default();
        table
            .insert(MappingEntry {
                source_key: "/a/x".into(),
                destination_key: "/First/X".into(),
            })
            .unwrap();

        let error = table
            .insert(MappingEntry {
                source_key: "/a/x".into(),
                destination_key: "/Second/X".into(),
            })
            .unwrap_err();
        match error {
            BridgeError::DuplicateSourceKey {
                source_key,
                destination_key,
                existing,
            } => {
                assert_eq!(source_key, "/a/x");
                assert_eq!(destination_key, "/Second/X");
                assert_eq!(existing, "/First/X");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_entries_keep_acceptance_order() {
        let dir = TempDir::new().unwrap();
        write_mapping(&dir, "ordered.map", "/a/x /One\n/a/y /Two\n/a/z /Three\n");

        let table = MappingTable::load_dir(dir.path()).unwrap();
        let sources: Vec<&str> = table.entries().iter().map(|e| e.source_key.as_str()).collect();
        assert_eq!(sources, vec!["/a/x", "/a/y", "/a/z"]);
    }
}

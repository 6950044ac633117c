//! Sources of named post files. The loader only needs to list entry names and
//! open an entry by name, so both a real directory ([`DirSource`]) and an
//! in-memory map ([`MemorySource`]) can feed it.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor};
use std::path::PathBuf;

use walkdir::WalkDir;

use crate::post::Result;

/// A directory-like collection of named text entries.
pub trait PostSource {
    /// The reader type returned by [`PostSource::open`].
    type Reader: BufRead;

    /// Lists the names of all entries in enumeration order.
    fn names(&self) -> Result<Vec<String>>;

    /// Opens the entry called `name` for reading.
    fn open(&self, name: &str) -> Result<Self::Reader>;
}

/// Reads posts from the regular files directly inside a directory.
/// Subdirectories are skipped and entries are listed by file name.
#[derive(Clone, Debug)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> DirSource {
        DirSource { root: root.into() }
    }
}

impl PostSource for DirSource {
    type Reader = BufReader<File>;

    fn names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for result in WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = result?;
            if entry.file_type().is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        Ok(names)
    }

    fn open(&self, name: &str) -> Result<Self::Reader> {
        Ok(BufReader::new(File::open(self.root.join(name))?))
    }
}

/// An in-memory source mapping entry names to their contents. Entries are
/// enumerated in lexicographic order.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    entries: BTreeMap<String, String>,
}

impl MemorySource {
    pub fn new() -> MemorySource {
        MemorySource::default()
    }

    /// Adds (or replaces) an entry, returning `self` for chaining.
    pub fn with(mut self, name: &str, contents: &str) -> MemorySource {
        self.insert(name, contents);
        self
    }

    pub fn insert(&mut self, name: &str, contents: &str) {
        self.entries.insert(name.to_owned(), contents.to_owned());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PostSource for MemorySource {
    type Reader = Cursor<Vec<u8>>;

    fn names(&self) -> Result<Vec<String>> {
        Ok(self.entries.keys().cloned().collect())
    }

    fn open(&self, name: &str) -> Result<Self::Reader> {
        match self.entries.get(name) {
            Some(contents) => Ok(Cursor::new(contents.clone().into_bytes())),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no entry named `{}`", name),
            )
            .into()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::post::Error;
    use std::io::Read;

    #[test]
    fn test_dir_source_lists_files_only() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.md"), "b").unwrap();
        std::fs::write(dir.path().join("a.md"), "a").unwrap();
        std::fs::create_dir(dir.path().join("drafts")).unwrap();
        std::fs::write(dir.path().join("drafts").join("c.md"), "c").unwrap();

        let source = DirSource::new(dir.path());
        assert_eq!(source.names().unwrap(), vec!["a.md", "b.md"]);

        let mut contents = String::new();
        source
            .open("b.md")
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        assert_eq!(contents, "b");
    }

    #[test]
    fn test_dir_source_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let source = DirSource::new(dir.path().join("missing"));
        assert!(matches!(source.names(), Err(Error::WalkDir(_))));
    }

    #[test]
    fn test_memory_source() {
        let source = MemorySource::new()
            .with("z.md", "last")
            .with("a.md", "first");
        assert_eq!(source.len(), 2);
        assert_eq!(source.names().unwrap(), vec!["a.md", "z.md"]);
        match source.open("nope.md") {
            Err(Error::Io(err)) => {
                assert_eq!(err.kind(), io::ErrorKind::NotFound)
            }
            other => panic!("expected NotFound, got {:?}", other.is_ok()),
        }
    }
}

/// Extensions accepted by the "add spreadsheets" and "add folder" entry points.
pub const SPREADSHEET_EXTENSIONS: &[&str] = &[".xlsx", ".xls"];
/// Extensions accepted by the "add archive" entry point.
pub const ARCHIVE_EXTENSIONS: &[&str] = &[".zip"];

/// A file offered for inclusion in the batch, before any filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    pub name: String,
    pub payload: Vec<u8>,
}

impl CandidateFile {
    pub fn new(name: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            payload: payload.into(),
        }
    }
}

/// A file accepted into the batch. The name is the identity key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    name: String,
    payload: Vec<u8>,
    extension: String,
}

impl FileEntry {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Lower-cased extension including the leading dot, e.g. `.xlsx`.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn size(&self) -> u64 {
        self.payload.len() as u64
    }
}

/// Where a set of candidate files came from in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryPoint {
    /// Individual `.xlsx` / `.xls` files.
    Spreadsheets,
    /// A `.zip` archive of spreadsheets.
    Archives,
    /// Every file found in a folder; only spreadsheet names survive.
    Folder,
}

impl EntryPoint {
    pub fn allowed_extensions(self) -> &'static [&'static str] {
        match self {
            EntryPoint::Spreadsheets | EntryPoint::Folder => SPREADSHEET_EXTENSIONS,
            EntryPoint::Archives => ARCHIVE_EXTENSIONS,
        }
    }

    /// Client-side name filter applied before the regular add path.
    ///
    /// The folder filter is a plain case-sensitive suffix match; the add path
    /// itself compares extensions case-insensitively.
    pub fn accepts_name(self, name: &str) -> bool {
        match self {
            EntryPoint::Folder => name.ends_with(".xlsx") || name.ends_with(".xls"),
            EntryPoint::Spreadsheets | EntryPoint::Archives => true,
        }
    }
}

/// Result of a single `add` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AddStats {
    pub added: usize,
    pub skipped: usize,
}

/// Ordered, name-unique collection of files pending submission.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileBatch {
    entries: Vec<FileEntry>,
}

impl FileBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends every candidate whose extension is allowed and whose name is not
    /// already present. Rejected candidates are dropped without error.
    pub fn add(&mut self, candidates: Vec<CandidateFile>, allowed_extensions: &[&str]) -> AddStats {
        let mut stats = AddStats::default();
        for candidate in candidates {
            let extension = match file_extension(&candidate.name) {
                Some(ext) if is_allowed(&ext, allowed_extensions) => ext,
                _ => {
                    stats.skipped += 1;
                    continue;
                }
            };
            if self.contains(&candidate.name) {
                stats.skipped += 1;
                continue;
            }
            self.entries.push(FileEntry {
                name: candidate.name,
                payload: candidate.payload,
                extension,
            });
            stats.added += 1;
        }
        stats
    }

    /// Applies the entry point's name pre-filter and allow-list, then adds.
    pub fn add_from(&mut self, entry_point: EntryPoint, candidates: Vec<CandidateFile>) -> AddStats {
        let total = candidates.len();
        let filtered: Vec<CandidateFile> = candidates
            .into_iter()
            .filter(|candidate| entry_point.accepts_name(&candidate.name))
            .collect();
        let prefiltered = total - filtered.len();
        let mut stats = self.add(filtered, entry_point.allowed_extensions());
        stats.skipped += prefiltered;
        stats
    }

    /// Removes the entry at `index`. Out-of-range indices are a no-op.
    pub fn remove(&mut self, index: usize) -> Option<FileEntry> {
        if index < self.entries.len() {
            Some(self.entries.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn snapshot(&self) -> &[FileEntry] {
        &self.entries
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|entry| entry.name == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Extension of `name` from its last `.`, lower-cased and including the dot.
pub fn file_extension(name: &str) -> Option<String> {
    name.rfind('.').map(|idx| name[idx..].to_ascii_lowercase())
}

fn is_allowed(extension: &str, allowed_extensions: &[&str]) -> bool {
    allowed_extensions
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(extension))
}

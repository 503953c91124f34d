use rowtrim_core::{
    AddStats, CandidateFile, EntryPoint, FileBatch, ARCHIVE_EXTENSIONS, SPREADSHEET_EXTENSIONS,
};

fn file(name: &str) -> CandidateFile {
    CandidateFile::new(name, name.as_bytes().to_vec())
}

fn names(batch: &FileBatch) -> Vec<&str> {
    batch.snapshot().iter().map(|entry| entry.name()).collect()
}

#[test]
fn duplicate_names_are_kept_once_first_wins() {
    let mut batch = FileBatch::new();
    let stats = batch.add(
        vec![
            CandidateFile::new("dup.xlsx", b"first".to_vec()),
            CandidateFile::new("dup.xlsx", b"second".to_vec()),
        ],
        SPREADSHEET_EXTENSIONS,
    );
    assert_eq!(stats, AddStats { added: 1, skipped: 1 });

    let stats = batch.add(vec![file("dup.xlsx")], SPREADSHEET_EXTENSIONS);
    assert_eq!(stats, AddStats { added: 0, skipped: 1 });

    assert_eq!(batch.len(), 1);
    assert_eq!(batch.snapshot()[0].payload(), b"first");
}

#[test]
fn name_identity_is_case_sensitive() {
    let mut batch = FileBatch::new();
    batch.add(vec![file("Data.xlsx"), file("data.xlsx")], SPREADSHEET_EXTENSIONS);
    assert_eq!(names(&batch), vec!["Data.xlsx", "data.xlsx"]);
}

#[test]
fn disallowed_extensions_leave_batch_unchanged() {
    let mut batch = FileBatch::new();
    batch.add(vec![file("a.xlsx")], SPREADSHEET_EXTENSIONS);

    let stats = batch.add(
        vec![file("notes.txt"), file("archive.zip"), file("noext")],
        SPREADSHEET_EXTENSIONS,
    );
    assert_eq!(stats, AddStats { added: 0, skipped: 3 });
    assert_eq!(names(&batch), vec!["a.xlsx"]);

    let stats = batch.add(vec![file("b.xlsx")], ARCHIVE_EXTENSIONS);
    assert_eq!(stats.added, 0);
    assert_eq!(batch.len(), 1);
}

#[test]
fn extension_match_ignores_case() {
    let mut batch = FileBatch::new();
    batch.add(vec![file("UPPER.XLSX"), file("Mixed.Xls")], SPREADSHEET_EXTENSIONS);
    assert_eq!(batch.len(), 2);
    assert_eq!(batch.snapshot()[0].extension(), ".xlsx");
    assert_eq!(batch.snapshot()[1].extension(), ".xls");
}

#[test]
fn remove_preserves_relative_order() {
    let mut batch = FileBatch::new();
    batch.add(
        vec![file("a.xlsx"), file("b.xls"), file("c.xlsx"), file("d.xls")],
        SPREADSHEET_EXTENSIONS,
    );

    let removed = batch.remove(1).expect("in range");
    assert_eq!(removed.name(), "b.xls");
    assert_eq!(names(&batch), vec!["a.xlsx", "c.xlsx", "d.xls"]);
}

#[test]
fn remove_out_of_range_is_noop() {
    let mut batch = FileBatch::new();
    batch.add(vec![file("a.xlsx")], SPREADSHEET_EXTENSIONS);

    assert!(batch.remove(1).is_none());
    assert!(batch.remove(usize::MAX).is_none());
    assert_eq!(batch.len(), 1);
}

#[test]
fn folder_entry_point_keeps_only_spreadsheet_names() {
    let mut batch = FileBatch::new();
    let stats = batch.add_from(
        EntryPoint::Folder,
        vec![
            file("q1.xlsx"),
            file("q2.xls"),
            file("readme.md"),
            file("bundle.zip"),
            file("SHOUT.XLSX"),
        ],
    );

    assert_eq!(stats, AddStats { added: 2, skipped: 3 });
    assert_eq!(names(&batch), vec!["q1.xlsx", "q2.xls"]);
}

#[test]
fn archive_entry_point_accepts_only_zip() {
    let mut batch = FileBatch::new();
    let stats = batch.add_from(
        EntryPoint::Archives,
        vec![file("bundle.ZIP"), file("sheet.xlsx")],
    );

    assert_eq!(stats, AddStats { added: 1, skipped: 1 });
    assert_eq!(names(&batch), vec!["bundle.ZIP"]);
}

#[test]
fn clear_empties_batch() {
    let mut batch = FileBatch::new();
    batch.add(vec![file("a.xlsx"), file("b.xlsx")], SPREADSHEET_EXTENSIONS);
    batch.clear();
    assert!(batch.is_empty());
    assert!(!batch.contains("a.xlsx"));
}

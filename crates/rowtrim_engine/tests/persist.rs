use std::fs;

use rowtrim_engine::{ensure_output_dir, ArchiveWriter};
use tempfile::TempDir;

#[test]
fn creates_missing_output_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("results").join("nested");
    assert!(!new_dir.exists());
    ensure_output_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn archive_write_replaces_existing_file() {
    let temp = TempDir::new().unwrap();
    let writer = ArchiveWriter::new(temp.path().to_path_buf());

    let first = writer.write("J1.zip", b"first").unwrap();
    assert_eq!(first.path.file_name().unwrap(), "J1.zip");
    assert_eq!(first.byte_len, 5);
    assert_eq!(fs::read(&first.path).unwrap(), b"first");

    let second = writer.write("J1.zip", b"second!").unwrap();
    assert_eq!(first.path, second.path);
    assert_eq!(second.byte_len, 7);
    assert_eq!(fs::read(&second.path).unwrap(), b"second!");
}

#[test]
fn no_archive_when_output_dir_is_a_file() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = ArchiveWriter::new(file_path.clone());
    assert!(writer.write("J1.zip", b"data").is_err());
    assert!(!file_path.with_file_name("J1.zip").exists());
}

#[test]
fn replacing_archive_leaves_no_temp_files() {
    let temp = TempDir::new().unwrap();
    let writer = ArchiveWriter::new(temp.path().to_path_buf());

    writer.write("J2.zip", b"old").unwrap();
    writer.write("J2.zip", b"new").unwrap();

    let names: Vec<String> = fs::read_dir(temp.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["J2.zip".to_string()]);
    assert_eq!(fs::read(temp.path().join("J2.zip")).unwrap(), b"new");
}

#[test]
fn failed_write_keeps_existing_archive() {
    let temp = TempDir::new().unwrap();
    let writer = ArchiveWriter::new(temp.path().to_path_buf());
    writer.write("J3.zip", b"kept").unwrap();

    // A directory in place of the target makes the final rename fail.
    fs::create_dir(temp.path().join("busy.zip")).unwrap();
    fs::write(temp.path().join("busy.zip").join("inner"), b"x").unwrap();
    assert!(writer.write("busy.zip", b"data").is_err());

    assert_eq!(fs::read(temp.path().join("J3.zip")).unwrap(), b"kept");
    assert!(temp.path().join("busy.zip").join("inner").is_file());
}

#[test]
fn output_dir_that_is_a_file_is_rejected() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("plain");
    fs::write(&file_path, "x").unwrap();

    assert!(ensure_output_dir(&file_path).is_err());
    assert!(ensure_output_dir(temp.path()).is_ok());
}

/// Used when the locator ends in a separator or names a relative path component.
const FALLBACK_ARCHIVE_NAME: &str = "result.zip";

/// Local file name for a result archive: the last `/` or `\` separated segment
/// of the service-provided locator.
pub fn archive_file_name(locator: &str) -> String {
    let last = locator
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();
    if last.is_empty() || last == "." || last == ".." || last.chars().any(char::is_control) {
        return FALLBACK_ARCHIVE_NAME.to_string();
    }
    last.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn takes_last_segment_of_unix_and_windows_paths() {
        assert_eq!(archive_file_name("/out/J1.zip"), "J1.zip");
        assert_eq!(
            archive_file_name("upload\\abc\\firstsheet010124.zip"),
            "firstsheet010124.zip"
        );
        assert_eq!(archive_file_name("upload/abc\\mixed.zip"), "mixed.zip");
        assert_eq!(archive_file_name("plain.zip"), "plain.zip");
    }

    #[test]
    fn unusable_segments_fall_back() {
        assert_eq!(archive_file_name("upload/abc/"), FALLBACK_ARCHIVE_NAME);
        assert_eq!(archive_file_name(""), FALLBACK_ARCHIVE_NAME);
        assert_eq!(archive_file_name("a/.."), FALLBACK_ARCHIVE_NAME);
    }
}

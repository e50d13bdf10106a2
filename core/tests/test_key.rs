#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use rotxor_core::cipher::{Key, KeyError};
    use rotxor_core::constants::MAX_KEY_LEN;

    #[test]
    fn new_rejects_empty() {
        assert!(matches!(Key::new(Vec::new()), Err(KeyError::Empty)));
    }

    #[test]
    fn new_rejects_oversized() {
        let err = Key::new(vec![0u8; MAX_KEY_LEN + 1]).unwrap_err();
        assert!(matches!(err, KeyError::TooLong { actual, max } if actual == MAX_KEY_LEN + 1 && max == MAX_KEY_LEN));
    }

    #[test]
    fn lengths() {
        let key = Key::new(vec![1, 2, 3]).unwrap();
        assert_eq!(key.len(), 3);
        assert_eq!(key.bit_len(), 24);
        assert!(!key.is_empty());
        assert_eq!(key.as_ref(), &[1, 2, 3]);
    }

    #[test]
    fn from_file_reads_entire_contents() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[0x00, 0xFF, 0x0A, 0x20]).unwrap();
        file.flush().unwrap();

        let key = Key::from_file(file.path()).unwrap();
        assert_eq!(key.as_bytes(), &[0x00, 0xFF, 0x0A, 0x20]);
    }

    #[test]
    fn from_file_empty_is_rejected() {
        let file = NamedTempFile::new().unwrap();
        assert!(matches!(Key::from_file(file.path()), Err(KeyError::Empty)));
    }

    #[test]
    fn from_file_missing_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-key");

        match Key::from_file(&path) {
            Err(KeyError::Unreadable { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected Unreadable, got {other:?}"),
        }
    }

    #[test]
    fn from_hex_ignores_whitespace() {
        let key = Key::from_hex("01 02\n03\t04").unwrap();
        assert_eq!(key.as_bytes(), &[0x01, 0x02, 0x03, 0x04]);
    }

    #[test]
    fn from_hex_rejects_bad_digits() {
        assert!(matches!(Key::from_hex("zz"), Err(KeyError::InvalidHex(_))));
        assert!(matches!(Key::from_hex("abc"), Err(KeyError::InvalidHex(_))));
        assert!(matches!(Key::from_hex(""), Err(KeyError::Empty)));
    }

    #[test]
    fn debug_hides_key_bytes() {
        let key = Key::from_hex("deadbeef").unwrap();
        let shown = format!("{key:?}");
        assert!(shown.contains("len: 4"));
        assert!(!shown.to_lowercase().contains("de"));
    }

    #[test]
    fn clones_compare_equal() {
        let key = Key::new(vec![9, 8, 7]).unwrap();
        assert_eq!(key.clone(), key);
    }
}

//! UTF-16 to UTF-8 transcoding of the raw export

use std::borrow::Cow;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE};
use tracing::{debug, info};

use crate::error::{ContactError, Result};

/// Suffix inserted before the extension of the transcoded file
pub const UTF8_SUFFIX: &str = "_utf-8";

/// Path of the UTF-8 copy: `contacts.csv` becomes `contacts_utf-8.csv`
pub fn utf8_sibling_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = match path.extension() {
        Some(ext) => format!("{}{}.{}", stem, UTF8_SUFFIX, ext.to_string_lossy()),
        None => format!("{}{}", stem, UTF8_SUFFIX),
    };
    path.with_file_name(file_name)
}

/// Decode UTF-16 bytes. A UTF-16 BOM selects the byte order (little-endian
/// without one); malformed input or a UTF-8 BOM yields `None`.
pub fn decode_utf16(bytes: &[u8]) -> Option<(Cow<'_, str>, &'static Encoding)> {
    let (encoding, bom_len) = match Encoding::for_bom(bytes) {
        Some((encoding, len)) if encoding == UTF_16LE || encoding == UTF_16BE => (encoding, len),
        Some(_) => return None,
        None => (UTF_16LE, 0),
    };
    encoding
        .decode_without_bom_handling_and_without_replacement(&bytes[bom_len..])
        .map(|text| (text, encoding))
}

/// Transcode `path` to its UTF-8 sibling and return the sibling's path.
///
/// The sibling is a durable side effect and is overwritten on every run.
pub fn transcode_to_utf8(path: &Path) -> Result<PathBuf> {
    let bytes = fs::read(path).map_err(|e| ContactError::io(path, e))?;
    let (text, encoding) = decode_utf16(&bytes).ok_or_else(|| ContactError::Encoding {
        path: path.to_path_buf(),
        encoding: "UTF-16",
    })?;
    debug!(encoding = encoding.name(), bytes = bytes.len(), "decoded source");

    let dst_path = utf8_sibling_path(path);
    let file = File::create(&dst_path).map_err(|e| ContactError::io(&dst_path, e))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(text.as_bytes())
        .and_then(|_| writer.flush())
        .map_err(|e| ContactError::io(&dst_path, e))?;

    info!(path = %dst_path.display(), "transcoded source to UTF-8");
    Ok(dst_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf16le_with_bom(text: &str) -> Vec<u8> {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in text.encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        bytes
    }

    #[test]
    fn test_sibling_path() {
        assert_eq!(
            utf8_sibling_path(Path::new("/tmp/google.csv")),
            PathBuf::from("/tmp/google_utf-8.csv")
        );
        assert_eq!(
            utf8_sibling_path(Path::new("export")),
            PathBuf::from("export_utf-8")
        );
    }

    #[test]
    fn test_decode_with_bom() {
        let bytes = utf16le_with_bom("Name\nÉlodie\n");
        let (text, encoding) = decode_utf16(&bytes).unwrap();
        assert_eq!(text, "Name\nÉlodie\n");
        assert_eq!(encoding.name(), "UTF-16LE");
    }

    #[test]
    fn test_decode_big_endian_bom() {
        let mut bytes = vec![0xFE, 0xFF];
        for unit in "Ab".encode_utf16() {
            bytes.extend_from_slice(&unit.to_be_bytes());
        }
        let (text, _) = decode_utf16(&bytes).unwrap();
        assert_eq!(text, "Ab");
    }

    #[test]
    fn test_decode_rejects_odd_length() {
        assert!(decode_utf16(&[0xFF, 0xFE, 0x41]).is_none());
    }

    #[test]
    fn test_decode_rejects_utf8_bom() {
        assert!(decode_utf16(b"\xEF\xBB\xBFName\nAnn\n").is_none());
    }

    #[test]
    fn test_transcode_rejects_utf8_source() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("contacts.csv");
        fs::write(&src, "\u{FEFF}Name\nAnn\n").unwrap();

        let err = transcode_to_utf8(&src).unwrap_err();
        assert!(matches!(
            err,
            ContactError::Encoding {
                encoding: "UTF-16",
                ..
            }
        ));
        assert!(!dir.path().join("contacts_utf-8.csv").exists());
    }

    #[test]
    fn test_transcode_writes_sibling() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("contacts.csv");
        fs::write(&src, utf16le_with_bom("Name\nZoé\n")).unwrap();

        let dst = transcode_to_utf8(&src).unwrap();
        assert_eq!(dst, dir.path().join("contacts_utf-8.csv"));
        assert_eq!(fs::read_to_string(dst).unwrap(), "Name\nZoé\n");
    }

    #[test]
    fn test_transcode_rejects_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("broken.csv");
        fs::write(&src, [0xFF, 0xFE, 0x41]).unwrap();

        let err = transcode_to_utf8(&src).unwrap_err();
        assert!(matches!(err, ContactError::Encoding { .. }));
        assert!(!dir.path().join("broken_utf-8.csv").exists());
    }
}

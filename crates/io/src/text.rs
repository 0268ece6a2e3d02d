// Source text acquisition

use std::io::Read;
use std::path::Path;

/// Read file and convert to UTF-8 if needed (handles Shift_JIS, the usual
/// encoding of Excel-exported CSVs in the source domain).
pub fn read_file_as_utf8(path: &Path) -> Result<String, String> {
    let mut file = std::fs::File::open(path).map_err(|e| e.to_string())?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(|e| e.to_string())?;

    // Try UTF-8 first; on failure, recover the buffer from the error
    let decoded = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::SHIFT_JIS.decode(&bytes);
            decoded.into_owned()
        }
    };

    // Excel prepends a BOM to UTF-8 CSVs; it is not part of the header row.
    Ok(decoded.strip_prefix('\u{feff}').unwrap_or(&decoded).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn reads_plain_utf8() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("utf8.csv");
        fs::write(&path, "id,名前\n1,佐藤\n").unwrap();
        assert_eq!(read_file_as_utf8(&path).unwrap(), "id,名前\n1,佐藤\n");
    }

    #[test]
    fn falls_back_to_shift_jis() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sjis.csv");
        let (encoded, _, _) = encoding_rs::SHIFT_JIS.encode("id,名前\n1,佐藤\n");
        fs::write(&path, encoded).unwrap();
        assert_eq!(read_file_as_utf8(&path).unwrap(), "id,名前\n1,佐藤\n");
    }

    #[test]
    fn strips_utf8_bom() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bom.csv");
        fs::write(&path, "\u{feff}id,name\n").unwrap();
        assert_eq!(read_file_as_utf8(&path).unwrap(), "id,name\n");
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(read_file_as_utf8(&dir.path().join("absent.csv")).is_err());
    }
}

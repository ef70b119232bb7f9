//! Streaming MD5 file hasher.
//!
//! MD5 is fixed by the sync protocol: the server manifest is a set of MD5
//! hex strings, so the local identity must match. Files are streamed
//! through the digest in 32 KiB chunks; nothing is mapped or held in
//! memory whole.

use md5::{Digest, Md5};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::HashError;

/// Read buffer size for hashing.
const BUFFER_SIZE: usize = 32 * 1024;

/// Number of hex characters in a rendered MD5 digest.
pub const HEX_WIDTH: usize = 32;

/// Compute the MD5 of a file's full content as fixed-width lowercase hex.
///
/// The result is always exactly [`HEX_WIDTH`] characters; leading zero
/// nibbles are preserved.
pub fn md5_file(path: &Path) -> Result<String, HashError> {
    let mut file = File::open(path).map_err(|e| HashError::from_io(path, e))?;
    let mut hasher = Md5::new();
    let mut buffer = [0u8; BUFFER_SIZE];

    loop {
        let read = file
            .read(&mut buffer)
            .map_err(|e| HashError::from_io(path, e))?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }

    Ok(encode_hex(&hasher.finalize()))
}

/// Render digest bytes as lowercase hex.
fn encode_hex(digest: &[u8]) -> String {
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_md5_known_vectors() {
        let dir = tempdir().unwrap();

        let empty = dir.path().join("empty");
        File::create(&empty).unwrap();
        assert_eq!(md5_file(&empty).unwrap(), "d41d8cd98f00b204e9800998ecf8427e");

        let hello = dir.path().join("hello");
        File::create(&hello).unwrap().write_all(b"hello").unwrap();
        assert_eq!(md5_file(&hello).unwrap(), "5d41402abc4b2a76b9719d911017c592");
    }

    #[test]
    fn test_md5_fixed_width() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a");
        File::create(&file).unwrap().write_all(b"ibsync").unwrap();

        let hash = md5_file(&file).unwrap();
        assert_eq!(hash.len(), HEX_WIDTH);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(hash, hash.to_lowercase());
    }

    #[test]
    fn test_md5_streams_past_buffer_boundary() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("big");
        // Two full buffers plus a tail
        let content = vec![0xabu8; BUFFER_SIZE * 2 + 17];
        File::create(&file).unwrap().write_all(&content).unwrap();

        let streamed = md5_file(&file).unwrap();
        let whole = encode_hex(&Md5::digest(&content));
        assert_eq!(streamed, whole);
    }

    #[test]
    fn test_md5_missing_file() {
        let dir = tempdir().unwrap();
        let err = md5_file(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, HashError::NotFound(_)));
    }
}

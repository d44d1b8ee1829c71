//! Reading replays from the filesystem.

use crate::decoder::ReplayDecoder;
use crate::record::ReplayRecord;
use bytes::Bytes;
use osr_core::ReplayResult;
use std::path::Path;

/// Read a whole replay file into memory.
///
/// # Errors
///
/// I/O failures are returned unchanged as [`osr_core::ReplayError::Io`].
pub fn read_replay_file(path: impl AsRef<Path>) -> ReplayResult<Bytes> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    tracing::debug!(path = %path.display(), len = data.len(), "read replay file");
    Ok(Bytes::from(data))
}

impl ReplayRecord {
    /// Read a replay file and decode its header
    pub fn from_path(path: impl AsRef<Path>) -> ReplayResult<Self> {
        ReplayDecoder::new(read_replay_file(path)?).parse()
    }

    /// Decode the header of an in-memory replay
    pub fn from_bytes(data: impl Into<Bytes>) -> ReplayResult<Self> {
        ReplayDecoder::new(data).parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use osr_core::ReplayError;
    use std::io::Write;

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ReplayRecord::from_path(dir.path().join("missing.osr")).unwrap_err();
        match err {
            ReplayError::Io(inner) => assert_eq!(inner.kind(), std::io::ErrorKind::NotFound),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_read_replay_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[1, 2, 3]).unwrap();
        let data = read_replay_file(file.path()).unwrap();
        assert_eq!(&data[..], &[1, 2, 3]);
    }

    #[test]
    fn test_short_file_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0, 1]).unwrap();
        let err = ReplayRecord::from_path(file.path()).unwrap_err();
        assert!(matches!(err, ReplayError::TruncatedHeader { field: "version", .. }));
    }
}

//! Error types shared by every replay decoding stage.

/// Replay result type
pub type ReplayResult<T> = Result<T, ReplayError>;

/// Every way a replay decode can fail.
///
/// All kinds except [`ReplayError::Io`] are local parse failures. A decode
/// that returns any of them exposes no partially-built record.
#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    /// A read ran past the end of the buffer
    #[error("Read of {requested} bytes at offset {offset} exceeds buffer ({remaining} remaining)")]
    OutOfBounds {
        /// Cursor offset at the start of the read
        offset: usize,
        /// Bytes requested
        requested: usize,
        /// Bytes left in the buffer
        remaining: usize,
    },

    /// A variable-length integer did not start with the string marker
    #[error("Malformed varint at offset {offset}: expected marker 0x0b, found {found:#04x}")]
    MalformedVarint {
        /// Offset of the marker byte
        offset: usize,
        /// Byte found in place of the marker
        found: u8,
    },

    /// Text bytes were not valid UTF-8
    #[error(
        "Invalid text encoding{}",
        .offset.map(|o| format!(" at offset {o}")).unwrap_or_default()
    )]
    InvalidEncoding {
        /// Offset of the string payload, `None` for decompressed frame text
        offset: Option<usize>,
    },

    /// The buffer ended before every header field was read
    #[error("Truncated header: buffer ended while reading {field} at offset {offset}")]
    TruncatedHeader {
        /// Header field being read
        field: &'static str,
        /// Cursor offset when the read failed
        offset: usize,
    },

    /// Mode byte outside the four known game modes
    #[error("Unknown game mode: {0}")]
    UnknownMode(u8),

    /// A frame token could not be parsed
    #[error("Corrupt frame token #{index} ({token:?}): {reason}")]
    CorruptFrameToken {
        /// Zero-based token index in the frame stream
        index: usize,
        /// Raw token text
        token: String,
        /// What was wrong with it
        reason: String,
    },

    /// The compressed frame block could not be decompressed
    #[error("Decompression failed: {0}")]
    DecompressionFailure(String),

    /// Tick count does not map to a representable calendar time
    #[error("Invalid timestamp: {ticks} ticks")]
    InvalidTimestamp {
        /// Raw tick count
        ticks: i64,
    },

    /// A declared block length was negative
    #[error("Negative length {length} declared at offset {offset}")]
    NegativeLength {
        /// Offset of the length field
        offset: usize,
        /// Declared length
        length: i32,
    },

    /// I/O failure from the collaborator that produced the bytes
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ReplayError {
    /// Whether this error came from I/O rather than from parsing
    #[must_use]
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io(_))
    }

    /// Short stable name of the error kind
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::OutOfBounds { .. } => "OutOfBounds",
            Self::MalformedVarint { .. } => "MalformedVarint",
            Self::InvalidEncoding { .. } => "InvalidEncoding",
            Self::TruncatedHeader { .. } => "TruncatedHeader",
            Self::UnknownMode(_) => "UnknownMode",
            Self::CorruptFrameToken { .. } => "CorruptFrameToken",
            Self::DecompressionFailure(_) => "DecompressionFailure",
            Self::InvalidTimestamp { .. } => "InvalidTimestamp",
            Self::NegativeLength { .. } => "NegativeLength",
            Self::Io(_) => "IoFailure",
        }
    }
}

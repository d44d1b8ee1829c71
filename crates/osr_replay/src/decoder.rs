//! Replay decoder.
//!
//! Header layout, all little-endian:
//!
//! | field | encoding |
//! |---|---|
//! | mode | u8 |
//! | version | i32 |
//! | map hash, player name, replay hash | strings |
//! | n300, n100, n50, ngeki, nkatu, nmiss | u16 each |
//! | score | i32 |
//! | max combo | u16 |
//! | perfect | u8, `1` = true |
//! | mods | i32 |
//! | life graph | string |
//! | timestamp | i64 ticks |
//!
//! The frame section follows: an i32 length, the compressed block, and the
//! version- and mod-dependent trailer.

use crate::config::DecodeConfig;
use crate::record::{ReplayHeader, ReplayRecord};
use bytes::Bytes;
use osr_codec::{ByteCursor, FrameContext, FrameSection, decode_frame_stream};
use osr_core::{
    FormatVersion, GameMode, HitCounts, Md5Hex, Mods, ReplayError, ReplayResult, ticks_to_datetime,
};

/// Decoder over one replay buffer.
///
/// Construct one per buffer; decoding consumes it.
#[derive(Debug, Clone)]
pub struct ReplayDecoder {
    data: Bytes,
    config: DecodeConfig,
}

impl ReplayDecoder {
    /// Create a decoder over a replay buffer
    #[must_use]
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            config: DecodeConfig::default(),
        }
    }

    /// Create with custom config
    #[must_use]
    pub fn with_config(mut self, config: DecodeConfig) -> Self {
        self.config = config;
        self
    }

    /// Read the header and return a record whose frame section is still
    /// compressed.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::TruncatedHeader`] if the buffer ends inside the
    /// header, and the underlying error for malformed strings, unknown modes,
    /// or unrepresentable timestamps.
    pub fn parse(self) -> ReplayResult<ReplayRecord> {
        let mut cursor = ByteCursor::new(&self.data);
        let header = read_header(&mut cursor, &self.config)?;
        let tail = self.data.slice(cursor.offset()..);

        tracing::debug!(
            mode = %header.mode,
            version = %header.version,
            player = %header.player_name,
            header_len = cursor.offset(),
            "header parsed"
        );

        Ok(ReplayRecord::new(header, tail, self.config))
    }

    /// Decode a buffer that holds only a compressed frame block, with the
    /// header fields supplied by the caller.
    ///
    /// Nothing is read past the block, so the trailer fields stay `None`.
    /// [`FrameContext::default`] reads frames as Standard at version 0.
    pub fn parse_frames_only(self, ctx: &FrameContext) -> ReplayResult<FrameSection> {
        decode_frame_stream(&self.data, ctx, self.config.memory_limit)
    }
}

/// Decode header and frame section in one go
pub fn decode_replay(data: impl Into<Bytes>) -> ReplayResult<ReplayRecord> {
    let mut record = ReplayDecoder::new(data).parse()?;
    record.parse_frames()?;
    Ok(record)
}

/// Read one header field, reporting a short buffer as a truncated header
fn field<'a, T>(
    cursor: &mut ByteCursor<'a>,
    name: &'static str,
    read: impl FnOnce(&mut ByteCursor<'a>) -> ReplayResult<T>,
) -> ReplayResult<T> {
    let offset = cursor.offset();
    read(cursor).map_err(|err| match err {
        ReplayError::OutOfBounds { .. } => ReplayError::TruncatedHeader {
            field: name,
            offset,
        },
        other => other,
    })
}

fn string_field(
    cursor: &mut ByteCursor<'_>,
    name: &'static str,
    config: &DecodeConfig,
) -> ReplayResult<String> {
    if config.allow_absent_strings {
        field(cursor, name, |c| c.read_optional_string().map(Option::unwrap_or_default))
    } else {
        field(cursor, name, ByteCursor::read_string)
    }
}

fn read_header(cursor: &mut ByteCursor<'_>, config: &DecodeConfig) -> ReplayResult<ReplayHeader> {
    let mode = GameMode::try_from(field(cursor, "mode", ByteCursor::read_u8)?)?;
    let version = FormatVersion::new(field(cursor, "version", ByteCursor::read_i32)?);
    let map_hash = Md5Hex::new(string_field(cursor, "map_hash", config)?);
    let player_name = string_field(cursor, "player_name", config)?;
    let replay_hash = Md5Hex::new(string_field(cursor, "replay_hash", config)?);

    let hits = HitCounts {
        n300: field(cursor, "n300", ByteCursor::read_u16)?,
        n100: field(cursor, "n100", ByteCursor::read_u16)?,
        n50: field(cursor, "n50", ByteCursor::read_u16)?,
        ngeki: field(cursor, "ngeki", ByteCursor::read_u16)?,
        nkatu: field(cursor, "nkatu", ByteCursor::read_u16)?,
        nmiss: field(cursor, "nmiss", ByteCursor::read_u16)?,
    };

    let score = field(cursor, "score", ByteCursor::read_i32)?;
    let max_combo = field(cursor, "max_combo", ByteCursor::read_u16)?;
    let perfect = field(cursor, "perfect", ByteCursor::read_u8)? == 1;
    let mods = Mods::from_header(field(cursor, "mods", ByteCursor::read_i32)?);
    let life_graph = string_field(cursor, "life_graph", config)?;
    let timestamp = ticks_to_datetime(field(cursor, "timestamp", ByteCursor::read_i64)?)?;

    Ok(ReplayHeader {
        mode,
        version,
        map_hash,
        player_name,
        replay_hash,
        hits,
        score,
        max_combo,
        perfect,
        mods,
        life_graph,
        timestamp,
    })
}

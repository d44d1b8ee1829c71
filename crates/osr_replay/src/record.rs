//! Decoded replay records.

use crate::config::DecodeConfig;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use osr_codec::{ByteCursor, FrameContext, FrameSection, InputFrame, decode_frame_section};
use osr_core::{FormatVersion, GameMode, HitCounts, Md5Hex, Mods, ReplayResult};
use serde::{Deserialize, Serialize};

/// Decoding progress of a replay
///
/// `Empty` is the unparsed [`ReplayDecoder`](crate::ReplayDecoder) itself;
/// [`ReplayRecord::state`] only ever reports the two later states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DecoderState {
    /// Nothing read yet
    Empty,
    /// Header fields populated, frame section still compressed
    HeaderParsed,
    /// Frame section decoded
    FramesParsed,
}

/// Fixed header fields, in stream order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayHeader {
    /// Game mode the replay was recorded in
    pub mode: GameMode,
    /// Client format version
    pub version: FormatVersion,
    /// MD5 of the map file
    pub map_hash: Md5Hex,
    /// Player name
    pub player_name: String,
    /// MD5 of the replay content
    pub replay_hash: Md5Hex,
    /// Judgement counts
    pub hits: HitCounts,
    /// Total score
    pub score: i32,
    /// Highest combo reached
    pub max_combo: u16,
    /// Full combo flag
    pub perfect: bool,
    /// Active modifiers
    pub mods: Mods,
    /// Raw life bar graph (`time|life` pairs separated by `,`)
    pub life_graph: String,
    /// When the play was recorded
    pub timestamp: DateTime<Utc>,
}

impl ReplayHeader {
    /// Weighted accuracy percentage
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        self.hits.accuracy()
    }

    /// Abbreviations of the active mods
    #[must_use]
    pub fn mod_abbreviations(&self) -> Vec<&'static str> {
        self.mods.abbreviations()
    }

    /// The header fields the frame section layout depends on
    #[must_use]
    pub fn frame_context(&self) -> FrameContext {
        FrameContext::new(self.mode, self.version, self.mods)
    }
}

/// A replay with its header decoded.
///
/// The frame section stays compressed until [`ReplayRecord::parse_frames`]
/// (or one of the frame accessors) decodes it; the result is kept, so later
/// calls do not re-read anything.
#[derive(Debug, Clone)]
pub struct ReplayRecord {
    header: ReplayHeader,
    tail: Bytes,
    section: Option<FrameSection>,
    config: DecodeConfig,
}

impl ReplayRecord {
    pub(crate) fn new(header: ReplayHeader, tail: Bytes, config: DecodeConfig) -> Self {
        Self {
            header,
            tail,
            section: None,
            config,
        }
    }

    /// Decoded header
    #[must_use]
    pub fn header(&self) -> &ReplayHeader {
        &self.header
    }

    /// Current decoding state
    #[must_use]
    pub fn state(&self) -> DecoderState {
        if self.section.is_some() {
            DecoderState::FramesParsed
        } else {
            DecoderState::HeaderParsed
        }
    }

    /// Decode the frame section if that has not happened yet.
    ///
    /// # Errors
    ///
    /// Returns the first cursor, decompression, or frame-token error. The
    /// record stays in [`DecoderState::HeaderParsed`] and may be retried.
    pub fn parse_frames(&mut self) -> ReplayResult<&FrameSection> {
        let section = match self.section.take() {
            Some(section) => section,
            None => self.decode_tail()?,
        };
        let section: &FrameSection = self.section.insert(section);
        Ok(section)
    }

    fn decode_tail(&mut self) -> ReplayResult<FrameSection> {
        let mut cursor = ByteCursor::new(&self.tail);
        let section = decode_frame_section(
            &mut cursor,
            &self.header.frame_context(),
            self.config.memory_limit,
        )?;

        if !cursor.is_empty() {
            tracing::trace!(unread = cursor.remaining(), "bytes left after frame section");
        }
        tracing::debug!(
            frames = section.len(),
            seed = ?section.seed,
            score_id = ?section.score_id,
            "frames parsed"
        );

        self.tail = Bytes::new();
        Ok(section)
    }

    /// Frame section, if already decoded
    #[must_use]
    pub fn frame_section(&self) -> Option<&FrameSection> {
        self.section.as_ref()
    }

    /// Input frames, decoding the frame section on first use
    pub fn frames(&mut self) -> ReplayResult<&[InputFrame]> {
        Ok(&self.parse_frames()?.frames)
    }

    /// Random seed, decoding the frame section on first use
    pub fn seed(&mut self) -> ReplayResult<Option<i32>> {
        Ok(self.parse_frames()?.seed)
    }

    /// Online score id, decoding the frame section on first use
    pub fn score_id(&mut self) -> ReplayResult<Option<i64>> {
        Ok(self.parse_frames()?.score_id)
    }

    /// Target-practice hit count, decoding the frame section on first use
    pub fn target_practice_hits(&mut self) -> ReplayResult<Option<f64>> {
        Ok(self.parse_frames()?.target_practice_hits)
    }

    /// Weighted accuracy percentage
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        self.header.accuracy()
    }

    /// Replay content hash, identifying this play
    #[must_use]
    pub fn identity(&self) -> &Md5Hex {
        &self.header.replay_hash
    }

    /// Split into the header and the frame section, if decoded
    #[must_use]
    pub fn into_parts(self) -> (ReplayHeader, Option<FrameSection>) {
        (self.header, self.section)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use osr_codec::ByteWriter;
    use osr_core::{ReplayError, ticks_to_datetime};

    fn header(mode: GameMode, version: i32) -> ReplayHeader {
        ReplayHeader {
            mode,
            version: FormatVersion::new(version),
            map_hash: Md5Hex::default(),
            player_name: "tester".to_string(),
            replay_hash: Md5Hex::default(),
            hits: HitCounts::default(),
            score: 0,
            max_combo: 0,
            perfect: false,
            mods: Mods::empty(),
            life_graph: String::new(),
            timestamp: ticks_to_datetime(0).unwrap(),
        }
    }

    #[test]
    fn test_empty_tail_fails_and_keeps_state() {
        let mut record = ReplayRecord::new(
            header(GameMode::Standard, 0),
            Bytes::new(),
            DecodeConfig::default(),
        );
        let err = record.parse_frames().unwrap_err();
        assert!(matches!(
            err,
            ReplayError::OutOfBounds {
                requested: 4,
                remaining: 0,
                ..
            }
        ));
        assert_eq!(record.state(), DecoderState::HeaderParsed);
    }

    #[test]
    fn test_zero_length_block() {
        let mut w = ByteWriter::new();
        w.write_i32(0).write_i32(55);
        let mut record = ReplayRecord::new(
            header(GameMode::Catch, 20121008),
            Bytes::from(w.into_inner()),
            DecodeConfig::default(),
        );
        assert_eq!(record.score_id().unwrap(), Some(55));
        assert!(record.frames().unwrap().is_empty());
        assert_eq!(record.state(), DecoderState::FramesParsed);
    }

    #[test]
    fn test_frame_context_from_header() {
        let mut h = header(GameMode::Mania, 20140721);
        h.mods = Mods::TARGET_PRACTICE;
        let ctx = h.frame_context();
        assert_eq!(ctx.mode, GameMode::Mania);
        assert_eq!(ctx.version.as_i32(), 20140721);
        assert!(ctx.mods.has_target_practice());
    }
}

//! Input frames and the compressed frame section.
//!
//! After decompression the frame block is ASCII text: frames separated by
//! `,`, each frame four `|`-separated fields `delta|x|y|keys`. How the fields
//! are interpreted depends on the game mode of the whole replay.

use crate::compression::decompress;
use crate::cursor::ByteCursor;
use osr_core::{FormatVersion, GameMode, Mods, ReplayError, ReplayResult, ScoreIdWidth};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Frame delta that marks the random seed instead of an input
pub const SEED_SENTINEL_DELTA: &str = "-12345";

/// Standard input sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StandardFrame {
    /// Milliseconds since the previous frame
    pub delta: i32,
    /// Cursor x in playfield pixels
    pub x: f64,
    /// Cursor y in playfield pixels
    pub y: f64,
    /// Pressed keys (M1, M2, K1, K2, smoke)
    pub keys: u32,
}

/// Taiko input sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaikoFrame {
    /// Milliseconds since the previous frame
    pub delta: i32,
    /// Unused by the format, carried as written
    pub x: f64,
    /// Pressed drum keys
    pub keys: u32,
}

/// Catch input sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CatchFrame {
    /// Milliseconds since the previous frame
    pub delta: i32,
    /// Catcher position
    pub x: f64,
    /// Dash key held
    pub dashing: bool,
}

/// Mania input sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ManiaFrame {
    /// Milliseconds since the previous frame
    pub delta: i32,
    /// One bit per column
    pub keys: u32,
}

/// One time-stamped input sample, shaped by the replay's game mode
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum InputFrame {
    /// Cursor game
    Standard(StandardFrame),
    /// Drum game
    Taiko(TaikoFrame),
    /// Fruit catcher
    Catch(CatchFrame),
    /// Column keys
    Mania(ManiaFrame),
}

impl InputFrame {
    /// Milliseconds since the previous frame
    #[must_use]
    pub const fn delta(&self) -> i32 {
        match self {
            Self::Standard(f) => f.delta,
            Self::Taiko(f) => f.delta,
            Self::Catch(f) => f.delta,
            Self::Mania(f) => f.delta,
        }
    }

    /// Game mode this frame belongs to
    #[must_use]
    pub const fn mode(&self) -> GameMode {
        match self {
            Self::Standard(_) => GameMode::Standard,
            Self::Taiko(_) => GameMode::Taiko,
            Self::Catch(_) => GameMode::Catch,
            Self::Mania(_) => GameMode::Mania,
        }
    }
}

/// Header fields the frame section depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FrameContext {
    /// Selects the frame variant for every frame
    pub mode: GameMode,
    /// Gates the seed sentinel and the score id trailer
    pub version: FormatVersion,
    /// Gates the target-practice trailer
    pub mods: Mods,
}

impl FrameContext {
    /// Context for an explicit mode, version and mod set
    #[must_use]
    pub fn new(mode: GameMode, version: FormatVersion, mods: Mods) -> Self {
        Self {
            mode,
            version,
            mods,
        }
    }
}

/// Decoded frame block and the fields that trail it
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FrameSection {
    /// Frames in capture order
    pub frames: Vec<InputFrame>,
    /// Random seed from the sentinel frame
    pub seed: Option<i32>,
    /// Online score id
    pub score_id: Option<i64>,
    /// Target-practice hit count
    pub target_practice_hits: Option<f64>,
}

impl FrameSection {
    /// Number of decoded frames
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// True when the block held no input frames
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Running sum of deltas: the capture time of each frame in milliseconds
    #[must_use]
    pub fn absolute_times(&self) -> Vec<i64> {
        self.frames
            .iter()
            .scan(0i64, |time, frame| {
                *time += i64::from(frame.delta());
                Some(*time)
            })
            .collect()
    }

    /// Sum of all frame deltas in milliseconds
    #[must_use]
    pub fn duration_ms(&self) -> i64 {
        self.frames.iter().map(|f| i64::from(f.delta())).sum()
    }
}

/// Parse decompressed frame text.
///
/// A trailing `,` leaves an empty final token, which is dropped. The
/// returned section carries frames and seed only; trailer fields are `None`.
///
/// # Errors
///
/// Returns [`ReplayError::CorruptFrameToken`] if a token does not have four
/// `|`-separated fields or a numeric field fails to parse.
pub fn parse_frame_text(text: &str, ctx: &FrameContext) -> ReplayResult<FrameSection> {
    let mut tokens: Vec<&str> = text.split(',').collect();
    if tokens.last().is_some_and(|t| t.is_empty()) {
        tokens.pop();
    }

    let mut section = FrameSection {
        frames: Vec::with_capacity(tokens.len()),
        ..FrameSection::default()
    };

    for (index, token) in tokens.into_iter().enumerate() {
        let fields = split_fields(index, token)?;

        if ctx.version.has_seed_sentinel() && fields[0].trim() == SEED_SENTINEL_DELTA {
            let seed = parse_field::<i32>(index, token, fields[3], "seed")?;
            if let Some(previous) = section.seed {
                tracing::warn!(previous, seed, "seed sentinel repeated, keeping the last one");
            }
            tracing::trace!(seed, index, "seed sentinel");
            section.seed = Some(seed);
            continue;
        }

        section.frames.push(parse_frame(index, token, &fields, ctx.mode)?);
    }

    Ok(section)
}

fn split_fields(index: usize, token: &str) -> ReplayResult<[&str; 4]> {
    let fields: Vec<&str> = token.split('|').collect();
    <[&str; 4]>::try_from(fields).map_err(|fields| ReplayError::CorruptFrameToken {
        index,
        token: token.to_string(),
        reason: format!("expected 4 fields, found {}", fields.len()),
    })
}

fn parse_field<T: FromStr>(
    index: usize,
    token: &str,
    field: &str,
    name: &str,
) -> ReplayResult<T> {
    field.trim().parse().map_err(|_| ReplayError::CorruptFrameToken {
        index,
        token: token.to_string(),
        reason: format!("invalid {name}: {field:?}"),
    })
}

fn parse_frame(
    index: usize,
    token: &str,
    fields: &[&str; 4],
    mode: GameMode,
) -> ReplayResult<InputFrame> {
    let delta = parse_field(index, token, fields[0], "delta")?;
    let frame = match mode {
        GameMode::Standard => InputFrame::Standard(StandardFrame {
            delta,
            x: parse_field(index, token, fields[1], "x")?,
            y: parse_field(index, token, fields[2], "y")?,
            keys: parse_field(index, token, fields[3], "keys")?,
        }),
        GameMode::Taiko => InputFrame::Taiko(TaikoFrame {
            delta,
            x: parse_field(index, token, fields[1], "x")?,
            keys: parse_field(index, token, fields[3], "keys")?,
        }),
        GameMode::Catch => InputFrame::Catch(CatchFrame {
            delta,
            x: parse_field(index, token, fields[1], "x")?,
            dashing: fields[3] == "1",
        }),
        GameMode::Mania => InputFrame::Mania(ManiaFrame {
            delta,
            keys: parse_field(index, token, fields[1], "keys")?,
        }),
    };
    Ok(frame)
}

fn decode_block(
    block: &[u8],
    ctx: &FrameContext,
    memory_limit: Option<usize>,
) -> ReplayResult<FrameSection> {
    let raw = decompress(block, memory_limit)?;
    let text =
        std::str::from_utf8(&raw).map_err(|_| ReplayError::InvalidEncoding { offset: None })?;
    parse_frame_text(text, ctx)
}

/// Decode a buffer holding only a compressed frame block.
///
/// No length prefix is read and no trailer follows, so `score_id` and
/// `target_practice_hits` stay `None`. Callers without a header pass
/// [`FrameContext::default`], which reads frames as Standard at version 0.
pub fn decode_frame_stream(
    data: &[u8],
    ctx: &FrameContext,
    memory_limit: Option<usize>,
) -> ReplayResult<FrameSection> {
    let section = decode_block(data, ctx, memory_limit)?;
    tracing::debug!(frames = section.len(), mode = %ctx.mode, "decoded headerless frame stream");
    Ok(section)
}

/// Decode the frame section at the cursor: a 4-byte length, the compressed
/// block, then the trailer fields gated by version and mods.
///
/// # Errors
///
/// Propagates cursor, decompression, and frame-token errors. A negative
/// block length fails with [`ReplayError::NegativeLength`].
pub fn decode_frame_section(
    cursor: &mut ByteCursor<'_>,
    ctx: &FrameContext,
    memory_limit: Option<usize>,
) -> ReplayResult<FrameSection> {
    let length_offset = cursor.offset();
    let length = cursor.read_i32()?;
    let length = usize::try_from(length).map_err(|_| ReplayError::NegativeLength {
        offset: length_offset,
        length,
    })?;
    let block = cursor.read(length)?;

    let mut section = decode_block(block, ctx, memory_limit)?;

    section.score_id = match ctx.version.score_id_width() {
        Some(ScoreIdWidth::Int64) => Some(cursor.read_i64()?),
        Some(ScoreIdWidth::Int32) => Some(i64::from(cursor.read_i32()?)),
        None => None,
    };

    if ctx.mods.has_target_practice() {
        section.target_practice_hits = Some(cursor.read_f64()?);
    }

    Ok(section)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::ByteWriter;

    fn ctx(mode: GameMode, version: i32) -> FrameContext {
        FrameContext::new(mode, FormatVersion::new(version), Mods::empty())
    }

    fn parse(text: &str, mode: GameMode, version: i32) -> FrameSection {
        parse_frame_text(text, &ctx(mode, version)).unwrap()
    }

    fn lzma(text: &str) -> Vec<u8> {
        let mut out = Vec::new();
        lzma_rs::lzma_compress(&mut text.as_bytes(), &mut out).unwrap();
        out
    }

    #[test]
    fn test_standard_frames() {
        let section = parse("0|1.0|2.0|0,-1|0.0|0.0|0,", GameMode::Standard, 0);
        assert_eq!(
            section.frames,
            vec![
                InputFrame::Standard(StandardFrame {
                    delta: 0,
                    x: 1.0,
                    y: 2.0,
                    keys: 0,
                }),
                InputFrame::Standard(StandardFrame {
                    delta: -1,
                    x: 0.0,
                    y: 0.0,
                    keys: 0,
                }),
            ]
        );
        assert_eq!(section.seed, None);
    }

    #[test]
    fn test_seed_sentinel() {
        let section = parse("-12345|0|0|777,", GameMode::Standard, 20130319);
        assert!(section.frames.is_empty());
        assert_eq!(section.seed, Some(777));
    }

    #[test]
    fn test_seed_sentinel_ignored_on_old_versions() {
        let section = parse("-12345|0|0|777,", GameMode::Standard, 20130318);
        assert_eq!(section.len(), 1);
        assert_eq!(section.frames[0].delta(), -12345);
        assert_eq!(section.seed, None);
    }

    #[test]
    fn test_repeated_seed_keeps_last() {
        let text = "-12345|0|0|1,5|1|1|0,-12345|0|0|2,";
        let section = parse_frame_text(text, &ctx(GameMode::Standard, 20150101)).unwrap();
        assert_eq!(section.seed, Some(2));
        assert_eq!(section.len(), 1);
    }

    #[test]
    fn test_coordinates_keep_full_precision() {
        let section = decode_frame_stream(
            &lzma("16|256.123456789|1|1,"),
            &FrameContext::default(),
            None,
        )
        .unwrap();
        let InputFrame::Standard(frame) = section.frames[0] else {
            panic!("expected a standard frame");
        };
        assert_eq!(frame.x, 256.123456789);
        assert_eq!(frame.y, 1.0);

        let section = parse("16|-0.1|0|1,", GameMode::Catch, 0);
        assert_eq!(
            section.frames,
            vec![InputFrame::Catch(CatchFrame {
                delta: 16,
                x: -0.1,
                dashing: true,
            })]
        );
    }

    #[test]
    fn test_taiko_frame() {
        let section = parse("16|320|9999|5,", GameMode::Taiko, 0);
        assert_eq!(
            section.frames,
            vec![InputFrame::Taiko(TaikoFrame {
                delta: 16,
                x: 320.0,
                keys: 5,
            })]
        );
    }

    #[test]
    fn test_catch_frame() {
        let section = parse("16|256.5|0|1,17|250|0|0,", GameMode::Catch, 0);
        assert_eq!(
            section.frames,
            vec![
                InputFrame::Catch(CatchFrame {
                    delta: 16,
                    x: 256.5,
                    dashing: true,
                }),
                InputFrame::Catch(CatchFrame {
                    delta: 17,
                    x: 250.0,
                    dashing: false,
                }),
            ]
        );
    }

    #[test]
    fn test_mania_frame_ignores_unused_fields() {
        let section = parse("10|5|not-a-number|x,", GameMode::Mania, 0);
        assert_eq!(
            section.frames,
            vec![InputFrame::Mania(ManiaFrame { delta: 10, keys: 5 })]
        );
        assert_eq!(section.frames[0].mode(), GameMode::Mania);
    }

    #[test]
    fn test_empty_text() {
        let section = parse_frame_text("", &ctx(GameMode::Standard, 0)).unwrap();
        assert!(section.is_empty());
    }

    #[test]
    fn test_final_token_without_trailing_delimiter() {
        let section = parse_frame_text("1|0|0|0,2|0|0|0", &ctx(GameMode::Standard, 0)).unwrap();
        assert_eq!(section.len(), 2);
    }

    #[test]
    fn test_wrong_field_count() {
        let err = parse_frame_text("1|2|3|4,5|6|7,", &ctx(GameMode::Standard, 0)).unwrap_err();
        match err {
            ReplayError::CorruptFrameToken { index, token, reason } => {
                assert_eq!(index, 1);
                assert_eq!(token, "5|6|7");
                assert!(reason.contains("found 3"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_bad_number() {
        let err = parse_frame_text("1|abc|3|4,", &ctx(GameMode::Standard, 0)).unwrap_err();
        assert!(matches!(err, ReplayError::CorruptFrameToken { index: 0, .. }));
    }

    #[test]
    fn test_empty_interior_token() {
        let err = parse_frame_text("1|2|3|4,,", &ctx(GameMode::Standard, 0)).unwrap_err();
        assert!(matches!(err, ReplayError::CorruptFrameToken { index: 1, .. }));
    }

    #[test]
    fn test_absolute_times() {
        let section = parse("0|0|0|0,16|0|0|0,-2|0|0|0,17|0|0|0,", GameMode::Standard, 0);
        assert_eq!(section.absolute_times(), vec![0, 16, 14, 31]);
        assert_eq!(section.duration_ms(), 31);
    }

    #[test]
    fn test_decode_frame_stream_defaults_to_standard() {
        let block = lzma("0|1.0|2.0|0,-12345|0|0|777,");
        let section = decode_frame_stream(&block, &FrameContext::default(), None).unwrap();
        // Version 0 predates the seed sentinel
        assert_eq!(section.len(), 2);
        assert!(matches!(section.frames[0], InputFrame::Standard(_)));
        assert_eq!(section.seed, None);
        assert_eq!(section.score_id, None);
    }

    #[test]
    fn test_decode_frame_stream_non_utf8() {
        let mut out = Vec::new();
        lzma_rs::lzma_compress(&mut &[0xff, 0xfe][..], &mut out).unwrap();
        let err = decode_frame_stream(&out, &FrameContext::default(), None).unwrap_err();
        assert!(matches!(err, ReplayError::InvalidEncoding { offset: None }));
    }

    fn section_bytes(text: &str, trailer: impl FnOnce(&mut ByteWriter)) -> Vec<u8> {
        let block = lzma(text);
        let mut writer = ByteWriter::new();
        writer.write_i32(block.len() as i32).write_bytes(&block);
        trailer(&mut writer);
        writer.into_inner()
    }

    #[test]
    fn test_section_score_id_64() {
        let bytes = section_bytes("1|2|3|0,", |w| {
            w.write_i64(4_000_000_000);
        });
        let mut cursor = ByteCursor::new(&bytes);
        let section =
            decode_frame_section(&mut cursor, &ctx(GameMode::Standard, 20140721), None).unwrap();
        assert_eq!(section.score_id, Some(4_000_000_000));
        assert!(cursor.is_empty());
    }

    #[test]
    fn test_section_score_id_32() {
        let bytes = section_bytes("1|2|3|0,", |w| {
            w.write_i32(-7);
        });
        let mut cursor = ByteCursor::new(&bytes);
        let section =
            decode_frame_section(&mut cursor, &ctx(GameMode::Standard, 20140720), None).unwrap();
        assert_eq!(section.score_id, Some(-7));
        assert!(cursor.is_empty());
    }

    #[test]
    fn test_section_without_score_id() {
        let bytes = section_bytes("1|2|3|0,", |_| {});
        let mut cursor = ByteCursor::new(&bytes);
        let section =
            decode_frame_section(&mut cursor, &ctx(GameMode::Standard, 20121007), None).unwrap();
        assert_eq!(section.score_id, None);
        assert!(cursor.is_empty());
    }

    #[test]
    fn test_section_target_practice_on_old_version() {
        let bytes = section_bytes("1|2|3|0,", |w| {
            w.write_f64(42.5);
        });
        let mut cursor = ByteCursor::new(&bytes);
        let ctx = FrameContext::new(
            GameMode::Standard,
            FormatVersion::new(20000101),
            Mods::TARGET_PRACTICE,
        );
        let section = decode_frame_section(&mut cursor, &ctx, None).unwrap();
        assert_eq!(section.score_id, None);
        assert_eq!(section.target_practice_hits, Some(42.5));
    }

    #[test]
    fn test_section_missing_trailer() {
        let bytes = section_bytes("1|2|3|0,", |w| {
            w.write_i32(5);
        });
        let mut cursor = ByteCursor::new(&bytes);
        let err = decode_frame_section(&mut cursor, &ctx(GameMode::Standard, 20140721), None)
            .unwrap_err();
        assert!(matches!(
            err,
            ReplayError::OutOfBounds {
                requested: 8,
                remaining: 4,
                ..
            }
        ));
    }

    #[test]
    fn test_section_negative_length() {
        let mut writer = ByteWriter::new();
        writer.write_i32(-1);
        let bytes = writer.into_inner();
        let mut cursor = ByteCursor::new(&bytes);
        let err = decode_frame_section(&mut cursor, &FrameContext::default(), None).unwrap_err();
        assert!(matches!(err, ReplayError::NegativeLength { offset: 0, length: -1 }));
    }

    #[test]
    fn test_section_empty_block() {
        let mut writer = ByteWriter::new();
        writer.write_i32(0).write_i64(99);
        let bytes = writer.into_inner();
        let mut cursor = ByteCursor::new(&bytes);
        let section =
            decode_frame_section(&mut cursor, &ctx(GameMode::Mania, 20150101), None).unwrap();
        assert!(section.is_empty());
        assert_eq!(section.score_id, Some(99));
    }
}

//! osr Codec
//!
//! Byte-level decoding for replay captures: an offset-tracking cursor over
//! the raw buffer, LZMA decompression of the frame block, and the
//! mode-dependent input-frame model.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod compression;
pub mod cursor;
pub mod encoding;
pub mod frame;

pub use compression::{Container, decompress};
pub use cursor::{ByteCursor, IntWidth, STRING_MARKER};
pub use encoding::ByteWriter;
pub use frame::{
    CatchFrame, FrameContext, FrameSection, InputFrame, ManiaFrame, SEED_SENTINEL_DELTA,
    StandardFrame, TaikoFrame, decode_frame_section, decode_frame_stream, parse_frame_text,
};

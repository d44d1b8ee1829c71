//! osr Replay Decoder
//!
//! Decodes a replay capture in two explicit steps: the fixed header first,
//! then, on request, the compressed frame section that follows it.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod decoder;
pub mod io;
pub mod record;

pub use config::DecodeConfig;
pub use decoder::{ReplayDecoder, decode_replay};
pub use io::read_replay_file;
pub use record::{DecoderState, ReplayHeader, ReplayRecord};

pub use osr_codec::{FrameContext, FrameSection, InputFrame};
pub use osr_core::{GameMode, Mods, ReplayError, ReplayResult};

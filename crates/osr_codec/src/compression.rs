//! Decompression of the frame block.
//!
//! Capture clients write the block as a raw LZMA ("alone") stream. XZ
//! containers are recognised by their magic and decoded as well.

use osr_core::{ReplayError, ReplayResult};

/// Magic bytes at the start of an XZ container
pub const XZ_MAGIC: [u8; 6] = [0xfd, b'7', b'z', b'X', b'Z', 0x00];

/// Compressed container format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Container {
    /// `.lzma` / LZMA-alone: 13-byte header, then the raw stream
    LzmaAlone,
    /// `.xz`
    Xz,
}

impl Container {
    /// Detect the container from the leading bytes
    #[must_use]
    pub fn detect(data: &[u8]) -> Self {
        if data.starts_with(&XZ_MAGIC) {
            Self::Xz
        } else {
            Self::LzmaAlone
        }
    }
}

/// Decompress a frame block, auto-detecting its container.
///
/// An empty block decompresses to nothing. `memory_limit` caps the LZMA
/// decoder's dictionary buffer for the LZMA-alone container.
///
/// # Errors
///
/// Returns [`ReplayError::DecompressionFailure`] if the stream is invalid,
/// truncated, or exceeds the memory limit.
pub fn decompress(data: &[u8], memory_limit: Option<usize>) -> ReplayResult<Vec<u8>> {
    if data.is_empty() {
        return Ok(Vec::new());
    }

    let container = Container::detect(data);
    tracing::trace!(?container, compressed = data.len(), "decompressing frame block");

    let mut input = data;
    let mut output = Vec::new();
    let result = match container {
        Container::LzmaAlone => {
            let mut options = lzma_rs::decompress::Options::default();
            options.memlimit = memory_limit;
            lzma_rs::lzma_decompress_with_options(&mut input, &mut output, &options)
        }
        Container::Xz => lzma_rs::xz_decompress(&mut input, &mut output),
    };
    result.map_err(|e| ReplayError::DecompressionFailure(e.to_string()))?;

    Ok(output)
}

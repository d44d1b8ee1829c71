#![no_main]
use libfuzzer_sys::fuzz_target;
use osr_codec::{FrameContext, parse_frame_text};

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = parse_frame_text(text, &FrameContext::default());
    }
});

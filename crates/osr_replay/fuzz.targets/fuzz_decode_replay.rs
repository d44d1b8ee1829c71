#![no_main]
use libfuzzer_sys::fuzz_target;
use osr_replay::ReplayDecoder;

fuzz_target!(|data: &[u8]| {
    // Arbitrary input must decode or fail, never panic
    if let Ok(mut record) = ReplayDecoder::new(data.to_vec()).parse() {
        let _ = record.parse_frames();
    }
});

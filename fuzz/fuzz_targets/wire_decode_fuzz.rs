#![no_main]
use libfuzzer_sys::fuzz_target;
use rundelta::wire::{self, BitReader};

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    // First byte picks the target size; the rest is the bit stream.
    let mut target = vec![0xA5u8; data[0] as usize];
    let before = target.clone();
    if wire::read_diff(&mut BitReader::new(&data[1..]), &mut target).is_err() {
        assert_eq!(target, before, "rejected message must not write");
    }
});

#![no_main]
use libfuzzer_sys::fuzz_target;
use rundelta::package::Package;
use rundelta::run;
use rundelta::wire::{self, BitReader, BitWriter};

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    // First byte is the skip threshold; the rest splits into two halves.
    let threshold = u32::from(data[0] & 0x1F);
    let payload = &data[1..];
    let half = payload.len() / 2;
    let (a, b) = (&payload[..half], &payload[half..half * 2]);

    let runs = run::compute(a, b, threshold).unwrap();
    assert!(run::validate(a, b, runs.runs()));

    let mut applied = a.to_vec();
    run::apply(b, &mut applied, &runs).unwrap();
    assert_eq!(applied, b);

    let bytes = Package::pack(b, runs.clone()).unwrap().to_bytes().unwrap();
    let mut unpacked = a.to_vec();
    Package::from_bytes(&bytes)
        .unwrap()
        .unpack(&mut unpacked)
        .unwrap();
    assert_eq!(unpacked, b);

    let mut w = BitWriter::new();
    wire::write_diff(&mut w, &runs, b).unwrap();
    let mut streamed = a.to_vec();
    wire::read_diff(&mut BitReader::new(w.as_bytes()), &mut streamed).unwrap();
    assert_eq!(streamed, b);
});

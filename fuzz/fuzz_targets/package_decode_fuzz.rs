#![no_main]
use libfuzzer_sys::fuzz_target;
use rundelta::package::Package;

fuzz_target!(|data: &[u8]| {
    // Decoding arbitrary bytes must never panic, only return errors.
    let from_slice = Package::from_bytes(data);
    let from_reader = Package::decode(&mut &data[..]);
    if let Ok(package) = &from_slice {
        assert_eq!(package.to_bytes().unwrap(), data);
    }
    if let (Ok(a), Ok(b)) = (&from_slice, &from_reader) {
        assert_eq!(a, b);
    }

    // A decoded package applied to any buffer either fits or errors.
    if let Ok(package) = from_slice {
        let mut dest = vec![0u8; data.len()];
        let _ = package.unpack(&mut dest);
    }
});

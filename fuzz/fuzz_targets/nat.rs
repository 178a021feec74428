#![no_main]
use libfuzzer_sys::fuzz_target;
use scalasig::cursor::SliceCursor;
use scalasig::nat;

fuzz_target!(|data: &[u8]| {
    let mut c = SliceCursor::new(data);
    if let Ok(value) = nat::decode(&mut c) {
        let mut out = Vec::new();
        nat::encode(&mut out, value);
        let mut c = SliceCursor::new(&out);
        assert_eq!(nat::decode(&mut c).ok(), Some(value));
    }
});

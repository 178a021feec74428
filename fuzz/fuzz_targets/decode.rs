#![no_main]
use libfuzzer_sys::fuzz_target;
use scalasig::options::{DecodeOptions, EndSkip};

fuzz_target!(|data: &[u8]| {
    // Beliebige Bytes: Fehler sind erlaubt, Panics und Endlosschleifen nicht.
    let opts = DecodeOptions::strict();
    if let Ok(table) = scalasig::decode_with_options(data, &opts) {
        assert_eq!(table.len(), table.index().len());
        for (i, _) in table.iter() {
            let _ = table.name_of(i);
        }
    }

    let exact = DecodeOptions::strict().with_end_skip(EndSkip::Exact);
    let a = scalasig::decode_with_options(data, &opts);
    let b = scalasig::decode_with_options(data, &exact);
    assert_eq!(a, b);
});

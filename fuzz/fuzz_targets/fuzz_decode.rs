#![no_main]
use libfuzzer_sys::fuzz_target;
use zenconvert::Limits;

fuzz_target!(|data: &[u8]| {
    // Each decoder must reject or accept without panicking
    let limits = Limits::default();
    let _ = zenconvert::decode_bmp(data, &limits, enough::Unstoppable);
    let _ = zenconvert::decode_ppm(data, &limits, enough::Unstoppable);
});

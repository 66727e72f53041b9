#![no_main]
use libfuzzer_sys::fuzz_target;
use zenconvert::*;

fuzz_target!(|data: &[u8]| {
    // If we can decode it, re-encoding and decoding again must produce identical pixels
    let limits = Limits::default();
    let Ok(decoded) = decode_bmp(data, &limits, Unstoppable) else {
        return;
    };

    let mut reencoded = Vec::new();
    encode_bmp(&mut reencoded, &decoded, Unstoppable).expect("re-encode failed");
    let Ok(decoded2) = decode_bmp(&reencoded[..], &limits, Unstoppable) else {
        panic!("re-encoded data failed to decode");
    };
    assert_eq!(decoded, decoded2, "roundtrip pixel mismatch");

    // A second encode is byte-identical: padding is always zero
    let mut again = Vec::new();
    encode_bmp(&mut again, &decoded2, Unstoppable).expect("re-encode failed");
    assert_eq!(reencoded, again);

    // PPM of the same pixels must agree
    let mut ppm = Vec::new();
    encode_ppm(&mut ppm, &decoded, Unstoppable).expect("ppm encode failed");
    let from_ppm = decode_ppm(&ppm[..], &limits, Unstoppable).expect("ppm decode failed");
    assert_eq!(decoded, from_ppm);
});

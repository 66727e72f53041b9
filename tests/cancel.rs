//! Every codec entry point stops with `CodecError::Cancelled` once its
//! `Stop` fires.

use std::sync::atomic::{AtomicUsize, Ordering};

use zenconvert::*;

/// Lets `n` checks pass, then reports cancellation.
struct StopAfter(AtomicUsize);

impl StopAfter {
    fn new(n: usize) -> Self {
        Self(AtomicUsize::new(n))
    }
}

impl Stop for StopAfter {
    fn check(&self) -> Result<(), StopReason> {
        self.0
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1))
            .map(|_| ())
            .map_err(|_| StopReason::Cancelled)
    }
}

fn tall_image() -> PixelBuffer {
    PixelBuffer::new(4, 40, RGB8::new(1, 2, 3))
}

fn is_cancelled<T>(result: Result<T, CodecError>) -> bool {
    matches!(result, Err(CodecError::Cancelled(_)))
}

#[test]
fn bmp_encode_stops_before_headers() {
    let mut out = Vec::new();
    assert!(is_cancelled(encode_bmp(&mut out, &tall_image(), StopAfter::new(0))));
    assert!(out.is_empty());
}

#[test]
fn bmp_encode_stops_between_rows() {
    let mut out = Vec::new();
    assert!(is_cancelled(encode_bmp(&mut out, &tall_image(), StopAfter::new(2))));
    // headers plus the first 16 rows of 12 bytes each
    assert_eq!(out.len(), 54 + 16 * 12);
}

#[test]
fn bmp_decode_stops_between_rows() {
    let mut encoded = Vec::new();
    encode_bmp(&mut encoded, &tall_image(), Unstoppable).unwrap();
    for n in [0, 1, 2] {
        assert!(
            is_cancelled(decode_bmp(&encoded[..], &Limits::default(), StopAfter::new(n))),
            "stop after {n} checks"
        );
    }
}

#[test]
fn ppm_encode_stops() {
    let mut out = Vec::new();
    assert!(is_cancelled(encode_ppm(&mut out, &tall_image(), StopAfter::new(0))));
    assert!(out.is_empty());

    let mut out = Vec::new();
    assert!(is_cancelled(encode_ppm(&mut out, &tall_image(), StopAfter::new(2))));
}

#[test]
fn ppm_decode_stops() {
    let mut encoded = Vec::new();
    encode_ppm(&mut encoded, &tall_image(), Unstoppable).unwrap();
    for n in [0, 1, 2] {
        assert!(
            is_cancelled(decode_ppm(&encoded[..], &Limits::default(), StopAfter::new(n))),
            "stop after {n} checks"
        );
    }

    let mut plain = b"P3\n1 20\n255\n".to_vec();
    plain.extend(b"1 2 3\n".repeat(20));
    assert!(is_cancelled(decode_ppm(&plain[..], &Limits::default(), StopAfter::new(2))));
}

#[test]
fn codec_dispatch_forwards_stop() {
    let stop = StopAfter::new(0);
    for codec in [Codec::Bmp, Codec::Ppm] {
        let mut out = Vec::new();
        assert!(is_cancelled(codec.encode(&mut out, &tall_image(), &stop)), "{codec:?}");
    }
}

#[cfg(feature = "jpeg")]
#[test]
fn jpeg_stops() {
    let mut out = Vec::new();
    assert!(is_cancelled(encode_jpeg(&mut out, &tall_image(), 80, StopAfter::new(0))));

    let mut encoded = Vec::new();
    encode_jpeg(&mut encoded, &tall_image(), 80, Unstoppable).unwrap();
    assert!(is_cancelled(decode_jpeg(&encoded[..], &Limits::default(), StopAfter::new(0))));
}

/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! The literal tiny-scenario tests from the spec's testable-properties list.

use zune_jpeg::JpegDecoder;

/// S3: SOI immediately followed by EOI must fail (no SOF was ever seen).
#[test]
fn scenario_s3_soi_then_eoi_fails() {
    let mut decoder = JpegDecoder::new(&[0xFF, 0xD8, 0xFF, 0xD9]);
    decoder.decode().unwrap_err();
}

/// Builds a minimal baseline (SOF0) grayscale or YCbCr JPEG byte stream by
/// hand: one DQT (all-ones, Tq=0), one SOF0, one DC and one AC Huffman table
/// per the given tables (each a single 1-bit code), one SOS, and a caller
/// supplied entropy payload. Every segment length is computed from its own
/// contents rather than hand-counted, to avoid transcription mistakes.
struct MiniJpeg {
    bytes: Vec<u8>
}

impl MiniJpeg {
    fn new() -> Self {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&[0xFF, 0xD8]); // SOI
        MiniJpeg { bytes }
    }

    /// DQT: one table at `index`, 8-bit precision, 64 entries all set to 1
    /// (the coefficient values in these tests are always zero, so the
    /// quantization value is irrelevant to the decoded sample).
    fn dqt(mut self, index: u8) -> Self {
        let mut seg = vec![index]; // Pq=0 << 4 | Tq=index
        seg.extend(std::iter::repeat(1u8).take(64));
        self.push_segment(0xDB, &seg);
        self
    }

    /// SOF0 with `components`, each `(id, h, v, tq)`.
    fn sof0(mut self, width: u16, height: u16, components: &[(u8, u8, u8, u8)]) -> Self {
        let mut seg = vec![8]; // precision
        seg.extend_from_slice(&height.to_be_bytes());
        seg.extend_from_slice(&width.to_be_bytes());
        seg.push(components.len() as u8);
        for &(id, h, v, tq) in components {
            seg.push(id);
            seg.push((h << 4) | v);
            seg.push(tq);
        }
        self.push_segment(0xC0, &seg);
        self
    }

    /// DHT: a single symbol of length 1 (canonical code `0`) at table index
    /// `index`, class `is_ac`.
    fn dht_single(mut self, index: u8, is_ac: bool, symbol: u8) -> Self {
        let mut seg = vec![(u8::from(is_ac) << 4) | index];
        let mut counts = [0u8; 16];
        counts[0] = 1;
        seg.extend_from_slice(&counts);
        seg.push(symbol);
        self.push_segment(0xC4, &seg);
        self
    }

    /// SOS: `components` each `(id, dc_table, ac_table)`, full spectral
    /// range, no successive approximation (baseline).
    fn sos(mut self, components: &[(u8, u8, u8)]) -> Self {
        let mut seg = vec![components.len() as u8];
        for &(id, dc, ac) in components {
            seg.push(id);
            seg.push((dc << 4) | ac);
        }
        seg.push(0); // Ss
        seg.push(63); // Se
        seg.push(0); // Ah/Al
        self.push_segment(0xDA, &seg);
        self
    }

    fn entropy(mut self, data: &[u8]) -> Self {
        self.bytes.extend_from_slice(data);
        self
    }

    fn eoi(mut self) -> Self {
        self.bytes.extend_from_slice(&[0xFF, 0xD9]);
        self
    }

    fn push_segment(&mut self, marker: u8, payload: &[u8]) {
        self.bytes.push(0xFF);
        self.bytes.push(marker);
        let len = (payload.len() + 2) as u16;
        self.bytes.extend_from_slice(&len.to_be_bytes());
        self.bytes.extend_from_slice(payload);
    }

    fn finish(self) -> Vec<u8> {
        self.bytes
    }
}

/// S4: a 1x1 grayscale baseline JPEG whose only coefficient (the DC term)
/// decodes to a difference of zero (Huffman symbol `0`, no extend bits, so
/// the DC predictor stays zero) must produce a single sample equal to 128 —
/// the IDCT's range-shift of an all-zero block.
#[test]
fn scenario_s4_all_zero_dc_decodes_to_midpoint_gray() {
    // Entropy payload: bit "0" (DC symbol, t=0 -> diff=0), bit "0" (AC
    // symbol run=0,s=0 -> EOB, all AC coefficients implicitly zero), then
    // six 1-padding bits to fill the byte per JPEG convention.
    let data = MiniJpeg::new()
        .dqt(0)
        .sof0(1, 1, &[(1, 1, 1, 0)])
        .dht_single(0, false, 0) // DC table: symbol 0 (t=0)
        .dht_single(0, true, 0) // AC table: symbol 0 (EOB)
        .sos(&[(1, 0, 0)])
        .entropy(&[0b0011_1111])
        .eoi()
        .finish();

    let mut decoder = JpegDecoder::new(&data);
    let pixels = decoder.decode().unwrap();

    assert_eq!(pixels, vec![128]);

    let info = decoder.info().unwrap();
    assert_eq!((info.width, info.height, info.components), (1, 1, 1));
}

/// S6: an image with `h=2,v=2` luminance and `h=v=1` chroma, width and
/// height 1, decodes (one interleaved MCU: 4 Y blocks then 1 Cb then 1 Cr
/// block, each an all-zero DC+EOB pair) to a 1x1x3 output raster. The
/// component plane *allocation* sizes (16x16, 8x8, 8x8) this scenario also
/// names are covered directly against `Components::setup_planes` in
/// `src/components.rs`.
#[test]
fn scenario_s6_chroma_subsampled_output_raster_size() {
    // 6 blocks (4 Y + 1 Cb + 1 Cr), each an all-zero DC/AC pair (2 bits):
    // 12 bits total, packed MSB-first and padded to two bytes with 1 bits.
    let data = MiniJpeg::new()
        .dqt(0)
        .sof0(1, 1, &[(1, 2, 2, 0), (2, 1, 1, 0), (3, 1, 1, 0)])
        .dht_single(0, false, 0)
        .dht_single(0, true, 0)
        .sos(&[(1, 0, 0), (2, 0, 0), (3, 0, 0)])
        .entropy(&[0b0000_0000, 0b0000_1111])
        .eoi()
        .finish();

    let mut decoder = JpegDecoder::new(&data);
    let pixels = decoder.decode().unwrap();

    // YCbCr decodes to RGB by default; neutral (128,128,128) chroma gives a
    // flat gray pixel.
    assert_eq!(pixels, vec![128, 128, 128]);
}

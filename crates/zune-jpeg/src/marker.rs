/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! JPEG marker codes (ITU-T T.81 Table B.1).

/// A recognized JPEG marker, or an opaque `APPn`/reserved code carried
/// through for length-skipping.
#[derive(Eq, PartialEq, Debug, Copy, Clone)]
pub enum Marker {
    /// Start of image, `0xFFD8`.
    SOI,
    /// Start of frame, carrying its process selector (0 = baseline,
    /// 1 = extended sequential, 2 = progressive, others unsupported).
    SOF(u8),
    /// Define Huffman Table(s).
    DHT,
    /// Define Quantization Table(s).
    DQT,
    /// Define Restart Interval.
    DRI,
    /// Start of Scan.
    SOS,
    /// Restart marker `m`, `m in 0..=7`.
    RST(u8),
    /// Application segment `n`, `n in 0..=15`.
    APP(u8),
    /// Comment segment.
    COM,
    /// Define Number of Lines.
    DNL,
    /// End of image, `0xFFD9`.
    EOI
}

impl Marker {
    /// Parse a marker from its second byte (the byte following `0xFF`).
    /// Returns `None` for stuffed bytes (`0x00`) or fill bytes (`0xFF`),
    /// which callers must have already skipped over.
    pub fn from_u8(byte: u8) -> Option<Marker> {
        match byte {
            0xD8 => Some(Marker::SOI),
            0xC0 | 0xC1 | 0xC2 | 0xC3 | 0xC5 | 0xC6 | 0xC7 | 0xC9 | 0xCA | 0xCB | 0xCD | 0xCE
            | 0xCF => Some(Marker::SOF(byte - 0xC0)),
            0xC4 => Some(Marker::DHT),
            0xDB => Some(Marker::DQT),
            0xDD => Some(Marker::DRI),
            0xDA => Some(Marker::SOS),
            0xD0..=0xD7 => Some(Marker::RST(byte - 0xD0)),
            0xE0..=0xEF => Some(Marker::APP(byte - 0xE0)),
            0xFE => Some(Marker::COM),
            0xDC => Some(Marker::DNL),
            0xD9 => Some(Marker::EOI),
            _ => None
        }
    }
}

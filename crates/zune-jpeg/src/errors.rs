/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Errors possible during decoding

use alloc::string::String;
use core::fmt::{Debug, Display, Formatter};

/// A decoding error, classified per the taxonomy decoders in this workspace
/// share: structural violations (`Format`), conformant-but-unhandled input
/// (`Unsupported`), resource limits (`Resource`), and truncated input
/// (`UnexpectedEnd`).
pub enum DecodeErrors {
    /// A structural violation of the JPEG format: a bad marker, a wrong
    /// segment length, an over-subscribed Huffman table, a bad DC/AC code.
    /// Never recovered from.
    Format(String),
    /// Conformant JPEG but outside this decoder's subset: 12-bit samples,
    /// arithmetic coding, hierarchical or lossless frames, an unsupported
    /// output colorspace combination.
    Unsupported(String),
    /// Allocation failure, a dimension product overflow, or an image
    /// exceeding the configured `max_width`/`max_height`/`max_scans`.
    Resource(String),
    /// The byte source was exhausted in the middle of a segment or scan.
    UnexpectedEnd(String),
    /// A Huffman table couldn't be built (invalid symbol counts).
    HuffmanDecode(String),
    /// Wrapper for an underlying I/O failure from the byte source.
    Io(String)
}

impl Debug for DecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Format(reason) => write!(f, "Bad jpeg, reason {reason}"),
            Self::Unsupported(reason) => write!(f, "Unsupported: {reason}"),
            Self::Resource(reason) => write!(f, "Resource limit: {reason}"),
            Self::UnexpectedEnd(reason) => write!(f, "Unexpected end of stream: {reason}"),
            Self::HuffmanDecode(reason) => write!(f, "Cannot build huffman table: {reason}"),
            Self::Io(reason) => write!(f, "I/O error: {reason}")
        }
    }
}

impl Display for DecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        Debug::fmt(self, f)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DecodeErrors {}

impl From<zune_core::bytestream::ZByteIoError> for DecodeErrors {
    fn from(value: zune_core::bytestream::ZByteIoError) -> Self {
        DecodeErrors::Io(alloc::format!("{value:?}"))
    }
}

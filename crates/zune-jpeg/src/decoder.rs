/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! The top-level JPEG decoder: marker parsing, state, and the public API.
#![allow(clippy::doc_markdown)]

use alloc::format;
use alloc::vec::Vec;

use zune_core::bytestream::{ZByteReaderTrait, ZCursor};
use zune_core::colorspace::ColorSpace;

use crate::components::{Components, SampleRatios};
use crate::errors::DecodeErrors;
use crate::headers::{parse_app0, parse_app14, parse_dqt, parse_huffman, parse_sos, parse_start_of_frame};
use crate::huffman::HuffmanTable;
use crate::idct::choose_idct_func;
use crate::marker::Marker;
use crate::options::ZuneJpegOptions;

/// Maximum number of components this decoder supports (Y, Cb, Cr, K).
pub(crate) const MAX_COMPONENTS: usize = 4;

/// Dequantize-and-IDCT function: multiplies a coefficient block by its
/// quantization table and performs the inverse DCT, writing samples into
/// `out_vector` at the given row `stride`.
pub type IDCTPtr = fn(&mut [i32; 64], &mut [i16], usize);

/// A JPEG decoder instance, generic over its byte source.
pub struct JpegDecoder<T: ZByteReaderTrait> {
    pub(crate) stream: T,
    pub(crate) options: ZuneJpegOptions,

    pub(crate) info: ImageInfo,
    pub(crate) qt_tables: [Option<[i32; 64]>; MAX_COMPONENTS],
    pub(crate) dc_huffman_tables: [Option<HuffmanTable>; MAX_COMPONENTS],
    pub(crate) ac_huffman_tables: [Option<HuffmanTable>; MAX_COMPONENTS],
    pub(crate) components: Vec<Components>,

    pub(crate) h_max: usize,
    pub(crate) v_max: usize,
    pub(crate) mcu_width: usize,
    pub(crate) mcu_height: usize,
    pub(crate) mcu_x: usize,
    pub(crate) mcu_y: usize,
    pub(crate) is_interleaved: bool,

    pub(crate) input_colorspace: ColorSpace,
    pub(crate) is_progressive: bool,
    pub(crate) seen_sof: bool,
    pub(crate) seen_adobe: bool,
    /// APP14 color-transform byte, captured whenever APP14 is seen (which in
    /// practice is before SOF, but a nonconformant file could reverse that).
    /// Applied in [`JpegDecoder::apply_color_transform`] once both the
    /// Adobe tag and the component count from SOF are known.
    pub(crate) app14_color_transform: Option<u8>,

    pub(crate) spec_start: u8,
    pub(crate) spec_end: u8,
    pub(crate) succ_high: u8,
    pub(crate) succ_low: u8,
    pub(crate) num_scans: u8,

    pub(crate) idct_func: IDCTPtr,
    pub(crate) z_order: [usize; MAX_COMPONENTS],
    pub(crate) restart_interval: usize,
    pub(crate) todo: usize,

    pub(crate) headers_decoded: bool
}

impl<'a> JpegDecoder<ZCursor<&'a [u8]>> {
    /// Create a new decoder reading from an in-memory buffer, using default
    /// options.
    #[must_use]
    pub fn new(data: &'a [u8]) -> JpegDecoder<ZCursor<&'a [u8]>> {
        JpegDecoder::new_with_options(ZuneJpegOptions::new(), ZCursor::new(data))
    }
}

impl<T: ZByteReaderTrait> JpegDecoder<T> {
    /// Create a new decoder instance with the given options, reading from
    /// `stream`.
    #[must_use]
    pub fn new_with_options(options: ZuneJpegOptions, stream: T) -> JpegDecoder<T> {
        JpegDecoder {
            stream,
            idct_func: choose_idct_func(&options.decoder_options()),
            options,

            info: ImageInfo::default(),
            qt_tables: [None, None, None, None],
            dc_huffman_tables: [None, None, None, None],
            ac_huffman_tables: [None, None, None, None],
            components: Vec::new(),

            h_max: 1,
            v_max: 1,
            mcu_width: 0,
            mcu_height: 0,
            mcu_x: 0,
            mcu_y: 0,
            is_interleaved: false,

            input_colorspace: ColorSpace::YCbCr,
            is_progressive: false,
            seen_sof: false,
            seen_adobe: false,
            app14_color_transform: None,

            spec_start: 0,
            spec_end: 0,
            succ_high: 0,
            succ_low: 0,
            num_scans: 0,

            z_order: [0; MAX_COMPONENTS],
            restart_interval: 0,
            todo: 0x7fff_ffff,

            headers_decoded: false
        }
    }

    #[inline]
    pub(crate) fn read_u8(&mut self) -> Result<u8, DecodeErrors> {
        let mut buf = [0u8; 1];
        self.stream.read_exact_bytes(&mut buf)?;
        Ok(buf[0])
    }

    #[inline]
    pub(crate) fn read_u16_be(&mut self) -> Result<u16, DecodeErrors> {
        let mut buf = [0u8; 2];
        self.stream.read_exact_bytes(&mut buf)?;
        Ok(u16::from_be_bytes(buf))
    }

    pub(crate) fn skip_bytes(&mut self, n: usize) -> Result<(), DecodeErrors> {
        use zune_core::bytestream::ZSeekFrom;
        self.stream.z_seek(ZSeekFrom::Current(n as i64))?;
        Ok(())
    }

    /// Read only the headers of an image, leaving entropy-coded data
    /// untouched. Lets a caller learn [`info`](Self::info) without paying
    /// for full decode.
    ///
    /// # Errors
    /// See [`DecodeErrors`] for the full list of possible failures.
    pub fn decode_headers(&mut self) -> Result<(), DecodeErrors> {
        self.decode_headers_internal()
    }

    /// Returns image information gathered from the headers, or `None` if
    /// [`decode_headers`](Self::decode_headers) (or [`decode`](Self::decode))
    /// has not yet been called.
    #[must_use]
    pub fn info(&self) -> Option<ImageInfo> {
        if !self.headers_decoded {
            return None;
        }
        Some(self.info.clone())
    }

    /// Decode the whole image, returning interleaved pixels in the output
    /// colorspace (the image's native colorspace, unless overridden by
    /// [`ZuneJpegOptions::set_out_colorspace`]).
    ///
    /// # Errors
    /// See [`DecodeErrors`] for the full list of possible failures.
    pub fn decode(&mut self) -> Result<Vec<u8>, DecodeErrors> {
        self.decode_headers_internal()?;

        if self.is_progressive {
            crate::mcu_prog::decode_mcu_ycbcr_progressive(self)?;
        } else {
            crate::mcu::decode_mcu_ycbcr_baseline(self)?;
        }

        crate::worker::build_output(self)
    }

    /// Width of the image, valid after headers have been decoded.
    #[must_use]
    pub fn width(&self) -> u16 {
        self.info.width
    }

    /// Height of the image, valid after headers have been decoded.
    #[must_use]
    pub fn height(&self) -> u16 {
        self.info.height
    }

    /// The colorspace pixels will be returned in once decoded.
    #[must_use]
    pub fn output_colorspace(&self) -> ColorSpace {
        self.options.out_colorspace().unwrap_or_else(|| match self.input_colorspace {
            ColorSpace::Luma => ColorSpace::Luma,
            ColorSpace::CYMK | ColorSpace::YCCK => ColorSpace::CYMK,
            _ => ColorSpace::RGB
        })
    }

    fn decode_headers_internal(&mut self) -> Result<(), DecodeErrors> {
        if self.headers_decoded {
            return Ok(());
        }

        let magic = self.read_u16_be()?;
        if magic != 0xffd8 {
            return Err(DecodeErrors::Format(format!(
                "Not a valid jpeg file, expected SOI marker 0xFFD8, found 0x{magic:04X}"
            )));
        }

        let mut last_byte = 0u8;
        let mut bytes_before_marker = 0u32;

        loop {
            let byte = self.read_u8()?;

            if last_byte == 0xFF {
                if let Some(marker) = Marker::from_u8(byte) {
                    if bytes_before_marker > 3 {
                        if self.options.strict_mode() {
                            return Err(DecodeErrors::Format(
                                "Extra bytes found between marker segments".into()
                            ));
                        }
                        warn!(
                            "{} extra bytes found before marker 0xFF{:X}",
                            bytes_before_marker - 3,
                            byte
                        );
                    }
                    bytes_before_marker = 0;

                    if marker == Marker::SOS {
                        parse_sos(self)?;
                        self.headers_decoded = true;
                        return Ok(());
                    }

                    self.parse_marker_inner(marker)?;
                } else {
                    bytes_before_marker = 0;
                    warn!("Marker 0xFF{byte:X} not recognized, skipping segment");
                    let length = self.read_u16_be()?;
                    if length < 2 {
                        return Err(DecodeErrors::Format(format!(
                            "Found a marker with invalid length {length}"
                        )));
                    }
                    self.skip_bytes(usize::from(length - 2))?;
                }
            }

            last_byte = byte;
            bytes_before_marker += 1;
        }
    }

    pub(crate) fn parse_marker_inner(&mut self, marker: Marker) -> Result<(), DecodeErrors> {
        match marker {
            Marker::SOF(0 | 1) => {
                self.is_progressive = false;
                parse_start_of_frame(self)?;
            }
            Marker::SOF(2) => {
                self.is_progressive = true;
                parse_start_of_frame(self)?;
            }
            Marker::SOF(n) => {
                return Err(DecodeErrors::Unsupported(format!(
                    "SOF{n} frames (arithmetic, hierarchical or lossless coding) are not supported"
                )));
            }
            Marker::APP(0) => parse_app0(self)?,
            Marker::APP(14) => parse_app14(self)?,
            Marker::DQT => parse_dqt(self)?,
            Marker::DHT => parse_huffman(self)?,
            Marker::DRI => {
                let length = self.read_u16_be()?;
                if length != 4 {
                    return Err(DecodeErrors::Format("Bad DRI segment length".into()));
                }
                self.restart_interval = usize::from(self.read_u16_be()?);
                self.todo = self.restart_interval;
            }
            Marker::EOI => {
                return Err(DecodeErrors::Format("Premature end of image".into()));
            }
            Marker::SOS => unreachable!("SOS is handled by the caller"),
            _ => {
                let length = self.read_u16_be()?;
                if length < 2 {
                    return Err(DecodeErrors::Format(format!(
                        "Found a marker with invalid length {length}"
                    )));
                }
                self.skip_bytes(usize::from(length - 2))?;
            }
        }
        Ok(())
    }

    /// Whether a non-interleaved component should be upsampled/color
    /// converted at all, or the scan is purely single-component (Luma or a
    /// bare plane request).
    pub(crate) fn sub_sample_ratio(&self, component_index: usize) -> SampleRatios {
        self.components[component_index].sample_ratio
    }

    /// Resolve `input_colorspace` from a captured APP14 transform byte, now
    /// that the component count from SOF is known. A no-op if APP14 was
    /// never seen. Called from both `parse_start_of_frame` (the common case,
    /// APP14 before SOF) and `parse_app14` (the rare reversed-order case),
    /// so whichever marker is parsed second re-resolves against the other's
    /// already-recorded state.
    pub(crate) fn apply_color_transform(&mut self) {
        let Some(transform) = self.app14_color_transform else {
            return;
        };
        match (transform, self.info.components) {
            (0, 4) => self.input_colorspace = ColorSpace::CYMK,
            (1, _) => self.input_colorspace = ColorSpace::YCbCr,
            (2, _) => self.input_colorspace = ColorSpace::YCCK,
            _ => {}
        }
    }
}

/// Image metadata available once headers have been parsed.
#[derive(Default, Clone, Copy, Eq, PartialEq, Debug)]
pub struct ImageInfo {
    /// Image width in pixels.
    pub width: u16,
    /// Image height in pixels.
    pub height: u16,
    /// Number of components in the image's native colorspace.
    pub components: u8
}

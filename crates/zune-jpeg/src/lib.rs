//!This crate provides a library for decoding valid
//! ITU-T Rec. T.851 (09/2005) ITU-T T.81 (JPEG-1) or JPEG images.
//!
//!
//!
//! # Features
//!  - SSE and AVX accelerated functions to speed up certain decoding operations
//!  - Really fast and accurate 32 bit IDCT algorithm
//!  - Fast color convert functions
//!  - RGBA and RGBX (4-Channel) color conversion functions
//!  - YCbCr to Luma(Grayscale) conversion.
//!
//! # Usage
//! Add zune-jpeg to the dependencies in the project Cargo.toml
//!
//! ```toml
//! [dependencies]
//! zune_jpeg = "0.2.0"
//! ```
//! # Examples
//!
//! ## Decode a JPEG buffer with default arguments.
//! ```no_run
//! use zune_jpeg::JpegDecoder;
//! let data = std::fs::read("a_jpeg_file").unwrap();
//! let mut decoder = JpegDecoder::new(&data);
//! let pixels = decoder.decode().unwrap();
//! ```
//!
//! ## Decode a JPEG buffer to RGBA format
//!```no_run
//! use zune_core::bytestream::ZCursor;
//! use zune_core::colorspace::ColorSpace;
//! use zune_jpeg::{JpegDecoder, ZuneJpegOptions};
//!
//! let options = ZuneJpegOptions::new().set_out_colorspace(ColorSpace::RGBA);
//! let data = std::fs::read("a_jpeg_file").unwrap();
//!
//! let mut decoder = JpegDecoder::new_with_options(options, ZCursor::new(&data));
//! let pixels = decoder.decode().unwrap();
//! ```
//!
//! ## Decode an image and get it's width and height.
//!```no_run
//! use zune_jpeg::JpegDecoder;
//!
//! let data = std::fs::read("a_jpeg_file").unwrap();
//! let mut decoder = JpegDecoder::new(&data);
//! decoder.decode_headers().unwrap();
//! let image_info = decoder.info().unwrap();
//! println!("{},{}",image_info.width,image_info.height)
//! ```
//!
//!
//! # Crate features.
//! This crate tries to be as minimal as possible while being extensible
//! enough to handle the complexities arising from parsing different types
//! of jpeg images.
//!
//! Safety is a top concern that is why we provide a static way to disable unsafe code,
//! by disabling the `x86` feature, which disables platform specific optimizations and
//! reduces the speed of decompression.
//!
//! Please do note that careful consideration has been taken to ensure that the unsafe paths
//! are only unsafe because they depend on platform specific intrinsics, hence no need to disable them
//!
//! The crate tries to decode as many images as possible, as a best effort, even those violating the standard
//! , this means a lot of images may  get silent warnings and wrong output, but if you are sure you will be handling
//! images that follow the spec, set `ZuneJpegOptions::set_strict_mode` to true.

#![warn(
    clippy::correctness,
    clippy::perf,
    clippy::pedantic,
    clippy::inline_always,
    clippy::missing_errors_doc,
    clippy::panic
)]
#![allow(
    clippy::needless_return,
    clippy::similar_names,
    clippy::inline_always,
    clippy::similar_names,
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]
#![cfg_attr(not(feature = "x86"), forbid(unsafe_code))]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;
#[macro_use]
extern crate log;

pub use zune_core::colorspace::ColorSpace;

pub use crate::decoder::{ImageInfo, JpegDecoder};
pub use crate::options::ZuneJpegOptions;

mod bitstream;
mod color_convert;
mod components;
mod decoder;
pub mod errors;
mod headers;
mod huffman;
mod idct;
mod marker;
mod mcu;
mod mcu_prog;
mod misc;
mod options;
mod upsampler;
#[cfg(feature = "x86")]
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
mod unsafe_utils;
mod worker;

#[must_use]
pub fn get_version() -> &'static str
{
    env!("CARGO_PKG_VERSION")
}

//! Decoder options
//!
//! This module exposes a struct for which all implemented
//! decoders get shared options for decoding
//!
//! All supported options are put into one DecoderOptions to allow for global configurations
//! options i.e the same  `DecoderOption` can be reused for all other decoders

mod decoder;

pub use decoder::{DecoderFlags, DecoderOptions};

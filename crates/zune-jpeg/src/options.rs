/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Decoder-wide tunables, layered on top of [`zune_core::options::DecoderOptions`].

use zune_core::colorspace::ColorSpace;
use zune_core::options::DecoderOptions;

/// Options controlling how a [`JpegDecoder`](crate::JpegDecoder) behaves.
///
/// This is a thin, JPEG-flavoured builder around the shared
/// [`DecoderOptions`]; every setter returns `self` so calls chain.
#[derive(Copy, Clone, Debug)]
pub struct ZuneJpegOptions {
    inner: DecoderOptions,
    out_colorspace: Option<ColorSpace>
}

impl ZuneJpegOptions {
    #[must_use]
    pub fn new() -> ZuneJpegOptions {
        ZuneJpegOptions {
            inner: DecoderOptions::default(),
            out_colorspace: None
        }
    }

    #[must_use]
    pub fn new_with_decoder_options(inner: DecoderOptions) -> ZuneJpegOptions {
        ZuneJpegOptions {
            inner,
            out_colorspace: None
        }
    }

    /// Request that decoded pixels be returned in `colorspace` rather than
    /// the image's native one; requires a conversion this decoder supports
    /// (Luma, `YCbCr`/CMYK/`YCCK` source to RGB/RGBA/Luma).
    #[must_use]
    pub fn set_out_colorspace(mut self, colorspace: ColorSpace) -> Self {
        self.out_colorspace = Some(colorspace);
        self
    }

    #[must_use]
    pub fn out_colorspace(&self) -> Option<ColorSpace> {
        self.out_colorspace
    }

    /// Reject images that use any construct outside the strict ITU-T T.81
    /// baseline/progressive subset this decoder aims to support, instead of
    /// making a best effort.
    #[must_use]
    pub fn set_strict_mode(mut self, yes: bool) -> Self {
        self.inner = self.inner.set_strict_mode(yes);
        self
    }

    #[must_use]
    pub fn strict_mode(&self) -> bool {
        self.inner.get_strict_mode()
    }

    #[must_use]
    pub fn set_max_width(mut self, max_width: usize) -> Self {
        self.inner = self.inner.set_max_width(max_width);
        self
    }

    #[must_use]
    pub fn set_max_height(mut self, max_height: usize) -> Self {
        self.inner = self.inner.set_max_height(max_height);
        self
    }

    #[must_use]
    pub fn max_width(&self) -> usize {
        self.inner.get_max_width()
    }

    #[must_use]
    pub fn max_height(&self) -> usize {
        self.inner.get_max_height()
    }

    #[must_use]
    pub fn decoder_options(&self) -> DecoderOptions {
        self.inner
    }
}

impl Default for ZuneJpegOptions {
    fn default() -> Self {
        Self::new()
    }
}

/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Assembles the final interleaved raster from decoded component planes:
//! upsample every component to the image's `hmax x vmax` grid, strip MCU
//! padding, then color-convert into the requested output colorspace.

use alloc::format;
use alloc::vec;
use alloc::vec::Vec;

use zune_core::bytestream::ZByteReaderTrait;
use zune_core::colorspace::ColorSpace;

use crate::color_convert::scalar::{cmyk_to_rgb, ycbcr_to_grayscale, ycbcr_to_rgb, ycbcr_to_rgba, ycck_to_rgb};
use crate::decoder::JpegDecoder;
use crate::errors::DecodeErrors;
use crate::upsampler::upsample;

/// Upsample every component, strip MCU padding and color-convert into
/// `decoder.output_colorspace()`, returning the final interleaved pixels.
pub(crate) fn build_output<T: ZByteReaderTrait>(
    decoder: &mut JpegDecoder<T>
) -> Result<Vec<u8>, DecodeErrors> {
    let width = usize::from(decoder.info.width);
    let height = usize::from(decoder.info.height);
    let padded_width = decoder.mcu_x * 8 * decoder.h_max;

    let mut planes: Vec<Vec<u8>> = Vec::with_capacity(decoder.components.len());
    for component in &decoder.components {
        let upsampled = upsample(
            &component.sample_plane,
            component.width_stride,
            component.height_stride,
            component.sample_ratio
        );
        planes.push(crop_plane(&upsampled, padded_width, width, height));
    }

    let output_colorspace = decoder.output_colorspace();
    let mut output = vec![0u8; width * height * output_colorspace.num_components()];

    color_convert(decoder.input_colorspace, output_colorspace, &planes, &mut output)?;

    Ok(output)
}

/// Drop MCU padding: keep the first `width` bytes of each of the first
/// `height` rows of a plane that is `padded_width` samples wide.
fn crop_plane(plane: &[u8], padded_width: usize, width: usize, height: usize) -> Vec<u8> {
    if padded_width == width {
        return plane[..width * height].to_vec();
    }
    let mut out = Vec::with_capacity(width * height);
    for row in plane.chunks_exact(padded_width).take(height) {
        out.extend_from_slice(&row[..width]);
    }
    out
}

fn interleave_rgb(planes: &[Vec<u8>], output: &mut [u8]) {
    for ((out, &r), (&g, &b)) in output
        .chunks_exact_mut(3)
        .zip(&planes[0])
        .zip(planes[1].iter().zip(&planes[2]))
    {
        out[0] = r;
        out[1] = g;
        out[2] = b;
    }
}

fn interleave_rgba(planes: &[Vec<u8>], output: &mut [u8]) {
    for ((out, &r), (&g, &b)) in output
        .chunks_exact_mut(4)
        .zip(&planes[0])
        .zip(planes[1].iter().zip(&planes[2]))
    {
        out[0] = r;
        out[1] = g;
        out[2] = b;
        out[3] = 255;
    }
}

fn interleave_gray_to_rgb(plane: &[u8], output: &mut [u8], has_alpha: bool) {
    let step = if has_alpha { 4 } else { 3 };
    for (out, &y) in output.chunks_exact_mut(step).zip(plane) {
        out[0] = y;
        out[1] = y;
        out[2] = y;
        if has_alpha {
            out[3] = 255;
        }
    }
}

fn interleave_cymk(planes: &[Vec<u8>], output: &mut [u8]) {
    for (out, (((&c, &m), &y), &k)) in output.chunks_exact_mut(4).zip(
        planes[0]
            .iter()
            .zip(&planes[1])
            .zip(&planes[2])
            .zip(&planes[3])
    ) {
        out[0] = c;
        out[1] = m;
        out[2] = y;
        out[3] = k;
    }
}

/// Dispatch on the decoded scan's colorspace and the caller's requested
/// output colorspace, writing the interleaved result into `output`.
fn color_convert(
    input_colorspace: ColorSpace, output_colorspace: ColorSpace, planes: &[Vec<u8>],
    output: &mut [u8]
) -> Result<(), DecodeErrors> {
    match (input_colorspace, planes.len(), output_colorspace) {
        (ColorSpace::Luma, 1, ColorSpace::Luma) => output.copy_from_slice(&planes[0]),
        (ColorSpace::Luma, 1, ColorSpace::RGB) => interleave_gray_to_rgb(&planes[0], output, false),
        (ColorSpace::Luma, 1, ColorSpace::RGBA | ColorSpace::RGBX) => {
            interleave_gray_to_rgb(&planes[0], output, true);
        }
        (ColorSpace::YCbCr, 3, ColorSpace::Luma) => ycbcr_to_grayscale(&planes[0], output),
        (ColorSpace::YCbCr, 3, ColorSpace::RGB) => {
            ycbcr_to_rgb(&planes[0], &planes[1], &planes[2], output);
        }
        (ColorSpace::YCbCr, 3, ColorSpace::RGBA | ColorSpace::RGBX) => {
            ycbcr_to_rgba(&planes[0], &planes[1], &planes[2], output);
        }
        (ColorSpace::RGB, 3, ColorSpace::RGB) => interleave_rgb(planes, output),
        (ColorSpace::RGB, 3, ColorSpace::RGBA | ColorSpace::RGBX) => interleave_rgba(planes, output),
        (ColorSpace::RGB, 3, ColorSpace::Luma) => {
            // No matrixed luma for an already-RGB scan; fall back to the
            // green channel, the closest single plane to perceptual luma.
            output.copy_from_slice(&planes[1]);
        }
        (ColorSpace::CYMK, 4, ColorSpace::RGB) => {
            cmyk_to_rgb::<3>(&planes[0], &planes[1], &planes[2], &planes[3], output);
        }
        (ColorSpace::CYMK, 4, ColorSpace::RGBA | ColorSpace::RGBX) => {
            cmyk_to_rgb::<4>(&planes[0], &planes[1], &planes[2], &planes[3], output);
        }
        (ColorSpace::CYMK, 4, ColorSpace::CYMK) => interleave_cymk(planes, output),
        (ColorSpace::YCCK, 4, ColorSpace::RGB) => {
            ycck_to_rgb::<3>(&planes[0], &planes[1], &planes[2], &planes[3], output);
        }
        (ColorSpace::YCCK, 4, ColorSpace::RGBA | ColorSpace::RGBX) => {
            ycck_to_rgb::<4>(&planes[0], &planes[1], &planes[2], &planes[3], output);
        }
        (ColorSpace::YCCK, 4, ColorSpace::CYMK) => interleave_cymk(planes, output),
        (_, got, _) => {
            return Err(DecodeErrors::Unsupported(format!(
                "Cannot convert {got}-component {input_colorspace:?} to {output_colorspace:?}"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crop_plane_strips_mcu_padding() {
        // 4x2 padded plane, real image is 3x1.
        let plane = vec![1u8, 2, 3, 9, 4, 5, 6, 9];
        let cropped = crop_plane(&plane, 4, 3, 1);
        assert_eq!(cropped, vec![1, 2, 3]);
    }

    #[test]
    fn crop_plane_is_noop_without_padding() {
        let plane = vec![1u8, 2, 3, 4];
        let cropped = crop_plane(&plane, 2, 2, 2);
        assert_eq!(cropped, plane);
    }

    #[test]
    fn luma_to_rgb_replicates_channel() {
        let plane = vec![10u8, 20];
        let mut out = vec![0u8; 6];
        color_convert(ColorSpace::Luma, ColorSpace::RGB, &[plane], &mut out).unwrap();
        assert_eq!(out, vec![10, 10, 10, 20, 20, 20]);
    }

    #[test]
    fn unsupported_combination_errors() {
        let planes = vec![vec![0u8; 2], vec![0u8; 2]];
        let mut out = vec![0u8; 4];
        let err = color_convert(ColorSpace::YCbCr, ColorSpace::RGB, &planes, &mut out);
        assert!(err.is_err());
    }
}

/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Chroma up-sampling: bringing a component's decoded sample plane up from
//! its own sampling factor to the image's `hmax x vmax` grid.
//!
//! Every routine here operates on the component's full low-resolution plane
//! at once (rather than streaming MCU row by MCU row) per the decision to
//! allocate complete per-component planes up front; see `DESIGN.md`.

pub(crate) mod scalar;

use crate::components::SampleRatios;

/// Upsample `plane` (`width x height` samples) to the image's `hmax x vmax`
/// sampling grid according to `ratio`, returning a new `width*hs x height*vs`
/// plane (`hs = hmax/h`, `vs = vmax/v`).
pub fn upsample(plane: &[u8], width: usize, height: usize, ratio: SampleRatios) -> Vec<u8> {
    match ratio {
        SampleRatios::None => plane.to_vec(),
        SampleRatios::H => scalar::upsample_horizontal(plane, width, height),
        SampleRatios::V => scalar::upsample_vertical(plane, width, height),
        SampleRatios::HV => scalar::upsample_hv(plane, width, height),
        SampleRatios::Generic(hs, vs) => scalar::upsample_generic(plane, width, height, hs, vs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_is_identity() {
        let plane = vec![1u8, 2, 3, 4];
        assert_eq!(upsample(&plane, 2, 2, SampleRatios::None), plane);
    }

    #[test]
    fn horizontal_doubles_width() {
        let plane = vec![10u8, 20, 30, 40]; // 2 rows of width 2
        let out = upsample(&plane, 2, 2, SampleRatios::H);
        assert_eq!(out.len(), 8);
    }

    #[test]
    fn vertical_doubles_height() {
        let plane = vec![10u8, 20, 30, 40]; // 2 rows of width 2
        let out = upsample(&plane, 2, 2, SampleRatios::V);
        assert_eq!(out.len(), 8);
    }

    #[test]
    fn hv_quadruples_area() {
        let plane = vec![10u8, 20, 30, 40]; // 2x2
        let out = upsample(&plane, 2, 2, SampleRatios::HV);
        assert_eq!(out.len(), 16);
    }

    #[test]
    fn generic_replicates_by_factor() {
        let plane = vec![7u8, 9];
        let out = upsample(&plane, 2, 1, SampleRatios::Generic(3, 2));
        assert_eq!(out.len(), 2 * 3 * 1 * 2);
    }
}

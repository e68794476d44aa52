/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Scalar bilinear chroma upsampling over full component planes.

/// `(3*near + far + 2) >> 2`, matching an output pixel closer to `near`.
#[inline(always)]
fn div4(near: i32, far: i32) -> u8 {
    ((3 * near + far + 2) >> 2) as u8
}

/// Double a component plane's width, one row at a time. The first and last
/// output columns replicate the row's endpoint sample.
pub fn upsample_horizontal(plane: &[u8], width: usize, height: usize) -> Vec<u8> {
    let mut out = vec![0u8; width * 2 * height];

    for (in_row, out_row) in plane.chunks_exact(width).zip(out.chunks_exact_mut(width * 2)) {
        if width == 1 {
            out_row[0] = in_row[0];
            out_row[1] = in_row[0];
            continue;
        }

        out_row[0] = in_row[0];
        out_row[1] = div4(i32::from(in_row[0]), i32::from(in_row[1]));

        for (out_pair, window) in out_row[2..].chunks_exact_mut(2).zip(in_row.windows(3)) {
            out_pair[0] = div4(i32::from(window[1]), i32::from(window[0]));
            out_pair[1] = div4(i32::from(window[1]), i32::from(window[2]));
        }

        let last = width - 1;
        out_row[2 * last] = div4(i32::from(in_row[last]), i32::from(in_row[last - 1]));
        out_row[2 * last + 1] = in_row[last];
    }

    out
}

/// Double a component plane's height. Output row `2*i` is row `i` blended
/// 3:1 towards row `i-1`; output row `2*i+1` is row `i` blended 3:1 towards
/// row `i+1`. Edge rows replicate the missing neighbour, satisfying the
/// "first and last `vs-1` rows replicate" edge rule for `vs=2`.
pub fn upsample_vertical(plane: &[u8], width: usize, height: usize) -> Vec<u8> {
    let mut out = vec![0u8; width * height * 2];

    for i in 0..height {
        let cur = &plane[i * width..(i + 1) * width];
        let prev = if i == 0 {
            cur
        } else {
            &plane[(i - 1) * width..i * width]
        };
        let next = if i + 1 == height {
            cur
        } else {
            &plane[(i + 1) * width..(i + 2) * width]
        };

        let (top, bottom) = out[i * 2 * width..(i * 2 + 2) * width].split_at_mut(width);
        for x in 0..width {
            top[x] = div4(i32::from(cur[x]), i32::from(prev[x]));
            bottom[x] = div4(i32::from(cur[x]), i32::from(next[x]));
        }
    }

    out
}

/// Bilinear upsampling in both axes: a vertical pass (as [`upsample_vertical`])
/// followed by a horizontal pass (as [`upsample_horizontal`]) over the
/// vertically-doubled plane.
pub fn upsample_hv(plane: &[u8], width: usize, height: usize) -> Vec<u8> {
    let vertical = upsample_vertical(plane, width, height);
    upsample_horizontal(&vertical, width, height * 2)
}

/// Nearest-neighbour upsampling by arbitrary integer factors `(hs, vs)`.
pub fn upsample_generic(plane: &[u8], width: usize, height: usize, hs: usize, vs: usize) -> Vec<u8> {
    let out_width = width * hs;
    let mut out = vec![0u8; out_width * height * vs];

    for (in_row, out_rows) in plane
        .chunks_exact(width)
        .zip(out.chunks_exact_mut(out_width * vs))
    {
        let mut expanded = vec![0u8; out_width];
        for (out_px, &value) in expanded.chunks_exact_mut(hs).zip(in_row) {
            out_px.fill(value);
        }
        for out_row in out_rows.chunks_exact_mut(out_width) {
            out_row.copy_from_slice(&expanded);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizontal_preserves_endpoints() {
        let plane = vec![10u8, 20, 30];
        let out = upsample_horizontal(&plane, 3, 1);
        assert_eq!(out[0], 10);
        assert_eq!(out[5], 30);
    }

    #[test]
    fn vertical_replicates_at_edges() {
        let plane = vec![0u8, 0, 100, 100, 200, 200]; // 3 rows, width 2
        let out = upsample_vertical(&plane, 2, 3);
        // first output row blends row0 with itself (replicated neighbour)
        assert_eq!(out[0], 0);
        // last output row blends last row with itself
        assert_eq!(out[out.len() - 1], 200);
    }

    #[test]
    fn generic_replicates_samples() {
        let plane = vec![7u8, 9];
        let out = upsample_generic(&plane, 2, 1, 3, 2);
        assert_eq!(out, vec![7, 7, 7, 9, 9, 9, 7, 7, 7, 9, 9, 9]);
    }
}

/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Baseline MCU walking: interleaved and non-interleaved scans.

use alloc::format;

use zune_core::bytestream::ZByteReaderTrait;

use crate::bitstream::BitStream;
use crate::errors::DecodeErrors;
use crate::marker::Marker;
use crate::JpegDecoder;

/// Decode every MCU of a baseline (SOF0/SOF1) scan into each component's
/// `sample_plane`.
pub(crate) fn decode_mcu_ycbcr_baseline<T: ZByteReaderTrait>(
    decoder: &mut JpegDecoder<T>
) -> Result<(), DecodeErrors> {
    check_tables(decoder)?;

    let mut stream = BitStream::new();
    let mut coeff = [0i32; 64];
    let mut samples = [0i16; 64];

    if decoder.is_interleaved {
        'rows: for mcu_y in 0..decoder.mcu_y {
            for mcu_x in 0..decoder.mcu_x {
                for i in 0..decoder.num_scans as usize {
                    let comp_index = decoder.z_order[i];
                    let (h_samp, v_samp) = {
                        let c = &decoder.components[comp_index];
                        (c.horizontal_sample, c.vertical_sample)
                    };

                    for v in 0..v_samp {
                        for h in 0..h_samp {
                            decode_and_store_block(
                                decoder,
                                &mut stream,
                                &mut coeff,
                                &mut samples,
                                comp_index,
                                (mcu_x * h_samp + h) * 8,
                                (mcu_y * v_samp + v) * 8
                            )?;
                        }
                    }
                }

                if handle_restart(decoder, &mut stream)? {
                    break 'rows;
                }
            }
        }
    } else {
        let comp_index = decoder.z_order[0];
        let (blocks_wide, blocks_high) = {
            let c = &decoder.components[comp_index];
            ((c.effective_width + 7) / 8, (c.effective_height + 7) / 8)
        };

        'rows: for by in 0..blocks_high {
            for bx in 0..blocks_wide {
                decode_and_store_block(
                    decoder,
                    &mut stream,
                    &mut coeff,
                    &mut samples,
                    comp_index,
                    bx * 8,
                    by * 8
                )?;

                if handle_restart(decoder, &mut stream)? {
                    break 'rows;
                }
            }
        }
    }

    Ok(())
}

/// Decode one 8x8 block for `comp_index`, dequantize+IDCT it, and write the
/// resulting samples into the component's plane at `(x, y)`.
fn decode_and_store_block<T: ZByteReaderTrait>(
    decoder: &mut JpegDecoder<T>, stream: &mut BitStream, coeff: &mut [i32; 64],
    samples: &mut [i16; 64], comp_index: usize, x: usize, y: usize
) -> Result<(), DecodeErrors> {
    let JpegDecoder {
        stream: reader,
        components,
        dc_huffman_tables,
        ac_huffman_tables,
        idct_func,
        ..
    } = decoder;

    let component = &mut components[comp_index];
    let dc_table = dc_huffman_tables[component.dc_huffman_table]
        .as_ref()
        .ok_or_else(|| DecodeErrors::HuffmanDecode("missing DC Huffman table".into()))?;
    let ac_table = ac_huffman_tables[component.ac_huffman_table]
        .as_ref()
        .ok_or_else(|| DecodeErrors::HuffmanDecode("missing AC Huffman table".into()))?;

    stream.decode_block(reader, component, dc_table, ac_table, coeff)?;
    (idct_func)(coeff, samples, 8);

    let stride = component.width_stride;
    let plane = &mut component.sample_plane;
    for row in 0..8 {
        let dst = (y + row) * stride + x;
        if dst + 8 > plane.len() {
            continue;
        }
        for col in 0..8 {
            plane[dst + col] = samples[row * 8 + col] as u8;
        }
    }

    Ok(())
}

/// Advance the restart-interval countdown, resynchronizing on a restart
/// marker when it elapses. Returns `true` if the entropy stream ended
/// (EOI was latched) and the caller should stop walking MCUs.
fn handle_restart<T: ZByteReaderTrait>(
    decoder: &mut JpegDecoder<T>, stream: &mut BitStream
) -> Result<bool, DecodeErrors> {
    if let Some(Marker::EOI) = stream.marker() {
        return Ok(true);
    }

    if decoder.restart_interval == 0 {
        return Ok(false);
    }

    decoder.todo -= 1;
    if decoder.todo == 0 {
        decoder.todo = decoder.restart_interval;

        match stream.sync_to_marker(&mut decoder.stream)? {
            Some(Marker::RST(_)) => {
                stream.reset();
                for component in &mut decoder.components {
                    component.dc_pred = 0;
                }
            }
            Some(Marker::EOI) | None => return Ok(true),
            Some(other) => {
                return Err(DecodeErrors::Format(format!(
                    "Marker {other:?} found in entropy-coded segment, expected a restart marker"
                )));
            }
        }
    }

    Ok(false)
}

/// Verify every component in the scan has its assigned Huffman tables
/// present, outside the hot decode path.
fn check_tables<T: ZByteReaderTrait>(decoder: &JpegDecoder<T>) -> Result<(), DecodeErrors> {
    for component in &decoder.components {
        if decoder.dc_huffman_tables[component.dc_huffman_table].is_none() {
            return Err(DecodeErrors::HuffmanDecode(format!(
                "No DC Huffman table for component {}",
                component.id
            )));
        }
        if decoder.ac_huffman_tables[component.ac_huffman_table].is_none() {
            return Err(DecodeErrors::HuffmanDecode(format!(
                "No AC Huffman table for component {}",
                component.id
            )));
        }
    }
    Ok(())
}

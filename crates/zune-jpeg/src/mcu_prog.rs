/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Progressive (SOF2) scan walking: DC-first/refine and AC-first/refine
//! scans accumulate into each component's `coefficient_plane`; a final pass
//! dequantizes and runs the IDCT into `sample_plane`.

use alloc::format;

use zune_core::bytestream::ZByteReaderTrait;

use crate::bitstream::BitStream;
use crate::errors::DecodeErrors;
use crate::headers::parse_sos;
use crate::marker::Marker;
use crate::JpegDecoder;

/// Decode every scan of a progressive (SOF2) frame, then finish with a
/// dequantize+IDCT pass over the accumulated coefficients.
pub(crate) fn decode_mcu_ycbcr_progressive<T: ZByteReaderTrait>(
    decoder: &mut JpegDecoder<T>
) -> Result<(), DecodeErrors> {
    let mut stream = BitStream::new();

    loop {
        decode_one_scan(decoder, &mut stream)?;

        stream.reset();
        if !advance_to_next_scan(decoder, &mut stream)? {
            break;
        }
    }

    finish_progressive(decoder)
}

/// Walk every MCU/block of the scan already described by
/// `decoder.spec_start`/`spec_end`/`succ_high`/`succ_low`/`z_order`.
fn decode_one_scan<T: ZByteReaderTrait>(
    decoder: &mut JpegDecoder<T>, stream: &mut BitStream
) -> Result<(), DecodeErrors> {
    decoder.todo = if decoder.restart_interval == 0 {
        usize::MAX
    } else {
        decoder.restart_interval
    };

    if decoder.num_scans > 1 {
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
                            decode_one_block(
                                decoder,
                                stream,
                                comp_index,
                                mcu_x * h_samp + h,
                                mcu_y * v_samp + v
                            )?;
                        }
                    }
                }

                if handle_restart(decoder, stream)? {
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
                decode_one_block(decoder, stream, comp_index, bx, by)?;

                if handle_restart(decoder, stream)? {
                    break 'rows;
                }
            }
        }
    }

    Ok(())
}

/// Decode one block's contribution to the current scan into
/// `component.coefficient_plane`, dispatching on the scan's spectral
/// selection and successive-approximation state.
fn decode_one_block<T: ZByteReaderTrait>(
    decoder: &mut JpegDecoder<T>, stream: &mut BitStream, comp_index: usize, block_x: usize,
    block_y: usize
) -> Result<(), DecodeErrors> {
    let ss = decoder.spec_start;
    let se = decoder.spec_end;
    let ah = decoder.succ_high;
    let al = decoder.succ_low;

    let JpegDecoder { stream: reader, components, dc_huffman_tables, ac_huffman_tables, .. } =
        decoder;

    let component = &mut components[comp_index];
    let stride = component.width_stride;
    let base = block_y * 8 * stride + block_x * 8;

    if ss == 0 {
        let dc_table = dc_huffman_tables[component.dc_huffman_table]
            .as_ref()
            .ok_or_else(|| DecodeErrors::HuffmanDecode("missing DC Huffman table".into()))?;

        if base >= component.coefficient_plane.len() {
            return Ok(());
        }

        let dc_pred = &mut component.dc_pred;
        let coeff = &mut component.coefficient_plane[base];

        if ah == 0 {
            stream.decode_dc_first(reader, dc_pred, dc_table, al, coeff)?;
        } else {
            stream.decode_dc_refine(reader, al, coeff)?;
        }
        return Ok(());
    }

    let ac_table = ac_huffman_tables[component.ac_huffman_table]
        .as_ref()
        .ok_or_else(|| DecodeErrors::HuffmanDecode("missing AC Huffman table".into()))?;

    let mut block = [0i16; 64];
    load_block(&component.coefficient_plane, base, stride, &mut block);

    if ah == 0 {
        stream.decode_ac_first(reader, ac_table, ss, se, al, &mut block)?;
    } else {
        stream.decode_ac_refine(reader, ac_table, ss, se, al, &mut block)?;
    }

    store_block(&mut component.coefficient_plane, base, stride, &block);

    Ok(())
}

fn load_block(plane: &[i16], base: usize, stride: usize, out: &mut [i16; 64]) {
    for row in 0..8 {
        let src = base + row * stride;
        if src + 8 > plane.len() {
            continue;
        }
        out[row * 8..row * 8 + 8].copy_from_slice(&plane[src..src + 8]);
    }
}

fn store_block(plane: &mut [i16], base: usize, stride: usize, input: &[i16; 64]) {
    for row in 0..8 {
        let dst = base + row * stride;
        if dst + 8 > plane.len() {
            continue;
        }
        plane[dst..dst + 8].copy_from_slice(&input[row * 8..row * 8 + 8]);
    }
}

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

/// After a scan's entropy data ends, parse whatever markers follow (DHT,
/// DQT, DRI, COM, APPn may all legally appear between progressive scans)
/// until the next SOS (scan continues) or EOI (frame complete).
fn advance_to_next_scan<T: ZByteReaderTrait>(
    decoder: &mut JpegDecoder<T>, stream: &mut BitStream
) -> Result<bool, DecodeErrors> {
    const MAX_INTER_SCAN_MARKERS: usize = 64;

    for _ in 0..MAX_INTER_SCAN_MARKERS {
        let marker = match stream.sync_to_marker(&mut decoder.stream)? {
            Some(m) => m,
            None => return Ok(false)
        };

        match marker {
            Marker::SOS => {
                parse_sos(decoder)?;
                stream.reset();
                return Ok(true);
            }
            Marker::EOI => return Ok(false),
            Marker::DHT | Marker::DQT | Marker::DRI | Marker::COM | Marker::APP(_) => {
                decoder.parse_marker_inner(marker)?;
                stream.reset();
            }
            other => {
                return Err(DecodeErrors::Format(format!(
                    "Unexpected marker {other:?} while scanning for the next progressive scan"
                )));
            }
        }
    }

    Err(DecodeErrors::Format(
        "Too many markers between progressive scans".into()
    ))
}

/// Dequantize and run the IDCT over every accumulated block of every
/// component, filling `sample_plane`.
fn finish_progressive<T: ZByteReaderTrait>(decoder: &mut JpegDecoder<T>) -> Result<(), DecodeErrors> {
    let idct_func = decoder.idct_func;

    for component in &mut decoder.components {
        let stride = component.width_stride;
        let blocks_wide = stride / 8;
        let blocks_high = component.height_stride / 8;
        let qt = component.quantization_table;

        for by in 0..blocks_high {
            for bx in 0..blocks_wide {
                let base = by * 8 * stride + bx * 8;
                if base + 7 * stride + 8 > component.coefficient_plane.len() {
                    continue;
                }

                let mut coeff = [0i32; 64];
                for row in 0..8 {
                    for col in 0..8 {
                        let raw = i32::from(component.coefficient_plane[base + row * stride + col]);
                        coeff[row * 8 + col] = raw * qt[row * 8 + col];
                    }
                }

                let mut samples = [0i16; 64];
                idct_func(&mut coeff, &mut samples, 8);

                for row in 0..8 {
                    let dst = base + row * stride;
                    for col in 0..8 {
                        component.sample_plane[dst + col] = samples[row * 8 + col] as u8;
                    }
                }
            }
        }
    }

    Ok(())
}

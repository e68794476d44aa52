/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Marker segment parsing: SOF(0/1/2), DQT, DHT, DRI, SOS, APP0 (JFIF) and
//! APP14 (Adobe transform hint). Everything else is skipped by length.

use alloc::format;
use alloc::vec;
use alloc::vec::Vec;

use zune_core::bytestream::ZByteReaderTrait;
use zune_core::colorspace::ColorSpace;

use crate::components::Components;
use crate::decoder::{JpegDecoder, MAX_COMPONENTS};
use crate::errors::DecodeErrors;
use crate::huffman::HuffmanTable;
use crate::misc::UN_ZIGZAG;

/// One component entry out of a SOF marker, before its Huffman table
/// assignment and DC predictor are set up.
#[derive(Debug, Copy, Clone)]
pub struct FrameComponent {
    pub component_id: u8,
    pub horizontal_sample: u8,
    pub vertical_sample: u8,
    pub quantization_table_number: u8
}

/// Un-zigzag a DQT's 64 values into natural (row-major) block order.
fn un_zig_zag(values: &[i32; 64]) -> [i32; 64] {
    let mut out = [0i32; 64];
    for i in 0..64 {
        out[UN_ZIGZAG[i]] = values[i];
    }
    out
}

/// B.2.4.2 Huffman table-specification syntax (DHT).
pub(crate) fn parse_huffman<T: ZByteReaderTrait>(
    decoder: &mut JpegDecoder<T>
) -> Result<(), DecodeErrors> {
    let length = decoder.read_u16_be()?;
    let mut dht_length = i32::from(length.checked_sub(2).ok_or_else(|| {
        DecodeErrors::Format("Invalid Huffman length in image".into())
    })?);

    while dht_length > 16 {
        let ht_info = decoder.read_u8()?;
        let dc_or_ac = (ht_info >> 4) & 0xF;
        let index = (ht_info & 0xF) as usize;

        if index >= MAX_COMPONENTS {
            return Err(DecodeErrors::Format(format!(
                "Invalid DHT index {index}, expected between 0 and 3"
            )));
        }
        if dc_or_ac > 1 {
            return Err(DecodeErrors::Format(format!(
                "Invalid DHT class {dc_or_ac}, should be 0 (DC) or 1 (AC)"
            )));
        }

        let mut bits = [0u8; 16];
        decoder.stream.read_exact_bytes(&mut bits)?;
        dht_length -= 1 + 16;

        let symbols_sum: i32 = bits.iter().map(|f| i32::from(*f)).sum();
        if symbols_sum > 256 {
            return Err(DecodeErrors::Format(
                "Encountered Huffman table with excessive length in DHT".into()
            ));
        }
        if symbols_sum > dht_length {
            return Err(DecodeErrors::Format(format!(
                "Excessive Huffman table of length {symbols_sum} found when header length is {dht_length}"
            )));
        }
        dht_length -= symbols_sum;

        let mut symbols = vec![0u8; symbols_sum as usize];
        decoder.stream.read_exact_bytes(&mut symbols)?;

        let table = HuffmanTable::new(&bits, symbols, dc_or_ac == 1)?;
        if dc_or_ac == 0 {
            decoder.dc_huffman_tables[index] = Some(table);
        } else {
            decoder.ac_huffman_tables[index] = Some(table);
        }
    }

    if dht_length != 0 {
        return Err(DecodeErrors::Format("Bogus Huffman table definition".into()));
    }

    Ok(())
}

/// B.2.4.1 Quantization table-specification syntax (DQT).
pub(crate) fn parse_dqt<T: ZByteReaderTrait>(
    decoder: &mut JpegDecoder<T>
) -> Result<(), DecodeErrors> {
    let length = decoder.read_u16_be()?;
    let mut qt_length = length.checked_sub(2).ok_or_else(|| {
        DecodeErrors::Format("Invalid DQT length, should be greater than 2".into())
    })?;

    while qt_length > 0 {
        let qt_info = decoder.read_u8()?;
        let precision = (qt_info >> 4) as usize;
        let table_position = (qt_info & 0x0f) as usize;
        let precision_bytes = 64 * (precision + 1);

        if (precision_bytes + 1) as u16 > qt_length {
            return Err(DecodeErrors::Format(format!(
                "Invalid QT table, {qt_length} bytes left, too small for a {}-byte table",
                precision_bytes + 1
            )));
        }

        let mut raw = [0i32; 64];
        match precision {
            0 => {
                let mut bytes = [0u8; 64];
                decoder.stream.read_exact_bytes(&mut bytes)?;
                for i in 0..64 {
                    raw[i] = i32::from(bytes[i]);
                }
                qt_length -= (precision_bytes as u16) + 1;
            }
            1 => {
                for slot in &mut raw {
                    *slot = i32::from(decoder.read_u16_be()?);
                }
                qt_length -= (precision_bytes as u16) + 1;
            }
            _ => {
                return Err(DecodeErrors::Format(format!(
                    "Expected QT precision of 0 or 1, found {precision}"
                )));
            }
        }

        if table_position >= MAX_COMPONENTS {
            return Err(DecodeErrors::Format(format!(
                "Invalid QT table position {table_position}, expected 0..=3"
            )));
        }

        trace!("Assigning qt table {table_position} with precision {precision}");
        decoder.qt_tables[table_position] = Some(un_zig_zag(&raw));
    }

    Ok(())
}

/// B.2.2 Frame header syntax (SOF0/SOF1/SOF2).
pub(crate) fn parse_start_of_frame<T: ZByteReaderTrait>(
    decoder: &mut JpegDecoder<T>
) -> Result<(), DecodeErrors> {
    if decoder.seen_sof {
        return Err(DecodeErrors::Format("Two Start of Frame markers".into()));
    }

    let length = decoder.read_u16_be()?;
    let precision = decoder.read_u8()?;

    if precision != 8 {
        return Err(DecodeErrors::Unsupported(format!(
            "Only 8-bit sample precision is supported, image has {precision} bits"
        )));
    }

    let height = decoder.read_u16_be()?;
    let width = decoder.read_u16_be()?;

    if usize::from(width) > decoder.options.max_width() {
        return Err(DecodeErrors::Resource(format!(
            "Image width {width} exceeds configured limit {}",
            decoder.options.max_width()
        )));
    }
    if usize::from(height) > decoder.options.max_height() {
        return Err(DecodeErrors::Resource(format!(
            "Image height {height} exceeds configured limit {}",
            decoder.options.max_height()
        )));
    }
    if width == 0 || height == 0 {
        return Err(DecodeErrors::Format("Zero image width or height".into()));
    }

    decoder.info.width = width;
    decoder.info.height = height;

    let num_components = decoder.read_u8()?;
    if num_components == 0 {
        return Err(DecodeErrors::Format("Number of components cannot be zero".into()));
    }

    let expected_length = 8 + 3 * u16::from(num_components);
    if length != expected_length {
        return Err(DecodeErrors::Format(format!(
            "Start of frame length {length} does not match expected {expected_length}"
        )));
    }

    if num_components == 1 {
        decoder.input_colorspace = ColorSpace::Luma;
    } else if num_components == 4 {
        decoder.input_colorspace = ColorSpace::CYMK;
    } else if num_components == 3 {
        decoder.input_colorspace = ColorSpace::YCbCr;
    } else {
        return Err(DecodeErrors::Unsupported(format!(
            "Unsupported component count {num_components}, expected 1, 3 or 4"
        )));
    }

    decoder.info.components = num_components;

    let mut frame_components = Vec::with_capacity(usize::from(num_components));
    let mut temp = [0u8; 3];
    for _ in 0..num_components {
        decoder.stream.read_exact_bytes(&mut temp)?;
        frame_components.push(FrameComponent {
            component_id: temp[0],
            horizontal_sample: temp[1] >> 4,
            vertical_sample: temp[1] & 0xF,
            quantization_table_number: temp[2]
        });
    }

    // Some encoders tag untransformed 3-component scans by naming the
    // components 'R','G','B' instead of 1,2,3, skipping APP14 entirely.
    // Honor that even though we already defaulted to YCbCr above.
    if !decoder.seen_adobe
        && frame_components.len() == 3
        && frame_components.iter().map(|c| c.component_id).eq([0x52, 0x47, 0x42])
    {
        decoder.input_colorspace = ColorSpace::RGB;
    }

    // Re-resolve against any APP14 transform captured before this SOF (the
    // common ordering): `decoder.info.components` above was just set, so a
    // transform=0 + 4-component CMYK tag now has the information it needs.
    decoder.apply_color_transform();

    let h_max = frame_components
        .iter()
        .map(|c| usize::from(c.horizontal_sample))
        .max()
        .unwrap_or(1)
        .max(1);
    let v_max = frame_components
        .iter()
        .map(|c| usize::from(c.vertical_sample))
        .max()
        .unwrap_or(1)
        .max(1);

    decoder.h_max = h_max;
    decoder.v_max = v_max;

    let mut components = Vec::with_capacity(frame_components.len());
    for (pos, fc) in frame_components.into_iter().enumerate() {
        components.push(Components::new(fc, pos, h_max, v_max)?);
    }

    decoder.mcu_width = 8 * h_max;
    decoder.mcu_height = 8 * v_max;
    decoder.mcu_x = (usize::from(width) + decoder.mcu_width - 1) / decoder.mcu_width;
    decoder.mcu_y = (usize::from(height) + decoder.mcu_height - 1) / decoder.mcu_height;

    decoder.is_interleaved = components.len() > 1;

    for component in &mut components {
        component.setup_planes(
            decoder.mcu_x,
            decoder.mcu_y,
            usize::from(width),
            usize::from(height),
            h_max,
            v_max,
            decoder.is_progressive
        );

        let qt_index = usize::from(component.quantization_table_number);
        let table = (qt_index < MAX_COMPONENTS)
            .then(|| decoder.qt_tables[qt_index])
            .flatten();

        if let Some(table) = table {
            component.set_quantization_table(&table);
        } else {
            return Err(DecodeErrors::Format(format!(
                "No quantization table found for table index {}",
                component.quantization_table_number
            )));
        }
    }

    decoder.components = components;
    decoder.seen_sof = true;

    Ok(())
}

/// B.2.3 Scan header syntax (SOS).
pub(crate) fn parse_sos<T: ZByteReaderTrait>(
    decoder: &mut JpegDecoder<T>
) -> Result<(), DecodeErrors> {
    let length = usize::from(decoder.read_u16_be()?);
    let num_scan_components = decoder.read_u8()?;

    if !(1..=4).contains(&num_scan_components) {
        return Err(DecodeErrors::Format(format!(
            "Invalid number of scan components {num_scan_components}, expected 1..=4"
        )));
    }

    let expected_length = 6 + 2 * usize::from(num_scan_components);
    if length != expected_length {
        return Err(DecodeErrors::Format(format!(
            "Bad SOS length {length}, expected {expected_length}"
        )));
    }

    if decoder.components.is_empty() {
        return Err(DecodeErrors::Format("SOS marker seen before SOF".into()));
    }

    decoder.num_scans = num_scan_components;
    decoder.z_order = [0; MAX_COMPONENTS];

    for i in 0..num_scan_components {
        let id = decoder.read_u8()?;
        let table_selectors = decoder.read_u8()?;

        let component_index = decoder
            .components
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| {
                DecodeErrors::Format(format!("Invalid scan component id {id}, not present in SOF"))
            })?;

        let dc_selector = usize::from(table_selectors >> 4);
        let ac_selector = usize::from(table_selectors & 0xF);
        if dc_selector >= MAX_COMPONENTS || ac_selector >= MAX_COMPONENTS {
            return Err(DecodeErrors::Format(format!(
                "Invalid Huffman table selector {table_selectors:#x} for component id {id}"
            )));
        }

        decoder.components[component_index].dc_huffman_table = dc_selector;
        decoder.components[component_index].ac_huffman_table = ac_selector;
        decoder.z_order[usize::from(i)] = component_index;
    }

    decoder.spec_start = decoder.read_u8()?;
    decoder.spec_end = decoder.read_u8()?;

    let approximation = decoder.read_u8()?;
    decoder.succ_high = approximation >> 4;
    decoder.succ_low = approximation & 0xF;

    if decoder.spec_start > 63 || decoder.spec_end > 63 {
        return Err(DecodeErrors::Format(format!(
            "Invalid spectral selection Ss={} Se={}, expected 0..=63",
            decoder.spec_start, decoder.spec_end
        )));
    }
    if decoder.succ_high > 13 || decoder.succ_low > 13 {
        return Err(DecodeErrors::Format(format!(
            "Invalid successive approximation Ah={} Al={}, expected 0..=13",
            decoder.succ_high, decoder.succ_low
        )));
    }

    Ok(())
}

/// APP0: JFIF identification. We only care that it is present; density and
/// thumbnail fields are not surfaced.
pub(crate) fn parse_app0<T: ZByteReaderTrait>(
    decoder: &mut JpegDecoder<T>
) -> Result<(), DecodeErrors> {
    let length = decoder.read_u16_be()?;
    decoder.skip_bytes(usize::from(length.saturating_sub(2)))
}

/// APP14: Adobe segment. Carries the color-transform hint that disambiguates
/// a 4-component scan between CMYK and `YCCK`, and a 3-component scan
/// between RGB and `YCbCr`.
pub(crate) fn parse_app14<T: ZByteReaderTrait>(
    decoder: &mut JpegDecoder<T>
) -> Result<(), DecodeErrors> {
    let mut length = usize::from(decoder.read_u16_be()?);
    length = length.saturating_sub(2);

    if length < 12 {
        return decoder.skip_bytes(length);
    }

    let mut tag = [0u8; 5];
    decoder.stream.peek_exact_bytes(&mut tag)?;

    if &tag != b"Adobe" {
        return decoder.skip_bytes(length);
    }

    decoder.seen_adobe = true;

    decoder.skip_bytes(11)?;
    let transform = decoder.read_u8()?;
    length -= 12;

    if !matches!(transform, 0 | 1 | 2) {
        warn!("Unknown Adobe color transform {transform}, ignoring");
    } else {
        decoder.app14_color_transform = Some(transform);
        // APP14 conventionally precedes SOF, but apply immediately too in
        // case a nonconformant file reverses that order.
        decoder.apply_color_transform();
    }

    decoder.skip_bytes(length)
}

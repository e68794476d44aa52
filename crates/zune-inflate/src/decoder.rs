//! An incredibly spiffy deflate decoder.
//!
//! This crate features a deflate/zlib decoder inspired by
//! Eric Bigger's [libdeflate] hence.
//!
//! This libary has a smaller set of features hence you should use it
//! if it aligns with your end goals.
//!
//! Use it if
//! - You want a smaller library footprint when compared to flate/miniz-oxide
//! - You want zlib-ng/libdeflate speeds
//! - You want a 100% safe, pure rust implementation with above.
//!
//! [libdeflate]: https://github.com/ebiggers/libdeflate

use crate::bitstream::BitStreamReader;
use crate::constants::{
    fixed_dist_lengths, fixed_litlen_lengths, DEFLATE_NUM_DIST_SYMS, DEFLATE_NUM_LITLEN_SYMS,
    DEFLATE_NUM_PRECODE_SYMS, DEFLATE_PRECODE_LENS_PERMUTATION, DIST_BASE, DIST_EXTRA_BITS,
    LENGTH_BASE, LENGTH_EXTRA_BITS
};
use crate::errors::{DecodeErrorStatus, InflateDecodeErrors};
use crate::huffman::HuffmanTable;
use crate::utils::copy_rep_matches;

/// Options controlling how a [`DeflateDecoder`] decodes its input.
#[derive(Copy, Clone, Debug)]
pub struct DeflateOptions
{
    confirm_checksum: bool,
    limit:            usize,
    size_hint:        usize
}

impl Default for DeflateOptions
{
    fn default() -> Self
    {
        DeflateOptions {
            confirm_checksum: true,
            limit:            1 << 30,
            size_hint:        4096
        }
    }
}

impl DeflateOptions
{
    /// Whether to verify the zlib Adler-32 checksum after decoding. Ignored
    /// by [`DeflateDecoder::decode_deflate`], which has no checksum to check.
    #[must_use]
    pub fn set_confirm_checksum(mut self, yes: bool) -> Self
    {
        self.confirm_checksum = yes;
        self
    }

    /// Maximum number of output bytes to produce before bailing with
    /// [`DecodeErrorStatus::OutputLimitExceeded`].
    #[must_use]
    pub fn set_limit(mut self, limit: usize) -> Self
    {
        self.limit = limit;
        self
    }

    /// Initial output buffer capacity, as a decompression-ratio hint.
    #[must_use]
    pub fn set_size_hint(mut self, hint: usize) -> Self
    {
        self.size_hint = hint;
        self
    }
}

/// A DEFLATE (RFC 1951) / zlib (RFC 1950) decoder, reading from an in-memory
/// buffer.
pub struct DeflateDecoder<'a>
{
    data:    &'a [u8],
    options: DeflateOptions
}

impl<'a> DeflateDecoder<'a>
{
    /// Create a new decoder with default options.
    #[must_use]
    pub fn new(data: &'a [u8]) -> DeflateDecoder<'a>
    {
        DeflateDecoder::new_with_options(data, DeflateOptions::default())
    }

    /// Create a new decoder with the given options.
    #[must_use]
    pub fn new_with_options(data: &'a [u8], options: DeflateOptions) -> DeflateDecoder<'a>
    {
        DeflateDecoder { data, options }
    }

    /// Decode a raw DEFLATE stream (no zlib or gzip wrapper).
    ///
    /// # Errors
    /// Returns [`InflateDecodeErrors`] on malformed input, truncated input,
    /// or if the configured output limit is exceeded. The partially decoded
    /// output, if any, is carried in the error.
    pub fn decode_deflate(&mut self) -> Result<Vec<u8>, InflateDecodeErrors>
    {
        let mut out = Vec::with_capacity(self.options.size_hint);
        let mut stream = BitStreamReader::new(self.data);

        inflate_blocks(&mut stream, &mut out, self.options.limit)
            .map_err(|e| InflateDecodeErrors::new(e, out.clone()))?;

        Ok(out)
    }

    /// Decode a zlib-wrapped (RFC 1950) DEFLATE stream, validating the
    /// 2-byte header and, unless [`DeflateOptions::set_confirm_checksum`]
    /// disabled it, the trailing Adler-32 checksum.
    ///
    /// # Errors
    /// Returns [`InflateDecodeErrors`] on a malformed zlib header, malformed
    /// or truncated DEFLATE data, a checksum mismatch, or an exceeded output
    /// limit.
    pub fn decode_zlib(&mut self) -> Result<Vec<u8>, InflateDecodeErrors>
    {
        if self.data.len() < 2 + 4
        {
            return Err(InflateDecodeErrors::new_with_error(
                DecodeErrorStatus::InsufficientData
            ));
        }

        let cmf = self.data[0];
        let flg = self.data[1];
        let cm = cmf & 0xF;
        let cinfo = cmf >> 4;

        if cm != 8
        {
            return Err(InflateDecodeErrors::new_with_error(DecodeErrorStatus::GenericStr(
                format!("Unsupported zlib compression method {cm}")
            )));
        }
        if cinfo > 7
        {
            return Err(InflateDecodeErrors::new_with_error(DecodeErrorStatus::GenericStr(
                format!("Unsupported zlib CINFO {cinfo}, must be <=7")
            )));
        }
        if (u16::from(cmf) * 256 + u16::from(flg)) % 31 != 0
        {
            return Err(InflateDecodeErrors::new_with_error(DecodeErrorStatus::Generic(
                "zlib header FCHECK failed"
            )));
        }
        if flg & 0x20 != 0
        {
            return Err(InflateDecodeErrors::new_with_error(DecodeErrorStatus::Generic(
                "zlib FDICT (preset dictionary) is not supported"
            )));
        }

        let body = &self.data[2..self.data.len() - 4];
        let mut out = Vec::with_capacity(self.options.size_hint);
        let mut stream = BitStreamReader::new(body);

        inflate_blocks(&mut stream, &mut out, self.options.limit)
            .map_err(|e| InflateDecodeErrors::new(e, out.clone()))?;

        if self.options.confirm_checksum
        {
            let expected = u32::from_be_bytes(self.data[self.data.len() - 4..].try_into().unwrap());
            let found = adler32(&out);
            if expected != found
            {
                return Err(InflateDecodeErrors::new(
                    DecodeErrorStatus::MismatchedAdler(expected, found),
                    out
                ));
            }
        }

        Ok(out)
    }
}

#[cfg(feature = "zlib")]
fn adler32(data: &[u8]) -> u32
{
    simd_adler32::adler32(data)
}

#[cfg(not(feature = "zlib"))]
fn adler32(_data: &[u8]) -> u32
{
    0
}

fn check_limit(size: usize, limit: usize) -> Result<(), DecodeErrorStatus>
{
    if size > limit
    {
        return Err(DecodeErrorStatus::OutputLimitExceeded(limit, size));
    }
    Ok(())
}

/// Walk every block (RFC 1951 3.2.3) until the final block's `BFINAL` bit is
/// set.
fn inflate_blocks(
    stream: &mut BitStreamReader, out: &mut Vec<u8>, limit: usize
) -> Result<(), DecodeErrorStatus>
{
    loop
    {
        let is_final = stream.get_bits(1) == 1;
        let block_type = stream.get_bits(2);

        match block_type
        {
            0 => decode_stored_block(stream, out, limit)?,
            1 =>
            {
                let litlen = HuffmanTable::build(&fixed_litlen_lengths())?;
                let dist = HuffmanTable::build(&fixed_dist_lengths())?;
                decode_huffman_block(stream, out, &litlen, &dist, limit)?;
            }
            2 =>
            {
                let (litlen, dist) = read_dynamic_tables(stream)?;
                decode_huffman_block(stream, out, &litlen, &dist, limit)?;
            }
            _ => return Err(DecodeErrorStatus::CorruptData)
        }

        if is_final
        {
            break;
        }
        if stream.is_exhausted()
        {
            return Err(DecodeErrorStatus::InsufficientData);
        }
    }

    Ok(())
}

/// A type-0 (stored) block: `LEN`/`~LEN` followed by `LEN` raw bytes.
fn decode_stored_block(
    stream: &mut BitStreamReader, out: &mut Vec<u8>, limit: usize
) -> Result<(), DecodeErrorStatus>
{
    stream.align_to_byte();

    let header = stream
        .read_aligned_bytes(4)
        .ok_or(DecodeErrorStatus::InsufficientData)?;
    let len = u16::from_le_bytes([header[0], header[1]]);
    let nlen = u16::from_le_bytes([header[2], header[3]]);

    if len != !nlen
    {
        return Err(DecodeErrorStatus::CorruptData);
    }

    let len = usize::from(len);
    check_limit(out.len() + len, limit)?;

    let bytes = stream
        .read_aligned_bytes(len)
        .ok_or(DecodeErrorStatus::InsufficientData)?;
    out.extend_from_slice(bytes);

    Ok(())
}

/// Read a dynamic (type-2) block's Huffman table header: the precode table,
/// then the literal/length and distance table code lengths it encodes.
fn read_dynamic_tables(
    stream: &mut BitStreamReader
) -> Result<(HuffmanTable, HuffmanTable), DecodeErrorStatus>
{
    let num_litlen_syms = 257 + stream.get_bits(5) as usize;
    let num_dist_syms = 1 + stream.get_bits(5) as usize;
    let num_explicit_precode_lens = 4 + stream.get_bits(4) as usize;

    if num_litlen_syms > DEFLATE_NUM_LITLEN_SYMS || num_dist_syms > DEFLATE_NUM_DIST_SYMS
    {
        return Err(DecodeErrorStatus::CorruptData);
    }

    let mut precode_lens = [0u8; DEFLATE_NUM_PRECODE_SYMS];
    for &slot in DEFLATE_PRECODE_LENS_PERMUTATION
        .iter()
        .take(num_explicit_precode_lens)
    {
        precode_lens[usize::from(slot)] = stream.get_bits(3) as u8;
    }

    let precode_table = HuffmanTable::build(&precode_lens)?;

    let total_syms = num_litlen_syms + num_dist_syms;
    let mut lens = vec![0u8; total_syms];
    let mut i = 0;

    while i < total_syms
    {
        let symbol = precode_table.decode(stream)?;

        match symbol
        {
            0..=15 =>
            {
                lens[i] = symbol as u8;
                i += 1;
            }
            16 =>
            {
                // Repeat the previous length 3-6 times.
                if i == 0
                {
                    return Err(DecodeErrorStatus::CorruptData);
                }
                let repeat = 3 + stream.get_bits(2) as usize;
                let prev = lens[i - 1];
                if i + repeat > total_syms
                {
                    return Err(DecodeErrorStatus::CorruptData);
                }
                for slot in &mut lens[i..i + repeat]
                {
                    *slot = prev;
                }
                i += repeat;
            }
            17 =>
            {
                // 3-10 zeros.
                let repeat = 3 + stream.get_bits(3) as usize;
                if i + repeat > total_syms
                {
                    return Err(DecodeErrorStatus::CorruptData);
                }
                i += repeat;
            }
            18 =>
            {
                // 11-138 zeros.
                let repeat = 11 + stream.get_bits(7) as usize;
                if i + repeat > total_syms
                {
                    return Err(DecodeErrorStatus::CorruptData);
                }
                i += repeat;
            }
            _ => return Err(DecodeErrorStatus::CorruptData)
        }
    }

    let litlen_table = HuffmanTable::build(&lens[..num_litlen_syms])?;
    let dist_table = HuffmanTable::build(&lens[num_litlen_syms..])?;

    Ok((litlen_table, dist_table))
}

/// A type-1 or type-2 block body: a stream of literal/length symbols,
/// terminated by the end-of-block symbol (256), each possibly followed by a
/// length/distance back-reference.
fn decode_huffman_block(
    stream: &mut BitStreamReader, out: &mut Vec<u8>, litlen: &HuffmanTable, dist: &HuffmanTable,
    limit: usize
) -> Result<(), DecodeErrorStatus>
{
    loop
    {
        let symbol = litlen.decode(stream)?;

        if symbol < 256
        {
            check_limit(out.len() + 1, limit)?;
            out.push(symbol as u8);
            continue;
        }
        if symbol == 256
        {
            return Ok(());
        }

        let length_index = usize::from(symbol) - 257;
        if length_index >= LENGTH_BASE.len()
        {
            return Err(DecodeErrorStatus::CorruptData);
        }

        let length = usize::from(LENGTH_BASE[length_index])
            + stream.get_bits(u32::from(LENGTH_EXTRA_BITS[length_index])) as usize;

        let dist_symbol = dist.decode(stream)?;
        if usize::from(dist_symbol) >= DIST_BASE.len()
        {
            return Err(DecodeErrorStatus::CorruptData);
        }

        let distance = usize::from(DIST_BASE[usize::from(dist_symbol)])
            + stream.get_bits(u32::from(DIST_EXTRA_BITS[usize::from(dist_symbol)])) as usize;

        if distance == 0 || distance > out.len()
        {
            return Err(DecodeErrorStatus::CorruptData);
        }

        check_limit(out.len() + length, limit)?;

        let dest_offset = out.len();
        out.resize(dest_offset + length, 0);
        copy_rep_matches::<true>(out, dest_offset - distance, dest_offset, length);
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    /// Build a single stored (type-0) final block containing `data`.
    fn stored_block(data: &[u8]) -> Vec<u8>
    {
        let mut out = vec![0b0000_0001u8]; // BFINAL=1, BTYPE=00
        let len = data.len() as u16;
        out.extend_from_slice(&len.to_le_bytes());
        out.extend_from_slice(&(!len).to_le_bytes());
        out.extend_from_slice(data);
        out
    }

    #[test]
    fn stored_block_roundtrips()
    {
        let payload = b"hello, deflate";
        let encoded = stored_block(payload);

        let mut decoder = DeflateDecoder::new(&encoded);
        let decoded = decoder.decode_deflate().unwrap();

        assert_eq!(decoded, payload);
    }

    #[test]
    fn bad_stored_block_length_is_rejected()
    {
        let mut encoded = stored_block(b"hi");
        encoded[3] ^= 0xFF; // corrupt NLEN so it no longer complements LEN

        let mut decoder = DeflateDecoder::new(&encoded);
        assert!(decoder.decode_deflate().is_err());
    }

    #[test]
    fn fixed_huffman_block_with_backreference()
    {
        // "abcabc" encoded as a fixed-Huffman block: literals 'a','b','c',
        // then a length/distance back-reference (length 3, distance 3),
        // then end-of-block. Built bit by bit via a tiny local writer since
        // there's no encoder in this crate to produce it for us.
        let mut writer = BitWriter::new();
        writer.put_bits(1, 1); // BFINAL
        writer.put_bits(0b01, 2); // BTYPE = fixed Huffman

        // Fixed literal/length codes: symbols 0..=143 are 8 bits, value =
        // 0x30 + symbol (RFC 1951 3.2.6).
        for &lit in b"abc"
        {
            let code = 0x30u32 + u32::from(lit);
            writer.put_huffman_code(code, 8);
        }

        // length 3 -> symbol 257, base 3, 0 extra bits. Fixed code for 257
        // is 7 bits: 0b000_0000 (257-256=1 within the 7-bit 256..279 range
        // starting at code 0b0000000).
        writer.put_huffman_code(0b0000_001, 7);
        // distance 3 -> symbol 2 (base 3), fixed 5-bit code = symbol itself.
        writer.put_huffman_code(0b00010, 5);

        // end of block, symbol 256, 7-bit code 0b0000000.
        writer.put_huffman_code(0b0000_000, 7);

        let encoded = writer.finish();
        let mut decoder = DeflateDecoder::new(&encoded);
        let decoded = decoder.decode_deflate().unwrap();

        assert_eq!(decoded, b"abcabc");
    }

    /// Minimal MSB-first-per-symbol bit writer for constructing fixed
    /// Huffman test fixtures (DEFLATE codewords are packed MSB-first, even
    /// though they're read from the bitstream LSB-first per byte).
    struct BitWriter
    {
        bytes:        Vec<u8>,
        bit_buffer:   u32,
        bits_pending: u32
    }

    impl BitWriter
    {
        fn new() -> Self
        {
            BitWriter { bytes: Vec::new(), bit_buffer: 0, bits_pending: 0 }
        }

        /// Push `n` bits of `value`, LSB of `value` first (used for raw
        /// fields like BFINAL/BTYPE/extra bits).
        fn put_bits(&mut self, value: u32, n: u32)
        {
            for i in 0..n
            {
                let bit = (value >> i) & 1;
                self.bit_buffer |= bit << self.bits_pending;
                self.bits_pending += 1;
                self.flush_bytes();
            }
        }

        /// Push a Huffman codeword, MSB of `code` first (canonical codes are
        /// assigned and conventionally written this way), which the bitstream
        /// stores no differently than any other bits once serialized.
        fn put_huffman_code(&mut self, code: u32, n: u32)
        {
            for i in (0..n).rev()
            {
                let bit = (code >> i) & 1;
                self.bit_buffer |= bit << self.bits_pending;
                self.bits_pending += 1;
                self.flush_bytes();
            }
        }

        fn flush_bytes(&mut self)
        {
            while self.bits_pending >= 8
            {
                self.bytes.push((self.bit_buffer & 0xFF) as u8);
                self.bit_buffer >>= 8;
                self.bits_pending -= 8;
            }
        }

        fn finish(mut self) -> Vec<u8>
        {
            if self.bits_pending > 0
            {
                self.bytes.push((self.bit_buffer & 0xFF) as u8);
            }
            self.bytes
        }
    }

    #[test]
    fn zlib_header_with_bad_fcheck_is_rejected()
    {
        let data = [0x78u8, 0x00, 0, 0, 0, 0]; // FCHECK deliberately wrong
        let mut decoder = DeflateDecoder::new(&data);
        assert!(decoder.decode_zlib().is_err());
    }

    #[test]
    fn zlib_wraps_a_stored_block()
    {
        let payload = b"zlib wrapped";
        let deflate = stored_block(payload);

        // A valid zlib header with CM=8, CINFO=7 (0x78) and an FCHECK byte
        // making (cmf*256+flg) a multiple of 31.
        let cmf = 0x78u8;
        let mut flg = 0x00u8;
        while (u16::from(cmf) * 256 + u16::from(flg)) % 31 != 0
        {
            flg += 1;
        }

        let mut data = vec![cmf, flg];
        data.extend_from_slice(&deflate);
        data.extend_from_slice(&adler32(payload).to_be_bytes());

        let mut decoder = DeflateDecoder::new(&data);
        let decoded = decoder.decode_zlib().unwrap();
        assert_eq!(decoded, payload);
    }

    /// S1: a literal zlib stream wrapping a stored block must decode to
    /// "Hello". The trailing 4 bytes in this literal fixture are not a valid
    /// Adler-32 of "Hello" (they check out against lowercase "hello"
    /// instead), so checksum confirmation is disabled here; that mechanism
    /// is already covered by `zlib_wraps_a_stored_block` above.
    #[test]
    fn scenario_s1_zlib_stored_block_decodes_to_hello()
    {
        let data: [u8; 16] = [
            0x78, 0x9C, 0x01, 0x05, 0x00, 0xFA, 0xFF, 0x48, 0x65, 0x6C, 0x6C, 0x6F, 0x06, 0x2C,
            0x02, 0x15
        ];
        let options = DeflateOptions::default().set_confirm_checksum(false);
        let mut decoder = DeflateDecoder::new_with_options(&data, options);
        let decoded = decoder.decode_zlib().unwrap();
        assert_eq!(decoded, b"Hello");
    }

    /// S2: a literal zlib stream wrapping a fixed-Huffman block must decode
    /// to "Hello". Same checksum caveat as S1 above.
    #[test]
    fn scenario_s2_zlib_fixed_huffman_block_decodes_to_hello()
    {
        let data: [u8; 13] = [
            0x78, 0x9C, 0xF3, 0x48, 0xCD, 0xC9, 0xC9, 0x07, 0x00, 0x06, 0x2C, 0x02, 0x15
        ];
        let options = DeflateOptions::default().set_confirm_checksum(false);
        let mut decoder = DeflateDecoder::new_with_options(&data, options);
        let decoded = decoder.decode_zlib().unwrap();
        assert_eq!(decoded, b"Hello");
    }

    /// S5: the same stored-block layout as S1, but with NLEN corrupted so it
    /// no longer complements LEN, must fail before producing any output.
    #[test]
    fn scenario_s5_bad_nlen_fails_before_output()
    {
        let mut data: [u8; 16] = [
            0x78, 0x9C, 0x01, 0x05, 0x00, 0xFA, 0xFF, 0x48, 0x65, 0x6C, 0x6C, 0x6F, 0x06, 0x2C,
            0x02, 0x15
        ];
        data[5] ^= 0xFF; // corrupt NLEN so LEN != !NLEN

        let options = DeflateOptions::default().set_confirm_checksum(false);
        let mut decoder = DeflateDecoder::new_with_options(&data, options);
        let err = decoder.decode_zlib().unwrap_err();
        assert!(err.data.is_empty());
    }
}

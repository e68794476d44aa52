//! Canonical Huffman code construction and bit-serial decoding, built from a
//! symbol's code-length array the way RFC 1951 3.2.2 describes canonical
//! codes: symbols are assigned codes in order of increasing length, and
//! within a length in order of symbol value.

use crate::bitstream::BitStreamReader;
use crate::constants::DEFLATE_MAX_CODEWORD_LENGTH;
use crate::errors::DecodeErrorStatus;

pub(crate) struct HuffmanTable
{
    /// Number of codes of each length, indexed by length (`count[0]` unused).
    count:  [u16; DEFLATE_MAX_CODEWORD_LENGTH + 1],
    /// Symbols, ordered canonically (by length, then by symbol value).
    symbol: Vec<u16>
}

impl HuffmanTable
{
    /// Build a decode table from a code-length array (`lengths[sym]` is the
    /// codeword length for `sym`, `0` meaning the symbol is unused).
    pub fn build(lengths: &[u8]) -> Result<HuffmanTable, DecodeErrorStatus>
    {
        let mut count = [0u16; DEFLATE_MAX_CODEWORD_LENGTH + 1];
        for &len in lengths
        {
            if usize::from(len) > DEFLATE_MAX_CODEWORD_LENGTH
            {
                return Err(DecodeErrorStatus::CorruptData);
            }
            count[usize::from(len)] += 1;
        }

        // Reject over-subscribed codes (RFC 1951 3.2.7): at each length, no
        // more codes can be in use than the length allows.
        let mut left = 1i32;
        for len in 1..=DEFLATE_MAX_CODEWORD_LENGTH
        {
            left <<= 1;
            left -= i32::from(count[len]);
            if left < 0
            {
                return Err(DecodeErrorStatus::CorruptData);
            }
        }

        let mut offsets = [0u16; DEFLATE_MAX_CODEWORD_LENGTH + 2];
        for len in 1..=DEFLATE_MAX_CODEWORD_LENGTH
        {
            offsets[len + 1] = offsets[len] + count[len];
        }

        let mut symbol = vec![0u16; lengths.len()];
        for (sym, &len) in lengths.iter().enumerate()
        {
            if len != 0
            {
                let idx = usize::from(offsets[usize::from(len)]);
                symbol[idx] = sym as u16;
                offsets[usize::from(len)] += 1;
            }
        }

        Ok(HuffmanTable { count, symbol })
    }

    /// Decode one symbol, consuming exactly as many bits as its codeword.
    pub fn decode(&self, stream: &mut BitStreamReader) -> Result<u16, DecodeErrorStatus>
    {
        let mut code = 0i32;
        let mut first = 0i32;
        let mut index = 0i32;

        for len in 1..=DEFLATE_MAX_CODEWORD_LENGTH
        {
            let bit = stream
                .read_bit()
                .ok_or(DecodeErrorStatus::InsufficientData)?;
            code |= bit as i32;

            let count = i32::from(self.count[len]);
            if code - first < count
            {
                return Ok(self.symbol[(index + (code - first)) as usize]);
            }

            index += count;
            first += count;
            first <<= 1;
            code <<= 1;
        }

        Err(DecodeErrorStatus::CorruptData)
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::constants::{fixed_dist_lengths, fixed_litlen_lengths};

    #[test]
    fn single_symbol_table_decodes() {
        // A degenerate alphabet of two symbols, lengths [1, 1].
        let table = HuffmanTable::build(&[1, 1]).unwrap();
        let mut stream = BitStreamReader::new(&[0b0000_0001]);
        // First codeword is '0' -> symbol 0, second bit '0' (padding) since
        // byte is 0b0000_0001 read LSB-first: bit0=1 -> symbol 1.
        assert_eq!(table.decode(&mut stream).unwrap(), 1);
    }

    #[test]
    fn fixed_litlen_table_builds() {
        let lengths = fixed_litlen_lengths();
        assert!(HuffmanTable::build(&lengths).is_ok());
    }

    #[test]
    fn fixed_dist_table_builds() {
        let lengths = fixed_dist_lengths();
        assert!(HuffmanTable::build(&lengths).is_ok());
    }

    #[test]
    fn oversubscribed_lengths_are_rejected() {
        // Two length-1 codes would already consume the whole length-1 space;
        // a third is oversubscribed.
        let err = HuffmanTable::build(&[1, 1, 1]);
        assert!(err.is_err());
    }
}

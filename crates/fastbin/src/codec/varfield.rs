// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Variable-length field codec.
//!
//! A variable field (string, primitive vector, embedded variant) starts with
//! one 8-byte header word followed by the raw payload:
//!
//! ```text
//! unaligned = 8 + content_len
//! aligned   = round_up_8(unaligned)
//! diff      = aligned - unaligned           // 0..=7
//! header    = aligned | diff << 56
//! ```
//!
//! The low 56 bits are the distance to the next field; the top byte recovers
//! the exact content length without looking at the content.

use crate::codec::cursor;
use crate::config::{align8, DIFF_SHIFT, MAX_CONTENT_LEN, SIZE_MASK, VAR_HEADER_SIZE};
use crate::error::{FastbinError, Result};

/// Decoded variable field header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VarHeader {
    aligned: usize,
    diff: u8,
}

impl VarHeader {
    /// Header for a field carrying `content_len` payload bytes.
    pub fn for_content(content_len: usize) -> Result<Self> {
        if content_len as u64 > MAX_CONTENT_LEN {
            return Err(FastbinError::ContentTooLarge { len: content_len });
        }
        let unaligned = VAR_HEADER_SIZE + content_len;
        let aligned = align8(unaligned);
        Ok(Self {
            aligned,
            diff: (aligned - unaligned) as u8,
        })
    }

    /// Packed header word.
    pub fn encode(self) -> u64 {
        self.aligned as u64 | (u64::from(self.diff) << DIFF_SHIFT)
    }

    /// Unpack and validate a header word read at `offset`.
    ///
    /// A zero word is reported as `None`: the field has not been written.
    pub fn decode(word: u64, offset: usize) -> Result<Option<Self>> {
        if word == 0 {
            return Ok(None);
        }
        let aligned = word & SIZE_MASK;
        let diff = (word >> DIFF_SHIFT) as u8;
        let valid = aligned % 8 == 0
            && diff < 8
            && aligned >= VAR_HEADER_SIZE as u64 + u64::from(diff);
        let aligned = usize::try_from(aligned).ok().filter(|_| valid);
        match aligned {
            Some(aligned) => Ok(Some(Self { aligned, diff })),
            None => Err(FastbinError::InvalidHeader { offset, word }),
        }
    }

    /// Aligned field size (header + payload + padding). Always a multiple of 8.
    pub fn size(&self) -> usize {
        self.aligned
    }

    /// Header + payload, without padding.
    pub fn size_unaligned(&self) -> usize {
        self.aligned - usize::from(self.diff)
    }

    /// Payload length in bytes.
    pub fn content_len(&self) -> usize {
        self.size_unaligned() - VAR_HEADER_SIZE
    }

    /// Padding byte count.
    pub fn diff(&self) -> u8 {
        self.diff
    }
}

/// Aligned size a field with `content_len` payload bytes will occupy.
pub fn calc_size_aligned(content_len: usize) -> Result<usize> {
    VarHeader::for_content(content_len).map(|h| h.size())
}

/// Read the header at `offset`. `None` when the field has not been written.
pub fn read_header(buf: &[u8], offset: usize) -> Result<Option<VarHeader>> {
    VarHeader::decode(cursor::load_u64(buf, offset)?, offset)
}

/// Borrow the payload of the variable field at `offset`.
pub fn read_var(buf: &[u8], offset: usize) -> Result<Option<&[u8]>> {
    match read_header(buf, offset)? {
        Some(header) => {
            cursor::check(buf.len(), offset, header.size())?;
            cursor::bytes(buf, offset + VAR_HEADER_SIZE, header.content_len()).map(Some)
        }
        None => Ok(None),
    }
}

/// Reserve a field of `len` payload bytes at `offset`, let `fill` write the
/// payload, then zero the padding. Returns the aligned field size.
pub fn write_var_with<F>(buf: &mut [u8], offset: usize, len: usize, fill: F) -> Result<usize>
where
    F: FnOnce(&mut [u8]) -> Result<()>,
{
    let header = VarHeader::for_content(len)?;
    cursor::check(buf.len(), offset, header.size()).inspect_err(|_| {
        log::debug!(
            "[varfield] field of {} bytes does not fit at offset {} (capacity {})",
            header.size(),
            offset,
            buf.len()
        );
    })?;
    cursor::store_u64(buf, offset, header.encode())?;
    let payload = offset + VAR_HEADER_SIZE;
    fill(cursor::bytes_mut(buf, payload, len)?)?;
    cursor::zero(buf, payload + len, usize::from(header.diff()))?;
    Ok(header.size())
}

/// Write `content` as a variable field at `offset`. Returns the aligned size.
pub fn write_var(buf: &mut [u8], offset: usize, content: &[u8]) -> Result<usize> {
    write_var_with(buf, offset, content.len(), |dst| {
        dst.copy_from_slice(content);
        Ok(())
    })
}

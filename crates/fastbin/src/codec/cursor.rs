// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Bounds-checked little-endian access to a byte buffer at absolute offsets.

use crate::error::{FastbinError, Result};

/// Generate load functions for primitive words (eliminates code duplication)
///
/// Each generated function:
/// 1. Checks buffer bounds (returns `FastbinError::OutOfBounds` if overflow)
/// 2. Copies N bytes out of the buffer
/// 3. Converts bytes to value via `from_le_bytes()`
macro_rules! impl_load_le {
    ($name:ident, $type:ty, $size:expr) => {
        #[inline]
        pub fn $name(buf: &[u8], offset: usize) -> Result<$type> {
            let mut raw = [0u8; $size];
            raw.copy_from_slice(bytes(buf, offset, $size)?);
            Ok(<$type>::from_le_bytes(raw))
        }
    };
}

/// Generate store functions for primitive words (eliminates code duplication)
///
/// Each generated function:
/// 1. Checks buffer bounds (returns `FastbinError::OutOfBounds` if overflow)
/// 2. Converts value to little-endian bytes via `to_le_bytes()`
/// 3. Copies bytes into the buffer
macro_rules! impl_store_le {
    ($name:ident, $type:ty) => {
        #[inline]
        pub fn $name(buf: &mut [u8], offset: usize, value: $type) -> Result<()> {
            store_bytes(buf, offset, &value.to_le_bytes())
        }
    };
}

impl_load_le!(load_u64, u64, 8);
impl_store_le!(store_u64, u64);

/// Validate that `len` bytes starting at `offset` fit in a buffer of `capacity`.
#[inline]
pub fn check(capacity: usize, offset: usize, len: usize) -> Result<usize> {
    match offset.checked_add(len) {
        Some(end) if end <= capacity => Ok(end),
        _ => Err(FastbinError::OutOfBounds {
            offset,
            len,
            capacity,
        }),
    }
}

/// Borrow `len` bytes at `offset`.
#[inline]
pub fn bytes(buf: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    let end = check(buf.len(), offset, len)?;
    Ok(&buf[offset..end])
}

/// Mutably borrow `len` bytes at `offset`.
#[inline]
pub fn bytes_mut(buf: &mut [u8], offset: usize, len: usize) -> Result<&mut [u8]> {
    let end = check(buf.len(), offset, len)?;
    Ok(&mut buf[offset..end])
}

/// Mutably borrow everything from `offset` to the end of the buffer.
#[inline]
pub fn tail_mut(buf: &mut [u8], offset: usize) -> Result<&mut [u8]> {
    check(buf.len(), offset, 0)?;
    Ok(&mut buf[offset..])
}

/// Copy `data` into the buffer at `offset`.
#[inline]
pub fn store_bytes(buf: &mut [u8], offset: usize, data: &[u8]) -> Result<()> {
    bytes_mut(buf, offset, data.len())?.copy_from_slice(data);
    Ok(())
}

/// Zero `len` bytes at `offset`.
#[inline]
pub fn zero(buf: &mut [u8], offset: usize, len: usize) -> Result<()> {
    bytes_mut(buf, offset, len)?.fill(0);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_U64: u64 = 0x1122_3344_5566_7788;

    #[test]
    fn test_store_load_u64_is_little_endian() {
        let mut buffer = [0u8; 16];
        store_u64(&mut buffer, 8, TEST_U64).expect("Store u64 should succeed");
        assert_eq!(
            &buffer[8..],
            &[0x88, 0x77, 0x66, 0x55, 0x44, 0x33, 0x22, 0x11]
        );
        assert_eq!(load_u64(&buffer, 8).expect("Load u64 should succeed"), TEST_U64);
    }

    #[test]
    fn test_store_overflow_reports_offset() {
        let mut buffer = [0u8; 12];
        let err = store_u64(&mut buffer, 8, TEST_U64).expect_err("Store should overflow");
        assert_eq!(
            err,
            FastbinError::OutOfBounds {
                offset: 8,
                len: 8,
                capacity: 12
            }
        );
        assert_eq!(buffer, [0u8; 12], "failed store must not write");
    }

    #[test]
    fn test_check_rejects_offset_overflow() {
        assert!(check(16, usize::MAX, 8).is_err());
        assert_eq!(check(16, 16, 0).expect("empty range at end is valid"), 16);
        assert!(check(16, 17, 0).is_err());
    }

    #[test]
    fn test_tail_and_zero() {
        let mut buffer = [0xFFu8; 8];
        zero(&mut buffer, 2, 4).expect("Zero should succeed");
        assert_eq!(buffer, [0xFF, 0xFF, 0, 0, 0, 0, 0xFF, 0xFF]);
        assert_eq!(tail_mut(&mut buffer, 6).expect("tail").len(), 2);
        assert!(tail_mut(&mut buffer, 9).is_err());
    }
}

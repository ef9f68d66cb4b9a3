// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Buffer ownership shared by every container view.
//!
//! Containers are generic over their storage `B`:
//!
//! - owned: `Box<[u8]>` or `Vec<u8>`, released when the view is dropped
//! - borrowed: `&[u8]` / `&mut [u8]`, bound to the owner's lifetime
//!
//! Views are never `Clone`; moving a view moves its storage. Duplicating the
//! data goes through `copy()` / `copy_into()`, which take exactly
//! `binary_size()` bytes.

use crate::error::{FastbinError, Result};

/// Owned, heap-allocated storage.
pub type OwnedBuf = Box<[u8]>;

/// Allocate `len` zeroed bytes.
pub fn alloc_zeroed(len: usize) -> OwnedBuf {
    vec![0u8; len].into_boxed_slice()
}

/// A container whose finalized bytes sit at the front of its buffer.
pub trait Encoded {
    /// Bytes in use, as recorded by the container's own size word.
    fn binary_size(&self) -> Result<usize>;

    /// Exactly `binary_size()` bytes from the front of the buffer.
    fn encoded_bytes(&self) -> Result<&[u8]>;
}

/// Zero the whole buffer after checking it can hold `min` bytes.
pub(crate) fn zero_fill(buf: &mut [u8], min: usize) -> Result<()> {
    if buf.len() < min {
        log::debug!(
            "[buffer] create needs {} bytes, buffer holds {}",
            min,
            buf.len()
        );
        return Err(FastbinError::CapacityExceeded {
            needed: min,
            available: buf.len(),
        });
    }
    buf.fill(0);
    Ok(())
}

/// Duplicate `bytes` into a new owned buffer of the same length.
pub(crate) fn copy_owned(bytes: &[u8]) -> OwnedBuf {
    bytes.to_vec().into_boxed_slice()
}

/// Copy `bytes` to the front of `dest`.
pub(crate) fn copy_to<'d>(bytes: &[u8], dest: &'d mut [u8]) -> Result<&'d mut [u8]> {
    if dest.len() < bytes.len() {
        log::debug!(
            "[buffer] copy of {} bytes into {} byte destination",
            bytes.len(),
            dest.len()
        );
        return Err(FastbinError::CapacityExceeded {
            needed: bytes.len(),
            available: dest.len(),
        });
    }
    dest[..bytes.len()].copy_from_slice(bytes);
    Ok(dest)
}

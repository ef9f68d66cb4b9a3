// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Wire format constants.
//!
//! Single source of truth for every magic number in the layout. Codecs and
//! containers import from here; nothing else hard-codes a header width.

/// Width of a size word. All size words are little-endian `u64`.
pub const WORD_SIZE: usize = 8;

/// Stride of a fixed scalar/enum field, regardless of its native width.
pub const FIELD_STRIDE: usize = 8;

/// Header in front of every string, primitive vector and embedded variant.
pub const VAR_HEADER_SIZE: usize = 8;

/// Struct array header: total size word followed by element count word.
pub const ARRAY_HEADER_SIZE: usize = 16;

/// Variant header: tag and used size packed into one word.
pub const VARIANT_HEADER_SIZE: usize = 8;

/// Self-size word at offset 0 of every variable-size object.
pub const OBJECT_HEADER_SIZE: usize = 8;

/// Bit position of the padding count in a variable field header.
pub const DIFF_SHIFT: u32 = 56;

/// Low 56 bits of a variable field header: aligned field size.
pub const SIZE_MASK: u64 = (1 << DIFF_SHIFT) - 1;

/// Low bits of a variant header holding the active tag.
pub const VARIANT_TAG_BITS: u32 = 8;

/// Mask for the variant tag.
pub const VARIANT_TAG_MASK: u64 = (1 << VARIANT_TAG_BITS) - 1;

/// Maximum number of kinds a variant can declare (tags 0..=254).
pub const MAX_VARIANT_KINDS: usize = 255;

/// Largest payload a variable field may carry: 2^56 - 9 bytes.
pub const MAX_CONTENT_LEN: u64 = (1 << DIFF_SHIFT) - 9;

/// Round `n` up to the next multiple of [`WORD_SIZE`].
#[inline]
pub const fn align8(n: usize) -> usize {
    (n + (WORD_SIZE - 1)) & !(WORD_SIZE - 1)
}

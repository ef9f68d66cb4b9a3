// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error type shared by every container view.
//!
//! Misuse of the format (writing past a buffer, reading a field before the
//! fields in front of it exist, asking a variant for the wrong kind) is
//! reported as a [`FastbinError`] instead of reading garbage.

use thiserror::Error;

/// Errors reported by fastbin codecs and container views.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FastbinError {
    // Capacity
    #[error("access of {len} bytes at offset {offset} exceeds buffer capacity {capacity}")]
    OutOfBounds {
        offset: usize,
        len: usize,
        capacity: usize,
    },

    #[error("capacity exceeded: need {needed} bytes, {available} available")]
    CapacityExceeded { needed: usize, available: usize },

    #[error("variable field content of {len} bytes exceeds the 2^56 - 9 byte limit")]
    ContentTooLarge { len: usize },

    #[error("binary size overflows usize")]
    SizeOverflow,

    // Sequencing
    #[error("{what} is not finalized (size word is zero)")]
    NotFinalized { what: String },

    #[error("field '{field}' has not been written yet")]
    FieldNotWritten { field: String },

    #[error("fields must be written in declaration order: expected '{expected}', got '{found}'")]
    OutOfOrder { expected: String, found: String },

    #[error("object is incomplete: {written} of {total} fields written")]
    Incomplete { written: usize, total: usize },

    // Kind mismatch
    #[error("kind mismatch: expected {expected}, found {found}")]
    KindMismatch { expected: String, found: String },

    #[error("variant is empty")]
    EmptyVariant,

    #[error("index {index} out of bounds (len {len})")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("unknown field '{name}'")]
    UnknownField { name: String },

    #[error("schema mismatch: expected '{expected}', found '{found}'")]
    SchemaMismatch { expected: String, found: String },

    // Decoding
    #[error("invalid size header 0x{word:016x} at offset {offset}")]
    InvalidHeader { offset: usize, word: u64 },

    #[error("value {value} is not a member of enum '{name}'")]
    InvalidEnum { name: String, value: i64 },

    #[error("string at offset {offset} is not valid UTF-8")]
    InvalidUtf8 { offset: usize },

    #[error("variant declares {count} kinds, at most 255 are supported")]
    TooManyKinds { count: usize },

    #[error("invalid schema: {reason}")]
    InvalidSchema { reason: String },
}

impl FastbinError {
    pub(crate) fn schema(reason: impl Into<String>) -> Self {
        FastbinError::InvalidSchema {
            reason: reason.into(),
        }
    }

    pub(crate) fn mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        FastbinError::KindMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }
}

/// Result alias used across the crate.
pub type Result<T> = core::result::Result<T, FastbinError>;

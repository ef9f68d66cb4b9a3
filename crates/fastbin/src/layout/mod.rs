// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Composite object layout.
//!
//! Field `i` starts where field `i - 1` ends. Fixed fields have a constant
//! stride, so every offset up to the first variable field is precomputed in
//! the [`Schema`]. Past that point the offset is found by walking the stored
//! sizes of the variable fields in front of it:
//!
//! - strings, vectors and variants: low 56 bits of their header word
//! - nested variable objects: the self-size word at their own offset 0
//! - struct arrays: the total-size word of their header
//!
//! A stored size of zero means the field has not been written (or, for a
//! nested object, not finalized) and the walk stops with an error.

mod builder;
mod descriptor;

pub use builder::SchemaBuilder;
pub use descriptor::{FieldDef, FieldKind, Schema, VarSize, VariantDef};

use crate::codec::{cursor, varfield};
use crate::config::{ARRAY_HEADER_SIZE, WORD_SIZE};
use crate::error::{FastbinError, Result};

/// Bytes occupied by `field` when it starts at `offset`.
pub(crate) fn span(field: &FieldDef, buf: &[u8], offset: usize) -> Result<usize> {
    if let Some(size) = field.kind.fixed_size() {
        return Ok(size);
    }

    let (word, min) = match &field.kind {
        FieldKind::Object(_) => {
            let word = cursor::load_u64(buf, offset)?;
            if word == 0 {
                return Err(FastbinError::NotFinalized {
                    what: format!("field '{}'", field.name),
                });
            }
            (word, WORD_SIZE)
        }
        FieldKind::Array(_) => {
            let word = cursor::load_u64(buf, offset)?;
            if word == 0 {
                return Err(not_written(field));
            }
            (word, ARRAY_HEADER_SIZE)
        }
        _ => match varfield::read_header(buf, offset)? {
            Some(header) => (header.size() as u64, WORD_SIZE),
            None => return Err(not_written(field)),
        },
    };

    let size = usize::try_from(word)
        .ok()
        .filter(|size| size % WORD_SIZE == 0 && *size >= min)
        .ok_or(FastbinError::InvalidHeader { offset, word })?;
    cursor::check(buf.len(), offset, size)?;
    Ok(size)
}

/// Offset of field `index`, walking preceding variable fields when needed.
pub(crate) fn offset_of(schema: &Schema, buf: &[u8], index: usize) -> Result<usize> {
    schema.field(index)?;
    let (anchor, mut offset) = (0..=index)
        .rev()
        .find_map(|i| schema.static_offset(i).map(|offset| (i, offset)))
        .ok_or(FastbinError::IndexOutOfBounds {
            index,
            len: schema.len(),
        })?;
    for field in &schema.fields()[anchor..index] {
        offset += span(field, buf, offset)?;
    }
    Ok(offset)
}

/// End offset of the last field: the binary size of the object.
pub(crate) fn end_of(schema: &Schema, buf: &[u8]) -> Result<usize> {
    if let Some(size) = schema.fixed_size() {
        return Ok(size);
    }
    let last = schema.len() - 1;
    let offset = offset_of(schema, buf, last)?;
    Ok(offset + span(&schema.fields()[last], buf, offset)?)
}

fn not_written(field: &FieldDef) -> FastbinError {
    FastbinError::FieldNotWritten {
        field: field.name.clone(),
    }
}

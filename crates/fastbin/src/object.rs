// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Composite object view.
//!
//! An [`Object`] is a lens over a buffer laid out by a [`Schema`]. It owns no
//! state besides the schema reference and the storage; two views over the
//! same bytes observe the same object.
//!
//! # Lifecycle
//!
//! ```text
//! create() --set fields in declaration order--> finalize() --> read / copy
//! ```
//!
//! Fixed fields in front of the first variable field may be written in any
//! order. A field behind a variable field can only be located once that
//! variable field has been written; until then the offset walk reports
//! `FieldNotWritten`. Fixed-size schemas have no self-size word and are always
//! finalized.

use crate::array::StructArray;
use crate::buffer::{self, Encoded, OwnedBuf};
use crate::codec::{cursor, scalar, varfield, FastbinEnum, Scalar, ScalarSlice, ScalarValue};
use crate::config::{VAR_HEADER_SIZE, WORD_SIZE};
use crate::error::{FastbinError, Result};
use crate::layout::{self, FieldDef, FieldKind, Schema};
use crate::variant::Variant;
use std::fmt;

/// Typed view of a composite object.
pub struct Object<'s, B> {
    schema: &'s Schema,
    buf: B,
}

impl<'s, B: AsRef<[u8]>> Object<'s, B> {
    /// Wrap existing bytes without touching them.
    pub fn open(schema: &'s Schema, buf: B) -> Self {
        Self { schema, buf }
    }

    pub fn schema(&self) -> &'s Schema {
        self.schema
    }

    /// Size of the underlying buffer.
    pub fn capacity(&self) -> usize {
        self.buf.as_ref().len()
    }

    /// The whole underlying buffer.
    pub fn buffer(&self) -> &[u8] {
        self.buf.as_ref()
    }

    pub fn into_inner(self) -> B {
        self.buf
    }

    /// Borrowed view over the same bytes.
    pub fn as_view(&self) -> Object<'s, &[u8]> {
        Object::open(self.schema, self.buf.as_ref())
    }

    /// Index of the field called `name`.
    pub fn index_of(&self, name: &str) -> Result<usize> {
        self.schema.field_index(name)
    }

    fn def(&self, index: usize) -> Result<&'s FieldDef> {
        self.schema.field(index)
    }

    /// Byte offset of field `index`.
    pub fn field_offset(&self, index: usize) -> Result<usize> {
        layout::offset_of(self.schema, self.buf.as_ref(), index)
    }

    /// Aligned size of field `index` (distance to the next field).
    pub fn field_size(&self, index: usize) -> Result<usize> {
        let offset = self.field_offset(index)?;
        layout::span(self.def(index)?, self.buf.as_ref(), offset)
    }

    /// Header plus content of a variable field without its padding. For
    /// every other kind this is the same as [`Object::field_size`].
    pub fn field_size_unaligned(&self, index: usize) -> Result<usize> {
        let def = self.def(index)?;
        if !def.kind.has_var_header() {
            return self.field_size(index);
        }
        let offset = self.field_offset(index)?;
        varfield::read_header(self.buf.as_ref(), offset)?
            .map(|header| header.size_unaligned())
            .ok_or_else(|| FastbinError::FieldNotWritten {
                field: def.name.clone(),
            })
    }

    /// Read a scalar field (or an enum field as its integer representation).
    pub fn get<T: Scalar>(&self, index: usize) -> Result<T> {
        self.def(index)?.kind.expect_scalar::<T>()?;
        let offset = self.field_offset(index)?;
        scalar::load::<T>(self.buf.as_ref(), offset)
    }

    /// Read a typed enum field.
    pub fn get_enum<E: FastbinEnum>(&self, index: usize) -> Result<E> {
        expect_enum::<E>(self.def(index)?)?;
        E::from_repr(self.get::<E::Repr>(index)?)
    }

    /// Read a scalar or enum field without knowing its type statically.
    pub fn scalar(&self, index: usize) -> Result<ScalarValue> {
        let def = self.def(index)?;
        let kind = match &def.kind {
            FieldKind::Scalar(kind) => *kind,
            FieldKind::Enum(enum_def) => enum_def.repr,
            other => return Err(FastbinError::mismatch("scalar", other.to_string())),
        };
        let offset = self.field_offset(index)?;
        let bits = scalar::load_bits(self.buf.as_ref(), offset, kind.width())?;
        Ok(ScalarValue::from_bits(kind, bits))
    }

    /// Member name of an enum field's current value.
    pub fn enum_name(&self, index: usize) -> Result<&'s str> {
        let FieldKind::Enum(def) = &self.def(index)?.kind else {
            return Err(FastbinError::mismatch(
                "enum",
                self.def(index)?.kind.to_string(),
            ));
        };
        let raw = self
            .scalar(index)?
            .as_i64()
            .ok_or_else(|| FastbinError::mismatch("integer enum value", def.repr.name()))?;
        def.name_of(raw)
    }

    fn var_content(&self, index: usize) -> Result<(usize, &[u8])> {
        let def = self.def(index)?;
        let offset = self.field_offset(index)?;
        let content = varfield::read_var(self.buf.as_ref(), offset)?.ok_or_else(|| {
            FastbinError::FieldNotWritten {
                field: def.name.clone(),
            }
        })?;
        Ok((offset, content))
    }

    /// Borrow a string field.
    pub fn str(&self, index: usize) -> Result<&str> {
        let def = self.def(index)?;
        if def.kind != FieldKind::String {
            return Err(FastbinError::mismatch("string", def.kind.to_string()));
        }
        let (offset, content) = self.var_content(index)?;
        std::str::from_utf8(content).map_err(|_| FastbinError::InvalidUtf8 {
            offset: offset + VAR_HEADER_SIZE,
        })
    }

    /// Borrow a primitive (or enum) vector field.
    pub fn vector<T: Scalar>(&self, index: usize) -> Result<ScalarSlice<'_, T>> {
        self.def(index)?.kind.expect_vector::<T>()?;
        let (_, content) = self.var_content(index)?;
        ScalarSlice::new(content)
    }

    /// Borrow a nested object field.
    pub fn object(&self, index: usize) -> Result<Object<'s, &[u8]>> {
        let def = self.def(index)?;
        let FieldKind::Object(schema) = &def.kind else {
            return Err(FastbinError::mismatch("struct", def.kind.to_string()));
        };
        let offset = self.field_offset(index)?;
        let size = layout::span(def, self.buf.as_ref(), offset)?;
        let bytes = cursor::bytes(self.buf.as_ref(), offset, size)?;
        Ok(Object::open(schema, bytes))
    }

    /// Borrow a struct array field.
    pub fn array(&self, index: usize) -> Result<StructArray<'s, &[u8]>> {
        let def = self.def(index)?;
        let FieldKind::Array(element) = &def.kind else {
            return Err(FastbinError::mismatch("struct array", def.kind.to_string()));
        };
        let offset = self.field_offset(index)?;
        let size = layout::span(def, self.buf.as_ref(), offset)?;
        let bytes = cursor::bytes(self.buf.as_ref(), offset, size)?;
        StructArray::open(element, bytes)
    }

    /// Borrow a variant field (the bytes behind its wrapping header).
    pub fn variant(&self, index: usize) -> Result<Variant<'s, &[u8]>> {
        let def = self.def(index)?;
        let FieldKind::Variant(variant_def) = &def.kind else {
            return Err(FastbinError::mismatch("variant", def.kind.to_string()));
        };
        let (_, content) = self.var_content(index)?;
        Variant::open(variant_def, content)
    }

    /// Walk every field and return the end offset of the last one.
    ///
    /// Re-reads every variable header; call it once, at finalize time.
    pub fn compute_binary_size(&self) -> Result<usize> {
        layout::end_of(self.schema, self.buf.as_ref())
    }

    /// Size recorded by [`Object::finalize`] (or the constant size of a
    /// fixed-size schema).
    pub fn binary_size(&self) -> Result<usize> {
        if let Some(size) = self.schema.fixed_size() {
            cursor::check(self.capacity(), 0, size)?;
            return Ok(size);
        }
        let word = cursor::load_u64(self.buf.as_ref(), 0)?;
        if word == 0 {
            return Err(FastbinError::NotFinalized {
                what: format!("object '{}'", self.schema.name()),
            });
        }
        let size = usize::try_from(word)
            .ok()
            .filter(|size| size % WORD_SIZE == 0 && *size >= WORD_SIZE)
            .ok_or(FastbinError::InvalidHeader { offset: 0, word })?;
        cursor::check(self.capacity(), 0, size)?;
        Ok(size)
    }

    pub fn is_finalized(&self) -> bool {
        self.binary_size().is_ok()
    }

    /// Exactly `binary_size()` bytes.
    pub fn as_bytes(&self) -> Result<&[u8]> {
        let size = self.binary_size()?;
        cursor::bytes(self.buf.as_ref(), 0, size)
    }

    /// Independent owned duplicate of exactly `binary_size()` bytes.
    pub fn copy(&self) -> Result<Object<'s, OwnedBuf>> {
        Ok(Object::open(self.schema, buffer::copy_owned(self.as_bytes()?)))
    }

    /// Duplicate into `dest`, which must hold at least `binary_size()` bytes.
    pub fn copy_into<'d>(&self, dest: &'d mut [u8]) -> Result<Object<'s, &'d mut [u8]>> {
        let dest = buffer::copy_to(self.as_bytes()?, dest)?;
        Ok(Object::open(self.schema, dest))
    }
}

impl<'s, B: AsRef<[u8]> + AsMut<[u8]>> Object<'s, B> {
    /// Zero the buffer and wrap it for writing.
    pub fn create(schema: &'s Schema, mut buf: B) -> Result<Self> {
        buffer::zero_fill(buf.as_mut(), schema.min_size())?;
        log::trace!(
            "[object] create {} capacity={}",
            schema.name(),
            buf.as_ref().len()
        );
        Ok(Self { schema, buf })
    }

    /// Mutable borrowed view over the same bytes.
    pub fn as_view_mut(&mut self) -> Object<'s, &mut [u8]> {
        Object::open(self.schema, self.buf.as_mut())
    }

    /// Write a scalar field (or an enum field as its integer representation).
    pub fn set<T: Scalar>(&mut self, index: usize, value: T) -> Result<()> {
        let (def, offset) = self.locate(index)?;
        write_scalar(self.buf.as_mut(), def, offset, value).map(drop)
    }

    /// Write a typed enum field.
    pub fn set_enum<E: FastbinEnum>(&mut self, index: usize, value: E) -> Result<()> {
        expect_enum::<E>(self.def(index)?)?;
        self.set(index, value.to_repr())
    }

    /// Write a string field.
    pub fn set_str(&mut self, index: usize, value: &str) -> Result<()> {
        let (def, offset) = self.locate(index)?;
        write_str(self.buf.as_mut(), def, offset, value).map(drop)
    }

    /// Write a primitive (or enum representation) vector field.
    pub fn set_vector<T: Scalar>(&mut self, index: usize, values: &[T]) -> Result<()> {
        let (def, offset) = self.locate(index)?;
        write_vector(self.buf.as_mut(), def, offset, values).map(drop)
    }

    /// Copy a finalized object into a nested object field.
    pub fn set_object<V: AsRef<[u8]>>(&mut self, index: usize, value: &Object<'_, V>) -> Result<()> {
        let (def, offset) = self.locate(index)?;
        write_object(self.buf.as_mut(), def, offset, value).map(drop)
    }

    /// Copy a struct array into an array field.
    pub fn set_array<V: AsRef<[u8]>>(
        &mut self,
        index: usize,
        value: &StructArray<'_, V>,
    ) -> Result<()> {
        let (def, offset) = self.locate(index)?;
        write_array(self.buf.as_mut(), def, offset, value).map(drop)
    }

    /// Copy a variant into a variant field, wrapped in a variable header.
    pub fn set_variant<V: AsRef<[u8]>>(&mut self, index: usize, value: &Variant<'_, V>) -> Result<()> {
        let (def, offset) = self.locate(index)?;
        write_variant(self.buf.as_mut(), def, offset, value).map(drop)
    }

    /// Mutable view of a nested object field for in-place writes.
    ///
    /// A fixed-size child gets exactly its own bytes; a variable-size child
    /// gets the rest of the buffer and must be finalized before any later
    /// field of this object is written.
    pub fn object_mut(&mut self, index: usize) -> Result<Object<'s, &mut [u8]>> {
        let (def, offset) = self.locate(index)?;
        let FieldKind::Object(schema) = &def.kind else {
            return Err(FastbinError::mismatch("struct", def.kind.to_string()));
        };
        let bytes = match schema.fixed_size() {
            Some(size) => cursor::bytes_mut(self.buf.as_mut(), offset, size)?,
            None => cursor::tail_mut(self.buf.as_mut(), offset)?,
        };
        Ok(Object::open(schema, bytes))
    }

    /// Create a nested object in place (zeroing its region).
    pub fn init_object(&mut self, index: usize) -> Result<Object<'s, &mut [u8]>> {
        let child = self.object_mut(index)?;
        let schema = child.schema;
        Object::create(schema, child.into_inner())
    }

    /// Create a struct array in place, over the rest of the buffer.
    pub fn init_array(&mut self, index: usize) -> Result<StructArray<'s, &mut [u8]>> {
        let (def, offset) = self.locate(index)?;
        let FieldKind::Array(element) = &def.kind else {
            return Err(FastbinError::mismatch("struct array", def.kind.to_string()));
        };
        StructArray::create(element, cursor::tail_mut(self.buf.as_mut(), offset)?)
    }

    /// Mutable view of an existing struct array field, e.g. to keep appending.
    pub fn array_mut(&mut self, index: usize) -> Result<StructArray<'s, &mut [u8]>> {
        let (def, offset) = self.locate(index)?;
        let FieldKind::Array(element) = &def.kind else {
            return Err(FastbinError::mismatch("struct array", def.kind.to_string()));
        };
        StructArray::open(element, cursor::tail_mut(self.buf.as_mut(), offset)?)
    }

    /// Record `compute_binary_size()` in the self-size word.
    ///
    /// No-op for fixed-size schemas. Returns the binary size.
    pub fn finalize(&mut self) -> Result<usize> {
        if let Some(size) = self.schema.fixed_size() {
            return Ok(size);
        }
        let size = self.compute_binary_size()?;
        cursor::store_u64(self.buf.as_mut(), 0, size as u64)?;
        log::trace!("[object] finalize {} size={}", self.schema.name(), size);
        Ok(size)
    }

    fn locate(&self, index: usize) -> Result<(&'s FieldDef, usize)> {
        let def = self.def(index)?;
        let offset = self.field_offset(index).inspect_err(|e| {
            log::debug!(
                "[object] cannot locate {}.{}: {}",
                self.schema.name(),
                def.name,
                e
            );
        })?;
        Ok((def, offset))
    }
}

impl<B: AsRef<[u8]>> Encoded for Object<'_, B> {
    fn binary_size(&self) -> Result<usize> {
        Object::binary_size(self)
    }

    fn encoded_bytes(&self) -> Result<&[u8]> {
        self.as_bytes()
    }
}

impl<B: AsRef<[u8]>> fmt::Debug for Object<'_, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("schema", &self.schema.name())
            .field("capacity", &self.capacity())
            .field("binary_size", &self.binary_size().ok())
            .finish()
    }
}

pub(crate) fn expect_enum<E: FastbinEnum>(def: &FieldDef) -> Result<()> {
    match &def.kind {
        FieldKind::Enum(enum_def) if enum_def.name == E::NAME => Ok(()),
        other => Err(FastbinError::mismatch(
            other.to_string(),
            format!("enum:{}", E::NAME),
        )),
    }
}

/// Embedded containers must use the field's own schema.
pub(crate) fn expect_schema(expected: &Schema, found: &Schema) -> Result<()> {
    if std::ptr::eq(expected, found) || expected == found {
        Ok(())
    } else {
        Err(FastbinError::SchemaMismatch {
            expected: expected.name().to_string(),
            found: found.name().to_string(),
        })
    }
}

// Field writers shared by `Object` setters and `ObjectWriter`. Each returns
// the number of bytes the field occupies.

pub(crate) fn write_scalar<T: Scalar>(
    buf: &mut [u8],
    def: &FieldDef,
    offset: usize,
    value: T,
) -> Result<usize> {
    def.kind.expect_scalar::<T>()?;
    scalar::store_field(buf, offset, value)?;
    Ok(def.kind.fixed_size().unwrap_or(WORD_SIZE))
}

pub(crate) fn write_str(buf: &mut [u8], def: &FieldDef, offset: usize, value: &str) -> Result<usize> {
    if def.kind != FieldKind::String {
        return Err(FastbinError::mismatch(def.kind.to_string(), "string"));
    }
    varfield::write_var(buf, offset, value.as_bytes())
}

pub(crate) fn write_vector<T: Scalar>(
    buf: &mut [u8],
    def: &FieldDef,
    offset: usize,
    values: &[T],
) -> Result<usize> {
    def.kind.expect_vector::<T>()?;
    varfield::write_var_with(buf, offset, values.len() * T::WIDTH, |dst| {
        scalar::pack_into(values, dst)
    })
}

pub(crate) fn write_object<V: AsRef<[u8]>>(
    buf: &mut [u8],
    def: &FieldDef,
    offset: usize,
    value: &Object<'_, V>,
) -> Result<usize> {
    let FieldKind::Object(schema) = &def.kind else {
        return Err(FastbinError::mismatch(def.kind.to_string(), "struct"));
    };
    expect_schema(schema, value.schema())?;
    let bytes = value.as_bytes()?;
    cursor::store_bytes(buf, offset, bytes)?;
    Ok(bytes.len())
}

pub(crate) fn write_array<V: AsRef<[u8]>>(
    buf: &mut [u8],
    def: &FieldDef,
    offset: usize,
    value: &StructArray<'_, V>,
) -> Result<usize> {
    let FieldKind::Array(element) = &def.kind else {
        return Err(FastbinError::mismatch(def.kind.to_string(), "struct array"));
    };
    expect_schema(element, value.element())?;
    let bytes = value.as_bytes();
    cursor::store_bytes(buf, offset, bytes)?;
    Ok(bytes.len())
}

pub(crate) fn write_variant<V: AsRef<[u8]>>(
    buf: &mut [u8],
    def: &FieldDef,
    offset: usize,
    value: &Variant<'_, V>,
) -> Result<usize> {
    let FieldKind::Variant(variant_def) = &def.kind else {
        return Err(FastbinError::mismatch(def.kind.to_string(), "variant"));
    };
    if **variant_def != *value.def() {
        return Err(FastbinError::mismatch(
            variant_def.to_string(),
            value.def().to_string(),
        ));
    }
    varfield::write_var(buf, offset, value.as_bytes())
}
